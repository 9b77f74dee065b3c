use anyhow::{Context, Result};
use chrono::Local;
use clap::{Parser, Subcommand};
use crossbeam_channel::{select, unbounded, Receiver};
use log::{error, info, warn};
use std::fs;
use std::io::{self, BufRead};
use std::path::{Path, PathBuf};
use std::thread;

use fogsight::comp::Role;
use fogsight::config::CONFIG;
use fogsight::msg::{to_compact_json, SyncMsg};
use fogsight::state::{execute, Command, Reply, SceneFile, SceneState, SharedScene};
use fogsight::vision::LightingCalculator;

#[derive(Parser)]
#[command(name = "fogsight", version, about = "桌遊地圖視線與戰爭迷霧引擎")]
struct Cli {
    /// log4rs 設定檔
    #[arg(long, default_value = "log4rs.yml")]
    log_config: PathBuf,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// 載入場景並輸出一次畫面
    Frame {
        #[arg(long)]
        scene: PathBuf,
        /// 以玩家身分計算，省略時為主持人
        #[arg(long)]
        player: Option<String>,
        /// 輸出檔案，省略時寫到 stdout
        #[arg(long)]
        output: Option<PathBuf>,
    },
    /// 從 stdin 讀取主持人指令
    Shell {
        #[arg(long)]
        scene: Option<PathBuf>,
    },
}

/// log4rs 設定檔讀不到時改用 fern 輸出到 stderr
fn init_logging(path: &Path) -> Result<()> {
    match log4rs::init_file(path, Default::default()) {
        Ok(()) => Ok(()),
        Err(e) => {
            fern::Dispatch::new()
                .format(|out, message, record| {
                    out.finish(format_args!(
                        "{} {:<5} {} - {}",
                        Local::now().format("%Y-%m-%d %H:%M:%S%.3f"),
                        record.level(),
                        record.target(),
                        message
                    ))
                })
                .level(log::LevelFilter::Info)
                .chain(io::stderr())
                .apply()?;
            warn!("無法載入 {}（{}），改用預設日誌設定", path.display(), e);
            Ok(())
        }
    }
}

fn load_scene(path: Option<&Path>) -> Result<SceneState> {
    Ok(match path {
        Some(path) => {
            let scene = SceneFile::load_from_file(path)
                .with_context(|| format!("載入場景 {} 失敗", path.display()))?;
            SceneState::from_scene(scene, &CONFIG)
        }
        None => SceneState::new(&CONFIG),
    })
}

fn role_of(player: Option<String>) -> Role {
    player.map(Role::Player).unwrap_or(Role::Host)
}

fn run_frame(scene: PathBuf, player: Option<String>, output: Option<PathBuf>) -> Result<()> {
    let state = load_scene(Some(&scene))?;
    let calculator = LightingCalculator::new(&CONFIG)?;
    let frame = calculator.compute_frame(&state.snapshot(), &role_of(player));
    let text = to_compact_json(&frame)?;

    match output {
        Some(path) => {
            fs::write(&path, text).with_context(|| format!("寫入 {} 失敗", path.display()))?;
            info!("畫面已寫入 {}", path.display());
        }
        None => println!("{}", text),
    }
    Ok(())
}

/// stdin 讀取執行緒，EOF 時關閉通道
fn spawn_input_reader() -> Receiver<String> {
    let (tx, rx) = unbounded();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if tx.send(line).is_err() {
                        break;
                    }
                }
                Err(e) => {
                    error!("讀取輸入失敗: {}", e);
                    break;
                }
            }
        }
    });
    rx
}

fn log_sync(msg: &SyncMsg) {
    info!("sync {} {} {}", msg.topic, msg.action, msg.payload);
}

fn run_shell(scene: Option<PathBuf>) -> Result<()> {
    let (synctx, syncrx) = unbounded::<SyncMsg>();
    let shared: SharedScene = load_scene(scene.as_deref())?.with_sender(synctx).into_shared();
    let calculator = LightingCalculator::new(&CONFIG)?;
    let input = spawn_input_reader();
    info!("指令列就緒，輸入 quit 結束");

    loop {
        select! {
            recv(input) -> line => {
                let line = match line {
                    Ok(line) => line,
                    Err(_) => break,
                };
                if line.trim().is_empty() {
                    continue;
                }
                let reply = line
                    .parse::<Command>()
                    .and_then(|command| execute(&shared, command));
                match reply {
                    Ok(Reply::Done(text)) => println!("{}", text),
                    Ok(Reply::Frame(role)) => {
                        let snapshot = shared.read().snapshot();
                        let frame = calculator.compute_frame(&snapshot, &role);
                        println!("{}", to_compact_json(&frame)?);
                    }
                    Ok(Reply::Quit) => break,
                    Err(e) => {
                        warn!("{}", e);
                        println!("error: {}", e);
                    }
                }
            }
            recv(syncrx) -> msg => {
                if let Ok(msg) = msg {
                    log_sync(&msg);
                }
            }
        }
    }

    for msg in syncrx.try_iter() {
        log_sync(&msg);
    }
    let stats = calculator.cache_stats();
    info!("結束，快取命中 {} 次，未命中 {} 次", stats.hits, stats.misses);
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_logging(&cli.log_config)?;

    match cli.command {
        Commands::Frame { scene, player, output } => run_frame(scene, player, output),
        Commands::Shell { scene } => run_shell(scene),
    }
}
