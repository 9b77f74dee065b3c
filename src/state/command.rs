/// 主持人指令列
///
/// 每行一個指令，例如 `wall 0 0 100 0`、`toggle <id>`、`frame p1`。

use log::debug;
use std::str::FromStr;
use vek::Vec2;

use crate::comp::{Role, Token};
use crate::error::{Result, VisionError};
use crate::vision::Point;

use super::{MoveOutcome, SharedScene};

#[derive(Debug, Clone, PartialEq)]
pub enum Command {
    Wall { start: Point, end: Point, is_door: bool },
    Toggle(String),
    Remove(String),
    Clear,
    Token(Token),
    Move { id: String, x: f64, y: f64 },
    Reveal { start: Point, end: Point },
    Reset,
    Fog(bool),
    Lighting(bool),
    Time(f64),
    Frame(Role),
    Quit,
}

/// 指令執行結果
#[derive(Debug, Clone, PartialEq)]
pub enum Reply {
    Done(String),
    /// 由呼叫端計算並輸出畫面
    Frame(Role),
    Quit,
}

fn bad(line: &str) -> VisionError {
    VisionError::BadCommand(line.to_string())
}

fn number(arg: Option<&str>, line: &str) -> Result<f64> {
    arg.and_then(|s| s.parse::<f64>().ok())
        .filter(|v| v.is_finite())
        .ok_or_else(|| bad(line))
}

fn switch(arg: Option<&str>, line: &str) -> Result<bool> {
    match arg {
        Some("on") => Ok(true),
        Some("off") => Ok(false),
        _ => Err(bad(line)),
    }
}

fn drag(args: &[&str], line: &str) -> Result<(Point, Point)> {
    if args.len() != 4 {
        return Err(bad(line));
    }
    let v: Vec<f64> = args
        .iter()
        .map(|a| number(Some(*a), line))
        .collect::<Result<_>>()?;
    Ok((Vec2::new(v[0], v[1]), Vec2::new(v[2], v[3])))
}

impl FromStr for Command {
    type Err = VisionError;

    fn from_str(line: &str) -> Result<Self> {
        let line = line.trim();
        let mut parts = line.split_whitespace();
        let name = parts.next().ok_or_else(|| bad(line))?;
        let args: Vec<&str> = parts.collect();

        let command = match name {
            "wall" | "door" => {
                let (start, end) = drag(&args, line)?;
                Command::Wall { start, end, is_door: name == "door" }
            }
            "toggle" | "remove" => {
                let id = match args.as_slice() {
                    [id] => id.to_string(),
                    _ => return Err(bad(line)),
                };
                if name == "toggle" { Command::Toggle(id) } else { Command::Remove(id) }
            }
            "clear" => Command::Clear,
            "token" => {
                if args.len() < 3 || args.len() > 5 {
                    return Err(bad(line));
                }
                let mut token = Token::new(args[0], number(args.get(1).copied(), line)?, number(args.get(2).copied(), line)?);
                if let Some(light) = args.get(3) {
                    token = token.with_light(number(Some(*light), line)?);
                }
                if let Some(owner) = args.get(4) {
                    token = token.with_owner(*owner);
                }
                Command::Token(token)
            }
            "move" => {
                if args.len() != 3 {
                    return Err(bad(line));
                }
                Command::Move {
                    id: args[0].to_string(),
                    x: number(args.get(1).copied(), line)?,
                    y: number(args.get(2).copied(), line)?,
                }
            }
            "reveal" => {
                let (start, end) = drag(&args, line)?;
                Command::Reveal { start, end }
            }
            "reset" => Command::Reset,
            "fog" => Command::Fog(switch(args.first().copied(), line)?),
            "lighting" => Command::Lighting(switch(args.first().copied(), line)?),
            "time" => Command::Time(number(args.first().copied(), line)?),
            "frame" => match args.first() {
                Some(id) => Command::Frame(Role::Player(id.to_string())),
                None => Command::Frame(Role::Host),
            },
            "quit" | "exit" => Command::Quit,
            _ => return Err(bad(line)),
        };
        Ok(command)
    }
}

/// 以主持人身分執行指令
pub fn execute(scene: &SharedScene, command: Command) -> Result<Reply> {
    debug!("execute {:?}", command);
    let host = Role::Host;
    let reply = match command {
        Command::Wall { start, end, is_door } => {
            let wall = scene.write().draw_wall(&host, start, end, is_door)?;
            Reply::Done(format!("{} {}", if is_door { "door" } else { "wall" }, wall.id))
        }
        Command::Toggle(id) => {
            let wall = scene.write().toggle_door(&host, &id)?;
            Reply::Done(format!("{} open={}", wall.id, wall.is_open))
        }
        Command::Remove(id) => {
            scene.write().remove_wall(&host, &id)?;
            Reply::Done(format!("removed {}", id))
        }
        Command::Clear => {
            let count = scene.write().clear_walls(&host)?;
            Reply::Done(format!("cleared {} walls", count))
        }
        Command::Token(token) => {
            let id = token.id.clone();
            scene.write().upsert_token(&host, token)?;
            Reply::Done(format!("token {}", id))
        }
        Command::Move { id, x, y } => match scene.write().move_token(&host, &id, x, y)? {
            MoveOutcome::Moved => Reply::Done(format!("moved {}", id)),
            MoveOutcome::Triggered(trigger) => Reply::Done(format!(
                "blocked by trigger {}{}",
                trigger.id,
                trigger.chat_message.map(|m| format!(": {}", m)).unwrap_or_default()
            )),
        },
        Command::Reveal { start, end } => {
            let area = scene.write().reveal(&host, start, end)?;
            Reply::Done(format!("revealed ({:.1}, {:.1}) r={:.1}", area.x, area.y, area.radius))
        }
        Command::Reset => {
            let count = scene.write().reset_fog(&host)?;
            Reply::Done(format!("reset {} areas", count))
        }
        Command::Fog(enabled) => {
            scene.write().set_fog_enabled(&host, enabled)?;
            Reply::Done(format!("fog {}", enabled))
        }
        Command::Lighting(enabled) => {
            scene.write().set_dynamic_lighting(&host, enabled)?;
            Reply::Done(format!("lighting {}", enabled))
        }
        Command::Time(hours) => {
            let hours = scene.write().set_day_time(&host, hours)?;
            Reply::Done(format!("time {:.2}", hours))
        }
        Command::Frame(role) => Reply::Frame(role),
        Command::Quit => Reply::Quit,
    };
    Ok(reply)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::VisionSetting;
    use crate::state::SceneState;

    #[test]
    fn parses_commands() {
        assert_eq!(
            "door 0 0 100 0".parse::<Command>().unwrap(),
            Command::Wall { start: Vec2::new(0.0, 0.0), end: Vec2::new(100.0, 0.0), is_door: true }
        );
        assert_eq!("fog on".parse::<Command>().unwrap(), Command::Fog(true));
        assert_eq!("frame p2".parse::<Command>().unwrap(), Command::Frame(Role::Player("p2".into())));
        assert_eq!("frame".parse::<Command>().unwrap(), Command::Frame(Role::Host));
        assert_eq!(
            "token hero 2 3 20 p1".parse::<Command>().unwrap(),
            Command::Token(Token::new("hero", 2.0, 3.0).with_light(20.0).with_owner("p1"))
        );
    }

    #[test]
    fn rejects_malformed_lines() {
        for line in ["", "wall 0 0 1", "fog maybe", "time noon", "toggle", "dance", "reveal 0 0 NaN 1"] {
            assert!(matches!(line.parse::<Command>(), Err(VisionError::BadCommand(_))), "{}", line);
        }
    }

    #[test]
    fn executes_against_shared_scene() {
        let scene = SceneState::new(&VisionSetting::default()).into_shared();
        execute(&scene, "wall 0 0 100 0".parse().unwrap()).unwrap();
        execute(&scene, "token a 1 1".parse().unwrap()).unwrap();
        execute(&scene, "time 30".parse().unwrap()).unwrap();
        assert_eq!(scene.read().walls().len(), 1);
        assert_eq!(scene.read().tokens().len(), 1);
        assert_eq!(scene.read().map().day_time, 6.0);
        assert_eq!(execute(&scene, Command::Quit).unwrap(), Reply::Quit);
        assert!(execute(&scene, "toggle missing".parse().unwrap()).is_err());
    }
}
