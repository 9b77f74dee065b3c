/// 場景載入與計算資源初始化

use log::{info, warn};
use rayon::{ThreadPool, ThreadPoolBuilder};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;
use std::sync::Arc;

use crate::comp::{MapState, MapTrigger, RevealedArea, Token, Wall};
use crate::error::{Result, VisionError};

/// 場景檔內容
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct SceneFile {
    pub map: MapState,
    pub walls: Vec<Wall>,
    pub tokens: Vec<Token>,
    pub revealed_areas: Vec<RevealedArea>,
    pub triggers: Vec<MapTrigger>,
}

impl SceneFile {
    /// 依副檔名選擇格式載入（json / yaml / toml）
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| VisionError::Io {
            path: path.display().to_string(),
            source,
        })?;

        let extension = path
            .extension()
            .and_then(|ext| ext.to_str())
            .map(|ext| ext.to_ascii_lowercase())
            .unwrap_or_default();

        let scene = match extension.as_str() {
            "json" => Self::from_json(&content)?,
            "yaml" | "yml" => serde_yaml::from_str(&content)?,
            "toml" => toml::from_str(&content)?,
            other => return Err(VisionError::UnsupportedFormat(other.to_string())),
        };

        info!(
            "已載入場景 {}: {} 面牆, {} 個棋子, {} 個揭露區域",
            path.display(),
            scene.walls.len(),
            scene.tokens.len(),
            scene.revealed_areas.len()
        );
        Ok(scene)
    }

    pub fn from_json(content: &str) -> Result<Self> {
        Ok(serde_json::from_str(content)?)
    }
}

/// 建立視野計算用的執行緒池
pub fn create_thread_pool(threads: usize) -> Result<Arc<ThreadPool>> {
    let threads = if threads == 0 {
        warn!("執行緒數為 0，改用 CPU 核心數");
        num_cpus::get()
    } else {
        threads
    };
    let pool = ThreadPoolBuilder::new()
        .num_threads(threads)
        .thread_name(move |i| format!("rayon-{}", i))
        .build()?;
    Ok(Arc::new(pool))
}
