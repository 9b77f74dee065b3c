use lazy_static::lazy_static;
use log::{info, warn};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::{Result, VisionError};
use crate::vision::Bounds;

/// 預設設定檔路徑，可用環境變數 FOGSIGHT_CONFIG 覆蓋
pub const DEFAULT_CONFIG_PATH: &str = "vision.toml";

/// 視野與迷霧設定
#[derive(Serialize, Deserialize, Clone, Debug, PartialEq)]
#[serde(default)]
pub struct VisionSetting {
    /// 棋子沒有光源半徑時使用的預設值（呎）
    pub default_light_radius_feet: f64,
    /// 每格代表幾呎
    pub feet_per_cell: f64,
    /// 光照邊界多邊形的邊數
    pub light_sides: usize,
    /// 角點兩側取樣的角度偏移（弧度）
    pub angle_epsilon: f64,
    /// 射線超出光照半徑的餘量（像素）
    pub ray_padding: f64,
    /// 世界邊界
    pub world_bounds: Bounds,
    /// 揭露圓最小半徑（像素），小於等於此值視為雜訊
    pub reveal_min_radius: f64,
    /// 牆壁最小長度（像素）
    pub wall_min_length: f64,
    /// 夜晚黑暗程度
    pub night_darkness: f64,
    /// 開啟動態光照時黑暗層的最低不透明度
    pub dynamic_lighting_min_alpha: f64,
    /// 錐形範圍的張角（度）
    pub cone_spread_degrees: f64,
    /// 計算執行緒數，0 代表使用 CPU 核心數
    pub worker_threads: usize,
    /// 視野快取上限
    pub cache_capacity: usize,
}

#[derive(Serialize, Deserialize, Clone, Debug, Default)]
struct Setting {
    #[serde(default)]
    vision: VisionSetting,
}

impl Default for VisionSetting {
    fn default() -> Self {
        Self {
            default_light_radius_feet: 60.0,
            feet_per_cell: 5.0,
            light_sides: 16,
            angle_epsilon: 1e-5,
            ray_padding: 100.0,
            world_bounds: Bounds::default(),
            reveal_min_radius: 5.0,
            wall_min_length: 5.0,
            night_darkness: 0.85,
            dynamic_lighting_min_alpha: 0.96,
            cone_spread_degrees: 53.1,
            worker_threads: 0,
            cache_capacity: 256,
        }
    }
}

impl VisionSetting {
    /// 從 TOML 字串解析，缺少的欄位使用預設值
    pub fn from_toml_str(content: &str) -> Result<Self> {
        let setting: Setting = toml::from_str(content)?;
        Ok(setting.vision)
    }

    /// 從檔案載入設定
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let content = fs::read_to_string(path).map_err(|source| VisionError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// 讀取設定檔，失敗時退回預設值
    pub fn load_or_default() -> Self {
        let path = std::env::var("FOGSIGHT_CONFIG").unwrap_or_else(|_| DEFAULT_CONFIG_PATH.to_string());
        if !Path::new(&path).exists() {
            info!("找不到設定檔 {}，使用預設視野設定", path);
            return Self::default();
        }
        match Self::load_from_file(&path) {
            Ok(setting) => {
                info!("已載入視野設定: {}", path);
                setting
            }
            Err(e) => {
                warn!("讀取設定檔 {} 失敗，使用預設值: {}", path, e);
                Self::default()
            }
        }
    }

    /// 實際使用的執行緒數
    pub fn thread_count(&self) -> usize {
        if self.worker_threads == 0 {
            num_cpus::get()
        } else {
            self.worker_threads
        }
    }

    pub fn cone_spread_radians(&self) -> f64 {
        self.cone_spread_degrees.to_radians()
    }
}

lazy_static! {
    pub static ref CONFIG: VisionSetting = VisionSetting::load_or_default();
}
