/// 地圖設定
use log::info;
use serde::{Deserialize, Serialize};

use crate::vision::Bounds;

fn default_scale() -> f64 {
    50.0
}

fn default_day_time() -> f64 {
    12.0
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MapState {
    /// 每格像素
    #[serde(default = "default_scale")]
    pub scale: f64,
    #[serde(default)]
    pub bounds: Bounds,
    #[serde(default)]
    pub fog_enabled: bool,
    #[serde(default)]
    pub dynamic_lighting_enabled: bool,
    /// 一天中的時間（小時）
    #[serde(default = "default_day_time")]
    pub day_time: f64,
}

impl Default for MapState {
    fn default() -> Self {
        Self {
            scale: default_scale(),
            bounds: Bounds::default(),
            fog_enabled: false,
            dynamic_lighting_enabled: false,
            day_time: default_day_time(),
        }
    }
}

impl MapState {
    pub fn with_bounds(bounds: Bounds) -> Self {
        Self { bounds, ..Self::default() }
    }

    /// 設定時間，超出範圍時繞回 [0, 24)
    pub fn set_day_time(&mut self, hours: f64) -> f64 {
        self.day_time = if hours.is_finite() { hours.rem_euclid(24.0) } else { default_day_time() };
        info!("時間設為 {:.2} 時", self.day_time);
        self.day_time
    }
}
