/// 戰爭迷霧揭露紀錄
///
/// 主持人拖曳出圓形區域來揭露地圖，列表只增不減，直到明確重置。
/// 與動態光照無關，不需要任何視線計算。
use log::{info, warn};
use serde::{Deserialize, Serialize};
use vek::Vec2;

use crate::comp::Role;
use crate::error::{Result, VisionError};
use crate::vision::{is_point_in_circle, Point};

/// 已揭露的圓形區域
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct RevealedArea {
    pub x: f64,
    pub y: f64,
    pub radius: f64,
}

impl RevealedArea {
    pub fn center(&self) -> Point {
        Vec2::new(self.x, self.y)
    }

    pub fn contains(&self, point: Point) -> bool {
        is_point_in_circle(point, self.center(), self.radius)
    }
}

#[derive(Debug, Clone)]
pub struct FogOfWar {
    enabled: bool,
    revealed: Vec<RevealedArea>,
    /// 小於等於此半徑的揭露視為雜訊
    min_radius: f64,
}

impl Default for FogOfWar {
    fn default() -> Self {
        Self::new(5.0)
    }
}

impl FogOfWar {
    pub fn new(min_radius: f64) -> Self {
        Self {
            enabled: false,
            revealed: Vec::new(),
            min_radius,
        }
    }

    /// 以既有的揭露紀錄建立（載入場景時使用）
    pub fn with_revealed(min_radius: f64, enabled: bool, revealed: Vec<RevealedArea>) -> Self {
        let mut fog = Self::new(min_radius);
        fog.enabled = enabled;
        fog.revealed = revealed
            .into_iter()
            .filter(|area| area.radius.is_finite() && area.radius > min_radius)
            .collect();
        fog
    }

    fn require_host(role: &Role, action: &'static str) -> Result<()> {
        if role.is_host() {
            Ok(())
        } else {
            warn!("非主持人嘗試 {}", action);
            Err(VisionError::HostOnly { action })
        }
    }

    /// 揭露一個圓形區域
    pub fn reveal(&mut self, role: &Role, center: Point, radius: f64) -> Result<RevealedArea> {
        Self::require_host(role, "reveal")?;
        if !radius.is_finite() || !(radius > self.min_radius) {
            return Err(VisionError::RevealTooSmall { radius, min: self.min_radius });
        }
        let area = RevealedArea { x: center.x, y: center.y, radius };
        self.revealed.push(area);
        info!("揭露區域 ({:.1}, {:.1}) 半徑 {:.1}，共 {} 個", area.x, area.y, area.radius, self.revealed.len());
        Ok(area)
    }

    /// 拖曳揭露：起點為圓心，拖曳距離為半徑
    pub fn reveal_drag(&mut self, role: &Role, start: Point, end: Point) -> Result<RevealedArea> {
        self.reveal(role, start, start.distance(end))
    }

    /// 重置視野，回傳清除數量
    pub fn reset(&mut self, role: &Role) -> Result<usize> {
        Self::require_host(role, "reset")?;
        let count = self.revealed.len();
        self.revealed.clear();
        info!("已重置迷霧，清除 {} 個揭露區域", count);
        Ok(count)
    }

    pub fn set_enabled(&mut self, role: &Role, enabled: bool) -> Result<()> {
        Self::require_host(role, "toggle fog")?;
        self.enabled = enabled;
        Ok(())
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn revealed(&self) -> &[RevealedArea] {
        &self.revealed
    }

    /// 點是否落在任一揭露區域內
    pub fn is_revealed(&self, point: Point) -> bool {
        self.revealed.iter().any(|area| area.contains(point))
    }
}
