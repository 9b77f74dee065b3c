/// 視野輸出格式
///
/// 一次畫面包含黑暗層參數、每個觀察者的可見多邊形，以及迷霧揭露區域。
/// 渲染端以多邊形從不透明黑暗層挖洞，以揭露圓從迷霧層挖洞。
use serde::{Deserialize, Serialize};

use super::geometry_utils::{point_in_polygon, Point};
use crate::comp::{RevealedArea, Role};

/// 單一觀察者的可見區域
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ObserverPolygon {
    pub token_id: String,
    /// 依方位角排序的頂點
    pub points: Vec<Point>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VisionFrame {
    pub role: Role,
    /// 黑暗層不透明度
    pub darkness: f64,
    /// 是否顯示黑暗層
    pub lighting_visible: bool,
    /// 只有開啟動態光照時才有內容
    pub polygons: Vec<ObserverPolygon>,
    pub fog_visible: bool,
    pub revealed: Vec<RevealedArea>,
    /// 計算時間戳（秒）
    pub timestamp: f64,
}

impl VisionFrame {
    /// 點是否落在任一觀察者的可見區域內
    pub fn is_point_lit(&self, point: Point) -> bool {
        self.polygons.iter().any(|p| point_in_polygon(point, &p.points))
    }

    /// 點是否已從迷霧中揭露（迷霧關閉時一律視為揭露）
    pub fn is_point_revealed(&self, point: Point) -> bool {
        !self.fog_visible || self.revealed.iter().any(|area| area.contains(point))
    }

    pub fn polygon_for(&self, token_id: &str) -> Option<&ObserverPolygon> {
        self.polygons.iter().find(|p| p.token_id == token_id)
    }

    pub fn vertex_count(&self) -> usize {
        self.polygons.iter().map(|p| p.points.len()).sum()
    }
}
