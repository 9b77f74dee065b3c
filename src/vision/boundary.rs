/// 邊界合成
///
/// 世界邊界與光照邊界都轉成遮擋線段，讓每條射線一定會停下來
use serde::{Deserialize, Serialize};
use std::f64::consts::TAU;
use vek::Vec2;

use super::geometry_utils::{Point, Segment};

/// 世界邊界矩形
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Bounds {
    pub min_x: f64,
    pub min_y: f64,
    pub max_x: f64,
    pub max_y: f64,
}

impl Default for Bounds {
    fn default() -> Self {
        Self::new(-10000.0, -10000.0, 10000.0, 10000.0)
    }
}

impl Bounds {
    pub fn new(min_x: f64, min_y: f64, max_x: f64, max_y: f64) -> Self {
        Self { min_x, min_y, max_x, max_y }
    }

    pub fn contains_point(&self, point: Point) -> bool {
        point.x >= self.min_x && point.x <= self.max_x &&
        point.y >= self.min_y && point.y <= self.max_y
    }

    pub fn width(&self) -> f64 {
        self.max_x - self.min_x
    }

    pub fn height(&self) -> f64 {
        self.max_y - self.min_y
    }

    /// 四條邊界牆：上、右、下、左
    pub fn walls(&self) -> [Segment; 4] {
        let top_left = Vec2::new(self.min_x, self.min_y);
        let top_right = Vec2::new(self.max_x, self.min_y);
        let bottom_right = Vec2::new(self.max_x, self.max_y);
        let bottom_left = Vec2::new(self.min_x, self.max_y);
        [
            Segment::new(top_left, top_right),
            Segment::new(top_right, bottom_right),
            Segment::new(bottom_right, bottom_left),
            Segment::new(bottom_left, top_left),
        ]
    }
}

/// 光照邊界多邊形頂點
///
/// `sides` 個頂點平均分佈在半徑 `radius` 的圓上，第 i 個頂點角度為 `i * 2π / sides`。
pub fn light_boundary_points(center: Point, radius: f64, sides: usize) -> Vec<Point> {
    (0..sides)
        .map(|i| {
            let angle = i as f64 * TAU / sides as f64;
            center + Vec2::new(angle.cos(), angle.sin()) * radius
        })
        .collect()
}

/// 光照邊界線段，首尾相連
pub fn light_boundary(center: Point, radius: f64, sides: usize) -> Vec<Segment> {
    let points = light_boundary_points(center, radius, sides);
    let n = points.len();
    (0..n)
        .map(|i| Segment::new(points[i], points[(i + 1) % n]))
        .collect()
}
