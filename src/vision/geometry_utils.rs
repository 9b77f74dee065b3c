/// 幾何基礎工具
///
/// 點、線段、射線與線段相交，以及範圍判定（圓形、矩形、錐形）
use serde::{Deserialize, Serialize};
use std::f64::consts::{PI, TAU};
use vek::Vec2;

/// 世界座標（像素）
pub type Point = Vec2<f64>;

/// 線段
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Segment {
    pub p1: Point,
    pub p2: Point,
}

impl Segment {
    pub fn new(p1: Point, p2: Point) -> Self {
        Self { p1, p2 }
    }

    pub fn length(&self) -> f64 {
        self.p1.distance(self.p2)
    }

    pub fn endpoints(&self) -> [Point; 2] {
        [self.p1, self.p2]
    }
}

/// 射線命中結果
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct RayHit {
    /// 交點
    pub point: Point,
    /// 射線參數（r1 + (r2 - r1) * t）
    pub t: f64,
}

/// 二維外積
#[inline]
pub fn cross(a: Point, b: Point) -> f64 {
    a.x * b.y - a.y * b.x
}

/// 射線與線段相交
///
/// 射線從 `r1` 出發，方向為 `r2 - r1`；線段為 `s1`-`s2`。
/// 平行（含共線、零長度線段）直接回傳 None，不會除以零。
/// 只接受 `t > 0`（在起點前方）且 `0 <= u <= 1`（落在線段上）的交點。
pub fn intersect(r1: Point, r2: Point, s1: Point, s2: Point) -> Option<RayHit> {
    let r_d = r2 - r1;
    let s_d = s2 - s1;

    let denominator = cross(r_d, s_d);
    if denominator == 0.0 {
        return None;
    }

    let to_segment = s1 - r1;
    let t = cross(to_segment, s_d) / denominator;
    let u = cross(to_segment, r_d) / denominator;

    if t > 0.0 && (0.0..=1.0).contains(&u) {
        Some(RayHit {
            point: r1 + r_d * t,
            t,
        })
    } else {
        None
    }
}

/// 射線與線段相交（線段版本）
#[inline]
pub fn intersect_segment(r1: Point, r2: Point, segment: &Segment) -> Option<RayHit> {
    intersect(r1, r2, segment.p1, segment.p2)
}

/// 將角度差正規化到 [-π, π)
pub fn normalize_angle_diff(diff: f64) -> f64 {
    (diff + PI).rem_euclid(TAU) - PI
}

/// 從 `from` 看 `to` 的方位角
#[inline]
pub fn angle_to(from: Point, to: Point) -> f64 {
    (to.y - from.y).atan2(to.x - from.x)
}

/// 軸對齊矩形
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Rect {
    pub x: f64,
    pub y: f64,
    pub width: f64,
    pub height: f64,
}

impl Rect {
    pub fn new(x: f64, y: f64, width: f64, height: f64) -> Self {
        Self { x, y, width, height }
    }

    /// 以 `center` 為中心、半邊長 `half_extent` 的正方形
    pub fn centered(center: Point, half_extent: f64) -> Self {
        Self {
            x: center.x - half_extent,
            y: center.y - half_extent,
            width: half_extent * 2.0,
            height: half_extent * 2.0,
        }
    }
}

/// 檢查點是否在圓形內（含邊界）
pub fn is_point_in_circle(point: Point, center: Point, radius: f64) -> bool {
    let dx = point.x - center.x;
    let dy = point.y - center.y;
    dx * dx + dy * dy <= radius * radius
}

/// 檢查點是否在矩形內（含邊界）
pub fn is_point_in_rect(point: Point, rect: &Rect) -> bool {
    point.x >= rect.x
        && point.x <= rect.x + rect.width
        && point.y >= rect.y
        && point.y <= rect.y + rect.height
}

/// 檢查點是否在錐形內
///
/// `direction` 為錐形中心方向，`spread` 為整個張角（弧度）。
pub fn is_point_in_cone(point: Point, start: Point, length: f64, direction: f64, spread: f64) -> bool {
    let dx = point.x - start.x;
    let dy = point.y - start.y;
    if dx * dx + dy * dy > length * length {
        return false;
    }

    let diff = normalize_angle_diff(dy.atan2(dx) - direction);
    diff.abs() <= spread / 2.0
}

/// 射線投射法判斷點是否在多邊形內
pub fn point_in_polygon(point: Point, vertices: &[Point]) -> bool {
    if vertices.len() < 3 {
        return false;
    }

    let mut inside = false;
    let mut j = vertices.len() - 1;
    for i in 0..vertices.len() {
        let (vi, vj) = (vertices[i], vertices[j]);
        if (vi.y > point.y) != (vj.y > point.y)
            && point.x < (vj.x - vi.x) * (point.y - vi.y) / (vj.y - vi.y) + vi.x
        {
            inside = !inside;
        }
        j = i;
    }
    inside
}
