/// 放射掃描視野計算
///
/// 對每個遮擋線段的端點取三個角度（角度本身與左右各偏 ε），
/// 沿這些角度發射射線並取最近的交點，最後依角度排序成多邊形。
/// 無內部狀態，可以在多個執行緒同時呼叫。
use hashbrown::HashSet;
use log::trace;
use ordered_float::OrderedFloat;
use serde::{Deserialize, Serialize};
use vek::Vec2;

use super::boundary::{light_boundary, Bounds};
use super::geometry_utils::{angle_to, intersect_segment, point_in_polygon, Point, RayHit, Segment};
use crate::comp::Wall;
use crate::config::VisionSetting;

/// 掃描參數
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolverParams {
    /// 光照邊界多邊形邊數
    pub light_sides: usize,
    /// 角點兩側的取樣偏移（弧度）
    pub angle_epsilon: f64,
    /// 射線長度超出半徑的餘量
    pub ray_padding: f64,
}

impl Default for SolverParams {
    fn default() -> Self {
        Self {
            light_sides: 16,
            angle_epsilon: 1e-5,
            ray_padding: 100.0,
        }
    }
}

impl From<&VisionSetting> for SolverParams {
    fn from(setting: &VisionSetting) -> Self {
        Self {
            light_sides: setting.light_sides.max(3),
            angle_epsilon: setting.angle_epsilon,
            ray_padding: setting.ray_padding,
        }
    }
}

/// 觀察者（每次計算時由棋子推導）
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Observer {
    pub position: Point,
    /// 視野半徑（像素）
    pub radius: f64,
}

impl Observer {
    pub fn new(position: Point, radius: f64) -> Self {
        Self { position, radius }
    }
}

/// 視野多邊形，頂點依觀察者方位角遞增排列
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VisibilityPolygon {
    pub origin: Point,
    pub radius: f64,
    pub points: Vec<Point>,
}

impl VisibilityPolygon {
    /// 完全黑暗
    pub fn empty(observer: &Observer) -> Self {
        Self {
            origin: observer.position,
            radius: observer.radius,
            points: Vec::new(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn contains(&self, point: Point) -> bool {
        point_in_polygon(point, &self.points)
    }

    /// 頂點距觀察者的最遠距離
    pub fn max_distance(&self) -> f64 {
        self.points
            .iter()
            .map(|p| p.distance(self.origin))
            .fold(0.0, f64::max)
    }
}

/// 計算單一觀察者的視野多邊形
///
/// 只有會遮擋的牆參與計算，開啟的門完全排除（不產生取樣角度）。
pub fn solve(observer: &Observer, walls: &[Wall], bounds: &Bounds, params: &SolverParams) -> VisibilityPolygon {
    let segments: Vec<Segment> = walls
        .iter()
        .filter(|w| w.blocks_sight())
        .map(Wall::segment)
        .collect();
    solve_segments(observer, &segments, bounds, params)
}

/// 以線段作為遮擋物計算視野多邊形
pub fn solve_segments(
    observer: &Observer,
    segments: &[Segment],
    bounds: &Bounds,
    params: &SolverParams,
) -> VisibilityPolygon {
    // 半徑非正數（或 NaN）視為沒有光
    if !(observer.radius > 0.0) || !observer.radius.is_finite() {
        trace!("observer at ({:.1}, {:.1}) has no light radius", observer.position.x, observer.position.y);
        return VisibilityPolygon::empty(observer);
    }

    let origin = observer.position;
    let sides = params.light_sides.max(3);

    let mut occluders: Vec<Segment> = Vec::with_capacity(segments.len() + 4 + sides);
    occluders.extend_from_slice(segments);
    occluders.extend_from_slice(&bounds.walls());
    occluders.extend(light_boundary(origin, observer.radius, sides));

    let angles = sample_angles(origin, &occluders, params.angle_epsilon);
    let reach = observer.radius + params.ray_padding;

    let mut hits: Vec<(OrderedFloat<f64>, Point)> = angles
        .into_iter()
        .filter_map(|angle| {
            let far = origin + Vec2::new(angle.cos(), angle.sin()) * reach;
            nearest_hit(origin, far, &occluders).map(|hit| (OrderedFloat(angle), hit.point))
        })
        .collect();
    hits.sort_by_key(|(angle, _)| *angle);

    trace!(
        "sweep at ({:.1}, {:.1}) r={:.1}: {} occluders, {} vertices",
        origin.x, origin.y, observer.radius, occluders.len(), hits.len()
    );

    VisibilityPolygon {
        origin,
        radius: observer.radius,
        points: hits.into_iter().map(|(_, point)| point).collect(),
    }
}

/// 每個不重複端點取 `a - ε, a, a + ε` 三個角度
fn sample_angles(origin: Point, occluders: &[Segment], epsilon: f64) -> Vec<f64> {
    let mut seen: HashSet<(u64, u64)> = HashSet::with_capacity(occluders.len() * 2);
    let mut angles = Vec::with_capacity(occluders.len() * 6);

    for endpoint in occluders.iter().flat_map(Segment::endpoints) {
        if !seen.insert((endpoint.x.to_bits(), endpoint.y.to_bits())) {
            continue;
        }
        let angle = angle_to(origin, endpoint);
        angles.push(angle - epsilon);
        angles.push(angle);
        angles.push(angle + epsilon);
    }

    angles
}

/// 射線上最近的遮擋交點
fn nearest_hit(origin: Point, far: Point, occluders: &[Segment]) -> Option<RayHit> {
    let mut closest: Option<RayHit> = None;
    for segment in occluders {
        if let Some(hit) = intersect_segment(origin, far, segment) {
            if closest.map_or(true, |c| hit.t < c.t) {
                closest = Some(hit);
            }
        }
    }
    closest
}
