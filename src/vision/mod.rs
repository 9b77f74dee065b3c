/// 視野系統模組
///
/// 幾何基礎、邊界合成、放射掃描求解、緩存、光照計算與輸出格式
pub mod geometry_utils;
pub mod boundary;
pub mod sweep;
pub mod vision_cache;
pub mod vision_output;
pub mod lighting;

mod mathematical_tests;

pub use self::{
    geometry_utils::*,
    boundary::{light_boundary, light_boundary_points, Bounds},
    sweep::{solve, solve_segments, Observer, SolverParams, VisibilityPolygon},
    vision_cache::{layout_key, CacheStats, VisionCache},
    vision_output::*,
    lighting::LightingCalculator,
};
