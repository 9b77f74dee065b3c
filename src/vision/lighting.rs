/// 動態光照計算器
///
/// 每個觀察者的掃描互不相依，在執行緒池上平行計算；
/// 沒變動的觀察者直接從緩存取結果。
use log::debug;
use parking_lot::Mutex;
use rayon::prelude::*;
use rayon::ThreadPool;
use std::sync::Arc;
use std::time::{Instant, SystemTime, UNIX_EPOCH};

use super::boundary::Bounds;
use super::sweep::{solve_segments, Observer, SolverParams, VisibilityPolygon};
use super::vision_cache::{layout_key, CacheStats, VisionCache};
use super::vision_output::{ObserverPolygon, VisionFrame};
use super::geometry_utils::Segment;
use crate::comp::Role;
use crate::config::VisionSetting;
use crate::error::Result;
use crate::state::{create_thread_pool, DarknessPolicy, SceneSnapshot};

pub struct LightingCalculator {
    thread_pool: Arc<ThreadPool>,
    params: SolverParams,
    darkness: DarknessPolicy,
    setting: VisionSetting,
    cache: Mutex<VisionCache>,
}

impl LightingCalculator {
    pub fn new(setting: &VisionSetting) -> Result<Self> {
        let thread_pool = create_thread_pool(setting.thread_count())?;
        Ok(Self::with_thread_pool(setting, thread_pool))
    }

    /// 與其他元件共用執行緒池
    pub fn with_thread_pool(setting: &VisionSetting, thread_pool: Arc<ThreadPool>) -> Self {
        Self {
            thread_pool,
            params: SolverParams::from(setting),
            darkness: DarknessPolicy::from(setting),
            setting: setting.clone(),
            cache: Mutex::new(VisionCache::new(setting.cache_capacity)),
        }
    }

    pub fn params(&self) -> &SolverParams {
        &self.params
    }

    /// 此身分要計算的觀察者
    pub fn observers_for(&self, snapshot: &SceneSnapshot, role: &Role) -> Vec<(String, Observer)> {
        snapshot
            .tokens
            .iter()
            .filter(|token| role.observes(token))
            .map(|token| (token.id.clone(), token.observer(snapshot.map.scale, &self.setting)))
            .collect()
    }

    /// 計算一組觀察者的視野多邊形，結果順序與輸入相同
    ///
    /// 緩存以線段與邊界的指紋區分配置，不同場景共用計算器也不會拿到別人的結果。
    pub fn compute_polygons(
        &self,
        observers: &[(String, Observer)],
        segments: &[Segment],
        bounds: &Bounds,
    ) -> Vec<VisibilityPolygon> {
        let layout = layout_key(segments, bounds);
        let mut cached: Vec<Option<VisibilityPolygon>> = {
            let mut cache = self.cache.lock();
            cache.sync_layout(layout);
            observers
                .iter()
                .map(|(id, observer)| cache.get(id, observer))
                .collect()
        };

        let missing: Vec<usize> = (0..observers.len()).filter(|&i| cached[i].is_none()).collect();
        let params = self.params;
        let computed: Vec<(usize, VisibilityPolygon)> = self.thread_pool.install(|| {
            missing
                .par_iter()
                .map(|&i| (i, solve_segments(&observers[i].1, segments, bounds, &params)))
                .collect()
        });

        {
            let mut cache = self.cache.lock();
            for (i, polygon) in &computed {
                let (id, observer) = &observers[*i];
                cache.insert(layout, id.clone(), *observer, polygon.clone());
            }
        }
        for (i, polygon) in computed {
            cached[i] = Some(polygon);
        }

        cached
            .into_iter()
            .zip(observers)
            .map(|(polygon, (_, observer))| polygon.unwrap_or_else(|| VisibilityPolygon::empty(observer)))
            .collect()
    }

    /// 計算某個身分的一次畫面
    pub fn compute_frame(&self, snapshot: &SceneSnapshot, role: &Role) -> VisionFrame {
        let start = Instant::now();
        let map = &snapshot.map;
        let darkness_level = self.darkness.darkness_at(map.day_time);
        let dynamic = map.dynamic_lighting_enabled;

        let polygons = if dynamic {
            let observers = self.observers_for(snapshot, role);
            let segments: Vec<Segment> = snapshot
                .walls
                .iter()
                .filter(|w| w.blocks_sight())
                .map(|w| w.segment())
                .collect();
            let results = self.compute_polygons(&observers, &segments, &map.bounds);
            observers
                .into_iter()
                .zip(results)
                .map(|((token_id, _), polygon)| ObserverPolygon { token_id, points: polygon.points })
                .collect()
        } else {
            Vec::new()
        };

        let frame = VisionFrame {
            role: role.clone(),
            darkness: self.darkness.layer_alpha(darkness_level, dynamic),
            lighting_visible: self.darkness.layer_visible(darkness_level, dynamic),
            polygons,
            fog_visible: snapshot.fog_enabled,
            revealed: if snapshot.fog_enabled { snapshot.revealed.clone() } else { Vec::new() },
            timestamp: SystemTime::now()
                .duration_since(UNIX_EPOCH)
                .unwrap_or_default()
                .as_secs_f64(),
        };

        debug!(
            "frame for {:?} at wall revision {}: {} observers, {} vertices, darkness {:.2}, {:?}",
            role,
            snapshot.wall_revision,
            frame.polygons.len(),
            frame.vertex_count(),
            frame.darkness,
            start.elapsed()
        );
        frame
    }

    pub fn cache_stats(&self) -> CacheStats {
        self.cache.lock().get_cache_stats()
    }
}
