use hashbrown::HashMap;
use std::collections::hash_map::DefaultHasher;
use std::hash::Hasher;

use super::boundary::Bounds;
use super::geometry_utils::Segment;
use super::sweep::{Observer, VisibilityPolygon};

/// 牆壁配置指紋
///
/// 由遮擋線段與世界邊界的位元表示算出，相同配置在任何場景都得到相同的值。
pub fn layout_key(segments: &[Segment], bounds: &Bounds) -> u64 {
    let mut hasher = DefaultHasher::new();
    for v in [bounds.min_x, bounds.min_y, bounds.max_x, bounds.max_y] {
        hasher.write_u64(v.to_bits());
    }
    hasher.write_usize(segments.len());
    for segment in segments {
        for p in segment.endpoints() {
            hasher.write_u64(p.x.to_bits());
            hasher.write_u64(p.y.to_bits());
        }
    }
    hasher.finish()
}

/// 視野計算緩存項
#[derive(Debug, Clone)]
struct CacheEntry {
    observer: Observer,
    polygon: VisibilityPolygon,
    last_used: u64,
}

/// 以棋子 id 為鍵的視野緩存
///
/// 觀察者位置與半徑不變、牆壁配置不變時直接重用多邊形；
/// 配置指紋一變就整個清空。
#[derive(Debug)]
pub struct VisionCache {
    entries: HashMap<String, CacheEntry>,
    layout: Option<u64>,
    max_cache_size: usize,
    clock: u64,
    hits: u64,
    misses: u64,
}

impl VisionCache {
    pub fn new(max_cache_size: usize) -> Self {
        Self {
            entries: HashMap::new(),
            layout: None,
            max_cache_size,
            clock: 0,
            hits: 0,
            misses: 0,
        }
    }

    /// 對齊牆壁配置，不同時清空
    pub fn sync_layout(&mut self, layout: u64) {
        if self.layout != Some(layout) {
            if !self.entries.is_empty() {
                log::debug!("wall layout {:?} -> {:#x}, dropping {} cached polygons", self.layout, layout, self.entries.len());
            }
            self.entries.clear();
            self.layout = Some(layout);
        }
    }

    /// 獲取緩存結果
    pub fn get(&mut self, token_id: &str, observer: &Observer) -> Option<VisibilityPolygon> {
        self.clock += 1;
        let clock = self.clock;
        match self.entries.get_mut(token_id) {
            Some(entry) if entry.observer == *observer => {
                entry.last_used = clock;
                self.hits += 1;
                Some(entry.polygon.clone())
            }
            _ => {
                self.misses += 1;
                None
            }
        }
    }

    /// 緩存視野結果，計算期間配置已變更時丟棄
    pub fn insert(&mut self, layout: u64, token_id: String, observer: Observer, polygon: VisibilityPolygon) -> bool {
        if self.max_cache_size == 0 || self.layout != Some(layout) {
            return false;
        }
        self.clock += 1;
        self.entries.insert(token_id, CacheEntry { observer, polygon, last_used: self.clock });
        self.limit_cache_size();
        true
    }

    /// 限制緩存大小，移除最久未使用的項目
    fn limit_cache_size(&mut self) {
        while self.entries.len() > self.max_cache_size {
            let oldest_key = self
                .entries
                .iter()
                .min_by_key(|(_, entry)| entry.last_used)
                .map(|(k, _)| k.clone());

            match oldest_key {
                Some(key) => {
                    self.entries.remove(&key);
                }
                None => break,
            }
        }
    }

    pub fn get_cache_stats(&self) -> CacheStats {
        CacheStats {
            cache_size: self.entries.len(),
            max_cache_size: self.max_cache_size,
            hits: self.hits,
            misses: self.misses,
        }
    }
}

/// 緩存統計信息
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CacheStats {
    pub cache_size: usize,
    pub max_cache_size: usize,
    pub hits: u64,
    pub misses: u64,
}

#[cfg(test)]
mod tests {
    use super::*;
    use vek::Vec2;

    fn polygon(observer: &Observer) -> VisibilityPolygon {
        VisibilityPolygon {
            origin: observer.position,
            radius: observer.radius,
            points: vec![Vec2::new(1.0, 0.0), Vec2::new(0.0, 1.0), Vec2::new(-1.0, 0.0)],
        }
    }

    fn wall_at(x: f64) -> Vec<Segment> {
        vec![Segment::new(Vec2::new(x, -100.0), Vec2::new(x, 100.0))]
    }

    #[test]
    fn hit_requires_same_observer() {
        let mut cache = VisionCache::new(8);
        cache.sync_layout(1);
        let observer = Observer::new(Vec2::new(0.0, 0.0), 100.0);
        cache.insert(1, "a".into(), observer, polygon(&observer));

        assert!(cache.get("a", &observer).is_some());
        let moved = Observer::new(Vec2::new(5.0, 0.0), 100.0);
        assert!(cache.get("a", &moved).is_none());
        assert!(cache.get("b", &observer).is_none());

        let stats = cache.get_cache_stats();
        assert_eq!((stats.hits, stats.misses), (1, 2));
    }

    #[test]
    fn layout_change_clears() {
        let mut cache = VisionCache::new(8);
        cache.sync_layout(1);
        let observer = Observer::new(Vec2::new(0.0, 0.0), 100.0);
        cache.insert(1, "a".into(), observer, polygon(&observer));
        cache.sync_layout(1);
        assert!(cache.get("a", &observer).is_some());
        cache.sync_layout(2);
        assert!(cache.get("a", &observer).is_none());
    }

    /// 較慢的計算晚於配置變更才寫回，結果不能留在緩存
    #[test]
    fn insert_for_stale_layout_is_dropped() {
        let mut cache = VisionCache::new(8);
        let observer = Observer::new(Vec2::new(0.0, 0.0), 100.0);
        cache.sync_layout(1);
        cache.sync_layout(2);
        assert!(!cache.insert(1, "a".into(), observer, polygon(&observer)));
        assert!(cache.get("a", &observer).is_none());
        assert!(cache.insert(2, "a".into(), observer, polygon(&observer)));
        assert!(cache.get("a", &observer).is_some());
    }

    /// 指紋只看線段與邊界，與場景的變更次數無關
    #[test]
    fn layout_key_identifies_geometry() {
        let bounds = Bounds::default();
        assert_eq!(layout_key(&wall_at(100.0), &bounds), layout_key(&wall_at(100.0), &bounds));
        assert_ne!(layout_key(&wall_at(100.0), &bounds), layout_key(&wall_at(250.0), &bounds));
        assert_ne!(layout_key(&[], &bounds), layout_key(&wall_at(100.0), &bounds));

        let smaller = Bounds::new(-500.0, -500.0, 500.0, 500.0);
        assert_ne!(layout_key(&wall_at(100.0), &bounds), layout_key(&wall_at(100.0), &smaller));
    }

    #[test]
    fn evicts_least_recently_used() {
        let mut cache = VisionCache::new(2);
        cache.sync_layout(0);
        let observer = Observer::new(Vec2::new(0.0, 0.0), 100.0);
        cache.insert(0, "a".into(), observer, polygon(&observer));
        cache.insert(0, "b".into(), observer, polygon(&observer));
        assert!(cache.get("a", &observer).is_some());
        cache.insert(0, "c".into(), observer, polygon(&observer));

        assert_eq!(cache.get_cache_stats().cache_size, 2);
        assert!(cache.get("b", &observer).is_none());
        assert!(cache.get("a", &observer).is_some());
        assert!(cache.get("c", &observer).is_some());
    }

    #[test]
    fn zero_capacity_disables_cache() {
        let mut cache = VisionCache::new(0);
        cache.sync_layout(0);
        let observer = Observer::new(Vec2::new(0.0, 0.0), 100.0);
        assert!(!cache.insert(0, "a".into(), observer, polygon(&observer)));
        assert!(cache.get("a", &observer).is_none());
    }
}
