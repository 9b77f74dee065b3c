/// 數學正確性驗證測試
///
/// 驗證放射掃描的幾何性質：半徑上限、無牆時的正多邊形、遮擋單調性
#[cfg(test)]
mod tests {
    use super::super::*;
    use crate::comp::Wall;
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};
    use std::f64::consts::TAU;
    use vek::Vec2;

    const EPSILON: f64 = 1e-6;

    fn origin_observer(radius: f64) -> Observer {
        Observer::new(Vec2::new(0.0, 0.0), radius)
    }

    /// 沿方向從觀察者出發，多邊形邊界的最遠距離
    fn reach(polygon: &VisibilityPolygon, angle: f64) -> f64 {
        let origin = polygon.origin;
        let dir = origin + Vec2::new(angle.cos(), angle.sin());
        let n = polygon.points.len();
        (0..n)
            .filter_map(|i| intersect(origin, dir, polygon.points[i], polygon.points[(i + 1) % n]))
            .map(|hit| hit.t)
            .fold(0.0, f64::max)
    }

    fn random_wall(rng: &mut StdRng, id: usize) -> Wall {
        let p1 = Vec2::new(rng.random_range(-150.0..150.0), rng.random_range(-150.0..150.0));
        let p2 = Vec2::new(rng.random_range(-150.0..150.0), rng.random_range(-150.0..150.0));
        Wall::new(format!("w{}", id), p1, p2)
    }

    /// 無牆時是內接於半徑的正 16 邊形
    #[test]
    fn test_no_walls_gives_regular_polygon() {
        let polygon = solve(&origin_observer(100.0), &[], &Bounds::default(), &SolverParams::default());

        assert!(polygon.len() >= 16, "頂點數太少: {}", polygon.len());
        for i in 0..16 {
            let angle = i as f64 * TAU / 16.0;
            let corner = Vec2::new(angle.cos(), angle.sin()) * 100.0;
            assert!(
                polygon.points.iter().any(|p| p.distance(corner) < EPSILON),
                "缺少第 {} 個角點 {:?}", i, corner
            );
        }
        let inner = 100.0 * (TAU / 32.0).cos();
        for p in &polygon.points {
            let d = p.magnitude();
            assert!(d <= 100.0 + EPSILON && d >= inner - EPSILON, "頂點距離不正確: {}", d);
        }
    }

    /// 任意牆壁配置下，所有頂點都在半徑內
    #[test]
    fn test_vertices_stay_within_radius() {
        let mut rng = StdRng::seed_from_u64(17);
        for round in 0..50 {
            let walls: Vec<Wall> = (0..rng.random_range(0..12)).map(|i| random_wall(&mut rng, i)).collect();
            let radius = rng.random_range(1.0..400.0);
            let observer = Observer::new(Vec2::new(rng.random_range(-50.0..50.0), rng.random_range(-50.0..50.0)), radius);
            let polygon = solve(&observer, &walls, &Bounds::default(), &SolverParams::default());

            assert!(!polygon.is_empty(), "第 {} 輪不應為空", round);
            assert!(
                polygon.max_distance() <= radius + EPSILON,
                "第 {} 輪頂點超出半徑: {} > {}", round, polygon.max_distance(), radius
            );
        }
    }

    /// 牆壁只會讓可見距離變短
    #[test]
    fn test_monotonic_occlusion() {
        let mut rng = StdRng::seed_from_u64(42);
        let params = SolverParams::default();
        let observer = origin_observer(120.0);
        let open = solve(&observer, &[], &Bounds::default(), &params);

        for round in 0..40 {
            let wall = random_wall(&mut rng, round);
            let blocked = solve(&observer, &[wall], &Bounds::default(), &params);
            for _ in 0..64 {
                let angle = rng.random_range(-std::f64::consts::PI..std::f64::consts::PI);
                let with_wall = reach(&blocked, angle);
                let without = reach(&open, angle);
                assert!(
                    with_wall <= without + EPSILON,
                    "第 {} 輪角度 {:.4} 可見距離變長: {} > {}", round, angle, with_wall, without
                );
            }
        }
    }

    /// x = 50 的牆擋住右側
    #[test]
    fn test_vertical_wall_clips_polygon() {
        let wall = Wall::new("w", Vec2::new(50.0, -200.0), Vec2::new(50.0, 200.0));
        let polygon = solve(&origin_observer(100.0), &[wall], &Bounds::default(), &SolverParams::default());

        assert!(polygon.len() >= 16);
        for p in &polygon.points {
            assert!(p.x <= 50.1, "頂點穿過牆壁: {:?}", p);
        }
        assert!(polygon.contains(Vec2::new(25.0, 0.0)));
        assert!(!polygon.contains(Vec2::new(75.0, 0.0)));
        assert!(polygon.contains(Vec2::new(-90.0, 0.0)));
    }

    /// 開門等於沒有這面牆
    #[test]
    fn test_door_toggle() {
        let params = SolverParams::default();
        let observer = origin_observer(100.0);
        let mut door = Wall::door("d", Vec2::new(50.0, -200.0), Vec2::new(50.0, 200.0));

        let closed = solve(&observer, std::slice::from_ref(&door), &Bounds::default(), &params);
        assert!(closed.points.iter().all(|p| p.x <= 50.1));

        door.is_open = true;
        let opened = solve(&observer, std::slice::from_ref(&door), &Bounds::default(), &params);
        let no_walls = solve(&observer, &[], &Bounds::default(), &params);
        assert_eq!(opened, no_walls);
        assert!(opened.points.iter().any(|p| p.x > 99.0));
    }

    /// 世界邊界比光照範圍小時以邊界為準
    #[test]
    fn test_world_bounds_clip() {
        let bounds = Bounds::new(-30.0, -30.0, 30.0, 30.0);
        let polygon = solve(&origin_observer(100.0), &[], &bounds, &SolverParams::default());
        assert!(!polygon.is_empty());
        for p in &polygon.points {
            assert!(bounds.contains_point(*p) || (p.x.abs() - 30.0).abs() < EPSILON || (p.y.abs() - 30.0).abs() < EPSILON);
        }
        assert!(polygon.points.iter().any(|p| p.distance(Vec2::new(30.0, 30.0)) < EPSILON));
    }

    /// 半徑非正數或無效時完全黑暗
    #[test]
    fn test_no_light_is_empty() {
        let params = SolverParams::default();
        for radius in [0.0, -10.0, f64::NAN, f64::INFINITY] {
            let polygon = solve(&origin_observer(radius), &[], &Bounds::default(), &params);
            assert!(polygon.is_empty(), "半徑 {} 應為空", radius);
        }
    }

    /// 觀察者站在牆上不算錯誤
    #[test]
    fn test_observer_on_wall() {
        let wall = Wall::new("w", Vec2::new(-100.0, 0.0), Vec2::new(100.0, 0.0));
        let polygon = solve(&origin_observer(80.0), &[wall], &Bounds::default(), &SolverParams::default());
        assert!(polygon.len() >= 16);
        assert!(polygon.max_distance() <= 80.0 + EPSILON);
    }

    /// 頂點依方位角排序，相鄰頂點不會繞回
    #[test]
    fn test_vertices_sorted_by_angle() {
        let walls = vec![
            Wall::new("a", Vec2::new(20.0, -40.0), Vec2::new(20.0, 40.0)),
            Wall::new("b", Vec2::new(-60.0, 30.0), Vec2::new(10.0, 60.0)),
        ];
        let polygon = solve(&origin_observer(100.0), &walls, &Bounds::default(), &SolverParams::default());
        let angles: Vec<f64> = polygon.points.iter().map(|p| p.y.atan2(p.x)).collect();
        let wraps = angles.windows(2).filter(|w| w[1] + 1e-4 < w[0]).count();
        assert!(wraps <= 1, "角度排序錯誤，繞回 {} 次", wraps);
    }

    /// 邊數可調
    #[test]
    fn test_light_sides_configurable() {
        let params = SolverParams { light_sides: 32, ..SolverParams::default() };
        let polygon = solve(&origin_observer(100.0), &[], &Bounds::default(), &params);
        assert!(polygon.len() >= 32);
        let inner = 100.0 * (TAU / 64.0).cos();
        assert!(polygon.points.iter().all(|p| p.magnitude() >= inner - EPSILON));
    }
}
