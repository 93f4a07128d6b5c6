//! Unit tests for cb-core primitives.

#[cfg(test)]
mod ids {
    use crate::{BuildingId, OrderId, RobotId};

    #[test]
    fn index_roundtrip() {
        let id = RobotId(42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn ordering() {
        assert!(OrderId(0) < OrderId(1));
        assert!(BuildingId(100) > BuildingId(99));
    }

    #[test]
    fn display() {
        assert_eq!(RobotId(7).to_string(), "7");
    }
}

#[cfg(test)]
mod position {
    use crate::{Direction, Position};

    #[test]
    fn manhattan_is_symmetric() {
        let a = Position::new(2, 9);
        let b = Position::new(7, 1);
        assert_eq!(a.manhattan(b), 13);
        assert_eq!(b.manhattan(a), 13);
        assert_eq!(a.manhattan(a), 0);
    }

    #[test]
    fn neighbors_follow_up_down_left_right() {
        let got: Vec<_> = Position::new(1, 1).neighbors(3, 3).collect();
        assert_eq!(
            got,
            [Position::new(0, 1), Position::new(2, 1), Position::new(1, 0), Position::new(1, 2)]
        );
    }

    #[test]
    fn neighbors_clip_at_edges() {
        let got: Vec<_> = Position::new(0, 0).neighbors(3, 3).collect();
        assert_eq!(got, [Position::new(1, 0), Position::new(0, 1)]);

        let corner: Vec<_> = Position::new(2, 2).neighbors(3, 3).collect();
        assert_eq!(corner, [Position::new(1, 2), Position::new(2, 1)]);
    }

    #[test]
    fn step_rejects_out_of_bounds() {
        assert_eq!(Position::new(0, 4).step(Direction::Up, 5, 5), None);
        assert_eq!(Position::new(4, 4).step(Direction::Right, 5, 5), None);
        assert_eq!(Position::new(4, 4).step(Direction::Left, 5, 5), Some(Position::new(4, 3)));
    }

    #[test]
    fn within_box_is_inclusive_and_orientation_free() {
        let a = Position::new(5, 1);
        let b = Position::new(1, 5);
        assert!(Position::new(3, 3).within_box(a, b));
        assert!(Position::new(1, 1).within_box(a, b));
        assert!(!Position::new(0, 3).within_box(a, b));
    }
}

#[cfg(test)]
mod time {
    use std::time::Duration;

    use crate::{SimClock, Tick};

    #[test]
    fn tick_displays_bare_number() {
        assert_eq!(Tick(15).to_string(), "15");
        assert!(Tick::ZERO < Tick(1));
    }

    #[test]
    fn advance_scales_real_time() {
        let mut clock = SimClock::new(60.0);
        let dt = clock.advance(Duration::from_millis(500));
        assert!((dt - 30.0).abs() < 1e-9);
        clock.advance(Duration::from_millis(500));
        assert!((clock.now() - 60.0).abs() < 1e-9);
        assert_eq!(clock.current_tick, Tick(2));
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn deterministic_same_seed() {
        let mut r1 = SimRng::new(12345);
        let mut r2 = SimRng::new(12345);
        for _ in 0..100 {
            let a: u32 = r1.gen_range(0..1_000_000);
            let b: u32 = r2.gen_range(0..1_000_000);
            assert_eq!(a, b);
        }
    }

    #[test]
    fn children_diverge() {
        let mut root = SimRng::new(1);
        let mut c0 = root.child(0);
        let mut c1 = root.child(1);
        let a: u64 = c0.gen_range(0..u64::MAX);
        let b: u64 = c1.gen_range(0..u64::MAX);
        assert_ne!(a, b, "sibling child streams should diverge");
    }

    #[test]
    fn gen_bool_extremes() {
        let mut rng = SimRng::new(0);
        assert!(!rng.gen_bool(0.0));
        assert!(rng.gen_bool(1.0));
    }

    #[test]
    fn choose_multiple_is_distinct() {
        let mut rng = SimRng::new(3);
        let items: Vec<u32> = (0..20).collect();
        let mut picked = rng.choose_multiple(&items, 5);
        picked.sort_unstable();
        picked.dedup();
        assert_eq!(picked.len(), 5);
        assert!(rng.choose::<u32>(&[]).is_none());
    }
}

#[cfg(test)]
mod config {
    use crate::{AssignmentStrategy, PathStrategy, SimConfig};

    #[test]
    fn default_is_valid() {
        SimConfig::default().validate().unwrap();
    }

    #[test]
    fn rejects_tiny_grid() {
        let cfg = SimConfig { rows: 5, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_inverted_building_bounds() {
        let cfg = SimConfig { min_building_cells: 90, max_building_cells: 30, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_density_out_of_range() {
        let cfg = SimConfig { obstacle_density: 1.5, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn rejects_zero_capacity() {
        let cfg = SimConfig { robot_capacity: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
        let cfg = SimConfig { kitchen_capacity: 0, ..SimConfig::default() };
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn path_strategy_parses_aliases() {
        assert_eq!("A*".parse::<PathStrategy>().unwrap(), PathStrategy::AStar);
        assert_eq!("astar".parse::<PathStrategy>().unwrap(), PathStrategy::AStar);
        assert_eq!(" greedy ".parse::<PathStrategy>().unwrap(), PathStrategy::Greedy);
        assert_eq!("dfs".parse::<PathStrategy>().unwrap(), PathStrategy::DepthFirst);
        assert!("dijkstra".parse::<PathStrategy>().is_err());
    }

    #[test]
    fn assignment_strategy_round_trips_display() {
        for s in [AssignmentStrategy::Oldest, AssignmentStrategy::Proximity, AssignmentStrategy::Between] {
            assert_eq!(s.to_string().parse::<AssignmentStrategy>().unwrap(), s);
        }
    }
}
