//! Unit tests for cb-orders.

use cb_core::{BuildingId, OrderId, Position, RobotId, SimConfig, SimRng};
use cb_grid::Grid;

use crate::{MenuSelection, Order, OrderCarrier, OrderScheduler, OrderStatus};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn ready_order(id: u64, dropoff: (usize, usize)) -> Order {
    Order {
        id:           OrderId(id),
        building:     BuildingId(1),
        dropoff:      Position::new(dropoff.0, dropoff.1),
        placed_at:    id as f64,
        items:        MenuSelection { main: "Burger", sides: vec![], drink: None },
        prep_secs:    60.0,
        status:       OrderStatus::Ready,
        status_since: 0.0,
    }
}

/// Every order takes exactly `min_prep_secs` when that floor exceeds the
/// largest possible item-derived time.
fn config(kitchen_capacity: usize) -> SimConfig {
    SimConfig {
        kitchen_capacity,
        order_interval_secs: 30.0,
        min_prep_secs: 1_000.0,
        ..SimConfig::default()
    }
}

fn scheduler(cfg: &SimConfig) -> OrderScheduler {
    let targets = vec![
        (BuildingId(1), Position::new(0, 5)),
        (BuildingId(2), Position::new(5, 0)),
        (BuildingId(3), Position::new(7, 7)),
    ];
    OrderScheduler::new(targets, Position::new(0, 0), cfg, SimRng::new(4)).unwrap()
}

/// Place `n` orders at `now`, one interval each.
fn place(sched: &mut OrderScheduler, n: usize, now: f64) {
    for _ in 0..n {
        assert!(sched.place_new_order(30.0, now).is_some());
    }
}

/// Minimal carrier parked wherever it was put.
struct Cart {
    id:       RobotId,
    at:       Position,
    capacity: usize,
    held:     Vec<Order>,
}

impl Cart {
    fn new(id: u32, at: (usize, usize), capacity: usize) -> Self {
        Self { id: RobotId(id), at: Position::new(at.0, at.1), capacity, held: Vec::new() }
    }
}

impl OrderCarrier for Cart {
    fn carrier_id(&self) -> RobotId {
        self.id
    }

    fn parked_at(&self, pickup: Position) -> bool {
        self.at == pickup
    }

    fn spare_capacity(&self) -> usize {
        self.capacity - self.held.len()
    }

    fn try_load(&mut self, order: Order, _grid: &Grid) -> Result<(), Order> {
        if self.held.len() >= self.capacity {
            return Err(order);
        }
        self.held.push(order);
        Ok(())
    }
}

// ── Menu ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod menu {
    use cb_core::SimRng;

    use crate::menu::{MenuSelection, DRINK_SECS, MAIN_SECS, SIDE_SECS};

    #[test]
    fn selection_shape() {
        let mut rng = SimRng::new(21);
        for _ in 0..100 {
            let sel = MenuSelection::random(&mut rng);
            assert!(sel.sides.len() <= 2);
            let mut sides = sel.sides.clone();
            sides.dedup();
            assert_eq!(sides.len(), sel.sides.len(), "sides must be distinct");
        }
    }

    #[test]
    fn prep_time_is_bounded() {
        let mut rng = SimRng::new(3);
        let sel = MenuSelection { main: "Pizza", sides: vec!["Fries", "Fruit Cup"], drink: Some("Soda") };
        let base = MAIN_SECS + 2.0 * SIDE_SECS + DRINK_SECS;
        assert_eq!(sel.base_prep_secs(), base);
        for _ in 0..100 {
            let t = sel.prep_secs(30.0, &mut rng);
            assert!(t >= base * 0.75 - 1e-9 && t <= base * 1.25 + 1e-9);
        }
    }

    #[test]
    fn prep_time_is_floored() {
        let mut rng = SimRng::new(3);
        let sel = MenuSelection { main: "BLT", sides: vec![], drink: None };
        assert_eq!(sel.prep_secs(900.0, &mut rng), 900.0);
    }
}

// ── Order status ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod status {
    use super::*;
    use crate::OrderError;

    #[test]
    fn promote_walks_forward_then_stops() {
        let mut order = ready_order(0, (1, 1));
        order.status = OrderStatus::Placed;
        assert_eq!(order.promote(1.0).unwrap(), OrderStatus::Preparing);
        assert_eq!(order.promote(2.0).unwrap(), OrderStatus::Ready);
        assert_eq!(order.promote(3.0).unwrap(), OrderStatus::OutForDelivery);
        assert_eq!(order.status_since, 3.0);
        assert!(matches!(order.promote(4.0), Err(OrderError::InvalidTransition { .. })));
        assert_eq!(order.status, OrderStatus::OutForDelivery);
    }

    #[test]
    fn cooked_only_while_preparing() {
        let mut order = ready_order(0, (1, 1));
        assert!(!order.is_cooked(1e9));
        order.status = OrderStatus::Preparing;
        order.status_since = 10.0;
        assert!(!order.is_cooked(69.0));
        assert!(order.is_cooked(70.0));
    }
}

// ── Arrivals ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod arrivals {
    use super::*;
    use crate::OrderError;

    #[test]
    fn interval_gates_arrivals() {
        let mut sched = scheduler(&config(10));
        assert!(sched.place_new_order(10.0, 10.0).is_none());
        assert!(sched.place_new_order(10.0, 20.0).is_none());
        let order = sched.place_new_order(10.0, 30.0).unwrap();
        assert_eq!(order.id, OrderId(0));
        assert_eq!(order.status, OrderStatus::Placed);
        assert_eq!(order.placed_at, 30.0);
        assert_eq!(sched.pending_count(), 1);
    }

    #[test]
    fn surplus_time_carries_over() {
        let mut sched = scheduler(&config(10));
        assert!(sched.place_new_order(45.0, 45.0).is_some());
        assert!(sched.place_new_order(15.0, 60.0).is_some());
        assert!(sched.place_new_order(15.0, 75.0).is_none());
        let ids: Vec<_> = sched.orders().map(|o| o.id).collect();
        assert_eq!(ids, [OrderId(0), OrderId(1)]);
    }

    #[test]
    fn orders_target_known_buildings() {
        let mut sched = scheduler(&config(10));
        place(&mut sched, 30, 0.0);
        for order in sched.orders() {
            assert!([1, 2, 3].contains(&order.building.0));
            assert!(order.prep_secs >= 1_000.0);
        }
    }

    #[test]
    fn empty_target_list_is_rejected() {
        let err = OrderScheduler::new(vec![], Position::new(0, 0), &config(10), SimRng::new(1));
        assert!(matches!(err, Err(OrderError::NoCandidateBuildings)));
    }
}

// ── Kitchen pipeline ──────────────────────────────────────────────────────────

#[cfg(test)]
mod kitchen {
    use std::collections::HashMap;

    use super::*;

    #[test]
    fn capacity_bounds_preparing() {
        let mut sched = scheduler(&config(2));
        place(&mut sched, 5, 0.0);
        sched.step(0.0);
        assert_eq!(sched.count(OrderStatus::Preparing), 2);
        assert_eq!(sched.count(OrderStatus::Placed), 3);

        // Placed orders enter in FIFO order.
        let cooking: Vec<_> = sched.orders().filter(|o| o.status == OrderStatus::Preparing).map(|o| o.id).collect();
        assert_eq!(cooking, [OrderId(0), OrderId(1)]);
    }

    #[test]
    fn ready_after_prep_time() {
        let mut sched = scheduler(&config(2));
        place(&mut sched, 3, 0.0);
        sched.step(0.0);
        sched.step(999.0);
        assert_eq!(sched.count(OrderStatus::Ready), 0);

        sched.step(1_000.0);
        assert_eq!(sched.count(OrderStatus::Ready), 2);
        assert_eq!(sched.count(OrderStatus::Preparing), 1);
        assert_eq!(sched.count(OrderStatus::Placed), 0);
    }

    #[test]
    fn statuses_never_regress() {
        let mut sched = scheduler(&config(3));
        let mut seen: HashMap<OrderId, OrderStatus> = HashMap::new();
        let mut now = 0.0;
        for _ in 0..400 {
            now += 30.0;
            sched.place_new_order(30.0, now);
            sched.step(now);
            assert!(sched.count(OrderStatus::Preparing) <= 3);
            for order in sched.orders() {
                if let Some(prev) = seen.insert(order.id, order.status) {
                    assert!(order.status >= prev, "order {} went {prev:?} -> {:?}", order.id, order.status);
                }
            }
        }
        assert!(sched.count(OrderStatus::Ready) > 0);
    }
}

// ── Hand-off ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod handoff {
    use super::*;

    fn with_ready(n: usize) -> OrderScheduler {
        let mut sched = scheduler(&config(10));
        place(&mut sched, n, 0.0);
        sched.step(0.0);
        sched.step(1_000.0);
        assert_eq!(sched.count(OrderStatus::Ready), n);
        sched
    }

    #[test]
    fn only_parked_robots_with_room_load() {
        let mut sched = with_ready(5);
        let grid = Grid::new(10, 10);
        let mut carts = vec![Cart::new(0, (3, 3), 3), Cart::new(1, (0, 0), 3), Cart::new(2, (0, 0), 3)];

        let handed = sched.load_ready_orders_into_robots(&mut carts, &grid, 1_000.0);
        assert_eq!(handed.len(), 5);
        assert!(carts[0].held.is_empty());
        assert_eq!(carts[1].held.len(), 3);
        assert_eq!(carts[2].held.len(), 2);
        assert!(handed.iter().take(3).all(|(r, _)| *r == RobotId(1)));
        for cart in &carts {
            assert!(cart.held.iter().all(|o| o.status == OrderStatus::OutForDelivery));
        }
        assert_eq!(sched.pending_count(), 0);
    }

    #[test]
    fn leftovers_wait_for_next_tick() {
        let mut sched = with_ready(4);
        let grid = Grid::new(10, 10);
        let mut carts = vec![Cart::new(0, (0, 0), 3)];

        sched.load_ready_orders_into_robots(&mut carts, &grid, 1_000.0);
        assert_eq!(carts[0].held.len(), 3);
        assert_eq!(sched.count(OrderStatus::Ready), 1);

        // Full robot: nothing moves.
        assert!(sched.load_ready_orders_into_robots(&mut carts, &grid, 1_001.0).is_empty());
        assert_eq!(sched.count(OrderStatus::Ready), 1);
    }

    /// Claims room but refuses every load.
    struct FullCart;

    impl OrderCarrier for FullCart {
        fn carrier_id(&self) -> RobotId {
            RobotId(7)
        }
        fn parked_at(&self, _pickup: Position) -> bool {
            true
        }
        fn spare_capacity(&self) -> usize {
            3
        }
        fn try_load(&mut self, order: Order, _grid: &Grid) -> Result<(), Order> {
            Err(order)
        }
    }

    #[test]
    fn refused_orders_stay_ready() {
        let mut sched = with_ready(4);
        let grid = Grid::new(10, 10);
        let mut carts = [FullCart];
        let handed = sched.load_ready_orders_into_robots(&mut carts[..], &grid, 1_500.0);
        assert!(handed.is_empty());
        assert_eq!(sched.count(OrderStatus::Ready), 4);
        let ids: Vec<u64> = sched.orders().map(|o| o.id.0).collect();
        assert_eq!(ids, [0, 1, 2, 3]);
        for order in sched.orders() {
            assert_eq!(order.status, OrderStatus::Ready);
            assert_eq!(order.status_since, 1_000.0);
        }
    }

    #[test]
    fn capacity_never_exceeded() {
        let mut sched = with_ready(8);
        let grid = Grid::new(10, 10);
        let mut carts = vec![Cart::new(0, (0, 0), 2)];
        carts[0].held.push(ready_order(99, (1, 1)));
        sched.load_ready_orders_into_robots(&mut carts, &grid, 1_000.0);
        assert_eq!(carts[0].held.len(), 2);
    }
}

// ── Assignment strategies ─────────────────────────────────────────────────────

#[cfg(test)]
mod strategies {
    use cb_core::AssignmentStrategy;

    use super::*;
    use crate::BatchSelector;

    fn queue() -> Vec<Order> {
        vec![
            ready_order(0, (0, 0)),
            ready_order(1, (9, 9)),
            ready_order(2, (0, 1)),
            ready_order(3, (1, 0)),
            ready_order(4, (5, 5)),
        ]
    }

    #[test]
    fn oldest_is_fifo() {
        assert_eq!(AssignmentStrategy::Oldest.select(&queue(), 3, 10), [0, 1, 2]);
        assert_eq!(AssignmentStrategy::Oldest.select(&queue()[..1], 3, 10), [0]);
    }

    #[test]
    fn proximity_picks_nearest_companions() {
        // Orders 2 and 3 are both one step from the anchor; the older wins the tie.
        assert_eq!(AssignmentStrategy::Proximity.select(&queue(), 3, 10), [0, 2, 3]);
        assert_eq!(AssignmentStrategy::Proximity.select(&queue(), 2, 10), [0, 2]);
    }

    #[test]
    fn proximity_respects_window() {
        assert_eq!(AssignmentStrategy::Proximity.select(&queue(), 3, 3), [0, 2, 1]);
    }

    #[test]
    fn between_uses_bounding_box() {
        let mut orders = queue();
        orders[1].dropoff = Position::new(4, 4);
        orders[2].dropoff = Position::new(9, 9);
        orders[3].dropoff = Position::new(2, 3);
        assert_eq!(AssignmentStrategy::Between.select(&orders, 3, 10), [0, 1, 3]);
        assert_eq!(AssignmentStrategy::Between.select(&orders, 2, 10), [0, 1]);
    }

    #[test]
    fn between_falls_back_to_oldest() {
        assert_eq!(AssignmentStrategy::Between.select(&queue()[..1], 3, 10), [0]);
        assert_eq!(AssignmentStrategy::Between.select(&queue(), 1, 10), [0]);
    }

    #[test]
    fn empty_inputs_select_nothing() {
        assert!(AssignmentStrategy::Proximity.select(&[], 3, 10).is_empty());
        assert!(AssignmentStrategy::Oldest.select(&queue(), 0, 10).is_empty());
    }
}
