//! Procedural campus generation.
//!
//! # Pipeline
//!
//! ```text
//! Campus::generate(cfg, rng)
//!   1. placement attempts     random origin + weighted shape → place_building
//!   2. connect_walkways       L connectors, then BFS bridges until one component
//!   3. warehouse              one building's flags become Restaurant
//!   4. hand-off points        pickup on the warehouse sidewalk, one drop-off per
//!                             other building
//!   5. obstacles              max(1, ⌊walkway_cells × density⌋) when density > 0
//! ```
//!
//! # Placement rules
//!
//! A footprint is accepted when its bounding box lies inside the grid and
//! none of the box's cells carries a `Building` or `Walkway` flag.  Buildings
//! may therefore sit on the grid edge or touch each other diagonally, which
//! can wall a sidewalk in.  Step (2) bridges what it can; a component with no
//! route through open ground is returned to `Ground` and dropped from every
//! building's sidewalk list.

use log::{debug, info, warn};
use rand::distributions::{Distribution, WeightedIndex};
use rustc_hash::FxHashSet;

use cb_core::{BuildingId, Position, SimConfig, SimRng};

use crate::building::{Building, Footprint, BUILDING_NAMES, SHAPE_REGISTRY, WAREHOUSE_NAME};
use crate::cell::CellType;
use crate::grid::Grid;
use crate::{GridError, GridResult};

/// Upper bound on bridge passes in [`Campus::connect_walkways`].
const MAX_BRIDGE_PASSES: usize = 8;

/// A generated campus: the grid plus the registry of placed buildings.
#[derive(Clone, Debug)]
pub struct Campus {
    pub grid:      Grid,
    buildings:     Vec<Building>,
    /// Dense mask of hollow-square courtyard cells; never turned into walkway.
    courtyard:     Vec<bool>,
    warehouse:     Option<BuildingId>,
    pickup:        Option<Position>,
}

impl Campus {
    /// An all-ground campus with no buildings.
    pub fn empty(rows: usize, cols: usize) -> Self {
        Self {
            grid:      Grid::new(rows, cols),
            buildings: Vec::new(),
            courtyard: vec![false; rows * cols],
            warehouse: None,
            pickup:    None,
        }
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    pub fn buildings(&self) -> &[Building] {
        &self.buildings
    }

    pub fn building(&self, id: BuildingId) -> Option<&Building> {
        self.buildings.get(id.index())
    }

    pub fn warehouse(&self) -> Option<&Building> {
        self.warehouse.and_then(|id| self.building(id))
    }

    /// The single pickup cell next to the warehouse.
    pub fn pickup(&self) -> Option<Position> {
        self.pickup
    }

    /// `(building, drop-off cell)` for every non-warehouse building that has
    /// one, in building-id order.
    pub fn delivery_targets(&self) -> Vec<(BuildingId, Position)> {
        self.buildings
            .iter()
            .filter(|b| !b.is_warehouse)
            .filter_map(|b| b.handoff.map(|p| (b.id, p)))
            .collect()
    }

    // ── Generation ────────────────────────────────────────────────────────

    /// Run the whole generation pipeline.
    pub fn generate(cfg: &SimConfig, rng: &mut SimRng) -> GridResult<Campus> {
        let mut campus = Campus::empty(cfg.rows, cfg.cols);
        let names = rng.choose_multiple(BUILDING_NAMES, BUILDING_NAMES.len());
        let shapes = WeightedIndex::new(SHAPE_REGISTRY.iter().map(|s| s.weight))?;

        for _ in 0..cfg.max_building_attempts {
            let origin = Position::new(rng.gen_range(0..cfg.rows), rng.gen_range(0..cfg.cols));
            if campus.grid.flagged(origin, CellType::Building)
                || campus.grid.flagged(origin, CellType::Walkway)
            {
                continue;
            }
            let kind = SHAPE_REGISTRY[shapes.sample(rng.inner())].kind;
            let footprint = match kind.generate(cfg.min_building_cells, cfg.max_building_cells, rng) {
                Ok(fp) => fp,
                Err(e) => {
                    debug!("skipping placement attempt: {e}");
                    continue;
                }
            };
            let name = match names.get(campus.buildings.len()) {
                Some(n) => (*n).to_string(),
                None => format!("Building {}", campus.buildings.len() + 1),
            };
            campus.place_building(origin, footprint, name);
        }

        if campus.buildings.is_empty() {
            return Err(GridError::NoBuildings);
        }
        info!(
            "placed {} buildings in {} attempts on a {}x{} grid",
            campus.buildings.len(),
            cfg.max_building_attempts,
            cfg.rows,
            cfg.cols
        );

        campus.connect_walkways(rng)?;
        campus.assign_warehouse(rng)?;
        campus.assign_dropoffs(rng)?;
        campus.scatter_obstacles(cfg.obstacle_density, rng)?;
        Ok(campus)
    }

    /// Stamp `footprint` with its bounding box at `origin`.
    ///
    /// Returns the new building's id, or `None` (leaving the grid untouched)
    /// when the placement rules reject it.
    pub fn place_building(
        &mut self,
        origin: Position,
        footprint: Footprint,
        name: impl Into<String>,
    ) -> Option<BuildingId> {
        let (h, w) = (footprint.height, footprint.width);
        if h == 0 || w == 0 || origin.row + h > self.grid.rows() || origin.col + w > self.grid.cols() {
            return None;
        }
        for r in origin.row..origin.row + h {
            for c in origin.col..origin.col + w {
                let p = Position::new(r, c);
                if self.grid.flagged(p, CellType::Building) || self.grid.flagged(p, CellType::Walkway) {
                    return None;
                }
            }
        }

        let hole: FxHashSet<Position> = footprint
            .hole
            .iter()
            .map(|&(dr, dc)| Position::new(origin.row + dr, origin.col + dc))
            .collect();
        let cells: Vec<Position> = footprint
            .cells
            .iter()
            .map(|&(dr, dc)| Position::new(origin.row + dr, origin.col + dc))
            .collect();

        for &p in &cells {
            // In bounds by the box check above.
            let _ = self.grid.convert(p, CellType::Ground, CellType::Building);
        }
        for &p in &hole {
            if let Ok(idx) = self.grid.index(p) {
                self.courtyard[idx] = true;
            }
        }

        for &p in &cells {
            for nb in p.neighbors(self.grid.rows(), self.grid.cols()) {
                self.lay_walkway(nb);
            }
        }
        let mut sidewalk = Vec::new();
        let mut seen = FxHashSet::default();
        for &p in &cells {
            for nb in p.neighbors(self.grid.rows(), self.grid.cols()) {
                if self.grid.flagged(nb, CellType::Walkway) && seen.insert(nb) {
                    sidewalk.push(nb);
                }
            }
        }

        let id = BuildingId(self.buildings.len() as u32);
        let building = Building {
            id,
            name: name.into(),
            footprint,
            origin,
            sidewalk,
            is_warehouse: false,
            handoff: None,
        };
        debug!(
            "building {id} {:?} '{}' at {origin} ({} cells)",
            building.footprint.kind,
            building.name,
            building.footprint.area()
        );
        self.buildings.push(building);
        Some(id)
    }

    // ── Walkway connectivity ──────────────────────────────────────────────

    /// Join every walkway component into one 4-connected network.
    ///
    /// The main component is the one holding the walkway cell nearest the
    /// grid centre (row-major first on ties).  Each other component gets an
    /// L-shaped connector between a random cell of its own and a random
    /// main-component cell: a horizontal run along the stray cell's row,
    /// then a vertical run along the main cell's column.  Connectors only
    /// convert `Ground`, so one that crosses a building is broken; any
    /// component still detached afterwards is bridged by a BFS route
    /// through non-building cells.  Components no route can reach are
    /// walled in by buildings and the grid edge; they revert to `Ground`.
    pub fn connect_walkways(&mut self, rng: &mut SimRng) -> GridResult<()> {
        let components = self.grid.walkway_components();
        if components.len() <= 1 {
            return Ok(());
        }
        let main_idx = self.main_component(&components);
        let main = &components[main_idx];

        let mut connectors = 0;
        for (i, comp) in components.iter().enumerate() {
            if i == main_idx {
                continue;
            }
            let (Some(&from), Some(&to)) = (rng.choose(comp), rng.choose(main)) else { continue };
            self.carve_l(from, to);
            connectors += 1;
        }
        debug!("carved {connectors} L connectors");

        for pass in 0..MAX_BRIDGE_PASSES {
            let components = self.grid.walkway_components();
            if components.len() <= 1 {
                info!("walkway network connected after {pass} bridge passes");
                return Ok(());
            }
            let main_idx = self.main_component(&components);
            let mut in_main = vec![false; self.grid.cell_count()];
            for &p in &components[main_idx] {
                in_main[self.grid.index(p)?] = true;
            }
            let mut routed = 0;
            for (i, comp) in components.iter().enumerate() {
                if i != main_idx && self.bridge(comp, &in_main)? {
                    routed += 1;
                }
            }
            if routed == 0 {
                break;
            }
        }
        self.drop_enclosed_walkways()
    }

    /// Revert every walkway component other than the main one to `Ground`
    /// and prune the reverted cells from building sidewalks.
    fn drop_enclosed_walkways(&mut self) -> GridResult<()> {
        let components = self.grid.walkway_components();
        if components.len() <= 1 {
            return Ok(());
        }
        let main_idx = self.main_component(&components);
        for (i, comp) in components.iter().enumerate() {
            if i == main_idx {
                continue;
            }
            warn!(
                "dropping {} enclosed walkway cells around {}",
                comp.len(),
                comp.first().copied().unwrap_or_default()
            );
            for &p in comp {
                self.grid.convert(p, CellType::Walkway, CellType::Ground)?;
            }
        }
        for building in &mut self.buildings {
            building.sidewalk.retain(|&p| self.grid.flagged(p, CellType::Walkway));
        }
        Ok(())
    }

    fn main_component(&self, components: &[Vec<Position>]) -> usize {
        let center = Position::new(self.grid.rows() / 2, self.grid.cols() / 2);
        components
            .iter()
            .enumerate()
            .filter_map(|(i, comp)| {
                comp.iter()
                    .map(|p| (p.manhattan(center), *p))
                    .min()
                    .map(|best| (best, i))
            })
            .min()
            .map_or(0, |(_, i)| i)
    }

    fn carve_l(&mut self, from: Position, to: Position) {
        let (c_lo, c_hi) = (from.col.min(to.col), from.col.max(to.col));
        for c in c_lo..=c_hi {
            self.lay_walkway(Position::new(from.row, c));
        }
        let (r_lo, r_hi) = (from.row.min(to.row), from.row.max(to.row));
        for r in r_lo..=r_hi {
            self.lay_walkway(Position::new(r, to.col));
        }
    }

    fn lay_walkway(&mut self, p: Position) {
        if let Ok(idx) = self.grid.index(p) {
            if !self.courtyard[idx] {
                let _ = self.grid.convert(p, CellType::Ground, CellType::Walkway);
            }
        }
    }

    /// Multi-source BFS from `comp` to any `in_main` cell through
    /// non-building, non-courtyard cells; lays walkway along the route.
    /// `false` when no route exists.
    fn bridge(&mut self, comp: &[Position], in_main: &[bool]) -> GridResult<bool> {
        let n = self.grid.cell_count();
        let mut parent = vec![usize::MAX; n];
        let mut seen = vec![false; n];
        let mut queue = std::collections::VecDeque::new();
        for &p in comp {
            let idx = self.grid.index(p)?;
            seen[idx] = true;
            queue.push_back(idx);
        }

        let mut hit = None;
        while let Some(idx) = queue.pop_front() {
            if in_main[idx] {
                hit = Some(idx);
                break;
            }
            let pos = self.grid.position_of(idx);
            for nb in pos.neighbors(self.grid.rows(), self.grid.cols()) {
                let nb_idx = self.grid.index(nb)?;
                if seen[nb_idx] || self.courtyard[nb_idx] || self.grid.flagged(nb, CellType::Building) {
                    continue;
                }
                seen[nb_idx] = true;
                parent[nb_idx] = idx;
                queue.push_back(nb_idx);
            }
        }

        let Some(mut idx) = hit else {
            debug!("no bridge route from walkway component at {}", comp.first().copied().unwrap_or_default());
            return Ok(false);
        };
        while parent[idx] != usize::MAX {
            let pos = self.grid.position_of(idx);
            self.grid.convert(pos, CellType::Ground, CellType::Walkway)?;
            idx = parent[idx];
        }
        Ok(true)
    }

    // ── Hand-off points and obstacles ─────────────────────────────────────

    fn assign_warehouse(&mut self, rng: &mut SimRng) -> GridResult<()> {
        let candidates: Vec<usize> = (0..self.buildings.len())
            .filter(|&i| !self.buildings[i].sidewalk.is_empty())
            .collect();
        let idx = *rng.choose(&candidates).ok_or(GridError::NoSidewalk)?;
        let cells: Vec<Position> = self.buildings[idx].cells().collect();
        for p in cells {
            self.grid.convert(p, CellType::Building, CellType::Restaurant)?;
        }

        let building = &mut self.buildings[idx];
        building.is_warehouse = true;
        building.name = WAREHOUSE_NAME.to_string();
        let pickup = *rng.choose(&building.sidewalk).ok_or(GridError::NoSidewalk)?;
        building.handoff = Some(pickup);
        self.grid.add_flag(pickup, CellType::PickupPoint)?;
        self.warehouse = Some(building.id);
        self.pickup = Some(pickup);
        info!("warehouse is building {} with pickup at {pickup}", building.id);
        Ok(())
    }

    fn assign_dropoffs(&mut self, rng: &mut SimRng) -> GridResult<()> {
        let mut taken: FxHashSet<Position> = self.pickup.into_iter().collect();
        for i in 0..self.buildings.len() {
            if self.buildings[i].is_warehouse {
                continue;
            }
            let sidewalk = &self.buildings[i].sidewalk;
            if sidewalk.is_empty() {
                warn!("building {} has no reachable sidewalk; it gets no drop-off", self.buildings[i].id);
                continue;
            }
            let free: Vec<Position> = sidewalk.iter().copied().filter(|p| !taken.contains(p)).collect();
            // Shared sidewalks may be fully claimed already; fall back to any.
            let pool = if free.is_empty() { sidewalk.as_slice() } else { free.as_slice() };
            let dropoff = *rng.choose(pool).ok_or(GridError::NoSidewalk)?;
            taken.insert(dropoff);
            self.grid.add_flag(dropoff, CellType::DropoffPoint)?;
            self.buildings[i].handoff = Some(dropoff);
        }
        Ok(())
    }

    fn scatter_obstacles(&mut self, density: f64, rng: &mut SimRng) -> GridResult<()> {
        if density <= 0.0 {
            return Ok(());
        }
        let candidates: Vec<Position> = self
            .grid
            .positions_with(CellType::Walkway)
            .into_iter()
            .filter(|&p| {
                !self.grid.flagged(p, CellType::PickupPoint) && !self.grid.flagged(p, CellType::DropoffPoint)
            })
            .collect();
        let walkway = self.grid.count_with(CellType::Walkway);
        let count = ((walkway as f64 * density) as usize).max(1);
        let chosen = rng.choose_multiple(&candidates, count);
        for &p in &chosen {
            self.grid.add_flag(p, CellType::Obstacle)?;
        }
        info!("scattered {} obstacles over {walkway} walkway cells", chosen.len());
        Ok(())
    }
}
