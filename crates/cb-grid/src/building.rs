//! Building footprints and the static shape registry.
//!
//! # Shape registry
//!
//! Each [`ShapeKind`] maps to a generator function and a selection weight in
//! [`SHAPE_REGISTRY`].  The campus generator draws a kind with
//! `WeightedIndex` over the weights and calls the generator with the
//! configured footprint-area bounds:
//!
//! | Kind             | Weight | Footprint                                         |
//! |------------------|--------|---------------------------------------------------|
//! | `Rectangle`      | 1.0    | random height, width chosen so area is in bounds  |
//! | `RatioRectangle` | 0.8    | `s × 2s` (or `2s × s`), area in bounds            |
//! | `Square`         | 0.8    | `side × side`, area in bounds                     |
//! | `HollowSquare`   | 0.5    | square ring, wall thickness 3, empty courtyard    |
//! | `Trapezoid`      | 0.9    | rows interpolate from top width to bottom width   |
//!
//! A generator that cannot satisfy the bounds returns
//! [`GridError::ShapeDoesNotFit`]; the generator treats that as a skipped
//! placement attempt.

use cb_core::{BuildingId, Position, SimRng};

use crate::{GridError, GridResult};

/// Wall thickness of hollow squares, in cells.
pub const HOLLOW_WALL: usize = 3;

/// Name given to the building converted into the food warehouse.
pub const WAREHOUSE_NAME: &str = "Food Warehouse";

#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum ShapeKind {
    Rectangle,
    RatioRectangle,
    Square,
    HollowSquare,
    Trapezoid,
}

/// One registry entry: shape tag, selection weight, generator.
pub struct ShapeEntry {
    pub kind:     ShapeKind,
    pub weight:   f64,
    pub generate: fn(usize, usize, &mut SimRng) -> GridResult<Footprint>,
}

pub const SHAPE_REGISTRY: [ShapeEntry; 5] = [
    ShapeEntry { kind: ShapeKind::Rectangle,      weight: 1.0, generate: rectangle },
    ShapeEntry { kind: ShapeKind::RatioRectangle, weight: 0.8, generate: ratio_rectangle },
    ShapeEntry { kind: ShapeKind::Square,         weight: 0.8, generate: square },
    ShapeEntry { kind: ShapeKind::HollowSquare,   weight: 0.5, generate: hollow_square },
    ShapeEntry { kind: ShapeKind::Trapezoid,      weight: 0.9, generate: trapezoid },
];

impl ShapeKind {
    pub fn entry(self) -> &'static ShapeEntry {
        // The registry lists every kind exactly once, in declaration order.
        &SHAPE_REGISTRY[self as usize]
    }

    pub fn generate(self, min_cells: usize, max_cells: usize, rng: &mut SimRng) -> GridResult<Footprint> {
        (self.entry().generate)(min_cells, max_cells, rng)
    }
}

// ── Footprint ─────────────────────────────────────────────────────────────────

/// Immutable building shape: cell offsets relative to the top-left corner of
/// a `height × width` bounding box.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Footprint {
    pub kind:   ShapeKind,
    /// `(d_row, d_col)` offsets of occupied cells.
    pub cells:  Vec<(usize, usize)>,
    /// Offsets enclosed by the shape but not part of it (hollow courtyards).
    /// No walkway is ever laid on these.
    pub hole:   Vec<(usize, usize)>,
    pub height: usize,
    pub width:  usize,
}

impl Footprint {
    /// Solid `height × width` block.
    pub fn solid(kind: ShapeKind, height: usize, width: usize) -> Self {
        let cells = (0..height)
            .flat_map(|dr| (0..width).map(move |dc| (dr, dc)))
            .collect();
        Self { kind, cells, hole: Vec::new(), height, width }
    }

    pub fn area(&self) -> usize {
        self.cells.len()
    }
}

fn ceil_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r < n {
        r += 1;
    }
    while r > 0 && (r - 1) * (r - 1) >= n {
        r -= 1;
    }
    r
}

fn floor_sqrt(n: usize) -> usize {
    let mut r = (n as f64).sqrt() as usize;
    while r * r > n {
        r -= 1;
    }
    while (r + 1) * (r + 1) <= n {
        r += 1;
    }
    r
}

fn no_fit(shape: ShapeKind, min_cells: usize, max_cells: usize) -> GridError {
    GridError::ShapeDoesNotFit { shape, min_cells, max_cells }
}

fn rectangle(min_cells: usize, max_cells: usize, rng: &mut SimRng) -> GridResult<Footprint> {
    let kind = ShapeKind::Rectangle;
    let max_side = floor_sqrt(max_cells);
    if max_side == 0 {
        return Err(no_fit(kind, min_cells, max_cells));
    }
    let lo = (ceil_sqrt(min_cells) / 2).max(1);
    let hi = (max_side * 2).max(lo);
    let height = rng.gen_range(lo..=hi);

    let w_lo = min_cells.div_ceil(height).max(1);
    let w_hi = max_cells / height;
    if w_lo > w_hi {
        return Err(no_fit(kind, min_cells, max_cells));
    }
    let width = rng.gen_range(w_lo..=w_hi);
    Ok(Footprint::solid(kind, height, width))
}

fn ratio_rectangle(min_cells: usize, max_cells: usize, rng: &mut SimRng) -> GridResult<Footprint> {
    let kind = ShapeKind::RatioRectangle;
    let lo = ceil_sqrt(min_cells.div_ceil(2)).max(1);
    let hi = floor_sqrt(max_cells / 2);
    if lo > hi {
        return Err(no_fit(kind, min_cells, max_cells));
    }
    let short = rng.gen_range(lo..=hi);
    let (height, width) = if rng.gen_bool(0.5) { (short * 2, short) } else { (short, short * 2) };
    Ok(Footprint::solid(kind, height, width))
}

fn square(min_cells: usize, max_cells: usize, rng: &mut SimRng) -> GridResult<Footprint> {
    let kind = ShapeKind::Square;
    let lo = ceil_sqrt(min_cells).max(1);
    let hi = floor_sqrt(max_cells);
    if lo > hi {
        return Err(no_fit(kind, min_cells, max_cells));
    }
    let side = rng.gen_range(lo..=hi);
    Ok(Footprint::solid(kind, side, side))
}

fn hollow_square(min_cells: usize, max_cells: usize, rng: &mut SimRng) -> GridResult<Footprint> {
    let kind = ShapeKind::HollowSquare;
    let lo = ceil_sqrt(min_cells).max(2 * HOLLOW_WALL + 1);
    let hi = floor_sqrt(max_cells);
    if lo > hi {
        return Err(no_fit(kind, min_cells, max_cells));
    }
    let side = rng.gen_range(lo..=hi);
    let t = HOLLOW_WALL;

    let mut cells = Vec::new();
    let mut hole = Vec::new();
    for dr in 0..side {
        for dc in 0..side {
            if dr < t || dr >= side - t || dc < t || dc >= side - t {
                cells.push((dr, dc));
            } else {
                hole.push((dr, dc));
            }
        }
    }
    Ok(Footprint { kind, cells, hole, height: side, width: side })
}

fn trapezoid(min_cells: usize, max_cells: usize, rng: &mut SimRng) -> GridResult<Footprint> {
    let kind = ShapeKind::Trapezoid;
    let lo = ceil_sqrt(min_cells).max(1);
    let hi = floor_sqrt(max_cells);
    if lo > hi {
        return Err(no_fit(kind, min_cells, max_cells));
    }
    let height = rng.gen_range(lo..=hi);
    let top = rng.gen_range(lo..=hi);
    let bottom = rng.gen_range(lo..=hi);
    let width = top.max(bottom);

    let mut cells = Vec::new();
    for dr in 0..height {
        let row_width = if height > 1 {
            let t = dr as f64 / (height - 1) as f64;
            (top as f64 + (bottom as f64 - top as f64) * t).round() as usize
        } else {
            top
        };
        let offset = (width - row_width) / 2;
        cells.extend((0..row_width).map(|dc| (dr, offset + dc)));
    }
    Ok(Footprint { kind, cells, hole: Vec::new(), height, width })
}

// ── Building ──────────────────────────────────────────────────────────────────

/// A footprint that has been stamped onto the grid.
#[derive(Clone, Debug)]
pub struct Building {
    pub id:           BuildingId,
    pub name:         String,
    pub footprint:    Footprint,
    /// Top-left corner of the bounding box.
    pub origin:       Position,
    /// Walkway cells 4-adjacent to the footprint, in discovery order.
    pub sidewalk:     Vec<Position>,
    pub is_warehouse: bool,
    /// The pickup (warehouse) or drop-off (everyone else) cell, once chosen.
    pub handoff:      Option<Position>,
}

impl Building {
    /// Absolute positions of every footprint cell.
    pub fn cells(&self) -> impl Iterator<Item = Position> + '_ {
        self.footprint
            .cells
            .iter()
            .map(|&(dr, dc)| Position::new(self.origin.row + dr, self.origin.col + dc))
    }
}

/// Names drawn at random for placed buildings.
pub const BUILDING_NAMES: &[&str] = &[
    "Physics Hall", "Chemistry Hall", "Biology Hall", "Mathematics Hall",
    "Computer Science Center", "Engineering Annex", "Civil Engineering Lab",
    "Aerospace Research Wing", "Optics Institute", "Robotics Center",
    "Environmental Sciences", "Neuroscience Pavilion", "Humanities Hall",
    "Philosophy House", "History Hall", "Language Arts Building",
    "Journalism Center", "Music Conservatory", "Art & Design Studio",
    "Theatre Arts Complex", "Centennial Auditorium", "Heritage Theatre",
    "Innovation Forum", "Discovery Lecture Hall", "Founders Conference Center",
    "Main Library", "Science Library", "Law Library", "Student Union",
    "Campus Bookstore", "Career Services", "Health Services",
    "Recreation Center", "Financial Aid Office", "Admissions Hall",
    "International Programs", "Alumni House", "Campus Police Headquarters",
    "Ocotillo Dorm", "Saguaro Hall", "Agave Suites", "Bear Creek Apartments",
    "Cactus Court", "Desert Vista Hall", "Mesa Residence", "Rincon Suites",
    "Catalina Complex", "Coffee Commons", "Campus Market",
    "Print & Copy Center", "Bear Down Gym", "Track & Field House",
    "Aquatics Center", "Stadium Offices", "Athletic Training Facility",
    "Innovation Hub", "Technology Incubator", "Sustainability Center",
    "Data Science Lab", "Cybersecurity Institute",
];
