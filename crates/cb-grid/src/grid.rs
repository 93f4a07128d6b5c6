//! Dense row-major cell storage with bounds-checked flag access.
//!
//! # Data layout
//!
//! Cells live in one `Vec<Cell>` indexed by `row * cols + col`.  Every public
//! accessor validates the coordinate first and fails with
//! [`GridError::OutOfBounds`]; nothing clamps silently.

use std::fmt;

use cb_core::Position;

use crate::cell::{Cell, CellType};
use crate::{GridError, GridResult};

/// The campus grid: `rows × cols` cells, each a multiset of flags.
#[derive(Clone, Debug)]
pub struct Grid {
    rows:  usize,
    cols:  usize,
    cells: Vec<Cell>,
}

impl Grid {
    /// A `rows × cols` grid with every cell flagged `Ground`.
    pub fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            cells: vec![Cell::new(CellType::Ground); rows * cols],
        }
    }

    #[inline]
    pub fn rows(&self) -> usize {
        self.rows
    }

    #[inline]
    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn in_bounds(&self, pos: Position) -> bool {
        pos.row < self.rows && pos.col < self.cols
    }

    /// Row-major offset of `pos`, or an out-of-bounds error.
    #[inline]
    pub fn index(&self, pos: Position) -> GridResult<usize> {
        if !self.in_bounds(pos) {
            return Err(GridError::OutOfBounds { position: pos, rows: self.rows, cols: self.cols });
        }
        Ok(pos.row * self.cols + pos.col)
    }

    /// Inverse of [`index`](Self::index).  `idx` must be `< rows * cols`.
    #[inline]
    pub fn position_of(&self, idx: usize) -> Position {
        Position::new(idx / self.cols, idx % self.cols)
    }

    #[inline]
    pub fn cell_count(&self) -> usize {
        self.cells.len()
    }

    // ── Flag access ───────────────────────────────────────────────────────

    pub fn get_cell(&self, pos: Position) -> GridResult<&Cell> {
        let idx = self.index(pos)?;
        Ok(&self.cells[idx])
    }

    pub fn has_flag(&self, pos: Position, kind: CellType) -> GridResult<bool> {
        Ok(self.get_cell(pos)?.has_type(kind))
    }

    pub fn add_flag(&mut self, pos: Position, kind: CellType) -> GridResult<()> {
        let idx = self.index(pos)?;
        self.cells[idx].add_type(kind);
        Ok(())
    }

    /// Remove one `kind` flag.  Returns whether a flag was actually present.
    pub fn remove_flag(&mut self, pos: Position, kind: CellType) -> GridResult<bool> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].remove_type(kind))
    }

    /// Replace all `from` flags at `pos` with a single `to` flag.
    /// Returns `false` (and changes nothing) when `from` is absent.
    pub fn convert(&mut self, pos: Position, from: CellType, to: CellType) -> GridResult<bool> {
        let idx = self.index(pos)?;
        Ok(self.cells[idx].convert(from, to))
    }

    /// Flag test that treats out-of-bounds cells as "not flagged".
    ///
    /// Used on hot paths that already bound their coordinates through
    /// [`Position::neighbors`].
    #[inline]
    pub fn flagged(&self, pos: Position, kind: CellType) -> bool {
        self.in_bounds(pos) && self.cells[pos.row * self.cols + pos.col].has_type(kind)
    }

    /// Every position holding at least one `kind` flag, in row-major order.
    pub fn positions_with(&self, kind: CellType) -> Vec<Position> {
        self.cells
            .iter()
            .enumerate()
            .filter(|(_, c)| c.has_type(kind))
            .map(|(i, _)| self.position_of(i))
            .collect()
    }

    /// Number of cells holding at least one `kind` flag.
    pub fn count_with(&self, kind: CellType) -> usize {
        self.cells.iter().filter(|c| c.has_type(kind)).count()
    }

    // ── Connectivity ──────────────────────────────────────────────────────

    /// 4-connected components of `Walkway` cells.
    ///
    /// Components are discovered by scanning cells in row-major order, so the
    /// result is deterministic: component `i` is the one containing the
    /// `i`-th unvisited walkway cell.  Cells inside a component are listed in
    /// flood-fill discovery order.
    pub fn walkway_components(&self) -> Vec<Vec<Position>> {
        let mut seen = vec![false; self.cells.len()];
        let mut components = Vec::new();
        let mut stack = Vec::new();

        for start in 0..self.cells.len() {
            if seen[start] || !self.cells[start].has_type(CellType::Walkway) {
                continue;
            }
            seen[start] = true;
            stack.push(start);
            let mut component = Vec::new();

            while let Some(idx) = stack.pop() {
                let pos = self.position_of(idx);
                component.push(pos);
                for nb in pos.neighbors(self.rows, self.cols) {
                    let nb_idx = nb.row * self.cols + nb.col;
                    if !seen[nb_idx] && self.cells[nb_idx].has_type(CellType::Walkway) {
                        seen[nb_idx] = true;
                        stack.push(nb_idx);
                    }
                }
            }
            components.push(component);
        }
        components
    }
}

impl fmt::Display for Grid {
    /// One glyph per cell, one line per row.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in self.cells.chunks(self.cols.max(1)) {
            let line: String = row.iter().map(Cell::glyph).collect();
            writeln!(f, "{line}")?;
        }
        Ok(())
    }
}
