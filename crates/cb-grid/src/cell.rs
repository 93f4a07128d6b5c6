//! Cell flags and the per-cell flag multiset.

use std::fmt;

/// One semantic tag attached to a grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum CellType {
    Ground,
    Building,
    Walkway,
    Obstacle,
    Robot,
    Restaurant,
    PickupPoint,
    DropoffPoint,
}

impl CellType {
    pub const COUNT: usize = 8;

    pub const ALL: [CellType; CellType::COUNT] = [
        CellType::Ground,
        CellType::Building,
        CellType::Walkway,
        CellType::Obstacle,
        CellType::Robot,
        CellType::Restaurant,
        CellType::PickupPoint,
        CellType::DropoffPoint,
    ];

    #[inline(always)]
    fn slot(self) -> usize {
        self as usize
    }

    /// Single-character glyph used by the grid's text dump.
    pub fn glyph(self) -> char {
        match self {
            CellType::Ground       => '.',
            CellType::Building     => 'B',
            CellType::Walkway      => '#',
            CellType::Obstacle     => 'O',
            CellType::Robot        => 'r',
            CellType::Restaurant   => 'R',
            CellType::PickupPoint  => 'P',
            CellType::DropoffPoint => 'D',
        }
    }
}

/// A multiset of [`CellType`] flags.
///
/// Flags are counted rather than stored as a bitset: two robots may briefly
/// share a hand-off cell, and each removes only its own `Robot` flag.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Cell {
    counts: [u16; CellType::COUNT],
}

impl Cell {
    /// A fresh cell holding exactly one `kind` flag.
    pub fn new(kind: CellType) -> Self {
        let mut counts = [0; CellType::COUNT];
        counts[kind.slot()] = 1;
        Self { counts }
    }

    /// Add one more instance of `kind`.
    #[inline]
    pub fn add_type(&mut self, kind: CellType) {
        self.counts[kind.slot()] = self.counts[kind.slot()].saturating_add(1);
    }

    /// Remove one instance of `kind`, if present.  Returns `true` if a flag
    /// was removed.
    #[inline]
    pub fn remove_type(&mut self, kind: CellType) -> bool {
        let slot = &mut self.counts[kind.slot()];
        if *slot == 0 {
            return false;
        }
        *slot -= 1;
        true
    }

    #[inline]
    pub fn has_type(&self, kind: CellType) -> bool {
        self.counts[kind.slot()] > 0
    }

    #[inline]
    pub fn count_type(&self, kind: CellType) -> u16 {
        self.counts[kind.slot()]
    }

    /// Iterator over the flags present at least once, in `CellType::ALL` order.
    pub fn types(&self) -> impl Iterator<Item = CellType> + '_ {
        CellType::ALL.into_iter().filter(|t| self.has_type(*t))
    }

    /// Swap every `from` flag for one `to` flag.  No-op if `from` is absent.
    pub(crate) fn convert(&mut self, from: CellType, to: CellType) -> bool {
        if !self.has_type(from) {
            return false;
        }
        self.counts[from.slot()] = 0;
        self.add_type(to);
        true
    }

    /// The glyph of the highest-priority flag present.
    pub fn glyph(&self) -> char {
        const PRIORITY: [CellType; 8] = [
            CellType::Robot,
            CellType::Restaurant,
            CellType::Obstacle,
            CellType::PickupPoint,
            CellType::DropoffPoint,
            CellType::Walkway,
            CellType::Building,
            CellType::Ground,
        ];
        PRIORITY
            .into_iter()
            .find(|t| self.has_type(*t))
            .map_or(' ', CellType::glyph)
    }
}

impl Default for Cell {
    fn default() -> Self {
        Cell::new(CellType::Ground)
    }
}

impl fmt::Display for Cell {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut first = true;
        for kind in self.types() {
            if !first {
                f.write_str("+")?;
            }
            first = false;
            write!(f, "{kind:?}")?;
            let n = self.count_type(kind);
            if n > 1 {
                write!(f, "x{n}")?;
            }
        }
        Ok(())
    }
}
