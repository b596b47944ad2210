use std::ops::Neg;

use crate::game::{cell_seed, rand_range, rand_unit, DIR_BOTTOM, DIR_LEFT, DIR_RIGHT, DIR_TOP};

#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum EdgeKind {
    Flat,
    Tab,
    Blank,
}

impl EdgeKind {
    /// Outward direction of the bulge: `1` for a tab, `-1` for a blank.
    pub fn sign(self) -> f32 {
        match self {
            EdgeKind::Flat => 0.0,
            EdgeKind::Tab => 1.0,
            EdgeKind::Blank => -1.0,
        }
    }

    pub fn is_flat(self) -> bool {
        matches!(self, EdgeKind::Flat)
    }
}

impl Neg for EdgeKind {
    type Output = EdgeKind;

    fn neg(self) -> EdgeKind {
        match self {
            EdgeKind::Flat => EdgeKind::Flat,
            EdgeKind::Tab => EdgeKind::Blank,
            EdgeKind::Blank => EdgeKind::Tab,
        }
    }
}

/// Edge descriptors and jitter of one cell, indexed by `DIR_*`.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct CellEdges {
    pub kinds: [EdgeKind; 4],
    pub jitter: [f32; 4],
}

impl CellEdges {
    pub fn top(&self) -> EdgeKind {
        self.kinds[DIR_TOP]
    }

    pub fn right(&self) -> EdgeKind {
        self.kinds[DIR_RIGHT]
    }

    pub fn bottom(&self) -> EdgeKind {
        self.kinds[DIR_BOTTOM]
    }

    pub fn left(&self) -> EdgeKind {
        self.kinds[DIR_LEFT]
    }
}

#[derive(Clone, Debug)]
pub struct Topology {
    size: usize,
    cells: Vec<CellEdges>,
}

impl Topology {
    /// Single row-major sweep: top and left edges mirror the already placed
    /// neighbours, bottom and right are drawn fresh unless on the boundary.
    /// Jitter is drawn independently for every edge of every cell.
    pub fn generate(size: usize, seed: u32, jitter_range: f32) -> Self {
        let mut cells: Vec<CellEdges> = Vec::with_capacity(size * size);
        for row in 0..size {
            for col in 0..size {
                let seed = cell_seed(seed, col as u32, row as u32);
                let top = if row == 0 {
                    EdgeKind::Flat
                } else {
                    -cells[(row - 1) * size + col].bottom()
                };
                let left = if col == 0 {
                    EdgeKind::Flat
                } else {
                    -cells[row * size + col - 1].right()
                };
                let right = if col + 1 == size {
                    EdgeKind::Flat
                } else {
                    random_side(seed, 1)
                };
                let bottom = if row + 1 == size {
                    EdgeKind::Flat
                } else {
                    random_side(seed, 2)
                };
                let mut jitter = [0.0; 4];
                for (dir, value) in jitter.iter_mut().enumerate() {
                    *value = rand_range(seed, 0x10 + dir as u32, -jitter_range, jitter_range);
                }
                cells.push(CellEdges {
                    kinds: [top, right, bottom, left],
                    jitter,
                });
            }
        }
        Self { size, cells }
    }

    pub fn size(&self) -> usize {
        self.size
    }

    pub fn cell(&self, col: usize, row: usize) -> Option<&CellEdges> {
        if col >= self.size || row >= self.size {
            return None;
        }
        self.cells.get(row * self.size + col)
    }

    pub fn cells(&self) -> &[CellEdges] {
        &self.cells
    }
}

fn random_side(seed: u32, salt: u32) -> EdgeKind {
    if rand_unit(seed, salt) < 0.5 {
        EdgeKind::Tab
    } else {
        EdgeKind::Blank
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn negation_swaps_tab_and_blank() {
        assert_eq!(-EdgeKind::Tab, EdgeKind::Blank);
        assert_eq!(-EdgeKind::Blank, EdgeKind::Tab);
        assert_eq!(-EdgeKind::Flat, EdgeKind::Flat);
    }

    #[test]
    fn single_cell_is_all_flat() {
        let topology = Topology::generate(1, 3, 0.02);
        let cell = topology.cell(0, 0).expect("cell");
        assert!(cell.kinds.iter().all(|kind| kind.is_flat()));
    }

    #[test]
    fn jitter_stays_within_range() {
        let topology = Topology::generate(6, 99, 0.02);
        for cell in topology.cells() {
            for value in cell.jitter {
                assert!(value.abs() <= 0.02);
            }
        }
    }

    #[test]
    fn same_seed_gives_same_topology() {
        let a = Topology::generate(5, 42, 0.02);
        let b = Topology::generate(5, 42, 0.02);
        assert_eq!(a.cells(), b.cells());
    }
}
