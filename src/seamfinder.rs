// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Find the cheapest vertical seam
//!
//! A seam is one column index per row, top to bottom, where the
//! indices of neighbouring rows differ by at most one.  The cheapest
//! seam is found with the usual dynamic program: every cell of the
//! cost table holds the cheapest cumulative energy of any seam that
//! reaches it from the top row, along with a pointer back to the
//! column in the row above that seam came through.  Walking those
//! pointers up from the cheapest cell in the bottom row recovers the
//! seam.
//!
//! Ties are broken the same way every time.  On the bottom row the
//! leftmost cheapest column wins.  Going up, the column straight above
//! wins over the one to the left, which wins over the one to the
//! right; a candidate only displaces the current best when it is
//! strictly cheaper.

use crate::cq;
use crate::energy::{calculate_energy, EnergyMap};
use crate::errors::CarveError;
use crate::pixelgrid::PixelGrid;
use crate::twodmap::{EnergyAndBackPointer, TwoDimensionalMap};

/// One column index per row, top row first.
pub type Seam = Vec<u32>;

pub type CostTable = TwoDimensionalMap<EnergyAndBackPointer<f64>>;

/// This trait defines how the carver asks for seams.  It's a primitive
/// interface, just enough to make room for other energy functions.
pub trait SeamFinder {
    /// Return the seam to remove from `grid` next, together with its
    /// total energy.
    fn find_vertical_seam(&self, grid: &PixelGrid) -> Result<(Seam, f64), CarveError>;
}

/// The plain gradient energy with the backward dynamic program.
#[derive(Debug, Default, Copy, Clone)]
pub struct BackwardEnergy;

impl SeamFinder for BackwardEnergy {
    fn find_vertical_seam(&self, grid: &PixelGrid) -> Result<(Seam, f64), CarveError> {
        let energy = calculate_energy(grid)?;
        let table = cost_table(&energy);
        let seam = table_to_vertical_seam(&table)?;
        let cost = seam_energy(&energy, &seam);
        Ok((seam, cost))
    }
}

// Of the (up to) three cells above (x, y), pick the cheapest:
// straight up first, then up-left, then up-right, replacing the
// running best only on strict improvement.
fn cheapest_parent(table: &CostTable, x: u32, y: u32) -> EnergyAndBackPointer<f64> {
    let above = y - 1;
    let maxwidth = table.width() - 1;

    let mut best = EnergyAndBackPointer::new(table[(x, above)].energy, x);
    let candidates = [cq!(x == 0, None, Some(x - 1)), cq!(x == maxwidth, None, Some(x + 1))];
    for candidate in candidates.iter().flatten() {
        let energy = table[(*candidate, above)].energy;
        if energy < best.energy {
            best = EnergyAndBackPointer::new(energy, *candidate);
        }
    }
    best
}

/// Build the cumulative cost table for an energy map.  The top row is
/// the energy map's top row; every cell below adds its own energy to
/// its cheapest parent's cumulative cost.
pub fn cost_table(energy: &EnergyMap) -> CostTable {
    let (width, height) = energy.dimensions();
    let mut table = CostTable::new(width, height);

    for x in 0..width {
        table[(x, 0)] = EnergyAndBackPointer::new(energy[(x, 0)], x);
    }

    for y in 1..height {
        for x in 0..width {
            let parent = cheapest_parent(&table, x, y);
            table[(x, y)] = EnergyAndBackPointer::new(energy[(x, y)] + parent.energy, parent.parent);
        }
    }
    table
}

/// Walk a cost table's back pointers from the leftmost cheapest cell of
/// the bottom row up to the top, returning the seam top row first.
pub fn table_to_vertical_seam(table: &CostTable) -> Result<Seam, CarveError> {
    let (width, height) = table.dimensions();
    if table.is_empty() {
        return Err(CarveError::EmptyGrid { width, height });
    }

    // min_by keeps the first of several equal minima.
    let mut seam_col = (0..width)
        .min_by(|a, b| {
            let (ea, eb) = (table[(*a, height - 1)].energy, table[(*b, height - 1)].energy);
            ea.total_cmp(&eb)
        })
        .unwrap_or(0);

    let mut seam = (0..height)
        .rev()
        .fold(Seam::with_capacity(height as usize), |mut acc, y| {
            acc.push(seam_col);
            seam_col = table[(seam_col, y)].parent;
            acc
        });
    seam.reverse();
    Ok(seam)
}

/// Given an energy map, return the list of x-coordinates that, when
/// mapped with the range (0..height), give the XY coordinates for each
/// pixel in the cheapest seam.
pub fn energy_to_vertical_seam(energy: &EnergyMap) -> Result<Seam, CarveError> {
    table_to_vertical_seam(&cost_table(energy))
}

/// The total energy of the pixels a seam passes through.
pub fn seam_energy(energy: &EnergyMap, seam: &[u32]) -> f64 {
    seam.iter()
        .enumerate()
        .map(|(y, x)| energy[(*x, y as u32)])
        .sum()
}
