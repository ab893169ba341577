// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Calculate the energy of an image
//!
//! The energy of an interior pixel is the sum, over R, G and B, of the
//! absolute difference between its left and right neighbours, plus the
//! same sum for its upper and lower neighbours.  Every pixel on the
//! outer frame of the image is given a fixed, high energy instead: that
//! keeps seams away from the edges without forbidding them, and means
//! no neighbour lookup ever leaves the grid.

use crate::errors::CarveError;
use crate::pixelgrid::{Pixel, PixelGrid};
use crate::twodmap::TwoDimensionalMap;
use itertools::iproduct;

/// The energy assigned to every pixel on the image's outer frame.
pub const BORDER_ENERGY: f64 = 1000.0;

pub type EnergyMap = TwoDimensionalMap<f64>;

// Takes the channels (R,G,B) from two pixels and sums the absolute
// differences between them:
//
//        |Δ| = |Δr| + |Δg| + |Δb|
//
// Channels stay integers until the very end, so every energy is an
// exact small whole number.
#[inline]
fn energy_of_pair(p1: &Pixel, p2: &Pixel) -> u32 {
    p1.channels()
        .iter()
        .zip(p2.channels().iter())
        .map(|(c1, c2)| (i32::from(*c1) - i32::from(*c2)).abs() as u32)
        .sum()
}

/// Compute the energy of every pixel in the grid.  The resulting map
/// has the same dimensions as the grid.  A grid with no pixels has no
/// meaningful energy and is refused.
pub fn calculate_energy(grid: &PixelGrid) -> Result<EnergyMap, CarveError> {
    let (width, height) = grid.dimensions();
    if grid.is_empty() {
        return Err(CarveError::EmptyGrid { width, height });
    }
    let (mw, mh) = (width - 1, height - 1);

    let energy = iproduct!(0..height, 0..width)
        .map(|(y, x)| {
            if x == 0 || y == 0 || x == mw || y == mh {
                return BORDER_ENERGY;
            }
            let horizontal = energy_of_pair(&grid[(x + 1, y)], &grid[(x - 1, y)]);
            let vertical = energy_of_pair(&grid[(x, y + 1)], &grid[(x, y - 1)]);
            f64::from(horizontal + vertical)
        })
        .collect();

    EnergyMap::from_vec(width, height, energy)
}

#[cfg(test)]
mod tests {
    use super::*;

    const B: f64 = BORDER_ENERGY;

    const IMAGE_DATA: [[u8; 3]; 12] = [
        [0, 0, 0], [10, 0, 0], [20, 0, 0], [30, 0, 0],
        [0, 5, 0], [0, 0, 0], [50, 0, 0], [0, 0, 9],
        [1, 1, 1], [0, 0, 100], [4, 4, 4], [0, 0, 0],
    ];
    const IMAGE_ENERGY: [f64; 12] = [B, B, B, B, B, 165.0, 33.0, B, B, B, B, B];

    fn grid_of(width: u32, height: u32, data: &[[u8; 3]]) -> PixelGrid {
        let pixels = data.iter().map(|&[r, g, b]| Pixel::new(r, g, b)).collect();
        PixelGrid::from_vec(width, height, pixels).unwrap()
    }

    #[test]
    fn energy_generator_works() {
        let energy = calculate_energy(&grid_of(4, 3, &IMAGE_DATA)).unwrap();
        assert_eq!(energy.dimensions(), (4, 3));
        assert_eq!(energy.as_slice(), &IMAGE_ENERGY[..]);
    }

    #[test]
    fn every_frame_pixel_carries_the_border_energy() {
        for &(width, height) in &[(1, 1), (1, 5), (5, 1), (2, 2), (6, 4)] {
            let grid = PixelGrid::from_fn(width, height, |x, y| {
                Pixel::new((x * 37) as u8, (y * 91) as u8, ((x + y) * 13) as u8)
            });
            let energy = calculate_energy(&grid).unwrap();
            for (x, y) in iproduct!(0..width, 0..height) {
                if x == 0 || y == 0 || x == width - 1 || y == height - 1 {
                    assert_eq!(energy[(x, y)], BORDER_ENERGY, "({}, {})", x, y);
                }
            }
        }
    }

    #[test]
    fn flat_interior_has_no_energy() {
        let grid = PixelGrid::from_fn(5, 5, |_, _| Pixel::new(40, 40, 40));
        let energy = calculate_energy(&grid).unwrap();
        assert_eq!(energy[(2, 2)], 0.0);
        assert_eq!(energy[(1, 3)], 0.0);
    }

    #[test]
    fn empty_grids_are_refused() {
        assert!(calculate_energy(&PixelGrid::new(0, 3)).is_err());
        assert!(calculate_energy(&PixelGrid::new(3, 0)).is_err());
    }
}
