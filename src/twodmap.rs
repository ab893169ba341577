// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! An addressable two-dimensional field.
//!
//! Every grid the carver touches is one of these: the pixels of the
//! image, the energy map, and the cost table the seam finder builds.
//! Rows are stored contiguously, so every row has the same length by
//! construction.

use crate::errors::CarveError;
use std::ops::{Index, IndexMut};

/// A `width` x `height` field of `P`, addressed as `(x, y)`.
#[derive(Debug, Clone, PartialEq)]
pub struct TwoDimensionalMap<P: Default + Copy> {
    width: u32,
    height: u32,
    data: Vec<P>,
}

impl<P: Default + Copy> TwoDimensionalMap<P> {
    /// Define a new map with every cell set to `P::default()`.
    pub fn new(width: u32, height: u32) -> Self {
        TwoDimensionalMap {
            width,
            height,
            data: vec![P::default(); width as usize * height as usize],
        }
    }

    /// Wrap an existing row-major buffer.  The buffer must hold exactly
    /// `width * height` cells.
    pub fn from_vec(width: u32, height: u32, data: Vec<P>) -> Result<Self, CarveError> {
        if data.len() != width as usize * height as usize {
            return Err(CarveError::Shape {
                width,
                height,
                len: data.len(),
            });
        }
        Ok(TwoDimensionalMap {
            width,
            height,
            data,
        })
    }

    /// Build a map by asking `f` for the value at every `(x, y)`.
    pub fn from_fn<F>(width: u32, height: u32, mut f: F) -> Self
    where
        F: FnMut(u32, u32) -> P,
    {
        let mut data = Vec::with_capacity(width as usize * height as usize);
        for y in 0..height {
            for x in 0..width {
                data.push(f(x, y));
            }
        }
        TwoDimensionalMap {
            width,
            height,
            data,
        }
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }

    pub fn dimensions(&self) -> (u32, u32) {
        (self.width, self.height)
    }

    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }

    // Keep the index math in one place and never mess with it
    // anywhere else.
    fn get_index(&self, x: u32, y: u32) -> usize {
        (y as usize) * (self.width as usize) + (x as usize)
    }

    /// One full row, left to right.
    pub fn row(&self, y: u32) -> &[P] {
        let start = self.get_index(0, y);
        &self.data[start..start + self.width as usize]
    }

    pub fn as_slice(&self) -> &[P] {
        &self.data
    }
}

impl<P: Default + Copy> Index<(u32, u32)> for TwoDimensionalMap<P> {
    type Output = P;

    fn index(&self, (x, y): (u32, u32)) -> &P {
        let index = self.get_index(x, y);
        &self.data[index]
    }
}

impl<P: Default + Copy> IndexMut<(u32, u32)> for TwoDimensionalMap<P> {
    fn index_mut(&mut self, (x, y): (u32, u32)) -> &mut P {
        let index = self.get_index(x, y);
        &mut self.data[index]
    }
}

/// A cost-table cell: the cumulative cost of the cheapest path that
/// reaches this cell from the top row, and the column in the row above
/// that path came through.
#[derive(Default, Debug, Copy, Clone, PartialEq)]
pub struct EnergyAndBackPointer<P: Default + Copy> {
    pub energy: P,
    pub parent: u32,
}

impl<P: Default + Copy> EnergyAndBackPointer<P> {
    pub fn new(energy: P, parent: u32) -> Self {
        EnergyAndBackPointer { energy, parent }
    }
}
