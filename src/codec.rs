// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Reading and writing image files.

use crate::errors::CarveError;
use crate::pixelgrid::{from_image, to_image, PixelGrid};
use log::info;
use std::path::Path;

/// Decode any image the `image` crate understands into an RGB grid.
pub fn decode<P: AsRef<Path>>(path: P) -> Result<PixelGrid, CarveError> {
    let path = path.as_ref();
    let image = image::open(path).map_err(|cause| CarveError::Input {
        path: path.to_path_buf(),
        cause,
    })?;
    let grid = from_image(&image);
    let (width, height) = grid.dimensions();
    if grid.is_empty() {
        return Err(CarveError::EmptyGrid { width, height });
    }
    let corner = grid[(0, 0)];
    info!(
        "loaded {:?}: {}x{}, top-left pixel ({}, {}, {})",
        path, width, height, corner.r, corner.g, corner.b
    );
    Ok(grid)
}

/// Encode a grid as an 8-bit RGB image; the format follows the path's
/// extension.
pub fn encode<P: AsRef<Path>>(path: P, grid: &PixelGrid) -> Result<(), image::ImageError> {
    to_image(grid).save(path)
}
