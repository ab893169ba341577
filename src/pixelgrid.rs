// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! The pixel grid
//!
//! The carver works on plain 8-bit RGB triples laid out in a
//! `TwoDimensionalMap`.  Whatever the source image's channel layout or
//! sample depth, it is reduced to this form once, on the way in, and
//! expanded back into an `image` buffer on the way out.

use crate::twodmap::TwoDimensionalMap;
use image::{GenericImageView, Pixel as ImagePixel, Primitive, Rgb, RgbImage};

/// One RGB pixel.
#[derive(Default, Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub struct Pixel {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Pixel {
    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Pixel { r, g, b }
    }

    pub fn channels(&self) -> [u8; 3] {
        [self.r, self.g, self.b]
    }
}

/// The colour seams are painted in on highlighted frames.
pub const HIGHLIGHT: Pixel = Pixel::new(255, 0, 0);

impl From<Rgb<u8>> for Pixel {
    fn from(p: Rgb<u8>) -> Self {
        let [r, g, b] = p.0;
        Pixel { r, g, b }
    }
}

impl From<Pixel> for Rgb<u8> {
    fn from(p: Pixel) -> Self {
        Rgb(p.channels())
    }
}

pub type PixelGrid = TwoDimensionalMap<Pixel>;

// Rescale one sample of any depth into 0..=255.
fn to_u8<S: Primitive>(sample: S) -> u8 {
    let max = S::DEFAULT_MAX_VALUE.to_f64().unwrap_or(255.0);
    let value = sample.to_f64().unwrap_or(0.0);
    (value * 255.0 / max).round().max(0.0).min(255.0) as u8
}

/// Copy any image into a pixel grid.  Grey images have their single
/// channel replicated into R, G and B; alpha is dropped; samples deeper
/// than eight bits are rescaled.
pub fn from_image<I, P, S>(image: &I) -> PixelGrid
where
    I: GenericImageView<Pixel = P>,
    P: ImagePixel<Subpixel = S> + 'static,
    S: Primitive + 'static,
{
    let (width, height) = image.dimensions();
    PixelGrid::from_fn(width, height, |x, y| {
        let [r, g, b] = image.get_pixel(x, y).to_rgb().0;
        Pixel::new(to_u8(r), to_u8(g), to_u8(b))
    })
}

/// Expand a pixel grid back into an `image` buffer for encoding.
pub fn to_image(grid: &PixelGrid) -> RgbImage {
    RgbImage::from_fn(grid.width(), grid.height(), |x, y| grid[(x, y)].into())
}
