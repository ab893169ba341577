// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Content-aware image narrowing
//!
//! Repeatedly removes the cheapest top-to-bottom seam of pixels from an
//! image until it reaches a target width, writing a highlighted and a
//! narrowed frame for every step along the way.

pub mod ternary;

pub mod errors;
pub use errors::CarveError;

pub mod twodmap;
pub use twodmap::TwoDimensionalMap;

pub mod pixelgrid;
pub use pixelgrid::{Pixel, PixelGrid};

pub mod energy;
pub use energy::{calculate_energy, EnergyMap, BORDER_ENERGY};

pub mod seamfinder;
pub use seamfinder::{energy_to_vertical_seam, BackwardEnergy, Seam, SeamFinder};

pub mod seamcarver;
pub use seamcarver::{seamcarve, CarveState, Carved, SeamCarver};

pub mod sink;
pub use sink::{DirectorySink, FinalOnly, FrameName, OutputSink};

pub mod codec;
pub mod config;
pub use config::Config;

/// Load the configured image, check the target width, and carve it,
/// writing frames to the configured directory.  The target width is
/// checked before any directory is created or any frame is written.
pub fn run(config: &Config) -> Result<Carved, CarveError> {
    let image = codec::decode(&config.input)?;
    let target_width = config.target_width(image.width())?;
    let carver = SeamCarver::new(image, target_width)?;

    let mut sink = DirectorySink::create(&config.output_dir, &config.extension)?;
    if config.final_only {
        carver.carve(&mut FinalOnly(&mut sink))
    } else {
        carver.carve(&mut sink)
    }
}
