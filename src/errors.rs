// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Everything that can go wrong while carving.

use crate::pixelgrid::PixelGrid;
use failure::Fail;
use std::path::PathBuf;

#[derive(Debug, Fail)]
pub enum CarveError {
    /// The source image could not be read or decoded.
    #[fail(display = "could not load image {:?}: {}", path, cause)]
    Input {
        path: PathBuf,
        #[cause]
        cause: image::ImageError,
    },

    /// The requested target width cannot be reached by narrowing.
    #[fail(display = "invalid target width: {}", reason)]
    Usage { reason: String },

    /// A frame could not be persisted by the output sink.
    #[fail(display = "could not write frame {}: {}", name, reason)]
    FrameWrite { name: String, reason: String },

    /// The final frame could not be persisted.  The carve itself
    /// finished, and the narrowed image travels with the error.
    #[fail(display = "could not write final frame {}: {}", name, reason)]
    FinalFrameWrite {
        name: String,
        reason: String,
        image: PixelGrid,
    },

    #[fail(display = "cannot carve an empty {}x{} image", width, height)]
    EmptyGrid { width: u32, height: u32 },

    #[fail(
        display = "buffer of {} cells does not describe a {}x{} grid",
        len, width, height
    )]
    Shape { width: u32, height: u32, len: usize },

    #[fail(display = "invalid seam: {}", reason)]
    InvalidSeam { reason: String },

    #[fail(display = "could not prepare {:?}: {}", path, cause)]
    Io {
        path: PathBuf,
        #[cause]
        cause: std::io::Error,
    },
}

impl CarveError {
    pub(crate) fn usage(reason: impl Into<String>) -> Self {
        CarveError::Usage {
            reason: reason.into(),
        }
    }

    pub(crate) fn invalid_seam(reason: impl Into<String>) -> Self {
        CarveError::InvalidSeam {
            reason: reason.into(),
        }
    }
}
