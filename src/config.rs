// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Run configuration.

use crate::errors::CarveError;
use std::convert::TryFrom;
use std::path::PathBuf;

pub const DEFAULT_OUTPUT_DIR: &str = "output";
pub const DEFAULT_EXTENSION: &str = "png";

/// Everything one run needs to know.
#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    /// The image to narrow.
    pub input: PathBuf,
    /// The requested width, as given.  Signed so that nonsense like a
    /// negative width survives parsing and is refused with a proper
    /// message once the image's real width is known.
    pub target_width: i64,
    /// Where frames are written.
    pub output_dir: PathBuf,
    /// The file extension (and so the format) of every frame.
    pub extension: String,
    /// Write only the final frame.
    pub final_only: bool,
}

impl Config {
    pub fn new<P: Into<PathBuf>>(input: P, target_width: i64) -> Self {
        Config {
            input: input.into(),
            target_width,
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            extension: DEFAULT_EXTENSION.to_string(),
            final_only: false,
        }
    }

    /// The target width, checked against the decoded image's width.
    pub fn target_width(&self, original_width: u32) -> Result<u32, CarveError> {
        validate_target_width(self.target_width, original_width)
    }
}

/// Narrowing needs a target strictly between zero and the current width.
pub fn validate_target_width(target: i64, original_width: u32) -> Result<u32, CarveError> {
    if target <= 0 {
        return Err(CarveError::usage(format!(
            "target width must be positive, got {}",
            target
        )));
    }
    match u32::try_from(target) {
        Ok(target) if target < original_width => Ok(target),
        _ => Err(CarveError::usage(format!(
            "target width {} must be smaller than the image width {}",
            target, original_width
        ))),
    }
}
