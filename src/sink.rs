// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Where frames go
//!
//! The carver hands every intermediate and final frame to an
//! `OutputSink`, tagged with a `FrameName`.  The sink decides what
//! persisting a frame means; `DirectorySink` writes image files.

use crate::codec::encode;
use crate::errors::CarveError;
use crate::pixelgrid::PixelGrid;
use std::fmt;
use std::fs;
use std::path::{Path, PathBuf};

/// The label of one frame.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum FrameName {
    /// The grid before step `n`, with the seam about to go painted in.
    Highlighted(u32),
    /// The grid after step `n`.
    Resized(u32),
    /// The finished grid.
    Final { width: u32, height: u32 },
}

impl FrameName {
    pub fn is_final(&self) -> bool {
        matches!(self, FrameName::Final { .. })
    }

    /// The file name for this frame with the given extension.
    pub fn file_name(&self, extension: &str) -> String {
        format!("{}.{}", self, extension)
    }
}

impl fmt::Display for FrameName {
    fn fmt(&self, f: &mut fmt::Formatter) -> fmt::Result {
        match self {
            FrameName::Highlighted(n) => write!(f, "highlighted_step_{}", n),
            FrameName::Resized(n) => write!(f, "resized_step_{}", n),
            FrameName::Final { width, height } => write!(f, "final_resized_{}x{}", width, height),
        }
    }
}

pub trait OutputSink {
    /// Persist one frame.
    fn write(&mut self, name: FrameName, grid: &PixelGrid) -> Result<(), CarveError>;
}

/// Writes each frame as `<directory>/<name>.<extension>`.
#[derive(Debug, Clone)]
pub struct DirectorySink {
    directory: PathBuf,
    extension: String,
}

impl DirectorySink {
    /// Create the sink, making `directory` (and its parents) if it does
    /// not exist yet.
    pub fn create<P: AsRef<Path>>(directory: P, extension: &str) -> Result<Self, CarveError> {
        let directory = directory.as_ref().to_path_buf();
        fs::create_dir_all(&directory).map_err(|cause| CarveError::Io {
            path: directory.clone(),
            cause,
        })?;
        Ok(DirectorySink {
            directory,
            extension: extension.trim_start_matches('.').to_string(),
        })
    }

    pub fn path_of(&self, name: FrameName) -> PathBuf {
        self.directory.join(name.file_name(&self.extension))
    }
}

impl OutputSink for DirectorySink {
    fn write(&mut self, name: FrameName, grid: &PixelGrid) -> Result<(), CarveError> {
        let path = self.path_of(name);
        encode(&path, grid).map_err(|e| CarveError::FrameWrite {
            name: path.display().to_string(),
            reason: e.to_string(),
        })
    }
}

/// Passes only the final frame through to the wrapped sink.
#[derive(Debug)]
pub struct FinalOnly<S: OutputSink>(pub S);

impl<S: OutputSink> OutputSink for FinalOnly<S> {
    fn write(&mut self, name: FrameName, grid: &PixelGrid) -> Result<(), CarveError> {
        if name.is_final() {
            self.0.write(name, grid)
        } else {
            Ok(())
        }
    }
}

impl<S: OutputSink + ?Sized> OutputSink for &mut S {
    fn write(&mut self, name: FrameName, grid: &PixelGrid) -> Result<(), CarveError> {
        (**self).write(name, grid)
    }
}
