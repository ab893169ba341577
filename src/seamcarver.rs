// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at http://mozilla.org/MPL/2.0/.

//! Seamcarve - The main loop
//!
//! The carver owns the working grid.  Each step finds the cheapest
//! seam, hands a copy of the grid with that seam painted red to the
//! output sink, builds a fresh grid one column narrower without the
//! seam, and hands that to the sink too.  When the grid reaches the
//! target width the carver is done and the sink gets the final frame.
//!
//! Frames that fail to persist along the way are logged and counted,
//! but do not stop the carve.  Failing to persist the final frame is
//! the one frame failure that fails the run.

use crate::config::validate_target_width;
use crate::errors::CarveError;
use crate::pixelgrid::{PixelGrid, HIGHLIGHT};
use crate::seamfinder::{BackwardEnergy, SeamFinder};
use crate::sink::{FrameName, OutputSink};
use log::{debug, info, warn};

// A seam must have one in-range column per row, and neighbouring rows
// may not be more than one column apart.
fn check_seam(grid: &PixelGrid, seam: &[u32]) -> Result<(), CarveError> {
    let (width, height) = grid.dimensions();
    if seam.len() != height as usize {
        return Err(CarveError::invalid_seam(format!(
            "{} entries for a grid {} rows tall",
            seam.len(),
            height
        )));
    }
    if let Some((y, x)) = seam.iter().enumerate().find(|(_, x)| **x >= width) {
        return Err(CarveError::invalid_seam(format!(
            "column {} on row {} is outside a grid {} wide",
            x, y, width
        )));
    }
    if let Some(y) = seam.windows(2).position(|w| w[0].max(w[1]) - w[0].min(w[1]) > 1) {
        return Err(CarveError::invalid_seam(format!(
            "rows {} and {} are not adjacent",
            y,
            y + 1
        )));
    }
    Ok(())
}

/// Copy the grid without the seam: each row loses the pixel at its seam
/// column, and everything to the right of it shifts left by one.  The
/// source grid is left untouched.
pub fn remove_vertical_seam(grid: &PixelGrid, seam: &[u32]) -> Result<PixelGrid, CarveError> {
    check_seam(grid, seam)?;
    let (width, height) = grid.dimensions();
    Ok(PixelGrid::from_fn(width - 1, height, |x, y| {
        let source = if x < seam[y as usize] { x } else { x + 1 };
        grid[(source, y)]
    }))
}

/// Copy the grid with every pixel of the seam painted in the highlight
/// colour.
pub fn highlight_seam(grid: &PixelGrid, seam: &[u32]) -> Result<PixelGrid, CarveError> {
    check_seam(grid, seam)?;
    let mut highlighted = grid.clone();
    for (y, x) in seam.iter().enumerate() {
        highlighted[(*x, y as u32)] = HIGHLIGHT;
    }
    Ok(highlighted)
}

#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum CarveState {
    /// The grid is still wider than the target.
    Running,
    /// The grid has reached the target width and the final frame has
    /// been handed to the sink.
    Done,
}

/// What a finished carve leaves behind.
#[derive(Debug, Clone)]
pub struct Carved {
    pub image: PixelGrid,
    pub steps: u32,
    /// Intermediate frames the sink failed to persist.
    pub failed_frames: u32,
}

/// A struct for holding the image being carved.
#[derive(Debug)]
pub struct SeamCarver<F: SeamFinder = BackwardEnergy> {
    image: PixelGrid,
    finder: F,
    target_width: u32,
    state: CarveState,
    steps: u32,
    failed_frames: u32,
}

impl SeamCarver<BackwardEnergy> {
    /// Prepare to carve `image` down to `target_width` columns.  The
    /// target must be positive and strictly narrower than the image.
    pub fn new(image: PixelGrid, target_width: u32) -> Result<Self, CarveError> {
        SeamCarver::with_finder(image, target_width, BackwardEnergy)
    }
}

impl<F: SeamFinder> SeamCarver<F> {
    pub fn with_finder(image: PixelGrid, target_width: u32, finder: F) -> Result<Self, CarveError> {
        if image.is_empty() {
            let (width, height) = image.dimensions();
            return Err(CarveError::EmptyGrid { width, height });
        }
        let target_width = validate_target_width(i64::from(target_width), image.width())?;
        Ok(SeamCarver {
            image,
            finder,
            target_width,
            state: CarveState::Running,
            steps: 0,
            failed_frames: 0,
        })
    }

    pub fn state(&self) -> CarveState {
        self.state
    }

    pub fn steps(&self) -> u32 {
        self.steps
    }

    pub fn image(&self) -> &PixelGrid {
        &self.image
    }

    // Intermediate frames are best-effort.
    fn emit<S: OutputSink>(failed: &mut u32, sink: &mut S, name: FrameName, grid: &PixelGrid) {
        if let Err(e) = sink.write(name, grid) {
            warn!("{}", e);
            *failed += 1;
        }
    }

    /// Remove one seam.  Once the target width is reached this writes
    /// the final frame and moves to `Done`; stepping a carver that is
    /// already done does nothing.
    pub fn step<S: OutputSink>(&mut self, sink: &mut S) -> Result<CarveState, CarveError> {
        if self.state == CarveState::Done {
            return Ok(CarveState::Done);
        }
        let step = self.steps + 1;

        let (seam, cost) = self.finder.find_vertical_seam(&self.image)?;
        debug!(
            "step {}: seam cost {}, bottom column {}",
            step,
            cost,
            seam.last().copied().unwrap_or_default()
        );

        let highlighted = highlight_seam(&self.image, &seam)?;
        Self::emit(&mut self.failed_frames, sink, FrameName::Highlighted(step), &highlighted);

        self.image = remove_vertical_seam(&self.image, &seam)?;
        self.steps = step;
        Self::emit(&mut self.failed_frames, sink, FrameName::Resized(step), &self.image);

        if self.image.width() == self.target_width {
            self.state = CarveState::Done;
            let (width, height) = self.image.dimensions();
            let name = FrameName::Final { width, height };
            if let Err(e) = sink.write(name, &self.image) {
                let reason = match e {
                    CarveError::FrameWrite { reason, .. } => reason,
                    other => other.to_string(),
                };
                return Err(CarveError::FinalFrameWrite {
                    name: name.to_string(),
                    reason,
                    image: self.image.clone(),
                });
            }
        }
        Ok(self.state)
    }

    /// Step until done.
    pub fn carve<S: OutputSink>(mut self, sink: &mut S) -> Result<Carved, CarveError> {
        info!(
            "carving {}x{} down to width {} ({} seams)",
            self.image.width(),
            self.image.height(),
            self.target_width,
            self.image.width() - self.target_width
        );
        while self.step(sink)? == CarveState::Running {}
        info!(
            "carved to {}x{} in {} steps",
            self.image.width(),
            self.image.height(),
            self.steps
        );
        Ok(Carved {
            image: self.image,
            steps: self.steps,
            failed_frames: self.failed_frames,
        })
    }
}

/// Carve `image` down to `target_width` with the default seam finder.
pub fn seamcarve<S: OutputSink>(
    image: PixelGrid,
    target_width: u32,
    sink: &mut S,
) -> Result<Carved, CarveError> {
    SeamCarver::new(image, target_width)?.carve(sink)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::pixelgrid::Pixel;

    const BLACK: Pixel = Pixel::new(0, 0, 0);
    const WHITE: Pixel = Pixel::new(255, 255, 255);

    struct Recorder {
        frames: Vec<(FrameName, PixelGrid)>,
        refuse: fn(&FrameName) -> bool,
    }

    impl Recorder {
        fn refusing(refuse: fn(&FrameName) -> bool) -> Self {
            Recorder {
                frames: Vec::new(),
                refuse,
            }
        }
    }

    impl Default for Recorder {
        fn default() -> Self {
            Recorder::refusing(|_| false)
        }
    }

    impl OutputSink for Recorder {
        fn write(&mut self, name: FrameName, grid: &PixelGrid) -> Result<(), CarveError> {
            if (self.refuse)(&name) {
                return Err(CarveError::FrameWrite {
                    name: name.to_string(),
                    reason: "disk full".to_string(),
                });
            }
            self.frames.push((name, grid.clone()));
            Ok(())
        }
    }

    fn unique(width: u32, height: u32) -> PixelGrid {
        PixelGrid::from_fn(width, height, |x, y| Pixel::new(x as u8, y as u8, (x * 7 + y * 3) as u8))
    }

    #[test]
    fn removal_shifts_the_right_hand_side_left() {
        let grid = unique(5, 4);
        let seam = [0, 1, 2, 3];
        let narrowed = remove_vertical_seam(&grid, &seam).unwrap();
        assert_eq!(narrowed.dimensions(), (4, 4));
        for y in 0..4 {
            for x in 0..4 {
                let source = if x < seam[y as usize] { x } else { x + 1 };
                assert_eq!(narrowed[(x, y)], grid[(source, y)]);
            }
        }
    }

    #[test]
    fn bad_seams_are_refused() {
        let grid = unique(3, 3);
        assert!(remove_vertical_seam(&grid, &[0, 0]).is_err());
        assert!(remove_vertical_seam(&grid, &[0, 1, 3]).is_err());
        assert!(remove_vertical_seam(&grid, &[0, 2, 2]).is_err());
        assert!(highlight_seam(&grid, &[2, 2, 2, 2]).is_err());
    }

    #[test]
    fn highlighting_paints_only_the_seam() {
        let grid = unique(4, 3);
        let seam = [1, 2, 2];
        let highlighted = highlight_seam(&grid, &seam).unwrap();
        for y in 0..3 {
            for x in 0..4 {
                let expected = if seam[y as usize] == x { HIGHLIGHT } else { grid[(x, y)] };
                assert_eq!(highlighted[(x, y)], expected);
            }
        }
    }

    #[test]
    fn carving_takes_one_step_per_column() {
        let mut sink = Recorder::default();
        let carved = seamcarve(unique(8, 4), 3, &mut sink).unwrap();
        assert_eq!(carved.steps, 5);
        assert_eq!(carved.image.dimensions(), (3, 4));
        assert_eq!(carved.failed_frames, 0);

        let names: Vec<FrameName> = sink.frames.iter().map(|(n, _)| *n).collect();
        let mut expected = Vec::new();
        for n in 1..=5 {
            expected.push(FrameName::Highlighted(n));
            expected.push(FrameName::Resized(n));
        }
        expected.push(FrameName::Final { width: 3, height: 4 });
        assert_eq!(names, expected);

        for (name, grid) in &sink.frames {
            match name {
                FrameName::Highlighted(n) => assert_eq!(grid.width(), 9 - n),
                FrameName::Resized(n) => assert_eq!(grid.width(), 8 - n),
                FrameName::Final { .. } => assert_eq!(grid, &carved.image),
            }
        }
    }

    #[test]
    fn stepping_reaches_done_and_stays_there() {
        let mut sink = Recorder::default();
        let mut carver = SeamCarver::new(unique(4, 3), 2).unwrap();
        assert_eq!(carver.step(&mut sink).unwrap(), CarveState::Running);
        assert_eq!(carver.step(&mut sink).unwrap(), CarveState::Done);
        assert_eq!(carver.step(&mut sink).unwrap(), CarveState::Done);
        assert_eq!(carver.steps(), 2);
        assert_eq!(carver.image().width(), 2);
        assert_eq!(sink.frames.len(), 5);
    }

    #[test]
    fn out_of_range_targets_are_usage_errors() {
        for &target in &[0, 5, 9] {
            match SeamCarver::new(unique(5, 3), target) {
                Err(CarveError::Usage { .. }) => (),
                other => panic!("{} should be refused, got {:?}", target, other.is_ok()),
            }
        }
    }

    #[test]
    fn lost_intermediate_frames_do_not_stop_the_carve() {
        let mut sink = Recorder::refusing(|name| !name.is_final());
        let carved = seamcarve(unique(6, 3), 4, &mut sink).unwrap();
        assert_eq!(carved.steps, 2);
        assert_eq!(carved.failed_frames, 4);
        assert_eq!(sink.frames.len(), 1);
    }

    #[test]
    fn a_lost_final_frame_fails_the_run_but_keeps_the_image() {
        let mut sink = Recorder::refusing(|name| name.is_final());
        match seamcarve(unique(6, 3), 4, &mut sink) {
            Err(CarveError::FinalFrameWrite { name, image, .. }) => {
                assert_eq!(name, "final_resized_4x3");
                assert_eq!(image.dimensions(), (4, 3));
            }
            other => panic!("expected a final frame failure, got {:?}", other.is_ok()),
        }
    }

    // A one pixel wide line of uniform colour has no gradient along
    // itself and none across its centre, so the line's own pixels are
    // the cheapest thing in the middle row.  Cost table by hand:
    //   row 0: 1000  1000  1000  1000  1000
    //   row 1: 2000  1765  1000  1765  2000
    //   row 2: 2765  2000  2000  2000  2765
    #[test]
    fn uniform_line_follows_the_cost_table() {
        let grid = PixelGrid::from_fn(5, 3, |x, _| if x == 2 { WHITE } else { BLACK });
        let (seam, cost) = BackwardEnergy.find_vertical_seam(&grid).unwrap();
        assert_eq!(seam, [2, 2, 1]);
        assert_eq!(cost, 2000.0);

        let mut sink = Recorder::default();
        let carved = seamcarve(grid, 4, &mut sink).unwrap();
        assert_eq!(carved.image.row(0), &[BLACK, BLACK, BLACK, BLACK]);
        assert_eq!(carved.image.row(1), &[BLACK, BLACK, BLACK, BLACK]);
        assert_eq!(carved.image.row(2), &[BLACK, WHITE, BLACK, BLACK]);

        let (_, highlighted) = &sink.frames[0];
        assert_eq!(highlighted[(2, 0)], HIGHLIGHT);
        assert_eq!(highlighted[(2, 1)], HIGHLIGHT);
        assert_eq!(highlighted[(1, 2)], HIGHLIGHT);
    }

    // A line that brightens downward has a strong vertical gradient, so
    // the seam steers around it on the interior row.  Cost table:
    //   row 0: 1000  1000  1000  1000  1000
    //   row 1: 2000  1384  1765  1384  2000
    //   row 2: 2384  2384  2384  2384  2384
    #[test]
    fn graded_line_is_avoided() {
        let grey = Pixel::new(128, 128, 128);
        let grid = PixelGrid::from_fn(5, 3, |x, y| match (x, y) {
            (2, 1) => grey,
            (2, 2) => WHITE,
            _ => BLACK,
        });
        let (seam, cost) = BackwardEnergy.find_vertical_seam(&grid).unwrap();
        assert_eq!(seam, [1, 1, 0]);
        assert_eq!(cost, 2384.0);

        let mut sink = Recorder::default();
        let carved = seamcarve(grid, 4, &mut sink).unwrap();
        assert_eq!(carved.image.row(1), &[BLACK, grey, BLACK, BLACK]);
        assert_eq!(carved.image.row(2), &[BLACK, WHITE, BLACK, BLACK]);
    }
}
