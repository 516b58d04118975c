//! Sinks for optimization snapshots.

use std::fs;
use std::path::PathBuf;

use crate::codec::ImageBytes;
use crate::IntrospectError;

/// Receives snapshots of the observation being optimized.
///
/// Calls are synchronous. A failing sink does not stop the optimization; the
/// caller logs the error and carries on.
pub trait Visualizer {
    fn show(&mut self, iteration: usize, image: &ImageBytes) -> Result<(), IntrospectError>;
}

/// Drops every snapshot, for headless runs.
#[derive(Default)]
pub struct NullVisualizer;

impl Visualizer for NullVisualizer {
    fn show(&mut self, _iteration: usize, _image: &ImageBytes) -> Result<(), IntrospectError> {
        Ok(())
    }
}

/// Writes each snapshot to `<dir>/step_<iteration>.png`.
pub struct PngVisualizer {
    dir: PathBuf,
}

impl PngVisualizer {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn path_for(&self, iteration: usize) -> PathBuf {
        self.dir.join(format!("step_{iteration:06}.png"))
    }
}

impl Visualizer for PngVisualizer {
    fn show(&mut self, iteration: usize, image: &ImageBytes) -> Result<(), IntrospectError> {
        fs::create_dir_all(&self.dir)?;
        let path = self.path_for(iteration);
        image.to_dynamic_image()?.save(&path)?;
        tracing::debug!(path = %path.display(), "wrote snapshot");
        Ok(())
    }
}

/// Keeps every snapshot in memory.
#[derive(Default)]
pub struct RecordingVisualizer {
    pub frames: Vec<(usize, ImageBytes)>,
}

impl Visualizer for RecordingVisualizer {
    fn show(&mut self, iteration: usize, image: &ImageBytes) -> Result<(), IntrospectError> {
        self.frames.push((iteration, image.clone()));
        Ok(())
    }
}
