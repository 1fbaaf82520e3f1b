use std::fs;
use std::path::{Path, PathBuf};

use rand::Rng;
use tracing::info;

use crate::blob::generate;
use crate::error::{BlobError, Result};
use crate::mask::{Mask, Palette};
use crate::params::BlobParams;

/// Writes masks as `blob1.png`, `blob2.png`, ... into one directory.
#[derive(Debug, Clone)]
pub struct BlobWriter {
    dir: PathBuf,
    palette: Palette,
}

impl BlobWriter {
    /// Create `dir` (and its parents) when it does not exist yet.
    pub fn create(dir: impl Into<PathBuf>, palette: Palette) -> Result<Self> {
        let dir = dir.into();
        fs::create_dir_all(&dir).map_err(|source| BlobError::Io {
            path: dir.clone(),
            source,
        })?;
        Ok(BlobWriter { dir, palette })
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }

    /// Path of the file holding blob `index` (1-based).
    pub fn path_for(&self, index: usize) -> PathBuf {
        self.dir.join(format!("blob{}.png", index))
    }

    pub fn write(&self, index: usize, mask: &Mask) -> Result<PathBuf> {
        let path = self.path_for(index);
        mask.to_image(self.palette)
            .save(&path)
            .map_err(|source| BlobError::Image {
                path: path.clone(),
                source,
            })?;
        info!(path = %path.display(), "saved blob");
        Ok(path)
    }

    /// Write every mask in order, numbering from 1. Stops at the first failure.
    pub fn write_all(&self, masks: &[Mask]) -> Result<Vec<PathBuf>> {
        masks
            .iter()
            .enumerate()
            .map(|(i, mask)| self.write(i + 1, mask))
            .collect()
    }

    /// Generate `count` blobs and write each one before the next is drawn,
    /// so only one mask is held at a time. `on_blob` sees every mask before
    /// it is saved. Returns the number of files written.
    pub fn write_generated<R, F>(
        &self,
        count: usize,
        params: &BlobParams,
        rng: &mut R,
        mut on_blob: F,
    ) -> Result<usize>
    where
        R: Rng + ?Sized,
        F: FnMut(usize, &Mask),
    {
        params.validate()?;
        for index in 1..=count {
            let mask = generate(params, &mut *rng)?;
            on_blob(index, &mask);
            self.write(index, &mask)?;
        }
        Ok(count)
    }
}
