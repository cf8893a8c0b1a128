//! PNG snapshots of a history.
//!
//! Feature-gated behind `png` (default on) so that consumers that only need
//! archives and reports do not pull in the `image` crate.

use std::path::Path;

use cellsim_core::{AutomataError, History};

use crate::ensure_parent_dir;
use crate::pixel::{history_raster, raster_to_rgba};

/// Writes a grayscale PNG of `history` (see [`history_raster`]).
///
/// Returns `AutomataError::Configuration` if the raster does not fit in `u32`
/// dimensions, or `AutomataError::Io` on encode or write failure.
pub fn write_png(history: &History, path: &Path) -> Result<(), AutomataError> {
    let raster = history_raster(history)?;
    let w = u32::try_from(raster.width)
        .map_err(|_| AutomataError::Configuration("snapshot too wide for PNG".into()))?;
    let h = u32::try_from(raster.height)
        .map_err(|_| AutomataError::Configuration("snapshot too tall for PNG".into()))?;
    let img = image::RgbaImage::from_raw(w, h, raster_to_rgba(&raster))
        .ok_or_else(|| AutomataError::Io("RGBA buffer size mismatch".into()))?;

    ensure_parent_dir(path)?;
    img.save(path).map_err(|e| AutomataError::Io(e.to_string()))?;
    tracing::debug!(path = %path.display(), width = w, height = h, "wrote snapshot");
    Ok(())
}
