//! Pure-computation conversion from a [`History`] to a grayscale raster.
//!
//! Always available (no feature gate); the `png` snapshot path encodes the
//! RGBA buffer produced here.

use cellsim_core::{AutomataError, Grid, History};

/// Row-major intensities in `[0, 1]`.
#[derive(Debug, Clone, PartialEq)]
pub struct Raster {
    pub width: usize,
    pub height: usize,
    pub intensity: Vec<f64>,
}

/// Chooses what a snapshot shows.
///
/// A 1-D history becomes a space-time diagram with one row per frame, time
/// running downwards. A 2-D history shows its final frame. Multi-channel
/// frames show channel 0. Discrete states are scaled by the largest state
/// present (an all-zero raster stays black); continuous values are clamped.
pub fn history_raster(history: &History) -> Result<Raster, AutomataError> {
    let first = history.first();
    let frames: Vec<&Grid> = if first.dimensionality() == 1 {
        history.iter().collect()
    } else {
        vec![history.last()]
    };

    let mut intensity = Vec::with_capacity(frames.len() * first.cell_count());
    for frame in &frames {
        intensity.extend(frame.channel(0)?);
    }
    if first.is_discrete() {
        let top = intensity.iter().copied().fold(0.0_f64, f64::max);
        if top > 0.0 {
            intensity.iter_mut().for_each(|v| *v /= top);
        }
    } else {
        intensity.iter_mut().for_each(|v| *v = v.clamp(0.0, 1.0));
    }

    Ok(Raster {
        width: first.width(),
        height: frames.len() * first.height(),
        intensity,
    })
}

/// Gray RGBA8 buffer of length `width * height * 4`, alpha always 255.
pub fn raster_to_rgba(raster: &Raster) -> Vec<u8> {
    raster
        .intensity
        .iter()
        .flat_map(|&t| {
            let g = (t * 255.0).round() as u8;
            [g, g, g, 255u8]
        })
        .collect()
}
