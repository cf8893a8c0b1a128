#![deny(unsafe_code)]
//! Persistence for cellsim runs: JSON history archives, run reports and
//! grayscale PNG snapshots.
//!
//! The pixel conversion in [`pixel`] is always available; writing PNG files
//! needs the `png` feature (default on).

pub mod archive;
pub mod pixel;
pub mod report;

#[cfg(feature = "png")]
pub mod snapshot;

use std::path::Path;

use cellsim_core::AutomataError;

pub use archive::{load_history, load_meta, save_history};
pub use report::{write_report, RunReport};

/// Creates the parent directory of `path` if it has one.
pub(crate) fn ensure_parent_dir(path: &Path) -> Result<(), AutomataError> {
    match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => {
            std::fs::create_dir_all(parent)?;
            Ok(())
        }
        _ => Ok(()),
    }
}
