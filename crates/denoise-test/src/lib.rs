//! denoise-test - Regression test framework for the denoise workspace
//!
//! Modeled on a classic image-library regression harness, with two modes:
//!
//! - **Compare**: Check computed values and images against expectations
//! - **Display**: Additionally write intermediate images to `tests/regout`
//!   for visual inspection
//!
//! # Usage
//!
//! ```ignore
//! use denoise_test::{RegParams, generators};
//!
//! let mut rp = RegParams::new("cross_bilateral");
//! rp.compare_values(64.0, out.width() as f64, 0.0);
//! rp.compare_images(&expected, &out, 1e-5);
//! assert!(rp.cleanup());
//! ```
//!
//! # Environment Variables
//!
//! - `REGTEST_MODE`: Set to "compare" or "display"

mod error;
pub mod generators;
mod params;

pub use error::{TestError, TestResult};
pub use params::{RegParams, RegTestMode};

/// Get the path to the workspace root
fn workspace_root() -> String {
    let manifest_dir = env!("CARGO_MANIFEST_DIR");
    // denoise-test is at crates/denoise-test, so go up two directories
    format!("{}/../..", manifest_dir)
}

/// Get the path to the regout (regression output) directory
pub fn regout_dir() -> String {
    format!("{}/tests/regout", workspace_root())
}

/// Get a scratch path under the regout directory
///
/// The directory is created if needed.
pub fn regout_path(name: &str) -> TestResult<String> {
    let dir = regout_dir();
    std::fs::create_dir_all(&dir).map_err(|e| TestError::DirectoryCreate {
        path: dir.clone(),
        message: e.to_string(),
    })?;
    Ok(format!("{}/{}", dir, name))
}
