// Checks that must pass before any output is written

use crate::error::GenerateError;
use crate::tools::Rasterizer;
use std::path::Path;

/// Installation hints printed when Inkscape cannot be found
pub const INSTALL_GUIDANCE: &str = "\
Please install Inkscape:
  macOS: brew install inkscape
  Ubuntu: sudo apt install inkscape
  Windows: Download from https://inkscape.org/";

/// One-shot probe of the rasterizer. On failure the installation hints are
/// written to stderr and the error is returned for the caller to report.
pub fn check_dependencies(rasterizer: &dyn Rasterizer) -> Result<(), GenerateError> {
    if let Err(e) = rasterizer.check_available() {
        eprintln!("{}", INSTALL_GUIDANCE);
        return Err(e);
    }
    Ok(())
}

pub fn check_source(svg: &Path) -> Result<(), GenerateError> {
    if svg.is_file() {
        Ok(())
    } else {
        Err(GenerateError::SourceNotFound(svg.to_path_buf()))
    }
}
