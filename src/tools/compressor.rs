// PNG to WebP compression with a copy fallback

use super::ToolCommand;
use crate::error::GenerateError;
use std::ffi::OsString;
use std::fs;
use std::path::Path;
use tracing::warn;

/// How a WebP output was produced
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CompressOutcome {
    /// The compressor produced a real WebP file
    Compressed,
    /// The compressor was unavailable or failed; the PNG bytes were copied.
    /// Android accepts PNG data under a `.webp` name.
    Copied,
}

pub trait Compressor {
    fn name(&self) -> &str;

    fn compress(&self, png: &Path, webp: &Path) -> Result<(), GenerateError>;
}

/// Lossy WebP encoding through `cwebp -q <quality> <in> -o <out>`.
pub struct CwebpCompressor {
    command: ToolCommand,
    quality: u8,
}

impl CwebpCompressor {
    pub const DEFAULT_QUALITY: u8 = 90;

    pub fn new(command: ToolCommand, quality: u8) -> Self {
        Self { command, quality }
    }

    fn args(&self, png: &Path, webp: &Path) -> Vec<OsString> {
        vec![
            OsString::from("-q"),
            OsString::from(self.quality.to_string()),
            png.as_os_str().to_os_string(),
            OsString::from("-o"),
            webp.as_os_str().to_os_string(),
        ]
    }
}

impl Default for CwebpCompressor {
    fn default() -> Self {
        Self::new(ToolCommand::new("cwebp"), Self::DEFAULT_QUALITY)
    }
}

impl Compressor for CwebpCompressor {
    fn name(&self) -> &str {
        self.command.name()
    }

    fn compress(&self, png: &Path, webp: &Path) -> Result<(), GenerateError> {
        self.command.run(self.args(png, webp))?;
        Ok(())
    }
}

/// Compress `png` into `webp`, falling back to a byte copy when the
/// compressor cannot be used. Only a failed copy is an error.
pub fn compress_or_copy(
    compressor: &dyn Compressor,
    png: &Path,
    webp: &Path,
) -> Result<CompressOutcome, GenerateError> {
    match compressor.compress(png, webp) {
        Ok(()) => Ok(CompressOutcome::Compressed),
        Err(e) => {
            warn!("{} could not compress ({}), copying PNG data as WebP", compressor.name(), e);
            fs::copy(png, webp).map_err(|e| GenerateError::io("copy to", webp, e))?;
            Ok(CompressOutcome::Copied)
        }
    }
}
