//! Generate Android launcher icons for every density bucket from one SVG.
//!
//! Rasterization is delegated to Inkscape (or the built-in resvg backend),
//! WebP encoding to `cwebp` with a plain-copy fallback.

pub mod adaptive;
pub mod config;
pub mod density;
pub mod error;
pub mod generator;
pub mod logging;
pub mod preflight;
pub mod tools;

pub use config::Config;
pub use error::GenerateError;
pub use generator::{run, GenerationReport, RunError, RunOutcome};
