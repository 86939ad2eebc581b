// Icon generation loop: rasterize, compress, clean up, count

use crate::adaptive;
use crate::config::{Config, ConfigError};
use crate::density::{Density, IconVariant, DENSITIES};
use crate::error::GenerateError;
use crate::preflight;
use crate::tools::{compress_or_copy, CompressOutcome, Compressor, Rasterizer};
use bytesize::ByteSize;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, error, info, warn};

/// Where to read the source and write the icons
#[derive(Clone, Debug)]
pub struct GeneratorOptions {
    pub source: PathBuf,
    pub res_dir: PathBuf,
    pub keep_png: bool,
}

impl From<&Config> for GeneratorOptions {
    fn from(config: &Config) -> Self {
        Self {
            source: config.paths.source.clone(),
            res_dir: config.paths.res_dir.clone(),
            keep_png: config.output.keep_png,
        }
    }
}

/// One icon written to disk
#[derive(Clone, Debug)]
pub struct GeneratedIcon {
    pub density: Density,
    pub variant: IconVariant,
    pub path: PathBuf,
    pub outcome: CompressOutcome,
    pub bytes: u64,
}

/// One icon that could not be produced
#[derive(Debug)]
pub struct FailedIcon {
    pub density: Density,
    pub variant: IconVariant,
    pub error: GenerateError,
}

/// Result of a generation pass
#[derive(Debug, Default)]
pub struct GenerationReport {
    pub generated: Vec<GeneratedIcon>,
    pub failed: Vec<FailedIcon>,
}

impl GenerationReport {
    pub fn succeeded(&self) -> usize {
        self.generated.len()
    }

    pub fn attempted(&self) -> usize {
        self.generated.len() + self.failed.len()
    }

    /// True only when every attempted icon was produced
    pub fn is_success(&self) -> bool {
        self.failed.is_empty()
    }

    pub fn total_bytes(&self) -> u64 {
        self.generated.iter().map(|icon| icon.bytes).sum()
    }

    pub fn summary(&self) -> String {
        format!(
            "Generation complete: {}/{} icons generated successfully ({})",
            self.succeeded(),
            self.attempted(),
            ByteSize(self.total_bytes())
        )
    }
}

pub struct IconGenerator<'a> {
    rasterizer: &'a dyn Rasterizer,
    compressor: &'a dyn Compressor,
    options: GeneratorOptions,
}

impl<'a> IconGenerator<'a> {
    pub fn new(
        rasterizer: &'a dyn Rasterizer,
        compressor: &'a dyn Compressor,
        options: GeneratorOptions,
    ) -> Self {
        Self {
            rasterizer,
            compressor,
            options,
        }
    }

    /// Run the preflight checks, then generate every density and variant.
    ///
    /// A missing rasterizer or source aborts before any directory is created.
    /// Individual icon failures are recorded in the report and do not stop
    /// the loop.
    pub fn generate(&self) -> Result<GenerationReport, GenerateError> {
        preflight::check_dependencies(self.rasterizer)?;
        preflight::check_source(&self.options.source)?;

        let mut report = GenerationReport::default();
        for density in DENSITIES {
            let dir = density.output_dir(&self.options.res_dir);
            if let Err(e) = fs::create_dir_all(&dir) {
                error!("✗ Failed to create {}: {}", dir.display(), e);
                for variant in IconVariant::ALL {
                    let source = io::Error::new(e.kind(), e.to_string());
                    report.failed.push(FailedIcon {
                        density,
                        variant,
                        error: GenerateError::io("create directory", &dir, source),
                    });
                }
                continue;
            }

            for variant in IconVariant::ALL {
                match self.generate_icon(density, variant, &dir) {
                    Ok(icon) => report.generated.push(icon),
                    Err(e) => {
                        error!("✗ Failed to generate {} {} icon: {}", density.name, variant, e);
                        report.failed.push(FailedIcon {
                            density,
                            variant,
                            error: e,
                        });
                    }
                }
            }
        }

        info!("{}", report.summary());
        Ok(report)
    }

    fn generate_icon(
        &self,
        density: Density,
        variant: IconVariant,
        dir: &Path,
    ) -> Result<GeneratedIcon, GenerateError> {
        let png = dir.join(variant.png_name());
        let webp = dir.join(variant.webp_name());

        self.rasterizer
            .rasterize(&self.options.source, &png, density.size)?;
        info!("✓ Generated {} ({}x{})", png.display(), density.size, density.size);

        let outcome = compress_or_copy(self.compressor, &png, &webp)?;
        let bytes = fs::metadata(&webp)
            .map_err(|e| GenerateError::io("inspect", &webp, e))?
            .len();
        match outcome {
            CompressOutcome::Compressed => {
                info!("✓ Generated WebP: {} ({})", webp.display(), ByteSize(bytes))
            }
            CompressOutcome::Copied => {
                info!("✓ Copied as WebP: {} ({})", webp.display(), ByteSize(bytes))
            }
        }

        if !self.options.keep_png {
            remove_intermediate(&png)?;
        }

        Ok(GeneratedIcon {
            density,
            variant,
            path: webp,
            outcome,
            bytes,
        })
    }
}

/// Delete an intermediate PNG. A file that is already gone is not an error.
fn remove_intermediate(png: &Path) -> Result<(), GenerateError> {
    match fs::remove_file(png) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == io::ErrorKind::NotFound => {
            warn!("intermediate {} was already removed", png.display());
            Ok(())
        }
        Err(e) => Err(GenerateError::io("remove", png, e)),
    }
}

#[derive(Debug, Error)]
pub enum RunError {
    #[error(transparent)]
    Config(#[from] ConfigError),
    #[error(transparent)]
    Generate(#[from] GenerateError),
    /// Every icon was written but the descriptors were not
    #[error("adaptive icon descriptors not written: {source}")]
    Adaptive {
        report: GenerationReport,
        #[source]
        source: GenerateError,
    },
}

/// Everything a full run produced
#[derive(Debug)]
pub struct RunOutcome {
    pub report: GenerationReport,
    /// Adaptive descriptors written, empty when skipped or when generation failed
    pub descriptors: Vec<PathBuf>,
}

impl RunOutcome {
    pub fn is_success(&self) -> bool {
        self.report.is_success()
    }
}

/// Full pipeline: preflight, generation loop, then the adaptive descriptors
/// when every icon succeeded.
pub fn run(config: &Config) -> Result<RunOutcome, RunError> {
    config.validate()?;
    let rasterizer = config.rasterizer()?;
    let compressor = config.compressor()?;
    debug!(
        "rasterizer: {}, compressor: {}",
        rasterizer.name(),
        compressor.name()
    );

    let generator = IconGenerator::new(
        rasterizer.as_ref(),
        compressor.as_ref(),
        GeneratorOptions::from(config),
    );
    let report = generator.generate()?;

    let descriptors = if report.is_success() && config.output.adaptive_icons {
        match adaptive::write_adaptive_icons(&config.paths.res_dir) {
            Ok(paths) => paths,
            Err(source) => return Err(RunError::Adaptive { report, source }),
        }
    } else {
        Vec::new()
    };

    Ok(RunOutcome {
        report,
        descriptors,
    })
}
