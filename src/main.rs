use clap::Parser;
use mipmapgen::config::{Backend, Config};
use mipmapgen::logging::init_logging;
use mipmapgen::RunError;
use std::path::PathBuf;
use std::process::ExitCode;
use tracing::error;

#[derive(Debug, Parser)]
#[command(
    name = "mipmapgen",
    version,
    about = "Generate Android launcher icons for every density from one SVG"
)]
struct Cli {
    /// Configuration file (defaults to ./mipmapgen.toml, then the user config)
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Source SVG
    #[arg(short, long, value_name = "SVG")]
    source: Option<PathBuf>,

    /// Android resource directory to write mipmap folders into
    #[arg(short = 'o', long, value_name = "DIR")]
    res_dir: Option<PathBuf>,

    /// WebP quality passed to cwebp (0-100)
    #[arg(short, long, value_parser = clap::value_parser!(u8).range(0..=100))]
    quality: Option<u8>,

    /// Rasterizer backend
    #[arg(long, value_enum)]
    backend: Option<Backend>,

    /// Keep intermediate PNG files
    #[arg(long)]
    keep_png: bool,

    /// Do not write the adaptive icon descriptors
    #[arg(long)]
    skip_adaptive: bool,

    /// Print the effective configuration as TOML and exit
    #[arg(long)]
    print_config: bool,

    /// Increase log verbosity (-v debug, -vv trace)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,
}

impl Cli {
    fn apply(&self, config: &mut Config) {
        if let Some(source) = &self.source {
            config.paths.source = source.clone();
        }
        if let Some(res_dir) = &self.res_dir {
            config.paths.res_dir = res_dir.clone();
        }
        if let Some(quality) = self.quality {
            config.tools.quality = quality;
        }
        if let Some(backend) = self.backend {
            config.tools.backend = backend;
        }
        if self.keep_png {
            config.output.keep_png = true;
        }
        if self.skip_adaptive {
            config.output.adaptive_icons = false;
        }
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging(cli.verbose);

    let mut config = match Config::load(cli.config.as_deref()) {
        Ok(config) => config,
        Err(e) => {
            error!("{}", e);
            return ExitCode::FAILURE;
        }
    };
    cli.apply(&mut config);

    if cli.print_config {
        return match config.to_toml() {
            Ok(toml) => {
                print!("{}", toml);
                ExitCode::SUCCESS
            }
            Err(e) => {
                error!("{}", e);
                ExitCode::FAILURE
            }
        };
    }

    println!("Android Icon Generator");
    println!("{}", "=".repeat(30));

    let outcome = match mipmapgen::run(&config) {
        Ok(outcome) => outcome,
        Err(RunError::Adaptive { report, source }) => {
            error!("{}", source);
            println!(
                "\n❌ {} icons written, but the adaptive icon XML files could not be created",
                report.succeeded()
            );
            return ExitCode::FAILURE;
        }
        Err(e) => {
            error!("{}", e);
            println!("\n❌ Icon generation aborted");
            return ExitCode::FAILURE;
        }
    };

    if outcome.is_success() {
        println!("\n🎉 All icons generated successfully!");
        println!("\nNext steps:");
        println!("1. Build and test your app");
        println!("2. Check icons in Android Studio's Resource Manager");
        println!("3. Test on different devices and Android versions");
        ExitCode::SUCCESS
    } else {
        for failure in &outcome.report.failed {
            println!(
                "  ✗ {} {}: {}",
                failure.density.name, failure.variant, failure.error
            );
        }
        println!("\n❌ Some icons failed to generate");
        ExitCode::FAILURE
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_cli_overrides_config() {
        let cli = Cli::parse_from([
            "mipmapgen",
            "--source",
            "logo.svg",
            "-o",
            "out/res",
            "-q",
            "70",
            "--backend",
            "resvg",
            "--keep-png",
            "--skip-adaptive",
        ]);
        let mut config = Config::default();
        cli.apply(&mut config);

        assert_eq!(config.paths.source, PathBuf::from("logo.svg"));
        assert_eq!(config.paths.res_dir, PathBuf::from("out/res"));
        assert_eq!(config.tools.quality, 70);
        assert_eq!(config.tools.backend, Backend::Resvg);
        assert!(config.output.keep_png);
        assert!(!config.output.adaptive_icons);
    }

    #[test]
    fn test_no_flags_keeps_config() {
        let cli = Cli::parse_from(["mipmapgen"]);
        let mut config = Config::default();
        cli.apply(&mut config);
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_quality_out_of_range_rejected() {
        assert!(Cli::try_parse_from(["mipmapgen", "-q", "150"]).is_err());
    }
}
