// External tool invocation shared by the rasterizer and compressor backends

mod compressor;
mod rasterizer;

pub use compressor::{compress_or_copy, CompressOutcome, Compressor, CwebpCompressor};
pub use rasterizer::{InkscapeRasterizer, Rasterizer, ResvgRasterizer};

use crate::error::GenerateError;
use std::ffi::OsStr;
use std::path::Path;
use std::process::{Command, Output};
use tracing::debug;

/// A command prefix: the program plus any leading arguments
/// (for example `flatpak run org.inkscape.Inkscape`).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ToolCommand {
    program: String,
    prefix_args: Vec<String>,
}

impl ToolCommand {
    pub fn new(program: impl Into<String>) -> Self {
        Self {
            program: program.into(),
            prefix_args: Vec::new(),
        }
    }

    /// Build from an argv-style list. Returns None for an empty list.
    pub fn from_argv(argv: &[String]) -> Option<Self> {
        let (program, rest) = argv.split_first()?;
        if program.trim().is_empty() {
            return None;
        }
        Some(Self {
            program: program.clone(),
            prefix_args: rest.to_vec(),
        })
    }

    /// Short name used in log lines and error messages. For a wrapped
    /// install this is the last prefix argument, not the wrapper.
    pub fn name(&self) -> &str {
        let target = self.prefix_args.last().unwrap_or(&self.program);
        Path::new(target)
            .file_name()
            .and_then(|n| n.to_str())
            .unwrap_or(target)
    }

    /// Run the tool to completion with captured output. A non-zero exit is an error.
    pub fn run<I, S>(&self, args: I) -> Result<Output, GenerateError>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<OsStr>,
    {
        let mut command = Command::new(&self.program);
        command.args(&self.prefix_args).args(args);
        debug!("running {:?}", command);

        let output = command.output().map_err(|e| GenerateError::Spawn {
            tool: self.name().to_string(),
            source: e,
        })?;

        if output.status.success() {
            Ok(output)
        } else {
            Err(GenerateError::ToolFailed {
                tool: self.name().to_string(),
                status: output.status,
                stderr: String::from_utf8_lossy(&output.stderr).trim().to_string(),
            })
        }
    }

    /// Ask the tool for its version to confirm it can be launched
    pub fn probe_version(&self) -> Result<String, GenerateError> {
        match self.run(["--version"]) {
            Ok(output) => Ok(String::from_utf8_lossy(&output.stdout).trim().to_string()),
            Err(GenerateError::Spawn { tool, source }) => Err(GenerateError::MissingTool {
                tool,
                reason: source.to_string(),
            }),
            Err(GenerateError::ToolFailed { tool, status, .. }) => {
                Err(GenerateError::MissingTool {
                    tool,
                    reason: format!("version query exited with {}", status),
                })
            }
            Err(e) => Err(e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_argv() {
        let argv = vec![
            "flatpak".to_string(),
            "run".to_string(),
            "org.inkscape.Inkscape".to_string(),
        ];
        let cmd = ToolCommand::from_argv(&argv).unwrap();
        assert_eq!(cmd.name(), "org.inkscape.Inkscape");
        assert_eq!(cmd.prefix_args, vec!["run", "org.inkscape.Inkscape"]);

        assert!(ToolCommand::from_argv(&[]).is_none());
        assert!(ToolCommand::from_argv(&[" ".to_string()]).is_none());
    }

    #[test]
    fn test_name_strips_directories() {
        let cmd = ToolCommand::new("/usr/local/bin/cwebp");
        assert_eq!(cmd.name(), "cwebp");
    }

    #[test]
    fn test_wrapped_tool_named_in_errors() {
        let argv = vec![
            "mipmapgen-no-flatpak".to_string(),
            "run".to_string(),
            "org.inkscape.Inkscape".to_string(),
        ];
        let err = ToolCommand::from_argv(&argv)
            .unwrap()
            .probe_version()
            .unwrap_err();
        assert!(err.to_string().starts_with("org.inkscape.Inkscape is required"));
    }

    #[test]
    fn test_missing_program_is_missing_tool() {
        let cmd = ToolCommand::new("mipmapgen-no-such-tool");
        let err = cmd.probe_version().unwrap_err();
        assert!(matches!(err, GenerateError::MissingTool { .. }));
        assert!(err.is_fatal());
    }

    #[cfg(unix)]
    #[test]
    fn test_failing_program_reports_stderr() {
        let argv = vec![
            "sh".to_string(),
            "-c".to_string(),
            "echo broken >&2; exit 3".to_string(),
            "fake-tool".to_string(),
        ];
        let cmd = ToolCommand::from_argv(&argv).unwrap();
        match cmd.run(std::iter::empty::<&str>()) {
            Err(GenerateError::ToolFailed { tool, stderr, .. }) => {
                assert_eq!(tool, "fake-tool");
                assert_eq!(stderr, "broken");
            }
            other => panic!("unexpected result: {:?}", other),
        }
    }
}
