// SVG to PNG rasterizer backends

use super::ToolCommand;
use crate::error::GenerateError;
use std::ffi::OsString;
use std::fs;
use std::path::Path;

/// A backend that turns the source SVG into a square PNG.
pub trait Rasterizer {
    /// Name of this backend (for logging and the dependency check)
    fn name(&self) -> &str;

    /// Confirm the backend can run before any output is written
    fn check_available(&self) -> Result<(), GenerateError>;

    /// Render `svg` into a `size`x`size` PNG at `png`
    fn rasterize(&self, svg: &Path, png: &Path, size: u32) -> Result<(), GenerateError>;
}

/// Shells out to Inkscape's command-line exporter.
pub struct InkscapeRasterizer {
    command: ToolCommand,
}

impl InkscapeRasterizer {
    pub fn new(command: ToolCommand) -> Self {
        Self { command }
    }

    /// Paths are passed through as OS strings so non-UTF-8 names survive
    fn export_args(svg: &Path, png: &Path, size: u32) -> Vec<OsString> {
        let mut export_filename = OsString::from("--export-filename=");
        export_filename.push(png);
        vec![
            OsString::from("--export-type=png"),
            export_filename,
            OsString::from(format!("--export-width={}", size)),
            OsString::from(format!("--export-height={}", size)),
            svg.as_os_str().to_os_string(),
        ]
    }
}

impl Default for InkscapeRasterizer {
    fn default() -> Self {
        Self::new(ToolCommand::new("inkscape"))
    }
}

impl Rasterizer for InkscapeRasterizer {
    fn name(&self) -> &str {
        self.command.name()
    }

    fn check_available(&self) -> Result<(), GenerateError> {
        let version = self.command.probe_version()?;
        tracing::debug!("found {}", version);
        Ok(())
    }

    fn rasterize(&self, svg: &Path, png: &Path, size: u32) -> Result<(), GenerateError> {
        self.command.run(Self::export_args(svg, png, size))?;
        Ok(())
    }
}

/// Renders in-process with resvg. Always available.
pub struct ResvgRasterizer;

impl ResvgRasterizer {
    pub fn new() -> Self {
        Self
    }
}

impl Default for ResvgRasterizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Rasterizer for ResvgRasterizer {
    fn name(&self) -> &str {
        "resvg"
    }

    fn check_available(&self) -> Result<(), GenerateError> {
        Ok(())
    }

    fn rasterize(&self, svg: &Path, png: &Path, size: u32) -> Result<(), GenerateError> {
        let render_err = |message: String| GenerateError::Render {
            path: svg.to_path_buf(),
            message,
        };

        let svg_data = fs::read(svg).map_err(|e| GenerateError::io("read", svg, e))?;
        let opts = usvg::Options::default();
        let tree = usvg::Tree::from_data(&svg_data, &opts).map_err(|e| render_err(e.to_string()))?;

        let mut pixmap = tiny_skia::Pixmap::new(size, size)
            .ok_or_else(|| render_err(format!("invalid target size {}", size)))?;

        // Fit the drawing into the square, keeping its aspect ratio and centring it
        let svg_size = tree.size();
        let scale_x = size as f32 / svg_size.width();
        let scale_y = size as f32 / svg_size.height();
        let scale = scale_x.min(scale_y);
        let dx = (size as f32 - svg_size.width() * scale) / 2.0;
        let dy = (size as f32 - svg_size.height() * scale) / 2.0;

        let transform = tiny_skia::Transform::from_scale(scale, scale).post_translate(dx, dy);
        resvg::render(&tree, transform, &mut pixmap.as_mut());

        pixmap
            .save_png(png)
            .map_err(|e| render_err(format!("could not write {}: {}", png.display(), e)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const SQUARE_SVG: &str = r##"<svg xmlns="http://www.w3.org/2000/svg" width="100" height="100" viewBox="0 0 100 100">
  <rect width="100" height="100" fill="#3ddc84"/>
</svg>"##;

    #[test]
    fn test_inkscape_export_args() {
        let args = InkscapeRasterizer::export_args(
            Path::new("icon.svg"),
            Path::new("res/mipmap-mdpi/ic_launcher.png"),
            48,
        );
        assert_eq!(
            args,
            vec![
                "--export-type=png",
                "--export-filename=res/mipmap-mdpi/ic_launcher.png",
                "--export-width=48",
                "--export-height=48",
                "icon.svg",
            ]
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_export_args_keep_non_utf8_bytes() {
        use std::ffi::OsStr;
        use std::os::unix::ffi::OsStrExt;

        let png = Path::new(OsStr::from_bytes(b"res\xff/ic_launcher.png"));
        let svg = Path::new(OsStr::from_bytes(b"icon\xfe.svg"));
        let args = InkscapeRasterizer::export_args(svg, png, 48);

        assert_eq!(args[1].as_bytes(), b"--export-filename=res\xff/ic_launcher.png");
        assert_eq!(args[4].as_bytes(), b"icon\xfe.svg");
    }

    #[test]
    fn test_missing_inkscape_is_reported() {
        let rasterizer = InkscapeRasterizer::new(ToolCommand::new("mipmapgen-no-inkscape"));
        assert!(matches!(
            rasterizer.check_available(),
            Err(GenerateError::MissingTool { .. })
        ));
    }

    #[test]
    fn test_resvg_renders_requested_size() {
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("icon.svg");
        let png = dir.path().join("icon.png");
        fs::write(&svg, SQUARE_SVG).unwrap();

        ResvgRasterizer::new().rasterize(&svg, &png, 72).unwrap();

        let pixmap = tiny_skia::Pixmap::load_png(&png).unwrap();
        assert_eq!((pixmap.width(), pixmap.height()), (72, 72));
    }

    #[test]
    fn test_resvg_rejects_invalid_svg() {
        let dir = tempfile::tempdir().unwrap();
        let svg = dir.path().join("broken.svg");
        fs::write(&svg, "this is not svg").unwrap();

        let err = ResvgRasterizer::new()
            .rasterize(&svg, &dir.path().join("out.png"), 48)
            .unwrap_err();
        assert!(matches!(err, GenerateError::Render { .. }));
    }
}
