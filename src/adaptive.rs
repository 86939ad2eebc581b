// Adaptive icon descriptors (API 26+)

use crate::error::GenerateError;
use std::fs;
use std::path::{Path, PathBuf};

/// Density-independent directory the descriptors live in
pub const ADAPTIVE_DIR: &str = "mipmap-anydpi-v26";

pub const BACKGROUND_DRAWABLE: &str = "ic_launcher_background";
pub const FOREGROUND_DRAWABLE: &str = "ic_launcher_foreground";

/// Descriptor file names, one per launcher variant
pub const DESCRIPTOR_FILES: [&str; 2] = ["ic_launcher.xml", "ic_launcher_round.xml"];

pub fn adaptive_icon_xml() -> String {
    format!(
        r#"<?xml version="1.0" encoding="utf-8"?>
<adaptive-icon xmlns:android="http://schemas.android.com/apk/res/android">
    <background android:drawable="@drawable/{}" />
    <foreground android:drawable="@drawable/{}" />
</adaptive-icon>
"#,
        BACKGROUND_DRAWABLE, FOREGROUND_DRAWABLE
    )
}

/// Write both descriptors under `res_dir`, replacing any existing ones.
/// The referenced drawables are not checked.
pub fn write_adaptive_icons(res_dir: &Path) -> Result<Vec<PathBuf>, GenerateError> {
    let dir = res_dir.join(ADAPTIVE_DIR);
    fs::create_dir_all(&dir).map_err(|e| GenerateError::io("create directory", &dir, e))?;

    let xml = adaptive_icon_xml();
    let mut written = Vec::with_capacity(DESCRIPTOR_FILES.len());
    for name in DESCRIPTOR_FILES {
        let path = dir.join(name);
        fs::write(&path, &xml).map_err(|e| GenerateError::io("write", &path, e))?;
        written.push(path);
    }

    tracing::info!("✓ Created adaptive icon XML files in {}", dir.display());
    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_writes_two_descriptors() {
        let dir = tempfile::tempdir().unwrap();
        let written = write_adaptive_icons(dir.path()).unwrap();

        assert_eq!(written.len(), 2);
        let entries = fs::read_dir(dir.path().join(ADAPTIVE_DIR)).unwrap().count();
        assert_eq!(entries, 2);

        for path in written {
            let contents = fs::read_to_string(&path).unwrap();
            assert!(contents.contains("@drawable/ic_launcher_background"));
            assert!(contents.contains("@drawable/ic_launcher_foreground"));
        }
    }

    #[test]
    fn test_overwrites_existing_descriptor() {
        let dir = tempfile::tempdir().unwrap();
        let adaptive = dir.path().join(ADAPTIVE_DIR);
        fs::create_dir_all(&adaptive).unwrap();
        fs::write(adaptive.join("ic_launcher.xml"), "stale").unwrap();

        write_adaptive_icons(dir.path()).unwrap();

        let contents = fs::read_to_string(adaptive.join("ic_launcher.xml")).unwrap();
        assert_eq!(contents, adaptive_icon_xml());
    }
}
