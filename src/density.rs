// Density buckets and launcher icon variants

use std::fmt;
use std::path::{Path, PathBuf};

/// A pixel-density bucket and the square icon size Android expects for it.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Density {
    pub name: &'static str,
    pub size: u32,
}

/// Every bucket a launcher icon is generated for, smallest first.
pub const DENSITIES: [Density; 5] = [
    Density { name: "mdpi", size: 48 },
    Density { name: "hdpi", size: 72 },
    Density { name: "xhdpi", size: 96 },
    Density { name: "xxhdpi", size: 144 },
    Density { name: "xxxhdpi", size: 192 },
];

impl Density {
    pub fn dir_name(&self) -> String {
        format!("mipmap-{}", self.name)
    }

    /// Directory under the resource root that holds this bucket's icons
    pub fn output_dir(&self, res_dir: &Path) -> PathBuf {
        res_dir.join(self.dir_name())
    }
}

impl fmt::Display for Density {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} ({}x{})", self.name, self.size, self.size)
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum IconVariant {
    Regular,
    Round,
}

impl IconVariant {
    pub const ALL: [IconVariant; 2] = [IconVariant::Regular, IconVariant::Round];

    pub fn base_name(self) -> &'static str {
        match self {
            IconVariant::Regular => "ic_launcher",
            IconVariant::Round => "ic_launcher_round",
        }
    }

    /// Intermediate raster file name
    pub fn png_name(self) -> String {
        format!("{}.png", self.base_name())
    }

    pub fn webp_name(self) -> String {
        format!("{}.webp", self.base_name())
    }
}

impl fmt::Display for IconVariant {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            IconVariant::Regular => write!(f, "regular"),
            IconVariant::Round => write!(f, "round"),
        }
    }
}
