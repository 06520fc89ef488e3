//! Generator configuration.
//!
//! Every path and size table the generator touches lives here instead of in
//! module-level constants, so callers (and tests) can point a run at any
//! directory. A JSON file may override any subset of the defaults.

use crate::error::{IconError, Result};
use image::Rgba;
use serde::{Deserialize, Serialize};
use std::{
    path::{Path, PathBuf},
    str::FromStr,
};

/// Filenames written for every launcher density. All three receive the
/// same encoded image.
pub const LAUNCHER_VARIANTS: [&str; 3] = [
    "ic_launcher.png",
    "ic_launcher_round.png",
    "ic_launcher_foreground.png",
];

/// One launcher density bucket.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TargetSize {
    pub density: String,
    pub size: u32,
}

impl TargetSize {
    pub fn new(density: &str, size: u32) -> Self {
        Self {
            density: density.to_string(),
            size,
        }
    }

    /// Directory name under the output base, e.g. `mipmap-xhdpi`.
    pub fn dir_name(&self) -> String {
        format!("mipmap-{}", self.density)
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct GeneratorConfig {
    /// Checked in order; the first existing path is used.
    pub source_candidates: Vec<PathBuf>,
    pub output_base: PathBuf,
    pub sizes: Vec<TargetSize>,
    /// Render the procedural design when no source candidate exists.
    pub allow_procedural_fallback: bool,
    /// Canvas multiple used for procedural rendering before downsampling.
    pub supersample: u32,
    /// CSS colour of the procedural background layer.
    pub background: String,
    pub web: WebConfig,
    pub standalone: StandaloneConfig,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            source_candidates: vec![
                PathBuf::from("/storage/emulated/0/Pictures/recipe.png"),
                PathBuf::from("assets/recipe.png"),
            ],
            output_base: PathBuf::from("android/app/src/main/res"),
            sizes: vec![
                TargetSize::new("mdpi", 48),
                TargetSize::new("hdpi", 72),
                TargetSize::new("xhdpi", 96),
                TargetSize::new("xxhdpi", 144),
                TargetSize::new("xxxhdpi", 192),
            ],
            allow_procedural_fallback: false,
            supersample: 4,
            background: "#FF6B35".to_string(),
            web: WebConfig::default(),
            standalone: StandaloneConfig::default(),
        }
    }
}

/// PWA icon set written next to a web manifest.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct WebConfig {
    pub source_candidates: Vec<PathBuf>,
    pub icons_dir: PathBuf,
    pub sizes: Vec<u32>,
    pub manifest: PathBuf,
    pub html: PathBuf,
}

impl Default for WebConfig {
    fn default() -> Self {
        Self {
            source_candidates: vec![PathBuf::from("recipe-icon-1024.png")],
            icons_dir: PathBuf::from("icons"),
            sizes: vec![72, 96, 128, 144, 152, 192, 384, 512],
            manifest: PathBuf::from("manifest.json"),
            html: PathBuf::from("index.html"),
        }
    }
}

/// Flat `{prefix}_{size}.png` exports of the procedural design.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct StandaloneConfig {
    pub base_size: u32,
    pub sizes: Vec<u32>,
    pub prefix: String,
    pub output_dir: PathBuf,
}

impl Default for StandaloneConfig {
    fn default() -> Self {
        Self {
            base_size: 512,
            sizes: vec![512, 192, 152, 144, 128, 96, 72, 48, 36],
            prefix: "recipebox_icon".to_string(),
            output_dir: PathBuf::from("."),
        }
    }
}

impl GeneratorConfig {
    /// Load a JSON config file on top of the defaults.
    pub fn load(path: &Path) -> Result<Self> {
        let raw = std::fs::read_to_string(path).map_err(|source| IconError::ConfigRead {
            path: path.to_path_buf(),
            source,
        })?;
        let config: Self = serde_json::from_str(&raw).map_err(|source| IconError::ConfigParse {
            path: path.to_path_buf(),
            source,
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn validate(&self) -> Result<()> {
        if self.sizes.is_empty() {
            return Err(IconError::InvalidConfig(
                "launcher size table is empty".to_string(),
            ));
        }
        if let Some(target) = self.sizes.iter().find(|t| t.size == 0) {
            return Err(IconError::InvalidConfig(format!(
                "size for density '{}' must be non-zero",
                target.density
            )));
        }
        if self.supersample == 0 {
            return Err(IconError::InvalidConfig(
                "supersample must be at least 1".to_string(),
            ));
        }
        if self.web.sizes.contains(&0) || self.standalone.sizes.contains(&0) {
            return Err(IconError::InvalidConfig(
                "icon sizes must be non-zero".to_string(),
            ));
        }
        if self.standalone.base_size == 0 {
            return Err(IconError::InvalidConfig(
                "standalone base size must be non-zero".to_string(),
            ));
        }
        parse_color(&self.background)?;
        Ok(())
    }

    pub fn background_color(&self) -> Result<Rgba<u8>> {
        parse_color(&self.background)
    }
}

/// Parse a CSS colour string into an RGBA pixel.
pub fn parse_color(color: &str) -> Result<Rgba<u8>> {
    css_color::Srgb::from_str(color)
        .map(|color| {
            Rgba([
                (color.red * 255.).round() as u8,
                (color.green * 255.).round() as u8,
                (color.blue * 255.).round() as u8,
                (color.alpha * 255.).round() as u8,
            ])
        })
        .map_err(|_| IconError::InvalidConfig(format!("'{color}' is not a valid CSS colour")))
}
