//! Web app manifest icon entries.
//!
//! Mirrors the `icons` member of the W3C Web App Manifest. Only that member
//! is rewritten; every other field of an existing manifest is preserved.

use crate::error::{IconError, Result};
use serde::{Deserialize, Serialize};
use std::path::{Component, Path};

/// One entry of a manifest's `icons` array
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
pub struct ManifestIcon {
    /// URL of the image, relative to the manifest
    pub src: String,

    /// Space separated `WxH` list
    pub sizes: String,

    /// MIME type of the image
    #[serde(rename = "type")]
    pub mime_type: String,
}

impl ManifestIcon {
    /// Entry for a square PNG named `name` inside `icons_dir`.
    pub fn png(manifest: &Path, icons_dir: &Path, name: &str, size: u32) -> Self {
        Self {
            src: icon_src(manifest, icons_dir, name),
            sizes: format!("{size}x{size}"),
            mime_type: "image/png".to_string(),
        }
    }
}

pub fn icon_file_name(size: u32) -> String {
    format!("icon-{size}x{size}.png")
}

// URL path of the icon as seen from the manifest's directory.
fn icon_src(manifest: &Path, icons_dir: &Path, name: &str) -> String {
    let base = manifest.parent().unwrap_or_else(|| Path::new(""));
    let relative = icons_dir.strip_prefix(base).unwrap_or(icons_dir);

    let mut parts: Vec<String> = relative
        .components()
        .filter_map(|component| match component {
            Component::Normal(part) => Some(part.to_string_lossy().into_owned()),
            _ => None,
        })
        .collect();
    parts.push(name.to_string());
    parts.join("/")
}

/// Replace the `icons` array of the manifest at `path`.
///
/// Returns `false` without touching anything when the manifest doesn't exist.
pub fn update_manifest(path: &Path, icons: &[ManifestIcon]) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }

    let raw = std::fs::read_to_string(path).map_err(|source| IconError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let mut manifest: serde_json::Value =
        serde_json::from_str(&raw).map_err(|source| IconError::Manifest {
            path: path.to_path_buf(),
            source,
        })?;

    let icons = serde_json::to_value(icons).map_err(|source| IconError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    match manifest.as_object_mut() {
        Some(object) => {
            object.insert("icons".to_string(), icons);
        }
        None => {
            return Err(IconError::ManifestNotObject {
                path: path.to_path_buf(),
            })
        }
    }

    let pretty = serde_json::to_string_pretty(&manifest).map_err(|source| IconError::Manifest {
        path: path.to_path_buf(),
        source,
    })?;
    std::fs::write(path, pretty).map_err(|source| IconError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

/// Point SVG icon links in an HTML page at the generated PNGs.
///
/// Returns `false` when the page doesn't exist or already references PNGs.
pub fn update_html(path: &Path) -> Result<bool> {
    if !path.is_file() {
        return Ok(false);
    }

    let html = std::fs::read_to_string(path).map_err(|source| IconError::Read {
        path: path.to_path_buf(),
        source,
    })?;
    let updated = rewrite_icon_links(&html);
    if updated == html {
        return Ok(false);
    }

    std::fs::write(path, updated).map_err(|source| IconError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    Ok(true)
}

fn rewrite_icon_links(html: &str) -> String {
    html.replace(
        r#"href="icons/icon-192x192.svg""#,
        r#"href="icons/icon-192x192.png""#,
    )
    .replace(
        r#"href="icons/icon-512x512.svg""#,
        r#"href="icons/icon-512x512.png""#,
    )
    .replace(r#"type="image/svg+xml""#, r#"type="image/png""#)
}
