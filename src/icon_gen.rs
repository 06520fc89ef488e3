use crate::{
    config::{GeneratorConfig, TargetSize, LAUNCHER_VARIANTS},
    draw,
    error::{IconError, Result},
    manifest,
};
use image::{
    codecs::png::{CompressionType, FilterType as PngFilterType, PngEncoder},
    imageops::FilterType,
    ColorType, DynamicImage, ImageEncoder, Rgba,
};
use std::{
    fs::create_dir_all,
    io::{ErrorKind, Write},
    path::{Path, PathBuf},
};

/// Where the pixels for a run come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum IconSource {
    Procedural,
    File(PathBuf),
}

/// How the launcher set should be produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Resample the first existing source candidate.
    #[default]
    Resample,
    /// Skip source resolution and draw the built-in design.
    Procedural,
}

/// Return the first candidate that exists as a file.
pub fn find_source(candidates: &[PathBuf]) -> Result<PathBuf> {
    candidates
        .iter()
        .find(|path| path.is_file())
        .cloned()
        .ok_or_else(|| IconError::InputMissing {
            checked: candidates.to_vec(),
        })
}

/// Pick the pixel source for a launcher run.
///
/// Nothing is written before this succeeds, so a missing source leaves the
/// output tree untouched.
pub fn resolve_source(candidates: &[PathBuf], allow_procedural_fallback: bool) -> Result<IconSource> {
    match find_source(candidates) {
        Ok(path) => Ok(IconSource::File(path)),
        Err(IconError::InputMissing { .. }) if allow_procedural_fallback => {
            println!("Source icon not found, falling back to the procedural design");
            Ok(IconSource::Procedural)
        }
        Err(err) => Err(err),
    }
}

/// Decode the source image, sniffing the format from its content so a JPEG
/// saved as `recipe.png` (or with no extension at all) still loads.
pub fn load_source(path: &Path) -> Result<DynamicImage> {
    let read_error = |source: std::io::Error| match source.kind() {
        ErrorKind::NotFound => IconError::InputMissing {
            checked: vec![path.to_path_buf()],
        },
        _ => IconError::Read {
            path: path.to_path_buf(),
            source,
        },
    };

    let reader = image::io::Reader::open(path)
        .map_err(read_error)?
        .with_guessed_format()
        .map_err(read_error)?;

    reader.decode().map_err(|source| match source {
        // Truncated content also surfaces as an I/O error; keep that a decode failure.
        image::ImageError::IoError(io)
            if !matches!(io.kind(), ErrorKind::UnexpectedEof | ErrorKind::InvalidData) =>
        {
            read_error(io)
        }
        source => IconError::Decode {
            path: path.to_path_buf(),
            source,
        },
    })
}

/// Stretch `source` to exactly `size`×`size`. Non-square sources are
/// distorted, never cropped.
pub fn resample(source: &DynamicImage, size: u32) -> DynamicImage {
    let resized = source.resize_exact(size, size, FilterType::Lanczos3);
    DynamicImage::ImageRgba8(resized.to_rgba8())
}

/// Draw the built-in design at `supersample`× and downsample to `size`.
pub fn render_procedural(size: u32, supersample: u32, background: Rgba<u8>) -> Result<DynamicImage> {
    let canvas = size.checked_mul(supersample).ok_or_else(|| {
        IconError::InvalidConfig(format!("canvas for {size}px at {supersample}x overflows"))
    })?;
    let shapes = draw::recipe_book(canvas, background);
    let image = DynamicImage::ImageRgba8(draw::rasterize(&shapes, canvas)?);

    if canvas == size {
        return Ok(image);
    }
    Ok(image.resize_exact(size, size, FilterType::Lanczos3))
}

/// Write `image` as every launcher variant in `dir`.
///
/// The PNG is encoded once so the variants are byte-identical. Files written
/// before a failure are left in place.
pub fn persist(image: &DynamicImage, dir: &Path) -> Result<Vec<PathBuf>> {
    create_dir_all(dir).map_err(|source| IconError::Write {
        path: dir.to_path_buf(),
        source,
    })?;

    let first = dir.join(LAUNCHER_VARIANTS[0]);
    let encoded = encode_png(image, &first)?;

    let mut written = Vec::with_capacity(LAUNCHER_VARIANTS.len());
    for name in LAUNCHER_VARIANTS {
        let path = dir.join(name);
        write_file(&path, &encoded)?;
        written.push(path);
    }
    Ok(written)
}

/// Produce the full launcher set described by `config`.
pub fn generate_launcher_icons(config: &GeneratorConfig, mode: Mode) -> Result<Vec<PathBuf>> {
    config.validate()?;

    let source = match mode {
        Mode::Procedural => IconSource::Procedural,
        Mode::Resample => {
            resolve_source(&config.source_candidates, config.allow_procedural_fallback)?
        }
    };

    // Decode before touching the output tree.
    let decoded = match &source {
        IconSource::File(path) => {
            println!("Using source icon {}", path.display());
            Some(load_source(path)?)
        }
        IconSource::Procedural => None,
    };
    let background = config.background_color()?;

    println!("Generating Android launcher icons...");
    let mut written = Vec::new();
    for target in &config.sizes {
        let icon = match &decoded {
            Some(image) => resample(image, target.size),
            None => render_procedural(target.size, config.supersample, background)?,
        };
        written.extend(persist_target(&icon, &config.output_base, target)?);
    }

    println!(
        "✓ Generated {} launcher icons in {}",
        written.len(),
        config.output_base.display()
    );
    Ok(written)
}

fn persist_target(icon: &DynamicImage, base: &Path, target: &TargetSize) -> Result<Vec<PathBuf>> {
    let dir_name = target.dir_name();
    let written = persist(icon, &base.join(&dir_name))?;
    for name in LAUNCHER_VARIANTS {
        println!("  ✓ Generated {dir_name}/{name} ({0}x{0})", target.size);
    }
    Ok(written)
}

/// Resample the web source to the PWA icon set and point the manifest and
/// page at the PNGs.
pub fn generate_web_icons(config: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let web = &config.web;

    let path = find_source(&web.source_candidates)?;
    let source = load_source(&path)?;
    println!("Generating web icons from {}...", path.display());

    create_dir_all(&web.icons_dir).map_err(|source| IconError::Write {
        path: web.icons_dir.clone(),
        source,
    })?;

    let mut entries = Vec::with_capacity(web.sizes.len());
    let mut written = Vec::with_capacity(web.sizes.len());
    for &size in &web.sizes {
        let name = manifest::icon_file_name(size);
        let output_path = web.icons_dir.join(&name);
        save_png(&resample(&source, size), &output_path)?;
        println!("  ✓ Generated {name}");
        entries.push(manifest::ManifestIcon::png(
            &web.manifest,
            &web.icons_dir,
            &name,
            size,
        ));
        written.push(output_path);
    }

    if manifest::update_manifest(&web.manifest, &entries)? {
        println!("  ✓ Updated {}", web.manifest.display());
    }
    if manifest::update_html(&web.html)? {
        println!("  ✓ Updated {}", web.html.display());
    }
    Ok(written)
}

/// Render the procedural design once at the base size and export it at every
/// standalone size as `{prefix}_{size}.png`.
pub fn render_standalone(config: &GeneratorConfig) -> Result<Vec<PathBuf>> {
    config.validate()?;
    let standalone = &config.standalone;

    println!("Rendering standalone icons...");
    let base = render_procedural(
        standalone.base_size,
        config.supersample,
        config.background_color()?,
    )?;

    create_dir_all(&standalone.output_dir).map_err(|source| IconError::Write {
        path: standalone.output_dir.clone(),
        source,
    })?;

    let mut written = Vec::with_capacity(standalone.sizes.len());
    for &size in &standalone.sizes {
        let icon = if size == standalone.base_size {
            base.clone()
        } else {
            base.resize_exact(size, size, FilterType::Lanczos3)
        };
        let filename = format!("{}_{size}.png", standalone.prefix);
        let output_path = standalone.output_dir.join(&filename);
        save_png(&icon, &output_path)?;
        println!("  ✓ Generated {filename}");
        written.push(output_path);
    }
    Ok(written)
}

fn save_png(image: &DynamicImage, path: &Path) -> Result<()> {
    let encoded = encode_png(image, path)?;
    write_file(path, &encoded)
}

fn encode_png(image: &DynamicImage, path: &Path) -> Result<Vec<u8>> {
    let rgba = image.to_rgba8();
    let mut buf = Vec::new();
    write_png(rgba.as_raw(), &mut buf, rgba.width(), rgba.height()).map_err(|source| {
        IconError::Encode {
            path: path.to_path_buf(),
            source,
        }
    })?;
    Ok(buf)
}

fn write_file(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = std::fs::File::create(path).map_err(|source| IconError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    file.write_all(bytes)
        .and_then(|_| file.flush())
        .map_err(|source| IconError::Write {
            path: path.to_path_buf(),
            source,
        })
}

// Encode image data as PNG with compression
fn write_png<W: Write>(
    image_data: &[u8],
    w: W,
    width: u32,
    height: u32,
) -> std::result::Result<(), image::ImageError> {
    let encoder = PngEncoder::new_with_quality(w, CompressionType::Best, PngFilterType::Adaptive);
    encoder.write_image(image_data, width, height, ColorType::Rgba8)
}
