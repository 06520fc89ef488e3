use image::{DynamicImage, GenericImageView, ImageError, Rgb, RgbImage, Rgba, RgbaImage};
use launcher_icons::{
    generate_launcher_icons,
    icon_gen::{persist, render_procedural},
    GeneratorConfig, IconError, Mode, LAUNCHER_VARIANTS,
};
use std::path::{Path, PathBuf};
use tempfile::TempDir;

const EXPECTED: [(&str, u32); 5] = [
    ("mipmap-mdpi", 48),
    ("mipmap-hdpi", 72),
    ("mipmap-xhdpi", 96),
    ("mipmap-xxhdpi", 144),
    ("mipmap-xxxhdpi", 192),
];

fn config_for(temp: &TempDir, candidates: Vec<PathBuf>) -> GeneratorConfig {
    GeneratorConfig {
        source_candidates: candidates,
        output_base: temp.path().join("res"),
        ..Default::default()
    }
}

/// Writes a gradient so resampling has real content to work on.
fn create_gradient(path: &Path, width: u32, height: u32) {
    let mut image = RgbaImage::new(width, height);
    for (x, y, pixel) in image.enumerate_pixels_mut() {
        let red = (255.0 * x as f32 / width as f32) as u8;
        let green = (255.0 * y as f32 / height as f32) as u8;
        *pixel = Rgba([red, green, 128, 255]);
    }
    image.save(path).expect("Failed to save gradient image");
}

fn count_files(dir: &Path) -> usize {
    if !dir.exists() {
        return 0;
    }
    std::fs::read_dir(dir)
        .unwrap()
        .map(|entry| {
            let path = entry.unwrap().path();
            if path.is_dir() {
                count_files(&path)
            } else {
                1
            }
        })
        .sum()
}

#[test]
fn resample_writes_exact_sizes_for_every_density() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("recipe.png");
    create_gradient(&source, 1024, 1024);

    let config = config_for(&temp, vec![source]);
    let written = generate_launcher_icons(&config, Mode::Resample).unwrap();
    assert_eq!(written.len(), 15);

    for (dir, size) in EXPECTED {
        for name in LAUNCHER_VARIANTS {
            let path = config.output_base.join(dir).join(name);
            let icon = image::open(&path).expect("generated icon should decode");
            assert_eq!(icon.dimensions(), (size, size), "{}", path.display());
            assert_eq!(icon.color(), image::ColorType::Rgba8);
        }
    }
    assert_eq!(count_files(&config.output_base), 15);
}

#[test]
fn variants_are_byte_identical() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("recipe.png");
    create_gradient(&source, 300, 300);

    let config = config_for(&temp, vec![source]);
    generate_launcher_icons(&config, Mode::Resample).unwrap();

    for (dir, _) in EXPECTED {
        let dir = config.output_base.join(dir);
        let reference = std::fs::read(dir.join(LAUNCHER_VARIANTS[0])).unwrap();
        for name in &LAUNCHER_VARIANTS[1..] {
            assert_eq!(
                std::fs::read(dir.join(name)).unwrap(),
                reference,
                "{} differs from {}",
                name,
                LAUNCHER_VARIANTS[0]
            );
        }
    }
}

#[test]
fn missing_source_writes_nothing() {
    let temp = TempDir::new().unwrap();
    let candidates = vec![
        temp.path().join("device/recipe.png"),
        temp.path().join("assets/recipe.png"),
    ];
    let config = config_for(&temp, candidates.clone());

    match generate_launcher_icons(&config, Mode::Resample) {
        Err(IconError::InputMissing { checked }) => assert_eq!(checked, candidates),
        other => panic!("expected InputMissing, got {other:?}"),
    }
    assert!(!config.output_base.exists());
}

#[test]
fn second_candidate_is_used_when_first_is_missing() {
    let temp = TempDir::new().unwrap();
    let fallback = temp.path().join("assets").join("recipe.png");
    std::fs::create_dir_all(fallback.parent().unwrap()).unwrap();
    create_gradient(&fallback, 64, 64);

    let config = config_for(&temp, vec![temp.path().join("device/recipe.png"), fallback]);
    let written = generate_launcher_icons(&config, Mode::Resample).unwrap();
    assert_eq!(written.len(), 15);
}

#[test]
fn undecodable_source_is_fatal_even_with_fallback() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("recipe.png");
    std::fs::write(&source, b"definitely not a png").unwrap();

    let mut config = config_for(&temp, vec![source.clone()]);
    config.allow_procedural_fallback = true;

    match generate_launcher_icons(&config, Mode::Resample) {
        Err(IconError::Decode { path, source: err }) => {
            assert_eq!(path, source);
            assert!(!matches!(err, ImageError::IoError(_)));
        }
        other => panic!("expected Decode, got {other:?}"),
    }
    assert!(!config.output_base.exists());
}

#[test]
fn source_format_is_detected_from_content() {
    let temp = TempDir::new().unwrap();
    let jpeg = temp.path().join("photo.jpg");
    RgbImage::from_pixel(1000, 600, Rgb([90, 160, 40]))
        .save(&jpeg)
        .unwrap();

    // A JPEG under a .png name, and the same bytes with no extension.
    for name in ["recipe.png", "recipe"] {
        let source = temp.path().join(name);
        std::fs::copy(&jpeg, &source).unwrap();

        let mut config = config_for(&temp, vec![source]);
        config.output_base = temp.path().join(format!("res-{name}"));
        let written = generate_launcher_icons(&config, Mode::Resample)
            .unwrap_or_else(|err| panic!("{name} should decode: {err}"));
        assert_eq!(written.len(), 15, "{name}");

        let icon = image::open(config.output_base.join("mipmap-hdpi/ic_launcher.png")).unwrap();
        assert_eq!(icon.dimensions(), (72, 72));
    }
}

#[test]
fn non_square_source_is_stretched_not_cropped() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("wide.png");

    // Left half red, right half blue.
    let mut image = RgbImage::new(400, 100);
    for (x, _, pixel) in image.enumerate_pixels_mut() {
        *pixel = if x < 200 { Rgb([255, 0, 0]) } else { Rgb([0, 0, 255]) };
    }
    image.save(&source).unwrap();

    let config = config_for(&temp, vec![source]);
    generate_launcher_icons(&config, Mode::Resample).unwrap();

    let icon = image::open(config.output_base.join("mipmap-xxxhdpi/ic_launcher.png"))
        .unwrap()
        .to_rgba8();
    assert_eq!(icon.dimensions(), (192, 192));

    // A centre crop would be all one colour; a stretch keeps both halves.
    let left = icon.get_pixel(10, 96);
    let right = icon.get_pixel(181, 96);
    assert!(left[0] > 200 && left[2] < 50, "left edge {left:?}");
    assert!(right[2] > 200 && right[0] < 50, "right edge {right:?}");
}

#[test]
fn reruns_are_byte_identical() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("recipe.png");
    create_gradient(&source, 500, 500);
    let config = config_for(&temp, vec![source]);

    let first = generate_launcher_icons(&config, Mode::Resample).unwrap();
    let before: Vec<Vec<u8>> = first.iter().map(|p| std::fs::read(p).unwrap()).collect();

    let second = generate_launcher_icons(&config, Mode::Resample).unwrap();
    assert_eq!(first, second);
    let after: Vec<Vec<u8>> = second.iter().map(|p| std::fs::read(p).unwrap()).collect();
    assert_eq!(before, after);
}

#[test]
fn opaque_jpeg_source() {
    let temp = TempDir::new().unwrap();
    let source = temp.path().join("recipe.jpg");
    RgbImage::from_pixel(1000, 600, Rgb([90, 160, 40]))
        .save(&source)
        .unwrap();

    let config = config_for(&temp, vec![source]);
    generate_launcher_icons(&config, Mode::Resample).unwrap();

    for (dir, size) in EXPECTED {
        let dir = config.output_base.join(dir);
        assert_eq!(std::fs::read_dir(&dir).unwrap().count(), 3);
        let icon = image::open(dir.join("ic_launcher_round.png")).unwrap();
        assert_eq!(icon.color(), image::ColorType::Rgba8);
        assert_eq!(icon.dimensions(), (size, size));
        assert!(icon.to_rgba8().pixels().all(|p| p[3] == 255));
    }
    assert_eq!(count_files(&config.output_base), 15);
}

#[test]
fn procedural_fallback_when_allowed() {
    let temp = TempDir::new().unwrap();
    let mut config = config_for(&temp, vec![temp.path().join("missing.png")]);
    config.allow_procedural_fallback = true;
    config.supersample = 2;

    let written = generate_launcher_icons(&config, Mode::Resample).unwrap();
    assert_eq!(written.len(), 15);
    let icon = image::open(config.output_base.join("mipmap-mdpi/ic_launcher.png")).unwrap();
    assert_eq!(icon.dimensions(), (48, 48));
}

#[test]
fn procedural_mode_ignores_candidates() {
    let temp = TempDir::new().unwrap();
    let config = config_for(&temp, vec![]);

    let written = generate_launcher_icons(&config, Mode::Procedural).unwrap();
    assert_eq!(written.len(), 15);
    for (dir, size) in EXPECTED {
        let icon = image::open(config.output_base.join(dir).join("ic_launcher_foreground.png"))
            .unwrap();
        assert_eq!(icon.dimensions(), (size, size));
    }
}

#[test]
fn procedural_512_is_opaque_everywhere() {
    let background = Rgba([255, 107, 53, 255]);
    let icon = render_procedural(512, 4, background).unwrap();
    assert_eq!(icon.dimensions(), (512, 512));

    let rgba = icon.to_rgba8();
    assert!(rgba.pixels().all(|p| p[3] == 255));
    // Corners sit outside the book cover and show the background colour.
    assert_eq!(*rgba.get_pixel(0, 0), background);
    assert_eq!(*rgba.get_pixel(511, 511), background);
}

#[test]
fn procedural_render_is_deterministic() {
    let background = Rgba([255, 107, 53, 255]);
    let a = render_procedural(96, 4, background).unwrap();
    let b = render_procedural(96, 4, background).unwrap();
    assert_eq!(a.as_bytes(), b.as_bytes());
}

#[test]
fn persist_reports_unwritable_destination() {
    let temp = TempDir::new().unwrap();
    // A regular file where the directory should be.
    let blocker = temp.path().join("res");
    std::fs::write(&blocker, b"").unwrap();

    let icon = DynamicImage::ImageRgba8(RgbaImage::from_pixel(8, 8, Rgba([0, 0, 0, 255])));
    match persist(&icon, &blocker.join("mipmap-mdpi")) {
        Err(IconError::Write { path, .. }) => assert_eq!(path, blocker.join("mipmap-mdpi")),
        other => panic!("expected Write, got {other:?}"),
    }
}

#[test]
fn existing_output_directories_are_reused() {
    let temp = TempDir::new().unwrap();
    let dir = temp.path().join("res/mipmap-hdpi");
    std::fs::create_dir_all(&dir).unwrap();
    std::fs::write(dir.join("ic_launcher.png"), b"stale").unwrap();

    let icon = DynamicImage::ImageRgba8(RgbaImage::from_pixel(72, 72, Rgba([1, 2, 3, 255])));
    let written = persist(&icon, &dir).unwrap();
    assert_eq!(written.len(), 3);
    assert_ne!(std::fs::read(dir.join("ic_launcher.png")).unwrap(), b"stale");
}
