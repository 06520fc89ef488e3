//! Android launcher and PWA icon generation.
//!
//! Icons are either resampled from a single source image or drawn from a
//! built-in procedural design, then written into the conventional
//! `mipmap-*` directory layout.

pub mod config;
pub mod draw;
pub mod error;
pub mod icon_gen;
pub mod manifest;

pub use config::{GeneratorConfig, TargetSize, LAUNCHER_VARIANTS};
pub use error::IconError;
pub use icon_gen::{generate_launcher_icons, IconSource, Mode};
