use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use launcher_icons::{
    config::GeneratorConfig,
    icon_gen::{self, Mode},
};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[clap(
    name = "launcher-icons",
    about = "Generate Android launcher and PWA icons from a source image or the built-in design"
)]
struct Args {
    /// JSON file overriding the built-in paths and size tables.
    #[clap(short, long, global = true, value_name = "FILE")]
    config: Option<PathBuf>,

    #[clap(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Write ic_launcher, ic_launcher_round and ic_launcher_foreground for every density.
    Android {
        /// Source image; repeat to give fallbacks in priority order.
        #[clap(short, long, value_name = "PATH")]
        source: Vec<PathBuf>,

        /// Android res directory receiving the mipmap-* folders.
        #[clap(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Draw the built-in design instead of resampling a source image.
        #[clap(long, conflicts_with = "source")]
        procedural: bool,

        /// Draw the built-in design when no source image exists.
        #[clap(long)]
        allow_procedural_fallback: bool,

        /// Background colour of the built-in design (CSS color format).
        #[clap(long, value_name = "COLOR")]
        background: Option<String>,
    },

    /// Write the PWA icon set and update manifest.json / index.html.
    Web {
        /// Source image; repeat to give fallbacks in priority order.
        #[clap(short, long, value_name = "PATH")]
        source: Vec<PathBuf>,

        /// Directory receiving icon-WxH.png files.
        #[clap(long, value_name = "DIR")]
        icons_dir: Option<PathBuf>,

        /// Web app manifest to update, if present.
        #[clap(long, value_name = "FILE")]
        manifest: Option<PathBuf>,

        /// HTML page whose icon links are switched to PNG, if present.
        #[clap(long, value_name = "FILE")]
        html: Option<PathBuf>,
    },

    /// Export the built-in design as flat PNGs at several sizes.
    Render {
        /// Output directory.
        #[clap(short, long, value_name = "DIR")]
        output: Option<PathBuf>,

        /// Filename prefix, written as PREFIX_SIZE.png.
        #[clap(long, value_name = "NAME")]
        prefix: Option<String>,

        /// Background colour of the built-in design (CSS color format).
        #[clap(long, value_name = "COLOR")]
        background: Option<String>,
    },
}

fn main() -> Result<()> {
    let args = Args::parse();

    let mut config = match &args.config {
        Some(path) => GeneratorConfig::load(path)
            .with_context(|| format!("Can't load config {}", path.display()))?,
        None => GeneratorConfig::default(),
    };

    match args.command {
        Command::Android {
            source,
            output,
            procedural,
            allow_procedural_fallback,
            background,
        } => {
            if !source.is_empty() {
                config.source_candidates = source;
            }
            if let Some(output) = output {
                config.output_base = output;
            }
            if let Some(background) = background {
                config.background = background;
            }
            config.allow_procedural_fallback |= allow_procedural_fallback;

            let mode = if procedural {
                Mode::Procedural
            } else {
                Mode::Resample
            };
            icon_gen::generate_launcher_icons(&config, mode)
                .context("Android icon generation failed")?;
        }
        Command::Web {
            source,
            icons_dir,
            manifest,
            html,
        } => {
            if !source.is_empty() {
                config.web.source_candidates = source;
            }
            if let Some(icons_dir) = icons_dir {
                config.web.icons_dir = icons_dir;
            }
            if let Some(manifest) = manifest {
                config.web.manifest = manifest;
            }
            if let Some(html) = html {
                config.web.html = html;
            }

            icon_gen::generate_web_icons(&config).context("Web icon generation failed")?;
        }
        Command::Render {
            output,
            prefix,
            background,
        } => {
            if let Some(output) = output {
                config.standalone.output_dir = output;
            }
            if let Some(prefix) = prefix {
                config.standalone.prefix = prefix;
            }
            if let Some(background) = background {
                config.background = background;
            }

            icon_gen::render_standalone(&config).context("Icon rendering failed")?;
        }
    }

    Ok(())
}
