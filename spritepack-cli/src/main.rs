use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use spritepack_core::css;
use spritepack_core::export::SpriteSheetMeta;
use spritepack_core::options::{self, SpriteOptions};
use spritepack_core::{pack, pack_with_width, SpriteSheet, VERSION};
use tracing_subscriber::EnvFilter;

mod discover;
mod raster;

#[derive(Parser, Debug)]
#[command(name = "spritepack", version = VERSION, about = "Pack images into a CSS sprite sheet")]
struct Cli {
    /// Verbose logging (overridden by RUST_LOG)
    #[arg(short, long, global = true)]
    debug: bool,
    #[command(subcommand)]
    cmd: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Pack images, write the sprite, its stylesheet and optional preview page
    Pack {
        /// Image files or directories (current directory when omitted)
        inputs: Vec<PathBuf>,
        #[arg(long, default_value = "sprite.png")]
        img_out: PathBuf,
        #[arg(long, default_value = "sprite.css")]
        css_out: PathBuf,
        /// YAML options file
        #[arg(long)]
        config: Option<PathBuf>,
        #[arg(long)]
        class_prefix: Option<String>,
        #[arg(long)]
        class_suffix: Option<String>,
        /// Prefix for the sprite url inside the stylesheet
        #[arg(long)]
        deploy_url_base: Option<String>,
        /// Also write an HTML preview page
        #[arg(long)]
        test_html: bool,
        /// Directory for the preview page
        #[arg(long)]
        test_html_path: Option<String>,
        #[arg(long)]
        test_html_deploy_url_base: Option<String>,
        /// Row width instead of the computed power of two
        #[arg(long)]
        max_width: Option<u64>,
        /// Palette-quantize PNG output (8 is the only supported depth)
        #[arg(long, value_parser = clap::value_parser!(u8).range(8..=8))]
        limit_bit_depth: Option<u8>,
        /// Write sheet metadata as JSON
        #[arg(long)]
        meta: Option<PathBuf>,
    },
    /// Show the computed layout without decoding or writing anything
    Inspect {
        inputs: Vec<PathBuf>,
        #[arg(long)]
        max_width: Option<u64>,
        /// Print metadata JSON instead of a table
        #[arg(long)]
        json: bool,
    },
}

fn init_tracing(debug: bool) -> Result<()> {
    let default = if debug { "spritepack_core=debug,spritepack=debug" } else { "spritepack_core=info,spritepack=info" };
    let filter = EnvFilter::try_from_default_env().or_else(|_| EnvFilter::try_new(default))?;
    tracing_subscriber::fmt().with_env_filter(filter).with_target(false).init();
    Ok(())
}

fn file_name(path: &Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default()
}

fn ensure_css_path(path: &Path) -> Result<()> {
    let is_css = path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("css"))
        .unwrap_or(false);
    if !is_css {
        bail!("css output file should be of type CSS: {}", path.display());
    }
    Ok(())
}

fn ensure_parent_exists(path: &Path) -> Result<()> {
    if let Some(dir) = path.parent().filter(|d| !d.as_os_str().is_empty()) {
        if !dir.is_dir() {
            bail!("output directory {} does not exist", dir.display());
        }
    }
    Ok(())
}

fn pack_sources(sources: &[raster::SourceImage], max_width: Option<u64>) -> Result<SpriteSheet> {
    let frames = sources.iter().map(raster::SourceImage::frame).collect();
    let sheet = match max_width {
        Some(w) => pack_with_width(frames, w)?,
        None => pack(frames)?,
    };
    Ok(sheet)
}

fn print_summary(sheet: &SpriteSheet) {
    let s = &sheet.stats;
    println!("Tallest image: {}", s.tallest);
    println!("Widest image: {}", s.widest);
    println!("Total image area: {}", s.total_area);
    println!("Smallest possible area: {}", s.min_area);
    println!("Target width: {}", sheet.max_width);
    println!("Pack preference: {:?}", sheet.preference);
    println!("Sheet: {}x{} ({} px unused)", sheet.width, sheet.height, sheet.wasted_area());
}

fn main() -> Result<()> {
    let cli = Cli::parse();
    init_tracing(cli.debug)?;
    match cli.cmd {
        Command::Pack {
            inputs,
            img_out,
            css_out,
            config,
            class_prefix,
            class_suffix,
            deploy_url_base,
            test_html,
            test_html_path,
            test_html_deploy_url_base,
            max_width,
            limit_bit_depth,
            meta,
        } => {
            let mut opts = match &config {
                Some(path) => options::load_from_path(path)?,
                None => SpriteOptions::default(),
            };
            if let Some(v) = class_prefix { opts.css_class_prefix = v; }
            if let Some(v) = class_suffix { opts.css_class_suffix = v; }
            if let Some(v) = deploy_url_base { opts.image_deploy_url_base = v; }
            if test_html { opts.test_page.enabled = true; }
            if test_html_path.is_some() { opts.test_page.path = test_html_path; }
            if test_html_deploy_url_base.is_some() { opts.test_page.deploy_url_base = test_html_deploy_url_base; }
            if max_width.is_some() { opts.max_width = max_width; }
            if limit_bit_depth.is_some() { opts.limit_bit_depth = limit_bit_depth; }

            ensure_css_path(&css_out)?;
            ensure_parent_exists(&img_out)?;
            ensure_parent_exists(&css_out)?;

            let paths = discover::collect(&inputs, opts.treat_missing_input_as_error)?;
            let sources = raster::read_headers(&paths)?;
            let input_bytes: u64 = sources.iter().map(|s| s.file_size).sum();
            let sheet = pack_sources(&sources, opts.max_width)?;

            let image_name = file_name(&img_out);
            let stylesheet = css::render_stylesheet(&sheet.placements, &opts, &image_name);
            fs::write(&css_out, &stylesheet.css)
                .with_context(|| format!("writing stylesheet {}", css_out.display()))?;
            tracing::info!("wrote stylesheet to {}", css_out.display());

            if opts.test_page.enabled {
                let page_path = css::test_page_path(&css_out, &opts);
                let html = css::render_test_page(&sheet.placements, &opts, &image_name, &file_name(&css_out));
                fs::write(&page_path, html)
                    .with_context(|| format!("writing preview page {}", page_path.display()))?;
                tracing::info!("wrote preview page to {}", page_path.display());
            }

            let canvas = raster::compose(&sheet)?;
            raster::save(canvas, &img_out, opts.limit_bit_depth)?;
            let output_bytes = fs::metadata(&img_out)?.len();

            if let Some(meta_path) = meta {
                let json = SpriteSheetMeta::new(image_name, &sheet).to_json()?;
                fs::write(&meta_path, json)
                    .with_context(|| format!("writing metadata {}", meta_path.display()))?;
            }

            print_summary(&sheet);
            println!("New sprite: {}", img_out.display());
            println!(
                "Converted {} files of cumulative size {} bytes into one file of size {} bytes.",
                sources.len(),
                input_bytes,
                output_bytes
            );
        }
        Command::Inspect { inputs, max_width, json } => {
            let paths = discover::collect(&inputs, true)?;
            let sources = raster::read_headers(&paths)?;
            let sheet = pack_sources(&sources, max_width)?;
            if json {
                println!("{}", SpriteSheetMeta::new("", &sheet).to_json()?);
            } else {
                print_summary(&sheet);
                for p in &sheet.placements {
                    println!("  {:>5} {:>5}  {:>4}x{:<4}  {}", p.x, p.y, p.width, p.height, p.id);
                }
            }
        }
    }
    Ok(())
}
