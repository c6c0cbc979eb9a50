//! Reading source images and drawing the packed sheet.

use std::fs::File;
use std::io::BufWriter;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use image::{imageops, DynamicImage, RgbaImage};
use spritepack_core::{Frame, SpriteSheet};

/// A source image known by its header size.
#[derive(Debug, Clone)]
pub struct SourceImage {
    pub path: PathBuf,
    pub width: u32,
    pub height: u32,
    pub file_size: u64,
}

impl SourceImage {
    pub fn read_header(path: &Path) -> Result<Self> {
        let (width, height) = image::image_dimensions(path)
            .with_context(|| format!("reading image header of {}", path.display()))?;
        let file_size = std::fs::metadata(path)?.len();
        Ok(Self { path: path.to_path_buf(), width, height, file_size })
    }

    /// Leaf frame identified by the image path.
    pub fn frame(&self) -> Frame {
        Frame::leaf(self.path.to_string_lossy(), self.width, self.height)
    }
}

pub fn read_headers(paths: &[PathBuf]) -> Result<Vec<SourceImage>> {
    paths.iter().map(|p| SourceImage::read_header(p)).collect()
}

/// Draw every placement of `sheet` onto a transparent canvas.
pub fn compose(sheet: &SpriteSheet) -> Result<RgbaImage> {
    let mut canvas = RgbaImage::new(sheet.width, sheet.height);
    for p in &sheet.placements {
        let img = image::open(&p.id)
            .with_context(|| format!("decoding {}", p.id))?
            .to_rgba8();
        if img.dimensions() != (p.width, p.height) {
            tracing::error!(
                "decoded size of {} is {}x{}, expected {}x{}",
                p.id,
                img.width(),
                img.height(),
                p.width,
                p.height
            );
        }
        imageops::overlay(&mut canvas, &img, p.x as i64, p.y as i64);
    }
    Ok(canvas)
}

fn has_extension(path: &Path, wanted: &[&str]) -> bool {
    path.extension()
        .and_then(|e| e.to_str())
        .map(|e| wanted.iter().any(|w| e.eq_ignore_ascii_case(w)))
        .unwrap_or(false)
}

/// Save the canvas in the format implied by `path`'s extension.
///
/// `limit_bit_depth` of 8 writes a PNG as a 256-colour palette image with a
/// transparency chunk. Other depths and other formats are saved unchanged.
pub fn save(canvas: RgbaImage, path: &Path, limit_bit_depth: Option<u8>) -> Result<()> {
    let is_png = has_extension(path, &["png"]);
    match limit_bit_depth {
        Some(8) if is_png && canvas.width() > 0 && canvas.height() > 0 => {
            return save_indexed_png(&canvas, path)
                .with_context(|| format!("writing sprite image {}", path.display()));
        }
        Some(8) if !is_png => {
            tracing::warn!("bit depth limit only applies to PNG output; saving {} as is", path.display());
        }
        Some(8) | None => {}
        Some(other) => tracing::warn!("unsupported bit depth limit {other}; only 8 is supported"),
    }
    let written = if has_extension(path, &["jpg", "jpeg"]) {
        // no alpha channel in JPEG
        DynamicImage::ImageRgba8(canvas).to_rgb8().save(path)
    } else {
        canvas.save(path)
    };
    written.with_context(|| format!("writing sprite image {}", path.display()))
}

/// Quantize to at most 256 colours with NeuQuant and write an indexed PNG.
fn save_indexed_png(canvas: &RgbaImage, path: &Path) -> Result<()> {
    let nq = color_quant::NeuQuant::new(10, 256, canvas.as_raw());
    let map = nq.color_map_rgba();
    let mut palette = Vec::with_capacity(map.len() / 4 * 3);
    let mut alphas = Vec::with_capacity(map.len() / 4);
    for entry in map.chunks_exact(4) {
        palette.extend_from_slice(&entry[..3]);
        alphas.push(entry[3]);
    }
    let indices: Vec<u8> = canvas.pixels().map(|px| nq.index_of(&px.0) as u8).collect();
    tracing::debug!("quantized {}x{} canvas to {} colours", canvas.width(), canvas.height(), alphas.len());

    let file = File::create(path)?;
    let mut encoder = png::Encoder::new(BufWriter::new(file), canvas.width(), canvas.height());
    encoder.set_color(png::ColorType::Indexed);
    encoder.set_depth(png::BitDepth::Eight);
    encoder.set_palette(palette);
    encoder.set_trns(alphas);
    let mut writer = encoder.write_header()?;
    writer.write_image_data(&indices)?;
    Ok(())
}
