use anyhow::{Context, Result};
use image::imageops::FilterType;
use image::ImageFormat;
use std::path::Path;
use tempfile::NamedTempFile;
use tracing::debug;
use walkdir::WalkDir;

pub const POSTER_EXTENSION: &str = "jpg";
pub const POSTER_WIDTH: u32 = 342;
pub const POSTER_HEIGHT: u32 = 513;

/// Decode, resize and re-encode an image file in place.
pub trait ImageCodec {
    fn resize_in_place(&self, path: &Path, width: u32, height: u32) -> Result<()>;
}

/// `ImageCodec` backed by the `image` crate, always writing JPEG.
#[derive(Debug, Default, Clone, Copy)]
pub struct JpegCodec;

impl ImageCodec for JpegCodec {
    fn resize_in_place(&self, path: &Path, width: u32, height: u32) -> Result<()> {
        let img = image::open(path).with_context(|| format!("Failed to decode {path:?}"))?;

        // Stretch to the exact size; posters are not cropped
        let resized = img.resize_exact(width, height, FilterType::CatmullRom);

        let directory = path.parent().unwrap_or(Path::new("."));
        let temp = NamedTempFile::new_in(directory)?;
        resized
            .to_rgb8()
            .save_with_format(temp.path(), ImageFormat::Jpeg)
            .with_context(|| format!("Failed to encode {path:?}"))?;
        temp.persist(path)
            .with_context(|| format!("Failed to replace {path:?}"))?;

        Ok(())
    }
}

/// Resize every `.jpg` under `root` to the poster resolution.
///
/// Covers files from earlier runs too. Returns how many files were resized;
/// the first decode failure aborts the pass.
pub fn normalize_directory<C: ImageCodec>(root: &Path, codec: &C) -> Result<usize> {
    let suffix = format!(".{POSTER_EXTENSION}");
    let mut count = 0;

    for entry in WalkDir::new(root).sort_by_file_name() {
        let entry = entry.with_context(|| format!("Failed to walk {root:?}"))?;
        if !entry.file_type().is_file() {
            continue;
        }
        let is_poster = entry
            .file_name()
            .to_str()
            .map(|name| name.ends_with(&suffix))
            .unwrap_or(false);
        if !is_poster {
            continue;
        }

        debug!("Resizing {:?}", entry.path());
        codec.resize_in_place(entry.path(), POSTER_WIDTH, POSTER_HEIGHT)?;
        count += 1;
    }

    Ok(count)
}
