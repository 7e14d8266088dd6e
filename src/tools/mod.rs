use crate::error::{Error, Result};
use crate::models::PixelBuffer;
use image::GenericImageView;
use std::fs;
use std::path::{Path, PathBuf};

const IMAGE_EXTENSIONS: [&str; 5] = ["png", "jpg", "jpeg", "gif", "bmp"];

/// Load an image file as an RGBA pixel buffer.
///
/// When `max_dim` is set and the longest side exceeds it, the image is
/// downscaled (aspect preserved) before conversion.
pub fn load_rgba<P: AsRef<Path>>(path: P, max_dim: Option<u32>) -> Result<PixelBuffer> {
    let path = path.as_ref();
    let img = image::open(path).map_err(|source| Error::ImageLoad {
        path: path.to_path_buf(),
        source,
    })?;

    let (orig_w, orig_h) = img.dimensions();
    let rgba = match max_dim {
        Some(max_dim) if orig_w.max(orig_h) > max_dim => img
            .resize(max_dim, max_dim, image::imageops::FilterType::Triangle)
            .to_rgba8(),
        _ => img.to_rgba8(),
    };
    let (width, height) = rgba.dimensions();
    PixelBuffer::from_rgba(width, height, rgba.into_raw())
        .ok_or(Error::InvalidState("decoded image has an inconsistent size"))
}

/// Every image file under `root`, recursively, in sorted order.
///
/// Unreadable directories are skipped.
pub fn collect_images(root: &Path) -> Vec<PathBuf> {
    let mut stack = vec![root.to_path_buf()];
    let mut images = Vec::new();

    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };

        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if is_image(&path) {
                images.push(path);
            }
        }
    }

    images.sort();
    images
}

fn is_image(path: &Path) -> bool {
    path.extension()
        .map(|ext| ext.to_string_lossy().to_lowercase())
        .is_some_and(|ext| IMAGE_EXTENSIONS.contains(&ext.as_str()))
}
