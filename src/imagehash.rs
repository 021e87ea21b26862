// Perceptual image fingerprints — near-duplicate detection support.
//
// Classic pHash: DCT preprocessing over a mean hash, via the image_hasher
// crate. Distances are normalized Hamming distance in [0, 1] so the match
// threshold is independent of the configured hash size.

use std::path::Path;

use anyhow::{Context, Result};
use image_hasher::{HashAlg, Hasher, HasherConfig, ImageHash};

/// Normalized distance at or below which two images are considered
/// near-duplicates. Inclusive.
pub const MATCH_THRESHOLD: f64 = 0.3;

fn hasher() -> Hasher {
    HasherConfig::new()
        .hash_alg(HashAlg::Mean)
        .preproc_dct()
        .to_hasher()
}

/// Compute the perceptual fingerprint of an encoded image payload.
pub fn fingerprint(bytes: &[u8]) -> Result<ImageHash> {
    let img = image::load_from_memory(bytes).context("Failed to decode image payload")?;
    Ok(hasher().hash_image(&img))
}

/// Compute the perceptual fingerprint of an image file.
pub fn fingerprint_file(path: &Path) -> Result<ImageHash> {
    let img =
        image::open(path).with_context(|| format!("Failed to open image {}", path.display()))?;
    Ok(hasher().hash_image(&img))
}

/// Normalized Hamming distance between two fingerprints: 0.0 = identical,
/// 1.0 = every bit differs. Symmetric.
pub fn normalized_distance(a: &ImageHash, b: &ImageHash) -> f64 {
    let bits = (a.as_bytes().len() * 8).max(1);
    f64::from(a.dist(b)) / bits as f64
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::{DynamicImage, RgbImage};

    fn solid(r: u8, g: u8, b: u8) -> ImageHash {
        let img = DynamicImage::ImageRgb8(RgbImage::from_pixel(64, 64, image::Rgb([r, g, b])));
        hasher().hash_image(&img)
    }

    fn checkerboard() -> ImageHash {
        let img = DynamicImage::ImageRgb8(RgbImage::from_fn(64, 64, |x, y| {
            if (x / 8 + y / 8) % 2 == 0 {
                image::Rgb([255, 255, 255])
            } else {
                image::Rgb([0, 0, 0])
            }
        }));
        hasher().hash_image(&img)
    }

    #[test]
    fn identical_images_have_zero_distance() {
        let a = solid(200, 200, 200);
        let b = solid(200, 200, 200);
        assert_eq!(normalized_distance(&a, &b), 0.0);
    }

    #[test]
    fn distance_is_symmetric() {
        let a = solid(255, 255, 255);
        let b = checkerboard();
        assert_eq!(normalized_distance(&a, &b), normalized_distance(&b, &a));
    }

    #[test]
    fn distance_is_normalized() {
        let a = solid(0, 0, 0);
        let b = checkerboard();
        let d = normalized_distance(&a, &b);
        assert!((0.0..=1.0).contains(&d));
    }
}
