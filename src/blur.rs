// Box blur for packed ARGB pixel buffers.
// Two-pass separable running-sum blur with edge-replicating clamps.

use crate::error::{FlipQuotesError, Result};

/// Downscale factor applied before the frosted-glass blur.
pub const FROST_SCALE: f32 = 0.1;

/// Blur radius used for the frosted-glass effect.
pub const FROST_RADIUS: u32 = 8;

/// Largest window width for which the mean lookup table is built.
const MAX_TABLE_WINDOW: u64 = 511;

const OPAQUE: u32 = 0xFF00_0000;

/// A blurred buffer together with its (possibly rescaled) dimensions.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Blurred {
    pub pixels: Vec<u32>,
    pub width: usize,
    pub height: usize,
}

/// Blur `pixels` (row-major, `width * height` packed ARGB values) with a square box of
/// side `2 * radius + 1`.
///
/// Samples outside the image repeat the nearest edge pixel. The output is fully opaque.
/// A radius of zero returns an exact copy of the input.
pub fn box_blur(pixels: &[u32], width: usize, height: usize, radius: u32) -> Result<Vec<u32>> {
    check_dimensions(pixels, width, height)?;

    if radius == 0 {
        return Ok(pixels.to_vec());
    }

    let r = radius as usize;
    let mean = Divider::new(2 * radius as u64 + 1);
    let len = width * height;

    let mut red = vec![0u8; len];
    let mut green = vec![0u8; len];
    let mut blue = vec![0u8; len];

    // Horizontal pass: rows of the source into the channel planes.
    for y in 0..height {
        let row = &pixels[y * width..(y + 1) * width];
        let mut sums = window_sum(r, width, |i| channels(row[i]));

        for x in 0..width {
            let idx = y * width + x;
            red[idx] = mean.of(sums[0]);
            green[idx] = mean.of(sums[1]);
            blue[idx] = mean.of(sums[2]);

            let entering = channels(row[x.saturating_add(r + 1).min(width - 1)]);
            let leaving = channels(row[x.saturating_sub(r)]);
            slide(&mut sums, entering, leaving);
        }
    }

    let mut out = vec![0u32; len];

    // Vertical pass: columns of the planes into the output.
    for x in 0..width {
        let plane = |y: usize| {
            let idx = y * width + x;
            [red[idx] as u64, green[idx] as u64, blue[idx] as u64]
        };
        let mut sums = window_sum(r, height, plane);

        for y in 0..height {
            out[y * width + x] = OPAQUE
                | (mean.of(sums[0]) as u32) << 16
                | (mean.of(sums[1]) as u32) << 8
                | mean.of(sums[2]) as u32;

            let entering = plane(y.saturating_add(r + 1).min(height - 1));
            let leaving = plane(y.saturating_sub(r));
            slide(&mut sums, entering, leaving);
        }
    }

    Ok(out)
}

/// Produce the frosted-glass backdrop: shrink to a tenth of the size, then blur.
pub fn frosted(pixels: &[u32], width: usize, height: usize) -> Result<Blurred> {
    check_dimensions(pixels, width, height)?;

    let small_width = scaled(width);
    let small_height = scaled(height);
    let small = downscale_nearest(pixels, width, height, small_width, small_height);
    let blurred = box_blur(&small, small_width, small_height, FROST_RADIUS)?;

    Ok(Blurred {
        pixels: blurred,
        width: small_width,
        height: small_height,
    })
}

/// Nearest-neighbour resample to `new_width x new_height`, sampling pixel centres.
pub fn downscale_nearest(
    pixels: &[u32],
    width: usize,
    height: usize,
    new_width: usize,
    new_height: usize,
) -> Vec<u32> {
    let mut out = Vec::with_capacity(new_width * new_height);
    for y in 0..new_height {
        let src_y = ((2 * y + 1) * height / (2 * new_height)).min(height - 1);
        for x in 0..new_width {
            let src_x = ((2 * x + 1) * width / (2 * new_width)).min(width - 1);
            out.push(pixels[src_y * width + src_x]);
        }
    }
    out
}

fn scaled(dim: usize) -> usize {
    ((dim as f32 * FROST_SCALE).round() as usize).max(1)
}

fn check_dimensions(pixels: &[u32], width: usize, height: usize) -> Result<()> {
    let expected = width.checked_mul(height);
    if width == 0 || height == 0 || expected != Some(pixels.len()) {
        return Err(FlipQuotesError::InvalidBuffer {
            len: pixels.len(),
            width,
            height,
        });
    }
    Ok(())
}

fn channels(pixel: u32) -> [u64; 3] {
    [
        ((pixel >> 16) & 0xFF) as u64,
        ((pixel >> 8) & 0xFF) as u64,
        (pixel & 0xFF) as u64,
    ]
}

fn slide(sums: &mut [u64; 3], entering: [u64; 3], leaving: [u64; 3]) {
    for c in 0..3 {
        // The leaving sample is always part of the current sum.
        sums[c] = sums[c] + entering[c] - leaving[c];
    }
}

/// Sum of `sample(clamp(i, 0, len - 1))` for `i` in `-radius..=radius`.
///
/// Runs in `O(min(radius, len))`: clamped repeats of the boundary samples are counted
/// rather than visited.
fn window_sum(radius: usize, len: usize, sample: impl Fn(usize) -> [u64; 3]) -> [u64; 3] {
    let last = len - 1;
    let inner_end = radius.min(last);

    let first = sample(0);
    let mut sums = first.map(|v| v * radius as u64);

    for i in 0..=inner_end {
        let s = sample(i);
        for c in 0..3 {
            sums[c] += s[c];
        }
    }

    if radius > last {
        let tail = sample(last);
        let repeats = (radius - last) as u64;
        for c in 0..3 {
            sums[c] += tail[c] * repeats;
        }
    }

    sums
}

/// Integer mean over a fixed window width.
enum Divider {
    Table(Vec<u8>),
    Direct(u64),
}

impl Divider {
    fn new(window: u64) -> Self {
        if window <= MAX_TABLE_WINDOW {
            let table = (0..256 * window).map(|sum| (sum / window) as u8).collect();
            Divider::Table(table)
        } else {
            Divider::Direct(window)
        }
    }

    fn of(&self, sum: u64) -> u8 {
        match self {
            Divider::Table(table) => table[sum as usize],
            Divider::Direct(window) => (sum / window) as u8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rgb(r: u8, g: u8, b: u8) -> u32 {
        OPAQUE | (r as u32) << 16 | (g as u32) << 8 | b as u32
    }

    /// Deterministic pseudo-random test image.
    fn noise(width: usize, height: usize) -> Vec<u32> {
        let mut state = 0x2545_F491u32;
        (0..width * height)
            .map(|_| {
                state ^= state << 13;
                state ^= state >> 17;
                state ^= state << 5;
                state
            })
            .collect()
    }

    /// Per-pixel separable reference: horizontal means, then vertical means, both clamped.
    fn reference(pixels: &[u32], width: usize, height: usize, radius: usize) -> Vec<u32> {
        let clamp = |i: isize, len: usize| i.clamp(0, len as isize - 1) as usize;
        let window = (2 * radius + 1) as u64;
        let r = radius as isize;

        let mut mid = vec![[0u64; 3]; width * height];
        for y in 0..height {
            for x in 0..width {
                let mut sums = [0u64; 3];
                for dx in -r..=r {
                    let s = channels(pixels[y * width + clamp(x as isize + dx, width)]);
                    for c in 0..3 {
                        sums[c] += s[c];
                    }
                }
                mid[y * width + x] = sums.map(|v| v / window);
            }
        }

        let mut out = vec![0u32; width * height];
        for y in 0..height {
            for x in 0..width {
                let mut sums = [0u64; 3];
                for dy in -r..=r {
                    let s = mid[clamp(y as isize + dy, height) * width + x];
                    for c in 0..3 {
                        sums[c] += s[c];
                    }
                }
                let [red, green, blue] = sums.map(|v| (v / window) as u8);
                out[y * width + x] = rgb(red, green, blue);
            }
        }
        out
    }

    #[test]
    fn test_zero_radius_is_identity() {
        let pixels = noise(6, 4);
        let out = box_blur(&pixels, 6, 4, 0).unwrap();
        assert_eq!(out, pixels);
    }

    #[test]
    fn test_dimensions_preserved() {
        for (w, h) in [(1, 1), (1, 9), (9, 1), (7, 5)] {
            let pixels = noise(w, h);
            for radius in [1, 2, 4, 50] {
                assert_eq!(box_blur(&pixels, w, h, radius).unwrap().len(), w * h);
            }
        }
    }

    #[test]
    fn test_single_pixel_any_radius() {
        let pixel = rgb(12, 200, 77);
        for radius in [1, 3, 1000, u32::MAX] {
            assert_eq!(box_blur(&[pixel], 1, 1, radius).unwrap(), vec![pixel]);
        }
    }

    #[test]
    fn test_uniform_image_unchanged() {
        let color = rgb(40, 90, 250);
        let pixels = vec![color; 8 * 3];
        for radius in [1, 2, 7, 100] {
            assert_eq!(box_blur(&pixels, 8, 3, radius).unwrap(), pixels);
        }
    }

    #[test]
    fn test_alpha_forced_opaque() {
        let pixels = vec![0x0010_2030; 4];
        let out = box_blur(&pixels, 2, 2, 1).unwrap();
        assert!(out.iter().all(|p| p >> 24 == 0xFF));
        assert!(out.iter().all(|p| p & 0x00FF_FFFF == 0x0010_2030));
    }

    #[test]
    fn test_row_edges_repeat_boundary_pixel() {
        let pixels = vec![rgb(0, 0, 0), rgb(30, 0, 0), rgb(60, 0, 0)];
        let out = box_blur(&pixels, 3, 1, 1).unwrap();
        // Windows: {0,0,30}, {0,30,60}, {30,60,60}
        assert_eq!(out, vec![rgb(10, 0, 0), rgb(30, 0, 0), rgb(50, 0, 0)]);
    }

    #[test]
    fn test_matches_reference() {
        let (w, h) = (7, 5);
        let pixels = noise(w, h);
        for radius in [1, 2, 3, 6, 10] {
            assert_eq!(
                box_blur(&pixels, w, h, radius as u32).unwrap(),
                reference(&pixels, w, h, radius),
                "radius {}",
                radius
            );
        }
    }

    #[test]
    fn test_large_radius_uses_direct_division() {
        let (w, h) = (4, 3);
        let pixels = noise(w, h);
        // Window of 601 is past the lookup-table limit.
        assert_eq!(
            box_blur(&pixels, w, h, 300).unwrap(),
            reference(&pixels, w, h, 300)
        );
    }

    #[test]
    fn test_horizontal_symmetry_preserved() {
        let (w, h) = (7, 4);
        let base = noise(w, h);
        let pixels: Vec<u32> = (0..w * h)
            .map(|i| {
                let (x, y) = (i % w, i / w);
                base[y * w + x.min(w - 1 - x)]
            })
            .collect();

        for radius in [1, 2, 5, 20] {
            let out = box_blur(&pixels, w, h, radius).unwrap();
            for y in 0..h {
                for x in 0..w {
                    assert_eq!(out[y * w + x], out[y * w + (w - 1 - x)]);
                }
            }
        }
    }

    #[test]
    fn test_invalid_buffer_rejected() {
        assert!(matches!(
            box_blur(&[0; 5], 2, 2, 1),
            Err(FlipQuotesError::InvalidBuffer { len: 5, .. })
        ));
        assert!(box_blur(&[], 0, 0, 1).is_err());
        assert!(box_blur(&[0; 4], 4, 0, 1).is_err());
    }

    #[test]
    fn test_concurrent_calls_are_independent() {
        let pixels = noise(16, 16);
        let expected = box_blur(&pixels, 16, 16, 3).unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let pixels = pixels.clone();
                std::thread::spawn(move || box_blur(&pixels, 16, 16, 3).unwrap())
            })
            .collect();

        for handle in handles {
            assert_eq!(handle.join().unwrap(), expected);
        }
    }

    #[test]
    fn test_frosted_shrinks_and_blurs() {
        let pixels = vec![rgb(9, 9, 9); 40 * 25];
        let frost = frosted(&pixels, 40, 25).unwrap();
        assert_eq!((frost.width, frost.height), (4, 3));
        assert_eq!(frost.pixels, vec![rgb(9, 9, 9); 12]);
    }

    #[test]
    fn test_frosted_tiny_image_keeps_one_pixel() {
        let frost = frosted(&[rgb(1, 2, 3); 4], 2, 2).unwrap();
        assert_eq!((frost.width, frost.height), (1, 1));
        assert_eq!(frost.pixels.len(), 1);
    }

    #[test]
    fn test_downscale_nearest_samples_centres() {
        let pixels: Vec<u32> = (0..16).collect();
        // 4x4 -> 2x2 samples (1,1), (3,1), (1,3), (3,3)
        assert_eq!(downscale_nearest(&pixels, 4, 4, 2, 2), vec![5, 7, 13, 15]);
    }
}
