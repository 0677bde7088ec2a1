//! STLVault application icon generator.
//!
//! Produces a procedural icon: an isometric cube (the printable model) on a
//! rounded dark tile (the vault). Rendered at any resolution as RGBA pixel
//! data for use as the window icon.

/// Generate the icon as egui `IconData`.
pub fn generate_icon(size: u32) -> egui::IconData {
    egui::IconData {
        rgba: render_icon(size),
        width: size,
        height: size,
    }
}

const TILE: [f32; 3] = [30.0, 30.0, 46.0];
const TOP: [f32; 3] = [137.0, 180.0, 250.0];
const LEFT: [f32; 3] = [90.0, 130.0, 208.0];
const RIGHT: [f32; 3] = [58.0, 90.0, 160.0];

/// Sub-samples per axis for anti-aliasing.
const SAMPLES: u32 = 4;

type Quad = [(f32, f32); 4];

/// Render the icon into an RGBA buffer (top-to-bottom row order).
pub fn render_icon(size: u32) -> Vec<u8> {
    let s = size as f32;
    let faces = cube_faces(s);
    let mut pixels = vec![0u8; (size * size * 4) as usize];
    let n = (SAMPLES * SAMPLES) as f32;

    for y in 0..size {
        for x in 0..size {
            let mut rgb = [0.0f32; 3];
            let mut coverage = 0.0f32;
            for sy in 0..SAMPLES {
                for sx in 0..SAMPLES {
                    let px = x as f32 + (sx as f32 + 0.5) / SAMPLES as f32;
                    let py = y as f32 + (sy as f32 + 0.5) / SAMPLES as f32;
                    if let Some(color) = sample(px, py, s, &faces) {
                        for (acc, c) in rgb.iter_mut().zip(color) {
                            *acc += c;
                        }
                        coverage += 1.0;
                    }
                }
            }

            let idx = ((y * size + x) * 4) as usize;
            if coverage > 0.0 {
                for (i, acc) in rgb.iter().enumerate() {
                    pixels[idx + i] = (acc / coverage).round().clamp(0.0, 255.0) as u8;
                }
            }
            pixels[idx + 3] = (coverage / n * 255.0).round() as u8;
        }
    }
    pixels
}

fn sample(px: f32, py: f32, s: f32, faces: &[(Quad, [f32; 3]); 3]) -> Option<[f32; 3]> {
    faces
        .iter()
        .find(|(quad, _)| inside_convex(quad, px, py))
        .map(|(_, color)| *color)
        .or_else(|| in_rounded_tile(px, py, s).then_some(TILE))
}

/// Top, left and right faces of an isometric cube centred on the tile.
fn cube_faces(s: f32) -> [(Quad, [f32; 3]); 3] {
    let (cx, cy) = (s * 0.5, s * 0.52);
    let r = s * 0.32;
    let v = |i: usize| {
        let theta = (-90.0f32 + 60.0 * i as f32).to_radians();
        (cx + r * theta.cos(), cy + r * theta.sin())
    };
    let c = (cx, cy);
    [
        ([v(0), v(1), c, v(5)], TOP),
        ([v(5), c, v(3), v(4)], LEFT),
        ([c, v(1), v(2), v(3)], RIGHT),
    ]
}

/// Point-in-polygon for a convex quad of either winding.
fn inside_convex(quad: &Quad, px: f32, py: f32) -> bool {
    let mut sign = 0.0f32;
    for i in 0..quad.len() {
        let (ax, ay) = quad[i];
        let (bx, by) = quad[(i + 1) % quad.len()];
        let cross = (bx - ax) * (py - ay) - (by - ay) * (px - ax);
        if cross.abs() < f32::EPSILON {
            continue;
        }
        if sign == 0.0 {
            sign = cross.signum();
        } else if cross.signum() != sign {
            return false;
        }
    }
    true
}

fn in_rounded_tile(px: f32, py: f32, s: f32) -> bool {
    let margin = s * 0.04;
    let radius = s * 0.18;
    let (lo, hi) = (margin + radius, s - margin - radius);
    let dx = (lo - px).max(px - hi).max(0.0);
    let dy = (lo - py).max(py - hi).max(0.0);
    px >= margin && px <= s - margin && py >= margin && py <= s - margin
        && dx * dx + dy * dy <= radius * radius
}
