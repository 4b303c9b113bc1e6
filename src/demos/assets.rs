//! Procedurally painted textures used by the demos.
//!
//! Everything here is deterministic: noisy textures draw from a seeded
//! [`StdRng`], so two runs (and the tests) see identical pixels.

use std::f32::consts::TAU;

use glam::Vec2;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::scene::canvas::{Canvas, Rgba};
use crate::scene::{Color, Image, Wrap};

/// Tiles across the running-figure sheet.
pub const RUN_TILES: u32 = 10;
/// Tiles per side of the explosion sheet.
pub const EXPLOSION_GRID: u32 = 4;

const TILE: u32 = 64;

fn opaque(color: Color) -> Rgba {
    let [r, g, b] = color.to_rgb8();
    [r, g, b, 255]
}

/// Two-tone checkerboard, 8 x 8 cells.
#[must_use]
pub fn checkerboard() -> Image {
    const SIZE: u32 = 128;
    const CELL: u32 = SIZE / 8;
    Image::from_fn(SIZE, SIZE, |x, y| {
        if (x / CELL + y / CELL) % 2 == 0 {
            [224, 224, 224, 255]
        } else {
            [48, 48, 56, 255]
        }
    })
}

/// Planked wooden crate face with a frame and a diagonal brace.
#[must_use]
pub fn wooden_crate() -> Image {
    const SIZE: u32 = 128;
    const FRAME: u32 = 14;
    let mut rng = StdRng::seed_from_u64(0xc2a7e);
    let grain: Vec<f32> = (0..SIZE).map(|_| rng.random_range(-0.06..0.06)).collect();
    let wood = Color::from_hex(0xb5813f);
    Image::from_fn(SIZE, SIZE, |x, y| {
        let frame = x < FRAME || y < FRAME || x >= SIZE - FRAME || y >= SIZE - FRAME;
        let brace = x.abs_diff(SIZE - 1 - y) < FRAME / 2;
        let seam = y % 25 == 0;
        let base = if frame || brace {
            0.62
        } else if seam {
            0.35
        } else {
            0.8
        };
        let along = if frame { y } else { x };
        let streak = grain[along as usize];
        opaque(wood.scale(base + streak))
    })
    .with_wrap(Wrap::Repeat)
}

/// Grey cratered surface, twice as wide as high for wrapping a sphere.
#[must_use]
pub fn moon() -> Image {
    const W: u32 = 256;
    const H: u32 = 128;
    let mut rng = StdRng::seed_from_u64(0x600d);
    let craters: Vec<(Vec2, f32)> = (0..48)
        .map(|_| {
            let center = Vec2::new(rng.random_range(0.0..W as f32), rng.random_range(0.0..H as f32));
            (center, rng.random_range(2.0..14.0))
        })
        .collect();
    Image::from_fn(W, H, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let mut shade = 0.62 + 0.06 * ((p.x * 0.05).sin() * (p.y * 0.09).cos());
        for &(center, radius) in &craters {
            // wrap horizontally so craters cross the seam
            let mut d = (p - center).abs();
            d.x = d.x.min(W as f32 - d.x);
            let r = d.length() / radius;
            if r < 0.85 {
                shade -= 0.12 * (1.0 - r);
            } else if r < 1.0 {
                shade += 0.08;
            }
        }
        opaque(Color::new(0.9, 0.9, 0.88).scale(shade.clamp(0.0, 1.0)))
    })
}

/// Glowing molten rock.
#[must_use]
pub fn lava() -> Image {
    const SIZE: u32 = 128;
    let crust = Color::from_hex(0x2a0800);
    let melt = Color::from_hex(0xff4a00);
    let hot = Color::from_hex(0xffd23a);
    Image::from_fn(SIZE, SIZE, |x, y| {
        let (fx, fy) = (x as f32 / SIZE as f32 * TAU, y as f32 / SIZE as f32 * TAU);
        // periodic in both axes so repeated maps tile without seams
        let v = (3.0 * fx + 1.5 * (2.0 * fy).sin()).sin() * (2.0 * fy + 1.2 * fx.cos()).cos();
        let t = v * 0.5 + 0.5;
        let color = if t < 0.6 {
            crust.lerp(melt, t / 0.6)
        } else {
            melt.lerp(hot, (t - 0.6) / 0.4)
        };
        opaque(color)
    })
}

/// Pip layout on a unit square for each die face.
fn pips(face: u8) -> &'static [(f32, f32)] {
    const C: f32 = 0.5;
    const L: f32 = 0.25;
    const H: f32 = 0.75;
    match face {
        1 => &[(C, C)],
        2 => &[(L, L), (H, H)],
        3 => &[(L, L), (C, C), (H, H)],
        4 => &[(L, L), (H, L), (L, H), (H, H)],
        5 => &[(L, L), (H, L), (C, C), (L, H), (H, H)],
        _ => &[(L, L), (H, L), (L, C), (H, C), (L, H), (H, H)],
    }
}

/// One face of a die; `face` outside `1..=6` paints six pips.
#[must_use]
pub fn dice(face: u8) -> Image {
    const SIZE: f32 = 64.0;
    let mut canvas = Canvas::with_background(SIZE as u32, SIZE as u32, [40, 40, 40, 255]);
    canvas.fill_rounded_rect(1.0, 1.0, SIZE - 2.0, SIZE - 2.0, 8.0, [246, 244, 236, 255]);
    for &(u, v) in pips(face) {
        canvas.fill_circle(u * SIZE, v * SIZE, 6.0, [20, 20, 20, 255]);
    }
    canvas.into_image()
}

/// Shaded red ball on a transparent background.
#[must_use]
pub fn red_ball() -> Image {
    const SIZE: u32 = 64;
    let center = Vec2::splat(SIZE as f32 * 0.5);
    let radius = SIZE as f32 * 0.5 - 1.0;
    let light = center - Vec2::splat(radius * 0.35);
    Image::from_fn(SIZE, SIZE, |x, y| {
        let p = Vec2::new(x as f32 + 0.5, y as f32 + 0.5);
        let coverage = (radius - p.distance(center) + 0.5).clamp(0.0, 1.0);
        let highlight = 1.0 - (p.distance(light) / (radius * 1.6)).min(1.0);
        let color = Color::from_hex(0x8a0000).lerp(Color::from_hex(0xff6060), highlight);
        let [r, g, b] = color.to_rgb8();
        [r, g, b, (coverage * 255.0) as u8]
    })
}

/// Ten-frame running figure, tiles laid out left to right.
#[must_use]
pub fn run_sheet() -> Image {
    let mut canvas = Canvas::with_background(TILE * RUN_TILES, TILE, [236, 232, 214, 255]);
    let ink = [40, 52, 96, 255];
    for frame in 0..RUN_TILES {
        let phase = frame as f32 / RUN_TILES as f32 * TAU;
        let origin = Vec2::new((frame * TILE) as f32, 0.0);
        let bob = 2.0 * (2.0 * phase).sin().abs();
        let head = origin + Vec2::new(34.0, 12.0 - bob);
        let neck = origin + Vec2::new(32.0, 20.0 - bob);
        let hip = origin + Vec2::new(29.0, 38.0 - bob);

        let swing = phase.sin();
        let knee_a = hip + Vec2::new(8.0 * swing, 10.0);
        let knee_b = hip + Vec2::new(-8.0 * swing, 10.0);
        let foot_a = knee_a + Vec2::new(2.0 * swing - 4.0, 11.0);
        let foot_b = knee_b + Vec2::new(-2.0 * swing - 4.0, 11.0);
        let hand_a = neck + Vec2::new(-10.0 * swing, 14.0);
        let hand_b = neck + Vec2::new(10.0 * swing, 14.0);

        canvas.fill_circle(head.x, head.y, 6.0, ink);
        for (a, b) in [
            (neck, hip),
            (hip, knee_a),
            (knee_a, foot_a),
            (hip, knee_b),
            (knee_b, foot_b),
            (neck, hand_a),
            (neck, hand_b),
        ] {
            canvas.stroke_line(a, b, 4.0, ink);
        }
    }
    canvas.into_image()
}

/// Sixteen-frame fireball on black, tiles in reading order.
#[must_use]
pub fn explosion_sheet() -> Image {
    let side = TILE * EXPLOSION_GRID;
    let mut canvas = Canvas::with_background(side, side, [0, 0, 0, 255]);
    let frames = EXPLOSION_GRID * EXPLOSION_GRID;
    for frame in 0..frames {
        let t = frame as f32 / (frames - 1) as f32;
        let cx = ((frame % EXPLOSION_GRID) * TILE) as f32 + TILE as f32 * 0.5;
        let cy = ((frame / EXPLOSION_GRID) * TILE) as f32 + TILE as f32 * 0.5;
        let radius = 6.0 + 24.0 * t.sqrt();
        let smoke = Color::from_hex(0x3a302a).lerp(Color::BLACK, t);
        let fire = Color::from_hex(0xff7a10).lerp(Color::from_hex(0x601000), t);
        let core = Color::from_hex(0xfff2a0).lerp(fire, t);
        canvas.fill_circle(cx, cy, radius, opaque(smoke));
        canvas.fill_circle(cx, cy, radius * (0.85 - 0.35 * t), opaque(fire));
        canvas.fill_circle(cx, cy, radius * 0.5 * (1.0 - t), opaque(core));
    }
    canvas.into_image()
}

/// Face of the sky box in the order +X, -X, +Y, -Y, +Z, -Z.
#[must_use]
pub fn sky_face(face: usize) -> Image {
    const SIZE: u32 = 128;
    let zenith = Color::from_hex(0x2f62c8);
    let horizon = Color::from_hex(0xd4e4ff);
    let ground = Color::from_hex(0x55663a);
    let image = match face {
        2 => Image::filled(SIZE, SIZE, opaque(zenith)),
        3 => Image::filled(SIZE, SIZE, opaque(ground)),
        _ => {
            let mut canvas = Canvas::new(SIZE, SIZE);
            let half = SIZE / 2;
            for y in 0..SIZE {
                let color = if y < half {
                    zenith.lerp(horizon, y as f32 / half as f32)
                } else {
                    ground.scale(1.0 - 0.3 * (y - half) as f32 / half as f32)
                };
                canvas.fill_rect(0.0, y as f32, SIZE as f32, 1.0, opaque(color));
            }
            if face == 4 {
                canvas.fill_circle(92.0, 30.0, 10.0, [255, 248, 210, 255]);
            }
            canvas.into_image()
        }
    };
    image.with_wrap(Wrap::Clamp)
}

/// Solid face with a white frame and a white dot, for telling the sides
/// of a box apart.
#[must_use]
pub fn marker_face(color: Color) -> Image {
    const SIZE: f32 = 64.0;
    let mut canvas = Canvas::with_background(SIZE as u32, SIZE as u32, opaque(color));
    canvas.stroke_rounded_rect(4.0, 4.0, SIZE - 8.0, SIZE - 8.0, 6.0, 4.0, [255; 4]);
    canvas.fill_circle(SIZE * 0.5, SIZE * 0.5, 8.0, [255; 4]);
    canvas.into_image()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sheets_are_whole_tiles() {
        let run = run_sheet();
        assert_eq!((run.width(), run.height()), (TILE * RUN_TILES, TILE));
        let explosion = explosion_sheet();
        assert_eq!(explosion.width(), TILE * EXPLOSION_GRID);
        assert_eq!(explosion.height(), TILE * EXPLOSION_GRID);
    }

    #[test]
    fn explosion_fades_out() {
        let sheet = explosion_sheet();
        let center = TILE / 2;
        let first = sheet.pixel(center, center).unwrap_or_default();
        let last_origin = TILE * (EXPLOSION_GRID - 1);
        let last = sheet
            .pixel(last_origin + center, last_origin + center)
            .unwrap_or_default();
        let brightness = |p: [u8; 4]| u32::from(p[0]) + u32::from(p[1]) + u32::from(p[2]);
        assert!(brightness(first) > brightness(last));
    }

    #[test]
    fn ball_has_transparent_corners() {
        let ball = red_ball();
        assert!(ball.has_alpha());
        assert_eq!(ball.pixel(0, 0).map(|p| p[3]), Some(0));
        assert_eq!(ball.pixel(32, 32).map(|p| p[3]), Some(255));
    }

    #[test]
    fn dice_faces_differ_by_pip_count() {
        for face in 1..=6u8 {
            assert_eq!(pips(face).len(), usize::from(face));
        }
        assert_ne!(dice(1).pixels(), dice(2).pixels());
    }

    #[test]
    fn textures_are_deterministic() {
        assert_eq!(moon().pixels(), moon().pixels());
        assert_eq!(wooden_crate().pixels(), wooden_crate().pixels());
    }

    #[test]
    fn checkerboard_alternates() {
        let board = checkerboard();
        assert_ne!(board.pixel(0, 0), board.pixel(16, 0));
        assert_eq!(board.pixel(0, 0), board.pixel(16, 16));
    }
}
