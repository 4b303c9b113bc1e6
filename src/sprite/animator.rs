//! Sprite-sheet frame stepper.
//!
//! A sprite sheet packs animation frames into a grid of tiles. The
//! animator shows one tile at a time by shrinking the texture's UV repeat
//! to a single tile and sliding the UV offset across the grid as time
//! passes.

use std::fmt;
use std::time::Duration;

use glam::Vec2;

use crate::scene::TextureMap;

/// Invalid sprite-sheet parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnimatorError {
    /// The grid has zero columns or rows.
    EmptyGrid,
    /// Zero tiles, or more tiles than the grid holds.
    TileCount {
        /// Requested active tiles.
        tiles: u32,
        /// Tiles available in the grid.
        capacity: u32,
    },
    /// Each tile must be shown for a non-zero time.
    ZeroDuration,
}

impl fmt::Display for AnimatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::EmptyGrid => write!(f, "sprite sheet grid has no tiles"),
            Self::TileCount { tiles, capacity } => write!(
                f,
                "sprite sheet tile count {tiles} outside 1..={capacity}"
            ),
            Self::ZeroDuration => {
                write!(f, "sprite sheet tile duration must be non-zero")
            }
        }
    }
}

impl std::error::Error for AnimatorError {}

/// Steps through the tiles of a sprite sheet at a fixed rate.
///
/// Tiles are numbered row-major from the top-left. Only the first
/// `number_of_tiles` are used, so blank trailing cells in the last row
/// are never shown.
#[derive(Debug, Clone, PartialEq)]
pub struct TextureAnimator {
    tiles_horizontal: u32,
    tiles_vertical: u32,
    number_of_tiles: u32,
    tile_display_duration: Duration,
    current_display_time: Duration,
    current_tile: u32,
}

impl TextureAnimator {
    /// Animator over a `tiles_horizontal` x `tiles_vertical` grid showing
    /// `number_of_tiles` tiles for `tile_display_duration` each.
    ///
    /// # Errors
    ///
    /// Returns [`AnimatorError`] for an empty grid, a tile count of zero or
    /// beyond the grid, or a zero duration.
    pub fn new(
        tiles_horizontal: u32,
        tiles_vertical: u32,
        number_of_tiles: u32,
        tile_display_duration: Duration,
    ) -> Result<Self, AnimatorError> {
        if tiles_horizontal == 0 || tiles_vertical == 0 {
            return Err(AnimatorError::EmptyGrid);
        }
        let capacity = tiles_horizontal.saturating_mul(tiles_vertical);
        if number_of_tiles == 0 || number_of_tiles > capacity {
            return Err(AnimatorError::TileCount {
                tiles: number_of_tiles,
                capacity,
            });
        }
        if tile_display_duration.is_zero() {
            return Err(AnimatorError::ZeroDuration);
        }
        Ok(Self {
            tiles_horizontal,
            tiles_vertical,
            number_of_tiles,
            tile_display_duration,
            current_display_time: Duration::ZERO,
            current_tile: 0,
        })
    }

    /// Advance by `elapsed`, skipping as many tiles as fit.
    ///
    /// The sum is taken in `u128` nanoseconds, so even repeated
    /// [`Duration::MAX`] updates step exactly.
    pub fn update(&mut self, elapsed: Duration) {
        let d = self.tile_display_duration.as_nanos();
        let t = self.current_display_time.as_nanos() + elapsed.as_nanos();
        self.current_display_time = duration_from_nanos(t % d);
        let steps = t / d;
        if steps > 0 {
            let tiles = u128::from(self.number_of_tiles);
            self.current_tile = ((u128::from(self.current_tile) + steps % tiles) % tiles) as u32;
        }
    }

    /// Back to the first tile with no accumulated time.
    pub fn reset(&mut self) {
        self.current_tile = 0;
        self.current_display_time = Duration::ZERO;
    }

    /// Index of the tile being shown.
    #[must_use]
    pub fn current_tile(&self) -> u32 {
        self.current_tile
    }

    /// Grid column of the current tile.
    #[must_use]
    pub fn column(&self) -> u32 {
        self.current_tile % self.tiles_horizontal
    }

    /// Grid row of the current tile, counted from the top.
    #[must_use]
    pub fn row(&self) -> u32 {
        self.current_tile / self.tiles_horizontal
    }

    /// Time accumulated towards the next tile.
    #[must_use]
    pub fn display_time(&self) -> Duration {
        self.current_display_time
    }

    /// Number of tiles cycled through.
    #[must_use]
    pub fn number_of_tiles(&self) -> u32 {
        self.number_of_tiles
    }

    /// UV offset selecting the current tile.
    #[must_use]
    pub fn uv_offset(&self) -> Vec2 {
        Vec2::new(
            self.column() as f32 / self.tiles_horizontal as f32,
            self.row() as f32 / self.tiles_vertical as f32,
        )
    }

    /// UV scale covering exactly one tile.
    #[must_use]
    pub fn uv_repeat(&self) -> Vec2 {
        Vec2::new(
            1.0 / self.tiles_horizontal as f32,
            1.0 / self.tiles_vertical as f32,
        )
    }

    /// Point `map` at the current tile.
    pub fn apply(&self, map: &mut TextureMap) {
        map.repeat = self.uv_repeat();
        map.offset = self.uv_offset();
    }
}

/// Exact inverse of [`Duration::as_nanos`] for values that fit a
/// `Duration`.
fn duration_from_nanos(nanos: u128) -> Duration {
    const NANOS_PER_SEC: u128 = 1_000_000_000;
    Duration::new((nanos / NANOS_PER_SEC) as u64, (nanos % NANOS_PER_SEC) as u32)
}

#[cfg(test)]
mod tests {
    use rand::rngs::StdRng;
    use rand::{Rng, SeedableRng};

    use super::*;
    use crate::scene::TextureId;

    fn ms(n: u64) -> Duration {
        Duration::from_millis(n)
    }

    #[test]
    fn rejects_invalid_parameters() {
        assert_eq!(
            TextureAnimator::new(0, 1, 1, ms(75)),
            Err(AnimatorError::EmptyGrid)
        );
        assert_eq!(
            TextureAnimator::new(4, 4, 17, ms(75)),
            Err(AnimatorError::TileCount {
                tiles: 17,
                capacity: 16
            })
        );
        assert!(TextureAnimator::new(4, 4, 0, ms(75)).is_err());
        assert_eq!(
            TextureAnimator::new(10, 1, 10, Duration::ZERO),
            Err(AnimatorError::ZeroDuration)
        );
    }

    #[test]
    fn advances_on_reaching_duration() {
        let Ok(mut anim) = TextureAnimator::new(10, 1, 10, ms(75)) else {
            panic!("valid parameters");
        };
        anim.update(ms(74));
        assert_eq!(anim.current_tile(), 0);
        anim.update(ms(1));
        assert_eq!(anim.current_tile(), 1);
        assert_eq!(anim.display_time(), Duration::ZERO);
    }

    #[test]
    fn long_update_skips_and_wraps() {
        let Ok(mut anim) = TextureAnimator::new(4, 4, 16, ms(100)) else {
            panic!("valid parameters");
        };
        anim.update(ms(1750));
        assert_eq!(anim.current_tile(), 1);
        assert_eq!(anim.display_time(), ms(50));
    }

    #[test]
    fn tile_index_matches_elapsed_multiples() {
        let mut rng = StdRng::seed_from_u64(7);
        for _ in 0..50 {
            let h = rng.random_range(1..6);
            let v = rng.random_range(1..6);
            let n = rng.random_range(1..=h * v);
            let d = Duration::from_micros(rng.random_range(1..200_000));
            let Ok(mut anim) = TextureAnimator::new(h, v, n, d) else {
                panic!("valid parameters");
            };
            let k: u32 = rng.random_range(0..100);
            // split k * d into random chunks
            let mut remaining = d * k;
            while !remaining.is_zero() {
                let max = remaining.as_nanos().min(3 * d.as_nanos()) as u64;
                let chunk = Duration::from_nanos(rng.random_range(1..=max));
                anim.update(chunk);
                remaining -= chunk;
            }
            assert_eq!(anim.current_tile(), k % n);
            assert_eq!(anim.column(), (k % n) % h);
            assert_eq!(anim.row(), (k % n) / h);
        }
    }

    #[test]
    fn uv_transform_selects_tile() {
        let Ok(mut anim) = TextureAnimator::new(4, 4, 16, ms(100)) else {
            panic!("valid parameters");
        };
        anim.update(ms(600));
        assert_eq!((anim.column(), anim.row()), (2, 1));
        assert_eq!(anim.uv_offset(), Vec2::new(0.5, 0.25));
        assert_eq!(anim.uv_repeat(), Vec2::splat(0.25));

        let mut map = TextureMap::new(TextureId(0));
        anim.apply(&mut map);
        assert_eq!(map.transform_uv(Vec2::ZERO), Vec2::new(0.5, 0.25));
        assert_eq!(map.transform_uv(Vec2::ONE), Vec2::new(0.75, 0.5));
    }

    #[test]
    fn reset_returns_to_first_tile() {
        let Ok(mut anim) = TextureAnimator::new(10, 1, 10, ms(75)) else {
            panic!("valid parameters");
        };
        anim.update(ms(400));
        anim.reset();
        assert_eq!(anim.current_tile(), 0);
        assert_eq!(anim.display_time(), Duration::ZERO);
    }

    #[test]
    fn max_duration_updates_stay_exact() {
        let Ok(mut anim) = TextureAnimator::new(10, 1, 10, Duration::from_secs(1)) else {
            panic!("valid parameters");
        };
        anim.update(Duration::MAX);
        assert_eq!(anim.current_tile(), 5);
        assert_eq!(anim.display_time(), Duration::from_nanos(999_999_999));
        anim.update(Duration::MAX);
        assert_eq!(anim.current_tile(), 1);
        assert_eq!(anim.display_time(), Duration::from_nanos(999_999_998));
    }
}
