//! Random placement of non-overlapping boxes on a canvas.
//!
//! Candidates are drawn by rejection sampling: a random top-left corner is
//! proposed and accepted only when it keeps at least the configured gap to
//! every previously accepted box. Each box gets a bounded number of attempts
//! so a crowded canvas fails fast instead of spinning. An unlucky early
//! placement can strand the remaining boxes, so a failed pass restarts the
//! whole layout a bounded number of times.

use rand::Rng;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Edge length of a box in pixels.
pub const DEFAULT_BOX_SIZE: u32 = 80;
/// Minimum spacing between boxes and between a box and the canvas edge.
pub const DEFAULT_GAP: u32 = 10;
/// Candidate positions tried per box before giving up.
pub const MAX_PLACEMENT_ATTEMPTS: usize = 10_000;
/// Full layout passes tried before reporting [`LayoutError::Exhausted`].
pub const MAX_LAYOUT_RESTARTS: usize = 16;

/// Errors raised by [`generate_layout`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum LayoutError {
    /// The canvas cannot fit even one box with its surrounding gap.
    #[error("canvas {width}x{height} cannot fit a {size}px box with a {gap}px gap")]
    CanvasTooSmall {
        width: u32,
        height: u32,
        size: u32,
        gap: u32,
    },
    /// Every layout pass stalled; `index` is where the last pass stopped.
    #[error("no free position for box {index} after {attempts} attempts")]
    Exhausted { index: usize, attempts: usize },
}

/// Canvas dimensions in pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Canvas {
    pub width: u32,
    pub height: u32,
}

impl Canvas {
    /// Square canvas used by the sequence-memory test.
    pub const SEQUENCE: Self = Self {
        width: 500,
        height: 500,
    };
}

/// Box geometry rules applied during placement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BoxSpec {
    pub size: u32,
    pub gap: u32,
}

impl BoxSpec {
    pub const STANDARD: Self = Self {
        size: DEFAULT_BOX_SIZE,
        gap: DEFAULT_GAP,
    };

    /// Number of boxes that fit when packed on a grid at the closest legal
    /// pitch. Random placement jams well before this bound.
    pub const fn grid_capacity(self, canvas: Canvas) -> usize {
        let columns = axis_cells(canvas.width, self.size, self.gap);
        let rows = axis_cells(canvas.height, self.size, self.gap);
        columns as usize * rows as usize
    }
}

impl Default for BoxSpec {
    fn default() -> Self {
        Self::STANDARD
    }
}

/// An axis-aligned box placed on the canvas.
///
/// `x2 = x1 + size` and `y2 = y1 + size`. Ids follow placement order.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct PlacedBox {
    #[schema(example = 0)]
    pub id: usize,
    #[schema(example = 10)]
    pub x1: u32,
    #[schema(example = 10)]
    pub y1: u32,
    #[schema(example = 90)]
    pub x2: u32,
    #[schema(example = 90)]
    pub y2: u32,
}

impl PlacedBox {
    /// Whether `self` comes within `gap` pixels of `other` on both axes.
    ///
    /// Two boxes are clear of each other when, on at least one axis, one lies
    /// strictly beyond the other expanded by `gap`.
    pub fn conflicts_with(&self, other: &Self, gap: u32) -> bool {
        let gap = i64::from(gap);
        let (x1, y1, x2, y2) = self.bounds();
        let (ox1, oy1, ox2, oy2) = other.bounds();
        let clear = x2 < ox1 - gap || x1 > ox2 + gap || y2 < oy1 - gap || y1 > oy2 + gap;
        !clear
    }

    fn bounds(&self) -> (i64, i64, i64, i64) {
        (
            i64::from(self.x1),
            i64::from(self.y1),
            i64::from(self.x2),
            i64::from(self.y2),
        )
    }
}

/// Place `count` boxes on `canvas` so no two conflict.
///
/// # Examples
/// ```
/// use cogbattery::domain::layout::{generate_layout, BoxSpec, Canvas};
/// use rand::SeedableRng;
/// use rand_chacha::ChaCha8Rng;
///
/// let mut rng = ChaCha8Rng::seed_from_u64(7);
/// let boxes = generate_layout(5, Canvas::SEQUENCE, BoxSpec::default(), &mut rng)
///     .expect("five boxes fit");
/// assert_eq!(boxes.len(), 5);
/// ```
pub fn generate_layout<R: Rng + ?Sized>(
    count: usize,
    canvas: Canvas,
    spec: BoxSpec,
    rng: &mut R,
) -> Result<Vec<PlacedBox>, LayoutError> {
    let BoxSpec { size, gap } = spec;
    let (Some(max_x), Some(max_y)) = (
        upper_corner_bound(canvas.width, size, gap),
        upper_corner_bound(canvas.height, size, gap),
    ) else {
        return Err(LayoutError::CanvasTooSmall {
            width: canvas.width,
            height: canvas.height,
            size,
            gap,
        });
    };

    let bounds = (max_x, max_y);
    let mut stalled_at = 0;
    for _ in 0..MAX_LAYOUT_RESTARTS {
        match place_all(count, spec, bounds, rng) {
            Ok(boxes) => return Ok(boxes),
            Err(index) => stalled_at = index,
        }
    }
    Err(LayoutError::Exhausted {
        index: stalled_at,
        attempts: MAX_PLACEMENT_ATTEMPTS,
    })
}

/// One placement pass. Returns the index of the box that found no room.
fn place_all<R: Rng + ?Sized>(
    count: usize,
    spec: BoxSpec,
    (max_x, max_y): (u32, u32),
    rng: &mut R,
) -> Result<Vec<PlacedBox>, usize> {
    let BoxSpec { size, gap } = spec;
    let mut boxes: Vec<PlacedBox> = Vec::with_capacity(count);
    for index in 0..count {
        let placed = (0..MAX_PLACEMENT_ATTEMPTS).find_map(|_| {
            let x1 = rng.random_range(gap..=max_x);
            let y1 = rng.random_range(gap..=max_y);
            let candidate = PlacedBox {
                id: index,
                x1,
                y1,
                x2: x1 + size,
                y2: y1 + size,
            };
            (!boxes.iter().any(|other| candidate.conflicts_with(other, gap)))
                .then_some(candidate)
        });
        boxes.push(placed.ok_or(index)?);
    }
    Ok(boxes)
}

/// Largest admissible top-left coordinate along one axis.
fn upper_corner_bound(extent: u32, size: u32, gap: u32) -> Option<u32> {
    let max = extent.checked_sub(size)?.checked_sub(gap)?;
    (max >= gap).then_some(max)
}

/// Grid cells along one axis. Neighbouring corners must differ by more than
/// `size + gap`.
const fn axis_cells(extent: u32, size: u32, gap: u32) -> u32 {
    let margins = size.saturating_add(gap.saturating_mul(2));
    let pitch = size.saturating_add(gap).saturating_add(1);
    match extent.checked_sub(margins) {
        Some(span) => span / pitch + 1,
        None => 0,
    }
}

#[cfg(test)]
mod tests {
    //! Placement invariants under seeded randomness.

    use super::*;
    use rand::SeedableRng;
    use rand_chacha::ChaCha8Rng;
    use rstest::rstest;

    #[rstest]
    #[case(1)]
    #[case(5)]
    #[case(9)]
    fn boxes_never_conflict(#[case] seed: u64) {
        let mut rng = ChaCha8Rng::seed_from_u64(seed);
        let boxes = generate_layout(9, Canvas::SEQUENCE, BoxSpec::default(), &mut rng)
            .expect("layout fits");

        for (i, a) in boxes.iter().enumerate() {
            for b in boxes.iter().skip(i + 1) {
                assert!(!a.conflicts_with(b, DEFAULT_GAP), "{a:?} overlaps {b:?}");
            }
        }
    }

    #[rstest]
    fn boxes_stay_inside_the_margin() {
        let mut rng = ChaCha8Rng::seed_from_u64(42);
        let boxes = generate_layout(8, Canvas::SEQUENCE, BoxSpec::default(), &mut rng)
            .expect("layout fits");

        for placed in &boxes {
            assert!(placed.x1 >= DEFAULT_GAP && placed.y1 >= DEFAULT_GAP);
            assert!(placed.x2 <= 500 - DEFAULT_GAP && placed.y2 <= 500 - DEFAULT_GAP);
            assert_eq!(placed.x2 - placed.x1, DEFAULT_BOX_SIZE);
            assert_eq!(placed.y2 - placed.y1, DEFAULT_BOX_SIZE);
        }
    }

    #[rstest]
    fn ids_follow_placement_order() {
        let mut rng = ChaCha8Rng::seed_from_u64(3);
        let boxes = generate_layout(6, Canvas::SEQUENCE, BoxSpec::default(), &mut rng)
            .expect("layout fits");
        let ids: Vec<usize> = boxes.iter().map(|b| b.id).collect();
        assert_eq!(ids, vec![0, 1, 2, 3, 4, 5]);
    }

    #[rstest]
    fn same_seed_same_layout() {
        let first = generate_layout(
            5,
            Canvas::SEQUENCE,
            BoxSpec::default(),
            &mut ChaCha8Rng::seed_from_u64(11),
        );
        let second = generate_layout(
            5,
            Canvas::SEQUENCE,
            BoxSpec::default(),
            &mut ChaCha8Rng::seed_from_u64(11),
        );
        assert_eq!(first, second);
    }

    #[rstest]
    #[case(Canvas { width: 99, height: 500 })]
    #[case(Canvas { width: 500, height: 50 })]
    fn tiny_canvas_is_rejected(#[case] canvas: Canvas) {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = generate_layout(1, canvas, BoxSpec::default(), &mut rng)
            .expect_err("canvas too small");
        assert!(matches!(err, LayoutError::CanvasTooSmall { .. }));
    }

    #[rstest]
    fn crowded_canvas_exhausts_attempts() {
        // 100x100 fits exactly one 80px box with a 10px margin.
        let canvas = Canvas {
            width: 100,
            height: 100,
        };
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let err = generate_layout(2, canvas, BoxSpec::default(), &mut rng)
            .expect_err("second box cannot fit");
        assert_eq!(
            err,
            LayoutError::Exhausted {
                index: 1,
                attempts: MAX_PLACEMENT_ATTEMPTS
            }
        );
    }

    #[rstest]
    #[case(Canvas::SEQUENCE, 25)]
    #[case(Canvas { width: 100, height: 100 }, 1)]
    #[case(Canvas { width: 191, height: 100 }, 2)]
    #[case(Canvas { width: 99, height: 500 }, 0)]
    fn grid_capacity_counts_legal_cells(#[case] canvas: Canvas, #[case] expected: usize) {
        assert_eq!(BoxSpec::STANDARD.grid_capacity(canvas), expected);
    }

    #[rstest]
    fn half_the_grid_fits_for_every_seed() {
        let count = BoxSpec::STANDARD.grid_capacity(Canvas::SEQUENCE) / 2;
        for seed in 0..128 {
            let mut rng = ChaCha8Rng::seed_from_u64(seed);
            let boxes = generate_layout(count, Canvas::SEQUENCE, BoxSpec::STANDARD, &mut rng)
                .unwrap_or_else(|err| panic!("seed {seed}: {err}"));
            assert_eq!(boxes.len(), count);
        }
    }

    #[rstest]
    fn zero_boxes_yield_empty_layout() {
        let mut rng = ChaCha8Rng::seed_from_u64(0);
        let boxes = generate_layout(0, Canvas::SEQUENCE, BoxSpec::default(), &mut rng)
            .expect("empty layout");
        assert!(boxes.is_empty());
    }

    #[rstest]
    #[case(PlacedBox { id: 1, x1: 90, y1: 0, x2: 170, y2: 80 }, true)]
    #[case(PlacedBox { id: 1, x1: 91, y1: 0, x2: 171, y2: 80 }, false)]
    #[case(PlacedBox { id: 1, x1: 0, y1: 90, x2: 80, y2: 170 }, true)]
    #[case(PlacedBox { id: 1, x1: 0, y1: 91, x2: 80, y2: 171 }, false)]
    fn gap_boundary_is_inclusive(#[case] other: PlacedBox, #[case] conflicts: bool) {
        let origin = PlacedBox {
            id: 0,
            x1: 0,
            y1: 0,
            x2: 80,
            y2: 80,
        };
        assert_eq!(origin.conflicts_with(&other, DEFAULT_GAP), conflicts);
    }
}
