//! Sequence-memory puzzles.
//!
//! A level `L` puzzle shows `L + 4` boxes and flashes `L + 1` of them in a
//! random order. The participant must reproduce that order exactly.

use rand::Rng;
use rand::seq::index;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::layout::{BoxSpec, Canvas, LayoutError, PlacedBox, generate_layout};

/// Level used for the untimed practice round.
pub const PRACTICE_LEVEL: u32 = 0;

const EXTRA_BOXES: usize = 4;
const EXTRA_FLASHES: usize = 1;

/// Highest level the standard canvas lays out reliably: its boxes take at
/// most half of the grid capacity.
pub const MAX_LEVEL: u32 =
    (BoxSpec::STANDARD.grid_capacity(Canvas::SEQUENCE) / 2 - EXTRA_BOXES) as u32;

/// A generated puzzle: box layout plus the order in which boxes flash.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub struct SequenceProblem {
    pub boxes: Vec<PlacedBox>,
    /// Box ids in flash order. Ids are distinct.
    pub flash_sequence: Vec<usize>,
    pub flash_count: usize,
}

/// Rejections raised when checking a submitted answer.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AnswerError {
    #[error("answer has {actual} entries but the sequence has {expected}")]
    LengthMismatch { expected: usize, actual: usize },
}

impl SequenceProblem {
    /// Generate a puzzle for `level` on the standard canvas.
    pub fn generate<R: Rng + ?Sized>(level: u32, rng: &mut R) -> Result<Self, LayoutError> {
        let level = level as usize;
        let box_count = level + EXTRA_BOXES;
        let flash_count = level + EXTRA_FLASHES;

        let flash_sequence = index::sample(rng, box_count, flash_count).into_vec();
        let boxes = generate_layout(box_count, Canvas::SEQUENCE, BoxSpec::STANDARD, rng)?;

        Ok(Self {
            boxes,
            flash_sequence,
            flash_count,
        })
    }

    /// Compare `answer` against the flash order.
    ///
    /// Answers of the wrong length are malformed rather than wrong.
    ///
    /// # Examples
    /// ```
    /// use cogbattery::domain::sequence::SequenceProblem;
    /// use rand::SeedableRng;
    /// use rand_chacha::ChaCha8Rng;
    ///
    /// let problem = SequenceProblem::generate(1, &mut ChaCha8Rng::seed_from_u64(1))
    ///     .expect("problem");
    /// let answer = problem.flash_sequence.clone();
    /// assert_eq!(problem.check(&answer), Ok(true));
    /// assert!(problem.check(&[]).is_err());
    /// ```
    pub fn check(&self, answer: &[usize]) -> Result<bool, AnswerError> {
        if answer.len() != self.flash_sequence.len() {
            return Err(AnswerError::LengthMismatch {
                expected: self.flash_sequence.len(),
                actual: answer.len(),
            });
        }
        Ok(answer == self.flash_sequence.as_slice())
    }
}
