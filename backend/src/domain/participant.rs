//! Participant details captured on the start form.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Name recorded when the form leaves it blank.
pub const ANONYMOUS_NAME: &str = "anonymous";
/// Placeholder for other blank fields.
pub const NOT_AVAILABLE: &str = "N/A";
/// Maximum stored length of any participant field, in characters.
pub const FIELD_MAX_CHARS: usize = 64;

/// Raw, possibly partial participant form input.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
pub struct ParticipantDraft {
    pub name: Option<String>,
    pub age: Option<String>,
    pub gender: Option<String>,
    pub test_date: Option<String>,
}

/// Participant identity attached to every stored result.
///
/// ## Invariants
/// - Every field is trimmed, non-empty and at most [`FIELD_MAX_CHARS`]
///   characters.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(from = "ParticipantDraft")]
pub struct Participant {
    #[schema(example = "Ada")]
    name: String,
    #[schema(example = "36")]
    age: String,
    #[schema(example = "F")]
    gender: String,
    #[schema(example = "2024-05-01")]
    test_date: String,
}

impl Participant {
    /// Normalise form input, substituting defaults for blank fields.
    ///
    /// # Examples
    /// ```
    /// use cogbattery::domain::{Participant, ParticipantDraft};
    ///
    /// let participant = Participant::from_draft(ParticipantDraft {
    ///     name: Some("  Ada ".into()),
    ///     ..ParticipantDraft::default()
    /// });
    /// assert_eq!(participant.name(), "Ada");
    /// assert_eq!(participant.age(), "N/A");
    /// ```
    pub fn from_draft(draft: ParticipantDraft) -> Self {
        Self {
            name: normalise(draft.name, ANONYMOUS_NAME),
            age: normalise(draft.age, NOT_AVAILABLE),
            gender: normalise(draft.gender, NOT_AVAILABLE),
            test_date: normalise(draft.test_date, NOT_AVAILABLE),
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn age(&self) -> &str {
        &self.age
    }

    pub fn gender(&self) -> &str {
        &self.gender
    }

    pub fn test_date(&self) -> &str {
        &self.test_date
    }
}

impl From<ParticipantDraft> for Participant {
    fn from(value: ParticipantDraft) -> Self {
        Self::from_draft(value)
    }
}

impl Default for Participant {
    fn default() -> Self {
        Self::from_draft(ParticipantDraft::default())
    }
}

fn normalise(value: Option<String>, fallback: &str) -> String {
    let trimmed = value.as_deref().map(str::trim).unwrap_or_default();
    if trimmed.is_empty() {
        return fallback.to_owned();
    }
    trimmed.chars().take(FIELD_MAX_CHARS).collect()
}
