//! Train identifier derived from an adjacent station pair.

use std::fmt;

use serde::{Deserialize, Serialize};

use super::StationId;
use crate::error::GatewayError;

/// Identifier of a simulated train.
///
/// Generated trains are named `T{current}-{next}` from the ordered pair of
/// adjacent stations they run between, so the same pair always yields the
/// same id across ticks. Ids received from clients are accepted as opaque
/// non-empty strings; an id that no tick ever produced simply matches
/// nothing.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct TrainId(String);

impl TrainId {
    /// Maximum accepted length for a client-supplied train id.
    pub const MAX_LEN: usize = 64;

    /// Derives the train id for the ordered pair `(current, next)`.
    #[must_use]
    pub fn from_pair(current: StationId, next: StationId) -> Self {
        Self(format!("T{current}-{next}"))
    }

    /// Parses a client-supplied train id.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if the id is blank or longer
    /// than [`TrainId::MAX_LEN`].
    pub fn parse(raw: impl Into<String>) -> Result<Self, GatewayError> {
        let raw = raw.into();
        let trimmed = raw.trim();
        if trimmed.is_empty() {
            return Err(GatewayError::InvalidRequest(
                "train id must not be empty".to_string(),
            ));
        }
        if trimmed.len() > Self::MAX_LEN {
            return Err(GatewayError::InvalidRequest(format!(
                "train id exceeds {} characters",
                Self::MAX_LEN
            )));
        }
        Ok(Self(trimmed.to_string()))
    }

    /// Returns the id as a string slice.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl TryFrom<String> for TrainId {
    type Error = GatewayError;

    fn try_from(raw: String) -> Result<Self, Self::Error> {
        Self::parse(raw)
    }
}

impl From<TrainId> for String {
    fn from(id: TrainId) -> Self {
        id.0
    }
}

impl fmt::Display for TrainId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
