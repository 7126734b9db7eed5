//! Type-safe station identifier.
//!
//! [`StationId`] wraps the positive integer key assigned by the station
//! store. Deserialization rejects zero and negative values, so a malformed
//! identifier never reaches the subscription router.

use std::fmt;

use serde::{Deserialize, Serialize};

use crate::error::GatewayError;

/// Stable identifier of a station in the directory.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(try_from = "i64", into = "i32")]
pub struct StationId(i32);

impl StationId {
    /// Creates a `StationId`, rejecting non-positive values.
    ///
    /// # Errors
    ///
    /// Returns [`GatewayError::InvalidRequest`] if `raw` is zero, negative,
    /// or does not fit in an `i32`.
    pub fn new(raw: i64) -> Result<Self, GatewayError> {
        i32::try_from(raw)
            .ok()
            .filter(|v| *v > 0)
            .map(Self)
            .ok_or_else(|| GatewayError::InvalidRequest(format!("invalid station id: {raw}")))
    }

    /// Returns the raw integer value.
    #[must_use]
    pub const fn get(self) -> i32 {
        self.0
    }
}

impl TryFrom<i64> for StationId {
    type Error = GatewayError;

    fn try_from(raw: i64) -> Result<Self, Self::Error> {
        Self::new(raw)
    }
}

impl From<StationId> for i32 {
    fn from(id: StationId) -> Self {
        id.0
    }
}

impl fmt::Display for StationId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}
