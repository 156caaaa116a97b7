// SPDX-License-Identifier: BUSL-1.1
//! # Record Identifiers
//!
//! The backend assigns every record a positive integer key, unique within
//! its resource collection. `RecordId` wraps it so identifiers cannot be
//! confused with stock counts, quantities, or other plain integers that
//! travel in the same payloads.

use serde::{Deserialize, Serialize};
use std::str::FromStr;

/// Identifier of a single record within one resource collection.
///
/// Serialized transparently as a JSON number.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RecordId(pub i64);

impl RecordId {
    /// Access the inner integer.
    pub fn get(self) -> i64 {
        self.0
    }
}

impl From<i64> for RecordId {
    fn from(value: i64) -> Self {
        Self(value)
    }
}

impl std::fmt::Display for RecordId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl FromStr for RecordId {
    type Err = std::num::ParseIntError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        s.trim().parse().map(Self)
    }
}
