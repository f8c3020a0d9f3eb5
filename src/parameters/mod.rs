//! Water parameter vocabulary: catalog, modes, typed readings and range tables.

mod catalog;
mod mode;
mod ranges;
mod readings;
mod validation;

use std::borrow::Borrow;
use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};

pub use catalog::{ParameterCatalog, ParameterSpec, keys};
pub use mode::{Mode, ModeProfile};
pub use ranges::{
    ImportanceWeights, OptimalRange, OptimalRanges, ParameterInfluence, ParameterStatus,
};
pub use readings::{AdvancedReadings, BasicReadings, FormState, Readings};
pub use validation::{ValidationError, parse_input};

/// Canonical identifier of a water parameter, e.g. `dissolved_oxygen`.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterKey(String);

impl ParameterKey {
    pub fn new(key: impl Into<String>) -> Self {
        Self(key.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl From<&str> for ParameterKey {
    fn from(key: &str) -> Self {
        Self(key.to_string())
    }
}

impl Borrow<str> for ParameterKey {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for ParameterKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Observed value per parameter for the active mode.
pub type Observations = BTreeMap<ParameterKey, f64>;
