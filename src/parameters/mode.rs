use std::fmt;

use serde::{Deserialize, Serialize};

use super::catalog::{ParameterCatalog, ParameterSpec, keys};
use super::readings::{AdvancedReadings, BasicReadings, Readings};

/// Which parameter set the user is working with.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    #[default]
    Basic,
    Advanced,
}

impl Mode {
    pub const ALL: [Mode; 2] = [Mode::Basic, Mode::Advanced];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Basic => "basic",
            Self::Advanced => "advanced",
        }
    }

    pub fn profile(self) -> &'static ModeProfile {
        match self {
            Self::Basic => &BASIC_PROFILE,
            Self::Advanced => &ADVANCED_PROFILE,
        }
    }

    /// Canonical keys active in this mode, in catalog order.
    pub fn keys(self) -> &'static [&'static str] {
        self.profile().keys
    }

    pub fn contains(self, key: &str) -> bool {
        self.keys().contains(&key)
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Ordered key set and default readings for one mode.
#[derive(Debug)]
pub struct ModeProfile {
    pub mode: Mode,
    pub keys: &'static [&'static str],
}

impl ModeProfile {
    /// Default form values the mode starts from.
    pub fn defaults(&self) -> Readings {
        match self.mode {
            Mode::Basic => Readings::Basic(BasicReadings::default()),
            Mode::Advanced => Readings::Advanced(AdvancedReadings::default()),
        }
    }

    pub fn specs<'a>(
        &'a self,
        catalog: &'a ParameterCatalog,
    ) -> impl Iterator<Item = &'static ParameterSpec> + 'a {
        self.keys.iter().filter_map(|key| catalog.spec(key))
    }
}

static BASIC_PROFILE: ModeProfile = ModeProfile {
    mode: Mode::Basic,
    keys: &[keys::PH, keys::TEMPERATURE, keys::TURBIDITY],
};

static ADVANCED_PROFILE: ModeProfile = ModeProfile {
    mode: Mode::Advanced,
    keys: &[
        keys::PH,
        keys::TEMPERATURE,
        keys::TURBIDITY,
        keys::DISSOLVED_OXYGEN,
        keys::BOD,
        keys::CO2,
        keys::ALKALINITY,
        keys::HARDNESS,
        keys::CALCIUM,
        keys::AMMONIA,
        keys::NITRITE,
        keys::PHOSPHORUS,
        keys::H2S,
        keys::PLANKTON,
    ],
};
