use serde::{Deserialize, Serialize};

use super::catalog::keys;
use super::{Mode, Observations, ParameterKey};

/// Form values for the three-field basic model.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct BasicReadings {
    pub ph: f64,
    pub temperature: f64,
    pub turbidity: f64,
}

impl Default for BasicReadings {
    fn default() -> Self {
        Self {
            ph: 7.2,
            temperature: 28.5,
            turbidity: 45.2,
        }
    }
}

impl BasicReadings {
    fn fields(&self) -> [(&'static str, f64); 3] {
        [
            (keys::PH, self.ph),
            (keys::TEMPERATURE, self.temperature),
            (keys::TURBIDITY, self.turbidity),
        ]
    }

    fn fields_mut(&mut self) -> [(&'static str, &mut f64); 3] {
        [
            (keys::PH, &mut self.ph),
            (keys::TEMPERATURE, &mut self.temperature),
            (keys::TURBIDITY, &mut self.turbidity),
        ]
    }
}

/// Form values for the fourteen-field advanced model.
///
/// Dissolved oxygen travels as `DO` on the wire.
#[derive(Clone, Copy, Debug, PartialEq, Serialize, Deserialize)]
pub struct AdvancedReadings {
    pub temperature: f64,
    pub turbidity: f64,
    #[serde(rename = "DO")]
    pub dissolved_oxygen: f64,
    pub bod: f64,
    pub co2: f64,
    pub ph: f64,
    pub alkalinity: f64,
    pub hardness: f64,
    pub calcium: f64,
    pub ammonia: f64,
    pub nitrite: f64,
    pub phosphorus: f64,
    pub h2s: f64,
    pub plankton: f64,
}

impl Default for AdvancedReadings {
    fn default() -> Self {
        Self {
            temperature: 28.5,
            turbidity: 45.2,
            dissolved_oxygen: 6.8,
            bod: 2.5,
            co2: 10.2,
            ph: 7.2,
            alkalinity: 120.0,
            hardness: 150.0,
            calcium: 40.0,
            ammonia: 0.05,
            nitrite: 0.01,
            phosphorus: 0.2,
            h2s: 0.002,
            plankton: 500.0,
        }
    }
}

impl AdvancedReadings {
    fn fields(&self) -> [(&'static str, f64); 14] {
        [
            (keys::PH, self.ph),
            (keys::TEMPERATURE, self.temperature),
            (keys::TURBIDITY, self.turbidity),
            (keys::DISSOLVED_OXYGEN, self.dissolved_oxygen),
            (keys::BOD, self.bod),
            (keys::CO2, self.co2),
            (keys::ALKALINITY, self.alkalinity),
            (keys::HARDNESS, self.hardness),
            (keys::CALCIUM, self.calcium),
            (keys::AMMONIA, self.ammonia),
            (keys::NITRITE, self.nitrite),
            (keys::PHOSPHORUS, self.phosphorus),
            (keys::H2S, self.h2s),
            (keys::PLANKTON, self.plankton),
        ]
    }

    fn fields_mut(&mut self) -> [(&'static str, &mut f64); 14] {
        [
            (keys::PH, &mut self.ph),
            (keys::TEMPERATURE, &mut self.temperature),
            (keys::TURBIDITY, &mut self.turbidity),
            (keys::DISSOLVED_OXYGEN, &mut self.dissolved_oxygen),
            (keys::BOD, &mut self.bod),
            (keys::CO2, &mut self.co2),
            (keys::ALKALINITY, &mut self.alkalinity),
            (keys::HARDNESS, &mut self.hardness),
            (keys::CALCIUM, &mut self.calcium),
            (keys::AMMONIA, &mut self.ammonia),
            (keys::NITRITE, &mut self.nitrite),
            (keys::PHOSPHORUS, &mut self.phosphorus),
            (keys::H2S, &mut self.h2s),
            (keys::PLANKTON, &mut self.plankton),
        ]
    }
}

/// A complete set of readings for exactly one mode.
///
/// Serializes to the request body of that mode's predict endpoint.
#[derive(Clone, Copy, Debug, PartialEq, Serialize)]
#[serde(untagged)]
pub enum Readings {
    Basic(BasicReadings),
    Advanced(AdvancedReadings),
}

impl Readings {
    pub fn mode(&self) -> Mode {
        match self {
            Self::Basic(_) => Mode::Basic,
            Self::Advanced(_) => Mode::Advanced,
        }
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        match self {
            Self::Basic(readings) => lookup(&readings.fields(), key),
            Self::Advanced(readings) => lookup(&readings.fields(), key),
        }
    }

    /// Canonical observation map; values pass through untouched, NaN included.
    pub fn observations(&self) -> Observations {
        match self {
            Self::Basic(readings) => collect(&readings.fields()),
            Self::Advanced(readings) => collect(&readings.fields()),
        }
    }
}

fn lookup(fields: &[(&'static str, f64)], key: &str) -> Option<f64> {
    fields
        .iter()
        .find(|(name, _)| *name == key)
        .map(|(_, value)| *value)
}

fn collect(fields: &[(&'static str, f64)]) -> Observations {
    fields
        .iter()
        .map(|(key, value)| (ParameterKey::from(*key), *value))
        .collect()
}

fn assign<const N: usize>(fields: [(&'static str, &mut f64); N], key: &str, value: f64) -> bool {
    for (name, slot) in fields {
        if name == key {
            *slot = value;
            return true;
        }
    }
    false
}

/// Both modes' form values, retained independently across mode switches.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct FormState {
    pub basic: BasicReadings,
    pub advanced: AdvancedReadings,
}

impl FormState {
    pub fn readings(&self, mode: Mode) -> Readings {
        match mode {
            Mode::Basic => Readings::Basic(self.basic),
            Mode::Advanced => Readings::Advanced(self.advanced),
        }
    }

    pub fn get(&self, mode: Mode, key: &str) -> Option<f64> {
        self.readings(mode).get(key)
    }

    /// Update one field of `mode`'s form; `false` when the mode has no such field.
    pub fn set(&mut self, mode: Mode, key: &str, value: f64) -> bool {
        match mode {
            Mode::Basic => assign(self.basic.fields_mut(), key, value),
            Mode::Advanced => assign(self.advanced.fields_mut(), key, value),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn advanced_body_uses_do_alias() {
        let body = serde_json::to_value(Readings::Advanced(AdvancedReadings::default())).unwrap();
        assert_eq!(body["DO"], 6.8);
        assert!(body.get("dissolved_oxygen").is_none());
        assert_eq!(body.as_object().unwrap().len(), 14);
    }

    #[test]
    fn basic_body_has_three_fields() {
        let body = serde_json::to_value(Readings::Basic(BasicReadings::default())).unwrap();
        assert_eq!(body, serde_json::json!({"ph": 7.2, "temperature": 28.5, "turbidity": 45.2}));
    }

    #[test]
    fn editing_one_mode_leaves_the_other_alone() {
        let mut forms = FormState::default();
        assert!(forms.set(Mode::Basic, keys::PH, 5.0));
        assert_eq!(forms.get(Mode::Basic, keys::PH), Some(5.0));
        assert_eq!(forms.get(Mode::Advanced, keys::PH), Some(7.2));
    }

    #[test]
    fn rejects_fields_outside_the_mode() {
        let mut forms = FormState::default();
        assert!(!forms.set(Mode::Basic, keys::AMMONIA, 1.0));
        assert!(forms.set(Mode::Advanced, keys::DISSOLVED_OXYGEN, 4.0));
        assert_eq!(forms.advanced.dissolved_oxygen, 4.0);
    }

    #[test]
    fn observations_keep_nan() {
        let mut forms = FormState::default();
        forms.set(Mode::Basic, keys::TURBIDITY, f64::NAN);
        let observed = forms.readings(Mode::Basic).observations();
        assert!(observed[keys::TURBIDITY].is_nan());
    }
}
