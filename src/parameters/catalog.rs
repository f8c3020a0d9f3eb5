use std::borrow::Cow;
use std::cmp::Ordering;

use super::ParameterKey;

/// Canonical parameter keys shared by the form, the gateway and the chart.
pub mod keys {
    pub const PH: &str = "ph";
    pub const TEMPERATURE: &str = "temperature";
    pub const TURBIDITY: &str = "turbidity";
    pub const DISSOLVED_OXYGEN: &str = "dissolved_oxygen";
    pub const BOD: &str = "bod";
    pub const CO2: &str = "co2";
    pub const ALKALINITY: &str = "alkalinity";
    pub const HARDNESS: &str = "hardness";
    pub const CALCIUM: &str = "calcium";
    pub const AMMONIA: &str = "ammonia";
    pub const NITRITE: &str = "nitrite";
    pub const PHOSPHORUS: &str = "phosphorus";
    pub const H2S: &str = "h2s";
    pub const PLANKTON: &str = "plankton";
}

/// Display metadata and input constraints for one water parameter.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ParameterSpec {
    pub key: &'static str,
    pub display_name: &'static str,
    pub unit: Option<&'static str>,
    pub min: Option<f64>,
    pub max: Option<f64>,
    pub step: Option<f64>,
}

impl ParameterSpec {
    const fn new(
        key: &'static str,
        display_name: &'static str,
        unit: Option<&'static str>,
    ) -> Self {
        Self {
            key,
            display_name,
            unit,
            min: Some(0.0),
            max: None,
            step: Some(0.1),
        }
    }

    const fn max(mut self, max: f64) -> Self {
        self.max = Some(max);
        self
    }

    const fn step(mut self, step: f64) -> Self {
        self.step = Some(step);
        self
    }

    /// Form label, e.g. `Temperature (°C)`.
    pub fn label(&self) -> String {
        match self.unit {
            Some(unit) => format!("{} ({unit})", self.display_name),
            None => self.display_name.to_string(),
        }
    }
}

/// Declaration order doubles as the ranking tie-break order.
static STANDARD: [ParameterSpec; 14] = [
    ParameterSpec::new(keys::PH, "pH", None).max(14.0),
    ParameterSpec::new(keys::TEMPERATURE, "Temperature", Some("°C")).max(50.0),
    ParameterSpec::new(keys::TURBIDITY, "Turbidity", Some("cm")).max(200.0),
    ParameterSpec::new(keys::DISSOLVED_OXYGEN, "Dissolved Oxygen", Some("mg/L")).max(20.0),
    ParameterSpec::new(keys::BOD, "BOD", Some("mg/L")).max(20.0),
    ParameterSpec::new(keys::CO2, "CO₂", Some("mg/L")).max(50.0),
    ParameterSpec::new(keys::ALKALINITY, "Alkalinity", Some("mg/L")),
    ParameterSpec::new(keys::HARDNESS, "Hardness", Some("mg/L")),
    ParameterSpec::new(keys::CALCIUM, "Calcium", Some("mg/L")),
    ParameterSpec::new(keys::AMMONIA, "Ammonia", Some("mg/L")).step(0.001),
    ParameterSpec::new(keys::NITRITE, "Nitrite", Some("mg/L")).step(0.001),
    ParameterSpec::new(keys::PHOSPHORUS, "Phosphorus", Some("mg/L")).step(0.001),
    ParameterSpec::new(keys::H2S, "H₂S", Some("mg/L")).step(0.001),
    ParameterSpec::new(keys::PLANKTON, "Plankton", Some("No. L⁻¹")).step(1.0),
];

/// Ordered registry of parameter specs.
#[derive(Clone, Copy, Debug)]
pub struct ParameterCatalog {
    specs: &'static [ParameterSpec],
}

impl ParameterCatalog {
    /// The built-in catalog of the fourteen water parameters.
    pub fn standard() -> Self {
        Self { specs: &STANDARD }
    }

    pub fn from_specs(specs: &'static [ParameterSpec]) -> Self {
        Self { specs }
    }

    pub fn specs(&self) -> &'static [ParameterSpec] {
        self.specs
    }

    pub fn spec(&self, key: &str) -> Option<&'static ParameterSpec> {
        self.specs.iter().find(|spec| spec.key == key)
    }

    /// Declaration index of `key`, if the catalog knows it.
    pub fn position(&self, key: &str) -> Option<usize> {
        self.specs.iter().position(|spec| spec.key == key)
    }

    /// Display name for `key`, deriving one for keys outside the catalog.
    pub fn display_name(&self, key: &str) -> Cow<'static, str> {
        match self.spec(key) {
            Some(spec) => Cow::Borrowed(spec.display_name),
            None => Cow::Owned(derive_display_name(key)),
        }
    }

    /// Catalog declaration order; unknown keys sort after known ones, by key.
    pub fn compare(&self, a: &ParameterKey, b: &ParameterKey) -> Ordering {
        match (self.position(a.as_str()), self.position(b.as_str())) {
            (Some(left), Some(right)) => left.cmp(&right),
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => a.cmp(b),
        }
    }
}

impl Default for ParameterCatalog {
    fn default() -> Self {
        Self::standard()
    }
}

/// Capitalize the first letter and turn the first underscore into a space.
fn derive_display_name(key: &str) -> String {
    let mut chars = key.chars();
    let Some(first) = chars.next() else {
        return String::new();
    };
    let rest = chars.as_str().replacen('_', " ", 1);
    let mut name: String = first.to_uppercase().collect();
    name.push_str(&rest);
    name
}
