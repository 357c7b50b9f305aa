use std::collections::BTreeMap;
use std::path::Path;

use serde::{
    Deserialize,
    Serialize,
};
use tracing::{
    debug,
    warn,
};

use crate::errors::{
    ConfigError,
    LipidSeekError,
};
use crate::models::{
    DecoyStrategy,
    MzTolerance,
};

/// Flat mapping from dotted keys (`GP.UpperLengthLim`, `Adduct.Na`, ...) to numbers.
///
/// Booleans are stored as 0/1. Missing keys fall back to the defaults given by
/// the caller, so a parameter file only needs to list what it changes.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ParameterMap {
    values: BTreeMap<String, f64>,
}

impl ParameterMap {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert(&mut self, key: impl Into<String>, value: f64) -> &mut Self {
        self.values.insert(key.into(), value);
        self
    }

    /// Builder style insert, handy for assembling configurations in code.
    ///
    /// ```
    /// use lipidseek::ParameterMap;
    ///
    /// let params = ParameterMap::new().with("HG.PC", 1.0).with("Adduct.H", 1.0);
    /// assert!(params.flag("HG.PC", false));
    /// assert!(!params.flag("HG.PE", false));
    /// ```
    pub fn with(mut self, key: impl Into<String>, value: f64) -> Self {
        self.values.insert(key.into(), value);
        self
    }

    pub fn get(&self, key: &str) -> Option<f64> {
        self.values.get(key).copied()
    }

    pub fn get_or(&self, key: &str, default: f64) -> f64 {
        self.get(key).unwrap_or(default)
    }

    pub fn flag(&self, key: &str, default: bool) -> bool {
        match self.get(key) {
            Some(x) => x != 0.0,
            None => default,
        }
    }

    /// Integer view of a numeric key. Fractional values truncate toward zero.
    pub fn int_or(&self, key: &str, default: i64) -> i64 {
        match self.get(key) {
            Some(x) if x.is_finite() => x as i64,
            Some(x) => {
                warn!("Ignoring non-finite value {} for {}", x, key);
                default
            }
            None => default,
        }
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, f64)> {
        self.values.iter().map(|(k, v)| (k.as_str(), *v))
    }

    /// Overlays `other` on top of `self`, keys in `other` win.
    pub fn merge(&mut self, other: &ParameterMap) {
        for (k, v) in other.iter() {
            self.values.insert(k.to_string(), v);
        }
    }

    /// Parses the human edited `key = value` format.
    /// `key value` is accepted as well, `#` starts a comment and blank lines are ignored.
    pub fn parse_text(content: &str) -> Result<Self, ConfigError> {
        let mut out = ParameterMap::new();
        for (i, raw) in content.lines().enumerate() {
            let line = match raw.split_once('#') {
                Some((before, _)) => before,
                None => raw,
            }
            .trim();
            if line.is_empty() {
                continue;
            }
            let (key, value) = match line.split_once('=') {
                Some((k, v)) => (k.trim(), v.trim()),
                None => match line.split_once(char::is_whitespace) {
                    Some((k, v)) => (k.trim(), v.trim()),
                    None => {
                        return Err(ConfigError::MalformedLine {
                            line: i + 1,
                            content: raw.to_string(),
                        });
                    }
                },
            };
            if key.is_empty() {
                return Err(ConfigError::MalformedLine {
                    line: i + 1,
                    content: raw.to_string(),
                });
            }
            out.insert(key, parse_value(key, value)?);
        }
        debug!("Parsed {} parameters", out.len());
        Ok(out)
    }

    /// Parses a flat JSON object of numbers or booleans.
    pub fn from_json_value(value: &serde_json::Value) -> Result<Self, ConfigError> {
        let obj = match value.as_object() {
            Some(x) => x,
            None => {
                return Err(ConfigError::NonNumericValue {
                    key: "<root>".into(),
                    value: value.to_string(),
                })
            }
        };
        let mut out = ParameterMap::new();
        for (k, v) in obj.iter() {
            let num = match v {
                serde_json::Value::Number(n) => n.as_f64(),
                serde_json::Value::Bool(b) => Some(if *b { 1.0 } else { 0.0 }),
                serde_json::Value::String(s) => parse_value(k, s).ok(),
                _ => None,
            };
            match num {
                Some(x) => {
                    out.insert(k.clone(), x);
                }
                None => {
                    return Err(ConfigError::NonNumericValue {
                        key: k.clone(),
                        value: v.to_string(),
                    })
                }
            }
        }
        Ok(out)
    }

    pub fn from_json_str(content: &str) -> Result<Self, ConfigError> {
        let value: serde_json::Value =
            serde_json::from_str(content).map_err(|source| ConfigError::JsonError { source })?;
        Self::from_json_value(&value)
    }

    /// Reads a parameter file, JSON if the content starts with `{`, text otherwise.
    pub fn from_path(path: &Path) -> Result<Self, LipidSeekError> {
        let content = std::fs::read_to_string(path).map_err(|source| {
            ConfigError::FileReadingError {
                source,
                path: path.to_path_buf(),
            }
        })?;
        let out = if content.trim_start().starts_with('{') {
            Self::from_json_str(&content)?
        } else {
            Self::parse_text(&content)?
        };
        Ok(out)
    }
}

fn parse_value(key: &str, value: &str) -> Result<f64, ConfigError> {
    match value.to_ascii_lowercase().as_str() {
        "true" | "yes" | "on" => return Ok(1.0),
        "false" | "no" | "off" => return Ok(0.0),
        _ => {}
    }
    value
        .parse::<f64>()
        .map_err(|_| ConfigError::NonNumericValue {
            key: key.to_string(),
            value: value.to_string(),
        })
}

/// Which bond types a chain position may take.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct BondOptions {
    pub acyl: bool,
    pub ether: bool,
    pub lyso: bool,
}

impl Default for BondOptions {
    fn default() -> Self {
        Self {
            acyl: true,
            ether: false,
            lyso: false,
        }
    }
}

impl BondOptions {
    pub const ACYL_ONLY: BondOptions = BondOptions {
        acyl: true,
        ether: false,
        lyso: false,
    };

    fn from_map(map: &ParameterMap, acyl: &str, ether: Option<&str>, lyso: &str) -> Self {
        Self {
            acyl: map.flag(acyl, true),
            ether: ether.map(|k| map.flag(k, false)).unwrap_or(false),
            lyso: map.flag(lyso, false),
        }
    }
}

/// Per-family chain length and double bond limits, inclusive on both ends.
///
/// Bounds are kept signed and unvalidated: a negative or inverted range
/// simply produces an empty chain space.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChainBounds {
    pub lower_length: i64,
    pub upper_length: i64,
    pub lower_double_bonds: i64,
    pub upper_double_bonds: i64,
    pub even_only: bool,
}

impl Default for ChainBounds {
    fn default() -> Self {
        Self {
            lower_length: 14,
            upper_length: 22,
            lower_double_bonds: 0,
            upper_double_bonds: 6,
            even_only: false,
        }
    }
}

impl ChainBounds {
    pub fn from_map(map: &ParameterMap, family: &str) -> Self {
        let def = Self::default();
        Self {
            lower_length: map.int_or(&format!("{}.LowerLengthLim", family), def.lower_length),
            upper_length: map.int_or(&format!("{}.UpperLengthLim", family), def.upper_length),
            lower_double_bonds: map.int_or(
                &format!("{}.LowerDoubleBondLim", family),
                def.lower_double_bonds,
            ),
            upper_double_bonds: map.int_or(
                &format!("{}.UpperDoubleBondLim", family),
                def.upper_double_bonds,
            ),
            even_only: map.flag(&format!("{}.evenOnly", family), def.even_only),
        }
    }
}

/// Typed view over a [`ParameterMap`] with every default resolved.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SearchParameters {
    pub positive_mode: bool,
    pub negative_mode: bool,
    pub gp_bounds: ChainBounds,
    pub gp_positions: [BondOptions; 2],
    pub sl_bounds: ChainBounds,
    pub sl_nacyl: BondOptions,
    pub sl_base_length: (i64, i64),
    pub cl_bounds: ChainBounds,
    pub precursor_tolerance: MzTolerance,
    pub fragment_tolerance: MzTolerance,
    pub peak_number: usize,
    pub intensity_score: bool,
    pub precursor_exclusion: f64,
    pub chunk_size: usize,
    pub decoy_strategy: DecoyStrategy,
}

impl Default for SearchParameters {
    fn default() -> Self {
        Self::from_map(&ParameterMap::default())
    }
}

impl SearchParameters {
    pub fn from_map(map: &ParameterMap) -> Self {
        let gp_positions = [
            BondOptions::from_map(map, "GP.Acyl1", Some("GP.Ether1"), "GP.Lyso1"),
            BondOptions::from_map(map, "GP.Acyl2", Some("GP.Ether2"), "GP.Lyso2"),
        ];
        let peak_number = map.int_or("PeakNumber", 40).max(0) as usize;
        let chunk_size = map.int_or("ChunkSize", 64).max(1) as usize;
        Self {
            positive_mode: map.flag("ESI.Positive", true),
            negative_mode: map.flag("ESI.Negative", true),
            gp_bounds: ChainBounds::from_map(map, "GP"),
            gp_positions,
            sl_bounds: ChainBounds::from_map(map, "SL"),
            sl_nacyl: BondOptions::from_map(map, "SL.Acyl", None, "SL.Lyso"),
            sl_base_length: (
                map.int_or("SL.BaseLowerLengthLim", 18),
                map.int_or("SL.BaseUpperLengthLim", 18),
            ),
            cl_bounds: ChainBounds::from_map(map, "CL"),
            precursor_tolerance: MzTolerance::from_unit_flag(
                map.get_or("mzPreTol", 0.02),
                map.get_or("PreTolUnit", 0.0),
            ),
            fragment_tolerance: MzTolerance::from_unit_flag(
                map.get_or("mzFragTol", 0.02),
                map.get_or("FragTolUnit", 0.0),
            ),
            peak_number,
            intensity_score: map.flag("IntensityScore", true),
            precursor_exclusion: map.get_or("PrecursorExclusion", 1.5).abs(),
            chunk_size,
            decoy_strategy: DecoyStrategy::from_flag(map.get_or("Decoy", 0.0)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_text() {
        let content = "\
# polarity
ESI.Positive = 1
ESI.Negative 0
mzFragTol = 0.5   # dalton
IntensityScore = false

HG.PC=1
";
        let map = ParameterMap::parse_text(content).unwrap();
        assert_eq!(map.len(), 5);
        assert!(map.flag("ESI.Positive", false));
        assert!(!map.flag("ESI.Negative", true));
        assert_eq!(map.get("mzFragTol"), Some(0.5));
        assert_eq!(map.get("IntensityScore"), Some(0.0));
    }

    #[test]
    fn test_parse_text_rejects_garbage() {
        assert!(matches!(
            ParameterMap::parse_text("lonely"),
            Err(ConfigError::MalformedLine { line: 1, .. })
        ));
        assert!(matches!(
            ParameterMap::parse_text("HG.PC = maybe"),
            Err(ConfigError::NonNumericValue { .. })
        ));
    }

    #[test]
    fn test_parse_json() {
        let map =
            ParameterMap::from_json_str(r#"{"HG.PC": 1, "Decoy": true, "mzPreTol": "0.01"}"#)
                .unwrap();
        assert_eq!(map.get("HG.PC"), Some(1.0));
        assert_eq!(map.get("Decoy"), Some(1.0));
        assert_eq!(map.get("mzPreTol"), Some(0.01));
        assert!(ParameterMap::from_json_str(r#"{"HG.PC": [1]}"#).is_err());
    }

    #[test]
    fn test_search_parameters_resolve_defaults() {
        let map = ParameterMap::new()
            .with("GP.UpperLengthLim", 18.0)
            .with("FragTolUnit", 1.0)
            .with("mzFragTol", 10.0)
            .with("Decoy", 1.0);
        let params = SearchParameters::from_map(&map);
        assert_eq!(params.gp_bounds.upper_length, 18);
        assert_eq!(params.gp_bounds.lower_length, 14);
        assert_eq!(params.fragment_tolerance, MzTolerance::Ppm(10.0));
        assert_eq!(params.decoy_strategy, DecoyStrategy::Append);
        assert!(params.gp_positions[0].acyl);
        assert!(!params.gp_positions[0].lyso);
    }
}
