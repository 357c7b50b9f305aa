use serde::{
    Deserialize,
    Serialize,
};
use tracing::debug;

use super::constants::{
    MASS_C,
    MASS_ELECTRON,
    MASS_H,
    MASS_K,
    MASS_LI,
    MASS_N,
    MASS_NA,
    MASS_O,
    MASS_PROTON,
};
use crate::parameters::ParameterMap;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Polarity {
    Positive,
    Negative,
}

impl Polarity {
    pub fn sign(&self) -> &'static str {
        match self {
            Polarity::Positive => "+",
            Polarity::Negative => "-",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum AdductType {
    Metal,
    NonMetal,
}

/// Every precursor form the search knows how to build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum AdductKind {
    Protonated,
    Ammoniated,
    Sodiated,
    Potassiated,
    Lithiated,
    Deprotonated,
    DoublyDeprotonated,
    Formate,
    Acetate,
    DoublyDeprotonatedSodiated,
    DoublyDeprotonatedPotassiated,
    DoublyDeprotonatedLithiated,
    DeprotonatedDisodiated,
    DeprotonatedDipotassiated,
    DeprotonatedDilithiated,
}

impl AdductKind {
    pub const ALL: [AdductKind; 15] = [
        AdductKind::Protonated,
        AdductKind::Ammoniated,
        AdductKind::Sodiated,
        AdductKind::Potassiated,
        AdductKind::Lithiated,
        AdductKind::Deprotonated,
        AdductKind::DoublyDeprotonated,
        AdductKind::Formate,
        AdductKind::Acetate,
        AdductKind::DoublyDeprotonatedSodiated,
        AdductKind::DoublyDeprotonatedPotassiated,
        AdductKind::DoublyDeprotonatedLithiated,
        AdductKind::DeprotonatedDisodiated,
        AdductKind::DeprotonatedDipotassiated,
        AdductKind::DeprotonatedDilithiated,
    ];

    /// Configuration keys that must all be enabled for this form to be searched.
    pub fn required_keys(&self) -> &'static [&'static str] {
        match self {
            AdductKind::Protonated | AdductKind::Deprotonated | AdductKind::DoublyDeprotonated => {
                &["Adduct.H"]
            }
            AdductKind::Ammoniated => &["Adduct.NH4"],
            AdductKind::Sodiated => &["Adduct.Na"],
            AdductKind::Potassiated => &["Adduct.K"],
            AdductKind::Lithiated => &["Adduct.Li"],
            AdductKind::Formate => &["Adduct.HCOO"],
            AdductKind::Acetate => &["Adduct.CH3COO"],
            AdductKind::DoublyDeprotonatedSodiated | AdductKind::DeprotonatedDisodiated => {
                &["Adduct.H", "Adduct.Na"]
            }
            AdductKind::DoublyDeprotonatedPotassiated | AdductKind::DeprotonatedDipotassiated => {
                &["Adduct.H", "Adduct.K"]
            }
            AdductKind::DoublyDeprotonatedLithiated | AdductKind::DeprotonatedDilithiated => {
                &["Adduct.H", "Adduct.Li"]
            }
        }
    }

    /// Number of metal cations the form carries.
    pub fn metal_count(&self) -> u8 {
        match self {
            AdductKind::Sodiated
            | AdductKind::Potassiated
            | AdductKind::Lithiated
            | AdductKind::DoublyDeprotonatedSodiated
            | AdductKind::DoublyDeprotonatedPotassiated
            | AdductKind::DoublyDeprotonatedLithiated => 1,
            AdductKind::DeprotonatedDisodiated
            | AdductKind::DeprotonatedDipotassiated
            | AdductKind::DeprotonatedDilithiated => 2,
            _ => 0,
        }
    }

    pub fn adduct(&self) -> Adduct {
        let metal = |m: f64| m - MASS_ELECTRON;
        let (name, description, adduct_type, mass_delta, polarity, charge) = match self {
            AdductKind::Protonated => (
                "[M+H]+",
                "+H",
                AdductType::NonMetal,
                MASS_PROTON,
                Polarity::Positive,
                1,
            ),
            AdductKind::Ammoniated => (
                "[M+NH4]+",
                "+NH4",
                AdductType::NonMetal,
                MASS_N + 4.0 * MASS_H - MASS_ELECTRON,
                Polarity::Positive,
                1,
            ),
            AdductKind::Sodiated => (
                "[M+Na]+",
                "+Na",
                AdductType::Metal,
                metal(MASS_NA),
                Polarity::Positive,
                1,
            ),
            AdductKind::Potassiated => (
                "[M+K]+",
                "+K",
                AdductType::Metal,
                metal(MASS_K),
                Polarity::Positive,
                1,
            ),
            AdductKind::Lithiated => (
                "[M+Li]+",
                "+Li",
                AdductType::Metal,
                metal(MASS_LI),
                Polarity::Positive,
                1,
            ),
            AdductKind::Deprotonated => (
                "[M-H]-",
                "-H",
                AdductType::NonMetal,
                -MASS_PROTON,
                Polarity::Negative,
                1,
            ),
            AdductKind::DoublyDeprotonated => (
                "[M-2H]2-",
                "-2H",
                AdductType::NonMetal,
                -2.0 * MASS_PROTON,
                Polarity::Negative,
                2,
            ),
            AdductKind::Formate => (
                "[M+HCOO]-",
                "+HCOO",
                AdductType::NonMetal,
                MASS_C + MASS_H + 2.0 * MASS_O + MASS_ELECTRON,
                Polarity::Negative,
                1,
            ),
            AdductKind::Acetate => (
                "[M+CH3COO]-",
                "+CH3COO",
                AdductType::NonMetal,
                2.0 * MASS_C + 3.0 * MASS_H + 2.0 * MASS_O + MASS_ELECTRON,
                Polarity::Negative,
                1,
            ),
            AdductKind::DoublyDeprotonatedSodiated => (
                "[M-2H+Na]-",
                "-2H + Na",
                AdductType::Metal,
                -2.0 * MASS_PROTON + metal(MASS_NA),
                Polarity::Negative,
                1,
            ),
            AdductKind::DoublyDeprotonatedPotassiated => (
                "[M-2H+K]-",
                "-2H + K",
                AdductType::Metal,
                -2.0 * MASS_PROTON + metal(MASS_K),
                Polarity::Negative,
                1,
            ),
            AdductKind::DoublyDeprotonatedLithiated => (
                "[M-2H+Li]-",
                "-2H + Li",
                AdductType::Metal,
                -2.0 * MASS_PROTON + metal(MASS_LI),
                Polarity::Negative,
                1,
            ),
            AdductKind::DeprotonatedDisodiated => (
                "[M-H+2Na]+",
                "-H + 2Na",
                AdductType::Metal,
                -MASS_PROTON + 2.0 * metal(MASS_NA),
                Polarity::Positive,
                1,
            ),
            AdductKind::DeprotonatedDipotassiated => (
                "[M-H+2K]+",
                "-H + 2K",
                AdductType::Metal,
                -MASS_PROTON + 2.0 * metal(MASS_K),
                Polarity::Positive,
                1,
            ),
            AdductKind::DeprotonatedDilithiated => (
                "[M-H+2Li]+",
                "-H + 2Li",
                AdductType::Metal,
                -MASS_PROTON + 2.0 * metal(MASS_LI),
                Polarity::Positive,
                1,
            ),
        };
        Adduct {
            kind: *self,
            name,
            description,
            adduct_type,
            mass_delta,
            polarity,
            charge,
        }
    }
}

/// Immutable description of one charged precursor form.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct Adduct {
    pub kind: AdductKind,
    pub name: &'static str,
    pub description: &'static str,
    pub adduct_type: AdductType,
    pub mass_delta: f64,
    pub polarity: Polarity,
    pub charge: u8,
}

impl Adduct {
    /// Total mass of the charged species, before division by charge.
    /// Every catalogue form carries a single molecule.
    pub fn ion_mass(&self, neutral_mass: f64) -> f64 {
        neutral_mass + self.mass_delta
    }

    /// ```
    /// use lipidseek::chemistry::AdductKind;
    ///
    /// let mz = AdductKind::Protonated.adduct().precursor_mz(759.5778);
    /// assert!((mz - 760.5851).abs() < 1e-3);
    /// let mz = AdductKind::DoublyDeprotonated.adduct().precursor_mz(1000.0);
    /// assert!((mz - 498.9927).abs() < 1e-3);
    /// ```
    pub fn precursor_mz(&self, neutral_mass: f64) -> f64 {
        self.ion_mass(neutral_mass) / self.charge as f64
    }

    pub fn is_metal(&self) -> bool {
        matches!(self.adduct_type, AdductType::Metal)
    }
}

/// The adducts enabled for a run, in catalogue order.
#[derive(Debug, Clone, Default)]
pub struct AdductCatalogue {
    adducts: Vec<Adduct>,
}

impl AdductCatalogue {
    pub fn from_parameters(map: &ParameterMap, positive: bool, negative: bool) -> Self {
        let adducts: Vec<Adduct> = AdductKind::ALL
            .iter()
            .filter(|k| k.required_keys().iter().all(|key| map.flag(key, false)))
            .map(|k| k.adduct())
            .filter(|a| match a.polarity {
                Polarity::Positive => positive,
                Polarity::Negative => negative,
            })
            .collect();
        debug!(
            "Enabled adducts: {:?}",
            adducts.iter().map(|a| a.name).collect::<Vec<_>>()
        );
        Self { adducts }
    }

    pub fn from_kinds(kinds: &[AdductKind]) -> Self {
        Self {
            adducts: kinds.iter().map(|k| k.adduct()).collect(),
        }
    }

    pub fn get(&self, kind: AdductKind) -> Option<&Adduct> {
        self.adducts.iter().find(|a| a.kind == kind)
    }

    pub fn iter(&self) -> impl Iterator<Item = &Adduct> {
        self.adducts.iter()
    }

    pub fn len(&self) -> usize {
        self.adducts.len()
    }

    pub fn is_empty(&self) -> bool {
        self.adducts.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compound_adducts_need_all_constituents() {
        let map = ParameterMap::new().with("Adduct.H", 1.0);
        let cat = AdductCatalogue::from_parameters(&map, true, true);
        assert!(cat.get(AdductKind::Protonated).is_some());
        assert!(cat.get(AdductKind::DoublyDeprotonated).is_some());
        assert!(cat.get(AdductKind::DoublyDeprotonatedSodiated).is_none());

        let map = map.with("Adduct.Na", 1.0);
        let cat = AdductCatalogue::from_parameters(&map, true, true);
        assert!(cat.get(AdductKind::DoublyDeprotonatedSodiated).is_some());
        assert!(cat.get(AdductKind::DeprotonatedDisodiated).is_some());
    }

    #[test]
    fn test_polarity_switch() {
        let map = ParameterMap::new().with("Adduct.H", 1.0);
        let cat = AdductCatalogue::from_parameters(&map, true, false);
        assert!(cat.iter().all(|a| a.polarity == Polarity::Positive));
        assert_eq!(cat.len(), 1);
    }

    #[test]
    fn test_masses() {
        let nh4 = AdductKind::Ammoniated.adduct();
        assert!((nh4.mass_delta - 18.033823).abs() < 1e-5);
        let formate = AdductKind::Formate.adduct();
        assert!((formate.mass_delta - 44.998203).abs() < 1e-5);
        let na = AdductKind::DeprotonatedDisodiated.adduct();
        assert!(na.is_metal());
        assert_eq!(na.polarity, Polarity::Positive);
    }

    #[test]
    fn test_ion_mass_is_single_molecule() {
        let neutral = 759.5778;
        for kind in AdductKind::ALL {
            let adduct = kind.adduct();
            assert_eq!(adduct.ion_mass(neutral), neutral + adduct.mass_delta);
            let mz = adduct.precursor_mz(neutral) * adduct.charge as f64;
            assert!((mz - neutral - adduct.mass_delta).abs() < 1e-9);
        }
    }

    #[test]
    fn test_metal_count_agrees_with_type() {
        for kind in AdductKind::ALL {
            assert_eq!(kind.metal_count() > 0, kind.adduct().is_metal(), "{:?}", kind);
        }
        assert_eq!(AdductKind::DeprotonatedDisodiated.metal_count(), 2);
    }
}
