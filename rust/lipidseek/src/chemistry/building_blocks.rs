use std::sync::Arc;

use serde::{
    Deserialize,
    Serialize,
};
use tracing::debug;

use super::adducts::AdductKind;
use super::formula::Formula;
use crate::parameters::ParameterMap;

/// Structural family, decides how many chains a candidate carries and
/// which backbone it sits on.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Family {
    Glycerophospholipid,
    Sphingolipid,
    Cardiolipin,
}

impl Family {
    pub fn key(&self) -> &'static str {
        match self {
            Family::Glycerophospholipid => "GP",
            Family::Sphingolipid => "SL",
            Family::Cardiolipin => "CL",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum LipidClass {
    PC,
    PE,
    PI,
    PG,
    PS,
    PA,
    SM,
    CL,
    PIP,
    PIP2,
    PECer,
    PICer,
}

impl LipidClass {
    /// Order matches the secondary bucket layout.
    pub const ALL: [LipidClass; 12] = [
        LipidClass::PC,
        LipidClass::PE,
        LipidClass::PI,
        LipidClass::PG,
        LipidClass::PS,
        LipidClass::PA,
        LipidClass::SM,
        LipidClass::CL,
        LipidClass::PIP,
        LipidClass::PIP2,
        LipidClass::PECer,
        LipidClass::PICer,
    ];

    pub fn prefix(&self) -> &'static str {
        match self {
            LipidClass::PC => "PC",
            LipidClass::PE => "PE",
            LipidClass::PI => "PI",
            LipidClass::PG => "PG",
            LipidClass::PS => "PS",
            LipidClass::PA => "PA",
            LipidClass::SM => "SM",
            LipidClass::CL => "CL",
            LipidClass::PIP => "PIP",
            LipidClass::PIP2 => "PIP2",
            LipidClass::PECer => "PE-Cer",
            LipidClass::PICer => "PI-Cer",
        }
    }

    /// Short key used in the per-class section of the results file.
    pub fn class_key(&self) -> &'static str {
        match self {
            LipidClass::PECer => "PEC",
            LipidClass::PICer => "PIC",
            other => other.prefix(),
        }
    }

    pub fn config_key(&self) -> &'static str {
        match self {
            LipidClass::PECer => "HG.PECer",
            LipidClass::PICer => "HG.PICer",
            LipidClass::PC => "HG.PC",
            LipidClass::PE => "HG.PE",
            LipidClass::PI => "HG.PI",
            LipidClass::PG => "HG.PG",
            LipidClass::PS => "HG.PS",
            LipidClass::PA => "HG.PA",
            LipidClass::SM => "HG.SM",
            LipidClass::CL => "HG.CL",
            LipidClass::PIP => "HG.PIP",
            LipidClass::PIP2 => "HG.PIP2",
        }
    }

    pub fn index(&self) -> usize {
        *self as usize
    }

    pub fn family(&self) -> Family {
        match self {
            LipidClass::SM | LipidClass::PECer | LipidClass::PICer => Family::Sphingolipid,
            LipidClass::CL => Family::Cardiolipin,
            _ => Family::Glycerophospholipid,
        }
    }

    /// Group attached to the phosphate (or, for cardiolipin, the central glycerol bridge).
    pub fn head_formula(&self) -> Formula {
        match self {
            LipidClass::PC | LipidClass::SM => Formula::new(5, 12, 1, 0, 0),
            LipidClass::PE | LipidClass::PECer => Formula::new(2, 6, 1, 0, 0),
            LipidClass::PS => Formula::new(3, 6, 1, 2, 0),
            LipidClass::PG => Formula::new(3, 7, 0, 2, 0),
            LipidClass::PI | LipidClass::PICer => Formula::new(6, 11, 0, 5, 0),
            LipidClass::PA => Formula::new(0, 1, 0, 0, 0),
            LipidClass::PIP => Formula::new(6, 12, 0, 8, 1),
            LipidClass::PIP2 => Formula::new(6, 13, 0, 11, 2),
            LipidClass::CL => Formula::new(3, 6, 0, 1, 0),
        }
    }

    /// Precursor forms that make chemical sense for this class.
    pub fn adducts(&self) -> &'static [AdductKind] {
        use AdductKind::*;
        match self {
            LipidClass::PC | LipidClass::SM => &[
                Protonated,
                Sodiated,
                Potassiated,
                Lithiated,
                Formate,
                Acetate,
            ],
            LipidClass::PE | LipidClass::PS | LipidClass::PECer => {
                &[Protonated, Sodiated, Potassiated, Lithiated, Deprotonated]
            }
            LipidClass::PG | LipidClass::PA => &[
                Protonated,
                Ammoniated,
                Sodiated,
                Potassiated,
                Lithiated,
                Deprotonated,
            ],
            LipidClass::PI | LipidClass::PICer => {
                &[Ammoniated, Sodiated, Potassiated, Lithiated, Deprotonated]
            }
            LipidClass::PIP => &[
                Ammoniated,
                Sodiated,
                Potassiated,
                Lithiated,
                Deprotonated,
                DoublyDeprotonated,
            ],
            LipidClass::PIP2 => &[Ammoniated, Deprotonated, DoublyDeprotonated],
            LipidClass::CL => &[
                DeprotonatedDisodiated,
                DeprotonatedDipotassiated,
                DeprotonatedDilithiated,
                Deprotonated,
                DoublyDeprotonated,
                DoublyDeprotonatedSodiated,
                DoublyDeprotonatedPotassiated,
                DoublyDeprotonatedLithiated,
            ],
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeadGroup {
    pub name: &'static str,
    pub class: LipidClass,
    pub formula: Formula,
    pub mass: f64,
    pub enabled: f64,
}

impl HeadGroup {
    pub fn new(class: LipidClass, enabled: f64) -> Self {
        let formula = class.head_formula();
        Self {
            name: class.prefix(),
            class,
            formula,
            mass: formula.monoisotopic_mass(),
            enabled,
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled != 0.0
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SphingoidKind {
    Sphingosine,
    Sphinganine,
    Phytosphingosine,
    Sphingadienine,
}

impl SphingoidKind {
    pub const ALL: [SphingoidKind; 4] = [
        SphingoidKind::Sphingosine,
        SphingoidKind::Sphinganine,
        SphingoidKind::Phytosphingosine,
        SphingoidKind::Sphingadienine,
    ];

    pub fn config_key(&self) -> &'static str {
        match self {
            SphingoidKind::Sphingosine => "BB.Sphingosine",
            SphingoidKind::Sphinganine => "BB.Sphinganine",
            SphingoidKind::Phytosphingosine => "BB.Phytosphingosine",
            SphingoidKind::Sphingadienine => "BB.Sphingadienine",
        }
    }

    /// Hydroxyl prefix (d = 1,3-dihydroxy, t = 1,3,4-trihydroxy) and double bonds.
    fn notation(&self) -> (char, u8) {
        match self {
            SphingoidKind::Sphingosine => ('d', 1),
            SphingoidKind::Sphinganine => ('d', 0),
            SphingoidKind::Phytosphingosine => ('t', 0),
            SphingoidKind::Sphingadienine => ('d', 2),
        }
    }

    /// Free long-chain base of the given length.
    pub fn base_formula(&self, length: i32) -> Formula {
        match self {
            SphingoidKind::Sphingosine => Formula::new(length, 2 * length + 1, 1, 2, 0),
            SphingoidKind::Sphinganine => Formula::new(length, 2 * length + 3, 1, 2, 0),
            SphingoidKind::Phytosphingosine => Formula::new(length, 2 * length + 3, 1, 3, 0),
            SphingoidKind::Sphingadienine => Formula::new(length, 2 * length - 1, 1, 2, 0),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SphingoidBase {
    pub kind: SphingoidKind,
    pub length: u8,
    /// Element counts of the free base, the starting point of long-chain-base ions.
    pub base: Formula,
}

impl SphingoidBase {
    pub fn name(&self) -> String {
        let (hydroxyl, db) = self.kind.notation();
        format!("{}{}:{}", hydroxyl, self.length, db)
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct BackBone {
    pub name: String,
    pub family: Family,
    pub formula: Formula,
    pub mass: f64,
    pub enabled: f64,
    pub chain_length: u8,
    pub sphingoid: Option<SphingoidBase>,
}

impl BackBone {
    pub fn glycerophosphate(enabled: f64) -> Self {
        let formula = Formula::new(3, 6, 0, 6, 1);
        Self {
            name: "Glycerophosphate".into(),
            family: Family::Glycerophospholipid,
            formula,
            mass: formula.monoisotopic_mass(),
            enabled,
            chain_length: 3,
            sphingoid: None,
        }
    }

    pub fn cardiolipin(enabled: f64) -> Self {
        let formula = Formula::new(6, 12, 0, 12, 2);
        Self {
            name: "Cardiolipin".into(),
            family: Family::Cardiolipin,
            formula,
            mass: formula.monoisotopic_mass(),
            enabled,
            chain_length: 6,
            sphingoid: None,
        }
    }

    /// Phosphorylated sphingoid base: the free base loses two hydrogens and gains PO3H.
    pub fn sphingoid(kind: SphingoidKind, length: u8, enabled: f64) -> Self {
        let base = kind.base_formula(length as i32);
        let formula = base - Formula::new(0, 2, 0, 0, 0) + Formula::new(0, 1, 0, 3, 1);
        let sphingoid = SphingoidBase { kind, length, base };
        Self {
            name: sphingoid.name(),
            family: Family::Sphingolipid,
            formula,
            mass: formula.monoisotopic_mass(),
            enabled,
            chain_length: length,
            sphingoid: Some(sphingoid),
        }
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled != 0.0
    }
}

/// Enabled head groups and backbones for a run.
#[derive(Debug, Clone, Default)]
pub struct BuildingBlocks {
    pub head_groups: Vec<Arc<HeadGroup>>,
    pub backbones: Vec<Arc<BackBone>>,
}

impl BuildingBlocks {
    /// Head groups default to disabled; the glycerol and cardiolipin backbones
    /// and the sphingosine base default to enabled.
    pub fn from_parameters(map: &ParameterMap, sl_base_length: (i64, i64)) -> Self {
        let head_groups: Vec<Arc<HeadGroup>> = LipidClass::ALL
            .iter()
            .map(|c| HeadGroup::new(*c, map.get_or(c.config_key(), 0.0)))
            .filter(|h| h.is_enabled())
            .map(Arc::new)
            .collect();

        let mut backbones = vec![
            BackBone::glycerophosphate(map.get_or("BB.Glycerophosphate", 1.0)),
            BackBone::cardiolipin(map.get_or("BB.Cardiolipin", 1.0)),
        ];
        let (lo, hi) = sl_base_length;
        for kind in SphingoidKind::ALL {
            let default = if kind == SphingoidKind::Sphingosine {
                1.0
            } else {
                0.0
            };
            let enabled = map.get_or(kind.config_key(), default);
            for length in lo.max(2)..=hi.min(u8::MAX as i64) {
                backbones.push(BackBone::sphingoid(kind, length as u8, enabled));
            }
        }
        let backbones: Vec<Arc<BackBone>> = backbones
            .into_iter()
            .filter(|b| b.is_enabled())
            .map(Arc::new)
            .collect();

        debug!(
            "Building blocks: {} head groups, {} backbones",
            head_groups.len(),
            backbones.len()
        );
        Self {
            head_groups,
            backbones,
        }
    }

    pub fn head_groups_for(&self, family: Family) -> impl Iterator<Item = &Arc<HeadGroup>> {
        self.head_groups
            .iter()
            .filter(move |h| h.class.family() == family)
    }

    pub fn backbones_for(&self, family: Family) -> impl Iterator<Item = &Arc<BackBone>> {
        self.backbones.iter().filter(move |b| b.family == family)
    }
}
