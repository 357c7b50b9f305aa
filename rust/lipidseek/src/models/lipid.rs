use std::sync::Arc;

use arrayvec::ArrayVec;
use serde::Serialize;

use super::chain::{
    BondType,
    Chain,
};
use super::decoy::{
    as_decoy_name,
    DecoyMarking,
};
use super::precursor::PreCursor;
use crate::chemistry::{
    BackBone,
    Family,
    Formula,
    HeadGroup,
    LipidClass,
};
use crate::fragment_mass::decoy::mirror_fragments;

pub const MAX_CHAINS: usize = 4;

/// A candidate structure: backbone, head group and up to four chains.
///
/// Catalogue entries are shared behind `Arc`, everything else is owned by the
/// candidate and dropped once it has been scored.
#[derive(Debug, Clone, Serialize)]
pub struct Lipid {
    pub backbone: Arc<BackBone>,
    pub head_group: Arc<HeadGroup>,
    pub chains: ArrayVec<Chain, MAX_CHAINS>,
    pub name: String,
    pub formula: Formula,
    pub mass: f64,
    pub decoy: DecoyMarking,
    pub precursors: Vec<PreCursor>,
}

impl Lipid {
    pub fn new(
        backbone: Arc<BackBone>,
        head_group: Arc<HeadGroup>,
        chains: ArrayVec<Chain, MAX_CHAINS>,
    ) -> Self {
        let mut formula = backbone.formula + head_group.formula;
        for chain in chains.iter() {
            formula += chain.formula;
        }
        let name = assemble_name(&backbone, &head_group, &chains);
        Self {
            mass: formula.monoisotopic_mass(),
            backbone,
            head_group,
            chains,
            name,
            formula,
            decoy: DecoyMarking::Target,
            precursors: Vec::new(),
        }
    }

    pub fn class(&self) -> LipidClass {
        self.head_group.class
    }

    pub fn family(&self) -> Family {
        self.class().family()
    }

    pub fn has_lyso(&self) -> bool {
        self.chains.iter().any(|c| c.is_lyso())
    }

    pub fn has_bond(&self, bond: BondType) -> bool {
        self.chains.iter().any(|c| c.bond == bond)
    }

    /// Twin of this candidate whose fragments are mirrored around its precursors.
    pub fn as_decoy(&self) -> Lipid {
        let precursors = self
            .precursors
            .iter()
            .map(|p| PreCursor {
                adduct: p.adduct,
                mz: p.mz,
                charge: p.charge,
                fragments: mirror_fragments(p.mz, &p.fragments),
            })
            .collect();
        Lipid {
            backbone: self.backbone.clone(),
            head_group: self.head_group.clone(),
            chains: self.chains.clone(),
            name: as_decoy_name(&self.name),
            formula: self.formula,
            mass: self.mass,
            decoy: DecoyMarking::MirroredDecoy,
            precursors,
        }
    }
}

fn assemble_name(backbone: &BackBone, head_group: &HeadGroup, chains: &[Chain]) -> String {
    let mut parts: Vec<String> = Vec::with_capacity(chains.len() + 1);
    if let Some(base) = &backbone.sphingoid {
        parts.push(base.name());
    }
    parts.extend(chains.iter().map(|c| c.name()));
    format!("{}({})", head_group.name, parts.join("/"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::SphingoidKind;

    fn chains(xs: &[Chain]) -> ArrayVec<Chain, MAX_CHAINS> {
        xs.iter().copied().collect()
    }

    #[test]
    fn test_pc_mass_is_sum_of_parts() {
        let bb = Arc::new(BackBone::glycerophosphate(1.0));
        let hg = Arc::new(HeadGroup::new(LipidClass::PC, 1.0));
        let sn1 = Chain::acyl(16, 0).unwrap();
        let sn2 = Chain::acyl(18, 1).unwrap();
        let lipid = Lipid::new(bb.clone(), hg.clone(), chains(&[sn1, sn2]));
        assert_eq!(lipid.name, "PC(16:0/18:1)");
        assert_eq!(lipid.formula.to_string(), "C42H82NO8P");
        let expected = bb.mass + hg.mass + sn1.mass + sn2.mass;
        assert!((lipid.mass - expected).abs() < 1e-9);
        assert!((lipid.mass - 759.5778).abs() < 1e-3);
    }

    #[test]
    fn test_sphingomyelin_and_cardiolipin_formulas() {
        let bb = Arc::new(BackBone::sphingoid(SphingoidKind::Sphingosine, 18, 1.0));
        let hg = Arc::new(HeadGroup::new(LipidClass::SM, 1.0));
        let sm = Lipid::new(bb, hg, chains(&[Chain::acyl(16, 0).unwrap()]));
        assert_eq!(sm.name, "SM(d18:1/16:0)");
        assert_eq!(sm.formula.to_string(), "C39H79N2O6P");

        let bb = Arc::new(BackBone::cardiolipin(1.0));
        let hg = Arc::new(HeadGroup::new(LipidClass::CL, 1.0));
        let l = Chain::acyl(18, 2).unwrap();
        let cl = Lipid::new(bb, hg, chains(&[l, l, l, l]));
        assert_eq!(cl.formula.to_string(), "C81H142O17P2");
        assert!((cl.mass - 1448.9722).abs() < 1e-3);
    }

    #[test]
    fn test_lyso_name() {
        let bb = Arc::new(BackBone::glycerophosphate(1.0));
        let hg = Arc::new(HeadGroup::new(LipidClass::PE, 1.0));
        let lipid = Lipid::new(bb, hg, chains(&[Chain::acyl(18, 1).unwrap(), Chain::lyso()]));
        assert_eq!(lipid.name, "PE(18:1/0:0)");
        assert!(lipid.has_lyso());
        assert_eq!(lipid.formula.to_string(), "C23H46NO7P");
    }
}
