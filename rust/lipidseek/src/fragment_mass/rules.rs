//! Declarative fragmentation rules.
//!
//! A rule selects the precursors it applies to (class, polarity, adduct) and
//! describes the fragment mass as a signed sum of terms. Rules scoped to chains
//! expand into one fragment per eligible chain (or per cardiolipin half).

use crate::chemistry::constants::*;
use crate::chemistry::{
    AdductKind,
    AdductType,
    LipidClass,
    Polarity,
};
use crate::models::FragmentKind;

use AdductKind::{
    Acetate,
    Ammoniated,
    Deprotonated,
    DoublyDeprotonated,
    Formate,
    Protonated,
};
use LipidClass::*;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum AdductFilter {
    Any,
    OfType(AdductType),
    Only(&'static [AdductKind]),
}

impl AdductFilter {
    pub fn accepts(&self, kind: AdductKind, adduct_type: AdductType) -> bool {
        match self {
            AdductFilter::Any => true,
            AdductFilter::OfType(t) => *t == adduct_type,
            AdductFilter::Only(kinds) => kinds.contains(&kind),
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Selector {
    pub classes: &'static [LipidClass],
    pub polarity: Polarity,
    pub adducts: AdductFilter,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BondFilter {
    Acyl,
    Ether,
}

/// What a single rule expands over.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Scope {
    Whole,
    EachChain(BondFilter),
    /// Chains 1-2 and 3-4 of a four chain lipid.
    EachHalf,
}

/// Mass of a scoped chain in a given chemical form.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChainForm {
    /// The residue as attached (RCO, R or H).
    Residue,
    /// RCO - H, left as a ketene.
    Ketene,
    /// RCO + OH (acid) or R + OH (alcohol).
    Acid,
    /// RCOO-
    Carboxylate,
    /// RCO+
    Acylium,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Term {
    /// Total mass of the charged precursor (m/z times charge).
    Ion,
    /// Neutral monoisotopic mass of the candidate.
    Molecule,
    /// Mass delta of the precursor's adduct.
    Adduct,
    Const(f64),
    Chain(ChainForm),
    /// Neutral free long-chain base of a sphingoid backbone.
    LongChainBase,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Requirement {
    None,
    AnyLyso,
    NoLyso,
    SphingoidBase,
}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FragmentRule {
    pub selector: Selector,
    pub kind: FragmentKind,
    /// `{chain}` and `{half}` are replaced by the names of the scoped chains.
    pub label: &'static str,
    pub charge: u8,
    pub scope: Scope,
    pub terms: &'static [(f64, Term)],
    pub requires: Requirement,
}

const fn rule(
    classes: &'static [LipidClass],
    polarity: Polarity,
    adducts: AdductFilter,
    kind: FragmentKind,
    label: &'static str,
    scope: Scope,
    terms: &'static [(f64, Term)],
) -> FragmentRule {
    FragmentRule {
        selector: Selector {
            classes,
            polarity,
            adducts,
        },
        kind,
        label,
        charge: 1,
        scope,
        terms,
        requires: Requirement::None,
    }
}

const fn requiring(mut r: FragmentRule, requires: Requirement) -> FragmentRule {
    r.requires = requires;
    r
}

const fn doubly_charged(mut r: FragmentRule) -> FragmentRule {
    r.charge = 2;
    r
}

const POS: Polarity = Polarity::Positive;
const NEG: Polarity = Polarity::Negative;
const METAL: AdductFilter = AdductFilter::OfType(AdductType::Metal);
const NON_METAL: AdductFilter = AdductFilter::OfType(AdductType::NonMetal);
const PROTONATED: AdductFilter = AdductFilter::Only(&[Protonated]);
const AMMONIATED: AdductFilter = AdductFilter::Only(&[Ammoniated]);
const DEPROTONATED: AdductFilter = AdductFilter::Only(&[Deprotonated]);
const DOUBLY_DEPROTONATED: AdductFilter = AdductFilter::Only(&[DoublyDeprotonated]);
const ANY_DEPROTONATED: AdductFilter = AdductFilter::Only(&[Deprotonated, DoublyDeprotonated]);
const ANION_ADDUCT: AdductFilter = AdductFilter::Only(&[Formate, Acetate]);

const WHOLE: Scope = Scope::Whole;
const EACH_ACYL: Scope = Scope::EachChain(BondFilter::Acyl);
const EACH_ETHER: Scope = Scope::EachChain(BondFilter::Ether);
const EACH_HALF: Scope = Scope::EachHalf;

use FragmentKind::{
    BackboneIon,
    ChainIon,
    ChainLoss,
    HeadGroupIon,
    HeadGroupLoss,
    WaterLoss,
};
use Term::{
    Adduct,
    Chain,
    Const,
    Ion,
    LongChainBase,
    Molecule,
};

const ACID: Term = Chain(ChainForm::Acid);
const KETENE: Term = Chain(ChainForm::Ketene);
const RESIDUE: Term = Chain(ChainForm::Residue);

const GP_ANIONIC: &[LipidClass] = &[PE, PS, PG, PI, PA, PIP, PIP2];
const GP_ACIDIC: &[LipidClass] = &[PG, PA, PI, PIP, PIP2];

#[rustfmt::skip]
pub static DEFAULT_RULES: &[FragmentRule] = &[
    // Choline containing lipids, positive mode
    rule(&[PC, SM], POS, PROTONATED, HeadGroupIon, "phosphocholine ion", WHOLE, &[(1.0, Const(PHOSPHOCHOLINE_ION))]),
    requiring(
        rule(&[PC], POS, PROTONATED, HeadGroupIon, "choline ion", WHOLE, &[(1.0, Const(CHOLINE_ION))]),
        Requirement::AnyLyso,
    ),
    rule(&[PC], POS, PROTONATED, HeadGroupLoss, "loss of phosphocholine", WHOLE, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, Const(PHOSPHOCHOLINE))]),
    rule(&[PC, SM], POS, METAL, HeadGroupLoss, "loss of trimethylamine", WHOLE, &[(1.0, Ion), (-1.0, Const(TRIMETHYLAMINE))]),
    rule(&[PC, SM], POS, METAL, HeadGroupLoss, "loss of phosphocholine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOCHOLINE))]),
    rule(&[PC, SM], POS, METAL, HeadGroupLoss, "loss of metallated phosphocholine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOCHOLINE)), (-1.0, Adduct), (1.0, Const(MASS_PROTON))]),
    rule(&[PC], POS, METAL, ChainLoss, "loss of trimethylamine and {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, Const(TRIMETHYLAMINE)), (-1.0, ACID)]),
    // Water loss from lyso species and sphingolipids
    requiring(
        rule(&[PC, PE], POS, PROTONATED, WaterLoss, "[M+H-H2O]+", WHOLE, &[(1.0, Ion), (-1.0, Const(MASS_WATER))]),
        Requirement::AnyLyso,
    ),
    rule(&[SM, PECer], POS, PROTONATED, WaterLoss, "[M+H-H2O]+", WHOLE, &[(1.0, Ion), (-1.0, Const(MASS_WATER))]),
    // Acyl losses from protonated and metallated precursors
    rule(&[PC, PE, PS], POS, NON_METAL, ChainLoss, "loss of {chain} as ketene", EACH_ACYL, &[(1.0, Ion), (-1.0, KETENE)]),
    rule(&[PC, PE, PS], POS, NON_METAL, ChainLoss, "loss of {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, ACID)]),
    rule(&[PC, PE, PS, PG, PA, PI, PIP], POS, METAL, ChainLoss, "loss of {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, ACID)]),
    // Ethanolamine containing lipids
    rule(&[PE, PECer], POS, PROTONATED, HeadGroupLoss, "loss of phosphoethanolamine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOETHANOLAMINE))]),
    rule(&[PE, PECer], POS, METAL, HeadGroupLoss, "loss of aziridine", WHOLE, &[(1.0, Ion), (-1.0, Const(AZIRIDINE))]),
    rule(&[PE, PECer], POS, METAL, HeadGroupLoss, "loss of phosphoethanolamine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOETHANOLAMINE))]),
    rule(&[PE], POS, METAL, HeadGroupLoss, "loss of metallated phosphoethanolamine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOETHANOLAMINE)), (-1.0, Adduct), (1.0, Const(MASS_PROTON))]),
    rule(&[PE], POS, METAL, ChainLoss, "loss of aziridine and {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, Const(AZIRIDINE)), (-1.0, ACID)]),
    // Serine
    rule(&[PS], POS, PROTONATED, HeadGroupLoss, "loss of phosphoserine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOSERINE))]),
    rule(&[PS], POS, METAL, HeadGroupLoss, "loss of serine", WHOLE, &[(1.0, Ion), (-1.0, Const(SERINE_RESIDUE))]),
    rule(&[PS], POS, METAL, HeadGroupLoss, "loss of phosphoserine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOSERINE))]),
    rule(&[PS], POS, METAL, HeadGroupLoss, "loss of metallated phosphoserine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOSERINE)), (-1.0, Adduct), (1.0, Const(MASS_PROTON))]),
    // Acidic glycerophospholipids, positive mode
    rule(GP_ACIDIC, POS, AMMONIATED, HeadGroupLoss, "loss of ammonia", WHOLE, &[(1.0, Ion), (-1.0, Const(MASS_AMMONIA))]),
    rule(&[PG], POS, NON_METAL, HeadGroupLoss, "loss of glycerophosphate", WHOLE, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, Const(GLYCEROPHOSPHATE))]),
    rule(&[PA], POS, NON_METAL, HeadGroupLoss, "loss of phosphoric acid", WHOLE, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, Const(PHOSPHORIC_ACID))]),
    rule(&[PI], POS, NON_METAL, HeadGroupLoss, "loss of inositol phosphate", WHOLE, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, Const(INOSITOL_PHOSPHATE))]),
    rule(&[PIP], POS, NON_METAL, HeadGroupLoss, "loss of inositol bisphosphate", WHOLE, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, Const(INOSITOL_BISPHOSPHATE))]),
    rule(&[PIP2], POS, NON_METAL, HeadGroupLoss, "loss of inositol trisphosphate", WHOLE, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, Const(INOSITOL_TRISPHOSPHATE))]),
    rule(GP_ACIDIC, POS, NON_METAL, ChainLoss, "loss of {chain} as acid", EACH_ACYL, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, ACID)]),
    rule(GP_ACIDIC, POS, NON_METAL, ChainIon, "{chain} acylium ion", EACH_ACYL, &[(1.0, Chain(ChainForm::Acylium))]),
    rule(GP_ACIDIC, POS, NON_METAL, ChainIon, "{chain} monoacylglycerol-like ion", EACH_ACYL, &[(1.0, RESIDUE), (1.0, Const(MONOACYLGLYCEROL_CORE)), (-1.0, Const(MASS_ELECTRON))]),
    rule(&[PI, PICer, PIP], POS, METAL, HeadGroupLoss, "loss of inositol", WHOLE, &[(1.0, Ion), (-1.0, Const(INOSITOL_RESIDUE))]),
    rule(&[PI, PICer], POS, METAL, HeadGroupLoss, "loss of inositol phosphate", WHOLE, &[(1.0, Ion), (-1.0, Const(INOSITOL_PHOSPHATE))]),
    // Sphingolipids, positive mode
    requiring(
        rule(&[SM, PECer, PICer], POS, NON_METAL, FragmentKind::LongChainBase, "[LCB+H-H2O]+", WHOLE, &[(1.0, LongChainBase), (1.0, Const(MASS_PROTON)), (-1.0, Const(MASS_WATER))]),
        Requirement::SphingoidBase,
    ),
    requiring(
        rule(&[SM, PECer, PICer], POS, NON_METAL, FragmentKind::LongChainBase, "[LCB+H-2H2O]+", WHOLE, &[(1.0, LongChainBase), (1.0, Const(MASS_PROTON)), (-2.0, Const(MASS_WATER))]),
        Requirement::SphingoidBase,
    ),
    rule(&[SM], POS, PROTONATED, HeadGroupLoss, "loss of phosphocholine", WHOLE, &[(1.0, Ion), (-1.0, Const(PHOSPHOCHOLINE))]),
    rule(&[PICer], POS, NON_METAL, HeadGroupLoss, "loss of inositol phosphate", WHOLE, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, Const(INOSITOL_PHOSPHATE))]),
    rule(&[SM, PECer, PICer], POS, NON_METAL, ChainLoss, "loss of N-acyl {chain} as ketene", EACH_ACYL, &[(1.0, Molecule), (1.0, Const(MASS_PROTON)), (-1.0, KETENE)]),
    // Deprotonated glycerophospholipids and cardiolipins
    rule(&[PE, PS, PG, PI, PA, PIP, PIP2, CL], NEG, ANY_DEPROTONATED, ChainIon, "{chain} carboxylate anion", EACH_ACYL, &[(1.0, Chain(ChainForm::Carboxylate))]),
    rule(&[PE, PS, PG, PI, PA, PIP, PIP2, CL], NEG, DEPROTONATED, ChainLoss, "loss of {chain} as ketene", EACH_ACYL, &[(1.0, Ion), (-1.0, KETENE)]),
    rule(&[PE, PS, PG, PI, PA, PIP, PIP2, CL], NEG, DEPROTONATED, ChainLoss, "loss of {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, ACID)]),
    rule(GP_ANIONIC, NEG, DEPROTONATED, ChainLoss, "loss of {chain} as alcohol", EACH_ETHER, &[(1.0, Ion), (-1.0, ACID)]),
    doubly_charged(rule(&[PIP, PIP2, CL], NEG, DOUBLY_DEPROTONATED, ChainLoss, "loss of {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, ACID)])),
    doubly_charged(rule(&[PIP, PIP2, CL], NEG, DOUBLY_DEPROTONATED, ChainLoss, "loss of {chain} as ketene", EACH_ACYL, &[(1.0, Ion), (-1.0, KETENE)])),
    rule(&[PE, PECer], NEG, DEPROTONATED, HeadGroupIon, "phosphoethanolamine anion", WHOLE, &[(1.0, Const(PHOSPHOETHANOLAMINE_ION))]),
    rule(&[PE], NEG, DEPROTONATED, BackboneIon, "glycerophosphoethanolamine anion - H2O", WHOLE, &[(1.0, Const(GLYCEROPHOSPHOETHANOLAMINE_ION))]),
    rule(&[PS], NEG, DEPROTONATED, HeadGroupLoss, "loss of serine", WHOLE, &[(1.0, Ion), (-1.0, Const(SERINE_RESIDUE))]),
    rule(&[PS], NEG, DEPROTONATED, ChainLoss, "loss of serine and {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, Const(SERINE_RESIDUE)), (-1.0, ACID)]),
    rule(&[PG, PA, PS, PI], NEG, DEPROTONATED, BackboneIon, "glycerophosphate anion - H2O", WHOLE, &[(1.0, Const(GLYCEROPHOSPHATE_DEHYDRATED_ION))]),
    rule(&[PG], NEG, DEPROTONATED, BackboneIon, "glycerophosphate anion", WHOLE, &[(1.0, Const(GLYCEROPHOSPHATE_ION))]),
    rule(&[PG], NEG, DEPROTONATED, HeadGroupIon, "glycerophosphoglycerol anion - H2O", WHOLE, &[(1.0, Const(GLYCEROPHOSPHOGLYCEROL_ION))]),
    rule(&[PA, PIP, PIP2], NEG, ANY_DEPROTONATED, HeadGroupIon, "metaphosphate anion", WHOLE, &[(1.0, Const(METAPHOSPHATE_ION))]),
    rule(&[PA], NEG, DEPROTONATED, HeadGroupIon, "dihydrogen phosphate anion", WHOLE, &[(1.0, Const(DIHYDROGEN_PHOSPHATE_ION))]),
    rule(&[PI, PICer, PIP], NEG, ANY_DEPROTONATED, HeadGroupIon, "inositol phosphate anion - H2O", WHOLE, &[(1.0, Const(INOSITOL_PHOSPHATE_DEHYDRATED_ION))]),
    rule(&[PI, PICer], NEG, DEPROTONATED, HeadGroupIon, "inositol phosphate anion", WHOLE, &[(1.0, Const(INOSITOL_PHOSPHATE_ION))]),
    rule(&[PI], NEG, DEPROTONATED, HeadGroupIon, "inositol phosphate anion - 2H2O", WHOLE, &[(1.0, Const(INOSITOL_PHOSPHATE_DIDEHYDRATED_ION))]),
    rule(&[PI], NEG, DEPROTONATED, BackboneIon, "glycerophosphoinositol anion - H2O", WHOLE, &[(1.0, Const(GLYCEROPHOSPHOINOSITOL_ION))]),
    rule(&[PI, PICer], NEG, DEPROTONATED, HeadGroupLoss, "loss of inositol", WHOLE, &[(1.0, Ion), (-1.0, Const(INOSITOL_RESIDUE))]),
    rule(&[PICer], NEG, DEPROTONATED, HeadGroupLoss, "loss of inositol with water", WHOLE, &[(1.0, Ion), (-1.0, Const(INOSITOL))]),
    rule(&[PIP, PIP2], NEG, ANY_DEPROTONATED, HeadGroupIon, "inositol bisphosphate anion - H2O", WHOLE, &[(1.0, Const(INOSITOL_BISPHOSPHATE_ION))]),
    rule(&[PIP, PIP2], NEG, ANY_DEPROTONATED, HeadGroupIon, "inositol bisphosphate anion - 2H2O", WHOLE, &[(1.0, Const(INOSITOL_BISPHOSPHATE_DEHYDRATED_ION))]),
    rule(&[PIP2], NEG, ANY_DEPROTONATED, HeadGroupIon, "inositol trisphosphate anion - H2O", WHOLE, &[(1.0, Const(INOSITOL_TRISPHOSPHATE_ION))]),
    rule(&[PIP2], NEG, ANY_DEPROTONATED, HeadGroupIon, "inositol trisphosphate anion - 2H2O", WHOLE, &[(1.0, Const(INOSITOL_TRISPHOSPHATE_DEHYDRATED_ION))]),
    // Choline containing lipids as formate or acetate adducts
    rule(&[PC, SM], NEG, ANION_ADDUCT, HeadGroupLoss, "[M-CH3]-", WHOLE, &[(1.0, Molecule), (-1.0, Const(MASS_METHYL)), (1.0, Const(MASS_ELECTRON))]),
    rule(&[PC, SM], NEG, ANION_ADDUCT, HeadGroupIon, "demethylated phosphocholine anion", WHOLE, &[(1.0, Const(DEMETHYL_PHOSPHOCHOLINE_ION))]),
    rule(&[PC], NEG, ANION_ADDUCT, ChainIon, "{chain} carboxylate anion", EACH_ACYL, &[(1.0, Chain(ChainForm::Carboxylate))]),
    rule(&[PC], NEG, ANION_ADDUCT, ChainLoss, "[M-CH3]- loss of {chain} as ketene", EACH_ACYL, &[(1.0, Molecule), (-1.0, Const(MASS_METHYL)), (1.0, Const(MASS_ELECTRON)), (-1.0, KETENE)]),
    rule(&[PC], NEG, ANION_ADDUCT, ChainLoss, "[M-CH3]- loss of {chain} as acid", EACH_ACYL, &[(1.0, Molecule), (-1.0, Const(MASS_METHYL)), (1.0, Const(MASS_ELECTRON)), (-1.0, ACID)]),
    // Cardiolipin halves
    rule(&[CL], NEG, ANY_DEPROTONATED, BackboneIon, "[PA({half})-H]-", EACH_HALF, &[(1.0, RESIDUE), (1.0, Const(PHOSPHATIDIC_CORE)), (-1.0, Const(MASS_PROTON))]),
    rule(&[CL], NEG, ANY_DEPROTONATED, BackboneIon, "[PA({half})-H-H2O]-", EACH_HALF, &[(1.0, RESIDUE), (1.0, Const(PHOSPHATIDIC_CORE)), (-1.0, Const(MASS_PROTON)), (-1.0, Const(MASS_WATER))]),
    rule(&[CL], NEG, ANY_DEPROTONATED, BackboneIon, "[PA({half})+C3H4O-H]-", EACH_HALF, &[(1.0, RESIDUE), (1.0, Const(PHOSPHATIDIC_CORE)), (1.0, Const(GLYCEROL_BRIDGE)), (-1.0, Const(MASS_PROTON))]),
    rule(&[CL], NEG, METAL, ChainIon, "{chain} carboxylate anion", EACH_ACYL, &[(1.0, Chain(ChainForm::Carboxylate))]),
    rule(&[CL], NEG, METAL, BackboneIon, "[PA({half})-H]-", EACH_HALF, &[(1.0, RESIDUE), (1.0, Const(PHOSPHATIDIC_CORE)), (-1.0, Const(MASS_PROTON))]),
    rule(&[CL], NEG, METAL, BackboneIon, "metallated [PA({half})-2H]-", EACH_HALF, &[(1.0, RESIDUE), (1.0, Const(PHOSPHATIDIC_CORE)), (1.0, Adduct)]),
    rule(&[CL], NEG, METAL, ChainLoss, "loss of {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, ACID)]),
    rule(&[CL], POS, METAL, BackboneIon, "diglyceride-like ion ({half})", EACH_HALF, &[(1.0, RESIDUE), (1.0, Const(DIGLYCERIDE_CORE)), (-1.0, Const(MASS_ELECTRON))]),
    rule(&[CL], POS, METAL, BackboneIon, "metallated [PA({half})-H]+", EACH_HALF, &[(1.0, RESIDUE), (1.0, Const(PHOSPHATIDIC_CORE)), (1.0, Adduct)]),
    rule(&[CL], POS, METAL, ChainLoss, "loss of {chain} as acid", EACH_ACYL, &[(1.0, Ion), (-1.0, ACID)]),
];
