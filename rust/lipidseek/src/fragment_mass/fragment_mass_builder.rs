use tracing::trace;

use super::rules::{
    BondFilter,
    ChainForm,
    FragmentRule,
    Requirement,
    Scope,
    Term,
    DEFAULT_RULES,
};
use crate::chemistry::constants::{
    MASS_ELECTRON,
    MASS_H,
    MASS_O,
};
use crate::chemistry::{
    Adduct,
    AdductCatalogue,
};
use crate::models::{
    BondType,
    Chain,
    FragmentIon,
    Lipid,
    PreCursor,
};

/// Expands a candidate into its charged precursors and their theoretical fragments.
#[derive(Debug, Clone)]
pub struct FragmentMassBuilder {
    pub adducts: AdductCatalogue,
    pub rules: &'static [FragmentRule],
}

impl FragmentMassBuilder {
    pub fn new(adducts: AdductCatalogue) -> Self {
        Self {
            adducts,
            rules: DEFAULT_RULES,
        }
    }

    pub fn with_rules(mut self, rules: &'static [FragmentRule]) -> Self {
        self.rules = rules;
        self
    }

    /// Fills `lipid.precursors` with one entry per enabled adduct the class supports.
    pub fn derive(&self, lipid: &mut Lipid) {
        let allowed = lipid.class().adducts();
        let precursors: Vec<PreCursor> = self
            .adducts
            .iter()
            .filter(|a| allowed.contains(&a.kind))
            .map(|adduct| {
                let fragments = self.fragments(lipid, adduct);
                PreCursor {
                    adduct: *adduct,
                    mz: adduct.precursor_mz(lipid.mass),
                    charge: adduct.charge,
                    fragments,
                }
            })
            .collect();
        trace!("{} -> {} precursors", lipid.name, precursors.len());
        lipid.precursors = precursors;
    }

    pub fn with_precursors(&self, mut lipid: Lipid) -> Lipid {
        self.derive(&mut lipid);
        lipid
    }

    pub fn fragments(&self, lipid: &Lipid, adduct: &Adduct) -> Vec<FragmentIon> {
        let mut out = Vec::new();
        for rule in self.rules.iter() {
            if !applies(rule, lipid, adduct) {
                continue;
            }
            for (label, chains) in scoped_chains(rule.scope, &lipid.chains) {
                let total = evaluate(rule.terms, lipid, adduct, &chains);
                let mz = total / rule.charge as f64;
                if !(mz.is_finite() && mz > 0.0) {
                    continue;
                }
                out.push(FragmentIon {
                    kind: rule.kind,
                    description: rule
                        .label
                        .replace("{chain}", &label)
                        .replace("{half}", &label),
                    mz,
                });
            }
        }
        out
    }
}

fn applies(rule: &FragmentRule, lipid: &Lipid, adduct: &Adduct) -> bool {
    let selector = &rule.selector;
    if selector.polarity != adduct.polarity
        || !selector.classes.contains(&lipid.class())
        || !selector.adducts.accepts(adduct.kind, adduct.adduct_type)
    {
        return false;
    }
    match rule.requires {
        Requirement::None => true,
        Requirement::AnyLyso => lipid.has_lyso(),
        Requirement::NoLyso => !lipid.has_lyso(),
        Requirement::SphingoidBase => lipid.backbone.sphingoid.is_some(),
    }
}

/// The chain groups a rule expands over, each with the label used in its description.
fn scoped_chains(scope: Scope, chains: &[Chain]) -> Vec<(String, Vec<Chain>)> {
    match scope {
        Scope::Whole => vec![(String::new(), Vec::new())],
        Scope::EachChain(filter) => {
            let wanted = match filter {
                BondFilter::Acyl => BondType::Acyl,
                BondFilter::Ether => BondType::Ether,
            };
            chains
                .iter()
                .filter(|c| c.bond == wanted)
                .map(|c| (chain_label(c), vec![*c]))
                .collect()
        }
        Scope::EachHalf => {
            if chains.len() != 4 {
                return Vec::new();
            }
            chains
                .chunks(2)
                .map(|half| {
                    let label = half.iter().map(|c| c.name()).collect::<Vec<_>>().join("_");
                    (label, half.to_vec())
                })
                .collect()
        }
    }
}

fn chain_label(chain: &Chain) -> String {
    match chain.bond {
        BondType::Acyl => format!("FA {}", chain.name()),
        _ => chain.name(),
    }
}

fn chain_form_mass(chain: &Chain, form: ChainForm) -> f64 {
    match form {
        ChainForm::Residue => chain.mass,
        ChainForm::Ketene => chain.mass - MASS_H,
        ChainForm::Acid => chain.mass + MASS_O + MASS_H,
        ChainForm::Carboxylate => chain.mass + MASS_O + MASS_ELECTRON,
        ChainForm::Acylium => chain.mass - MASS_ELECTRON,
    }
}

fn evaluate(terms: &[(f64, Term)], lipid: &Lipid, adduct: &Adduct, chains: &[Chain]) -> f64 {
    terms
        .iter()
        .map(|(sign, term)| {
            let value = match term {
                Term::Ion => adduct.ion_mass(lipid.mass),
                Term::Molecule => lipid.mass,
                Term::Adduct => adduct.mass_delta,
                Term::Const(x) => *x,
                Term::Chain(form) => chains.iter().map(|c| chain_form_mass(c, *form)).sum(),
                Term::LongChainBase => lipid
                    .backbone
                    .sphingoid
                    .as_ref()
                    .map(|b| b.base.monoisotopic_mass())
                    .unwrap_or(0.0),
            };
            sign * value
        })
        .sum()
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use arrayvec::ArrayVec;

    use super::*;
    use crate::chemistry::{
        AdductKind,
        BackBone,
        HeadGroup,
        LipidClass,
        SphingoidKind,
    };
    use crate::models::FragmentKind;

    fn pc_16_0_18_1() -> Lipid {
        let chains: ArrayVec<Chain, 4> = [Chain::acyl(16, 0).unwrap(), Chain::acyl(18, 1).unwrap()]
            .into_iter()
            .collect();
        Lipid::new(
            Arc::new(BackBone::glycerophosphate(1.0)),
            Arc::new(HeadGroup::new(LipidClass::PC, 1.0)),
            chains,
        )
    }

    fn find<'a>(frags: &'a [FragmentIon], description: &str) -> &'a FragmentIon {
        frags
            .iter()
            .find(|f| f.description == description)
            .unwrap_or_else(|| panic!("missing {} in {:?}", description, frags))
    }

    #[test]
    fn test_protonated_pc_fragments() {
        let builder = FragmentMassBuilder::new(AdductCatalogue::from_kinds(&[
            AdductKind::Protonated,
            AdductKind::Deprotonated,
        ]));
        let lipid = builder.with_precursors(pc_16_0_18_1());
        // PC does not form [M-H]-
        assert_eq!(lipid.precursors.len(), 1);
        let precursor = &lipid.precursors[0];
        assert!((precursor.mz - 760.5851).abs() < 1e-3);

        let frags = &precursor.fragments;
        let head = find(frags, "phosphocholine ion");
        assert_eq!(head.kind, FragmentKind::HeadGroupIon);
        assert!((head.mz - 184.0733).abs() < 1e-3);
        let dg = find(frags, "loss of phosphocholine");
        assert!((dg.mz - 577.5190).abs() < 1e-3);
        let ketene = find(frags, "loss of FA 16:0 as ketene");
        assert!((ketene.mz - 522.3554).abs() < 1e-3);
        let acid = find(frags, "loss of FA 18:1 as acid");
        assert!((acid.mz - 478.3292).abs() < 1e-3);
        // No lyso chain, so no choline ion or water loss
        assert!(frags.iter().all(|f| f.description != "choline ion"));
        assert!(frags.iter().all(|f| f.kind != FragmentKind::WaterLoss));
    }

    #[test]
    fn test_sodiated_pc_metal_losses() {
        let builder =
            FragmentMassBuilder::new(AdductCatalogue::from_kinds(&[AdductKind::Sodiated]));
        let lipid = builder.with_precursors(pc_16_0_18_1());
        let frags = &lipid.precursors[0].fragments;
        let precursor = lipid.precursors[0].mz;
        assert!((precursor - find(frags, "loss of trimethylamine").mz - 59.0735).abs() < 1e-3);
        assert!(
            (precursor - find(frags, "loss of metallated phosphocholine").mz - 205.0480).abs()
                < 1e-3
        );
    }

    #[test]
    fn test_sphingomyelin_long_chain_base_ions() {
        let chains: ArrayVec<Chain, 4> = [Chain::acyl(16, 0).unwrap()].into_iter().collect();
        let lipid = Lipid::new(
            Arc::new(BackBone::sphingoid(SphingoidKind::Sphingosine, 18, 1.0)),
            Arc::new(HeadGroup::new(LipidClass::SM, 1.0)),
            chains,
        );
        let builder =
            FragmentMassBuilder::new(AdductCatalogue::from_kinds(&[AdductKind::Protonated]));
        let lipid = builder.with_precursors(lipid);
        let frags = &lipid.precursors[0].fragments;
        assert!((find(frags, "[LCB+H-2H2O]+").mz - 264.2686).abs() < 1e-3);
        assert!((find(frags, "[LCB+H-H2O]+").mz - 282.2791).abs() < 1e-3);
    }

    #[test]
    fn test_cardiolipin_halves() {
        let l = Chain::acyl(18, 2).unwrap();
        let chains: ArrayVec<Chain, 4> = [l, l, l, l].into_iter().collect();
        let lipid = Lipid::new(
            Arc::new(BackBone::cardiolipin(1.0)),
            Arc::new(HeadGroup::new(LipidClass::CL, 1.0)),
            chains,
        );
        let builder = FragmentMassBuilder::new(AdductCatalogue::from_kinds(&[
            AdductKind::Deprotonated,
            AdductKind::DoublyDeprotonated,
        ]));
        let lipid = builder.with_precursors(lipid);
        assert_eq!(lipid.precursors.len(), 2);
        let frags = &lipid.precursors[0].fragments;
        // PA(18:2/18:2) - H
        assert!((find(frags, "[PA(18:2_18:2)-H]-").mz - 695.4657).abs() < 1e-3);
        assert!((find(frags, "FA 18:2 carboxylate anion").mz - 279.2330).abs() < 1e-3);
        let doubly = &lipid.precursors[1];
        assert_eq!(doubly.charge, 2);
        assert!((doubly.mz - 723.4788).abs() < 1e-3);
    }
}
