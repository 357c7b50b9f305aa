use std::collections::HashSet;
use std::sync::Arc;

use arrayvec::ArrayVec;
use tracing::debug;

use super::chain_space::{
    chain_options,
    count_chain_options,
};
use crate::chemistry::{
    BackBone,
    BuildingBlocks,
    Family,
    HeadGroup,
};
use crate::models::{
    Chain,
    Lipid,
    MAX_CHAINS,
};
use crate::parameters::{
    BondOptions,
    SearchParameters,
};

/// How a combination of chain options is accepted or rejected.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Acceptance {
    /// Everything except a candidate with no real chain at all.
    NotAllLyso,
    /// Everything.
    Any,
    /// Only the first arrangement of each cardiolipin, up to swapping its two
    /// halves or the two chains within a half.
    CanonicalCardiolipin,
}

/// One (head group, backbone) pair with the chain options of each position.
#[derive(Debug, Clone)]
struct Plan {
    head_group: Arc<HeadGroup>,
    backbone: Arc<BackBone>,
    positions: Vec<Arc<[Chain]>>,
    acceptance: Acceptance,
}

/// The configured candidate space: enabled building blocks plus the
/// per-position chain options of every family.
#[derive(Debug, Clone)]
pub struct CandidateSpace {
    blocks: BuildingBlocks,
    params: SearchParameters,
    gp_positions: [Arc<[Chain]>; 2],
    sl_nacyl: Arc<[Chain]>,
    cl_acyl: Arc<[Chain]>,
}

impl CandidateSpace {
    pub fn new(blocks: BuildingBlocks, params: &SearchParameters) -> Self {
        let gp_positions = [
            chain_options(&params.gp_bounds, params.gp_positions[0]).into(),
            chain_options(&params.gp_bounds, params.gp_positions[1]).into(),
        ];
        let sl_nacyl = chain_options(&params.sl_bounds, params.sl_nacyl).into();
        let cl_acyl = chain_options(&params.cl_bounds, BondOptions::ACYL_ONLY).into();
        Self {
            blocks,
            params: params.clone(),
            gp_positions,
            sl_nacyl,
            cl_acyl,
        }
    }

    pub fn blocks(&self) -> &BuildingBlocks {
        &self.blocks
    }

    fn plans(&self) -> Vec<Plan> {
        let mut plans = Vec::new();
        for family in [
            Family::Glycerophospholipid,
            Family::Sphingolipid,
            Family::Cardiolipin,
        ] {
            let (positions, acceptance): (Vec<Arc<[Chain]>>, Acceptance) = match family {
                Family::Glycerophospholipid => {
                    (self.gp_positions.to_vec(), Acceptance::NotAllLyso)
                }
                Family::Sphingolipid => (vec![self.sl_nacyl.clone()], Acceptance::Any),
                Family::Cardiolipin => (
                    vec![self.cl_acyl.clone(); MAX_CHAINS],
                    Acceptance::CanonicalCardiolipin,
                ),
            };
            for head_group in self.blocks.head_groups_for(family) {
                for backbone in self.blocks.backbones_for(family) {
                    plans.push(Plan {
                        head_group: head_group.clone(),
                        backbone: backbone.clone(),
                        positions: positions.clone(),
                        acceptance,
                    });
                }
            }
        }
        plans
    }

    /// Lazily emits every unique candidate, glycerophospholipids first,
    /// then sphingolipids, then cardiolipins.
    pub fn iter(&self) -> CandidateIter {
        CandidateIter::new(self.plans())
    }

    /// Exact number of candidates [`CandidateSpace::iter`] yields, computed in
    /// closed form from the same configuration.
    pub fn count(&self) -> u64 {
        let p = &self.params;
        let n_heads = |f: Family| self.blocks.head_groups_for(f).count() as u64;
        let n_backbones = |f: Family| self.blocks.backbones_for(f).count() as u64;

        let n1 = count_chain_options(&p.gp_bounds, p.gp_positions[0]);
        let n2 = count_chain_options(&p.gp_bounds, p.gp_positions[1]);
        let lyso1 = p.gp_positions[0].lyso as u64;
        let lyso2 = p.gp_positions[1].lyso as u64;
        let gp = n_heads(Family::Glycerophospholipid)
            * n_backbones(Family::Glycerophospholipid)
            * (n1 * n2 - lyso1 * lyso2);

        let sl = n_heads(Family::Sphingolipid)
            * n_backbones(Family::Sphingolipid)
            * count_chain_options(&p.sl_bounds, p.sl_nacyl);

        let n_cl = count_chain_options(&p.cl_bounds, BondOptions::ACYL_ONLY);
        let cl = n_heads(Family::Cardiolipin)
            * n_backbones(Family::Cardiolipin)
            * cardiolipin_arrangements(n_cl);

        debug!("Candidate space: {} GP, {} SL, {} CL", gp, sl, cl);
        gp + sl + cl
    }
}

/// Distinct cardiolipins from n chain options: p = n(n + 1) / 2 unordered
/// halves, combined into p(p + 1) / 2 unordered pairs of halves.
fn cardiolipin_arrangements(n: u64) -> u64 {
    let n = n as u128;
    let halves = n * (n + 1) / 2;
    (halves * (halves + 1) / 2) as u64
}

/// Odometer over the chain options of each plan, rightmost position fastest.
pub struct CandidateIter {
    plans: Vec<Plan>,
    plan_idx: usize,
    digits: Vec<usize>,
    started: bool,
    seen: HashSet<[u8; 2 * MAX_CHAINS]>,
}

impl CandidateIter {
    fn new(plans: Vec<Plan>) -> Self {
        Self {
            plans,
            plan_idx: 0,
            digits: Vec::new(),
            started: false,
            seen: HashSet::new(),
        }
    }

    fn next_plan(&mut self) {
        self.plan_idx += 1;
        self.started = false;
        self.seen.clear();
    }
}

/// Advances `digits` to the next combination. Returns false once exhausted.
fn advance(digits: &mut Vec<usize>, started: &mut bool, positions: &[Arc<[Chain]>]) -> bool {
    if !*started {
        *started = true;
        if positions.iter().any(|p| p.is_empty()) {
            return false;
        }
        digits.clear();
        digits.resize(positions.len(), 0);
        return true;
    }
    for i in (0..digits.len()).rev() {
        digits[i] += 1;
        if digits[i] < positions[i].len() {
            return true;
        }
        digits[i] = 0;
    }
    false
}

/// Chains sorted within each half (positions 1-2 and 3-4), then the halves sorted.
fn canonical_chains(chains: &[Chain]) -> ArrayVec<Chain, MAX_CHAINS> {
    let mut halves: ArrayVec<ArrayVec<Chain, 2>, 2> = chains
        .chunks(2)
        .map(|half| {
            let mut half: ArrayVec<Chain, 2> = half.iter().copied().collect();
            half.sort_by_key(|c| c.descriptor());
            half
        })
        .collect();
    halves.sort_by_key(|half| {
        half.iter()
            .map(|c| c.descriptor())
            .collect::<ArrayVec<(u8, u8), 2>>()
    });
    halves.into_iter().flatten().collect()
}

fn descriptor_key(chains: &[Chain]) -> [u8; 2 * MAX_CHAINS] {
    let mut key = [0u8; 2 * MAX_CHAINS];
    for (i, (length, db)) in chains.iter().map(|c| c.descriptor()).enumerate() {
        key[2 * i] = length;
        key[2 * i + 1] = db;
    }
    key
}

impl Iterator for CandidateIter {
    type Item = Lipid;

    fn next(&mut self) -> Option<Lipid> {
        loop {
            let plan = self.plans.get(self.plan_idx)?;
            if !advance(&mut self.digits, &mut self.started, &plan.positions) {
                self.next_plan();
                continue;
            }
            let chains: ArrayVec<Chain, MAX_CHAINS> = self
                .digits
                .iter()
                .zip(plan.positions.iter())
                .map(|(d, opts)| opts[*d])
                .collect();

            let chains = match plan.acceptance {
                Acceptance::Any => chains,
                Acceptance::NotAllLyso => {
                    if chains.iter().all(|c| c.is_lyso()) {
                        continue;
                    }
                    chains
                }
                Acceptance::CanonicalCardiolipin => {
                    // Emit the canonical arrangement, whatever order produced it.
                    let canonical = canonical_chains(&chains);
                    if !self.seen.insert(descriptor_key(&canonical)) {
                        continue;
                    }
                    canonical
                }
            };
            return Some(Lipid::new(
                plan.backbone.clone(),
                plan.head_group.clone(),
                chains,
            ));
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::chemistry::{
        AdductCatalogue,
        AdductKind,
    };
    use crate::fragment_mass::FragmentMassBuilder;
    use crate::parameters::ParameterMap;

    fn space(map: &ParameterMap) -> CandidateSpace {
        let params = SearchParameters::from_map(map);
        let blocks = BuildingBlocks::from_parameters(map, params.sl_base_length);
        CandidateSpace::new(blocks, &params)
    }

    #[test]
    fn test_cardiolipin_arrangement_count() {
        assert_eq!(cardiolipin_arrangements(0), 0);
        assert_eq!(cardiolipin_arrangements(1), 1);
        assert_eq!(cardiolipin_arrangements(2), 6);
        assert_eq!(cardiolipin_arrangements(3), 21);
        assert_eq!(cardiolipin_arrangements(4), 55);
    }

    #[test]
    fn test_gp_lyso_combinations() {
        let map = ParameterMap::new()
            .with("HG.PE", 1.0)
            .with("GP.LowerLengthLim", 16.0)
            .with("GP.UpperLengthLim", 16.0)
            .with("GP.UpperDoubleBondLim", 0.0)
            .with("GP.Lyso1", 1.0)
            .with("GP.Lyso2", 1.0);
        let space = space(&map);
        let names: Vec<String> = space.iter().map(|l| l.name).collect();
        assert_eq!(
            names,
            vec!["PE(0:0/16:0)", "PE(16:0/0:0)", "PE(16:0/16:0)"]
        );
        assert_eq!(space.count(), 3);
    }

    fn cardiolipin_map() -> ParameterMap {
        ParameterMap::new()
            .with("HG.CL", 1.0)
            .with("CL.LowerLengthLim", 16.0)
            .with("CL.UpperLengthLim", 18.0)
            .with("CL.UpperDoubleBondLim", 1.0)
            .with("CL.evenOnly", 1.0)
    }

    fn is_canonical(chains: &[Chain]) -> bool {
        let d: Vec<_> = chains.iter().map(|c| c.descriptor()).collect();
        d[0] <= d[1] && d[2] <= d[3] && (d[0], d[1]) <= (d[2], d[3])
    }

    #[test]
    fn test_cardiolipin_one_per_half_arrangement() {
        let space = space(&cardiolipin_map());
        let lipids: Vec<Lipid> = space.iter().collect();
        // 4 options (16:0, 16:1, 18:0, 18:1) -> 10 halves -> 55 pairs of halves
        assert_eq!(lipids.len(), 55);
        assert_eq!(space.count(), 55);
        let keys: HashSet<_> = lipids.iter().map(|l| descriptor_key(&l.chains)).collect();
        assert_eq!(keys.len(), lipids.len());
        assert!(lipids.iter().all(|l| is_canonical(&l.chains)));

        // Same chains, different halves: two distinct molecules
        let names: HashSet<&str> = lipids.iter().map(|l| l.name.as_str()).collect();
        assert!(names.contains("CL(16:0/18:1/16:0/18:1)"));
        assert!(names.contains("CL(16:0/16:0/18:1/18:1)"));
    }

    #[test]
    fn test_cardiolipin_independent_of_option_order() {
        let space = space(&cardiolipin_map());
        let forward: Vec<String> = space.iter().map(|l| l.name).collect();
        let mut plans = space.plans();
        for plan in plans.iter_mut() {
            plan.positions = plan
                .positions
                .iter()
                .map(|p| p.iter().rev().copied().collect::<Arc<[Chain]>>())
                .collect();
        }
        let mut backward: Vec<String> = CandidateIter::new(plans).map(|l| l.name).collect();
        let mut sorted = forward.clone();
        sorted.sort();
        backward.sort();
        assert_eq!(sorted, backward);
        let unique: HashSet<&String> = forward.iter().collect();
        assert_eq!(unique.len(), forward.len());
    }

    #[test]
    fn test_mixed_half_cardiolipin_has_its_phosphatidate_ion() {
        let builder = FragmentMassBuilder::new(AdductCatalogue::from_kinds(&[
            AdductKind::Deprotonated,
        ]));
        let lipid = space(&cardiolipin_map())
            .iter()
            .find(|l| l.name == "CL(16:0/18:1/16:0/18:1)")
            .map(|l| builder.with_precursors(l))
            .unwrap();
        let descriptions: Vec<&str> = lipid.precursors[0]
            .fragments
            .iter()
            .map(|f| f.description.as_str())
            .collect();
        assert!(descriptions.contains(&"[PA(16:0_18:1)-H]-"));
        assert!(!descriptions.contains(&"[PA(16:0_16:0)-H]-"));
    }

    #[test]
    fn test_sphingolipids_cross_backbones() {
        let map = ParameterMap::new()
            .with("HG.SM", 1.0)
            .with("HG.PECer", 1.0)
            .with("BB.Sphinganine", 1.0)
            .with("SL.LowerLengthLim", 16.0)
            .with("SL.UpperLengthLim", 18.0)
            .with("SL.UpperDoubleBondLim", 1.0)
            .with("SL.Lyso", 1.0);
        let space = space(&map);
        // 2 heads x 2 backbones (d18:1, d18:0) x (6 acyl + lyso)
        assert_eq!(space.count(), 2 * 2 * 7);
        let lipids: Vec<Lipid> = space.iter().collect();
        assert_eq!(lipids.len(), 28);
        assert!(lipids.iter().any(|l| l.name == "SM(d18:0/0:0)"));
        assert!(lipids.iter().any(|l| l.name == "PE-Cer(d18:1/16:1)"));
    }

    #[test]
    fn test_empty_when_nothing_enabled() {
        let space = space(&ParameterMap::new());
        assert_eq!(space.count(), 0);
        assert_eq!(space.iter().count(), 0);
    }
}
