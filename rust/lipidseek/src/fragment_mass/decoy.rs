use crate::models::FragmentIon;

/// Mirrors a fragment set around its precursor.
///
/// Every mass `m` becomes `100 - (m - precursor_mz)`. The mirrored masses are
/// handed back in rank order, so the slot holding the i-th smallest target
/// mass receives the i-th smallest decoy mass and keeps its kind and description.
///
/// ```
/// use lipidseek::fragment_mass::decoy::mirror_fragments;
/// use lipidseek::models::{FragmentIon, FragmentKind};
///
/// let frag = |mz: f64| FragmentIon {
///     kind: FragmentKind::ChainLoss,
///     description: format!("{}", mz),
///     mz,
/// };
/// let mirrored = mirror_fragments(500.0, &[frag(400.0), frag(200.0)]);
/// // 400 -> 200, 200 -> 400; the smaller slot (200) gets the smaller decoy (200)
/// assert_eq!(mirrored[0].mz, 400.0);
/// assert_eq!(mirrored[1].mz, 200.0);
/// ```
pub fn mirror_fragments(precursor_mz: f64, fragments: &[FragmentIon]) -> Vec<FragmentIon> {
    let mut decoy_masses: Vec<f64> = fragments
        .iter()
        .map(|f| 100.0 - (f.mz - precursor_mz))
        .collect();
    decoy_masses.sort_by(|a, b| a.total_cmp(b));

    let mut order: Vec<usize> = (0..fragments.len()).collect();
    order.sort_by(|a, b| fragments[*a].mz.total_cmp(&fragments[*b].mz));

    let mut out = fragments.to_vec();
    for (rank, slot) in order.into_iter().enumerate() {
        out[slot].mz = decoy_masses[rank];
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::FragmentKind;

    fn frag(mz: f64, description: &str) -> FragmentIon {
        FragmentIon {
            kind: FragmentKind::HeadGroupIon,
            description: description.to_string(),
            mz,
        }
    }

    #[test]
    fn test_rank_order_is_preserved() {
        let frags = vec![frag(184.07, "a"), frag(522.36, "b"), frag(300.0, "c")];
        let mirrored = mirror_fragments(760.0, &frags);
        let decoys: Vec<f64> = frags.iter().map(|f| 100.0 - (f.mz - 760.0)).collect();
        let mut sorted = decoys.clone();
        sorted.sort_by(|a, b| a.total_cmp(b));

        // a is the smallest target slot, so it takes the smallest decoy mass
        assert_eq!(mirrored[0].mz, sorted[0]);
        assert_eq!(mirrored[2].mz, sorted[1]);
        assert_eq!(mirrored[1].mz, sorted[2]);
        assert_eq!(mirrored[0].description, "a");
        let mut masses: Vec<f64> = mirrored.iter().map(|f| f.mz).collect();
        masses.sort_by(|a, b| a.total_cmp(b));
        assert_eq!(masses, sorted);
    }

    #[test]
    fn test_empty() {
        assert!(mirror_fragments(500.0, &[]).is_empty());
    }
}
