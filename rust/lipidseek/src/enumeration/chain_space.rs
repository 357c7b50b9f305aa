use crate::models::{
    BondType,
    Chain,
};
use crate::parameters::{
    BondOptions,
    ChainBounds,
};

fn lengths(bounds: &ChainBounds) -> impl Iterator<Item = i64> + '_ {
    let lo = bounds.lower_length.max(2);
    let hi = bounds.upper_length.min(u8::MAX as i64);
    (lo..=hi).filter(move |l| !bounds.even_only || l % 2 == 0)
}

/// Every chain a single position may take, lyso first, then acyl, then ether,
/// each ordered by length and double bonds ascending.
pub fn chain_options(bounds: &ChainBounds, bonds: BondOptions) -> Vec<Chain> {
    let mut out = Vec::new();
    if bonds.lyso {
        out.push(Chain::lyso());
    }
    for (enabled, bond) in [(bonds.acyl, BondType::Acyl), (bonds.ether, BondType::Ether)] {
        if !enabled {
            continue;
        }
        for length in lengths(bounds) {
            for db in bounds.lower_double_bonds.max(0)..=bounds.upper_double_bonds {
                if !Chain::admits(length, db, bond) {
                    break;
                }
                let chain = match bond {
                    BondType::Acyl => Chain::acyl(length as u8, db as u8),
                    _ => Chain::ether(length as u8, db as u8),
                };
                out.extend(chain);
            }
        }
    }
    out
}

/// Number of options [`chain_options`] yields, computed per length from the
/// double bond bounds instead of by construction.
pub fn count_chain_options(bounds: &ChainBounds, bonds: BondOptions) -> u64 {
    let mut total: u64 = if bonds.lyso { 1 } else { 0 };
    for (enabled, bond) in [(bonds.acyl, BondType::Acyl), (bonds.ether, BondType::Ether)] {
        if !enabled {
            continue;
        }
        for length in lengths(bounds) {
            let max_db = match Chain::max_double_bonds(length, bond) {
                Some(x) => x.min(bounds.upper_double_bonds),
                None => continue,
            };
            let min_db = bounds.lower_double_bonds.max(0);
            if max_db >= min_db {
                total += (max_db - min_db + 1) as u64;
            }
        }
    }
    total
}

#[cfg(test)]
mod tests {
    use super::*;

    fn bounds(lo: i64, hi: i64, dlo: i64, dhi: i64, even_only: bool) -> ChainBounds {
        ChainBounds {
            lower_length: lo,
            upper_length: hi,
            lower_double_bonds: dlo,
            upper_double_bonds: dhi,
            even_only,
        }
    }

    #[test]
    fn test_pruning_stops_at_physical_limit() {
        let b = bounds(2, 5, 0, 10, false);
        let opts = chain_options(&b, BondOptions::ACYL_ONLY);
        // L=2:0, L=3:0..1, L=4:0..1, L=5:0..2
        assert_eq!(opts.len(), 1 + 2 + 2 + 3);
        assert!(opts
            .iter()
            .all(|c| (c.double_bonds as i64) <= (c.length as i64 - 1) / 2));

        let ether = BondOptions {
            acyl: false,
            ether: true,
            lyso: false,
        };
        let opts = chain_options(&b, ether);
        // L=2:0..1, L=3:0..1, L=4:0..2, L=5:0..2
        assert_eq!(opts.len(), 2 + 2 + 3 + 3);
    }

    #[test]
    fn test_counts_agree_with_options() {
        let cases = [
            bounds(14, 22, 0, 6, false),
            bounds(14, 22, 0, 6, true),
            bounds(0, 4, -3, 20, false),
            bounds(18, 16, 0, 2, false),
            bounds(16, 18, 3, 1, false),
            bounds(-5, -1, 0, 2, false),
        ];
        let options = [
            BondOptions::ACYL_ONLY,
            BondOptions {
                acyl: true,
                ether: true,
                lyso: true,
            },
            BondOptions {
                acyl: false,
                ether: false,
                lyso: true,
            },
        ];
        for b in cases.iter() {
            for o in options.iter() {
                assert_eq!(
                    chain_options(b, *o).len() as u64,
                    count_chain_options(b, *o),
                    "{:?} {:?}",
                    b,
                    o
                );
            }
        }
    }

    #[test]
    fn test_inverted_bounds_are_empty() {
        let b = bounds(18, 16, 0, 2, false);
        assert!(chain_options(&b, BondOptions::ACYL_ONLY).is_empty());
    }
}
