use serde::{Deserialize, Serialize};

use crate::combinations::binomial;
use crate::error::{CoverError, Result};

/// Bornes inférieures du nombre de grilles pour un système (v, k, t).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Bounds {
    pub simple_bound: u64,
    pub schonheim_bound: u64,
    /// C(v, k) : taille du système complet, `None` hors du domaine exact de `binomial`.
    pub full_system_size: Option<u64>,
}

/// Rejette tout triplet hors de `1 ≤ t ≤ k ≤ v`.
pub fn check_parameters(v: usize, k: usize, t: usize) -> Result<()> {
    if t < 1 {
        return Err(CoverError::InvalidParameters(format!(
            "la garantie t doit être ≥ 1 (t={t})"
        )));
    }
    if k < t {
        return Err(CoverError::InvalidParameters(format!(
            "la garantie t={t} dépasse la taille de grille k={k}"
        )));
    }
    if v < k {
        return Err(CoverError::InvalidParameters(format!(
            "{v} numéros ne suffisent pas pour des grilles de {k}"
        )));
    }
    Ok(())
}

fn ceil_div(a: u64, b: u64) -> u64 {
    a.div_ceil(b)
}

/// ⌈C(v,t) / C(k,t)⌉ : chaque grille contient exactement C(k,t) t-uplets.
pub fn simple_bound(v: usize, k: usize, t: usize) -> Result<u64> {
    check_parameters(v, k, t)?;
    let targets = binomial(v as u64, t as u64)?;
    let per_bet = binomial(k as u64, t as u64)?;
    Ok(ceil_div(targets, per_bet))
}

/// Borne de Schönheim : L(v,k,1) = ⌈v/k⌉, L(v,k,t) = ⌈(v/k)·L(v-1,k-1,t-1)⌉.
///
/// Évaluée en entiers, ⌈v·L/k⌉, pour éviter les arrondis de v/k en flottant.
pub fn schonheim_bound(v: usize, k: usize, t: usize) -> Result<u64> {
    check_parameters(v, k, t)?;
    schonheim(v as u64, k as u64, t as u64)
}

fn schonheim(v: u64, k: u64, t: u64) -> Result<u64> {
    if t == 1 {
        return Ok(ceil_div(v, k));
    }
    let inner = schonheim(v - 1, k - 1, t - 1)?;
    v.checked_mul(inner)
        .map(|p| ceil_div(p, k))
        .ok_or(CoverError::PrecisionLimit { n: v, r: t })
}

pub fn compute_bounds(v: usize, k: usize, t: usize) -> Result<Bounds> {
    let simple_bound = simple_bound(v, k, t)?;
    let schonheim_bound = schonheim_bound(v, k, t)?;
    let full_system_size = binomial(v as u64, k as u64).ok();
    Ok(Bounds {
        simple_bound,
        schonheim_bound,
        full_system_size,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_simple_bound_7_6_3() {
        assert_eq!(simple_bound(7, 6, 3).unwrap(), 2);
    }

    #[test]
    fn test_schonheim_known_values() {
        assert_eq!(schonheim_bound(7, 6, 3).unwrap(), 4);
        assert_eq!(schonheim_bound(8, 6, 3).unwrap(), 4);
        // Plan de Fano
        assert_eq!(schonheim_bound(7, 3, 2).unwrap(), 7);
        // Système de Steiner S(3,4,10)
        assert_eq!(schonheim_bound(10, 4, 3).unwrap(), 30);
    }

    #[test]
    fn test_schonheim_base_case() {
        for v in 1..=60 {
            for k in 1..=v {
                assert_eq!(
                    schonheim_bound(v, k, 1).unwrap(),
                    v.div_ceil(k) as u64,
                    "v={v} k={k}"
                );
            }
        }
    }

    #[test]
    fn test_bounds_monotone_in_t() {
        for v in 2..=30 {
            for k in 1..=v.min(10) {
                for t in 1..k {
                    let s1 = simple_bound(v, k, t).unwrap();
                    let s2 = simple_bound(v, k, t + 1).unwrap();
                    assert!(s2 >= s1, "simple ({v},{k},{t}) : {s1} > {s2}");
                    let h1 = schonheim_bound(v, k, t).unwrap();
                    let h2 = schonheim_bound(v, k, t + 1).unwrap();
                    assert!(h2 >= h1, "schönheim ({v},{k},{t}) : {h1} > {h2}");
                }
            }
        }
    }

    #[test]
    fn test_schonheim_dominates_simple() {
        for v in 2..=30 {
            for k in 2..=v.min(10) {
                for t in 2..=k {
                    let s = simple_bound(v, k, t).unwrap();
                    let h = schonheim_bound(v, k, t).unwrap();
                    assert!(h >= s, "({v},{k},{t}) : schönheim {h} < simple {s}");
                }
            }
        }
    }

    #[test]
    fn test_compute_bounds_full_system() {
        let b = compute_bounds(49, 6, 3).unwrap();
        assert_eq!(b.full_system_size, Some(13_983_816));
        assert_eq!(b.simple_bound, 18424u64.div_ceil(20));
    }

    #[test]
    fn test_invalid_parameters() {
        assert!(matches!(compute_bounds(10, 6, 7), Err(CoverError::InvalidParameters(_))));
        assert!(matches!(compute_bounds(10, 6, 0), Err(CoverError::InvalidParameters(_))));
        assert!(matches!(compute_bounds(5, 6, 3), Err(CoverError::InvalidParameters(_))));
    }
}
