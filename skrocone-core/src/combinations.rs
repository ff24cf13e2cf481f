use itertools::Itertools;

use crate::error::{CoverError, Result};

/// 2^53 : au-delà, un f64 ne représente plus tous les entiers.
const F64_EXACT_LIMIT: f64 = 9_007_199_254_740_992.0;

/// C(n, r) par la formule multiplicative ∏_{i=1..r} (n-i+1)/i accumulée en f64.
///
/// Après l'étape i l'accumulateur vaut exactement C(n, i) ; le résultat est exact
/// tant que chaque produit intermédiaire C(n, i-1)·(n-i+1) reste ≤ 2^53.
/// Au-delà on renvoie `PrecisionLimit` au lieu d'une valeur approchée
/// (C(50, 25) passe, C(52, 26) non).
pub fn binomial(n: u64, r: u64) -> Result<u64> {
    if r > n {
        return Ok(0);
    }
    let steps = r.min(n - r);
    let mut acc = 1.0f64;
    for i in 1..=steps {
        let product = acc * (n - i + 1) as f64;
        if product > F64_EXACT_LIMIT {
            return Err(CoverError::PrecisionLimit { n, r });
        }
        acc = product / i as f64;
    }
    Ok(acc.round() as u64)
}

/// Sous-ensembles de taille `size`, dans l'ordre lexicographique des positions de `set`.
/// `size = 0` donne un unique sous-ensemble vide, `size > set.len()` aucun.
pub fn combinations_of<'a, T: Clone + 'a>(
    set: &'a [T],
    size: usize,
) -> impl Iterator<Item = Vec<T>> + 'a {
    set.iter().cloned().combinations(size)
}

/// Vérifie que C(n, size) ne dépasse pas `ceiling` avant toute énumération.
pub fn ensure_within(n: usize, size: usize, ceiling: u64, pool: &'static str) -> Result<u64> {
    let count = binomial(n as u64, size as u64).unwrap_or(u64::MAX);
    if count > ceiling {
        return Err(CoverError::ResourceExceeded {
            pool,
            size: count,
            ceiling,
        });
    }
    Ok(count)
}

/// Comme `combinations_of`, mais refuse d'énumérer plus de `ceiling` sous-ensembles.
pub fn checked_combinations<'a, T: Clone + 'a>(
    set: &'a [T],
    size: usize,
    ceiling: u64,
    pool: &'static str,
) -> Result<impl Iterator<Item = Vec<T>> + 'a> {
    ensure_within(set.len(), size, ceiling, pool)?;
    Ok(combinations_of(set, size))
}

/// Sous-ensembles de {0..n-1} codés en masque de bits (n ≤ 64).
pub(crate) fn index_masks(n: usize, size: usize) -> impl Iterator<Item = u64> {
    (0..n).combinations(size).map(|c| to_mask(&c))
}

/// Sous-masques de `mask` ayant exactement `size` bits.
pub(crate) fn submasks(mask: u64, size: usize) -> Vec<u64> {
    let bits: Vec<usize> = (0..64).filter(|&i| mask & (1u64 << i) != 0).collect();
    bits.into_iter()
        .combinations(size)
        .map(|c| to_mask(&c))
        .collect()
}

pub(crate) fn to_mask(indices: &[usize]) -> u64 {
    indices.iter().fold(0u64, |m, &i| m | (1u64 << i))
}
