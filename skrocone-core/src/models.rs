use std::collections::HashSet;

use serde::{Deserialize, Serialize};

use crate::error::{CoverError, Result};

/// Taille maximale de l'univers : un sous-ensemble est codé sur un `u64`.
pub const MAX_UNIVERSE: usize = 64;

/// Nombre maximal de t-uplets non couverts rapportés pour diagnostic.
pub const UNCOVERED_SAMPLE_SIZE: usize = 10;

/// Une grille : k numéros distincts, triés par ordre croissant.
pub type Bet = Vec<u32>;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum DesignSource {
    /// v = k : une seule grille contenant tout l'univers.
    Trivial,
    /// Design tiré de la table des systèmes connus.
    Library,
    /// Design construit par l'algorithme glouton.
    Greedy,
}

impl std::fmt::Display for DesignSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            DesignSource::Trivial => write!(f, "trivial"),
            DesignSource::Library => write!(f, "table"),
            DesignSource::Greedy => write!(f, "glouton"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoverageResult {
    pub covered_count: u64,
    pub total_targets: u64,
    pub coverage_percent: f64,
    pub uncovered_sample: Vec<Vec<u32>>,
}

impl CoverageResult {
    pub fn is_complete(&self) -> bool {
        self.covered_count == self.total_targets
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SystemResult {
    pub bets: Vec<Bet>,
    pub guarantee_achieved: bool,
    pub coverage_percent: f64,
    pub covered_count: u64,
    pub total_targets: u64,
    pub simple_bound: u64,
    pub schonheim_bound: u64,
    pub full_system_size: Option<u64>,
    pub source: DesignSource,
}

impl SystemResult {
    /// Rapport borne de Schönheim / nombre de grilles (1.0 = optimal).
    pub fn efficiency(&self) -> f64 {
        if self.bets.is_empty() {
            return 0.0;
        }
        self.schonheim_bound as f64 / self.bets.len() as f64
    }
}

/// Valide l'univers du joueur et le renvoie trié.
pub fn canonical_universe(universe: &[u32]) -> Result<Vec<u32>> {
    if universe.is_empty() {
        return Err(CoverError::InvalidParameters("univers vide".to_string()));
    }
    if universe.len() > MAX_UNIVERSE {
        return Err(CoverError::InvalidParameters(format!(
            "{} numéros, maximum {MAX_UNIVERSE}",
            universe.len()
        )));
    }
    if let Some(&n) = universe.iter().find(|&&n| n == 0) {
        return Err(CoverError::InvalidParameters(format!(
            "numéro {n} invalide (doit être ≥ 1)"
        )));
    }
    let mut seen = HashSet::with_capacity(universe.len());
    for &n in universe {
        if !seen.insert(n) {
            return Err(CoverError::InvalidParameters(format!("numéro en double : {n}")));
        }
    }
    let mut sorted = universe.to_vec();
    sorted.sort_unstable();
    Ok(sorted)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_canonical_universe_sorts() {
        assert_eq!(canonical_universe(&[7, 3, 12, 1]).unwrap(), vec![1, 3, 7, 12]);
    }

    #[test]
    fn test_canonical_universe_duplicate() {
        let err = canonical_universe(&[1, 1, 2, 3, 4, 5]).unwrap_err();
        assert!(matches!(err, CoverError::InvalidParameters(_)));
        assert!(err.to_string().contains("double"));
    }

    #[test]
    fn test_canonical_universe_rejects_zero_and_empty() {
        assert!(canonical_universe(&[0, 1, 2]).is_err());
        assert!(canonical_universe(&[]).is_err());
    }

    #[test]
    fn test_canonical_universe_too_large() {
        let big: Vec<u32> = (1..=65).collect();
        assert!(canonical_universe(&big).is_err());
        let ok: Vec<u32> = (1..=64).collect();
        assert_eq!(canonical_universe(&ok).unwrap().len(), 64);
    }

    #[test]
    fn test_efficiency() {
        let result = SystemResult {
            bets: vec![vec![1, 2, 3]; 4],
            guarantee_achieved: true,
            coverage_percent: 100.0,
            covered_count: 1,
            total_targets: 1,
            simple_bound: 2,
            schonheim_bound: 3,
            full_system_size: Some(4),
            source: DesignSource::Greedy,
        };
        assert!((result.efficiency() - 0.75).abs() < 1e-12);
        assert_eq!(DesignSource::Library.to_string(), "table");
    }
}
