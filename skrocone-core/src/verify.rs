//! Vérification indépendante de la couverture d'un design.
//!
//! Ne réutilise rien du solveur : les t-uplets sont réénumérés sur les
//! valeurs elles-mêmes et chaque grille est testée par inclusion.

use std::collections::HashSet;

use crate::bounds::check_parameters;
use crate::combinations::checked_combinations;
use crate::config::GenerateOptions;
use crate::error::{CoverError, Result};
use crate::models::{canonical_universe, Bet, CoverageResult, UNCOVERED_SAMPLE_SIZE};

pub fn verify_coverage(universe: &[u32], k: usize, t: usize, bets: &[Bet]) -> Result<CoverageResult> {
    verify_coverage_within(universe, k, t, bets, GenerateOptions::default().max_targets)
}

/// Comme `verify_coverage`, avec un plafond explicite sur C(v, t).
pub fn verify_coverage_within(
    universe: &[u32],
    k: usize,
    t: usize,
    bets: &[Bet],
    max_targets: u64,
) -> Result<CoverageResult> {
    let universe = canonical_universe(universe)?;
    check_parameters(universe.len(), k, t)?;
    let bets = canonical_bets(&universe, k, bets)?;

    let mut covered_count = 0u64;
    let mut total_targets = 0u64;
    let mut uncovered_sample = Vec::new();

    for target in checked_combinations(&universe, t, max_targets, "cibles")? {
        total_targets += 1;
        let hit = bets
            .iter()
            .any(|bet| target.iter().all(|n| bet.binary_search(n).is_ok()));
        if hit {
            covered_count += 1;
        } else if uncovered_sample.len() < UNCOVERED_SAMPLE_SIZE {
            uncovered_sample.push(target);
        }
    }

    let coverage_percent = if total_targets > 0 {
        covered_count as f64 / total_targets as f64 * 100.0
    } else {
        0.0
    };

    Ok(CoverageResult {
        covered_count,
        total_targets,
        coverage_percent,
        uncovered_sample,
    })
}

/// Contrôle chaque grille (taille k, numéros de l'univers, sans doublon) et la trie.
fn canonical_bets(universe: &[u32], k: usize, bets: &[Bet]) -> Result<Vec<Bet>> {
    let allowed: HashSet<u32> = universe.iter().copied().collect();
    bets.iter()
        .enumerate()
        .map(|(i, bet)| {
            if bet.len() != k {
                return Err(CoverError::InvalidParameters(format!(
                    "grille {} : {} numéros au lieu de {k}",
                    i + 1,
                    bet.len()
                )));
            }
            if let Some(n) = bet.iter().find(|n| !allowed.contains(n)) {
                return Err(CoverError::InvalidParameters(format!(
                    "grille {} : numéro {n} hors de l'univers",
                    i + 1
                )));
            }
            let mut sorted = bet.clone();
            sorted.sort_unstable();
            if sorted.windows(2).any(|w| w[0] == w[1]) {
                return Err(CoverError::InvalidParameters(format!(
                    "grille {} : numéro en double",
                    i + 1
                )));
            }
            Ok(sorted)
        })
        .collect()
}
