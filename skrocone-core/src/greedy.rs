//! Recherche gloutonne d'un design de couverture.
//!
//! À chaque itération on retient la grille candidate qui couvre le plus de
//! t-uplets encore libres ; les ex aequo sont départagés par le générateur
//! aléatoire injecté. Une phase de rattrapage ajoute ensuite quelques
//! grilles tirées au hasard si la couverture reste sous le seuil.

use std::collections::HashMap;
use std::time::Instant;

use rand::seq::SliceRandom;
use rand::Rng;

use crate::combinations::{binomial, ensure_within, index_masks, submasks};
use crate::config::GenerateOptions;
use crate::error::{CoverError, Result};
use crate::models::Bet;

/// Plafond du nombre total d'incidences (candidat, t-uplet) gardées en mémoire.
const MAX_INCIDENCES: u64 = 20_000_000;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StopReason {
    /// Tous les t-uplets sont couverts.
    Complete,
    /// Plus aucune candidate ne couvre de t-uplet libre.
    NoProgress,
    IterationBudget,
    BetBudget,
    Deadline,
}

#[derive(Debug, Clone)]
pub struct GreedyOutcome {
    pub bets: Vec<Bet>,
    /// Couverture calculée par le solveur lui-même ; l'orchestrateur la recalcule.
    pub coverage_percent: f64,
    pub iterations: usize,
    pub patched: usize,
    pub stop: StopReason,
}

/// Index des grilles candidates et des t-uplets qu'elles contiennent.
struct CoverIndex {
    candidates: Vec<u64>,
    /// Pour chaque candidate, les indices des t-uplets qu'elle contient.
    contains: Vec<Vec<u32>>,
    /// Pour chaque t-uplet, les candidates qui le contiennent.
    holders: Vec<Vec<u32>>,
}

impl CoverIndex {
    fn build(v: usize, k: usize, t: usize) -> Self {
        let targets: Vec<u64> = index_masks(v, t).collect();
        let position: HashMap<u64, u32> = targets
            .iter()
            .enumerate()
            .map(|(i, &m)| (m, i as u32))
            .collect();
        let candidates: Vec<u64> = index_masks(v, k).collect();

        let mut holders = vec![Vec::new(); targets.len()];
        let contains: Vec<Vec<u32>> = candidates
            .iter()
            .enumerate()
            .map(|(ci, &mask)| {
                let inside: Vec<u32> = submasks(mask, t)
                    .into_iter()
                    .filter_map(|m| position.get(&m).copied())
                    .collect();
                for &ti in &inside {
                    holders[ti as usize].push(ci as u32);
                }
                inside
            })
            .collect();

        Self {
            candidates,
            contains,
            holders,
        }
    }
}

/// État mutable d'une recherche : t-uplets couverts et gain courant de chaque candidate.
struct CoverState<'a> {
    index: &'a CoverIndex,
    covered: Vec<bool>,
    gain: Vec<u32>,
    used: Vec<bool>,
    uncovered: usize,
    chosen: Vec<usize>,
}

impl<'a> CoverState<'a> {
    fn new(index: &'a CoverIndex) -> Self {
        Self {
            covered: vec![false; index.holders.len()],
            gain: index.contains.iter().map(|c| c.len() as u32).collect(),
            used: vec![false; index.candidates.len()],
            uncovered: index.holders.len(),
            chosen: Vec::new(),
            index,
        }
    }

    fn select(&mut self, candidate: usize) {
        self.used[candidate] = true;
        self.chosen.push(candidate);
        let index = self.index;
        for &ti in &index.contains[candidate] {
            let ti = ti as usize;
            if self.covered[ti] {
                continue;
            }
            self.covered[ti] = true;
            self.uncovered -= 1;
            for &cj in &index.holders[ti] {
                self.gain[cj as usize] -= 1;
            }
        }
    }

    /// Candidates non utilisées de gain maximal, et ce gain.
    fn best_candidates(&self) -> (u32, Vec<usize>) {
        let mut best = 0u32;
        let mut ties = Vec::new();
        for (ci, &g) in self.gain.iter().enumerate() {
            if self.used[ci] || g < best {
                continue;
            }
            if g > best {
                best = g;
                ties.clear();
            }
            ties.push(ci);
        }
        (best, ties)
    }

    fn coverage_percent(&self) -> f64 {
        let total = self.covered.len();
        if total == 0 {
            return 100.0;
        }
        (total - self.uncovered) as f64 / total as f64 * 100.0
    }
}

/// Construit un design glouton sur l'univers trié.
///
/// Ne bloque jamais au-delà du budget : une couverture partielle est un
/// résultat normal, signalé par `stop` et `coverage_percent`.
pub fn solve<R: Rng + ?Sized>(
    sorted_universe: &[u32],
    k: usize,
    t: usize,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<GreedyOutcome> {
    let v = sorted_universe.len();
    let candidate_count = ensure_within(v, k, options.max_candidates, "candidats")?;
    ensure_within(v, t, options.max_targets, "cibles")?;
    let per_bet = binomial(k as u64, t as u64)?;
    let incidences = candidate_count.saturating_mul(per_bet);
    if incidences > MAX_INCIDENCES {
        return Err(CoverError::ResourceExceeded {
            pool: "incidences",
            size: incidences,
            ceiling: MAX_INCIDENCES,
        });
    }

    let deadline = options.time_limit().map(|d| Instant::now() + d);
    let index = CoverIndex::build(v, k, t);
    let mut state = CoverState::new(&index);
    let mut iterations = 0usize;

    let stop = loop {
        if state.uncovered == 0 {
            break StopReason::Complete;
        }
        if state.chosen.len() >= options.max_bets {
            break StopReason::BetBudget;
        }
        if iterations >= options.max_iterations {
            break StopReason::IterationBudget;
        }
        if deadline.is_some_and(|d| Instant::now() >= d) {
            break StopReason::Deadline;
        }

        let (best, ties) = state.best_candidates();
        if best == 0 || ties.is_empty() {
            break StopReason::NoProgress;
        }
        let pick = if ties.len() == 1 {
            ties[0]
        } else {
            ties[rng.random_range(0..ties.len())]
        };
        state.select(pick);
        iterations += 1;
    };

    log::debug!(
        "Glouton ({v},{k},{t}) : arrêt {stop:?} après {iterations} itérations, {} grilles, {:.2}%",
        state.chosen.len(),
        state.coverage_percent()
    );

    let patched = patch(&mut state, options, rng);

    let bets = state
        .chosen
        .iter()
        .map(|&ci| mask_to_bet(index.candidates[ci], sorted_universe))
        .collect();

    Ok(GreedyOutcome {
        bets,
        coverage_percent: state.coverage_percent(),
        iterations,
        patched,
        stop,
    })
}

/// Phase de rattrapage : grilles inutilisées tirées au hasard parmi celles
/// qui couvrent encore au moins un t-uplet libre.
fn patch<R: Rng + ?Sized>(state: &mut CoverState<'_>, options: &GenerateOptions, rng: &mut R) -> usize {
    if state.uncovered == 0 || state.coverage_percent() >= options.patch_coverage_threshold {
        return 0;
    }
    let room = options
        .patch_max_bets
        .min(options.max_bets.saturating_sub(state.chosen.len()));
    if room == 0 {
        return 0;
    }

    let mut pool: Vec<usize> = (0..state.gain.len())
        .filter(|&ci| !state.used[ci] && state.gain[ci] > 0)
        .collect();
    pool.shuffle(rng);

    let mut added = 0;
    for ci in pool {
        if added >= room || state.uncovered == 0 {
            break;
        }
        if state.gain[ci] == 0 {
            continue;
        }
        state.select(ci);
        added += 1;
    }

    log::debug!(
        "Rattrapage : {added} grilles ajoutées, couverture {:.2}%",
        state.coverage_percent()
    );
    added
}

fn mask_to_bet(mask: u64, sorted_universe: &[u32]) -> Bet {
    sorted_universe
        .iter()
        .enumerate()
        .filter(|(i, _)| mask & (1u64 << i) != 0)
        .map(|(_, &n)| n)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;
    use std::collections::HashSet;

    fn universe(n: u32) -> Vec<u32> {
        (1..=n).collect()
    }

    #[test]
    fn test_small_case_complete() {
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = solve(&universe(7), 3, 2, &GenerateOptions::default(), &mut rng).unwrap();
        assert_eq!(outcome.stop, StopReason::Complete);
        assert!((outcome.coverage_percent - 100.0).abs() < 1e-12);
        assert!(outcome.bets.len() >= 7, "moins que la borne de Schönheim");
        assert_eq!(outcome.patched, 0);
    }

    #[test]
    fn test_bets_well_formed() {
        let mut rng = StdRng::seed_from_u64(1);
        let values = vec![3, 8, 11, 17, 23, 29, 31, 40, 44, 49];
        let outcome = solve(&values, 5, 3, &GenerateOptions::default(), &mut rng).unwrap();
        let mut seen = HashSet::new();
        for bet in &outcome.bets {
            assert_eq!(bet.len(), 5);
            assert!(bet.windows(2).all(|w| w[0] < w[1]), "grille non triée {bet:?}");
            assert!(bet.iter().all(|n| values.contains(n)));
            assert!(seen.insert(bet.clone()), "grille en double {bet:?}");
        }
    }

    #[test]
    fn test_seed_determinism() {
        let options = GenerateOptions::default();
        let a = solve(&universe(11), 5, 3, &options, &mut StdRng::seed_from_u64(123)).unwrap();
        let b = solve(&universe(11), 5, 3, &options, &mut StdRng::seed_from_u64(123)).unwrap();
        assert_eq!(a.bets, b.bets);
        assert_eq!(a.iterations, b.iterations);
    }

    #[test]
    fn test_13_6_5_terminates_within_budget() {
        let options = GenerateOptions {
            max_iterations: 200,
            max_bets: 250,
            ..GenerateOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = solve(&universe(13), 6, 5, &options, &mut rng).unwrap();
        assert!(outcome.iterations <= 200);
        assert!(outcome.bets.len() <= 250);
        assert!(outcome.coverage_percent > 0.0 && outcome.coverage_percent <= 100.0);
    }

    #[test]
    fn test_iteration_budget_then_patch() {
        let options = GenerateOptions {
            max_iterations: 5,
            ..GenerateOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = solve(&universe(12), 6, 4, &options, &mut rng).unwrap();
        assert_eq!(outcome.stop, StopReason::IterationBudget);
        assert_eq!(outcome.iterations, 5);
        assert!(outcome.patched > 0 && outcome.patched <= 30);
        assert_eq!(outcome.bets.len(), 5 + outcome.patched);
        assert!(outcome.coverage_percent < 100.0);
    }

    #[test]
    fn test_bet_budget() {
        let options = GenerateOptions {
            max_bets: 3,
            ..GenerateOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = solve(&universe(12), 6, 3, &options, &mut rng).unwrap();
        assert_eq!(outcome.stop, StopReason::BetBudget);
        assert_eq!(outcome.bets.len(), 3);
        assert_eq!(outcome.patched, 0);
    }

    #[test]
    fn test_zero_deadline_still_returns() {
        let options = GenerateOptions {
            time_limit_ms: Some(0),
            ..GenerateOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = solve(&universe(12), 6, 4, &options, &mut rng).unwrap();
        assert_eq!(outcome.stop, StopReason::Deadline);
        assert_eq!(outcome.iterations, 0);
        assert!(outcome.bets.len() <= 30);
        assert!(outcome.coverage_percent > 0.0);
    }

    #[test]
    fn test_candidate_ceiling() {
        let options = GenerateOptions {
            max_candidates: 1000,
            ..GenerateOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let err = solve(&universe(30), 6, 3, &options, &mut rng).unwrap_err();
        assert!(matches!(err, CoverError::ResourceExceeded { pool: "candidats", .. }));
    }

    #[test]
    fn test_incidence_ceiling() {
        let options = GenerateOptions {
            max_candidates: u64::MAX,
            max_targets: u64::MAX,
            ..GenerateOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        // C(30,10)·C(10,5) ≈ 7,6·10^9 incidences
        let err = solve(&universe(30), 10, 5, &options, &mut rng).unwrap_err();
        assert!(
            matches!(err, CoverError::ResourceExceeded { pool: "incidences", ceiling: MAX_INCIDENCES, .. }),
            "{err}"
        );
    }

    #[test]
    fn test_no_patch_above_threshold() {
        let options = GenerateOptions {
            max_iterations: 5,
            patch_coverage_threshold: 1.0,
            ..GenerateOptions::default()
        };
        let mut rng = StdRng::seed_from_u64(42);
        let outcome = solve(&universe(12), 6, 4, &options, &mut rng).unwrap();
        assert_eq!(outcome.stop, StopReason::IterationBudget);
        assert!(outcome.coverage_percent >= 1.0 && outcome.coverage_percent < 100.0);
        assert_eq!(outcome.patched, 0);
        assert_eq!(outcome.bets.len(), 5);
    }

    #[test]
    fn test_mask_to_bet() {
        assert_eq!(mask_to_bet(0b1010, &[5, 9, 14, 20]), vec![9, 20]);
    }
}
