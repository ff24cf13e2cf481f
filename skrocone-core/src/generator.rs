use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::bounds::{check_parameters, compute_bounds};
use crate::combinations::ensure_within;
use crate::config::GenerateOptions;
use crate::error::Result;
use crate::greedy;
use crate::library::KnownDesignLibrary;
use crate::models::{canonical_universe, DesignSource, SystemResult};
use crate::verify::verify_coverage_within;

/// Génère un système skrócone avec la table intégrée et un `StdRng` initialisé
/// par `options.random_seed`.
pub fn generate_system(
    universe: &[u32],
    k: usize,
    t: usize,
    options: &GenerateOptions,
) -> Result<SystemResult> {
    let mut rng = StdRng::seed_from_u64(options.random_seed);
    generate_system_with(KnownDesignLibrary::builtin(), universe, k, t, options, &mut rng)
}

/// Orchestration complète : validation, table des systèmes connus, repli
/// glouton, puis vérification indépendante. Les chiffres de couverture
/// rapportés sont toujours ceux du vérificateur.
///
/// Le plafond `max_targets` s'applique avant tout calcul, y compris au cas
/// trivial v = k : la grille unique est elle aussi vérifiée, donc C(v, t)
/// doit rester énumérable. `max_bets` ne borne que le repli glouton.
pub fn generate_system_with<R: Rng + ?Sized>(
    library: &KnownDesignLibrary,
    universe: &[u32],
    k: usize,
    t: usize,
    options: &GenerateOptions,
    rng: &mut R,
) -> Result<SystemResult> {
    options.validate()?;
    let universe = canonical_universe(universe)?;
    let v = universe.len();
    check_parameters(v, k, t)?;
    ensure_within(v, t, options.max_targets, "cibles")?;
    let bounds = compute_bounds(v, k, t)?;

    let (bets, source) = if v == k {
        (vec![universe.clone()], DesignSource::Trivial)
    } else if let Some(entry) = library.lookup(v, k, t) {
        log::debug!("Système ({v},{k},{t}) trouvé dans la table : {} grilles", entry.bet_count());
        (entry.map_onto(&universe), DesignSource::Library)
    } else {
        let outcome = greedy::solve(&universe, k, t, options, rng)?;
        (outcome.bets, DesignSource::Greedy)
    };

    let coverage = verify_coverage_within(&universe, k, t, &bets, options.max_targets)?;
    if !coverage.is_complete() {
        if source == DesignSource::Greedy {
            log::warn!(
                "Garantie partielle ({v},{k},{t}) : {}/{} t-uplets couverts ({:.2}%)",
                coverage.covered_count,
                coverage.total_targets,
                coverage.coverage_percent
            );
        } else {
            log::error!(
                "Design {source} ({v},{k},{t}) incomplet : {}/{} t-uplets couverts",
                coverage.covered_count,
                coverage.total_targets
            );
        }
    }

    Ok(SystemResult {
        guarantee_achieved: coverage.is_complete(),
        coverage_percent: coverage.coverage_percent,
        covered_count: coverage.covered_count,
        total_targets: coverage.total_targets,
        simple_bound: bounds.simple_bound,
        schonheim_bound: bounds.schonheim_bound,
        full_system_size: bounds.full_system_size,
        bets,
        source,
    })
}
