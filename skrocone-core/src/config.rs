use std::path::Path;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{CoverError, Result};

/// Budget et réglages d'une génération.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerateOptions {
    /// Nombre maximal d'itérations de la phase gloutonne.
    pub max_iterations: usize,
    /// Nombre maximal de grilles produites par la recherche gloutonne et le rattrapage.
    /// Ne tronque pas un design de la table des systèmes connus, renvoyé en entier.
    pub max_bets: usize,
    /// En dessous de ce pourcentage, la phase de rattrapage ajoute des grilles.
    pub patch_coverage_threshold: f64,
    /// Grilles ajoutées au plus par la phase de rattrapage.
    pub patch_max_bets: usize,
    pub random_seed: u64,
    /// Échéance optionnelle en millisecondes pour la recherche gloutonne.
    pub time_limit_ms: Option<u64>,
    /// Plafond de C(v, k) (grilles candidates).
    pub max_candidates: u64,
    /// Plafond de C(v, t) (t-uplets à couvrir).
    pub max_targets: u64,
}

impl Default for GenerateOptions {
    fn default() -> Self {
        Self {
            max_iterations: 10_000,
            max_bets: 500,
            patch_coverage_threshold: 98.0,
            patch_max_bets: 30,
            random_seed: 42,
            time_limit_ms: None,
            max_candidates: 250_000,
            max_targets: 250_000,
        }
    }
}

impl GenerateOptions {
    pub fn time_limit(&self) -> Option<Duration> {
        self.time_limit_ms.map(Duration::from_millis)
    }

    pub fn from_json_str(json: &str) -> Result<Self> {
        serde_json::from_str(json)
            .map_err(|e| CoverError::InvalidParameters(format!("options JSON invalides : {e}")))
    }

    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoverError::InvalidParameters(format!("lecture de {} impossible : {e}", path.display()))
        })?;
        Self::from_json_str(&json)
    }

    pub fn to_json_string(&self) -> Result<String> {
        serde_json::to_string_pretty(self)
            .map_err(|e| CoverError::InvalidParameters(format!("sérialisation impossible : {e}")))
    }

    pub fn validate(&self) -> Result<()> {
        if self.max_bets == 0 {
            return Err(CoverError::InvalidParameters("max_bets doit être ≥ 1".to_string()));
        }
        if !(0.0..=100.0).contains(&self.patch_coverage_threshold) {
            return Err(CoverError::InvalidParameters(format!(
                "seuil de rattrapage {} hors de [0, 100]",
                self.patch_coverage_threshold
            )));
        }
        Ok(())
    }
}
