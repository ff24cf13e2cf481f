//! Erreurs du moteur de couverture.
//!
//! Une couverture partielle n'est pas une erreur : elle est rapportée dans
//! `SystemResult` avec `guarantee_achieved = false`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum CoverError {
    /// Paramètres (v, k, t) ou univers rejetés avant tout calcul.
    #[error("Paramètres invalides : {0}")]
    InvalidParameters(String),

    /// Un ensemble à énumérer dépasse le plafond configuré.
    #[error("Ressources dépassées : {size} {pool} à énumérer (plafond {ceiling})")]
    ResourceExceeded {
        pool: &'static str,
        size: u64,
        ceiling: u64,
    },

    /// C(n, r) ou une borne sort du domaine où le calcul flottant reste exact.
    #[error("Précision insuffisante pour C({n}, {r})")]
    PrecisionLimit { n: u64, r: u64 },

    #[error("Table de designs invalide : {0}")]
    Library(String),
}

pub type Result<T> = std::result::Result<T, CoverError>;
