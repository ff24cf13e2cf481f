//! Moteur des systèmes skrócone : bornes inférieures (simple, Schönheim),
//! table de designs de couverture connus, repli glouton et vérification.
//!
//! Fonctions pures, sans état partagé hors de la table en lecture seule :
//! chaque appel peut s'exécuter en parallèle des autres.

pub mod bounds;
pub mod combinations;
pub mod config;
pub mod error;
pub mod generator;
pub mod greedy;
pub mod library;
pub mod models;
pub mod verify;

pub use bounds::{compute_bounds, Bounds};
pub use config::GenerateOptions;
pub use error::{CoverError, Result};
pub use generator::{generate_system, generate_system_with};
pub use library::KnownDesignLibrary;
pub use models::{Bet, CoverageResult, DesignSource, SystemResult};
pub use verify::verify_coverage;
