//! Table des systèmes connus.
//!
//! Chaque entrée est un design de couverture vérifié, exprimé en indices
//! 0..v-1 sur l'univers trié. La table intégrée est chargée une seule fois
//! et n'est jamais modifiée.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::OnceLock;

use serde::{Deserialize, Serialize};

use crate::bounds::check_parameters;
use crate::error::{CoverError, Result};
use crate::models::{Bet, MAX_UNIVERSE};

const BUILTIN_DESIGNS: &str = include_str!("../data/known_designs.json");

static BUILTIN: OnceLock<KnownDesignLibrary> = OnceLock::new();

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct KnownDesignEntry {
    pub v: usize,
    pub k: usize,
    pub t: usize,
    pub blocks: Vec<Vec<usize>>,
}

impl KnownDesignEntry {
    pub fn bet_count(&self) -> usize {
        self.blocks.len()
    }

    /// Projette les indices sur l'univers trié, position par position.
    ///
    /// L'univers doit compter exactement `v` numéros.
    pub fn map_onto(&self, sorted_universe: &[u32]) -> Vec<Bet> {
        debug_assert_eq!(sorted_universe.len(), self.v, "univers de taille différente de v");
        self.blocks
            .iter()
            .map(|block| block.iter().map(|&i| sorted_universe[i]).collect())
            .collect()
    }

    fn validate(&self) -> Result<()> {
        let key = (self.v, self.k, self.t);
        check_parameters(self.v, self.k, self.t)
            .map_err(|e| CoverError::Library(format!("{key:?} : {e}")))?;
        if self.v > MAX_UNIVERSE {
            return Err(CoverError::Library(format!("{key:?} : v > {MAX_UNIVERSE}")));
        }
        if self.blocks.is_empty() {
            return Err(CoverError::Library(format!("{key:?} : aucune grille")));
        }
        for block in &self.blocks {
            if block.len() != self.k {
                return Err(CoverError::Library(format!(
                    "{key:?} : grille {block:?} de taille {} au lieu de {}",
                    block.len(),
                    self.k
                )));
            }
            if block.iter().any(|&i| i >= self.v) {
                return Err(CoverError::Library(format!(
                    "{key:?} : indice hors de 0..{} dans {block:?}",
                    self.v
                )));
            }
            if !block.windows(2).all(|w| w[0] < w[1]) {
                return Err(CoverError::Library(format!(
                    "{key:?} : grille {block:?} non triée ou avec doublon"
                )));
            }
        }
        let mut sorted = self.blocks.clone();
        sorted.sort();
        sorted.dedup();
        if sorted.len() != self.blocks.len() {
            return Err(CoverError::Library(format!("{key:?} : grilles en double")));
        }
        Ok(())
    }
}

#[derive(Deserialize)]
struct DesignTable {
    designs: Vec<KnownDesignEntry>,
}

#[derive(Debug, Clone, Default)]
pub struct KnownDesignLibrary {
    entries: BTreeMap<(usize, usize, usize), KnownDesignEntry>,
}

impl KnownDesignLibrary {
    pub fn empty() -> Self {
        Self::default()
    }

    /// Table intégrée au binaire. Une table corrompue donne une bibliothèque
    /// vide : la génération retombe alors sur l'algorithme glouton.
    pub fn builtin() -> &'static KnownDesignLibrary {
        BUILTIN.get_or_init(|| {
            Self::from_json(BUILTIN_DESIGNS).unwrap_or_else(|e| {
                log::error!("Table intégrée illisible : {e}");
                Self::empty()
            })
        })
    }

    pub fn from_json(json: &str) -> Result<Self> {
        let table: DesignTable = serde_json::from_str(json)
            .map_err(|e| CoverError::Library(format!("JSON invalide : {e}")))?;
        let mut entries = BTreeMap::new();
        for entry in table.designs {
            entry.validate()?;
            let key = (entry.v, entry.k, entry.t);
            if entries.insert(key, entry).is_some() {
                return Err(CoverError::Library(format!("{key:?} : entrée en double")));
            }
        }
        Ok(Self { entries })
    }

    pub fn from_path(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path).map_err(|e| {
            CoverError::Library(format!("lecture de {} impossible : {e}", path.display()))
        })?;
        Self::from_json(&json)
    }

    pub fn lookup(&self, v: usize, k: usize, t: usize) -> Option<&KnownDesignEntry> {
        self.entries.get(&(v, k, t))
    }

    /// Entrées triées par (v, k, t).
    pub fn entries(&self) -> impl Iterator<Item = &KnownDesignEntry> {
        self.entries.values()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::verify::verify_coverage;

    #[test]
    fn test_builtin_loads() {
        let library = KnownDesignLibrary::builtin();
        assert!(library.len() > 50, "table trop petite : {}", library.len());
    }

    #[test]
    fn test_builtin_known_counts() {
        let library = KnownDesignLibrary::builtin();
        assert_eq!(library.lookup(7, 6, 3).map(|e| e.bet_count()), Some(4));
        assert_eq!(library.lookup(8, 6, 3).map(|e| e.bet_count()), Some(7));
        assert_eq!(library.lookup(7, 3, 2).map(|e| e.bet_count()), Some(7));
        assert_eq!(library.lookup(10, 4, 3).map(|e| e.bet_count()), Some(30));
        assert!(library.lookup(13, 6, 5).is_none());
    }

    #[test]
    fn test_every_builtin_entry_covers_fully() {
        for entry in KnownDesignLibrary::builtin().entries() {
            let universe: Vec<u32> = (1..=entry.v as u32).collect();
            let bets = entry.map_onto(&universe);
            let coverage = verify_coverage(&universe, entry.k, entry.t, &bets).unwrap();
            assert!(
                coverage.is_complete(),
                "({},{},{}) : {}/{} couverts, manquants {:?}",
                entry.v,
                entry.k,
                entry.t,
                coverage.covered_count,
                coverage.total_targets,
                coverage.uncovered_sample
            );
        }
    }

    #[test]
    fn test_map_onto_positions() {
        let entry = KnownDesignEntry {
            v: 4,
            k: 2,
            t: 1,
            blocks: vec![vec![0, 1], vec![2, 3]],
        };
        assert_eq!(entry.map_onto(&[5, 10, 20, 40]), vec![vec![5, 10], vec![20, 40]]);
    }

    #[test]
    #[should_panic]
    fn test_map_onto_short_universe_panics() {
        let entry = KnownDesignEntry {
            v: 4,
            k: 2,
            t: 1,
            blocks: vec![vec![0, 1], vec![2, 3]],
        };
        entry.map_onto(&[5, 10]);
    }

    #[test]
    fn test_from_json_rejects_bad_index() {
        let json = r#"{"designs": [{"v": 4, "k": 2, "t": 1, "blocks": [[0, 4]]}]}"#;
        assert!(matches!(KnownDesignLibrary::from_json(json), Err(CoverError::Library(_))));
    }

    #[test]
    fn test_from_json_rejects_wrong_block_size() {
        let json = r#"{"designs": [{"v": 4, "k": 2, "t": 1, "blocks": [[0, 1, 2]]}]}"#;
        assert!(KnownDesignLibrary::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_rejects_duplicate_key() {
        let json = r#"{"designs": [
            {"v": 4, "k": 2, "t": 1, "blocks": [[0, 1], [2, 3]]},
            {"v": 4, "k": 2, "t": 1, "blocks": [[0, 2], [1, 3]]}
        ]}"#;
        assert!(KnownDesignLibrary::from_json(json).is_err());
    }

    #[test]
    fn test_from_json_rejects_garbage() {
        assert!(KnownDesignLibrary::from_json("pas du json").is_err());
    }
}
