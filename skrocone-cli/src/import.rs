use std::io::Read;
use std::path::Path;

use anyhow::{Context, Result, bail};

use skrocone_core::Bet;

/// Lit une liste de numéros séparés par espaces, virgules ou points-virgules.
pub fn parse_numbers(s: &str) -> Result<Vec<u32>> {
    let numbers = s
        .split(|c: char| c.is_whitespace() || c == ',' || c == ';')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .with_context(|| format!("Numéro invalide : '{}'", part))
        })
        .collect::<Result<Vec<_>>>()?;
    if numbers.is_empty() {
        bail!("Aucun numéro fourni");
    }
    Ok(numbers)
}

/// Une grille par ligne ; lignes vides et commentaires `#` ignorés.
pub fn parse_bets<R: Read>(reader: R) -> Result<Vec<Bet>> {
    let mut csv_reader = csv::ReaderBuilder::new()
        .delimiter(b';')
        .has_headers(false)
        .flexible(true)
        .comment(Some(b'#'))
        .from_reader(reader);

    let mut bets = Vec::new();
    for (i, record) in csv_reader.records().enumerate() {
        let record = record.with_context(|| format!("Erreur lecture ligne {}", i + 1))?;
        let line_no = record.position().map(|p| p.line()).unwrap_or(i as u64 + 1);
        let line = record.iter().collect::<Vec<_>>().join(" ");
        if line.trim().is_empty() {
            continue;
        }
        let bet = parse_numbers(&line).with_context(|| format!("Grille invalide ligne {}", line_no))?;
        bets.push(bet);
    }
    Ok(bets)
}

pub fn read_bets(path: &Path) -> Result<Vec<Bet>> {
    let file = std::fs::File::open(path)
        .with_context(|| format!("Impossible d'ouvrir {:?}", path))?;
    parse_bets(file)
}
