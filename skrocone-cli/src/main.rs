mod display;
mod import;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use chrono::Datelike;
use clap::{Parser, Subcommand};
use indicatif::{ProgressBar, ProgressStyle};
use rand::SeedableRng;
use rand::rngs::StdRng;
use rayon::prelude::*;

use skrocone_core::bounds::schonheim_bound;
use skrocone_core::{
    GenerateOptions, KnownDesignLibrary, compute_bounds, generate_system_with, verify_coverage,
};

use crate::display::{
    display_bounds, display_check_summary, display_coverage, display_library, display_system,
};
use crate::import::{parse_numbers, read_bets};

#[derive(Parser)]
#[command(name = "skrocone", about = "Systèmes skrócone : bornes et designs de couverture")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Calculer les bornes inférieures du nombre de grilles
    Bounds {
        /// Nombre de numéros joués (v)
        #[arg(short = 'v', long = "pool")]
        pool: usize,

        /// Numéros par grille (k)
        #[arg(short = 'k', long = "bet-size", default_value = "6")]
        bet_size: usize,

        /// Garantie (t)
        #[arg(short = 't', long = "guarantee", default_value = "3")]
        guarantee: usize,
    },

    /// Générer un système skrócone
    Generate {
        /// Numéros joués (ex: "3 8 11 17 23 29 31 40")
        #[arg(short, long)]
        numbers: String,

        /// Numéros par grille (k)
        #[arg(short = 'k', long = "bet-size", default_value = "6")]
        bet_size: usize,

        /// Garantie (t)
        #[arg(short = 't', long = "guarantee", default_value = "3")]
        guarantee: usize,

        /// Fichier JSON d'options de génération
        #[arg(short, long)]
        config: Option<PathBuf>,

        /// Itérations maximales de la recherche gloutonne
        #[arg(long)]
        max_iterations: Option<usize>,

        /// Nombre maximal de grilles
        #[arg(long)]
        max_bets: Option<usize>,

        /// Seuil de couverture (%) déclenchant le rattrapage
        #[arg(long)]
        threshold: Option<f64>,

        /// Limite de temps en millisecondes
        #[arg(long)]
        time_limit_ms: Option<u64>,

        /// Seed pour la reproductibilité (défaut: date du jour YYYYMMDD)
        #[arg(long)]
        seed: Option<u64>,

        /// Table de designs externe (JSON) à la place de la table intégrée
        #[arg(long)]
        library: Option<PathBuf>,

        /// Sauvegarder les options effectives dans ce fichier
        #[arg(long)]
        save_config: Option<PathBuf>,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Vérifier la couverture d'une liste de grilles
    Verify {
        /// Numéros joués
        #[arg(short, long)]
        numbers: String,

        /// Numéros par grille (k)
        #[arg(short = 'k', long = "bet-size", default_value = "6")]
        bet_size: usize,

        /// Garantie (t)
        #[arg(short = 't', long = "guarantee", default_value = "3")]
        guarantee: usize,

        /// Fichier des grilles (une par ligne)
        #[arg(short, long)]
        file: PathBuf,

        /// Sortie JSON
        #[arg(long)]
        json: bool,
    },

    /// Lister (et vérifier) la table des systèmes connus
    Library {
        /// Table externe (JSON) à la place de la table intégrée
        #[arg(short, long)]
        file: Option<PathBuf>,

        /// Revérifier la couverture de chaque design
        #[arg(long)]
        check: bool,
    },
}

fn date_seed() -> u64 {
    let today = chrono::Local::now().date_naive();
    let y = today.year() as u64;
    let m = today.month() as u64;
    let d = today.day() as u64;
    y * 10_000 + m * 100 + d
}

fn main() -> Result<()> {
    env_logger::init();
    let cli = Cli::parse();

    match cli.command {
        Command::Bounds {
            pool,
            bet_size,
            guarantee,
        } => cmd_bounds(pool, bet_size, guarantee),
        Command::Generate {
            numbers,
            bet_size,
            guarantee,
            config,
            max_iterations,
            max_bets,
            threshold,
            time_limit_ms,
            seed,
            library,
            save_config,
            json,
        } => {
            let mut options = match &config {
                Some(path) => GenerateOptions::from_json_file(path)?,
                None => GenerateOptions::default(),
            };
            if let Some(n) = max_iterations {
                options.max_iterations = n;
            }
            if let Some(n) = max_bets {
                options.max_bets = n;
            }
            if let Some(p) = threshold {
                options.patch_coverage_threshold = p;
            }
            if time_limit_ms.is_some() {
                options.time_limit_ms = time_limit_ms;
            }
            match seed {
                Some(s) => options.random_seed = s,
                None if config.is_none() => options.random_seed = date_seed(),
                None => {}
            }

            if let Some(path) = save_config {
                std::fs::write(&path, options.to_json_string()?)
                    .with_context(|| format!("Impossible d'écrire {:?}", path))?;
                log::info!("Options sauvegardées dans {}", path.display());
            }

            cmd_generate(&numbers, bet_size, guarantee, &options, library, json)
        }
        Command::Verify {
            numbers,
            bet_size,
            guarantee,
            file,
            json,
        } => cmd_verify(&numbers, bet_size, guarantee, &file, json),
        Command::Library { file, check } => cmd_library(file, check),
    }
}

fn load_library(path: Option<PathBuf>) -> Result<Option<KnownDesignLibrary>> {
    path.map(|p| {
        KnownDesignLibrary::from_path(&p)
            .with_context(|| format!("Table de designs {:?} invalide", p))
    })
    .transpose()
}

/// Table externe si fournie, sinon la table intégrée.
fn library_or_builtin(external: Option<&KnownDesignLibrary>) -> &KnownDesignLibrary {
    match external {
        Some(library) => library,
        None => KnownDesignLibrary::builtin(),
    }
}

fn cmd_bounds(v: usize, k: usize, t: usize) -> Result<()> {
    let bounds = compute_bounds(v, k, t)?;
    display_bounds(v, k, t, &bounds);
    Ok(())
}

fn cmd_generate(
    numbers: &str,
    k: usize,
    t: usize,
    options: &GenerateOptions,
    library_path: Option<PathBuf>,
    json: bool,
) -> Result<()> {
    let universe = parse_numbers(numbers)?;
    let external = load_library(library_path)?;
    let library = library_or_builtin(external.as_ref());

    let mut rng = StdRng::seed_from_u64(options.random_seed);
    let result = generate_system_with(library, &universe, k, t, options, &mut rng)
        .context("Échec de la génération")?;

    if json {
        println!("{}", serde_json::to_string_pretty(&result)?);
    } else {
        display_system(&result, k, t);
    }
    Ok(())
}

fn cmd_verify(numbers: &str, k: usize, t: usize, file: &Path, json: bool) -> Result<()> {
    let universe = parse_numbers(numbers)?;
    let bets = read_bets(file)?;
    if bets.is_empty() {
        bail!("Aucune grille dans {:?}", file);
    }

    let coverage = verify_coverage(&universe, k, t, &bets)?;
    if json {
        println!("{}", serde_json::to_string_pretty(&coverage)?);
    } else {
        display_coverage(&coverage, bets.len());
    }
    Ok(())
}

fn cmd_library(path: Option<PathBuf>, check: bool) -> Result<()> {
    let external = load_library(path)?;
    let library = library_or_builtin(external.as_ref());
    if library.is_empty() {
        bail!("Table des systèmes connus vide");
    }

    let entries: Vec<_> = library.entries().collect();
    let bounds = entries
        .iter()
        .map(|e| schonheim_bound(e.v, e.k, e.t))
        .collect::<Result<Vec<_>, _>>()?;
    display_library(&entries, &bounds);

    if !check {
        return Ok(());
    }

    let pb = ProgressBar::new(entries.len() as u64);
    pb.set_style(
        ProgressStyle::with_template(
            "{spinner:.green} [{elapsed_precise}] [{bar:40.cyan/blue}] {pos}/{len} ({eta})",
        )
        .context("Modèle de barre de progression invalide")?
        .progress_chars("=> "),
    );

    let results: Vec<Result<(usize, usize, usize, f64)>> = entries
        .par_iter()
        .map(|entry| {
            let universe: Vec<u32> = (1..=entry.v as u32).collect();
            let bets = entry.map_onto(&universe);
            let coverage = verify_coverage(&universe, entry.k, entry.t, &bets)?;
            pb.inc(1);
            Ok((entry.v, entry.k, entry.t, coverage.coverage_percent))
        })
        .collect();
    pb.finish_and_clear();

    let mut failures = Vec::new();
    for result in results {
        let (v, k, t, percent) = result?;
        if percent < 100.0 {
            failures.push((v, k, t, percent));
        }
    }

    display_check_summary(entries.len(), &failures);
    if !failures.is_empty() {
        bail!("{} designs incomplets", failures.len());
    }
    Ok(())
}
