use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use skrocone_core::library::KnownDesignEntry;
use skrocone_core::{Bounds, CoverageResult, SystemResult};

fn format_bet(bet: &[u32]) -> String {
    bet.iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn coverage_color(percent: f64) -> Color {
    if percent >= 100.0 {
        Color::Green
    } else if percent >= 90.0 {
        Color::Yellow
    } else {
        Color::Red
    }
}

pub fn display_bounds(v: usize, k: usize, t: usize, bounds: &Bounds) {
    println!("\n📐 Bornes pour v={v}, k={k}, t={t}\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Borne", "Grilles"]);

    table.add_row(vec!["Borne simple ⌈C(v,t)/C(k,t)⌉".to_string(), bounds.simple_bound.to_string()]);
    table.add_row(vec!["Borne de Schönheim".to_string(), bounds.schonheim_bound.to_string()]);
    let full = bounds
        .full_system_size
        .map(|n| n.to_string())
        .unwrap_or_else(|| "—".to_string());
    table.add_row(vec!["Système complet C(v,k)".to_string(), full]);

    println!("{table}");
}

pub fn display_system(result: &SystemResult, k: usize, t: usize) {
    println!("\n🎲 Système skrócone : {} grilles de {k} numéros, garantie {t}\n", result.bets.len());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["#", "Numéros"]);

    for (i, bet) in result.bets.iter().enumerate() {
        table.add_row(vec![format!("{}", i + 1), format_bet(bet)]);
    }
    println!("{table}");

    let mut summary = Table::new();
    summary
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Statistique", "Valeur"]);

    summary.add_row(vec![Cell::new("Source"), Cell::new(result.source.to_string())]);
    summary.add_row(vec![
        Cell::new("Couverture"),
        Cell::new(format!(
            "{:.2}% ({}/{})",
            result.coverage_percent, result.covered_count, result.total_targets
        ))
        .fg(coverage_color(result.coverage_percent)),
    ]);
    let guarantee = if result.guarantee_achieved { "oui" } else { "partielle" };
    summary.add_row(vec![Cell::new("Garantie"), Cell::new(guarantee)]);
    summary.add_row(vec![Cell::new("Borne simple"), Cell::new(result.simple_bound)]);
    summary.add_row(vec![Cell::new("Borne de Schönheim"), Cell::new(result.schonheim_bound)]);
    summary.add_row(vec![
        Cell::new("Efficacité"),
        Cell::new(format!("{:.1}%", result.efficiency() * 100.0)),
    ]);
    if let Some(full) = result.full_system_size {
        summary.add_row(vec![Cell::new("Système complet"), Cell::new(full)]);
    }
    println!("{summary}");

    if !result.guarantee_achieved {
        println!("\n⚠️  Garantie partielle : certains t-uplets ne sont couverts par aucune grille.");
    }
}

pub fn display_coverage(coverage: &CoverageResult, bet_count: usize) {
    println!("\n🔍 Vérification de {bet_count} grilles\n");

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["Couverts", "Total", "Couverture"]);

    table.add_row(vec![
        Cell::new(coverage.covered_count),
        Cell::new(coverage.total_targets),
        Cell::new(format!("{:.2}%", coverage.coverage_percent))
            .fg(coverage_color(coverage.coverage_percent)),
    ]);
    println!("{table}");

    if !coverage.uncovered_sample.is_empty() {
        println!("\nExemples de t-uplets non couverts :");
        for sample in &coverage.uncovered_sample {
            println!("  {}", format_bet(sample));
        }
    }
}

pub fn display_library(entries: &[&KnownDesignEntry], schonheim: &[u64]) {
    println!("\n📚 Table des systèmes connus ({} entrées)\n", entries.len());

    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["v", "k", "t", "Grilles", "Schönheim", "Écart"]);

    for (entry, &bound) in entries.iter().zip(schonheim) {
        let gap = entry.bet_count() as i64 - bound as i64;
        let color = if gap == 0 { Color::Green } else { Color::White };
        table.add_row(vec![
            Cell::new(entry.v),
            Cell::new(entry.k),
            Cell::new(entry.t),
            Cell::new(entry.bet_count()),
            Cell::new(bound),
            Cell::new(format!("+{gap}")).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_check_summary(checked: usize, failures: &[(usize, usize, usize, f64)]) {
    if failures.is_empty() {
        println!("\n✅ {checked} designs vérifiés : couverture complète partout.");
        return;
    }

    println!("\n❌ {} designs incomplets sur {checked} :", failures.len());
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(vec!["v", "k", "t", "Couverture"]);
    for &(v, k, t, percent) in failures {
        table.add_row(vec![
            Cell::new(v),
            Cell::new(k),
            Cell::new(t),
            Cell::new(format!("{:.2}%", percent)).fg(Color::Red),
        ]);
    }
    println!("{table}");
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_bet() {
        assert_eq!(format_bet(&[1, 12, 49]), " 1 - 12 - 49");
    }

    #[test]
    fn test_coverage_color() {
        assert_eq!(coverage_color(100.0), Color::Green);
        assert_eq!(coverage_color(95.0), Color::Yellow);
        assert_eq!(coverage_color(40.0), Color::Red);
    }
}
