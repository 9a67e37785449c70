use comfy_table::{Table, ContentArrangement, presets::UTF8_FULL, Cell, Color};

use crate::import::ImportResult;
use crate::sync::SyncResult;
use lotofacil_db::models::Draw;
use lotofacil_engine::Prediction;
use lotofacil_engine::check::PrizeTier;
use lotofacil_engine::config::RuleSet;
use lotofacil_engine::ranking::RankingTable;
use lotofacil_engine::validator::{CombinationStats, ValidationResult};

fn numbers_str(numbers: &[u8]) -> String {
    numbers
        .iter()
        .map(|n| format!("{:2}", n))
        .collect::<Vec<_>>()
        .join(" - ")
}

fn new_table(header: Vec<&str>) -> Table {
    let mut table = Table::new();
    table
        .load_preset(UTF8_FULL)
        .set_content_arrangement(ContentArrangement::Dynamic)
        .set_header(header);
    table
}

pub fn display_draws(draws: &[Draw]) {
    if draws.is_empty() {
        println!("Aucun concours à afficher.");
        return;
    }

    let mut table = new_table(vec!["Concours", "Numéros"]);
    for draw in draws {
        table.add_row(vec![draw.id.to_string(), numbers_str(&draw.numbers)]);
    }
    println!("{table}");
}

pub fn display_import_summary(result: &ImportResult) {
    println!("Import terminé :");
    println!("  Total lignes lues : {}", result.total_records);
    println!("  Insérés           : {}", result.inserted);
    println!("  Doublons ignorés  : {}", result.skipped);
    if result.errors > 0 {
        println!("  Erreurs           : {}", result.errors);
    }
}

pub fn display_sync_summary(result: &SyncResult) {
    match result.latest {
        None => println!("API injoignable, base locale conservée (dernier : {}).", result.last_cached),
        Some(latest) if latest <= result.last_cached => {
            println!("Base déjà à jour (concours {}).", result.last_cached)
        }
        Some(latest) => {
            println!("Base mise à jour jusqu'au concours {} :", latest);
            println!("  Nouveaux concours : {}", result.inserted);
            if result.failed > 0 {
                println!("  Échecs            : {}", result.failed);
            }
        }
    }
}

pub fn display_ranking(ranking: &RankingTable) {
    println!(
        "\n📊 Statistiques sur les {} derniers concours (moyenne {:.2}, écart-type {:.2})\n",
        ranking.window, ranking.mean, ranking.std_dev
    );

    let mut table = new_table(vec!["Numéro", "Fréquence", "Retard", "Z-score"]);
    let mut entries = ranking.entries();
    entries.sort_by(|a, b| b.z_score.total_cmp(&a.z_score).then(a.number.cmp(&b.number)));

    for entry in &entries {
        let color = if entry.z_score > 1.0 {
            Color::Green
        } else if entry.z_score < -1.0 {
            Color::Red
        } else {
            Color::White
        };
        table.add_row(vec![
            Cell::new(format!("{:2}", entry.number)),
            Cell::new(entry.frequency),
            Cell::new(entry.gap),
            Cell::new(format!("{:+.3}", entry.z_score)).fg(color),
        ]);
    }
    println!("{table}");
}

pub fn display_prediction(prediction: &Prediction) {
    println!(
        "\n🎯 Pool de {} candidats (fenêtres {} / {} concours)\n",
        prediction.pool.len(),
        prediction.short.window,
        prediction.long.window
    );

    let mut table = new_table(vec!["#", "Numéro", "Z court", "Z long", "Composite"]);
    for (rank, &n) in prediction.pool.numbers.iter().enumerate() {
        let chosen = prediction.outcome.combination.contains(&n);
        let number_cell = Cell::new(format!("{:2}", n));
        table.add_row(vec![
            Cell::new(rank + 1),
            if chosen { number_cell.fg(Color::Green) } else { number_cell },
            Cell::new(format!("{:+.3}", prediction.short.z_score(n))),
            Cell::new(format!("{:+.3}", prediction.long.z_score(n))),
            Cell::new(format!("{:+.3}", prediction.composite.score(n))),
        ]);
    }
    println!("{table}");

    let outcome = &prediction.outcome;
    println!("\n🍀 Grille retenue : {}", numbers_str(&outcome.combination));
    println!("   Score composite : {:.4}", outcome.score);
    println!("   Combinaisons    : {} évaluées, {} valides", outcome.evaluated, outcome.valid);
    if outcome.fallback {
        println!("   ⚠ Aucune combinaison valide : repli sur les 15 premiers du pool");
    }
}

pub fn display_validation(numbers: &[u8], result: &ValidationResult, stats: &CombinationStats, rules: &RuleSet) {
    println!("\nGrille : {}\n", numbers_str(numbers));

    let mut table = new_table(vec!["Règle", "Valeur", "Bornes"]);
    table.add_row(vec!["Pairs".to_string(), stats.evens.to_string(), rules.parity.to_string()]);
    table.add_row(vec!["Premiers".to_string(), stats.primes.to_string(), rules.primes.to_string()]);
    table.add_row(vec!["Somme".to_string(), stats.sum.to_string(), rules.sum.to_string()]);
    table.add_row(vec![
        "Recouvrement".to_string(),
        stats.overlap.map(|o| o.to_string()).unwrap_or_else(|| "—".to_string()),
        rules.overlap.to_string(),
    ]);
    println!("{table}");

    if result.valid {
        println!("✅ Grille valide");
    } else {
        println!("❌ Grille rejetée : {}", result.reason);
    }
}

pub fn display_check(ticket: &[u8], draw: &Draw, hits: usize) {
    let tier = PrizeTier::from_hits(hits);
    let icon = if tier.is_winning() { "✅" } else { "❌" };
    println!("\n🔍 Vérification sur le concours {}", draw.id);
    println!("   Résultat : {}", numbers_str(&draw.numbers));
    println!("   Grille   : {}", numbers_str(ticket));
    println!("   {} {}", icon, tier);
}
