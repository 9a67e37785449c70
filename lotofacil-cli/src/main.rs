mod display;
mod import;
mod sync;

use std::path::{Path, PathBuf};

use anyhow::{Context, Result, bail};
use clap::{Args, Parser, Subcommand};

use crate::display::{
    display_check, display_draws, display_import_summary, display_prediction, display_ranking,
    display_sync_summary, display_validation,
};
use crate::sync::{SyncConfig, sync_history};
use lotofacil_db::db::{count_draws, db_path, fetch_history, fetch_last_draws, migrate, open_db};
use lotofacil_db::models::validate_numbers;
use lotofacil_db::rusqlite::Connection;
use lotofacil_engine::check::count_hits;
use lotofacil_engine::config::{EngineConfig, RuleRevision, SearchStrategy, load_config};
use lotofacil_engine::generate;
use lotofacil_engine::ranking::build_ranking;
use lotofacil_engine::validator::{combination_stats, validate};

const EMPTY_DB_HINT: &str = "Base vide. Lancez d'abord : lotofacil sync (ou lotofacil import)";

#[derive(Parser)]
#[command(name = "lotofacil", about = "Sélection de grilles Lotofácil par fréquences et règles de distribution")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Télécharger les concours manquants depuis l'API Caixa
    Sync {
        #[command(flatten)]
        remote: RemoteArgs,
    },

    /// Importer les concours depuis un fichier CSV (concurso,dezenas)
    Import {
        /// Chemin vers le fichier CSV
        #[arg(short, long, default_value = "lotofacil_historico.csv")]
        file: PathBuf,
    },

    /// Exporter l'historique au format CSV (concurso,dezenas)
    Export {
        /// Chemin du fichier à écrire
        #[arg(short, long, default_value = "lotofacil_historico.csv")]
        file: PathBuf,
    },

    /// Afficher le chemin de la base de données
    DbPath,

    /// Lister les derniers concours
    List {
        /// Nombre de concours à afficher
        #[arg(short, long, default_value = "10")]
        last: u32,
    },

    /// Afficher fréquences, retards et z-scores sur une fenêtre
    Stats {
        /// Fenêtre d'analyse (nombre de concours)
        #[arg(short, long, default_value = "10")]
        window: usize,
    },

    /// Chercher la meilleure grille de 15 numéros
    Predict(PredictArgs),

    /// Vérifier une grille contre les règles de distribution
    Validate {
        /// 15 numéros (1-25)
        numbers: Vec<u8>,

        /// Révision des règles
        #[arg(short, long, default_value = "relaxed")]
        rules: RuleRevision,
    },

    /// Compter les bons numéros d'une grille sur le dernier concours
    Check {
        /// 15 numéros (1-25)
        numbers: Vec<u8>,
    },
}

#[derive(Args)]
struct RemoteArgs {
    /// URL de base de l'API
    #[arg(long, default_value = sync::DEFAULT_BASE_URL)]
    url: String,

    /// Requêtes simultanées
    #[arg(long, default_value = "16")]
    concurrency: usize,

    /// Accepter les certificats TLS invalides
    #[arg(long)]
    insecure: bool,
}

impl RemoteArgs {
    fn sync_config(&self) -> SyncConfig {
        SyncConfig {
            base_url: self.url.clone(),
            concurrency: self.concurrency,
            insecure: self.insecure,
            ..SyncConfig::default()
        }
    }
}

#[derive(Args)]
struct PredictArgs {
    /// Fichier de configuration JSON (les options ci-dessous le surchargent)
    #[arg(long)]
    config: Option<PathBuf>,

    /// Fenêtre courte (nombre de concours)
    #[arg(long)]
    short_window: Option<usize>,

    /// Fenêtre longue (nombre de concours)
    #[arg(long)]
    long_window: Option<usize>,

    /// Taille du pool de candidats (15-25)
    #[arg(short, long)]
    pool_size: Option<usize>,

    /// Poids de la fenêtre courte
    #[arg(long)]
    short_weight: Option<f64>,

    /// Poids de la fenêtre longue
    #[arg(long)]
    long_weight: Option<f64>,

    /// Révision des règles
    #[arg(short, long)]
    rules: Option<RuleRevision>,

    /// Échantillonner N combinaisons au lieu de tout énumérer
    #[arg(long)]
    sampled: Option<usize>,

    /// Seed de l'échantillonnage (défaut : date du jour YYYYMMDD)
    #[arg(long)]
    seed: Option<u64>,

    /// Ne pas interroger l'API avant la recherche
    #[arg(long)]
    offline: bool,

    #[command(flatten)]
    remote: RemoteArgs,
}

impl PredictArgs {
    fn engine_config(&self) -> Result<EngineConfig> {
        let mut config = match &self.config {
            Some(path) => load_config(path)
                .with_context(|| format!("Impossible de charger la configuration {:?}", path))?,
            None => EngineConfig::default(),
        };

        if let Some(w) = self.short_window {
            config.short_window = w;
        }
        if let Some(w) = self.long_window {
            config.long_window = w;
        }
        if let Some(k) = self.pool_size {
            config.pool_size = k;
        }
        if let Some(w) = self.short_weight {
            config.weights.short = w;
        }
        if let Some(w) = self.long_weight {
            config.weights.long = w;
        }
        if let Some(revision) = self.rules {
            config.rules = revision.rules();
        }
        if let Some(samples) = self.sampled {
            config.strategy = SearchStrategy::Sampled { samples, seed: self.seed };
        } else if let SearchStrategy::Sampled { samples, seed } = config.strategy {
            config.strategy = SearchStrategy::Sampled { samples, seed: self.seed.or(seed) };
        }

        if (config.weights.short + config.weights.long - 1.0).abs() > 1e-9 {
            log::warn!(
                "Poids {} + {} différents de 1.0",
                config.weights.short, config.weights.long
            );
        }
        Ok(config)
    }
}

fn init_logging() {
    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or("warn,lotofacil_engine=info,lotofacil=info"),
    )
    .init();
}

fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let path = db_path();
    let conn = open_db(&path)?;
    migrate(&conn)?;

    match cli.command {
        Command::Sync { remote } => cmd_sync(&conn, &remote.sync_config()),
        Command::Import { file } => cmd_import(&conn, &file),
        Command::Export { file } => cmd_export(&conn, &file),
        Command::DbPath => {
            println!("{}", path.display());
            Ok(())
        }
        Command::List { last } => cmd_list(&conn, last),
        Command::Stats { window } => cmd_stats(&conn, window),
        Command::Predict(args) => cmd_predict(&conn, &args),
        Command::Validate { numbers, rules } => cmd_validate(&conn, &numbers, rules),
        Command::Check { numbers } => cmd_check(&conn, &numbers),
    }
}

fn cmd_sync(conn: &Connection, config: &SyncConfig) -> Result<()> {
    let result = sync_history(conn, config)?;
    display_sync_summary(&result);
    Ok(())
}

fn cmd_import(conn: &Connection, file: &Path) -> Result<()> {
    let result = import::import_csv(conn, file)?;
    display_import_summary(&result);
    Ok(())
}

fn cmd_export(conn: &Connection, file: &Path) -> Result<()> {
    let n = import::export_csv(conn, file)?;
    println!("{} concours exportés dans {}", n, file.display());
    Ok(())
}

fn cmd_list(conn: &Connection, last: u32) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("{EMPTY_DB_HINT}");
        return Ok(());
    }
    let draws = fetch_last_draws(conn, last)?;
    display_draws(&draws);
    Ok(())
}

fn cmd_stats(conn: &Connection, window: usize) -> Result<()> {
    if count_draws(conn)? == 0 {
        println!("{EMPTY_DB_HINT}");
        return Ok(());
    }
    let history = fetch_history(conn)?;
    let ranking = build_ranking(&history, window)?;
    display_ranking(&ranking);
    Ok(())
}

fn cmd_predict(conn: &Connection, args: &PredictArgs) -> Result<()> {
    let config = args.engine_config()?;

    if !args.offline {
        let result = sync_history(conn, &args.remote.sync_config())?;
        display_sync_summary(&result);
    }

    let history = fetch_history(conn)?;
    if history.is_empty() {
        println!("{EMPTY_DB_HINT}");
        return Ok(());
    }

    let prediction = generate(&history, &config)?;
    display_prediction(&prediction);

    if let Some(last) = history.last() {
        let hits = count_hits(&prediction.outcome.combination, last);
        display_check(&prediction.outcome.combination, last, hits);
    }
    Ok(())
}

fn cmd_validate(conn: &Connection, numbers: &[u8], revision: RuleRevision) -> Result<()> {
    let rules = revision.rules();
    let previous = fetch_last_draws(conn, 1)?.into_iter().next();
    if previous.is_none() {
        println!("(Base vide : règle de recouvrement ignorée)");
    }

    let result = validate(numbers, previous.as_ref(), &rules)
        .context("Grille invalide")?;
    let stats = combination_stats(numbers, previous.as_ref(), &rules);
    display_validation(numbers, &result, &stats, &rules);
    Ok(())
}

fn cmd_check(conn: &Connection, numbers: &[u8]) -> Result<()> {
    validate_numbers(numbers)?;

    let Some(last) = fetch_last_draws(conn, 1)?.into_iter().next() else {
        bail!("{EMPTY_DB_HINT}");
    };
    let mut ticket = numbers.to_vec();
    ticket.sort();
    display_check(&ticket, &last, count_hits(&ticket, &last));
    Ok(())
}
