use anyhow::{Context, Result};
use cargoguard::{
    util, App, Config, Database, LocalReportStore, RemoteReportStore, ReportStore, StorageBackend,
};
use clap::{Parser, Subcommand};
use std::fs::{self, OpenOptions};
use std::path::{Path, PathBuf};
use std::sync::Arc;

#[derive(Parser)]
#[command(name = "cargoguard", about = "Transportschaden-Dokumentation im Terminal", version)]
struct Cli {
    /// Data directory (default: ~/.cargoguard)
    #[arg(long, value_name = "DIR")]
    data_dir: Option<PathBuf>,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand)]
enum Command {
    /// Dump all stored reports as a JSON array
    Export {
        /// Write to this file instead of stdout
        #[arg(long, value_name = "FILE")]
        out: Option<PathBuf>,
    },
    /// Import reports from a JSON array file
    Import { file: PathBuf },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    util::init_data_dir(cli.data_dir.clone());

    // Initialize logging to file (~/.cargoguard/logs/cargoguard.log)
    fs::create_dir_all(util::logs_dir())?;
    fs::create_dir_all(util::captures_dir())?;
    fs::create_dir_all(util::exports_dir())?;

    let log_file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(util::log_file_path())?;

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive(tracing::Level::WARN.into()),
        )
        .with_writer(log_file)
        .with_ansi(false) // Disable ANSI colors in log file
        .init();

    let config = Config::load();

    match cli.command {
        Some(Command::Export { out }) => export_reports(&config, out.as_deref()).await,
        Some(Command::Import { file }) => import_reports(&config, &file).await,
        None => {
            let mut app = App::new(config);
            app.run().await
        }
    }
}

fn open_store(config: &Config) -> Result<Arc<dyn ReportStore>> {
    match &config.backend {
        StorageBackend::Local => {
            let db = Database::open_default().context("Datenbank konnte nicht geöffnet werden")?;
            Ok(Arc::new(LocalReportStore::new(db.connection())))
        }
        StorageBackend::Remote {
            base_url,
            api_key,
            table,
        } => Ok(Arc::new(RemoteReportStore::new(base_url, api_key, table)?)),
    }
}

async fn export_reports(config: &Config, out: Option<&Path>) -> Result<()> {
    let store = open_store(config)?;
    let json = store.export_json().await?;
    match out {
        Some(path) => {
            fs::write(path, &json)
                .with_context(|| format!("Export nach {} fehlgeschlagen", path.display()))?;
            eprintln!("Berichte exportiert nach {}", path.display());
        }
        None => println!("{json}"),
    }
    Ok(())
}

async fn import_reports(config: &Config, file: &Path) -> Result<()> {
    let json = fs::read_to_string(file)
        .with_context(|| format!("{} konnte nicht gelesen werden", file.display()))?;
    let store = open_store(config)?;
    let imported = store.import_json(&json).await?;
    eprintln!("{imported} Bericht(e) importiert");
    Ok(())
}
