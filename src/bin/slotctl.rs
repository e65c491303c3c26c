use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::Context;
use clap::{Parser, Subcommand};

use interview_slots::models::{Candidate, ScheduleConfig, StoredSchedule};
use interview_slots::ranking::SkillMatchRanker;
use interview_slots::store::{DurableScheduleStore, MemoryScheduleStore, ScheduleStore};
use interview_slots::{EngineSettings, GenerationReport, GenerationRequest, SchedulingEngine};

#[derive(Parser)]
#[command(
    name = "slotctl",
    about = "Generate and inspect interview slot schedules",
    version,
    propagate_version = true
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a drive's schedule and print the report as JSON.
    Generate {
        /// Drive config (TOML)
        #[arg(short, long)]
        config: PathBuf,
        /// Candidate pool (JSON array)
        #[arg(long)]
        candidates: PathBuf,
        /// Target skills, comma-separated
        #[arg(short, long, value_delimiter = ',')]
        skills: Vec<String>,
        /// redb file to persist into (default: in-memory only)
        #[arg(long)]
        store: Option<PathBuf>,
        /// Engine settings (TOML)
        #[arg(long)]
        settings: Option<PathBuf>,
    },
    /// Print a drive's stored schedule as JSON.
    Show {
        #[arg(long)]
        store: PathBuf,
        #[arg(short, long)]
        drive: String,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let output = match cli.command {
        Commands::Generate {
            config,
            candidates,
            skills,
            store,
            settings,
        } => {
            let report =
                generate(&config, &candidates, skills, store.as_deref(), settings.as_deref())
                    .await?;
            serde_json::to_string_pretty(&report)?
        }
        Commands::Show { store, drive } => serde_json::to_string_pretty(&show(&store, &drive)?)?,
    };
    println!("{output}");
    Ok(())
}

async fn generate(
    config_path: &Path,
    candidates_path: &Path,
    skills: Vec<String>,
    store_path: Option<&Path>,
    settings_path: Option<&Path>,
) -> anyhow::Result<GenerationReport> {
    let raw = std::fs::read_to_string(config_path)
        .with_context(|| format!("reading {}", config_path.display()))?;
    let config: ScheduleConfig =
        toml::from_str(&raw).with_context(|| format!("parsing {}", config_path.display()))?;

    let raw = std::fs::read_to_string(candidates_path)
        .with_context(|| format!("reading {}", candidates_path.display()))?;
    let candidates: Vec<Candidate> = serde_json::from_str(&raw)
        .with_context(|| format!("parsing {}", candidates_path.display()))?;

    let settings = match settings_path {
        Some(path) => EngineSettings::from_file(path)
            .with_context(|| format!("loading {}", path.display()))?,
        None => EngineSettings::default(),
    };

    let store: Arc<dyn ScheduleStore> = match store_path {
        Some(path) => Arc::new(DurableScheduleStore::open(path)?),
        None => Arc::new(MemoryScheduleStore::new()),
    };

    let engine = SchedulingEngine::new(Arc::new(SkillMatchRanker), store).with_settings(settings);
    let request = GenerationRequest::new(config, candidates).with_target_skills(skills);
    Ok(engine.generate(&request).await?)
}

fn show(store_path: &Path, drive_id: &str) -> anyhow::Result<StoredSchedule> {
    let store = DurableScheduleStore::open(store_path)?;
    store
        .get(drive_id)?
        .with_context(|| format!("no schedule stored for drive {drive_id}"))
}
