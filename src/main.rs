//! Search Analytics
//!
//! Batch pipeline for synthetic e-commerce search logs:
//! - Seeded log generation under a category behavior model
//! - CSV dataset persistence with regenerate-on-failure loading
//! - Filtering, rollups, opportunity detection and tuning suggestions
//! - Simulated A/B test of a ranking change
//!
//! The dashboard report is written to stdout as JSON; logs go to stderr.

use anyhow::{Context, Result};
use tracing::info;

use dataset_store::{DatasetStore, StoreConfig};
use log_generator::{BehaviorModel, GeneratorConfig, LogGenerator};
use search_metrics::{filter, DashboardReport, FilterCriteria, ReportConfig};
use telemetry::{init_tracing_from_env, metrics};

/// Application configuration.
#[derive(Debug, Clone, Default, serde::Serialize, serde::Deserialize)]
struct Config {
    #[serde(default)]
    dataset: StoreConfig,

    #[serde(default)]
    generator: GeneratorConfig,

    /// Per-category click, purchase and price behavior
    #[serde(default)]
    behavior: BehaviorModel,

    #[serde(default)]
    filter: FilterCriteria,

    #[serde(default)]
    report: ReportConfig,
}

fn main() -> Result<()> {
    // Load .env file if present
    dotenvy::dotenv().ok();

    init_tracing_from_env();

    info!("Starting search analytics v{}", env!("CARGO_PKG_VERSION"));

    let config = load_config()?;

    info!(
        path = %config.dataset.path.display(),
        rows = config.generator.rows,
        days_back = config.generator.days_back,
        seed = config.generator.seed,
        "Loaded dataset config"
    );

    let generator = LogGenerator::new(&config.behavior).context("Invalid behavior model")?;
    let store = DatasetStore::new(config.dataset.clone(), generator, config.generator.clone());

    let dataset = store
        .load_or_generate()
        .context("Failed to load or generate dataset")?;
    info!(rows = dataset.len(), source = ?dataset.source(), "Dataset ready");

    let events = filter(dataset.events(), &config.filter);

    let report =
        DashboardReport::build(&events, &config.report).context("Failed to build report")?;

    let json = serde_json::to_string_pretty(&report).context("Failed to serialize report")?;
    println!("{}", json);

    let snapshot = serde_json::to_string(&metrics().snapshot())?;
    info!(metrics = %snapshot, "Run complete");

    Ok(())
}

/// Load configuration from files and environment.
fn load_config() -> Result<Config> {
    let config = config::Config::builder()
        // Start with defaults
        .add_source(config::Config::try_from(&Config::default())?)
        // Load from config file if exists
        .add_source(
            config::File::with_name("config/default")
                .required(false)
                .format(config::FileFormat::Toml),
        )
        // Override with environment variables
        .add_source(
            config::Environment::default()
                .separator("__")
                .prefix("SEARCH_ANALYTICS")
                .try_parsing(true),
        )
        .build()
        .context("Failed to build configuration")?;

    let mut config: Config = config
        .try_deserialize()
        .context("Failed to deserialize configuration")?;

    // Flat overrides for the settings changed most often
    if let Ok(path) = std::env::var("SEARCH_ANALYTICS_DATASET_PATH") {
        config.dataset.path = path.into();
    }
    if let Ok(rows) = std::env::var("SEARCH_ANALYTICS_ROWS") {
        config.generator.rows = rows
            .trim()
            .parse()
            .context("SEARCH_ANALYTICS_ROWS must be an integer")?;
    }
    if let Ok(seed) = std::env::var("SEARCH_ANALYTICS_SEED") {
        config.generator.seed = seed
            .trim()
            .parse()
            .context("SEARCH_ANALYTICS_SEED must be an unsigned integer")?;
    }
    if let Ok(query) = std::env::var("SEARCH_ANALYTICS_QUERY") {
        config.filter.query_contains = Some(query);
    }

    Ok(config)
}
