//! CSV-backed dataset store with load-or-generate semantics.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};
use std::time::Instant;

use log_generator::{GeneratorConfig, LogGenerator};
use search_core::{Error, Result, SearchEvent};
use telemetry::metrics;
use tracing::{debug, error, info, warn};

use crate::config::StoreConfig;
use crate::dataset::{Dataset, RegenerationReason};
use crate::enrichment::PriceEnricher;
use crate::record::{EventRecord, COLUMNS, REQUIRED_COLUMNS};

/// Reads and writes the persisted dataset, regenerating it when needed.
pub struct DatasetStore {
    config: StoreConfig,
    generator: LogGenerator,
    generation: GeneratorConfig,
}

impl DatasetStore {
    pub fn new(config: StoreConfig, generator: LogGenerator, generation: GeneratorConfig) -> Self {
        info!(
            path = %config.path.display(),
            rows = generation.rows,
            seed = generation.seed,
            "Created dataset store"
        );
        Self {
            config,
            generator,
            generation,
        }
    }

    pub fn path(&self) -> &Path {
        &self.config.path
    }

    pub fn config(&self) -> &StoreConfig {
        &self.config
    }

    /// Loads the dataset, or generates and persists a fresh one.
    ///
    /// A missing, zero-length, or unparsable file is never fatal: it is
    /// replaced by a generated dataset. A failed write is logged and the
    /// generated events are still returned. Only an invalid generator
    /// configuration is an error.
    pub fn load_or_generate(&self) -> Result<Dataset> {
        let reason = match self.probe() {
            Ok(events) => {
                metrics().dataset_rows.set(events.len() as u64);
                return Ok(Dataset::loaded(events));
            }
            Err(reason) => reason,
        };

        warn!(
            path = %self.path().display(),
            reason = %reason,
            "Dataset not usable, generating a synthetic one"
        );

        let events = self.generator.generate_from(&self.generation)?;
        if let Err(e) = self.save(&events) {
            metrics().dataset_write_failures.inc();
            error!(
                path = %self.path().display(),
                error = %e,
                "Failed to persist generated dataset"
            );
        }

        metrics().dataset_rows.set(events.len() as u64);
        Ok(Dataset::generated(events, reason))
    }

    /// Classifies the file and loads it when usable.
    fn probe(&self) -> std::result::Result<Vec<SearchEvent>, RegenerationReason> {
        match fs::metadata(self.path()) {
            Err(e) if e.kind() == io::ErrorKind::NotFound => {
                return Err(RegenerationReason::Missing)
            }
            Err(e) => {
                metrics().dataset_load_failures.inc();
                warn!(error = %e, "Failed to stat dataset");
                return Err(RegenerationReason::Unreadable);
            }
            Ok(meta) if meta.len() == 0 => return Err(RegenerationReason::Empty),
            Ok(_) => {}
        }

        match self.load() {
            Ok(events) if events.is_empty() => Err(RegenerationReason::Empty),
            Ok(events) => Ok(events),
            Err(e) => {
                metrics().dataset_load_failures.inc();
                warn!(error = %e, "Failed to load dataset");
                Err(RegenerationReason::Unreadable)
            }
        }
    }

    /// Strictly loads the persisted dataset.
    ///
    /// Rows lacking price/revenue are enriched before validation. Any parse
    /// or invariant failure is reported as `DatasetUnreadable`.
    pub fn load(&self) -> Result<Vec<SearchEvent>> {
        let started = Instant::now();

        let mut reader = csv::ReaderBuilder::new()
            .has_headers(true)
            .trim(csv::Trim::All)
            .from_path(self.path())
            .map_err(|e| Error::unreadable(format!("open: {}", e)))?;

        let headers = reader
            .headers()
            .map_err(|e| Error::unreadable(format!("header: {}", e)))?
            .clone();
        if let Some(missing) = REQUIRED_COLUMNS
            .iter()
            .find(|c| !headers.iter().any(|h| h == **c))
        {
            return Err(Error::unreadable(format!("missing column {:?}", missing)));
        }

        let mut records = reader
            .deserialize::<EventRecord>()
            .enumerate()
            .map(|(i, row)| row.map_err(|e| Error::unreadable(format!("row {}: {}", i + 1, e))))
            .collect::<Result<Vec<_>>>()?;

        let mut enricher = PriceEnricher::new(self.generator.model());
        let enriched = enricher.enrich_batch(&mut records);

        let events = records
            .into_iter()
            .enumerate()
            .map(|(i, record)| {
                record
                    .into_event()
                    .map_err(|e| Error::unreadable(format!("row {}: {}", i + 1, e)))
            })
            .collect::<Result<Vec<_>>>()?;

        let m = metrics();
        m.datasets_loaded.inc();
        m.events_loaded.inc_by(events.len() as u64);
        m.events_enriched.inc_by(enriched as u64);
        m.load_latency_ms
            .observe(started.elapsed().as_millis() as u64);

        info!(
            path = %self.path().display(),
            rows = events.len(),
            enriched,
            "Loaded dataset"
        );

        Ok(events)
    }

    /// Writes events to the configured path, replacing any existing file.
    ///
    /// Rows go to a sibling temp file first and are renamed into place; the
    /// temp file is removed if either step fails.
    pub fn save(&self, events: &[SearchEvent]) -> Result<()> {
        let path = self.path();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let tmp = temp_path(path);
        let written =
            write_csv(&tmp, events).and_then(|()| fs::rename(&tmp, path).map_err(Error::from));
        if let Err(e) = written {
            if let Err(cleanup) = fs::remove_file(&tmp) {
                debug!(path = %tmp.display(), error = %cleanup, "Temp file not removed");
            }
            return Err(e);
        }

        debug!(path = %path.display(), rows = events.len(), "Persisted dataset");
        Ok(())
    }
}

fn temp_path(path: &Path) -> PathBuf {
    let mut name = path.file_name().unwrap_or_default().to_os_string();
    name.push(".tmp");
    path.with_file_name(name)
}

fn write_csv(path: &Path, events: &[SearchEvent]) -> Result<()> {
    // Header written by hand so an empty dataset still gets one.
    let mut writer = csv::WriterBuilder::new()
        .has_headers(false)
        .from_path(path)
        .map_err(|e| Error::persist(format!("create {}: {}", path.display(), e)))?;

    writer
        .write_record(COLUMNS)
        .map_err(|e| Error::persist(e.to_string()))?;
    for event in events {
        writer
            .serialize(EventRecord::from(event))
            .map_err(|e| Error::persist(e.to_string()))?;
    }
    writer.flush()?;
    Ok(())
}
