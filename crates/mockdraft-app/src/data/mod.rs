// Input data loading: player pool, draft order and manager profiles.
//
// Every required file must load before a draft starts. Individual malformed
// rows are skipped with a warning; a missing or unreadable file is an error.

pub mod normalize;
pub mod order;
pub mod pool;
pub mod profiles;

use std::path::{Path, PathBuf};

use mockdraft_core::draft::pick::Player;
use mockdraft_core::engine::classify::EliteSet;
use mockdraft_core::orchestrator::{DraftSession, DraftSettings, DraftSlot};
use mockdraft_core::profile::ProfileStore;
use mockdraft_core::narrative::TemplateTable;
use tracing::info;

use crate::config::Config;
use normalize::Normalizer;

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read file {path}: {source}")]
    Io {
        path: String,
        source: std::io::Error,
    },

    #[error("CSV error in {path}: {source}")]
    Csv { path: String, source: csv::Error },

    #[error("JSON error in {path}: {source}")]
    Json {
        path: String,
        source: serde_json::Error,
    },

    #[error("validation error: {0}")]
    Validation(String),
}

// ---------------------------------------------------------------------------
// Loaded data
// ---------------------------------------------------------------------------

/// Everything read from disk for one draft.
#[derive(Debug, Clone)]
pub struct DraftData {
    pub pool: Vec<Player>,
    pub profiles: ProfileStore,
    pub order: Vec<DraftSlot>,
}

/// Load the pool, draft order and profiles named in `config`. Relative paths
/// resolve against `base_dir`.
pub fn load_all(config: &Config, base_dir: &Path, normalizer: &Normalizer) -> Result<DraftData, LoadError> {
    let paths = &config.data_paths;

    let adp_path = resolve(base_dir, &paths.adp);
    let adp_rows = pool::load_adp_from_reader(read_text(&adp_path)?.as_bytes(), normalizer)
        .map_err(|e| csv_error(&adp_path, e))?;

    let freshman_path = resolve(base_dir, &paths.freshman);
    let freshman_rows =
        pool::load_freshman_from_reader(read_text(&freshman_path)?.as_bytes(), normalizer)
            .map_err(|e| csv_error(&freshman_path, e))?;

    let pool = pool::build_pool(freshman_rows, adp_rows, &config.pool);
    if pool.is_empty() {
        return Err(LoadError::Validation("player pool is empty".into()));
    }

    let order_path = resolve(base_dir, &paths.draft_order);
    let order = order::load_order_from_reader(read_text(&order_path)?.as_bytes(), normalizer)
        .map_err(|e| match e {
            order::OrderError::Csv(source) => csv_error(&order_path, source),
            order::OrderError::Row { row, message } => LoadError::Validation(format!(
                "{} row {row}: {message}",
                order_path.display()
            )),
        })?;
    if order.is_empty() {
        return Err(LoadError::Validation("draft order is empty".into()));
    }

    let profiles_path = resolve(base_dir, &paths.profiles);
    let profiles = profiles::load_profiles_from_str(&read_text(&profiles_path)?, normalizer)
        .map_err(|source| LoadError::Json {
            path: profiles_path.display().to_string(),
            source,
        })?;

    info!(
        "Loaded {} players, {} draft slots, {} manager profiles",
        pool.len(),
        order.len(),
        profiles.len()
    );

    Ok(DraftData {
        pool,
        profiles,
        order,
    })
}

/// Run settings from config, with consensus names normalized to pool ids.
pub fn draft_settings(config: &Config, normalizer: &Normalizer) -> DraftSettings {
    DraftSettings {
        year: config.draft.year,
        quota_year: config.draft.quota_year,
        elite: EliteSet::new(
            config
                .consensus
                .elite
                .iter()
                .chain(&config.consensus.top_order)
                .map(|n| normalizer.name(n)),
        ),
        consensus_top: config
            .consensus
            .top_order
            .iter()
            .map(|n| normalizer.name(n))
            .collect(),
        opening_picks: config.consensus.opening_picks,
    }
}

/// Assemble a ready-to-run session.
pub fn build_session(config: &Config, data: DraftData, normalizer: &Normalizer) -> DraftSession<TemplateTable> {
    DraftSession::new(
        data.pool,
        data.profiles,
        data.order,
        draft_settings(config, normalizer),
        config.templates(),
    )
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn resolve(base_dir: &Path, path: &str) -> PathBuf {
    let p = Path::new(path);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

fn csv_error(path: &Path, source: csv::Error) -> LoadError {
    LoadError::Csv {
        path: path.display().to_string(),
        source,
    }
}

/// Read a text file, falling back to Latin-1 when it is not valid UTF-8.
/// Recruiting exports are often Latin-1.
pub(crate) fn read_text(path: &Path) -> Result<String, LoadError> {
    let bytes = std::fs::read(path).map_err(|source| LoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    Ok(decode_text(bytes))
}

fn decode_text(bytes: Vec<u8>) -> String {
    match String::from_utf8(bytes) {
        Ok(text) => text.trim_start_matches('\u{feff}').to_string(),
        Err(e) => e.into_bytes().into_iter().map(char::from).collect(),
    }
}

/// Lenient numeric cell: blank, "nan" or unparseable → `None`. Accepts a
/// decimal comma.
pub(crate) fn parse_number(cell: Option<&str>) -> Option<f64> {
    let cell = cell?.trim();
    if cell.is_empty() {
        return None;
    }
    cell.replace(',', ".")
        .parse::<f64>()
        .ok()
        .filter(|v| v.is_finite())
}

/// `;`-separated reader used by every CSV input.
pub(crate) fn csv_reader<R: std::io::Read>(rdr: R) -> csv::Reader<R> {
    csv::ReaderBuilder::new()
        .delimiter(b';')
        .trim(csv::Trim::All)
        .flexible(true)
        .from_reader(rdr)
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------
