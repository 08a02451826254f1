// Configuration loading and parsing (draft.toml).

use chrono::Datelike;
use mockdraft_core::engine::classify::NarrativeCategory;
use mockdraft_core::narrative::TemplateTable;
use serde::Deserialize;
use std::collections::HashMap;
use std::ops::RangeInclusive;
use std::path::{Path, PathBuf};
use thiserror::Error;

/// Allowed pause between automated picks, in milliseconds.
pub const PACING_RANGE_MS: RangeInclusive<u64> = 100..=2000;

// ---------------------------------------------------------------------------
// Error types
// ---------------------------------------------------------------------------

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("config file not found: {path}")]
    FileNotFound { path: PathBuf },

    #[error("failed to parse config file {path}: {source}")]
    ParseError {
        path: PathBuf,
        source: toml::de::Error,
    },

    #[error("validation error for field `{field}`: {message}")]
    ValidationError { field: String, message: String },

    #[error("failed to initialize config from defaults: {message}")]
    DefaultsCopyError { message: String },
}

// ---------------------------------------------------------------------------
// Top-level assembled Config
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct Config {
    pub draft: DraftConfig,
    pub data_paths: DataPaths,
    pub pool: PoolConfig,
    pub consensus: ConsensusConfig,
    pub pacing: PacingConfig,
    pub db_path: String,
    /// Template overrides keyed by narrative category.
    pub narrative: HashMap<NarrativeCategory, Vec<String>>,
}

impl Config {
    /// Built-in templates with this config's overrides applied.
    pub fn templates(&self) -> TemplateTable {
        let mut table = TemplateTable::builtin();
        for (category, templates) in &self.narrative {
            table.set(*category, templates.clone());
        }
        table
    }
}

/// The resolved `[draft]` section.
#[derive(Debug, Clone)]
pub struct DraftConfig {
    pub year: i32,
    pub quota_year: i32,
    pub seed: Option<u64>,
    pub user_manager: Option<String>,
}

// ---------------------------------------------------------------------------
// draft.toml structs
// ---------------------------------------------------------------------------

/// Raw deserialization target for the entire draft.toml file.
#[derive(Debug, Clone, Deserialize)]
struct DraftFile {
    #[serde(default)]
    draft: DraftSection,
    data_paths: DataPaths,
    #[serde(default)]
    pool: PoolConfig,
    #[serde(default)]
    consensus: ConsensusConfig,
    #[serde(default)]
    pacing: PacingConfig,
    database: DatabaseSection,
    #[serde(default)]
    narrative: HashMap<String, Vec<String>>,
}

#[derive(Debug, Clone, Default, Deserialize)]
struct DraftSection {
    year: Option<i32>,
    quota_year: Option<i32>,
    seed: Option<u64>,
    user_manager: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
struct DatabaseSection {
    path: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DataPaths {
    pub draft_order: String,
    pub adp: String,
    pub freshman: String,
    pub profiles: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct PoolConfig {
    /// RTC players from an upside college later than this ADP become Upside.
    #[serde(default = "default_upside_min_adp")]
    pub upside_min_adp: f64,
    #[serde(default)]
    pub upside_colleges: Vec<String>,
}

impl Default for PoolConfig {
    fn default() -> Self {
        PoolConfig {
            upside_min_adp: default_upside_min_adp(),
            upside_colleges: Vec::new(),
        }
    }
}

fn default_upside_min_adp() -> f64 {
    45.0
}

#[derive(Debug, Clone, Deserialize)]
pub struct ConsensusConfig {
    /// Freshmen whose picks always read as elite.
    #[serde(default)]
    pub elite: Vec<String>,
    /// Consensus top prospects, best first.
    #[serde(default)]
    pub top_order: Vec<String>,
    #[serde(default = "default_opening_picks")]
    pub opening_picks: usize,
}

impl Default for ConsensusConfig {
    fn default() -> Self {
        ConsensusConfig {
            elite: Vec::new(),
            top_order: Vec::new(),
            opening_picks: default_opening_picks(),
        }
    }
}

fn default_opening_picks() -> usize {
    3
}

#[derive(Debug, Clone, Deserialize)]
pub struct PacingConfig {
    #[serde(default = "default_delay_ms")]
    pub delay_ms: u64,
}

impl Default for PacingConfig {
    fn default() -> Self {
        PacingConfig {
            delay_ms: default_delay_ms(),
        }
    }
}

fn default_delay_ms() -> u64 {
    500
}

// ---------------------------------------------------------------------------
// Loading logic
// ---------------------------------------------------------------------------

/// Load and validate configuration from `config/draft.toml` relative to
/// `base_dir`. Does not copy defaults; see [`load_config`].
pub fn load_config_from(base_dir: &Path) -> Result<Config, ConfigError> {
    let path = base_dir.join("config").join("draft.toml");
    let text = read_file(&path)?;
    parse_config(&text, &path)
}

/// Parse and validate config text. `path` is only used in errors.
pub fn parse_config(text: &str, path: &Path) -> Result<Config, ConfigError> {
    let file: DraftFile = toml::from_str(text).map_err(|e| ConfigError::ParseError {
        path: path.to_path_buf(),
        source: e,
    })?;

    let year = file
        .draft
        .year
        .unwrap_or_else(|| chrono::Local::now().year());
    let draft = DraftConfig {
        year,
        quota_year: file.draft.quota_year.unwrap_or_else(|| year.saturating_sub(1)),
        seed: file.draft.seed,
        user_manager: file.draft.user_manager.filter(|m| !m.trim().is_empty()),
    };

    let mut narrative = HashMap::new();
    for (key, templates) in file.narrative {
        let category =
            NarrativeCategory::from_key(&key).ok_or_else(|| ConfigError::ValidationError {
                field: format!("narrative.{key}"),
                message: "unknown narrative category".into(),
            })?;
        narrative.insert(category, templates);
    }

    let config = Config {
        draft,
        data_paths: file.data_paths,
        pool: file.pool,
        consensus: file.consensus,
        pacing: file.pacing,
        db_path: file.database.path,
        narrative,
    };

    validate(&config)?;

    Ok(config)
}

/// Ensure all config files exist by copying missing ones from `defaults/`.
/// Returns the list of files that were copied. Skips `.example` files.
pub fn ensure_config_files(base_dir: &Path) -> Result<Vec<PathBuf>, ConfigError> {
    let defaults_dir = base_dir.join("defaults");
    let config_dir = base_dir.join("config");

    if !defaults_dir.exists() {
        if !config_dir.exists() {
            return Err(ConfigError::DefaultsCopyError {
                message: format!(
                    "neither defaults/ nor config/ directory found in {}; \
                     run from the project root or ensure defaults/ is present",
                    base_dir.display()
                ),
            });
        }
        return Ok(vec![]);
    }

    std::fs::create_dir_all(&config_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to create config directory: {e}"),
    })?;

    let mut copied = Vec::new();

    let entries = std::fs::read_dir(&defaults_dir).map_err(|e| ConfigError::DefaultsCopyError {
        message: format!("failed to read defaults directory: {e}"),
    })?;

    for entry in entries {
        let entry = entry.map_err(|e| ConfigError::DefaultsCopyError {
            message: format!("failed to read defaults entry: {e}"),
        })?;
        let path = entry.path();

        if !path.is_file() {
            continue;
        }
        let Some(file_name) = path.file_name() else {
            continue;
        };
        if file_name.to_str().is_some_and(|n| n.ends_with(".example")) {
            continue;
        }
        let target = config_dir.join(file_name);

        match std::fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(&target)
        {
            Ok(mut dest) => {
                let content = std::fs::read(&path).map_err(|e| ConfigError::DefaultsCopyError {
                    message: format!("failed to read {}: {e}", path.display()),
                })?;
                std::io::Write::write_all(&mut dest, &content).map_err(|e| {
                    ConfigError::DefaultsCopyError {
                        message: format!("failed to write {}: {e}", target.display()),
                    }
                })?;
                copied.push(target);
            }
            Err(e) if e.kind() == std::io::ErrorKind::AlreadyExists => {}
            Err(e) => {
                return Err(ConfigError::DefaultsCopyError {
                    message: format!("failed to create {}: {e}", target.display()),
                });
            }
        }
    }

    Ok(copied)
}

/// Load config relative to `base_dir`, copying defaults first.
pub fn load_config(base_dir: &Path) -> Result<Config, ConfigError> {
    ensure_config_files(base_dir)?;
    load_config_from(base_dir)
}

// ---------------------------------------------------------------------------
// Helpers
// ---------------------------------------------------------------------------

fn read_file(path: &Path) -> Result<String, ConfigError> {
    std::fs::read_to_string(path).map_err(|_| ConfigError::FileNotFound {
        path: path.to_path_buf(),
    })
}

// ---------------------------------------------------------------------------
// Validation
// ---------------------------------------------------------------------------

fn validate(config: &Config) -> Result<(), ConfigError> {
    if config.draft.year <= 0 {
        return Err(ConfigError::ValidationError {
            field: "draft.year".into(),
            message: format!("must be a positive year, got {}", config.draft.year),
        });
    }

    if !PACING_RANGE_MS.contains(&config.pacing.delay_ms) {
        return Err(ConfigError::ValidationError {
            field: "pacing.delay_ms".into(),
            message: format!(
                "must be between {} and {} inclusive, got {}",
                PACING_RANGE_MS.start(),
                PACING_RANGE_MS.end(),
                config.pacing.delay_ms
            ),
        });
    }

    if config.pool.upside_min_adp.is_nan() || config.pool.upside_min_adp < 0.0 {
        return Err(ConfigError::ValidationError {
            field: "pool.upside_min_adp".into(),
            message: format!("must be >= 0, got {}", config.pool.upside_min_adp),
        });
    }

    let paths: &[(&str, &str)] = &[
        ("data_paths.draft_order", &config.data_paths.draft_order),
        ("data_paths.adp", &config.data_paths.adp),
        ("data_paths.freshman", &config.data_paths.freshman),
        ("data_paths.profiles", &config.data_paths.profiles),
        ("database.path", &config.db_path),
    ];
    for (name, val) in paths {
        if val.trim().is_empty() {
            return Err(ConfigError::ValidationError {
                field: name.to_string(),
                message: "must not be empty".into(),
            });
        }
    }

    for (category, templates) in &config.narrative {
        if templates.iter().any(|t| t.trim().is_empty()) {
            return Err(ConfigError::ValidationError {
                field: format!("narrative.{}", category.key()),
                message: "templates must not be empty strings".into(),
            });
        }
    }

    Ok(())
}

// ---------------------------------------------------------------------------
// Unit tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use mockdraft_core::narrative::TemplateSource;
    use std::fs;

    const MINIMAL: &str = r#"
[data_paths]
draft_order = "data/draft_order.csv"
adp = "data/adp.csv"
freshman = "data/freshman.csv"
profiles = "data/profiles.json"

[database]
path = "mockdraft.db"
"#;

    fn parse(text: &str) -> Result<Config, ConfigError> {
        parse_config(text, Path::new("draft.toml"))
    }

    fn crate_root() -> PathBuf {
        PathBuf::from(env!("CARGO_MANIFEST_DIR"))
    }

    #[test]
    fn load_shipped_defaults() {
        let text = fs::read_to_string(crate_root().join("defaults/draft.toml")).unwrap();
        let config = parse(&text).expect("defaults should be valid");
        assert_eq!(config.draft.year, 2025);
        assert_eq!(config.draft.quota_year, 2024);
        assert_eq!(config.pacing.delay_ms, 500);
        assert_eq!(config.consensus.opening_picks, 3);
        assert!(!config.pool.upside_colleges.is_empty());
        assert_eq!(config.db_path, "mockdraft.db");
    }

    #[test]
    fn minimal_config_uses_defaults() {
        let config = parse(MINIMAL).unwrap();
        assert_eq!(config.draft.quota_year, config.draft.year - 1);
        assert_eq!(config.draft.seed, None);
        assert_eq!(config.draft.user_manager, None);
        assert!((config.pool.upside_min_adp - 45.0).abs() < f64::EPSILON);
        assert_eq!(config.consensus.opening_picks, 3);
        assert_eq!(config.pacing.delay_ms, 500);
        assert!(config.narrative.is_empty());
    }

    #[test]
    fn explicit_quota_year_wins() {
        let text = format!("[draft]\nyear = 2030\nquota_year = 2027\nseed = 7\n{MINIMAL}");
        let config = parse(&text).unwrap();
        assert_eq!(config.draft.year, 2030);
        assert_eq!(config.draft.quota_year, 2027);
        assert_eq!(config.draft.seed, Some(7));
    }

    #[test]
    fn minimum_year_is_rejected_not_wrapped() {
        let text = format!("[draft]\nyear = -2147483648\n{MINIMAL}");
        match parse(&text).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "draft.year"),
            other => panic!("expected ValidationError, got: {other:?}"),
        }
    }

    #[test]
    fn blank_user_manager_is_none() {
        let text = format!("[draft]\nuser_manager = \"  \"\n{MINIMAL}");
        assert_eq!(parse(&text).unwrap().draft.user_manager, None);
    }

    #[test]
    fn rejects_pacing_out_of_range() {
        for delay in [50, 2500] {
            let text = format!("{MINIMAL}\n[pacing]\ndelay_ms = {delay}\n");
            match parse(&text).unwrap_err() {
                ConfigError::ValidationError { field, .. } => assert_eq!(field, "pacing.delay_ms"),
                other => panic!("expected ValidationError, got: {other}"),
            }
        }
    }

    #[test]
    fn rejects_unknown_narrative_category() {
        let text = format!("{MINIMAL}\n[narrative]\nheroic = [\"{{manager}} wins\"]\n");
        match parse(&text).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "narrative.heroic"),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn narrative_overrides_replace_builtin() {
        let text = format!("{MINIMAL}\n[narrative]\nupside = [\"{{manager}} rolls the dice on {{player}}.\"]\n");
        let config = parse(&text).unwrap();
        let table = config.templates();
        assert_eq!(
            table.templates(NarrativeCategory::Upside),
            ["{manager} rolls the dice on {player}.".to_string()]
        );
        assert!(!table.templates(NarrativeCategory::Forced).is_empty());
    }

    #[test]
    fn rejects_empty_data_path() {
        let text = MINIMAL.replace("data/adp.csv", "");
        match parse(&text).unwrap_err() {
            ConfigError::ValidationError { field, .. } => assert_eq!(field, "data_paths.adp"),
            other => panic!("expected ValidationError, got: {other}"),
        }
    }

    #[test]
    fn parse_error_for_invalid_toml() {
        assert!(matches!(
            parse("[draft\nyear = ").unwrap_err(),
            ConfigError::ParseError { .. }
        ));
    }

    #[test]
    fn file_not_found_for_missing_config() {
        let tmp = std::env::temp_dir().join("mockdraft_config_test_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("config")).unwrap();

        assert!(matches!(
            load_config_from(&tmp).unwrap_err(),
            ConfigError::FileNotFound { .. }
        ));

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_copies_then_skips() {
        let tmp = std::env::temp_dir().join("mockdraft_config_test_ensure");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(tmp.join("defaults")).unwrap();
        fs::write(tmp.join("defaults/draft.toml"), MINIMAL).unwrap();
        fs::write(tmp.join("defaults/draft.toml.example"), "ignored").unwrap();

        let copied = ensure_config_files(&tmp).unwrap();
        assert_eq!(copied, vec![tmp.join("config/draft.toml")]);
        assert!(!tmp.join("config/draft.toml.example").exists());

        fs::write(tmp.join("config/draft.toml"), format!("[draft]\nyear = 2031\n{MINIMAL}")).unwrap();
        assert!(ensure_config_files(&tmp).unwrap().is_empty());
        assert_eq!(load_config(&tmp).unwrap().draft.year, 2031);

        let _ = fs::remove_dir_all(&tmp);
    }

    #[test]
    fn ensure_config_files_errors_when_both_dirs_missing() {
        let tmp = std::env::temp_dir().join("mockdraft_config_test_both_missing");
        let _ = fs::remove_dir_all(&tmp);
        fs::create_dir_all(&tmp).unwrap();

        assert!(matches!(
            ensure_config_files(&tmp).unwrap_err(),
            ConfigError::DefaultsCopyError { .. }
        ));

        let _ = fs::remove_dir_all(&tmp);
    }
}
