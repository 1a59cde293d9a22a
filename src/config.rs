use std::env;
use std::path::{Path, PathBuf};

// Default configuration constants
pub const DEFAULT_REPORT_DIR: &str = ".";
pub const DEFAULT_RBAC_DIR: &str = "./files/json";
pub const REPORT_FILE_PREFIX: &str = "R01RUGAR_";
pub const REPORT_FILE_EXTENSION: &str = "rpt";
pub const PHRASE_SEPARATOR: char = '|';

/// Boilerplate found on every RUGAR page. Any line containing one of these is dropped.
pub const DEFAULT_DISCARD_PHRASES: &[&str] = &[
    "*",
    "Users Group Access Report",
    "System date",
    "Branch processing date",
    "Alternate Oper ID",
    "Department",
    "Transaction Authority",
];

/// Everything the CLI needs to locate its inputs.
#[derive(Clone, Debug)]
pub struct Settings {
    pub report_dir: PathBuf,
    pub report_date: Option<String>,
    pub rbac_dir: PathBuf,
    pub discard_phrases: Vec<String>,
}

impl Settings {
    pub fn from_env() -> Self {
        Self {
            report_dir: get_report_dir(),
            report_date: get_report_date(),
            rbac_dir: get_rbac_dir(),
            discard_phrases: get_discard_phrases(),
        }
    }
}

pub fn load_env_file(env_file: Option<&str>) {
    if let Some(path) = env_file {
        dotenvy::from_path(Path::new(path)).ok();
    } else {
        dotenvy::dotenv().ok();
    }
}

pub fn get_report_dir() -> PathBuf {
    dir_from_env("RUGAR_REPORT_DIR", DEFAULT_REPORT_DIR)
}

pub fn get_rbac_dir() -> PathBuf {
    dir_from_env("RBAC_JSON_DIR", DEFAULT_RBAC_DIR)
}

pub fn get_report_date() -> Option<String> {
    env::var("RUGAR_REPORT_DATE")
        .ok()
        .map(|d| d.trim().to_string())
        .filter(|d| !d.is_empty())
}

pub fn get_discard_phrases() -> Vec<String> {
    match env::var("RUGAR_DISCARD_PHRASES") {
        Ok(raw) if !raw.trim().is_empty() => parse_phrase_list(&raw),
        _ => default_discard_phrases(),
    }
}

pub fn default_discard_phrases() -> Vec<String> {
    DEFAULT_DISCARD_PHRASES.iter().map(|p| p.to_string()).collect()
}

/// Split a `|`-separated override list. Blank entries are ignored because an
/// empty phrase would match (and discard) every line.
pub fn parse_phrase_list(raw: &str) -> Vec<String> {
    raw.split(PHRASE_SEPARATOR)
        .map(str::trim)
        .filter(|p| !p.is_empty())
        .map(str::to_string)
        .collect()
}

fn dir_from_env(key: &str, default: &str) -> PathBuf {
    let raw = env::var(key).unwrap_or_default();
    let trimmed = raw.trim();
    if trimmed.is_empty() {
        PathBuf::from(default)
    } else {
        PathBuf::from(trimmed)
    }
}
