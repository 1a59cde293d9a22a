use once_cell::sync::Lazy;
use recon::config;
use std::env;
use std::path::PathBuf;
use std::sync::Mutex;

// Tests below mutate process-wide environment variables.
static ENV_LOCK: Lazy<Mutex<()>> = Lazy::new(|| Mutex::new(()));

#[test]
fn test_parse_phrase_list_trims_and_skips_blanks() {
    assert_eq!(
        config::parse_phrase_list(" Page | System date || Department "),
        vec!["Page", "System date", "Department"]
    );
}

#[test]
fn test_parse_phrase_list_only_separators() {
    assert!(config::parse_phrase_list(" | | ").is_empty());
}

#[test]
fn test_default_discard_phrases() {
    let phrases = config::default_discard_phrases();
    assert_eq!(phrases.len(), 7);
    assert!(phrases.contains(&"Users Group Access Report".to_string()));
    assert!(phrases.contains(&"*".to_string()));
}

#[test]
fn test_get_discard_phrases_override() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("RUGAR_DISCARD_PHRASES", "CONFIDENTIAL|Page");

    assert_eq!(config::get_discard_phrases(), vec!["CONFIDENTIAL", "Page"]);

    env::remove_var("RUGAR_DISCARD_PHRASES");
}

#[test]
fn test_get_discard_phrases_blank_uses_default() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("RUGAR_DISCARD_PHRASES", "   ");

    assert_eq!(config::get_discard_phrases(), config::default_discard_phrases());

    env::remove_var("RUGAR_DISCARD_PHRASES");
}

#[test]
fn test_get_report_dir_default_and_override() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::remove_var("RUGAR_REPORT_DIR");
    assert_eq!(config::get_report_dir(), PathBuf::from(config::DEFAULT_REPORT_DIR));

    env::set_var("RUGAR_REPORT_DIR", "  /srv/reports  ");
    assert_eq!(config::get_report_dir(), PathBuf::from("/srv/reports"));

    env::remove_var("RUGAR_REPORT_DIR");
}

#[test]
fn test_get_report_date_blank_is_none() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    env::set_var("RUGAR_REPORT_DATE", " ");
    assert_eq!(config::get_report_date(), None);

    env::set_var("RUGAR_REPORT_DATE", "20241030");
    assert_eq!(config::get_report_date(), Some("20241030".to_string()));

    env::remove_var("RUGAR_REPORT_DATE");
}

#[test]
fn test_settings_from_env_uses_defaults() {
    let _guard = ENV_LOCK.lock().unwrap_or_else(|e| e.into_inner());
    for key in ["RUGAR_REPORT_DIR", "RUGAR_REPORT_DATE", "RBAC_JSON_DIR", "RUGAR_DISCARD_PHRASES"] {
        env::remove_var(key);
    }

    let settings = config::Settings::from_env();
    assert_eq!(settings.report_dir, PathBuf::from("."));
    assert_eq!(settings.rbac_dir, PathBuf::from("./files/json"));
    assert_eq!(settings.report_date, None);
    assert_eq!(settings.discard_phrases, config::default_discard_phrases());
}
