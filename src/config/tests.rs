use super::*;
use std::collections::HashMap;
use std::io::Write;
use std::sync::{Arc, Mutex};
use tempfile::{NamedTempFile, TempDir};

fn env_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
    let map: HashMap<String, String> = pairs
        .iter()
        .map(|(k, v)| (k.to_string(), v.to_string()))
        .collect();
    move |key| map.get(key).cloned()
}

#[test]
fn test_default_config() {
    let config = Config::default();
    assert_eq!(config.vector_db.collection_name, "codebase_functions");
    assert!(!config.vector_db.reset_on_index);
    assert_eq!(config.embedding.model_name, "all-MiniLM-L6-v2");
    assert_eq!(config.explainer.model, "gpt-3.5-turbo");
    assert_eq!(config.explainer.base_url, "https://api.openai.com/v1");
    assert!(config.explainer.api_key.is_none());
    assert_eq!(config.indexing.extension, "py");
    assert_eq!(config.search.query, "Your query here ...");
    assert_eq!(config.search.limit, 5);
}

#[test]
fn test_validate_valid_config() {
    assert!(Config::default().validate().is_ok());
}

#[test]
fn test_validate_empty_collection_name() {
    let mut config = Config::default();
    config.vector_db.collection_name = "  ".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("vector_db.collection_name"));
}

#[test]
fn test_validate_zero_limit() {
    let mut config = Config::default();
    config.search.limit = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_bad_base_url() {
    let mut config = Config::default();
    config.explainer.base_url = "api.openai.com".to_string();
    let err = config.validate().unwrap_err();
    assert!(err.to_string().contains("explainer.base_url"));
}

#[test]
fn test_validate_zero_timeout() {
    let mut config = Config::default();
    config.explainer.timeout_secs = 0;
    assert!(config.validate().is_err());
}

#[test]
fn test_validate_extension_only_dot() {
    let mut config = Config::default();
    config.indexing.extension = ".".to_string();
    assert!(config.validate().is_err());
}

#[test]
fn test_save_and_load() {
    let temp_file = NamedTempFile::new().unwrap();
    let path = temp_file.path();

    let mut config = Config::default();
    config.search.limit = 8;
    config.indexing.extension = "rs".to_string();
    config.explainer.max_tokens = Some(256);

    config.save(path).unwrap();
    let loaded = Config::from_file(path).unwrap();

    assert_eq!(loaded.search.limit, 8);
    assert_eq!(loaded.indexing.extension, "rs");
    assert_eq!(loaded.explainer.max_tokens, Some(256));
}

#[test]
fn test_save_creates_parent_directory() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("nested").join("config.toml");

    Config::default().save(&path).unwrap();
    assert!(path.exists());
}

#[test]
fn test_partial_file_uses_defaults() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[search]\nquery = \"vector math\"\n\n[explainer]\nmodel = \"gpt-4o-mini\"\n",
    )
    .unwrap();

    let config = Config::from_file(&path).unwrap();
    assert_eq!(config.search.query, "vector math");
    assert_eq!(config.search.limit, 5);
    assert_eq!(config.explainer.model, "gpt-4o-mini");
    assert_eq!(config.vector_db.collection_name, "codebase_functions");
}

#[test]
fn test_load_nonexistent_file() {
    let result = Config::from_file(Path::new("/nonexistent/config.toml"));
    assert!(matches!(
        result,
        Err(FuncSearchError::Config(ConfigError::FileNotFound(_)))
    ));
}

#[test]
fn test_load_invalid_toml() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "this is not [valid toml").unwrap();

    let result = Config::from_file(temp_file.path());
    assert!(matches!(
        result,
        Err(FuncSearchError::Config(ConfigError::ParseFailed(_)))
    ));
}

#[test]
fn test_load_rejects_invalid_values() {
    let temp_file = NamedTempFile::new().unwrap();
    std::fs::write(temp_file.path(), "[search]\nlimit = 0\n").unwrap();

    let result = Config::from_file(temp_file.path());
    assert!(matches!(
        result,
        Err(FuncSearchError::Config(ConfigError::InvalidValue { .. }))
    ));
}

#[test]
fn test_api_key_not_serialized_when_absent() {
    let serialized = toml::to_string_pretty(&Config::default()).unwrap();
    assert!(!serialized.contains("api_key"));
}

#[test]
fn test_overrides_applied() {
    let mut config = Config::default();
    config.apply_overrides_from(env_from(&[
        ("FUNCSEARCH_LANCEDB_PATH", "/tmp/fs-db"),
        ("FUNCSEARCH_COLLECTION", "other_functions"),
        ("FUNCSEARCH_LLM_BASE_URL", "http://localhost:8080/v1"),
        ("FUNCSEARCH_LLM_MODEL", "local-model"),
        ("OPENAI_API_KEY", "sk-test"),
        ("FUNCSEARCH_PROJECT_PATH", "/src/project"),
        ("FUNCSEARCH_EXTENSION", "go"),
        ("FUNCSEARCH_LIMIT", "12"),
    ]));

    assert_eq!(config.vector_db.lancedb_path, PathBuf::from("/tmp/fs-db"));
    assert_eq!(config.vector_db.collection_name, "other_functions");
    assert_eq!(config.explainer.base_url, "http://localhost:8080/v1");
    assert_eq!(config.explainer.model, "local-model");
    assert_eq!(config.explainer.api_key.as_deref(), Some("sk-test"));
    assert_eq!(config.indexing.project_path, PathBuf::from("/src/project"));
    assert_eq!(config.indexing.extension, "go");
    assert_eq!(config.search.limit, 12);
}

#[test]
fn test_overrides_ignore_unparseable_limit_and_empty_key() {
    let mut config = Config::default();
    config.explainer.api_key = Some("from-file".to_string());
    config.apply_overrides_from(env_from(&[
        ("FUNCSEARCH_LIMIT", "many"),
        ("OPENAI_API_KEY", ""),
    ]));

    assert_eq!(config.search.limit, 5);
    assert_eq!(config.explainer.api_key.as_deref(), Some("from-file"));
}

// Collects formatted log output so tests can assert on warnings
#[derive(Clone, Default)]
struct CapturedLogs(Arc<Mutex<Vec<u8>>>);

impl Write for CapturedLogs {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

impl CapturedLogs {
    fn contents(&self) -> String {
        String::from_utf8_lossy(&self.0.lock().unwrap()).to_string()
    }
}

#[test]
fn test_unparseable_limit_logs_warning() {
    let logs = CapturedLogs::default();
    let writer = logs.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_ansi(false)
        .with_max_level(tracing::Level::WARN)
        .finish();

    let mut config = Config::default();
    tracing::subscriber::with_default(subscriber, || {
        config.apply_overrides_from(env_from(&[("FUNCSEARCH_LIMIT", "1O")]));
    });

    assert_eq!(config.search.limit, 5);
    let output = logs.contents();
    assert!(output.contains("WARN"));
    assert!(output.contains("FUNCSEARCH_LIMIT=\"1O\""));
}

#[test]
fn test_limit_override_tolerates_whitespace() {
    let mut config = Config::default();
    config.apply_overrides_from(env_from(&[("FUNCSEARCH_LIMIT", " 7 ")]));
    assert_eq!(config.search.limit, 7);
}

#[test]
fn test_no_overrides_keeps_defaults() {
    let mut config = Config::default();
    config.apply_overrides_from(|_| None);
    assert_eq!(config.search.limit, 5);
    assert_eq!(config.indexing.extension, "py");
}
