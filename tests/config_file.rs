use ratoncito::config::Config;
use tempfile::tempdir;
use tokio_test::{assert_err, assert_ok};

#[tokio::test]
async fn default_config_round_trips_through_disk() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    let path = path.to_str().unwrap();

    assert_ok!(Config::create_default(path).await);
    let config = assert_ok!(Config::load(path).await);

    assert_eq!(config.api.base_url, "http://localhost:8000");
    assert_eq!(config.api.timeout_seconds, 10);
    assert_eq!(config.adventure.default_children_ages, vec![6, 8]);
    assert_eq!(config.log_level(), log::LevelFilter::Info);
}

#[tokio::test]
async fn partial_file_fills_defaults() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(
        &path,
        "[api]\nbase_url = \"https://ratoncito.example\"\n\n[logging]\nlevel = \"debug\"\n",
    )
    .unwrap();

    let config = assert_ok!(Config::load(path.to_str().unwrap()).await);
    assert_eq!(config.api.base_url, "https://ratoncito.example");
    assert!(config.api.enabled);
    assert_eq!(config.adventure.places_per_category, 2);
    assert_eq!(config.log_level(), log::LevelFilter::Debug);
}

#[tokio::test]
async fn api_section_without_base_url_keeps_the_rest_of_the_file() {
    let dir = tempdir().unwrap();
    let path = dir.path().join("config.toml");
    std::fs::write(&path, "[api]\nenabled = false\n").unwrap();

    let config = assert_ok!(Config::load(path.to_str().unwrap()).await);
    assert!(!config.api.enabled);
    assert_eq!(config.api.base_url, "http://localhost:8000");
}

#[tokio::test]
async fn missing_or_broken_files_are_errors() {
    let dir = tempdir().unwrap();
    let missing = dir.path().join("nope.toml");
    assert_err!(Config::load(missing.to_str().unwrap()).await);

    let broken = dir.path().join("broken.toml");
    std::fs::write(&broken, "[api\nbase_url = 3").unwrap();
    let err = assert_err!(Config::load(broken.to_str().unwrap()).await);
    assert!(err.to_string().contains("Failed to parse config file"));
}
