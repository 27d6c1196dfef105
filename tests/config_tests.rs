use std::io::Write;
use std::path::PathBuf;

use paper_fold::cli::Cli;
use paper_fold::config::AppConfig;
use paper_fold::scenes::PaperLayout;

fn write_temp(name: &str, contents: &str) -> PathBuf {
    let path = std::env::temp_dir().join(format!("paper-fold-{}-{}.json", name, std::process::id()));
    let mut file = std::fs::File::create(&path).unwrap();
    file.write_all(contents.as_bytes()).unwrap();
    path
}

#[test]
fn test_load_without_path_uses_defaults() {
    let config = AppConfig::load(None).unwrap();
    assert_eq!(config, AppConfig::default());
    assert_eq!(config.fold.length, 6.8);
    assert_eq!(config.camera.min_distance, 10.0);
    assert_eq!(config.paper.layout, PaperLayout::DualMesh);
}

#[test]
fn test_load_reads_sections_from_file() {
    let path = write_temp(
        "sections",
        r#"{
            "fold": { "fold_period_ms": 4000.0 },
            "paper": { "layout": "double_sided", "outline": false },
            "assets_dir": "models"
        }"#,
    );

    let config = AppConfig::load(Some(&path)).unwrap();
    assert_eq!(config.fold.fold_period_ms, 4000.0);
    assert_eq!(config.fold.twist_period_ms, 3000.0);
    assert_eq!(config.paper.layout, PaperLayout::DoubleSided);
    assert!(!config.paper.outline);
    assert_eq!(config.assets_dir, PathBuf::from("models"));

    std::fs::remove_file(path).ok();
}

#[test]
fn test_invalid_values_are_rejected() {
    let path = write_temp("invalid", r#"{ "fold": { "length": -1.0 } }"#);
    let err = AppConfig::load(Some(&path)).unwrap_err();
    assert!(format!("{:#}", err).contains("fold.length"));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_malformed_json_reports_the_file() {
    let path = write_temp("malformed", "{ not json");
    let err = AppConfig::load(Some(&path)).unwrap_err();
    assert!(format!("{:#}", err).contains("Invalid config file"));
    std::fs::remove_file(path).ok();
}

#[test]
fn test_missing_file_is_an_error() {
    let missing = PathBuf::from("definitely/not/here.json");
    assert!(AppConfig::load(Some(&missing)).is_err());
}

#[test]
fn test_camera_range_must_be_ordered() {
    let mut config = AppConfig::default();
    config.camera.min_distance = 30.0;
    assert!(config.validate().is_err());
}

#[test]
fn test_cli_assets_override() {
    let cli = Cli {
        assets: Some(PathBuf::from("elsewhere")),
        ..Cli::default()
    };
    let config = AppConfig::default().with_overrides(&cli).unwrap();
    assert_eq!(config.assets_dir, PathBuf::from("elsewhere"));
    assert!(config.show_ui);
}
