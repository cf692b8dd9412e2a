use std::io::Write;
use std::time::Duration;

use clap::Parser;
use produce_analyzer::cli::config::{
    AppConfig, Cli, Commands, DEFAULT_CONFIG_FILE, load_config, resolve_base_url,
};
use produce_analyzer::client::backend::DEFAULT_BASE_URL;
use produce_analyzer::workflow::workflow_model::WorkflowConfig;

// ============================================================================
// CLI Argument Parsing Tests
// ============================================================================

#[test]
fn cli_parse_analyze_file() {
    let cli = Cli::parse_from(["produce-analyzer", "analyze", "--file", "apple.jpg"]);
    match cli.command {
        Commands::Analyze {
            source,
            format,
            trace,
        } => {
            assert_eq!(source.file.as_deref(), Some("apple.jpg"));
            assert!(source.url.is_none());
            assert_eq!(format, "console");
            assert!(trace.is_none());
        }
        _ => panic!("Expected Analyze command"),
    }
    assert_eq!(cli.verbose, 0);
    assert!(cli.base_url.is_none());
}

#[test]
fn cli_parse_analyze_url_all_args() {
    let cli = Cli::parse_from([
        "produce-analyzer",
        "-vv",
        "analyze",
        "--url",
        "https://example.com/apple.png",
        "--format",
        "json",
        "--trace",
        "run.jsonl",
        "--base-url",
        "http://analysis:9000",
        "--config",
        "custom.yaml",
    ]);
    match cli.command {
        Commands::Analyze {
            source,
            format,
            trace,
        } => {
            assert_eq!(source.url.as_deref(), Some("https://example.com/apple.png"));
            assert!(source.file.is_none());
            assert_eq!(format, "json");
            assert_eq!(trace.as_deref(), Some("run.jsonl"));
        }
        _ => panic!("Expected Analyze command"),
    }
    assert_eq!(cli.verbose, 2);
    assert_eq!(cli.base_url.as_deref(), Some("http://analysis:9000"));
    assert_eq!(cli.config.as_deref(), Some("custom.yaml"));
}

#[test]
fn cli_analyze_requires_exactly_one_source() {
    assert!(Cli::try_parse_from(["produce-analyzer", "analyze"]).is_err());
    assert!(
        Cli::try_parse_from([
            "produce-analyzer",
            "analyze",
            "--file",
            "apple.jpg",
            "--url",
            "https://example.com/apple.jpg",
        ])
        .is_err()
    );
}

#[test]
fn cli_parse_price() {
    let cli = Cli::parse_from(["produce-analyzer", "price", "--name", "green apple"]);
    match cli.command {
        Commands::Price { name } => assert_eq!(name, "green apple"),
        _ => panic!("Expected Price command"),
    }
}

#[test]
fn cli_unknown_subcommand_fails() {
    assert!(Cli::try_parse_from(["produce-analyzer", "explore"]).is_err());
}

// ============================================================================
// Config File Tests
// ============================================================================

#[test]
fn config_default_values() {
    let config = AppConfig::default();
    assert!(config.service.base_url.is_none());
    assert!(config.service.enrich_prices);
    assert_eq!(config.workflow.min_visible_ms, 1500);
    assert_eq!(config.workflow.tick_ms, 200);
    assert_eq!(config.workflow.to_workflow_config(), WorkflowConfig::default());
}

#[test]
fn config_missing_file_returns_defaults() {
    let config = load_config(Some("/nonexistent/produce-analyzer.yaml"));
    assert!(config.service.base_url.is_none());
    assert_eq!(config.workflow.min_visible_ms, 1500);
    assert_eq!(DEFAULT_CONFIG_FILE, "produce-analyzer.yaml");
}

#[test]
fn config_parses_yaml_with_partial_sections() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(
        file,
        "service:\n  base_url: http://analysis.local:8000/\n  enrich_prices: false\nworkflow:\n  tick_ms: 50"
    )
    .unwrap();

    let config = load_config(file.path().to_str());
    assert_eq!(
        config.service.base_url.as_deref(),
        Some("http://analysis.local:8000/")
    );
    assert!(!config.service.enrich_prices);
    assert_eq!(config.workflow.tick_ms, 50);
    assert_eq!(config.workflow.min_visible_ms, 1500);

    let workflow = config.workflow.to_workflow_config();
    assert_eq!(workflow.progress.tick_interval, Duration::from_millis(50));
}

#[test]
fn config_malformed_yaml_returns_defaults() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "service: [this is: not valid").unwrap();

    let config = load_config(file.path().to_str());
    assert!(config.service.enrich_prices);
    assert!(config.service.base_url.is_none());
}

#[test]
fn config_zero_tick_is_clamped() {
    let mut config = AppConfig::default();
    config.workflow.tick_ms = 0;
    let workflow = config.workflow.to_workflow_config();
    assert_eq!(workflow.progress.tick_interval, Duration::from_millis(1));
}

// ============================================================================
// Base URL Resolution Tests
// ============================================================================

#[test]
fn base_url_falls_back_to_default() {
    assert_eq!(
        resolve_base_url(None, &AppConfig::default(), None),
        DEFAULT_BASE_URL
    );
}

#[test]
fn base_url_precedence() {
    let mut config = AppConfig::default();
    config.service.base_url = Some("http://from-config:8000".into());

    assert_eq!(
        resolve_base_url(Some("http://from-cli:8000"), &config, Some("http://from-env")),
        "http://from-cli:8000"
    );
    assert_eq!(
        resolve_base_url(None, &config, Some("http://from-env")),
        "http://from-config:8000"
    );
    assert_eq!(
        resolve_base_url(None, &AppConfig::default(), Some("http://from-env:1234")),
        "http://from-env:1234"
    );
}

#[test]
fn base_url_is_trimmed() {
    assert_eq!(
        resolve_base_url(Some("  http://host:8000/ "), &AppConfig::default(), None),
        "http://host:8000"
    );
    assert_eq!(
        resolve_base_url(Some("   "), &AppConfig::default(), None),
        DEFAULT_BASE_URL
    );
}
