// ABOUTME: Unit tests for environment-driven configuration
// ABOUTME: Validates defaults, overrides, invalid values, and database setup from config
//
// SPDX-License-Identifier: MIT OR Apache-2.0
// Copyright (c) 2025 Pierre Fitness Intelligence

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
#![allow(missing_docs)]

use serial_test::serial;
use std::env;
use std::time::Duration;
use virtus_server::{
    config::{DatabaseConfig, DatabaseUrl, Environment, ServerConfig},
    database::Database,
    errors::ErrorCode,
    logging::{LogFormat, LoggingConfig},
};

const CONFIG_VARS: &[&str] = &[
    "HTTP_PORT",
    "ENVIRONMENT",
    "DATABASE_URL",
    "AUTO_MIGRATE",
    "DATABASE_MAX_CONNECTIONS",
    "DRAFT_TTL_HOURS",
    "DRAFT_DEBOUNCE_MS",
    "REQUEST_TIMEOUT_SECS",
    "CORS_ALLOWED_ORIGINS",
];

fn clear_config_vars() {
    for var in CONFIG_VARS {
        env::remove_var(var);
    }
}

#[test]
fn test_environment_parsing() {
    assert_eq!(
        Environment::from_str_or_default("production"),
        Environment::Production
    );
    assert_eq!(
        Environment::from_str_or_default("PROD"),
        Environment::Production
    );
    assert_eq!(Environment::from_str_or_default("test"), Environment::Testing);
    assert_eq!(
        Environment::from_str_or_default("staging"),
        Environment::Development
    );
    assert!(Environment::Production.is_production());
}

#[test]
fn test_database_url_parsing() {
    assert_eq!(DatabaseUrl::parse_url("sqlite::memory:").unwrap(), DatabaseUrl::Memory);
    assert!(DatabaseUrl::parse_url("sqlite::memory:").unwrap().is_memory());
    assert_eq!(
        DatabaseUrl::parse_url("sqlite:./data/virtus.db")
            .unwrap()
            .to_connection_string(),
        "sqlite:./data/virtus.db"
    );

    let err = DatabaseUrl::parse_url("postgres://localhost/virtus").unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
}

#[test]
#[serial]
fn test_defaults_without_environment() {
    clear_config_vars();

    let config = ServerConfig::from_env().unwrap();
    assert_eq!(config.http_port, 8081);
    assert_eq!(config.environment, Environment::Development);
    assert_eq!(config.drafts.ttl_hours, 24);
    assert_eq!(config.drafts.ttl_ms(), 24 * 60 * 60 * 1000);
    assert_eq!(config.drafts.debounce(), Duration::from_millis(500));
    assert_eq!(config.request_timeout(), Duration::from_secs(30));
    assert_eq!(config.cors_allowed_origins, "*");
    assert!(config.database.auto_migrate);
    assert!(config.summary().contains("HTTP Port: 8081"));
}

#[test]
#[serial]
fn test_environment_overrides() {
    clear_config_vars();
    env::set_var("HTTP_PORT", "9000");
    env::set_var("ENVIRONMENT", "production");
    env::set_var("DATABASE_URL", "sqlite::memory:");
    env::set_var("DRAFT_TTL_HOURS", "2");
    env::set_var("DRAFT_DEBOUNCE_MS", "250");
    env::set_var("REQUEST_TIMEOUT_SECS", "5");
    env::set_var("CORS_ALLOWED_ORIGINS", "https://app.virtus.fit");

    let config = ServerConfig::from_env().unwrap();
    clear_config_vars();

    assert_eq!(config.http_port, 9000);
    assert!(config.environment.is_production());
    assert_eq!(config.database.url, DatabaseUrl::Memory);
    assert_eq!(config.drafts.ttl_ms(), 2 * 60 * 60 * 1000);
    assert_eq!(config.drafts.debounce(), Duration::from_millis(250));
    assert_eq!(config.request_timeout(), Duration::from_secs(5));
    assert_eq!(config.cors_allowed_origins, "https://app.virtus.fit");
}

#[test]
#[serial]
fn test_invalid_values_are_rejected() {
    clear_config_vars();
    env::set_var("HTTP_PORT", "not-a-port");
    let err = ServerConfig::from_env().unwrap_err();
    assert_eq!(err.code, ErrorCode::ConfigError);
    assert!(err.message.contains("HTTP_PORT"));

    clear_config_vars();
    env::set_var("DRAFT_TTL_HOURS", "0");
    let err = ServerConfig::from_env().unwrap_err();
    assert!(err.message.contains("DRAFT_TTL_HOURS"));

    clear_config_vars();
    env::set_var("REQUEST_TIMEOUT_SECS", "0");
    assert!(ServerConfig::from_env().is_err());
    clear_config_vars();
}

#[test]
#[serial]
fn test_logging_config_from_env() {
    env::set_var("LOG_FORMAT", "json");
    env::set_var("SERVICE_NAME", "virtus-test");
    let config = LoggingConfig::from_env();
    env::remove_var("LOG_FORMAT");
    env::remove_var("SERVICE_NAME");

    assert_eq!(config.format, LogFormat::Json);
    assert_eq!(config.service_name, "virtus-test");
    assert_eq!(LogFormat::parse("compact"), LogFormat::Compact);
    assert_eq!(LogFormat::parse("fancy"), LogFormat::Pretty);
}

#[tokio::test]
async fn test_database_from_config_creates_parent_directory() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nested").join("virtus.db");
    let config = DatabaseConfig {
        url: DatabaseUrl::SQLite { path: path.clone() },
        auto_migrate: true,
        max_connections: 2,
    };

    let database = Database::from_config(&config).await.unwrap();
    database.ping().await.unwrap();
    assert!(path.exists());

    let templates = database.programs().list_for_coach("coach-1").await.unwrap();
    assert!(templates.is_empty());
}
