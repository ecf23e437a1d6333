//! Tests for db::factory - repository selection and creation.

mod support;

use std::str::FromStr;
use deals_backend::db::factory::{RepositoryFactory, RepositoryType};
use deals_backend::db::{RepositoryConfig, RepositoryError, RestaurantRepository};

#[test]
fn test_repository_type_from_str_postgres() {
    assert_eq!(RepositoryType::from_str("postgres").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str("POSTGRES").unwrap(), RepositoryType::Postgres);
    assert_eq!(RepositoryType::from_str("pg").unwrap(), RepositoryType::Postgres);
}

#[test]
fn test_repository_type_from_str_invalid() {
    let result = RepositoryType::from_str("invalid");
    assert!(result.unwrap_err().contains("Unknown repository type"));
}

#[test]
fn test_repository_type_from_env_default() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", None),
            ("PG_DATABASE_URL", None),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[test]
fn test_repository_type_from_env_with_database_url() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", None),
            ("DATABASE_URL", Some("postgres://localhost/test")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Postgres),
    );
}

#[test]
fn test_repository_type_from_env_explicit_wins() {
    support::with_scoped_env(
        &[
            ("REPOSITORY_TYPE", Some("local")),
            ("DATABASE_URL", Some("postgres://localhost/test")),
        ],
        || assert_eq!(RepositoryType::from_env(), RepositoryType::Local),
    );
}

#[tokio::test]
async fn test_create_local_from_config_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("deals.toml");
    std::fs::write(&path, "[repository]\ntype = \"local\"\n").unwrap();

    let repo = RepositoryFactory::from_config_file(&path).await.unwrap();
    assert!(repo.health_check().await.unwrap());
}

#[tokio::test]
async fn test_missing_config_file_is_configuration_error() {
    let dir = tempfile::tempdir().unwrap();
    let result = RepositoryFactory::from_config_file(dir.path().join("absent.toml")).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}

#[tokio::test]
async fn test_invalid_repository_type_in_config() {
    let config: RepositoryConfig = toml::from_str("[repository]\ntype = \"redis\"\n").unwrap();
    let result = RepositoryFactory::from_repository_config(&config).await;
    assert!(matches!(
        result,
        Err(RepositoryError::ConfigurationError { .. })
    ));
}
