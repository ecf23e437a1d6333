//! Loading seed datasets into a repository.

use log::info;
use serde::Serialize;
use std::path::Path;

use crate::db::checksum::calculate_checksum;
use crate::db::repository::{ErrorContext, FullRepository, RepositoryError, RepositoryResult};
use crate::io::parse_challenge_json_str;

/// Outcome of a dataset load.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct IngestSummary {
    pub restaurants: usize,
    pub deals: usize,
    pub checksum: String,
    /// The checksum was already recorded and nothing was written.
    pub already_loaded: bool,
}

/// Store every restaurant and deal from a challenge-format JSON document.
///
/// Loading is idempotent per content: a document whose checksum was recorded
/// before is skipped. Parse failures abort before anything is written.
pub async fn load_dataset<R>(repo: &R, name: &str, json: &str) -> RepositoryResult<IngestSummary>
where
    R: FullRepository + ?Sized,
{
    let checksum = calculate_checksum(json);
    if repo.has_dataset(&checksum).await? {
        info!("Dataset '{}' already loaded (checksum {})", name, checksum);
        return Ok(IngestSummary {
            restaurants: 0,
            deals: 0,
            checksum,
            already_loaded: true,
        });
    }

    let parsed = parse_challenge_json_str(json).map_err(|e| {
        RepositoryError::validation_with_context(
            format!("{:#}", e),
            ErrorContext::new("load_dataset")
                .with_entity("dataset")
                .with_entity_id(name),
        )
    })?;

    let mut deal_count = 0;
    for entry in &parsed {
        repo.store_restaurant(&entry.restaurant).await?;
        for deal in &entry.deals {
            repo.store_deal(deal).await?;
            deal_count += 1;
        }
    }
    repo.record_dataset(name, &checksum).await?;

    info!(
        "Loaded dataset '{}': {} restaurants, {} deals",
        name,
        parsed.len(),
        deal_count
    );
    Ok(IngestSummary {
        restaurants: parsed.len(),
        deals: deal_count,
        checksum,
        already_loaded: false,
    })
}

/// Read `path` and load it with [`load_dataset`], using the file name as the
/// dataset name.
pub async fn load_dataset_file<R>(repo: &R, path: &Path) -> RepositoryResult<IngestSummary>
where
    R: FullRepository + ?Sized,
{
    let json = tokio::fs::read_to_string(path).await.map_err(|e| {
        RepositoryError::configuration(format!(
            "Failed to read dataset {}: {}",
            path.display(),
            e
        ))
    })?;
    let name = path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string());

    load_dataset(repo, &name, &json).await
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::repositories::LocalRepository;

    const DATA: &str = r#"{"restaurants": [
        {"objectId": "R1", "name": "Kekou", "open": "11:00am", "close": "9:00pm",
         "deals": [{"objectId": "D1", "discount": "20", "qtyLeft": "3"}]}
    ]}"#;

    #[tokio::test]
    async fn test_load_then_reload_is_noop() {
        let repo = LocalRepository::new();
        let first = load_dataset(&repo, "seed", DATA).await.unwrap();
        assert_eq!((first.restaurants, first.deals), (1, 1));
        assert!(!first.already_loaded);

        let second = load_dataset(&repo, "seed", DATA).await.unwrap();
        assert!(second.already_loaded);
        assert_eq!(second.checksum, first.checksum);
        assert_eq!(repo.deal_count(), 1);
    }

    #[tokio::test]
    async fn test_parse_error_writes_nothing() {
        let repo = LocalRepository::new();
        let err = load_dataset(&repo, "bad", r#"{"restaurants": [{"objectId": "R1"}]}"#)
            .await
            .unwrap_err();
        assert!(matches!(err, RepositoryError::ValidationError { .. }));
        assert_eq!(repo.restaurant_count(), 0);
    }
}
