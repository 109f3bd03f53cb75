//! Location lifecycle: add, read, replace and soft-delete.

use sqlx::SqlitePool;

use crate::error::{is_unique_violation, Error, Result};
use crate::models::{Location, LocationStatus, LocationUpdate};
use crate::store::{self, locations};

// ---

/// Sole path by which locations are created, mutated or hidden.
#[derive(Debug, Clone)]
pub struct LocationService {
    pool: SqlitePool,
}

impl LocationService {
    // ---
    pub fn new(pool: SqlitePool) -> Self {
        LocationService { pool }
    }

    /// Store a new location as `Active` and return it as stored.
    ///
    /// Fails with [`Error::DuplicateResource`] if any row already uses the
    /// code, including a trashed one. The primary key catches inserts that
    /// race past the existence check and reports them the same way.
    pub async fn add_location(&self, candidate: Location) -> Result<Location> {
        // ---
        if candidate.code.trim().is_empty() {
            return Err(Error::Invalid("location code must not be empty".to_string()));
        }

        let mut tx = store::begin_write(&self.pool).await?;

        if locations::exists(&mut *tx, &candidate.code).await? {
            return Err(Error::DuplicateResource(candidate.code));
        }

        let candidate = Location {
            status: LocationStatus::Active,
            ..candidate
        };
        let stored = locations::insert(&mut *tx, &candidate)
            .await
            .map_err(|e| duplicate_or_storage(e, &candidate.code))?;

        tx.commit()
            .await
            .map_err(|e| duplicate_or_storage(e, &candidate.code))?;

        Ok(stored)
    }

    /// All active locations, in no particular order. Empty is not an error.
    pub async fn get_locations(&self) -> Result<Vec<Location>> {
        // ---
        Ok(locations::find_all_visible(&self.pool).await?)
    }

    /// Fails with [`Error::LocationNotFound`] when the code is unknown or
    /// the location is trashed.
    pub async fn get_location_by_code(&self, code: &str) -> Result<Location> {
        // ---
        locations::find_visible_by_code(&self.pool, code)
            .await?
            .ok_or_else(|| Error::LocationNotFound(code.to_string()))
    }

    /// Replace every non-key field of an active location.
    ///
    /// The stored row mirrors `new_values` exactly: an absent region clears
    /// the stored one. Only `enabled: None` keeps the current flag. The code
    /// itself is never changed. Unknown or trashed codes fail with
    /// [`Error::LocationNotFound`] and leave the store untouched.
    pub async fn update_location_by_code(&self, new_values: LocationUpdate) -> Result<Location> {
        // ---
        let mut tx = store::begin_write(&self.pool).await?;

        let Some(current) = locations::find_visible_by_code(&mut *tx, &new_values.code).await?
        else {
            return Err(Error::LocationNotFound(new_values.code));
        };

        let replacement = Location {
            code: current.code,
            city_name: new_values.city_name,
            region_name: new_values.region_name,
            country_name: new_values.country_name,
            country_code: new_values.country_code,
            enabled: new_values.enabled.unwrap_or(current.enabled),
            status: LocationStatus::Active,
        };
        let stored = locations::save(&mut *tx, &replacement).await?;

        tx.commit().await?;
        Ok(stored)
    }

    /// Soft-delete a location. The row and its readings stay in storage.
    ///
    /// Unknown codes fail with [`Error::LocationNotFound`]. A code that is
    /// already trashed fails the same way, so a repeated delete is reported
    /// rather than silently accepted.
    pub async fn delete_location_by_code(&self, code: &str) -> Result<()> {
        // ---
        let mut tx = store::begin_write(&self.pool).await?;

        if !locations::exists(&mut *tx, code).await? {
            return Err(Error::LocationNotFound(code.to_string()));
        }

        if !locations::soft_delete(&mut *tx, code).await? {
            return Err(Error::LocationNotFound(code.to_string()));
        }

        tx.commit().await?;
        Ok(())
    }
}

/// Translate a primary key rejection into the same failure the existence
/// check produces.
fn duplicate_or_storage(err: sqlx::Error, code: &str) -> Error {
    // ---
    if is_unique_violation(&err) {
        Error::DuplicateResource(code.to_string())
    } else {
        Error::Storage(err)
    }
}

#[cfg(test)]
mod tests {
    // ---
    use super::*;
    use crate::store::connect_in_memory;
    use tokio_test::{assert_err, assert_ok};

    async fn create_test_service() -> LocationService {
        // ---
        LocationService::new(connect_in_memory().await.unwrap())
    }

    fn create_test_location(code: &str) -> Location {
        // ---
        Location {
            code: code.to_string(),
            city_name: "Los Angeles".to_string(),
            region_name: None,
            country_name: "United States Of America".to_string(),
            country_code: "US".to_string(),
            enabled: true,
            status: LocationStatus::Active,
        }
    }

    #[tokio::test]
    async fn test_add_then_get_returns_same_values() {
        // ---
        let service = create_test_service().await;
        let location = create_test_location("LACA_US");

        let stored = service.add_location(location.clone()).await.unwrap();
        assert_eq!(stored, location);

        let fetched = service.get_location_by_code("LACA_US").await.unwrap();
        assert_eq!(fetched, location);
    }

    #[tokio::test]
    async fn test_add_forces_active_status() {
        // ---
        let service = create_test_service().await;
        let mut location = create_test_location("LACA_US");
        location.status = LocationStatus::Trashed;

        let stored = service.add_location(location).await.unwrap();
        assert_eq!(stored.status, LocationStatus::Active);
    }

    #[tokio::test]
    async fn test_add_rejects_empty_code() {
        // ---
        let service = create_test_service().await;

        let err = service
            .add_location(create_test_location("  "))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::Invalid(_)));
    }

    #[tokio::test]
    async fn test_add_duplicate_active_or_trashed() {
        // ---
        let service = create_test_service().await;
        assert_ok!(service.add_location(create_test_location("LACA_US")).await);

        let err = service
            .add_location(create_test_location("LACA_US"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateResource(code) if code == "LACA_US"));

        assert_ok!(service.delete_location_by_code("LACA_US").await);
        let err = service
            .add_location(create_test_location("LACA_US"))
            .await
            .unwrap_err();
        assert!(matches!(err, Error::DuplicateResource(_)));
    }

    async fn create_file_backed_service(dir: &tempfile::TempDir) -> LocationService {
        // ---
        let db_url = format!("sqlite://{}", dir.path().join("weather.db").display());
        LocationService::new(store::connect(&db_url, 8).await.unwrap())
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_adds_report_duplicate() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let service = create_file_backed_service(&dir).await;

        for round in 0..20 {
            let code = format!("RACE_{round}");
            let handles: Vec<_> = (0..4)
                .map(|_| {
                    let service = service.clone();
                    let location = create_test_location(&code);
                    tokio::spawn(async move { service.add_location(location).await })
                })
                .collect();

            let mut added = 0;
            for handle in handles {
                match handle.await.unwrap() {
                    Ok(_) => added += 1,
                    Err(Error::DuplicateResource(dup)) => assert_eq!(dup, code),
                    Err(e) => panic!("unexpected failure in round {round}: {e}"),
                }
            }
            assert_eq!(added, 1, "round {round}");
        }

        assert_eq!(service.get_locations().await.unwrap().len(), 20);
    }

    #[tokio::test(flavor = "multi_thread", worker_threads = 4)]
    async fn test_racing_deletes_trash_once() {
        // ---
        let dir = tempfile::tempdir().unwrap();
        let service = create_file_backed_service(&dir).await;
        service
            .add_location(create_test_location("NYC_US"))
            .await
            .unwrap();

        let handles: Vec<_> = (0..4)
            .map(|_| {
                let service = service.clone();
                tokio::spawn(async move { service.delete_location_by_code("NYC_US").await })
            })
            .collect();

        let mut deleted = 0;
        for handle in handles {
            match handle.await.unwrap() {
                Ok(()) => deleted += 1,
                Err(Error::LocationNotFound(_)) => {}
                Err(e) => panic!("unexpected failure: {e}"),
            }
        }
        assert_eq!(deleted, 1);
        assert!(service.get_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_unique_violation_maps_to_duplicate() {
        // ---
        let pool = connect_in_memory().await.unwrap();
        let location = create_test_location("LACA_US");
        locations::insert(&pool, &location).await.unwrap();

        let raw = locations::insert(&pool, &location).await.unwrap_err();
        assert!(matches!(
            duplicate_or_storage(raw, "LACA_US"),
            Error::DuplicateResource(_)
        ));

        let other = duplicate_or_storage(sqlx::Error::RowNotFound, "LACA_US");
        assert!(matches!(other, Error::Storage(_)));
    }

    #[tokio::test]
    async fn test_get_locations_empty_is_ok() {
        // ---
        let service = create_test_service().await;
        assert!(service.get_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_update_replaces_fields_wholesale() {
        // ---
        let service = create_test_service().await;
        let mut original = create_test_location("LACA_US");
        original.region_name = Some("California".to_string());
        service.add_location(original).await.unwrap();

        let update = LocationUpdate {
            code: "LACA_US".to_string(),
            city_name: "Santa Monica".to_string(),
            region_name: None,
            country_name: "United States".to_string(),
            country_code: "US".to_string(),
            enabled: Some(false),
        };
        let stored = service.update_location_by_code(update).await.unwrap();

        assert_eq!(stored.code, "LACA_US");
        assert_eq!(stored.city_name, "Santa Monica");
        assert_eq!(stored.region_name, None);
        assert_eq!(stored.country_name, "United States");
        assert!(!stored.enabled);
        assert_eq!(service.get_location_by_code("LACA_US").await.unwrap(), stored);
    }

    #[tokio::test]
    async fn test_update_without_enabled_keeps_flag() {
        // ---
        let service = create_test_service().await;
        let mut original = create_test_location("LACA_US");
        original.enabled = false;
        service.add_location(original.clone()).await.unwrap();

        let mut update = LocationUpdate::from(original);
        update.city_name = "Pasadena".to_string();
        update.enabled = None;
        let stored = service.update_location_by_code(update).await.unwrap();

        assert!(!stored.enabled);
        assert_eq!(stored.city_name, "Pasadena");
    }

    #[tokio::test]
    async fn test_update_unknown_code_leaves_store_unchanged() {
        // ---
        let service = create_test_service().await;
        service
            .add_location(create_test_location("LACA_US"))
            .await
            .unwrap();

        let update = LocationUpdate::from(create_test_location("NYC_US"));
        let err = service.update_location_by_code(update).await.unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(code) if code == "NYC_US"));

        let all = service.get_locations().await.unwrap();
        assert_eq!(all, vec![create_test_location("LACA_US")]);
    }

    #[tokio::test]
    async fn test_update_trashed_code_is_not_found() {
        // ---
        let service = create_test_service().await;
        service
            .add_location(create_test_location("LACA_US"))
            .await
            .unwrap();
        service.delete_location_by_code("LACA_US").await.unwrap();

        let update = LocationUpdate::from(create_test_location("LACA_US"));
        let err = service.update_location_by_code(update).await.unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(_)));
        assert!(service.get_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_hides_location() {
        // ---
        let service = create_test_service().await;
        service
            .add_location(create_test_location("LACA_US"))
            .await
            .unwrap();

        assert_ok!(service.delete_location_by_code("LACA_US").await);

        let err = service.get_location_by_code("LACA_US").await.unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(_)));
        assert!(service.get_locations().await.unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_delete_twice_or_unknown_is_not_found() {
        // ---
        let service = create_test_service().await;
        assert_err!(service.delete_location_by_code("LACA_US").await);

        service
            .add_location(create_test_location("LACA_US"))
            .await
            .unwrap();
        assert_ok!(service.delete_location_by_code("LACA_US").await);

        let err = service.delete_location_by_code("LACA_US").await.unwrap_err();
        assert!(matches!(err, Error::LocationNotFound(_)));
    }

    #[tokio::test]
    async fn test_los_angeles_lifecycle() {
        // ---
        let service = create_test_service().await;
        let los_angeles = create_test_location("LACA_US");

        assert_ok!(service.add_location(los_angeles.clone()).await);
        assert!(matches!(
            service.add_location(los_angeles.clone()).await,
            Err(Error::DuplicateResource(_))
        ));
        assert_eq!(service.get_locations().await.unwrap(), vec![los_angeles]);

        assert_ok!(service.delete_location_by_code("LACA_US").await);
        assert!(matches!(
            service.get_location_by_code("LACA_US").await,
            Err(Error::LocationNotFound(_))
        ));
        assert!(service.get_locations().await.unwrap().is_empty());
    }
}
