//! Maintenance records (append-only)

use validator::Validate;

use super::fleet::today;
use crate::{
    error::{AppError, AppResult},
    models::maintenance::{CreateMaintenance, MaintenanceQuery, MaintenanceRecord},
    repository::{maintenance::NewMaintenance, Repository},
};

/// Mileage at which the next service is due after a service at `service_km`
pub fn due_after(service_km: i32, interval_km: i32) -> AppResult<i32> {
    service_km.checked_add(interval_km).ok_or_else(|| {
        AppError::Validation(format!(
            "Mileage {} km plus interval {} km is out of range",
            service_km, interval_km
        ))
    })
}

/// Due mileage of a new record: the given value, or service mileage plus the
/// vehicle's interval when only the service mileage is known
pub fn next_due_km(
    service_km: Option<i32>,
    next_due_km: Option<i32>,
    interval_km: Option<i32>,
) -> AppResult<Option<i32>> {
    match (service_km, next_due_km) {
        (Some(service), Some(due)) if due <= service => Err(AppError::Validation(format!(
            "Next due mileage ({} km) must be greater than service mileage ({} km)",
            due, service
        ))),
        (_, Some(due)) => Ok(Some(due)),
        (Some(service), None) => interval_km.map(|interval| due_after(service, interval)).transpose(),
        (None, None) => Ok(None),
    }
}

#[derive(Clone)]
pub struct MaintenanceService {
    repository: Repository,
}

impl MaintenanceService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &MaintenanceQuery) -> AppResult<Vec<MaintenanceRecord>> {
        self.repository.maintenance.list(query).await
    }

    /// Append a record for exactly one vehicle or trailer
    pub async fn create(&self, data: &CreateMaintenance) -> AppResult<MaintenanceRecord> {
        data.validate()?;
        let repo = &self.repository;

        let interval_km = match (data.vehicle_id, data.trailer_id) {
            (Some(vehicle_id), None) => {
                Some(repo.vehicles.get_by_id(vehicle_id).await?.maintenance_interval_km)
            }
            (None, Some(trailer_id)) => {
                repo.trailers.get_by_id(trailer_id).await?;
                None
            }
            _ => {
                return Err(AppError::Validation(
                    "Exactly one of vehicle_id and trailer_id is required".to_string(),
                ));
            }
        };

        let next_due_km = next_due_km(data.service_km, data.next_due_km, interval_km)?;

        let mut tx = repo.begin().await?;
        let record = repo
            .maintenance
            .insert(
                &mut tx,
                &NewMaintenance {
                    vehicle_id: data.vehicle_id,
                    trailer_id: data.trailer_id,
                    workshop: data.workshop,
                    service_date: data.service_date.unwrap_or_else(today),
                    service_km: data.service_km,
                    next_due_km,
                    notes: data.notes.as_deref(),
                },
            )
            .await?;
        tx.commit().await?;

        tracing::info!(
            "Maintenance {} recorded (vehicle {:?}, trailer {:?}, next due {:?} km)",
            record.id,
            record.vehicle_id,
            record.trailer_id,
            record.next_due_km
        );
        Ok(record)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_next_due_from_interval() {
        assert_eq!(next_due_km(Some(100_000), None, Some(25_000)).unwrap(), Some(125_000));
        assert_eq!(next_due_km(Some(100_000), None, None).unwrap(), None);
        assert_eq!(next_due_km(None, None, Some(25_000)).unwrap(), None);
    }

    #[test]
    fn test_explicit_next_due_wins() {
        assert_eq!(next_due_km(Some(100_000), Some(110_000), Some(25_000)).unwrap(), Some(110_000));
        assert_eq!(next_due_km(None, Some(40_000), None).unwrap(), Some(40_000));
    }

    #[test]
    fn test_next_due_out_of_range_rejected() {
        let result = next_due_km(Some(i32::MAX - 10), None, Some(25_000));
        assert!(matches!(result, Err(AppError::Validation(_))));
        assert!(due_after(i32::MAX, 1).is_err());
        assert_eq!(due_after(i32::MAX - 1, 1).unwrap(), i32::MAX);
    }

    #[test]
    fn test_next_due_before_service_rejected() {
        assert!(next_due_km(Some(100_000), Some(100_000), None).is_err());
        assert!(next_due_km(Some(100_000), Some(90_000), None).is_err());
    }
}
