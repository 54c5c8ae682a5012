//! Tractor/trailer assignments
//!
//! A tractor holds at most one active assignment and a trailer is towed by at
//! most one tractor at a time. Activation locks both rows, checks the active
//! assignments touching either of them and writes in the same transaction.
//! Partial unique indexes enforce the same rule in the database.

use crate::{
    error::{unique_violation, AppError, AppResult},
    models::assignment::{Assignment, AssignmentQuery, CreateAssignment},
    repository::{
        assignments::{ACTIVE_TRAILER_INDEX, ACTIVE_VEHICLE_INDEX},
        Repository,
    },
};

/// Check that `vehicle_id` and `trailer_id` are free, ignoring the assignment
/// being re-activated (`candidate_id`).
pub fn check_exclusivity(
    candidate_id: Option<i32>,
    vehicle_id: i32,
    trailer_id: i32,
    active: &[Assignment],
) -> AppResult<()> {
    for other in active.iter().filter(|a| a.active && Some(a.id) != candidate_id) {
        if other.vehicle_id == vehicle_id {
            return Err(AppError::AssignmentConflict(format!(
                "Vehicle {} already has an active assignment (#{})",
                vehicle_id, other.id
            )));
        }
        if other.trailer_id == trailer_id {
            return Err(AppError::AssignmentConflict(format!(
                "Trailer {} is already assigned to vehicle {} (#{})",
                trailer_id, other.vehicle_id, other.id
            )));
        }
    }
    Ok(())
}

/// Map a unique violation on the active-assignment indexes to a conflict
fn map_write_error(e: sqlx::Error) -> AppError {
    match unique_violation(&e).as_deref() {
        Some(ACTIVE_VEHICLE_INDEX) => {
            AppError::AssignmentConflict("Vehicle already has an active assignment".to_string())
        }
        Some(ACTIVE_TRAILER_INDEX) => {
            AppError::AssignmentConflict("Trailer is already assigned to another vehicle".to_string())
        }
        _ => e.into(),
    }
}

#[derive(Clone)]
pub struct AssignmentsService {
    repository: Repository,
}

impl AssignmentsService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, query: &AssignmentQuery) -> AppResult<Vec<Assignment>> {
        self.repository.assignments.list(query).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Assignment> {
        self.repository.assignments.get_by_id(id).await
    }

    /// Create an assignment, active unless asked otherwise
    pub async fn create(&self, data: &CreateAssignment) -> AppResult<Assignment> {
        let repo = &self.repository;
        let active = data.active.unwrap_or(true);

        let mut tx = repo.begin().await?;
        repo.vehicles.lock(&mut tx, data.vehicle_id).await?;
        repo.trailers.lock(&mut tx, data.trailer_id).await?;

        if active {
            let current = repo
                .assignments
                .active_involving(&mut tx, data.vehicle_id, data.trailer_id)
                .await?;
            check_exclusivity(None, data.vehicle_id, data.trailer_id, &current)?;
        }

        let assignment = repo
            .assignments
            .insert(&mut tx, data.vehicle_id, data.trailer_id, active, data.notes.as_deref())
            .await
            .map_err(map_write_error)?;
        tx.commit().await?;

        tracing::info!(
            "Assignment {} created: vehicle {} / trailer {} (active: {})",
            assignment.id,
            assignment.vehicle_id,
            assignment.trailer_id,
            assignment.active
        );
        Ok(assignment)
    }

    /// Re-activate an inactive assignment
    pub async fn activate(&self, id: i32) -> AppResult<Assignment> {
        let repo = &self.repository;
        let mut tx = repo.begin().await?;

        let assignment = repo.assignments.lock(&mut tx, id).await?;
        if assignment.active {
            return Ok(assignment);
        }

        repo.vehicles.lock(&mut tx, assignment.vehicle_id).await?;
        repo.trailers.lock(&mut tx, assignment.trailer_id).await?;
        let current = repo
            .assignments
            .active_involving(&mut tx, assignment.vehicle_id, assignment.trailer_id)
            .await?;
        check_exclusivity(Some(id), assignment.vehicle_id, assignment.trailer_id, &current)?;

        let assignment = repo
            .assignments
            .activate(&mut tx, id)
            .await
            .map_err(map_write_error)?;
        tx.commit().await?;

        tracing::info!("Assignment {} activated", id);
        Ok(assignment)
    }

    /// Close an assignment
    pub async fn deactivate(&self, id: i32) -> AppResult<Assignment> {
        let assignment = self.repository.assignments.deactivate(id).await?;
        tracing::info!("Assignment {} deactivated", id);
        Ok(assignment)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;

    fn assignment(id: i32, vehicle_id: i32, trailer_id: i32, active: bool) -> Assignment {
        Assignment {
            id,
            vehicle_id,
            trailer_id,
            active,
            started_at: Utc::now(),
            ended_at: None,
            notes: None,
        }
    }

    #[test]
    fn test_free_units_pass() {
        assert!(check_exclusivity(None, 1, 10, &[]).is_ok());
        let others = vec![assignment(1, 2, 20, true), assignment(2, 1, 10, false)];
        assert!(check_exclusivity(None, 1, 10, &others).is_ok());
    }

    #[test]
    fn test_vehicle_with_active_assignment_is_rejected() {
        let current = vec![assignment(1, 1, 10, true)];
        let err = check_exclusivity(None, 1, 11, &current).unwrap_err();
        assert!(matches!(err, AppError::AssignmentConflict(_)));
    }

    #[test]
    fn test_trailer_towed_by_other_vehicle_is_rejected() {
        let current = vec![assignment(1, 1, 10, true)];
        let err = check_exclusivity(None, 2, 10, &current).unwrap_err();
        match err {
            AppError::AssignmentConflict(msg) => assert!(msg.contains("vehicle 1")),
            other => panic!("unexpected error: {:?}", other),
        }
    }

    #[test]
    fn test_reactivating_itself_is_allowed() {
        let current = vec![assignment(5, 1, 10, true)];
        assert!(check_exclusivity(Some(5), 1, 10, &current).is_ok());
        assert!(check_exclusivity(Some(6), 1, 10, &current).is_err());
    }
}
