//! Trailers service

use validator::Validate;

use super::fleet::{today, unit_channel};
use crate::{
    error::AppResult,
    models::{
        document::DocumentWithStatus,
        enums::EntityKind,
        maintenance::MaintenanceQuery,
        trailer::{CreateTrailer, Trailer, TrailerDetail, TrailerSummary, UpdateTrailer},
        vehicle::normalize_plate,
    },
    repository::Repository,
    status::maintenance::remaining_km,
};

#[derive(Clone)]
pub struct TrailersService {
    repository: Repository,
}

impl TrailersService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, include_inactive: bool) -> AppResult<Vec<Trailer>> {
        self.repository.trailers.list(include_inactive).await
    }

    /// Trailer with maintenance history, documents and towing vehicle
    pub async fn get_detail(&self, id: i32) -> AppResult<TrailerDetail> {
        let repo = &self.repository;
        let today = today();

        let trailer = repo.trailers.get_by_id(id).await?;
        let maintenance = repo
            .maintenance
            .list(&MaintenanceQuery {
                vehicle_id: None,
                trailer_id: Some(id),
            })
            .await?;
        let documents = repo.documents.for_entity(EntityKind::Trailer, id).await?;
        let vehicle = match repo.assignments.active_for_trailer(id).await? {
            Some(assignment) => Some(repo.vehicles.get_by_id(assignment.vehicle_id).await?),
            None => None,
        };

        let status = unit_channel(Some(trailer.accumulated_km), maintenance.first(), &documents, today);

        Ok(TrailerDetail {
            trailer,
            maintenance,
            documents: documents
                .into_iter()
                .map(|d| DocumentWithStatus::new(d, today))
                .collect(),
            vehicle,
            status,
        })
    }

    pub async fn create(&self, data: &CreateTrailer) -> AppResult<Trailer> {
        data.validate()?;
        let plate = normalize_plate(&data.plate)?;
        let trailer = self.repository.trailers.create(&plate, data).await?;
        tracing::info!("Trailer {} registered ({})", trailer.id, trailer.plate);
        Ok(trailer)
    }

    pub async fn update(&self, id: i32, data: &UpdateTrailer) -> AppResult<Trailer> {
        data.validate()?;
        self.repository.trailers.update(id, data).await
    }

    /// Compact data for a dashboard card
    pub async fn summary(&self, id: i32) -> AppResult<TrailerSummary> {
        let repo = &self.repository;
        let trailer = repo.trailers.get_by_id(id).await?;
        let latest = repo.maintenance.latest_for_trailers(&[id]).await?;
        let expired_documents = repo
            .documents
            .count_expired(EntityKind::Trailer, id, today())
            .await?;

        let next_due_km = latest.first().and_then(|m| m.next_due_km);
        Ok(TrailerSummary {
            km_remaining: remaining_km(Some(trailer.accumulated_km), next_due_km),
            id: trailer.id,
            plate: trailer.plate,
            operational_state: trailer.operational_state,
            accumulated_km: trailer.accumulated_km,
            next_due_km,
            expired_documents,
        })
    }
}

