//! Fleet-wide status aggregation
//!
//! Each vehicle gets two independent channels: one for the tractor (its own
//! latest maintenance and documents) and one for the trailer currently
//! assigned to it.

use std::collections::HashMap;

use chrono::{Local, NaiveDate};
use rust_decimal::Decimal;

use crate::{
    error::AppResult,
    models::{
        assignment::Assignment,
        document::Document,
        enums::EntityKind,
        fleet::FleetStatusEntry,
        maintenance::MaintenanceRecord,
        trailer::Trailer,
    },
    repository::Repository,
    status::{classify_maintenance, ChannelStatus},
};

/// Source name used for maintenance reasons
pub const MAINTENANCE_SOURCE: &str = "Maintenance";

/// Date used for expiry checks
pub fn today() -> NaiveDate {
    Local::now().date_naive()
}

/// Channel for one unit from its mileage, latest maintenance record and documents
pub fn unit_channel(
    current_km: Option<Decimal>,
    latest: Option<&MaintenanceRecord>,
    documents: &[Document],
    today: NaiveDate,
) -> ChannelStatus {
    let mut channel = ChannelStatus::default();
    channel.record(MAINTENANCE_SOURCE, maintenance_assessment(current_km, latest));
    for doc in documents {
        channel.record(doc.category.as_str(), doc.assess(today));
    }
    channel
}

/// Maintenance-only channel, used by the vehicle list
pub fn maintenance_channel(current_km: Option<Decimal>, latest: Option<&MaintenanceRecord>) -> ChannelStatus {
    let mut channel = ChannelStatus::default();
    channel.record(MAINTENANCE_SOURCE, maintenance_assessment(current_km, latest));
    channel
}

fn maintenance_assessment(
    current_km: Option<Decimal>,
    latest: Option<&MaintenanceRecord>,
) -> crate::status::Assessment {
    classify_maintenance(current_km, latest.and_then(|m| m.next_due_km))
}

/// Group documents by owner id
pub fn documents_by_entity(documents: Vec<Document>) -> HashMap<i32, Vec<Document>> {
    let mut map: HashMap<i32, Vec<Document>> = HashMap::new();
    for doc in documents {
        map.entry(doc.entity_id).or_default().push(doc);
    }
    map
}

#[derive(Clone)]
pub struct FleetService {
    repository: Repository,
}

impl FleetService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Status of every active vehicle and its assigned trailer
    #[tracing::instrument(skip(self))]
    pub async fn dashboard(&self) -> AppResult<Vec<FleetStatusEntry>> {
        let repo = &self.repository;
        let today = today();

        let vehicles = repo.vehicles.list(false).await?;
        let vehicle_ids: Vec<i32> = vehicles.iter().map(|v| v.id).collect();

        let states: HashMap<i32, i32> = repo
            .vehicles
            .states_for(&vehicle_ids)
            .await?
            .into_iter()
            .map(|s| (s.state.vehicle_id, s.state.mileage_km))
            .collect();
        let vehicle_maintenance: HashMap<i32, MaintenanceRecord> = repo
            .maintenance
            .latest_for_vehicles(&vehicle_ids)
            .await?
            .into_iter()
            .filter_map(|m| m.vehicle_id.map(|id| (id, m)))
            .collect();
        let mut vehicle_documents =
            documents_by_entity(repo.documents.for_entities(EntityKind::Vehicle, &vehicle_ids).await?);

        let assignments: HashMap<i32, Assignment> = repo
            .assignments
            .active_for_vehicles(&vehicle_ids)
            .await?
            .into_iter()
            .map(|a| (a.vehicle_id, a))
            .collect();
        let trailer_ids: Vec<i32> = assignments.values().map(|a| a.trailer_id).collect();
        let trailers: HashMap<i32, Trailer> = repo
            .trailers
            .get_many(&trailer_ids)
            .await?
            .into_iter()
            .map(|t| (t.id, t))
            .collect();
        let trailer_maintenance: HashMap<i32, MaintenanceRecord> = repo
            .maintenance
            .latest_for_trailers(&trailer_ids)
            .await?
            .into_iter()
            .filter_map(|m| m.trailer_id.map(|id| (id, m)))
            .collect();
        let mut trailer_documents =
            documents_by_entity(repo.documents.for_entities(EntityKind::Trailer, &trailer_ids).await?);

        let entries = vehicles
            .into_iter()
            .map(|vehicle| {
                let docs = vehicle_documents.remove(&vehicle.id).unwrap_or_default();
                let vehicle_status = unit_channel(
                    states.get(&vehicle.id).map(|&km| Decimal::from(km)),
                    vehicle_maintenance.get(&vehicle.id),
                    &docs,
                    today,
                );

                let trailer = assignments
                    .get(&vehicle.id)
                    .and_then(|a| trailers.get(&a.trailer_id));
                let trailer_status = trailer.map(|t| {
                    let docs = trailer_documents.remove(&t.id).unwrap_or_default();
                    unit_channel(Some(t.accumulated_km), trailer_maintenance.get(&t.id), &docs, today)
                });

                FleetStatusEntry {
                    vehicle_id: vehicle.id,
                    plate: vehicle.plate,
                    trailer_id: trailer.map(|t| t.id),
                    trailer_plate: trailer.map(|t| t.plate.clone()),
                    vehicle: vehicle_status,
                    trailer: trailer_status,
                }
            })
            .collect();

        Ok(entries)
    }

    /// Tractor channel of one vehicle
    pub async fn vehicle_status(&self, vehicle_id: i32) -> AppResult<ChannelStatus> {
        let repo = &self.repository;
        repo.vehicles.get_by_id(vehicle_id).await?;

        let mileage = repo
            .vehicles
            .state(vehicle_id)
            .await?
            .map(|s| Decimal::from(s.state.mileage_km));
        let latest = repo.maintenance.latest_for_vehicles(&[vehicle_id]).await?;
        let documents = repo.documents.for_entity(EntityKind::Vehicle, vehicle_id).await?;

        Ok(unit_channel(mileage, latest.first(), &documents, today()))
    }

    /// Channel of one trailer
    pub async fn trailer_status(&self, trailer_id: i32) -> AppResult<ChannelStatus> {
        let repo = &self.repository;
        let trailer = repo.trailers.get_by_id(trailer_id).await?;
        let latest = repo.maintenance.latest_for_trailers(&[trailer_id]).await?;
        let documents = repo.documents.for_entity(EntityKind::Trailer, trailer_id).await?;

        Ok(unit_channel(Some(trailer.accumulated_km), latest.first(), &documents, today()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::enums::{DocumentCategory, Workshop},
        status::Severity,
    };
    use chrono::{Duration, Utc};
    use std::str::FromStr;

    fn record(next_due_km: Option<i32>) -> MaintenanceRecord {
        MaintenanceRecord {
            id: 1,
            vehicle_id: Some(1),
            trailer_id: None,
            workshop: Workshop::Zmc,
            service_date: NaiveDate::from_ymd_opt(2026, 1, 10).unwrap(),
            service_km: Some(100_000),
            next_due_km,
            notes: None,
            created_at: Utc::now(),
        }
    }

    fn document(category: DocumentCategory, expiry: Option<NaiveDate>) -> Document {
        Document {
            id: 1,
            entity_kind: EntityKind::Vehicle,
            entity_id: 1,
            category,
            expiry_date: expiry,
            url: "https://drive.example/doc".to_string(),
            checksum: None,
            created_at: Utc::now(),
        }
    }

    fn today() -> NaiveDate {
        NaiveDate::from_ymd_opt(2026, 6, 1).unwrap()
    }

    #[test]
    fn test_no_data_is_lowest_priority() {
        let channel = unit_channel(None, None, &[], today());
        assert_eq!(channel.severity, Severity::SinDatos);
        assert_eq!(channel.priority, 0);
        assert!(channel.reasons.is_empty());
    }

    #[test]
    fn test_worst_of_maintenance_and_documents() {
        let docs = vec![
            document(DocumentCategory::Soap, Some(today() + Duration::days(60))),
            document(DocumentCategory::RevisionTecnica, Some(today() - Duration::days(1))),
        ];
        let channel = unit_channel(Some(Decimal::from(120_000)), Some(&record(Some(125_000))), &docs, today());

        assert_eq!(channel.severity, Severity::Vencido);
        assert_eq!(
            channel.reasons,
            vec![
                "Maintenance: Due in 5000 km".to_string(),
                "REVISION_TECNICA: Expired 1 day ago".to_string(),
            ]
        );
    }

    #[test]
    fn test_documents_alone_lift_no_data() {
        let docs = vec![document(DocumentCategory::Padron, None)];
        let channel = unit_channel(None, None, &docs, today());
        assert_eq!(channel.severity, Severity::Ok);
    }

    #[test]
    fn test_record_without_due_mileage_has_no_data() {
        let channel = maintenance_channel(Some(Decimal::from(50_000)), Some(&record(None)));
        assert_eq!(channel.severity, Severity::SinDatos);
    }

    #[test]
    fn test_maintenance_channel_overdue() {
        let channel = maintenance_channel(Some(Decimal::from(131_000)), Some(&record(Some(130_000))));
        assert_eq!(channel.severity, Severity::Vencido);
        assert_eq!(channel.reasons, vec!["Maintenance: Overdue by 1000 km".to_string()]);
    }

    #[test]
    fn test_trailer_fractional_mileage_past_due() {
        let accumulated = Decimal::from_str("100000.5").unwrap();
        let channel = unit_channel(Some(accumulated), Some(&record(Some(100_000))), &[], today());
        assert_eq!(channel.severity, Severity::Vencido);
        assert_eq!(channel.reasons, vec!["Maintenance: Overdue by 0.5 km".to_string()]);
    }

    #[test]
    fn test_documents_by_entity() {
        let mut other = document(DocumentCategory::Soap, None);
        other.entity_id = 2;
        let map = documents_by_entity(vec![document(DocumentCategory::Tc8, None), other]);
        assert_eq!(map.len(), 2);
        assert_eq!(map[&2][0].category, DocumentCategory::Soap);
    }
}
