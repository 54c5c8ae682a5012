//! Vehicles service: registry, current state and list views

use std::collections::{BTreeMap, HashMap};

use rust_decimal::Decimal;
use validator::Validate;

use super::fleet::{maintenance_channel, today, unit_channel};
use crate::{
    error::{AppError, AppResult},
    models::{
        document::DocumentWithStatus,
        enums::{EntityKind, OperationalState},
        maintenance::{MaintenanceQuery, MaintenanceRecord},
        trailer::Trailer,
        vehicle::{
            normalize_plate, CreateVehicle, UpdateVehicle, UpdateVehicleState, Vehicle, VehicleDetail,
            VehicleGroup, VehicleListEntry, VehicleQuery, VehicleState, VehicleStateHistory,
            VehicleSummary,
        },
    },
    repository::Repository,
    status::{maintenance::remaining_km, Severity},
};

/// Group name for vehicles without a current base
pub const NO_BASE: &str = "Sin base";

const HISTORY_LIMIT: i64 = 100;

/// Sort entries most urgent first; ties go to the smallest remaining distance
pub fn sort_by_urgency(entries: &mut [VehicleListEntry]) {
    entries.sort_by(|a, b| {
        b.maintenance
            .priority
            .cmp(&a.maintenance.priority)
            .then_with(|| match (a.km_remaining, b.km_remaining) {
                (Some(x), Some(y)) => x.cmp(&y),
                (Some(_), None) => std::cmp::Ordering::Less,
                (None, Some(_)) => std::cmp::Ordering::Greater,
                (None, None) => std::cmp::Ordering::Equal,
            })
            .then_with(|| a.plate.cmp(&b.plate))
    });
}

/// Group list entries by base, bases in alphabetical order with the
/// unassigned group last
pub fn group_by_base(
    entries: Vec<(Option<String>, VehicleListEntry)>,
    by_urgency: bool,
) -> Vec<VehicleGroup> {
    let mut groups: BTreeMap<String, Vec<VehicleListEntry>> = BTreeMap::new();
    let mut without_base = Vec::new();
    for (base, entry) in entries {
        match base.filter(|b| !b.trim().is_empty()) {
            Some(base) => groups.entry(base).or_default().push(entry),
            None => without_base.push(entry),
        }
    }

    let mut result: Vec<VehicleGroup> = groups
        .into_iter()
        .map(|(base, vehicles)| VehicleGroup { base, vehicles })
        .collect();
    if !without_base.is_empty() {
        result.push(VehicleGroup {
            base: NO_BASE.to_string(),
            vehicles: without_base,
        });
    }

    for group in &mut result {
        if by_urgency {
            sort_by_urgency(&mut group.vehicles);
        } else {
            group.vehicles.sort_by(|a, b| a.plate.cmp(&b.plate));
        }
    }
    result
}

/// Describe what changed between two states, for the history log
fn describe_change(before: &VehicleState, after: &VehicleState) -> String {
    let mut changes = Vec::new();
    if before.mileage_km != after.mileage_km {
        changes.push(format!("mileage {} -> {} km", before.mileage_km, after.mileage_km));
    }
    if before.operational_state != after.operational_state {
        changes.push(format!(
            "state {} -> {}",
            before.operational_state, after.operational_state
        ));
    }
    if before.driver_id != after.driver_id {
        changes.push(match after.driver_id {
            Some(id) => format!("driver set to {}", id),
            None => "driver removed".to_string(),
        });
    }
    if before.base != after.base {
        changes.push(format!("base {}", after.base.as_deref().unwrap_or("-")));
    }
    if changes.is_empty() {
        "State updated".to_string()
    } else {
        changes.join(", ")
    }
}

#[derive(Clone)]
pub struct VehiclesService {
    repository: Repository,
}

impl VehiclesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    /// Vehicle list grouped by base, with maintenance status per vehicle
    #[tracing::instrument(skip(self))]
    pub async fn list(&self, query: &VehicleQuery) -> AppResult<Vec<VehicleGroup>> {
        let repo = &self.repository;

        let wanted: Option<Severity> = match query.status.as_deref().filter(|s| !s.is_empty()) {
            Some(code) => Some(code.parse().map_err(AppError::Validation)?),
            None => None,
        };
        let by_urgency = match query.order.as_deref() {
            None | Some("") | Some("plate") => false,
            Some("urgency") => true,
            Some(other) => {
                return Err(AppError::Validation(format!("Unknown order: {}", other)));
            }
        };

        let vehicles = repo.vehicles.list(query.include_inactive.unwrap_or(false)).await?;
        let ids: Vec<i32> = vehicles.iter().map(|v| v.id).collect();
        let mut states: HashMap<i32, _> = repo
            .vehicles
            .states_for(&ids)
            .await?
            .into_iter()
            .map(|s| (s.state.vehicle_id, s))
            .collect();
        let latest: HashMap<i32, MaintenanceRecord> = repo
            .maintenance
            .latest_for_vehicles(&ids)
            .await?
            .into_iter()
            .filter_map(|m| m.vehicle_id.map(|id| (id, m)))
            .collect();

        let entries = vehicles
            .into_iter()
            .filter_map(|vehicle| {
                let state = states.remove(&vehicle.id);
                let mileage = state.as_ref().map(|s| Decimal::from(s.state.mileage_km));
                let record = latest.get(&vehicle.id);
                let maintenance = maintenance_channel(mileage, record);

                if wanted.is_some_and(|w| w != maintenance.severity) {
                    return None;
                }

                let km_remaining = remaining_km(mileage, record.and_then(|m| m.next_due_km));
                let base = state.as_ref().and_then(|s| s.state.base.clone());
                let entry = VehicleListEntry {
                    id: vehicle.id,
                    plate: vehicle.plate,
                    brand: vehicle.brand,
                    model: vehicle.model,
                    active: vehicle.active,
                    operational_state: state.as_ref().map(|s| s.state.operational_state),
                    mileage_km: state.as_ref().map(|s| s.state.mileage_km),
                    driver_name: state.and_then(|s| s.driver_name),
                    km_remaining,
                    maintenance,
                };
                Some((base, entry))
            })
            .collect();

        Ok(group_by_base(entries, by_urgency))
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Vehicle> {
        self.repository.vehicles.get_by_id(id).await
    }

    /// Vehicle with state, maintenance history, documents and trailer
    pub async fn get_detail(&self, id: i32) -> AppResult<VehicleDetail> {
        let repo = &self.repository;
        let today = today();

        let vehicle = repo.vehicles.get_by_id(id).await?;
        let state = repo.vehicles.state(id).await?;
        let maintenance = repo
            .maintenance
            .list(&MaintenanceQuery {
                vehicle_id: Some(id),
                trailer_id: None,
            })
            .await?;
        let documents = repo.documents.for_entity(EntityKind::Vehicle, id).await?;
        let trailer = self.current_trailer(id).await?;

        let mileage = state.as_ref().map(|s| Decimal::from(s.state.mileage_km));
        let status = unit_channel(mileage, maintenance.first(), &documents, today);

        let (state, driver_name) = match state {
            Some(s) => (Some(s.state), s.driver_name),
            None => (None, None),
        };

        Ok(VehicleDetail {
            vehicle,
            state,
            driver_name,
            maintenance,
            documents: documents
                .into_iter()
                .map(|d| DocumentWithStatus::new(d, today))
                .collect(),
            trailer,
            status,
        })
    }

    /// Register a vehicle, with its initial state when mileage or base is given
    pub async fn create(&self, data: &CreateVehicle) -> AppResult<Vehicle> {
        data.validate()?;
        let plate = normalize_plate(&data.plate)?;
        let repo = &self.repository;

        if let Some(company_id) = data.company_id {
            repo.companies.get_by_id(company_id).await?;
        }

        let mut tx = repo.begin().await?;
        let vehicle = repo.vehicles.create(&mut tx, &plate, data).await?;

        if data.initial_mileage_km.is_some() || data.base.is_some() {
            let state = repo
                .vehicles
                .insert_state(
                    &mut tx,
                    vehicle.id,
                    data.initial_mileage_km.unwrap_or(0),
                    OperationalState::Operativo,
                    None,
                    data.base.as_deref(),
                    None,
                )
                .await?;
            repo.vehicles.append_history(&mut tx, &state, "Initial state").await?;
        }
        tx.commit().await?;

        tracing::info!("Vehicle {} registered ({})", vehicle.id, vehicle.plate);
        Ok(vehicle)
    }

    pub async fn update(&self, id: i32, data: &UpdateVehicle) -> AppResult<Vehicle> {
        data.validate()?;
        if let Some(company_id) = data.company_id {
            self.repository.companies.get_by_id(company_id).await?;
        }
        self.repository.vehicles.update(id, data).await
    }

    /// Update the current state in place and append a history entry. The
    /// first update of a vehicle without state creates it and needs a mileage.
    pub async fn update_state(&self, id: i32, data: &UpdateVehicleState) -> AppResult<VehicleState> {
        data.validate()?;
        let repo = &self.repository;

        if let Some(driver_id) = data.driver_id {
            let driver = repo.drivers.get_by_id(driver_id).await?;
            if !driver.active {
                return Err(AppError::Validation(format!("Driver {} is inactive", driver_id)));
            }
        }

        let mut tx = repo.begin().await?;
        repo.vehicles.lock(&mut tx, id).await?;

        let state = match repo.vehicles.state_for_update(&mut tx, id).await? {
            None => {
                let mileage = data.mileage_km.ok_or_else(|| {
                    AppError::Validation("Mileage is required for the first state".to_string())
                })?;
                let driver_id = if data.clear_driver { None } else { data.driver_id };
                let state = repo
                    .vehicles
                    .insert_state(
                        &mut tx,
                        id,
                        mileage,
                        data.operational_state.unwrap_or(OperationalState::Operativo),
                        driver_id,
                        data.base.as_deref(),
                        data.note.as_deref(),
                    )
                    .await?;
                repo.vehicles.append_history(&mut tx, &state, "Initial state").await?;
                state
            }
            Some(before) => {
                let mut after = before.clone();
                if let Some(mileage) = data.mileage_km {
                    if mileage < before.mileage_km {
                        tracing::warn!(
                            "Vehicle {} mileage going backwards: {} -> {}",
                            id,
                            before.mileage_km,
                            mileage
                        );
                    }
                    after.mileage_km = mileage;
                }
                if let Some(op_state) = data.operational_state {
                    after.operational_state = op_state;
                }
                if data.clear_driver {
                    after.driver_id = None;
                } else if data.driver_id.is_some() {
                    after.driver_id = data.driver_id;
                }
                if data.base.is_some() {
                    after.base = data.base.clone();
                }
                if data.note.is_some() {
                    after.note = data.note.clone();
                }

                let saved = repo.vehicles.save_state(&mut tx, &after).await?;
                let description = match data.note.as_deref() {
                    Some(note) => format!("{} ({})", describe_change(&before, &saved), note),
                    None => describe_change(&before, &saved),
                };
                repo.vehicles.append_history(&mut tx, &saved, &description).await?;
                saved
            }
        };
        tx.commit().await?;

        Ok(state)
    }

    pub async fn history(&self, id: i32) -> AppResult<Vec<VehicleStateHistory>> {
        self.repository.vehicles.get_by_id(id).await?;
        self.repository.vehicles.history(id, HISTORY_LIMIT).await
    }

    /// Compact data for a dashboard card
    pub async fn summary(&self, id: i32) -> AppResult<VehicleSummary> {
        let repo = &self.repository;
        let vehicle = repo.vehicles.get_by_id(id).await?;
        let state = repo.vehicles.state(id).await?.map(|s| s.state);
        let latest = repo.maintenance.latest_for_vehicles(&[id]).await?;

        let mileage = state.as_ref().map(|s| s.mileage_km);
        Ok(VehicleSummary {
            id: vehicle.id,
            plate: vehicle.plate,
            operational_state: state.map(|s| s.operational_state),
            mileage_km: mileage,
            km_remaining: remaining_km(
                mileage.map(Decimal::from),
                latest.first().and_then(|m| m.next_due_km),
            ),
        })
    }

    /// Trailer currently assigned to the vehicle
    pub async fn current_trailer(&self, id: i32) -> AppResult<Option<Trailer>> {
        let repo = &self.repository;
        match repo.assignments.active_for_vehicle(id).await? {
            Some(assignment) => Ok(Some(repo.trailers.get_by_id(assignment.trailer_id).await?)),
            None => Ok(None),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::status::{Assessment, ChannelStatus};
    use chrono::Utc;

    fn entry(plate: &str, severity: Severity, km_remaining: Option<i64>) -> VehicleListEntry {
        let mut maintenance = ChannelStatus::default();
        maintenance.record("Maintenance", Assessment::new(severity, None));
        VehicleListEntry {
            id: 0,
            plate: plate.to_string(),
            brand: None,
            model: None,
            active: true,
            operational_state: None,
            mileage_km: None,
            driver_name: None,
            km_remaining: km_remaining.map(Decimal::from),
            maintenance,
        }
    }

    #[test]
    fn test_urgency_order() {
        let mut entries = vec![
            entry("AA0001", Severity::Ok, Some(20_000)),
            entry("AA0002", Severity::Vencido, Some(-500)),
            entry("AA0003", Severity::SinDatos, None),
            entry("AA0004", Severity::Critico, Some(2_000)),
            entry("AA0005", Severity::Critico, Some(100)),
        ];
        sort_by_urgency(&mut entries);
        let plates: Vec<&str> = entries.iter().map(|e| e.plate.as_str()).collect();
        assert_eq!(plates, vec!["AA0002", "AA0005", "AA0004", "AA0001", "AA0003"]);
    }

    #[test]
    fn test_group_by_base() {
        let groups = group_by_base(
            vec![
                (Some("Norte".to_string()), entry("BB0002", Severity::Ok, None)),
                (None, entry("CC0001", Severity::Ok, None)),
                (Some("Centro".to_string()), entry("DD0001", Severity::Ok, None)),
                (Some("Norte".to_string()), entry("BB0001", Severity::Ok, None)),
                (Some("  ".to_string()), entry("EE0001", Severity::Ok, None)),
            ],
            false,
        );
        let names: Vec<&str> = groups.iter().map(|g| g.base.as_str()).collect();
        assert_eq!(names, vec!["Centro", "Norte", NO_BASE]);
        assert_eq!(groups[1].vehicles[0].plate, "BB0001");
        assert_eq!(groups[2].vehicles.len(), 2);
    }

    #[test]
    fn test_describe_change() {
        let before = VehicleState {
            id: 1,
            vehicle_id: 1,
            driver_id: Some(3),
            mileage_km: 1000,
            operational_state: OperationalState::Operativo,
            base: None,
            note: None,
            updated_at: Utc::now(),
        };
        let mut after = before.clone();
        assert_eq!(describe_change(&before, &after), "State updated");

        after.mileage_km = 1500;
        after.driver_id = None;
        assert_eq!(
            describe_change(&before, &after),
            "mileage 1000 -> 1500 km, driver removed"
        );
    }
}
