//! Inspection checklists: submission workflow, form autofill and categories

use std::{
    collections::{HashMap, HashSet},
    future::Future,
    sync::Arc,
};

use chrono::{DateTime, Local};
use validator::Validate;

use super::{fleet::today, maintenance::due_after};
use crate::{
    error::{AppError, AppResult},
    models::{
        document::{CreateDocument, Document},
        enums::{DocumentCategory, EntityKind, InspectionType, ItemCondition},
        inspection::{
            Autofill, CategoryWithItems, ChecklistEntry, ChecklistItem, CreateInspection,
            InspectionDetail,
        },
        trailer::Trailer,
        vehicle::Vehicle,
    },
    reports::{render_inspection, report_file_name, InspectionReport, ReportHeader, ReportStore, StoredReport},
    repository::{maintenance::NewMaintenance, vehicles::StateWithDriver, Repository},
};

/// Lubricant recorded when engine oil is renewed
pub const ENGINE_OIL: &str = "ACEITE_MOTOR";

const NOT_AVAILABLE: &str = "N/A";
const DATE_FORMAT: &str = "%d/%m/%Y";

/// Reject checklists that answer the same item twice
pub fn check_unique_items(entries: &[ChecklistEntry]) -> AppResult<()> {
    let mut seen = HashSet::new();
    for entry in entries {
        if !seen.insert(entry.item_id) {
            return Err(AppError::Validation(format!(
                "Checklist item {} answered twice",
                entry.item_id
            )));
        }
    }
    Ok(())
}

/// Check every answer against the catalogue and work out whether the unit
/// may operate: a Bad result on a critical item overrides the inspector.
pub fn evaluate_checklist(
    entries: &[ChecklistEntry],
    items: &[ChecklistItem],
    allowed_categories: &HashSet<i32>,
    inspection_type: InspectionType,
    requested_fit: bool,
) -> AppResult<bool> {
    let by_id: HashMap<i32, &ChecklistItem> = items.iter().map(|i| (i.id, i)).collect();
    let mut fit = requested_fit;

    for entry in entries {
        let item = by_id
            .get(&entry.item_id)
            .ok_or_else(|| AppError::Validation(format!("Unknown checklist item {}", entry.item_id)))?;
        if !allowed_categories.contains(&item.category_id) {
            return Err(AppError::Validation(format!(
                "Checklist item {} is not part of the {} checklist",
                item.id, inspection_type
            )));
        }
        if item.critical && entry.condition == ItemCondition::Malo {
            fit = false;
        }
    }
    Ok(fit)
}

/// Write a report, then run `commit`; if the commit fails the written file is
/// removed again
pub async fn publish_report<T, F, Fut>(
    store: &dyn ReportStore,
    path: &str,
    bytes: &[u8],
    commit: F,
) -> AppResult<T>
where
    F: FnOnce(StoredReport) -> Fut,
    Fut: Future<Output = AppResult<T>>,
{
    let stored = store.put(path, bytes).await?;
    match commit(stored).await {
        Ok(value) => Ok(value),
        Err(e) => {
            if let Err(cleanup) = store.remove(path).await {
                tracing::warn!("Failed to remove report {} after error: {}", path, cleanup);
            }
            Err(e)
        }
    }
}

fn format_expiry(documents: &[Document], category: DocumentCategory) -> String {
    documents
        .iter()
        .filter(|d| d.category == category)
        .filter_map(|d| d.expiry_date)
        .max()
        .map(|d| d.format(DATE_FORMAT).to_string())
        .unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

fn or_na(value: Option<&str>) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or(NOT_AVAILABLE)
        .to_string()
}

fn year_or_na(year: Option<i32>) -> String {
    year.map(|y| y.to_string()).unwrap_or_else(|| NOT_AVAILABLE.to_string())
}

/// Build the pre-filled form data for a vehicle and its assigned trailer
pub fn build_autofill(
    header: &ReportHeader,
    now: DateTime<Local>,
    vehicle: &Vehicle,
    state: Option<&StateWithDriver>,
    vehicle_documents: &[Document],
    trailer: Option<&Trailer>,
    trailer_documents: &[Document],
) -> Autofill {
    let driver_name = state.and_then(|s| s.driver_name.clone());
    let mut autofill = Autofill {
        inspection_date: now.format("%d/%m/%Y %H:%M").to_string(),
        place: or_na(state.and_then(|s| s.state.base.as_deref())),
        contractor: header.contractor.clone(),
        contract: header.contract.clone(),
        control_date: if driver_name.is_some() {
            now.format(DATE_FORMAT).to_string()
        } else {
            String::new()
        },
        driver_name: driver_name.unwrap_or_default(),
        vehicle_brand: or_na(vehicle.brand.as_deref()),
        vehicle_model: or_na(vehicle.model.as_deref()),
        vehicle_plate: vehicle.plate.clone(),
        vehicle_year: year_or_na(vehicle.year),
        vehicle_rt_expiry: format_expiry(vehicle_documents, DocumentCategory::RevisionTecnica),
        vehicle_pc_expiry: format_expiry(vehicle_documents, DocumentCategory::PermisoCirculacion),
        vehicle_soap_expiry: format_expiry(vehicle_documents, DocumentCategory::Soap),
        vehicle_tc8_expiry: format_expiry(vehicle_documents, DocumentCategory::Tc8),
        has_trailer: false,
        trailer_id: None,
        trailer_brand: NOT_AVAILABLE.to_string(),
        trailer_model: NOT_AVAILABLE.to_string(),
        trailer_year: NOT_AVAILABLE.to_string(),
        trailer_plate: NOT_AVAILABLE.to_string(),
        trailer_capacity: NOT_AVAILABLE.to_string(),
        trailer_rt_expiry: NOT_AVAILABLE.to_string(),
        trailer_pc_expiry: NOT_AVAILABLE.to_string(),
        trailer_soap_expiry: NOT_AVAILABLE.to_string(),
        trailer_tc8_expiry: NOT_AVAILABLE.to_string(),
    };

    if let Some(trailer) = trailer {
        autofill.has_trailer = true;
        autofill.trailer_id = Some(trailer.id);
        autofill.trailer_brand = or_na(trailer.brand.as_deref());
        autofill.trailer_model = or_na(trailer.model.as_deref());
        autofill.trailer_year = year_or_na(trailer.year);
        autofill.trailer_plate = trailer.plate.clone();
        autofill.trailer_capacity = trailer
            .load_capacity
            .map(|c| c.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        autofill.trailer_rt_expiry = format_expiry(trailer_documents, DocumentCategory::RevisionTecnica);
        autofill.trailer_pc_expiry = format_expiry(trailer_documents, DocumentCategory::PermisoCirculacion);
        autofill.trailer_soap_expiry = format_expiry(trailer_documents, DocumentCategory::Soap);
        autofill.trailer_tc8_expiry = format_expiry(trailer_documents, DocumentCategory::Tc8);
    }

    autofill
}

#[derive(Clone)]
pub struct InspectionsService {
    repository: Repository,
    store: Arc<dyn ReportStore>,
    header: ReportHeader,
}

impl InspectionsService {
    pub fn new(repository: Repository, store: Arc<dyn ReportStore>, header: ReportHeader) -> Self {
        Self {
            repository,
            store,
            header,
        }
    }

    /// Checklist sections of an inspection type with their items
    pub async fn categories(&self, inspection_type: InspectionType) -> AppResult<Vec<CategoryWithItems>> {
        let repo = &self.repository;
        let categories = repo.inspections.categories(inspection_type).await?;
        let ids: Vec<i32> = categories.iter().map(|c| c.id).collect();

        let mut items: HashMap<i32, Vec<ChecklistItem>> = HashMap::new();
        for item in repo.inspections.items_for_categories(&ids).await? {
            items.entry(item.category_id).or_default().push(item);
        }

        Ok(categories
            .into_iter()
            .map(|category| CategoryWithItems {
                items: items.remove(&category.id).unwrap_or_default(),
                category,
            })
            .collect())
    }

    /// Form data for a vehicle
    pub async fn autofill(&self, vehicle_id: i32) -> AppResult<Autofill> {
        let repo = &self.repository;
        let vehicle = repo.vehicles.get_by_id(vehicle_id).await?;
        let state = repo.vehicles.state(vehicle_id).await?;
        let vehicle_documents = repo.documents.for_entity(EntityKind::Vehicle, vehicle_id).await?;

        let trailer = match repo.assignments.active_for_vehicle(vehicle_id).await? {
            Some(a) => Some(repo.trailers.get_by_id(a.trailer_id).await?),
            None => None,
        };
        let trailer_documents = match &trailer {
            Some(t) => repo.documents.for_entity(EntityKind::Trailer, t.id).await?,
            None => Vec::new(),
        };

        Ok(build_autofill(
            &self.header,
            Local::now(),
            &vehicle,
            state.as_ref(),
            &vehicle_documents,
            trailer.as_ref(),
            &trailer_documents,
        ))
    }

    /// Inspection with results, lubricants and report
    pub async fn get_detail(&self, id: i32) -> AppResult<InspectionDetail> {
        let repo = &self.repository;
        let inspection = repo.inspections.get_by_id(id).await?;
        let results = repo.inspections.results(id).await?;
        let lubricants = repo.inspections.lubricants(id).await?;

        let maintenance = match inspection.maintenance_id {
            Some(mid) => Some(repo.maintenance.get_by_id(mid).await?),
            None => None,
        };
        let report = match inspection.report_id {
            Some(rid) => Some(repo.documents.get_by_id(rid).await?),
            None => None,
        };

        Ok(InspectionDetail {
            inspection,
            results,
            lubricants,
            maintenance,
            report,
        })
    }

    /// Record an inspection and everything it implies, in one transaction
    #[tracing::instrument(skip(self, data), fields(vehicle_id = data.vehicle_id, inspection_type = %data.inspection_type))]
    pub async fn submit(&self, data: &CreateInspection) -> AppResult<InspectionDetail> {
        data.validate()?;
        check_unique_items(&data.checklist)?;
        let repo = &self.repository;

        let state = repo.vehicles.state(data.vehicle_id).await?;
        let trailer_id = match data.trailer_id {
            Some(id) => Some(id),
            None => repo
                .assignments
                .active_for_vehicle(data.vehicle_id)
                .await?
                .map(|a| a.trailer_id),
        };
        let trailer = match trailer_id {
            Some(id) => Some(repo.trailers.get_by_id(id).await?),
            None => None,
        };
        let allowed_categories: HashSet<i32> = repo
            .inspections
            .categories(data.inspection_type)
            .await?
            .iter()
            .map(|c| c.id)
            .collect();

        let mut tx = repo.begin().await?;

        let vehicle = repo.vehicles.lock(&mut tx, data.vehicle_id).await?;
        if !vehicle.active {
            return Err(AppError::Validation(format!("Vehicle {} is inactive", vehicle.plate)));
        }

        let item_ids: Vec<i32> = data.checklist.iter().map(|e| e.item_id).collect();
        let items = repo.inspections.items_by_ids(&mut tx, &item_ids).await?;
        let fit = evaluate_checklist(
            &data.checklist,
            &items,
            &allowed_categories,
            data.inspection_type,
            data.fit_for_operation,
        )?;

        let inspection = repo.inspections.insert(&mut tx, data, trailer_id, fit).await?;

        if let Some(mut current) = repo.vehicles.state_for_update(&mut tx, vehicle.id).await? {
            current.mileage_km = data.mileage_km;
            let saved = repo.vehicles.save_state(&mut tx, &current).await?;
            let description = format!(
                "Inspection {} ({}): {} km",
                inspection.id, inspection.inspection_type, inspection.mileage_km
            );
            repo.vehicles.append_history(&mut tx, &saved, &description).await?;
        }

        for entry in &data.checklist {
            repo.inspections
                .insert_result(
                    &mut tx,
                    inspection.id,
                    entry.item_id,
                    entry.condition,
                    entry.observation.as_deref(),
                )
                .await?;
        }

        let mut lubricants = Vec::new();
        let mut maintenance = None;
        if data.oil_renewed {
            let next_due = due_after(data.mileage_km, vehicle.maintenance_interval_km)?;
            lubricants.push(
                repo.inspections
                    .insert_lubricant(&mut tx, inspection.id, ENGINE_OIL, Some(next_due))
                    .await?,
            );
            let notes = format!("Oil change recorded by inspection {}", inspection.id);
            maintenance = Some(
                repo.maintenance
                    .insert(
                        &mut tx,
                        &NewMaintenance {
                            vehicle_id: Some(vehicle.id),
                            trailer_id: None,
                            workshop: vehicle.workshop,
                            service_date: today(),
                            service_km: Some(data.mileage_km),
                            next_due_km: Some(next_due),
                            notes: Some(&notes),
                        },
                    )
                    .await?,
            );
        }

        let results = repo.inspections.results_in(&mut tx, inspection.id).await?;

        let bytes = render_inspection(&InspectionReport {
            header: &self.header,
            inspection: &inspection,
            vehicle: &vehicle,
            trailer: trailer.as_ref(),
            driver_name: state.as_ref().and_then(|s| s.driver_name.as_deref()),
            place: state.as_ref().and_then(|s| s.state.base.as_deref()),
            results: &results,
        })?;
        let path = report_file_name(
            inspection.inspection_type,
            &Local::now(),
            &vehicle.plate,
            inspection.id,
        );

        let inspection_id = inspection.id;
        let maintenance_id = maintenance.as_ref().map(|m| m.id);
        let (inspection, report) = publish_report(self.store.as_ref(), &path, &bytes, |stored| async move {
            let document = repo
                .documents
                .insert(
                    &mut tx,
                    &CreateDocument {
                        entity_kind: EntityKind::Vehicle,
                        entity_id: vehicle.id,
                        category: DocumentCategory::Inspeccion,
                        expiry_date: None,
                        url: stored.path,
                        checksum: Some(stored.checksum),
                    },
                )
                .await?;
            let inspection = repo
                .inspections
                .link(&mut tx, inspection_id, maintenance_id, Some(document.id))
                .await?;
            tx.commit().await?;
            Ok::<_, AppError>((inspection, document))
        })
        .await?;

        tracing::info!(
            "Inspection {} recorded for {} (fit: {}, report: {})",
            inspection.id,
            vehicle.plate,
            inspection.fit_for_operation,
            report.url
        );

        Ok(InspectionDetail {
            inspection,
            results,
            lubricants,
            maintenance,
            report: Some(report),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        models::{enums::Workshop, vehicle::VehicleState},
        reports::store::MockReportStore,
    };
    use chrono::{NaiveDate, TimeZone, Utc};

    fn item(id: i32, category_id: i32, critical: bool) -> ChecklistItem {
        ChecklistItem {
            id,
            category_id,
            name: format!("Item {}", id),
            critical,
        }
    }

    fn entry(item_id: i32, condition: ItemCondition) -> ChecklistEntry {
        ChecklistEntry {
            item_id,
            condition,
            observation: None,
        }
    }

    fn allowed() -> HashSet<i32> {
        [1, 2].into_iter().collect()
    }

    #[test]
    fn test_duplicate_items_rejected() {
        let entries = vec![entry(1, ItemCondition::Bueno), entry(1, ItemCondition::Malo)];
        assert!(check_unique_items(&entries).is_err());
        assert!(check_unique_items(&entries[..1]).is_ok());
    }

    #[test]
    fn test_bad_critical_item_forces_unfit() {
        let items = vec![item(1, 1, true), item(2, 1, false)];
        let entries = vec![entry(1, ItemCondition::Malo), entry(2, ItemCondition::Bueno)];
        let fit = evaluate_checklist(&entries, &items, &allowed(), InspectionType::Diaria, true).unwrap();
        assert!(!fit);
    }

    #[test]
    fn test_bad_regular_item_keeps_inspector_decision() {
        let items = vec![item(1, 1, true), item(2, 2, false)];
        let entries = vec![entry(1, ItemCondition::Regular), entry(2, ItemCondition::Malo)];
        assert!(evaluate_checklist(&entries, &items, &allowed(), InspectionType::Diaria, true).unwrap());
        assert!(!evaluate_checklist(&entries, &items, &allowed(), InspectionType::Diaria, false).unwrap());
    }

    #[test]
    fn test_unknown_or_foreign_items_rejected() {
        let items = vec![item(1, 1, false), item(3, 9, false)];
        let unknown = vec![entry(2, ItemCondition::Bueno)];
        assert!(evaluate_checklist(&unknown, &items, &allowed(), InspectionType::Diaria, true).is_err());
        let foreign = vec![entry(3, ItemCondition::Bueno)];
        assert!(evaluate_checklist(&foreign, &items, &allowed(), InspectionType::Diaria, true).is_err());
    }

    #[tokio::test]
    async fn test_failed_commit_removes_report() {
        let mut store = MockReportStore::new();
        store
            .expect_put()
            .times(1)
            .returning(|path, bytes| Ok(StoredReport::describe(path, bytes)));
        store
            .expect_remove()
            .withf(|path| path == "reports/DIARIA/r.pdf")
            .times(1)
            .returning(|_| Ok(()));

        let result: AppResult<()> = publish_report(&store, "reports/DIARIA/r.pdf", b"%PDF", |_| async {
            Err::<(), _>(AppError::Internal("commit failed".to_string()))
        })
        .await;

        assert!(result.is_err());
    }

    #[tokio::test]
    async fn test_successful_commit_keeps_report() {
        let mut store = MockReportStore::new();
        store
            .expect_put()
            .times(1)
            .returning(|path, bytes| Ok(StoredReport::describe(path, bytes)));
        store.expect_remove().times(0);

        let checksum = publish_report(&store, "reports/DIARIA/r.pdf", b"%PDF", |stored| async move {
            Ok::<_, AppError>(stored.checksum)
        })
        .await
        .unwrap();

        assert_eq!(checksum.len(), 64);
    }

    #[tokio::test]
    async fn test_failed_write_skips_commit() {
        let mut store = MockReportStore::new();
        store
            .expect_put()
            .returning(|_, _| Err(AppError::Report("disk full".to_string())));
        store.expect_remove().times(0);

        let result: AppResult<()> = publish_report(&store, "reports/DIARIA/r.pdf", b"%PDF", |_| async {
            Err::<(), _>(AppError::Internal("commit must not run".to_string()))
        })
        .await;

        assert!(matches!(result, Err(AppError::Report(_))));
    }

    #[tokio::test]
    async fn test_failed_second_submission_keeps_first_report() {
        let dir = tempfile::tempdir().unwrap();
        let store = crate::reports::LocalReportStore::new(dir.path());
        let path = "reports/DIARIA/report_20260101_080000_BBCL12_1.pdf";

        publish_report(&store, path, b"first", |_| async { Ok::<_, AppError>(()) })
            .await
            .unwrap();
        let second: AppResult<()> = publish_report(&store, path, b"second", |_| async {
            Err::<(), _>(AppError::Internal("commit failed".to_string()))
        })
        .await;

        assert!(matches!(second, Err(AppError::Report(_))));
        assert_eq!(std::fs::read(dir.path().join(path)).unwrap(), b"first");
    }

    #[test]
    fn test_build_autofill() {
        let header = ReportHeader {
            company_name: "Transportes Demo".to_string(),
            contractor: "ENAP".to_string(),
            contract: "Transporte de Productos Liquidos".to_string(),
        };
        let vehicle = Vehicle {
            id: 1,
            company_id: None,
            plate: "BBCL12".to_string(),
            vin: None,
            brand: Some("Volvo".to_string()),
            model: None,
            year: Some(2019),
            vehicle_type: "Tracto".to_string(),
            cargo_type: None,
            operational_role: crate::models::enums::OperationalRole::Titular,
            capacity_m3: 30,
            workshop: Workshop::Zmc,
            maintenance_interval_km: 25_000,
            active: true,
            created_at: Utc::now(),
        };
        let state = StateWithDriver {
            state: VehicleState {
                id: 1,
                vehicle_id: 1,
                driver_id: Some(4),
                mileage_km: 1000,
                operational_state: crate::models::enums::OperationalState::Operativo,
                base: Some("Base Norte".to_string()),
                note: None,
                updated_at: Utc::now(),
            },
            driver_name: Some("Pedro Rojas".to_string()),
        };
        let doc = |category, expiry: Option<NaiveDate>| Document {
            id: 1,
            entity_kind: EntityKind::Vehicle,
            entity_id: 1,
            category,
            expiry_date: expiry,
            url: "u".to_string(),
            checksum: None,
            created_at: Utc::now(),
        };
        let docs = vec![
            doc(DocumentCategory::Soap, NaiveDate::from_ymd_opt(2026, 3, 31)),
            doc(DocumentCategory::Soap, NaiveDate::from_ymd_opt(2027, 3, 31)),
            doc(DocumentCategory::Tc8, None),
        ];
        let now = Local.with_ymd_and_hms(2026, 10, 16, 9, 30, 0).unwrap();

        let autofill = build_autofill(&header, now, &vehicle, Some(&state), &docs, None, &[]);

        assert_eq!(autofill.inspection_date, "16/10/2026 09:30");
        assert_eq!(autofill.place, "Base Norte");
        assert_eq!(autofill.driver_name, "Pedro Rojas");
        assert_eq!(autofill.control_date, "16/10/2026");
        assert_eq!(autofill.vehicle_model, "N/A");
        assert_eq!(autofill.vehicle_soap_expiry, "31/03/2027");
        assert_eq!(autofill.vehicle_tc8_expiry, "N/A");
        assert!(!autofill.has_trailer);
        assert_eq!(autofill.trailer_plate, "N/A");
    }
}
