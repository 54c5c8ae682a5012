//! Business logic services

pub mod assignments;
pub mod auth;
pub mod companies;
pub mod documents;
pub mod drivers;
pub mod fleet;
pub mod inspections;
pub mod maintenance;
pub mod trailers;
pub mod vehicles;

use std::sync::Arc;

use crate::{
    config::{AuthConfig, ReportsConfig},
    reports::{LocalReportStore, ReportHeader, ReportStore},
    repository::Repository,
};

/// Container for all services
#[derive(Clone)]
pub struct Services {
    pub auth: auth::AuthService,
    pub companies: companies::CompaniesService,
    pub drivers: drivers::DriversService,
    pub vehicles: vehicles::VehiclesService,
    pub trailers: trailers::TrailersService,
    pub assignments: assignments::AssignmentsService,
    pub maintenance: maintenance::MaintenanceService,
    pub documents: documents::DocumentsService,
    pub fleet: fleet::FleetService,
    pub inspections: inspections::InspectionsService,
    repository: Repository,
}

impl Services {
    /// Create all services with the given repository, storing reports on the
    /// local filesystem
    pub fn new(repository: Repository, auth_config: AuthConfig, reports_config: &ReportsConfig) -> Self {
        let store: Arc<dyn ReportStore> = Arc::new(LocalReportStore::new(&reports_config.storage_dir));
        Self::with_report_store(repository, auth_config, reports_config, store)
    }

    pub fn with_report_store(
        repository: Repository,
        auth_config: AuthConfig,
        reports_config: &ReportsConfig,
        store: Arc<dyn ReportStore>,
    ) -> Self {
        let header = ReportHeader {
            company_name: reports_config.company_name.clone(),
            contractor: reports_config.contractor.clone(),
            contract: reports_config.contract.clone(),
        };

        Self {
            auth: auth::AuthService::new(repository.clone(), auth_config),
            companies: companies::CompaniesService::new(repository.clone()),
            drivers: drivers::DriversService::new(repository.clone()),
            vehicles: vehicles::VehiclesService::new(repository.clone()),
            trailers: trailers::TrailersService::new(repository.clone()),
            assignments: assignments::AssignmentsService::new(repository.clone()),
            maintenance: maintenance::MaintenanceService::new(repository.clone()),
            documents: documents::DocumentsService::new(repository.clone()),
            fleet: fleet::FleetService::new(repository.clone()),
            inspections: inspections::InspectionsService::new(repository.clone(), store, header),
            repository,
        }
    }

    /// Check the database answers
    pub async fn ping_database(&self) -> crate::error::AppResult<()> {
        sqlx::query("SELECT 1").execute(&self.repository.pool).await?;
        Ok(())
    }
}
