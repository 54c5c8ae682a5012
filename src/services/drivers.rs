//! Drivers service

use validator::Validate;

use crate::{
    error::AppResult,
    models::driver::{CreateDriver, Driver, UpdateDriver},
    repository::Repository,
};

#[derive(Clone)]
pub struct DriversService {
    repository: Repository,
}

impl DriversService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self, active_only: bool) -> AppResult<Vec<Driver>> {
        self.repository.drivers.list(active_only).await
    }

    pub async fn get_by_id(&self, id: i32) -> AppResult<Driver> {
        self.repository.drivers.get_by_id(id).await
    }

    pub async fn create(&self, data: &CreateDriver) -> AppResult<Driver> {
        data.validate()?;
        self.repository.drivers.create(data).await
    }

    pub async fn update(&self, id: i32, data: &UpdateDriver) -> AppResult<Driver> {
        data.validate()?;
        self.repository.drivers.update(id, data).await
    }
}
