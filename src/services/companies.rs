//! Companies service

use validator::Validate;

use crate::{
    error::AppResult,
    models::company::{Company, CreateCompany},
    repository::Repository,
};

#[derive(Clone)]
pub struct CompaniesService {
    repository: Repository,
}

impl CompaniesService {
    pub fn new(repository: Repository) -> Self {
        Self { repository }
    }

    pub async fn list(&self) -> AppResult<Vec<Company>> {
        self.repository.companies.list().await
    }

    pub async fn create(&self, data: &CreateCompany) -> AppResult<Company> {
        data.validate()?;
        self.repository.companies.create(data).await
    }
}
