//! Repository layer for database operations
//!
//! Read paths use the pool directly. Operations that take part in a
//! multi-record write accept a `&mut PgConnection`, so the service layer can
//! run them inside one transaction.

pub mod assignments;
pub mod companies;
pub mod documents;
pub mod drivers;
pub mod inspections;
pub mod maintenance;
pub mod trailers;
pub mod users;
pub mod vehicles;

use sqlx::{Pool, Postgres, Transaction};

use crate::error::AppResult;

/// Main repository struct holding database connection pool
#[derive(Clone)]
pub struct Repository {
    pub pool: Pool<Postgres>,
    pub companies: companies::CompaniesRepository,
    pub drivers: drivers::DriversRepository,
    pub vehicles: vehicles::VehiclesRepository,
    pub trailers: trailers::TrailersRepository,
    pub assignments: assignments::AssignmentsRepository,
    pub maintenance: maintenance::MaintenanceRepository,
    pub documents: documents::DocumentsRepository,
    pub inspections: inspections::InspectionsRepository,
    pub users: users::UsersRepository,
}

impl Repository {
    /// Create a new repository with the given database pool
    pub fn new(pool: Pool<Postgres>) -> Self {
        Self {
            companies: companies::CompaniesRepository::new(pool.clone()),
            drivers: drivers::DriversRepository::new(pool.clone()),
            vehicles: vehicles::VehiclesRepository::new(pool.clone()),
            trailers: trailers::TrailersRepository::new(pool.clone()),
            assignments: assignments::AssignmentsRepository::new(pool.clone()),
            maintenance: maintenance::MaintenanceRepository::new(pool.clone()),
            documents: documents::DocumentsRepository::new(pool.clone()),
            inspections: inspections::InspectionsRepository::new(pool.clone()),
            users: users::UsersRepository::new(pool.clone()),
            pool,
        }
    }

    /// Start a transaction
    pub async fn begin(&self) -> AppResult<Transaction<'static, Postgres>> {
        Ok(self.pool.begin().await?)
    }
}

/// Builds `SET col = $n, ...` fragments for partial updates, keeping track of
/// placeholder numbering.
pub(crate) struct SetClause {
    sets: Vec<String>,
    next: usize,
}

impl SetClause {
    pub fn new() -> Self {
        Self { sets: Vec::new(), next: 1 }
    }

    /// Register `column` when the field is present
    pub fn add<T>(&mut self, field: &Option<T>, column: &str) {
        if field.is_some() {
            self.sets.push(format!("{} = ${}", column, self.next));
            self.next += 1;
        }
    }

    pub fn is_empty(&self) -> bool {
        self.sets.is_empty()
    }

    /// Full UPDATE statement; the row id is bound last
    pub fn update_sql(&self, table: &str) -> String {
        format!(
            "UPDATE {} SET {} WHERE id = ${} RETURNING *",
            table,
            self.sets.join(", "),
            self.next
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_set_clause_numbering() {
        let mut clause = SetClause::new();
        clause.add(&Some("Volvo"), "brand");
        clause.add::<i32>(&None, "year");
        clause.add(&Some(true), "active");
        assert_eq!(
            clause.update_sql("vehicles"),
            "UPDATE vehicles SET brand = $1, active = $2 WHERE id = $3 RETURNING *"
        );
    }

    #[test]
    fn test_set_clause_empty() {
        let clause = SetClause::new();
        assert!(clause.is_empty());
    }
}
