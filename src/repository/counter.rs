use chrono::Local;
use diesel::prelude::*;
use diesel::sqlite::SqliteConnection;
use pushkind_common::repository::errors::{RepositoryError, RepositoryResult};

use crate::domain::order::OrderCounter as DomainOrderCounter;
use crate::domain::project::Project as DomainProject;
use crate::models::order::{NewOrderCounter, OrderCounter as DbOrderCounter};
use crate::models::project::Project as DbProject;
use crate::repository::{DieselRepository, OrderNumbering};

/// Increment the counter of `project_id` and return the new value.
///
/// Must run inside a write transaction (`BEGIN IMMEDIATE`): the database
/// write lock is held from before the counter is read until commit, so no
/// two callers can observe the same value.
pub(crate) fn increment_counter(conn: &mut SqliteConnection, project_id: i32) -> QueryResult<i32> {
    use crate::schema::order_counters;

    diesel::insert_or_ignore_into(order_counters::table)
        .values(&NewOrderCounter {
            project_id,
            last_number: 0,
        })
        .execute(conn)?;

    diesel::update(order_counters::table.filter(order_counters::project_id.eq(project_id)))
        .set((
            order_counters::last_number.eq(order_counters::last_number + 1),
            order_counters::updated_at.eq(Local::now().naive_utc()),
        ))
        .returning(order_counters::last_number)
        .get_result::<i32>(conn)
}

/// Consume the next number of `project_id` and format it as an order code.
pub(crate) fn next_order_code(
    conn: &mut SqliteConnection,
    project_id: i32,
) -> RepositoryResult<String> {
    use crate::schema::projects;

    let project = projects::table
        .filter(projects::id.eq(project_id))
        .select(DbProject::as_select())
        .first::<DbProject>(conn)
        .optional()?
        .ok_or(RepositoryError::NotFound)?;

    let number = increment_counter(conn, project_id)?;
    let project = DomainProject::from(project);

    Ok(project.order_code(number))
}

impl OrderNumbering for DieselRepository {
    fn get_next_number(&self, project_id: i32) -> RepositoryResult<i32> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<i32, RepositoryError, _>(|conn| {
            Ok(increment_counter(conn, project_id)?)
        })
    }

    fn generate_order_code(&self, project_id: i32) -> RepositoryResult<String> {
        let mut conn = self.conn()?;

        conn.immediate_transaction::<String, RepositoryError, _>(|conn| {
            next_order_code(conn, project_id)
        })
    }

    fn get_order_counter(&self, project_id: i32) -> RepositoryResult<Option<DomainOrderCounter>> {
        use crate::schema::order_counters;

        let mut conn = self.conn()?;

        let counter = order_counters::table
            .filter(order_counters::project_id.eq(project_id))
            .first::<DbOrderCounter>(&mut conn)
            .optional()?;

        Ok(counter.map(DomainOrderCounter::from))
    }
}
