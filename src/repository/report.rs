use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::report::{
        NewReportDefinition as DomainNewReportDefinition,
        ReportDefinition as DomainReportDefinition,
    },
    models::report::{
        NewReportDefinition as DbNewReportDefinition, ReportDefinition as DbReportDefinition,
    },
    repository::{DieselRepository, ReportReader, ReportWriter},
};

impl ReportReader for DieselRepository {
    fn list_reports(&self) -> RepositoryResult<Vec<DomainReportDefinition>> {
        use crate::schema::report_definitions;

        let mut conn = self.conn()?;

        let items = report_definitions::table
            .order(report_definitions::name.asc())
            .load::<DbReportDefinition>(&mut conn)?;

        Ok(items.into_iter().map(Into::into).collect())
    }

    fn get_report_by_id(&self, id: i32) -> RepositoryResult<Option<DomainReportDefinition>> {
        use crate::schema::report_definitions;

        let mut conn = self.conn()?;

        let report = report_definitions::table
            .filter(report_definitions::id.eq(id))
            .first::<DbReportDefinition>(&mut conn)
            .optional()?;

        Ok(report.map(Into::into))
    }
}

impl ReportWriter for DieselRepository {
    fn create_report(
        &self,
        new_report: &DomainNewReportDefinition,
    ) -> RepositoryResult<DomainReportDefinition> {
        use crate::schema::report_definitions;

        let mut conn = self.conn()?;

        let db_new = DbNewReportDefinition::from(new_report);

        let report = diesel::insert_into(report_definitions::table)
            .values(&db_new)
            .get_result::<DbReportDefinition>(&mut conn)?;

        Ok(report.into())
    }
}
