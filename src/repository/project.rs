use diesel::prelude::*;
use pushkind_common::repository::errors::RepositoryResult;

use crate::{
    domain::project::{NewProject as DomainNewProject, Project as DomainProject},
    models::project::{NewProject as DbNewProject, NewProjectMember, Project as DbProject},
    repository::{DieselRepository, ProjectReader, ProjectWriter},
};

impl ProjectReader for DieselRepository {
    fn list_projects_for_user(
        &self,
        hub_id: i32,
        user_email: &str,
    ) -> RepositoryResult<Vec<DomainProject>> {
        use crate::schema::{project_members, projects};

        let mut conn = self.conn()?;

        let items = projects::table
            .inner_join(project_members::table)
            .filter(projects::hub_id.eq(hub_id))
            .filter(project_members::user_email.eq(user_email))
            .select(DbProject::as_select())
            .order(projects::id.asc())
            .load::<DbProject>(&mut conn)?;

        Ok(items.into_iter().map(DomainProject::from).collect())
    }

    fn get_project_by_id(&self, project_id: i32) -> RepositoryResult<Option<DomainProject>> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let project = projects::table
            .filter(projects::id.eq(project_id))
            .select(DbProject::as_select())
            .first::<DbProject>(&mut conn)
            .optional()?;

        Ok(project.map(DomainProject::from))
    }
}

impl ProjectWriter for DieselRepository {
    fn create_project(&self, new_project: &DomainNewProject) -> RepositoryResult<DomainProject> {
        use crate::schema::projects;

        let mut conn = self.conn()?;

        let db_new = DbNewProject::from(new_project);

        let project = diesel::insert_into(projects::table)
            .values(&db_new)
            .returning(DbProject::as_returning())
            .get_result::<DbProject>(&mut conn)?;

        Ok(project.into())
    }

    fn add_project_member(&self, project_id: i32, user_email: &str) -> RepositoryResult<()> {
        use crate::schema::project_members;

        let mut conn = self.conn()?;

        diesel::insert_or_ignore_into(project_members::table)
            .values(&NewProjectMember {
                project_id,
                user_email,
            })
            .execute(&mut conn)?;

        Ok(())
    }
}
