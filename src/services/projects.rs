use pushkind_common::domain::auth::AuthenticatedUser;
use pushkind_common::routes::check_role;

use crate::SERVICE_ACCESS_ROLE;
use crate::domain::project::Project;
use crate::repository::ProjectReader;
use crate::services::{ServiceError, ServiceResult};

/// Projects the user is a member of within their hub, ordered by id.
pub fn list_projects<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Project>>
where
    R: ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    accessible_projects(repo, user)
}

/// The project used when a single project must be chosen for the user.
pub fn current_project<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Project>
where
    R: ProjectReader + ?Sized,
{
    if !check_role(SERVICE_ACCESS_ROLE, &user.roles) {
        return Err(ServiceError::Unauthorized);
    }

    first_project(repo, user)?.ok_or(ServiceError::Unauthorized)
}

pub(crate) fn accessible_projects<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<Project>>
where
    R: ProjectReader + ?Sized,
{
    repo.list_projects_for_user(user.hub_id, &user.email)
        .map_err(ServiceError::from)
}

pub(crate) fn accessible_project_ids<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Vec<i32>>
where
    R: ProjectReader + ?Sized,
{
    Ok(accessible_projects(repo, user)?
        .iter()
        .map(|project| project.id)
        .collect())
}

/// First accessible project by ascending id, if any.
pub(crate) fn first_project<R>(repo: &R, user: &AuthenticatedUser) -> ServiceResult<Option<Project>>
where
    R: ProjectReader + ?Sized,
{
    Ok(accessible_projects(repo, user)?.into_iter().next())
}
