use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::groups as group_db;
use crate::error::AppError;
use crate::models::groups::CreateGroup;
use crate::slug::generate_slug;

/// POST /api/groups: create a group owned by the caller.
///
/// The slug is derived from name and city; a taken slug answers 409.
pub async fn create_group(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<CreateGroup>,
) -> Result<HttpResponse, AppError> {
    let input = body.into_inner();
    if input.name.trim().is_empty() {
        return Err(AppError::invalid("name is required"));
    }

    let slug = generate_slug(&input.name, input.city.as_deref().unwrap_or(""));
    if slug.is_empty() {
        return Err(AppError::invalid("name must contain letters or digits"));
    }

    let group = group_db::create_group_with_owner(db.get_ref(), user.0.id, input, slug).await?;
    Ok(HttpResponse::Created().json(group))
}

/// GET /api/groups/mine: groups the caller belongs to, with their role.
pub async fn my_groups(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    Ok(HttpResponse::Ok().json(group_db::get_groups_for_user(db.get_ref(), user.0.id).await?))
}
