use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::{groups, vendors};
use crate::error::AppError;
use crate::models::users::UserResponse;

/// GET /api/auth/me: the authenticated user's profile, whether they have
/// onboarded a vendor profile, and the groups they belong to.
pub async fn me(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    let has_profile = vendors::get_vendor_by_owner(db.get_ref(), user.0.id)
        .await?
        .is_some();
    let groups = groups::get_groups_for_user(db.get_ref(), user.0.id).await?;
    Ok(HttpResponse::Ok().json(UserResponse::new(user.0, has_profile, groups)))
}
