use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::vendors as vendor_db;
use crate::error::AppError;
use crate::models::users::Roles;
use crate::models::vendors::OnboardVendor;

/// POST /api/vendor/onboard: create the caller's vendor profile, pending
/// admin review. One profile per user.
pub async fn onboard(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    body: web::Json<OnboardVendor>,
) -> Result<HttpResponse, AppError> {
    let owner = user.require_role(Roles::Vendor)?;
    let input = body.into_inner();

    for (field, value) in [
        ("business_name", &input.business_name),
        ("category", &input.category),
        ("city", &input.city),
    ] {
        if value.trim().is_empty() {
            return Err(AppError::invalid(format!("{field} is required")));
        }
    }

    if vendor_db::get_vendor_by_owner(db.get_ref(), owner.id)
        .await?
        .is_some()
    {
        return Err(AppError::Conflict(
            "Vendor profile already exists for this user".to_string(),
        ));
    }

    let vendor = vendor_db::insert_vendor(db.get_ref(), owner.id, input).await?;
    tracing::info!(vendor_id = %vendor.id, owner = %owner.id, "vendor onboarded");
    Ok(HttpResponse::Created().json(vendor))
}
