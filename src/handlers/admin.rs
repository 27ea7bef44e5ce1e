use actix_web::{HttpResponse, web};
use sea_orm::DatabaseConnection;
use uuid::Uuid;

use crate::auth::middleware::AuthenticatedUser;
use crate::db::{metrics, vendors as vendor_db};
use crate::error::AppError;
use crate::models::users::Roles;
use crate::models::vendors::VendorStatus;
use crate::services::QuoteService;

/// GET /api/admin/vendors/pending: profiles awaiting review, oldest first.
pub async fn pending_vendors(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
) -> Result<HttpResponse, AppError> {
    user.require_role(Roles::Admin)?;
    Ok(HttpResponse::Ok().json(vendor_db::get_pending_vendors(db.get_ref()).await?))
}

/// POST /api/admin/vendors/{id}/verify
pub async fn verify_vendor(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    moderate(user, db, path.into_inner(), VendorStatus::Verified).await
}

/// POST /api/admin/vendors/{id}/reject
pub async fn reject_vendor(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    path: web::Path<Uuid>,
) -> Result<HttpResponse, AppError> {
    moderate(user, db, path.into_inner(), VendorStatus::Rejected).await
}

async fn moderate(
    user: AuthenticatedUser,
    db: web::Data<DatabaseConnection>,
    vendor_id: Uuid,
    status: VendorStatus,
) -> Result<HttpResponse, AppError> {
    let admin = user.require_role(Roles::Admin)?;

    let vendor = vendor_db::moderate_vendor(db.get_ref(), vendor_id, status)
        .await?
        .ok_or_else(|| AppError::not_found("Vendor not found or already processed"))?;

    tracing::info!(vendor_id = %vendor.id, admin = %admin.id, ?status, "vendor moderated");
    Ok(HttpResponse::Ok().json(vendor))
}

/// GET /api/admin/metrics/overview: platform-wide counts.
pub async fn metrics_overview(
    user: AuthenticatedUser,
    svc: web::Data<QuoteService>,
) -> Result<HttpResponse, AppError> {
    user.require_role(Roles::Admin)?;
    let today = svc.now().date_naive();
    Ok(HttpResponse::Ok().json(metrics::overview(svc.db(), today).await?))
}
