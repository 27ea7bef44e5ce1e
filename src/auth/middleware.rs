use actix_web::FromRequest;
use actix_web::{HttpRequest, dev::Payload, web};
use actix_web_httpauth::extractors::bearer::BearerAuth;
use sea_orm::DatabaseConnection;
use std::future::Future;
use std::pin::Pin;

use crate::auth::jwt;
use crate::db::users::get_user_by_id;
use crate::error::AppError;
use crate::models::users::{self, Roles};

/// The caller, resolved from the bearer token to a stored user row.
pub struct AuthenticatedUser(pub users::Model);

impl AuthenticatedUser {
    /// Fail with `Forbidden` unless the caller has `role`.
    pub fn require_role(&self, role: Roles) -> Result<&users::Model, AppError> {
        crate::auth::authorization::require_role(&self.0, role)?;
        Ok(&self.0)
    }
}

impl FromRequest for AuthenticatedUser {
    type Error = AppError;
    type Future = Pin<Box<dyn Future<Output = Result<Self, Self::Error>>>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let req = req.clone();

        Box::pin(async move {
            // 1. Extract the Bearer token from the Authorization header.
            let bearer = BearerAuth::extract(&req).await.map_err(|_| {
                AppError::unauthenticated("Authorization header must be: Bearer <token>")
            })?;

            // 2. Validate it with the configured secret.
            let secret = req
                .app_data::<web::Data<JwtSecret>>()
                .ok_or_else(|| AppError::Internal("JWT secret not configured".to_string()))?;

            let claims = jwt::validate_token(bearer.token(), &secret.0)
                .map_err(|_| AppError::unauthenticated("Invalid token"))?;

            let user_id = claims.user_id().map_err(AppError::Unauthenticated)?;

            // 3. Load the user the token was issued for.
            let db = req
                .app_data::<web::Data<DatabaseConnection>>()
                .ok_or_else(|| AppError::Internal("Database not configured".to_string()))?;

            let user = get_user_by_id(db.get_ref(), user_id)
                .await?
                .ok_or_else(|| AppError::unauthenticated("Unknown user"))?;

            Ok(AuthenticatedUser(user))
        })
    }
}

/// Wrapper type to store the JWT secret in Actix app data.
#[derive(Clone)]
pub struct JwtSecret(pub String);
