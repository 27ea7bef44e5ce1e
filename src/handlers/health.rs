use actix_web::HttpResponse;

/// GET /api/health: liveness probe, no auth.
pub async fn health() -> HttpResponse {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}
