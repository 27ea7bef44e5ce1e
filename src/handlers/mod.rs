pub mod admin;
pub mod auth;
pub mod events;
pub mod groups;
pub mod health;
pub mod media;
pub mod quotes;
pub mod track;
pub mod vendors;

use actix_web::{ResponseError, error::InternalError, web};

use crate::error::AppError;

pub fn init_routes(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health::health));

    // ── Auth routes (protected by JWT via the AuthenticatedUser extractor) ──
    cfg.service(web::scope("/auth").route("/me", web::get().to(auth::me)));

    // ── Quote lifecycle ──
    cfg.service(
        web::scope("/quotes")
            .route("/request", web::post().to(quotes::create_quote))
            .route("/vendor", web::get().to(quotes::vendor_quotes))
            .route("/organizer", web::get().to(quotes::organizer_quotes))
            .route("/respond/{id}", web::patch().to(quotes::respond))
            .route("/accept/{id}", web::patch().to(quotes::accept))
            .route("/reject/{id}", web::patch().to(quotes::reject))
            .route("/revision/{id}", web::patch().to(quotes::request_revision))
            .route("/request-revision/{id}", web::patch().to(quotes::request_revision))
            .route("/{id}", web::get().to(quotes::get_quote))
            .route("/{id}/contact", web::get().to(quotes::contact))
            .route("/{id}/attachment", web::get().to(quotes::attachment)),
    );

    // ── Events ──
    cfg.service(
        web::scope("/events")
            .route("", web::post().to(events::create_event))
            .route("/mine", web::get().to(events::my_events)),
    );

    // ── Vendor onboarding ──
    cfg.route("/vendor/onboard", web::post().to(vendors::onboard));

    // ── Admin (role checked per handler) ──
    cfg.service(
        web::scope("/admin")
            .route("/vendors/pending", web::get().to(admin::pending_vendors))
            .route("/vendors/{id}/verify", web::post().to(admin::verify_vendor))
            .route("/vendors/{id}/reject", web::post().to(admin::reject_vendor))
            .route("/metrics/overview", web::get().to(admin::metrics_overview)),
    );

    // ── Groups ──
    cfg.service(
        web::scope("/groups")
            .route("", web::post().to(groups::create_group))
            .route("/mine", web::get().to(groups::my_groups)),
    );

    // The upload handler reads its own body, capped at the attachment limit.
    cfg.route("/media/upload", web::post().to(media::upload));

    cfg.route("/track/activity", web::post().to(track::track_activity));
}

/// Malformed JSON bodies answer 400 in the usual `{"error"}` shape.
pub fn json_config() -> web::JsonConfig {
    web::JsonConfig::default().error_handler(|err, _req| {
        let response = AppError::invalid(err.to_string()).error_response();
        InternalError::from_response(err, response).into()
    })
}

/// Unparseable path segments (e.g. a non-UUID id) answer 400.
pub fn path_config() -> web::PathConfig {
    web::PathConfig::default().error_handler(|err, _req| {
        let response = AppError::invalid(err.to_string()).error_response();
        InternalError::from_response(err, response).into()
    })
}

pub fn query_config() -> web::QueryConfig {
    web::QueryConfig::default().error_handler(|err, _req| {
        let response = AppError::invalid(err.to_string()).error_response();
        InternalError::from_response(err, response).into()
    })
}
