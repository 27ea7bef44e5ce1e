//! Routes end to end through actix's test service.
mod common;

use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use common::*;
use serde_json::{Value, json};

use bventy_backend::auth::middleware::JwtSecret;
use bventy_backend::handlers;
use bventy_backend::storage::MAX_ATTACHMENT_BYTES;

macro_rules! app {
    ($env:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($env.db.clone()))
                .app_data(web::Data::new(JwtSecret(JWT_SECRET.to_string())))
                .app_data(web::Data::new($env.service.clone()))
                .app_data(handlers::json_config())
                .app_data(handlers::path_config())
                .app_data(handlers::query_config())
                .service(web::scope("/api").configure(handlers::init_routes)),
        )
        .await
    };
}

#[actix_web::test]
async fn health_is_public() {
    let env = setup().await;
    let app = app!(env);

    let resp = test::call_service(&app, test::TestRequest::get().uri("/api/health").to_request()).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!({ "status": "ok" }));
}

#[actix_web::test]
async fn missing_token_is_401_with_error_body() {
    let env = setup().await;
    let app = app!(env);

    let req = test::TestRequest::get().uri("/api/quotes/organizer").to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::get()
        .uri("/api/quotes/organizer")
        .insert_header(("Authorization", "Bearer not-a-jwt"))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
}

#[actix_web::test]
async fn empty_listing_is_an_empty_array() {
    let env = setup().await;
    let org = organizer(&env.db, "Asha").await;
    let app = app!(env);

    let req = test::TestRequest::get()
        .uri("/api/quotes/organizer")
        .insert_header(("Authorization", format!("Bearer {}", token_for(&org))))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body, json!([]));
}

#[actix_web::test]
async fn malformed_input_is_400() {
    let env = setup().await;
    let org = organizer(&env.db, "Asha").await;
    let (vendor_user, _) = vendor(&env.db, "Spice Route").await;
    let app = app!(env);

    let req = test::TestRequest::post()
        .uri("/api/quotes/request")
        .insert_header(("Authorization", format!("Bearer {}", token_for(&org))))
        .insert_header(("Content-Type", "application/json"))
        .set_payload("{not json")
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body: Value = test::read_body_json(resp).await;
    assert!(body["error"].is_string());

    let req = test::TestRequest::patch()
        .uri("/api/quotes/respond/not-a-uuid")
        .insert_header(("Authorization", format!("Bearer {}", token_for(&vendor_user))))
        .set_json(json!({ "quoted_price": 10.0 }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
}

#[actix_web::test]
async fn quote_flow_over_http() {
    let env = setup().await;
    let org = organizer(&env.db, "Asha").await;
    let (vendor_user, profile) = vendor(&env.db, "Spice Route").await;
    let app = app!(env);
    let org_auth = ("Authorization", format!("Bearer {}", token_for(&org)));
    let vendor_auth = ("Authorization", format!("Bearer {}", token_for(&vendor_user)));

    let req = test::TestRequest::post()
        .uri("/api/quotes/request")
        .insert_header(org_auth.clone())
        .set_json(json!({
            "vendor_id": profile.id,
            "message": "Catering for 80",
            "event": { "title": "Housewarming", "event_date": "2025-07-20" }
        }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::patch()
        .uri(&format!("/api/quotes/respond/{id}"))
        .insert_header(vendor_auth.clone())
        .set_json(json!({ "quoted_price": 18000.0, "vendor_response": "Buffet" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);

    let req = test::TestRequest::patch()
        .uri(&format!("/api/quotes/accept/{id}"))
        .insert_header(org_auth.clone())
        .to_request();
    let accepted: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(accepted["status"], "accepted");
    assert!(accepted["contact_expires_at"].as_str().unwrap().starts_with("2025-08-04T00:00:00"));

    let req = test::TestRequest::get()
        .uri(&format!("/api/quotes/{id}/contact"))
        .insert_header(vendor_auth.clone())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let card: Value = test::read_body_json(resp).await;
    assert_eq!(card["organizer"]["name"], "Asha");
    assert_eq!(card["vendor"]["whatsapp"], "https://wa.me/919000000002");

    let req = test::TestRequest::patch()
        .uri(&format!("/api/quotes/respond/{id}"))
        .insert_header(vendor_auth.clone())
        .set_json(json!({ "quoted_price": 1.0 }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CONFLICT);
    let body: Value = test::read_body_json(resp).await;
    assert_eq!(body["error"], "Cannot respond to a quote that is accepted");

    let req = test::TestRequest::get()
        .uri("/api/quotes/vendor")
        .insert_header(vendor_auth)
        .to_request();
    let listed: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(listed[0]["event_title"], "Housewarming");
    assert_eq!(listed[0]["organizer_name"], "Asha");
}

#[actix_web::test]
async fn me_reports_vendor_profile() {
    let env = setup().await;
    let (vendor_user, _) = vendor(&env.db, "Spice Route").await;
    let app = app!(env);

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(("Authorization", format!("Bearer {}", token_for(&vendor_user))))
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["role"], "vendor");
    assert_eq!(me["vendor_profile_exists"], true);
    assert_eq!(me["groups"], json!([]));
}

#[actix_web::test]
async fn me_lists_group_memberships() {
    let env = setup().await;
    let org = organizer(&env.db, "Asha").await;
    let app = app!(env);
    let auth = ("Authorization", format!("Bearer {}", token_for(&org)));

    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(auth.clone())
        .set_json(json!({ "name": "Wedding Planners", "city": "Pune" }))
        .to_request();
    let group: Value = test::call_and_read_body_json(&app, req).await;

    let req = test::TestRequest::get()
        .uri("/api/auth/me")
        .insert_header(auth)
        .to_request();
    let me: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(me["vendor_profile_exists"], false);
    let groups = me["groups"].as_array().unwrap();
    assert_eq!(groups.len(), 1);
    assert_eq!(groups[0]["id"], group["id"]);
    assert_eq!(groups[0]["name"], "Wedding Planners");
    assert_eq!(groups[0]["slug"], "wedding-planners-pune");
    assert_eq!(groups[0]["role"], "owner");
}

#[actix_web::test]
async fn tracking_accepts_anonymous_callers() {
    let env = setup().await;
    let activity = env.activity.clone();
    let app = app!(env);

    let req = test::TestRequest::post()
        .uri("/api/track/activity")
        .set_json(json!({
            "entity_type": "vendor",
            "entity_id": "abc",
            "action_type": "profile_viewed"
        }))
        .to_request();
    let body: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(body, json!({ "status": "tracked" }));

    let entries = activity.entries();
    assert_eq!(entries.len(), 1);
    assert_eq!(entries[0].action_type, "profile_viewed");
    assert!(entries[0].actor_user_id.is_none());
}

#[actix_web::test]
async fn tracking_requires_entity_and_action() {
    let env = setup().await;
    let activity = env.activity.clone();
    let app = app!(env);

    let blanks = [
        json!({ "entity_type": "", "entity_id": "abc", "action_type": "profile_viewed" }),
        json!({ "entity_type": "vendor", "entity_id": "  ", "action_type": "profile_viewed" }),
        json!({ "entity_type": "vendor", "entity_id": "abc", "action_type": "" }),
    ];
    for body in blanks {
        let req = test::TestRequest::post()
            .uri("/api/track/activity")
            .set_json(&body)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::BAD_REQUEST, "{body}");
        let err: Value = test::read_body_json(resp).await;
        assert!(err["error"].is_string());
    }
    assert!(activity.entries().is_empty());
}

#[actix_web::test]
async fn uploads_are_capped_and_land_in_the_quote_area() {
    let env = setup().await;
    let (vendor_user, _) = vendor(&env.db, "Spice Route").await;
    let app = app!(env);
    let auth = ("Authorization", format!("Bearer {}", token_for(&vendor_user)));

    let req = test::TestRequest::post()
        .uri("/api/media/upload?filename=menu.pdf")
        .insert_header(auth.clone())
        .insert_header(("Content-Type", "application/pdf"))
        .set_payload(vec![b'x'; MAX_ATTACHMENT_BYTES + 1])
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let err: Value = test::read_body_json(resp).await;
    assert_eq!(err["error"], "File too large (max 5MB)");

    let req = test::TestRequest::post()
        .uri("/api/media/upload?filename=menu.pdf")
        .insert_header(auth)
        .insert_header(("Content-Type", "application/pdf"))
        .set_payload(b"%PDF-1.4".to_vec())
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body: Value = test::read_body_json(resp).await;
    let reference = body["reference"].as_str().unwrap();
    assert!(reference.starts_with("quotes/"));
    assert!(reference.ends_with(".pdf"));
}

#[actix_web::test]
async fn onboarding_and_moderation() {
    let env = setup().await;
    let vendor_user = bventy_backend::db::users::insert_user(
        &env.db,
        "dj@vendors.test",
        "DJ Nik",
        None,
        bventy_backend::models::users::Roles::Vendor,
    )
    .await
    .unwrap();
    let admin = admin(&env.db).await;
    let app = app!(env);
    let vendor_auth = ("Authorization", format!("Bearer {}", token_for(&vendor_user)));
    let admin_auth = ("Authorization", format!("Bearer {}", token_for(&admin)));
    let profile = json!({ "business_name": "DJ Nik", "category": "music", "city": "Goa" });

    let req = test::TestRequest::post()
        .uri("/api/vendor/onboard")
        .insert_header(vendor_auth.clone())
        .set_json(&profile)
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let created: Value = test::read_body_json(resp).await;
    assert_eq!(created["status"], "pending");
    let id = created["id"].as_str().unwrap().to_string();

    let req = test::TestRequest::post()
        .uri("/api/vendor/onboard")
        .insert_header(vendor_auth.clone())
        .set_json(&profile)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/admin/vendors/pending")
        .insert_header(vendor_auth)
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

    let req = test::TestRequest::get()
        .uri("/api/admin/vendors/pending")
        .insert_header(admin_auth.clone())
        .to_request();
    let pending: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(pending.as_array().unwrap().len(), 1);

    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/vendors/{id}/verify"))
        .insert_header(admin_auth.clone())
        .to_request();
    let verified: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(verified["status"], "verified");

    // Already processed.
    let req = test::TestRequest::post()
        .uri(&format!("/api/admin/vendors/{id}/reject"))
        .insert_header(admin_auth.clone())
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);

    let req = test::TestRequest::get()
        .uri("/api/admin/metrics/overview")
        .insert_header(admin_auth)
        .to_request();
    let overview: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(overview["verified_vendors"], 1);
    assert_eq!(overview["pending_vendors"], 0);
}

#[actix_web::test]
async fn groups_get_unique_slugs() {
    let env = setup().await;
    let org = organizer(&env.db, "Asha").await;
    let app = app!(env);
    let auth = ("Authorization", format!("Bearer {}", token_for(&org)));

    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(auth.clone())
        .set_json(json!({ "name": "Wedding Planners!", "city": "Pune" }))
        .to_request();
    let resp = test::call_service(&app, req).await;
    assert_eq!(resp.status(), StatusCode::CREATED);
    let group: Value = test::read_body_json(resp).await;
    assert_eq!(group["slug"], "wedding-planners-pune");

    let req = test::TestRequest::post()
        .uri("/api/groups")
        .insert_header(auth.clone())
        .set_json(json!({ "name": "wedding planners", "city": "PUNE" }))
        .to_request();
    assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CONFLICT);

    let req = test::TestRequest::get()
        .uri("/api/groups/mine")
        .insert_header(auth)
        .to_request();
    let mine: Value = test::call_and_read_body_json(&app, req).await;
    assert_eq!(mine[0]["role"], "owner");
}
