//! Shared fixtures: an in-memory SQLite database with migrations applied, a
//! recording activity sink, an in-memory attachment store and a clock the
//! test controls.
#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Duration, NaiveDate, TimeZone, Utc};
use jsonwebtoken::{Algorithm, EncodingKey, Header, encode};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::collections::HashSet;
use std::sync::{Arc, Mutex};
use uuid::Uuid;

use bventy_backend::activity::{ActivityEntry, ActivitySink};
use bventy_backend::auth::jwt::Claims;
use bventy_backend::clock::Clock;
use bventy_backend::db::{events as event_db, users as user_db, vendors as vendor_db};
use bventy_backend::models::events::{self, CreateEvent};
use bventy_backend::models::quotes::{self, CreateQuoteRequest};
use bventy_backend::models::users::{self, Roles};
use bventy_backend::models::vendors::{self, OnboardVendor};
use bventy_backend::services::QuoteService;
use bventy_backend::storage::{
    AttachmentError, AttachmentStore, Upload, object_key, validate_prefix, validate_upload,
};

pub const JWT_SECRET: &str = "test-secret-at-least-256-bits-long-for-hs256-xxxxxxx";

// ── Collaborators ──

#[derive(Default)]
pub struct RecordingSink {
    entries: Mutex<Vec<ActivityEntry>>,
}

impl RecordingSink {
    pub fn entries(&self) -> Vec<ActivityEntry> {
        self.entries.lock().unwrap().clone()
    }

    /// Action types logged for one quote, in order.
    pub fn actions_for(&self, quote_id: Uuid) -> Vec<String> {
        let id = quote_id.to_string();
        self.entries()
            .into_iter()
            .filter(|e| e.entity_type == "quote" && e.entity_id == id)
            .map(|e| e.action_type)
            .collect()
    }
}

impl ActivitySink for RecordingSink {
    fn record(&self, entry: ActivityEntry) {
        self.entries.lock().unwrap().push(entry);
    }
}

#[derive(Default)]
pub struct MemoryStore {
    objects: Mutex<HashSet<String>>,
}

#[async_trait]
impl AttachmentStore for MemoryStore {
    async fn store(&self, upload: Upload, prefix: &str) -> Result<String, AttachmentError> {
        let ext = validate_upload(&upload)?;
        validate_prefix(prefix)?;
        let key = object_key(prefix, &ext);
        self.objects.lock().unwrap().insert(key.clone());
        Ok(key)
    }

    async fn sign(&self, reference: &str) -> Result<String, AttachmentError> {
        Ok(format!("https://storage.test/signed/{reference}?token=t"))
    }
}

pub struct FixedClock {
    now: Mutex<DateTime<Utc>>,
}

impl FixedClock {
    pub fn at(now: DateTime<Utc>) -> Self {
        Self {
            now: Mutex::new(now),
        }
    }

    pub fn set(&self, now: DateTime<Utc>) {
        *self.now.lock().unwrap() = now;
    }

    pub fn advance(&self, by: Duration) {
        *self.now.lock().unwrap() += by;
    }
}

impl Clock for FixedClock {
    fn now(&self) -> DateTime<Utc> {
        *self.now.lock().unwrap()
    }
}

// ── Environment ──

pub struct TestEnv {
    pub db: DatabaseConnection,
    pub service: QuoteService,
    pub activity: Arc<RecordingSink>,
    pub clock: Arc<FixedClock>,
}

/// Midday on 2025-05-02, the default "now" of every test.
pub fn start_time() -> DateTime<Utc> {
    Utc.with_ymd_and_hms(2025, 5, 2, 12, 0, 0).unwrap()
}

pub fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

pub async fn setup_db() -> DatabaseConnection {
    // One connection, or every checkout would see its own empty database.
    let mut opts = ConnectOptions::new("sqlite::memory:");
    opts.max_connections(1)
        .min_connections(1)
        .sqlx_logging(false);
    let db = Database::connect(opts).await.expect("sqlite connect");
    Migrator::up(&db, None).await.expect("migrations");
    db
}

pub async fn setup() -> TestEnv {
    let db = setup_db().await;
    let activity = Arc::new(RecordingSink::default());
    let clock = Arc::new(FixedClock::at(start_time()));
    let service = QuoteService::new(
        db.clone(),
        activity.clone(),
        Arc::new(MemoryStore::default()),
        clock.clone(),
    );

    TestEnv {
        db,
        service,
        activity,
        clock,
    }
}

// ── Seed data ──

pub async fn organizer(db: &DatabaseConnection, name: &str) -> users::Model {
    let email = format!("{}@organizers.test", name.to_lowercase());
    user_db::insert_user(db, &email, name, Some("+91 90000 00001"), Roles::Organizer)
        .await
        .unwrap()
}

pub async fn admin(db: &DatabaseConnection) -> users::Model {
    user_db::insert_user(db, "admin@bventy.test", "Admin", None, Roles::Admin)
        .await
        .unwrap()
}

/// A vendor user with an onboarded profile.
pub async fn vendor(db: &DatabaseConnection, business: &str) -> (users::Model, vendors::Model) {
    let email = format!("{}@vendors.test", business.to_lowercase().replace(' ', "."));
    let user = user_db::insert_user(db, &email, business, Some("+91 90000 00002"), Roles::Vendor)
        .await
        .unwrap();
    let profile = vendor_db::insert_vendor(
        db,
        user.id,
        OnboardVendor {
            business_name: business.to_string(),
            category: "catering".to_string(),
            city: "Pune".to_string(),
            bio: None,
            whatsapp_link: Some("https://wa.me/919000000002".to_string()),
        },
    )
    .await
    .unwrap();
    (user, profile)
}

pub async fn event(
    db: &DatabaseConnection,
    owner: &users::Model,
    event_date: Option<NaiveDate>,
) -> events::Model {
    event_db::insert_event(
        db,
        owner.id,
        CreateEvent {
            title: "Sangeet Night".to_string(),
            event_date,
            city: Some("Pune".to_string()),
        },
        start_time(),
    )
    .await
    .unwrap()
}

pub fn request_for(event_id: Uuid, vendor_id: Uuid) -> CreateQuoteRequest {
    CreateQuoteRequest {
        event_id: Some(event_id),
        event: None,
        vendor_id,
        message: "Need catering for 150 guests".to_string(),
        budget_range: Some("1L-2L".to_string()),
        special_requirements: None,
        deadline: None,
    }
}

/// Fixture for the common path: organizer, vendor, event and a pending quote.
pub struct Scenario {
    pub organizer: users::Model,
    pub vendor_user: users::Model,
    pub vendor: vendors::Model,
    pub event: events::Model,
    pub quote: quotes::Model,
}

pub async fn pending_quote(env: &TestEnv, event_date: Option<NaiveDate>) -> Scenario {
    let organizer = organizer(&env.db, "Asha").await;
    let (vendor_user, vendor) = vendor(&env.db, "Spice Route").await;
    let event = event(&env.db, &organizer, event_date).await;
    let quote = env
        .service
        .create(&organizer, request_for(event.id, vendor.id))
        .await
        .unwrap();

    Scenario {
        organizer,
        vendor_user,
        vendor,
        event,
        quote,
    }
}

/// As [`pending_quote`], then responded and accepted.
pub async fn accepted_quote(env: &TestEnv, event_date: Option<NaiveDate>) -> Scenario {
    let mut s = pending_quote(env, event_date).await;
    env.service
        .respond(&s.vendor_user, s.quote.id, respond_with(25_000.0))
        .await
        .unwrap();
    s.quote = env.service.accept(&s.organizer, s.quote.id).await.unwrap();
    s
}

pub fn respond_with(price: f64) -> quotes::RespondQuote {
    quotes::RespondQuote {
        quoted_price: price,
        vendor_response: Some("Veg and non-veg menu included".to_string()),
        attachment_url: None,
    }
}

pub fn token_for(user: &users::Model) -> String {
    let now = Utc::now().timestamp() as usize;
    let claims = Claims {
        sub: user.id.to_string(),
        exp: now + 3600,
        iat: Some(now),
        email: Some(user.email.clone()),
        role: None,
    };
    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .unwrap()
}
