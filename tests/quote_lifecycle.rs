//! Quote transitions driven through the service against SQLite.
mod common;

use chrono::{Duration, TimeZone, Utc};
use common::*;

use bventy_backend::db::events as event_db;
use bventy_backend::db::quotes as quote_db;
use bventy_backend::error::AppError;
use bventy_backend::models::events::CreateEvent;
use bventy_backend::models::quotes::{QuoteStatus, RespondQuote, Transition};
use uuid::Uuid;

#[tokio::test]
async fn new_quote_is_pending_and_logged() {
    let env = setup().await;
    let s = pending_quote(&env, Some(date(2025, 6, 1))).await;

    assert_eq!(s.quote.status, QuoteStatus::Pending);
    assert_eq!(s.quote.organizer_user_id, s.organizer.id);
    assert_eq!(s.quote.vendor_id, s.vendor.id);
    assert_eq!(s.quote.created_at, start_time());
    assert!(s.quote.contact_expires_at.is_none());
    assert_eq!(env.activity.actions_for(s.quote.id), vec!["quote_created"]);
}

#[tokio::test]
async fn inline_event_is_created_with_the_quote() {
    let env = setup().await;
    let org = organizer(&env.db, "Meera").await;
    let (_, profile) = vendor(&env.db, "Lens Studio").await;

    let mut req = request_for(Uuid::nil(), profile.id);
    req.event_id = None;
    req.event = Some(CreateEvent {
        title: "Engagement".to_string(),
        event_date: Some(date(2025, 8, 10)),
        city: None,
    });

    let quote = env.service.create(&org, req).await.unwrap();
    let event = event_db::get_event_by_id(&env.db, quote.event_id)
        .await
        .unwrap()
        .expect("inline event stored");
    assert_eq!(event.organizer_user_id, org.id);
    assert_eq!(event.title, "Engagement");
}

#[tokio::test]
async fn create_validates_before_persisting() {
    let env = setup().await;
    let org = organizer(&env.db, "Meera").await;
    let (vendor_user, profile) = vendor(&env.db, "Lens Studio").await;
    let ev = event(&env.db, &org, None).await;

    let mut neither = request_for(ev.id, profile.id);
    neither.event_id = None;
    assert!(matches!(
        env.service.create(&org, neither).await,
        Err(AppError::InvalidArgument(_))
    ));

    let mut both = request_for(ev.id, profile.id);
    both.event = Some(CreateEvent {
        title: "Dup".to_string(),
        event_date: None,
        city: None,
    });
    assert!(matches!(
        env.service.create(&org, both).await,
        Err(AppError::InvalidArgument(_))
    ));

    let mut blank = request_for(ev.id, profile.id);
    blank.message = "   ".to_string();
    assert!(matches!(
        env.service.create(&org, blank).await,
        Err(AppError::InvalidArgument(_))
    ));

    assert!(matches!(
        env.service.create(&org, request_for(ev.id, Uuid::new_v4())).await,
        Err(AppError::NotFound(_))
    ));
    assert!(matches!(
        env.service.create(&vendor_user, request_for(ev.id, profile.id)).await,
        Err(AppError::Forbidden(_))
    ));

    assert!(quote_db::get_quotes_by_organizer(&env.db, org.id)
        .await
        .unwrap()
        .is_empty());
    assert!(env.activity.entries().is_empty());
}

#[tokio::test]
async fn cannot_quote_on_someone_elses_event() {
    let env = setup().await;
    let owner = organizer(&env.db, "Asha").await;
    let intruder = organizer(&env.db, "Ravi").await;
    let (_, profile) = vendor(&env.db, "Spice Route").await;
    let ev = event(&env.db, &owner, None).await;

    let err = env
        .service
        .create(&intruder, request_for(ev.id, profile.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = env
        .service
        .create(&owner, request_for(Uuid::new_v4(), profile.id))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::NotFound(_)));
}

#[tokio::test]
async fn vendor_response_sets_price_and_timestamp() {
    let env = setup().await;
    let s = pending_quote(&env, None).await;
    env.clock.advance(Duration::hours(3));

    let quote = env
        .service
        .respond(&s.vendor_user, s.quote.id, respond_with(48_500.0))
        .await
        .unwrap();

    assert_eq!(quote.status, QuoteStatus::Responded);
    assert_eq!(quote.quoted_price, Some(48_500.0));
    assert_eq!(
        quote.vendor_response.as_deref(),
        Some("Veg and non-veg menu included")
    );
    assert_eq!(quote.responded_at, Some(start_time() + Duration::hours(3)));
    assert_eq!(
        env.activity.actions_for(s.quote.id),
        vec!["quote_created", "quote_responded"]
    );
}

#[tokio::test]
async fn only_the_targeted_vendor_may_respond() {
    let env = setup().await;
    let s = pending_quote(&env, None).await;
    let (other_vendor, _) = vendor(&env.db, "Other Caterer").await;

    let err = env
        .service
        .respond(&other_vendor, s.quote.id, respond_with(1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let err = env
        .service
        .respond(&s.organizer, s.quote.id, respond_with(1.0))
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Forbidden(_)));

    let untouched = quote_db::get_quote_by_id(&env.db, s.quote.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(untouched.status, QuoteStatus::Pending);
}

#[tokio::test]
async fn response_payload_is_validated() {
    let env = setup().await;
    let s = pending_quote(&env, None).await;

    for bad in [-1.0, f64::NAN, f64::INFINITY] {
        let err = env
            .service
            .respond(&s.vendor_user, s.quote.id, respond_with(bad))
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)), "price {bad}");
    }

    let err = env
        .service
        .respond(
            &s.vendor_user,
            s.quote.id,
            RespondQuote {
                quoted_price: 10.0,
                vendor_response: None,
                attachment_url: Some("../secrets/menu.pdf".to_string()),
            },
        )
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::InvalidArgument(_)));

    // Objects outside the quote attachment area cannot be attached.
    for reference in ["private/contract.pdf", "avatars/organizer.png"] {
        let err = env
            .service
            .respond(
                &s.vendor_user,
                s.quote.id,
                RespondQuote {
                    quoted_price: 10.0,
                    vendor_response: None,
                    attachment_url: Some(reference.to_string()),
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::InvalidArgument(_)), "{reference}");
    }
    let stored = quote_db::get_quote_by_id(&env.db, s.quote.id)
        .await
        .unwrap()
        .unwrap();
    assert_eq!(stored.status, QuoteStatus::Pending);
    assert_eq!(stored.attachment_url, None);
}

#[tokio::test]
async fn accept_computes_expiry_from_event_date() {
    let env = setup().await;
    let s = accepted_quote(&env, Some(date(2025, 6, 1))).await;

    assert_eq!(s.quote.status, QuoteStatus::Accepted);
    assert_eq!(s.quote.accepted_at, Some(start_time()));
    assert_eq!(s.quote.contact_unlocked_at, Some(start_time()));
    assert_eq!(
        s.quote.contact_expires_at,
        Some(Utc.with_ymd_and_hms(2025, 6, 16, 0, 0, 0).unwrap())
    );
    assert_eq!(
        env.activity.actions_for(s.quote.id),
        vec![
            "quote_created",
            "quote_responded",
            "quote_accepted",
            "contact_unlocked"
        ]
    );
}

#[tokio::test]
async fn accept_without_event_date_grants_thirty_days() {
    let env = setup().await;
    let s = pending_quote(&env, None).await;
    env.clock.advance(Duration::minutes(90));

    // Accepting straight from pending is allowed.
    let quote = env.service.accept(&s.organizer, s.quote.id).await.unwrap();
    let accepted_at = start_time() + Duration::minutes(90);
    assert_eq!(quote.contact_expires_at, Some(accepted_at + Duration::days(30)));
}

#[tokio::test]
async fn only_the_owning_organizer_drives_transitions() {
    let env = setup().await;
    let s = pending_quote(&env, None).await;
    let stranger = organizer(&env.db, "Ravi").await;

    assert!(matches!(
        env.service.accept(&stranger, s.quote.id).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        env.service.reject(&stranger, s.quote.id).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        env.service.accept(&s.vendor_user, s.quote.id).await,
        Err(AppError::Forbidden(_))
    ));
    assert!(matches!(
        env.service.accept(&s.organizer, Uuid::new_v4()).await,
        Err(AppError::NotFound(_))
    ));
}

#[tokio::test]
async fn revision_loop_overwrites_response_timestamps() {
    let env = setup().await;
    let s = pending_quote(&env, None).await;

    env.service
        .respond(&s.vendor_user, s.quote.id, respond_with(30_000.0))
        .await
        .unwrap();

    env.clock.advance(Duration::days(1));
    let revised = env
        .service
        .request_revision(&s.organizer, s.quote.id, Some("Add dessert counter".into()))
        .await
        .unwrap();
    assert_eq!(revised.status, QuoteStatus::RevisionRequested);
    assert_eq!(revised.revision_message.as_deref(), Some("Add dessert counter"));
    assert_eq!(revised.revision_requested_at, Some(start_time() + Duration::days(1)));

    env.clock.advance(Duration::days(1));
    let second = env
        .service
        .respond(&s.vendor_user, s.quote.id, respond_with(34_000.0))
        .await
        .unwrap();
    assert_eq!(second.status, QuoteStatus::Responded);
    assert_eq!(second.quoted_price, Some(34_000.0));
    assert_eq!(second.responded_at, Some(start_time() + Duration::days(2)));
}

#[tokio::test]
async fn transitions_outside_the_table_are_rejected() {
    let env = setup().await;
    let s = pending_quote(&env, None).await;

    // Revision needs a response first.
    let err = env
        .service
        .request_revision(&s.organizer, s.quote.id, None)
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        AppError::InvalidTransition {
            transition: Transition::RequestRevision,
            from: QuoteStatus::Pending
        }
    ));

    env.service.reject(&s.organizer, s.quote.id).await.unwrap();

    for result in [
        env.service.accept(&s.organizer, s.quote.id).await,
        env.service.reject(&s.organizer, s.quote.id).await,
        env.service
            .respond(&s.vendor_user, s.quote.id, respond_with(5.0))
            .await,
    ] {
        assert!(matches!(
            result,
            Err(AppError::InvalidTransition {
                from: QuoteStatus::Rejected,
                ..
            })
        ));
    }

    let err = env
        .service
        .accept(&s.organizer, s.quote.id)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Cannot accept a quote that is rejected");
}

#[tokio::test]
async fn attachments_are_signed_for_parties_only() {
    let env = setup().await;
    let s = pending_quote(&env, None).await;
    let stranger = organizer(&env.db, "Ravi").await;

    assert!(matches!(
        env.service.attachment_url(&s.organizer, s.quote.id).await,
        Err(AppError::NotFound(_))
    ));

    env.service
        .respond(
            &s.vendor_user,
            s.quote.id,
            RespondQuote {
                quoted_price: 12_000.0,
                vendor_response: None,
                attachment_url: Some("quotes/menu.pdf".to_string()),
            },
        )
        .await
        .unwrap();

    let url = env
        .service
        .attachment_url(&s.organizer, s.quote.id)
        .await
        .unwrap();
    assert_eq!(url, "https://storage.test/signed/quotes/menu.pdf?token=t");
    assert!(env
        .service
        .attachment_url(&s.vendor_user, s.quote.id)
        .await
        .is_ok());
    assert!(matches!(
        env.service.attachment_url(&stranger, s.quote.id).await,
        Err(AppError::Forbidden(_))
    ));
}
