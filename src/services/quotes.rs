//! The quote lifecycle engine.
//!
//! Every actor-driven transition follows the same shape: load the quote,
//! check role, ownership and the transition table, then write one conditional
//! UPDATE guarded by the same conditions. Reads run the caller's lazy sweep
//! first so expired contact windows are archived before anything is shown.

use chrono::{DateTime, Utc};
use sea_orm::{DatabaseConnection, Set, TransactionTrait};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;
use tracing::{debug, info};
use uuid::Uuid;

use crate::activity::{self, ActivityEntry, ActivitySink};
use crate::auth::authorization::{self, Party};
use crate::clock::Clock;
use crate::db::contacts::{self, ContactCard, DirectoryError};
use crate::db::events as event_db;
use crate::db::quotes::{self as quote_db, NewQuote, Writer};
use crate::db::users as user_db;
use crate::db::vendors as vendor_db;
use crate::error::{AppError, AppResult};
use crate::models::quotes::{
    self, CreateQuoteRequest, QuoteStatus, QuoteView, RespondQuote, Transition,
};
use crate::models::users::{self, Roles};
use crate::services::sweep::{SweepOutcome, contact_expiry, event_is_completed};
use crate::storage::{self, AttachmentStore};

#[derive(Clone)]
pub struct QuoteService {
    db: DatabaseConnection,
    activity: Arc<dyn ActivitySink>,
    attachments: Arc<dyn AttachmentStore>,
    clock: Arc<dyn Clock>,
}

impl QuoteService {
    pub fn new(
        db: DatabaseConnection,
        activity: Arc<dyn ActivitySink>,
        attachments: Arc<dyn AttachmentStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            db,
            activity,
            attachments,
            clock,
        }
    }

    pub fn db(&self) -> &DatabaseConnection {
        &self.db
    }

    pub fn attachments(&self) -> &dyn AttachmentStore {
        self.attachments.as_ref()
    }

    pub fn activity(&self) -> &dyn ActivitySink {
        self.activity.as_ref()
    }

    pub fn now(&self) -> DateTime<Utc> {
        self.clock.now()
    }

    // ── Transitions ──

    /// Organizer requests a quote from a vendor, for an existing event they
    /// own or for an event created inline in the same transaction.
    pub async fn create(
        &self,
        actor: &users::Model,
        input: CreateQuoteRequest,
    ) -> AppResult<quotes::Model> {
        authorization::require_role(actor, Roles::Organizer)?;

        let message = input.message.trim().to_string();
        if message.is_empty() {
            return Err(AppError::invalid("message is required"));
        }
        if let Some(event) = &input.event {
            if event.title.trim().is_empty() {
                return Err(AppError::invalid("event.title is required"));
            }
        }

        let existing_event = match (input.event_id, &input.event) {
            (Some(event_id), None) => Some(event_id),
            (None, Some(_)) => None,
            _ => return Err(AppError::invalid("Provide exactly one of event_id or event")),
        };

        if let Some(event_id) = existing_event {
            authorization::verify_event_owner(&self.db, event_id, actor.id).await?;
        }

        if vendor_db::get_vendor_by_id(&self.db, input.vendor_id)
            .await?
            .is_none()
        {
            return Err(AppError::not_found("Vendor not found"));
        }

        let now = self.now();
        let mut new_quote = NewQuote {
            event_id: existing_event.unwrap_or_default(),
            vendor_id: input.vendor_id,
            organizer_user_id: actor.id,
            message,
            budget_range: input.budget_range,
            special_requirements: input.special_requirements,
            deadline: input.deadline,
        };

        let quote = match input.event {
            None => quote_db::insert_quote(&self.db, new_quote, now).await?,
            Some(event) => {
                let txn = self.db.begin().await?;
                let event = event_db::insert_event(&txn, actor.id, event, now).await?;
                new_quote.event_id = event.id;
                let quote = quote_db::insert_quote(&txn, new_quote, now).await?;
                txn.commit().await?;
                debug!(event_id = %event.id, "created event inline with quote");
                quote
            }
        };

        info!(quote_id = %quote.id, organizer = %actor.id, vendor = %quote.vendor_id, "quote requested");
        self.activity.record(ActivityEntry::quote(
            quote.id,
            activity::QUOTE_CREATED,
            actor.id,
            now,
        ));

        Ok(quote)
    }

    /// Vendor answers a pending (or revision-requested) quote with a price.
    pub async fn respond(
        &self,
        actor: &users::Model,
        quote_id: Uuid,
        input: RespondQuote,
    ) -> AppResult<quotes::Model> {
        authorization::require_role(actor, Roles::Vendor)?;

        if !input.quoted_price.is_finite() || input.quoted_price < 0.0 {
            return Err(AppError::invalid("quoted_price must be a non-negative number"));
        }
        let attachment = input
            .attachment_url
            .map(|r| r.trim().to_string())
            .filter(|r| !r.is_empty());
        if let Some(reference) = &attachment {
            storage::validate_reference(reference)?;
        }

        let vendor = authorization::require_vendor_profile(&self.db, actor.id).await?;
        let quote = self.find(quote_id).await?;
        if quote.vendor_id != vendor.id {
            return Err(AppError::forbidden(
                "You are not authorized to respond to this quote",
            ));
        }
        check_transition(&quote, Transition::Respond)?;

        let now = self.now();
        let patch = quotes::ActiveModel {
            quoted_price: Set(Some(input.quoted_price)),
            vendor_response: Set(input.vendor_response),
            attachment_url: Set(attachment),
            responded_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let updated = self
            .commit(quote_id, Writer::Vendor(vendor.id), Transition::Respond, patch)
            .await?;

        info!(quote_id = %quote_id, vendor = %vendor.id, "quote responded");
        self.activity.record(ActivityEntry::quote(
            quote_id,
            activity::QUOTE_RESPONDED,
            actor.id,
            now,
        ));

        Ok(updated)
    }

    /// Organizer accepts; contact details unlock until the computed expiry.
    pub async fn accept(&self, actor: &users::Model, quote_id: Uuid) -> AppResult<quotes::Model> {
        let quote = self
            .load_for_organizer(actor, quote_id, Transition::Accept)
            .await?;

        let now = self.now();
        let event_date = event_db::get_event_by_id(&self.db, quote.event_id)
            .await?
            .and_then(|e| e.event_date);
        let expires_at = contact_expiry(event_date, now);

        let patch = quotes::ActiveModel {
            accepted_at: Set(Some(now)),
            contact_unlocked_at: Set(Some(now)),
            contact_expires_at: Set(Some(expires_at)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let updated = self
            .commit(quote_id, Writer::Organizer(actor.id), Transition::Accept, patch)
            .await?;

        info!(quote_id = %quote_id, organizer = %actor.id, %expires_at, "quote accepted, contact unlocked");
        self.activity.record(ActivityEntry::quote(
            quote_id,
            activity::QUOTE_ACCEPTED,
            actor.id,
            now,
        ));
        self.activity.record(
            ActivityEntry::quote(quote_id, activity::CONTACT_UNLOCKED, actor.id, now)
                .with_metadata(serde_json::json!({ "contact_expires_at": expires_at })),
        );

        Ok(updated)
    }

    pub async fn reject(&self, actor: &users::Model, quote_id: Uuid) -> AppResult<quotes::Model> {
        self.load_for_organizer(actor, quote_id, Transition::Reject)
            .await?;

        let now = self.now();
        let patch = quotes::ActiveModel {
            rejected_at: Set(Some(now)),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let updated = self
            .commit(quote_id, Writer::Organizer(actor.id), Transition::Reject, patch)
            .await?;

        info!(quote_id = %quote_id, organizer = %actor.id, "quote rejected");
        self.activity.record(ActivityEntry::quote(
            quote_id,
            activity::QUOTE_REJECTED,
            actor.id,
            now,
        ));

        Ok(updated)
    }

    /// Organizer sends a responded quote back to the vendor, optionally with
    /// a note.
    pub async fn request_revision(
        &self,
        actor: &users::Model,
        quote_id: Uuid,
        message: Option<String>,
    ) -> AppResult<quotes::Model> {
        self.load_for_organizer(actor, quote_id, Transition::RequestRevision)
            .await?;

        let now = self.now();
        let patch = quotes::ActiveModel {
            revision_requested_at: Set(Some(now)),
            revision_message: Set(message.filter(|m| !m.trim().is_empty())),
            updated_at: Set(Some(now)),
            ..Default::default()
        };

        let updated = self
            .commit(
                quote_id,
                Writer::Organizer(actor.id),
                Transition::RequestRevision,
                patch,
            )
            .await?;

        info!(quote_id = %quote_id, organizer = %actor.id, "quote revision requested");
        self.activity.record(ActivityEntry::quote(
            quote_id,
            activity::QUOTE_REVISION_REQUESTED,
            actor.id,
            now,
        ));

        Ok(updated)
    }

    // ── Lazy sweep ──

    /// Mark the organizer's past events completed.
    pub async fn complete_past_events(&self, organizer_user_id: Uuid) -> AppResult<u64> {
        let now = self.now();
        Ok(event_db::complete_past_events(&self.db, organizer_user_id, now.date_naive(), now).await?)
    }

    /// Apply the time-based transitions within the caller's scope: their past
    /// events complete, then accepted quotes they are party to (as organizer
    /// or as the owning vendor) whose contact window has closed are archived.
    pub async fn sweep(&self, actor: &users::Model) -> AppResult<SweepOutcome> {
        let now = self.now();
        let events_completed =
            event_db::complete_past_events(&self.db, actor.id, now.date_naive(), now).await?;

        let vendor_id = vendor_db::get_vendor_by_owner(&self.db, actor.id)
            .await?
            .map(|v| v.id);

        let mut quotes_archived = 0;
        for quote_id in quote_db::find_expired_contacts(&self.db, actor.id, vendor_id, now).await? {
            if quote_db::archive_quote(&self.db, quote_id, now).await? {
                quotes_archived += 1;
                self.activity.record(
                    ActivityEntry::quote(quote_id, activity::CONTACT_EXPIRED, actor.id, now)
                        .with_metadata(serde_json::json!({
                            "quote_id": quote_id,
                            "triggered_by": actor.id,
                        })),
                );
            }
        }

        let outcome = SweepOutcome {
            events_completed,
            quotes_archived,
        };
        if outcome != SweepOutcome::default() {
            info!(
                user = %actor.id,
                events_completed,
                quotes_archived,
                "lazy sweep applied"
            );
        }
        Ok(outcome)
    }

    // ── Reads ──

    /// Quotes the organizer created, after their sweep.
    pub async fn list_for_organizer(&self, actor: &users::Model) -> AppResult<Vec<QuoteView>> {
        authorization::require_role(actor, Roles::Organizer)?;
        self.sweep(actor).await?;

        let rows = quote_db::get_quotes_by_organizer(&self.db, actor.id).await?;
        self.views(rows).await
    }

    /// Quotes addressed to the caller's vendor profile, after their sweep.
    pub async fn list_for_vendor(&self, actor: &users::Model) -> AppResult<Vec<QuoteView>> {
        authorization::require_role(actor, Roles::Vendor)?;
        self.sweep(actor).await?;

        let vendor = vendor_db::get_vendor_by_owner(&self.db, actor.id)
            .await?
            .ok_or_else(|| AppError::not_found("Vendor profile not found for this user"))?;

        let rows = quote_db::get_quotes_by_vendor(&self.db, vendor.id).await?;
        self.views(rows).await
    }

    /// One quote, for either party.
    pub async fn get(&self, actor: &users::Model, quote_id: Uuid) -> AppResult<QuoteView> {
        self.sweep(actor).await?;
        let quote = self.find(quote_id).await?;
        self.require_party(&quote, actor).await?;

        self.views(vec![quote])
            .await?
            .pop()
            .ok_or_else(|| AppError::not_found("Quote not found"))
    }

    /// Contact disclosure gate. Succeeds only for a party to an accepted,
    /// unarchived quote whose event has not completed.
    pub async fn contact(&self, actor: &users::Model, quote_id: Uuid) -> AppResult<ContactCard> {
        self.sweep(actor).await?;

        let quote = self.find(quote_id).await?;
        if authorization::quote_party(&self.db, &quote, actor)
            .await?
            .is_none()
        {
            return Err(AppError::forbidden(
                "You are not authorized to view contact information for this quote",
            ));
        }

        let event = event_db::get_event_by_id(&self.db, quote.event_id)
            .await?
            .ok_or_else(|| AppError::not_found("Event not found"))?;
        if event_is_completed(&event, self.now().date_naive()) {
            return Err(AppError::forbidden(
                "Event is completed. Contact access revoked.",
            ));
        }

        if quote.status != QuoteStatus::Accepted {
            return Err(AppError::forbidden(
                "Contact information is only available for accepted quotes",
            ));
        }
        if quote.archived_at.is_some() {
            return Err(AppError::forbidden(
                "Contact access has expired and quote is archived.",
            ));
        }

        contacts::resolve(&self.db, quote.vendor_id, quote.organizer_user_id)
            .await
            .map_err(|e| match e {
                e @ DirectoryError::NotFound(_) => AppError::not_found(e.to_string()),
                DirectoryError::Db(e) => e.into(),
            })
    }

    /// Signed URL for the vendor's attachment on a quote.
    pub async fn attachment_url(&self, actor: &users::Model, quote_id: Uuid) -> AppResult<String> {
        let quote = self.find(quote_id).await?;
        self.require_party(&quote, actor).await?;

        let reference = quote
            .attachment_url
            .ok_or_else(|| AppError::not_found("No attachment for this quote"))?;

        Ok(self.attachments.sign(&reference).await?)
    }

    // ── Helpers ──

    async fn find(&self, quote_id: Uuid) -> AppResult<quotes::Model> {
        quote_db::get_quote_by_id(&self.db, quote_id)
            .await?
            .ok_or_else(|| AppError::not_found("Quote not found"))
    }

    async fn require_party(&self, quote: &quotes::Model, actor: &users::Model) -> AppResult<Party> {
        authorization::quote_party(&self.db, quote, actor)
            .await?
            .ok_or_else(|| AppError::forbidden("You are not a party to this quote"))
    }

    /// Checks shared by accept, reject and request_revision.
    async fn load_for_organizer(
        &self,
        actor: &users::Model,
        quote_id: Uuid,
        transition: Transition,
    ) -> AppResult<quotes::Model> {
        authorization::require_role(actor, Roles::Organizer)?;

        let quote = self.find(quote_id).await?;
        if quote.organizer_user_id != actor.id {
            return Err(AppError::forbidden(
                "You are not authorized to update this quote",
            ));
        }
        check_transition(&quote, transition)?;
        Ok(quote)
    }

    /// Write the transition and return the fresh row. A conditional update
    /// that matches nothing means another request changed the quote first.
    async fn commit(
        &self,
        quote_id: Uuid,
        writer: Writer,
        transition: Transition,
        patch: quotes::ActiveModel,
    ) -> AppResult<quotes::Model> {
        let changed = quote_db::apply_transition(&self.db, quote_id, writer, transition, patch).await?;
        let current = self.find(quote_id).await?;

        if changed == 0 {
            return Err(AppError::InvalidTransition {
                transition,
                from: current.status,
            });
        }
        Ok(current)
    }

    /// Attach event titles and both parties' display names.
    async fn views(&self, rows: Vec<quotes::Model>) -> AppResult<Vec<QuoteView>> {
        let event_ids: HashSet<Uuid> = rows.iter().map(|q| q.event_id).collect();
        let vendor_ids: HashSet<Uuid> = rows.iter().map(|q| q.vendor_id).collect();
        let organizer_ids: HashSet<Uuid> = rows.iter().map(|q| q.organizer_user_id).collect();

        let events: HashMap<Uuid, _> =
            event_db::get_events_by_ids(&self.db, event_ids.into_iter().collect())
                .await?
                .into_iter()
                .map(|e| (e.id, e))
                .collect();
        let vendors: HashMap<Uuid, String> =
            vendor_db::get_vendors_by_ids(&self.db, vendor_ids.into_iter().collect())
                .await?
                .into_iter()
                .map(|v| (v.id, v.business_name))
                .collect();
        let organizers: HashMap<Uuid, String> =
            user_db::get_users_by_ids(&self.db, organizer_ids.into_iter().collect())
                .await?
                .into_iter()
                .map(|u| (u.id, u.full_name))
                .collect();

        Ok(rows
            .into_iter()
            .map(|quote| {
                let event = events.get(&quote.event_id);
                QuoteView {
                    event_title: event.map(|e| e.title.clone()).unwrap_or_default(),
                    event_date: event.and_then(|e| e.event_date),
                    vendor_name: vendors.get(&quote.vendor_id).cloned(),
                    organizer_name: organizers.get(&quote.organizer_user_id).cloned(),
                    quote,
                }
            })
            .collect())
    }
}

fn check_transition(quote: &quotes::Model, transition: Transition) -> AppResult<()> {
    if transition.permits(quote.status) {
        Ok(())
    } else {
        Err(AppError::InvalidTransition {
            transition,
            from: quote.status,
        })
    }
}
