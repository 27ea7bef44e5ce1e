use chrono::{DateTime, Utc};
use sea_orm::*;
use uuid::Uuid;

use crate::models::quotes::{self, QuoteStatus, Transition};

/// Fields of a new quote, already validated.
#[derive(Debug, Clone)]
pub struct NewQuote {
    pub event_id: Uuid,
    pub vendor_id: Uuid,
    pub organizer_user_id: Uuid,
    pub message: String,
    pub budget_range: Option<String>,
    pub special_requirements: Option<String>,
    pub deadline: Option<DateTime<Utc>>,
}

/// The side allowed to write a given transition. Every transition update is
/// filtered on it, so a mismatched writer changes nothing.
#[derive(Debug, Clone, Copy)]
pub enum Writer {
    Organizer(Uuid),
    Vendor(Uuid),
}

/// Insert a new quote (always Pending).
pub async fn insert_quote<C: ConnectionTrait>(
    db: &C,
    input: NewQuote,
    now: DateTime<Utc>,
) -> Result<quotes::Model, DbErr> {
    let new_quote = quotes::ActiveModel {
        id: Set(Uuid::new_v4()),
        event_id: Set(input.event_id),
        vendor_id: Set(input.vendor_id),
        organizer_user_id: Set(input.organizer_user_id),
        message: Set(input.message),
        budget_range: Set(input.budget_range),
        special_requirements: Set(input.special_requirements),
        deadline: Set(input.deadline),
        attachment_url: Set(None),
        quoted_price: Set(None),
        vendor_response: Set(None),
        revision_message: Set(None),
        status: Set(QuoteStatus::Pending),
        created_at: Set(now),
        responded_at: Set(None),
        accepted_at: Set(None),
        rejected_at: Set(None),
        revision_requested_at: Set(None),
        contact_unlocked_at: Set(None),
        contact_expires_at: Set(None),
        archived_at: Set(None),
        updated_at: Set(None),
    };

    new_quote.insert(db).await
}

/// Fetch a single quote by ID.
pub async fn get_quote_by_id(
    db: &DatabaseConnection,
    id: Uuid,
) -> Result<Option<quotes::Model>, DbErr> {
    quotes::Entity::find_by_id(id).one(db).await
}

/// Quotes an organizer created, newest first.
pub async fn get_quotes_by_organizer(
    db: &DatabaseConnection,
    organizer_user_id: Uuid,
) -> Result<Vec<quotes::Model>, DbErr> {
    quotes::Entity::find()
        .filter(quotes::Column::OrganizerUserId.eq(organizer_user_id))
        .order_by_desc(quotes::Column::CreatedAt)
        .all(db)
        .await
}

/// Quotes addressed to a vendor profile, newest first.
pub async fn get_quotes_by_vendor(
    db: &DatabaseConnection,
    vendor_id: Uuid,
) -> Result<Vec<quotes::Model>, DbErr> {
    quotes::Entity::find()
        .filter(quotes::Column::VendorId.eq(vendor_id))
        .order_by_desc(quotes::Column::CreatedAt)
        .all(db)
        .await
}

/// Apply `patch` to the quote as one conditional UPDATE keyed by id, writer
/// identity and the transition's allowed source states.
///
/// Returns the number of rows changed (0 or 1). A zero means the row is gone,
/// belongs to someone else, or its status moved on since it was read.
pub async fn apply_transition(
    db: &DatabaseConnection,
    id: Uuid,
    writer: Writer,
    transition: Transition,
    mut patch: quotes::ActiveModel,
) -> Result<u64, DbErr> {
    patch.status = Set(transition.target());

    let mut update = quotes::Entity::update_many()
        .set(patch)
        .filter(quotes::Column::Id.eq(id))
        .filter(quotes::Column::Status.is_in(transition.allowed_from().iter().copied()));

    update = match writer {
        Writer::Organizer(user_id) => update.filter(quotes::Column::OrganizerUserId.eq(user_id)),
        Writer::Vendor(vendor_id) => update.filter(quotes::Column::VendorId.eq(vendor_id)),
    };

    Ok(update.exec(db).await?.rows_affected)
}

/// IDs of accepted, unarchived quotes whose contact window closed before
/// `now`, limited to quotes where the caller is the organizer or the vendor.
pub async fn find_expired_contacts(
    db: &DatabaseConnection,
    organizer_user_id: Uuid,
    vendor_id: Option<Uuid>,
    now: DateTime<Utc>,
) -> Result<Vec<Uuid>, DbErr> {
    let mut involved = Condition::any().add(quotes::Column::OrganizerUserId.eq(organizer_user_id));
    if let Some(vendor_id) = vendor_id {
        involved = involved.add(quotes::Column::VendorId.eq(vendor_id));
    }

    quotes::Entity::find()
        .select_only()
        .column(quotes::Column::Id)
        .filter(involved)
        .filter(quotes::Column::Status.eq(QuoteStatus::Accepted))
        .filter(quotes::Column::ArchivedAt.is_null())
        .filter(quotes::Column::ContactExpiresAt.lt(now))
        .into_tuple::<Uuid>()
        .all(db)
        .await
}

/// Archive one expired quote. Returns `true` only for the call that actually
/// flipped it, so repeated sweeps never double-report.
pub async fn archive_quote(
    db: &DatabaseConnection,
    id: Uuid,
    now: DateTime<Utc>,
) -> Result<bool, DbErr> {
    let archive = Transition::Archive;
    let patch = quotes::ActiveModel {
        status: Set(archive.target()),
        archived_at: Set(Some(now)),
        ..Default::default()
    };

    let result = quotes::Entity::update_many()
        .set(patch)
        .filter(quotes::Column::Id.eq(id))
        .filter(quotes::Column::Status.is_in(archive.allowed_from().iter().copied()))
        .filter(quotes::Column::ArchivedAt.is_null())
        .filter(quotes::Column::ContactExpiresAt.lt(now))
        .exec(db)
        .await?;

    Ok(result.rows_affected == 1)
}
