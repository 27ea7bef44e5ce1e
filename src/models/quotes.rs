use chrono::NaiveDate;
use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::events::CreateEvent;

/// Quote status stored as a lowercase string in the database.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, EnumIter, DeriveActiveEnum)]
#[serde(rename_all = "snake_case")]
#[sea_orm(rs_type = "String", db_type = "String(StringLen::None)")]
pub enum QuoteStatus {
    #[sea_orm(string_value = "pending")]
    Pending,
    #[sea_orm(string_value = "responded")]
    Responded,
    #[sea_orm(string_value = "accepted")]
    Accepted,
    #[sea_orm(string_value = "rejected")]
    Rejected,
    #[sea_orm(string_value = "revision_requested")]
    RevisionRequested,
    #[sea_orm(string_value = "archived")]
    Archived,
}

impl QuoteStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            QuoteStatus::Pending => "pending",
            QuoteStatus::Responded => "responded",
            QuoteStatus::Accepted => "accepted",
            QuoteStatus::Rejected => "rejected",
            QuoteStatus::RevisionRequested => "revision_requested",
            QuoteStatus::Archived => "archived",
        }
    }
}

/// Every way a quote can change status.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Transition {
    Respond,
    Accept,
    Reject,
    RequestRevision,
    /// System-driven, once the contact window has elapsed.
    Archive,
}

impl Transition {
    /// Source states from which this transition may fire.
    pub fn allowed_from(self) -> &'static [QuoteStatus] {
        use QuoteStatus::*;
        match self {
            Transition::Respond => &[Pending, RevisionRequested],
            Transition::Accept | Transition::Reject => &[Pending, Responded, RevisionRequested],
            Transition::RequestRevision => &[Responded],
            Transition::Archive => &[Accepted],
        }
    }

    pub fn target(self) -> QuoteStatus {
        match self {
            Transition::Respond => QuoteStatus::Responded,
            Transition::Accept => QuoteStatus::Accepted,
            Transition::Reject => QuoteStatus::Rejected,
            Transition::RequestRevision => QuoteStatus::RevisionRequested,
            Transition::Archive => QuoteStatus::Archived,
        }
    }

    pub fn verb(self) -> &'static str {
        match self {
            Transition::Respond => "respond to",
            Transition::Accept => "accept",
            Transition::Reject => "reject",
            Transition::RequestRevision => "request a revision of",
            Transition::Archive => "archive",
        }
    }

    pub fn permits(self, from: QuoteStatus) -> bool {
        self.allowed_from().contains(&from)
    }
}

/// SeaORM entity for the `quote_requests` table.
#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "quote_requests")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub event_id: Uuid,
    pub vendor_id: Uuid,
    pub organizer_user_id: Uuid,
    #[sea_orm(column_type = "Text")]
    pub message: String,
    pub budget_range: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub special_requirements: Option<String>,
    pub deadline: Option<DateTimeUtc>,
    #[sea_orm(column_type = "Text", nullable)]
    pub attachment_url: Option<String>,
    #[sea_orm(column_type = "Double", nullable)]
    pub quoted_price: Option<f64>,
    #[sea_orm(column_type = "Text", nullable)]
    pub vendor_response: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub revision_message: Option<String>,
    pub status: QuoteStatus,
    pub created_at: DateTimeUtc,
    pub responded_at: Option<DateTimeUtc>,
    pub accepted_at: Option<DateTimeUtc>,
    pub rejected_at: Option<DateTimeUtc>,
    pub revision_requested_at: Option<DateTimeUtc>,
    pub contact_unlocked_at: Option<DateTimeUtc>,
    pub contact_expires_at: Option<DateTimeUtc>,
    pub archived_at: Option<DateTimeUtc>,
    pub updated_at: Option<DateTimeUtc>,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::events::Entity",
        from = "Column::EventId",
        to = "super::events::Column::Id"
    )]
    Event,
    #[sea_orm(
        belongs_to = "super::vendors::Entity",
        from = "Column::VendorId",
        to = "super::vendors::Column::Id"
    )]
    Vendor,
    #[sea_orm(
        belongs_to = "super::users::Entity",
        from = "Column::OrganizerUserId",
        to = "super::users::Column::Id"
    )]
    Organizer,
}

impl Related<super::events::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Event.def()
    }
}

impl Related<super::vendors::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Vendor.def()
    }
}

impl Related<super::users::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Organizer.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

// ── DTOs ──

/// Request body for POST /api/quotes/request.
///
/// Exactly one of `event_id` and `event` must be present; `event` creates the
/// event inline, in the same transaction as the quote.
#[derive(Debug, Clone, Deserialize)]
pub struct CreateQuoteRequest {
    pub event_id: Option<Uuid>,
    pub event: Option<CreateEvent>,
    pub vendor_id: Uuid,
    pub message: String,
    pub budget_range: Option<String>,
    pub special_requirements: Option<String>,
    pub deadline: Option<DateTimeUtc>,
}

/// Request body for PATCH /api/quotes/respond/{id}.
#[derive(Debug, Clone, Deserialize)]
pub struct RespondQuote {
    pub quoted_price: f64,
    pub vendor_response: Option<String>,
    pub attachment_url: Option<String>,
}

/// Optional request body for PATCH /api/quotes/revision/{id}.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct RevisionRequest {
    pub message: Option<String>,
}

/// A quote as shown to its parties: the row plus the event title, the vendor's
/// business name and the organizer's name.
#[derive(Debug, Clone, Serialize)]
pub struct QuoteView {
    #[serde(flatten)]
    pub quote: Model,
    pub event_title: String,
    pub event_date: Option<NaiveDate>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub organizer_name: Option<String>,
}
