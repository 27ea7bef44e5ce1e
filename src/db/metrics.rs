use chrono::NaiveDate;
use sea_orm::*;
use serde::Serialize;

use crate::models::quotes::QuoteStatus;
use crate::models::vendors::VendorStatus;
use crate::models::{events, groups, quotes, users, vendors};

#[derive(Debug, Clone, Default, Serialize)]
pub struct QuoteCounts {
    pub total: u64,
    pub pending: u64,
    pub responded: u64,
    pub accepted: u64,
    pub rejected: u64,
    pub revision_requested: u64,
    pub archived: u64,
}

#[derive(Debug, Clone, Serialize)]
pub struct Overview {
    pub total_users: u64,
    pub total_vendors: u64,
    pub verified_vendors: u64,
    pub pending_vendors: u64,
    pub total_events: u64,
    pub completed_events: u64,
    pub upcoming_events: u64,
    pub total_groups: u64,
    pub quotes: QuoteCounts,
}

/// Platform-wide counts for the admin dashboard. Event completion is judged
/// by date against `today`, independent of the lazily-updated status column.
pub async fn overview(db: &DatabaseConnection, today: NaiveDate) -> Result<Overview, DbErr> {
    let vendors_with = |status: VendorStatus| {
        vendors::Entity::find()
            .filter(vendors::Column::Status.eq(status))
            .count(db)
    };

    let mut quote_counts = QuoteCounts::default();
    for status in [
        QuoteStatus::Pending,
        QuoteStatus::Responded,
        QuoteStatus::Accepted,
        QuoteStatus::Rejected,
        QuoteStatus::RevisionRequested,
        QuoteStatus::Archived,
    ] {
        let n = quotes::Entity::find()
            .filter(quotes::Column::Status.eq(status))
            .count(db)
            .await?;
        quote_counts.total += n;
        match status {
            QuoteStatus::Pending => quote_counts.pending = n,
            QuoteStatus::Responded => quote_counts.responded = n,
            QuoteStatus::Accepted => quote_counts.accepted = n,
            QuoteStatus::Rejected => quote_counts.rejected = n,
            QuoteStatus::RevisionRequested => quote_counts.revision_requested = n,
            QuoteStatus::Archived => quote_counts.archived = n,
        }
    }

    Ok(Overview {
        total_users: users::Entity::find().count(db).await?,
        total_vendors: vendors::Entity::find().count(db).await?,
        verified_vendors: vendors_with(VendorStatus::Verified).await?,
        pending_vendors: vendors_with(VendorStatus::Pending).await?,
        total_events: events::Entity::find().count(db).await?,
        completed_events: events::Entity::find()
            .filter(events::Column::EventDate.lt(today))
            .count(db)
            .await?,
        upcoming_events: events::Entity::find()
            .filter(events::Column::EventDate.gte(today))
            .count(db)
            .await?,
        total_groups: groups::Entity::find().count(db).await?,
        quotes: quote_counts,
    })
}
