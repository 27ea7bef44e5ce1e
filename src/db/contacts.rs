//! Contact directory: the disclosable contact fields of the two parties of a
//! quote. Pure lookup; gating is the caller's job.

use sea_orm::*;
use serde::Serialize;
use thiserror::Error;
use uuid::Uuid;

use crate::models::{users, vendors};

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct VendorContact {
    pub whatsapp: Option<String>,
    pub phone: Option<String>,
    pub email: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct OrganizerContact {
    pub name: String,
    pub phone: Option<String>,
    pub email: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ContactCard {
    pub vendor: VendorContact,
    pub organizer: OrganizerContact,
}

#[derive(Debug, Error)]
pub enum DirectoryError {
    #[error("{0} not found")]
    NotFound(&'static str),
    #[error(transparent)]
    Db(#[from] DbErr),
}

/// Resolve the vendor's channels (WhatsApp link from the profile, phone and
/// email from the owning user) and the organizer's name, phone and email.
pub async fn resolve(
    db: &DatabaseConnection,
    vendor_id: Uuid,
    organizer_user_id: Uuid,
) -> Result<ContactCard, DirectoryError> {
    let (vendor, owner) = vendors::Entity::find_by_id(vendor_id)
        .find_also_related(users::Entity)
        .one(db)
        .await?
        .ok_or(DirectoryError::NotFound("Vendor"))?;

    let organizer = users::Entity::find_by_id(organizer_user_id)
        .one(db)
        .await?
        .ok_or(DirectoryError::NotFound("Organizer"))?;

    Ok(ContactCard {
        vendor: VendorContact {
            whatsapp: vendor.whatsapp_link,
            phone: owner.as_ref().and_then(|u| u.phone.clone()),
            email: owner.map(|u| u.email),
        },
        organizer: OrganizerContact {
            name: organizer.full_name,
            phone: organizer.phone,
            email: organizer.email,
        },
    })
}
