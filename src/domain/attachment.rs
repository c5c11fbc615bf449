//! Attachment Entity
//!
//! File metadata hung off a card. Attachments are unordered.

use serde::{Deserialize, Serialize};
use super::entity::Entity;
use super::{AttachmentId, CardId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Attachment {
    pub id: AttachmentId,
    pub card_id: CardId,
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    /// Where the file store serves the blob from
    pub url: String,
    pub created_at: i64,
}

impl Entity for Attachment {
    type Id = AttachmentId;
    const KIND: &'static str = "attachment";

    fn id(&self) -> Self::Id {
        self.id
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NewAttachment {
    pub file_name: String,
    pub mime_type: String,
    pub size_bytes: i64,
    pub url: String,
}

impl NewAttachment {
    pub fn new(file_name: impl Into<String>, mime_type: impl Into<String>, size_bytes: i64, url: impl Into<String>) -> Self {
        Self {
            file_name: file_name.into(),
            mime_type: mime_type.into(),
            size_bytes,
            url: url.into(),
        }
    }
}
