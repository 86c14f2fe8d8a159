//! Canonical data models for the help-center catalog.
//!
//! Every record persisted by this crate is described by one of the structs
//! below. Field names are serialized in `camelCase` so the on-disk JSON keeps
//! the layout the data has always had (`categoryId`, `isActive`, `faqViews`,
//! ...). Adding, editing and importing all run the same
//! validation, so a malformed record can never reach the store.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::app_error::AppError;

/// Maximum accepted size for an uploaded category icon, in bytes.
pub const MAX_ICON_BYTES: u64 = 1024 * 1024;

/// A named, ordered grouping of FAQs.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Category {
    pub id: u64,
    pub name: String,
    pub description: String,
    /// Display position. Not required to be contiguous; pairwise swaps during
    /// reordering can leave gaps.
    pub order: u32,
    pub expanded: bool,
    /// Emoji, image URL or data URL. Absent keys stay absent on disk.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
}

impl Category {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.name.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Category name is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// A single question/answer record belonging to one category.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Faq {
    pub id: u64,
    pub category_id: u64,
    pub question: String,
    /// Rich text; stored as an HTML fragment.
    pub answer: String,
    /// Display position within the owning category.
    pub order: u32,
    pub is_active: bool,
    /// Curated related-question ids. Empty means "derive from the category".
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub related_questions: Vec<u64>,
}

impl Faq {
    pub fn validate(&self) -> Result<(), AppError> {
        if self.question.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Question text is required".to_string(),
            ));
        }
        if self.answer.trim().is_empty() {
            return Err(AppError::ValidationError(
                "Answer text is required".to_string(),
            ));
        }
        Ok(())
    }
}

/// Input for [`crate::catalog::FaqCatalog::add_category`].
#[derive(Debug, Clone, Default)]
pub struct NewCategory {
    pub name: String,
    pub description: String,
    pub icon: Option<String>,
    pub expanded: bool,
}

/// Input for [`crate::catalog::FaqCatalog::add_faq`].
#[derive(Debug, Clone, Default)]
pub struct NewFaq {
    pub category_id: u64,
    pub question: String,
    pub answer: String,
    pub is_active: bool,
    pub related_questions: Vec<u64>,
}

/// Usage counters. Values only ever increase; there is no decay or expiry.
///
/// `BTreeMap` keeps iteration deterministic, which the top-N queries rely on
/// for stable tie ordering.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct AnalyticsData {
    pub faq_views: BTreeMap<u64, u64>,
    pub search_terms: BTreeMap<String, u64>,
    pub category_views: BTreeMap<u64, u64>,
    pub helpful_votes: BTreeMap<u64, VoteTally>,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct VoteTally {
    pub helpful: u64,
    pub not_helpful: u64,
}

/// The vote a reader cast on one FAQ. At most one per FAQ per store.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VoteKind {
    #[serde(rename = "helpful")]
    Helpful,
    #[serde(rename = "not-helpful")]
    NotHelpful,
}

/// Public-viewer settings.
///
/// The two auto-expand flags are mutually exclusive, enforced by the toggle
/// handlers in [`crate::FaqApp`] rather than by the schema.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", default)]
pub struct Settings {
    pub show_search_box: bool,
    pub auto_expand_first_category: bool,
    pub auto_expand_all_categories: bool,
}

impl Default for Settings {
    fn default() -> Self {
        Self {
            show_search_box: true,
            auto_expand_first_category: false,
            auto_expand_all_categories: true,
        }
    }
}

/// The interchange document produced by export and consumed by import.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportBundle {
    pub categories: Vec<Category>,
    pub faqs: Vec<Faq>,
}

/// An icon file handed over by the presentation layer.
///
/// The crate does not decode image data; it validates the declared content
/// type and size, then stores `data` (typically a data URL the platform
/// already produced) verbatim.
#[derive(Debug, Clone)]
pub struct IconUpload {
    pub content_type: String,
    pub size_bytes: u64,
    pub data: String,
}

impl IconUpload {
    pub fn validate(&self) -> Result<(), AppError> {
        if !self.content_type.starts_with("image/") {
            return Err(AppError::ValidationError(
                "Please select an image file".to_string(),
            ));
        }
        if self.size_bytes > MAX_ICON_BYTES {
            return Err(AppError::ValidationError(
                "Image must be smaller than 1MB".to_string(),
            ));
        }
        Ok(())
    }
}

/// Sample catalog written through on the first run of a seeded store.
pub fn starter_catalog() -> ExportBundle {
    ExportBundle {
        categories: vec![
            Category {
                id: 1,
                name: "Booking & Reservations".to_string(),
                description: "Everything you need to know about making and managing your reservations".to_string(),
                order: 0,
                expanded: true,
                icon: Some("🏠".to_string()),
            },
            Category {
                id: 2,
                name: "Property Information".to_string(),
                description: "Details about our properties and amenities".to_string(),
                order: 1,
                expanded: false,
                icon: Some("🏢".to_string()),
            },
        ],
        faqs: vec![
            Faq {
                id: 1,
                category_id: 1,
                question: "How do I make a reservation?".to_string(),
                answer: "Making a reservation is simple! Browse our available properties, select your dates, and click Book Now. You'll be guided through a secure checkout process where you can enter your payment information and confirm your booking.".to_string(),
                order: 0,
                is_active: true,
                related_questions: Vec::new(),
            },
            Faq {
                id: 2,
                category_id: 1,
                question: "Can I modify or cancel my reservation?".to_string(),
                answer: "Yes! You can modify or cancel your reservation through your account dashboard. Simply log in, go to \"My Reservations,\" and select the booking you want to change. Please note that cancellation policies may vary depending on the property and timing.".to_string(),
                order: 1,
                is_active: true,
                related_questions: Vec::new(),
            },
            Faq {
                id: 3,
                category_id: 2,
                question: "What amenities are included?".to_string(),
                answer: "Amenities vary by property but typically include WiFi, kitchen facilities, linens, towels, and basic toiletries. Each property listing includes a detailed amenities section. Premium properties may include additional features like pools, fitness centers, or concierge services.".to_string(),
                order: 0,
                is_active: true,
                related_questions: Vec::new(),
            },
            Faq {
                id: 4,
                category_id: 1,
                question: "What is your cancellation policy?".to_string(),
                answer: "Our cancellation policy varies by property. Most properties offer free cancellation up to 24-48 hours before check-in. Some properties may have stricter policies during peak seasons. You can find the specific cancellation policy for each property on its listing page.".to_string(),
                order: 2,
                is_active: true,
                related_questions: Vec::new(),
            },
            Faq {
                id: 5,
                category_id: 2,
                question: "Is parking available?".to_string(),
                answer: "Parking availability depends on the specific property. Many of our properties offer free parking, while others may have paid parking or street parking only. Check the property details for parking information, and contact us if you have specific parking needs.".to_string(),
                order: 1,
                is_active: true,
                related_questions: Vec::new(),
            },
        ],
    }
}
