//! # Helpcenter Core
//!
//! A local-first FAQ / help-center engine. Categories, questions, usage
//! analytics and viewer settings are kept in an embedded [redb] database on
//! the user's machine, with no server and no background work. The crate
//! is the data layer behind an admin panel and a public FAQ viewer; rendering
//! is entirely up to the embedder.
//!
//! ## Features
//!
//! - **Embedded storage**: one redb table of JSON values with an in-memory
//!   cache; unopenable databases degrade to memory-only operation instead of
//!   failing
//! - **Catalog management**: ordered categories and FAQs with full CRUD,
//!   pairwise drag-reordering, bulk activate/deactivate/delete and icon
//!   upload validation
//! - **Usage analytics**: monotonic view/search/vote counters with top-N
//!   queries and deterministic tie ordering
//! - **Search**: case-insensitive substring filtering with per-category
//!   grouping, related-question resolution and a timer-free input debouncer
//! - **Interchange**: JSON export/import of the whole catalog with validation
//!   on every construction site
//! - **Safe error handling**: no `unwrap()` calls in production code
//!
//! ## Quick Start
//!
//! ```
//! use helpcenter_core::{FaqApp, NewCategory, NewFaq};
//!
//! let mut app = FaqApp::open_in_memory();
//!
//! let billing = app
//!     .catalog
//!     .add_category(
//!         &mut app.store,
//!         NewCategory {
//!             name: "Billing".to_string(),
//!             ..Default::default()
//!         },
//!     )
//!     .unwrap();
//!
//! app.catalog
//!     .add_faq(
//!         &mut app.store,
//!         NewFaq {
//!             category_id: billing,
//!             question: "How do I pay?".to_string(),
//!             answer: "We accept all major cards.".to_string(),
//!             is_active: true,
//!             ..Default::default()
//!         },
//!     )
//!     .unwrap();
//!
//! let results = app.search("pay");
//! assert_eq!(results.len(), 1);
//! ```
//!
//! ## Storage layout
//!
//! Four independent keys hold the persisted state, each a JSON document:
//!
//! | Key              | Contents                  |
//! |------------------|---------------------------|
//! | `faq-categories` | the category collection   |
//! | `faq-items`      | the FAQ collection        |
//! | `faq-analytics`  | aggregated usage counters |
//! | `faq-settings`   | viewer settings           |
//!
//! A fifth key, `faq-votes`, records which FAQs this particular store has
//! already voted on, which is what makes helpfulness voting idempotent.
//!
//! There is no versioning or migration of this layout.
//!
//! [redb]: https://docs.rs/redb

pub mod analytics;
pub mod app_error;
pub mod catalog;
pub mod local_store;
pub mod models;
pub mod search;

use log::info;

pub use crate::analytics::{AnalyticsState, HelpfulnessStat};
pub use crate::app_error::AppError;
pub use crate::catalog::FaqCatalog;
pub use crate::local_store::StoreState;
pub use crate::models::{
    AnalyticsData, Category, ExportBundle, Faq, IconUpload, NewCategory, NewFaq, Settings,
    VoteKind, VoteTally,
};
pub use crate::search::{CategoryGroup, SearchDebouncer};

/// Store key holding the viewer settings.
pub const KEY_SETTINGS: &str = "faq-settings";

/// The whole application state: store, catalog and analytics, owned in one
/// place and passed by reference to every handler.
///
/// The struct fields are public on purpose: catalog operations take the
/// store as an explicit parameter (`app.catalog.add_faq(&mut app.store, ...)`)
/// so the borrow of each piece stays visible at the call site. `FaqApp`'s own
/// methods cover the cross-cutting flows of the public viewer, where a single
/// user action touches both the catalog and the analytics counters.
pub struct FaqApp {
    pub store: StoreState,
    pub catalog: FaqCatalog,
    pub analytics: AnalyticsState,
}

impl FaqApp {
    /// Opens the application state backed by the database at `path`,
    /// starting with an empty catalog on first run.
    pub fn open(path: impl AsRef<std::path::Path>) -> Self {
        Self::from_store(StoreState::open(path), false)
    }

    /// Like [`FaqApp::open`], but a first run is seeded with the starter
    /// catalog.
    pub fn open_seeded(path: impl AsRef<std::path::Path>) -> Self {
        Self::from_store(StoreState::open(path), true)
    }

    /// Application state with no durable backing; everything is lost on drop.
    pub fn open_in_memory() -> Self {
        Self::from_store(StoreState::in_memory(), false)
    }

    fn from_store(mut store: StoreState, seed: bool) -> Self {
        let catalog = if seed {
            FaqCatalog::load_or_seed(&mut store)
        } else {
            FaqCatalog::load(&mut store)
        };
        let analytics = AnalyticsState::load(&mut store);
        info!(
            "Help center ready: {} categories, {} FAQs",
            catalog.categories().len(),
            catalog.faqs().len()
        );
        Self {
            store,
            catalog,
            analytics,
        }
    }

    // Settings

    /// Current viewer settings, written through with defaults on first
    /// access.
    pub fn settings(&mut self) -> Settings {
        self.store.get_record(KEY_SETTINGS, Settings::default())
    }

    /// Replaces the settings record wholesale.
    pub fn update_settings(&mut self, settings: Settings) {
        self.store.set_record(KEY_SETTINGS, &settings);
    }

    pub fn set_show_search_box(&mut self, on: bool) {
        let mut settings = self.settings();
        settings.show_search_box = on;
        self.update_settings(settings);
    }

    /// Enabling this clears `auto_expand_all_categories`; disabling it leaves
    /// the other flag alone.
    pub fn set_auto_expand_first_category(&mut self, on: bool) {
        let mut settings = self.settings();
        settings.auto_expand_first_category = on;
        if on {
            settings.auto_expand_all_categories = false;
        }
        self.update_settings(settings);
    }

    /// Enabling this clears `auto_expand_first_category`; disabling it leaves
    /// the other flag alone.
    pub fn set_auto_expand_all_categories(&mut self, on: bool) {
        let mut settings = self.settings();
        settings.auto_expand_all_categories = on;
        if on {
            settings.auto_expand_first_category = false;
        }
        self.update_settings(settings);
    }

    // Viewer flows

    /// A reader expands a FAQ: counts the view and returns the record.
    /// Unknown ids return `None` and count nothing.
    pub fn view_faq(&mut self, faq_id: u64) -> Option<&Faq> {
        self.catalog.faq(faq_id)?;
        self.analytics.track_faq_view(&mut self.store, faq_id);
        self.catalog.faq(faq_id)
    }

    /// A reader toggles a category open or closed: flips the persisted flag
    /// and counts the view (both directions count, matching the viewer).
    pub fn toggle_category(&mut self, category_id: u64) -> Result<bool, AppError> {
        let expanded = self
            .catalog
            .toggle_category_expanded(&mut self.store, category_id)?;
        self.analytics
            .track_category_view(&mut self.store, category_id);
        Ok(expanded)
    }

    /// A debounced search query fires: counts the term (empty queries are not
    /// counted) and returns the grouped, filtered results.
    ///
    /// Callers debounce keystrokes with [`SearchDebouncer`] and pass only the
    /// settled query here.
    pub fn search(&mut self, query: &str) -> Vec<CategoryGroup<'_>> {
        self.analytics.track_search(&mut self.store, query);
        search::category_results(self.catalog.categories(), self.catalog.faqs(), query)
    }

    /// A reader votes on a FAQ. Returns `false` when this store has already
    /// voted on it, in which case nothing changes.
    pub fn vote(&mut self, faq_id: u64, helpful: bool) -> bool {
        self.analytics.record_vote(&mut self.store, faq_id, helpful)
    }

    /// Related questions to show alongside an expanded FAQ.
    pub fn related_faqs(&self, faq_id: u64) -> Vec<&Faq> {
        match self.catalog.faq(faq_id) {
            Some(faq) => search::related_faqs(faq, self.catalog.faqs()),
            None => Vec::new(),
        }
    }
}
