//! Search, grouping and related-question lookup for the public viewer.
//!
//! Everything here is a pure function over catalog slices; the only stateful
//! piece is [`SearchDebouncer`], which models the viewer's keystroke debounce
//! without timers or threads.

use std::time::{Duration, Instant};

use crate::models::{Category, Faq};

/// Upper bound on related questions shown next to an expanded FAQ.
pub const MAX_RELATED: usize = 3;

/// Quiescence window applied to search input before filtering and tracking.
pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Whether a FAQ is visible for `query`.
///
/// Inactive FAQs never match. An empty query matches every active FAQ;
/// otherwise the query must appear case-insensitively in the question or the
/// answer.
pub fn faq_matches(faq: &Faq, query: &str) -> bool {
    if !faq.is_active {
        return false;
    }
    if query.is_empty() {
        return true;
    }
    let query = query.to_lowercase();
    faq.question.to_lowercase().contains(&query) || faq.answer.to_lowercase().contains(&query)
}

/// All FAQs visible for `query`, in display order.
pub fn filter_faqs<'a>(faqs: &'a [Faq], query: &str) -> Vec<&'a Faq> {
    let mut out: Vec<&Faq> = faqs.iter().filter(|f| faq_matches(f, query)).collect();
    out.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
    out
}

/// A category together with its visible FAQs.
#[derive(Debug)]
pub struct CategoryGroup<'a> {
    pub category: &'a Category,
    pub faqs: Vec<&'a Faq>,
}

/// Groups the visible FAQs per category, categories in display order.
///
/// While a non-empty query is active, categories with zero matches are
/// suppressed entirely; with an empty query every category is returned, even
/// an empty one.
pub fn category_results<'a>(
    categories: &'a [Category],
    faqs: &'a [Faq],
    query: &str,
) -> Vec<CategoryGroup<'a>> {
    let mut ordered: Vec<&Category> = categories.iter().collect();
    ordered.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));

    ordered
        .into_iter()
        .filter_map(|category| {
            let mut matches: Vec<&Faq> = faqs
                .iter()
                .filter(|f| f.category_id == category.id && faq_matches(f, query))
                .collect();
            if !query.is_empty() && matches.is_empty() {
                return None;
            }
            matches.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
            Some(CategoryGroup {
                category,
                faqs: matches,
            })
        })
        .collect()
}

/// Related questions for an expanded FAQ.
///
/// A curated `related_questions` list wins: it is resolved against active
/// FAQs and capped at [`MAX_RELATED`], even when that leaves nothing. Only a
/// FAQ with no curated list falls back to other active FAQs from the same
/// category, excluding itself.
pub fn related_faqs<'a>(current: &Faq, faqs: &'a [Faq]) -> Vec<&'a Faq> {
    if !current.related_questions.is_empty() {
        return faqs
            .iter()
            .filter(|f| f.is_active && current.related_questions.contains(&f.id))
            .take(MAX_RELATED)
            .collect();
    }
    faqs.iter()
        .filter(|f| f.is_active && f.id != current.id && f.category_id == current.category_id)
        .take(MAX_RELATED)
        .collect()
}

/// Single-slot debounce for search input.
///
/// Each keystroke replaces the pending term and re-arms the deadline; the
/// term fires through [`SearchDebouncer::poll`] once the input has been quiet
/// for the whole window. At most one term is ever pending.
#[derive(Debug)]
pub struct SearchDebouncer {
    window: Duration,
    pending: Option<(String, Instant)>,
}

impl SearchDebouncer {
    pub fn new() -> Self {
        Self::with_window(DEBOUNCE_WINDOW)
    }

    pub fn with_window(window: Duration) -> Self {
        Self {
            window,
            pending: None,
        }
    }

    /// Registers a keystroke, cancelling any pending term.
    pub fn input(&mut self, term: &str, now: Instant) {
        self.pending = Some((term.to_string(), now + self.window));
    }

    /// Returns the pending term once its quiescence window has elapsed.
    /// Fires at most once per [`SearchDebouncer::input`].
    pub fn poll(&mut self, now: Instant) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .map_or(false, |(_, deadline)| now >= *deadline);
        if due {
            self.pending.take().map(|(term, _)| term)
        } else {
            None
        }
    }

    /// Drops the pending term without firing it.
    pub fn cancel(&mut self) {
        self.pending = None;
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}

impl Default for SearchDebouncer {
    fn default() -> Self {
        Self::new()
    }
}
