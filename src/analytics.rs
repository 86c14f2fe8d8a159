use std::collections::BTreeMap;

use crate::local_store::StoreState;
use crate::models::{AnalyticsData, Faq, VoteKind, VoteTally};

/// Store key holding the aggregated counters.
pub const KEY_ANALYTICS: &str = "faq-analytics";
/// Store key holding this store's own vote record.
pub const KEY_VOTES: &str = "faq-votes";

/// Usage counters plus the local vote record.
///
/// Counters only ever increase. The vote record caps helpfulness voting at
/// one vote per FAQ for this store, which is what lets the viewer hide the
/// voting control after the first click.
pub struct AnalyticsState {
    data: AnalyticsData,
    votes: BTreeMap<u64, VoteKind>,
}

impl AnalyticsState {
    pub fn load(store: &mut StoreState) -> Self {
        Self {
            data: store.get_record(KEY_ANALYTICS, AnalyticsData::default()),
            votes: store.get_record(KEY_VOTES, BTreeMap::new()),
        }
    }

    pub fn data(&self) -> &AnalyticsData {
        &self.data
    }

    fn persist(&self, store: &mut StoreState) {
        store.set_record(KEY_ANALYTICS, &self.data);
    }

    // Tracking

    /// Counts one view of a FAQ (fired when a reader expands it).
    pub fn track_faq_view(&mut self, store: &mut StoreState, faq_id: u64) {
        *self.data.faq_views.entry(faq_id).or_insert(0) += 1;
        self.persist(store);
    }

    /// Counts one search. The term is trimmed and lowercased before counting;
    /// empty input is ignored.
    pub fn track_search(&mut self, store: &mut StoreState, term: &str) {
        let term = term.trim().to_lowercase();
        if term.is_empty() {
            return;
        }
        *self.data.search_terms.entry(term).or_insert(0) += 1;
        self.persist(store);
    }

    /// Counts one category open/close toggle.
    pub fn track_category_view(&mut self, store: &mut StoreState, category_id: u64) {
        *self.data.category_views.entry(category_id).or_insert(0) += 1;
        self.persist(store);
    }

    /// Records a helpfulness vote, incrementing exactly one tally by one.
    ///
    /// Only the first vote per FAQ counts; any later call for the same FAQ is
    /// a no-op returning `false`.
    pub fn record_vote(&mut self, store: &mut StoreState, faq_id: u64, helpful: bool) -> bool {
        if self.votes.contains_key(&faq_id) {
            return false;
        }
        let kind = if helpful {
            VoteKind::Helpful
        } else {
            VoteKind::NotHelpful
        };
        self.votes.insert(faq_id, kind);
        let tally = self.data.helpful_votes.entry(faq_id).or_insert(VoteTally::default());
        match kind {
            VoteKind::Helpful => tally.helpful += 1,
            VoteKind::NotHelpful => tally.not_helpful += 1,
        }
        self.persist(store);
        store.set_record(KEY_VOTES, &self.votes);
        true
    }

    pub fn has_voted(&self, faq_id: u64) -> bool {
        self.votes.contains_key(&faq_id)
    }

    pub fn vote_for(&self, faq_id: u64) -> Option<VoteKind> {
        self.votes.get(&faq_id).copied()
    }

    // Queries

    /// The `limit` most-searched terms, most frequent first. Ties break on
    /// the term itself, ascending.
    pub fn top_search_terms(&self, limit: usize) -> Vec<(String, u64)> {
        let mut terms: Vec<(String, u64)> = self
            .data
            .search_terms
            .iter()
            .map(|(term, count)| (term.clone(), *count))
            .collect();
        terms.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        terms.truncate(limit);
        terms
    }

    /// The `limit` most-viewed FAQ ids with their view counts. Ties break on
    /// id, ascending.
    pub fn most_viewed_faqs(&self, limit: usize) -> Vec<(u64, u64)> {
        let mut views: Vec<(u64, u64)> = self
            .data
            .faq_views
            .iter()
            .map(|(id, count)| (*id, *count))
            .collect();
        views.sort_by(|a, b| b.1.cmp(&a.1).then_with(|| a.0.cmp(&b.0)));
        views.truncate(limit);
        views
    }

    pub fn total_faq_views(&self) -> u64 {
        self.data.faq_views.values().sum()
    }

    pub fn total_searches(&self) -> u64 {
        self.data.search_terms.values().sum()
    }

    /// Per-FAQ helpfulness for the dashboard: entries joined against the live
    /// FAQ list, zero-vote and dangling entries dropped, most-voted first
    /// (ties on id, ascending), capped at `limit`.
    pub fn helpfulness_report(&self, faqs: &[Faq], limit: usize) -> Vec<HelpfulnessStat> {
        let mut stats: Vec<HelpfulnessStat> = self
            .data
            .helpful_votes
            .iter()
            .filter_map(|(faq_id, tally)| {
                let faq = faqs.iter().find(|f| f.id == *faq_id)?;
                let total = tally.helpful + tally.not_helpful;
                if total == 0 {
                    return None;
                }
                let percent = ((tally.helpful as f64 / total as f64) * 100.0).round() as u8;
                Some(HelpfulnessStat {
                    faq_id: *faq_id,
                    question: faq.question.clone(),
                    helpful: tally.helpful,
                    not_helpful: tally.not_helpful,
                    helpful_percent: percent,
                })
            })
            .collect();
        stats.sort_by(|a, b| {
            (b.helpful + b.not_helpful)
                .cmp(&(a.helpful + a.not_helpful))
                .then_with(|| a.faq_id.cmp(&b.faq_id))
        });
        stats.truncate(limit);
        stats
    }
}

/// One row of the helpfulness dashboard.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HelpfulnessStat {
    pub faq_id: u64,
    pub question: String,
    pub helpful: u64,
    pub not_helpful: u64,
    pub helpful_percent: u8,
}
