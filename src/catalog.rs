use log::info;

use crate::app_error::AppError;
use crate::local_store::StoreState;
use crate::models::{self, Category, ExportBundle, Faq, IconUpload, NewCategory, NewFaq};

/// Store key holding the category collection.
pub const KEY_CATEGORIES: &str = "faq-categories";
/// Store key holding the FAQ collection.
pub const KEY_FAQS: &str = "faq-items";

/// The two related collections of the catalog plus the id allocator.
///
/// Both collections live in memory and are written through to the store as a
/// whole after every mutation, so no operation can leave a collection
/// partially applied. Identifiers come from a monotonic counter seeded from
/// the highest id seen at load time; they are never reused.
pub struct FaqCatalog {
    categories: Vec<Category>,
    faqs: Vec<Faq>,
    next_id: u64,
}

impl FaqCatalog {
    /// Loads both collections, starting empty on first run.
    pub fn load(store: &mut StoreState) -> Self {
        let categories: Vec<Category> = store.get_record(KEY_CATEGORIES, Vec::new());
        let faqs: Vec<Faq> = store.get_record(KEY_FAQS, Vec::new());
        let mut catalog = Self {
            categories,
            faqs,
            next_id: 1,
        };
        catalog.reseed_next_id();
        catalog
    }

    /// Like [`FaqCatalog::load`], but a store that has never held either
    /// collection gets the starter catalog written through. A catalog the
    /// user emptied on purpose stays empty.
    pub fn load_or_seed(store: &mut StoreState) -> Self {
        let fresh = !store.contains(KEY_CATEGORIES) && !store.contains(KEY_FAQS);
        let mut catalog = Self::load(store);
        if fresh {
            let starter = models::starter_catalog();
            info!(
                "Seeding starter catalog ({} categories, {} FAQs)",
                starter.categories.len(),
                starter.faqs.len()
            );
            catalog.categories = starter.categories;
            catalog.faqs = starter.faqs;
            catalog.reseed_next_id();
            catalog.persist_categories(store);
            catalog.persist_faqs(store);
        }
        catalog
    }

    fn reseed_next_id(&mut self) {
        let highest = self
            .categories
            .iter()
            .map(|c| c.id)
            .chain(self.faqs.iter().map(|f| f.id))
            .max();
        self.next_id = highest.map_or(1, |id| id + 1);
    }

    fn allocate_id(&mut self) -> u64 {
        let id = self.next_id;
        self.next_id += 1;
        id
    }

    fn persist_categories(&self, store: &mut StoreState) {
        store.set_record(KEY_CATEGORIES, &self.categories);
    }

    fn persist_faqs(&self, store: &mut StoreState) {
        store.set_record(KEY_FAQS, &self.faqs);
    }

    // Read accessors

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn faqs(&self) -> &[Faq] {
        &self.faqs
    }

    pub fn category(&self, id: u64) -> Option<&Category> {
        self.categories.iter().find(|c| c.id == id)
    }

    pub fn faq(&self, id: u64) -> Option<&Faq> {
        self.faqs.iter().find(|f| f.id == id)
    }

    /// Categories in display order.
    pub fn categories_ordered(&self) -> Vec<&Category> {
        let mut out: Vec<&Category> = self.categories.iter().collect();
        out.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        out
    }

    /// FAQs of one category in display order.
    pub fn faqs_in_category(&self, category_id: u64) -> Vec<&Faq> {
        let mut out: Vec<&Faq> = self
            .faqs
            .iter()
            .filter(|f| f.category_id == category_id)
            .collect();
        out.sort_by(|a, b| a.order.cmp(&b.order).then_with(|| a.id.cmp(&b.id)));
        out
    }

    pub fn faq_count_for(&self, category_id: u64) -> usize {
        self.faqs.iter().filter(|f| f.category_id == category_id).count()
    }

    // Category operations

    pub fn add_category(
        &mut self,
        store: &mut StoreState,
        draft: NewCategory,
    ) -> Result<u64, AppError> {
        let order = self
            .categories
            .iter()
            .map(|c| c.order)
            .max()
            .map_or(0, |o| o + 1);
        let category = Category {
            id: self.next_id,
            name: draft.name,
            description: draft.description,
            order,
            expanded: draft.expanded,
            icon: draft.icon,
        };
        category.validate()?;
        let id = self.allocate_id();
        self.categories.push(category);
        self.persist_categories(store);
        Ok(id)
    }

    /// Full replace-by-id.
    pub fn update_category(
        &mut self,
        store: &mut StoreState,
        updated: Category,
    ) -> Result<(), AppError> {
        updated.validate()?;
        let slot = self
            .categories
            .iter_mut()
            .find(|c| c.id == updated.id)
            .ok_or_else(|| AppError::NotFound(format!("No category with id {}", updated.id)))?;
        *slot = updated;
        self.persist_categories(store);
        Ok(())
    }

    /// Removes a category. Blocked while any FAQ still references it, leaving
    /// the collection untouched.
    pub fn delete_category(&mut self, store: &mut StoreState, id: u64) -> Result<(), AppError> {
        if self.category(id).is_none() {
            return Err(AppError::NotFound(format!("No category with id {id}")));
        }
        if self.faqs.iter().any(|f| f.category_id == id) {
            return Err(AppError::Conflict(
                "Cannot delete category with existing FAQs. Please move or delete all FAQs first."
                    .to_string(),
            ));
        }
        self.categories.retain(|c| c.id != id);
        self.persist_categories(store);
        Ok(())
    }

    /// Flips the persisted expanded flag, returning the new state.
    pub fn toggle_category_expanded(
        &mut self,
        store: &mut StoreState,
        id: u64,
    ) -> Result<bool, AppError> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("No category with id {id}")))?;
        category.expanded = !category.expanded;
        let expanded = category.expanded;
        self.persist_categories(store);
        Ok(expanded)
    }

    /// Attaches an uploaded icon after validating its type and size. Nothing
    /// is mutated when validation fails.
    pub fn set_category_icon(
        &mut self,
        store: &mut StoreState,
        id: u64,
        upload: IconUpload,
    ) -> Result<(), AppError> {
        upload.validate()?;
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("No category with id {id}")))?;
        category.icon = Some(upload.data);
        self.persist_categories(store);
        Ok(())
    }

    pub fn clear_category_icon(&mut self, store: &mut StoreState, id: u64) -> Result<(), AppError> {
        let category = self
            .categories
            .iter_mut()
            .find(|c| c.id == id)
            .ok_or_else(|| AppError::NotFound(format!("No category with id {id}")))?;
        category.icon = None;
        self.persist_categories(store);
        Ok(())
    }

    // FAQ operations

    pub fn add_faq(&mut self, store: &mut StoreState, draft: NewFaq) -> Result<u64, AppError> {
        if self.category(draft.category_id).is_none() {
            return Err(AppError::ValidationError(format!(
                "No category with id {} to attach the FAQ to",
                draft.category_id
            )));
        }
        let order = self
            .faqs
            .iter()
            .filter(|f| f.category_id == draft.category_id)
            .map(|f| f.order)
            .max()
            .map_or(0, |o| o + 1);
        let faq = Faq {
            id: self.next_id,
            category_id: draft.category_id,
            question: draft.question,
            answer: draft.answer,
            order,
            is_active: draft.is_active,
            related_questions: draft.related_questions,
        };
        faq.validate()?;
        let id = self.allocate_id();
        self.faqs.push(faq);
        self.persist_faqs(store);
        Ok(id)
    }

    /// Full replace-by-id. The new `category_id` must reference a live
    /// category.
    pub fn update_faq(&mut self, store: &mut StoreState, updated: Faq) -> Result<(), AppError> {
        updated.validate()?;
        if self.category(updated.category_id).is_none() {
            return Err(AppError::ValidationError(format!(
                "No category with id {} to attach the FAQ to",
                updated.category_id
            )));
        }
        let slot = self
            .faqs
            .iter_mut()
            .find(|f| f.id == updated.id)
            .ok_or_else(|| AppError::NotFound(format!("No FAQ with id {}", updated.id)))?;
        *slot = updated;
        self.persist_faqs(store);
        Ok(())
    }

    /// Unconditional removal. Confirmation prompts are the caller's concern.
    pub fn delete_faq(&mut self, store: &mut StoreState, id: u64) -> Result<(), AppError> {
        if self.faq(id).is_none() {
            return Err(AppError::NotFound(format!("No FAQ with id {id}")));
        }
        self.faqs.retain(|f| f.id != id);
        self.persist_faqs(store);
        Ok(())
    }

    /// Flips the active flag, returning the new state.
    pub fn toggle_faq_active(&mut self, store: &mut StoreState, id: u64) -> Result<bool, AppError> {
        let faq = self
            .faqs
            .iter_mut()
            .find(|f| f.id == id)
            .ok_or_else(|| AppError::NotFound(format!("No FAQ with id {id}")))?;
        faq.is_active = !faq.is_active;
        let active = faq.is_active;
        self.persist_faqs(store);
        Ok(active)
    }

    // Reordering

    /// Exchanges the `order` values of two FAQs in the same category. Every
    /// other item keeps its position.
    pub fn swap_faq_order(
        &mut self,
        store: &mut StoreState,
        dragged_id: u64,
        target_id: u64,
    ) -> Result<(), AppError> {
        let dragged = self
            .faqs
            .iter()
            .position(|f| f.id == dragged_id)
            .ok_or_else(|| AppError::NotFound(format!("No FAQ with id {dragged_id}")))?;
        let target = self
            .faqs
            .iter()
            .position(|f| f.id == target_id)
            .ok_or_else(|| AppError::NotFound(format!("No FAQ with id {target_id}")))?;
        if self.faqs[dragged].category_id != self.faqs[target].category_id {
            return Err(AppError::BadRequest(
                "FAQs can only be reordered within their own category".to_string(),
            ));
        }
        let order = self.faqs[dragged].order;
        self.faqs[dragged].order = self.faqs[target].order;
        self.faqs[target].order = order;
        self.persist_faqs(store);
        Ok(())
    }

    /// Exchanges the `order` values of two categories.
    pub fn swap_category_order(
        &mut self,
        store: &mut StoreState,
        dragged_id: u64,
        target_id: u64,
    ) -> Result<(), AppError> {
        let dragged = self
            .categories
            .iter()
            .position(|c| c.id == dragged_id)
            .ok_or_else(|| AppError::NotFound(format!("No category with id {dragged_id}")))?;
        let target = self
            .categories
            .iter()
            .position(|c| c.id == target_id)
            .ok_or_else(|| AppError::NotFound(format!("No category with id {target_id}")))?;
        let order = self.categories[dragged].order;
        self.categories[dragged].order = self.categories[target].order;
        self.categories[target].order = order;
        self.persist_categories(store);
        Ok(())
    }

    // Bulk operations

    /// Activates or deactivates every FAQ in `ids`. Unknown ids are skipped.
    /// Returns how many records changed state.
    pub fn bulk_set_active(&mut self, store: &mut StoreState, ids: &[u64], active: bool) -> usize {
        let mut changed = 0;
        for faq in self.faqs.iter_mut().filter(|f| ids.contains(&f.id)) {
            if faq.is_active != active {
                faq.is_active = active;
                changed += 1;
            }
        }
        if changed > 0 {
            self.persist_faqs(store);
        }
        changed
    }

    /// Deletes every FAQ in `ids`, returning how many were removed.
    pub fn bulk_delete(&mut self, store: &mut StoreState, ids: &[u64]) -> usize {
        let before = self.faqs.len();
        self.faqs.retain(|f| !ids.contains(&f.id));
        let removed = before - self.faqs.len();
        if removed > 0 {
            self.persist_faqs(store);
        }
        removed
    }

    /// Candidate FAQs for the related-questions picker: active, excluding the
    /// FAQ under edit, optionally narrowed to one category, alphabetical by
    /// question.
    pub fn available_related_questions(
        &self,
        exclude: Option<u64>,
        category_filter: Option<u64>,
    ) -> Vec<&Faq> {
        let mut out: Vec<&Faq> = self
            .faqs
            .iter()
            .filter(|f| f.is_active)
            .filter(|f| Some(f.id) != exclude)
            .filter(|f| category_filter.map_or(true, |c| f.category_id == c))
            .collect();
        out.sort_by(|a, b| {
            a.question
                .to_lowercase()
                .cmp(&b.question.to_lowercase())
                .then_with(|| a.id.cmp(&b.id))
        });
        out
    }

    // Import / export

    pub fn export(&self) -> ExportBundle {
        ExportBundle {
            categories: self.categories.clone(),
            faqs: self.faqs.clone(),
        }
    }

    /// Pretty-printed interchange document, ready to hand to a file download.
    pub fn export_json(&self) -> Result<String, AppError> {
        Ok(serde_json::to_string_pretty(&self.export())?)
    }

    /// Replaces both collections wholesale from an interchange document.
    ///
    /// Malformed JSON, missing `categories`/`faqs` keys, or a record failing
    /// field validation all leave the catalog unchanged. References are not
    /// checked, so an imported FAQ may point at a category that does not
    /// exist. Returns the imported counts.
    pub fn import_json(
        &mut self,
        store: &mut StoreState,
        raw: &str,
    ) -> Result<(usize, usize), AppError> {
        let bundle: ExportBundle = serde_json::from_str(raw)
            .map_err(|e| AppError::BadRequest(format!("Invalid import file: {e}")))?;
        for category in &bundle.categories {
            category.validate()?;
        }
        for faq in &bundle.faqs {
            faq.validate()?;
        }
        let counts = (bundle.categories.len(), bundle.faqs.len());
        self.categories = bundle.categories;
        self.faqs = bundle.faqs;
        self.reseed_next_id();
        self.persist_categories(store);
        self.persist_faqs(store);
        info!("Imported {} categories and {} FAQs", counts.0, counts.1);
        Ok(counts)
    }
}
