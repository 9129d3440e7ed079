use std::collections::HashMap;

use derive_more::Debug;

use crate::{
    layout::{RowHeight, RowLayout},
    models::{ListItem, ReviewId, ReviewItem, SummaryItem},
    plural::{PluralForms, review_count_label},
};

/// Everything the reviews screen knows about its list.
///
/// The controller is the only writer. The display layer receives clones of
/// this value as immutable snapshots and reads rows through the read-model
/// methods below.
#[derive(Debug, Clone, PartialEq)]
pub struct PaginationState {
    #[debug("({} items)", items.len())]
    items: Vec<ReviewItem>,
    #[debug(skip)]
    index: HashMap<ReviewId, usize>,
    /// Records already requested
    pub(crate) offset: u32,
    /// Page size
    pub(crate) limit: u32,
    /// Server-reported total, unknown until the first page arrives
    pub(crate) total_count: Option<u32>,
    /// Eligibility flag: a next page may be requested
    pub(crate) should_load: bool,
    pub(crate) is_loading: bool,
    pub(crate) is_first_load: bool,
}

impl PaginationState {
    pub fn new(limit: u32) -> Self {
        Self {
            items: Vec::new(),
            index: HashMap::new(),
            offset: 0,
            limit,
            total_count: None,
            should_load: true,
            is_loading: false,
            is_first_load: true,
        }
    }

    pub fn items(&self) -> &[ReviewItem] {
        &self.items
    }

    pub fn offset(&self) -> u32 {
        self.offset
    }

    pub fn limit(&self) -> u32 {
        self.limit
    }

    pub fn total_count(&self) -> Option<u32> {
        self.total_count
    }

    pub fn should_load(&self) -> bool {
        self.should_load
    }

    pub fn is_loading(&self) -> bool {
        self.is_loading
    }

    pub fn is_first_load(&self) -> bool {
        self.is_first_load
    }

    pub fn item(&self, id: ReviewId) -> Option<&ReviewItem> {
        self.index.get(&id).map(|&i| &self.items[i])
    }

    pub(crate) fn item_mut(&mut self, id: ReviewId) -> Option<&mut ReviewItem> {
        self.index.get(&id).map(|&i| &mut self.items[i])
    }

    pub(crate) fn push(&mut self, item: ReviewItem) {
        self.index.insert(item.id, self.items.len());
        self.items.push(item);
    }

    /// The trailing summary row is shown once a first attempt has resolved,
    /// nothing is in flight and no pages remain.
    pub fn has_summary_row(&self) -> bool {
        !self.is_first_load && !self.should_load && !self.is_loading
    }

    pub fn row_count(&self) -> usize {
        self.items.len() + usize::from(self.has_summary_row())
    }

    pub fn row_at(&self, index: usize) -> Option<ListItem> {
        if let Some(item) = self.items.get(index) {
            return Some(ListItem::Review(item.clone()));
        }
        (index == self.items.len() && self.has_summary_row())
            .then(|| ListItem::Summary(SummaryItem { count: self.items.len() }))
    }

    pub fn row_height(
        &self,
        index: usize,
        available_width: f64,
        layout: &RowLayout,
    ) -> Option<RowHeight> {
        if let Some(item) = self.items.get(index) {
            return Some(RowHeight::Fixed(layout.review_height(item, available_width)));
        }
        (index == self.items.len() && self.has_summary_row()).then_some(RowHeight::Automatic)
    }

    pub fn summary_label(&self, forms: &PluralForms) -> Option<String> {
        self.has_summary_row().then(|| review_count_label(self.items.len(), forms))
    }
}

#[cfg(test)]
mod tests {
    use test_log::test;

    use super::*;
    use crate::models::ExpandCommand;

    fn item(text: &str) -> ReviewItem {
        let id = ReviewId::new();
        ReviewItem {
            id,
            full_name: "Anna Smirnova".to_string(),
            rating: 4,
            text: text.to_string(),
            created: "yesterday".to_string(),
            max_lines: 3,
            on_expand: ExpandCommand::detached(id),
        }
    }

    #[test]
    fn initial_state_wants_to_load() {
        let state = PaginationState::new(20);
        assert!(state.should_load());
        assert!(!state.is_loading());
        assert!(state.is_first_load());
        assert_eq!(state.offset(), 0);
        assert_eq!(state.total_count(), None);
        assert_eq!(state.row_count(), 0);
        assert_eq!(state.row_at(0), None);
    }

    #[test]
    fn index_tracks_pushed_items() {
        let mut state = PaginationState::new(20);
        let a = item("a");
        let b = item("b");
        let (a_id, b_id) = (a.id, b.id);
        state.push(a);
        state.push(b);
        assert_eq!(state.item(a_id).map(|i| i.text.as_str()), Some("a"));
        assert_eq!(state.item(b_id).map(|i| i.text.as_str()), Some("b"));
        assert!(state.item(ReviewId::new()).is_none());
    }

    #[test]
    fn summary_row_only_when_exhausted() {
        let mut state = PaginationState::new(20);
        state.push(item("a"));
        state.push(item("b"));

        // More pages pending
        state.is_first_load = false;
        assert!(!state.has_summary_row());
        assert_eq!(state.row_count(), 2);

        // In flight
        state.should_load = false;
        state.is_loading = true;
        assert!(!state.has_summary_row());

        state.is_loading = false;
        assert_eq!(state.row_count(), 3);
        assert_eq!(state.row_at(2), Some(ListItem::Summary(SummaryItem { count: 2 })));
        assert_eq!(state.row_at(3), None);
        assert_eq!(state.summary_label(&PluralForms::default()).as_deref(), Some("2 отзыва"));
    }

    #[test]
    fn row_heights() {
        let mut state = PaginationState::new(20);
        state.push(item("short"));
        let layout = RowLayout::default();
        assert!(matches!(state.row_height(0, 375.0, &layout), Some(RowHeight::Fixed(h)) if h > 0.0));
        assert_eq!(state.row_height(1, 375.0, &layout), None);

        state.is_first_load = false;
        state.should_load = false;
        assert_eq!(state.row_height(1, 375.0, &layout), Some(RowHeight::Automatic));
    }
}
