use std::{
    fmt,
    sync::{Arc, Weak},
};

use derive_more::Debug;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
    controller::ReviewsController,
    plural::{PluralForms, review_count_label},
};

/// Stable identity of a review row for the lifetime of the list.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[debug("{_0}")]
pub struct ReviewId(Uuid);

impl ReviewId {
    pub fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl Default for ReviewId {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Display for ReviewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// "Show more" action handed to the display layer.
///
/// Holds only the row id and a weak handle to the controller, so a row kept
/// alive by the UI never keeps the controller (or its state) alive.
#[derive(Debug, Clone)]
pub struct ExpandCommand {
    id: ReviewId,
    #[debug(skip)]
    controller: Weak<ReviewsController>,
}

impl ExpandCommand {
    pub(crate) fn new(id: ReviewId, controller: Weak<ReviewsController>) -> Self {
        Self { id, controller }
    }

    /// A command not bound to any controller. Invoking it does nothing.
    pub fn detached(id: ReviewId) -> Self {
        Self { id, controller: Weak::new() }
    }

    pub fn id(&self) -> ReviewId {
        self.id
    }

    /// Expands the row. Returns `false` if the controller is gone.
    pub fn invoke(&self) -> bool {
        match self.controller.upgrade() {
            Some(controller) => {
                controller.expand(self.id);
                true
            }
            None => false,
        }
    }

    pub fn is_bound_to(&self, controller: &Arc<ReviewsController>) -> bool {
        Weak::ptr_eq(&self.controller, &Arc::downgrade(controller))
    }
}

impl PartialEq for ExpandCommand {
    fn eq(&self, other: &Self) -> bool {
        self.id == other.id && Weak::ptr_eq(&self.controller, &other.controller)
    }
}

impl Eq for ExpandCommand {}

/// Render-ready review row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReviewItem {
    pub id: ReviewId,
    pub full_name: String,
    pub rating: i32,
    #[debug("({} chars)", text.chars().count())]
    pub text: String,
    pub created: String,
    /// Line cap for `text`; 0 means unlimited
    pub max_lines: u32,
    pub on_expand: ExpandCommand,
}

impl ReviewItem {
    pub fn is_expanded(&self) -> bool {
        self.max_lines == 0
    }
}

/// Trailing row reporting how many reviews were loaded.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SummaryItem {
    pub count: usize,
}

impl SummaryItem {
    pub fn label(&self, forms: &PluralForms) -> String {
        review_count_label(self.count, forms)
    }
}

/// A row descriptor as seen by the display layer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ListItem {
    Review(ReviewItem),
    Summary(SummaryItem),
}

impl ListItem {
    pub fn as_review(&self) -> Option<&ReviewItem> {
        match self {
            ListItem::Review(item) => Some(item),
            ListItem::Summary(_) => None,
        }
    }

    pub fn as_summary(&self) -> Option<&SummaryItem> {
        match self {
            ListItem::Summary(item) => Some(item),
            ListItem::Review(_) => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn detached_command_is_a_no_op() {
        let cmd = ExpandCommand::detached(ReviewId::new());
        assert!(!cmd.invoke());
    }

    #[test]
    fn ids_are_unique() {
        let a = ReviewId::new();
        let b = ReviewId::new();
        assert_ne!(a, b);
    }

    #[test]
    fn debug_hides_long_text() {
        let item = ReviewItem {
            id: ReviewId::new(),
            full_name: "Ivan Petrov".to_string(),
            rating: 5,
            text: "x".repeat(500),
            created: "today".to_string(),
            max_lines: 3,
            on_expand: ExpandCommand::detached(ReviewId::new()),
        };
        let dbg = format!("{item:?}");
        assert!(dbg.contains("(500 chars)"));
        assert!(!dbg.contains(&"x".repeat(500)));
    }

    #[test]
    fn summary_label_uses_forms() {
        let summary = SummaryItem { count: 21 };
        assert_eq!(summary.label(&PluralForms::default()), "21 отзыв");
    }
}
