//! Numeric agreement for the summary row ("21 отзыв", "22 отзыва", "25 отзывов").

use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PluralForm {
    One,
    Few,
    Many,
}

impl PluralForm {
    /// Picks the word form agreeing with `n`.
    ///
    /// The 11..=19 check must run before the `% 10` checks: 12, 13 and 14
    /// take the "many" form, not "few".
    pub fn for_count(n: usize) -> Self {
        if (11..=19).contains(&(n % 100)) {
            PluralForm::Many
        } else if (2..=4).contains(&(n % 10)) {
            PluralForm::Few
        } else if n % 10 == 1 {
            PluralForm::One
        } else {
            PluralForm::Many
        }
    }
}

/// Word forms for the summary row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct PluralForms {
    pub one: String,
    pub few: String,
    pub many: String,
}

impl PluralForms {
    pub fn get(&self, form: PluralForm) -> &str {
        match form {
            PluralForm::One => &self.one,
            PluralForm::Few => &self.few,
            PluralForm::Many => &self.many,
        }
    }
}

impl Default for PluralForms {
    fn default() -> Self {
        Self { one: "отзыв".to_string(), few: "отзыва".to_string(), many: "отзывов".to_string() }
    }
}

pub fn review_count_label(n: usize, forms: &PluralForms) -> String {
    format!("{n} {}", forms.get(PluralForm::for_count(n)))
}
