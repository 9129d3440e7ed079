use serde::{Deserialize, Serialize};

use crate::models::ReviewItem;

/// Height of a row as requested by the display layer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum RowHeight {
    Fixed(f64),
    /// Let the display layer size the row itself
    Automatic,
}

/// Metrics of a review row.
///
/// Text is wrapped greedily by words using an average glyph width, which is
/// enough to size rows before the display layer renders them. Hosts with real
/// font metrics can override every value.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RowLayout {
    pub inset_top: f64,
    pub inset_left: f64,
    pub inset_bottom: f64,
    pub inset_right: f64,
    pub avatar_size: f64,
    pub avatar_to_content_spacing: f64,
    pub name_line_height: f64,
    pub rating_height: f64,
    pub text_line_height: f64,
    pub show_more_height: f64,
    pub created_line_height: f64,
    /// Vertical gap between consecutive blocks
    pub spacing: f64,
    pub average_glyph_width: f64,
}

impl Default for RowLayout {
    fn default() -> Self {
        Self {
            inset_top: 9.0,
            inset_left: 12.0,
            inset_bottom: 9.0,
            inset_right: 12.0,
            avatar_size: 36.0,
            avatar_to_content_spacing: 10.0,
            name_line_height: 20.0,
            rating_height: 16.0,
            text_line_height: 20.0,
            show_more_height: 20.0,
            created_line_height: 16.0,
            spacing: 6.0,
            average_glyph_width: 8.0,
        }
    }
}

impl RowLayout {
    /// Width left for text once insets and the avatar column are taken.
    pub fn content_width(&self, available_width: f64) -> f64 {
        (available_width
            - self.inset_left
            - self.avatar_size
            - self.avatar_to_content_spacing
            - self.inset_right)
            .max(0.0)
    }

    /// Number of lines `text` wraps to at the given content width.
    pub fn line_count(&self, text: &str, content_width: f64) -> usize {
        let per_line = if self.average_glyph_width > 0.0 {
            ((content_width / self.average_glyph_width).floor() as usize).max(1)
        } else {
            usize::MAX
        };
        text.split('\n').map(|paragraph| wrapped_lines(paragraph, per_line)).sum()
    }

    pub fn review_height(&self, item: &ReviewItem, available_width: f64) -> f64 {
        let content_width = self.content_width(available_width);
        let mut y = self.inset_top;
        y += self.name_line_height + self.spacing;
        y += self.rating_height + self.spacing;

        if !item.text.is_empty() {
            let lines = self.line_count(&item.text, content_width);
            let shown = match item.max_lines {
                0 => lines,
                cap => lines.min(cap as usize),
            };
            y += shown as f64 * self.text_line_height + self.spacing;

            if item.max_lines > 0 && lines > item.max_lines as usize {
                y += self.show_more_height + self.spacing;
            }
        }

        y += self.created_line_height;
        y.max(self.inset_top + self.avatar_size) + self.inset_bottom
    }
}

fn wrapped_lines(paragraph: &str, per_line: usize) -> usize {
    let mut lines = 1;
    let mut used = 0;
    for word in paragraph.split_whitespace() {
        let len = word.chars().count();
        let needed = if used == 0 { len } else { used + 1 + len };
        if needed <= per_line {
            used = needed;
            continue;
        }
        if used > 0 {
            lines += 1;
        }
        // Words wider than a line are broken across lines
        lines += (len.saturating_sub(1)) / per_line;
        used = match len % per_line {
            0 => per_line,
            rest => rest,
        };
    }
    lines
}
