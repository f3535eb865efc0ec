//! Page layout: turns headings, tables and paragraphs into positioned text runs.
//!
//! Layout works in points measured from the top edge of the page and only
//! converts to millimetres (bottom-left origin, as PDF expects) when a run is
//! emitted. Text width is estimated from an average Helvetica glyph width, so
//! wrapping is by character budget rather than exact metrics.

use serde::Serialize;

/// Millimetres per typographic point.
pub const MM_PER_PT: f32 = 25.4 / 72.0;

/// Average Helvetica advance width as a fraction of the font size.
const AVG_CHAR_EM: f32 = 0.5;

/// Page geometry.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct PageSetup {
    pub width_pt: f32,
    pub height_pt: f32,
    pub margin_pt: f32,
}

impl PageSetup {
    /// US Letter with 40pt margins.
    pub fn letter() -> Self {
        Self {
            width_pt: 612.0,
            height_pt: 792.0,
            margin_pt: 40.0,
        }
    }

    pub fn width_mm(&self) -> f32 {
        self.width_pt * MM_PER_PT
    }

    pub fn height_mm(&self) -> f32 {
        self.height_pt * MM_PER_PT
    }

    fn bottom_limit(&self) -> f32 {
        self.height_pt - self.margin_pt
    }
}

impl Default for PageSetup {
    fn default() -> Self {
        Self::letter()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FontWeight {
    Regular,
    Bold,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TextColor {
    Black,
    DarkBlue,
}

impl TextColor {
    /// RGB components in 0..=1.
    pub fn rgb(&self) -> (f32, f32, f32) {
        match self {
            TextColor::Black => (0.0, 0.0, 0.0),
            TextColor::DarkBlue => (0.0, 0.0, 0.545),
        }
    }
}

/// Font and spacing for a block of text.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TextStyle {
    pub size_pt: f32,
    pub leading_pt: f32,
    pub space_after_pt: f32,
    pub weight: FontWeight,
    pub color: TextColor,
}

impl TextStyle {
    pub const TITLE: TextStyle = TextStyle {
        size_pt: 14.0,
        leading_pt: 15.0,
        space_after_pt: 1.0,
        weight: FontWeight::Bold,
        color: TextColor::Black,
    };

    pub const HEADING: TextStyle = TextStyle {
        size_pt: 12.0,
        leading_pt: 15.0,
        space_after_pt: 10.0,
        weight: FontWeight::Bold,
        color: TextColor::DarkBlue,
    };

    pub const BODY: TextStyle = TextStyle {
        size_pt: 10.0,
        leading_pt: 12.0,
        space_after_pt: 0.0,
        weight: FontWeight::Regular,
        color: TextColor::Black,
    };

    /// How many characters fit in `width_pt` at this size.
    pub fn chars_per_width(&self, width_pt: f32) -> usize {
        ((width_pt / (self.size_pt * AVG_CHAR_EM)).floor() as usize).max(1)
    }

    fn estimated_width_pt(&self, text: &str) -> f32 {
        text.chars().count() as f32 * self.size_pt * AVG_CHAR_EM
    }
}

/// One positioned line of text.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TextRun {
    pub text: String,
    /// Distance from the left edge.
    pub x_mm: f32,
    /// Baseline distance from the bottom edge.
    pub y_mm: f32,
    pub size_pt: f32,
    pub weight: FontWeight,
    pub color: TextColor,
}

#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct PageLayout {
    pub runs: Vec<TextRun>,
}

/// A fully laid out document, ready to paint.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DocumentLayout {
    pub title: String,
    pub setup: PageSetup,
    pub pages: Vec<PageLayout>,
}

impl DocumentLayout {
    pub fn page_count(&self) -> usize {
        self.pages.len()
    }

    /// All run text in paint order, separated by single spaces.
    pub fn plain_text(&self) -> String {
        self.pages
            .iter()
            .flat_map(|p| p.runs.iter())
            .map(|r| r.text.as_str())
            .collect::<Vec<_>>()
            .join(" ")
    }

    pub fn runs(&self) -> impl Iterator<Item = &TextRun> {
        self.pages.iter().flat_map(|p| p.runs.iter())
    }
}

/// Widths of a two-column label/value table.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TableColumns {
    pub label_pt: f32,
    pub value_pt: f32,
    pub bottom_padding_pt: f32,
}

impl Default for TableColumns {
    fn default() -> Self {
        Self {
            label_pt: 200.0,
            value_pt: 330.0,
            bottom_padding_pt: 5.0,
        }
    }
}

/// Sequential layout with automatic page breaks.
pub struct LayoutBuilder {
    title: String,
    setup: PageSetup,
    pages: Vec<PageLayout>,
    /// Distance of the last baseline from the top edge.
    cursor_pt: f32,
}

impl LayoutBuilder {
    pub fn new(title: impl Into<String>, setup: PageSetup) -> Self {
        Self {
            title: title.into(),
            setup,
            pages: vec![PageLayout::default()],
            cursor_pt: setup.margin_pt,
        }
    }

    /// Centred single lines, wrapped to the content width.
    pub fn centered(&mut self, text: &str, style: TextStyle) -> &mut Self {
        let content = self.setup.width_pt - 2.0 * self.setup.margin_pt;
        for line in wrap_text(text, style.chars_per_width(content)) {
            let (page, baseline) = self.next_line(style.leading_pt);
            let x = ((self.setup.width_pt - style.estimated_width_pt(&line)) / 2.0)
                .max(self.setup.margin_pt);
            self.push(page, line, x, baseline, style);
        }
        self.advance(style.space_after_pt);
        self
    }

    /// Left-aligned paragraph, wrapped to the content width.
    pub fn paragraph(&mut self, text: &str, style: TextStyle) -> &mut Self {
        let content = self.setup.width_pt - 2.0 * self.setup.margin_pt;
        for line in wrap_text(text, style.chars_per_width(content)) {
            let (page, baseline) = self.next_line(style.leading_pt);
            let x = self.setup.margin_pt;
            self.push(page, line, x, baseline, style);
        }
        self.advance(style.space_after_pt);
        self
    }

    /// Vertical gap. Gaps never start a new page on their own.
    pub fn spacer(&mut self, height_pt: f32) -> &mut Self {
        self.advance(height_pt);
        self
    }

    /// Two-column table; both columns wrap and a row may break across pages.
    pub fn table(
        &mut self,
        rows: &[(String, String)],
        columns: TableColumns,
        style: TextStyle,
    ) -> &mut Self {
        let label_x = self.setup.margin_pt;
        let value_x = label_x + columns.label_pt;
        let label_chars = style.chars_per_width(columns.label_pt);
        let value_chars = style.chars_per_width(columns.value_pt);

        for (label, value) in rows {
            let label_lines = wrap_text(label, label_chars);
            let value_lines = wrap_text(value, value_chars);
            let height = label_lines.len().max(value_lines.len());

            let slots: Vec<(usize, f32)> =
                (0..height).map(|_| self.next_line(style.leading_pt)).collect();

            for (line, &(page, baseline)) in label_lines.into_iter().zip(&slots) {
                self.push(page, line, label_x, baseline, style);
            }
            for (line, &(page, baseline)) in value_lines.into_iter().zip(&slots) {
                self.push(page, line, value_x, baseline, style);
            }
            self.advance(columns.bottom_padding_pt);
        }
        self
    }

    pub fn finish(self) -> DocumentLayout {
        tracing::debug!(pages = self.pages.len(), title = %self.title, "Layout finished");
        DocumentLayout {
            title: self.title,
            setup: self.setup,
            pages: self.pages,
        }
    }

    /// Reserve a line of `leading_pt`, breaking the page first if it would overflow.
    fn next_line(&mut self, leading_pt: f32) -> (usize, f32) {
        if self.cursor_pt + leading_pt > self.setup.bottom_limit() {
            self.pages.push(PageLayout::default());
            self.cursor_pt = self.setup.margin_pt;
            tracing::debug!(page = self.pages.len(), "Page break");
        }
        self.cursor_pt += leading_pt;
        (self.pages.len() - 1, self.cursor_pt)
    }

    fn advance(&mut self, height_pt: f32) {
        self.cursor_pt = (self.cursor_pt + height_pt).min(self.setup.bottom_limit());
    }

    fn push(&mut self, page: usize, text: String, x_pt: f32, baseline_pt: f32, style: TextStyle) {
        if text.is_empty() {
            return;
        }
        let run = TextRun {
            text,
            x_mm: x_pt * MM_PER_PT,
            y_mm: (self.setup.height_pt - baseline_pt) * MM_PER_PT,
            size_pt: style.size_pt,
            weight: style.weight,
            color: style.color,
        };
        self.pages[page].runs.push(run);
    }
}

/// Word-wrap `text` to at most `max_chars` characters per line.
///
/// Explicit newlines are kept as line breaks, runs of whitespace collapse to
/// one space, and words longer than `max_chars` are split. Always returns at
/// least one (possibly empty) line.
pub fn wrap_text(text: &str, max_chars: usize) -> Vec<String> {
    let max_chars = max_chars.max(1);
    let mut lines = Vec::new();

    for paragraph in text.split('\n') {
        let mut current = String::new();
        let mut current_len = 0;

        for word in paragraph.split_whitespace() {
            let mut word: Vec<char> = word.chars().collect();

            while word.len() > max_chars {
                if current_len > 0 {
                    lines.push(std::mem::take(&mut current));
                    current_len = 0;
                }
                let rest = word.split_off(max_chars);
                lines.push(word.into_iter().collect());
                word = rest;
            }
            if word.is_empty() {
                continue;
            }

            if current_len > 0 && current_len + 1 + word.len() > max_chars {
                lines.push(std::mem::take(&mut current));
                current_len = 0;
            }
            if current_len > 0 {
                current.push(' ');
                current_len += 1;
            }
            current_len += word.len();
            current.extend(word);
        }
        lines.push(current);
    }

    // Trailing newlines should not add blank lines
    while lines.len() > 1 && lines.last().is_some_and(String::is_empty) {
        lines.pop();
    }
    lines
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_wrap_short_text() {
        assert_eq!(wrap_text("hello world", 20), vec!["hello world"]);
    }

    #[test]
    fn test_wrap_breaks_on_words() {
        assert_eq!(
            wrap_text("the quick brown fox jumps", 10),
            vec!["the quick", "brown fox", "jumps"]
        );
    }

    #[test]
    fn test_wrap_splits_long_words() {
        assert_eq!(wrap_text("ab abcdefghij", 4), vec!["ab", "abcd", "efgh", "ij"]);
    }

    #[test]
    fn test_wrap_keeps_newlines() {
        assert_eq!(wrap_text("line one\nline two\n", 40), vec!["line one", "line two"]);
        assert_eq!(wrap_text("a\n\nb", 40), vec!["a", "", "b"]);
    }

    #[test]
    fn test_wrap_empty() {
        assert_eq!(wrap_text("", 10), vec![""]);
        assert_eq!(wrap_text("   ", 10), vec![""]);
    }

    #[test]
    fn test_wrap_counts_chars_not_bytes() {
        assert_eq!(wrap_text("ñññ ñññ", 7), vec!["ñññ ñññ"]);
    }

    proptest! {
        #[test]
        fn prop_wrapped_lines_fit(text in "[a-z ]{0,200}", max in 1usize..60) {
            for line in wrap_text(&text, max) {
                prop_assert!(line.chars().count() <= max);
            }
        }

        #[test]
        fn prop_wrap_preserves_words(words in prop::collection::vec("[a-z]{1,8}", 0..40), max in 8usize..60) {
            let text = words.join(" ");
            let rejoined = wrap_text(&text, max).join(" ");
            prop_assert_eq!(rejoined.split_whitespace().collect::<Vec<_>>(), words.iter().map(String::as_str).collect::<Vec<_>>());
        }
    }

    #[test]
    fn test_builder_starts_with_one_page() {
        let layout = LayoutBuilder::new("Empty", PageSetup::letter()).finish();
        assert_eq!(layout.page_count(), 1);
        assert!(layout.plain_text().is_empty());
    }

    #[test]
    fn test_runs_stay_inside_margins() {
        let setup = PageSetup::letter();
        let mut builder = LayoutBuilder::new("Doc", setup);
        let rows: Vec<(String, String)> = (0..200)
            .map(|i| (format!("Row {i}"), "value ".repeat(30)))
            .collect();
        builder.table(&rows, TableColumns::default(), TextStyle::BODY);
        let layout = builder.finish();

        assert!(layout.page_count() > 1);
        let bottom_mm = setup.margin_pt * MM_PER_PT;
        let top_mm = setup.height_mm() - bottom_mm;
        for run in layout.runs() {
            assert!(run.y_mm >= bottom_mm - 0.01, "run below margin: {run:?}");
            assert!(run.y_mm <= top_mm, "run above margin: {run:?}");
        }
    }

    #[test]
    fn test_table_value_column_offset() {
        let mut builder = LayoutBuilder::new("Doc", PageSetup::letter());
        builder.table(
            &[("Label:".to_string(), "Value".to_string())],
            TableColumns::default(),
            TextStyle::BODY,
        );
        let layout = builder.finish();
        let runs: Vec<_> = layout.runs().collect();
        assert_eq!(runs.len(), 2);
        assert_eq!(runs[0].y_mm, runs[1].y_mm);
        assert!((runs[1].x_mm - runs[0].x_mm - 200.0 * MM_PER_PT).abs() < 0.001);
    }

    #[test]
    fn test_empty_table_adds_nothing() {
        let mut builder = LayoutBuilder::new("Doc", PageSetup::letter());
        builder.table(&[], TableColumns::default(), TextStyle::BODY);
        assert!(builder.finish().runs().next().is_none());
    }
}
