use crate::expression::ExpressionCatalog;

/// Text being composed in the input bar, with a byte cursor on a char boundary.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Draft {
    text: String,
    cursor: usize,
}

impl Draft {
    pub fn new() -> Self {
        Self::default()
    }

    /// Starts from existing text with the cursor at the end.
    pub fn from_text(text: impl Into<String>) -> Self {
        let text = text.into();
        let cursor = text.len();
        Self { text, cursor }
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn is_blank(&self) -> bool {
        self.text.trim().is_empty()
    }

    /// Moves the cursor, snapping back to the nearest char boundary.
    pub fn set_cursor(&mut self, cursor: usize) {
        let mut cursor = cursor.min(self.text.len());
        while !self.text.is_char_boundary(cursor) {
            cursor -= 1;
        }
        self.cursor = cursor;
    }

    /// Cursor as a UTF-16 offset, the unit text input handlers report.
    pub fn cursor_utf16(&self) -> usize {
        self.text[..self.cursor].encode_utf16().count()
    }

    /// Moves the cursor to a UTF-16 offset, clamped to the end of the text.
    pub fn set_cursor_utf16(&mut self, offset: usize) {
        let mut units = 0;
        for (index, ch) in self.text.char_indices() {
            if units >= offset {
                self.cursor = index;
                return;
            }
            units += ch.len_utf16();
        }
        self.cursor = self.text.len();
    }

    pub fn insert(&mut self, fragment: &str) {
        self.text.insert_str(self.cursor, fragment);
        self.cursor += fragment.len();
    }

    /// Deletes one char before the cursor, or a whole expression tag when the cursor
    /// sits right after one.
    pub fn delete_backward(&mut self, catalog: &ExpressionCatalog) -> bool {
        if self.cursor == 0 {
            return false;
        }

        let width = catalog
            .tag_ending_at(&self.text, self.cursor)
            .or_else(|| {
                self.text[..self.cursor]
                    .chars()
                    .next_back()
                    .map(char::len_utf8)
            })
            .unwrap_or(0);
        let start = self.cursor - width;
        self.text.replace_range(start..self.cursor, "");
        self.cursor = start;
        width > 0
    }

    /// Returns the composed text and clears the draft.
    pub fn take(&mut self) -> String {
        self.cursor = 0;
        std::mem::take(&mut self.text)
    }
}
