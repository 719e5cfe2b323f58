//! Plain-text column formatting for help and listing output.

/// Column-aligned text table.
///
/// Every column except the last is padded to its widest cell. Trailing
/// whitespace is never emitted.
#[derive(Debug, Clone, Default)]
pub struct TextTable {
    caption: Option<String>,
    headings: Vec<String>,
    rows: Vec<Vec<String>>,
    indent: usize,
    separator: String,
}

impl TextTable {
    pub fn new() -> Self {
        Self {
            separator: " ".to_string(),
            ..Self::default()
        }
    }

    /// Line printed above the table, followed by a blank line.
    #[must_use]
    pub fn caption(mut self, caption: &str) -> Self {
        self.caption = Some(caption.to_string());
        self
    }

    /// Heading row, underlined with dashes.
    #[must_use]
    pub fn headings<I, S>(mut self, headings: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.headings = headings.into_iter().map(Into::into).collect();
        self
    }

    #[must_use]
    pub const fn indent(mut self, indent: usize) -> Self {
        self.indent = indent;
        self
    }

    /// Text placed between columns.
    #[must_use]
    pub fn separator(mut self, separator: &str) -> Self {
        self.separator = separator.to_string();
        self
    }

    #[must_use]
    pub fn row<I, S>(mut self, cells: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
        self
    }

    pub fn push_row<I, S>(&mut self, cells: I)
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.rows.push(cells.into_iter().map(Into::into).collect());
    }

    pub fn render(&self) -> String {
        let columns = self
            .rows
            .iter()
            .map(Vec::len)
            .chain(std::iter::once(self.headings.len()))
            .max()
            .unwrap_or(0);
        let mut widths = vec![0usize; columns];
        for cells in self.rows.iter().chain(std::iter::once(&self.headings)) {
            for (width, cell) in widths.iter_mut().zip(cells) {
                *width = (*width).max(cell.chars().count());
            }
        }

        let mut lines = Vec::new();
        if let Some(caption) = &self.caption {
            lines.push(caption.clone());
            lines.push(String::new());
        }
        if !self.headings.is_empty() {
            lines.push(self.format_row(&self.headings, &widths));
            let rule: Vec<String> = widths.iter().map(|w| "-".repeat(*w)).collect();
            lines.push(self.format_row(&rule, &widths));
        }
        for cells in &self.rows {
            lines.push(self.format_row(cells, &widths));
        }
        lines.join("\n")
    }

    fn format_row(&self, cells: &[String], widths: &[usize]) -> String {
        let mut line = " ".repeat(self.indent);
        for (index, cell) in cells.iter().enumerate() {
            if index > 0 {
                line.push_str(&self.separator);
            }
            line.push_str(cell);
            if index + 1 < cells.len() {
                let pad = widths[index].saturating_sub(cell.chars().count());
                line.push_str(&" ".repeat(pad));
            }
        }
        line.trim_end().to_string()
    }
}
