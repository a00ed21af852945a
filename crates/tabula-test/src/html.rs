//! Queries over rendered markup, backed by `scraper`.

use scraper::{ElementRef, Html, Selector};

/// A parsed HTML fragment.
pub struct Markup {
    doc: Html,
}

impl std::fmt::Debug for Markup {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Markup").finish_non_exhaustive()
    }
}

fn selector(css: &str) -> Selector {
    Selector::parse(css).unwrap()
}

/// Direct `<td>`/`<th>` children of a row.
pub fn cells(row: ElementRef<'_>) -> Vec<ElementRef<'_>> {
    row.children()
        .filter_map(ElementRef::wrap)
        .filter(|e| matches!(e.value().name(), "td" | "th"))
        .collect()
}

impl Markup {
    /// Parse a fragment.
    pub fn parse(html: &str) -> Self {
        Self {
            doc: Html::parse_fragment(html),
        }
    }

    /// Elements matching `css`.
    pub fn select(&self, css: &str) -> Vec<ElementRef<'_>> {
        self.doc.select(&selector(css)).collect()
    }

    /// Number of elements matching `css`.
    pub fn count(&self, css: &str) -> usize {
        self.doc.select(&selector(css)).count()
    }

    /// Cell count of every row matching `css`.
    pub fn row_cell_counts(&self, css: &str) -> Vec<usize> {
        self.select(css).into_iter().map(|r| cells(r).len()).collect()
    }

    /// Trimmed text of every cell of the first row matching `css`.
    pub fn row_texts(&self, css: &str) -> Vec<String> {
        self.select(css)
            .first()
            .map(|row| {
                cells(*row)
                    .into_iter()
                    .map(|c| c.text().collect::<String>().trim().to_string())
                    .collect()
            })
            .unwrap_or_default()
    }

    /// `attr` of every element matching `css`.
    pub fn attrs(&self, css: &str, attr: &str) -> Vec<String> {
        self.select(css)
            .into_iter()
            .filter_map(|e| e.value().attr(attr).map(str::to_string))
            .collect()
    }

    /// `attr` of the first element matching `css`.
    pub fn attr(&self, css: &str, attr: &str) -> Option<String> {
        self.attrs(css, attr).into_iter().next()
    }

    /// `(name, value)` of every hidden input.
    pub fn hidden_inputs(&self) -> Vec<(String, String)> {
        self.select(r#"input[type="hidden"]"#)
            .into_iter()
            .map(|e| {
                let v = e.value();
                (
                    v.attr("name").unwrap_or_default().to_string(),
                    v.attr("value").unwrap_or_default().to_string(),
                )
            })
            .collect()
    }

    /// Value of the hidden input named `name`.
    pub fn hidden_value(&self, name: &str) -> Option<String> {
        self.hidden_inputs()
            .into_iter()
            .find(|(n, _)| n == name)
            .map(|(_, v)| v)
    }

    /// Trimmed text of the first element matching `css`.
    pub fn text(&self, css: &str) -> Option<String> {
        self.select(css)
            .first()
            .map(|e| e.text().collect::<String>().trim().to_string())
    }
}
