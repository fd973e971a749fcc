//! HTML markup renderer.

use std::fmt::Write;

use serde_json::Value;

use super::RenderSink;
use crate::model::ColumnSpec;
use crate::model::Row;
use crate::sort::SortState;

/// Class added to the table root while a page is loading.
pub const LOADING_CLASS: &str = "sortable-table_loading";

/// Default link prefix for body rows.
pub const DEFAULT_ROW_LINK: &str = "/products";

/// Renders the table as HTML markup.
///
/// Header cells carry `data-id` and `data-sortable`; the sorted column also
/// carries `data-order`. Body rows link to `{row_link}/{id}` and hold one
/// cell per column, produced by the column template when there is one.
#[derive(Debug, Clone)]
pub struct HtmlRenderer {
    columns: Vec<ColumnSpec>,
    row_link: String,
    body: String,
    row_count: usize,
    sorted: Option<SortState>,
    loading: bool,
}

impl HtmlRenderer {
    /// Creates a renderer for the given columns.
    pub fn new(columns: Vec<ColumnSpec>) -> Self {
        Self {
            columns,
            row_link: DEFAULT_ROW_LINK.to_string(),
            body: String::new(),
            row_count: 0,
            sorted: None,
            loading: false,
        }
    }

    /// Sets the link prefix for body rows.
    pub fn with_row_link(mut self, row_link: impl Into<String>) -> Self {
        self.row_link = row_link.into().trim_end_matches('/').to_string();
        self
    }

    /// Header row markup.
    pub fn header_html(&self) -> String {
        let mut html =
            String::from(r#"<div data-element="header" class="sortable-table__header sortable-table__row">"#);
        for column in &self.columns {
            let order = self
                .sorted
                .as_ref()
                .filter(|sort| sort.column_id == column.id)
                .map(|sort| format!(r#" data-order="{}""#, sort.direction))
                .unwrap_or_default();
            let _ = write!(
                html,
                concat!(
                    r#"<div class="sortable-table__cell" data-id="{}" data-sortable="{}"{}>"#,
                    r#"<span>{}</span>"#,
                    r#"<span data-element="arrow" class="sortable-table__sort-arrow"><span class="sort-arrow"></span></span>"#,
                    "</div>"
                ),
                escape(&column.id),
                column.sortable,
                order,
                escape(&column.title),
            );
        }
        html.push_str("</div>");
        html
    }

    /// Body markup.
    pub fn body_html(&self) -> String {
        format!(
            r#"<div data-element="body" class="sortable-table__body">{}</div>"#,
            self.body
        )
    }

    /// Full table markup.
    pub fn table_html(&self) -> String {
        let class = if self.loading {
            format!("sortable-table {LOADING_CLASS}")
        } else {
            "sortable-table".to_string()
        };
        format!(
            r#"<div class="{}">{}{}<div data-element="loading" class="loading-line sortable-table__loading-line"></div></div>"#,
            class,
            self.header_html(),
            self.body_html(),
        )
    }

    /// Number of rendered body rows.
    pub fn row_count(&self) -> usize {
        self.row_count
    }

    /// The column currently marked as sorted.
    pub fn sorted(&self) -> Option<&SortState> {
        self.sorted.as_ref()
    }

    /// Whether the loading indicator is shown.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    fn push_rows(&mut self, rows: &[Row]) {
        for row in rows {
            self.push_row(row);
        }
        self.row_count += rows.len();
    }

    fn push_row(&mut self, row: &Row) {
        let (open, close) = match row.id() {
            Some(id) => (
                format!(
                    r#"<a href="{}/{}" class="sortable-table__row">"#,
                    self.row_link,
                    escape(&id)
                ),
                "</a>",
            ),
            None => (r#"<div class="sortable-table__row">"#.to_string(), "</div>"),
        };

        self.body.push_str(&open);
        for column in &self.columns {
            let value = row.get(&column.id).unwrap_or(&Value::Null);
            match &column.template {
                Some(template) => self.body.push_str(&template(value)),
                None => {
                    let _ = write!(
                        self.body,
                        r#"<div class="sortable-table__cell">{}</div>"#,
                        escape(&cell_text(value))
                    );
                }
            }
        }
        self.body.push_str(close);
    }
}

impl RenderSink for HtmlRenderer {
    fn replace_rows(&mut self, rows: &[Row]) {
        self.body.clear();
        self.row_count = 0;
        self.push_rows(rows);
    }

    fn append_rows(&mut self, rows: &[Row]) {
        self.push_rows(rows);
    }

    fn mark_sorted(&mut self, sort: &SortState) {
        self.sorted = Some(sort.clone());
    }

    fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
    }
}

fn cell_text(value: &Value) -> String {
    match value {
        Value::String(s) => s.clone(),
        Value::Null => String::new(),
        other => other.to_string(),
    }
}

fn escape(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            _ => escaped.push(c),
        }
    }
    escaped
}
