//! Table component for admin listings.

use maud::{html, Markup, Render};

/// A table element with headers and pre-rendered rows.
#[derive(Debug)]
pub struct Table<'a> {
    pub headers: Vec<&'a str>,
    /// Each entry is a full `<tr>`
    pub rows: Vec<Markup>,
    pub class: Option<&'a str>,
}

impl<'a> Table<'a> {
    #[must_use]
    pub fn new(headers: Vec<&'a str>) -> Self {
        Self {
            headers,
            rows: Vec::new(),
            class: None,
        }
    }

    #[must_use]
    pub fn rows(mut self, rows: Vec<Markup>) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }
}

impl Render for Table<'_> {
    fn render(&self) -> Markup {
        html! {
            table class=[self.class] {
                thead {
                    tr {
                        @for header in &self.headers {
                            th scope="col" { (header) }
                        }
                    }
                }
                tbody {
                    @for row in &self.rows {
                        (row)
                    }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_table_render() {
        let html = Table::new(vec!["Title", "Actions"])
            .class("admin-table")
            .rows(vec![html! { tr { td { "Sahara" } td {} } }])
            .render()
            .into_string();

        assert!(html.contains(r#"<table class="admin-table">"#));
        assert!(html.contains(r#"<th scope="col">Title</th>"#));
        assert!(html.contains("<td>Sahara</td>"));
    }
}
