//! Form components for maud templates.

use maud::{html, Markup, Render};

/// A form container element.
#[derive(Debug)]
pub struct Form<'a> {
    pub action: &'a str,
    /// "get" or "post"
    pub method: &'a str,
    pub content: Markup,
    pub class: Option<&'a str>,
    /// Enable multipart/form-data encoding
    pub multipart: bool,
}

impl<'a> Form<'a> {
    #[must_use]
    pub fn new(action: &'a str, method: &'a str, content: Markup) -> Self {
        Self {
            action,
            method,
            content,
            class: None,
            multipart: false,
        }
    }

    #[must_use]
    pub fn post(action: &'a str, content: Markup) -> Self {
        Self::new(action, "post", content)
    }

    #[must_use]
    pub fn get(action: &'a str, content: Markup) -> Self {
        Self::new(action, "get", content)
    }

    #[must_use]
    pub fn class(mut self, class: &'a str) -> Self {
        self.class = Some(class);
        self
    }

    /// Enable multipart/form-data encoding (for file uploads).
    #[must_use]
    pub fn multipart(mut self) -> Self {
        self.multipart = true;
        self
    }
}

impl Render for Form<'_> {
    fn render(&self) -> Markup {
        html! {
            form
                action=(self.action)
                method=(self.method)
                class=[self.class]
                enctype=[self.multipart.then_some("multipart/form-data")]
            {
                (self.content)
            }
        }
    }
}

/// An input element.
#[derive(Debug, Clone)]
pub struct Input<'a> {
    pub name: &'a str,
    pub r#type: &'a str,
    pub value: Option<&'a str>,
    pub placeholder: Option<&'a str>,
    pub accept: Option<&'a str>,
    pub maxlength: Option<usize>,
    pub required: bool,
}

impl<'a> Input<'a> {
    #[must_use]
    pub const fn new(name: &'a str, r#type: &'a str) -> Self {
        Self {
            name,
            r#type,
            value: None,
            placeholder: None,
            accept: None,
            maxlength: None,
            required: false,
        }
    }

    #[must_use]
    pub const fn text(name: &'a str) -> Self {
        Self::new(name, "text")
    }

    #[must_use]
    pub const fn password(name: &'a str) -> Self {
        Self::new(name, "password")
    }

    #[must_use]
    pub const fn email(name: &'a str) -> Self {
        Self::new(name, "email")
    }

    #[must_use]
    pub const fn search(name: &'a str) -> Self {
        Self::new(name, "search")
    }

    /// A file picker restricted to `accept` (e.g. `.jpg,.png`).
    #[must_use]
    pub const fn file(name: &'a str, accept: &'a str) -> Self {
        let mut input = Self::new(name, "file");
        input.accept = Some(accept);
        input
    }

    #[must_use]
    pub const fn value(mut self, value: &'a str) -> Self {
        self.value = Some(value);
        self
    }

    #[must_use]
    pub const fn placeholder(mut self, placeholder: &'a str) -> Self {
        self.placeholder = Some(placeholder);
        self
    }

    #[must_use]
    pub const fn maxlength(mut self, maxlength: usize) -> Self {
        self.maxlength = Some(maxlength);
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Render for Input<'_> {
    fn render(&self) -> Markup {
        html! {
            input
                type=(self.r#type)
                name=(self.name)
                id=(self.name)
                value=[self.value]
                placeholder=[self.placeholder]
                accept=[self.accept]
                maxlength=[self.maxlength]
                required[self.required];
        }
    }
}

/// A textarea element.
#[derive(Debug, Clone)]
pub struct TextArea<'a> {
    pub name: &'a str,
    pub value: &'a str,
    pub rows: u32,
    pub required: bool,
}

impl<'a> TextArea<'a> {
    #[must_use]
    pub const fn new(name: &'a str) -> Self {
        Self {
            name,
            value: "",
            rows: 6,
            required: false,
        }
    }

    #[must_use]
    pub const fn value(mut self, value: &'a str) -> Self {
        self.value = value;
        self
    }

    #[must_use]
    pub const fn rows(mut self, rows: u32) -> Self {
        self.rows = rows;
        self
    }

    #[must_use]
    pub const fn required(mut self) -> Self {
        self.required = true;
        self
    }
}

impl Render for TextArea<'_> {
    fn render(&self) -> Markup {
        html! {
            textarea name=(self.name) id=(self.name) rows=(self.rows) required[self.required] {
                (self.value)
            }
        }
    }
}

/// A labelled checkbox. Submits `on` when checked, nothing otherwise.
#[derive(Debug, Clone)]
pub struct Checkbox<'a> {
    pub name: &'a str,
    pub label: &'a str,
    pub checked: bool,
}

impl<'a> Checkbox<'a> {
    #[must_use]
    pub const fn new(name: &'a str, label: &'a str, checked: bool) -> Self {
        Self {
            name,
            label,
            checked,
        }
    }
}

impl Render for Checkbox<'_> {
    fn render(&self) -> Markup {
        html! {
            label for=(self.name) {
                input type="checkbox" name=(self.name) id=(self.name) checked[self.checked];
                " " (self.label)
            }
        }
    }
}

/// A label wrapped around a form control.
#[derive(Debug)]
pub struct FormGroup<'a> {
    pub label: &'a str,
    pub r#for: &'a str,
    pub control: Markup,
}

impl<'a> FormGroup<'a> {
    #[must_use]
    pub fn new(label: &'a str, r#for: &'a str, control: impl Render) -> Self {
        Self {
            label,
            r#for,
            control: control.render(),
        }
    }
}

impl Render for FormGroup<'_> {
    fn render(&self) -> Markup {
        html! {
            label for=(self.r#for) {
                (self.label)
                (self.control)
            }
        }
    }
}
