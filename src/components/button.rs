//! Button component for the web UI.
//!
//! Renders as a `<button>` or, when an href is set, an `<a>`.

use maud::{html, Markup, Render};

/// Button style variants matching CSS classes.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ButtonVariant {
    #[default]
    Primary,
    Outline,
    Danger,
    Small,
}

impl ButtonVariant {
    /// Returns the CSS class(es) for this variant.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Primary => "btn btn-primary",
            Self::Outline => "btn outline",
            Self::Danger => "btn btn-danger",
            Self::Small => "btn btn-sm",
        }
    }
}

/// A configurable button component.
///
/// ```ignore
/// let edit = Button::outline("Edit").href("/admin/edit/3");
/// let delete = Button::danger("Delete").confirm("Delete this post?");
/// ```
#[derive(Debug, Clone)]
pub struct Button<'a> {
    pub label: &'a str,
    pub variant: ButtonVariant,
    pub href: Option<&'a str>,
    pub r#type: &'a str,
    /// Browser confirmation prompt shown before submitting.
    pub confirm: Option<&'a str>,
}

impl<'a> Button<'a> {
    #[must_use]
    pub const fn new(label: &'a str, variant: ButtonVariant) -> Self {
        Self {
            label,
            variant,
            href: None,
            r#type: "submit",
            confirm: None,
        }
    }

    #[must_use]
    pub const fn primary(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Primary)
    }

    #[must_use]
    pub const fn outline(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Outline)
    }

    #[must_use]
    pub const fn danger(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Danger)
    }

    #[must_use]
    pub const fn small(label: &'a str) -> Self {
        Self::new(label, ButtonVariant::Small)
    }

    /// Render as a link to `href`.
    #[must_use]
    pub const fn href(mut self, href: &'a str) -> Self {
        self.href = Some(href);
        self
    }

    #[must_use]
    pub const fn confirm(mut self, prompt: &'a str) -> Self {
        self.confirm = Some(prompt);
        self
    }

    fn onclick(&self) -> Option<String> {
        self.confirm.map(|prompt| {
            let escaped = prompt.replace('\\', "\\\\").replace('\'', "\\'");
            format!("return confirm('{escaped}');")
        })
    }
}

impl Render for Button<'_> {
    fn render(&self) -> Markup {
        let class = self.variant.class();
        if let Some(href) = self.href {
            html! {
                a href=(href) class=(class) role="button" { (self.label) }
            }
        } else {
            html! {
                button type=(self.r#type) class=(class) onclick=[self.onclick()] { (self.label) }
            }
        }
    }
}
