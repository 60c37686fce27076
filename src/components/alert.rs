//! Alert component for flashed notices and inline messages.

use maud::{html, Markup, Render};

use crate::web::flash::{Flash, FlashLevel};

/// Alert variant types.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AlertVariant {
    Success,
    Info,
    Warning,
    Danger,
}

impl AlertVariant {
    /// Get the CSS class for the alert article element.
    #[must_use]
    pub const fn class(&self) -> &'static str {
        match self {
            Self::Success => "alert success",
            Self::Info => "alert info",
            Self::Warning => "alert warning",
            Self::Danger => "alert danger",
        }
    }
}

impl From<FlashLevel> for AlertVariant {
    fn from(level: FlashLevel) -> Self {
        match level {
            FlashLevel::Success => Self::Success,
            FlashLevel::Info => Self::Info,
            FlashLevel::Warning => Self::Warning,
            FlashLevel::Danger => Self::Danger,
        }
    }
}

/// An alert message component.
#[derive(Debug, Clone)]
pub struct Alert<'a> {
    pub variant: AlertVariant,
    pub message: &'a str,
}

impl<'a> Alert<'a> {
    #[must_use]
    pub const fn new(variant: AlertVariant, message: &'a str) -> Self {
        Self { variant, message }
    }

    #[must_use]
    pub const fn info(message: &'a str) -> Self {
        Self::new(AlertVariant::Info, message)
    }
}

impl<'a> From<&'a Flash> for Alert<'a> {
    fn from(flash: &'a Flash) -> Self {
        Self::new(flash.level.into(), &flash.text)
    }
}

impl Render for Alert<'_> {
    fn render(&self) -> Markup {
        html! {
            article class=(self.variant.class()) role="alert" {
                (self.message)
            }
        }
    }
}
