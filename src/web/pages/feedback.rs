use maud::{html, Markup};

use super::PageContext;
use crate::components::{Button, Form, FormGroup, Input, TextArea};
use crate::feedback::{MAX_EMAIL_CHARS, MAX_NAME_CHARS};

/// Public feedback form.
#[must_use]
pub fn render_feedback_form(ctx: &PageContext<'_>) -> Markup {
    let content = html! {
        h1 { "Share your feedback" }
        p { "Tell us about your trip or what you would like to read next." }
        (Form::post("/feedback", html! {
            (FormGroup::new("Name", "name", Input::text("name").maxlength(MAX_NAME_CHARS).required()))
            (FormGroup::new("Email (optional)", "email", Input::email("email").maxlength(MAX_EMAIL_CHARS)))
            label for="rating" {
                "Rating (optional)"
                select name="rating" id="rating" {
                    option value="" { "No rating" }
                    @for stars in (1..=5).rev() {
                        option value=(stars) { (stars) " / 5" }
                    }
                }
            }
            (FormGroup::new("Message", "message", TextArea::new("message").rows(5).required()))
            (Button::primary("Send"))
        }))
    };

    ctx.layout("Feedback").render(content)
}
