//! Admin login page.

use maud::{html, Markup};

use super::PageContext;
use crate::components::{Button, Form, FormGroup, Input};

#[must_use]
pub fn render_login(ctx: &PageContext<'_>) -> Markup {
    let content = html! {
        article class="auth-container" {
            h1 { "Admin login" }
            (Form::post("/login", html! {
                (FormGroup::new("Password", "password", Input::password("password").required()))
                (Button::primary("Log in"))
            }))
        }
    };

    ctx.layout("Login").render(content)
}
