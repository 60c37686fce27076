//! Maud HTML template components for the web UI.
//!
//! - `layout`: Base page layout, navigation and flashed notices
//! - `alert`: Notice boxes
//! - `button`: Buttons and link-buttons
//! - `form`: Form elements and input components
//! - `table`: Admin listing tables
//! - `pagination`: Page navigation controls

pub mod alert;
pub mod button;
pub mod form;
pub mod layout;
pub mod pagination;
pub mod table;

pub use alert::{Alert, AlertVariant};
pub use button::{Button, ButtonVariant};
pub use form::{Checkbox, Form, FormGroup, Input, TextArea};
pub use layout::BaseLayout;
pub use pagination::Pagination;
pub use table::Table;
