pub mod auth;
pub mod columns;
pub mod docs;
pub mod flash;
pub mod guard;
pub mod inquiries;
pub mod landing;
pub mod reviews;
pub mod router;
pub mod state;
pub mod templates;

pub use auth::{SESSION_COOKIE, SESSION_TTL_DAYS};
pub use state::AppState;
pub use templates::{escape_html, render_footer, render_login_page};
