//! Presentation shell
//!
//! GET / serves the single-page translation form. The page is static HTML
//! embedded in the binary; all dynamic behavior happens client-side against
//! the JSON endpoints.

use axum::response::Html;

/// GET / handler
pub async fn handler() -> Html<&'static str> {
    Html(include_str!("../../assets/index.html"))
}
