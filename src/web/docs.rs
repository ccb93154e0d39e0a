use std::borrow::Cow;

use axum::{
    extract::{Path as UrlPath, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::warn;

use crate::{
    access::{Tier, can_view},
    content,
    error::PortalError,
    web::{AppState, escape_html, guard, templates},
};

#[derive(Default, Deserialize)]
pub struct DocsQuery {
    pub doc: Option<String>,
}

/// Tier document browser: a listing of the tier's markdown files plus the
/// selected document rendered inline. Sessions that may not view the tier
/// are bounced to the landing page.
pub async fn docs_page(
    State(state): State<AppState>,
    UrlPath(tier_slug): UrlPath<String>,
    jar: CookieJar,
    Query(params): Query<DocsQuery>,
) -> Result<Html<String>, Redirect> {
    let Some(tier) = Tier::from_slug(&tier_slug) else {
        return Err(Redirect::to("/?error=not_authorized"));
    };

    let session = guard::current_session(&state, &jar).await;
    if !can_view(&session, tier) {
        return Err(Redirect::to("/?error=not_authorized"));
    }

    // from_slug only produces file-backed tiers.
    let dir_name = tier.dir_name().expect("file-backed tier");
    let base_dir = state.config().tier_dir(dir_name);
    let files = content::list_documents(&base_dir);

    let listing_html = if files.is_empty() {
        r#"<p class="note">No documents in this tier yet.</p>"#.to_string()
    } else {
        let items = files
            .iter()
            .map(|name| {
                let encoded = escape_html(name);
                format!(
                    r#"<li><a href="/docs/{tier_slug}?doc={encoded}">{encoded}</a></li>"#,
                    tier_slug = tier_slug,
                    encoded = encoded,
                )
            })
            .collect::<String>();
        format!(r#"<ul class="doc-list">{items}</ul>"#)
    };

    let document_html = match params.doc.as_deref() {
        None => String::new(),
        Some(name) => match content::load_document(&base_dir, name) {
            Ok(text) => format!(
                r#"<section class="panel"><div class="doc-body">{}</div></section>"#,
                templates::render_markdown(&text)
            ),
            Err(err) => {
                warn!(?err, tier = %tier_slug, doc = name, "document load rejected");
                let message = match err {
                    PortalError::InvalidName { .. } => Cow::Borrowed("That document name is not valid."),
                    PortalError::NotFound { .. } => {
                        Cow::Owned(format!("Document not found: {}", escape_html(name)))
                    }
                    _ => Cow::Borrowed("The document could not be read. Please try again later."),
                };
                format!(r#"<div class="flash error">{message}</div>"#)
            }
        },
    };

    let body = format!(
        r#"<section class="panel">
            <h2>{title}</h2>
            {listing_html}
        </section>
        {document_html}"#,
        title = escape_html(tier.title()),
        listing_html = listing_html,
        document_html = document_html,
    );

    Ok(Html(templates::render_page(templates::PageLayout {
        meta_title: "Bluhill Documentation",
        page_heading: tier.title(),
        session: &session,
        flash_html: Cow::Borrowed(""),
        body_html: Cow::Owned(body),
    })))
}
