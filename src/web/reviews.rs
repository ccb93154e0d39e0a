use std::borrow::Cow;

use axum::{
    extract::{Form, Query, State},
    response::{Html, Redirect},
};
use axum_extra::extract::cookie::CookieJar;
use serde::Deserialize;
use tracing::error;

use crate::{
    access::{Action, can_perform},
    records::Review,
    web::{AppState, escape_html, flash, guard, templates},
};

#[derive(Default, Deserialize)]
pub struct ReviewsQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct ReviewForm {
    pub title: String,
    pub content: String,
}

/// Review board. Reading is open to everyone; posting requires a
/// signed-in session.
pub async fn reviews_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<ReviewsQuery>,
) -> Html<String> {
    let session = guard::current_session(&state, &jar).await;
    let reviews = state.store().load_sorted::<Review>();

    let cards = if reviews.is_empty() {
        r#"<p class="note">No reviews yet.</p>"#.to_string()
    } else {
        reviews
            .iter()
            .map(|review| {
                format!(
                    r#"<article class="record-card">
                        <h3>{title}</h3>
                        <p class="record-meta">{author} · {created}</p>
                        <p class="record-body">{content}</p>
                    </article>"#,
                    title = escape_html(&review.title),
                    author = escape_html(&review.author_name),
                    created = review.created_at.format("%Y-%m-%d %H:%M"),
                    content = escape_html(&review.content),
                )
            })
            .collect::<String>()
    };

    let form_html = if can_perform(&session, Action::SubmitReview) {
        r#"<section class="panel">
            <h2>Write a review</h2>
            <form method="post" action="/reviews">
                <label for="title">Title</label>
                <input type="text" id="title" name="title" required>
                <label for="content" style="margin-top:1rem;">Content</label>
                <textarea id="content" name="content" rows="5" required></textarea>
                <button type="submit" style="margin-top:1.25rem;">Post review</button>
            </form>
        </section>"#
    } else {
        r#"<p class="note"><a href="/login">Sign in</a> to write a review.</p>"#
    };

    let flash_html =
        flash::compose_flash_message(params.status.as_deref(), params.error.as_deref());
    let body = format!(
        r#"{form_html}
        <section>
            <h2>Reviews</h2>
            <div class="record-list">{cards}</div>
        </section>"#,
    );

    Html(templates::render_page(templates::PageLayout {
        meta_title: "Reviews — Bluhill Documentation",
        page_heading: "Reviews",
        session: &session,
        flash_html: Cow::Owned(flash_html),
        body_html: Cow::Owned(body),
    }))
}

pub async fn submit_review(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ReviewForm>,
) -> Redirect {
    let session = guard::current_session(&state, &jar).await;
    if !can_perform(&session, Action::SubmitReview) {
        return Redirect::to("/?error=not_authorized");
    }

    let title = form.title.trim();
    let content = form.content.trim();
    if title.is_empty() || content.is_empty() {
        return Redirect::to("/reviews?error=missing_fields");
    }

    let review = Review::new(
        session.username_or_empty(),
        session.display_name_or_empty(),
        title,
        content,
    );

    match state.store().append(review) {
        Ok(()) => Redirect::to("/reviews?status=review_posted"),
        Err(err) => {
            error!(?err, "failed to append review");
            Redirect::to("/reviews?error=store_failed")
        }
    }
}
