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
    records::Inquiry,
    session::Session,
    web::{AppState, escape_html, flash, guard, templates},
};

#[derive(Default, Deserialize)]
pub struct InquiriesQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct InquiryForm {
    pub title: String,
    pub content: String,
    #[serde(default)]
    pub is_private: Option<String>,
}

#[derive(Deserialize)]
pub struct AnswerForm {
    pub id: String,
    pub answer: String,
}

/// Inquiry board: open inquiries plus the caller's own private ones;
/// admins see everything and get an answer form per open inquiry.
pub async fn inquiries_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<InquiriesQuery>,
) -> Result<Html<String>, Redirect> {
    let session = guard::current_session(&state, &jar).await;
    if !session.authenticated {
        return Err(Redirect::to("/?error=not_authorized"));
    }

    let inquiries = state.store().load_sorted::<Inquiry>();
    let visible: Vec<&Inquiry> = inquiries
        .iter()
        .filter(|inquiry| {
            session.is_admin()
                || !inquiry.is_private
                || inquiry.author == session.username_or_empty()
        })
        .collect();

    let cards = if visible.is_empty() {
        r#"<p class="note">No inquiries yet.</p>"#.to_string()
    } else {
        visible
            .iter()
            .map(|inquiry| render_inquiry_card(inquiry, &session))
            .collect::<String>()
    };

    let form_html = if can_perform(&session, Action::SubmitInquiry) {
        r#"<section class="panel">
            <h2>New inquiry</h2>
            <form method="post" action="/inquiries">
                <label for="title">Title</label>
                <input type="text" id="title" name="title" required>
                <label for="content" style="margin-top:1rem;">Content</label>
                <textarea id="content" name="content" rows="5" required></textarea>
                <label style="margin-top:1rem; font-weight:400;">
                    <input type="checkbox" name="is_private" value="on">
                    Private — visible only to you and the administrators
                </label>
                <button type="submit" style="margin-top:1.25rem;">Post inquiry</button>
            </form>
        </section>"#
    } else {
        ""
    };

    let flash_html =
        flash::compose_flash_message(params.status.as_deref(), params.error.as_deref());
    let body = format!(
        r#"{form_html}
        <section>
            <h2>Inquiries</h2>
            <div class="record-list">{cards}</div>
        </section>"#,
    );

    Ok(Html(templates::render_page(templates::PageLayout {
        meta_title: "Inquiries — Bluhill Documentation",
        page_heading: "Inquiries",
        session: &session,
        flash_html: Cow::Owned(flash_html),
        body_html: Cow::Owned(body),
    })))
}

fn render_inquiry_card(inquiry: &Inquiry, session: &Session) -> String {
    let status_tag = if inquiry.answered {
        r#"<span class="status-tag answered">Answered</span>"#
    } else {
        r#"<span class="status-tag open">Open</span>"#
    };
    let private_tag = if inquiry.is_private {
        r#" <span class="status-tag private">Private</span>"#
    } else {
        ""
    };

    let answer_html = match inquiry.answer.as_deref() {
        Some(answer) => format!(
            r#"<div class="answer-box"><strong>Answer</strong><p class="record-body">{}</p></div>"#,
            escape_html(answer)
        ),
        None => String::new(),
    };

    let admin_form = if can_perform(session, Action::AnswerInquiry) && !inquiry.answered {
        format!(
            r#"<form method="post" action="/inquiries/answer" style="margin-top:1rem;">
                <input type="hidden" name="id" value="{id}">
                <label for="answer-{id}">Answer</label>
                <textarea id="answer-{id}" name="answer" rows="3" required></textarea>
                <button type="submit" style="margin-top:0.75rem;">Submit answer</button>
            </form>"#,
            id = escape_html(&inquiry.id),
        )
    } else {
        String::new()
    };

    format!(
        r#"<article class="record-card">
            <h3>{title} {status_tag}{private_tag}</h3>
            <p class="record-meta">{author} · {created}</p>
            <p class="record-body">{content}</p>
            {answer_html}
            {admin_form}
        </article>"#,
        title = escape_html(&inquiry.title),
        status_tag = status_tag,
        private_tag = private_tag,
        author = escape_html(&inquiry.author_name),
        created = inquiry.created_at.format("%Y-%m-%d %H:%M"),
        content = escape_html(&inquiry.content),
        answer_html = answer_html,
        admin_form = admin_form,
    )
}

pub async fn submit_inquiry(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<InquiryForm>,
) -> Redirect {
    let session = guard::current_session(&state, &jar).await;
    if !can_perform(&session, Action::SubmitInquiry) {
        return Redirect::to("/?error=not_authorized");
    }

    let title = form.title.trim();
    let content = form.content.trim();
    if title.is_empty() || content.is_empty() {
        return Redirect::to("/inquiries?error=missing_fields");
    }

    let inquiry = Inquiry::new(
        session.username_or_empty(),
        session.display_name_or_empty(),
        title,
        content,
        form.is_private.is_some(),
    );

    match state.store().append(inquiry) {
        Ok(()) => Redirect::to("/inquiries?status=inquiry_posted"),
        Err(err) => {
            error!(?err, "failed to append inquiry");
            Redirect::to("/inquiries?error=store_failed")
        }
    }
}

pub async fn answer_inquiry(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<AnswerForm>,
) -> Result<Redirect, Redirect> {
    let _admin = guard::require_admin(&state, &jar).await?;

    let answer = form.answer.trim().to_owned();
    if answer.is_empty() {
        return Ok(Redirect::to("/inquiries?error=missing_answer"));
    }

    // An unknown id rewrites the collection unchanged; the redirect still
    // reports success, matching the store's silent-skip contract.
    let result = state.store().update_by_id::<Inquiry, _>(&form.id, |inquiry| {
        inquiry.answered = true;
        inquiry.answer = Some(answer);
    });

    match result {
        Ok(()) => Ok(Redirect::to("/inquiries?status=inquiry_answered")),
        Err(err) => {
            error!(?err, "failed to save inquiry answer");
            Ok(Redirect::to("/inquiries?error=store_failed"))
        }
    }
}
