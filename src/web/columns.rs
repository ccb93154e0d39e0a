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
    records::Column,
    session::Session,
    web::{AppState, escape_html, flash, guard, templates},
};

#[derive(Default, Deserialize)]
pub struct ColumnsQuery {
    pub status: Option<String>,
    pub error: Option<String>,
}

#[derive(Deserialize)]
pub struct ColumnForm {
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ColumnUpdateForm {
    pub id: String,
    pub title: String,
    pub content: String,
}

#[derive(Deserialize)]
pub struct ColumnDeleteForm {
    pub id: String,
}

/// Column page: admin-authored category. Reading requires a signed-in
/// session; authoring requires the special or admin role; editing and
/// deleting are admin-only.
pub async fn columns_page(
    State(state): State<AppState>,
    jar: CookieJar,
    Query(params): Query<ColumnsQuery>,
) -> Result<Html<String>, Redirect> {
    let session = guard::current_session(&state, &jar).await;
    if !session.authenticated {
        return Err(Redirect::to("/?error=not_authorized"));
    }

    let columns = state.store().load_sorted::<Column>();
    let cards = if columns.is_empty() {
        r#"<p class="note">No columns yet.</p>"#.to_string()
    } else {
        columns
            .iter()
            .map(|column| render_column_card(column, &session))
            .collect::<String>()
    };

    let form_html = if can_perform(&session, Action::AuthorColumn) {
        r#"<section class="panel">
            <h2>Write a column</h2>
            <form method="post" action="/columns">
                <label for="title">Title</label>
                <input type="text" id="title" name="title" required>
                <label for="content" style="margin-top:1rem;">Content</label>
                <textarea id="content" name="content" rows="8" required></textarea>
                <button type="submit" style="margin-top:1.25rem;">Publish column</button>
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
            <h2>Columns</h2>
            <div class="record-list">{cards}</div>
        </section>"#,
    );

    Ok(Html(templates::render_page(templates::PageLayout {
        meta_title: "Columns — Bluhill Documentation",
        page_heading: "Columns",
        session: &session,
        flash_html: Cow::Owned(flash_html),
        body_html: Cow::Owned(body),
    })))
}

fn render_column_card(column: &Column, session: &Session) -> String {
    let admin_controls = if session.is_admin() {
        format!(
            r#"<details style="margin-top:1rem;">
                <summary>Edit</summary>
                <form method="post" action="/columns/update" style="margin-top:0.75rem;">
                    <input type="hidden" name="id" value="{id}">
                    <label for="title-{id}">Title</label>
                    <input type="text" id="title-{id}" name="title" value="{title}" required>
                    <label for="content-{id}" style="margin-top:0.75rem;">Content</label>
                    <textarea id="content-{id}" name="content" rows="6" required>{content}</textarea>
                    <button type="submit" style="margin-top:0.75rem;">Save changes</button>
                </form>
                <form method="post" action="/columns/delete" style="margin-top:0.75rem;">
                    <input type="hidden" name="id" value="{id}">
                    <button type="submit" class="danger">Delete column</button>
                </form>
            </details>"#,
            id = escape_html(&column.id),
            title = escape_html(&column.title),
            content = escape_html(&column.content),
        )
    } else {
        String::new()
    };

    format!(
        r#"<article class="record-card">
            <h3>{title}</h3>
            <p class="record-meta">{author} · {created}</p>
            <p class="record-body">{content}</p>
            {admin_controls}
        </article>"#,
        title = escape_html(&column.title),
        author = escape_html(&column.author_name),
        created = column.created_at.format("%Y-%m-%d %H:%M"),
        content = escape_html(&column.content),
        admin_controls = admin_controls,
    )
}

pub async fn submit_column(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ColumnForm>,
) -> Redirect {
    let session = guard::current_session(&state, &jar).await;
    if !can_perform(&session, Action::AuthorColumn) {
        return Redirect::to("/?error=not_authorized");
    }

    let title = form.title.trim();
    let content = form.content.trim();
    if title.is_empty() || content.is_empty() {
        return Redirect::to("/columns?error=missing_fields");
    }

    let column = Column::new(
        session.username_or_empty(),
        session.display_name_or_empty(),
        title,
        content,
    );

    match state.store().append(column) {
        Ok(()) => Redirect::to("/columns?status=column_posted"),
        Err(err) => {
            error!(?err, "failed to append column");
            Redirect::to("/columns?error=store_failed")
        }
    }
}

pub async fn update_column(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ColumnUpdateForm>,
) -> Result<Redirect, Redirect> {
    let _admin = guard::require_admin(&state, &jar).await?;

    let title = form.title.trim().to_owned();
    let content = form.content.trim().to_owned();
    if title.is_empty() || content.is_empty() {
        return Ok(Redirect::to("/columns?error=missing_fields"));
    }

    let result = state.store().update_by_id::<Column, _>(&form.id, |column| {
        column.title = title;
        column.content = content;
    });

    match result {
        Ok(()) => Ok(Redirect::to("/columns?status=column_updated")),
        Err(err) => {
            error!(?err, "failed to update column");
            Ok(Redirect::to("/columns?error=store_failed"))
        }
    }
}

pub async fn delete_column(
    State(state): State<AppState>,
    jar: CookieJar,
    Form(form): Form<ColumnDeleteForm>,
) -> Result<Redirect, Redirect> {
    let _admin = guard::require_admin(&state, &jar).await?;

    match state.store().delete_by_id::<Column>(&form.id) {
        Ok(()) => Ok(Redirect::to("/columns?status=column_deleted")),
        Err(err) => {
            error!(?err, "failed to delete column");
            Ok(Redirect::to("/columns?error=store_failed"))
        }
    }
}
