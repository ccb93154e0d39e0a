use axum::{
    Router,
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, post},
};

use crate::web::{AppState, auth, columns, docs, inquiries, landing, reviews};

const ROBOTS_TXT_BODY: &str = include_str!("../../robots.txt");

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(landing::landing_page))
        .route("/login", get(auth::login_page).post(auth::process_login))
        .route("/logout", post(auth::logout))
        .route("/healthz", get(healthz))
        .route("/robots.txt", get(robots_txt))
        .route("/docs/:tier", get(docs::docs_page))
        .route(
            "/inquiries",
            get(inquiries::inquiries_page).post(inquiries::submit_inquiry),
        )
        .route("/inquiries/answer", post(inquiries::answer_inquiry))
        .route(
            "/reviews",
            get(reviews::reviews_page).post(reviews::submit_review),
        )
        .route(
            "/columns",
            get(columns::columns_page).post(columns::submit_column),
        )
        .route("/columns/update", post(columns::update_column))
        .route("/columns/delete", post(columns::delete_column))
        .with_state(state)
}

async fn robots_txt() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/plain; charset=utf-8")],
        ROBOTS_TXT_BODY,
    )
}

async fn healthz() -> impl IntoResponse {
    StatusCode::OK
}
