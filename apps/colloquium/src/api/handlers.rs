//! # API Endpoint Handlers

use super::{
    AppState,
    types::{ErrorResponse, HealthResponse, NextMeetingResponse, PageQuery},
};
use axum::{
    Json,
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use colloquium_core::{PageOptions, ScheduleFilter, SortOrder, next_meeting_notice, schedule};

fn bad_request(msg: String) -> Response {
    (StatusCode::BAD_REQUEST, Json(ErrorResponse::new(msg))).into_response()
}

// =============================================================================
// HEALTH HANDLER
// =============================================================================

pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    Json(HealthResponse::ok(state.registry.len()))
}

// =============================================================================
// SCHEDULE PAGE
// =============================================================================

/// `GET /`: the schedule page. Unknown `filter`/`order` values are rejected.
pub async fn page_handler(
    State(state): State<AppState>,
    Query(query): Query<PageQuery>,
) -> Response {
    let filter = match query.filter.as_deref().map(str::parse::<ScheduleFilter>) {
        None => ScheduleFilter::default(),
        Some(Ok(filter)) => filter,
        Some(Err(e)) => return bad_request(e),
    };
    let order = match query.order.as_deref().map(str::parse::<SortOrder>) {
        None => SortOrder::default(),
        Some(Ok(order)) => order,
        Some(Err(e)) => return bad_request(e),
    };

    let now = state.now();
    let notice = next_meeting_notice(&state.registry, now, &state.site);
    let options = PageOptions {
        title: &state.title,
        filter,
        order,
        today: now.date(),
        notice: &notice,
    };

    Html(schedule::render_page(&state.registry, &state.site, &options)).into_response()
}

// =============================================================================
// DOCUMENTS
// =============================================================================

/// `GET /presentations.json`: the registry as loaded.
pub async fn registry_handler(State(state): State<AppState>) -> Response {
    Json(state.registry.meetings()).into_response()
}

/// `GET /config.json`: the site config as loaded.
pub async fn site_config_handler(State(state): State<AppState>) -> Response {
    Json(state.site.as_ref()).into_response()
}

// =============================================================================
// NEXT MEETING
// =============================================================================

pub async fn next_meeting_handler(State(state): State<AppState>) -> impl IntoResponse {
    let now = state.now();
    let next = state.registry.next_upcoming(now.date());

    Json(NextMeetingResponse {
        notice: next_meeting_notice(&state.registry, now, &state.site),
        date: next.map(|m| m.canonical_date()),
        title: next.map(|m| m.title.clone()),
    })
}
