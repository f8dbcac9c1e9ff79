//! HTTP request handlers

use super::state::AppState;
use crate::config::Settings;
use crate::controller::{ControllerState, QueryController, Tab};
use crate::error::SearchError;
use crate::query::{CanonicalQuery, ResultKind};
use crate::results::SearchResponse;
use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{Html, IntoResponse, Redirect, Response},
    Json,
};
use serde::Deserialize;
use tera::Context;

/// Query parameters for the JSON API.
///
/// Numbers arrive as strings so that junk values fall back to defaults
/// instead of rejecting the request.
#[derive(Debug, Default, Deserialize)]
pub struct ApiParams {
    pub q: Option<String>,
    pub hl: Option<String>,
    pub gl: Option<String>,
    pub num: Option<String>,
    pub page: Option<String>,
}

/// Query parameters for the results page
#[derive(Debug, Default, Deserialize)]
pub struct PageParams {
    pub q: Option<String>,
    pub tab: Option<String>,
    pub page: Option<String>,
    pub hl: Option<String>,
    pub gl: Option<String>,
}

fn parse_number(value: Option<&str>, default: u32) -> u32 {
    value
        .and_then(|v| v.trim().parse().ok())
        .unwrap_or(default)
}

fn or_default(value: Option<String>, default: &str) -> String {
    value
        .filter(|v| !v.trim().is_empty())
        .unwrap_or_else(|| default.to_string())
}

impl ApiParams {
    fn into_query(self, kind: ResultKind, settings: &Settings) -> CanonicalQuery {
        let search = &settings.search;
        let limits = match kind {
            ResultKind::Web => &search.web,
            ResultKind::Image => &search.images,
        };

        CanonicalQuery::new(self.q.unwrap_or_default())
            .with_language(or_default(self.hl, &search.default_language))
            .with_region(or_default(self.gl, &search.default_region))
            .with_page_size(parse_number(self.num.as_deref(), limits.default_page_size))
            .with_page(parse_number(self.page.as_deref(), 1))
            .with_kind(kind)
    }
}

impl IntoResponse for SearchError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        (status, Json(self.to_body())).into_response()
    }
}

fn render(state: &AppState, template: &str, ctx: &Context) -> Response {
    match state.templates.render_with_context(template, ctx) {
        Ok(html) => Html(html).into_response(),
        Err(e) => {
            tracing::error!("Template error: {}", e);
            (StatusCode::INTERNAL_SERVER_ERROR, "Template error").into_response()
        }
    }
}

/// Health check handler
pub async fn health(State(state): State<AppState>) -> impl IntoResponse {
    Json(serde_json::json!({
        "ok": true,
        "provider": state.aggregator.provider_name(),
        "time": chrono::Utc::now().to_rfc3339(),
    }))
}

/// Web search API
pub async fn api_search(
    State(state): State<AppState>,
    Query(params): Query<ApiParams>,
) -> Result<Json<SearchResponse>, SearchError> {
    let query = params.into_query(ResultKind::Web, &state.settings);
    Ok(Json(state.aggregator.handle(query).await?))
}

/// Image search API
pub async fn api_images(
    State(state): State<AppState>,
    Query(params): Query<ApiParams>,
) -> Result<Json<SearchResponse>, SearchError> {
    let query = params.into_query(ResultKind::Image, &state.settings);
    Ok(Json(state.aggregator.handle(query).await?))
}

/// Home page handler
pub async fn index(State(state): State<AppState>) -> Response {
    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("language", &state.settings.search.default_language);
    ctx.insert("region", &state.settings.search.default_region);
    render(&state, "index.html", &ctx)
}

/// Results page handler
pub async fn search(State(state): State<AppState>, Query(params): Query<PageParams>) -> Response {
    let text = match params.q {
        Some(q) if !q.trim().is_empty() => q,
        _ => return Redirect::to("/").into_response(),
    };

    let search = &state.settings.search;
    let mut controller = QueryController::new(search);
    controller.restore(ControllerState {
        text,
        language: or_default(params.hl, &search.default_language),
        region: or_default(params.gl, &search.default_region),
        tab: params.tab.as_deref().map(Tab::parse).unwrap_or_default(),
        page_number: parse_number(params.page.as_deref(), 1),
    });

    if let Some(dispatch) = controller.refresh() {
        controller.run(dispatch, state.aggregator.as_ref()).await;
    }

    let current = controller.state();
    let view = controller.view();

    let mut ctx = Context::new();
    ctx.insert("instance_name", state.instance_name());
    ctx.insert("query", &current.text);
    ctx.insert("tab", current.tab.as_str());
    ctx.insert("page", &current.page_number);
    ctx.insert("language", &current.language);
    ctx.insert("region", &current.region);
    ctx.insert("has_previous", &controller.has_previous());
    ctx.insert("has_next", &controller.has_more());

    if let Some(response) = &view.response {
        ctx.insert("provider", &response.provider);
        ctx.insert(
            "elapsed",
            &format!("{:.2}", response.elapsed_ms as f64 / 1000.0),
        );
        if let Some(web) = response.web() {
            ctx.insert("results", &web.results);
            ctx.insert("answer_box", &web.answer_box);
            ctx.insert("knowledge_panel", &web.knowledge_panel);
            ctx.insert("related_questions", &web.related_questions);
        }
        if let Some(images) = response.images() {
            ctx.insert("images", &images.images);
        }
    }

    if let Some(error) = &view.error {
        ctx.insert("error", &error.to_string());
    }

    render(&state, "search.html", &ctx)
}
