use actix_web::{web, HttpRequest, HttpResponse, Responder};
use log::{debug, error, info};
use serde::{de::DeserializeOwned, Deserialize, Serialize};
use std::str::FromStr;

use crate::preferences::PreferencesUpdate;
use crate::screens::{menu, Action, Controller, Screen};
use crate::session::SessionRegistry;

pub const SESSION_HEADER: &str = "X-Session-Id";

pub struct AppState {
    pub controller: Controller,
    pub sessions: SessionRegistry,
}

impl AppState {
    pub fn new(controller: Controller) -> Self {
        Self {
            controller,
            sessions: SessionRegistry::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct FinalizeProfileRequest {
    title: String,
}

#[derive(Debug, Deserialize)]
struct SearchRequest {
    profile: String,
    location: String,
}

#[derive(Debug, Serialize)]
struct ErrorResponse {
    error: String,
    expected_format: serde_json::Value,
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.route("/health", web::get().to(health_check))
        .route("/menu", web::get().to(show_menu))
        .route("/screens/{screen}", web::get().to(open_screen))
        .route("/preferences", web::put().to(edit_preferences))
        .route("/profiles", web::post().to(finalize_profile))
        .route("/search", web::post().to(search))
        .route("/history", web::get().to(history));
}

async fn health_check() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({
        "status": "healthy",
        "message": "Server is running"
    }))
}

async fn show_menu() -> impl Responder {
    HttpResponse::Ok().json(menu())
}

async fn open_screen(
    req: HttpRequest,
    screen: web::Path<String>,
    state: web::Data<AppState>,
) -> HttpResponse {
    let screen = match Screen::from_str(&screen) {
        Ok(screen) => screen,
        Err(_) => {
            error!("Unknown screen requested: {}", screen);
            return HttpResponse::NotFound().json(ErrorResponse {
                error: format!("Unknown screen: {}", screen),
                expected_format: serde_json::json!(["profile", "search", "history"]),
            });
        }
    };
    run(&req, &state, Action::Open(screen)).await
}

async fn edit_preferences(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    let update = match parse_body::<PreferencesUpdate>(
        &body,
        serde_json::json!({"spicy_level": 5, "cuisine": "한식"}),
    ) {
        Ok(update) => update,
        Err(response) => return response,
    };
    run(&req, &state, Action::EditPreferences(update)).await
}

async fn finalize_profile(
    req: HttpRequest,
    body: web::Bytes,
    state: web::Data<AppState>,
) -> HttpResponse {
    let request = match parse_body::<FinalizeProfileRequest>(
        &body,
        serde_json::json!({"title": "나의 맛 프로필"}),
    ) {
        Ok(request) => request,
        Err(response) => return response,
    };
    run(&req, &state, Action::FinalizeProfile { title: request.title }).await
}

async fn search(req: HttpRequest, body: web::Bytes, state: web::Data<AppState>) -> HttpResponse {
    let request = match parse_body::<SearchRequest>(
        &body,
        serde_json::json!({"profile": "나의 맛 프로필", "location": "서울"}),
    ) {
        Ok(request) => request,
        Err(response) => return response,
    };
    let action = Action::Search {
        profile: request.profile,
        location: request.location,
    };
    run(&req, &state, action).await
}

async fn history(req: HttpRequest, state: web::Data<AppState>) -> HttpResponse {
    run(&req, &state, Action::Open(Screen::History)).await
}

/// Resolves the caller's session, dispatches the action and renders the view.
/// Actions that never touch session state skip the registry entirely.
async fn run(req: &HttpRequest, state: &AppState, action: Action) -> HttpResponse {
    let request_id = chrono::Utc::now().format("%Y%m%d%H%M%S%f").to_string();
    if !action.needs_session() {
        info!("Request {}: {:?} without session", request_id, action);
        return HttpResponse::Ok().json(state.controller.history());
    }

    let requested = req
        .headers()
        .get(SESSION_HEADER)
        .and_then(|value| value.to_str().ok());
    let (session_id, session) = state.sessions.resolve(requested);
    info!(
        "Request {}: {:?} for session {} ({} active)",
        request_id,
        action,
        session_id,
        state.sessions.len()
    );

    let view = state.controller.dispatch(&session, action).await;
    debug!("Request {}: View: {:?}", request_id, view);

    HttpResponse::Ok()
        .insert_header((SESSION_HEADER, session_id))
        .json(view)
}

fn parse_body<T: DeserializeOwned>(
    body: &[u8],
    expected_format: serde_json::Value,
) -> Result<T, HttpResponse> {
    debug!("Raw request body: {}", String::from_utf8_lossy(body));
    serde_json::from_slice::<T>(body).map_err(|e| {
        let error_msg = format!("Invalid request format: {}", e);
        error!("{}", error_msg);
        HttpResponse::BadRequest().json(ErrorResponse {
            error: error_msg,
            expected_format,
        })
    })
}
