//! Inbound WebSocket adapter pushing live snapshots and notices.

use actix_web::{get, post, web, HttpRequest, HttpResponse};

pub mod messages;
mod session;
pub mod state;

pub use state::{start_dashboard_feeds, WsState};

use crate::inbound::http::{ApiResult, HttpState};

/// Upgrade a dashboard connection and start its session loop.
#[get("/ws")]
pub async fn ws_entry(
    req: HttpRequest,
    body: web::Payload,
    state: web::Data<WsState>,
) -> actix_web::Result<HttpResponse> {
    let (response, session, stream) = actix_ws::handle(&req, body)?;
    let state = state.get_ref().clone();
    actix_web::rt::spawn(session::handle_ws_session(state, session, stream));
    Ok(response)
}

/// Tear down and re-establish the live feeds after a stream error.
///
/// Broken streams never reconnect on their own; the dashboard's refresh
/// action calls this instead.
#[post("/api/v1/feeds/refresh")]
pub async fn refresh_feeds(
    http: web::Data<HttpState>,
    ws: web::Data<WsState>,
) -> ApiResult<HttpResponse> {
    state::start_dashboard_feeds(&http.feed, &ws).await?;
    Ok(HttpResponse::NoContent().finish())
}
