//! Backend entry-point: wires adapters, REST endpoints, the WebSocket
//! push channel, and OpenAPI docs.

use std::sync::Arc;
use std::time::Duration;

use actix_web::{web, App, HttpServer};
use mockable::DefaultClock;
use url::Url;
use tracing::{info, warn};
use tracing_subscriber::{fmt, EnvFilter};
#[cfg(debug_assertions)]
use utoipa::OpenApi;
#[cfg(debug_assertions)]
use utoipa_swagger_ui::SwaggerUi;

use backend::domain::ports::{DocumentStore, MediaStore, SettingsStore};
#[cfg(debug_assertions)]
use backend::doc::ApiDoc;
use backend::inbound::http::{configure_api, health};
use backend::inbound::ws;
use backend::outbound::hosted::{HostedDocumentApi, HostedMediaApi};
use backend::outbound::memory::{MemoryDocumentStore, MemoryMediaStore, MemorySettingsStore};
use ortho_config::OrthoConfig;

use backend::server::config::{ServerSettings, StoreBackend};
use backend::server::build_services;
use backend::Trace;

/// Application bootstrap.
#[actix_web::main]
async fn main() -> std::io::Result<()> {
    if let Err(e) = fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .json()
        .try_init()
    {
        warn!(error = %e, "tracing init failed");
    }

    let settings = ServerSettings::load_from_iter(std::env::args_os())
        .map_err(|err| std::io::Error::other(format!("failed to load configuration: {err}")))?;

    let (store, media): (Arc<dyn DocumentStore>, Arc<dyn MediaStore>) =
        match settings.store_backend() {
            StoreBackend::Memory => {
                info!("using in-memory store adapters");
                (
                    Arc::new(MemoryDocumentStore::new()),
                    Arc::new(MemoryMediaStore::new(settings.media_public_url())),
                )
            }
            StoreBackend::Hosted => {
                let base = parse_url(settings.hosted_base_url.as_deref(), "ADMIN_HOSTED_BASE_URL")?;
                let upload = parse_url(
                    settings.media_upload_url.as_deref(),
                    "ADMIN_MEDIA_UPLOAD_URL",
                )?;
                info!(base = %base, "using hosted store adapters");
                let documents =
                    HostedDocumentApi::new(base, Duration::from_secs(settings.poll_seconds()))
                        .map_err(std::io::Error::other)?;
                let media = HostedMediaApi::new(upload, settings.media_public_url())
                    .map_err(std::io::Error::other)?;
                (Arc::new(documents), Arc::new(media))
            }
        };
    let settings_store: Arc<dyn SettingsStore> = Arc::new(MemorySettingsStore::new());

    let services = build_services(store, media, settings_store, Arc::new(DefaultClock));
    if let Err(error) = ws::start_dashboard_feeds(&services.http.feed, &services.ws).await {
        warn!(error = %error, "live feeds unavailable; dashboard starts without them");
    }

    let http_state = web::Data::new(services.http);
    let ws_state = web::Data::new(services.ws);
    let bind_addr = settings.bind_addr().to_owned();
    info!(%bind_addr, "starting admin backend");

    HttpServer::new(move || {
        let app = App::new()
            .app_data(http_state.clone())
            .app_data(ws_state.clone())
            .wrap(Trace)
            .configure(configure_api)
            .service(ws::ws_entry)
            .service(ws::refresh_feeds)
            .service(health::live)
            .service(health::ready);
        #[cfg(debug_assertions)]
        let app =
            app.service(SwaggerUi::new("/docs/{_:.*}").url("/api-docs/openapi.json", ApiDoc::openapi()));
        app
    })
    .bind(bind_addr)?
    .run()
    .await
}

fn parse_url(value: Option<&str>, name: &str) -> std::io::Result<Url> {
    let raw = value
        .ok_or_else(|| std::io::Error::other(format!("{name} is required for hosted mode")))?;
    Url::parse(raw).map_err(|err| std::io::Error::other(format!("{name} is not a URL: {err}")))
}
