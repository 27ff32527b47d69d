use crate::api_doc::openapi_json;
use crate::attendee_store::{AttendeeStore, PostgresAttendeeStore, get_connection_pool};
use crate::configuration::Settings;
use crate::registration::Registrar;
use crate::routes::constants::REGISTER_PATH;
use crate::routes::{health_check, invalid_method, register};
use axum::Router;
use axum::http::HeaderValue;
use axum::http::header::{ACCESS_CONTROL_ALLOW_HEADERS, CONTENT_TYPE};
use axum::routing::{get, post};
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::cors::{Any, CorsLayer};
use tower_http::set_header::SetResponseHeaderLayer;
use tower_http::trace::TraceLayer;

#[derive(Clone)]
pub struct AppState {
    pub registrar: Registrar,
}

pub struct Application {
    port: u16,
    listener: TcpListener,
    router: Router,
}

impl Application {
    pub async fn build(configuration: Settings) -> Result<Self, anyhow::Error> {
        let connection_pool = get_connection_pool(&configuration.database);
        let attendee_store = Arc::new(PostgresAttendeeStore::new(connection_pool));
        Self::build_with_store(configuration, attendee_store).await
    }

    /// Builds the application around an already constructed attendee store.
    /// The HTTP collaborators are still taken from `configuration`.
    pub async fn build_with_store(
        configuration: Settings,
        attendee_store: Arc<dyn AttendeeStore>,
    ) -> Result<Self, anyhow::Error> {
        let registrar = Registrar::new(
            attendee_store,
            Arc::new(configuration.address_verifier.client()?),
            Arc::new(configuration.email_client.client()?),
            Arc::new(configuration.newsletter.client()?),
            configuration.newsletter.tag.clone(),
            configuration.event.clone(),
        );
        let address = format!(
            "{}:{}",
            configuration.application.host, configuration.application.port
        );
        let listener = TcpListener::bind(address).await?;
        let port = listener.local_addr()?.port();
        let router = router(AppState { registrar });

        Ok(Self {
            port,
            listener,
            router,
        })
    }

    pub fn port(&self) -> u16 {
        self.port
    }

    pub async fn run_until_stopped(self) -> Result<(), std::io::Error> {
        tracing::info!("Listening on port {}", self.port);
        axum::serve(self.listener, self.router).await
    }
}

pub fn router(app_state: AppState) -> Router {
    // Anyone may post the form; preflight requests are answered by the layer.
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_headers([CONTENT_TYPE]);
    // CorsLayer only sets this one on preflight responses.
    let allow_headers = SetResponseHeaderLayer::if_not_present(
        ACCESS_CONTROL_ALLOW_HEADERS,
        HeaderValue::from_static("Content-Type"),
    );

    Router::new()
        .route("/health_check", get(health_check))
        .route("/api-docs/openapi.json", get(openapi_json))
        .route(REGISTER_PATH, post(register).fallback(invalid_method))
        .with_state(app_state)
        .layer(allow_headers)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
}
