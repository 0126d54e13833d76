#![warn(clippy::pedantic, clippy::all, clippy::nursery)]
#![allow(clippy::single_match_else)]

use crate::{
    auth::{backend::AdminAuthBackend, memory_store::MemorySessionStore},
    config::RuntimeConfiguration,
    routes::{
        alunos::{
            delete_aluno, get_main, internal_get_add, internal_get_edit, internal_get_list,
            internal_get_view, internal_post_cancel, internal_post_search, internal_post_sort,
            internal_post_submit,
        },
        login::{get_login, post_login, post_logout},
        other_screens::{OtherScreen, get_other_screen},
    },
    state::AdminState,
};
use axum::{
    Router,
    extract::State,
    routing::{delete, get, post},
};
use axum_login::{
    AuthManagerLayerBuilder,
    tower_sessions::{ExpiredDeletion, Expiry, SessionManagerLayer, cookie::time::Duration},
};
use std::env;
use tokio::{net::TcpListener, signal, task::JoinHandle};
use tower_http::{compression::CompressionLayer, limit::RequestBodyLimitLayer, trace::TraceLayer};
use tracing_subscriber::{EnvFilter, FmtSubscriber};

#[macro_use]
extern crate tracing;

mod auth;
mod config;
mod data;
mod error;
mod maud_conveniences;
mod routes;
mod screen;
mod service;
mod state;
mod validation;

const MAX_FORM_BYTES: usize = 64 * 1024;
const EXPIRED_SESSION_SWEEP: std::time::Duration = std::time::Duration::from_secs(60);

async fn shutdown_signal(sweeper: JoinHandle<()>) {
    let ctrl_c = async {
        signal::ctrl_c()
            .await
            .expect("failed to install Ctrl+C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        signal::unix::signal(signal::unix::SignalKind::terminate())
            .expect("failed to install signal handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    sweeper.abort();
    warn!("signal received, starting graceful shutdown");
}

fn spawn_session_sweeper(store: MemorySessionStore) -> JoinHandle<()> {
    tokio::spawn(async move {
        let mut interval = tokio::time::interval(EXPIRED_SESSION_SWEEP);
        loop {
            interval.tick().await;
            if let Err(e) = store.delete_expired().await {
                error!(?e, "Error deleting expired sessions");
            }
        }
    })
}

fn app(state: AdminState, session_store: MemorySessionStore) -> Router {
    let session_layer = SessionManagerLayer::new(session_store)
        .with_expiry(Expiry::OnInactivity(Duration::days(1)));
    let auth_backend = AdminAuthBackend::new(state.config().admin_credentials());
    let auth_layer = AuthManagerLayerBuilder::new(auth_backend, session_layer).build();

    let mut router = Router::new()
        .route("/", get(get_login))
        .route("/login", get(get_login).post(post_login))
        .route("/logout", post(post_logout))
        .route("/main", get(get_main))
        .route("/internal/alunos", delete(delete_aluno))
        .route("/internal/alunos/list", get(internal_get_list))
        .route("/internal/alunos/add", get(internal_get_add))
        .route("/internal/alunos/edit", get(internal_get_edit))
        .route("/internal/alunos/view", get(internal_get_view))
        .route("/internal/alunos/search", post(internal_post_search))
        .route("/internal/alunos/sort", post(internal_post_sort))
        .route("/internal/alunos/submit", post(internal_post_submit))
        .route("/internal/alunos/cancel", post(internal_post_cancel));

    for screen in OtherScreen::ALL {
        router = router.route(
            screen.path(),
            get(move |State(state): State<AdminState>, session| {
                get_other_screen(state, session, screen)
            }),
        );
    }

    router
        .layer(auth_layer)
        .layer(RequestBodyLimitLayer::new(MAX_FORM_BYTES))
        .layer(CompressionLayer::new())
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

#[tokio::main]
async fn main() {
    tracing::subscriber::set_global_default(
        FmtSubscriber::builder()
            .with_env_filter(EnvFilter::from_default_env())
            .finish(),
    )
    .expect("unable to set tracing subscriber");

    info!("`tracing` online");

    if let Err(e) = dotenvy::dotenv() {
        warn!(?e, "no .env file loaded, using the process environment");
    }

    let config = RuntimeConfiguration::new().expect("unable to create config");
    info!(api = %config.api_config().base_url(), locale = %config.locale_config().locale, "configuration loaded");
    let state = AdminState::new(config).expect("unable to create state");

    let session_store = MemorySessionStore::new();
    let sweeper = spawn_session_sweeper(session_store.clone());
    let app = app(state, session_store);

    let server_ip =
        env::var("MODALIDADES_SERVER_IP").unwrap_or_else(|_| "127.0.0.1:8080".to_string());
    let listener = TcpListener::bind(&server_ip)
        .await
        .expect("unable to listen on server ip");

    info!(?server_ip, "Listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(sweeper))
        .await
        .expect("unable to serve app");
}
