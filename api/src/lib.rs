pub mod auth;
pub mod config;
mod crud_helpers;
pub mod error;
mod obfuscate_errors;
mod panic_handler;
mod routes;
pub mod shared_state;
pub mod tracing_config;

pub use error::Error;

use std::{
    net::{IpAddr, SocketAddr},
    sync::Arc,
};

use axum::{routing::IntoMakeService, Extension, Router};
use hyper::server::conn::AddrIncoming;
use tower::ServiceBuilder;
use tower_cookies::CookieManagerLayer;
use tower_http::{
    catch_panic::CatchPanicLayer,
    request_id::MakeRequestUuid,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
    ServiceBuilderExt,
};
use tracing::{event, Level};

use trip_planner_auth::PasswordHasher;
use trip_planner_db as db;

use crate::{
    config::Config,
    obfuscate_errors::ObfuscateErrorLayer,
    shared_state::{InnerState, State},
};

/// Plaintext behind the decoy hash used for unknown usernames at login.
pub const DECOY_PASSWORD: &str = "trip-planner-decoy-password";

pub struct Server {
    pub host: String,
    pub port: u16,
    pub server: axum::Server<AddrIncoming, IntoMakeService<Router>>,
}

impl Server {
    pub async fn run(self) -> Result<(), Error> {
        self.server.await?;
        Ok(())
    }
}

/// Build the router with all the global middleware applied.
pub fn build_app(state: State) -> Router {
    let production = state.production;

    routes::configure_routes(Router::new()).layer(
        ServiceBuilder::new()
            .layer(CatchPanicLayer::custom(move |err| {
                panic_handler::handle_panic(production, err)
            }))
            .layer(ObfuscateErrorLayer::new(production))
            .compression()
            .decompression()
            .layer(CookieManagerLayer::new())
            .set_x_request_id(MakeRequestUuid)
            .propagate_x_request_id()
            .layer(Extension(state))
            .layer(
                TraceLayer::new_for_http()
                    .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                    .on_response(DefaultOnResponse::new().level(Level::INFO))
                    .on_request(DefaultOnRequest::new().level(Level::INFO)),
            )
            .into_inner(),
    )
}

/// Connect to the database, bring it up to date, and bind the listener. A port of 0 binds
/// a random port, which is reported in the returned [Server].
pub async fn create_server(config: Config) -> Result<Server, anyhow::Error> {
    let production = config.production();

    let db = db::connect(config.database_url.as_str(), config.database_pool_size)?;
    db::run_migrations(&db).await?;

    let passwords = PasswordHasher::new(config.password_memory_cost, config.password_iterations)?;
    let decoy_hash = passwords.hash(DECOY_PASSWORD)?;

    let state = Arc::new(InnerState {
        production,
        sessions: auth::session_manager(db.clone(), config.session_cookie_name.clone()),
        db,
        passwords,
        decoy_hash,
    });

    let app = build_app(state);

    let bind_ip: IpAddr = config.host.parse()?;
    let addr = SocketAddr::from((bind_ip, config.port));
    let builder = axum::Server::try_bind(&addr)?;
    let server = builder.serve(app.into_make_service());
    let port = server.local_addr().port();

    event!(Level::INFO, production, "Listening on {}:{}", config.host, port);

    Ok(Server {
        host: config.host,
        port,
        server,
    })
}
