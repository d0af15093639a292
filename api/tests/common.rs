use anyhow::Result;
use futures::Future;
use once_cell::sync::Lazy;
use reqwest::{header, RequestBuilder, Response};
use tracing::subscriber::set_global_default;
use tracing_error::ErrorLayer;
use tracing_log::LogTracer;
use tracing_subscriber::{layer::SubscriberExt, EnvFilter, Registry};
use tracing_tree::HierarchicalLayer;

use trip_planner_api::Server;
use trip_planner_auth::PasswordHasher;
use trip_planner_db::{
    test::{create_database, TestDatabase},
    users::{NewUser, User},
    RecordStore,
};

pub const COOKIE_NAME: &str = "session_id";

fn configure_tracing() {
    LogTracer::builder()
        .ignore_crate("rustls")
        .with_max_level(log::LevelFilter::Debug)
        .init()
        .expect("Failed to create logger");

    let env_filter = EnvFilter::try_from_env("LOG").unwrap_or_else(|_| EnvFilter::new("info"));

    let tree = HierarchicalLayer::new(2)
        .with_targets(true)
        .with_bracketed_fields(true);

    let subscriber = Registry::default()
        .with(env_filter)
        .with(tree)
        .with(ErrorLayer::default());
    set_global_default(subscriber).expect("Setting subscriber");
}

pub static TRACING: Lazy<()> = Lazy::new(|| {
    if std::env::var("TEST_LOG").is_ok() {
        configure_tracing();
    }
});

/// Cheap hashing parameters so that tests don't spend their time in Argon2.
pub fn test_hasher() -> PasswordHasher {
    PasswordHasher::new(1024, 1).expect("Creating hasher")
}

pub struct TestApp {
    pub database: TestDatabase,
    pub base_url: String,
    /// Doesn't follow redirects or store cookies. The session cookie is marked `Secure`, so
    /// tests pass it along by hand.
    pub client: reqwest::Client,
}

async fn start_app(database: TestDatabase) -> Result<TestApp> {
    let config = trip_planner_api::config::Config {
        host: "127.0.0.1".to_string(),
        port: 0, // Bind to random port
        env: "test".to_string(),
        database_url: database.url.clone(),
        database_pool_size: 4,
        session_cookie_name: COOKIE_NAME.to_string(),
        password_memory_cost: 1024,
        password_iterations: 1,
        honeycomb_team: None,
        honeycomb_dataset: String::new(),
    };

    Lazy::force(&TRACING);
    let server = trip_planner_api::create_server(config).await?;
    let Server { host, port, .. } = &server;
    let base_url = format!("http://{}:{}", host, port);

    tokio::task::spawn(server.run());

    let client = reqwest::ClientBuilder::new()
        .redirect(reqwest::redirect::Policy::none())
        .timeout(std::time::Duration::from_secs(30))
        .build()?;

    Ok(TestApp {
        database,
        base_url,
        client,
    })
}

pub async fn run_app_test<F, R>(f: F)
where
    F: FnOnce(TestApp) -> R,
    R: Future<Output = Result<(), anyhow::Error>>,
{
    let database = create_database().await.expect("Creating database");
    let app = start_app(database).await.expect("Starting app");
    f(app).await.unwrap();
}

/// The value of the session cookie set by a response, if any. A cleared cookie comes back
/// as an empty string.
pub fn set_session_cookie(response: &Response) -> Option<String> {
    let header = set_cookie_header(response)?;
    let (_, rest) = header.split_once('=')?;
    let value = rest.split(';').next().unwrap_or_default();
    Some(value.to_string())
}

/// The full Set-Cookie header for the session cookie, if the response has one.
pub fn set_cookie_header(response: &Response) -> Option<String> {
    response
        .headers()
        .get_all(header::SET_COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .find(|value| value.starts_with(&format!("{COOKIE_NAME}=")))
        .map(|value| value.to_string())
}

pub fn location(response: &Response) -> Option<&str> {
    response
        .headers()
        .get(header::LOCATION)
        .and_then(|value| value.to_str().ok())
}

impl TestApp {
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    pub fn get(&self, path: &str, session: Option<&str>) -> RequestBuilder {
        with_session(self.client.get(self.url(path)), session)
    }

    pub fn post(&self, path: &str, session: Option<&str>) -> RequestBuilder {
        with_session(self.client.post(self.url(path)), session)
    }

    pub fn patch(&self, path: &str, session: Option<&str>) -> RequestBuilder {
        with_session(self.client.patch(self.url(path)), session)
    }

    pub fn delete(&self, path: &str, session: Option<&str>) -> RequestBuilder {
        with_session(self.client.delete(self.url(path)), session)
    }

    pub async fn add_user(&self, username: &str, password: &str, is_admin: bool) -> Result<User> {
        let hash = test_hasher().hash(password)?;
        let user = self
            .database
            .pool
            .create_record::<User>(NewUser::new(username, hash, is_admin))
            .await?;
        Ok(user)
    }

    /// Log in through the API and return the session token from the cookie.
    pub async fn login(&self, username: &str, password: &str) -> Result<String> {
        let response = self
            .post("/login", None)
            .form(&[("username", username), ("password", password)])
            .send()
            .await?;

        anyhow::ensure!(
            response.status() == reqwest::StatusCode::FOUND,
            "login for {username} returned {}",
            response.status()
        );

        set_session_cookie(&response)
            .filter(|token| !token.is_empty())
            .ok_or_else(|| anyhow::anyhow!("login for {username} set no session cookie"))
    }
}

fn with_session(builder: RequestBuilder, session: Option<&str>) -> RequestBuilder {
    match session {
        Some(token) => builder.header(header::COOKIE, format!("{COOKIE_NAME}={token}")),
        None => builder,
    }
}
