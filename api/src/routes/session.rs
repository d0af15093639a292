use axum::{
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    routing::{get, post},
    Extension, Form, Json, Router,
};
use serde::{Deserialize, Serialize};
use serde_json::json;
use tower_cookies::Cookies;
use tracing::{event, Level};

use trip_planner_db::{
    self as db,
    users::{NewUser, User},
    PoolExt, RecordStore,
};

use crate::{
    auth::{CurrentUser, MaybeUser},
    shared_state::State,
    Error,
};

#[derive(Deserialize)]
struct Credentials {
    username: String,
    password: String,
}

impl Credentials {
    fn validate(&self) -> Result<(), Error> {
        if self.username.trim().is_empty() {
            return Err(Error::InvalidInput("Username must not be empty"));
        }

        if self.password.is_empty() {
            return Err(Error::InvalidInput("Password must not be empty"));
        }

        Ok(())
    }
}

#[derive(Serialize)]
struct MeResponse {
    username: String,
    is_admin: bool,
}

/// A 302 redirect. Set-Cookie headers queued by the handler are added on the way out.
fn found(location: &'static str) -> Response {
    (StatusCode::FOUND, [(header::LOCATION, location)]).into_response()
}

async fn index(MaybeUser(user): MaybeUser) -> Response {
    match user {
        Some(user) => Json(json!({ "user": user })).into_response(),
        None => found("/login"),
    }
}

async fn login(
    Extension(ref state): Extension<State>,
    cookies: Cookies,
    Form(credentials): Form<Credentials>,
) -> Result<Response, Error> {
    let Credentials { username, password } = credentials;

    let user = {
        let username = username.clone();
        state
            .db
            .interact(move |conn| {
                db::users::find_by_username(conn, &username).map_err(Error::from)
            })
            .await?
    };

    let hasher = state.passwords.clone();
    let stored = user.as_ref().map(|u| u.password_hash.clone());
    let decoy = state.decoy_hash.clone();
    let verified = tokio::task::spawn_blocking(move || {
        hasher.verify_or_decoy(&password, stored.as_deref(), &decoy)
    })
    .await
    .map_err(|e| Error::Generic(e.into()))?;

    let user = match user {
        Some(user) if verified => user,
        Some(user) => {
            event!(Level::INFO, user_id = user.id, "login with wrong password");
            return Err(Error::InvalidCredentials);
        }
        None => {
            event!(Level::INFO, %username, "login for unknown user");
            return Err(Error::InvalidCredentials);
        }
    };

    state.sessions.start_session(&cookies, user.id).await?;
    Ok(found("/"))
}

async fn register(
    Extension(ref state): Extension<State>,
    cookies: Cookies,
    Form(credentials): Form<Credentials>,
) -> Result<Response, Error> {
    credentials.validate()?;
    let Credentials { username, password } = credentials;

    let hasher = state.passwords.clone();
    let hash = tokio::task::spawn_blocking(move || hasher.hash(&password))
        .await
        .map_err(|e| Error::Generic(e.into()))??;

    // The unique index on username settles races between two registrations.
    let result = state
        .db
        .create_record::<User>(NewUser::new(username, hash, false))
        .await;

    let user = match result {
        Ok(user) => user,
        Err(db::Error::Db(e)) if db::users::is_unique_violation(&e) => {
            return Err(Error::UsernameTaken);
        }
        Err(e) => return Err(e.into()),
    };

    event!(Level::INFO, user_id = user.id, "registered user");

    state.sessions.start_session(&cookies, user.id).await?;
    Ok(found("/"))
}

async fn logout(Extension(ref state): Extension<State>, cookies: Cookies) -> Result<Response, Error> {
    state.sessions.end_session(&cookies).await?;
    Ok(found("/login"))
}

async fn me(CurrentUser(user): CurrentUser) -> impl IntoResponse {
    Json(MeResponse {
        username: user.username,
        is_admin: user.is_admin,
    })
}

pub fn configure() -> Router {
    Router::new()
        .route("/", get(index))
        .route("/login", post(login))
        .route("/register", post(register))
        .route("/logout", post(logout))
        .route("/me", get(me))
}
