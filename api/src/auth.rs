use async_trait::async_trait;
use axum::{extract::FromRequestParts, http::request::Parts, Extension};
use chrono::{DateTime, NaiveDateTime, Utc};
use tower_cookies::Cookies;

use trip_planner_auth as auth;
use trip_planner_db::{self as db, PoolExt, RecordStore};

use auth::{SessionManager, SessionRecord};
use db::users::User;

use crate::{shared_state::State, Error};

/// Sessions persisted in the `sessions` table.
#[derive(Clone)]
pub struct SessionStore {
    pub db: db::Pool,
}

fn to_naive(t: DateTime<Utc>) -> NaiveDateTime {
    t.naive_utc()
}

fn from_naive(t: NaiveDateTime) -> DateTime<Utc> {
    DateTime::<Utc>::from_naive_utc_and_offset(t, Utc)
}

#[async_trait]
impl auth::SessionStore for SessionStore {
    type UserId = i32;
    type User = User;
    type Error = Error;

    async fn create_session(&self, session: SessionRecord<i32>) -> Result<(), Error> {
        let input = db::sessions::NewSession {
            session_id: session.token,
            user_id: session.user_id,
            created_at: to_naive(session.created_at),
            expires_at: to_naive(session.expires_at),
        };

        self.db
            .interact(move |conn| db::sessions::create(conn, &input).map_err(Error::from))
            .await
    }

    async fn get_session(&self, token: &str) -> Result<Option<SessionRecord<i32>>, Error> {
        let token = token.to_string();
        let session = self
            .db
            .interact(move |conn| db::sessions::find(conn, &token).map_err(Error::from))
            .await?;

        Ok(session.map(|s| SessionRecord {
            token: s.session_id,
            user_id: s.user_id,
            created_at: from_naive(s.created_at),
            expires_at: from_naive(s.expires_at),
        }))
    }

    async fn delete_session(&self, token: &str) -> Result<(), Error> {
        let token = token.to_string();
        self.db
            .interact(move |conn| db::sessions::delete(conn, &token).map_err(Error::from))
            .await?;
        Ok(())
    }

    async fn get_user(&self, user_id: i32) -> Result<Option<User>, Error> {
        self.db
            .get_record::<User>(user_id)
            .await
            .map_err(Error::from)
    }

    fn is_admin(user: &User) -> bool {
        user.is_admin
    }
}

pub fn session_manager(db: db::Pool, cookie_name: String) -> SessionManager<SessionStore> {
    SessionManager::new(SessionStore { db }, cookie_name)
}

async fn request_context<S: Send + Sync>(
    parts: &mut Parts,
    state: &S,
) -> Result<(State, Cookies), Error> {
    let Extension(app_state) = Extension::<State>::from_request_parts(parts, state)
        .await
        .map_err(|e| Error::Generic(anyhow::anyhow!("Missing app state: {e}")))?;
    let cookies = Cookies::from_request_parts(parts, state)
        .await
        .map_err(|(_, msg)| Error::Generic(anyhow::anyhow!(msg)))?;
    Ok((app_state, cookies))
}

/// The signed-in user, if there is one. Never rejects for missing or stale sessions.
pub struct MaybeUser(pub Option<User>);

/// Rejects with 401 unless the request carries an active session.
pub struct CurrentUser(pub User);

/// Rejects with 401 without a session and 403 if the user isn't an admin.
pub struct AdminUser(pub User);

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for MaybeUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (app_state, cookies) = request_context(parts, state).await?;
        let user = app_state.sessions.resolve_optional(&cookies).await?;
        Ok(MaybeUser(user))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for CurrentUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (app_state, cookies) = request_context(parts, state).await?;
        let user = app_state.sessions.require(&cookies).await?;
        Ok(CurrentUser(user))
    }
}

#[async_trait]
impl<S: Send + Sync> FromRequestParts<S> for AdminUser {
    type Rejection = Error;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let (app_state, cookies) = request_context(parts, state).await?;
        let user = app_state.sessions.require_admin(&cookies).await?;
        Ok(AdminUser(user))
    }
}
