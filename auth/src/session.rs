use argon2::password_hash::rand_core::{OsRng, RngCore};
use async_trait::async_trait;
use base64::{engine::general_purpose::URL_SAFE_NO_PAD, Engine};
use chrono::{DateTime, Duration, Utc};
use tracing::{event, Level};

use crate::{
    cookie::{CookieJar, SessionCookieManager},
    error::AuthError,
};

pub const SESSION_COOKIE_NAME: &str = "session_id";
pub const SESSION_TTL_HOURS: i64 = 24;

/// Random bytes in a session token.
pub const TOKEN_BYTES: usize = 32;

/// Generate a new session token: 256 bits from the OS RNG, encoded as URL-safe base64.
pub fn new_session_token() -> String {
    let mut bytes = [0u8; TOKEN_BYTES];
    OsRng.fill_bytes(&mut bytes);
    URL_SAFE_NO_PAD.encode(bytes)
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct SessionRecord<UserId> {
    pub token: String,
    pub user_id: UserId,
    pub created_at: DateTime<Utc>,
    pub expires_at: DateTime<Utc>,
}

#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SessionState {
    /// Created after `now`, which only happens with clock skew. Treated like a missing session.
    NotYetValid,
    Active,
    Expired,
}

impl<UserId> SessionRecord<UserId> {
    pub fn new(token: String, user_id: UserId, now: DateTime<Utc>, ttl: Duration) -> Self {
        Self {
            token,
            user_id,
            created_at: now,
            expires_at: now + ttl,
        }
    }

    pub fn state(&self, now: DateTime<Utc>) -> SessionState {
        if now >= self.expires_at {
            SessionState::Expired
        } else if now < self.created_at {
            SessionState::NotYetValid
        } else {
            SessionState::Active
        }
    }
}

#[async_trait]
pub trait SessionStore: Send + Sync {
    type UserId: Clone + std::fmt::Debug + Send + Sync + 'static;
    type User: Send + 'static;
    type Error: Send + 'static;

    /// Persist a new session. Fails if the token is already in use.
    async fn create_session(
        &self,
        session: SessionRecord<Self::UserId>,
    ) -> Result<(), Self::Error>;

    async fn get_session(
        &self,
        token: &str,
    ) -> Result<Option<SessionRecord<Self::UserId>>, Self::Error>;

    /// Delete the session if it exists. Deleting a missing session is not an error.
    async fn delete_session(&self, token: &str) -> Result<(), Self::Error>;

    async fn get_user(&self, user_id: Self::UserId) -> Result<Option<Self::User>, Self::Error>;

    fn is_admin(user: &Self::User) -> bool;
}

/// The result of looking up the session named by a request's cookie.
#[derive(Debug)]
pub enum SessionLookup<U> {
    /// No cookie, no matching record, or a record that isn't valid yet.
    Absent,
    Expired { token: String },
    MissingUser,
    Active(U),
}

#[derive(Clone, Debug)]
pub struct SessionManager<STORE: SessionStore> {
    pub store: STORE,
    pub cookies: SessionCookieManager,
    pub ttl: Duration,
}

impl<STORE: SessionStore> SessionManager<STORE> {
    pub fn new(store: STORE, cookie_name: impl Into<String>) -> Self {
        Self {
            store,
            cookies: SessionCookieManager::new(cookie_name),
            ttl: Duration::hours(SESSION_TTL_HOURS),
        }
    }

    pub async fn start_session(
        &self,
        jar: &(impl CookieJar + Sync),
        user_id: STORE::UserId,
    ) -> Result<String, STORE::Error> {
        self.start_session_at(jar, user_id, Utc::now()).await
    }

    pub async fn start_session_at(
        &self,
        jar: &(impl CookieJar + Sync),
        user_id: STORE::UserId,
        now: DateTime<Utc>,
    ) -> Result<String, STORE::Error> {
        let session = SessionRecord::new(new_session_token(), user_id, now, self.ttl);
        let token = session.token.clone();
        let expires_at = session.expires_at;
        let user_id = session.user_id.clone();

        self.store.create_session(session).await?;
        self.cookies.set(jar, token.clone(), expires_at);

        event!(Level::INFO, user_id=?user_id, %expires_at, "session started");
        Ok(token)
    }

    /// Look up the session for a token without changing anything.
    pub async fn lookup(
        &self,
        token: Option<&str>,
        now: DateTime<Utc>,
    ) -> Result<SessionLookup<STORE::User>, STORE::Error> {
        let Some(token) = token else {
            return Ok(SessionLookup::Absent);
        };

        let Some(session) = self.store.get_session(token).await? else {
            return Ok(SessionLookup::Absent);
        };

        match session.state(now) {
            SessionState::NotYetValid => {
                event!(Level::WARN, user_id=?session.user_id, created_at=%session.created_at, "session created in the future");
                Ok(SessionLookup::Absent)
            }
            SessionState::Expired => Ok(SessionLookup::Expired {
                token: session.token,
            }),
            SessionState::Active => match self.store.get_user(session.user_id).await? {
                Some(user) => Ok(SessionLookup::Active(user)),
                None => Ok(SessionLookup::MissingUser),
            },
        }
    }

    pub async fn resolve_optional(
        &self,
        jar: &(impl CookieJar + Sync),
    ) -> Result<Option<STORE::User>, STORE::Error> {
        self.resolve_optional_at(jar, Utc::now()).await
    }

    pub async fn resolve_optional_at(
        &self,
        jar: &(impl CookieJar + Sync),
        now: DateTime<Utc>,
    ) -> Result<Option<STORE::User>, STORE::Error> {
        let token = self.cookies.get_token(jar);
        match self.lookup(token.as_deref(), now).await? {
            SessionLookup::Active(user) => Ok(Some(user)),
            _ => Ok(None),
        }
    }

    pub async fn require(
        &self,
        jar: &(impl CookieJar + Sync),
    ) -> Result<STORE::User, AuthError<STORE::Error>> {
        self.require_at(jar, Utc::now()).await
    }

    /// Like [resolve_optional](Self::resolve_optional), but fails when there is no user. An
    /// expired session is deleted and its cookie cleared. A missing cookie or unknown token
    /// leaves the cookies alone.
    pub async fn require_at(
        &self,
        jar: &(impl CookieJar + Sync),
        now: DateTime<Utc>,
    ) -> Result<STORE::User, AuthError<STORE::Error>> {
        let token = self.cookies.get_token(jar);
        let lookup = self
            .lookup(token.as_deref(), now)
            .await
            .map_err(AuthError::Store)?;

        match lookup {
            SessionLookup::Active(user) => Ok(user),
            SessionLookup::Expired { token } => {
                event!(Level::INFO, "session expired");
                self.store
                    .delete_session(&token)
                    .await
                    .map_err(AuthError::Store)?;
                self.cookies.clear(jar);
                Err(AuthError::Unauthenticated)
            }
            SessionLookup::MissingUser => {
                event!(Level::WARN, "session belongs to a missing user");
                Err(AuthError::Unauthenticated)
            }
            SessionLookup::Absent => Err(AuthError::Unauthenticated),
        }
    }

    pub async fn require_admin(
        &self,
        jar: &(impl CookieJar + Sync),
    ) -> Result<STORE::User, AuthError<STORE::Error>> {
        self.require_admin_at(jar, Utc::now()).await
    }

    pub async fn require_admin_at(
        &self,
        jar: &(impl CookieJar + Sync),
        now: DateTime<Utc>,
    ) -> Result<STORE::User, AuthError<STORE::Error>> {
        let user = self.require_at(jar, now).await?;
        if STORE::is_admin(&user) {
            Ok(user)
        } else {
            Err(AuthError::Forbidden)
        }
    }

    /// Delete the request's session, if there is one, and always clear the cookie.
    pub async fn end_session(&self, jar: &(impl CookieJar + Sync)) -> Result<(), STORE::Error> {
        if let Some(token) = self.cookies.get_token(jar) {
            self.store.delete_session(&token).await?;
            event!(Level::INFO, "session ended");
        }

        self.cookies.clear(jar);
        Ok(())
    }
}
