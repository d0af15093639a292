use chrono::{DateTime, Utc};
use time::OffsetDateTime;
use tower_cookies::{cookie::SameSite, Cookie, Cookies};

/// The cookie side of a request/response pair: read what the client sent, queue what
/// the response should set.
pub trait CookieJar {
    fn get_value(&self, name: &str) -> Option<String>;
    fn add_cookie(&self, cookie: Cookie<'static>);
}

impl CookieJar for Cookies {
    fn get_value(&self, name: &str) -> Option<String> {
        self.get(name).map(|cookie| cookie.value().to_string())
    }

    fn add_cookie(&self, cookie: Cookie<'static>) {
        self.add(cookie);
    }
}

#[derive(Clone, Debug)]
pub struct SessionCookieManager {
    pub cookie_name: String,
}

impl SessionCookieManager {
    pub fn new(cookie_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
        }
    }

    pub fn session_cookie(&self, token: String, expires: DateTime<Utc>) -> Cookie<'static> {
        let builder = Cookie::build(self.cookie_name.clone(), token)
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Lax)
            .path("/");

        match OffsetDateTime::from_unix_timestamp(expires.timestamp()) {
            Ok(expires) => builder.expires(expires).finish(),
            Err(_) => builder.finish(),
        }
    }

    /// A cookie that makes the browser drop the session cookie. It carries the same
    /// attributes as the real one so that browsers match it up.
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.cookie_name.clone(), "")
            .http_only(true)
            .secure(true)
            .same_site(SameSite::Lax)
            .path("/")
            .finish();
        cookie.make_removal();
        cookie
    }

    pub fn get_token(&self, jar: &impl CookieJar) -> Option<String> {
        jar.get_value(&self.cookie_name)
            .filter(|value| !value.is_empty())
    }

    pub fn set(&self, jar: &impl CookieJar, token: String, expires: DateTime<Utc>) {
        jar.add_cookie(self.session_cookie(token, expires));
    }

    pub fn clear(&self, jar: &impl CookieJar) {
        jar.add_cookie(self.removal_cookie());
    }
}
