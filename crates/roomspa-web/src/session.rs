//! Cookie-backed admin session and the route guard

use axum::{
    extract::Request,
    middleware::Next,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use roomspa_core::types::{AdminUser, Session};
use tracing::debug;

/// Cookie holding the bearer token
pub const TOKEN_COOKIE: &str = "adminToken";
/// Cookie holding the URL-encoded JSON admin record
pub const USER_COOKIE: &str = "adminUser";

/// The signed-in administrator, read once per request by [`require_session`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionContext {
    /// Bearer token for backend calls
    pub token: String,
    /// Profile, when the user cookie decodes
    pub user: Option<AdminUser>,
}

impl SessionContext {
    /// Read the session from the request cookies; `None` when there is no token
    #[must_use]
    pub fn from_jar(jar: &CookieJar) -> Option<Self> {
        let token = jar
            .get(TOKEN_COOKIE)
            .map(|c| c.value().trim().to_string())
            .filter(|t| !t.is_empty())?;

        Some(Self {
            token,
            user: jar.get(USER_COOKIE).and_then(|c| decode_user(c.value())),
        })
    }

    /// Name shown in the header
    #[must_use]
    pub fn display_name(&self) -> String {
        self.user
            .as_ref()
            .map(|u| u.name.trim())
            .filter(|n| !n.is_empty())
            .unwrap_or("Admin")
            .to_string()
    }

    /// Email shown under the name
    #[must_use]
    pub fn email(&self) -> String {
        self.user.as_ref().map(|u| u.email.clone()).unwrap_or_default()
    }

    /// Up to two initials for the avatar
    #[must_use]
    pub fn initials(&self) -> String {
        let initials: String = self
            .display_name()
            .split_whitespace()
            .filter_map(|word| word.chars().next())
            .take(2)
            .flat_map(char::to_uppercase)
            .collect();
        if initials.is_empty() { "A".to_string() } else { initials }
    }
}

/// Decode the `adminUser` cookie value; failures mean "no user info"
#[must_use]
pub fn decode_user(raw: &str) -> Option<AdminUser> {
    let decoded = match urlencoding::decode(raw) {
        Ok(decoded) => decoded,
        Err(e) => {
            debug!(error = %e, "Admin user cookie is not valid percent-encoding");
            return None;
        }
    };
    match serde_json::from_str::<AdminUser>(&decoded) {
        Ok(user) => Some(user),
        Err(e) => {
            debug!(error = %e, "Admin user cookie is not a user record");
            None
        }
    }
}

fn session_cookie(name: &'static str, value: String, secure: bool) -> Cookie<'static> {
    Cookie::build((name, value))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(secure)
        .build()
}

/// Persist a fresh login
#[must_use]
pub fn store(jar: CookieJar, session: &Session, secure: bool) -> CookieJar {
    let user = serde_json::to_string(&session.user).unwrap_or_else(|_| "{}".to_string());
    jar.add(session_cookie(TOKEN_COOKIE, session.token.clone(), secure))
        .add(session_cookie(
            USER_COOKIE,
            urlencoding::encode(&user).into_owned(),
            secure,
        ))
}

/// Drop both session cookies
#[must_use]
pub fn clear(jar: CookieJar) -> CookieJar {
    jar.remove(Cookie::build(TOKEN_COOKIE).path("/").build())
        .remove(Cookie::build(USER_COOKIE).path("/").build())
}

/// Route guard: redirect to `/login` unless a token cookie is present
///
/// Runs before every admin handler, so an anonymous request never reaches the
/// backend. On success the [`SessionContext`] is placed in the request
/// extensions for handlers to extract.
pub async fn require_session(jar: CookieJar, mut request: Request, next: Next) -> Response {
    match SessionContext::from_jar(&jar) {
        Some(session) => {
            request.extensions_mut().insert(session);
            next.run(request).await
        }
        None => {
            debug!(path = %request.uri().path(), "No admin session, redirecting to login");
            Redirect::to("/login").into_response()
        }
    }
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn session() -> Session {
        Session {
            token: "abc123".to_string(),
            user: AdminUser {
                name: "Grace Hopper".to_string(),
                email: "grace@roomspa.com".to_string(),
                role: "admin".to_string(),
            },
        }
    }

    #[test]
    fn test_store_then_read_round_trips() {
        let jar = store(CookieJar::new(), &session(), false);
        let context = SessionContext::from_jar(&jar).unwrap();

        assert_eq!(context.token, "abc123");
        assert_eq!(context.display_name(), "Grace Hopper");
        assert_eq!(context.initials(), "GH");
    }

    #[test]
    fn test_cookie_attributes() {
        let jar = store(CookieJar::new(), &session(), true);
        let cookie = jar.get(TOKEN_COOKIE).unwrap();

        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
    }

    #[test]
    fn test_missing_or_blank_token_is_no_session() {
        assert!(SessionContext::from_jar(&CookieJar::new()).is_none());

        let jar = CookieJar::new().add(Cookie::new(TOKEN_COOKIE, "  "));
        assert!(SessionContext::from_jar(&jar).is_none());
    }

    #[test]
    fn test_garbled_user_cookie_keeps_token() {
        let jar = CookieJar::new()
            .add(Cookie::new(TOKEN_COOKIE, "abc"))
            .add(Cookie::new(USER_COOKIE, "%7Bnot-json"));
        let context = SessionContext::from_jar(&jar).unwrap();

        assert!(context.user.is_none());
        assert_eq!(context.display_name(), "Admin");
        assert_eq!(context.initials(), "A");
    }

    #[test]
    fn test_clear_removes_both_cookies() {
        let jar = clear(store(CookieJar::new(), &session(), false));
        assert!(jar.get(TOKEN_COOKIE).is_none());
        assert!(jar.get(USER_COOKIE).is_none());
    }
}
