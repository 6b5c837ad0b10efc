//! Sign-in and sign-out

use askama::Template;
use axum::{
    Form,
    extract::State,
    http::StatusCode,
    response::{IntoResponse, Redirect, Response},
};
use axum_extra::extract::cookie::CookieJar;
use roomspa_core::Error;
use tracing::{info, warn};
use validator::Validate;

use crate::forms::LoginForm;
use crate::render;
use crate::session::{self, SessionContext};
use crate::state::SharedState;

/// Message shown for refused credentials
pub const INVALID_CREDENTIALS: &str = "Invalid email or password";

/// `/login`
#[derive(Template)]
#[template(path = "login.html")]
pub struct LoginPage {
    /// Email to keep in the field after a failed attempt
    pub email: String,
    /// Why the last attempt failed
    pub error: Option<String>,
}

/// Map a failed login to the message shown on the form
#[must_use]
pub fn login_error(error: &Error) -> String {
    match error {
        Error::Rejected { .. } | Error::MissingData => INVALID_CREDENTIALS.to_string(),
        e if e.is_unauthorized() => INVALID_CREDENTIALS.to_string(),
        e => e.user_message(),
    }
}

/// `GET /login`
pub async fn login_page(jar: CookieJar) -> Response {
    if SessionContext::from_jar(&jar).is_some() {
        return Redirect::to("/admin").into_response();
    }
    render::page(&LoginPage {
        email: String::new(),
        error: None,
    })
}

/// `POST /login`
pub async fn login(State(state): State<SharedState>, jar: CookieJar, Form(form): Form<LoginForm>) -> Response {
    let email = form.email.trim().to_string();
    let attempt = match form.validate() {
        Ok(()) => state.client.auth().login(&email, &form.password).await,
        Err(e) => Err(Error::from(e)),
    };

    match attempt {
        Ok(admin) => {
            info!(email = %email, "Admin signed in");
            let jar = session::store(jar, &admin, state.config.session.secure_cookies);
            (jar, Redirect::to("/admin")).into_response()
        }
        Err(e) => {
            warn!(error = %e, email = %email, "Sign-in failed");
            let error = match e {
                Error::Validation { message, .. } => message,
                other => login_error(&other),
            };
            render::page_with_status(
                StatusCode::UNAUTHORIZED,
                &LoginPage {
                    email,
                    error: Some(error),
                },
            )
        }
    }
}

/// `POST /logout`
///
/// The backend call is best effort; the cookies are cleared regardless.
pub async fn logout(State(state): State<SharedState>, jar: CookieJar) -> Response {
    if let Some(session) = SessionContext::from_jar(&jar) {
        if let Err(e) = state.client_for(&session).auth().logout().await {
            warn!(error = %e, "Backend logout failed, clearing the session anyway");
        }
        info!(user = %session.display_name(), "Admin signed out");
    }
    (session::clear(jar), Redirect::to("/login")).into_response()
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_login_error_messages() {
        assert_eq!(login_error(&Error::rejected(None)), INVALID_CREDENTIALS);
        assert_eq!(
            login_error(&Error::Status {
                status: 401,
                message: "Unauthorized".to_string()
            }),
            INVALID_CREDENTIALS
        );
        assert_eq!(
            login_error(&Error::Transport("refused".to_string())),
            "Could not reach the server. Please try again."
        );
    }
}
