/// Session cookie handling and the route guard
///
/// Login issues an opaque token through an HttpOnly cookie. Protected
/// routes are wrapped in [`require_session`], which resolves that cookie
/// through the [`SessionManager`](minishop_shared::auth::session::SessionManager)
/// and inserts a [`CurrentUser`] into the request extensions before the
/// handler runs. Anonymous callers are rejected with 401 and never reach
/// the database.
///
/// # Example
///
/// ```no_run
/// use axum::Extension;
/// use minishop_api::middleware::session::CurrentUser;
///
/// async fn handler(Extension(user): Extension<CurrentUser>) -> String {
///     format!("Hello, {}!", user.username)
/// }
/// ```

use crate::{app::AppState, error::ApiError};
use axum::{
    extract::{Request, State},
    http::{header, HeaderMap, HeaderValue},
    middleware::Next,
    response::Response,
};
use cookie::{time::Duration as CookieDuration, Cookie, SameSite};

/// Session cookie name
pub const SESSION_COOKIE_NAME: &str = "minishop_session";

/// Authenticated caller, resolved from the session cookie
#[derive(Debug, Clone)]
pub struct CurrentUser {
    /// User ID
    pub user_id: i64,

    /// Username at login time
    pub username: String,

    /// Session token presented with the request
    pub token: String,
}

/// Route guard for endpoints that need a logged-in user
pub async fn require_session(
    State(state): State<AppState>,
    mut req: Request,
    next: Next,
) -> Result<Response, ApiError> {
    let token = session_token(req.headers())
        .ok_or_else(|| ApiError::Unauthorized("Login required".to_string()))?;

    let session = state.sessions.resolve(&token).await?;

    req.extensions_mut().insert(CurrentUser {
        user_id: session.user_id,
        username: session.username,
        token,
    });

    Ok(next.run(req).await)
}

/// Extracts the session token from the `Cookie` headers, if any
pub fn session_token(headers: &HeaderMap) -> Option<String> {
    headers
        .get_all(header::COOKIE)
        .iter()
        .filter_map(|value| value.to_str().ok())
        .flat_map(Cookie::split_parse)
        .filter_map(Result::ok)
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(|cookie| cookie.value().to_string())
}

/// `Set-Cookie` value that installs a session token
pub fn session_cookie(token: &str, state: &AppState) -> Result<HeaderValue, ApiError> {
    let max_age = i64::try_from(state.config.session.ttl_seconds).unwrap_or(i64::MAX);

    let cookie = Cookie::build((SESSION_COOKIE_NAME, token.to_string()))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.cookie_secure)
        .max_age(CookieDuration::seconds(max_age))
        .build();

    to_header(&cookie)
}

/// `Set-Cookie` value that clears the session cookie
pub fn removal_cookie(state: &AppState) -> Result<HeaderValue, ApiError> {
    let cookie = Cookie::build((SESSION_COOKIE_NAME, ""))
        .path("/")
        .http_only(true)
        .same_site(SameSite::Lax)
        .secure(state.config.session.cookie_secure)
        .max_age(CookieDuration::ZERO)
        .build();

    to_header(&cookie)
}

fn to_header(cookie: &Cookie<'_>) -> Result<HeaderValue, ApiError> {
    HeaderValue::from_str(&cookie.to_string())
        .map_err(|e| ApiError::InternalError(format!("Invalid cookie header: {}", e)))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn headers(cookies: &[&str]) -> HeaderMap {
        let mut map = HeaderMap::new();
        for value in cookies {
            map.append(header::COOKIE, HeaderValue::from_str(value).unwrap());
        }
        map
    }

    #[test]
    fn test_session_token_found_among_other_cookies() {
        let map = headers(&["theme=dark; minishop_session=sess_abc; lang=en"]);
        assert_eq!(session_token(&map).as_deref(), Some("sess_abc"));
    }

    #[test]
    fn test_session_token_across_multiple_headers() {
        let map = headers(&["theme=dark", "minishop_session=sess_xyz"]);
        assert_eq!(session_token(&map).as_deref(), Some("sess_xyz"));
    }

    #[test]
    fn test_session_token_missing() {
        assert!(session_token(&HeaderMap::new()).is_none());
        assert!(session_token(&headers(&["theme=dark"])).is_none());
    }
}
