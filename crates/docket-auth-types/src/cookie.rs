//! Cookie builders for the refresh token.
//!
//! Bearer access tokens travel in the `Authorization` header; the refresh token
//! is additionally kept in an http-only cookie scoped to `/refresh` so the
//! browser can renew a session without script access to it.

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};
use time::Duration;

use crate::token::REFRESH_TOKEN_EXP;

/// Cookie name for the refresh token.
pub const DOCKET_REFRESH_TOKEN: &str = "docket_refresh_token";

/// Path the refresh cookie is scoped to.
pub const REFRESH_COOKIE_PATH: &str = "/refresh";

fn refresh_cookie(value: String, domain: Option<String>, max_age: Duration) -> Cookie<'static> {
    let mut builder = Cookie::build((DOCKET_REFRESH_TOKEN, value))
        .path(REFRESH_COOKIE_PATH)
        .max_age(max_age)
        .http_only(true)
        .secure(true)
        .same_site(SameSite::Lax);
    if let Some(domain) = domain {
        builder = builder.domain(domain);
    }
    builder.build()
}

/// Set the refresh-token cookie on the jar.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use docket_auth_types::cookie::{set_refresh_token_cookie, DOCKET_REFRESH_TOKEN};
///
/// let jar = CookieJar::new();
/// let jar = set_refresh_token_cookie(jar, "refresh_value".to_string(), Some("example.com".to_string()));
/// let cookie = jar.get(DOCKET_REFRESH_TOKEN).unwrap();
/// assert_eq!(cookie.value(), "refresh_value");
/// assert_eq!(cookie.path(), Some("/refresh"));
/// assert_eq!(cookie.domain(), Some("example.com"));
/// assert_eq!(cookie.max_age(), Some(time::Duration::seconds(1_209_600)));
/// assert!(cookie.http_only().unwrap_or(false));
/// assert!(cookie.secure().unwrap_or(false));
/// ```
pub fn set_refresh_token_cookie(jar: CookieJar, value: String, domain: Option<String>) -> CookieJar {
    jar.add(refresh_cookie(
        value,
        domain,
        Duration::seconds(REFRESH_TOKEN_EXP as i64),
    ))
}

/// Clear the refresh-token cookie by setting Max-Age to 0.
///
/// ```
/// use axum_extra::extract::cookie::CookieJar;
/// use docket_auth_types::cookie::{clear_refresh_token_cookie, set_refresh_token_cookie, DOCKET_REFRESH_TOKEN};
///
/// let jar = set_refresh_token_cookie(CookieJar::new(), "r".to_string(), None);
/// let jar = clear_refresh_token_cookie(jar, None);
/// let cookie = jar.get(DOCKET_REFRESH_TOKEN).unwrap();
/// assert_eq!(cookie.value(), "");
/// assert_eq!(cookie.max_age(), Some(time::Duration::ZERO));
/// ```
pub fn clear_refresh_token_cookie(jar: CookieJar, domain: Option<String>) -> CookieJar {
    jar.add(refresh_cookie(String::new(), domain, Duration::ZERO))
}

/// Read the refresh token from the jar, ignoring empty (cleared) values.
pub fn refresh_token_from_jar(jar: &CookieJar) -> Option<String> {
    jar.get(DOCKET_REFRESH_TOKEN)
        .map(|c| c.value().to_owned())
        .filter(|v| !v.is_empty())
}
