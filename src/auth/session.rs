// Session cookie carrier
// Moves the signed token between client and server in the `token` cookie

use axum_extra::extract::cookie::{Cookie, CookieJar, SameSite};

use crate::auth::token::IssuedToken;

/// Cookie name for the session token
pub const SESSION_COOKIE_NAME: &str = "token";

/// Builds, reads and clears the session cookie
///
/// Setting and clearing both start from `base_cookie`, so the attributes
/// browsers match on (path, HttpOnly, Secure, SameSite) are always identical.
#[derive(Debug, Clone, Copy)]
pub struct SessionCookies {
    secure: bool,
}

impl SessionCookies {
    /// `secure` should be true in production, where the cookie must only
    /// travel over HTTPS
    pub fn new(secure: bool) -> Self {
        Self { secure }
    }

    fn base_cookie(&self, value: String) -> Cookie<'static> {
        Cookie::build((SESSION_COOKIE_NAME, value))
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(SameSite::Lax)
            .build()
    }

    /// Cookie carrying `issued`, living exactly as long as the token
    pub fn session_cookie(&self, issued: &IssuedToken) -> Cookie<'static> {
        let mut cookie = self.base_cookie(issued.token.clone());
        cookie.set_max_age(time::Duration::seconds(issued.lifetime_secs));
        cookie
    }

    /// Cookie instructing the browser to drop the session
    pub fn removal_cookie(&self) -> Cookie<'static> {
        let mut cookie = self.base_cookie(String::new());
        cookie.make_removal();
        cookie
    }

    pub fn attach(&self, jar: CookieJar, issued: &IssuedToken) -> CookieJar {
        jar.add(self.session_cookie(issued))
    }

    /// Always emits a removal cookie, whether or not the request carried one
    pub fn clear(&self, jar: CookieJar) -> CookieJar {
        jar.add(self.removal_cookie())
    }

    /// Token from the request, if present and non-empty
    pub fn extract(&self, jar: &CookieJar) -> Option<String> {
        jar.get(SESSION_COOKIE_NAME)
            .map(|cookie| cookie.value().to_string())
            .filter(|value| !value.is_empty())
    }
}
