//! Server bootstrap helpers: settings, session key loading, and middleware.

pub mod config;

use std::path::Path;

use actix_session::SessionMiddleware;
use actix_session::storage::CookieSessionStore;
use actix_web::cookie::{Key, SameSite};
use tracing::warn;

pub use self::config::AppSettings;

/// Load the session cookie key from `path`.
///
/// In debug builds (or when `SESSION_ALLOW_EPHEMERAL=1`) a missing key file
/// degrades to a freshly generated key so local development works without a
/// secret mount. Release builds fail hard.
pub fn load_session_key(path: &Path) -> std::io::Result<Key> {
    match std::fs::read(path) {
        Ok(bytes) => Ok(Key::derive_from(&bytes)),
        Err(error) => {
            let allow_ephemeral =
                std::env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
            if cfg!(debug_assertions) || allow_ephemeral {
                warn!(path = %path.display(), error = %error, "using temporary session key (dev only)");
                Ok(Key::generate())
            } else {
                Err(std::io::Error::other(format!(
                    "failed to read session key at {}: {error}",
                    path.display()
                )))
            }
        }
    }
}

/// Cookie-backed session middleware shared by every route.
pub fn session_middleware(key: Key, cookie_secure: bool) -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), key)
        .cookie_name("session".into())
        .cookie_path("/".into())
        .cookie_secure(cookie_secure)
        .cookie_http_only(true)
        .cookie_same_site(SameSite::Lax)
        .build()
}
