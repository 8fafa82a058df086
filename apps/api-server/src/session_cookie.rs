//! The signed cookie that carries a session id.

use actix_web::HttpRequest;
use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, CookieJar, Key, SameSite};

use scribe_core::domain::SessionId;

use crate::config::SessionConfig;

#[derive(Clone)]
pub struct SessionCookie {
    name: String,
    key: Key,
    secure: bool,
    same_site: SameSite,
    max_age: CookieDuration,
}

impl SessionCookie {
    /// The secret must be at least 32 bytes; `AppConfig` enforces this.
    pub fn new(config: &SessionConfig) -> Self {
        let key = match &config.secret {
            Some(secret) => Key::derive_from(secret.as_bytes()),
            None => {
                tracing::warn!(
                    "SESSION_SECRET not set. Using a random key; sessions end on restart."
                );
                Key::generate()
            }
        };

        Self {
            name: config.cookie_name.clone(),
            key,
            secure: config.cookie_secure,
            same_site: config.same_site,
            max_age: CookieDuration::seconds(config.ttl_secs),
        }
    }

    /// The session id from the request, if the cookie is present and its signature holds.
    pub fn read(&self, req: &HttpRequest) -> Option<SessionId> {
        let cookie = req.cookie(&self.name)?;

        let mut jar = CookieJar::new();
        jar.add_original(cookie);
        let verified = jar.signed(&self.key).get(&self.name)?;

        Some(SessionId::from(verified.value().to_string()))
    }

    /// A signed cookie carrying `id`, expiring with the session TTL.
    pub fn issue(&self, id: &SessionId) -> Cookie<'static> {
        let mut jar = CookieJar::new();
        jar.signed_mut(&self.key)
            .add(Cookie::new(self.name.clone(), id.as_str().to_owned()));
        let signed = jar
            .get(&self.name)
            .map(|c| c.value().to_owned())
            .unwrap_or_default();

        Cookie::build(self.name.clone(), signed)
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(self.max_age)
            .finish()
    }

    /// A removal cookie for logout.
    pub fn clear(&self) -> Cookie<'static> {
        let mut cookie = Cookie::build(self.name.clone(), "")
            .path("/")
            .http_only(true)
            .secure(self.secure)
            .same_site(self.same_site)
            .finish();
        cookie.make_removal();
        cookie
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::test::TestRequest;

    fn cookie_config() -> SessionCookie {
        SessionCookie::new(&SessionConfig {
            secret: Some("an-example-secret-that-is-long-enough-to-use".to_string()),
            ..SessionConfig::default()
        })
    }

    #[test]
    fn test_issued_cookie_reads_back() {
        let cookies = cookie_config();
        let id = SessionId::generate();

        let cookie = cookies.issue(&id);
        assert!(cookie.http_only().unwrap_or(false));
        assert_ne!(cookie.value(), id.as_str());

        let req = TestRequest::default().cookie(cookie).to_http_request();
        assert_eq!(cookies.read(&req), Some(id));
    }

    #[test]
    fn test_tampered_cookie_is_ignored() {
        let cookies = cookie_config();
        let forged = Cookie::new("scribe.sid", SessionId::generate().as_str().to_owned());

        let req = TestRequest::default().cookie(forged).to_http_request();
        assert_eq!(cookies.read(&req), None);
    }

    #[test]
    fn test_clear_expires_cookie() {
        let cookie = cookie_config().clear();
        assert_eq!(cookie.value(), "");
        assert_eq!(cookie.max_age(), Some(CookieDuration::ZERO));
    }
}
