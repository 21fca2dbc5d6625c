//! The browser-held refresh credential cookie.

use actix_web::cookie::time::Duration as CookieDuration;
use actix_web::cookie::{Cookie, SameSite};
use actix_web::HttpRequest;

use crate::state::cookie_config::CookieConfig;

pub const REFRESH_COOKIE_NAME: &str = "refreshToken";

/// Builds and destroys the `refreshToken` cookie.
///
/// `issue` and `clear` go through one builder so the two can never disagree
/// on any attribute other than value and max-age; a clear that differs in
/// path or same-site would leave the original cookie behind.
#[derive(Debug, Clone)]
pub struct SessionCookieManager {
    secure: bool,
    same_site: SameSite,
    max_age: CookieDuration,
}

impl SessionCookieManager {
    pub fn new(config: CookieConfig, refresh_ttl: time::Duration) -> Self {
        Self {
            secure: config.secure,
            same_site: config.same_site,
            max_age: CookieDuration::seconds(refresh_ttl.whole_seconds()),
        }
    }

    pub fn issue(&self, refresh_token: &str) -> Cookie<'static> {
        self.build(refresh_token.to_string(), self.max_age)
    }

    pub fn clear(&self) -> Cookie<'static> {
        self.build(String::new(), CookieDuration::ZERO)
    }

    /// The refresh cookie value; `None` when absent or empty.
    pub fn read(req: &HttpRequest) -> Option<String> {
        req.cookie(REFRESH_COOKIE_NAME)
            .map(|c| c.value().to_string())
            .filter(|v| !v.is_empty())
    }

    fn build(&self, value: String, max_age: CookieDuration) -> Cookie<'static> {
        Cookie::build(REFRESH_COOKIE_NAME, value)
            .http_only(true)
            .path("/")
            .secure(self.secure)
            .same_site(self.same_site)
            .max_age(max_age)
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use actix_web::test::TestRequest;

    use super::*;
    use crate::config::env::AppEnv;

    fn manager(env: AppEnv) -> SessionCookieManager {
        SessionCookieManager::new(CookieConfig::for_env(env), time::Duration::days(7))
    }

    #[test]
    fn issue_sets_hardened_attributes() {
        let cookie = manager(AppEnv::Local).issue("tok");

        assert_eq!(cookie.name(), "refreshToken");
        assert_eq!(cookie.value(), "tok");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.path(), Some("/"));
        assert_eq!(cookie.secure(), Some(false));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.max_age(), Some(CookieDuration::seconds(604_800)));
    }

    #[test]
    fn clear_matches_issue_except_value_and_max_age() {
        for env in [AppEnv::Local, AppEnv::Prod] {
            let m = manager(env);
            let issued = m.issue("tok");
            let cleared = m.clear();

            assert_eq!(cleared.name(), issued.name());
            assert_eq!(cleared.http_only(), issued.http_only());
            assert_eq!(cleared.path(), issued.path());
            assert_eq!(cleared.secure(), issued.secure());
            assert_eq!(cleared.same_site(), issued.same_site());
            assert_eq!(cleared.domain(), issued.domain());
            assert_eq!(cleared.value(), "");
            assert_eq!(cleared.max_age(), Some(CookieDuration::ZERO));
        }
    }

    #[test]
    fn prod_profile_is_secure_none() {
        let cookie = manager(AppEnv::Prod).issue("tok");
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::None));
    }

    #[test]
    fn read_ignores_missing_and_empty() {
        let req = TestRequest::default().to_http_request();
        assert_eq!(SessionCookieManager::read(&req), None);

        let req = TestRequest::default()
            .cookie(Cookie::new(REFRESH_COOKIE_NAME, ""))
            .to_http_request();
        assert_eq!(SessionCookieManager::read(&req), None);

        let req = TestRequest::default()
            .cookie(Cookie::new(REFRESH_COOKIE_NAME, "abc"))
            .to_http_request();
        assert_eq!(SessionCookieManager::read(&req).as_deref(), Some("abc"));
    }
}
