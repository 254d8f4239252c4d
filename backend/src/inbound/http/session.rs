//! Cookie session extraction for authenticated handlers.
//!
//! [`SessionContext`] reads the `session_token` cookie, resolves it through
//! the [`LoginService`](crate::domain::ports::LoginService) port and hands
//! the handler the signed-in user. Handlers then gate actions with
//! [`SessionContext::require`].

use actix_web::cookie::{Cookie, time::OffsetDateTime};
use actix_web::{FromRequest, HttpRequest, dev::Payload, web};
use chrono::{DateTime, Utc};
use futures_util::future::LocalBoxFuture;
use tracing::debug;

use crate::domain::{Capability, Error, SESSION_COOKIE_NAME, SessionToken, User, require};

use super::session_config::CookieSettings;
use super::state::HttpState;

/// The authenticated user behind the current request.
#[derive(Debug, Clone)]
pub struct SessionContext {
    user: User,
}

impl SessionContext {
    pub fn new(user: User) -> Self {
        Self { user }
    }

    pub fn user(&self) -> &User {
        &self.user
    }

    /// Return the user when their role grants `capability`, else `403`.
    pub fn require(&self, capability: Capability) -> Result<&User, Error> {
        require(&self.user, capability)?;
        Ok(&self.user)
    }
}

impl FromRequest for SessionContext {
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, _payload: &mut Payload) -> Self::Future {
        let state = req.app_data::<web::Data<HttpState>>().cloned();
        let token = req
            .cookie(SESSION_COOKIE_NAME)
            .map(|cookie| SessionToken::from_cookie(cookie.value()));
        Box::pin(async move {
            let state = state.ok_or_else(|| Error::internal("HTTP state not configured"))?;
            let Some(token) = token else {
                debug!("request without session cookie");
                return Err(Error::unauthorized("not authenticated"));
            };
            let user = state.login.authenticate_session(&token).await?;
            Ok(SessionContext::new(user))
        })
    }
}

/// Build the `session_token` cookie issued at login.
pub fn session_cookie(
    token: &SessionToken,
    expires_at: DateTime<Utc>,
    settings: CookieSettings,
) -> Cookie<'static> {
    let mut cookie = Cookie::build(SESSION_COOKIE_NAME, token.as_str().to_owned())
        .path("/")
        .http_only(true)
        .secure(settings.secure)
        .same_site(settings.same_site)
        .finish();
    if let Ok(expires) = OffsetDateTime::from_unix_timestamp(expires_at.timestamp()) {
        cookie.set_expires(expires);
    }
    cookie
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::inbound::http::test_utils::{TestHarness, harness};
    use actix_web::cookie::SameSite;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test as actix_test};
    use chrono::TimeZone;
    use rstest::rstest;

    #[rstest]
    fn cookie_carries_session_attributes() {
        let token = SessionToken::from_cookie("abc123");
        let expires = Utc
            .with_ymd_and_hms(2025, 1, 8, 0, 0, 0)
            .single()
            .expect("timestamp");
        let cookie = session_cookie(
            &token,
            expires,
            CookieSettings {
                secure: true,
                same_site: SameSite::Lax,
            },
        );
        assert_eq!(cookie.name(), "session_token");
        assert_eq!(cookie.value(), "abc123");
        assert_eq!(cookie.http_only(), Some(true));
        assert_eq!(cookie.secure(), Some(true));
        assert_eq!(cookie.same_site(), Some(SameSite::Lax));
        assert_eq!(cookie.path(), Some("/"));
        let expires_at = cookie
            .expires_datetime()
            .expect("expiry")
            .unix_timestamp();
        assert_eq!(expires_at, expires.timestamp());
    }

    async fn whoami(session: SessionContext) -> HttpResponse {
        HttpResponse::Ok().body(session.user().username().to_string())
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_cookie_is_unauthorised(harness: TestHarness) {
        let app = actix_test::init_service(
            App::new()
                .app_data(harness.data())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let res = actix_test::call_service(&app, actix_test::TestRequest::get().uri("/whoami").to_request()).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn forged_cookie_is_unauthorised(harness: TestHarness) {
        let app = actix_test::init_service(
            App::new()
                .app_data(harness.data())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/whoami")
            .cookie(Cookie::new(SESSION_COOKIE_NAME, "deadbeef"))
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn valid_cookie_resolves_user(harness: TestHarness) {
        let cookie = harness.login_as("priya", crate::domain::Role::Viewer).await;
        let app = actix_test::init_service(
            App::new()
                .app_data(harness.data())
                .route("/whoami", web::get().to(whoami)),
        )
        .await;
        let req = actix_test::TestRequest::get()
            .uri("/whoami")
            .cookie(cookie)
            .to_request();
        let res = actix_test::call_service(&app, req).await;
        assert_eq!(res.status(), StatusCode::OK);
        assert_eq!(actix_test::read_body(res).await, "priya");
    }
}
