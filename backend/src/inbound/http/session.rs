//! Actix session adapter for the `SessionCookie` port.
//!
//! The opaque session token lives inside the encrypted `session` cookie under
//! a single key. Handlers extract [`CookieSession`] and hand it to the auth
//! service; nothing else touches `actix_session` directly.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::SessionToken;
use crate::domain::ports::{SessionCookie, SessionCookieError};

pub(crate) const SESSION_TOKEN_KEY: &str = "session_token";

/// Request-scoped wrapper around the Actix session.
#[derive(Clone)]
pub struct CookieSession(Session);

impl CookieSession {
    /// Wrap the underlying Actix session.
    pub fn new(session: Session) -> Self {
        Self(session)
    }
}

impl SessionCookie for CookieSession {
    fn token(&self) -> Result<Option<SessionToken>, SessionCookieError> {
        let raw = self
            .0
            .get::<String>(SESSION_TOKEN_KEY)
            .map_err(|error| SessionCookieError::read(error.to_string()))?;
        let Some(raw) = raw else {
            return Ok(None);
        };
        match SessionToken::parse(&raw) {
            Ok(token) => Ok(Some(token)),
            Err(error) => {
                warn!(%error, "ignoring malformed session token in cookie");
                Ok(None)
            }
        }
    }

    fn set_token(&self, token: &SessionToken) -> Result<(), SessionCookieError> {
        self.0
            .insert(SESSION_TOKEN_KEY, token.as_str())
            .map_err(|error| SessionCookieError::write(error.to_string()))?;
        self.0.renew();
        Ok(())
    }

    fn clear(&self) {
        self.0.purge();
    }
}

impl FromRequest for CookieSession {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(CookieSession::new) })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::Error;
    use crate::inbound::http::session_config::SESSION_COOKIE_NAME;
    use crate::inbound::http::test_utils::test_session_middleware;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    async fn read_token(session: CookieSession) -> Result<HttpResponse, Error> {
        let token = session
            .token()
            .map_err(|err| Error::internal(err.to_string()))?;
        Ok(match token {
            Some(token) => HttpResponse::Ok().body(token.as_str().to_owned()),
            None => HttpResponse::NoContent().finish(),
        })
    }

    #[rstest]
    #[actix_web::test]
    async fn token_round_trips_through_the_cookie() {
        let token = SessionToken::generate();
        let expected = token.as_str().to_owned();
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(move |session: CookieSession| {
                        let token = token.clone();
                        async move {
                            session
                                .set_token(&token)
                                .map_err(|err| Error::internal(err.to_string()))?;
                            Ok::<_, Error>(HttpResponse::Ok().finish())
                        }
                    }),
                )
                .route("/get", web::get().to(read_token)),
        )
        .await;

        let set = test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = set
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("session cookie set")
            .into_owned();
        assert!(!cookie.value().contains(&expected));

        let get = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get.status(), StatusCode::OK);
        assert_eq!(test::read_body(get).await, expected.as_bytes());
    }

    #[rstest]
    #[actix_web::test]
    async fn malformed_token_reads_as_absent() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/tamper",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(SESSION_TOKEN_KEY, "not-a-token")
                            .expect("insert raw value");
                        HttpResponse::Ok().finish()
                    }),
                )
                .route("/get", web::get().to(read_token)),
        )
        .await;

        let tamper =
            test::call_service(&app, test::TestRequest::get().uri("/tamper").to_request()).await;
        let cookie = tamper
            .response()
            .cookies()
            .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
            .expect("session cookie set")
            .into_owned();

        let get = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get.status(), StatusCode::NO_CONTENT);
    }

    #[rstest]
    #[actix_web::test]
    async fn missing_cookie_reads_as_absent() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route("/get", web::get().to(read_token)),
        )
        .await;

        let get = test::call_service(&app, test::TestRequest::get().uri("/get").to_request()).await;
        assert_eq!(get.status(), StatusCode::NO_CONTENT);
    }
}
