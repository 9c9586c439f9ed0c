//! End-to-end behaviour of the auth endpoints over in-memory adapters.
//!
//! Each scenario drives the real handlers, session middleware, and trace
//! middleware through `actix_web::test`, carrying the session cookie between
//! requests the way a browser would.

use std::sync::{Arc, Mutex};
use std::time::Duration;

use actix_session::config::{CookieContentSecurity, PersistentSession};
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use auth_backend::Trace;
use auth_backend::domain::{AuthService, AuthServiceConfig, TRACE_ID_HEADER};
use auth_backend::inbound::http::auth::{login, logout, me, register};
use auth_backend::inbound::http::json_error_handler;
use auth_backend::inbound::http::session_config::SESSION_COOKIE_NAME;
use auth_backend::inbound::http::state::HttpState;
use auth_backend::outbound::crypto::{Argon2CredentialHasher, Argon2Params};
use auth_backend::outbound::memory::{MemorySessionStore, MemoryUserDirectory};
use chrono::{DateTime, Local, TimeDelta, TimeZone, Utc};
use mockable::Clock;
use rstest::{fixture, rstest};
use serde_json::{Value, json};

const SESSION_TTL: Duration = Duration::from_secs(60);

struct SteppingClock(Mutex<DateTime<Utc>>);

impl SteppingClock {
    fn advance(&self, by: TimeDelta) {
        let mut now = self.0.lock().expect("clock lock");
        *now += by;
    }
}

impl Clock for SteppingClock {
    fn local(&self) -> DateTime<Local> {
        self.utc().with_timezone(&Local)
    }

    fn utc(&self) -> DateTime<Utc> {
        *self.0.lock().expect("clock lock")
    }
}

#[fixture]
fn clock() -> Arc<SteppingClock> {
    let start = Utc
        .with_ymd_and_hms(2024, 1, 1, 12, 0, 0)
        .single()
        .expect("valid timestamp");
    Arc::new(SteppingClock(Mutex::new(start)))
}

fn http_state(clock: Arc<SteppingClock>) -> HttpState {
    let hasher = Argon2CredentialHasher::with_params(Argon2Params {
        memory_kib: 1024,
        iterations: 1,
        parallelism: 1,
    })
    .expect("cheap argon2 params");
    HttpState::new(Arc::new(AuthService::new(
        Arc::new(MemoryUserDirectory::new()),
        Arc::new(hasher),
        Arc::new(MemorySessionStore::new(SESSION_TTL, clock)),
        AuthServiceConfig::default(),
    )))
}

async fn app(
    clock: Arc<SteppingClock>,
) -> impl Service<actix_http::Request, Response = ServiceResponse, Error = actix_web::Error> {
    let session = SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name(SESSION_COOKIE_NAME.to_owned())
        .cookie_secure(false)
        .cookie_http_only(true)
        .cookie_content_security(CookieContentSecurity::Private)
        .session_lifecycle(
            PersistentSession::default()
                .session_ttl(actix_web::cookie::time::Duration::seconds(60)),
        )
        .build();
    test::init_service(
        App::new()
            .app_data(web::Data::new(http_state(clock)))
            .app_data(web::JsonConfig::default().error_handler(json_error_handler))
            .wrap(Trace)
            .service(
                web::scope("/api/v1")
                    .wrap(session)
                    .service(register)
                    .service(login)
                    .service(me)
                    .service(logout),
            ),
    )
    .await
}

fn alice() -> Value {
    json!({"username": "alice", "password": "secret"})
}

fn post(uri: &str, body: &Value, cookie: Option<&Cookie<'static>>) -> actix_http::Request {
    let req = test::TestRequest::post().uri(uri).set_json(body);
    match cookie {
        Some(cookie) => req.cookie(cookie.clone()).to_request(),
        None => req.to_request(),
    }
}

fn get_me(cookie: Option<&Cookie<'static>>) -> actix_http::Request {
    let req = test::TestRequest::get().uri("/api/v1/me");
    match cookie {
        Some(cookie) => req.cookie(cookie.clone()).to_request(),
        None => req.to_request(),
    }
}

fn session_cookie(res: &ServiceResponse) -> Option<Cookie<'static>> {
    res.response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
}

#[rstest]
#[actix_web::test]
async fn register_login_me_logout(clock: Arc<SteppingClock>) {
    let app = app(clock).await;

    let res = test::call_service(&app, post("/api/v1/register", &alice(), None)).await;
    assert_eq!(res.status(), StatusCode::CREATED);
    assert!(session_cookie(&res).is_none(), "register must not log in");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"user": {"id": 1, "username": "alice"}}));

    let res = test::call_service(&app, post("/api/v1/login", &alice(), None)).await;
    assert_eq!(res.status(), StatusCode::OK);
    let cookie = session_cookie(&res).expect("login issues a cookie");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"user": {"id": 1, "username": "alice"}}));

    let res = test::call_service(&app, get_me(Some(&cookie))).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"id": 1, "username": "alice"}));

    let res = test::call_service(&app, post("/api/v1/logout", &json!({}), Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::NO_CONTENT);

    // The pre-logout cookie still decrypts, but its token is revoked.
    let res = test::call_service(&app, get_me(Some(&cookie))).await;
    assert_eq!(test::read_body(res).await, "null");
}

#[rstest]
#[actix_web::test]
async fn duplicate_registration_is_rejected(clock: Arc<SteppingClock>) {
    let app = app(clock).await;
    test::call_service(&app, post("/api/v1/register", &alice(), None)).await;

    let res = test::call_service(&app, post("/api/v1/register", &alice(), None)).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(
        body,
        json!({"errors": [{"field": "username", "message": "This username already exist"}]})
    );
}

#[rstest]
#[case(json!({"username": "bob", "password": "secret"}), "username", "Username doesn't exist")]
#[case(json!({"username": "alice", "password": "wrong"}), "password", "Incorrect password")]
#[actix_web::test]
async fn login_rejections_name_the_field(
    clock: Arc<SteppingClock>,
    #[case] credentials: Value,
    #[case] field: &str,
    #[case] message: &str,
) {
    let app = app(clock).await;
    test::call_service(&app, post("/api/v1/register", &alice(), None)).await;

    let res = test::call_service(&app, post("/api/v1/login", &credentials, None)).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    assert!(session_cookie(&res).is_none());
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body, json!({"errors": [{"field": field, "message": message}]}));
}

#[rstest]
#[actix_web::test]
async fn failed_login_keeps_the_existing_session(clock: Arc<SteppingClock>) {
    let app = app(clock).await;
    test::call_service(&app, post("/api/v1/register", &alice(), None)).await;
    let res = test::call_service(&app, post("/api/v1/login", &alice(), None)).await;
    let cookie = session_cookie(&res).expect("login issues a cookie");

    let wrong = json!({"username": "alice", "password": "wrong"});
    let res = test::call_service(&app, post("/api/v1/login", &wrong, Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);

    let res = test::call_service(&app, get_me(Some(&cookie))).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["username"], "alice");
}

#[rstest]
#[actix_web::test]
async fn expired_session_reads_as_null(clock: Arc<SteppingClock>) {
    let app = app(clock.clone()).await;
    test::call_service(&app, post("/api/v1/register", &alice(), None)).await;
    let res = test::call_service(&app, post("/api/v1/login", &alice(), None)).await;
    let cookie = session_cookie(&res).expect("login issues a cookie");

    clock.advance(TimeDelta::seconds(61));

    let res = test::call_service(&app, get_me(Some(&cookie))).await;
    assert_eq!(res.status(), StatusCode::OK);
    assert_eq!(test::read_body(res).await, "null");
}

#[rstest]
#[case(json!({"username": "al", "password": "secret"}), "username")]
#[case(json!({"username": "alice", "password": "abc"}), "password")]
#[actix_web::test]
async fn short_credentials_are_never_stored(
    clock: Arc<SteppingClock>,
    #[case] credentials: Value,
    #[case] field: &str,
) {
    let app = app(clock).await;
    let res = test::call_service(&app, post("/api/v1/register", &credentials, None)).await;
    assert_eq!(res.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"][0]["field"], field);

    let res = test::call_service(&app, post("/api/v1/login", &credentials, None)).await;
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["errors"][0]["message"], "Username doesn't exist");
}

#[rstest]
#[actix_web::test]
async fn malformed_body_returns_trace_correlated_error(clock: Arc<SteppingClock>) {
    let app = app(clock).await;
    let res = test::call_service(
        &app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({"username": "alice"}))
            .to_request(),
    )
    .await;

    assert_eq!(res.status(), StatusCode::BAD_REQUEST);
    let header = res
        .headers()
        .get(TRACE_ID_HEADER)
        .and_then(|value| value.to_str().ok())
        .map(str::to_owned)
        .expect("trace id header");
    let body: Value = test::read_body_json(res).await;
    assert_eq!(body["code"], "invalid_request");
    assert_eq!(body["traceId"], header.as_str());
}
