//! Shared harness running the full HTTP surface over an in-memory world.

use actix_http::Request;
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::http::StatusCode;
use actix_web::{App, test, web};
use pitchmatch::Trace;
use pitchmatch::inbound::http::configure_api;
use pitchmatch::inbound::http::session_config::{SESSION_COOKIE_NAME, SessionSettings};
use pitchmatch::inbound::ws;
use pitchmatch::test_support::world::{MemoryWorld, PASSWORD};
use serde_json::{Value, json};

/// Initialise the API, the WebSocket entry and the session layer.
pub async fn init_app(
    world: &MemoryWorld,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    let session = SessionSettings {
        key: Key::generate(),
        cookie_secure: false,
    };
    test::init_service(
        App::new()
            .app_data(world.data())
            .app_data(web::Data::new(world.ws_state()))
            .wrap(session.middleware())
            .wrap(Trace)
            .service(web::scope("/api/v1").configure(configure_api))
            .service(ws::ws_entry),
    )
    .await
}

/// Sign in through `POST /api/v1/login` and return the session cookie.
pub async fn login<S>(app: &S, email: &str) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri("/api/v1/login")
            .set_json(json!({ "email": email, "password": PASSWORD }))
            .to_request(),
    )
    .await;
    assert_eq!(response.status(), StatusCode::OK, "login for {email}");
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == SESSION_COOKIE_NAME)
        .map(Cookie::into_owned)
        .expect("session cookie")
}

/// Issue a request with the session cookie and return status and JSON body.
pub async fn call_json<S>(
    app: &S,
    cookie: &Cookie<'static>,
    request: test::TestRequest,
) -> (StatusCode, Value)
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(app, request.cookie(cookie.clone()).to_request()).await;
    let status = response.status();
    let body = test::read_body(response).await;
    let json = if body.is_empty() {
        Value::Null
    } else {
        serde_json::from_slice(&body).expect("JSON body")
    };
    (status, json)
}

/// Minimal valid startup payload.
pub fn startup_payload(name: &str, sector: &str) -> Value {
    json!({
        "name": name,
        "sector": sector,
        "category": "Seed",
        "country": "France",
        "oneLinePitch": format!("{name} in one line"),
    })
}
