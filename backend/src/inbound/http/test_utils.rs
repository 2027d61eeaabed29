//! Test helpers for inbound HTTP components.

use actix_http::Request;
use actix_session::{SessionMiddleware, storage::CookieSessionStore};
use actix_web::body::BoxBody;
use actix_web::cookie::{Cookie, Key};
use actix_web::dev::{Service, ServiceResponse};
use actix_web::{App, HttpResponse, test, web};

use crate::domain::{Error, Profile, ProfileId};
use crate::inbound::http::configure_api;
use crate::inbound::http::session::SessionContext;
use crate::test_support::world::MemoryWorld;

/// Build a session middleware configured for tests.
///
/// - Generates a fresh signing/encryption key per invocation.
/// - Sets the cookie name to `session` and disables the `Secure` flag for
///   local HTTP tests.
pub fn test_session_middleware() -> SessionMiddleware<CookieSessionStore> {
    SessionMiddleware::builder(CookieSessionStore::default(), Key::generate())
        .cookie_name("session".to_owned())
        .cookie_secure(false)
        .build()
}

/// In-memory world seeded with an admin and an investor.
pub async fn fixture_state() -> MemoryWorld {
    MemoryWorld::new().await
}

/// Extract the session cookie set by a response.
///
/// # Panics
///
/// Panics when the response did not set one.
pub fn session_cookie<B>(response: &ServiceResponse<B>) -> Cookie<'static> {
    response
        .response()
        .cookies()
        .find(|cookie| cookie.name() == "session")
        .map(Cookie::into_owned)
        .expect("session cookie set")
}

/// Route handler signing the path's profile id in without a password.
pub async fn sign_in_route(
    session: SessionContext,
    path: web::Path<String>,
) -> Result<HttpResponse, Error> {
    let id = ProfileId::new(path.into_inner())
        .map_err(|err| Error::invalid_request(err.to_string()))?;
    session.persist_identity(&id)?;
    Ok(HttpResponse::NoContent().finish())
}

/// The API under `/api/v1` plus a `/test/sign-in/{id}` shortcut that skips
/// password hashing.
pub async fn init_app(
    world: &MemoryWorld,
) -> impl Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error> {
    test::init_service(
        App::new()
            .app_data(world.data())
            .wrap(test_session_middleware())
            .route("/test/sign-in/{id}", web::post().to(sign_in_route))
            .service(web::scope("/api/v1").configure(configure_api)),
    )
    .await
}

/// Sign `profile` in and return its session cookie.
pub async fn sign_in<S>(app: &S, profile: &Profile) -> Cookie<'static>
where
    S: Service<Request, Response = ServiceResponse<BoxBody>, Error = actix_web::Error>,
{
    let response = test::call_service(
        app,
        test::TestRequest::post()
            .uri(&format!("/test/sign-in/{}", profile.id))
            .to_request(),
    )
    .await;
    session_cookie(&response)
}

/// Decode a JSON response body.
pub async fn read_json(response: ServiceResponse) -> serde_json::Value {
    let body = test::read_body(response).await;
    serde_json::from_slice(&body).expect("json body")
}
