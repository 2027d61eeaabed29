//! Session helpers to keep HTTP handlers free of framework-specific logic.
//!
//! The cookie only carries the identity id. Roles are resolved per request
//! through [`AccountQuery`](crate::domain::ports::AccountQuery), so a deleted
//! profile loses access on its next call.

use actix_session::Session;
use actix_web::{FromRequest, HttpRequest, dev::Payload};
use futures_util::future::LocalBoxFuture;
use tracing::warn;

use crate::domain::{Error, Profile, ProfileId, Role};
use crate::inbound::http::state::HttpState;

pub(crate) const IDENTITY_ID_KEY: &str = "identity_id";

/// Newtype wrapper that exposes higher-level session operations.
#[derive(Clone)]
pub struct SessionContext(Session);

impl SessionContext {
    pub fn new(session: Session) -> Self {
        Self(session)
    }

    /// Persist the authenticated identity, rotating the session id.
    pub fn persist_identity(&self, id: &ProfileId) -> Result<(), Error> {
        self.0.renew();
        self.0
            .insert(IDENTITY_ID_KEY, id.to_string())
            .map_err(|error| Error::internal(format!("failed to persist session: {error}")))
    }

    /// The identity stored in the cookie, if any. A tampered value reads as none.
    pub fn identity_id(&self) -> Result<Option<ProfileId>, Error> {
        let raw = self
            .0
            .get::<String>(IDENTITY_ID_KEY)
            .map_err(|error| Error::internal(format!("failed to read session: {error}")))?;
        Ok(raw.and_then(|raw| match ProfileId::new(&raw) {
            Ok(id) => Some(id),
            Err(error) => {
                warn!(%error, "invalid identity id in session cookie");
                None
            }
        }))
    }

    /// Require a signed-in identity or return `401 Unauthorized`.
    pub fn require_identity(&self) -> Result<ProfileId, Error> {
        self.identity_id()?
            .ok_or_else(|| Error::unauthorized("login required"))
    }

    /// Drop the session and expire its cookie.
    pub fn clear(&self) {
        self.0.purge();
    }

    /// Require a signed-in identity with a profile.
    pub async fn require_profile(&self, state: &HttpState) -> Result<Profile, Error> {
        let id = self.require_identity()?;
        state.account.profile(&id).await
    }

    /// Require a profile holding `role`, else `403 Forbidden`.
    pub async fn require_role(&self, state: &HttpState, role: Role) -> Result<Profile, Error> {
        let profile = self.require_profile(state).await?;
        if profile.role == role {
            Ok(profile)
        } else {
            Err(Error::forbidden(format!("{role} role required")))
        }
    }

    /// Signed-in admin profile or `forbidden`.
    pub async fn require_admin(&self, state: &HttpState) -> Result<Profile, Error> {
        self.require_role(state, Role::Admin).await
    }

    /// Signed-in investor profile or `forbidden`.
    pub async fn require_investor(&self, state: &HttpState) -> Result<Profile, Error> {
        self.require_role(state, Role::Investor).await
    }
}

impl FromRequest for SessionContext {
    type Error = actix_web::Error;
    type Future = LocalBoxFuture<'static, Result<Self, Self::Error>>;

    fn from_request(req: &HttpRequest, payload: &mut Payload) -> Self::Future {
        let fut = Session::from_request(req, payload);
        Box::pin(async move { fut.await.map(SessionContext::new) })
    }
}

#[cfg(test)]
mod tests {
    use actix_session::Session;
    use actix_web::http::StatusCode;
    use actix_web::{App, HttpResponse, test, web};
    use rstest::rstest;

    use super::*;
    use crate::inbound::http::test_utils::{fixture_state, session_cookie, test_session_middleware};

    const IDENTITY: &str = "3fa85f64-5717-4562-b3fc-2c963f66afa6";

    #[rstest]
    #[actix_web::test]
    async fn round_trips_identity_and_clears() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set",
                    web::get().to(|session: SessionContext| async move {
                        let id = ProfileId::new(IDENTITY).expect("fixture id");
                        session.persist_identity(&id)?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                )
                .route(
                    "/get",
                    web::get().to(|session: SessionContext| async move {
                        let id = session.require_identity()?;
                        Ok::<_, Error>(HttpResponse::Ok().body(id.to_string()))
                    }),
                ),
        )
        .await;

        let set_res =
            test::call_service(&app, test::TestRequest::get().uri("/set").to_request()).await;
        let cookie = session_cookie(&set_res);

        let get_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/get").cookie(cookie).to_request(),
        )
        .await;
        assert_eq!(get_res.status(), StatusCode::OK);
        assert_eq!(test::read_body(get_res).await, IDENTITY);
    }

    #[rstest]
    #[actix_web::test]
    async fn tampered_identity_is_unauthorised() {
        let app = test::init_service(
            App::new()
                .wrap(test_session_middleware())
                .route(
                    "/set-invalid",
                    web::get().to(|session: Session| async move {
                        session
                            .insert(IDENTITY_ID_KEY, "not-a-uuid")
                            .expect("set invalid id");
                        HttpResponse::Ok()
                    }),
                )
                .route(
                    "/require",
                    web::get().to(|session: SessionContext| async move {
                        session.require_identity()?;
                        Ok::<_, Error>(HttpResponse::Ok())
                    }),
                ),
        )
        .await;

        let set_res = test::call_service(
            &app,
            test::TestRequest::get().uri("/set-invalid").to_request(),
        )
        .await;
        let cookie = session_cookie(&set_res);
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/require")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::UNAUTHORIZED);
    }

    #[rstest]
    #[actix_web::test]
    async fn role_guard_rejects_the_wrong_role() {
        let fixture = fixture_state().await;
        let investor = fixture.investor.clone();
        let app = test::init_service(
            App::new()
                .app_data(fixture.data())
                .wrap(test_session_middleware())
                .route(
                    "/as-investor",
                    web::get().to(move |session: SessionContext| {
                        let id = investor.id;
                        async move {
                            session.persist_identity(&id)?;
                            Ok::<_, Error>(HttpResponse::Ok())
                        }
                    }),
                )
                .route(
                    "/admin-only",
                    web::get().to(
                        |state: web::Data<HttpState>, session: SessionContext| async move {
                            session.require_admin(&state).await?;
                            Ok::<_, Error>(HttpResponse::Ok())
                        },
                    ),
                ),
        )
        .await;

        let res = test::call_service(
            &app,
            test::TestRequest::get().uri("/as-investor").to_request(),
        )
        .await;
        let cookie = session_cookie(&res);
        let res = test::call_service(
            &app,
            test::TestRequest::get()
                .uri("/admin-only")
                .cookie(cookie)
                .to_request(),
        )
        .await;
        assert_eq!(res.status(), StatusCode::FORBIDDEN);
    }
}
