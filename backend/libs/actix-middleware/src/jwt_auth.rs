use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    error::InternalError,
    web, Error, HttpMessage, HttpResponse,
};
use crypto_core::jwt::JwtKeys;
use futures::future::{ready, LocalBoxFuture, Ready};
use std::fmt;
use std::rc::Rc;
use uuid::Uuid;

/// Message sent when the token is well-formed but no longer valid
pub const TOKEN_EXPIRED_MESSAGE: &str = "The token is not valid or expired!";

const CHECK_FAILED_PREFIX: &str = "There was an error with checking the token";

/// User ID extracted from the token subject claim
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UserId(pub Uuid);

/// Why a request was turned away by the token check
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenRejection {
    pub message: String,
}

impl TokenRejection {
    fn check_failed(reason: impl fmt::Display) -> Self {
        Self {
            message: format!("{}: {}", CHECK_FAILED_PREFIX, reason),
        }
    }
}

impl fmt::Display for TokenRejection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

/// Turns a rejection into the service's own error response.
///
/// Register it as app data next to `web::Data<JwtKeys>`; both the guard and
/// the `UserId` extractor use it.
#[derive(Clone, Copy)]
pub struct RejectionRenderer(pub fn(TokenRejection) -> HttpResponse);

fn render(renderer: Option<&RejectionRenderer>, rejection: TokenRejection) -> HttpResponse {
    match renderer {
        Some(renderer) => (renderer.0)(rejection),
        None => {
            tracing::error!(%rejection, "no RejectionRenderer registered");
            HttpResponse::InternalServerError().finish()
        }
    }
}

/// Bearer token guard.
///
/// Rejected requests never reach the wrapped service. The response comes
/// from the `RejectionRenderer` in app data, so the service decides its
/// shape and status. Keys are read from `web::Data<JwtKeys>` app data.
pub struct TokenGuard;

impl<S, B> Transform<S, ServiceRequest> for TokenGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Transform = TokenGuardService<S>;
    type InitError = ();
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(TokenGuardService {
            service: Rc::new(service),
        }))
    }
}

pub struct TokenGuardService<S> {
    service: Rc<S>,
}

impl<S, B> Service<ServiceRequest> for TokenGuardService<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error> + 'static,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let service = self.service.clone();

        Box::pin(async move {
            let user_id = match authenticate(&req) {
                Ok(user_id) => user_id,
                Err(rejection) => {
                    tracing::warn!(path = %req.path(), "token rejected: {}", rejection);
                    let response = render(req.app_data::<RejectionRenderer>(), rejection);
                    return Ok(req.into_response(response).map_into_right_body());
                }
            };

            req.extensions_mut().insert(UserId(user_id));

            service.call(req).await.map(ServiceResponse::map_into_left_body)
        })
    }
}

fn authenticate(req: &ServiceRequest) -> Result<Uuid, TokenRejection> {
    let keys = req
        .app_data::<web::Data<JwtKeys>>()
        .ok_or_else(|| TokenRejection::check_failed("verifier not configured"))?;

    let auth_header = req
        .headers()
        .get("Authorization")
        .and_then(|h| h.to_str().ok())
        .ok_or_else(|| TokenRejection::check_failed("missing Authorization header"))?;

    let token = auth_header
        .strip_prefix("Bearer ")
        .ok_or_else(|| TokenRejection::check_failed("invalid Authorization scheme"))?;

    keys.user_id_from_token(token.trim()).map_err(|e| {
        if e.is_expired() {
            TokenRejection {
                message: TOKEN_EXPIRED_MESSAGE.to_string(),
            }
        } else {
            TokenRejection::check_failed(e)
        }
    })
}

/// FromRequest implementation for UserId
///
/// Outside a `TokenGuard` there is no subject; the request is rejected the
/// same way the guard would reject it.
impl actix_web::FromRequest for UserId {
    type Error = actix_web::Error;
    type Future = Ready<Result<Self, Self::Error>>;

    fn from_request(
        req: &actix_web::HttpRequest,
        _payload: &mut actix_web::dev::Payload,
    ) -> Self::Future {
        if let Some(user_id) = req.extensions().get::<UserId>() {
            return ready(Ok(*user_id));
        }

        let rejection = TokenRejection::check_failed("request was not authenticated");
        let cause = rejection.message.clone();
        let response = render(req.app_data::<RejectionRenderer>(), rejection);
        ready(Err(InternalError::from_response(cause, response).into()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use actix_web::{test, App};
    use chrono::Duration;
    use serde_json::Value;

    const SECRET: &str = "middleware-test-secret-0123456789abcdef";

    fn keys() -> JwtKeys {
        JwtKeys::from_secret(SECRET).unwrap()
    }

    fn envelope(rejection: TokenRejection) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({
            "message": rejection.message,
            "tokenExpired": true,
        }))
    }

    async fn whoami(user_id: UserId) -> HttpResponse {
        HttpResponse::Ok().json(serde_json::json!({ "user": user_id.0 }))
    }

    macro_rules! guarded_app {
        () => {
            test::init_service(
                App::new()
                    .app_data(web::Data::new(keys()))
                    .app_data(RejectionRenderer(envelope))
                    .service(
                        web::resource("/guarded")
                            .wrap(TokenGuard)
                            .route(web::get().to(whoami)),
                    )
                    .route("/unguarded", web::get().to(whoami)),
            )
            .await
        };
    }

    #[actix_web::test]
    async fn test_valid_token_passes_subject_through() {
        let app = guarded_app!();
        let user_id = Uuid::new_v4();
        let token = keys().generate_access_token(user_id, "alice").unwrap();

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["user"], user_id.to_string());
    }

    #[actix_web::test]
    async fn test_expired_token_answers_ok_with_flag() {
        let app = guarded_app!();
        let token = keys()
            .generate_token_with_ttl(Uuid::new_v4(), "alice", Duration::seconds(-60))
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["tokenExpired"], true);
        assert_eq!(body["message"], TOKEN_EXPIRED_MESSAGE);
        assert!(body.get("user").is_none());
    }

    #[actix_web::test]
    async fn test_missing_header_rejected() {
        let app = guarded_app!();
        let req = test::TestRequest::get().uri("/guarded").to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tokenExpired"], true);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("missing Authorization header"));
    }

    #[actix_web::test]
    async fn test_token_signed_with_other_secret_rejected() {
        let app = guarded_app!();
        let forged = JwtKeys::from_secret(&"x".repeat(48))
            .unwrap()
            .generate_access_token(Uuid::new_v4(), "mallory")
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", format!("Bearer {}", forged)))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tokenExpired"], true);
    }

    #[actix_web::test]
    async fn test_basic_scheme_rejected() {
        let app = guarded_app!();
        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", "Basic dXNlcjpwYXNz"))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tokenExpired"], true);
    }

    #[actix_web::test]
    async fn test_refresh_token_rejected() {
        let app = guarded_app!();
        let now = chrono::Utc::now().timestamp();
        let token = keys()
            .encode(&crypto_core::Claims {
                sub: Uuid::new_v4().to_string(),
                iat: now,
                exp: now + 600,
                token_type: "refresh".to_string(),
                username: "alice".to_string(),
            })
            .unwrap();

        let req = test::TestRequest::get()
            .uri("/guarded")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();

        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(body["tokenExpired"], true);
        assert!(body.get("user").is_none());
    }

    #[actix_web::test]
    async fn test_user_id_without_guard_uses_renderer() {
        let app = guarded_app!();
        let req = test::TestRequest::get().uri("/unguarded").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 200);

        let body: Value = test::read_body_json(resp).await;
        assert_eq!(body["tokenExpired"], true);
        assert!(body["message"]
            .as_str()
            .unwrap()
            .contains("request was not authenticated"));
    }

    #[actix_web::test]
    async fn test_missing_renderer_is_server_error() {
        let app = test::init_service(
            App::new().app_data(web::Data::new(keys())).service(
                web::resource("/guarded")
                    .wrap(TokenGuard)
                    .route(web::get().to(whoami)),
            ),
        )
        .await;
        let req = test::TestRequest::get().uri("/guarded").to_request();

        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), 500);
    }
}
