use actix_web::{
    body::EitherBody,
    dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform},
    Error, HttpMessage, HttpRequest, HttpResponse,
};
use futures::future::LocalBoxFuture;
use std::future::{ready, Ready};

use crate::services::session_service;
use crate::utils::response::ApiResponse;

/// Reads the two session sources off a request: the Authorization bearer
/// token and the `session` cookie.
pub fn tokens_from_request(req: &HttpRequest) -> (Option<String>, Option<String>) {
    let bearer = req
        .headers()
        .get("Authorization")
        .and_then(|value| value.to_str().ok())
        .and_then(|value| value.strip_prefix("Bearer "))
        .map(|token| token.to_string());

    let cookie = req
        .cookie(session_service::SESSION_COOKIE)
        .map(|cookie| cookie.value().to_string());

    (bearer, cookie)
}

/// Guards dashboard routes: resolves the dual-source session and injects the
/// claims for handlers to pick up via `web::ReqData<SessionClaims>`.
pub struct SessionGuard;

impl<S, B> Transform<S, ServiceRequest> for SessionGuard
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type InitError = ();
    type Transform = SessionGuardMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(SessionGuardMiddleware { service }))
    }
}

pub struct SessionGuardMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for SessionGuardMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = Error>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<EitherBody<B>>;
    type Error = Error;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let (bearer, cookie) = tokens_from_request(req.request());

        match session_service::resolve_session(bearer.as_deref(), cookie.as_deref()) {
            Ok(Some(claims)) => {
                req.extensions_mut().insert(claims);
                let fut = self.service.call(req);
                Box::pin(async move {
                    let res = fut.await?;
                    Ok(res.map_into_left_body())
                })
            }
            Ok(None) => {
                let res = req.into_response(
                    HttpResponse::Unauthorized()
                        .json(ApiResponse::fail("User not logged in"))
                        .map_into_right_body(),
                );
                Box::pin(async move { Ok(res) })
            }
            Err(message) => {
                let res = req.into_response(
                    HttpResponse::Unauthorized()
                        .json(ApiResponse::fail(message))
                        .map_into_right_body(),
                );
                Box::pin(async move { Ok(res) })
            }
        }
    }
}
