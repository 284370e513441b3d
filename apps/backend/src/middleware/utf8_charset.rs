use std::future::{ready, Ready};

use actix_web::dev::{forward_ready, Service, ServiceRequest, ServiceResponse, Transform};
use actix_web::http::header::{HeaderValue, CONTENT_TYPE};
use actix_web::Error as ActixError;
use futures_util::future::LocalBoxFuture;

/// Forces an explicit UTF-8 charset on textual responses, regardless of
/// what the client asked for. JSON and plain-text bodies produced by the
/// handlers are always UTF-8; this makes the header say so.
pub struct Utf8Charset;

impl<S, B> Transform<S, ServiceRequest> for Utf8Charset
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type InitError = ();
    type Transform = Utf8CharsetMiddleware<S>;
    type Future = Ready<Result<Self::Transform, Self::InitError>>;

    fn new_transform(&self, service: S) -> Self::Future {
        ready(Ok(Utf8CharsetMiddleware { service }))
    }
}

pub struct Utf8CharsetMiddleware<S> {
    service: S,
}

impl<S, B> Service<ServiceRequest> for Utf8CharsetMiddleware<S>
where
    S: Service<ServiceRequest, Response = ServiceResponse<B>, Error = ActixError>,
    S::Future: 'static,
    B: 'static,
{
    type Response = ServiceResponse<B>;
    type Error = ActixError;
    type Future = LocalBoxFuture<'static, Result<Self::Response, Self::Error>>;

    forward_ready!(service);

    fn call(&self, req: ServiceRequest) -> Self::Future {
        let fut = self.service.call(req);

        Box::pin(async move {
            let mut res = fut.await?;

            if let Some(forced) = forced_content_type(res.headers().get(CONTENT_TYPE)) {
                res.headers_mut().insert(CONTENT_TYPE, forced);
            }

            Ok(res)
        })
    }
}

/// Returns the Content-Type value to force, or None when the existing
/// value is non-textual or already carries a charset.
fn forced_content_type(current: Option<&HeaderValue>) -> Option<HeaderValue> {
    let value = current?.to_str().ok()?;
    let textual = value.starts_with("application/json") || value.starts_with("text/");
    if !textual || value.contains("charset") {
        return None;
    }
    HeaderValue::from_str(&format!("{value}; charset=utf-8")).ok()
}
