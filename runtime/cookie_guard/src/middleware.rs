use std::future::IntoFuture;
use std::sync::Arc;

use http::{HeaderMap, Request, Response};

use crate::errors::{CookieMiddlewareError, EncodeResponseCookiesError, InvalidFormatError};
use crate::{DecodedCookies, ProtectionPolicy, RequestCookies};

/// Apply a [`ProtectionPolicy`] to the cookies flowing through a request/response exchange.
///
/// - On the way in, protected request cookies are decrypted or validated.
///   Cookies that fail are dropped and logged, they never abort the request.
/// - On the way out, `Set-Cookie` headers that match a rule are encrypted or signed,
///   unless they are already protected.
///
/// The middleware holds no per-request state: a single instance can serve
/// every request, concurrently.
#[derive(Debug, Clone)]
pub struct CookieMiddleware {
    policy: Arc<ProtectionPolicy>,
}

impl CookieMiddleware {
    /// Create a middleware that enforces `policy`.
    pub fn new(policy: ProtectionPolicy) -> Self {
        Self {
            policy: Arc::new(policy),
        }
    }

    /// The policy enforced by this middleware.
    pub fn policy(&self) -> &ProtectionPolicy {
        &self.policy
    }

    /// Decode the cookies in the `Cookie` headers of an incoming request.
    pub fn pre_process(&self, headers: &HeaderMap) -> Result<DecodedCookies, InvalidFormatError> {
        self.policy.decode_request_cookies(RequestCookies::from_headers(headers))
    }

    /// Protect the `Set-Cookie` headers of an outgoing response.
    ///
    /// The response is returned as is if none of its headers had to be rewritten.
    pub fn post_process<B>(
        &self,
        mut response: Response<B>,
    ) -> Result<Response<B>, EncodeResponseCookiesError> {
        if self.policy.encode_response_cookies(response.headers_mut())? {
            tracing::trace!("Rewrote the `Set-Cookie` headers of the outgoing response");
        }
        Ok(response)
    }

    /// Decode the request cookies, invoke `next` and then protect the response cookies.
    ///
    /// `next` receives the request together with the decoded cookies.
    pub async fn wrap<B, R, F, Fut>(
        &self,
        request: Request<B>,
        next: F,
    ) -> Result<Response<R>, CookieMiddlewareError>
    where
        F: FnOnce(Request<B>, RequestCookies) -> Fut,
        Fut: IntoFuture<Output = Response<R>>,
    {
        let decoded = self.pre_process(request.headers())?;
        let response = next(request, decoded.cookies).await;
        Ok(self.post_process(response)?)
    }
}
