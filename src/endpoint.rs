use crate::error::ResponseError;
use crate::{AccessToken, CONTENT_TYPE_FORMENCODED, CONTENT_TYPE_JSON};

use http::header::{ACCEPT, AUTHORIZATION, CONTENT_TYPE};
use http::{HeaderValue, StatusCode};
use log::debug;
use serde::de::DeserializeOwned;
use url::{form_urlencoded, Url};

use std::error::Error;
use std::future::Future;
use std::pin::Pin;

/// An HTTP request.
pub type HttpRequest = http::Request<Vec<u8>>;

/// An HTTP response.
pub type HttpResponse = http::Response<Vec<u8>>;

/// An asynchronous (future-based) HTTP client.
pub trait AsyncHttpClient<'c> {
    /// Error type returned by HTTP client.
    type Error: Error + 'static;

    /// Perform a single HTTP request.
    fn call(
        &'c self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c>>;
}
impl<'c, E, F, T> AsyncHttpClient<'c> for T
where
    E: Error + 'static,
    F: Future<Output = Result<HttpResponse, E>> + 'c,
    // We can't implement this for FnOnce because callers reuse one client across the
    // exchange and the subsequent profile fetches.
    T: Fn(HttpRequest) -> F,
{
    type Error = E;

    fn call(
        &'c self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c>> {
        Box::pin(self(request))
    }
}

/// A synchronous (blocking) HTTP client.
pub trait SyncHttpClient {
    /// Error type returned by HTTP client.
    type Error: Error + 'static;

    /// Perform a single HTTP request.
    fn call(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error>;
}
impl<E, T> SyncHttpClient for T
where
    E: Error + 'static,
    // We can't implement this for FnOnce because callers reuse one client across the
    // exchange and the subsequent profile fetches.
    T: Fn(HttpRequest) -> Result<HttpResponse, E>,
{
    type Error = E;

    fn call(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        self(request)
    }
}

// LinkedIn documents success as the 200-209 class of response, tested as
// status / 10 == 20. Reproduced exactly; not equivalent to a conventional 2xx check.
pub(crate) fn is_provider_success(status: StatusCode) -> bool {
    status.as_u16() / 10 == 20
}

pub(crate) fn form_post_request(
    url: &Url,
    params: Vec<(&str, &str)>,
) -> Result<HttpRequest, http::Error> {
    let body = form_urlencoded::Serializer::new(String::new())
        .extend_pairs(params)
        .finish()
        .into_bytes();

    http::Request::builder()
        .uri(url.to_string())
        .method(http::Method::POST)
        .header(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON))
        .header(
            CONTENT_TYPE,
            HeaderValue::from_static(CONTENT_TYPE_FORMENCODED),
        )
        .body(body)
}

pub(crate) fn bearer_get_request(
    url: &Url,
    access_token: &AccessToken,
) -> Result<HttpRequest, http::Error> {
    http::Request::builder()
        .uri(url.to_string())
        .method(http::Method::GET)
        .header(ACCEPT, HeaderValue::from_static(CONTENT_TYPE_JSON))
        .header(
            AUTHORIZATION,
            HeaderValue::from_str(&format!("Bearer {}", access_token.secret()))?,
        )
        .body(Vec::new())
}

pub(crate) fn endpoint_response<DO>(http_response: HttpResponse) -> Result<DO, ResponseError>
where
    DO: DeserializeOwned,
{
    check_response_status(&http_response)?;

    check_response_body(&http_response)?;

    let response_body = http_response.body().as_slice();
    serde_path_to_error::deserialize(&mut serde_json::Deserializer::from_slice(response_body))
        .map_err(|e| ResponseError::Parse(e, response_body.to_vec()))
}

fn check_response_status(http_response: &HttpResponse) -> Result<(), ResponseError> {
    let status = http_response.status();
    if is_provider_success(status) {
        Ok(())
    } else {
        debug!(
            "endpoint returned non-success status {status} ({} body bytes)",
            http_response.body().len()
        );
        Err(ResponseError::ServerResponse {
            status,
            body: http_response.body().clone(),
        })
    }
}

fn check_response_body(http_response: &HttpResponse) -> Result<(), ResponseError> {
    // Validate that the response Content-Type is JSON.
    http_response
        .headers()
        .get(CONTENT_TYPE)
        .map_or(Ok(()), |content_type|
            // Section 3.1.1.1 of RFC 7231 indicates that media types are case-insensitive
            // and may be followed by optional whitespace and/or a parameter (e.g.,
            // charset). See https://tools.ietf.org/html/rfc7231#section-3.1.1.1.
            if content_type.to_str().ok().filter(|ct| ct.to_lowercase().starts_with(CONTENT_TYPE_JSON)).is_none() {
                Err(ResponseError::Other(format!(
                    "unexpected response Content-Type: {content_type:?}, should be `{CONTENT_TYPE_JSON}`"
                )))
            } else {
                Ok(())
            }
        )?;

    if http_response.body().is_empty() {
        return Err(ResponseError::Other(
            "server returned empty response body".to_string(),
        ));
    }

    Ok(())
}
