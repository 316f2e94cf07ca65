use crate::{AsyncHttpClient, HttpClientError, HttpRequest, HttpResponse};

use std::future::Future;
use std::pin::Pin;
use std::time::Duration;

// No timeout is mandated upstream; 30 seconds is this crate's conservative default.
const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

/// Returns an asynchronous `reqwest` client configured for this crate: redirects
/// disabled and a 30 second request timeout.
pub fn default_async_http_client() -> Result<reqwest::Client, reqwest::Error> {
    reqwest::Client::builder()
        // Following redirects opens the client up to SSRF vulnerabilities.
        .redirect(reqwest::redirect::Policy::none())
        .timeout(DEFAULT_TIMEOUT)
        .build()
}

/// Returns a blocking `reqwest` client configured for this crate: redirects disabled
/// and a 30 second request timeout.
#[cfg(all(feature = "reqwest-blocking", not(target_arch = "wasm32")))]
pub fn default_blocking_http_client() -> Result<reqwest::blocking::Client, reqwest::Error> {
    reqwest::blocking::Client::builder()
        // Following redirects opens the client up to SSRF vulnerabilities.
        .redirect(reqwest::redirect::Policy::none())
        .timeout(DEFAULT_TIMEOUT)
        .build()
}

impl<'c> AsyncHttpClient<'c> for reqwest::Client {
    type Error = HttpClientError<reqwest::Error>;

    fn call(
        &'c self,
        request: HttpRequest,
    ) -> Pin<Box<dyn Future<Output = Result<HttpResponse, Self::Error>> + 'c>> {
        Box::pin(async move {
            let response = self
                .execute(request.try_into().map_err(Box::new)?)
                .await
                .map_err(Box::new)?;

            // This should be simpler once https://github.com/seanmonstar/reqwest/pull/2060 is
            // merged.
            let mut builder = http::Response::builder().status(response.status());

            #[cfg(not(target_arch = "wasm32"))]
            {
                builder = builder.version(response.version());
            }

            for (name, value) in response.headers().iter() {
                builder = builder.header(name, value);
            }

            builder
                .body(response.bytes().await.map_err(Box::new)?.to_vec())
                .map_err(HttpClientError::Http)
        })
    }
}

#[cfg(all(feature = "reqwest-blocking", not(target_arch = "wasm32")))]
impl crate::SyncHttpClient for reqwest::blocking::Client {
    type Error = HttpClientError<reqwest::Error>;

    fn call(&self, request: HttpRequest) -> Result<HttpResponse, Self::Error> {
        let mut response = self
            .execute(request.try_into().map_err(Box::new)?)
            .map_err(Box::new)?;

        // This should be simpler once https://github.com/seanmonstar/reqwest/pull/2060 is
        // merged.
        let mut builder = http::Response::builder()
            .status(response.status())
            .version(response.version());

        for (name, value) in response.headers().iter() {
            builder = builder.header(name, value);
        }

        let mut body = Vec::new();
        <reqwest::blocking::Response as std::io::Read>::read_to_end(&mut response, &mut body)?;

        builder.body(body).map_err(HttpClientError::Http)
    }
}
