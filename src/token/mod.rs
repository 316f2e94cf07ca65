use crate::endpoint::{endpoint_response, form_post_request};
use crate::{
    AccessToken, AsyncHttpClient, AuthorizationCode, ClientId, ClientSecret, ConfigurationError,
    HttpRequest, HttpResponse, RedirectUrl, SyncHttpClient, TokenExchangeError, TOKEN_ENDPOINT,
};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use url::Url;

use std::borrow::Cow;
use std::error::Error;
use std::future::Future;
use std::sync::Arc;


///
/// Access token issued by the token endpoint, stamped with its expiry.
///
/// The provider does not issue refresh tokens to this client class; once the token
/// lapses the member signs in again. The caller owns storage and lifetime.
///
#[derive(Clone, Debug, Deserialize, Serialize)]
pub struct Token {
    access_token: AccessToken,
    expires_at: DateTime<Utc>,
}
impl Token {
    /// Assembles a token from its parts (e.g., one recovered from the caller's own
    /// storage).
    pub fn new(access_token: AccessToken, expires_at: DateTime<Utc>) -> Self {
        Self {
            access_token,
            expires_at,
        }
    }

    /// The bearer credential sent to the profile, email address, and image endpoints.
    pub fn access_token(&self) -> &AccessToken {
        &self.access_token
    }

    /// Instant the token lapses: issue time plus the provider-supplied TTL.
    pub fn expires_at(&self) -> DateTime<Utc> {
        self.expires_at
    }
}

// Wire shape of a successful token endpoint response.
#[derive(Debug, Deserialize)]
pub(crate) struct TokenResponse {
    pub(crate) access_token: AccessToken,
    pub(crate) expires_in: i64,
}

fn token_from_response<RE>(
    response: TokenResponse,
    issued_at: DateTime<Utc>,
) -> Result<Token, TokenExchangeError<RE>>
where
    RE: Error + 'static,
{
    if response.access_token.secret().is_empty() {
        return Err(TokenExchangeError::Other(
            "server returned an empty access token".to_string(),
        ));
    }
    Ok(Token {
        access_token: response.access_token,
        expires_at: issued_at + chrono::Duration::seconds(response.expires_in),
    })
}

/// A request to exchange an authorization code for an access token, authenticating
/// with the configured client secret.
///
/// See <https://tools.ietf.org/html/rfc6749#section-4.1.3>.
pub struct CodeTokenRequest<'a> {
    pub(crate) client_id: &'a ClientId,
    pub(crate) client_secret: Option<&'a ClientSecret>,
    pub(crate) code: AuthorizationCode,
    pub(crate) redirect_url: Option<Cow<'a, RedirectUrl>>,
    pub(crate) time_fn: Arc<dyn Fn() -> DateTime<Utc> + Send + Sync + 'a>,
}
impl<'a> CodeTokenRequest<'a> {
    /// Overrides the `redirect_url` to the one specified.
    pub fn set_redirect_uri(mut self, redirect_url: Cow<'a, RedirectUrl>) -> Self {
        self.redirect_url = Some(redirect_url);
        self
    }

    /// Specifies a function for returning the current time, used to stamp the
    /// token's expiry.
    pub fn set_time_fn<T>(mut self, time_fn: T) -> Self
    where
        T: Fn() -> DateTime<Utc> + Send + Sync + 'a,
    {
        self.time_fn = Arc::new(time_fn);
        self
    }

    fn prepare_request<RE>(&self) -> Result<HttpRequest, TokenExchangeError<RE>>
    where
        RE: Error + 'static,
    {
        let client_secret = self
            .client_secret
            .ok_or(ConfigurationError::Missing("client_secret"))?;
        let redirect_url = self
            .redirect_url
            .as_ref()
            .ok_or(ConfigurationError::Missing("redirect_uri"))?;

        let url = Url::parse(TOKEN_ENDPOINT).expect("token endpoint is a valid static URL");

        let params: Vec<(&str, &str)> = vec![
            ("grant_type", "authorization_code"),
            ("client_id", self.client_id),
            ("redirect_uri", redirect_url.as_str()),
            ("client_secret", client_secret.secret()),
            ("code", self.code.secret()),
        ];

        form_post_request(&url, params)
            .map_err(|err| TokenExchangeError::Other(format!("failed to prepare request: {err}")))
    }

    /// Synchronously sends the request to the token endpoint and awaits a response.
    ///
    /// A single attempt; the caller decides whether to retry.
    pub fn request<C>(self, http_client: &C) -> Result<Token, TokenExchangeError<C::Error>>
    where
        C: SyncHttpClient,
    {
        let request = self.prepare_request()?;
        let response = http_client
            .call(request)
            .map_err(TokenExchangeError::Request)?;
        token_from_response(endpoint_response::<TokenResponse>(response)?, (self.time_fn)())
    }

    /// Asynchronously sends the request to the token endpoint and returns a Future.
    ///
    /// A single attempt; the caller decides whether to retry, and abandons an
    /// in-flight exchange by dropping the returned Future.
    pub fn request_async<'c, C>(
        self,
        http_client: &'c C,
    ) -> impl Future<Output = Result<Token, TokenExchangeError<<C as AsyncHttpClient<'c>>::Error>>> + 'c
    where
        Self: 'c,
        C: AsyncHttpClient<'c>,
    {
        Box::pin(async move {
            let request = self.prepare_request()?;
            let response = http_client
                .call(request)
                .await
                .map_err(TokenExchangeError::Request)?;
            token_from_response(endpoint_response::<TokenResponse>(response)?, (self.time_fn)())
        })
    }
}

/// A request that delegates the code-for-token exchange to the caller's own server.
///
/// The full set of query parameters the provider appended to the redirect is
/// forwarded to the exchange endpoint with a single GET; the caller-supplied pure
/// `parser` interprets the raw response.
pub struct DelegatedTokenRequest<'a, P> {
    pub(crate) exchange_url: Url,
    pub(crate) redirect_url: &'a Url,
    pub(crate) parser: P,
}
impl<'a, P> DelegatedTokenRequest<'a, P> {
    fn prepare_request<RE>(&self) -> Result<HttpRequest, TokenExchangeError<RE>>
    where
        RE: Error + 'static,
    {
        let mut url = self.exchange_url.clone();
        url.query_pairs_mut()
            .extend_pairs(self.redirect_url.query_pairs());

        http::Request::builder()
            .uri(url.to_string())
            .method(http::Method::GET)
            .header(
                http::header::ACCEPT,
                http::HeaderValue::from_static(crate::CONTENT_TYPE_JSON),
            )
            .body(Vec::new())
            .map_err(|err| TokenExchangeError::Other(format!("failed to prepare request: {err}")))
    }

    /// Synchronously sends the request to the exchange endpoint and hands the raw
    /// response to the parser.
    pub fn request<C, PE>(self, http_client: &C) -> Result<Token, TokenExchangeError<C::Error>>
    where
        C: SyncHttpClient,
        P: FnOnce(HttpResponse) -> Result<Token, PE>,
        PE: Error + Send + Sync + 'static,
    {
        let request = self.prepare_request()?;
        let response = http_client
            .call(request)
            .map_err(TokenExchangeError::Request)?;
        (self.parser)(response).map_err(|err| TokenExchangeError::Delegated(Box::new(err)))
    }

    /// Asynchronously sends the request to the exchange endpoint and hands the raw
    /// response to the parser.
    pub fn request_async<'c, C, PE>(
        self,
        http_client: &'c C,
    ) -> impl Future<Output = Result<Token, TokenExchangeError<<C as AsyncHttpClient<'c>>::Error>>> + 'c
    where
        Self: 'c,
        C: AsyncHttpClient<'c>,
        P: FnOnce(HttpResponse) -> Result<Token, PE> + 'c,
        PE: Error + Send + Sync + 'static,
    {
        Box::pin(async move {
            let request = self.prepare_request()?;
            let response = http_client
                .call(request)
                .await
                .map_err(TokenExchangeError::Request)?;
            (self.parser)(response).map_err(|err| TokenExchangeError::Delegated(Box::new(err)))
        })
    }
}
