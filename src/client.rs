use crate::{
    AccessToken, AuthorizationCode, AuthorizationRequest, BasicProfileRequest, ClientId,
    ClientSecret, CodeTokenRequest, CsrfToken, DelegatedTokenRequest, DisplayImageRequest,
    EmailAddressRequest, ImageReference, LiteProfileRequest, RedirectUrl,
};

use chrono::Utc;
use url::Url;

use std::borrow::Cow;
use std::sync::Arc;

/// Stores the configuration for a Sign In with LinkedIn client.
///
/// The provider's endpoints are fixed, so the client only carries the application
/// credentials and the registered redirect URI. Operations follow the
/// [Builder Pattern](https://doc.rust-lang.org/1.0.0/style/ownership/builders.html):
/// each returns a request object that is executed against a caller-supplied
/// [`SyncHttpClient`](crate::SyncHttpClient) or
/// [`AsyncHttpClient`](crate::AsyncHttpClient).
///
/// # Examples
///
/// See the [crate] root documentation for usage examples.
#[derive(Clone, Debug)]
pub struct Client {
    pub(crate) client_id: ClientId,
    pub(crate) client_secret: Option<ClientSecret>,
    pub(crate) redirect_url: Option<RedirectUrl>,
}
impl Client {
    /// Initializes a client with the specified client ID.
    pub fn new(client_id: ClientId) -> Self {
        Self {
            client_id,
            client_secret: None,
            redirect_url: None,
        }
    }

    /// Sets the client secret.
    ///
    /// Required only for the local code-for-token exchange ([`Client::exchange_code`]).
    /// Mobile deployments that cannot keep a secret on the device should use
    /// [`Client::exchange_code_delegated`] instead and leave this unset.
    pub fn set_client_secret(mut self, client_secret: ClientSecret) -> Self {
        self.client_secret = Some(client_secret);

        self
    }

    /// Sets the redirect URL the provider sends the member back to after the
    /// authorization prompt.
    pub fn set_redirect_uri(mut self, redirect_url: RedirectUrl) -> Self {
        self.redirect_url = Some(redirect_url);

        self
    }

    /// Returns the Client ID.
    pub fn client_id(&self) -> &ClientId {
        &self.client_id
    }

    /// Returns the redirect URL.
    pub fn redirect_url(&self) -> Option<&RedirectUrl> {
        self.redirect_url.as_ref()
    }

    /// Generates an authorization URL for a new authorization request.
    ///
    /// # Arguments
    ///
    /// * `state_fn` - A function that returns an opaque value used to maintain state
    ///   between the request and callback. The provider includes this value when
    ///   redirecting the user-agent back to the client.
    ///
    /// # Security Warning
    ///
    /// Callers should use a fresh, unpredictable `state` for each authorization
    /// request (i.e., [`CsrfToken::new_random`]) and verify it against the `state`
    /// parameter echoed on the redirect.
    pub fn authorize_url<S>(&self, state_fn: S) -> AuthorizationRequest
    where
        S: FnOnce() -> CsrfToken,
    {
        AuthorizationRequest {
            client_id: &self.client_id,
            redirect_url: self.redirect_url.as_ref().map(Cow::Borrowed),
            scopes: Vec::new(),
            state: state_fn(),
        }
    }

    /// Exchanges a code produced by a successful authorization process for an access
    /// token, using the configured client secret.
    ///
    /// Acquires ownership of the `code` because authorization codes may only be used
    /// once to retrieve an access token from the provider.
    ///
    /// See <https://tools.ietf.org/html/rfc6749#section-4.1.3>.
    pub fn exchange_code(&self, code: AuthorizationCode) -> CodeTokenRequest {
        CodeTokenRequest {
            client_id: &self.client_id,
            client_secret: self.client_secret.as_ref(),
            code,
            redirect_url: self.redirect_url.as_ref().map(Cow::Borrowed),
            time_fn: Arc::new(Utc::now),
        }
    }

    /// Hands the full redirect URL to the caller's own exchange endpoint instead of
    /// contacting the provider's token endpoint directly.
    ///
    /// A single GET is made to `exchange_url` with the redirect's query parameters
    /// (`code`, `state`) forwarded; `parser` then interprets the raw response and
    /// returns the parsed [`Token`](crate::Token). Parser failures surface as
    /// [`TokenExchangeError::Delegated`](crate::TokenExchangeError::Delegated).
    pub fn exchange_code_delegated<'a, P>(
        &self,
        exchange_url: Url,
        redirect_url: &'a Url,
        parser: P,
    ) -> DelegatedTokenRequest<'a, P> {
        DelegatedTokenRequest {
            exchange_url,
            redirect_url,
            parser,
        }
    }

    /// Fetches the member's lite profile (name and picture reference).
    ///
    /// Requires a token granted the [`Scope::LiteProfile`](crate::Scope::LiteProfile)
    /// scope.
    pub fn lite_profile<'a>(&self, access_token: &'a AccessToken) -> LiteProfileRequest<'a> {
        LiteProfileRequest { access_token }
    }

    /// Fetches the member's basic profile (lite profile plus headline, flattened
    /// localized names, and vanity name).
    ///
    /// Requires a token granted the [`Scope::BasicProfile`](crate::Scope::BasicProfile)
    /// scope; with a lesser scope the provider omits the additional fields and the
    /// fetch fails parsing.
    pub fn basic_profile<'a>(&self, access_token: &'a AccessToken) -> BasicProfileRequest<'a> {
        BasicProfileRequest { access_token }
    }

    /// Fetches the member's primary email address.
    ///
    /// Requires a token granted the
    /// [`Scope::EmailAddress`](crate::Scope::EmailAddress) scope.
    pub fn email_address<'a>(&self, access_token: &'a AccessToken) -> EmailAddressRequest<'a> {
        EmailAddressRequest { access_token }
    }

    /// Resolves the display URL behind a profile's [`ImageReference`], memoizing it on
    /// the reference.
    ///
    /// A reference that was already resolved answers from the memo without I/O.
    pub fn resolve_display_image<'a>(
        &self,
        image: &'a mut ImageReference,
        access_token: &'a AccessToken,
    ) -> DisplayImageRequest<'a> {
        DisplayImageRequest {
            image,
            access_token,
        }
    }
}
