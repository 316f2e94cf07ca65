use crate::{ClientId, ConfigurationError, CsrfToken, RedirectUrl, Scope, AUTHORIZATION_ENDPOINT};

use url::Url;

use std::borrow::Cow;

/// A request to the authorization endpoint.
///
/// The provider only supports the authorization-code grant for this client class, so
/// the `response_type` is the literal `code` and is not configurable.
#[derive(Debug)]
pub struct AuthorizationRequest<'a> {
    pub(crate) client_id: &'a ClientId,
    pub(crate) redirect_url: Option<Cow<'a, RedirectUrl>>,
    pub(crate) scopes: Vec<Scope>,
    pub(crate) state: CsrfToken,
}
impl<'a> AuthorizationRequest<'a> {
    /// Appends a new scope to the authorization URL.
    pub fn add_scope(mut self, scope: Scope) -> Self {
        self.scopes.push(scope);
        self
    }

    /// Appends a collection of scopes to the authorization URL, preserving their
    /// order.
    pub fn add_scopes<I>(mut self, scopes: I) -> Self
    where
        I: IntoIterator<Item = Scope>,
    {
        self.scopes.extend(scopes);
        self
    }

    /// Overrides the `redirect_url` to the one specified.
    pub fn set_redirect_uri(mut self, redirect_url: Cow<'a, RedirectUrl>) -> Self {
        self.redirect_url = Some(redirect_url);
        self
    }

    /// Returns the full authorization URL and CSRF state for this authorization
    /// request.
    ///
    /// Never performs network I/O. Fails with [`ConfigurationError`] when the client
    /// id is empty, no redirect URI is configured, or no scopes were added.
    ///
    /// # Security Warning
    ///
    /// Callers must verify that the `state` parameter passed by the provider to the
    /// redirect URI matches the returned [`CsrfToken`] (see
    /// [`RedirectInterceptor`](crate::RedirectInterceptor), which performs this check).
    /// Doing so mitigates
    /// [Cross-Site Request Forgery](https://tools.ietf.org/html/rfc6749#section-10.12)
    /// attacks.
    pub fn url(self) -> Result<(Url, CsrfToken), ConfigurationError> {
        if self.client_id.is_empty() {
            return Err(ConfigurationError::Empty("client_id"));
        }
        let redirect_url = self
            .redirect_url
            .ok_or(ConfigurationError::Missing("redirect_uri"))?;
        if self.scopes.is_empty() {
            return Err(ConfigurationError::MissingScopes);
        }

        let scopes = self
            .scopes
            .iter()
            .map(|scope| scope.as_str())
            .collect::<Vec<_>>()
            .join(" ");

        let pairs: Vec<(&str, &str)> = vec![
            ("response_type", "code"),
            ("client_id", self.client_id),
            ("state", self.state.secret()),
            ("redirect_uri", redirect_url.as_str()),
            ("scope", &scopes),
        ];

        let mut url: Url = Url::parse(AUTHORIZATION_ENDPOINT)
            .expect("authorization endpoint is a valid static URL");

        url.query_pairs_mut()
            .extend_pairs(pairs.iter().map(|&(k, v)| (k, v)));

        Ok((url, self.state))
    }
}
