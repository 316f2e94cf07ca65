//! Sign In with LinkedIn: a client for the provider's three-legged OAuth2
//! authorization-code flow, factored so the authentication and profile-fetch logic
//! is usable and testable independently of any GUI shell.
//!
//! The crate covers the linear handshake end to end:
//!
//! 1. [`Client::authorize_url`] builds the authorization URL with a fresh
//!    anti-forgery [`CsrfToken`];
//! 2. [`RedirectInterceptor`] classifies candidate navigations inside the hosting
//!    view, verifies the echoed `state`, and extracts the [`AuthorizationCode`] (or
//!    the provider's error);
//! 3. [`Client::exchange_code`] swaps the code for a [`Token`] using the client
//!    secret, or [`Client::exchange_code_delegated`] forwards the redirect to the
//!    caller's own server, keeping the secret off the device;
//! 4. [`Client::lite_profile`], [`Client::basic_profile`],
//!    [`Client::email_address`], and [`Client::resolve_display_image`] fetch the
//!    member's typed records with the bearer token.
//!
//! The provider does not issue refresh tokens to this client class, so there is no
//! refresh support: when a token lapses, the member signs in again.
//!
//! # HTTP Clients
//!
//! No HTTP client is hard-wired. Each operation prepares an [`HttpRequest`] and
//! executes it through a caller-supplied [`SyncHttpClient`] or [`AsyncHttpClient`];
//! plain functions and closures with the right signature qualify, which is also how
//! the tests mock the provider. Adapters for `reqwest` (`reqwest` /
//! `reqwest-blocking` features) and `ureq` (`ureq` feature) are included;
//! [`default_async_http_client`] yields a `reqwest` client with redirects disabled
//! and a conservative 30 second timeout. In-flight async operations are abandoned
//! by dropping the returned future.
//!
//! # Example
//!
//! ```rust,no_run
//! use linkedin_oauth2::{
//!     Client, ClientId, ClientSecret, CsrfToken, NavigationDecision, RedirectInterceptor,
//!     RedirectUrl, Scope,
//! };
//!
//! # async fn example() -> Result<(), Box<dyn std::error::Error>> {
//! let client = Client::new(ClientId::new("86ab8xnidl".to_string()))
//!     .set_client_secret(ClientSecret::new("secret".to_string()))
//!     .set_redirect_uri(RedirectUrl::new("https://example.com/oauth/callback".to_string())?);
//!
//! let (authorize_url, csrf_state) = client
//!     .authorize_url(CsrfToken::new_random)
//!     .add_scope(Scope::LiteProfile)
//!     .add_scope(Scope::EmailAddress)
//!     .url()?;
//!
//! // Render `authorize_url` in the embedded browser view and feed every candidate
//! // navigation to the interceptor.
//! let mut interceptor = RedirectInterceptor::new(
//!     client.redirect_url().cloned().expect("redirect URI was configured"),
//!     csrf_state,
//! );
//!
//! # let some_navigation = "https://example.com/oauth/callback?code=xyz";
//! let code = match interceptor.intercept(some_navigation) {
//!     NavigationDecision::PassThrough => return Ok(()), // let the view navigate
//!     NavigationDecision::Completed(outcome) => outcome?,
//! };
//!
//! let http_client = linkedin_oauth2::default_async_http_client()?;
//!
//! let token = client.exchange_code(code).request_async(&http_client).await?;
//!
//! let mut profile = client
//!     .lite_profile(token.access_token())
//!     .request_async(&http_client)
//!     .await?;
//!
//! let email = client
//!     .email_address(token.access_token())
//!     .request_async(&http_client)
//!     .await?;
//!
//! let picture_url = client
//!     .resolve_display_image(&mut profile.profile_picture, token.access_token())
//!     .request_async(&http_client)
//!     .await?;
//!
//! println!("{} {} <{email}> {picture_url}", profile.first_name.text, profile.last_name.text);
//! # Ok(())
//! # }
//! ```

const CONTENT_TYPE_JSON: &str = "application/json";
const CONTENT_TYPE_FORMENCODED: &str = "application/x-www-form-urlencoded";

// Provider endpoints are fixed for this client class.
pub(crate) const AUTHORIZATION_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/authorization";
pub(crate) const TOKEN_ENDPOINT: &str = "https://www.linkedin.com/oauth/v2/accessToken";
pub(crate) const PROFILE_ENDPOINT: &str = "https://api.linkedin.com/v2/me";
pub(crate) const EMAIL_ENDPOINT: &str = "https://api.linkedin.com/v2/emailAddress";

mod client;
mod code;
mod endpoint;
mod error;
mod helpers;
mod profile;
mod redirect;
mod token;
mod types;

#[cfg(feature = "reqwest")]
mod reqwest_client;

#[cfg(feature = "ureq")]
mod ureq_client;

#[cfg(test)]
mod tests;

pub use crate::client::Client;
pub use crate::code::AuthorizationRequest;
pub use crate::endpoint::{AsyncHttpClient, HttpRequest, HttpResponse, SyncHttpClient};
pub use crate::error::{
    ConfigurationError, HttpClientError, ProfileFetchError, RedirectError, TokenExchangeError,
};
pub use crate::profile::{
    BasicProfile, BasicProfileRequest, DisplayImageRequest, EmailAddressRequest, ImageReference,
    LiteProfile, LiteProfileRequest, LocalizedString,
};
pub use crate::redirect::{classify_redirect, NavigationDecision, RedirectInterceptor};
pub use crate::token::{CodeTokenRequest, DelegatedTokenRequest, Token};
pub use crate::types::{
    AccessToken, AuthorizationCode, ClientId, ClientSecret, CsrfToken, RedirectUrl, Scope,
};

#[cfg(feature = "reqwest")]
pub use crate::reqwest_client::default_async_http_client;

#[cfg(all(feature = "reqwest-blocking", not(target_arch = "wasm32")))]
pub use crate::reqwest_client::default_blocking_http_client;
