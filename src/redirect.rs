use crate::{AuthorizationCode, CsrfToken, RedirectError, RedirectUrl};

use log::debug;
use url::Url;

/// What the hosting view should do with a candidate navigation.
///
/// The display layer owns actually stopping the navigation on
/// [`NavigationDecision::Completed`]; the redirect URI is not a real page.
#[derive(Debug)]
pub enum NavigationDecision {
    /// The navigation does not target the redirect URI; let it proceed untouched.
    PassThrough,
    /// The navigation is the provider's redirect; the flow is complete. Carries the
    /// authorization code on success or the classified failure.
    Completed(Result<AuthorizationCode, RedirectError>),
}

/// Classifies a candidate navigation URL against the redirect URI of a pending
/// authorization request.
///
/// Returns `None` when the URL does not target the redirect URI. Otherwise the
/// redirect's query parameters are classified in order:
///
/// 1. an `error` parameter completes the flow with
///    [`RedirectError::Provider`] (the `error_description` is empty when absent);
/// 2. a `state` parameter that fails [`CsrfToken::verify`] completes the flow with
///    [`RedirectError::StateMismatch`]; a redirect with no `state` parameter at all
///    skips this check;
/// 3. a `code` parameter completes the flow successfully;
/// 4. otherwise the flow completes with [`RedirectError::MissingCode`].
pub fn classify_redirect(
    url: &Url,
    redirect_url: &RedirectUrl,
    state: &CsrfToken,
) -> Option<Result<AuthorizationCode, RedirectError>> {
    if !url.as_str().starts_with(redirect_url.as_str()) {
        return None;
    }
    Some(classify_query(url, state))
}

fn classify_query(url: &Url, state: &CsrfToken) -> Result<AuthorizationCode, RedirectError> {
    let param = |name: &str| {
        url.query_pairs()
            .find(|(key, _)| key == name)
            .map(|(_, value)| value.into_owned())
    };

    if let Some(error) = param("error") {
        return Err(RedirectError::Provider {
            error,
            description: param("error_description").unwrap_or_default(),
        });
    }
    if let Some(candidate) = param("state") {
        if !state.verify(&candidate) {
            return Err(RedirectError::StateMismatch);
        }
    }
    match param("code") {
        Some(code) => Ok(AuthorizationCode::new(code)),
        None => Err(RedirectError::MissingCode),
    }
}

/// Intercepts the provider's redirect inside a browser-like view.
///
/// A linear state machine: the interceptor awaits the redirect, classifies the first
/// navigation that targets the redirect URI, and is terminal afterwards (later
/// navigations pass through untouched). Construct a fresh interceptor per
/// authorization request.
///
/// The hosting shell typically funnels the `Err` arm of the outcome into its single
/// error callback and hands the `Ok` code to
/// [`Client::exchange_code`](crate::Client::exchange_code) or
/// [`Client::exchange_code_delegated`](crate::Client::exchange_code_delegated).
#[derive(Debug)]
pub struct RedirectInterceptor {
    redirect_url: RedirectUrl,
    state: CsrfToken,
    completed: bool,
}
impl RedirectInterceptor {
    /// Creates an interceptor awaiting the redirect for the authorization request
    /// that generated `state`.
    pub fn new(redirect_url: RedirectUrl, state: CsrfToken) -> Self {
        Self {
            redirect_url,
            state,
            completed: false,
        }
    }

    /// Returns true once a redirect has been classified.
    pub fn is_completed(&self) -> bool {
        self.completed
    }

    /// Decides whether `navigation` is the provider's redirect and, if so, classifies
    /// it.
    ///
    /// Matching is by prefix against the configured redirect URI. Non-matching
    /// navigations, and any navigation after completion, pass through untouched.
    pub fn intercept(&mut self, navigation: &str) -> NavigationDecision {
        if self.completed || !navigation.starts_with(self.redirect_url.as_str()) {
            return NavigationDecision::PassThrough;
        }
        self.completed = true;
        let outcome = match Url::parse(navigation) {
            Ok(url) => classify_query(&url, &self.state),
            // A prefix match that fails to parse cannot carry a code.
            Err(_) => Err(RedirectError::MissingCode),
        };
        debug!(
            "intercepted redirect navigation: {}",
            match &outcome {
                Ok(_) => "authorization code received",
                Err(err) => err.as_log_label(),
            }
        );
        NavigationDecision::Completed(outcome)
    }
}

impl RedirectError {
    fn as_log_label(&self) -> &'static str {
        match self {
            RedirectError::StateMismatch => "state mismatch",
            RedirectError::Provider { .. } => "provider error",
            RedirectError::MissingCode => "missing code",
        }
    }
}
