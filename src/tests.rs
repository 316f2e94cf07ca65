use crate::{
    classify_redirect, Client, ClientId, ClientSecret, ConfigurationError, CsrfToken,
    HttpRequest, HttpResponse, NavigationDecision, RedirectError, RedirectInterceptor,
    RedirectUrl, Scope,
};

use http::header::{HeaderMap, HeaderName, HeaderValue, CONTENT_TYPE};
use http::status::StatusCode;
use thiserror::Error;
use url::Url;

#[derive(Debug, Error)]
pub(crate) enum FakeError {
    #[error("fake error")]
    Err,
}

pub(crate) fn new_client() -> Client {
    Client::new(ClientId::new("aaa".to_string()))
        .set_client_secret(ClientSecret::new("bbb".to_string()))
        .set_redirect_uri(
            RedirectUrl::new("https://example.com/oauth/callback".to_string()).unwrap(),
        )
}

pub(crate) fn json_response(status: StatusCode, body: &str) -> HttpResponse {
    http::Response::builder()
        .status(status)
        .header(CONTENT_TYPE, "application/json")
        .body(body.to_string().into_bytes())
        .unwrap()
}

pub(crate) fn clone_response(response: &HttpResponse) -> HttpResponse {
    let mut builder = http::Response::builder().status(response.status());
    for (name, value) in response.headers() {
        builder = builder.header(name, value);
    }
    builder.body(response.body().clone()).unwrap()
}

pub(crate) fn mock_http_client(
    request_headers: Vec<(HeaderName, &'static str)>,
    request_body: &'static str,
    request_uri: &'static str,
    response: HttpResponse,
) -> impl Fn(HttpRequest) -> Result<HttpResponse, FakeError> {
    move |request: HttpRequest| {
        assert_eq!(request.uri().to_string(), request_uri);
        assert_eq!(
            *request.headers(),
            request_headers
                .iter()
                .map(|(name, value)| (name.clone(), HeaderValue::from_str(value).unwrap()))
                .collect::<HeaderMap>(),
        );
        assert_eq!(String::from_utf8(request.body().clone()).unwrap(), request_body);

        Ok(clone_response(&response))
    }
}

fn state_param(url: &Url) -> String {
    url.query_pairs()
        .find(|(key, _)| key == "state")
        .map(|(_, value)| value.into_owned())
        .unwrap()
}

#[test]
fn test_authorize_url() {
    let (url, _) = new_client()
        .authorize_url(|| CsrfToken::new("csrf_token".to_string()))
        .add_scope(Scope::LiteProfile)
        .url()
        .unwrap();

    assert_eq!(
        Url::parse(
            "https://www.linkedin.com/oauth/v2/authorization\
             ?response_type=code\
             &client_id=aaa\
             &state=csrf_token\
             &redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Fcallback\
             &scope=r_liteprofile"
        )
        .unwrap(),
        url
    );
}

#[test]
fn test_authorize_url_with_scopes() {
    let (url, _) = new_client()
        .authorize_url(|| CsrfToken::new("csrf_token".to_string()))
        .add_scopes([Scope::LiteProfile, Scope::EmailAddress, Scope::MemberSocial])
        .url()
        .unwrap();

    assert_eq!(
        Url::parse(
            "https://www.linkedin.com/oauth/v2/authorization\
             ?response_type=code\
             &client_id=aaa\
             &state=csrf_token\
             &redirect_uri=https%3A%2F%2Fexample.com%2Foauth%2Fcallback\
             &scope=r_liteprofile+r_emailaddress+w_member_social"
        )
        .unwrap(),
        url
    );
}

#[test]
fn test_authorize_url_scope_order_is_caller_supplied() {
    let (url, _) = new_client()
        .authorize_url(|| CsrfToken::new("csrf_token".to_string()))
        .add_scope(Scope::EmailAddress)
        .add_scope(Scope::LiteProfile)
        .url()
        .unwrap();

    let scope = url
        .query_pairs()
        .find(|(key, _)| key == "scope")
        .map(|(_, value)| value.into_owned())
        .unwrap();
    assert_eq!("r_emailaddress r_liteprofile", scope);
}

#[test]
fn test_authorize_random_state_is_fresh_per_request() {
    let client = new_client();

    let (url, csrf_state) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::LiteProfile)
        .url()
        .unwrap();
    let (other_url, other_state) = client
        .authorize_url(CsrfToken::new_random)
        .add_scope(Scope::LiteProfile)
        .url()
        .unwrap();

    // The URL's state parameter carries the returned token.
    assert_eq!(&state_param(&url), csrf_state.secret());
    assert_eq!(&state_param(&other_url), other_state.secret());

    assert_ne!(csrf_state.secret(), other_state.secret());
}

#[test]
fn test_authorize_url_without_scopes_is_rejected() {
    let err = new_client()
        .authorize_url(|| CsrfToken::new("csrf_token".to_string()))
        .url()
        .unwrap_err();

    assert_eq!(ConfigurationError::MissingScopes, err);
}

#[test]
fn test_authorize_url_without_redirect_uri_is_rejected() {
    let err = Client::new(ClientId::new("aaa".to_string()))
        .authorize_url(|| CsrfToken::new("csrf_token".to_string()))
        .add_scope(Scope::LiteProfile)
        .url()
        .unwrap_err();

    assert_eq!(ConfigurationError::Missing("redirect_uri"), err);
}

#[test]
fn test_authorize_url_with_empty_client_id_is_rejected() {
    let err = Client::new(ClientId::new(String::new()))
        .set_redirect_uri(
            RedirectUrl::new("https://example.com/oauth/callback".to_string()).unwrap(),
        )
        .authorize_url(|| CsrfToken::new("csrf_token".to_string()))
        .add_scope(Scope::LiteProfile)
        .url()
        .unwrap_err();

    assert_eq!(ConfigurationError::Empty("client_id"), err);
}

#[test]
fn test_csrf_token_verify() {
    let state = CsrfToken::new("expected".to_string());

    assert!(state.verify("expected"));
    assert!(!state.verify("unexpected"));
    assert!(!state.verify(""));
    assert!(!state.verify("expected "));
}

#[test]
fn test_scope_strings() {
    assert_eq!("r_emailaddress", Scope::EmailAddress.as_str());
    assert_eq!("r_basicprofile", Scope::BasicProfile.as_str());
    assert_eq!("r_liteprofile", Scope::LiteProfile.as_str());
    assert_eq!("w_share", Scope::Share.as_str());
    assert_eq!("rw_company_admin", Scope::CompanyAdmin.as_str());
    assert_eq!("w_member_social", Scope::MemberSocial.as_str());
}

fn new_interceptor() -> RedirectInterceptor {
    RedirectInterceptor::new(
        RedirectUrl::new("https://example.com/oauth/callback".to_string()).unwrap(),
        CsrfToken::new("csrf_token".to_string()),
    )
}

#[test]
fn test_intercept_passes_through_unrelated_navigation() {
    let mut interceptor = new_interceptor();

    assert!(matches!(
        interceptor.intercept("https://www.linkedin.com/checkpoint/lg/login"),
        NavigationDecision::PassThrough
    ));
    assert!(!interceptor.is_completed());
}

#[test]
fn test_intercept_extracts_code() {
    let mut interceptor = new_interceptor();

    let decision =
        interceptor.intercept("https://example.com/oauth/callback?code=ccc&state=csrf_token");
    match decision {
        NavigationDecision::Completed(Ok(code)) => assert_eq!("ccc", code.secret()),
        other => panic!("expected a successful completion, got {other:?}"),
    }
    assert!(interceptor.is_completed());
}

#[test]
fn test_intercept_provider_error_wins_over_other_parameters() {
    let mut interceptor = new_interceptor();

    let decision = interceptor.intercept(
        "https://example.com/oauth/callback\
         ?error=access_denied&error_description=User+denied&code=ccc&state=bogus",
    );
    match decision {
        NavigationDecision::Completed(Err(RedirectError::Provider { error, description })) => {
            assert_eq!("access_denied", error);
            assert_eq!("User denied", description);
        }
        other => panic!("expected a provider error, got {other:?}"),
    }
}

#[test]
fn test_intercept_provider_error_without_description() {
    let mut interceptor = new_interceptor();

    let decision =
        interceptor.intercept("https://example.com/oauth/callback?error=access_denied");
    match decision {
        NavigationDecision::Completed(Err(RedirectError::Provider { error, description })) => {
            assert_eq!("access_denied", error);
            assert_eq!("", description);
        }
        other => panic!("expected a provider error, got {other:?}"),
    }
}

#[test]
fn test_intercept_state_mismatch() {
    let mut interceptor = new_interceptor();

    let decision =
        interceptor.intercept("https://example.com/oauth/callback?code=ccc&state=forged");
    assert!(matches!(
        decision,
        NavigationDecision::Completed(Err(RedirectError::StateMismatch))
    ));
}

#[test]
fn test_intercept_missing_state_skips_csrf_check() {
    let mut interceptor = new_interceptor();

    let decision = interceptor.intercept("https://example.com/oauth/callback?code=ccc");
    match decision {
        NavigationDecision::Completed(Ok(code)) => assert_eq!("ccc", code.secret()),
        other => panic!("expected a successful completion, got {other:?}"),
    }
}

#[test]
fn test_intercept_redirect_without_code_or_error() {
    let mut interceptor = new_interceptor();

    let decision = interceptor.intercept("https://example.com/oauth/callback?foo=bar");
    assert!(matches!(
        decision,
        NavigationDecision::Completed(Err(RedirectError::MissingCode))
    ));
}

#[test]
fn test_intercept_is_terminal_after_completion() {
    let mut interceptor = new_interceptor();

    interceptor.intercept("https://example.com/oauth/callback?code=ccc&state=csrf_token");
    assert!(interceptor.is_completed());

    assert!(matches!(
        interceptor.intercept("https://example.com/oauth/callback?code=ddd&state=csrf_token"),
        NavigationDecision::PassThrough
    ));
}

#[test]
fn test_classify_redirect_ignores_other_urls() {
    let redirect_url = RedirectUrl::new("https://example.com/oauth/callback".to_string()).unwrap();
    let state = CsrfToken::new("csrf_token".to_string());

    assert!(classify_redirect(
        &Url::parse("https://example.com/other?code=ccc").unwrap(),
        &redirect_url,
        &state,
    )
    .is_none());

    let outcome = classify_redirect(
        &Url::parse("https://example.com/oauth/callback?code=ccc").unwrap(),
        &redirect_url,
        &state,
    );
    assert_eq!("ccc", outcome.unwrap().unwrap().secret());
}
