use crate::tests::{clone_response, json_response, mock_http_client, new_client, FakeError};
use crate::{AccessToken, HttpRequest, ImageReference, LocalizedString, ProfileFetchError};

use http::header::{ACCEPT, AUTHORIZATION};
use http::status::StatusCode;

use std::cell::Cell;

const LITE_PROFILE_BODY: &str = r#"{
    "id": "yrZCpj2ZYQ",
    "firstName": {
        "localized": {"en_US": "Bob"},
        "preferredLocale": {"country": "US", "language": "en"}
    },
    "lastName": {
        "localized": {"en_US": "Smith"},
        "preferredLocale": {"country": "US", "language": "en"}
    },
    "profilePicture": {
        "displayImage": "urn:li:digitalmediaAsset:C4D00AAAAbBCDEFGhiJ"
    }
}"#;

fn bearer_headers() -> Vec<(http::header::HeaderName, &'static str)> {
    vec![(ACCEPT, "application/json"), (AUTHORIZATION, "Bearer token123")]
}

fn access_token() -> AccessToken {
    AccessToken::new("token123".to_string())
}

#[test]
fn test_fetch_lite_profile() {
    let profile = new_client()
        .lite_profile(&access_token())
        .request(&mock_http_client(
            bearer_headers(),
            "",
            "https://api.linkedin.com/v2/me",
            json_response(StatusCode::OK, LITE_PROFILE_BODY),
        ))
        .unwrap();

    assert_eq!("yrZCpj2ZYQ", profile.id);
    assert_eq!(
        LocalizedString {
            text: "Bob".to_string(),
            language: "en".to_string(),
        },
        profile.first_name
    );
    assert_eq!("Smith", profile.last_name.text);
    // No maiden name on file parses as the empty localized string.
    assert_eq!(LocalizedString::default(), profile.maiden_name);
    assert_eq!(
        "urn:li:digitalmediaAsset:C4D00AAAAbBCDEFGhiJ",
        profile.profile_picture.urn()
    );
    assert!(profile.profile_picture.display_url().is_none());
}

#[tokio::test]
async fn test_fetch_lite_profile_async() {
    let http_response = json_response(StatusCode::OK, LITE_PROFILE_BODY);

    let profile = new_client()
        .lite_profile(&access_token())
        .request_async(&|_| async { Ok(clone_response(&http_response)) as Result<_, FakeError> })
        .await
        .unwrap();

    assert_eq!("Bob", profile.first_name.text);
}

#[test]
fn test_lite_profile_with_maiden_name() {
    let body = r#"{
        "id": "yrZCpj2ZYQ",
        "firstName": {
            "localized": {"en_US": "Bob"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "lastName": {
            "localized": {"en_US": "Smith"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "maidenName": {
            "localized": {"en_US": "Jones"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "profilePicture": {"displayImage": "urn:li:digitalmediaAsset:abc"}
    }"#;

    let profile = new_client()
        .lite_profile(&access_token())
        .request(&|_: HttpRequest| Ok::<_, FakeError>(json_response(StatusCode::OK, body)))
        .unwrap();

    assert_eq!("Jones", profile.maiden_name.text);
    assert_eq!("en", profile.maiden_name.language);
}

#[test]
fn test_localized_string_prefers_the_preferred_locale() {
    let body = r#"{
        "id": "yrZCpj2ZYQ",
        "firstName": {
            "localized": {"en_US": "Steven", "fr_FR": "Stephane"},
            "preferredLocale": {"country": "FR", "language": "fr"}
        },
        "lastName": {
            "localized": {"en_US": "Smith"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "profilePicture": {"displayImage": "urn:li:digitalmediaAsset:abc"}
    }"#;

    let profile = new_client()
        .lite_profile(&access_token())
        .request(&|_: HttpRequest| Ok::<_, FakeError>(json_response(StatusCode::OK, body)))
        .unwrap();

    assert_eq!("Stephane", profile.first_name.text);
    assert_eq!("fr", profile.first_name.language);
}

#[test]
fn test_localized_string_falls_back_to_the_first_entry() {
    // The preferred-locale key is absent; the first entry (deterministic order)
    // is used instead.
    let body = r#"{
        "id": "yrZCpj2ZYQ",
        "firstName": {
            "localized": {"fr_FR": "Stephane", "de_DE": "Stefan"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "lastName": {
            "localized": {"en_US": "Smith"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "profilePicture": {"displayImage": "urn:li:digitalmediaAsset:abc"}
    }"#;

    let profile = new_client()
        .lite_profile(&access_token())
        .request(&|_: HttpRequest| Ok::<_, FakeError>(json_response(StatusCode::OK, body)))
        .unwrap();

    assert_eq!("Stefan", profile.first_name.text);
    assert_eq!("de", profile.first_name.language);
}

#[test]
fn test_fetch_basic_profile() {
    let body = r#"{
        "id": "yrZCpj2ZYQ",
        "firstName": {
            "localized": {"en_US": "Bob"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "lastName": {
            "localized": {"en_US": "Smith"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "localizedFirstName": "Bob",
        "localizedLastName": "Smith",
        "headline": {
            "localized": {"en_US": "Staff Engineer"},
            "preferredLocale": {"country": "US", "language": "en"}
        },
        "vanityName": "bob-smith",
        "profilePicture": {"displayImage": "urn:li:digitalmediaAsset:abc"}
    }"#;

    let profile = new_client()
        .basic_profile(&access_token())
        .request(&mock_http_client(
            bearer_headers(),
            "",
            "https://api.linkedin.com/v2/me",
            json_response(StatusCode::OK, body),
        ))
        .unwrap();

    assert_eq!("Bob", profile.localized_first_name);
    assert_eq!("Smith", profile.localized_last_name);
    assert_eq!("Staff Engineer", profile.headline.text);
    assert_eq!("bob-smith", profile.vanity_name);
    assert_eq!(LocalizedString::default(), profile.maiden_name);
}

#[test]
fn test_basic_profile_without_elevated_scope_fails_parsing() {
    // With a lesser scope the provider omits the basic-profile fields entirely, so
    // the fetch surfaces a parse failure rather than a permission error.
    let err = new_client()
        .basic_profile(&access_token())
        .request(&|_: HttpRequest| {
            Ok::<_, FakeError>(json_response(StatusCode::OK, LITE_PROFILE_BODY))
        })
        .unwrap_err();

    assert!(matches!(err, ProfileFetchError::Parse(..)));
}

#[test]
fn test_profile_fetch_unauthorized() {
    let err = new_client()
        .lite_profile(&access_token())
        .request(&|_: HttpRequest| {
            Ok::<_, FakeError>(json_response(
                StatusCode::UNAUTHORIZED,
                "{\"message\":\"Invalid access token\",\"status\":401}",
            ))
        })
        .unwrap_err();

    match err {
        ProfileFetchError::ServerResponse { status, .. } => {
            assert_eq!(StatusCode::UNAUTHORIZED, status);
        }
        other => panic!("expected a server response error, got {other:?}"),
    }
}

#[test]
fn test_fetch_email_address() {
    let body = r#"{
        "elements": [
            {
                "handle": "urn:li:emailAddress:3775708763",
                "handle~": {"emailAddress": "bob@example.com"}
            }
        ]
    }"#;

    let email = new_client()
        .email_address(&access_token())
        .request(&mock_http_client(
            bearer_headers(),
            "",
            "https://api.linkedin.com/v2/emailAddress?q=members&projection=(elements*(handle~))",
            json_response(StatusCode::OK, body),
        ))
        .unwrap();

    assert_eq!("bob@example.com", email);
}

#[test]
fn test_email_address_missing_handle() {
    let err = new_client()
        .email_address(&access_token())
        .request(&|_: HttpRequest| {
            Ok::<_, FakeError>(json_response(
                StatusCode::OK,
                r#"{"elements": [{"handle": "urn:li:emailAddress:3775708763"}]}"#,
            ))
        })
        .unwrap_err();

    assert!(matches!(err, ProfileFetchError::MissingField(_)));
}

#[test]
fn test_email_address_without_elements() {
    let err = new_client()
        .email_address(&access_token())
        .request(&|_: HttpRequest| {
            Ok::<_, FakeError>(json_response(StatusCode::OK, r#"{"elements": []}"#))
        })
        .unwrap_err();

    assert!(matches!(err, ProfileFetchError::MissingField(_)));
}

const DISPLAY_IMAGE_BODY: &str = r#"{
    "id": "yrZCpj2ZYQ",
    "profilePicture": {
        "displayImage": "urn:li:digitalmediaAsset:abc",
        "displayImage~": {
            "elements": [
                {
                    "identifiers": [
                        {"identifier": "https://media.licdn.com/dms/image/abc/200_200"}
                    ]
                }
            ]
        }
    }
}"#;

#[test]
fn test_resolve_display_image_memoizes() {
    let client = new_client();
    let token = access_token();
    let mut image = ImageReference::new("urn:li:digitalmediaAsset:abc".to_string());

    let calls = Cell::new(0u32);
    let http_client = |request: HttpRequest| {
        calls.set(calls.get() + 1);
        assert_eq!(
            "https://api.linkedin.com/v2/me?projection=(id,profilePicture(displayImage~:playableStreams))",
            request.uri().to_string()
        );
        Ok::<_, FakeError>(json_response(StatusCode::OK, DISPLAY_IMAGE_BODY))
    };

    let url = client
        .resolve_display_image(&mut image, &token)
        .request(&http_client)
        .unwrap();
    assert_eq!("https://media.licdn.com/dms/image/abc/200_200", url);
    assert_eq!(
        Some("https://media.licdn.com/dms/image/abc/200_200"),
        image.display_url()
    );

    // The second resolution answers from the memo without touching the network.
    let memoized = client
        .resolve_display_image(&mut image, &token)
        .request(&http_client)
        .unwrap();
    assert_eq!(url, memoized);
    assert_eq!(1, calls.get());
}

#[test]
fn test_resolve_display_image_without_streams() {
    let mut image = ImageReference::new("urn:li:digitalmediaAsset:abc".to_string());

    let err = new_client()
        .resolve_display_image(&mut image, &access_token())
        .request(&|_: HttpRequest| {
            Ok::<_, FakeError>(json_response(
                StatusCode::OK,
                r#"{"id": "yrZCpj2ZYQ", "profilePicture": {"displayImage": "urn:li:digitalmediaAsset:abc"}}"#,
            ))
        })
        .unwrap_err();

    assert!(matches!(err, ProfileFetchError::MissingField(_)));
    assert!(image.display_url().is_none());
}
