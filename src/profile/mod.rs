use crate::endpoint::{bearer_get_request, endpoint_response};
use crate::{
    AccessToken, AsyncHttpClient, HttpRequest, ProfileFetchError, SyncHttpClient, EMAIL_ENDPOINT,
    PROFILE_ENDPOINT,
};

use serde::{Deserialize, Serialize};
use url::Url;

use std::collections::BTreeMap;
use std::error::Error;
use std::future::Future;

#[cfg(test)]
mod tests;

// Projections select which nested fields of a resource the provider returns.
const EMAIL_PROJECTION_QUERY: &str = "q=members&projection=(elements*(handle~))";
const DISPLAY_IMAGE_PROJECTION_QUERY: &str =
    "projection=(id,profilePicture(displayImage~:playableStreams))";

const EMAIL_ADDRESS_PATH: &str = "elements[0].handle~.emailAddress";
const DISPLAY_IMAGE_IDENTIFIER_PATH: &str =
    "profilePicture.displayImage~.elements[0].identifiers[0].identifier";

///
/// A profile field in the member's preferred locale.
///
#[derive(Clone, Debug, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct LocalizedString {
    /// Field text in the selected language.
    pub text: String,
    /// Two-letter language code the text was selected for, e.g. `en`.
    pub language: String,
}

///
/// Opaque reference to the member's profile picture.
///
/// The URN alone cannot be rendered; [`Client::resolve_display_image`](crate::Client::resolve_display_image)
/// resolves it to a fetchable URL and memoizes the result on this instance. The memo
/// is owned exclusively by this instance and is not shared across clones.
///
#[derive(Clone, Debug, PartialEq, Eq, Deserialize, Serialize)]
pub struct ImageReference {
    urn: String,
    #[serde(skip)]
    display_url: Option<String>,
}
impl ImageReference {
    /// Create a new `ImageReference` wrapping the given URN.
    pub fn new(urn: String) -> Self {
        Self {
            urn,
            display_url: None,
        }
    }

    /// The opaque `displayImage` reference string from the profile response.
    pub fn urn(&self) -> &str {
        &self.urn
    }

    /// The resolved display URL, or `None` until a resolution succeeds.
    pub fn display_url(&self) -> Option<&str> {
        self.display_url.as_deref()
    }
}

///
/// Member profile available to the `r_liteprofile` scope.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LiteProfile {
    /// Provider-assigned member identifier.
    pub id: String,
    /// Localized first name.
    pub first_name: LocalizedString,
    /// Localized last name.
    pub last_name: LocalizedString,
    /// Localized maiden name; empty when the member has none on file.
    pub maiden_name: LocalizedString,
    /// Reference to the member's profile picture.
    pub profile_picture: ImageReference,
}

///
/// Member profile available to the `r_basicprofile` scope: everything in
/// [`LiteProfile`] plus the headline, pre-flattened localized names, and the
/// member's vanity name.
///
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BasicProfile {
    /// Provider-assigned member identifier.
    pub id: String,
    /// Localized first name.
    pub first_name: LocalizedString,
    /// Localized last name.
    pub last_name: LocalizedString,
    /// Localized maiden name; empty when the member has none on file.
    pub maiden_name: LocalizedString,
    /// First name already flattened to the preferred locale by the provider.
    pub localized_first_name: String,
    /// Last name already flattened to the preferred locale by the provider.
    pub localized_last_name: String,
    /// Localized profile headline.
    pub headline: LocalizedString,
    /// Member's public profile handle, e.g. the `jane-doe` of
    /// `linkedin.com/in/jane-doe`.
    pub vanity_name: String,
    /// Reference to the member's profile picture.
    pub profile_picture: ImageReference,
}

// Wire shape of a multi-locale field: a language-keyed map plus the member's
// preferred locale. BTreeMap keeps the multiple-keys fallback deterministic.
#[derive(Debug, Deserialize)]
pub(crate) struct MultiLocaleString {
    localized: BTreeMap<String, String>,
    #[serde(rename = "preferredLocale")]
    preferred_locale: PreferredLocale,
}
#[derive(Debug, Deserialize)]
struct PreferredLocale {
    country: String,
    language: String,
}
impl MultiLocaleString {
    // Selects the entry keyed by the preferred locale (e.g. `en_US`), falling back
    // to the map's first entry when that key is absent.
    fn resolve(self) -> LocalizedString {
        let preferred_key = format!(
            "{}_{}",
            self.preferred_locale.language, self.preferred_locale.country
        );
        if let Some(text) = self.localized.get(&preferred_key) {
            return LocalizedString {
                text: text.clone(),
                language: self.preferred_locale.language,
            };
        }
        match self.localized.into_iter().next() {
            Some((key, text)) => LocalizedString {
                language: key.split('_').next().unwrap_or_default().to_string(),
                text,
            },
            None => LocalizedString::default(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct ProfilePicture {
    #[serde(rename = "displayImage")]
    display_image: String,
}
impl From<ProfilePicture> for ImageReference {
    fn from(picture: ProfilePicture) -> Self {
        ImageReference::new(picture.display_image)
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct LiteProfileResponse {
    id: String,
    #[serde(rename = "firstName")]
    first_name: MultiLocaleString,
    #[serde(rename = "lastName")]
    last_name: MultiLocaleString,
    #[serde(rename = "maidenName", default)]
    maiden_name: Option<MultiLocaleString>,
    #[serde(rename = "profilePicture")]
    profile_picture: ProfilePicture,
}
impl LiteProfileResponse {
    fn into_profile(self) -> LiteProfile {
        LiteProfile {
            id: self.id,
            first_name: self.first_name.resolve(),
            last_name: self.last_name.resolve(),
            maiden_name: self
                .maiden_name
                .map(MultiLocaleString::resolve)
                .unwrap_or_default(),
            profile_picture: self.profile_picture.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
pub(crate) struct BasicProfileResponse {
    id: String,
    #[serde(rename = "firstName")]
    first_name: MultiLocaleString,
    #[serde(rename = "lastName")]
    last_name: MultiLocaleString,
    #[serde(rename = "maidenName", default)]
    maiden_name: Option<MultiLocaleString>,
    #[serde(rename = "localizedFirstName")]
    localized_first_name: String,
    #[serde(rename = "localizedLastName")]
    localized_last_name: String,
    headline: MultiLocaleString,
    #[serde(rename = "vanityName")]
    vanity_name: String,
    #[serde(rename = "profilePicture")]
    profile_picture: ProfilePicture,
}
impl BasicProfileResponse {
    fn into_profile(self) -> BasicProfile {
        BasicProfile {
            id: self.id,
            first_name: self.first_name.resolve(),
            last_name: self.last_name.resolve(),
            maiden_name: self
                .maiden_name
                .map(MultiLocaleString::resolve)
                .unwrap_or_default(),
            localized_first_name: self.localized_first_name,
            localized_last_name: self.localized_last_name,
            headline: self.headline.resolve(),
            vanity_name: self.vanity_name,
            profile_picture: self.profile_picture.into(),
        }
    }
}

#[derive(Debug, Deserialize)]
struct EmailAddressResponse {
    #[serde(default)]
    elements: Vec<EmailElement>,
}
#[derive(Debug, Deserialize)]
struct EmailElement {
    #[serde(rename = "handle~", default)]
    handle: Option<EmailHandle>,
}
#[derive(Debug, Deserialize)]
struct EmailHandle {
    #[serde(rename = "emailAddress")]
    email_address: String,
}
impl EmailAddressResponse {
    fn into_email_address(self) -> Option<String> {
        self.elements
            .into_iter()
            .next()?
            .handle
            .map(|handle| handle.email_address)
    }
}

#[derive(Debug, Deserialize)]
struct DisplayImageResponse {
    #[serde(rename = "profilePicture", default)]
    profile_picture: Option<ProjectedPicture>,
}
#[derive(Debug, Deserialize)]
struct ProjectedPicture {
    #[serde(rename = "displayImage~", default)]
    display_image: Option<PlayableStreams>,
}
#[derive(Debug, Deserialize)]
struct PlayableStreams {
    #[serde(default)]
    elements: Vec<StreamElement>,
}
#[derive(Debug, Deserialize)]
struct StreamElement {
    #[serde(default)]
    identifiers: Vec<StreamIdentifier>,
}
#[derive(Debug, Deserialize)]
struct StreamIdentifier {
    identifier: String,
}
impl DisplayImageResponse {
    fn into_identifier(self) -> Option<String> {
        self.profile_picture?
            .display_image?
            .elements
            .into_iter()
            .next()?
            .identifiers
            .into_iter()
            .next()
            .map(|id| id.identifier)
    }
}

fn profile_url() -> Url {
    Url::parse(PROFILE_ENDPOINT).expect("profile endpoint is a valid static URL")
}

fn prepare_bearer_get<RE>(
    url: &Url,
    access_token: &AccessToken,
) -> Result<HttpRequest, ProfileFetchError<RE>>
where
    RE: Error + 'static,
{
    bearer_get_request(url, access_token)
        .map_err(|err| ProfileFetchError::Other(format!("failed to prepare request: {err}")))
}

/// A request to fetch the member's [`LiteProfile`].
pub struct LiteProfileRequest<'a> {
    pub(crate) access_token: &'a AccessToken,
}
impl<'a> LiteProfileRequest<'a> {
    fn prepare_request<RE>(&self) -> Result<HttpRequest, ProfileFetchError<RE>>
    where
        RE: Error + 'static,
    {
        prepare_bearer_get(&profile_url(), self.access_token)
    }

    /// Synchronously sends the request to the profile endpoint and awaits a response.
    pub fn request<C>(self, http_client: &C) -> Result<LiteProfile, ProfileFetchError<C::Error>>
    where
        C: SyncHttpClient,
    {
        let response = http_client
            .call(self.prepare_request()?)
            .map_err(ProfileFetchError::Request)?;
        Ok(endpoint_response::<LiteProfileResponse>(response)?.into_profile())
    }

    /// Asynchronously sends the request to the profile endpoint and returns a Future.
    pub fn request_async<'c, C>(
        self,
        http_client: &'c C,
    ) -> impl Future<Output = Result<LiteProfile, ProfileFetchError<<C as AsyncHttpClient<'c>>::Error>>>
           + 'c
    where
        Self: 'c,
        C: AsyncHttpClient<'c>,
    {
        Box::pin(async move {
            let response = http_client
                .call(self.prepare_request()?)
                .await
                .map_err(ProfileFetchError::Request)?;
            Ok(endpoint_response::<LiteProfileResponse>(response)?.into_profile())
        })
    }
}

/// A request to fetch the member's [`BasicProfile`].
pub struct BasicProfileRequest<'a> {
    pub(crate) access_token: &'a AccessToken,
}
impl<'a> BasicProfileRequest<'a> {
    fn prepare_request<RE>(&self) -> Result<HttpRequest, ProfileFetchError<RE>>
    where
        RE: Error + 'static,
    {
        prepare_bearer_get(&profile_url(), self.access_token)
    }

    /// Synchronously sends the request to the profile endpoint and awaits a response.
    pub fn request<C>(self, http_client: &C) -> Result<BasicProfile, ProfileFetchError<C::Error>>
    where
        C: SyncHttpClient,
    {
        let response = http_client
            .call(self.prepare_request()?)
            .map_err(ProfileFetchError::Request)?;
        Ok(endpoint_response::<BasicProfileResponse>(response)?.into_profile())
    }

    /// Asynchronously sends the request to the profile endpoint and returns a Future.
    pub fn request_async<'c, C>(
        self,
        http_client: &'c C,
    ) -> impl Future<Output = Result<BasicProfile, ProfileFetchError<<C as AsyncHttpClient<'c>>::Error>>>
           + 'c
    where
        Self: 'c,
        C: AsyncHttpClient<'c>,
    {
        Box::pin(async move {
            let response = http_client
                .call(self.prepare_request()?)
                .await
                .map_err(ProfileFetchError::Request)?;
            Ok(endpoint_response::<BasicProfileResponse>(response)?.into_profile())
        })
    }
}

/// A request to fetch the member's primary email address.
pub struct EmailAddressRequest<'a> {
    pub(crate) access_token: &'a AccessToken,
}
impl<'a> EmailAddressRequest<'a> {
    fn prepare_request<RE>(&self) -> Result<HttpRequest, ProfileFetchError<RE>>
    where
        RE: Error + 'static,
    {
        let mut url =
            Url::parse(EMAIL_ENDPOINT).expect("email endpoint is a valid static URL");
        url.set_query(Some(EMAIL_PROJECTION_QUERY));
        prepare_bearer_get(&url, self.access_token)
    }

    /// Synchronously sends the request to the email endpoint and awaits a response.
    pub fn request<C>(self, http_client: &C) -> Result<String, ProfileFetchError<C::Error>>
    where
        C: SyncHttpClient,
    {
        let response = http_client
            .call(self.prepare_request()?)
            .map_err(ProfileFetchError::Request)?;
        endpoint_response::<EmailAddressResponse>(response)?
            .into_email_address()
            .ok_or(ProfileFetchError::MissingField(EMAIL_ADDRESS_PATH))
    }

    /// Asynchronously sends the request to the email endpoint and returns a Future.
    pub fn request_async<'c, C>(
        self,
        http_client: &'c C,
    ) -> impl Future<Output = Result<String, ProfileFetchError<<C as AsyncHttpClient<'c>>::Error>>> + 'c
    where
        Self: 'c,
        C: AsyncHttpClient<'c>,
    {
        Box::pin(async move {
            let response = http_client
                .call(self.prepare_request()?)
                .await
                .map_err(ProfileFetchError::Request)?;
            endpoint_response::<EmailAddressResponse>(response)?
                .into_email_address()
                .ok_or(ProfileFetchError::MissingField(EMAIL_ADDRESS_PATH))
        })
    }
}

/// A request to resolve the display URL behind an [`ImageReference`].
///
/// Resolution is memoized: a reference that already carries a display URL answers
/// from the memo without performing any I/O, and the memo is not re-validated
/// against the supplied token.
pub struct DisplayImageRequest<'a> {
    pub(crate) image: &'a mut ImageReference,
    pub(crate) access_token: &'a AccessToken,
}
impl<'a> DisplayImageRequest<'a> {
    fn prepare_request<RE>(&self) -> Result<HttpRequest, ProfileFetchError<RE>>
    where
        RE: Error + 'static,
    {
        let mut url = profile_url();
        url.set_query(Some(DISPLAY_IMAGE_PROJECTION_QUERY));
        prepare_bearer_get(&url, self.access_token)
    }

    /// Synchronously resolves the display URL, consulting the memo first.
    pub fn request<C>(self, http_client: &C) -> Result<String, ProfileFetchError<C::Error>>
    where
        C: SyncHttpClient,
    {
        if let Some(resolved) = self.image.display_url.clone() {
            return Ok(resolved);
        }
        let response = http_client
            .call(self.prepare_request()?)
            .map_err(ProfileFetchError::Request)?;
        let identifier = endpoint_response::<DisplayImageResponse>(response)?
            .into_identifier()
            .ok_or(ProfileFetchError::MissingField(
                DISPLAY_IMAGE_IDENTIFIER_PATH,
            ))?;
        self.image.display_url = Some(identifier.clone());
        Ok(identifier)
    }

    /// Asynchronously resolves the display URL, consulting the memo first.
    pub fn request_async<'c, C>(
        self,
        http_client: &'c C,
    ) -> impl Future<Output = Result<String, ProfileFetchError<<C as AsyncHttpClient<'c>>::Error>>> + 'c
    where
        Self: 'c,
        C: AsyncHttpClient<'c>,
    {
        Box::pin(async move {
            if let Some(resolved) = self.image.display_url.clone() {
                return Ok(resolved);
            }
            let response = http_client
                .call(self.prepare_request()?)
                .await
                .map_err(ProfileFetchError::Request)?;
            let identifier = endpoint_response::<DisplayImageResponse>(response)?
                .into_identifier()
                .ok_or(ProfileFetchError::MissingField(
                    DISPLAY_IMAGE_IDENTIFIER_PATH,
                ))?;
            self.image.display_url = Some(identifier.clone());
            Ok(identifier)
        })
    }
}
