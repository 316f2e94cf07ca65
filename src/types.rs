use std::fmt::Error as FormatterError;
use std::fmt::{Debug, Display, Formatter};
use std::ops::Deref;

use base64::prelude::*;
use rand::{thread_rng, Rng};
use url::Url;

use crate::helpers;

macro_rules! new_type {
    // Convenience pattern without an impl.
    (
        $(#[$attr:meta])*
        $name:ident(
            $(#[$type_attr:meta])*
            $type:ty
        )
    ) => {
        new_type![
            @new_type $(#[$attr])*,
            $name(
                $(#[$type_attr])*
                $type
            ),
            concat!(
                "Create a new `",
                stringify!($name),
                "` to wrap the given `",
                stringify!($type),
                "`."
            ),
            impl {}
        ];
    };
    // Main entry point with an impl.
    (
        $(#[$attr:meta])*
        $name:ident(
            $(#[$type_attr:meta])*
            $type:ty
        )
        impl {
            $($item:tt)*
        }
    ) => {
        new_type![
            @new_type $(#[$attr])*,
            $name(
                $(#[$type_attr])*
                $type
            ),
            concat!(
                "Create a new `",
                stringify!($name),
                "` to wrap the given `",
                stringify!($type),
                "`."
            ),
            impl {
                $($item)*
            }
        ];
    };
    // Actual implementation, after stringifying the #[doc] attr.
    (
        @new_type $(#[$attr:meta])*,
        $name:ident(
            $(#[$type_attr:meta])*
            $type:ty
        ),
        $new_doc:expr,
        impl {
            $($item:tt)*
        }
    ) => {
        $(#[$attr])*
        #[derive(Clone, Debug, PartialEq)]
        pub struct $name(
            $(#[$type_attr])*
            $type
        );
        impl $name {
            $($item)*

            #[doc = $new_doc]
            pub fn new(s: $type) -> Self {
                $name(s)
            }
        }
        impl Deref for $name {
            type Target = $type;
            fn deref(&self) -> &$type {
                &self.0
            }
        }
        impl From<$name> for $type {
            fn from(t: $name) -> $type {
                t.0
            }
        }
    }
}

macro_rules! new_secret_type {
    (
        $(#[$attr:meta])*
        $name:ident($type:ty)
    ) => {
        new_secret_type![
            $(#[$attr])*
            $name($type)
            impl {}
        ];
    };
    (
        $(#[$attr:meta])*
        $name:ident($type:ty)
        impl {
            $($item:tt)*
        }
    ) => {
        new_secret_type![
            $(#[$attr])*,
            $name($type),
            concat!(
                "Create a new `",
                stringify!($name),
                "` to wrap the given `",
                stringify!($type),
                "`."
            ),
            concat!("Get the secret contained within this `", stringify!($name), "`."),
            impl {
                $($item)*
            }
        ];
    };
    (
        $(#[$attr:meta])*,
        $name:ident($type:ty),
        $new_doc:expr,
        $secret_doc:expr,
        impl {
            $($item:tt)*
        }
    ) => {
        $(
            #[$attr]
        )*
        pub struct $name($type);
        impl $name {
            $($item)*

            #[doc = $new_doc]
            pub fn new(s: $type) -> Self {
                $name(s)
            }
            ///
            #[doc = $secret_doc]
            ///
            /// # Security Warning
            ///
            /// Leaking this value may compromise the security of the OAuth2 flow.
            ///
            pub fn secret(&self) -> &$type { &self.0 }
        }
        impl Debug for $name {
            fn fmt(&self, f: &mut Formatter) -> Result<(), FormatterError> {
                write!(f, concat!(stringify!($name), "([redacted])"))
            }
        }
    };
}

new_type![
    ///
    /// Client identifier issued by LinkedIn when the application is registered in the
    /// [developer portal](https://www.linkedin.com/developers/apps).
    ///
    #[derive(serde::Deserialize, serde::Serialize, Eq, Hash)]
    ClientId(String)
];

new_secret_type![
    ///
    /// Client password issued alongside the [`ClientId`] during application registration.
    ///
    /// Only required for the local code-for-token exchange; applications delegating the
    /// exchange to their own backend keep the secret off the device entirely.
    ///
    #[derive(Clone, serde::Deserialize, serde::Serialize)]
    ClientSecret(String)
];

new_secret_type![
    ///
    /// Value used for [CSRF](https://tools.ietf.org/html/rfc6749#section-10.12) protection
    /// via the `state` parameter.
    ///
    #[must_use]
    #[derive(Clone, serde::Deserialize, serde::Serialize)]
    CsrfToken(String)
    impl {
        ///
        /// Generate a new random, base64-encoded 128-bit CSRF token.
        ///
        pub fn new_random() -> Self {
            CsrfToken::new_random_len(16)
        }
        ///
        /// Generate a new random, base64-encoded CSRF token of the specified length.
        ///
        /// # Arguments
        ///
        /// * `num_bytes` - Number of random bytes to generate, prior to base64-encoding.
        ///
        pub fn new_random_len(num_bytes: u32) -> Self {
            let random_bytes: Vec<u8> = (0..num_bytes).map(|_| thread_rng().gen::<u8>()).collect();
            CsrfToken::new(BASE64_URL_SAFE_NO_PAD.encode(random_bytes))
        }
        ///
        /// Returns true iff `candidate` equals the state generated for the pending
        /// authorization request.
        ///
        pub fn verify(&self, candidate: &str) -> bool {
            self.0 == candidate
        }
    }
];

new_secret_type![
    ///
    /// Authorization code appended to the redirect URI after the member approves the
    /// authorization request.
    ///
    #[derive(Clone, serde::Deserialize, serde::Serialize)]
    AuthorizationCode(String)
];

new_secret_type![
    ///
    /// Access token returned by the token endpoint and sent as a bearer credential to
    /// the profile, email address, and image endpoints.
    ///
    #[derive(Clone, serde::Deserialize, serde::Serialize)]
    AccessToken(String)
];

///
/// URL of the client's redirection endpoint, as registered with LinkedIn.
///
/// The provider appends `code`/`state` (or `error`/`error_description`) query
/// parameters to this URL; the redirect interceptor matches candidate navigations
/// against it by prefix.
///
#[derive(Clone, Debug, PartialEq, Eq, serde::Deserialize, serde::Serialize)]
pub struct RedirectUrl(
    #[serde(
        deserialize_with = "helpers::deserialize_url",
        serialize_with = "helpers::serialize_url"
    )]
    Url,
);
impl RedirectUrl {
    /// Create a new `RedirectUrl` from a URL string.
    pub fn new(url: String) -> Result<Self, url::ParseError> {
        Url::parse(&url).map(RedirectUrl)
    }

    /// Create a new `RedirectUrl` from an already-parsed [`Url`].
    pub fn from_url(url: Url) -> Self {
        RedirectUrl(url)
    }

    /// Return this URL as a parsed [`Url`].
    pub fn url(&self) -> &Url {
        &self.0
    }

    /// Return this URL as a string slice.
    pub fn as_str(&self) -> &str {
        self.0.as_str()
    }
}

///
/// Access token scope, drawn from the closed set of permissions LinkedIn grants to
/// Sign In applications.
///
/// Each variant maps to exactly one provider scope string; free-form scope strings
/// are rejected by construction.
///
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Scope {
    /// `r_emailaddress`: read the member's primary email address.
    EmailAddress,
    /// `r_basicprofile`: read the member's full basic profile (headline, vanity
    /// name). Requires elevated application approval.
    BasicProfile,
    /// `r_liteprofile`: read the member's lite profile (name and picture).
    LiteProfile,
    /// `w_share`: post shares on the member's behalf.
    Share,
    /// `rw_company_admin`: manage company pages the member administers.
    CompanyAdmin,
    /// `w_member_social`: post, comment, and like on the member's behalf.
    MemberSocial,
}
impl Scope {
    /// Returns the provider scope string sent in the `scope` query parameter.
    pub fn as_str(self) -> &'static str {
        match self {
            Scope::EmailAddress => "r_emailaddress",
            Scope::BasicProfile => "r_basicprofile",
            Scope::LiteProfile => "r_liteprofile",
            Scope::Share => "w_share",
            Scope::CompanyAdmin => "rw_company_admin",
            Scope::MemberSocial => "w_member_social",
        }
    }
}
impl AsRef<str> for Scope {
    fn as_ref(&self) -> &str {
        self.as_str()
    }
}
impl Display for Scope {
    fn fmt(&self, f: &mut Formatter) -> Result<(), FormatterError> {
        write!(f, "{}", self.as_str())
    }
}
