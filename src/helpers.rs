use serde::{Deserialize, Deserializer, Serializer};
use url::Url;

///
/// Serde string deserializer for a `Url`.
///
pub fn deserialize_url<'de, D>(deserializer: D) -> Result<Url, D::Error>
where
    D: Deserializer<'de>,
{
    let url_str = String::deserialize(deserializer)?;
    Url::parse(url_str.as_ref()).map_err(serde::de::Error::custom)
}

///
/// Serde string serializer for a `Url`.
///
pub fn serialize_url<S>(url: &Url, serializer: S) -> Result<S::Ok, S::Error>
where
    S: Serializer,
{
    serializer.serialize_str(url.as_str())
}
