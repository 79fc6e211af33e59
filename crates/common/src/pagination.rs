//! List query parameters shared by every list endpoint.

use serde::{Deserialize, Deserializer, Serialize};
use validator::Validate;

pub const MIN_PAGE: u64 = 1;
pub const MAX_PAGE: u64 = 10_000;
pub const MIN_PAGE_SIZE: u64 = 1;
pub const MAX_PAGE_SIZE: u64 = 10_000;
pub const DEFAULT_PAGE_SIZE: u64 = 10;
pub const INPUT_TEXT_MAX_LENGTH: u64 = 255;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum OrderDirection {
    #[default]
    Asc,
    Desc,
}

/// `?page=&limit=&keyword=&orderBy=&orderDirection=`
///
/// Empty strings are treated as absent, mirroring what browser forms send.
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct ListQuery {
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 1, max = 10000))]
    pub page: Option<u64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(range(min = 1, max = 10000))]
    pub limit: Option<u64>,
    #[serde(default, deserialize_with = "empty_as_none")]
    #[validate(length(max = 255))]
    pub keyword: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub order_by: Option<String>,
    #[serde(default, deserialize_with = "empty_as_none")]
    pub order_direction: Option<OrderDirection>,
}

impl ListQuery {
    pub fn page(&self) -> u64 { self.page.unwrap_or(MIN_PAGE).clamp(MIN_PAGE, MAX_PAGE) }

    pub fn limit(&self) -> u64 { self.limit.unwrap_or(DEFAULT_PAGE_SIZE).clamp(MIN_PAGE_SIZE, MAX_PAGE_SIZE) }

    /// Trimmed keyword, `None` when blank.
    pub fn keyword(&self) -> Option<&str> {
        self.keyword.as_deref().map(str::trim).filter(|k| !k.is_empty())
    }

    pub fn direction(&self) -> OrderDirection { self.order_direction.unwrap_or_default() }

    /// `orderBy` checked against the columns a module allows, falling back to the first.
    pub fn order_by_or<'a>(&self, allowed: &'a [&'a str]) -> Result<&'a str, String> {
        match self.order_by.as_deref() {
            None => Ok(allowed.first().copied().unwrap_or("createdAt")),
            Some(v) => allowed
                .iter()
                .copied()
                .find(|a| *a == v)
                .ok_or_else(|| format!("orderBy must be one of {}", allowed.join(", "))),
        }
    }
}

/// Deserialize `""` as `None` and otherwise parse the string form of `T`.
pub fn empty_as_none<'de, D, T>(de: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(de)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

impl std::str::FromStr for OrderDirection {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "asc" => Ok(Self::Asc),
            "desc" => Ok(Self::Desc),
            other => Err(format!("invalid orderDirection `{other}`")),
        }
    }
}
