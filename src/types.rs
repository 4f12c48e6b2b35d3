use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

static RATING_ORDER: [Rating; 4] = Rating::ALL;

/// Content-maturity rating. Declaration order is the filter order: a request
/// for `R` admits every rating up to and including `R`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Rating {
    #[serde(rename = "g")]
    G,
    #[serde(rename = "pg")]
    Pg,
    #[serde(rename = "pg-13")]
    Pg13,
    #[serde(rename = "r")]
    R,
}

impl Rating {
    pub const ALL: [Rating; 4] = [Rating::G, Rating::Pg, Rating::Pg13, Rating::R];

    pub fn as_str(self) -> &'static str {
        match self {
            Rating::G => "g",
            Rating::Pg => "pg",
            Rating::Pg13 => "pg-13",
            Rating::R => "r",
        }
    }

    /// Ratings a `self` filter lets through, lowest first.
    pub fn allowed(self) -> &'static [Rating] {
        let idx = RATING_ORDER.iter().position(|r| *r == self).unwrap_or(RATING_ORDER.len() - 1);
        &RATING_ORDER[..=idx]
    }

    pub fn permits(self, other: Rating) -> bool { other <= self }
}

impl fmt::Display for Rating {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result { f.write_str(self.as_str()) }
}

impl FromStr for Rating {
    type Err = anyhow::Error;

    fn from_str(s: &str) -> anyhow::Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "g" => Ok(Rating::G),
            "pg" => Ok(Rating::Pg),
            "pg-13" => Ok(Rating::Pg13),
            "r" => Ok(Rating::R),
            other => Err(anyhow::anyhow!("unknown rating `{}` (expected g, pg, pg-13, r)", other)),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Meta {
    pub status: u16,
    pub msg: String,
    #[serde(default)]
    pub response_id: Option<String>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Pagination {
    pub total_count: u64,
    pub count: u64,
    pub offset: u64,
}

impl Pagination {
    pub fn is_zeroed(&self) -> bool { *self == Pagination::default() }
}

/// One GIF or sticker. Only the fields the contract looks at are typed.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Item {
    pub id: String,
    #[serde(rename = "type")]
    pub kind: String,
    #[serde(default)]
    pub rating: String,
}

impl Item {
    /// `None` when the service tags the item with something outside g/pg/pg-13/r.
    pub fn rating(&self) -> Option<Rating> { self.rating.parse().ok() }
}

/// The `meta`/`data`/`pagination` wrapper every endpoint answers with.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Envelope<D> {
    pub data: D,
    pub meta: Meta,
    #[serde(default)]
    pub pagination: Option<Pagination>,
}

/// Just the `meta` block, for error statuses whose `data` shape is unspecified.
#[derive(Debug, Clone, Deserialize)]
pub struct MetaOnly {
    pub meta: Meta,
}

/// Body of an authentication failure; these carry no envelope.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub message: String,
}
