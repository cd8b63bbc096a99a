//! Type-prefixed identity types for all Weave entities
//!
//! Every entity uses a single [`Id`] struct with a prefix that identifies the
//! entity type. Ids are K-sortable (UUIDv7-based), globally unique, and
//! URL-safe in the format `prefix_suffix`, where the suffix is a 26-character
//! Crockford base-32 encoding of the UUID payload.

use serde::de::Error as _;
use serde::{Deserialize, Deserializer, Serialize, Serializer};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

use crate::errors::Error;

/// Suffix alphabet: Crockford base-32, lowercase, no i/l/o/u.
const ALPHABET: &[u8; 32] = b"0123456789abcdefghjkmnpqrstvwxyz";

/// Suffix length: 128 UUID bits packed into 26 five-bit groups
/// (the top two bits of the first character are always zero).
const SUFFIX_LEN: usize = 26;

/// Entity type encoded in an [`Id`] prefix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Prefix {
    Collection,
    Document,
    Chunk,
    Pipeline,
    IngestJob,
}

impl Prefix {
    /// The string form used in rendered ids.
    pub fn as_str(&self) -> &'static str {
        match self {
            Prefix::Collection => "col",
            Prefix::Document => "doc",
            Prefix::Chunk => "chk",
            Prefix::Pipeline => "pipe",
            Prefix::IngestJob => "ingjob",
        }
    }
}

impl fmt::Display for Prefix {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Primary identifier type for all Weave entities.
///
/// Wraps a UUIDv7 behind a prefix-qualified, globally unique, sortable,
/// URL-safe string form. The zero value is explicitly nil: it renders as the
/// empty string and is distinct from every generated id.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Default)]
pub struct Id {
    prefix: String,
    uuid: Uuid,
}

impl Id {
    /// Generate a new globally unique id with the given prefix.
    pub fn new(prefix: Prefix) -> Self {
        Id {
            prefix: prefix.as_str().to_string(),
            uuid: Uuid::now_v7(),
        }
    }

    /// The nil id. Equivalent to `Id::default()`.
    pub fn nil() -> Self {
        Id::default()
    }

    /// Parse an id string (e.g. `doc_01h2xcejqtf2nbrexx3vqjhp41`).
    pub fn parse(s: &str) -> Result<Self, Error> {
        if s.is_empty() {
            return Err(Error::InvalidId {
                message: "empty string".into(),
            });
        }

        let (prefix, suffix) = s.rsplit_once('_').ok_or_else(|| Error::InvalidId {
            message: format!("{s:?}: missing prefix separator"),
        })?;

        if prefix.is_empty() || !prefix.bytes().all(|b| b.is_ascii_lowercase()) {
            return Err(Error::InvalidId {
                message: format!("{s:?}: invalid prefix {prefix:?}"),
            });
        }

        let uuid = decode_suffix(suffix).map_err(|message| Error::InvalidId {
            message: format!("{s:?}: {message}"),
        })?;

        Ok(Id {
            prefix: prefix.to_string(),
            uuid,
        })
    }

    /// Parse an id string and validate that its prefix matches the expected
    /// entity type.
    pub fn parse_with_prefix(s: &str, expected: Prefix) -> Result<Self, Error> {
        let parsed = Id::parse(s)?;
        if parsed.prefix != expected.as_str() {
            return Err(Error::InvalidId {
                message: format!(
                    "expected prefix {:?}, got {:?}",
                    expected.as_str(),
                    parsed.prefix
                ),
            });
        }
        Ok(parsed)
    }

    /// The prefix component of this id. Empty for the nil id.
    pub fn prefix(&self) -> &str {
        &self.prefix
    }

    /// The UUID payload backing this id.
    pub fn uuid(&self) -> Uuid {
        self.uuid
    }

    /// Whether this id is the zero value.
    pub fn is_nil(&self) -> bool {
        self.prefix.is_empty() && self.uuid.is_nil()
    }
}

impl fmt::Display for Id {
    /// Renders `prefix_suffix`, or the empty string for the nil id.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_nil() {
            return Ok(());
        }
        write!(f, "{}_{}", self.prefix, encode_suffix(&self.uuid))
    }
}

impl FromStr for Id {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Id::parse(s)
    }
}

impl Serialize for Id {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&self.to_string())
    }
}

impl<'de> Deserialize<'de> for Id {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> Result<Self, D::Error> {
        let s = String::deserialize(deserializer)?;
        if s.is_empty() {
            return Ok(Id::nil());
        }
        Id::parse(&s).map_err(D::Error::custom)
    }
}

/// Encode 128 UUID bits into 26 base-32 characters.
fn encode_suffix(uuid: &Uuid) -> String {
    let n = u128::from_be_bytes(*uuid.as_bytes());
    let mut out = String::with_capacity(SUFFIX_LEN);
    for i in 0..SUFFIX_LEN {
        // First group carries only the top 3 payload bits (125..128).
        let shift = 125 - 5 * i as u32;
        let v = ((n >> shift) & 0x1f) as usize;
        out.push(ALPHABET[v] as char);
    }
    out
}

/// Decode a 26-character base-32 suffix back into a UUID.
fn decode_suffix(s: &str) -> Result<Uuid, String> {
    if s.len() != SUFFIX_LEN {
        return Err(format!("suffix must be {SUFFIX_LEN} characters"));
    }

    let mut n: u128 = 0;
    for (i, b) in s.bytes().enumerate() {
        let v = ALPHABET
            .iter()
            .position(|&a| a == b)
            .ok_or_else(|| format!("invalid suffix character {:?}", b as char))?;
        // The leading character only carries the top 3 bits of the payload.
        if i == 0 && v > 7 {
            return Err("suffix overflows 128 bits".into());
        }
        n = (n << 5) | v as u128;
    }

    Ok(Uuid::from_bytes(n.to_be_bytes()))
}
