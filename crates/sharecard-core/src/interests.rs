//! Interest lists and their compact `name:level,name:level` encoding.

use serde::{Deserialize, Serialize};

/// A named interest with a level.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interest {
    /// Interest name as submitted.
    pub name: String,
    /// Interest level, 1 when not given.
    #[serde(default = "default_level")]
    pub level: u32,
}

fn default_level() -> u32 {
    1
}

impl Interest {
    pub fn new(name: impl Into<String>, level: u32) -> Self {
        Self {
            name: name.into(),
            level,
        }
    }
}

/// Parse the compact encoding.
///
/// Items are separated by `,` and split on `:`. The first part is the name
/// (trimmed; items with an empty name are dropped), the second the level.
/// A missing or malformed level becomes 1. Extra `:` parts are ignored.
///
/// ```
/// use sharecard_core::{Interest, parse_interests};
///
/// let parsed = parse_interests("DeFi:3,NFTs:1,Gaming");
/// assert_eq!(parsed, vec![
///     Interest::new("DeFi", 3),
///     Interest::new("NFTs", 1),
///     Interest::new("Gaming", 1),
/// ]);
/// ```
pub fn parse_interests(raw: &str) -> Vec<Interest> {
    raw.split(',')
        .filter_map(|item| {
            let mut parts = item.split(':');
            let name = parts.next().unwrap_or("").trim();
            if name.is_empty() {
                return None;
            }
            let level = parts.next().and_then(parse_leading_u32).unwrap_or(1);
            Some(Interest::new(name, level))
        })
        .collect()
}

/// Clean a name taken from structured input so it survives the compact form.
///
/// `,` and `:` become spaces and the result is trimmed. Returns `None` when
/// nothing is left.
///
/// ```
/// use sharecard_core::interests::compact_safe_name;
///
/// assert_eq!(compact_safe_name("Rock:Roll").as_deref(), Some("Rock Roll"));
/// assert_eq!(compact_safe_name(" , "), None);
/// ```
pub fn compact_safe_name(name: &str) -> Option<String> {
    let cleaned: String = name
        .chars()
        .map(|c| if c == ',' || c == ':' { ' ' } else { c })
        .collect();
    let cleaned = cleaned.trim();
    (!cleaned.is_empty()).then(|| cleaned.to_string())
}

/// Encode interests in the compact form, always writing `name:level`.
pub fn encode_interests(interests: &[Interest]) -> String {
    interests
        .iter()
        .map(|i| format!("{}:{}", i.name, i.level))
        .collect::<Vec<_>>()
        .join(",")
}

/// Parse the leading ASCII digits of `s` (after trimming and an optional `+`).
///
/// `"5abc"` → 5, `"abc"` → None, `"-3"` → None. Saturates at `u32::MAX`.
pub(crate) fn parse_leading_u32(s: &str) -> Option<u32> {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);
    let digits: &str = &s[..s.bytes().take_while(u8::is_ascii_digit).count()];
    if digits.is_empty() {
        return None;
    }
    Some(digits.parse::<u32>().unwrap_or(u32::MAX))
}
