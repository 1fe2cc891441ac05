//! Profile snapshots: the unit that is shared, stored and rendered.
//!
//! Untrusted input arrives as a [`RawSnapshot`] whose fields are loosely typed
//! JSON values. Turning it into a [`ProfileSnapshot`] is two separate steps:
//!
//! 1. Validation: only `wallet` is checked, and only for presence.
//! 2. Defaulting: every other field is coerced to a typed value, falling back
//!    to its default when absent or malformed. Nothing here ever rejects.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::PLACEHOLDER_WALLET;
use crate::interests::{Interest, compact_safe_name, parse_interests, parse_leading_u32};

/// Wallets up to this many characters are displayed in full.
const WALLET_DISPLAY_MAX: usize = 12;

/// Snapshot validation failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SnapshotError {
    /// No usable wallet was submitted.
    #[error("wallet is required")]
    MissingWallet,
}

/// A fully typed profile snapshot.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileSnapshot {
    /// Opaque wallet identifier.
    pub wallet: String,
    /// Optional human label.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub display_name: Option<String>,
    pub level: u32,
    pub trust_circle: u32,
    pub pioneer: u32,
    pub explorer: u32,
    pub signals_count: u32,
    /// Full interest list; display limits are applied at render time.
    #[serde(default)]
    pub interests: Vec<Interest>,
}

impl ProfileSnapshot {
    /// A snapshot with every optional field at its default.
    pub fn new(wallet: impl Into<String>) -> Self {
        Self {
            wallet: wallet.into(),
            display_name: None,
            level: 1,
            trust_circle: 0,
            pioneer: 0,
            explorer: 0,
            signals_count: 0,
            interests: Vec::new(),
        }
    }

    /// The explicit display name, or the truncated wallet.
    pub fn display_name(&self) -> String {
        match self.display_name.as_deref() {
            Some(name) => name.to_string(),
            None => truncate_wallet(&self.wallet),
        }
    }

    /// Interests up to a display limit.
    pub fn interests_limited(&self, limit: usize) -> &[Interest] {
        &self.interests[..self.interests.len().min(limit)]
    }
}

/// A snapshot as submitted by an untrusted client.
///
/// Field names follow the JSON body of the share API. `name` and `signals`
/// are accepted as older spellings of `displayName` and `signalsCount`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RawSnapshot {
    #[serde(default)]
    pub wallet: Option<Value>,
    #[serde(default)]
    pub display_name: Option<Value>,
    #[serde(default)]
    pub name: Option<Value>,
    #[serde(default)]
    pub level: Option<Value>,
    #[serde(default)]
    pub trust_circle: Option<Value>,
    #[serde(default)]
    pub pioneer: Option<Value>,
    #[serde(default)]
    pub explorer: Option<Value>,
    #[serde(default)]
    pub signals_count: Option<Value>,
    #[serde(default)]
    pub signals: Option<Value>,
    #[serde(default)]
    pub interests: Option<Value>,
}

impl RawSnapshot {
    /// Parse a request body. Only JSON objects are accepted.
    pub fn from_json(body: &[u8]) -> crate::Result<Self> {
        let value: Value = serde_json::from_slice(body)?;
        if value.is_object() {
            return Ok(serde_json::from_value(value)?);
        }
        let kind = match value {
            Value::Null => "null",
            Value::Bool(_) => "boolean",
            Value::Number(_) => "number",
            Value::String(_) => "string",
            Value::Array(_) => "array",
            Value::Object(_) => "object",
        };
        Err(crate::Error::NotAnObject(kind))
    }

    /// Check that a wallet was submitted and return it.
    ///
    /// Strings are kept exactly as submitted; blank strings count as
    /// missing. Numbers are accepted in their decimal form.
    pub fn require_wallet(&self) -> Result<String, SnapshotError> {
        match self.wallet.as_ref() {
            Some(Value::String(s)) if !s.trim().is_empty() => Ok(s.clone()),
            Some(Value::Number(n)) => Ok(n.to_string()),
            _ => Err(SnapshotError::MissingWallet),
        }
    }

    /// Validate, then apply defaults.
    pub fn into_snapshot(self) -> Result<ProfileSnapshot, SnapshotError> {
        let wallet = self.require_wallet()?;
        Ok(self.with_wallet(wallet))
    }

    /// Apply defaults, substituting a placeholder when no wallet was given.
    ///
    /// Used by render surfaces, which always draw something.
    pub fn into_snapshot_lenient(self) -> ProfileSnapshot {
        let wallet = self
            .require_wallet()
            .unwrap_or_else(|_| PLACEHOLDER_WALLET.to_string());
        self.with_wallet(wallet)
    }

    fn with_wallet(self, wallet: String) -> ProfileSnapshot {
        let display_name = text(self.display_name.as_ref()).or_else(|| text(self.name.as_ref()));
        let signals = self.signals_count.as_ref().or(self.signals.as_ref());

        ProfileSnapshot {
            wallet,
            display_name,
            level: coerce_count(self.level.as_ref(), 1),
            trust_circle: coerce_count(self.trust_circle.as_ref(), 0),
            pioneer: coerce_count(self.pioneer.as_ref(), 0),
            explorer: coerce_count(self.explorer.as_ref(), 0),
            signals_count: coerce_count(signals, 0),
            interests: coerce_interests(self.interests.as_ref()),
        }
    }
}

/// Non-blank text, trimmed.
fn text(value: Option<&Value>) -> Option<String> {
    match value {
        Some(Value::String(s)) if !s.trim().is_empty() => Some(s.trim().to_string()),
        _ => None,
    }
}

/// Coerce a loosely typed value to a non-negative count.
fn coerce_count(value: Option<&Value>, default: u32) -> u32 {
    match value {
        Some(Value::Number(n)) => {
            if let Some(v) = n.as_u64() {
                u32::try_from(v).unwrap_or(u32::MAX)
            } else {
                match n.as_f64() {
                    // `as` saturates for out-of-range floats
                    Some(f) if f.is_finite() && f >= 0.0 => f.floor() as u32,
                    _ => default,
                }
            }
        }
        Some(Value::String(s)) => parse_leading_u32(s).unwrap_or(default),
        _ => default,
    }
}

/// Coerce the interests field: compact string or an array of entries.
fn coerce_interests(value: Option<&Value>) -> Vec<Interest> {
    match value {
        Some(Value::String(s)) => parse_interests(s),
        Some(Value::Array(items)) => items
            .iter()
            .flat_map(|item| match item {
                Value::Object(obj) => text(obj.get("name"))
                    .and_then(|name| compact_safe_name(&name))
                    .map(|name| Interest::new(name, coerce_count(obj.get("level"), 1)))
                    .into_iter()
                    .collect::<Vec<_>>(),
                Value::String(s) => parse_interests(s),
                _ => Vec::new(),
            })
            .collect(),
        _ => Vec::new(),
    }
}

/// Shorten a long wallet to `first6...last4`.
///
/// Wallets of at most 12 characters are returned unchanged. Counts characters,
/// so multi-byte input never splits a code point.
pub fn truncate_wallet(wallet: &str) -> String {
    let count = wallet.chars().count();
    if count <= WALLET_DISPLAY_MAX {
        return wallet.to_string();
    }
    let head: String = wallet.chars().take(6).collect();
    let tail: String = wallet.chars().skip(count - 4).collect();
    format!("{head}...{tail}")
}

/// Badge colours for levels 1 through 10.
const LEVEL_COLORS: [&str; 10] = [
    "#9CA3AF", "#22C55E", "#3B82F6", "#8B5CF6", "#F59E0B", "#EF4444", "#EC4899", "#06B6D4",
    "#F97316", "#FFD700",
];

/// Badge colour for a level. Levels above 10 clamp to 10; 0 uses the top colour.
pub fn level_color(level: u32) -> &'static str {
    match level {
        1..=10 => LEVEL_COLORS[(level - 1) as usize],
        _ => LEVEL_COLORS[9],
    }
}
