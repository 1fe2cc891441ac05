//! Card parameters carried in query strings.
//!
//! The profile page and the image endpoint take a snapshot as URL query
//! parameters instead of a stored record. Incoming values go through the same
//! defaulting as the share API; outgoing image URLs are built from a typed
//! snapshot so equivalent inputs produce the same string.

use serde::{Deserialize, Serialize};
use serde_json::Value;
use sharecard_core::{ProfileSnapshot, RawSnapshot, encode_interests};

use crate::render::CardLayout;

/// Query parameters describing a card. Every field is optional and untrusted.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CardQuery {
    pub wallet: Option<String>,
    pub name: Option<String>,
    pub display_name: Option<String>,
    pub level: Option<String>,
    pub trust_circle: Option<String>,
    pub pioneer: Option<String>,
    pub explorer: Option<String>,
    pub signals: Option<String>,
    pub signals_count: Option<String>,
    /// Compact `name:level,name:level` list.
    pub interests: Option<String>,
    /// `discovery` or `signals`.
    pub layout: Option<String>,
}

impl CardQuery {
    /// Requested layout, falling back to `default` when absent or unknown.
    pub fn layout_or(&self, default: CardLayout) -> CardLayout {
        self.layout
            .as_deref()
            .and_then(CardLayout::parse)
            .unwrap_or(default)
    }

    /// Apply defaults. A missing wallet becomes the placeholder.
    pub fn into_snapshot(self) -> ProfileSnapshot {
        let raw = RawSnapshot {
            wallet: self.wallet.map(Value::String),
            display_name: self.display_name.map(Value::String),
            name: self.name.map(Value::String),
            level: self.level.map(Value::String),
            trust_circle: self.trust_circle.map(Value::String),
            pioneer: self.pioneer.map(Value::String),
            explorer: self.explorer.map(Value::String),
            signals_count: self.signals_count.map(Value::String),
            signals: self.signals.map(Value::String),
            interests: self.interests.map(Value::String),
        };
        raw.into_snapshot_lenient()
    }
}

/// Canonical parameter set written into image URLs.
#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct CardParams<'a> {
    wallet: &'a str,
    #[serde(skip_serializing_if = "Option::is_none")]
    name: Option<&'a str>,
    level: u32,
    trust_circle: u32,
    pioneer: u32,
    explorer: u32,
    signals: u32,
    #[serde(skip_serializing_if = "String::is_empty")]
    interests: String,
    layout: &'static str,
}

/// Encode a snapshot and layout as a URL query string (without `?`).
///
/// Field order and formatting are fixed, so the result doubles as a cache key.
pub fn card_query_string(
    snapshot: &ProfileSnapshot,
    layout: CardLayout,
) -> anyhow::Result<String> {
    let params = CardParams {
        wallet: &snapshot.wallet,
        name: snapshot.display_name.as_deref(),
        level: snapshot.level,
        trust_circle: snapshot.trust_circle,
        pioneer: snapshot.pioneer,
        explorer: snapshot.explorer,
        signals: snapshot.signals_count,
        interests: encode_interests(&snapshot.interests),
        layout: layout.as_str(),
    };
    Ok(serde_urlencoded::to_string(params)?)
}

/// Absolute URL of the card image for a snapshot.
pub fn og_image_url(
    base_url: &str,
    snapshot: &ProfileSnapshot,
    layout: CardLayout,
) -> anyhow::Result<String> {
    Ok(format!(
        "{base_url}/api/og?{}",
        card_query_string(snapshot, layout)?
    ))
}

#[cfg(test)]
mod tests {
    use super::*;
    use sharecard_core::{Interest, PLACEHOLDER_WALLET};

    fn query(s: &str) -> CardQuery {
        serde_urlencoded::from_str(s).unwrap()
    }

    #[test]
    fn full_query_to_snapshot() {
        let snap = query("wallet=0xabc&name=Ada&level=7&signals=12&interests=DeFi:3,Art")
            .into_snapshot();
        assert_eq!(snap.wallet, "0xabc");
        assert_eq!(snap.display_name.as_deref(), Some("Ada"));
        assert_eq!(snap.level, 7);
        assert_eq!(snap.signals_count, 12);
        assert_eq!(
            snap.interests,
            vec![Interest::new("DeFi", 3), Interest::new("Art", 1)]
        );
    }

    #[test]
    fn empty_query_uses_defaults() {
        let snap = query("").into_snapshot();
        assert_eq!(snap.wallet, PLACEHOLDER_WALLET);
        assert_eq!(snap.level, 1);
        assert_eq!(snap.trust_circle, 0);
        assert!(snap.interests.is_empty());
    }

    #[test]
    fn malformed_numbers_default() {
        let snap = query("wallet=w&level=abc&pioneer=-4&explorer=9x").into_snapshot();
        assert_eq!(snap.level, 1);
        assert_eq!(snap.pioneer, 0);
        assert_eq!(snap.explorer, 9);
    }

    #[test]
    fn layout_selection() {
        assert_eq!(
            query("layout=discovery").layout_or(CardLayout::Signals),
            CardLayout::Discovery
        );
        assert_eq!(
            query("layout=bogus").layout_or(CardLayout::Signals),
            CardLayout::Signals
        );
        assert_eq!(query("").layout_or(CardLayout::Discovery), CardLayout::Discovery);
    }

    #[test]
    fn query_string_is_canonical() {
        let a = query("level=5&wallet=0xabc&interests=Art:2").into_snapshot();
        let b = query("wallet=0xabc&interests=Art:2&level=05&pioneer=0").into_snapshot();
        assert_eq!(
            card_query_string(&a, CardLayout::Signals).unwrap(),
            card_query_string(&b, CardLayout::Signals).unwrap()
        );
    }

    #[test]
    fn query_string_round_trips_through_card_query() {
        let mut snap = ProfileSnapshot::new("0x1234567890abcdef");
        snap.display_name = Some("Ada & Co".to_string());
        snap.level = 5;
        snap.trust_circle = 3;
        snap.interests = vec![Interest::new("Art", 2), Interest::new("Web 3", 1)];

        let encoded = card_query_string(&snap, CardLayout::Discovery).unwrap();
        assert!(encoded.contains("name=Ada+%26+Co"));
        assert!(encoded.ends_with("layout=discovery"));

        let decoded = query(&encoded);
        assert_eq!(decoded.layout_or(CardLayout::Signals), CardLayout::Discovery);
        assert_eq!(decoded.into_snapshot(), snap);
    }

    #[test]
    fn stored_snapshot_survives_image_url() {
        let stored = RawSnapshot::from_json(
            br#"{"wallet":" 0xabc ","interests":[{"name":"Rock:Roll","level":4},{"name":"A,B","level":3}]}"#,
        )
        .unwrap()
        .into_snapshot()
        .unwrap();

        let encoded = card_query_string(&stored, CardLayout::Signals).unwrap();
        let decoded = query(&encoded).into_snapshot();
        assert_eq!(decoded.interests, stored.interests);
        assert_eq!(decoded, stored);
    }

    #[test]
    fn og_image_url_is_absolute() {
        let url = og_image_url("https://cards.test", &ProfileSnapshot::new("w"), CardLayout::Signals)
            .unwrap();
        assert!(url.starts_with("https://cards.test/api/og?wallet=w&level=1"));
        assert!(!url.contains("name="));
        assert!(!url.contains("interests="));
    }
}
