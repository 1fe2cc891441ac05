//! Presentation of profile cards.
//!
//! A single [`CardView`] drives every surface: the HTML share page, the
//! query-parameter profile page and the PNG card image. What differs between
//! them is the [`CardLayout`], which picks the stat set and the description
//! line, and the interest display limit passed in by the caller.
//!
//! HTML uses [maud](https://maud.lambda.xyz/) (all dynamic values escaped);
//! images are drawn as SVG and rasterized with resvg.

pub mod components;
pub mod image;
pub mod page;

use sharecard_core::{Interest, ProfileSnapshot, level_color};

/// Stat set and wording used by a card.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CardLayout {
    /// Level, Trust Circle, Pioneer, Explorer.
    Discovery,
    /// Level, Signals, Interests.
    #[default]
    Signals,
}

impl CardLayout {
    /// Parse a layout name, case-insensitively.
    pub fn parse(raw: &str) -> Option<Self> {
        match raw.trim().to_ascii_lowercase().as_str() {
            "discovery" => Some(Self::Discovery),
            "signals" => Some(Self::Signals),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Self::Discovery => "discovery",
            Self::Signals => "signals",
        }
    }
}

/// One labelled number on a card.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Stat {
    pub label: &'static str,
    pub value: u32,
    /// Value colour; `None` uses the default text colour.
    pub color: Option<&'static str>,
}

impl Stat {
    fn new(label: &'static str, value: u32, color: Option<&'static str>) -> Self {
        Self {
            label,
            value,
            color,
        }
    }
}

const PIONEER_COLOR: &str = "#FFD700";
const EXPLORER_COLOR: &str = "#3B82F6";
const SIGNALS_COLOR: &str = "#8276ED";

/// A snapshot as seen through a layout.
#[derive(Debug, Clone, Copy)]
pub struct CardView<'a> {
    pub snapshot: &'a ProfileSnapshot,
    pub layout: CardLayout,
}

impl<'a> CardView<'a> {
    pub fn new(snapshot: &'a ProfileSnapshot, layout: CardLayout) -> Self {
        Self { snapshot, layout }
    }

    pub fn display_name(&self) -> String {
        self.snapshot.display_name()
    }

    /// Page title, e.g. `Sofia Profile - 0x1234...cdef`.
    pub fn title(&self, site_name: &str) -> String {
        format!("{site_name} Profile - {}", self.display_name())
    }

    fn interest_count(&self) -> u32 {
        u32::try_from(self.snapshot.interests.len()).unwrap_or(u32::MAX)
    }

    /// Stats in display order.
    pub fn stats(&self) -> Vec<Stat> {
        let s = self.snapshot;
        let level = Stat::new("Level", s.level, Some(level_color(s.level)));

        match self.layout {
            CardLayout::Discovery => vec![
                level,
                Stat::new("Trust Circle", s.trust_circle, None),
                Stat::new("Pioneer", s.pioneer, Some(PIONEER_COLOR)),
                Stat::new("Explorer", s.explorer, Some(EXPLORER_COLOR)),
            ],
            CardLayout::Signals => vec![
                level,
                Stat::new("Signals", s.signals_count, Some(SIGNALS_COLOR)),
                Stat::new("Interests", self.interest_count(), None),
            ],
        }
    }

    /// One-line summary used for meta descriptions.
    pub fn description(&self) -> String {
        let s = self.snapshot;
        match self.layout {
            CardLayout::Discovery => format!(
                "Level {} | {} Trust Circle | {} Pioneer | {} Explorer",
                s.level, s.trust_circle, s.pioneer, s.explorer
            ),
            CardLayout::Signals => format!(
                "Level {} | {} Signals | {} Interests",
                s.level,
                s.signals_count,
                self.interest_count()
            ),
        }
    }

    /// Interests shown under a display limit.
    pub fn interests(&self, limit: usize) -> &'a [Interest] {
        self.snapshot.interests_limited(limit)
    }

    /// How many interests the limit hides.
    pub fn hidden_interests(&self, limit: usize) -> usize {
        self.snapshot.interests.len().saturating_sub(limit)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn snapshot() -> ProfileSnapshot {
        let mut snap = ProfileSnapshot::new("0x1234567890abcdef");
        snap.level = 5;
        snap.trust_circle = 12;
        snap.pioneer = 3;
        snap.explorer = 7;
        snap.signals_count = 42;
        snap.interests = (1..=10).map(|i| Interest::new(format!("I{i}"), i)).collect();
        snap
    }

    #[test]
    fn layout_parse() {
        assert_eq!(CardLayout::parse("Discovery"), Some(CardLayout::Discovery));
        assert_eq!(CardLayout::parse(" signals "), Some(CardLayout::Signals));
        assert_eq!(CardLayout::parse("grid"), None);
        assert_eq!(CardLayout::default(), CardLayout::Signals);
    }

    #[test]
    fn discovery_description() {
        let snap = snapshot();
        let view = CardView::new(&snap, CardLayout::Discovery);
        assert_eq!(
            view.description(),
            "Level 5 | 12 Trust Circle | 3 Pioneer | 7 Explorer"
        );
    }

    #[test]
    fn signals_description_counts_all_interests() {
        let snap = snapshot();
        let view = CardView::new(&snap, CardLayout::Signals);
        assert_eq!(view.description(), "Level 5 | 42 Signals | 10 Interests");
    }

    #[test]
    fn stats_per_layout() {
        let snap = snapshot();
        let labels = |layout| {
            CardView::new(&snap, layout)
                .stats()
                .into_iter()
                .map(|s| s.label)
                .collect::<Vec<_>>()
        };
        assert_eq!(
            labels(CardLayout::Discovery),
            ["Level", "Trust Circle", "Pioneer", "Explorer"]
        );
        assert_eq!(labels(CardLayout::Signals), ["Level", "Signals", "Interests"]);

        let level = &CardView::new(&snap, CardLayout::Signals).stats()[0];
        assert_eq!(level.color, Some(level_color(5)));
    }

    #[test]
    fn title_uses_display_name_or_wallet() {
        let mut snap = snapshot();
        let view = CardView::new(&snap, CardLayout::Discovery);
        assert_eq!(view.title("Sofia"), "Sofia Profile - 0x1234...cdef");

        snap.display_name = Some("Ada".to_string());
        let view = CardView::new(&snap, CardLayout::Discovery);
        assert_eq!(view.title("Sofia"), "Sofia Profile - Ada");
    }

    #[test]
    fn interest_limits() {
        let snap = snapshot();
        let view = CardView::new(&snap, CardLayout::Signals);
        assert_eq!(view.interests(5).len(), 5);
        assert_eq!(view.hidden_interests(5), 5);
        assert_eq!(view.interests(20).len(), 10);
        assert_eq!(view.hidden_interests(20), 0);
    }
}
