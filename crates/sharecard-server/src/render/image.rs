//! Card image generation.
//!
//! Draws a 1200x630 card as SVG and rasterizes it with resvg:
//! - Dark diagonal gradient background with a brand-coloured top bar
//! - Site badge and name, then the display name (and wallet when named)
//! - The layout's stat row with separators
//! - Up to two rows of interest pills, each with a `LVL n` badge
//! - The public host in the footer
//!
//! Text widths are estimated from character counts; exact shaping is left to
//! resvg.

use std::sync::{Arc, LazyLock};

use resvg::usvg::{self, fontdb};
use sharecard_core::{level_color, truncate_wallet};

use super::CardView;
use super::components::{OG_IMAGE_HEIGHT as HEIGHT, OG_IMAGE_WIDTH as WIDTH};
use crate::error::CardError;

/// Font family string for SVG text (sans single quotes that confuse `format!`).
const FONT_FAMILY: &str = "Inter, DejaVu Sans, Helvetica, Arial, sans-serif";
const MONO_FAMILY: &str = "DejaVu Sans Mono, Menlo, monospace";

/// Display names longer than this are cut with an ellipsis.
const NAME_MAX_CHARS: usize = 28;

const PILL_HEIGHT: f32 = 52.0;
const PILL_GAP: f32 = 14.0;
const PILL_ROW_MAX_WIDTH: f32 = 1040.0;
const PILL_MAX_ROWS: usize = 2;
const PILLS_TOP: f32 = 450.0;

/// System fonts, loaded once per process.
static FONTS: LazyLock<Arc<fontdb::Database>> = LazyLock::new(|| {
    let mut db = fontdb::Database::new();
    db.load_system_fonts();
    tracing::debug!(faces = db.len(), "loaded system fonts for card images");
    Arc::new(db)
});

/// Fixed inputs for drawing a card.
pub struct ImageContext<'a> {
    pub site_name: &'a str,
    /// Footer text, usually the public host.
    pub footer: &'a str,
    pub interest_limit: usize,
}

/// Render a card to PNG bytes.
pub fn render_png(view: &CardView<'_>, ctx: &ImageContext<'_>) -> Result<Vec<u8>, CardError> {
    rasterize(&card_svg(view, ctx))
}

/// Build the SVG document for a card.
pub fn card_svg(view: &CardView<'_>, ctx: &ImageContext<'_>) -> String {
    let mut svg = String::with_capacity(8192);
    let center = WIDTH as f32 / 2.0;

    svg.push_str(&format!(
        r##"<svg xmlns="http://www.w3.org/2000/svg" width="{w}" height="{h}" viewBox="0 0 {w} {h}"><defs><linearGradient id="bg" x1="0" y1="0" x2="1" y2="1"><stop offset="0" stop-color="#0a0a0a"/><stop offset="0.5" stop-color="#161616"/><stop offset="1" stop-color="#0a0a0a"/></linearGradient><linearGradient id="accent" x1="0" y1="0" x2="1" y2="0"><stop offset="0" stop-color="#8276ED"/><stop offset="0.5" stop-color="#F6427B"/><stop offset="1" stop-color="#FFBF33"/></linearGradient></defs><rect width="{w}" height="{h}" fill="url(#bg)"/><rect width="{w}" height="6" fill="url(#accent)"/>"##,
        w = WIDTH,
        h = HEIGHT,
    ));

    push_brand(&mut svg, ctx.site_name, center);

    // Display name, and the wallet underneath when a name was given
    svg.push_str(&format!(
        r##"<text x="{center}" y="205" text-anchor="middle" font-family="{font}" font-size="64" font-weight="800" fill="#fff">{name}</text>"##,
        font = FONT_FAMILY,
        name = xml_escape(&clip_chars(&view.display_name(), NAME_MAX_CHARS)),
    ));
    if view.snapshot.display_name.is_some() {
        svg.push_str(&format!(
            r##"<text x="{center}" y="248" text-anchor="middle" font-family="{font}" font-size="24" fill="#71717a">{wallet}</text>"##,
            font = MONO_FAMILY,
            wallet = xml_escape(&truncate_wallet(&view.snapshot.wallet)),
        ));
    }

    push_stats(&mut svg, view, center);
    push_interests(&mut svg, view, ctx.interest_limit, center);

    svg.push_str(&format!(
        r##"<text x="{center}" y="604" text-anchor="middle" font-family="{font}" font-size="20" fill="#52525b">{footer}</text>"##,
        font = FONT_FAMILY,
        footer = xml_escape(ctx.footer),
    ));

    svg.push_str("</svg>");
    svg
}

fn push_brand(svg: &mut String, site_name: &str, center: f32) {
    let initial: String = site_name.chars().next().unwrap_or('?').to_uppercase().collect();
    let name_width = text_width(site_name, 40.0);
    let group_width = 56.0 + 16.0 + name_width;
    let left = center - group_width / 2.0;

    svg.push_str(&format!(
        r##"<circle cx="{cx:.1}" cy="100" r="28" fill="url(#accent)"/><text x="{cx:.1}" y="111" text-anchor="middle" font-family="{font}" font-size="30" font-weight="800" fill="#0a0a0a">{initial}</text><text x="{tx:.1}" y="114" font-family="{font}" font-size="40" font-weight="700" fill="#fff">{name}</text>"##,
        cx = left + 28.0,
        tx = left + 72.0,
        font = FONT_FAMILY,
        initial = xml_escape(&initial),
        name = xml_escape(site_name),
    ));
}

fn push_stats(svg: &mut String, view: &CardView<'_>, center: f32) {
    let stats = view.stats();
    let spacing = if stats.len() > 3 { 250.0 } else { 300.0 };
    let mid = (stats.len() as f32 - 1.0) / 2.0;

    for (i, stat) in stats.iter().enumerate() {
        let x = center + (i as f32 - mid) * spacing;
        if i > 0 {
            let sep = x - spacing / 2.0;
            svg.push_str(&format!(
                r##"<line x1="{sep:.1}" y1="295" x2="{sep:.1}" y2="395" stroke="#27272a" stroke-width="2"/>"##,
            ));
        }
        svg.push_str(&format!(
            r##"<text x="{x:.1}" y="350" text-anchor="middle" font-family="{font}" font-size="64" font-weight="800" fill="{color}">{value}</text><text x="{x:.1}" y="390" text-anchor="middle" font-family="{font}" font-size="20" font-weight="600" letter-spacing="2" fill="#a1a1aa">{label}</text>"##,
            font = FONT_FAMILY,
            color = stat.color.unwrap_or("#fff"),
            value = stat.value,
            label = stat.label.to_uppercase(),
        ));
    }
}

/// A positioned interest pill.
struct Pill {
    name: String,
    badge: String,
    color: &'static str,
    name_width: f32,
    badge_width: f32,
}

impl Pill {
    fn width(&self) -> f32 {
        24.0 + self.name_width + 12.0 + self.badge_width + 12.0
    }
}

fn push_interests(svg: &mut String, view: &CardView<'_>, limit: usize, center: f32) {
    let pills: Vec<Pill> = view
        .interests(limit)
        .iter()
        .map(|interest| {
            let name = clip_chars(&interest.name, 24);
            let badge = format!("LVL {}", interest.level);
            Pill {
                name_width: text_width(&name, 22.0),
                badge_width: text_width(&badge, 16.0) + 20.0,
                color: level_color(interest.level),
                name,
                badge,
            }
        })
        .collect();

    for (row_index, row) in wrap_rows(&pills).into_iter().take(PILL_MAX_ROWS).enumerate() {
        let row_width: f32 =
            row.iter().map(|p| p.width()).sum::<f32>() + PILL_GAP * (row.len() as f32 - 1.0);
        let y = PILLS_TOP + row_index as f32 * (PILL_HEIGHT + PILL_GAP);
        let mut x = center - row_width / 2.0;

        for pill in row {
            let badge_x = x + 24.0 + pill.name_width + 12.0;
            svg.push_str(&format!(
                r##"<rect x="{x:.1}" y="{y:.1}" width="{w:.1}" height="{h}" rx="26" fill="#fff" fill-opacity="0.04" stroke="{color}" stroke-opacity="0.5" stroke-width="2"/><text x="{nx:.1}" y="{ty:.1}" font-family="{font}" font-size="22" fill="#fff">{name}</text><rect x="{badge_x:.1}" y="{by:.1}" width="{bw:.1}" height="28" rx="14" fill="{color}" fill-opacity="0.18"/><text x="{bx:.1}" y="{bty:.1}" text-anchor="middle" font-family="{font}" font-size="16" font-weight="700" fill="{color}">{badge}</text>"##,
                w = pill.width(),
                h = PILL_HEIGHT,
                color = pill.color,
                nx = x + 24.0,
                ty = y + 34.0,
                font = FONT_FAMILY,
                name = xml_escape(&pill.name),
                by = y + 12.0,
                bw = pill.badge_width,
                bx = badge_x + pill.badge_width / 2.0,
                bty = y + 32.0,
                badge = pill.badge,
            ));
            x += pill.width() + PILL_GAP;
        }
    }
}

/// Greedily pack pills into centred rows.
fn wrap_rows(pills: &[Pill]) -> Vec<&[Pill]> {
    let mut rows = Vec::new();
    let mut start = 0;
    let mut width = 0.0;

    for (i, pill) in pills.iter().enumerate() {
        let added = if i == start { pill.width() } else { PILL_GAP + pill.width() };
        if i > start && width + added > PILL_ROW_MAX_WIDTH {
            rows.push(&pills[start..i]);
            start = i;
            width = pill.width();
        } else {
            width += added;
        }
    }
    if start < pills.len() {
        rows.push(&pills[start..]);
    }
    rows
}

/// Rough rendered width of `s` at `size` px.
fn text_width(s: &str, size: f32) -> f32 {
    s.chars().count() as f32 * size * 0.58
}

/// Cut `s` to `max` characters, ending with an ellipsis when cut.
fn clip_chars(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        return s.to_string();
    }
    let mut out: String = s.chars().take(max.saturating_sub(1)).collect();
    out.push('\u{2026}');
    out
}

/// Escape text for SVG character data and attribute values.
fn xml_escape(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            c => out.push(c),
        }
    }
    out
}

/// Parse and render the SVG to a PNG.
fn rasterize(svg: &str) -> Result<Vec<u8>, CardError> {
    let mut options = usvg::Options::default();
    options.fontdb = Arc::clone(&FONTS);

    let tree = usvg::Tree::from_str(svg, &options)
        .map_err(|e| CardError::Internal(anyhow::anyhow!("SVG parse error: {e}")))?;

    let mut pixmap = resvg::tiny_skia::Pixmap::new(WIDTH, HEIGHT)
        .ok_or_else(|| CardError::Internal(anyhow::anyhow!("failed to create pixmap")))?;

    resvg::render(&tree, resvg::tiny_skia::Transform::default(), &mut pixmap.as_mut());

    pixmap
        .encode_png()
        .map_err(|e| CardError::Internal(anyhow::anyhow!("PNG encode error: {e}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::render::CardLayout;
    use sharecard_core::{Interest, ProfileSnapshot};

    const CTX: ImageContext<'static> = ImageContext {
        site_name: "Sofia",
        footer: "cards.test",
        interest_limit: 5,
    };

    fn snapshot() -> ProfileSnapshot {
        let mut snap = ProfileSnapshot::new("0x1234567890abcdef");
        snap.level = 5;
        snap.signals_count = 42;
        snap.interests = (1..=7).map(|i| Interest::new(format!("Topic{i}"), i)).collect();
        snap
    }

    #[test]
    fn svg_contains_layout_stats() {
        let snap = snapshot();
        let svg = card_svg(&CardView::new(&snap, CardLayout::Signals), &CTX);
        assert!(svg.contains("SIGNALS"));
        assert!(svg.contains(">42<"));
        assert!(!svg.contains("TRUST CIRCLE"));

        let svg = card_svg(&CardView::new(&snap, CardLayout::Discovery), &CTX);
        assert!(svg.contains("TRUST CIRCLE"));
        assert!(svg.contains("PIONEER"));
    }

    #[test]
    fn svg_applies_interest_limit() {
        let snap = snapshot();
        let svg = card_svg(&CardView::new(&snap, CardLayout::Signals), &CTX);
        assert!(svg.contains("Topic5"));
        assert!(svg.contains("LVL 5"));
        assert!(!svg.contains("Topic6"));
    }

    #[test]
    fn svg_escapes_user_text() {
        let mut snap = snapshot();
        snap.display_name = Some("<b>Tom & \"Jerry\"</b>".to_string());
        snap.interests = vec![Interest::new("R&D", 1)];
        let svg = card_svg(&CardView::new(&snap, CardLayout::Signals), &CTX);
        assert!(svg.contains("&lt;b&gt;Tom &amp; &quot;Jerry&quot;"));
        assert!(svg.contains("R&amp;D"));
        assert!(!svg.contains("<b>"));
    }

    #[test]
    fn long_names_are_clipped() {
        assert_eq!(clip_chars("short", 28), "short");
        let clipped = clip_chars(&"x".repeat(40), 28);
        assert_eq!(clipped.chars().count(), 28);
        assert!(clipped.ends_with('\u{2026}'));
    }

    #[test]
    fn pills_wrap_into_rows() {
        let pill = |n: usize| Pill {
            name: "x".repeat(n),
            badge: "LVL 1".to_string(),
            color: "#fff",
            name_width: text_width(&"x".repeat(n), 22.0),
            badge_width: text_width("LVL 1", 16.0) + 20.0,
        };
        let pills: Vec<Pill> = (0..6).map(|_| pill(20)).collect();
        let rows = wrap_rows(&pills);
        assert!(rows.len() > 1);
        assert_eq!(rows.iter().map(|r| r.len()).sum::<usize>(), 6);
        for row in &rows {
            let width: f32 = row.iter().map(Pill::width).sum::<f32>()
                + PILL_GAP * (row.len() as f32 - 1.0);
            assert!(width <= PILL_ROW_MAX_WIDTH || row.len() == 1);
        }
        assert!(wrap_rows(&[]).is_empty());
    }

    #[test]
    fn renders_png_with_card_dimensions() {
        let snap = snapshot();
        let png = render_png(&CardView::new(&snap, CardLayout::Discovery), &CTX).unwrap();

        assert!(png.starts_with(b"\x89PNG\r\n\x1a\n"));
        let width = u32::from_be_bytes(png[16..20].try_into().unwrap());
        let height = u32::from_be_bytes(png[20..24].try_into().unwrap());
        assert_eq!((width, height), (1200, 630));
    }
}
