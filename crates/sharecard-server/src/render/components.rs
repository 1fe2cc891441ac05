//! Shared HTML components used across card pages.
//!
//! These are maud functions that return `Markup` fragments for composition
//! into full pages.

use maud::{Markup, PreEscaped, html};
use sharecard_core::{Interest, level_color};

use super::Stat;

/// Inline CSS for card pages.
///
/// Dark card on a dark background, gradient accent bar, pill-shaped interests.
pub const PAGE_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
:root{--bg:#0a0a0a;--card:#141414;--fg:#fff;--fg2:#a1a1aa;--fg3:#71717a;--border:rgba(255,255,255,.08);--accent:#8276ED;--grad:linear-gradient(90deg,#8276ED,#F6427B,#FFBF33);--mono:"SF Mono",SFMono-Regular,ui-monospace,Menlo,monospace}
body{font-family:Inter,-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;line-height:1.5;color:var(--fg);background:var(--bg);min-height:100vh;display:flex;flex-direction:column;align-items:center;justify-content:center;padding:1.5rem 1rem}
main{max-width:560px;width:100%}
a{color:var(--accent);text-decoration:none}

.card{position:relative;background:var(--card);border:1px solid var(--border);border-radius:16px;padding:2rem 1.75rem 1.75rem;overflow:hidden;text-align:center}
.card::before{content:"";position:absolute;top:0;left:0;right:0;height:3px;background:var(--grad)}

.brand{display:flex;align-items:center;justify-content:center;gap:.6rem;margin-bottom:1.25rem}
.brand-mark{width:36px;height:36px;border-radius:50%;background:var(--grad);display:flex;align-items:center;justify-content:center;font-weight:800;color:#0a0a0a}
.brand-name{font-size:1.25rem;font-weight:700;letter-spacing:-.01em}

.card-name{font-size:1.9rem;font-weight:800;letter-spacing:-.02em;word-break:break-word}
.card-wallet{font-family:var(--mono);font-size:.85rem;color:var(--fg3);margin-top:.25rem}

.stats{display:flex;justify-content:center;gap:0;margin:1.75rem 0 1.5rem}
.stat{flex:1;padding:0 .5rem;border-left:1px solid var(--border)}
.stat:first-child{border-left:none}
.stat-value{font-size:1.9rem;font-weight:800;line-height:1.1}
.stat-label{font-size:.75rem;color:var(--fg2);text-transform:uppercase;letter-spacing:.06em;margin-top:.3rem}

.interests{display:flex;flex-wrap:wrap;justify-content:center;gap:.5rem}
.interest{display:inline-flex;align-items:center;gap:.45rem;padding:.35rem .8rem;border-radius:100px;border:1px solid var(--border);background:rgba(255,255,255,.03);font-size:.85rem}
.interest-level{font-size:.7rem;font-weight:700;letter-spacing:.04em}
.interest-more{color:var(--fg3);font-size:.85rem;align-self:center}

.actions{margin-top:1.75rem;display:flex;justify-content:center}
.cta{display:inline-block;padding:.65rem 1.4rem;border-radius:10px;background:var(--grad);color:#0a0a0a;font-weight:700;font-size:.95rem}
.cta:hover{opacity:.9;text-decoration:none}

.footer{text-align:center;margin-top:1rem;font-size:.8rem;color:var(--fg3)}
"#;

/// Inline CSS for error pages (lighter-weight than full page CSS).
pub const ERROR_CSS: &str = r#"
*{margin:0;padding:0;box-sizing:border-box}
body{font-family:-apple-system,BlinkMacSystemFont,"Segoe UI",Roboto,sans-serif;display:flex;justify-content:center;align-items:center;min-height:100vh;background:#0a0a0a;color:#f4f4f5;padding:1rem}
.error-page{text-align:center;max-width:400px}
.error-page h1{font-size:1.5rem;margin-bottom:.75rem}
.error-page p{color:#a1a1aa;margin-bottom:1rem;line-height:1.5}
.error-page a{color:#8276ED}
"#;

/// Content-Security-Policy for HTML responses. Pages carry no scripts.
pub const CSP_HEADER: &str = "default-src 'none'; style-src 'unsafe-inline'; img-src 'self' https: data:; form-action 'none'; frame-ancestors 'none'; base-uri 'none'";

/// Card image dimensions advertised in Open Graph tags.
pub const OG_IMAGE_WIDTH: u32 = 1200;
pub const OG_IMAGE_HEIGHT: u32 = 630;

/// Open Graph metadata for a page.
pub struct OpenGraphData<'a> {
    /// OG title.
    pub title: &'a str,
    /// OG description.
    pub description: &'a str,
    /// OG type (e.g., "profile", "website").
    pub og_type: &'a str,
    /// Absolute URL of the card image.
    pub image: Option<&'a str>,
}

/// Render the full HTML page shell with `<head>`, OG tags, and body content.
pub fn page_shell(
    canonical_url: &str,
    og: OpenGraphData<'_>,
    body_content: Markup,
    site_name: &str,
) -> Markup {
    html! {
        (maud::DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (og.title) }
                meta name="description" content=(og.description);
                link rel="canonical" href=(canonical_url);

                // Open Graph
                meta property="og:title" content=(og.title);
                meta property="og:description" content=(og.description);
                meta property="og:url" content=(canonical_url);
                meta property="og:site_name" content=(site_name);
                meta property="og:type" content=(og.og_type);
                @if let Some(image) = og.image {
                    meta property="og:image" content=(image);
                    meta property="og:image:width" content=(OG_IMAGE_WIDTH);
                    meta property="og:image:height" content=(OG_IMAGE_HEIGHT);
                    meta property="og:image:alt" content=(og.title);
                }

                // Twitter Card
                meta name="twitter:card" content="summary_large_image";
                meta name="twitter:title" content=(og.title);
                meta name="twitter:description" content=(og.description);
                @if let Some(image) = og.image {
                    meta name="twitter:image" content=(image);
                }

                style { (PreEscaped(PAGE_CSS)) }
            }
            body {
                main { (body_content) }
                footer class="footer" {
                    "Shared with " (site_name)
                }
            }
        }
    }
}

/// Site name with a round initial badge.
pub fn brand(site_name: &str) -> Markup {
    let initial = site_name
        .chars()
        .next()
        .unwrap_or('?')
        .to_uppercase()
        .to_string();

    html! {
        div class="brand" {
            span class="brand-mark" { (initial) }
            span class="brand-name" { (site_name) }
        }
    }
}

/// Row of stat blocks.
pub fn stat_row(stats: &[Stat]) -> Markup {
    html! {
        div class="stats" {
            @for stat in stats {
                div class="stat" {
                    @if let Some(color) = stat.color {
                        div class="stat-value" style=(format!("color:{color}")) { (stat.value) }
                    } @else {
                        div class="stat-value" { (stat.value) }
                    }
                    div class="stat-label" { (stat.label) }
                }
            }
        }
    }
}

/// Interest pills with a `+N more` marker for hidden entries.
pub fn interest_pills(interests: &[Interest], hidden: usize) -> Markup {
    html! {
        @if !interests.is_empty() {
            div class="interests" {
                @for interest in interests {
                    @let color = level_color(interest.level);
                    span class="interest" style=(format!("border-color:{color}66")) {
                        span class="interest-name" { (interest.name) }
                        span class="interest-level" style=(format!("color:{color}")) {
                            "LVL " (interest.level)
                        }
                    }
                }
                @if hidden > 0 {
                    span class="interest-more" { "+" (hidden) " more" }
                }
            }
        }
    }
}

/// Call-to-action button.
pub fn cta_button(url: &str, label: &str) -> Markup {
    html! {
        div class="actions" {
            a class="cta" href=(url) rel="noopener" target="_blank" { (label) }
        }
    }
}

/// Compute a strong ETag from a response body (xxh3, hex).
pub fn etag_for(body: &[u8]) -> String {
    let hash = xxhash_rust::xxh3::xxh3_64(body);
    format!("\"{}\"", hex_fmt::HexFmt(&hash.to_be_bytes()))
}
