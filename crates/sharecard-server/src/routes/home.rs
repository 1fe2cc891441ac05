//! Home page: a short landing page explaining the service.

use axum::extract::State;
use axum::response::IntoResponse;
use maud::{DOCTYPE, PreEscaped, html};

use crate::render::components::{PAGE_CSS, brand};
use crate::state::AppState;

/// Render the home page.
pub async fn home_page(State(state): State<AppState>) -> impl IntoResponse {
    let site_name = &state.config.site_name;
    let title = format!("{site_name} Share Cards");

    html! {
        (DOCTYPE)
        html lang="en" {
            head {
                meta charset="utf-8";
                meta name="viewport" content="width=device-width, initial-scale=1";
                title { (title) }
                meta name="description" content=(format!("Share your {site_name} profile as a link with a rich preview card."));
                meta property="og:title" content=(title);
                meta property="og:type" content="website";
                style { (PreEscaped(PAGE_CSS)) }
                style { (PreEscaped(HOME_CSS)) }
            }
            body {
                main class="card home" {
                    (brand(site_name))
                    p class="home-tagline" {
                        "Share your profile as a link that unfurls into a card."
                    }

                    div class="home-examples" {
                        div class="home-example" {
                            span class="home-label" { "Share" }
                            code { "POST /api/share" }
                        }
                        div class="home-example" {
                            span class="home-label" { "View" }
                            code { "/s/" span class="home-highlight" { "k3x9qa" } }
                        }
                        div class="home-example" {
                            span class="home-label" { "Profile" }
                            code { "/profile?wallet=" span class="home-highlight" { "0x..." } }
                        }
                        div class="home-example" {
                            span class="home-label" { "Image" }
                            code { "/api/og?wallet=" span class="home-highlight" { "0x..." } }
                        }
                    }

                    div class="home-try" {
                        a href="/profile?wallet=0x1234567890abcdef&level=5&signals=42&interests=DeFi:3,Art:2,Gaming:1" {
                            "View an example card"
                        }
                    }
                }
            }
        }
    }
}

/// Additional CSS for the home page only.
const HOME_CSS: &str = r#"
.home-tagline{font-size:1.05rem;color:var(--fg2);margin-bottom:1.5rem}
.home-examples{display:flex;flex-direction:column;gap:.5rem;text-align:left}
.home-example{display:flex;align-items:center;gap:.75rem;padding:.5rem .75rem;border-radius:8px;border:1px solid var(--border)}
.home-label{font-size:.75rem;font-weight:600;color:var(--fg3);text-transform:uppercase;letter-spacing:.05em;width:56px;text-align:right;flex-shrink:0}
.home-example code{font-family:var(--mono);font-size:.85rem;color:var(--fg2)}
.home-highlight{color:var(--accent);font-weight:600}
.home-try{margin-top:1.5rem}
"#;
