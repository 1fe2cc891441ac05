//! Card page renderer, shared by stored share links and the query-parameter
//! profile page.

use maud::{Markup, html};
use sharecard_core::truncate_wallet;

use super::CardView;
use super::components::{OpenGraphData, brand, cta_button, interest_pills, page_shell, stat_row};
use crate::config::Config;

/// Where a page lives and which image represents it.
pub struct PageLinks<'a> {
    /// Canonical URL of the page itself.
    pub canonical: &'a str,
    /// Absolute URL of the card image.
    pub og_image: &'a str,
}

/// Render a complete card page.
pub fn render(view: &CardView<'_>, links: PageLinks<'_>, config: &Config) -> Markup {
    let site_name = &config.site_name;
    let title = view.title(site_name);
    let description = view.description();
    let limit = config.page_interest_limit;
    let stats = view.stats();

    let og = OpenGraphData {
        title: &title,
        description: &description,
        og_type: "profile",
        image: Some(links.og_image),
    };

    let body = html! {
        div class="card" {
            (brand(site_name))

            h1 class="card-name" { (view.display_name()) }
            // Wallet under an explicit name
            @if view.snapshot.display_name.is_some() {
                div class="card-wallet" title=(view.snapshot.wallet) {
                    (truncate_wallet(&view.snapshot.wallet))
                }
            }

            (stat_row(&stats))
            (interest_pills(view.interests(limit), view.hidden_interests(limit)))
        }
        (cta_button(&config.cta_url, &format!("Get {site_name} Extension")))
    };

    page_shell(links.canonical, og, body, site_name)
}
