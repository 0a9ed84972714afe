//! Dashboard page
//!
//! Renders the single static HTML page. The page pulls `/api/v1/snapshot`
//! once and then follows the WebSocket feed.

use super::DashboardVariant;

const TEMPLATE: &str = include_str!("dashboard.html");

/// Values substituted into the page template
#[derive(Debug, Clone)]
pub struct PageOptions {
    pub title: String,
    pub subtitle: String,
    pub variant: DashboardVariant,
}

impl Default for PageOptions {
    fn default() -> Self {
        Self {
            title: "Antarctic Explorer".to_string(),
            subtitle: "A demonstration of real-time temperature readings in Antarctica."
                .to_string(),
            variant: DashboardVariant::default(),
        }
    }
}

/// Render the dashboard HTML
pub fn render_page(options: &PageOptions) -> String {
    TEMPLATE
        .replace("{{title}}", &escape_html(&options.title))
        .replace("{{subtitle}}", &escape_html(&options.subtitle))
        .replace("{{variant}}", options.variant.as_str())
}

fn escape_html(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    for c in s.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&#39;"),
            _ => out.push(c),
        }
    }
    out
}
