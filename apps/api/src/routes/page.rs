use axum::{extract::State, response::Html};

use crate::config::Brand;
use crate::planning::prompt_builder::render_template;
use crate::state::AppState;

const INDEX_HTML: &str = include_str!("../../static/index.html");

/// GET /
/// The branded form page. Submissions go to `/api/v1/plans/stream`.
pub async fn index_handler(State(state): State<AppState>) -> Html<String> {
    Html(render_index(&state.config.brand))
}

fn render_index(brand: &Brand) -> String {
    let name = escape_html(&brand.name);
    let tagline = escape_html(&brand.tagline);

    render_template(INDEX_HTML, |key| match key {
        "brand_name" => Some(name.as_str()),
        "brand_tagline" => Some(tagline.as_str()),
        _ => None,
    })
}

fn escape_html(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
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
