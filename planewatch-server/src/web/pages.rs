//! HTML page handler: serves the "Find Plane" map page.
//!
//! The page body is embedded at compile time via `include_str!` and wrapped
//! in a shared layout. Airport placeholders are filled per request.

use std::sync::Arc;

use axum::extract::State;
use axum::response::Html;

use crate::web::AppState;

const BASE_CSS: &str = r#"* { margin: 0; padding: 0; box-sizing: border-box; }
body { font-family: 'Courier New', monospace; background: #0a0a0a; color: #e0e0e0; }
nav { background: #111; border-bottom: 1px solid #333; padding: 8px 16px; display: flex; align-items: center; gap: 24px; }
nav .brand { color: #00ff88; font-weight: bold; font-size: 14px; text-decoration: none; }
nav .airport { color: #888; font-size: 13px; }
.container { padding: 16px; max-width: 960px; }
button { background: #00ff88; color: #0a0a0a; border: none; padding: 10px 20px; font-family: inherit; font-weight: bold; cursor: pointer; border-radius: 4px; }
button:disabled { background: #335; color: #888; cursor: wait; }
.card { background: #111; border: 1px solid #333; padding: 12px 16px; margin: 12px 0; border-radius: 4px; }
.card h3 { color: #00ff88; font-size: 16px; margin-bottom: 6px; }
.card .status { color: #888; font-size: 12px; }
.note { color: #888; margin: 12px 0; }
.error { color: #ff4444; margin: 12px 0; }
#map { height: 450px; margin-top: 16px; border: 1px solid #333; }
a { color: #00aaff; }"#;

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

fn render_page(title: &str, airport_code: &str, body: &str) -> Html<String> {
    let mut s = String::with_capacity(body.len() + BASE_CSS.len() + 1024);
    s.push_str("<!DOCTYPE html>\n<html lang=\"en\">\n<head>\n");
    s.push_str("<meta charset=\"UTF-8\">\n");
    s.push_str("<meta name=\"viewport\" content=\"width=device-width, initial-scale=1.0\">\n");
    s.push_str("<title>planewatch");
    if !title.is_empty() {
        s.push_str(" | ");
        s.push_str(title);
    }
    s.push_str("</title>\n");
    s.push_str("<link rel=\"stylesheet\" href=\"https://unpkg.com/leaflet@1.9.4/dist/leaflet.css\" />\n");
    s.push_str("<style>\n");
    s.push_str(BASE_CSS);
    s.push_str("\n</style>\n");
    s.push_str("</head>\n<body>\n");
    s.push_str("<nav>\n    <a href=\"/\" class=\"brand\">planewatch</a>\n    <span class=\"airport\">");
    s.push_str(airport_code);
    s.push_str("</span>\n</nav>\n");
    s.push_str(body);
    s.push_str("\n</body>\n</html>");
    Html(s)
}

/// GET /: title, "Find Plane" button, result cards, and map.
pub async fn page_index(State(state): State<Arc<AppState>>) -> Html<String> {
    let code = escape_html(&state.airport.code);
    let name = escape_html(&state.airport.name);
    let body = include_str!("../../templates/index.html")
        .replace("{{AIRPORT_CODE}}", &code)
        .replace("{{AIRPORT_NAME}}", &name);
    render_page(&name, &code, &body)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_escape_html() {
        assert_eq!(escape_html("A&B <x>"), "A&amp;B &lt;x&gt;");
        assert_eq!(escape_html("Love Field"), "Love Field");
    }

    #[test]
    fn test_render_page_layout() {
        let Html(page) = render_page("Dallas Love Field", "KDAL", "<p>body</p>");
        assert!(page.starts_with("<!DOCTYPE html>"));
        assert!(page.contains("<title>planewatch | Dallas Love Field</title>"));
        assert!(page.contains("leaflet.css"));
        assert!(page.contains("<p>body</p>"));
    }

    #[tokio::test]
    async fn test_index_page_served() {
        use axum::body::Body;
        use axum::http::{Request, StatusCode};
        use planewatch_core::config::Config;
        use planewatch_core::Pipeline;
        use tower::ServiceExt;

        use crate::finder::tests::MockSource;

        let config = Config::default();
        let state = Arc::new(AppState {
            source: Arc::new(MockSource::new(Vec::new(), Vec::new())),
            pipeline: Pipeline::from_config(&config),
            airport: config.airport.clone(),
            bbox: config.bbox,
            lookback_secs: config.opensky.lookback_secs,
        });

        let response = crate::web::build_router(state)
            .oneshot(Request::builder().uri("/").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);

        let body = axum::body::to_bytes(response.into_body(), 1024 * 1024)
            .await
            .unwrap();
        let page = String::from_utf8(body.to_vec()).unwrap();
        assert!(page.contains("<h1>What's That Plane from Dallas Love Field?</h1>"));
        assert!(page.contains("(KDAL)"));
        assert!(!page.contains("{{AIRPORT_"));
    }

    #[test]
    fn test_template_placeholders() {
        let template = include_str!("../../templates/index.html");
        assert!(template.contains("{{AIRPORT_NAME}}"));
        assert!(template.contains("/api/find"));
    }
}
