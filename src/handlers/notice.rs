// OAuth compatibility notice
// Terminal endpoint: the third-party OAuth flow is permanently discontinued,
// so every request gets 410 Gone pointing callers at API-key setup instead.

use axum::{
    extract::State,
    http::StatusCode,
    response::{Html, IntoResponse, Response},
};
use std::fmt::Write;
use tracing::info;

use super::AppState;

const FUNCTION_NAME: &str = "oauth-notice";
const INTEGRATION_NAME: &str = "third-party-oauth";

/// OAuth compatibility notice
/// any method /functions/oauth-notice
pub async fn oauth_notice(State(state): State<AppState>) -> Response {
    info!("Serving OAuth compatibility notice");

    match render_notice_page(&state.config.public_base_url) {
        Ok(page) => (StatusCode::GONE, Html(page)).into_response(),
        Err(err) => {
            report_fault(&err);
            (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response()
        }
    }
}

/// Reports an unexpected fault to the error-tracking collector, tagged with
/// the function and integration names.
fn report_fault(err: &anyhow::Error) {
    tracing::error!(
        function = FUNCTION_NAME,
        integration = INTEGRATION_NAME,
        error = %err,
        "Unexpected fault while serving OAuth notice"
    );
}

fn render_notice_page(base_url: &str) -> anyhow::Result<String> {
    let settings_url = format!("{}/settings/integrations", base_url.trim_end_matches('/'));

    let mut page = String::new();
    write!(
        page,
        r#"<!DOCTYPE html>
<html>
<head>
  <meta charset="utf-8">
  <title>OAuth Connection Unavailable</title>
  <style>
    body {{ font-family: -apple-system, sans-serif; max-width: 32rem; margin: 4rem auto; padding: 0 1rem; color: #333; }}
    h1 {{ font-size: 1.4rem; }}
    a {{ color: #2563eb; }}
  </style>
</head>
<body>
  <h1>OAuth connection no longer available</h1>
  <p>The OAuth sign-in flow for this integration has been permanently
  discontinued and will not return.</p>
  <p>To keep the integration working, connect it with an API key instead.</p>
  <p><a href="{settings_url}">Open integration settings</a></p>
</body>
</html>
"#
    )?;

    Ok(page)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_notice_page_links_to_settings() {
        let page = render_notice_page("https://app.example.com").unwrap();
        assert!(page.contains("https://app.example.com/settings/integrations"));
        assert!(page.contains("permanently"));
        assert!(page.contains("API key"));
    }

    #[test]
    fn test_notice_page_trims_trailing_slash() {
        let page = render_notice_page("https://app.example.com/").unwrap();
        assert!(page.contains("https://app.example.com/settings/integrations"));
        assert!(!page.contains("com//settings"));
    }
}
