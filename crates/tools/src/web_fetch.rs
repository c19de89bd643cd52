//! Fetch a web page and convert it to readable markdown.

use async_trait::async_trait;
use conclave_core::{Action, ActionContext, ActionError, ActionHandler, ParamSpec};
use htmd::HtmlToMarkdown;
use std::sync::Arc;
use tracing::debug;

/// Pages beyond this are truncated before being shown to the model.
const MAX_CONTENT_CHARS: usize = 20_000;

struct FetchWebpage {
    client: reqwest::Client,
}

impl FetchWebpage {
    fn new() -> Self {
        let client = reqwest::Client::builder()
            .timeout(std::time::Duration::from_secs(10))
            .user_agent("conclave/0.1")
            .build()
            .expect("Failed to create HTTP client");
        Self { client }
    }

    fn html_to_text(html: &str) -> Result<String, String> {
        HtmlToMarkdown::builder()
            .skip_tags(vec!["script", "style", "nav", "footer", "header"])
            .build()
            .convert(html)
            .map_err(|e| e.to_string())
    }
}

#[async_trait]
impl ActionHandler for FetchWebpage {
    async fn call(
        &self,
        _ctx: &ActionContext,
        args: &serde_json::Map<String, serde_json::Value>,
    ) -> Result<serde_json::Value, ActionError> {
        let url = args.get("url").and_then(|v| v.as_str()).unwrap_or_default();

        let response = match self.client.get(url).send().await {
            Ok(r) => r,
            Err(e) => return Ok(serde_json::json!(format!("Failed scraping: {e}"))),
        };
        let html = match response.text().await {
            Ok(t) => t,
            Err(e) => return Ok(serde_json::json!(format!("Failed scraping: {e}"))),
        };

        let mut text = match Self::html_to_text(&html) {
            Ok(t) => t,
            Err(e) => return Ok(serde_json::json!(format!("Failed scraping: {e}"))),
        };
        if text.len() > MAX_CONTENT_CHARS {
            let mut cut = MAX_CONTENT_CHARS;
            while !text.is_char_boundary(cut) {
                cut -= 1;
            }
            text.truncate(cut);
            text.push_str("\n\n[content truncated]");
        }

        debug!(url = %url, chars = text.len(), "Fetched webpage");
        Ok(serde_json::json!(text))
    }
}

pub fn action() -> Action {
    Action::new(
        "fetch_webpage",
        "Fetch a webpage and return its content as readable markdown. Provide the URL.",
        Arc::new(FetchWebpage::new()),
    )
    .with_tags([crate::TAG_WEB])
    .with_params([ParamSpec::string("url", "The URL of the webpage")])
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn html_is_converted_and_junk_stripped() {
        let html = concat!(
            "<html><head><script>alert(1)</script><style>p{}</style></head>",
            "<body><nav>menu</nav><h1>Title</h1><p>Body text.</p>",
            "<footer>legal</footer></body></html>",
        );
        let text = FetchWebpage::html_to_text(html).unwrap();
        assert!(text.contains("Title"));
        assert!(text.contains("Body text."));
        assert!(!text.contains("alert(1)"));
        assert!(!text.contains("menu"));
        assert!(!text.contains("legal"));
    }

    #[tokio::test]
    async fn unreachable_url_is_a_descriptive_value() {
        let ctx = ActionContext::default();
        let args = serde_json::json!({"url": "http://127.0.0.1:1/never"});
        let result = action()
            .invoke(&ctx, args.as_object().unwrap())
            .await
            .unwrap();
        assert!(result.as_str().unwrap().contains("Failed scraping"));
    }
}
