// # Telegram Messenger
//
// This crate delivers the composed change notification to a Telegram chat
// via the Bot API.
//
// ## API Call
//
// ```http
// POST /bot<token>/sendMessage?chat_id=<id>&text=<text>&parse_mode=markdown
// ```
//
// The message text travels in the query string, markdown-formatted; the
// batching and formatting themselves live in `autocf-core`.

use std::fmt;
use std::time::Duration;

use tracing::debug;

use autocf_core::traits::Messenger;
use autocf_core::{Error, Result, Settings};

/// Default Telegram Bot API host
pub const DEFAULT_API_BASE: &str = "https://api.telegram.org";

/// HTTP timeout for sendMessage requests
const HTTP_TIMEOUT: Duration = Duration::from_secs(10);

/// Telegram-backed notification channel
pub struct TelegramMessenger {
    /// Bot API host, without a trailing slash
    api_base: String,

    /// Bot token, part of the request path
    token: String,

    /// Chat to deliver to; negative ids address groups
    chat_id: i64,

    /// HTTP client
    client: reqwest::Client,
}

impl TelegramMessenger {
    /// Create a messenger against the public Bot API
    pub fn new(token: impl Into<String>, chat_id: i64) -> Self {
        Self::with_api_base(DEFAULT_API_BASE, token, chat_id)
    }

    /// Create a messenger against a custom API host; the tests use this
    pub fn with_api_base(
        api_base: impl Into<String>,
        token: impl Into<String>,
        chat_id: i64,
    ) -> Self {
        Self {
            api_base: api_base.into(),
            token: token.into(),
            chat_id,
            client: reqwest::Client::builder()
                .timeout(HTTP_TIMEOUT)
                .build()
                .unwrap_or_default(),
        }
    }

    /// Create a messenger from loaded settings
    pub fn from_settings(settings: &Settings) -> Self {
        Self::new(settings.telegram_token.clone(), settings.telegram_user_id)
    }
}

// Custom Debug implementation that keeps the bot token out of logs
impl fmt::Debug for TelegramMessenger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("TelegramMessenger")
            .field("api_base", &self.api_base)
            .field("token", &"<REDACTED>")
            .field("chat_id", &self.chat_id)
            .finish_non_exhaustive()
    }
}

#[async_trait::async_trait]
impl Messenger for TelegramMessenger {
    async fn send(&self, text: &str) -> Result<()> {
        let url = format!("{}/bot{}/sendMessage", self.api_base, self.token);
        let chat_id = self.chat_id.to_string();

        let response = self
            .client
            .post(&url)
            .query(&[
                ("chat_id", chat_id.as_str()),
                ("text", text),
                ("parse_mode", "markdown"),
            ])
            .send()
            .await
            .map_err(|e| Error::http(format!("sendMessage request failed: {e}")))?;

        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "Unable to read error response".to_string());
            return Err(Error::notification(status.as_u16(), body));
        }

        debug!("notification delivered to chat {}", self.chat_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{method, path, query_param};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    #[tokio::test]
    async fn sends_the_text_as_markdown_query_params() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botbot-token/sendMessage"))
            .and(query_param("chat_id", "42"))
            .and(query_param("text", "*Autocloudflare*\n- a change"))
            .and(query_param("parse_mode", "markdown"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let messenger = TelegramMessenger::with_api_base(server.uri(), "bot-token", 42);
        messenger.send("*Autocloudflare*\n- a change").await.unwrap();
    }

    #[tokio::test]
    async fn group_chats_have_negative_ids() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botbot-token/sendMessage"))
            .and(query_param("chat_id", "-100123456"))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "ok": true })))
            .expect(1)
            .mount(&server)
            .await;

        let messenger = TelegramMessenger::with_api_base(server.uri(), "bot-token", -100123456);
        messenger.send("hello").await.unwrap();
    }

    #[tokio::test]
    async fn non_2xx_surfaces_as_notification_error() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/botbot-token/sendMessage"))
            .respond_with(ResponseTemplate::new(400).set_body_json(json!({
                "ok": false,
                "description": "Bad Request: chat not found"
            })))
            .mount(&server)
            .await;

        let messenger = TelegramMessenger::with_api_base(server.uri(), "bot-token", 42);
        let result = messenger.send("hello").await;

        match result {
            Err(Error::Notification { status, body }) => {
                assert_eq!(status, 400);
                assert!(body.contains("chat not found"));
            }
            other => panic!("expected a notification error, got {other:?}"),
        }
    }

    #[test]
    fn bot_token_not_exposed_in_debug() {
        let messenger = TelegramMessenger::new("secret-token", 42);

        let debug_str = format!("{messenger:?}");
        assert!(!debug_str.contains("secret-token"));
        assert!(debug_str.contains("TelegramMessenger"));
    }
}
