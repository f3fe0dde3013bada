//! Discord channel notifier using the bot REST API.

use std::time::Duration;

use async_trait::async_trait;
use reqwest::Client;
use serde::Serialize;

use super::Notifier;
use crate::error::SendError;

pub const DEFAULT_API_BASE: &str = "https://discord.com/api/v10";

/// Posts messages to a single Discord channel as a bot.
pub struct DiscordNotifier {
    client: Client,
    api_base: String,
    channel_id: String,
    token: String,
}

#[derive(Debug, Serialize)]
struct CreateMessage<'a> {
    content: &'a str,
    allowed_mentions: AllowedMentions,
}

// Page text must never ping anyone
#[derive(Debug, Serialize)]
struct AllowedMentions {
    parse: [&'static str; 0],
}

impl DiscordNotifier {
    /// Creates a notifier for `channel_id`, authenticating with a bot `token`.
    ///
    /// # Errors
    ///
    /// Returns [`reqwest::Error`] if the HTTP client cannot be constructed.
    pub fn new(
        api_base: &str,
        channel_id: impl Into<String>,
        token: impl Into<String>,
        timeout: Duration,
        user_agent: &str,
    ) -> Result<Self, reqwest::Error> {
        let client = Client::builder()
            .timeout(timeout)
            .user_agent(user_agent)
            .build()?;
        Ok(Self {
            client,
            api_base: api_base.trim_end_matches('/').to_string(),
            channel_id: channel_id.into(),
            token: token.into(),
        })
    }

    fn messages_url(&self) -> String {
        format!("{}/channels/{}/messages", self.api_base, self.channel_id)
    }
}

#[async_trait]
impl Notifier for DiscordNotifier {
    async fn send(&self, message: &str) -> Result<(), SendError> {
        let body = CreateMessage {
            content: message,
            allowed_mentions: AllowedMentions { parse: [] },
        };

        let response = self
            .client
            .post(self.messages_url())
            .header(reqwest::header::AUTHORIZATION, format!("Bot {}", self.token))
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(SendError::Rejected {
                status: status.as_u16(),
                body,
            });
        }

        ::log::debug!("Posted notification to channel {}", self.channel_id);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;
    use wiremock::matchers::{body_json, header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn test_notifier(api_base: &str) -> DiscordNotifier {
        DiscordNotifier::new(
            api_base,
            "1234",
            "secret-token",
            Duration::from_secs(5),
            "page-watch-test/0.1",
        )
        .expect("failed to build test DiscordNotifier")
    }

    #[test]
    fn test_messages_url_trims_trailing_slash() {
        let notifier = test_notifier("https://discord.com/api/v10/");
        assert_eq!(
            notifier.messages_url(),
            "https://discord.com/api/v10/channels/1234/messages"
        );
    }

    #[tokio::test]
    async fn test_send_posts_message_with_bot_auth() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .and(path("/channels/1234/messages"))
            .and(header("authorization", "Bot secret-token"))
            .and(body_json(json!({
                "content": "**Launch**\nWe shipped v1.",
                "allowed_mentions": { "parse": [] }
            })))
            .respond_with(ResponseTemplate::new(200).set_body_json(json!({"id": "1"})))
            .expect(1)
            .mount(&server)
            .await;

        let result = test_notifier(&server.uri())
            .send("**Launch**\nWe shipped v1.")
            .await;

        assert!(result.is_ok(), "expected Ok, got: {result:?}");
    }

    #[tokio::test]
    async fn test_send_rejected_status_is_error() {
        let server = MockServer::start().await;

        Mock::given(method("POST"))
            .respond_with(ResponseTemplate::new(403).set_body_string("Missing Access"))
            .mount(&server)
            .await;

        let err = test_notifier(&server.uri()).send("hi").await.unwrap_err();

        match err {
            SendError::Rejected { status, body } => {
                assert_eq!(status, 403);
                assert_eq!(body, "Missing Access");
            }
            other => panic!("expected Rejected, got: {other:?}"),
        }
    }
}
