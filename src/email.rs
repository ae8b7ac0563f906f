use anyhow::Context;
use secrecy::ExposeSecret;

use crate::config::{Config, Email};

/// Thin client for the transactional mail service. One request, no retry.
#[derive(Clone)]
pub struct EmailClient {
    http_client: reqwest::Client,
    config: Email,
}

#[derive(serde::Serialize)]
struct SendEmailRequest<'a> {
    from: &'a str,
    to: &'a str,
    subject: &'a str,
    text_body: String,
}

impl EmailClient {
    pub fn new(http_client: reqwest::Client, config: Email) -> Self {
        EmailClient {
            http_client,
            config,
        }
    }

    #[tracing::instrument(name = "send login link", skip_all, fields(recipient))]
    pub async fn send_login_link(
        &self,
        recipient: &str,
        login_url: &str,
    ) -> Result<(), anyhow::Error> {
        let body = SendEmailRequest {
            from: &self.config.sender,
            to: recipient,
            subject: "Your login link",
            text_body: format!(
                "Follow this link to sign in: {}\n\nThe link expires shortly and works once.",
                login_url
            ),
        };

        self.http_client
            .post(format!("{}/email", self.config.base_url))
            .header("x-server-token", self.config.send_token.expose_secret())
            .json(&body)
            .send()
            .await
            .context("sending login email")?
            .error_for_status()
            .context("login email status")?;

        Ok(())
    }
}

pub fn login_link(config: &Config, code: &str) -> String {
    format!("{}/auth/callback?code={}", config.application.base_url, code)
}
