// SPDX-License-Identifier: MIT

//! Transactional email over SMTP.
//!
//! When SMTP credentials are absent the mailer runs in no-op mode and only
//! logs, so local development and tests never need a mail server.

use crate::config::Config;
use crate::error::{AppError, Result};
use lettre::message::header::ContentType;
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Message, Tokio1Executor};

#[derive(Clone)]
pub struct Mailer {
    transport: Option<AsyncSmtpTransport<Tokio1Executor>>,
    from: String,
    client_url: String,
}

impl Mailer {
    pub fn new(config: &Config) -> Result<Self> {
        let transport = if !config.smtp_username.is_empty() && !config.smtp_password.is_empty() {
            let transport = AsyncSmtpTransport::<Tokio1Executor>::relay(&config.smtp_host)
                .map_err(|e| AppError::Email(format!("SMTP relay setup failed: {}", e)))?
                .credentials(Credentials::new(
                    config.smtp_username.clone(),
                    config.smtp_password.clone(),
                ))
                .build();
            Some(transport)
        } else {
            tracing::warn!("SMTP not configured, emails will be logged only");
            None
        };

        Ok(Self {
            transport,
            from: config.smtp_from.clone(),
            client_url: config.client_url.clone(),
        })
    }

    /// A mailer that never sends, for tests.
    pub fn new_noop() -> Self {
        Self {
            transport: None,
            from: "noreply@fittrack.test".to_string(),
            client_url: "http://localhost:3000".to_string(),
        }
    }

    pub async fn send_verification_email(&self, to: &str, token: &str) -> Result<()> {
        let link = format!("{}/verify-email?token={}", self.client_url, token);
        let body = format!(
            "Welcome to FitTrack!\n\n\
             Please verify your email address by opening the link below:\n\n\
             {}\n\n\
             If you did not create an account, you can ignore this email.\n",
            link
        );
        self.send(to, "Verify your email address", body).await
    }

    pub async fn send_password_reset_email(&self, to: &str, token: &str) -> Result<()> {
        let link = format!("{}/reset-password?token={}", self.client_url, token);
        let body = format!(
            "A password reset was requested for your FitTrack account.\n\n\
             Open the link below to choose a new password. The link expires \
             in 10 minutes:\n\n\
             {}\n\n\
             If you did not request a reset, you can ignore this email.\n",
            link
        );
        self.send(to, "Reset your password", body).await
    }

    async fn send(&self, to: &str, subject: &str, body: String) -> Result<()> {
        let Some(transport) = &self.transport else {
            tracing::info!(to = %to, subject = %subject, "email suppressed (no SMTP transport)");
            return Ok(());
        };

        let message = Message::builder()
            .from(
                self.from
                    .parse()
                    .map_err(|e| AppError::Email(format!("Invalid from address: {}", e)))?,
            )
            .to(to
                .parse()
                .map_err(|e| AppError::Email(format!("Invalid recipient address: {}", e)))?)
            .subject(subject)
            .header(ContentType::TEXT_PLAIN)
            .body(body)
            .map_err(|e| AppError::Email(format!("Failed to build email: {}", e)))?;

        transport
            .send(message)
            .await
            .map_err(|e| AppError::Email(format!("Failed to send email: {}", e)))?;

        tracing::info!(to = %to, subject = %subject, "email sent");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_noop_mailer_accepts_sends() {
        let mailer = Mailer::new_noop();
        mailer
            .send_verification_email("user@example.com", "tok123")
            .await
            .unwrap();
        mailer
            .send_password_reset_email("user@example.com", "tok456")
            .await
            .unwrap();
    }
}
