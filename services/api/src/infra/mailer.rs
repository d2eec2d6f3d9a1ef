use std::sync::Arc;

use anyhow::Context as _;
use lettre::message::{Mailbox, Message, header};
use lettre::transport::smtp::authentication::Credentials;
use lettre::{AsyncSmtpTransport, AsyncTransport, Tokio1Executor};
use tracing::{info, warn};

use crate::config::MailerConfig;
use crate::domain::repository::CodeNotifier;
use crate::error::ApiError;

const LOGIN_SUBJECT: &str = "Your Login Code";

fn login_body(code: &str) -> String {
    format!("Your verification code is: {code}")
}

/// Sends login codes over SMTP (STARTTLS).
#[derive(Clone)]
pub struct SmtpMailer {
    transport: Arc<AsyncSmtpTransport<Tokio1Executor>>,
    from: Mailbox,
}

impl SmtpMailer {
    pub fn new(
        host: &str,
        port: u16,
        username: Option<&str>,
        password: Option<&str>,
        from: &str,
    ) -> anyhow::Result<Self> {
        let from = from
            .parse::<Mailbox>()
            .with_context(|| format!("invalid SMTP_FROM {from:?}"))?;
        let builder = AsyncSmtpTransport::<Tokio1Executor>::starttls_relay(host)
            .with_context(|| format!("invalid SMTP_HOST {host:?}"))?
            .port(port);
        let builder = match (username, password) {
            (Some(user), Some(pass)) => {
                builder.credentials(Credentials::new(user.to_owned(), pass.to_owned()))
            }
            _ => builder,
        };
        Ok(Self {
            transport: Arc::new(builder.build()),
            from,
        })
    }
}

impl CodeNotifier for SmtpMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), ApiError> {
        let to = email
            .parse::<Mailbox>()
            .with_context(|| format!("invalid recipient {email:?}"))
            .map_err(ApiError::Delivery)?;
        let message = Message::builder()
            .from(self.from.clone())
            .to(to)
            .subject(LOGIN_SUBJECT)
            .header(header::ContentType::TEXT_PLAIN)
            .body(login_body(code))
            .context("build login email")
            .map_err(ApiError::Delivery)?;
        self.transport
            .send(message)
            .await
            .context("smtp send")
            .map_err(ApiError::Delivery)?;
        info!("login code sent");
        Ok(())
    }
}

/// Writes the code to the log instead of mailing it.
#[derive(Clone, Default)]
pub struct LogMailer;

impl CodeNotifier for LogMailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), ApiError> {
        warn!(target: "dev_mailer", %email, subject = LOGIN_SUBJECT, body = %login_body(code), "login email not sent");
        Ok(())
    }
}

/// Mail backend selected at startup.
#[derive(Clone)]
pub enum Mailer {
    Smtp(SmtpMailer),
    Log(LogMailer),
}

impl Mailer {
    pub fn from_config(config: &MailerConfig) -> anyhow::Result<Self> {
        match config {
            MailerConfig::Log => {
                warn!("MAILER=log: login codes are written to the log, not emailed");
                Ok(Self::Log(LogMailer))
            }
            MailerConfig::Smtp {
                host,
                port,
                username,
                password,
                from,
            } => Ok(Self::Smtp(SmtpMailer::new(
                host,
                *port,
                username.as_deref(),
                password.as_deref(),
                from,
            )?)),
        }
    }
}

impl CodeNotifier for Mailer {
    async fn send_code(&self, email: &str, code: &str) -> Result<(), ApiError> {
        match self {
            Self::Smtp(m) => m.send_code(email, code).await,
            Self::Log(m) => m.send_code(email, code).await,
        }
    }
}
