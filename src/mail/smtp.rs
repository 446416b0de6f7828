// src/mail/smtp.rs

use std::fmt;

use lettre::message::header::ContentType;
use lettre::message::Mailbox;
use lettre::{Message, SmtpTransport, Transport};

use super::{MailError, MailMessage, MailTransport};

/// Plain SMTP relay transport (no TLS, no auth), one connection per message.
pub struct SmtpMailer {
    server: String,
    port: u16,
    transport: SmtpTransport,
}

impl fmt::Debug for SmtpMailer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SmtpMailer")
            .field("server", &self.server)
            .field("port", &self.port)
            .finish_non_exhaustive()
    }
}

impl SmtpMailer {
    pub fn new(server: impl Into<String>, port: u16) -> Self {
        let server = server.into();
        let transport = SmtpTransport::builder_dangerous(server.as_str())
            .port(port)
            .build();
        Self {
            server,
            port,
            transport,
        }
    }
}

impl MailTransport for SmtpMailer {
    fn send(&self, message: &MailMessage) -> Result<(), MailError> {
        let email = Message::builder()
            .from(parse_mailbox(&message.from)?)
            .to(parse_mailbox(&message.to)?)
            .subject(message.subject.as_str())
            .header(ContentType::TEXT_PLAIN)
            .body(message.body.clone())
            .map_err(|e| MailError::Message(e.to_string()))?;

        self.transport
            .send(&email)
            .map_err(|e| MailError::Transport(e.to_string()))?;
        Ok(())
    }
}

fn parse_mailbox(address: &str) -> Result<Mailbox, MailError> {
    address.parse::<Mailbox>().map_err(|e| MailError::Address {
        address: address.to_string(),
        reason: e.to_string(),
    })
}
