//! HTTP server configuration object and helpers.

use std::env;
use std::net::SocketAddr;

use actix_web::cookie::Key;
use tracing::warn;

use backend::outbound::mailer::DEFAULT_FROM;

/// Mail provider settings, present only when a key is configured.
pub struct MailerSettings {
    pub api_url: String,
    pub api_key: String,
    pub from: String,
}

/// Builder-style configuration for creating the HTTP server.
pub struct ServerConfig {
    pub(crate) key: Key,
    pub(crate) cookie_secure: bool,
    pub(crate) bind_addr: SocketAddr,
    pub(crate) mailer: Option<MailerSettings>,
}

impl ServerConfig {
    /// Resolve configuration from the environment.
    ///
    /// - `BIND_ADDR` (default `0.0.0.0:8080`)
    /// - `SESSION_KEY_FILE` (default `/var/run/secrets/session_key`); when
    ///   unreadable, a temporary key is generated in debug builds or when
    ///   `SESSION_ALLOW_EPHEMERAL=1`
    /// - `SESSION_COOKIE_SECURE` (`0` disables the secure cookie flag)
    /// - `MAIL_API_KEY`, `MAIL_API_URL`, `MAIL_FROM` for the provider mailer
    ///
    /// # Errors
    /// Fails when the session key is unreadable and no ephemeral fallback is
    /// permitted, or when `BIND_ADDR` does not parse.
    pub fn from_env() -> std::io::Result<Self> {
        let bind_addr: SocketAddr = env::var("BIND_ADDR")
            .unwrap_or_else(|_| "0.0.0.0:8080".into())
            .parse()
            .map_err(|err| std::io::Error::other(format!("invalid BIND_ADDR: {err}")))?;

        let key_path =
            env::var("SESSION_KEY_FILE").unwrap_or_else(|_| "/var/run/secrets/session_key".into());
        let key = match std::fs::read(&key_path) {
            Ok(bytes) => Key::derive_from(&bytes),
            Err(err) => {
                let allow_dev = env::var("SESSION_ALLOW_EPHEMERAL").ok().as_deref() == Some("1");
                if cfg!(debug_assertions) || allow_dev {
                    warn!(path = %key_path, error = %err, "using temporary session key (dev only)");
                    Key::generate()
                } else {
                    return Err(std::io::Error::other(format!(
                        "failed to read session key at {key_path}: {err}"
                    )));
                }
            }
        };

        let cookie_secure = env::var("SESSION_COOKIE_SECURE")
            .map(|value| value != "0")
            .unwrap_or(true);

        let mailer = env::var("MAIL_API_KEY").ok().map(|api_key| MailerSettings {
            api_url: env::var("MAIL_API_URL")
                .unwrap_or_else(|_| "https://api.sendgrid.com/v3/mail/send".into()),
            api_key,
            from: env::var("MAIL_FROM").unwrap_or_else(|_| DEFAULT_FROM.into()),
        });

        Ok(Self {
            key,
            cookie_secure,
            bind_addr,
            mailer,
        })
    }
}
