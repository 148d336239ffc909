//! Outbound adapters backing the domain ports.

pub mod mailer;
pub mod memory;
