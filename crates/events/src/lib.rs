//! Notification infrastructure.
//!
//! - [`NotificationDispatcher`]: writes in-app notifications and fans them
//!   out to recipients, with best-effort email delivery on top.
//! - [`Mailer`]: background SMTP worker fed through a bounded channel.

pub mod dispatcher;
pub mod mailer;

pub use dispatcher::NotificationDispatcher;
pub use mailer::{EmailConfig, Mailer, MailerHandle};
