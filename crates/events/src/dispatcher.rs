//! Notification fan-out.
//!
//! [`NotificationDispatcher`] is the single entry point the workflows use to
//! reach people. Every notification lands as an in-app row first; email is
//! layered on top as best effort and can never fail a request.

use futures::future::join_all;

use devalign_db::models::notification::{NewNotification, Notification};
use devalign_db::models::user::User;
use devalign_db::repositories::NotificationRepo;
use devalign_db::DbPool;

use crate::mailer::{MailerHandle, OutgoingEmail};

/// Delivers notifications to users, in-app always and by email when a
/// mailer is configured.
#[derive(Clone)]
pub struct NotificationDispatcher {
    pool: DbPool,
    mailer: Option<MailerHandle>,
}

impl NotificationDispatcher {
    pub fn new(pool: DbPool, mailer: Option<MailerHandle>) -> Self {
        Self { pool, mailer }
    }

    /// Notify a single user.
    ///
    /// The in-app insert is synchronous and its failure propagates. Email
    /// is queued after the insert succeeds and cannot fail the call.
    pub async fn notify(
        &self,
        recipient: &User,
        input: &NewNotification,
    ) -> Result<Notification, sqlx::Error> {
        let notification = NotificationRepo::create(&self.pool, recipient.id, input).await?;
        if let Some(mailer) = &self.mailer {
            mailer.enqueue(OutgoingEmail {
                to: recipient.email.clone(),
                subject: input.title.clone(),
                title: input.title.clone(),
                message: input.message.clone(),
            });
        }
        Ok(notification)
    }

    /// Notify many users with the same content.
    ///
    /// Recipients are independent: one failed insert is logged and does not
    /// stop the rest. Returns the number of notifications delivered in-app.
    pub async fn notify_many(&self, recipients: &[User], input: &NewNotification) -> usize {
        let results = join_all(
            recipients
                .iter()
                .map(|recipient| self.notify(recipient, input)),
        )
        .await;

        let mut delivered = 0;
        for (recipient, result) in recipients.iter().zip(results) {
            match result {
                Ok(_) => delivered += 1,
                Err(e) => {
                    tracing::error!(
                        user_id = recipient.id,
                        error = %e,
                        "Failed to deliver notification"
                    );
                }
            }
        }
        delivered
    }
}
