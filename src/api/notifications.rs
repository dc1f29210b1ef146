use reqwest::Method;
use tracing::instrument;

use crate::api::ApiClient;
use crate::errors::Result;
use crate::models::{NewNotification, Notification};
use crate::types::NotificationId;

impl ApiClient {
    #[instrument(skip(self))]
    pub async fn notifications(&self) -> Result<Vec<Notification>> {
        let request = self.authed(Method::GET, "notifications")?;
        self.send_json(request).await
    }

    #[instrument(skip(self, notification), fields(title = %notification.title))]
    pub async fn create_notification(&self, notification: &NewNotification) -> Result<Notification> {
        let request = self.authed(Method::POST, "notifications")?.json(notification);
        self.send_json(request).await
    }

    #[instrument(skip(self))]
    pub async fn mark_notification_read(&self, id: NotificationId) -> Result<()> {
        let request = self.authed(Method::PUT, &format!("notifications/{id}/read"))?;
        self.send_empty(request).await
    }

    #[instrument(skip(self))]
    pub async fn delete_notification(&self, id: NotificationId) -> Result<()> {
        let request = self.authed(Method::DELETE, &format!("notifications/{id}"))?;
        self.send_empty(request).await
    }
}
