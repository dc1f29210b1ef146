use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::errors::{FieldError, Result};
use crate::types::{EmployeeId, NotificationId};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Notification {
    pub id: NotificationId,
    pub title: String,
    pub message: String,
    /// `None` broadcasts to every employee
    #[serde(default)]
    pub user_id: Option<EmployeeId>,
    #[serde(default)]
    pub is_read: bool,
    #[serde(default)]
    pub created_at: Option<DateTime<Utc>>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct NewNotification {
    pub title: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub user_id: Option<EmployeeId>,
}

impl NewNotification {
    pub fn new(title: &str, message: &str, user_id: Option<EmployeeId>) -> Result<Self> {
        let title = title.trim();
        let message = message.trim();
        if title.is_empty() {
            return Err(FieldError::new("title", "is required").into());
        }
        if message.is_empty() {
            return Err(FieldError::new("message", "is required").into());
        }
        Ok(Self {
            title: title.to_string(),
            message: message.to_string(),
            user_id,
        })
    }
}

/// unread count for the bell badge
pub fn unread_count(notifications: &[Notification]) -> usize {
    notifications.iter().filter(|n| !n.is_read).count()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_new_notification_requires_text() {
        assert!(NewNotification::new(" ", "body", None).is_err());
        assert!(NewNotification::new("Title", "", None).is_err());
        let n = NewNotification::new(" Due reminder ", "Collect Ravi's due", Some(4)).unwrap();
        assert_eq!(n.title, "Due reminder");
    }

    #[test]
    fn test_unread_count() {
        let list: Vec<Notification> = serde_json::from_str(
            r#"[
                {"id": 1, "title": "a", "message": "x", "is_read": true},
                {"id": 2, "title": "b", "message": "y"}
            ]"#,
        )
        .unwrap();
        assert_eq!(unread_count(&list), 1);
    }
}
