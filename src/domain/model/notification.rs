use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum NotificationKind {
    Like,
    #[serde(alias = "comentario")]
    Comment,
    #[serde(alias = "grupo")]
    Group,
    #[serde(alias = "seguidor")]
    Follower,
    #[serde(alias = "evento")]
    Event,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum NotificationFilter {
    #[default]
    All,
    Unread,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Notification {
    pub id: String,
    pub kind: NotificationKind,
    pub title: String,
    pub message: String,
    #[serde(default)]
    pub read: bool,
    pub user_id: String,
    #[serde(default)]
    pub user_name: String,
    #[serde(default)]
    pub user_photo: String,
    /// Milliseconds since the Unix epoch.
    #[serde(default)]
    pub timestamp: i64,
}

/// Returns the list with notification `id` marked read.
pub fn mark_read(list: &[Notification], id: &str) -> Vec<Notification> {
    list.iter()
        .map(|n| {
            if n.id == id {
                Notification { read: true, ..n.clone() }
            } else {
                n.clone()
            }
        })
        .collect()
}

pub fn mark_all_read(list: &[Notification]) -> Vec<Notification> {
    list.iter()
        .map(|n| Notification { read: true, ..n.clone() })
        .collect()
}

pub fn unread_count(list: &[Notification]) -> usize {
    list.iter().filter(|n| !n.read).count()
}

pub fn filter(list: &[Notification], filter: NotificationFilter) -> Vec<&Notification> {
    match filter {
        NotificationFilter::All => list.iter().collect(),
        NotificationFilter::Unread => list.iter().filter(|n| !n.read).collect(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn notif(id: &str, read: bool) -> Notification {
        Notification {
            id: id.into(),
            kind: NotificationKind::Group,
            title: "New member".into(),
            message: "u2 joined Morning Runners".into(),
            read,
            user_id: "u1".into(),
            user_name: String::new(),
            user_photo: String::new(),
            timestamp: 0,
        }
    }

    #[test]
    fn test_mark_read_and_counts() {
        let list = vec![notif("n1", false), notif("n2", false), notif("n3", true)];
        assert_eq!(unread_count(&list), 2);
        assert_eq!(filter(&list, NotificationFilter::Unread).len(), 2);

        let list = mark_read(&list, "n1");
        assert!(list[0].read);
        assert!(!list[1].read);
        assert_eq!(unread_count(&list), 1);

        let list = mark_all_read(&list);
        assert_eq!(unread_count(&list), 0);
        assert_eq!(filter(&list, NotificationFilter::All).len(), 3);
    }

    #[test]
    fn test_legacy_kind_literals() {
        let kind: NotificationKind = serde_json::from_str("\"comentario\"").unwrap();
        assert_eq!(kind, NotificationKind::Comment);
    }
}
