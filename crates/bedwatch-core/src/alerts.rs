// ── Alert change detection ──
//
// Each dashboard snapshot carries the full alert list. An alert is "new"
// when its (date, severity) pair did not appear in the previous list;
// only new alerts are surfaced as notifications.

use std::collections::HashSet;

use bedwatch_api::{Alert, AlertSeverity};

use crate::notify::{Notification, NotificationLevel};

/// Notification level for a dashboard alert severity.
pub fn severity_level(severity: AlertSeverity) -> NotificationLevel {
    match severity {
        AlertSeverity::Red => NotificationLevel::Error,
        AlertSeverity::Yellow => NotificationLevel::Warning,
        AlertSeverity::Green => NotificationLevel::Info,
    }
}

/// Alerts in `next` whose (date, severity) pair is absent from `previous`.
pub fn fresh_alerts<'a>(previous: &[Alert], next: &'a [Alert]) -> Vec<&'a Alert> {
    let seen: HashSet<(&str, AlertSeverity)> = previous.iter().map(Alert::key).collect();
    next.iter().filter(|a| !seen.contains(&a.key())).collect()
}

/// Remembers the last alert list and turns each new one into notifications.
#[derive(Debug, Default)]
pub struct AlertTracker {
    previous: Vec<Alert>,
}

impl AlertTracker {
    /// Diff `next` against the remembered list, then remember `next`.
    pub fn observe(&mut self, next: &[Alert]) -> Vec<Notification> {
        let notifications = fresh_alerts(&self.previous, next)
            .into_iter()
            .map(|a| {
                Notification::new(
                    severity_level(a.severity),
                    format!("{}: {}", a.date, a.message),
                )
            })
            .collect();
        self.previous = next.to_vec();
        notifications
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    fn alert(date: &str, severity: AlertSeverity) -> Alert {
        Alert {
            date: date.into(),
            severity,
            message: format!("{severity} on {date}"),
        }
    }

    #[test]
    fn only_unseen_pairs_are_fresh() {
        let previous = vec![
            alert("2025-03-02", AlertSeverity::Yellow),
            alert("2025-03-03", AlertSeverity::Red),
        ];
        let next = vec![
            alert("2025-03-02", AlertSeverity::Yellow),
            alert("2025-03-02", AlertSeverity::Red),
            alert("2025-03-04", AlertSeverity::Green),
        ];

        let fresh: Vec<_> = fresh_alerts(&previous, &next).into_iter().map(Alert::key).collect();
        assert_eq!(
            fresh,
            vec![("2025-03-02", AlertSeverity::Red), ("2025-03-04", AlertSeverity::Green)]
        );
    }

    #[test]
    fn message_text_does_not_affect_identity() {
        let mut reworded = alert("2025-03-02", AlertSeverity::Yellow);
        reworded.message = "different wording".into();
        assert!(fresh_alerts(&[alert("2025-03-02", AlertSeverity::Yellow)], &[reworded]).is_empty());
    }

    #[test]
    fn tracker_maps_severity_and_replaces_history() {
        let mut tracker = AlertTracker::default();

        let first = tracker.observe(&[
            alert("2025-03-02", AlertSeverity::Red),
            alert("2025-03-03", AlertSeverity::Yellow),
            alert("2025-03-04", AlertSeverity::Green),
        ]);
        let levels: Vec<_> = first.iter().map(|n| n.level).collect();
        assert_eq!(
            levels,
            vec![NotificationLevel::Error, NotificationLevel::Warning, NotificationLevel::Info]
        );

        // Identical list: nothing new.
        assert!(tracker.observe(&[alert("2025-03-02", AlertSeverity::Red)]).is_empty());

        // The previous list was replaced, so the yellow alert counts as new again.
        let again = tracker.observe(&[alert("2025-03-03", AlertSeverity::Yellow)]);
        assert_eq!(again.len(), 1);
    }
}
