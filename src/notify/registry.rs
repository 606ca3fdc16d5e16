//! Channel registry.

use std::collections::BTreeMap;
use std::sync::Arc;

use tracing::info;

use super::{Notification, NotificationChannel, NotificationDispatcher, NotifyError};

/// Read-only map from channel key to channel.
///
/// Built once with [`ChannelRegistry::builder`] and passed to whoever
/// dispatches; there is no global instance.
#[derive(Debug, Clone, Default)]
pub struct ChannelRegistry {
    channels: BTreeMap<String, Arc<dyn NotificationChannel>>,
}

/// Collects channels before freezing them into a registry.
#[derive(Debug, Default)]
pub struct ChannelRegistryBuilder {
    channels: BTreeMap<String, Arc<dyn NotificationChannel>>,
}

impl ChannelRegistry {
    pub fn builder() -> ChannelRegistryBuilder {
        ChannelRegistryBuilder::default()
    }

    /// Looks up a channel by key.
    pub fn get(&self, name: &str) -> Option<&Arc<dyn NotificationChannel>> {
        self.channels.get(name)
    }

    /// Channel keys in sorted order.
    pub fn names(&self) -> Vec<&str> {
        self.channels.keys().map(String::as_str).collect()
    }

    /// Enabled channels in key order.
    pub fn enabled(&self) -> impl Iterator<Item = &Arc<dyn NotificationChannel>> {
        self.channels.values().filter(|c| c.is_enabled())
    }

    pub fn len(&self) -> usize {
        self.channels.len()
    }

    pub fn is_empty(&self) -> bool {
        self.channels.is_empty()
    }
}

impl ChannelRegistryBuilder {
    /// Registers a channel under its own name. A later channel with the
    /// same name replaces the earlier one.
    pub fn with_channel<C: NotificationChannel + 'static>(mut self, channel: C) -> Self {
        self.channels
            .insert(channel.name().to_string(), Arc::new(channel));
        self
    }

    pub fn build(self) -> ChannelRegistry {
        ChannelRegistry {
            channels: self.channels,
        }
    }
}

impl NotificationDispatcher for ChannelRegistry {
    /// Sends to every enabled channel, continuing past failures.
    fn dispatch(&self, notification: &Notification) -> Result<(), NotifyError> {
        let failures: Vec<NotifyError> = self
            .enabled()
            .filter_map(|c| c.send(notification).err())
            .collect();
        if failures.is_empty() {
            Ok(())
        } else {
            Err(NotifyError::Partial(failures))
        }
    }
}

/// Writes notifications to the `tracing` log.
#[derive(Debug, Clone)]
pub struct LogChannel {
    enabled: bool,
}

impl LogChannel {
    pub fn new() -> Self {
        Self { enabled: true }
    }

    pub fn disabled() -> Self {
        Self { enabled: false }
    }
}

impl Default for LogChannel {
    fn default() -> Self {
        Self::new()
    }
}

impl NotificationChannel for LogChannel {
    fn name(&self) -> &str {
        "log"
    }

    fn is_enabled(&self) -> bool {
        self.enabled
    }

    fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
        info!(
            event = "assign.notification",
            kind = ?notification.kind,
            team_id = %notification.team_id,
            period_start = %notification.period_start,
            recipients = notification.recipients.len(),
            subject = %notification.subject,
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::notify::NotificationKind;
    use chrono::NaiveDate;
    use std::sync::Mutex;

    #[derive(Debug, Default)]
    struct RecordingChannel {
        name: &'static str,
        enabled: bool,
        fail: bool,
        sent: Mutex<Vec<String>>,
    }

    impl NotificationChannel for RecordingChannel {
        fn name(&self) -> &str {
            self.name
        }

        fn is_enabled(&self) -> bool {
            self.enabled
        }

        fn send(&self, notification: &Notification) -> Result<(), NotifyError> {
            if self.fail {
                return Err(NotifyError::ChannelFailed {
                    channel: self.name.into(),
                    reason: "unreachable".into(),
                });
            }
            self.sent.lock().unwrap().push(notification.subject.clone());
            Ok(())
        }
    }

    fn sample() -> Notification {
        Notification {
            kind: NotificationKind::BatchCommitted,
            team_id: "team".into(),
            period_start: NaiveDate::from_ymd_opt(2026, 10, 12).unwrap(),
            recipients: vec!["A".into()],
            subject: "hello".into(),
            body: String::new(),
        }
    }

    #[test]
    fn test_builder_registers_by_name() {
        let registry = ChannelRegistry::builder()
            .with_channel(LogChannel::new())
            .with_channel(RecordingChannel {
                name: "chat",
                enabled: true,
                ..Default::default()
            })
            .build();

        assert_eq!(registry.len(), 2);
        assert_eq!(registry.names(), vec!["chat", "log"]);
        assert!(registry.get("log").is_some());
        assert!(registry.get("mail").is_none());
    }

    #[test]
    fn test_dispatch_skips_disabled() {
        let registry = ChannelRegistry::builder()
            .with_channel(LogChannel::disabled())
            .with_channel(RecordingChannel {
                name: "off",
                enabled: false,
                fail: true,
                ..Default::default()
            })
            .build();

        assert_eq!(registry.enabled().count(), 0);
        assert!(registry.dispatch(&sample()).is_ok());
    }

    #[test]
    fn test_dispatch_reports_failures_and_continues() {
        let registry = ChannelRegistry::builder()
            .with_channel(RecordingChannel {
                name: "broken",
                enabled: true,
                fail: true,
                ..Default::default()
            })
            .with_channel(LogChannel::new())
            .build();

        let err = registry.dispatch(&sample()).unwrap_err();
        match err {
            NotifyError::Partial(failures) => assert_eq!(failures.len(), 1),
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_empty_registry() {
        let registry = ChannelRegistry::default();
        assert!(registry.is_empty());
        assert!(registry.dispatch(&sample()).is_ok());
    }
}
