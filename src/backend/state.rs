use std::collections::{HashMap, HashSet};

use chrono::Utc;
use serde::Serialize;

use crate::client::PostedMessage;

/// How many messages a channel listing returns.
pub const CHANNEL_PAGE_SIZE: usize = 10;

#[derive(Debug, Clone, Serialize)]
pub struct StoredMessage {
    pub message_id: u64,
    pub message: String,
    pub collapse_key: Option<String>,
    pub delay_while_idle: bool,
    // Unix seconds
    pub ctime: i64,
}

/// In-memory registrations, subscriptions and channel logs.
///
/// Aliases and channels share one namespace: a device subscribed to
/// alias `news` receives what gets posted to channel `news`.
#[derive(Debug, Default)]
pub struct BackendState {
    registered: HashSet<String>,
    // Insertion ordered per registration id
    subscriptions: HashMap<String, Vec<String>>,
    channels: HashMap<String, Vec<StoredMessage>>,
    next_message_id: u64,
}

impl BackendState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns false when `reg_id` was already known.
    pub fn register(&mut self, reg_id: &str) -> bool {
        self.registered.insert(reg_id.to_string())
    }

    pub fn is_registered(&self, reg_id: &str) -> bool {
        self.registered.contains(reg_id)
    }

    /// Subscribe `reg_id` to `alias`, registering it on the way if needed.
    /// Subscribing twice is a no-op and returns false.
    pub fn subscribe(&mut self, reg_id: &str, alias: &str) -> bool {
        self.register(reg_id);
        let aliases = self.subscriptions.entry(reg_id.to_string()).or_default();
        if aliases.iter().any(|a| a == alias) {
            return false;
        }
        aliases.push(alias.to_string());
        true
    }

    /// Returns false when there was nothing to remove.
    pub fn unsubscribe(&mut self, reg_id: &str, alias: &str) -> bool {
        let Some(aliases) = self.subscriptions.get_mut(reg_id) else {
            return false;
        };
        let before = aliases.len();
        aliases.retain(|a| a != alias);
        aliases.len() != before
    }

    pub fn subscriptions(&self, reg_id: &str) -> Vec<String> {
        self.subscriptions.get(reg_id).cloned().unwrap_or_default()
    }

    fn subscriber_count(&self, channel: &str) -> u64 {
        self.subscriptions
            .values()
            .filter(|aliases| aliases.iter().any(|a| a == channel))
            .count() as u64
    }

    pub fn post(
        &mut self,
        channel: &str,
        message: &str,
        collapse_key: Option<String>,
        delay_while_idle: bool,
    ) -> PostedMessage {
        self.next_message_id += 1;
        let message_id = self.next_message_id;

        self.channels
            .entry(channel.to_string())
            .or_default()
            .push(StoredMessage {
                message_id,
                message: message.to_string(),
                collapse_key,
                delay_while_idle,
                ctime: Utc::now().timestamp(),
            });

        PostedMessage {
            message_id,
            clients: self.subscriber_count(channel),
        }
    }

    /// Newest first, at most [`CHANNEL_PAGE_SIZE`] messages. Unknown
    /// channels are simply empty.
    pub fn recent_messages(&self, channel: &str) -> Vec<StoredMessage> {
        self.channels
            .get(channel)
            .map(|log| {
                log.iter()
                    .rev()
                    .take(CHANNEL_PAGE_SIZE)
                    .cloned()
                    .collect()
            })
            .unwrap_or_default()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn it_keeps_subscriptions_unique_and_ordered() {
        let mut state = BackendState::new();
        assert!(state.subscribe("abc", "news"));
        assert!(state.subscribe("abc", "sports"));
        assert!(!state.subscribe("abc", "news"));
        assert_eq!(state.subscriptions("abc"), vec!["news", "sports"]);
        assert!(state.is_registered("abc"));
    }

    #[test]
    fn it_unsubscribes() {
        let mut state = BackendState::new();
        state.subscribe("abc", "news");
        assert!(state.unsubscribe("abc", "news"));
        assert!(!state.unsubscribe("abc", "news"));
        assert!(!state.unsubscribe("unknown", "news"));
        assert!(state.subscriptions("abc").is_empty());
    }

    #[test]
    fn it_counts_subscribed_devices_when_posting() {
        let mut state = BackendState::new();
        state.subscribe("abc", "news");
        state.subscribe("def", "news");
        state.subscribe("ghi", "sports");

        let first = state.post("news", "hello", None, true);
        assert_eq!(first.clients, 2);
        let second = state.post("weather", "sunny", None, true);
        assert_eq!(second.clients, 0);
        assert!(second.message_id > first.message_id);
    }

    #[test]
    fn it_lists_the_newest_messages_first() {
        let mut state = BackendState::new();
        for i in 0..15 {
            state.post("news", &format!("message {}", i), None, true);
        }

        let recent = state.recent_messages("news");
        assert_eq!(recent.len(), CHANNEL_PAGE_SIZE);
        assert_eq!(recent[0].message, "message 14");
        assert_eq!(recent[9].message, "message 5");
        assert!(state.recent_messages("nothing").is_empty());
    }
}
