use serde::{Deserialize, Serialize};

/// Server acknowledgement for a posted message.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
pub struct PostedMessage {
    pub message_id: u64,
    // Number of devices the message was queued for
    pub clients: u64,
}

#[derive(Debug, Clone)]
pub struct PostOptions {
    // Messages sharing a collapse key replace each other on the device
    // if they haven't been delivered yet.
    pub collapse_key: Option<String>,
    pub delay_while_idle: bool,
}

impl Default for PostOptions {
    fn default() -> Self {
        Self {
            collapse_key: None,
            delay_while_idle: true,
        }
    }
}
