use serde::{Deserialize, Serialize};

use crate::{domain::ObserverOwner, error::ErrorReport};

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NotificationSummary {
    pub name: String,
    pub kind: Option<String>,
    pub has_body: bool,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", content = "payload", rename_all = "snake_case")]
pub enum TraceEvent {
    Sent {
        notification: NotificationSummary,
    },
    Delivered {
        owner: ObserverOwner,
        notification: NotificationSummary,
    },
    CommandExecuted {
        command: String,
        notification: NotificationSummary,
    },
    ProxyUpdated {
        proxy: String,
        value: serde_json::Value,
    },
    Failed {
        notification: String,
        error: ErrorReport,
    },
}
