use anyhow::Result;
use serde::{Deserialize, Serialize};

use crate::cli::AlertArgs;

/// What kind of state change an alert describes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AlertKind {
    Host,
    Service,
    Custom(String),
}

impl AlertKind {
    pub fn as_str(&self) -> &str {
        match self {
            AlertKind::Host => "host",
            AlertKind::Service => "service",
            AlertKind::Custom(name) => name,
        }
    }
}

/// The payload Promsaint accepts on its `/json` endpoint.
#[derive(Debug, Serialize, Deserialize, Clone, PartialEq, Eq)]
#[serde(rename_all = "PascalCase")]
pub struct AlertRecord {
    #[serde(rename = "Type")]
    pub alert_type: String,
    pub notify: String,
    pub notification_type: String,
    pub state: String,
    pub host: String,
    pub service: String,
    pub alert_name: String,
    pub message: String,
    pub note: String,
    pub fire_period: String,
}

impl AlertRecord {
    pub fn from_args(args: &AlertArgs, kind: &AlertKind, notify: &str) -> Self {
        Self {
            alert_type: kind.as_str().to_string(),
            notify: notify.to_lowercase(),
            notification_type: args.notification_type.clone(),
            state: args.state.clone(),
            host: args.host.clone(),
            service: args.service.replace(' ', "_"),
            alert_name: args.alert_name.clone(),
            message: args.message.clone(),
            note: args.note.clone(),
            fire_period: args.fire_period.to_string(),
        }
    }

    /// Newline-terminated JSON body.
    pub fn to_json(&self) -> Result<Vec<u8>> {
        let mut body = serde_json::to_vec(self)?;
        body.push(b'\n');
        Ok(body)
    }
}
