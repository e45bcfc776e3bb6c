use serde::{Deserialize, Serialize};

/// `message` field of a store response. Validation failures come back as a list.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum MessageBody {
    Text(String),
    List(Vec<String>),
}

impl MessageBody {
    pub fn to_text(&self) -> String {
        match self {
            Self::Text(text) => text.clone(),
            Self::List(items) => items.join("; "),
        }
    }
}

/// Outcome envelope every store endpoint wraps its payload in.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ApiStatus {
    #[serde(default)]
    pub success: Option<bool>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<MessageBody>,
}

impl ApiStatus {
    pub fn ok(message: impl Into<String>) -> Self {
        Self {
            success: Some(true),
            message: Some(MessageBody::Text(message.into())),
        }
    }

    pub fn is_rejected(&self) -> bool {
        self.success == Some(false)
    }

    pub fn message_text(&self) -> Option<String> {
        self.message
            .as_ref()
            .map(MessageBody::to_text)
            .filter(|text| !text.is_empty())
    }
}
