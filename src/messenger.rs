use async_trait::async_trait;
use uuid::Uuid;

use crate::commands::giveaway::models::Participant;
use crate::error::Result;

const CUSTOM_ID_PREFIX: &str = "giveaway";

// Interactive buttons handled by the bot. The session id is encoded into the
// custom id, so a click can be routed back to its giveaway.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum ComponentAction {
    Enter,
    ConfirmLeave,
    Cancel,
}

impl ComponentAction {
    pub fn as_str(&self) -> &'static str {
        match self {
            ComponentAction::Enter => "enter",
            ComponentAction::ConfirmLeave => "leave",
            ComponentAction::Cancel => "cancel",
        }
    }

    pub fn custom_id(&self, session_id: Uuid) -> String {
        format!("{}:{}:{}", CUSTOM_ID_PREFIX, self.as_str(), session_id)
    }

    // Returns None for components which don't belong to giveaways.
    pub fn parse(custom_id: &str) -> Option<(ComponentAction, Uuid)> {
        let mut parts = custom_id.splitn(3, ':');
        if parts.next()? != CUSTOM_ID_PREFIX {
            return None;
        }

        let action = match parts.next()? {
            "enter" => ComponentAction::Enter,
            "leave" => ComponentAction::ConfirmLeave,
            "cancel" => ComponentAction::Cancel,
            _ => return None,
        };
        let session_id = Uuid::parse_str(parts.next()?).ok()?;
        Some((action, session_id))
    }
}

#[derive(Clone, Debug, Eq, PartialEq)]
pub enum MessageButton {
    Action {
        action: ComponentAction,
        session_id: Uuid,
        label: String,
    },
    Link {
        label: String,
        url: String,
    },
}

#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct OutgoingMessage {
    pub content: String,
    pub image_url: Option<String>,
    pub buttons: Vec<MessageButton>,
}

impl OutgoingMessage {
    pub fn text(content: &str) -> Self {
        OutgoingMessage {
            content: content.to_string(),
            ..Default::default()
        }
    }

    pub fn with_image(mut self, image_url: Option<&str>) -> Self {
        self.image_url = image_url.map(|url| url.to_string());
        self
    }

    pub fn with_button(mut self, button: MessageButton) -> Self {
        self.buttons.push(button);
        self
    }
}

#[derive(Copy, Clone, Debug, Eq, PartialEq, Hash)]
pub struct MessageRef {
    pub channel_id: u64,
    pub message_id: u64,
}

impl MessageRef {
    pub fn new(channel_id: u64, message_id: u64) -> Self {
        MessageRef {
            channel_id,
            message_id,
        }
    }
}

// Everything the giveaway core needs from the chat platform.
#[async_trait]
pub trait Messenger: Send + Sync {
    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<MessageRef>;

    async fn edit_message(&self, target: MessageRef, message: &OutgoingMessage) -> Result<()>;

    async fn delete_message(&self, target: MessageRef) -> Result<()>;

    // Fails with `Error::NotFound` when the message was deleted.
    async fn fetch_message(&self, target: MessageRef) -> Result<()>;

    async fn send_direct_message(&self, user_id: u64, message: &OutgoingMessage) -> Result<()>;

    async fn fetch_user(&self, user_id: u64) -> Result<Participant>;
}
