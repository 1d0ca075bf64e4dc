use std::sync::Arc;

use async_trait::async_trait;
use poise::serenity_prelude as serenity;
use serenity::{
    ButtonStyle, ChannelId, CreateActionRow, CreateButton, CreateEmbed, CreateMessage,
    EditMessage, Http, MessageId, UserId,
};
use tracing::info;

use crate::commands::giveaway::handlers::handle_component;
use crate::commands::giveaway::models::Participant;
use crate::commands::UserData;
use crate::error::{Error, Result};
use crate::messenger::{ComponentAction, MessageButton, MessageRef, Messenger, OutgoingMessage};

// Delivers the giveaway messages through the Discord REST API.
pub struct SerenityMessenger {
    http: Arc<Http>,
}

impl SerenityMessenger {
    pub fn new(http: Arc<Http>) -> Self {
        SerenityMessenger { http }
    }
}

#[async_trait]
impl Messenger for SerenityMessenger {
    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<MessageRef> {
        let sent = ChannelId::new(channel_id)
            .send_message(&self.http, create_message(message))
            .await?;
        Ok(MessageRef::new(channel_id, sent.id.get()))
    }

    async fn edit_message(&self, target: MessageRef, message: &OutgoingMessage) -> Result<()> {
        let mut builder = EditMessage::new()
            .content(&message.content)
            .components(action_rows(&message.buttons));
        if let Some(image_url) = &message.image_url {
            builder = builder.embed(CreateEmbed::new().image(image_url));
        }

        ChannelId::new(target.channel_id)
            .edit_message(&self.http, MessageId::new(target.message_id), builder)
            .await?;
        Ok(())
    }

    async fn delete_message(&self, target: MessageRef) -> Result<()> {
        ChannelId::new(target.channel_id)
            .delete_message(&self.http, MessageId::new(target.message_id))
            .await?;
        Ok(())
    }

    async fn fetch_message(&self, target: MessageRef) -> Result<()> {
        ChannelId::new(target.channel_id)
            .message(&self.http, MessageId::new(target.message_id))
            .await?;
        Ok(())
    }

    async fn send_direct_message(&self, user_id: u64, message: &OutgoingMessage) -> Result<()> {
        let channel = UserId::new(user_id)
            .create_dm_channel(&self.http)
            .await
            .map_err(|err| Error::Delivery(err.to_string()))?;
        channel
            .id
            .send_message(&self.http, create_message(message))
            .await
            .map_err(|err| Error::Delivery(err.to_string()))?;
        Ok(())
    }

    async fn fetch_user(&self, user_id: u64) -> Result<Participant> {
        let user = UserId::new(user_id).to_user(&self.http).await?;
        Ok(Participant::from(&user))
    }
}

fn create_message(message: &OutgoingMessage) -> CreateMessage {
    let mut builder = CreateMessage::new().content(&message.content);
    if let Some(image_url) = &message.image_url {
        builder = builder.embed(CreateEmbed::new().image(image_url));
    }
    if !message.buttons.is_empty() {
        builder = builder.components(action_rows(&message.buttons));
    }
    builder
}

// An empty list removes all buttons from the edited message.
fn action_rows(buttons: &[MessageButton]) -> Vec<CreateActionRow> {
    match buttons.is_empty() {
        true => vec![],
        false => vec![CreateActionRow::Buttons(
            buttons.iter().map(create_button).collect(),
        )],
    }
}

pub fn create_button(button: &MessageButton) -> CreateButton {
    match button {
        MessageButton::Action {
            action,
            session_id,
            label,
        } => {
            let button = CreateButton::new(action.custom_id(*session_id)).label(label);
            match action {
                ComponentAction::Enter => button.style(ButtonStyle::Primary).emoji('🎉'),
                ComponentAction::ConfirmLeave | ComponentAction::Cancel => {
                    button.style(ButtonStyle::Danger)
                }
            }
        }
        MessageButton::Link { label, url } => CreateButton::new_link(url).label(label),
    }
}

pub async fn event_handler(
    ctx: &serenity::Context,
    event: &serenity::FullEvent,
    _framework: poise::FrameworkContext<'_, UserData, Error>,
    data: &UserData,
) -> Result<()> {
    match event {
        serenity::FullEvent::Ready { data_about_bot } => {
            info!("{} is connected!", data_about_bot.user.name);
        }
        serenity::FullEvent::InteractionCreate { interaction } => {
            if let serenity::Interaction::Component(component) = interaction {
                handle_component(ctx, component, data).await?;
            }
        }
        _ => (),
    }

    Ok(())
}
