use poise::serenity_prelude as serenity;
use poise::CreateReply;
use tracing::{error, info, instrument};

use crate::bot::create_button;
use crate::commands::context::{ApplicationContext, Context, UserData};
use crate::commands::giveaway::ledger::{EnterOutcome, LeaveOutcome};
use crate::commands::giveaway::manager::GIVEAWAY_ENDED_MESSAGE;
use crate::commands::giveaway::models::{
    GiveawayForm, ImageAttachment, Participant, Requester, INVALID_ATTACHMENT_MESSAGE,
};
use crate::commands::giveaway::reroll::NOT_A_GIVEAWAY_MESSAGE;
use crate::commands::giveaway::summary::SUMMARY_NOT_FOUND_MESSAGE;
use crate::error::Error;
use crate::messenger::{ComponentAction, MessageButton};

pub const ALREADY_ENTERED_MESSAGE: &str = "You have already entered this giveaway!";
pub const LEFT_MESSAGE: &str = "You have successfully left the giveaway! ✅";
pub const LEAVE_TIMED_OUT_MESSAGE: &str = "Timed out. Please try again ❌";
pub const CANCELLED_MESSAGE: &str = "You have successfully canceled the giveaway ✅";
const UNEXPECTED_ERROR_MESSAGE: &str = "Something went wrong, please try again later.";

#[derive(Debug, Default, poise::Modal)]
#[name = "Create a Giveaway"]
struct GiveawayModal {
    #[name = "Prize"]
    #[placeholder = "EX: 1000 dollar"]
    title: String,
    #[name = "The number of winners"]
    #[placeholder = "EX: 1"]
    winners: String,
    #[name = "Time"]
    #[placeholder = "EX: 10 minutes, 10 hours, 10 days"]
    duration: String,
    #[name = "Photo link"]
    #[placeholder = "HTTPS link to the image (optional)"]
    image_link: Option<String>,
    #[name = "Description"]
    #[placeholder = "What is the giveaway about? (optional)"]
    #[paragraph]
    #[max_length = 300]
    description: Option<String>,
}

/// Create a new giveaway
#[poise::command(slash_command, guild_only, rename = "giveaway")]
pub async fn create_giveaway(
    ctx: ApplicationContext<'_>,
    #[description = "Image to show in the giveaway message"] image: Option<serenity::Attachment>,
) -> Result<(), Error> {
    let context = Context::Application(ctx);
    let attachment = image.map(|image| ImageAttachment {
        url: image.url.clone(),
        content_type: image.content_type.clone(),
    });
    if let Some(attachment) = &attachment {
        if !attachment.is_image() {
            return reply_ephemeral(context, INVALID_ATTACHMENT_MESSAGE).await;
        }
    }

    let defaults = GiveawayModal {
        winners: "1".to_string(),
        ..Default::default()
    };
    let Some(modal) = poise::execute_modal(ctx, Some(defaults), None).await? else {
        return Ok(());
    };

    let form = GiveawayForm {
        title: modal.title,
        winners: modal.winners,
        duration: modal.duration,
        image_link: modal.image_link,
        description: modal.description,
        attachment,
    };
    let host = get_participant(context).await;
    let started = context
        .data()
        .manager
        .start_giveaway(
            host,
            context.channel_id().get(),
            context.guild_id().map(|guild_id| guild_id.get()),
            &form,
        )
        .await;

    match started {
        Ok(session) => {
            let message_id = session
                .message()
                .map(|message| message.message_id)
                .unwrap_or_default();
            let cancel = create_button(&MessageButton::Action {
                action: ComponentAction::Cancel,
                session_id: session.id(),
                label: "Cancel".to_string(),
            });
            let reply = CreateReply::default()
                .content(format!("Giveaway created successfully! ID: {}", message_id))
                .ephemeral(true)
                .components(vec![serenity::CreateActionRow::Buttons(vec![cancel])]);
            context.send(reply).await?;
            Ok(())
        }
        Err(err) => reply_error(context, err).await,
    }
}

/// Draw new winners for a finished giveaway
#[poise::command(slash_command, guild_only)]
pub async fn reroll(
    ctx: Context<'_>,
    #[description = "The message ID of the giveaway"] giveaway_id: String,
    #[description = "How many winners to draw"]
    #[min = 1]
    number_of_winners: Option<u32>,
) -> Result<(), Error> {
    match giveaway_id.trim().parse::<u64>() {
        Ok(record_id) => run_reroll(ctx, record_id, number_of_winners).await,
        Err(_) => reply_ephemeral(ctx, NOT_A_GIVEAWAY_MESSAGE).await,
    }
}

#[poise::command(context_menu_command = "Reroll Giveaway", guild_only)]
pub async fn reroll_giveaway(ctx: Context<'_>, message: serenity::Message) -> Result<(), Error> {
    run_reroll(ctx, message.id.get(), None).await
}

/// Show the results of a finished giveaway
#[poise::command(slash_command, rename = "giveaway-summary")]
pub async fn giveaway_summary(
    ctx: Context<'_>,
    #[description = "The message ID of the giveaway"] giveaway_id: String,
) -> Result<(), Error> {
    let Ok(record_id) = giveaway_id.trim().parse::<u64>() else {
        return reply_ephemeral(ctx, SUMMARY_NOT_FOUND_MESSAGE).await;
    };

    match ctx.data().summaries.lookup(record_id).await {
        Ok(summary) => {
            let text = ctx
                .data()
                .manager
                .services()
                .formatter
                .summary_page(&summary);
            reply_ephemeral(ctx, &text).await
        }
        Err(err) => reply_error(ctx, err).await,
    }
}

async fn run_reroll(
    ctx: Context<'_>,
    record_id: u64,
    requested_winners: Option<u32>,
) -> Result<(), Error> {
    ctx.defer_ephemeral().await?;
    let requester = Requester::new(ctx.author().id.get(), is_admin(ctx).await);
    let result = ctx
        .data()
        .rerolls
        .reroll(record_id, requester, requested_winners, ctx.channel_id().get())
        .await;

    match result {
        Ok(winners) => {
            let content = format!(
                "Rerolled the giveaway {}, {} new winner(s) announced.",
                record_id,
                winners.len()
            );
            reply_ephemeral(ctx, &content).await
        }
        Err(err) => reply_error(ctx, err).await,
    }
}

// Handles the buttons attached to the giveaway messages.
#[instrument(skip(ctx, component, data))]
pub async fn handle_component(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    data: &UserData,
) -> Result<(), Error> {
    let Some((action, session_id)) = ComponentAction::parse(&component.data.custom_id) else {
        return Ok(());
    };
    let user_id = component.user.id.get();

    match action {
        ComponentAction::Enter => {
            let participant = match &component.member {
                Some(member) => Participant::from_member(member),
                None => Participant::from(&component.user),
            };

            match data.manager.enter(session_id, participant) {
                Ok(EnterOutcome::Entered) => {
                    let response = serenity::CreateInteractionResponse::Acknowledge;
                    component.create_response(&ctx.http, response).await?;
                }
                Ok(EnterOutcome::AlreadyEntered) => {
                    let leave = create_button(&MessageButton::Action {
                        action: ComponentAction::ConfirmLeave,
                        session_id,
                        label: "Leave Giveaway".to_string(),
                    });
                    let message = serenity::CreateInteractionResponseMessage::new()
                        .content(ALREADY_ENTERED_MESSAGE)
                        .ephemeral(true)
                        .components(vec![serenity::CreateActionRow::Buttons(vec![leave])]);
                    component
                        .create_response(&ctx.http, serenity::CreateInteractionResponse::Message(message))
                        .await?;

                    let manager = data.manager.clone();
                    let http = ctx.http.clone();
                    let interaction = component.clone();
                    tokio::spawn(async move {
                        match manager.request_leave(session_id, user_id).await {
                            Ok(LeaveOutcome::TimedOut) => {
                                let edit = serenity::EditInteractionResponse::new()
                                    .content(LEAVE_TIMED_OUT_MESSAGE)
                                    .components(vec![]);
                                if let Err(err) = interaction.edit_response(&http, edit).await {
                                    error!("Can't update the leave confirmation: {}", err);
                                }
                            }
                            Ok(outcome) => info!("Leave request of {} finished: {:?}", user_id, outcome),
                            Err(err) => error!("Can't process the leave request: {}", err),
                        }
                    });
                }
                Ok(EnterOutcome::Closed) => {
                    respond_ephemeral(ctx, component, GIVEAWAY_ENDED_MESSAGE).await?
                }
                Err(err) => respond_ephemeral(ctx, component, &err.to_string()).await?,
            }
        }
        ComponentAction::ConfirmLeave => {
            let content = match data.manager.confirm_leave(session_id, user_id) {
                LeaveOutcome::Left => LEFT_MESSAGE,
                LeaveOutcome::Closed => GIVEAWAY_ENDED_MESSAGE,
                _ => LEAVE_TIMED_OUT_MESSAGE,
            };
            update_message(ctx, component, content).await?;
        }
        ComponentAction::Cancel => match data.manager.cancel(session_id, user_id) {
            Ok(()) => update_message(ctx, component, CANCELLED_MESSAGE).await?,
            Err(err) => respond_ephemeral(ctx, component, &err.to_string()).await?,
        },
    }

    Ok(())
}

async fn respond_ephemeral(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    content: &str,
) -> Result<(), Error> {
    let message = serenity::CreateInteractionResponseMessage::new()
        .content(content)
        .ephemeral(true);
    component
        .create_response(&ctx.http, serenity::CreateInteractionResponse::Message(message))
        .await?;
    Ok(())
}

// Replaces the ephemeral message with the buttons by the final answer.
async fn update_message(
    ctx: &serenity::Context,
    component: &serenity::ComponentInteraction,
    content: &str,
) -> Result<(), Error> {
    let message = serenity::CreateInteractionResponseMessage::new()
        .content(content)
        .components(vec![]);
    component
        .create_response(
            &ctx.http,
            serenity::CreateInteractionResponse::UpdateMessage(message),
        )
        .await?;
    Ok(())
}

async fn reply_ephemeral(ctx: Context<'_>, content: &str) -> Result<(), Error> {
    ctx.send(CreateReply::default().content(content).ephemeral(true))
        .await?;
    Ok(())
}

async fn reply_error(ctx: Context<'_>, err: Error) -> Result<(), Error> {
    if err.is_user_facing() {
        return reply_ephemeral(ctx, &err.to_string()).await;
    }

    error!(
        "Command '{}' failed for the user '{}': {}",
        ctx.command().qualified_name,
        ctx.author().name,
        err
    );
    reply_ephemeral(ctx, UNEXPECTED_ERROR_MESSAGE).await
}

async fn get_participant(ctx: Context<'_>) -> Participant {
    match ctx.author_member().await {
        Some(member) => Participant::from_member(&member),
        None => Participant::from(ctx.author()),
    }
}

async fn is_admin(ctx: Context<'_>) -> bool {
    match ctx.author_member().await {
        Some(member) => member
            .permissions
            .map(|permissions| permissions.administrator())
            .unwrap_or(false),
        None => false,
    }
}
