// Best-effort delivery helpers. Failures are logged and never abort the caller.
use futures_util::future::join_all;
use tracing::{error, warn};

use crate::commands::giveaway::formatters::GiveawayFormatter;
use crate::commands::giveaway::models::Entrant;
use crate::messenger::{MessageRef, Messenger, OutgoingMessage};

pub async fn send_message_or_log(
    messenger: &dyn Messenger,
    channel_id: u64,
    message: &OutgoingMessage,
) -> Option<MessageRef> {
    match messenger.send_message(channel_id, message).await {
        Ok(sent) => Some(sent),
        Err(err) => {
            error!(
                "Can't send the message to the channel {}: {}",
                channel_id,
                err.to_string()
            );
            None
        }
    }
}

pub async fn edit_message_or_log(
    messenger: &dyn Messenger,
    target: MessageRef,
    message: &OutgoingMessage,
) {
    if let Err(err) = messenger.edit_message(target, message).await {
        error!(
            "Can't update the giveaway message {}: {}",
            target.message_id,
            err.to_string()
        );
    }
}

pub async fn send_direct_message_or_log(
    messenger: &dyn Messenger,
    user_id: u64,
    message: &OutgoingMessage,
) -> bool {
    match messenger.send_direct_message(user_id, message).await {
        Ok(()) => true,
        Err(err) => {
            error!(
                "Can't send the direct message to the user {}: {}",
                user_id,
                err.to_string()
            );
            false
        }
    }
}

// Looks up the users stored as bare identifiers. Users the platform doesn't
// know anymore are kept as they are.
pub async fn resolve_entrants(messenger: &dyn Messenger, entrants: Vec<Entrant>) -> Vec<Entrant> {
    let lookups = entrants.into_iter().map(|entrant| async move {
        let Entrant::Unknown(user_id) = entrant else {
            return entrant;
        };

        match messenger.fetch_user(user_id).await {
            Ok(participant) => Entrant::Known(participant),
            Err(err) => {
                warn!("Can't fetch the user {}: {}", user_id, err.to_string());
                entrant
            }
        }
    });

    join_all(lookups).await
}

// Sends the notifications concurrently. Returns how many of them were delivered.
pub async fn notify_winners(
    messenger: &dyn Messenger,
    formatter: &dyn GiveawayFormatter,
    title: &str,
    winners: &[Entrant],
    jump_url: &str,
) -> usize {
    let deliveries = winners.iter().map(|winner| async move {
        let message = OutgoingMessage::text(&formatter.winner_notification(title, winner, jump_url));
        send_direct_message_or_log(messenger, winner.user_id(), &message).await
    });

    join_all(deliveries)
        .await
        .into_iter()
        .filter(|delivered| *delivered)
        .count()
}
