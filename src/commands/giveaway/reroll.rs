use tracing::{info, warn};

use crate::commands::giveaway::models::{Entrant, Requester};
use crate::commands::giveaway::services::GiveawayServices;
use crate::commands::giveaway::strategies::random::NO_VALID_PARTICIPANTS_MESSAGE;
use crate::commands::giveaway::strategies::DrawOptions;
use crate::commands::giveaway::utils::{notify_winners, resolve_entrants, send_message_or_log};
use crate::error::{Error, Result};
use crate::messenger::OutgoingMessage;

pub const NOT_A_GIVEAWAY_MESSAGE: &str = "This message is not a completed giveaway message!";
pub const REROLL_PERMISSION_MESSAGE: &str =
    "You must be the giveaway creator or a server admin to reroll!";

// Draws new winners for a finished giveaway. The stored winners stay untouched.
pub struct RerollService {
    services: GiveawayServices,
}

impl RerollService {
    pub fn new(services: GiveawayServices) -> Self {
        RerollService { services }
    }

    pub async fn reroll(
        &self,
        record_id: u64,
        requester: Requester,
        requested_winners: Option<u32>,
        channel_id: u64,
    ) -> Result<Vec<Entrant>> {
        let record = match self.services.repository.find_by_id(record_id).await {
            Ok(record) => record,
            Err(Error::NotFound(_)) => {
                return Err(Error::NotFound(NOT_A_GIVEAWAY_MESSAGE.to_string()));
            }
            Err(err) => return Err(err),
        };

        if requester.user_id != record.host.user_id() && !requester.is_admin {
            return Err(Error::Permission(REROLL_PERMISSION_MESSAGE.to_string()));
        }

        let winner_target = requested_winners.unwrap_or(record.winner_target);
        if winner_target == 0 {
            let message = "Please enter a valid number of winners".to_string();
            return Err(Error::Validation(message));
        }

        if record.entrants.is_empty() {
            return Err(Error::NoValidParticipants(
                NO_VALID_PARTICIPANTS_MESSAGE.to_string(),
            ));
        }

        let options = DrawOptions::new(&record.entrant_ids(), winner_target as usize);
        let winner_ids = self.services.strategy.draw(&options)?;
        let winners = winner_ids
            .iter()
            .filter_map(|user_id| {
                record
                    .entrants
                    .iter()
                    .find(|entrant| entrant.user_id() == *user_id)
            })
            .cloned()
            .collect::<Vec<Entrant>>();

        let messenger = self.services.messenger.as_ref();
        let formatter = self.services.formatter.as_ref();
        let winners = resolve_entrants(messenger, winners).await;
        let announcement = formatter.winners_announcement(&record.title, &winner_ids);
        send_message_or_log(messenger, channel_id, &OutgoingMessage::text(&announcement)).await;

        let delivered =
            notify_winners(messenger, formatter, &record.title, &winners, &record.jump_url())
                .await;
        if delivered < winners.len() {
            warn!(
                "Only {} of {} rerolled winners of the giveaway {} were notified",
                delivered,
                winners.len(),
                record.id
            );
        }

        info!(
            "The giveaway {} was rerolled by {}, {} new winners",
            record.id,
            requester.user_id,
            winners.len()
        );
        Ok(winners)
    }
}
