use std::sync::Arc;

use dashmap::DashMap;
use tracing::info;
use uuid::Uuid;

use crate::commands::giveaway::ledger::{EnterOutcome, LeaveOutcome};
use crate::commands::giveaway::models::{GiveawayForm, Participant};
use crate::commands::giveaway::services::GiveawayServices;
use crate::commands::giveaway::session::GiveawaySession;
use crate::error::{Error, Result};

pub const GIVEAWAY_ENDED_MESSAGE: &str = "This giveaway has already ended.";

// Registry of the giveaways which are still running. A session is removed as
// soon as it reaches a terminal state.
#[derive(Clone)]
pub struct GiveawayManager {
    sessions: Arc<DashMap<Uuid, Arc<GiveawaySession>>>,
    services: GiveawayServices,
}

impl GiveawayManager {
    pub fn new(services: GiveawayServices) -> Self {
        GiveawayManager {
            sessions: Arc::new(DashMap::new()),
            services,
        }
    }

    pub fn services(&self) -> &GiveawayServices {
        &self.services
    }

    // Validates the form, publishes the giveaway and starts its countdown.
    pub async fn start_giveaway(
        &self,
        host: Participant,
        channel_id: u64,
        guild_id: Option<u64>,
        form: &GiveawayForm,
    ) -> Result<Arc<GiveawaySession>> {
        let session = Arc::new(GiveawaySession::new(
            host,
            channel_id,
            guild_id,
            self.services.clone(),
        ));
        session.configure(form)?;
        session.publish().await?;

        self.sessions.insert(session.id(), session.clone());
        let sessions = self.sessions.clone();
        let runner = session.clone();
        tokio::spawn(async move {
            let state = runner.run().await;
            sessions.remove(&runner.id());
            info!("The giveaway {} was removed from the active list ({})", runner.id(), state);
        });

        Ok(session)
    }

    pub fn get_session(&self, session_id: Uuid) -> Result<Arc<GiveawaySession>> {
        self.sessions
            .get(&session_id)
            .map(|session| session.value().clone())
            .ok_or_else(|| Error::NotFound(GIVEAWAY_ENDED_MESSAGE.to_string()))
    }

    // The public message is refreshed in the background, so the interaction
    // can be acknowledged right away.
    pub fn enter(&self, session_id: Uuid, participant: Participant) -> Result<EnterOutcome> {
        let session = self.get_session(session_id)?;
        let outcome = session.enter(participant);
        if outcome == EnterOutcome::Entered {
            tokio::spawn(async move { session.refresh_message().await });
        }
        Ok(outcome)
    }

    pub async fn request_leave(&self, session_id: Uuid, user_id: u64) -> Result<LeaveOutcome> {
        let session = self.get_session(session_id)?;
        Ok(session.request_leave(user_id).await)
    }

    pub fn confirm_leave(&self, session_id: Uuid, user_id: u64) -> LeaveOutcome {
        match self.get_session(session_id) {
            Ok(session) => session.confirm_leave(user_id),
            Err(_) => LeaveOutcome::Closed,
        }
    }

    pub fn cancel(&self, session_id: Uuid, user_id: u64) -> Result<()> {
        let session = self.get_session(session_id)?;
        session.request_cancel(user_id)?;
        info!("The giveaway {} is being cancelled by its host", session_id);
        Ok(())
    }
}
