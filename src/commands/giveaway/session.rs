use std::sync::OnceLock;
use std::time::Duration;

use chrono::Utc;
use crossbeam::atomic::AtomicCell;
use parking_lot::Mutex;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};
use tracing::{error, info, warn};
use uuid::Uuid;

use crate::commands::giveaway::formatters::{GiveawayView, HostSummary};
use crate::commands::giveaway::ledger::{EnterOutcome, EntryLedger, LeaveOutcome};
use crate::commands::giveaway::models::{
    Entrant, GiveawayForm, GiveawayRecord, GiveawaySettings, Participant, SessionState,
};
use crate::commands::giveaway::services::GiveawayServices;
use crate::commands::giveaway::strategies::DrawOptions;
use crate::commands::giveaway::timer::{Countdown, SessionEvent};
use crate::commands::giveaway::utils::{
    edit_message_or_log, notify_winners, send_direct_message_or_log, send_message_or_log,
};
use crate::error::{Error, Result};
use crate::messenger::{ComponentAction, MessageButton, MessageRef, OutgoingMessage};

pub const OWNER_REQUIRED_MESSAGE: &str =
    "For interacting with this giveaway you need to be its owner.";

// One running giveaway: its settings, the public message, the entries and the
// countdown. Timer and cancel signals are handled one at a time by `run`.
pub struct GiveawaySession {
    id: Uuid,
    host: Participant,
    channel_id: u64,
    guild_id: Option<u64>,
    state: Mutex<SessionState>,
    settings: OnceLock<GiveawaySettings>,
    ledger: EntryLedger,
    message: AtomicCell<Option<MessageRef>>,
    ends_at: AtomicCell<i64>,
    countdown: Mutex<Option<Countdown>>,
    // Held while a message edit is rendered and sent, so edits never overtake each other
    edits: tokio::sync::Mutex<()>,
    events: UnboundedSender<SessionEvent>,
    receiver: Mutex<Option<UnboundedReceiver<SessionEvent>>>,
    services: GiveawayServices,
}

impl GiveawaySession {
    pub fn new(
        host: Participant,
        channel_id: u64,
        guild_id: Option<u64>,
        services: GiveawayServices,
    ) -> Self {
        let (events, receiver) = mpsc::unbounded_channel();
        GiveawaySession {
            id: Uuid::new_v4(),
            host,
            channel_id,
            guild_id,
            state: Mutex::new(SessionState::Configuring),
            settings: OnceLock::new(),
            ledger: EntryLedger::new(),
            message: AtomicCell::new(None),
            ends_at: AtomicCell::new(0),
            countdown: Mutex::new(None),
            edits: tokio::sync::Mutex::new(()),
            events,
            receiver: Mutex::new(Some(receiver)),
            services,
        }
    }

    pub fn id(&self) -> Uuid {
        self.id
    }

    pub fn state(&self) -> SessionState {
        *self.state.lock()
    }

    pub fn settings(&self) -> Option<&GiveawaySettings> {
        self.settings.get()
    }

    pub fn message(&self) -> Option<MessageRef> {
        self.message.load()
    }

    pub fn entry_count(&self) -> usize {
        self.ledger.count()
    }

    // Accepts the form submitted by the host. On a validation error the session
    // stays in the `Configuring` state and the form can be submitted again.
    pub fn configure(&self, form: &GiveawayForm) -> Result<()> {
        let mut state = self.state.lock();
        if *state != SessionState::Configuring {
            let message = format!("The giveaway {} is already configured.", self.id);
            return Err(Error::Giveaway(message));
        }

        let settings = form.validate()?;
        if self.settings.set(settings).is_err() {
            let message = format!("The giveaway {} is already configured.", self.id);
            return Err(Error::Giveaway(message));
        }
        *state = SessionState::Open;
        Ok(())
    }

    // Posts the public message with the "Enter" button and starts the countdown.
    pub async fn publish(&self) -> Result<MessageRef> {
        let settings = self.require_settings()?;
        if self.state() != SessionState::Open {
            let message = format!(
                "The giveaway {} can't be published while it is {}.",
                self.id,
                self.state()
            );
            return Err(Error::Giveaway(message));
        }

        let duration = i64::try_from(settings.duration_seconds).unwrap_or(i64::MAX);
        self.ends_at
            .store(Utc::now().timestamp().saturating_add(duration));

        let message = self.render_message(settings, None);
        let sent = self
            .services
            .messenger
            .send_message(self.channel_id, &message)
            .await?;
        self.message.store(Some(sent));

        let mut state = self.state.lock();
        // The host could have cancelled the giveaway while the message was being sent
        if *state == SessionState::Open {
            *state = SessionState::CountingDown;
            let countdown = Countdown::start(
                Duration::from_secs(settings.duration_seconds),
                self.events.clone(),
            );
            *self.countdown.lock() = Some(countdown);
            info!(
                "The giveaway {} has been published as the message {}",
                self.id, sent.message_id
            );
        }

        Ok(sent)
    }

    pub fn enter(&self, participant: Participant) -> EnterOutcome {
        if !self.state().accepts_entries() {
            return EnterOutcome::Closed;
        }

        self.ledger.enter(participant)
    }

    // Waits for the user to confirm leaving the giveaway. The public message
    // is refreshed when the user has left.
    pub async fn request_leave(&self, user_id: u64) -> LeaveOutcome {
        let outcome = self.ledger.begin_leave_confirmation(user_id).await;
        if outcome == LeaveOutcome::Left {
            self.refresh_message().await;
        }
        outcome
    }

    // The participant is removed at once, a late confirmation can't end up
    // in the frozen list of entrants.
    pub fn confirm_leave(&self, user_id: u64) -> LeaveOutcome {
        self.ledger.confirm_leave(user_id)
    }

    // Stops the giveaway without drawing any winners. Only the host can do it.
    pub fn request_cancel(&self, user_id: u64) -> Result<()> {
        if user_id != self.host.user_id() {
            return Err(Error::Permission(OWNER_REQUIRED_MESSAGE.to_string()));
        }

        {
            let mut state = self.state.lock();
            if !state.accepts_entries() {
                let message = format!("The giveaway can't be cancelled while it is {}.", *state);
                return Err(Error::Giveaway(message));
            }
            *state = SessionState::CancelledByHost;
            self.ledger.close();
        }

        if let Some(countdown) = self.countdown.lock().as_ref() {
            countdown.cancel();
        }
        // The receiver lives as long as the session does
        let _ = self.events.send(SessionEvent::CancelledByHost);
        Ok(())
    }

    // Updates the entry count in the public message.
    pub async fn refresh_message(&self) {
        let (Some(settings), Some(target)) = (self.settings.get(), self.message.load()) else {
            return;
        };

        let _guard = self.edits.lock().await;
        if self.state().accepts_entries() {
            let message = self.render_message(settings, None);
            edit_message_or_log(self.services.messenger.as_ref(), target, &message).await;
        }
    }

    // Processes the session events until the giveaway reaches a terminal state.
    pub async fn run(&self) -> SessionState {
        let receiver = self.receiver.lock().take();
        let Some(mut receiver) = receiver else {
            warn!("The giveaway {} is already running", self.id);
            return self.state();
        };

        while let Some(event) = receiver.recv().await {
            let finished = match event {
                SessionEvent::CountdownElapsed => self.on_countdown_elapsed().await,
                SessionEvent::CancelledByHost => self.on_cancelled().await,
            };

            if finished {
                break;
            }
        }

        let state = self.state();
        info!("The giveaway {} has ended: {}", self.id, state);
        state
    }

    async fn on_countdown_elapsed(&self) -> bool {
        // Entries are frozen in the same step as the state change, so nothing
        // can slip in between the end of the countdown and the snapshot.
        let entrants = {
            let mut state = self.state.lock();
            if *state != SessionState::CountingDown {
                return false;
            }
            *state = SessionState::SelectingWinners;
            self.ledger.close()
        };

        let (Some(settings), Some(target)) = (self.settings.get(), self.message.load()) else {
            self.set_state(SessionState::Aborted);
            return true;
        };

        match self.services.messenger.fetch_message(target).await {
            Ok(()) => (),
            Err(Error::NotFound(_)) => {
                warn!(
                    "The message {} of the giveaway {} was deleted, no winners will be drawn",
                    target.message_id, self.id
                );
                self.set_state(SessionState::Aborted);
                return true;
            }
            Err(err) => warn!(
                "Can't check the message {} of the giveaway {}: {}",
                target.message_id,
                self.id,
                err.to_string()
            ),
        }

        if entrants.is_empty() {
            self.finish_without_entrants(settings, target).await;
        } else {
            self.finish_with_winners(settings, target, entrants).await;
        }
        true
    }

    async fn finish_without_entrants(&self, settings: &GiveawaySettings, target: MessageRef) {
        let messenger = self.services.messenger.as_ref();
        let text = self.services.formatter.no_entrants(self.host.user_id());
        send_message_or_log(messenger, self.channel_id, &OutgoingMessage::text(&text)).await;

        {
            let _guard = self.edits.lock().await;
            let ended = self.render_message(settings, Some(&[]));
            edit_message_or_log(messenger, target, &ended).await;
        }
        self.set_state(SessionState::CancelledEmpty);
    }

    async fn finish_with_winners(
        &self,
        settings: &GiveawaySettings,
        target: MessageRef,
        entrants: Vec<Participant>,
    ) {
        let messenger = self.services.messenger.as_ref();
        let formatter = self.services.formatter.as_ref();

        let entrant_ids = entrants
            .iter()
            .map(|participant| participant.user_id())
            .collect::<Vec<u64>>();
        let options = DrawOptions::new(&entrant_ids, settings.winner_target as usize);
        let winner_ids = match self.services.strategy.draw(&options) {
            Ok(winner_ids) => winner_ids,
            Err(err) => {
                error!("Can't draw winners for the giveaway {}: {}", self.id, err.to_string());
                self.set_state(SessionState::Aborted);
                return;
            }
        };
        let winners = winner_ids
            .iter()
            .filter_map(|user_id| {
                entrants
                    .iter()
                    .find(|participant| participant.user_id() == *user_id)
            })
            .cloned()
            .map(Entrant::Known)
            .collect::<Vec<Entrant>>();

        let record = GiveawayRecord {
            id: target.message_id,
            host: Entrant::Known(self.host.clone()),
            channel_id: self.channel_id,
            guild_id: self.guild_id,
            title: settings.title.clone(),
            winner_target: settings.winner_target,
            duration_seconds: settings.duration_seconds,
            description: settings.description.clone(),
            entrants: entrants.into_iter().map(Entrant::Known).collect(),
            winners: winners.clone(),
        };
        match self.services.repository.save(&record).await {
            Ok(()) => info!("The giveaway {} has been saved", record.id),
            Err(err) => error!("Can't save the giveaway {}: {}", record.id, err.to_string()),
        }

        let announcement = formatter.winners_announcement(&settings.title, &winner_ids);
        send_message_or_log(messenger, self.channel_id, &OutgoingMessage::text(&announcement)).await;

        let jump_url = record.jump_url();
        let delivered =
            notify_winners(messenger, formatter, &settings.title, &winners, &jump_url).await;
        if delivered < winners.len() {
            warn!(
                "Only {} of {} winners of the giveaway {} were notified",
                delivered,
                winners.len(),
                record.id
            );
        }

        {
            let _guard = self.edits.lock().await;
            let mut ended = self.render_message(settings, Some(&winner_ids));
            if let Some(url) = self.services.config.summary_url(target.message_id) {
                ended = ended.with_button(MessageButton::Link {
                    label: "Giveaway Summary".to_string(),
                    url,
                });
            }
            edit_message_or_log(messenger, target, &ended).await;
        }

        let summary = formatter.host_summary(&HostSummary {
            title: &settings.title,
            message_id: target.message_id,
            jump_url: &jump_url,
            winners: &winner_ids,
            entrants: &entrant_ids,
        });
        send_direct_message_or_log(messenger, self.host.user_id(), &OutgoingMessage::text(&summary))
            .await;

        self.set_state(SessionState::Finalized);
    }

    async fn on_cancelled(&self) -> bool {
        if let Some(target) = self.message.load() {
            let _guard = self.edits.lock().await;
            if let Err(err) = self.services.messenger.delete_message(target).await {
                error!(
                    "Can't delete the message {} of the cancelled giveaway: {}",
                    target.message_id,
                    err.to_string()
                );
            }
        }

        info!("The giveaway {} was cancelled by the host", self.id);
        true
    }

    fn render_message(
        &self,
        settings: &GiveawaySettings,
        winners: Option<&[u64]>,
    ) -> OutgoingMessage {
        let view = GiveawayView {
            title: &settings.title,
            description: settings.description.as_deref(),
            host_id: self.host.user_id(),
            ends_at: self.ends_at.load(),
            entry_count: self.ledger.count(),
            winner_target: settings.winner_target,
            winners,
        };

        let message = OutgoingMessage::text(&self.services.formatter.giveaway_message(&view))
            .with_image(settings.image_url.as_deref());
        match winners {
            None => message.with_button(MessageButton::Action {
                action: ComponentAction::Enter,
                session_id: self.id,
                label: "Enter".to_string(),
            }),
            Some(_) => message,
        }
    }

    fn require_settings(&self) -> Result<&GiveawaySettings> {
        self.settings.get().ok_or_else(|| {
            Error::Giveaway(format!("The giveaway {} is not configured yet.", self.id))
        })
    }

    fn set_state(&self, state: SessionState) {
        *self.state.lock() = state;
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use crate::commands::giveaway::ledger::{EnterOutcome, LeaveOutcome};
    use crate::commands::giveaway::models::{GiveawayForm, Participant, SessionState};
    use crate::commands::giveaway::services::GiveawayServices;
    use crate::commands::giveaway::session::{GiveawaySession, OWNER_REQUIRED_MESSAGE};
    use crate::commands::giveaway::strategies::{DrawOptions, WinnerStrategy};
    use crate::db::GiveawayRepository;
    use crate::error::{Error, Result};
    use crate::messenger::{ComponentAction, MessageButton, MessageRef};
    use crate::testing::{get_config, InMemoryRepository, MockMessenger, FIRST_MESSAGE_ID};

    const HOST_ID: u64 = 1;
    const CHANNEL_ID: u64 = 10;

    // Picks the earliest entrants, so the winners are known in advance.
    struct FirstEntrantsStrategy;

    impl WinnerStrategy for FirstEntrantsStrategy {
        fn draw(&self, options: &DrawOptions) -> Result<Vec<u64>> {
            Ok(options.entrants()[..options.winner_count()].to_vec())
        }
    }

    struct Fixture {
        messenger: Arc<MockMessenger>,
        repository: Arc<InMemoryRepository>,
        session: Arc<GiveawaySession>,
    }

    fn get_form() -> GiveawayForm {
        GiveawayForm {
            title: "Gift Card".to_string(),
            winners: "2".to_string(),
            duration: "5 seconds".to_string(),
            ..Default::default()
        }
    }

    fn get_participant(user_id: u64) -> Participant {
        Participant::new(user_id, &format!("user-{}", user_id))
    }

    fn get_fixture(public_base_url: Option<&str>) -> Fixture {
        let messenger = Arc::new(MockMessenger::new());
        let repository = Arc::new(InMemoryRepository::new());
        let services = GiveawayServices::new(
            messenger.clone(),
            repository.clone(),
            Arc::new(get_config(public_base_url)),
        )
        .with_strategy(Arc::new(FirstEntrantsStrategy));
        let session = Arc::new(GiveawaySession::new(
            get_participant(HOST_ID),
            CHANNEL_ID,
            Some(5),
            services,
        ));

        Fixture {
            messenger,
            repository,
            session,
        }
    }

    async fn get_published_fixture() -> Fixture {
        let fixture = get_fixture(None);
        fixture.session.configure(&get_form()).unwrap();
        fixture.session.publish().await.unwrap();
        fixture
    }

    #[tokio::test(start_paused = true)]
    async fn test_giveaway_lifecycle() {
        let fixture = get_published_fixture().await;
        let session = fixture.session.clone();
        assert_eq!(session.state(), SessionState::CountingDown);

        for user_id in [2, 3, 4] {
            assert_eq!(session.enter(get_participant(user_id)), EnterOutcome::Entered);
        }

        let started = tokio::time::Instant::now();
        assert_eq!(session.run().await, SessionState::Finalized);
        assert_eq!(started.elapsed() >= Duration::from_secs(5), true);

        let record = fixture
            .repository
            .find_by_id(FIRST_MESSAGE_ID)
            .await
            .unwrap();
        assert_eq!(record.entrant_ids(), vec![2, 3, 4]);
        assert_eq!(record.winner_ids(), vec![2, 3]);
        assert_eq!(record.entry_count(), 3);
        assert_eq!(record.validate(), Ok(()));

        let sent = fixture.messenger.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(
            sent[0].1.buttons,
            vec![MessageButton::Action {
                action: ComponentAction::Enter,
                session_id: session.id(),
                label: "Enter".to_string(),
            }]
        );
        assert_eq!(
            sent[1].1.content,
            "🎊🎊 Congratulations <@2> <@3> **You won the Gift Card** 🎊🎊"
        );

        // Both winners and the host summary
        assert_eq!(fixture.messenger.direct_message_recipients(), vec![1, 2, 3]);

        let edits = fixture.messenger.edited_messages();
        let (target, ended) = edits.last().unwrap();
        assert_eq!(*target, MessageRef::new(CHANNEL_ID, FIRST_MESSAGE_ID));
        assert_eq!(ended.buttons.is_empty(), true);
        assert_eq!(ended.content.contains("🏆 Winners: <@2> <@3>"), true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_summary_link_after_the_end() {
        let fixture = get_fixture(Some("https://giveaways.example.com"));
        let session = fixture.session.clone();
        session.configure(&get_form()).unwrap();
        session.publish().await.unwrap();
        session.enter(get_participant(2));

        assert_eq!(session.run().await, SessionState::Finalized);

        let edits = fixture.messenger.edited_messages();
        let (_, ended) = edits.last().unwrap();
        assert_eq!(
            ended.buttons,
            vec![MessageButton::Link {
                label: "Giveaway Summary".to_string(),
                url: format!("https://giveaways.example.com/{}", FIRST_MESSAGE_ID),
            }]
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_entries_after_the_countdown_are_rejected() {
        let fixture = get_published_fixture().await;
        let session = fixture.session.clone();
        session.enter(get_participant(2));

        let runner = session.clone();
        let handle = tokio::spawn(async move { runner.run().await });
        tokio::time::sleep(Duration::from_secs(6)).await;

        assert_eq!(session.enter(get_participant(3)), EnterOutcome::Closed);
        assert_eq!(handle.await.unwrap(), SessionState::Finalized);

        let record = fixture
            .repository
            .find_by_id(FIRST_MESSAGE_ID)
            .await
            .unwrap();
        assert_eq!(record.entrant_ids(), vec![2]);
        assert_eq!(record.winner_ids(), vec![2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_invalid_form_keeps_configuring() {
        let fixture = get_fixture(None);
        let mut form = get_form();
        form.winners = "0".to_string();

        assert_eq!(fixture.session.configure(&form).is_err(), true);
        assert_eq!(fixture.session.state(), SessionState::Configuring);
        assert_eq!(fixture.session.publish().await.is_err(), true);
        assert_eq!(fixture.messenger.sent_messages().len(), 0);

        assert_eq!(fixture.session.configure(&get_form()), Ok(()));
        assert_eq!(fixture.session.state(), SessionState::Open);
        assert_eq!(fixture.session.configure(&get_form()).is_err(), true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_cancel_by_the_host() {
        let fixture = get_published_fixture().await;
        let session = fixture.session.clone();
        session.enter(get_participant(2));

        assert_eq!(
            session.request_cancel(2),
            Err(Error::Permission(OWNER_REQUIRED_MESSAGE.to_string()))
        );
        assert_eq!(session.state(), SessionState::CountingDown);

        assert_eq!(session.request_cancel(HOST_ID), Ok(()));
        assert_eq!(session.state(), SessionState::CancelledByHost);
        assert_eq!(session.enter(get_participant(3)), EnterOutcome::Closed);
        assert_eq!(session.run().await, SessionState::CancelledByHost);

        tokio::time::sleep(Duration::from_secs(10)).await;
        assert_eq!(
            fixture.messenger.deleted_messages(),
            vec![MessageRef::new(CHANNEL_ID, FIRST_MESSAGE_ID)]
        );
        assert_eq!(fixture.messenger.sent_messages().len(), 1);
        assert_eq!(fixture.messenger.direct_messages().len(), 0);
        assert_eq!(fixture.repository.len(), 0);
        assert_eq!(session.request_cancel(HOST_ID).is_err(), true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_deleted_message_aborts_the_giveaway() {
        let fixture = get_published_fixture().await;
        fixture.session.enter(get_participant(2));
        fixture.messenger.remove_message(FIRST_MESSAGE_ID);

        assert_eq!(fixture.session.run().await, SessionState::Aborted);
        assert_eq!(fixture.messenger.sent_messages().len(), 1);
        assert_eq!(fixture.messenger.direct_messages().len(), 0);
        assert_eq!(fixture.repository.len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_giveaway_without_entrants() {
        let fixture = get_published_fixture().await;

        assert_eq!(fixture.session.run().await, SessionState::CancelledEmpty);

        let sent = fixture.messenger.sent_messages();
        assert_eq!(sent.len(), 2);
        assert_eq!(sent[1].1.content, "<@1> No one entered your giveaway");
        assert_eq!(fixture.repository.len(), 0);
        assert_eq!(fixture.messenger.direct_messages().len(), 0);
    }

    #[tokio::test(start_paused = true)]
    async fn test_storage_failure_does_not_stop_the_announcement() {
        let fixture = get_published_fixture().await;
        fixture.repository.fail_writes();
        fixture.session.enter(get_participant(2));

        assert_eq!(fixture.session.run().await, SessionState::Finalized);
        assert_eq!(fixture.messenger.sent_messages().len(), 2);
        assert_eq!(fixture.messenger.direct_message_recipients(), vec![1, 2]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_unreachable_winner_is_skipped() {
        let fixture = get_published_fixture().await;
        fixture.messenger.block_direct_messages(2);
        fixture.session.enter(get_participant(2));
        fixture.session.enter(get_participant(3));

        assert_eq!(fixture.session.run().await, SessionState::Finalized);
        assert_eq!(fixture.messenger.direct_message_recipients(), vec![1, 3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_confirmed_leave_updates_the_message() {
        let fixture = get_published_fixture().await;
        let session = fixture.session.clone();
        session.enter(get_participant(2));
        assert_eq!(session.enter(get_participant(2)), EnterOutcome::AlreadyEntered);

        let leaving = session.clone();
        let handle = tokio::spawn(async move { leaving.request_leave(2).await });
        tokio::time::sleep(Duration::from_millis(1500)).await;
        assert_eq!(session.confirm_leave(2), LeaveOutcome::Left);

        assert_eq!(handle.await.unwrap(), LeaveOutcome::Left);
        assert_eq!(session.entry_count(), 0);
        let edits = fixture.messenger.edited_messages();
        assert_eq!(edits.last().unwrap().1.content.contains("👥 Entries: **0**"), true);
    }

    #[tokio::test(start_paused = true)]
    async fn test_leave_confirmed_just_before_the_countdown_ends() {
        let fixture = get_published_fixture().await;
        let session = fixture.session.clone();
        session.enter(get_participant(2));
        session.enter(get_participant(3));

        let runner = session.clone();
        let run_handle = tokio::spawn(async move { runner.run().await });

        tokio::time::sleep(Duration::from_millis(500)).await;
        let leaving = session.clone();
        let leave_handle = tokio::spawn(async move { leaving.request_leave(2).await });

        // Between two ticks of the leave wait and before the countdown fires
        tokio::time::sleep(Duration::from_millis(4200)).await;
        assert_eq!(session.confirm_leave(2), LeaveOutcome::Left);

        assert_eq!(run_handle.await.unwrap(), SessionState::Finalized);
        assert_eq!(leave_handle.await.unwrap(), LeaveOutcome::Left);

        let record = fixture
            .repository
            .find_by_id(FIRST_MESSAGE_ID)
            .await
            .unwrap();
        assert_eq!(record.entrant_ids(), vec![3]);
        assert_eq!(record.winner_ids(), vec![3]);
    }

    #[tokio::test(start_paused = true)]
    async fn test_slow_refresh_does_not_overwrite_the_ended_message() {
        let fixture = get_published_fixture().await;
        fixture.messenger.delay_live_edits(Duration::from_secs(2));
        let session = fixture.session.clone();
        session.enter(get_participant(2));

        let runner = session.clone();
        let run_handle = tokio::spawn(async move { runner.run().await });

        tokio::time::sleep(Duration::from_millis(4500)).await;
        session.enter(get_participant(3));
        let refreshing = session.clone();
        let refresh_handle = tokio::spawn(async move { refreshing.refresh_message().await });

        assert_eq!(run_handle.await.unwrap(), SessionState::Finalized);
        refresh_handle.await.unwrap();

        let edits = fixture.messenger.edited_messages();
        assert_eq!(edits.len(), 2);
        let (_, ended) = edits.last().unwrap();
        assert_eq!(ended.buttons.is_empty(), true);
        assert_eq!(ended.content.contains("🏆 Winners: <@2> <@3>"), true);
    }
}
