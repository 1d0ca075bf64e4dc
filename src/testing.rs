// Test doubles for the platform and the storage
use std::collections::HashSet;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::time::Duration;

use async_trait::async_trait;
use dashmap::DashMap;
use parking_lot::Mutex;

use crate::commands::giveaway::models::{GiveawayRecord, Participant};
use crate::config::{Config, DEFAULT_DATABASE_URL};
use crate::db::GiveawayRepository;
use crate::error::{Error, Result};
use crate::messenger::{ComponentAction, MessageButton, MessageRef, Messenger, OutgoingMessage};

pub const FIRST_MESSAGE_ID: u64 = 1000;

pub struct MockMessenger {
    next_message_id: AtomicU64,
    sent: Arc<Mutex<Vec<(u64, OutgoingMessage)>>>,
    edits: Arc<Mutex<Vec<(MessageRef, OutgoingMessage)>>>,
    deleted: Arc<Mutex<Vec<MessageRef>>>,
    direct_messages: Arc<Mutex<Vec<(u64, OutgoingMessage)>>>,
    missing_messages: Mutex<HashSet<u64>>,
    unreachable_users: Mutex<HashSet<u64>>,
    unknown_users: Mutex<HashSet<u64>>,
    live_edit_delay: Mutex<Option<Duration>>,
}

impl MockMessenger {
    pub fn new() -> Self {
        MockMessenger {
            next_message_id: AtomicU64::new(FIRST_MESSAGE_ID),
            sent: Arc::new(Mutex::new(Vec::new())),
            edits: Arc::new(Mutex::new(Vec::new())),
            deleted: Arc::new(Mutex::new(Vec::new())),
            direct_messages: Arc::new(Mutex::new(Vec::new())),
            missing_messages: Mutex::new(HashSet::new()),
            unreachable_users: Mutex::new(HashSet::new()),
            unknown_users: Mutex::new(HashSet::new()),
            live_edit_delay: Mutex::new(None),
        }
    }

    // Simulates a message removed by someone else in the channel.
    pub fn remove_message(&self, message_id: u64) {
        self.missing_messages.lock().insert(message_id);
    }

    pub fn block_direct_messages(&self, user_id: u64) {
        self.unreachable_users.lock().insert(user_id);
    }

    // The user is no longer known to the platform.
    pub fn forget_user(&self, user_id: u64) {
        self.unknown_users.lock().insert(user_id);
    }

    // Edits of a message which still has the "Enter" button take this long.
    pub fn delay_live_edits(&self, delay: Duration) {
        *self.live_edit_delay.lock() = Some(delay);
    }

    pub fn sent_messages(&self) -> Vec<(u64, OutgoingMessage)> {
        self.sent.lock().clone()
    }

    pub fn edited_messages(&self) -> Vec<(MessageRef, OutgoingMessage)> {
        self.edits.lock().clone()
    }

    pub fn deleted_messages(&self) -> Vec<MessageRef> {
        self.deleted.lock().clone()
    }

    pub fn direct_messages(&self) -> Vec<(u64, OutgoingMessage)> {
        self.direct_messages.lock().clone()
    }

    pub fn direct_message_recipients(&self) -> Vec<u64> {
        let mut recipients = self
            .direct_messages
            .lock()
            .iter()
            .map(|(user_id, _)| *user_id)
            .collect::<Vec<u64>>();
        recipients.sort();
        recipients
    }
}

#[async_trait]
impl Messenger for MockMessenger {
    async fn send_message(&self, channel_id: u64, message: &OutgoingMessage) -> Result<MessageRef> {
        let message_id = self.next_message_id.fetch_add(1, Ordering::SeqCst);
        self.sent.lock().push((channel_id, message.clone()));
        Ok(MessageRef::new(channel_id, message_id))
    }

    async fn edit_message(&self, target: MessageRef, message: &OutgoingMessage) -> Result<()> {
        if self.missing_messages.lock().contains(&target.message_id) {
            return Err(Error::NotFound("Unknown Message".to_string()));
        }

        let is_live = message.buttons.iter().any(|button| {
            matches!(
                button,
                MessageButton::Action {
                    action: ComponentAction::Enter,
                    ..
                }
            )
        });
        let delay = *self.live_edit_delay.lock();
        if let (true, Some(delay)) = (is_live, delay) {
            tokio::time::sleep(delay).await;
        }
        self.edits.lock().push((target, message.clone()));
        Ok(())
    }

    async fn delete_message(&self, target: MessageRef) -> Result<()> {
        self.missing_messages.lock().insert(target.message_id);
        self.deleted.lock().push(target);
        Ok(())
    }

    async fn fetch_message(&self, target: MessageRef) -> Result<()> {
        match self.missing_messages.lock().contains(&target.message_id) {
            true => Err(Error::NotFound("Unknown Message".to_string())),
            false => Ok(()),
        }
    }

    async fn send_direct_message(&self, user_id: u64, message: &OutgoingMessage) -> Result<()> {
        if self.unreachable_users.lock().contains(&user_id) {
            return Err(Error::Delivery(
                "Cannot send messages to this user".to_string(),
            ));
        }
        self.direct_messages.lock().push((user_id, message.clone()));
        Ok(())
    }

    async fn fetch_user(&self, user_id: u64) -> Result<Participant> {
        if self.unknown_users.lock().contains(&user_id) {
            return Err(Error::NotFound("Unknown User".to_string()));
        }
        Ok(Participant::new(user_id, &format!("user-{}", user_id)))
    }
}

pub struct InMemoryRepository {
    records: DashMap<u64, GiveawayRecord>,
    failing: AtomicBool,
}

impl InMemoryRepository {
    pub fn new() -> Self {
        InMemoryRepository {
            records: DashMap::new(),
            failing: AtomicBool::new(false),
        }
    }

    pub fn fail_writes(&self) {
        self.failing.store(true, Ordering::SeqCst);
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }
}

#[async_trait]
impl GiveawayRepository for InMemoryRepository {
    async fn save(&self, record: &GiveawayRecord) -> Result<()> {
        if self.failing.load(Ordering::SeqCst) {
            return Err(Error::Database("database is locked".to_string()));
        }
        record.validate()?;
        self.records.insert(record.id, record.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: u64) -> Result<GiveawayRecord> {
        self.records
            .get(&id)
            .map(|record| record.clone())
            .ok_or_else(|| Error::NotFound(format!("The giveaway {} was not found.", id)))
    }

    async fn find_all(&self) -> Result<Vec<GiveawayRecord>> {
        let mut records = self
            .records
            .iter()
            .map(|record| record.value().clone())
            .collect::<Vec<GiveawayRecord>>();
        records.sort_by_key(|record| record.id);
        Ok(records)
    }
}

pub fn get_config(public_base_url: Option<&str>) -> Config {
    Config {
        discord_token: "token".to_string(),
        public_base_url: public_base_url.map(|url| url.to_string()),
        database_url: DEFAULT_DATABASE_URL.to_string(),
    }
}
