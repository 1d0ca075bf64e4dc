use std::collections::HashSet;
use std::fmt;

use chrono::{DateTime, Utc};
use serenity::model::guild::Member;
use serenity::model::Timestamp;
use serenity::model::user::User as DiscordUser;

use crate::commands::giveaway::parser::parse_duration;
use crate::error::{Error, Result};

pub const DEFAULT_AVATAR_URL: &str = "https://cdn.discordapp.com/embed/avatars/0.png";
pub const MAX_DESCRIPTION_LENGTH: usize = 300;
pub const INVALID_ATTACHMENT_MESSAGE: &str = "Please provide a valid image attachment";

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct Participant {
    user_id: u64,
    username: String,
    display_name: String,
    avatar_url: String,
    created_at: Option<DateTime<Utc>>,
    joined_at: Option<DateTime<Utc>>,
}

impl Participant {
    pub fn new(user_id: u64, username: &str) -> Self {
        Participant {
            user_id,
            username: username.to_string(),
            display_name: username.to_string(),
            avatar_url: DEFAULT_AVATAR_URL.to_string(),
            created_at: None,
            joined_at: None,
        }
    }

    pub fn with_display_name(mut self, display_name: &str) -> Self {
        self.display_name = display_name.to_string();
        self
    }

    pub fn with_avatar_url(mut self, avatar_url: &str) -> Self {
        self.avatar_url = avatar_url.to_string();
        self
    }

    pub fn with_created_at(mut self, created_at: Option<DateTime<Utc>>) -> Self {
        self.created_at = created_at;
        self
    }

    pub fn with_joined_at(mut self, joined_at: Option<DateTime<Utc>>) -> Self {
        self.joined_at = joined_at;
        self
    }

    // Builds a snapshot of the guild member, including the moment they joined the server.
    pub fn from_member(member: &Member) -> Self {
        Participant::from(&member.user)
            .with_display_name(member.display_name())
            .with_joined_at(member.joined_at.and_then(to_datetime))
    }

    // Returns a unique identifier in Discord
    pub fn user_id(&self) -> u64 {
        self.user_id
    }

    pub fn username(&self) -> &str {
        &self.username
    }

    pub fn display_name(&self) -> &str {
        &self.display_name
    }

    pub fn avatar_url(&self) -> &str {
        &self.avatar_url
    }

    pub fn created_at(&self) -> Option<DateTime<Utc>> {
        self.created_at
    }

    pub fn joined_at(&self) -> Option<DateTime<Utc>> {
        self.joined_at
    }

    pub fn mention(&self) -> String {
        mention(self.user_id)
    }
}

impl From<&DiscordUser> for Participant {
    fn from(discord_user: &DiscordUser) -> Self {
        Participant::new(discord_user.id.get(), &discord_user.name)
            .with_display_name(discord_user.display_name())
            .with_avatar_url(&discord_user.face())
            .with_created_at(to_datetime(discord_user.id.created_at()))
    }
}

fn to_datetime(timestamp: Timestamp) -> Option<DateTime<Utc>> {
    DateTime::from_timestamp(timestamp.unix_timestamp(), 0)
}

pub fn mention(user_id: u64) -> String {
    format!("<@{}>", user_id)
}

// An entrant as it is read back from storage. The snapshot is missing when the
// user was never cached, then only the identifier is known.
#[derive(Debug, Clone, Eq, PartialEq)]
pub enum Entrant {
    Known(Participant),
    Unknown(u64),
}

impl Entrant {
    pub fn user_id(&self) -> u64 {
        match self {
            Entrant::Known(participant) => participant.user_id(),
            Entrant::Unknown(user_id) => *user_id,
        }
    }

    pub fn participant(&self) -> Option<&Participant> {
        match self {
            Entrant::Known(participant) => Some(participant),
            Entrant::Unknown(_) => None,
        }
    }

    pub fn mention(&self) -> String {
        mention(self.user_id())
    }

    pub fn display_name(&self) -> String {
        match self {
            Entrant::Known(participant) => participant.display_name().to_string(),
            Entrant::Unknown(user_id) => user_id.to_string(),
        }
    }
}

impl From<Participant> for Entrant {
    fn from(participant: Participant) -> Self {
        Entrant::Known(participant)
    }
}

// The persisted result of a finished giveaway, keyed by the public message id.
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GiveawayRecord {
    pub id: u64,
    pub host: Entrant,
    pub channel_id: u64,
    pub guild_id: Option<u64>,
    pub title: String,
    pub winner_target: u32,
    pub duration_seconds: u64,
    pub description: Option<String>,
    pub entrants: Vec<Entrant>,
    pub winners: Vec<Entrant>,
}

impl GiveawayRecord {
    pub fn entry_count(&self) -> usize {
        self.entrants.len()
    }

    pub fn entrant_ids(&self) -> Vec<u64> {
        self.entrants.iter().map(|entrant| entrant.user_id()).collect()
    }

    pub fn winner_ids(&self) -> Vec<u64> {
        self.winners.iter().map(|winner| winner.user_id()).collect()
    }

    // Link to the giveaway message in the Discord client.
    pub fn jump_url(&self) -> String {
        message_link(self.guild_id, self.channel_id, self.id)
    }

    // Checks that the winners were taken from the entrants and fit the requested amount.
    pub fn validate(&self) -> Result<()> {
        if self.winner_target == 0 {
            let message = "The giveaway must have at least one winner.".to_string();
            return Err(Error::Validation(message));
        }

        if self.winners.len() > self.winner_target as usize {
            let message = format!(
                "The giveaway {} has more winners than requested.",
                self.id
            );
            return Err(Error::Giveaway(message));
        }

        let entrants = self.entrant_ids().into_iter().collect::<HashSet<u64>>();
        let winners = self.winner_ids();
        let unique_winners = winners.iter().collect::<HashSet<&u64>>();
        if unique_winners.len() != winners.len()
            || winners.iter().any(|winner| !entrants.contains(winner))
        {
            let message = format!(
                "The winners of the giveaway {} must be distinct entrants.",
                self.id
            );
            return Err(Error::Giveaway(message));
        }

        Ok(())
    }
}

pub fn message_link(guild_id: Option<u64>, channel_id: u64, message_id: u64) -> String {
    let guild = guild_id
        .map(|id| id.to_string())
        .unwrap_or_else(|| "@me".to_string());
    format!(
        "https://discord.com/channels/{}/{}/{}",
        guild, channel_id, message_id
    )
}

#[derive(Debug, Clone, Eq, PartialEq)]
pub struct ImageAttachment {
    pub url: String,
    pub content_type: Option<String>,
}

impl ImageAttachment {
    pub fn is_image(&self) -> bool {
        self.content_type
            .as_ref()
            .map(|content_type| content_type.starts_with("image"))
            .unwrap_or(false)
    }
}

// Raw values submitted by the host through the creation modal.
#[derive(Debug, Clone, Default, Eq, PartialEq)]
pub struct GiveawayForm {
    pub title: String,
    pub winners: String,
    pub duration: String,
    pub image_link: Option<String>,
    pub description: Option<String>,
    pub attachment: Option<ImageAttachment>,
}

impl GiveawayForm {
    // Validates the submitted values. Nothing is corrected silently, the first
    // invalid value is reported back to the host.
    pub fn validate(&self) -> Result<GiveawaySettings> {
        let title = self.title.trim();
        if title.is_empty() {
            return Err(Error::Validation("Please enter a prize".to_string()));
        }

        let image_url = self.image_url()?;

        let winner_target = self.winners.trim();
        let winner_target = match winner_target.chars().all(|c| c.is_ascii_digit()) {
            true => winner_target.parse::<u32>().ok().filter(|count| *count > 0),
            false => None,
        }
        .ok_or_else(|| Error::Validation("Please enter a valid number of winners".to_string()))?;

        let duration_seconds = parse_duration(&self.duration)?;

        let description = self
            .description
            .as_ref()
            .map(|text| text.trim().to_string())
            .filter(|text| !text.is_empty());
        if let Some(text) = &description {
            if text.chars().count() > MAX_DESCRIPTION_LENGTH {
                let message = format!(
                    "The description must not exceed {} characters",
                    MAX_DESCRIPTION_LENGTH
                );
                return Err(Error::Validation(message));
            }
        }

        Ok(GiveawaySettings {
            title: title.to_string(),
            winner_target,
            duration_seconds,
            description,
            image_url,
        })
    }

    // An uploaded attachment takes precedence over the link from the form.
    fn image_url(&self) -> Result<Option<String>> {
        let url = match &self.attachment {
            Some(attachment) => {
                if !attachment.is_image() {
                    return Err(Error::Validation(INVALID_ATTACHMENT_MESSAGE.to_string()));
                }
                Some(attachment.url.trim().to_string())
            }
            None => self
                .image_link
                .as_ref()
                .map(|link| link.trim().to_string())
                .filter(|link| !link.is_empty()),
        };

        match url {
            Some(url) if !url.starts_with("https") => Err(Error::Validation(
                "Image URL must use HTTPS protocol".to_string(),
            )),
            url => Ok(url),
        }
    }
}

#[readonly::make]
#[derive(Debug, Clone, Eq, PartialEq)]
pub struct GiveawaySettings {
    pub title: String,
    pub winner_target: u32,
    pub duration_seconds: u64,
    pub description: Option<String>,
    pub image_url: Option<String>,
}

#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum SessionState {
    // Waiting for valid settings from the host.
    Configuring,
    // Settings are accepted, the public message is not published yet.
    Open,
    // The public message exists and the countdown is running.
    CountingDown,
    SelectingWinners,
    Finalized,
    // The countdown elapsed without any entrants.
    CancelledEmpty,
    CancelledByHost,
    // The public message was deleted before the countdown elapsed.
    Aborted,
}

impl SessionState {
    pub fn accepts_entries(&self) -> bool {
        matches!(self, SessionState::Open | SessionState::CountingDown)
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SessionState::Configuring => "configuring",
            SessionState::Open => "open",
            SessionState::CountingDown => "counting down",
            SessionState::SelectingWinners => "selecting winners",
            SessionState::Finalized => "finalized",
            SessionState::CancelledEmpty => "cancelled (no entrants)",
            SessionState::CancelledByHost => "cancelled by host",
            SessionState::Aborted => "aborted",
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// The user who invoked a privileged action.
#[derive(Debug, Clone, Copy, Eq, PartialEq)]
pub struct Requester {
    pub user_id: u64,
    pub is_admin: bool,
}

impl Requester {
    pub fn new(user_id: u64, is_admin: bool) -> Self {
        Requester { user_id, is_admin }
    }
}

#[cfg(test)]
mod tests {
    use crate::commands::giveaway::models::{
        Entrant, GiveawayForm, GiveawayRecord, ImageAttachment, Participant, SessionState,
    };
    use crate::error::Error;

    fn get_form() -> GiveawayForm {
        GiveawayForm {
            title: "Gift Card".to_string(),
            winners: "2".to_string(),
            duration: "5 seconds".to_string(),
            ..Default::default()
        }
    }

    fn get_record(winners: Vec<u64>) -> GiveawayRecord {
        GiveawayRecord {
            id: 100,
            host: Entrant::Unknown(1),
            channel_id: 10,
            guild_id: Some(5),
            title: "Gift Card".to_string(),
            winner_target: 2,
            duration_seconds: 5,
            description: None,
            entrants: vec![
                Entrant::Known(Participant::new(2, "Alice")),
                Entrant::Unknown(3),
                Entrant::Unknown(4),
            ],
            winners: winners.into_iter().map(Entrant::Unknown).collect(),
        }
    }

    // ---- GiveawayForm tests ----

    #[test]
    fn test_validate_form() {
        let settings = get_form().validate().unwrap();

        assert_eq!(settings.title, "Gift Card");
        assert_eq!(settings.winner_target, 2);
        assert_eq!(settings.duration_seconds, 5);
        assert_eq!(settings.description, None);
        assert_eq!(settings.image_url, None);
    }

    #[test]
    fn test_validate_form_with_non_numeric_winners() {
        let mut form = get_form();
        form.winners = "two".to_string();

        assert_eq!(
            form.validate(),
            Err(Error::Validation("Please enter a valid number of winners".to_string()))
        );
    }

    #[test]
    fn test_validate_form_with_zero_winners() {
        let mut form = get_form();
        form.winners = "0".to_string();

        assert_eq!(
            form.validate(),
            Err(Error::Validation("Please enter a valid number of winners".to_string()))
        );
    }

    #[test]
    fn test_validate_form_with_bad_duration() {
        let mut form = get_form();
        form.duration = "soon".to_string();

        assert_eq!(form.validate().is_err(), true);
    }

    #[test]
    fn test_validate_form_with_http_image_link() {
        let mut form = get_form();
        form.image_link = Some("http://example.com/image.png".to_string());

        assert_eq!(
            form.validate(),
            Err(Error::Validation("Image URL must use HTTPS protocol".to_string()))
        );
    }

    #[test]
    fn test_validate_form_prefers_attachment() {
        let mut form = get_form();
        form.image_link = Some("https://example.com/link.png".to_string());
        form.attachment = Some(ImageAttachment {
            url: "https://cdn.example.com/upload.png".to_string(),
            content_type: Some("image/png".to_string()),
        });

        let settings = form.validate().unwrap();
        assert_eq!(
            settings.image_url,
            Some("https://cdn.example.com/upload.png".to_string())
        );
    }

    #[test]
    fn test_validate_form_with_non_image_attachment() {
        let mut form = get_form();
        form.attachment = Some(ImageAttachment {
            url: "https://cdn.example.com/notes.txt".to_string(),
            content_type: Some("text/plain".to_string()),
        });

        assert_eq!(
            form.validate(),
            Err(Error::Validation("Please provide a valid image attachment".to_string()))
        );
    }

    #[test]
    fn test_validate_form_with_long_description() {
        let mut form = get_form();
        form.description = Some("x".repeat(301));

        assert_eq!(form.validate().is_err(), true);
    }

    #[test]
    fn test_validate_form_drops_blank_description() {
        let mut form = get_form();
        form.description = Some("   ".to_string());

        assert_eq!(form.validate().unwrap().description, None);
    }

    // ---- GiveawayRecord tests ----

    #[test]
    fn test_validate_record() {
        assert_eq!(get_record(vec![2, 4]).validate(), Ok(()));
    }

    #[test]
    fn test_validate_record_with_too_many_winners() {
        assert_eq!(get_record(vec![2, 3, 4]).validate().is_err(), true);
    }

    #[test]
    fn test_validate_record_with_foreign_winner() {
        assert_eq!(get_record(vec![2, 99]).validate().is_err(), true);
    }

    #[test]
    fn test_validate_record_with_duplicated_winner() {
        assert_eq!(get_record(vec![3, 3]).validate().is_err(), true);
    }

    #[test]
    fn test_record_jump_url() {
        assert_eq!(
            get_record(vec![]).jump_url(),
            "https://discord.com/channels/5/10/100"
        );
    }

    // ---- SessionState tests ----

    #[test]
    fn test_session_state_accepts_entries() {
        assert_eq!(SessionState::Configuring.accepts_entries(), false);
        assert_eq!(SessionState::Open.accepts_entries(), true);
        assert_eq!(SessionState::CountingDown.accepts_entries(), true);
        assert_eq!(SessionState::SelectingWinners.accepts_entries(), false);
        assert_eq!(SessionState::Finalized.accepts_entries(), false);
    }
}
