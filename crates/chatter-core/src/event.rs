//! The raw message event delivered by a platform binding.
//!
//! The model mirrors what a guild-based chat platform sends for a newly created
//! message: who wrote it, where, the text, and who it mentions. Guild and
//! member data are optional because direct messages carry neither.

use serde::{Deserialize, Serialize};

use crate::permissions::Permissions;

/// The author of a message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Author {
    /// Platform user identifier.
    pub id: String,
    /// Display name.
    #[serde(default)]
    pub username: String,
    /// Whether the account is flagged as a bot account.
    #[serde(default)]
    pub bot: bool,
}

impl Author {
    /// Creates a human (non-bot) author.
    pub fn new(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            username: username.into(),
            bot: false,
        }
    }

    /// Creates an author flagged as a bot account.
    pub fn bot(id: impl Into<String>, username: impl Into<String>) -> Self {
        Self {
            bot: true,
            ..Self::new(id, username)
        }
    }
}

/// Guild membership data attached to guild messages.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Member {
    /// The member's user identifier.
    pub user_id: String,
    /// The guild the membership belongs to.
    pub guild_id: String,
    /// Role identifiers held by the member, in platform order.
    #[serde(default)]
    pub roles: Vec<String>,
}

/// A guild role as resolved through [`Session::role`](crate::Session::role).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Role {
    /// Role identifier.
    pub id: String,
    /// Role name.
    #[serde(default)]
    pub name: String,
    /// Permission bitmask granted by the role.
    #[serde(default)]
    pub permissions: Permissions,
}

/// A newly created chat message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageEvent {
    /// Message identifier.
    #[serde(default)]
    pub id: String,
    /// Channel the message was posted in; replies go here.
    pub channel_id: String,
    /// Guild the channel belongs to, if any.
    #[serde(default)]
    pub guild_id: Option<String>,
    /// The message author.
    pub author: Author,
    /// Membership data of the author in `guild_id`, if any.
    #[serde(default)]
    pub member: Option<Member>,
    /// Raw message text.
    #[serde(default)]
    pub content: String,
    /// Users mentioned in the message.
    #[serde(default)]
    pub mentions: Vec<Author>,
}

impl MessageEvent {
    /// Creates a message with the given channel, author and text.
    pub fn new(channel_id: impl Into<String>, author: Author, content: impl Into<String>) -> Self {
        Self {
            id: String::new(),
            channel_id: channel_id.into(),
            guild_id: None,
            author,
            member: None,
            content: content.into(),
            mentions: Vec::new(),
        }
    }

    /// Places the message in a guild with the author's membership data.
    pub fn in_guild(mut self, guild_id: impl Into<String>, roles: Vec<String>) -> Self {
        let guild_id = guild_id.into();
        self.member = Some(Member {
            user_id: self.author.id.clone(),
            guild_id: guild_id.clone(),
            roles,
        });
        self.guild_id = Some(guild_id);
        self
    }

    /// Adds a mentioned user.
    pub fn mention(mut self, user: Author) -> Self {
        self.mentions.push(user);
        self
    }
}
