//! A [`Session`] that talks to the terminal.

use std::collections::{HashMap, HashSet};

use async_trait::async_trait;
use parking_lot::Mutex;

use chatter::core::{ApiError, ApiResult, Permissions, Role, Session};

/// Role granted to `--admin` users.
pub const ADMIN_ROLE: &str = "admin";
/// Role every console user has.
pub const MEMBER_ROLE: &str = "member";

/// Prints replies to stdout and keeps guild state in memory.
pub struct ConsoleSession {
    user_id: String,
    roles: HashMap<String, Role>,
    removed: Mutex<HashSet<(String, String)>>,
}

impl ConsoleSession {
    pub fn new(user_id: impl Into<String>) -> Self {
        let roles = [
            (ADMIN_ROLE, "Administrators", Permissions::ADMINISTRATOR),
            (MEMBER_ROLE, "Members", Permissions::NONE),
        ]
        .into_iter()
        .map(|(id, name, permissions)| {
            let role = Role {
                id: id.to_string(),
                name: name.to_string(),
                permissions,
            };
            (id.to_string(), role)
        })
        .collect();

        Self {
            user_id: user_id.into(),
            roles,
            removed: Mutex::new(HashSet::new()),
        }
    }
}

#[async_trait]
impl Session for ConsoleSession {
    fn user_id(&self) -> &str {
        &self.user_id
    }

    async fn send_message(&self, channel_id: &str, content: &str) -> ApiResult<()> {
        println!("[#{channel_id}] {content}");
        Ok(())
    }

    async fn role(&self, _guild_id: &str, role_id: &str) -> ApiResult<Role> {
        self.roles
            .get(role_id)
            .cloned()
            .ok_or_else(|| ApiError::not_found("role", role_id))
    }

    async fn remove_member(&self, guild_id: &str, user_id: &str) -> ApiResult<()> {
        let newly_removed = self
            .removed
            .lock()
            .insert((guild_id.to_string(), user_id.to_string()));

        if !newly_removed {
            return Err(ApiError::not_found("member", user_id));
        }
        println!("-- {user_id} was removed from {guild_id}");
        Ok(())
    }
}
