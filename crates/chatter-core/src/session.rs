//! The platform client capability.
//!
//! A [`Session`] is whatever the platform binding hands to the router together
//! with each event. Handlers use it to reply and to look up guild data; the
//! router itself only ever reads [`Session::user_id`].

use std::sync::Arc;

use async_trait::async_trait;

use crate::error::ApiResult;
use crate::event::Role;

/// A connected chat platform client.
///
/// Implementations are shared between concurrently running dispatches and must
/// therefore be `Send + Sync`.
#[async_trait]
pub trait Session: Send + Sync {
    /// The user identifier of the bot account this session is logged in as.
    fn user_id(&self) -> &str;

    /// Sends a text message to a channel.
    async fn send_message(&self, channel_id: &str, content: &str) -> ApiResult<()>;

    /// Resolves a guild role.
    ///
    /// This may be served from a cache and can fail when the cache is stale.
    async fn role(&self, guild_id: &str, role_id: &str) -> ApiResult<Role>;

    /// Removes a member from a guild.
    async fn remove_member(&self, guild_id: &str, user_id: &str) -> ApiResult<()>;
}

/// Type-erased, shareable session handle.
pub type BoxedSession = Arc<dyn Session>;
