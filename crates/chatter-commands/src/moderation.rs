//! Guild moderation commands.

use std::sync::Arc;

use tracing::{error, info, warn};

use chatter_core::{BoxedSession, MessageEvent, Permissions, member_has_permission};
use chatter_framework::DispatchContext;

/// Permissions that allow a member to kick others. Any one of them suffices.
pub const KICK_PERMISSIONS: Permissions = Permissions::from_bits(
    Permissions::ADMINISTRATOR.bits() | Permissions::KICK_MEMBERS.bits(),
);

/// Removes every mentioned user from the guild the message was sent in.
///
/// The author needs one of [`KICK_PERMISSIONS`]; otherwise nothing happens
/// apart from an `info` record. Messages outside a guild are treated as
/// unauthorized. Removal stops early once the dispatch deadline passes.
pub async fn kick(session: BoxedSession, event: Arc<MessageEvent>, ctx: DispatchContext) {
    let (Some(guild_id), Some(member)) = (event.guild_id.as_deref(), event.member.as_ref()) else {
        info!(author_id = %event.author.id, "kick command used outside a guild");
        return;
    };

    if !member_has_permission(session.as_ref(), guild_id, member, KICK_PERMISSIONS).await {
        info!(
            author_id = %event.author.id,
            guild_id,
            "member attempted kick command with insufficient permissions"
        );
        return;
    }

    for target in &event.mentions {
        match ctx
            .deadline()
            .run(session.remove_member(guild_id, &target.id))
            .await
        {
            Ok(Ok(())) => info!(guild_id, user_id = %target.id, "removed member"),
            Ok(Err(e)) => {
                error!(guild_id, user_id = %target.id, error = %e, "could not remove member")
            }
            Err(e) => {
                warn!(guild_id, user_id = %target.id, error = %e, "kick interrupted");
                break;
            }
        }
    }
}
