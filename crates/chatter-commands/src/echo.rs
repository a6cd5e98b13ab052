use std::sync::Arc;

use tracing::error;

use chatter_core::{BoxedSession, MessageEvent};
use chatter_framework::DispatchContext;

/// Replies with the argument text, verbatim after trimming.
pub async fn echo(session: BoxedSession, event: Arc<MessageEvent>, ctx: DispatchContext) {
    if let Err(e) = session
        .send_message(&event.channel_id, ctx.arguments())
        .await
    {
        error!(channel_id = %event.channel_id, error = %e, "could not echo message");
    }
}
