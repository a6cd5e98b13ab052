//! Command timing middleware.

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;
use tower_layer::Layer;
use tracing::info;

use crate::context::DispatchContext;
use crate::handler::EventHandler;
use chatter_core::{BoxedSession, MessageEvent};

/// Logs every handled command together with how long it took.
///
/// The record is written from a drop guard, so it is emitted on every exit
/// path of the inner call, including a panic that no inner layer contained.
/// It carries the keyword current when the inner call returned (for a nested
/// router that is the deepest matched keyword) or, if the inner call unwound,
/// the keyword seen on entry.
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer;

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Logging<S> {
        Logging { inner }
    }
}

/// The handler produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
}

#[async_trait]
impl<S: EventHandler> EventHandler for Logging<S> {
    async fn handle(
        &self,
        session: &BoxedSession,
        event: &Arc<MessageEvent>,
        ctx: &mut DispatchContext,
    ) {
        let mut record = CompletionRecord::start(ctx.command());
        self.inner.handle(session, event, ctx).await;
        record.finish(ctx.command());
    }
}

struct CompletionRecord {
    command: String,
    started: Instant,
}

impl CompletionRecord {
    fn start(command: &str) -> Self {
        Self {
            command: command.to_string(),
            started: Instant::now(),
        }
    }

    fn finish(&mut self, command: &str) {
        command.clone_into(&mut self.command);
    }
}

impl Drop for CompletionRecord {
    fn drop(&mut self) {
        info!(
            command = %self.command,
            elapsed = ?self.started.elapsed(),
            "handled command"
        );
    }
}
