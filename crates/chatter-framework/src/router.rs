//! The command router.
//!
//! A [`Router`] is one node of a routing tree. It owns a list of accepted
//! prefixes, a keyword → handler table, an ordered middleware list and the
//! dispatch policy (timeout, bot filtering). Routers are handlers themselves,
//! so a keyword can resolve to a nested router that consumes the next token.
//!
//! # Dispatch
//!
//! For every level the dispatch:
//!
//! 1. Drops messages written by the bot itself, and by other bots when
//!    `ignore_bots` is set
//! 2. Accepts the message if any prefix is empty or is a prefix of the raw text
//! 3. Tokenizes either the raw text minus the prefix (at the originating
//!    router) or the arguments left by the parent (at nested routers)
//! 4. Resolves the keyword, falling back to a not-found reply
//! 5. Wraps the resolved handler with this router's own middleware and calls it
//!
//! There is no backtracking: an unresolved keyword ends the dispatch at the
//! level where it failed.
//!
//! # Example
//!
//! ```rust,ignore
//! let mut router = Router::new(["$"]);
//! router.use_middleware(LoggingLayer);
//! router.add_command_fn("echo", echo);
//! router.add_subcommand("mod", |r| {
//!     r.use_middleware(CatchPanicLayer);
//!     r.add_command_fn("kick", kick);
//! });
//!
//! // "$mod kick @someone" → kick with arguments "@someone"
//! ```
//!
//! Registration takes `&mut self` and must finish before the router is shared
//! with the delivery side; after that, the tree is only ever read.

use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use async_trait::async_trait;
use tracing::{Instrument, debug_span, error, trace};

use crate::context::DispatchContext;
use crate::handler::{BoxedHandler, EventHandler, HandlerResponse, handler_fn};
use crate::middleware::{BoxedMiddleware, Middleware, compose};
use chatter_core::{Author, BoxedSession, MessageEvent, Session};

/// Timeout used by routers that are not configured otherwise.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(1);

/// A node of the command routing tree.
pub struct Router {
    prefixes: Vec<String>,
    routes: HashMap<String, BoxedHandler>,
    middleware: Vec<BoxedMiddleware>,
    timeout: Duration,
    ignore_bots: bool,
}

impl Router {
    /// Creates a router accepting the given prefixes.
    ///
    /// The router starts with a one second timeout and ignores bot accounts.
    /// An empty prefix accepts every message.
    pub fn new<I, S>(prefixes: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self {
            prefixes: prefixes.into_iter().map(Into::into).collect(),
            routes: HashMap::new(),
            middleware: Vec::new(),
            timeout: DEFAULT_TIMEOUT,
            ignore_bots: true,
        }
    }

    /// The accepted prefixes, in match order.
    pub fn prefixes(&self) -> &[String] {
        &self.prefixes
    }

    /// The timeout applied to dispatches originating at this router.
    ///
    /// Only the router passed the incoming message (see [`bootstrap`](Self::bootstrap))
    /// creates a dispatch context, so the timeout of a nested router has no
    /// effect.
    pub fn timeout(&self) -> Duration {
        self.timeout
    }

    /// Sets the dispatch timeout.
    pub fn set_timeout(&mut self, timeout: Duration) -> &mut Self {
        self.timeout = timeout;
        self
    }

    /// Sets the dispatch timeout (builder pattern).
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    /// Whether messages from bot accounts are dropped.
    ///
    /// Messages written by the session's own account are always dropped.
    pub fn ignore_bots(&self) -> bool {
        self.ignore_bots
    }

    /// Sets whether messages from bot accounts are dropped.
    pub fn set_ignore_bots(&mut self, ignore: bool) -> &mut Self {
        self.ignore_bots = ignore;
        self
    }

    /// Sets whether messages from bot accounts are dropped (builder pattern).
    pub fn with_ignore_bots(mut self, ignore: bool) -> Self {
        self.ignore_bots = ignore;
        self
    }

    /// Associates `keyword` with a handler, replacing any previous association.
    ///
    /// Keywords are case-sensitive.
    pub fn add_command<H>(&mut self, keyword: impl Into<String>, handler: H) -> &mut Self
    where
        H: EventHandler,
    {
        self.routes.insert(keyword.into(), Arc::new(handler));
        self
    }

    /// Associates `keyword` with a plain async function.
    pub fn add_command_fn<F, Fut>(&mut self, keyword: impl Into<String>, f: F) -> &mut Self
    where
        F: Fn(BoxedSession, Arc<MessageEvent>, DispatchContext) -> Fut + Send + Sync + 'static,
        Fut: Future + Send + 'static,
        Fut::Output: HandlerResponse,
    {
        self.add_command(keyword, handler_fn(f))
    }

    /// Creates a nested router reachable through `keyword`.
    ///
    /// `build` populates the new router before it becomes reachable. The
    /// nested router accepts every message (empty prefix) and starts without
    /// middleware; middleware registered on this router is not inherited.
    ///
    /// ```rust,ignore
    /// router.add_subcommand("permission", |r| {
    ///     r.add_command_fn("grant", grant);
    ///     r.add_command_fn("revoke", revoke);
    /// });
    /// ```
    pub fn add_subcommand<F>(&mut self, keyword: impl Into<String>, build: F) -> &mut Self
    where
        F: FnOnce(&mut Router),
    {
        let mut child = Router::new([""]);
        build(&mut child);
        self.add_command(keyword, child)
    }

    /// Appends a middleware to this router's list.
    ///
    /// Middleware applies only to handlers resolved from this router's own
    /// table. The last-registered middleware is the outermost layer.
    pub fn use_middleware<M>(&mut self, middleware: M) -> &mut Self
    where
        M: Middleware,
    {
        self.middleware.push(Arc::new(middleware));
        self
    }

    /// Returns the number of registered keywords.
    pub fn route_count(&self) -> usize {
        self.routes.len()
    }

    /// Returns `true` if `keyword` is registered on this router.
    pub fn has_route(&self, keyword: &str) -> bool {
        self.routes.contains_key(keyword)
    }

    /// Returns the number of registered middleware.
    pub fn middleware_count(&self) -> usize {
        self.middleware.len()
    }

    /// Entry point for the platform binding: dispatches one incoming message.
    ///
    /// Creates a fresh [`DispatchContext`] from this router's timeout and runs
    /// the dispatch to completion.
    pub async fn bootstrap(&self, session: BoxedSession, event: impl Into<Arc<MessageEvent>>) {
        let event = event.into();
        let mut ctx = DispatchContext::new(self.timeout);
        let span = debug_span!(
            "dispatch",
            channel_id = %event.channel_id,
            author_id = %event.author.id,
        );

        self.handle(&session, &event, &mut ctx)
            .instrument(span)
            .await;
    }

    fn is_suppressed(&self, session: &dyn Session, author: &Author) -> bool {
        author.id == session.user_id() || (author.bot && self.ignore_bots)
    }

    fn match_prefix(&self, content: &str) -> Option<&str> {
        self.prefixes
            .iter()
            .map(String::as_str)
            .find(|prefix| prefix.is_empty() || content.starts_with(prefix))
    }

    fn resolve(&self, keyword: &str) -> BoxedHandler {
        self.routes
            .get(keyword)
            .cloned()
            .unwrap_or_else(|| Arc::new(NotFound))
    }
}

#[async_trait]
impl EventHandler for Router {
    async fn handle(
        &self,
        session: &BoxedSession,
        event: &Arc<MessageEvent>,
        ctx: &mut DispatchContext,
    ) {
        if self.is_suppressed(session.as_ref(), &event.author) {
            trace!(author_id = %event.author.id, "ignoring message from bot account");
            return;
        }

        let Some(prefix) = self.match_prefix(&event.content) else {
            return;
        };

        let text = if ctx.has_command() {
            ctx.arguments().to_string()
        } else {
            event
                .content
                .strip_prefix(prefix)
                .unwrap_or(&event.content)
                .to_string()
        };
        ctx.advance(&text);

        let handler = compose(self.resolve(ctx.command()), &self.middleware);
        handler.handle(session, event, ctx).await;
    }
}

impl fmt::Debug for Router {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut keywords: Vec<&str> = self.routes.keys().map(String::as_str).collect();
        keywords.sort_unstable();

        f.debug_struct("Router")
            .field("prefixes", &self.prefixes)
            .field("routes", &keywords)
            .field("middleware_count", &self.middleware.len())
            .field("timeout", &self.timeout)
            .field("ignore_bots", &self.ignore_bots)
            .finish()
    }
}

/// Replies to the originating channel that the keyword did not resolve.
#[derive(Debug, Clone, Copy, Default)]
pub struct NotFound;

#[async_trait]
impl EventHandler for NotFound {
    async fn handle(
        &self,
        session: &BoxedSession,
        event: &Arc<MessageEvent>,
        ctx: &mut DispatchContext,
    ) {
        let reply = format!("{} command not found", ctx.command());
        if let Err(e) = session.send_message(&event.channel_id, &reply).await {
            error!(channel_id = %event.channel_id, error = %e, "could not send message");
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::middleware::LoggingLayer;

    async fn noop(_: BoxedSession, _: Arc<MessageEvent>, _: DispatchContext) {}

    #[test]
    fn new_router_defaults() {
        let router = Router::new(["$", "!"]);

        assert_eq!(router.prefixes(), ["$", "!"]);
        assert_eq!(router.timeout(), DEFAULT_TIMEOUT);
        assert!(router.ignore_bots());
        assert_eq!(router.route_count(), 0);
        assert_eq!(router.middleware_count(), 0);
    }

    #[test]
    fn builder_setters() {
        let router = Router::new(["$"])
            .with_timeout(Duration::from_millis(250))
            .with_ignore_bots(false);

        assert_eq!(router.timeout(), Duration::from_millis(250));
        assert!(!router.ignore_bots());
    }

    #[test]
    fn registration_overwrites_same_keyword() {
        let mut router = Router::new(["$"]);
        router.add_command_fn("echo", noop).add_command_fn("echo", noop);
        router.add_command_fn("Echo", noop);

        assert_eq!(router.route_count(), 2);
        assert!(router.has_route("echo"));
        assert!(router.has_route("Echo"));
        assert!(!router.has_route("ECHO"));
    }

    #[test]
    fn subcommand_is_built_before_registration() {
        let mut router = Router::new(["$"]);
        router.use_middleware(LoggingLayer);

        let mut child_routes = 0;
        router.add_subcommand("group", |r| {
            r.add_command_fn("item", noop);
            r.add_subcommand("deeper", |r| {
                r.add_command_fn("leaf", noop);
            });
            child_routes = r.route_count();
            assert_eq!(r.prefixes(), [""]);
            assert_eq!(r.middleware_count(), 0);
        });

        assert_eq!(child_routes, 2);
        assert!(router.has_route("group"));
        assert_eq!(router.middleware_count(), 1);
    }

    #[test]
    fn prefix_matching_takes_first_entry() {
        let router = Router::new(["!!", "!", ""]);

        assert_eq!(router.match_prefix("!!ping"), Some("!!"));
        assert_eq!(router.match_prefix("!ping"), Some("!"));
        assert_eq!(router.match_prefix("ping"), Some(""));

        let strict = Router::new(["$"]);
        assert_eq!(strict.match_prefix("ping"), None);
    }

    #[test]
    fn debug_lists_sorted_keywords() {
        let mut router = Router::new(["$"]);
        router.add_command_fn("zeta", noop).add_command_fn("alpha", noop);

        let rendered = format!("{router:?}");
        assert!(rendered.contains(r#"routes: ["alpha", "zeta"]"#));
    }
}
