//! Event delivery.
//!
//! The platform binding pushes [`Incoming`] messages into an `mpsc` channel;
//! [`ChatterRuntime`] drains it and dispatches every message through the root
//! router on its own task, so a slow or faulty handler never holds up the
//! next message.
//!
//! # Quick Start
//!
//! ```rust,ignore
//! use chatter_runtime::{ChatterRuntime, Incoming};
//!
//! let runtime = ChatterRuntime::builder()
//!     .config_file("chatter.toml")
//!     .build(|router| {
//!         router.add_command_fn("ping", ping);
//!     })?;
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(64);
//! platform.forward_messages_to(tx);
//! runtime.run(rx).await?;
//! ```

use std::future::Future;
use std::panic::AssertUnwindSafe;
use std::path::Path;
use std::sync::Arc;

use futures::FutureExt;
use tokio::signal;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;
use tokio_util::task::TaskTracker;
use tracing::{debug, error, info};

use crate::config::{ChatterConfig, ConfigLoader, validate_config};
use crate::error::{RuntimeError, RuntimeResult};
use crate::logging;
use chatter_core::{BoxedSession, MessageEvent};
use chatter_framework::Router;
use chatter_framework::middleware::panic_message;

/// One message received by the platform binding.
#[derive(Clone)]
pub struct Incoming {
    /// Session the message arrived on; replies go back through it.
    pub session: BoxedSession,
    /// The received message.
    pub event: Arc<MessageEvent>,
}

impl Incoming {
    /// Pairs a message with the session it arrived on.
    pub fn new(session: BoxedSession, event: impl Into<Arc<MessageEvent>>) -> Self {
        Self {
            session,
            event: event.into(),
        }
    }
}

/// Drives a root [`Router`] from a stream of incoming messages.
pub struct ChatterRuntime {
    config: ChatterConfig,
    router: Arc<Router>,
    tracker: TaskTracker,
}

impl ChatterRuntime {
    /// Creates a runtime around a fully registered root router.
    pub fn new(config: ChatterConfig, router: Router) -> Self {
        info!(
            prefixes = ?router.prefixes(),
            timeout = ?router.timeout(),
            ignore_bots = router.ignore_bots(),
            "Runtime initialized"
        );

        Self {
            config,
            router: Arc::new(router),
            tracker: TaskTracker::new(),
        }
    }

    /// Creates a runtime builder that loads configuration first.
    pub fn builder() -> RuntimeBuilder {
        RuntimeBuilder::new()
    }

    /// Returns the configuration the runtime was created with.
    pub fn config(&self) -> &ChatterConfig {
        &self.config
    }

    /// Returns the root router.
    pub fn router(&self) -> &Router {
        &self.router
    }

    /// Number of dispatches still running.
    pub fn in_flight(&self) -> usize {
        self.tracker.len()
    }

    /// Dispatches one message on its own task.
    ///
    /// A panic that escapes every middleware is logged and ends only this
    /// task; the returned handle resolves normally either way.
    pub fn deliver(
        &self,
        session: BoxedSession,
        event: impl Into<Arc<MessageEvent>>,
    ) -> JoinHandle<()> {
        let router = Arc::clone(&self.router);
        let event = event.into();

        self.tracker.spawn(async move {
            let message_id = event.id.clone();
            let dispatch = router.bootstrap(session, event);

            if let Err(payload) = AssertUnwindSafe(dispatch).catch_unwind().await {
                error!(
                    message_id = %message_id,
                    panic = %panic_message(payload.as_ref()),
                    "dispatch task panicked"
                );
            }
        })
    }

    /// Delivers messages until a shutdown signal (Ctrl+C or SIGTERM) arrives
    /// or every sender of `rx` is dropped, then waits for in-flight dispatches.
    pub async fn run(&self, rx: mpsc::Receiver<Incoming>) -> RuntimeResult<()> {
        info!("Chatter runtime is now running. Press Ctrl+C to stop.");
        self.serve(rx, wait_for_shutdown())
            .await
            .unwrap_or(Ok(()))
    }

    /// Like [`run`](Self::run), but stops when `shutdown` resolves.
    pub async fn run_until<F>(&self, rx: mpsc::Receiver<Incoming>, shutdown: F)
    where
        F: Future<Output = ()>,
    {
        self.serve(rx, shutdown).await;
    }

    /// Stops accepting work and waits for in-flight dispatches to finish.
    pub async fn shutdown(&self) {
        self.tracker.close();
        debug!(in_flight = self.tracker.len(), "Waiting for in-flight dispatches");
        self.tracker.wait().await;
        info!("Runtime stopped");
    }

    async fn serve<F>(&self, mut rx: mpsc::Receiver<Incoming>, shutdown: F) -> Option<F::Output>
    where
        F: Future,
    {
        tokio::pin!(shutdown);

        let outcome = loop {
            tokio::select! {
                out = &mut shutdown => break Some(out),
                incoming = rx.recv() => match incoming {
                    Some(Incoming { session, event }) => {
                        self.deliver(session, event);
                    }
                    None => {
                        debug!("Event source closed");
                        break None;
                    }
                },
            }
        };

        self.shutdown().await;
        outcome
    }
}

impl std::fmt::Debug for ChatterRuntime {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatterRuntime")
            .field("router", &self.router)
            .field("in_flight", &self.tracker.len())
            .finish()
    }
}

async fn wait_for_shutdown() -> RuntimeResult<()> {
    #[cfg(unix)]
    {
        let mut sigterm = signal::unix::signal(signal::unix::SignalKind::terminate())
            .map_err(RuntimeError::Signal)?;

        tokio::select! {
            result = signal::ctrl_c() => {
                result.map_err(RuntimeError::Signal)?;
                info!("Received Ctrl+C, shutting down");
            }
            _ = sigterm.recv() => {
                info!("Received SIGTERM, shutting down");
            }
        }
    }

    #[cfg(not(unix))]
    {
        signal::ctrl_c().await.map_err(RuntimeError::Signal)?;
        info!("Received Ctrl+C, shutting down");
    }

    Ok(())
}

// =============================================================================
// RuntimeBuilder
// =============================================================================

/// Loads configuration, installs logging and builds the root router.
///
/// ```rust,ignore
/// let runtime = ChatterRuntime::builder()
///     .profile("production")
///     .build(register_default_routes)?;
/// ```
pub struct RuntimeBuilder {
    config_loader: ConfigLoader,
    init_logging: bool,
}

impl RuntimeBuilder {
    pub fn new() -> Self {
        Self {
            config_loader: ConfigLoader::new(),
            init_logging: true,
        }
    }

    /// Loads exactly this configuration file.
    pub fn config_file<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.file(path);
        self
    }

    /// Sets the configuration profile (e.g. "development", "production").
    pub fn profile(mut self, profile: impl AsRef<str>) -> Self {
        self.config_loader = self.config_loader.profile(profile);
        self
    }

    /// Adds a search path for configuration files.
    pub fn search_path<P: AsRef<Path>>(mut self, path: P) -> Self {
        self.config_loader = self.config_loader.search_path(path);
        self
    }

    /// Disables loading environment variables.
    pub fn without_env(mut self) -> Self {
        self.config_loader = self.config_loader.without_env();
        self
    }

    /// Merges configuration values programmatically.
    pub fn merge(mut self, config: ChatterConfig) -> Self {
        self.config_loader = self.config_loader.merge(config);
        self
    }

    /// Leaves the global subscriber alone.
    pub fn without_logging(mut self) -> Self {
        self.init_logging = false;
        self
    }

    /// Loads and validates the configuration, then lets `register` populate
    /// the root router before it is shared.
    pub fn build<F>(self, register: F) -> RuntimeResult<ChatterRuntime>
    where
        F: FnOnce(&mut Router),
    {
        let config = self.config_loader.load()?;
        validate_config(&config)?;

        if self.init_logging {
            logging::init_from_config(&config.logging)?;
        }

        let mut router = config.bot.build_router();
        register(&mut router);

        Ok(ChatterRuntime::new(config, router))
    }
}

impl Default for RuntimeBuilder {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use std::time::Duration;

    use async_trait::async_trait;
    use parking_lot::Mutex;

    use super::*;
    use chatter_core::{ApiError, ApiResult, Author, Role, Session};
    use crate::config::LogOutput;
    use crate::error::LoggingError;
    use chatter_framework::DispatchContext;

    #[derive(Default)]
    struct Outbox {
        sent: Mutex<Vec<String>>,
    }

    #[async_trait]
    impl Session for Outbox {
        fn user_id(&self) -> &str {
            "bot"
        }

        async fn send_message(&self, _channel_id: &str, content: &str) -> ApiResult<()> {
            self.sent.lock().push(content.to_string());
            Ok(())
        }

        async fn role(&self, _guild_id: &str, role_id: &str) -> ApiResult<Role> {
            Err(ApiError::not_found("role", role_id))
        }

        async fn remove_member(&self, _guild_id: &str, _user_id: &str) -> ApiResult<()> {
            Ok(())
        }
    }

    fn message(content: &str) -> MessageEvent {
        MessageEvent::new("general", Author::new("u1", "alice"), content)
    }

    async fn explode(_: BoxedSession, _: Arc<MessageEvent>, _: DispatchContext) {
        panic!("no middleware caught this");
    }

    fn runtime() -> ChatterRuntime {
        let mut router = Router::new(["$"]);
        router.add_command_fn("echo", |_, _, ctx: DispatchContext| async move {
            ctx.arguments().to_string()
        });
        router.add_command_fn("slow", |_, _, _| async {
            tokio::time::sleep(Duration::from_millis(500)).await;
            "slow done".to_string()
        });
        router.add_command_fn("boom", explode);
        ChatterRuntime::new(ChatterConfig::default(), router)
    }

    #[tokio::test]
    async fn deliver_dispatches_on_its_own_task() {
        let runtime = runtime();
        let outbox = Arc::new(Outbox::default());

        runtime
            .deliver(outbox.clone(), message("$echo hi there"))
            .await
            .unwrap();

        assert_eq!(*outbox.sent.lock(), ["hi there"]);
    }

    #[tokio::test]
    async fn uncontained_panic_is_confined_to_its_task() {
        let runtime = runtime();
        let outbox = Arc::new(Outbox::default());

        let boom = runtime.deliver(outbox.clone(), message("$boom"));
        let echo = runtime.deliver(outbox.clone(), message("$echo still alive"));

        assert!(boom.await.is_ok());
        assert!(echo.await.is_ok());
        assert_eq!(*outbox.sent.lock(), ["still alive"]);
    }

    #[tokio::test(start_paused = true)]
    async fn shutdown_waits_for_in_flight_dispatches() {
        let runtime = runtime();
        let outbox = Arc::new(Outbox::default());

        runtime.deliver(outbox.clone(), message("$slow"));
        tokio::task::yield_now().await;
        assert_eq!(runtime.in_flight(), 1);

        runtime.shutdown().await;

        assert_eq!(runtime.in_flight(), 0);
        assert_eq!(*outbox.sent.lock(), ["slow done"]);
    }

    #[tokio::test]
    async fn run_until_stops_when_source_closes() {
        let runtime = runtime();
        let outbox = Arc::new(Outbox::default());
        let (tx, rx) = mpsc::channel(8);

        for text in ["$echo one", "$echo two", "ignored"] {
            tx.send(Incoming::new(outbox.clone(), message(text)))
                .await
                .unwrap();
        }
        drop(tx);

        runtime.run_until(rx, std::future::pending()).await;

        let mut sent = outbox.sent.lock().clone();
        sent.sort();
        assert_eq!(sent, ["one", "two"]);
    }

    #[tokio::test]
    async fn run_until_stops_on_shutdown_future() {
        let runtime = runtime();
        let (_tx, rx) = mpsc::channel::<Incoming>(8);
        let (stop_tx, stop_rx) = tokio::sync::oneshot::channel::<()>();

        stop_tx.send(()).unwrap();
        runtime
            .run_until(rx, async {
                let _ = stop_rx.await;
            })
            .await;

        assert_eq!(runtime.in_flight(), 0);
    }

    #[test]
    fn builder_applies_bot_config() {
        let mut config = ChatterConfig::default();
        config.bot.prefixes = vec!["!".into()];
        config.bot.ignore_bots = false;

        let runtime = ChatterRuntime::builder()
            .search_path(std::env::temp_dir().join("chatter-no-such-dir"))
            .without_env()
            .without_logging()
            .merge(config)
            .build(|router| {
                router.add_command_fn("ping", |_, _, _: DispatchContext| async {
                    "pong".to_string()
                });
            })
            .unwrap();

        assert_eq!(runtime.router().prefixes(), ["!"]);
        assert!(!runtime.router().ignore_bots());
        assert!(runtime.router().has_route("ping"));
    }

    #[test]
    fn builder_rejects_invalid_config() {
        let mut config = ChatterConfig::default();
        config.bot.timeout_ms = 0;

        let result = ChatterRuntime::builder()
            .search_path(std::env::temp_dir().join("chatter-no-such-dir"))
            .without_env()
            .without_logging()
            .merge(config)
            .build(|_| {});

        assert!(matches!(result, Err(RuntimeError::Config(_))));
    }

    #[test]
    fn builder_reports_unusable_log_file() {
        let mut config = ChatterConfig::default();
        config.logging.output = LogOutput::File;
        config.logging.file_path = Some("/dev/null/chatter/bot.log".into());

        let result = ChatterRuntime::builder()
            .search_path(std::env::temp_dir().join("chatter-no-such-dir"))
            .without_env()
            .merge(config)
            .build(|_| {});

        assert!(matches!(
            result,
            Err(RuntimeError::Logging(LoggingError::Appender(_)))
        ));
    }
}
