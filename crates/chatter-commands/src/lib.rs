//! # Chatter Commands
//!
//! The builtin command set of the Chatter bot.
//!
//! | Keyword      | Handler               | Notes                                  |
//! |--------------|-----------------------|----------------------------------------|
//! | `echo`       | [`echo`]              | replies with the argument text         |
//! | `mod kick`   | [`kick`]              | needs `ADMINISTRATOR` or `KICK_MEMBERS` |
//!
//! [`register_default_routes`] installs all of them on a root router.

mod echo;
pub mod moderation;

pub use echo::echo;
pub use moderation::{KICK_PERMISSIONS, kick};

use chatter_framework::{CatchPanicLayer, LoggingLayer, Router};

/// Registers the builtin commands and middleware on `router`.
///
/// Every command is timed by [`LoggingLayer`]; the `mod` group additionally
/// contains panics raised by its commands.
pub fn register_default_routes(router: &mut Router) {
    router.use_middleware(LoggingLayer);

    router.add_command_fn("echo", echo);
    router.add_subcommand("mod", |r| {
        r.use_middleware(CatchPanicLayer);
        r.add_command_fn("kick", kick);
    });
}
