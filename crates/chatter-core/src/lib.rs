//! # Chatter Core
//!
//! The platform boundary of the Chatter command bot.
//!
//! Nothing in this crate routes or dispatches. It describes the things the
//! router and the command bodies talk to:
//!
//! - **Event model**: the raw chat message delivered by a platform binding
//!   ([`MessageEvent`], [`Author`], [`Member`], [`Role`])
//! - **Session**: the platform client capability used to reply, resolve roles
//!   and manage guild members ([`Session`], [`BoxedSession`])
//! - **Permissions**: role bitmasks and the permission check collaborator
//!   ([`Permissions`], [`member_has_permission`])
//!
//! ```text
//! ┌──────────────────┐  (session, event)  ┌──────────┐
//! │ platform binding │───────────────────▶│  Router  │──▶ handlers ──▶ Session::send_message
//! └──────────────────┘                    └──────────┘
//! ```

pub mod error;
pub mod event;
pub mod permissions;
pub mod session;

pub use error::{ApiError, ApiResult};
pub use event::{Author, Member, MessageEvent, Role};
pub use permissions::{Permissions, member_has_permission};
pub use session::{BoxedSession, Session};
