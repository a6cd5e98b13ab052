//! Role permission bitmasks and the member permission check.

use std::fmt;
use std::ops::{BitOr, BitOrAssign};

use serde::{Deserialize, Serialize};
use tracing::error;

use crate::event::Member;
use crate::session::Session;

/// A permission bitmask as granted by a guild role.
///
/// Bit positions follow the usual guild-platform layout so that values can be
/// passed through from the platform without translation.
#[derive(Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Permissions(u64);

impl Permissions {
    /// No permissions.
    pub const NONE: Self = Self(0);
    /// Remove members from a guild.
    pub const KICK_MEMBERS: Self = Self(1 << 1);
    /// Ban members from a guild.
    pub const BAN_MEMBERS: Self = Self(1 << 2);
    /// Everything.
    pub const ADMINISTRATOR: Self = Self(1 << 3);
    /// Delete or pin other members' messages.
    pub const MANAGE_MESSAGES: Self = Self(1 << 13);

    /// Creates a bitmask from raw bits.
    pub const fn from_bits(bits: u64) -> Self {
        Self(bits)
    }

    /// Returns the raw bits.
    pub const fn bits(self) -> u64 {
        self.0
    }

    /// Returns `true` if any bit of `other` is set in `self`.
    pub const fn intersects(self, other: Self) -> bool {
        self.0 & other.0 != 0
    }

    /// Returns `true` if every bit of `other` is set in `self`.
    pub const fn contains(self, other: Self) -> bool {
        self.0 & other.0 == other.0
    }

    /// Returns `true` if no bit is set.
    pub const fn is_empty(self) -> bool {
        self.0 == 0
    }
}

impl BitOr for Permissions {
    type Output = Self;

    fn bitor(self, rhs: Self) -> Self {
        Self(self.0 | rhs.0)
    }
}

impl BitOrAssign for Permissions {
    fn bitor_assign(&mut self, rhs: Self) {
        self.0 |= rhs.0;
    }
}

impl fmt::Debug for Permissions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Permissions({:#x})", self.0)
    }
}

/// Checks whether a guild member holds any of the `required` permissions.
///
/// Each of the member's roles is resolved through the session in order. The
/// first role whose bitmask intersects `required` grants access. A failed role
/// lookup is logged and treated as a denial; it is never escalated to the
/// caller.
pub async fn member_has_permission(
    session: &dyn Session,
    guild_id: &str,
    member: &Member,
    required: Permissions,
) -> bool {
    for role_id in &member.roles {
        let role = match session.role(guild_id, role_id).await {
            Ok(role) => role,
            Err(e) => {
                error!(guild_id, role_id = %role_id, error = %e, "could not get member roles");
                return false;
            }
        };

        if role.permissions.intersects(required) {
            return true;
        }
    }

    false
}
