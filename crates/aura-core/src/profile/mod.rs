//! Profile identity and per-profile key namespacing.
//!
//! Several people can share one device. Each gets a [`ProfileId`], and
//! every key the vault touches is suffixed with it, so one profile can never
//! read or overwrite another's state, salt or verifier.

mod registry;

pub use registry::{ProfileRecord, ProfileRegistry, MIN_PASSWORD_LENGTH};

use std::fmt;

/// Global key holding the registered profiles.
pub const USERS_KEY: &str = "aura_users_v360";

/// Global key holding the signed-in profile.
pub const CURRENT_USER_KEY: &str = "aura_current_user_v360";

const STATE_BASE: &str = "aura_state_v360";
const SECURITY_BASE: &str = "aura_sec_v360";
const PIN_META_BASE: &str = "aura_pin_meta_v360";

/// Identity used when nobody is signed in.
pub const GUEST: &str = "guest";

/// A normalized profile identity: trimmed, lower-cased, never empty.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct ProfileId(String);

impl ProfileId {
    /// Normalize a username. Blank input maps to the guest identity.
    pub fn new(name: &str) -> Self {
        let normalized = name.trim().to_lowercase();
        if normalized.is_empty() {
            Self::guest()
        } else {
            Self(normalized)
        }
    }

    pub fn guest() -> Self {
        Self(GUEST.to_string())
    }

    pub fn is_guest(&self) -> bool {
        self.0 == GUEST
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// The persisted keys belonging to this profile.
    pub fn keys(&self) -> ProfileKeys {
        ProfileKeys::for_profile(self)
    }
}

impl fmt::Display for ProfileId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// The three logical keys one profile owns in the store.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProfileKeys {
    /// State document (plaintext JSON or encrypted envelope)
    pub state: String,
    /// Security metadata (salt, KDF version)
    pub security: String,
    /// PIN metadata (enabled flag, verifier)
    pub pin: String,
}

impl ProfileKeys {
    pub fn for_profile(profile: &ProfileId) -> Self {
        Self {
            state: namespaced(STATE_BASE, profile),
            security: namespaced(SECURITY_BASE, profile),
            pin: namespaced(PIN_META_BASE, profile),
        }
    }

    /// All keys, for bulk removal.
    pub fn all(&self) -> [&str; 3] {
        [&self.state, &self.security, &self.pin]
    }
}

fn namespaced(base: &str, profile: &ProfileId) -> String {
    format!("{}::{}", base, profile.as_str())
}
