//! Storage namespaces and key layout.
//!
//! Demo and preview games run against the same backends as the live game
//! but under separate key prefixes. The namespace is an explicit parameter
//! threaded into every engine call -- never ambient global state.
//!
//! # Key Patterns
//!
//! | Key | Type | Description |
//! |-----|------|-------------|
//! | `{ns}:pool` | JSON | The merged candidate pool (written once) |
//! | `{ns}:submission:{participant}` | JSON | One participant's submission |
//! | `{ns}:eliminations` | Log | Append-only elimination records |
//! | `{ns}:spins` | Log | Append-only spin records |
//! | `{ns}:config` | JSON | The game config singleton |

use serde::{Deserialize, Serialize};

use getaway_types::Participant;

/// Which logical game a storage key belongs to.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Namespace {
    /// The real game.
    #[default]
    Live,
    /// The throwaway demo walkthrough.
    Demo,
    /// The preview flow with pre-filled data.
    Preview,
}

impl Namespace {
    /// The key prefix for this namespace.
    pub const fn prefix(self) -> &'static str {
        match self {
            Self::Live => "getaway",
            Self::Demo => "getaway:demo",
            Self::Preview => "getaway:preview",
        }
    }

    /// Parse a request-level mode string. Unknown values fall back to
    /// the live game.
    pub fn from_mode(mode: Option<&str>) -> Self {
        match mode {
            Some("demo") => Self::Demo,
            Some("preview") => Self::Preview,
            _ => Self::Live,
        }
    }

    /// Full storage key for the merged pool.
    pub fn pool_key(self) -> String {
        format!("{}:pool", self.prefix())
    }

    /// Full storage key for one participant's submission.
    pub fn submission_key(self, participant: Participant) -> String {
        format!("{}:submission:{}", self.prefix(), participant.slug())
    }

    /// Full storage key for the elimination log.
    pub fn eliminations_key(self) -> String {
        format!("{}:eliminations", self.prefix())
    }

    /// Full storage key for the spin log.
    pub fn spins_key(self) -> String {
        format!("{}:spins", self.prefix())
    }

    /// Full storage key for the game config singleton.
    pub fn config_key(self) -> String {
        format!("{}:config", self.prefix())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn namespaces_never_share_keys() {
        let live = Namespace::Live.pool_key();
        let demo = Namespace::Demo.pool_key();
        let preview = Namespace::Preview.pool_key();
        assert_ne!(live, demo);
        assert_ne!(live, preview);
        assert_ne!(demo, preview);
        // The live prefix must not be a namespace-confusable prefix of
        // the others' keys.
        assert_eq!(live, "getaway:pool");
        assert_eq!(demo, "getaway:demo:pool");
    }

    #[test]
    fn mode_parsing_falls_back_to_live() {
        assert_eq!(Namespace::from_mode(Some("demo")), Namespace::Demo);
        assert_eq!(Namespace::from_mode(Some("preview")), Namespace::Preview);
        assert_eq!(Namespace::from_mode(Some("???")), Namespace::Live);
        assert_eq!(Namespace::from_mode(None), Namespace::Live);
    }

    #[test]
    fn submission_keys_are_per_participant() {
        assert_eq!(
            Namespace::Live.submission_key(Participant::PlayerOne),
            "getaway:submission:player-one"
        );
        assert_eq!(
            Namespace::Live.submission_key(Participant::PlayerTwo),
            "getaway:submission:player-two"
        );
    }
}
