//! Access-token validation for the two participants.
//!
//! Each participant reaches their page through a personal token. With no
//! tokens configured (local testing) every valid participant segment is
//! accepted.

use getaway_types::Participant;

/// Environment variable holding player one's access token.
const TOKEN_PLAYER_ONE_VAR: &str = "GETAWAY_TOKEN_PLAYER_ONE";

/// Environment variable holding player two's access token.
const TOKEN_PLAYER_TWO_VAR: &str = "GETAWAY_TOKEN_PLAYER_TWO";

/// The configured access tokens, one per participant.
#[derive(Debug, Clone, Default)]
pub struct AccessTokens {
    player_one: Option<String>,
    player_two: Option<String>,
}

impl AccessTokens {
    /// Build from explicit values (empty strings count as unset).
    pub fn new(player_one: Option<String>, player_two: Option<String>) -> Self {
        Self {
            player_one: player_one.filter(|t| !t.is_empty()),
            player_two: player_two.filter(|t| !t.is_empty()),
        }
    }

    /// Read the tokens from the environment.
    pub fn from_env() -> Self {
        Self::new(
            std::env::var(TOKEN_PLAYER_ONE_VAR).ok(),
            std::env::var(TOKEN_PLAYER_TWO_VAR).ok(),
        )
    }

    /// Whether any token is configured at all.
    const fn any_configured(&self) -> bool {
        self.player_one.is_some() || self.player_two.is_some()
    }

    /// Validate a user segment + token pair.
    ///
    /// Returns the authenticated participant, or `None` if the segment is
    /// unknown or the token does not match. With no tokens configured,
    /// any valid segment passes (local testing mode).
    pub fn validate(&self, user: &str, token: Option<&str>) -> Option<Participant> {
        let participant = Participant::from_slug(user)?;
        if !self.any_configured() {
            return Some(participant);
        }
        let expected = match participant {
            Participant::PlayerOne => self.player_one.as_deref(),
            Participant::PlayerTwo => self.player_two.as_deref(),
        }?;
        (token == Some(expected)).then_some(participant)
    }
}
