//! Type-safe identifier wrappers around [`Uuid`].
//!
//! Append-only records (eliminations, spins) carry strongly-typed IDs to
//! prevent accidental mixing of identifiers at compile time. All IDs use
//! UUID v7 (time-ordered) so log rows sort by creation time.

use serde::{Deserialize, Serialize};
use ts_rs::TS;
use uuid::Uuid;

/// Generates a newtype wrapper around [`Uuid`] with standard derives.
macro_rules! define_id {
    (
        $(#[$meta:meta])*
        $name:ident
    ) => {
        $(#[$meta])*
        #[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize, TS)]
        #[ts(export, export_to = "bindings/")]
        pub struct $name(pub Uuid);

        impl $name {
            /// Create a new identifier using UUID v7 (time-ordered).
            pub fn new() -> Self {
                Self(Uuid::now_v7())
            }

            /// Return the inner [`Uuid`] value.
            pub const fn into_inner(self) -> Uuid {
                self.0
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::new()
            }
        }

        impl core::fmt::Display for $name {
            fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl From<Uuid> for $name {
            fn from(id: Uuid) -> Self {
                Self(id)
            }
        }

        impl From<$name> for Uuid {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id! {
    /// Unique identifier for an elimination ("strike") record.
    StrikeId
}

define_id! {
    /// Unique identifier for a spin record.
    SpinId
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ids_are_distinct_types() {
        let strike = StrikeId::new();
        let spin = SpinId::new();
        // These are different types -- the compiler enforces no mixing.
        assert_ne!(strike.into_inner(), Uuid::nil());
        assert_ne!(spin.into_inner(), Uuid::nil());
    }

    #[test]
    fn ids_serialize_as_plain_uuid() {
        let id = SpinId::new();
        let json = serde_json::to_string(&id).unwrap_or_default();
        // Newtype wrappers must not add an object layer on the wire.
        assert!(json.starts_with('"') && json.ends_with('"'));
    }
}
