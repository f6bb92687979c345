//! Strongly-typed identifiers for stored records
//!
//! Every table in the policy administration schema is keyed by a database
//! generated integer. Newtype wrappers keep a policy id from being passed
//! where a customer or nominee id is expected.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::CoreError;

macro_rules! define_id {
    ($name:ident, $prefix:literal) => {
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize,
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Wraps a raw database key
            pub const fn new(value: i32) -> Self {
                Self(value)
            }

            /// Returns the raw database key
            pub const fn value(self) -> i32 {
                self.0
            }

            /// Returns the identifier prefix for display
            pub fn prefix() -> &'static str {
                $prefix
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}-{}", $prefix, self.0)
            }
        }

        impl FromStr for $name {
            type Err = CoreError;

            /// Accepts only the bare key (`"42"`), with no padding or prefix
            fn from_str(s: &str) -> Result<Self, Self::Err> {
                s.parse::<i32>()
                    .map(Self)
                    .map_err(|_| CoreError::invalid_identifier(stringify!($name), s))
            }
        }

        impl From<i32> for $name {
            fn from(value: i32) -> Self {
                Self(value)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> i32 {
                id.0
            }
        }
    };
}

define_id!(PolicyId, "POL");
define_id!(CustomerId, "CUST");
define_id!(NomineeId, "NOM");
define_id!(PolicyMapId, "PMAP");
