use serde::{Deserialize, Serialize};
use uuid::Uuid;

macro_rules! define_id {
    ($id:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            PartialEq,
            Eq,
            Hash,
            Serialize,
            Deserialize,
            sqlx::Type,
        )]
        #[serde(transparent)]
        #[sqlx(transparent)]
        pub struct $id(Uuid);

        impl $id {
            pub fn new() -> Self {
                Self(Uuid::new_v4())
            }

            pub fn raw(&self) -> Uuid {
                self.0
            }
        }

        impl Default for $id {
            fn default() -> Self {
                Self::new()
            }
        }

        impl From<Uuid> for $id {
            fn from(value: Uuid) -> Self {
                Self(value)
            }
        }

        impl std::fmt::Display for $id {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                self.0.fmt(f)
            }
        }

        impl std::str::FromStr for $id {
            type Err = uuid::Error;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                Ok(Self(Uuid::parse_str(s)?))
            }
        }
    };
}

define_id!(UserId);
define_id!(RoomId);
define_id!(BookingId);
