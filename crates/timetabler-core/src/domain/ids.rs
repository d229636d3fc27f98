//! Dense entity identifiers.
//!
//! Every entity is addressed by its position in the owning `TermDomain`
//! vector, so the assignment store can use flat `Vec` indices for O(1)
//! occupancy lookups. External string keys live on the entities themselves.

use std::fmt;

use serde::{Deserialize, Serialize};

macro_rules! dense_id {
    ($name:ident, $label:literal) => {
        #[derive(Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(transparent)]
        pub struct $name(pub u32);

        impl $name {
            /// Creates an id from a vector position.
            #[inline]
            pub const fn from_index(index: usize) -> Self {
                $name(index as u32)
            }

            /// Returns the vector position of this id.
            #[inline]
            pub const fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Debug for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}#{}", $label, self.0)
            }
        }
    };
}

dense_id!(CourseId, "course");
dense_id!(SectionId, "section");
dense_id!(FacultyId, "faculty");
dense_id!(RoomId, "room");
dense_id!(SlotId, "slot");
dense_id!(BatchId, "batch");
dense_id!(StudentId, "student");
