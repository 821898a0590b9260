//! Strongly typed, zero-cost identifier wrappers.
//!
//! All IDs are `Copy + Ord + Hash` so they can be used as map keys and sorted
//! collection elements without ceremony.  Resources and tasks live in arenas
//! (`Vec`s) and the inner integer is their index; callers should prefer the
//! `.index()` helper over `id.0 as usize`.

use std::fmt;

/// Generate a typed ID wrapper around a primitive integer.
macro_rules! typed_id {
    ($(#[$attr:meta])* $vis:vis struct $name:ident($inner:ty);) => {
        $(#[$attr])*
        #[derive(Copy, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Debug)]
        #[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
        $vis struct $name(pub $inner);

        impl $name {
            /// Cast to `usize` for direct use as a `Vec` index.
            #[inline(always)]
            pub fn index(self) -> usize {
                self.0 as usize
            }
        }

        impl fmt::Display for $name {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                write!(f, "{}({})", stringify!($name), self.0)
            }
        }

        impl From<$name> for usize {
            #[inline(always)]
            fn from(id: $name) -> usize {
                id.0 as usize
            }
        }

        impl TryFrom<usize> for $name {
            type Error = std::num::TryFromIntError;
            fn try_from(n: usize) -> Result<$name, Self::Error> {
                <$inner>::try_from(n).map($name)
            }
        }
    };
}

typed_id! {
    /// Index of a bookable resource (staff member, machine, patient) in the
    /// resource arena.
    pub struct ResourceId(u32);
}

typed_id! {
    /// A site (campus, building).  Staff availability and equipment location
    /// are scoped per site.
    pub struct SiteId(u16);
}

typed_id! {
    /// Index of a schedulable task (test or treatment) in the task arena.
    pub struct TaskId(u32);
}

typed_id! {
    /// Application-defined resource kind (e.g. 0 = nurse, 1 = blood analyzer).
    /// The kernel only compares kinds for equality.
    pub struct KindId(u16);
}

typed_id! {
    /// Application-defined kind of result a task produces (e.g. a blood
    /// panel, an X-ray image).  Attaching a result of another kind fails.
    pub struct ResultKind(u16);
}
