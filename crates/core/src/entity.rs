//! Entity trait: identity + continuity across state changes.

use uuid::Uuid;

/// Identity value of an entity.
///
/// Identities are totally ordered and hashable so they can key any map
/// implementation. Each type decides which of its values count as "unset":
/// such values are rejected by every repository operation before storage is
/// touched.
pub trait Identity:
    Clone + Eq + Ord + core::hash::Hash + core::fmt::Debug + Send + Sync + 'static
{
    /// Returns `false` for the unset/default value of the identity type.
    fn is_valid(&self) -> bool {
        true
    }
}

macro_rules! impl_integer_identity {
    ($($t:ty),* $(,)?) => {
        $(
            impl Identity for $t {
                /// Zero is the default value and never identifies an entity.
                fn is_valid(&self) -> bool {
                    *self != 0
                }
            }
        )*
    };
}

impl_integer_identity!(u8, u16, u32, u64, u128, usize, i8, i16, i32, i64, i128, isize);

impl Identity for String {
    fn is_valid(&self) -> bool {
        !self.is_empty()
    }
}

impl Identity for Uuid {
    fn is_valid(&self) -> bool {
        !self.is_nil()
    }
}

/// Entity marker + minimal interface.
///
/// Repositories only rely on the identity; every other attribute is opaque.
pub trait Entity {
    /// Strongly-typed entity identifier.
    type Id: Identity;

    /// Returns the entity identifier.
    fn id(&self) -> &Self::Id;
}
