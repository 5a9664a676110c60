//! Newtype IDs for type-safe entity references.
//!
//! Use the `define_id!` macro to create type-safe ID wrappers that prevent
//! accidentally mixing IDs from different entity types.

/// Macro to define a type-safe ID wrapper.
///
/// Creates a newtype wrapper around `i32` with:
/// - `Serialize`/`Deserialize` with `#[serde(transparent)]`
/// - `Debug`, `Clone`, `Copy`, `PartialEq`, `Eq`, `Hash`, `Default`
/// - Conversion methods: `new()`, `as_i32()`, `is_zero()`
/// - `From<i32>` and `Into<i32>` implementations
///
/// The API uses `0` as "not assigned yet", so `Default` yields the zero ID.
///
/// # Example
///
/// ```rust
/// # use recipe_book_core::define_id;
/// define_id!(ShelfId);
/// define_id!(PantryId);
///
/// let shelf_id = ShelfId::new(1);
/// let pantry_id = PantryId::new(1);
///
/// // These are different types, so this won't compile:
/// // let _: ShelfId = pantry_id;
/// ```
#[macro_export]
macro_rules! define_id {
    ($name:ident) => {
        #[derive(
            Debug,
            Clone,
            Copy,
            Default,
            PartialEq,
            Eq,
            Hash,
            PartialOrd,
            Ord,
            ::serde::Serialize,
            ::serde::Deserialize
        )]
        #[serde(transparent)]
        pub struct $name(i32);

        impl $name {
            /// Create a new ID from an i32 value.
            #[must_use]
            pub const fn new(id: i32) -> Self {
                Self(id)
            }

            /// Get the underlying i32 value.
            #[must_use]
            pub const fn as_i32(&self) -> i32 {
                self.0
            }

            /// Whether this is the unassigned (zero) ID.
            #[must_use]
            pub const fn is_zero(&self) -> bool {
                self.0 == 0
            }
        }

        impl ::core::fmt::Display for $name {
            fn fmt(&self, f: &mut ::core::fmt::Formatter<'_>) -> ::core::fmt::Result {
                write!(f, "{}", self.0)
            }
        }

        impl ::core::str::FromStr for $name {
            type Err = ::core::num::ParseIntError;

            fn from_str(s: &str) -> ::core::result::Result<Self, Self::Err> {
                s.trim().parse::<i32>().map(Self)
            }
        }

        impl From<i32> for $name {
            fn from(id: i32) -> Self {
                Self(id)
            }
        }

        impl From<$name> for i32 {
            fn from(id: $name) -> Self {
                id.0
            }
        }
    };
}

define_id!(RecipeId);
define_id!(UserId);
define_id!(CategoryId);

impl RecipeId {
    /// ID carried by a recipe the server has not stored yet.
    pub const DRAFT: Self = Self::new(0);
}

impl UserId {
    /// ID of the anonymous (not logged in) user.
    pub const GUEST: Self = Self::new(0);
}

#[cfg(test)]
#[allow(clippy::unwrap_used)]
mod tests {
    use super::*;

    #[test]
    fn test_zero_ids() {
        assert!(RecipeId::DRAFT.is_zero());
        assert!(UserId::GUEST.is_zero());
        assert_eq!(RecipeId::default(), RecipeId::DRAFT);
        assert!(!CategoryId::new(3).is_zero());
    }

    #[test]
    fn test_serde_is_transparent() {
        let json = serde_json::to_string(&RecipeId::new(42)).unwrap();
        assert_eq!(json, "42");
        let id: UserId = serde_json::from_str("7").unwrap();
        assert_eq!(id, UserId::new(7));
    }

    #[test]
    fn test_from_str() {
        let id: RecipeId = " 12 ".parse().unwrap();
        assert_eq!(id.as_i32(), 12);
        assert!("twelve".parse::<RecipeId>().is_err());
    }
}
