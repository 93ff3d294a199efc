//! Domain layer - Core business entities and logic
//!
//! Entities, value objects and the pure rules over them. Nothing here
//! touches the database or the network.

/// Declares a closed set of lowercase string values stored as text columns.
macro_rules! string_enum {
    ($(#[$meta:meta])* $name:ident { $($variant:ident => $text:literal),+ $(,)? }) => {
        $(#[$meta])*
        #[derive(
            Debug, Clone, Copy, PartialEq, Eq, Hash,
            serde::Serialize, serde::Deserialize, utoipa::ToSchema,
        )]
        pub enum $name {
            $(#[serde(rename = $text)] $variant,)+
        }

        impl $name {
            pub const ALL: &'static [$name] = &[$($name::$variant),+];

            pub fn as_str(&self) -> &'static str {
                match self {
                    $($name::$variant => $text,)+
                }
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl std::str::FromStr for $name {
            type Err = $crate::domain::UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                match s {
                    $($text => Ok($name::$variant),)+
                    _ => Err($crate::domain::UnknownVariant {
                        kind: stringify!($name),
                        value: s.to_string(),
                    }),
                }
            }
        }
    };
}

pub mod actor;
pub mod hero;
pub mod image;
pub mod inquiry;
pub mod normalize;
pub mod password;
pub mod property;
pub mod user;

pub use actor::Actor;
pub use hero::{format_inr, HeroSlide, HeroStats, SlideKind};
pub use image::{NewPropertyImage, PropertyImage, StoredImage};
pub use inquiry::{Inquiry, InquiryFilter, InquiryStatus, InquiryType, InquiryUpdate, NewInquiry};
pub use password::Password;
pub use property::{
    Amenities, Amenity, Facing, Furnishing, ListingQuery, ListingStatus, ListingType, OwnerSummary,
    Property, PropertyCategory, PropertyCriteria, PropertyDraft, PropertyFilter, PropertyResponse,
    SortField, SortOrder, SortSpec, StatusPatch, Visibility,
};
pub use user::{
    normalize_email, NewUser, OwnedProperty, RegisterUser, UpdateProfile, User, UserFilter,
    UserResponse, UserRole, UserWithProperties,
};

/// A text value outside an enum's accepted set.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("invalid {kind}: {value}")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}
