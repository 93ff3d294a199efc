//! Client side of the listing API.
//!
//! [`ApiClient`] speaks HTTP; [`PropertyStore`] keeps a read-through copy of
//! the public listing data on top of any [`PropertyApi`].

mod api;
mod error;
mod filter;
mod store;

pub use api::{ApiClient, PropertyApi, PropertyQuery};
pub use error::{ClientError, ClientResult};
pub use filter::{filter_properties, search_properties, PropertyFilter};
pub use store::PropertyStore;

#[cfg(any(test, feature = "test-utils"))]
pub use api::MockPropertyApi;
