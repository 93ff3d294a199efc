//! Search and filtering over an already fetched listing set.
//!
//! These run locally and may disagree with the server's own filtering; the
//! server stays authoritative for anything paginated.

use rust_decimal::Decimal;

use crate::domain::{ListingType, PropertyResponse};

/// Criteria of [`filter_properties`]. Unset criteria match everything.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub kind: Option<ListingType>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub min_area: Option<Decimal>,
    pub max_area: Option<Decimal>,
    /// Case-insensitive substring of the location.
    pub location: Option<String>,
}

impl PropertyFilter {
    pub fn is_empty(&self) -> bool {
        self == &Self::default()
    }

    pub fn matches(&self, listing: &PropertyResponse) -> bool {
        let property = &listing.property;
        // Listings without an area compare as zero.
        let area = property.area.unwrap_or_default();

        if self.kind.is_some_and(|kind| property.kind != kind) {
            return false;
        }
        if self.min_price.is_some_and(|min| property.price < min) {
            return false;
        }
        if self.max_price.is_some_and(|max| property.price > max) {
            return false;
        }
        if self.bedrooms.is_some_and(|n| property.bedrooms != Some(n)) {
            return false;
        }
        if self.bathrooms.is_some_and(|n| property.bathrooms != Some(n)) {
            return false;
        }
        if self.min_area.is_some_and(|min| area < min) {
            return false;
        }
        if self.max_area.is_some_and(|max| area > max) {
            return false;
        }
        if let Some(location) = self.location.as_deref().filter(|l| !l.is_empty()) {
            if !contains_ignore_case(&property.location, location) {
                return false;
            }
        }
        true
    }
}

fn contains_ignore_case(haystack: &str, needle: &str) -> bool {
    haystack.to_lowercase().contains(&needle.to_lowercase())
}

/// Listings whose title, description, location, city or address contain
/// `query`, ignoring case. A blank query returns every listing.
pub fn search_properties(listings: &[PropertyResponse], query: &str) -> Vec<PropertyResponse> {
    let query = query.trim();
    if query.is_empty() {
        return listings.to_vec();
    }

    listings
        .iter()
        .filter(|listing| {
            let p = &listing.property;
            [
                Some(p.title.as_str()),
                p.description.as_deref(),
                Some(p.location.as_str()),
                p.city.as_deref(),
                p.address.as_deref(),
            ]
            .into_iter()
            .flatten()
            .any(|text| contains_ignore_case(text, query))
        })
        .cloned()
        .collect()
}

pub fn filter_properties(
    listings: &[PropertyResponse],
    filter: &PropertyFilter,
) -> Vec<PropertyResponse> {
    if filter.is_empty() {
        return listings.to_vec();
    }
    listings
        .iter()
        .filter(|listing| filter.matches(listing))
        .cloned()
        .collect()
}
