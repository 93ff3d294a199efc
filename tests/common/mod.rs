//! Fixtures shared by the integration tests.

use chrono::Utc;
use rust_decimal::Decimal;

use estate_api::domain::{
    Amenities, Furnishing, ListingStatus, ListingType, Property, PropertyCategory,
};

/// An approved, available two-bedroom flat in Pune owned by user 7.
pub fn sample_property(id: i32, title: &str) -> Property {
    let now = Utc::now();
    Property {
        id,
        user_id: 7,
        title: title.to_string(),
        description: None,
        kind: ListingType::Buy,
        property_type: PropertyCategory::Apartment,
        price: Decimal::new(4_500_000, 0),
        location: "Baner".to_string(),
        address: None,
        city: Some("Pune".to_string()),
        state: None,
        zip_code: None,
        bedrooms: Some(2),
        bathrooms: Some(2),
        kitchens: None,
        area: None,
        built_year: None,
        floor: None,
        total_floors: None,
        facing: None,
        parking: None,
        balcony: None,
        amenities: Amenities::default(),
        furnished: Furnishing::Unfurnished,
        features: Vec::new(),
        images: Vec::new(),
        contact: None,
        owner: None,
        status: ListingStatus::Available,
        is_approved: true,
        is_featured: false,
        views: 0,
        latitude: None,
        longitude: None,
        created_at: now,
        updated_at: now,
    }
}
