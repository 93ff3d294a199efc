//! Hero slideshow composition.

use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::image::PropertyImage;
use super::property::Property;
use crate::config::{HERO_MIN_SLIDES, HERO_PLACEHOLDER_IMAGE};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum SlideKind {
    Property,
    Default,
}

/// One slide of the landing-page carousel.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroSlide {
    pub id: String,
    pub title: String,
    pub subtitle: Option<String>,
    pub description: Option<String>,
    pub image: String,
    /// Display price such as `₹1,00,000`; null for unpriced slides.
    pub price: Option<String>,
    pub location: Option<String>,
    pub link: String,
    pub bullet_points: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_id: Option<i32>,
    #[serde(rename = "type")]
    pub kind: SlideKind,
}

impl HeroSlide {
    /// Slide for a featured listing. `images` is its image set in order.
    pub fn from_property(property: &Property, images: &[PropertyImage]) -> Self {
        let image = images
            .first()
            .map(|i| i.url.clone())
            .or_else(|| property.images.first().cloned())
            .unwrap_or_else(|| HERO_PLACEHOLDER_IMAGE.to_string());

        let price = if property.price.is_zero() {
            None
        } else {
            Some(format_inr(property.price))
        };

        let area = property
            .area
            .map(|a| a.normalize().to_string())
            .unwrap_or_else(|| "0".to_string());

        Self {
            id: format!("property-{}", property.id),
            title: property.title.clone(),
            subtitle: property.description.clone(),
            description: property.description.clone(),
            image,
            price,
            location: Some(property.location.clone()),
            link: format!("/property/{}", property.id),
            bullet_points: vec![
                format!("{} Bedrooms", property.bedrooms.unwrap_or(0)),
                format!("{} Bathrooms", property.bathrooms.unwrap_or(0)),
                format!("{} sq ft", area),
            ],
            property_id: Some(property.id),
            kind: SlideKind::Property,
        }
    }

    /// Static slides used to fill a sparse carousel.
    pub fn defaults() -> Vec<HeroSlide> {
        vec![
            HeroSlide {
                id: "default-1".to_string(),
                title: "Find Your Dream Home".to_string(),
                subtitle: Some("Discover amazing properties in prime locations".to_string()),
                description: Some(
                    "Discover amazing properties in prime locations with our expert team"
                        .to_string(),
                ),
                image: "https://images.unsplash.com/photo-1560518883-ce09059eeffa?ixlib=rb-4.0.3"
                    .to_string(),
                price: None,
                location: Some("Various Locations".to_string()),
                link: "/properties".to_string(),
                bullet_points: vec![
                    "Premium Locations".to_string(),
                    "Best Prices".to_string(),
                    "Quality Assured".to_string(),
                ],
                property_id: None,
                kind: SlideKind::Default,
            },
            HeroSlide {
                id: "default-2".to_string(),
                title: "Luxury Living Spaces".to_string(),
                subtitle: Some(
                    "Experience comfort and elegance in our premium properties".to_string(),
                ),
                description: Some(
                    "Experience comfort and elegance in our premium properties".to_string(),
                ),
                image: "https://images.unsplash.com/photo-1571055107559-3e67626fa8be?ixlib=rb-4.0.3"
                    .to_string(),
                price: None,
                location: Some("Premium Areas".to_string()),
                link: "/properties".to_string(),
                bullet_points: vec![
                    "Luxury Amenities".to_string(),
                    "Modern Design".to_string(),
                    "Prime Location".to_string(),
                ],
                property_id: None,
                kind: SlideKind::Default,
            },
        ]
    }

    /// Pad `slides` with default slides up to `HERO_MIN_SLIDES`, using at
    /// most the available defaults.
    pub fn pad(mut slides: Vec<HeroSlide>) -> Vec<HeroSlide> {
        if slides.len() < HERO_MIN_SLIDES {
            let missing = HERO_MIN_SLIDES - slides.len();
            slides.extend(Self::defaults().into_iter().take(missing));
        }
        slides
    }
}

/// Landing-page counters over publicly visible listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct HeroStats {
    pub total_properties: u64,
    pub featured_properties: u64,
    pub properties_for_sale: u64,
    pub properties_for_rent: u64,
}

/// Rupee amount with Indian digit grouping: `₹12,34,567.5`.
/// At most three fraction digits are kept, trailing zeros dropped.
pub fn format_inr(amount: Decimal) -> String {
    let rounded = amount
        .round_dp_with_strategy(3, RoundingStrategy::MidpointAwayFromZero)
        .normalize();
    let text = rounded.abs().to_string();
    let (int_part, frac_part) = match text.split_once('.') {
        Some((i, f)) => (i, Some(f)),
        None => (text.as_str(), None),
    };

    let mut grouped = group_indian(int_part);
    if let Some(frac) = frac_part {
        grouped.push('.');
        grouped.push_str(frac);
    }

    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{}₹{}", sign, grouped)
}

/// Last three digits, then groups of two: `1234567` → `12,34,567`.
fn group_indian(digits: &str) -> String {
    if digits.len() <= 3 {
        return digits.to_string();
    }
    let (head, tail) = digits.split_at(digits.len() - 3);
    let mut groups: Vec<&str> = Vec::new();
    let mut end = head.len();
    while end > 0 {
        let start = end.saturating_sub(2);
        groups.push(&head[start..end]);
        end = start;
    }
    groups.reverse();
    format!("{},{}", groups.join(","), tail)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::property::{
        Amenities, Furnishing, ListingStatus, ListingType, PropertyCategory,
    };
    use chrono::Utc;
    use std::str::FromStr;

    fn property(price: i64) -> Property {
        let now = Utc::now();
        Property {
            id: 42,
            user_id: 1,
            title: "Sea View Villa".to_string(),
            description: Some("Three storeys by the beach".to_string()),
            kind: ListingType::Buy,
            property_type: PropertyCategory::Villa,
            price: Decimal::from(price),
            location: "Goa".to_string(),
            address: None,
            city: None,
            state: None,
            zip_code: None,
            bedrooms: Some(4),
            bathrooms: None,
            kitchens: Some(1),
            area: Some(Decimal::from_str("2400.00").unwrap()),
            built_year: None,
            floor: None,
            total_floors: None,
            facing: None,
            parking: Some(0),
            balcony: Some(0),
            amenities: Amenities::default(),
            furnished: Furnishing::Unfurnished,
            features: vec![],
            images: vec![],
            contact: None,
            owner: None,
            status: ListingStatus::Available,
            is_approved: true,
            is_featured: true,
            views: 0,
            latitude: None,
            longitude: None,
            created_at: now,
            updated_at: now,
        }
    }

    #[test]
    fn test_indian_grouping() {
        assert_eq!(format_inr(Decimal::from(999)), "₹999");
        assert_eq!(format_inr(Decimal::from(100_000)), "₹1,00,000");
        assert_eq!(format_inr(Decimal::from(12_345_678)), "₹1,23,45,678");
        assert_eq!(format_inr(Decimal::from_str("1234567.50").unwrap()), "₹12,34,567.5");
        assert_eq!(format_inr(Decimal::from_str("1000.00").unwrap()), "₹1,000");
    }

    #[test]
    fn test_property_slide() {
        let slide = HeroSlide::from_property(&property(2_500_000), &[]);

        assert_eq!(slide.id, "property-42");
        assert_eq!(slide.kind, SlideKind::Property);
        assert_eq!(slide.price.as_deref(), Some("₹25,00,000"));
        assert_eq!(slide.image, HERO_PLACEHOLDER_IMAGE);
        assert_eq!(slide.link, "/property/42");
        assert_eq!(
            slide.bullet_points,
            vec!["4 Bedrooms", "0 Bathrooms", "2400 sq ft"]
        );
    }

    #[test]
    fn test_zero_price_has_no_display_price() {
        assert_eq!(HeroSlide::from_property(&property(0), &[]).price, None);
    }

    #[test]
    fn test_image_fallback_order() {
        let mut listing = property(10);
        listing.images = vec!["https://legacy.example/1.jpg".to_string()];
        assert_eq!(
            HeroSlide::from_property(&listing, &[]).image,
            "https://legacy.example/1.jpg"
        );

        let hosted = PropertyImage {
            id: 1,
            property_id: 42,
            url: "https://img.example/hosted.jpg".to_string(),
            public_id: None,
            caption: None,
            is_primary: true,
            order: 0,
            created_at: Utc::now(),
        };
        assert_eq!(
            HeroSlide::from_property(&listing, &[hosted]).image,
            "https://img.example/hosted.jpg"
        );
    }

    #[test]
    fn test_padding() {
        let empty = HeroSlide::pad(vec![]);
        assert_eq!(empty.len(), 2);
        assert!(empty.iter().all(|s| s.kind == SlideKind::Default));

        let one = HeroSlide::pad(vec![HeroSlide::from_property(&property(1), &[])]);
        assert_eq!(one.len(), 3);
        assert_eq!(one[1].id, "default-1");

        let three: Vec<_> = (0..3)
            .map(|_| HeroSlide::from_property(&property(1), &[]))
            .collect();
        assert_eq!(HeroSlide::pad(three).len(), 3);
    }
}
