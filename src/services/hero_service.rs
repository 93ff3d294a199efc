//! Hero service - Landing page slides, counters and featured curation.

use async_trait::async_trait;
use std::sync::Arc;

use crate::config::HERO_PROPERTY_SLIDES;
use crate::domain::{HeroSlide, HeroStats, ListingType, Property, PropertyCriteria};
use crate::errors::{AppResult, OptionExt};
use crate::infra::UnitOfWork;

#[async_trait]
pub trait HeroService: Send + Sync {
    /// Newest featured listings as slides, padded with defaults.
    async fn slides(&self) -> AppResult<Vec<HeroSlide>>;

    async fn stats(&self) -> AppResult<HeroStats>;

    async fn set_featured(&self, property_id: i32, is_featured: bool) -> AppResult<Property>;
}

pub struct HeroCurator<U: UnitOfWork> {
    uow: Arc<U>,
}

impl<U: UnitOfWork> HeroCurator<U> {
    pub fn new(uow: Arc<U>) -> Self {
        Self { uow }
    }
}

#[async_trait]
impl<U: UnitOfWork> HeroService for HeroCurator<U> {
    async fn slides(&self) -> AppResult<Vec<HeroSlide>> {
        let properties = self.uow.properties().featured(HERO_PROPERTY_SLIDES).await?;
        let ids = properties.iter().map(|p| p.id).collect();
        let images = self.uow.images().for_properties(ids).await?;

        let slides = properties
            .iter()
            .map(|p| {
                let own: Vec<_> = images
                    .iter()
                    .filter(|i| i.property_id == p.id)
                    .cloned()
                    .collect();
                HeroSlide::from_property(p, &own)
            })
            .collect();

        Ok(HeroSlide::pad(slides))
    }

    async fn stats(&self) -> AppResult<HeroStats> {
        let properties = self.uow.properties();
        let public = PropertyCriteria::public();

        let (total_properties, featured_properties, properties_for_sale, properties_for_rent) =
            tokio::try_join!(
                properties.count(public),
                properties.count(PropertyCriteria {
                    is_featured: Some(true),
                    ..public
                }),
                properties.count(PropertyCriteria {
                    kind: Some(ListingType::Buy),
                    ..public
                }),
                properties.count(PropertyCriteria {
                    kind: Some(ListingType::Rent),
                    ..public
                }),
            )?;

        Ok(HeroStats {
            total_properties,
            featured_properties,
            properties_for_sale,
            properties_for_rent,
        })
    }

    async fn set_featured(&self, property_id: i32, is_featured: bool) -> AppResult<Property> {
        let property = self
            .uow
            .properties()
            .set_featured(property_id, is_featured)
            .await?
            .ok_or_not_found("Property")?;

        tracing::info!(property_id, is_featured, "Hero curation changed");
        Ok(property)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::HERO_MIN_SLIDES;
    use crate::domain::SlideKind;
    use crate::errors::AppError;
    use crate::infra::{
        MockImageRepository, MockInquiryRepository, MockPropertyRepository, MockUserRepository,
    };
    use crate::services::test_support::{image, property, TestUnitOfWork};
    use rust_decimal::Decimal;

    fn curator(
        properties: MockPropertyRepository,
        images: MockImageRepository,
    ) -> HeroCurator<TestUnitOfWork> {
        HeroCurator::new(Arc::new(TestUnitOfWork::with(
            MockUserRepository::new(),
            properties,
            images,
            MockInquiryRepository::new(),
        )))
    }

    #[tokio::test]
    async fn test_single_featured_listing_is_padded() {
        let mut properties = MockPropertyRepository::new();
        properties
            .expect_featured()
            .withf(|limit| *limit == HERO_PROPERTY_SLIDES)
            .returning(|_| {
                let mut p = property(5, 1);
                p.price = Decimal::from(100_000);
                Ok(vec![p])
            });
        let mut images = MockImageRepository::new();
        images
            .expect_for_properties()
            .returning(|_| Ok(vec![image(2, 5, true), image(3, 5, false)]));

        let slides = curator(properties, images).slides().await.unwrap();

        assert_eq!(slides.len(), HERO_MIN_SLIDES);
        assert_eq!(slides[0].kind, SlideKind::Property);
        assert_eq!(slides[0].price.as_deref(), Some("₹1,00,000"));
        assert_eq!(slides[0].image, "https://img.example.com/2.jpg");
        assert_eq!(slides[1].kind, SlideKind::Default);
    }

    #[tokio::test]
    async fn test_stats_count_public_listings() {
        let mut properties = MockPropertyRepository::new();
        properties.expect_count().returning(|c| {
            assert!(c.is_approved == Some(true));
            Ok(match (c.kind, c.is_featured) {
                (Some(ListingType::Buy), _) => 4,
                (Some(ListingType::Rent), _) => 3,
                (_, Some(true)) => 2,
                _ => 8,
            })
        });

        let stats = curator(properties, MockImageRepository::new())
            .stats()
            .await
            .unwrap();

        assert_eq!(
            stats,
            HeroStats {
                total_properties: 8,
                featured_properties: 2,
                properties_for_sale: 4,
                properties_for_rent: 3,
            }
        );
    }

    #[tokio::test]
    async fn test_feature_missing_listing() {
        let mut properties = MockPropertyRepository::new();
        properties.expect_set_featured().returning(|_, _| Ok(None));

        let err = curator(properties, MockImageRepository::new())
            .set_featured(99, true)
            .await
            .unwrap_err();
        assert!(matches!(err, AppError::NotFound(_)));
    }
}
