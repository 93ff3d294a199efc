//! Property repository: listing queries, mutations and aggregates.

use async_trait::async_trait;
use chrono::Utc;
use sea_orm::sea_query::{Expr, Order};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, DatabaseConnection, EntityTrait, PaginatorTrait,
    QueryFilter, QueryOrder, QuerySelect, Select, Set,
};

use super::base::{contains_ci, fetch_page, updated};
use super::entities::property::{ActiveModel, Column, Entity as PropertyEntity};
use crate::domain::{
    Amenity, ListingQuery, ListingStatus, ListingType, Property, PropertyCriteria, PropertyDraft,
    PropertyFilter, SortField, SortOrder, SortSpec, StatusPatch, Visibility,
};
use crate::errors::AppResult;

#[cfg(any(test, feature = "test-utils"))]
use mockall::automock;

/// Property repository trait for dependency injection.
#[cfg_attr(any(test, feature = "test-utils"), automock)]
#[async_trait]
pub trait PropertyRepository: Send + Sync {
    /// One page of listings matching `query`, with the total match count.
    async fn list(&self, query: ListingQuery) -> AppResult<(Vec<Property>, u64)>;

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Property>>;

    /// Approved and available only.
    async fn find_public(&self, id: i32) -> AppResult<Option<Property>>;

    /// Atomically add one view to a public listing. False if none matched.
    async fn increment_views(&self, id: i32) -> AppResult<bool>;

    /// Newest featured public listings.
    async fn featured(&self, limit: u64) -> AppResult<Vec<Property>>;

    async fn create(&self, owner_id: i32, draft: PropertyDraft) -> AppResult<Property>;

    /// Field-level patch; `None` if the row is gone.
    async fn update(&self, id: i32, draft: PropertyDraft) -> AppResult<Option<Property>>;

    async fn update_status(&self, id: i32, patch: StatusPatch) -> AppResult<Option<Property>>;

    async fn set_featured(&self, id: i32, is_featured: bool) -> AppResult<Option<Property>>;

    /// Hard delete; images and inquiries cascade.
    async fn delete(&self, id: i32) -> AppResult<bool>;

    /// Every listing of the given owners, newest first.
    async fn list_by_owners(&self, owner_ids: Vec<i32>) -> AppResult<Vec<Property>>;

    async fn count(&self, criteria: PropertyCriteria) -> AppResult<u64>;

    async fn count_by_status(&self, owner: Option<i32>) -> AppResult<Vec<(ListingStatus, u64)>>;

    async fn count_by_type(&self) -> AppResult<Vec<(ListingType, u64)>>;

    async fn total_views(&self, owner: Option<i32>) -> AppResult<i64>;
}

/// Concrete implementation of PropertyRepository
pub struct PropertyStore {
    db: DatabaseConnection,
}

impl PropertyStore {
    pub fn new(db: DatabaseConnection) -> Self {
        Self { db }
    }
}

fn public_condition() -> Condition {
    Condition::all()
        .add(Column::IsApproved.eq(true))
        .add(Column::Status.eq(ListingStatus::Available.as_str()))
}

fn visibility_condition(visibility: Visibility) -> Condition {
    match visibility {
        Visibility::Public => public_condition(),
        Visibility::OwnedBy(owner) => Condition::all().add(Column::UserId.eq(owner)),
        Visibility::All {
            status,
            is_approved,
        } => Condition::all()
            .add_option(status.map(|s| Column::Status.eq(s.as_str())))
            .add_option(is_approved.map(|a| Column::IsApproved.eq(a))),
    }
}

fn filter_condition(filter: &PropertyFilter) -> Condition {
    let mut condition = Condition::all()
        .add_option(filter.kind.map(|k| Column::Kind.eq(k.as_str())))
        .add_option(filter.property_type.map(|t| Column::PropertyType.eq(t.as_str())))
        .add_option(filter.min_price.map(|p| Column::Price.gte(p)))
        .add_option(filter.max_price.map(|p| Column::Price.lte(p)))
        .add_option(filter.bedrooms.map(|n| Column::Bedrooms.eq(n)))
        .add_option(filter.bathrooms.map(|n| Column::Bathrooms.eq(n)));

    if let Some(location) = filter.location.as_deref() {
        condition = condition.add(
            Condition::any()
                .add(contains_ci(Column::Location, location))
                .add(contains_ci(Column::City, location))
                .add(contains_ci(Column::State, location)),
        );
    }
    if let Some(search) = filter.search.as_deref() {
        condition = condition.add(
            Condition::any()
                .add(contains_ci(Column::Title, search))
                .add(contains_ci(Column::Description, search))
                .add(contains_ci(Column::Location, search)),
        );
    }
    condition
}

fn criteria_condition(criteria: PropertyCriteria) -> Condition {
    Condition::all()
        .add_option(criteria.owner.map(|o| Column::UserId.eq(o)))
        .add_option(criteria.kind.map(|k| Column::Kind.eq(k.as_str())))
        .add_option(criteria.status.map(|s| Column::Status.eq(s.as_str())))
        .add_option(criteria.is_approved.map(|a| Column::IsApproved.eq(a)))
        .add_option(criteria.is_featured.map(|f| Column::IsFeatured.eq(f)))
}

fn sort_column(field: SortField) -> Column {
    match field {
        SortField::Id => Column::Id,
        SortField::Title => Column::Title,
        SortField::Type => Column::Kind,
        SortField::PropertyType => Column::PropertyType,
        SortField::Price => Column::Price,
        SortField::Location => Column::Location,
        SortField::City => Column::City,
        SortField::State => Column::State,
        SortField::Bedrooms => Column::Bedrooms,
        SortField::Bathrooms => Column::Bathrooms,
        SortField::Kitchens => Column::Kitchens,
        SortField::Area => Column::Area,
        SortField::BuiltYear => Column::BuiltYear,
        SortField::Floor => Column::Floor,
        SortField::TotalFloors => Column::TotalFloors,
        SortField::Parking => Column::Parking,
        SortField::Balcony => Column::Balcony,
        SortField::Status => Column::Status,
        SortField::IsApproved => Column::IsApproved,
        SortField::IsFeatured => Column::IsFeatured,
        SortField::Views => Column::Views,
        SortField::CreatedAt => Column::CreatedAt,
        SortField::UpdatedAt => Column::UpdatedAt,
    }
}

/// Order by the requested column, then by id so pages are stable.
fn sorted(select: Select<PropertyEntity>, sort: SortSpec) -> Select<PropertyEntity> {
    let order = match sort.order {
        SortOrder::Asc => Order::Asc,
        SortOrder::Desc => Order::Desc,
    };
    let select = select.order_by(sort_column(sort.field), order.clone());
    if sort.field == SortField::Id {
        select
    } else {
        select.order_by(Column::Id, order)
    }
}

fn listing_select(query: &ListingQuery) -> Select<PropertyEntity> {
    let select = PropertyEntity::find()
        .filter(visibility_condition(query.visibility))
        .filter(filter_condition(&query.filter));
    sorted(select, query.sort)
}

/// Copy every supplied draft field onto `active`.
fn apply_draft(active: &mut ActiveModel, draft: PropertyDraft) {
    macro_rules! supplied {
        ($($field:ident),+ $(,)?) => {
            $(if let Some(value) = draft.$field {
                active.$field = Set(value.into());
            })+
        };
    }

    supplied!(
        title,
        description,
        price,
        location,
        address,
        city,
        state,
        zip_code,
        bedrooms,
        bathrooms,
        kitchens,
        area,
        built_year,
        floor,
        total_floors,
        parking,
        balcony,
        contact,
        owner,
        is_approved,
        is_featured,
        latitude,
        longitude,
    );

    if let Some(kind) = draft.kind {
        active.kind = Set(kind.as_str().to_string());
    }
    if let Some(category) = draft.property_type {
        active.property_type = Set(category.as_str().to_string());
    }
    if let Some(facing) = draft.facing {
        active.facing = Set(Some(facing.as_str().to_string()));
    }
    if let Some(furnished) = draft.furnished {
        active.furnished = Set(furnished.as_str().to_string());
    }
    if let Some(status) = draft.status {
        active.status = Set(status.as_str().to_string());
    }
    if let Some(features) = draft.features {
        active.features = Set(serde_json::json!(features));
    }
    if let Some(images) = draft.images {
        active.images = Set(serde_json::json!(images));
    }

    for (amenity, value) in draft.amenities {
        let column = match amenity {
            Amenity::Garden => &mut active.garden,
            Amenity::SwimmingPool => &mut active.swimming_pool,
            Amenity::Gym => &mut active.gym,
            Amenity::Security => &mut active.security,
            Amenity::Wifi => &mut active.wifi,
            Amenity::Tv => &mut active.tv,
            Amenity::Ac => &mut active.ac,
            Amenity::Heating => &mut active.heating,
            Amenity::Lift => &mut active.lift,
            Amenity::PowerBackup => &mut active.power_backup,
            Amenity::WaterSupply => &mut active.water_supply,
            Amenity::GasConnection => &mut active.gas_connection,
        };
        *column = Set(value);
    }
}

#[async_trait]
impl PropertyRepository for PropertyStore {
    async fn list(&self, query: ListingQuery) -> AppResult<(Vec<Property>, u64)> {
        let (models, total) = fetch_page(&self.db, listing_select(&query), query.page).await?;
        Ok((models.into_iter().map(Property::from).collect(), total))
    }

    async fn find_by_id(&self, id: i32) -> AppResult<Option<Property>> {
        let model = PropertyEntity::find_by_id(id).one(&self.db).await?;
        Ok(model.map(Property::from))
    }

    async fn find_public(&self, id: i32) -> AppResult<Option<Property>> {
        let model = PropertyEntity::find_by_id(id)
            .filter(public_condition())
            .one(&self.db)
            .await?;
        Ok(model.map(Property::from))
    }

    async fn increment_views(&self, id: i32) -> AppResult<bool> {
        let result = PropertyEntity::update_many()
            .col_expr(Column::Views, Expr::col(Column::Views).add(1))
            .filter(Column::Id.eq(id))
            .filter(public_condition())
            .exec(&self.db)
            .await?;
        Ok(result.rows_affected > 0)
    }

    async fn featured(&self, limit: u64) -> AppResult<Vec<Property>> {
        let models = PropertyEntity::find()
            .filter(public_condition())
            .filter(Column::IsFeatured.eq(true))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .limit(limit)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Property::from).collect())
    }

    async fn create(&self, owner_id: i32, draft: PropertyDraft) -> AppResult<Property> {
        let now = Utc::now();
        let mut active = ActiveModel {
            user_id: Set(owner_id),
            created_at: Set(now),
            updated_at: Set(now),
            ..Default::default()
        };
        apply_draft(&mut active, draft);

        let model = active.insert(&self.db).await?;
        tracing::debug!(property_id = model.id, owner_id, "Property created");
        Ok(Property::from(model))
    }

    async fn update(&self, id: i32, draft: PropertyDraft) -> AppResult<Option<Property>> {
        let mut active = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        apply_draft(&mut active, draft);

        Ok(updated(active.update(&self.db).await)?.map(Property::from))
    }

    async fn update_status(&self, id: i32, patch: StatusPatch) -> AppResult<Option<Property>> {
        let mut active = ActiveModel {
            id: Set(id),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        if let Some(is_approved) = patch.is_approved {
            active.is_approved = Set(is_approved);
        }
        if let Some(status) = patch.status {
            active.status = Set(status.as_str().to_string());
        }

        Ok(updated(active.update(&self.db).await)?.map(Property::from))
    }

    async fn set_featured(&self, id: i32, is_featured: bool) -> AppResult<Option<Property>> {
        let active = ActiveModel {
            id: Set(id),
            is_featured: Set(is_featured),
            updated_at: Set(Utc::now()),
            ..Default::default()
        };
        Ok(updated(active.update(&self.db).await)?.map(Property::from))
    }

    async fn delete(&self, id: i32) -> AppResult<bool> {
        let result = PropertyEntity::delete_by_id(id).exec(&self.db).await?;
        Ok(result.rows_affected > 0)
    }

    async fn list_by_owners(&self, owner_ids: Vec<i32>) -> AppResult<Vec<Property>> {
        if owner_ids.is_empty() {
            return Ok(Vec::new());
        }
        let models = PropertyEntity::find()
            .filter(Column::UserId.is_in(owner_ids))
            .order_by_desc(Column::CreatedAt)
            .order_by_desc(Column::Id)
            .all(&self.db)
            .await?;
        Ok(models.into_iter().map(Property::from).collect())
    }

    async fn count(&self, criteria: PropertyCriteria) -> AppResult<u64> {
        Ok(PropertyEntity::find()
            .filter(criteria_condition(criteria))
            .count(&self.db)
            .await?)
    }

    async fn count_by_status(&self, owner: Option<i32>) -> AppResult<Vec<(ListingStatus, u64)>> {
        let rows: Vec<(String, i64)> = PropertyEntity::find()
            .select_only()
            .column(Column::Status)
            .column_as(Column::Id.count(), "count")
            .filter(Condition::all().add_option(owner.map(|o| Column::UserId.eq(o))))
            .group_by(Column::Status)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(status, count)| Some((status.parse().ok()?, count.max(0) as u64)))
            .collect())
    }

    async fn count_by_type(&self) -> AppResult<Vec<(ListingType, u64)>> {
        let rows: Vec<(String, i64)> = PropertyEntity::find()
            .select_only()
            .column(Column::Kind)
            .column_as(Column::Id.count(), "count")
            .group_by(Column::Kind)
            .into_tuple()
            .all(&self.db)
            .await?;

        Ok(rows
            .into_iter()
            .filter_map(|(kind, count)| Some((kind.parse().ok()?, count.max(0) as u64)))
            .collect())
    }

    async fn total_views(&self, owner: Option<i32>) -> AppResult<i64> {
        let total: Option<Option<i64>> = PropertyEntity::find()
            .select_only()
            .column_as(Column::Views.sum(), "total")
            .filter(Condition::all().add_option(owner.map(|o| Column::UserId.eq(o))))
            .into_tuple()
            .one(&self.db)
            .await?;
        Ok(total.flatten().unwrap_or(0))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::types::PageRequest;
    use rust_decimal::Decimal;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(query: &ListingQuery) -> String {
        listing_select(query).build(DbBackend::Postgres).to_string()
    }

    /// The predicate between `WHERE` and `ORDER BY`.
    fn where_clause(sql: &str) -> &str {
        sql.split_once(" WHERE ")
            .map(|(_, rest)| rest.split(" ORDER BY ").next().unwrap_or(rest))
            .unwrap_or("")
    }

    fn public_query(filter: PropertyFilter) -> ListingQuery {
        ListingQuery {
            visibility: Visibility::Public,
            filter,
            sort: SortSpec::default(),
            page: PageRequest::default(),
        }
    }

    #[test]
    fn test_public_listing_always_restricted() {
        let sql = sql(&public_query(PropertyFilter::default()));

        assert!(sql.contains(r#""properties"."is_approved" = TRUE"#), "{}", sql);
        assert!(sql.contains(r#""properties"."status" = 'available'"#), "{}", sql);
        assert!(
            sql.contains(r#"ORDER BY "properties"."created_at" DESC, "properties"."id" DESC"#),
            "{}",
            sql
        );
    }

    #[test]
    fn test_price_range_and_type() {
        let sql = sql(&public_query(PropertyFilter {
            kind: Some(ListingType::Buy),
            min_price: Some(Decimal::from(1_000_000)),
            max_price: Some(Decimal::from(2_000_000)),
            ..Default::default()
        }));

        assert!(sql.contains(r#""properties"."type" = 'buy'"#), "{}", sql);
        assert!(sql.contains(r#""properties"."price" >= 1000000"#), "{}", sql);
        assert!(sql.contains(r#""properties"."price" <= 2000000"#), "{}", sql);
    }

    #[test]
    fn test_location_matches_any_of_three_columns() {
        let sql = sql(&public_query(PropertyFilter {
            location: Some("Pune".to_string()),
            ..Default::default()
        }));

        assert!(sql.contains(r#"LOWER("location") LIKE '%pune%'"#), "{}", sql);
        assert!(sql.contains(r#"LOWER("city") LIKE '%pune%'"#), "{}", sql);
        assert!(sql.contains(r#"LOWER("state") LIKE '%pune%'"#), "{}", sql);
    }

    #[test]
    fn test_owner_scope_ignores_approval() {
        let sql = sql(&ListingQuery {
            visibility: Visibility::OwnedBy(7),
            ..public_query(PropertyFilter::default())
        });

        assert!(sql.contains(r#""properties"."user_id" = 7"#), "{}", sql);
        assert!(!where_clause(&sql).contains("is_approved"), "{}", sql);
    }

    #[test]
    fn test_admin_scope_with_optional_filters() {
        let unfiltered = sql(&ListingQuery {
            visibility: Visibility::All {
                status: None,
                is_approved: None,
            },
            ..public_query(PropertyFilter::default())
        });
        assert!(
            matches!(where_clause(&unfiltered), "" | "TRUE"),
            "{}",
            unfiltered
        );

        let pending = sql(&ListingQuery {
            visibility: Visibility::All {
                status: None,
                is_approved: Some(false),
            },
            ..public_query(PropertyFilter::default())
        });
        assert!(pending.contains(r#""properties"."is_approved" = FALSE"#), "{}", pending);
    }

    #[test]
    fn test_sort_by_api_column_name() {
        let sql = sql(&ListingQuery {
            sort: SortSpec {
                field: SortField::Type,
                order: SortOrder::Asc,
            },
            ..public_query(PropertyFilter::default())
        });

        assert!(
            sql.contains(r#"ORDER BY "properties"."type" ASC, "properties"."id" ASC"#),
            "{}",
            sql
        );
    }

    #[test]
    fn test_draft_sets_only_supplied_columns() {
        let mut active = <ActiveModel as Default>::default();
        apply_draft(
            &mut active,
            PropertyDraft {
                title: Some("Test Villa".to_string()),
                amenities: vec![(Amenity::Gym, true)],
                features: Some(vec!["Pool".to_string()]),
                ..Default::default()
            },
        );

        assert_eq!(active.title, Set("Test Villa".to_string()));
        assert_eq!(active.gym, Set(true));
        assert_eq!(active.features, Set(serde_json::json!(["Pool"])));
        assert!(active.price.is_not_set());
        assert!(active.wifi.is_not_set());
        assert!(active.is_approved.is_not_set());
    }
}
