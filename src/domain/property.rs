//! Property listing entity, its enumerations and the typed mutation draft.

use chrono::{DateTime, Datelike, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use validator::Validate;

use super::image::PropertyImage;
use crate::config::{
    AREA_LIMIT, MAX_KITCHEN_COUNT, MAX_ROOM_COUNT, MIN_BUILT_YEAR, PRICE_LIMIT,
};
use crate::errors::{field_errors, AppError, AppResult, FieldError};

string_enum! {
    /// Transaction a listing is offered for.
    ListingType {
        Buy => "buy",
        Rent => "rent",
        Sell => "sell",
    }
}

string_enum! {
    /// Kind of building or land.
    PropertyCategory {
        Apartment => "apartment",
        House => "house",
        Villa => "villa",
        Plot => "plot",
        Commercial => "commercial",
        Office => "office",
    }
}

string_enum! {
    /// Listing availability.
    ListingStatus {
        Available => "available",
        Sold => "sold",
        Rented => "rented",
        Pending => "pending",
        Inactive => "inactive",
    }
}

string_enum! {
    Facing {
        North => "north",
        South => "south",
        East => "east",
        West => "west",
        Northeast => "northeast",
        Northwest => "northwest",
        Southeast => "southeast",
        Southwest => "southwest",
    }
}

string_enum! {
    Furnishing {
        Unfurnished => "unfurnished",
        SemiFurnished => "semi-furnished",
        FullyFurnished => "fully-furnished",
    }
}

string_enum! {
    /// Boolean amenity columns, named as they appear in payloads.
    Amenity {
        Garden => "garden",
        SwimmingPool => "swimmingPool",
        Gym => "gym",
        Security => "security",
        Wifi => "wifi",
        Tv => "tv",
        Ac => "ac",
        Heating => "heating",
        Lift => "lift",
        PowerBackup => "powerBackup",
        WaterSupply => "waterSupply",
        GasConnection => "gasConnection",
    }
}

string_enum! {
    /// Columns a listing may be sorted by.
    SortField {
        Id => "id",
        Title => "title",
        Type => "type",
        PropertyType => "propertyType",
        Price => "price",
        Location => "location",
        City => "city",
        State => "state",
        Bedrooms => "bedrooms",
        Bathrooms => "bathrooms",
        Kitchens => "kitchens",
        Area => "area",
        BuiltYear => "builtYear",
        Floor => "floor",
        TotalFloors => "totalFloors",
        Parking => "parking",
        Balcony => "balcony",
        Status => "status",
        IsApproved => "isApproved",
        IsFeatured => "isFeatured",
        Views => "views",
        CreatedAt => "createdAt",
        UpdatedAt => "updatedAt",
    }
}

/// The twelve amenity flags of a listing.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Amenities {
    pub garden: bool,
    pub swimming_pool: bool,
    pub gym: bool,
    pub security: bool,
    pub wifi: bool,
    pub tv: bool,
    pub ac: bool,
    pub heating: bool,
    pub lift: bool,
    pub power_backup: bool,
    pub water_supply: bool,
    pub gas_connection: bool,
}

impl Amenities {
    pub fn get(&self, amenity: Amenity) -> bool {
        *self.slot(amenity)
    }

    pub fn set(&mut self, amenity: Amenity, value: bool) {
        *self.slot_mut(amenity) = value;
    }

    fn slot(&self, amenity: Amenity) -> &bool {
        match amenity {
            Amenity::Garden => &self.garden,
            Amenity::SwimmingPool => &self.swimming_pool,
            Amenity::Gym => &self.gym,
            Amenity::Security => &self.security,
            Amenity::Wifi => &self.wifi,
            Amenity::Tv => &self.tv,
            Amenity::Ac => &self.ac,
            Amenity::Heating => &self.heating,
            Amenity::Lift => &self.lift,
            Amenity::PowerBackup => &self.power_backup,
            Amenity::WaterSupply => &self.water_supply,
            Amenity::GasConnection => &self.gas_connection,
        }
    }

    fn slot_mut(&mut self, amenity: Amenity) -> &mut bool {
        match amenity {
            Amenity::Garden => &mut self.garden,
            Amenity::SwimmingPool => &mut self.swimming_pool,
            Amenity::Gym => &mut self.gym,
            Amenity::Security => &mut self.security,
            Amenity::Wifi => &mut self.wifi,
            Amenity::Tv => &mut self.tv,
            Amenity::Ac => &mut self.ac,
            Amenity::Heating => &mut self.heating,
            Amenity::Lift => &mut self.lift,
            Amenity::PowerBackup => &mut self.power_backup,
            Amenity::WaterSupply => &mut self.water_supply,
            Amenity::GasConnection => &mut self.gas_connection,
        }
    }
}

/// Property domain entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Property {
    pub id: i32,
    pub user_id: i32,
    pub title: String,
    pub description: Option<String>,
    #[serde(rename = "type")]
    pub kind: ListingType,
    pub property_type: PropertyCategory,
    #[schema(value_type = String, example = "100000.00")]
    pub price: Decimal,
    pub location: String,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub kitchens: Option<i32>,
    #[schema(value_type = Option<String>)]
    pub area: Option<Decimal>,
    pub built_year: Option<i32>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub facing: Option<Facing>,
    pub parking: Option<i32>,
    pub balcony: Option<i32>,
    #[serde(flatten)]
    pub amenities: Amenities,
    pub furnished: Furnishing,
    pub features: Vec<String>,
    /// Legacy inline image URLs, predating the image table.
    pub images: Vec<String>,
    pub contact: Option<String>,
    pub owner: Option<String>,
    pub status: ListingStatus,
    pub is_approved: bool,
    pub is_featured: bool,
    pub views: i32,
    #[schema(value_type = Option<String>)]
    pub latitude: Option<Decimal>,
    #[schema(value_type = Option<String>)]
    pub longitude: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// The owner fields exposed alongside a listing.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct OwnerSummary {
    pub id: i32,
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
}

/// A listing with its image set and owner projection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PropertyResponse {
    #[serde(flatten)]
    pub property: Property,
    #[serde(default)]
    pub property_images: Vec<PropertyImage>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub user: Option<OwnerSummary>,
}

impl PropertyResponse {
    pub fn new(property: Property, images: Vec<PropertyImage>, user: Option<OwnerSummary>) -> Self {
        Self {
            property,
            property_images: images,
            user,
        }
    }
}

/// Typed field-level patch produced from a create or update payload.
///
/// `None` means "not supplied". Create fills unset fields with column
/// defaults; update leaves them untouched.
#[derive(Debug, Clone, Default, PartialEq, Validate)]
pub struct PropertyDraft {
    #[validate(length(min = 5, max = 200, message = "Title must be between 5 and 200 characters"))]
    pub title: Option<String>,
    pub description: Option<String>,
    pub kind: Option<ListingType>,
    pub property_type: Option<PropertyCategory>,
    pub price: Option<Decimal>,
    #[validate(length(min = 1, message = "Location is required"))]
    pub location: Option<String>,
    pub address: Option<String>,
    pub city: Option<String>,
    pub state: Option<String>,
    pub zip_code: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
    pub kitchens: Option<i32>,
    pub area: Option<Decimal>,
    pub built_year: Option<i32>,
    pub floor: Option<i32>,
    pub total_floors: Option<i32>,
    pub facing: Option<Facing>,
    pub parking: Option<i32>,
    pub balcony: Option<i32>,
    /// Amenity flags present in the payload, in payload order.
    pub amenities: Vec<(Amenity, bool)>,
    pub furnished: Option<Furnishing>,
    pub features: Option<Vec<String>>,
    pub images: Option<Vec<String>>,
    pub contact: Option<String>,
    pub owner: Option<String>,
    pub status: Option<ListingStatus>,
    pub is_approved: Option<bool>,
    pub is_featured: Option<bool>,
    pub latitude: Option<Decimal>,
    pub longitude: Option<Decimal>,
}

impl PropertyDraft {
    /// Full validation for a new listing: required fields plus ranges.
    pub fn validate_for_create(&self) -> AppResult<()> {
        let mut errors = self.range_errors();
        if self.title.is_none() {
            errors.push(FieldError::new("title", "Title is required"));
        }
        if self.kind.is_none() {
            errors.push(FieldError::new("type", "Type must be buy, rent, or sell"));
        }
        if self.price.is_none() {
            errors.push(FieldError::new("price", "Price is required"));
        }
        if self.location.is_none() {
            errors.push(FieldError::new("location", "Location is required"));
        }
        Self::finish(errors)
    }

    /// Patch validation: only supplied fields are checked.
    pub fn validate_for_update(&self) -> AppResult<()> {
        Self::finish(self.range_errors())
    }

    /// Remove curation flags only admins may set.
    pub fn strip_curation(&mut self) {
        self.is_approved = None;
        self.is_featured = None;
    }

    pub fn is_empty(&self) -> bool {
        *self == Self::default()
    }

    fn range_errors(&self) -> Vec<FieldError> {
        let mut errors = match self.validate() {
            Ok(()) => Vec::new(),
            Err(e) => field_errors(&e),
        };

        if self.price.is_some_and(|p| p < Decimal::ZERO) {
            errors.push(FieldError::new("price", "Price must be a positive number"));
        }
        if self.price.is_some_and(|p| p >= Decimal::from(PRICE_LIMIT)) {
            errors.push(FieldError::new("price", "Price is too large"));
        }
        if self.area.is_some_and(|a| a < Decimal::ZERO) {
            errors.push(FieldError::new("area", "Area must be a positive number"));
        }
        if self.area.is_some_and(|a| a >= Decimal::from(AREA_LIMIT)) {
            errors.push(FieldError::new("area", "Area is too large"));
        }
        check_range(&mut errors, "bedrooms", self.bedrooms, 0, MAX_ROOM_COUNT);
        check_range(&mut errors, "bathrooms", self.bathrooms, 0, MAX_ROOM_COUNT);
        check_range(&mut errors, "kitchens", self.kitchens, 0, MAX_KITCHEN_COUNT);
        check_range(
            &mut errors,
            "builtYear",
            self.built_year,
            MIN_BUILT_YEAR,
            Utc::now().year() + 2,
        );
        errors
    }

    fn finish(mut errors: Vec<FieldError>) -> AppResult<()> {
        if errors.is_empty() {
            return Ok(());
        }
        errors.sort_by(|a, b| a.field.cmp(&b.field));
        Err(AppError::InvalidFields(errors))
    }
}

fn check_range(errors: &mut Vec<FieldError>, field: &str, value: Option<i32>, min: i32, max: i32) {
    if let Some(v) = value {
        if v < min || v > max {
            errors.push(FieldError::new(
                field,
                format!("{} must be between {} and {}", capitalize(field), min, max),
            ));
        }
    }
}

fn capitalize(field: &str) -> String {
    let mut chars = field.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

/// Admin approval patch; both fields optional.
#[derive(Debug, Clone, Default, PartialEq, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct StatusPatch {
    pub is_approved: Option<bool>,
    pub status: Option<ListingStatus>,
}

/// Search filters of the public listing. All are optional and ANDed.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PropertyFilter {
    pub kind: Option<ListingType>,
    pub property_type: Option<PropertyCategory>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Substring of location, city or state.
    pub location: Option<String>,
    /// Substring of title, description or location.
    pub search: Option<String>,
    pub bedrooms: Option<i32>,
    pub bathrooms: Option<i32>,
}

/// Which rows a listing query may see.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Visibility {
    /// Approved and available only.
    Public,
    /// Everything one user owns.
    OwnedBy(i32),
    /// Everything, optionally narrowed by status and approval.
    All {
        status: Option<ListingStatus>,
        is_approved: Option<bool>,
    },
}

/// A complete listing request.
#[derive(Debug, Clone, PartialEq)]
pub struct ListingQuery {
    pub visibility: Visibility,
    pub filter: PropertyFilter,
    pub sort: SortSpec,
    pub page: crate::types::PageRequest,
}

/// Equality criteria for counting listings.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct PropertyCriteria {
    pub owner: Option<i32>,
    pub kind: Option<ListingType>,
    pub status: Option<ListingStatus>,
    pub is_approved: Option<bool>,
    pub is_featured: Option<bool>,
}

impl PropertyCriteria {
    /// Approved and available listings.
    pub fn public() -> Self {
        Self {
            status: Some(ListingStatus::Available),
            is_approved: Some(true),
            ..Default::default()
        }
    }
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum SortOrder {
    Asc,
    #[default]
    Desc,
}

impl std::str::FromStr for SortOrder {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_uppercase().as_str() {
            "ASC" => Ok(SortOrder::Asc),
            "DESC" => Ok(SortOrder::Desc),
            _ => Err(AppError::BadRequest(format!(
                "sortOrder must be ASC or DESC, got '{}'",
                s
            ))),
        }
    }
}

/// Sort column and direction, `createdAt DESC` by default.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SortSpec {
    pub field: SortField,
    pub order: SortOrder,
}

impl Default for SortSpec {
    fn default() -> Self {
        Self {
            field: SortField::CreatedAt,
            order: SortOrder::Desc,
        }
    }
}

impl SortSpec {
    /// Parse `sortBy`/`sortOrder` query values; unknown columns are rejected.
    pub fn parse(sort_by: Option<&str>, sort_order: Option<&str>) -> AppResult<Self> {
        let default = Self::default();
        let field = match sort_by {
            Some(name) => name
                .parse::<SortField>()
                .map_err(|_| AppError::BadRequest(format!("Cannot sort by '{}'", name)))?,
            None => default.field,
        };
        let order = match sort_order {
            Some(dir) => dir.parse()?,
            None => default.order,
        };
        Ok(Self { field, order })
    }
}
