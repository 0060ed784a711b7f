use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Deserializer, Serialize, de};
use std::borrow::Cow;
use std::str::FromStr;
use utoipa::{IntoParams, ToSchema};
use validator::{Validate, ValidationError};

pub const DEFAULT_PAGE: i64 = 1;
pub const DEFAULT_LIMIT: i64 = 10;
pub const MAX_LIMIT: i64 = 100;

pub const MAX_NAME_LENGTH: usize = 255;
pub const MAX_DESCRIPTION_LENGTH: usize = 5000;
pub const PRICE_UPPER_BOUND: i64 = 1_000_000;
pub const QUANTITY_UPPER_BOUND: i32 = 1_000_000;

pub const NAME_REQUIRED: &str = "Name is required.";
pub const PRICE_REQUIRED: &str = "Price is required.";
pub const QUANTITY_REQUIRED: &str = "Quantity is required.";

fn rule(code: &'static str, message: &'static str) -> ValidationError {
    ValidationError::new(code).with_message(Cow::Borrowed(message))
}

fn validate_name(name: &str) -> Result<(), ValidationError> {
    if name.trim().is_empty() {
        return Err(rule("blank", "Name should not be blank."));
    }
    if name.chars().count() > MAX_NAME_LENGTH {
        return Err(rule("length", "Name cannot be longer than 255 characters."));
    }
    Ok(())
}

fn validate_description(description: &str) -> Result<(), ValidationError> {
    if description.chars().count() > MAX_DESCRIPTION_LENGTH {
        return Err(rule(
            "length",
            "Description cannot be longer than 5000 characters.",
        ));
    }
    Ok(())
}

fn validate_price(price: &Decimal) -> Result<(), ValidationError> {
    if *price <= Decimal::ZERO {
        return Err(rule("range", "Price must be greater than 0."));
    }
    if *price >= Decimal::from(PRICE_UPPER_BOUND) {
        return Err(rule("range", "Price must be less than 1000000."));
    }
    Ok(())
}

fn validate_quantity(quantity: i32) -> Result<(), ValidationError> {
    if quantity < 0 {
        return Err(rule("range", "Quantity must be zero or greater."));
    }
    if quantity >= QUANTITY_UPPER_BOUND {
        return Err(rule("range", "Quantity must be less than 1000000."));
    }
    Ok(())
}

#[derive(Deserialize)]
#[serde(untagged)]
enum RawPrice {
    Number(serde_json::Number),
    Text(String),
}

/// Magnitudes `Decimal` cannot hold saturate, so the range rule reports them.
fn parse_price(text: &str) -> Option<Decimal> {
    if let Ok(price) = Decimal::from_str(text).or_else(|_| Decimal::from_scientific(text)) {
        return Some(price);
    }
    let value = text.parse::<f64>().ok().filter(|v| v.is_finite())?;
    Some(if value.abs() < 1.0 {
        Decimal::ZERO
    } else if value > 0.0 {
        Decimal::MAX
    } else {
        Decimal::MIN
    })
}

fn deserialize_price<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: Deserializer<'de>,
{
    let text = match Option::<RawPrice>::deserialize(deserializer)? {
        None => return Ok(None),
        Some(RawPrice::Number(number)) => number.to_string(),
        Some(RawPrice::Text(text)) => text.trim().to_string(),
    };
    parse_price(&text)
        .map(Some)
        .ok_or_else(|| de::Error::custom(format!("invalid price: {}", text)))
}

/// Integers outside `i32` saturate, so the range rule reports them.
fn deserialize_quantity<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let Some(number) = Option::<serde_json::Number>::deserialize(deserializer)? else {
        return Ok(None);
    };
    if let Some(value) = number.as_i64() {
        return Ok(Some(value.clamp(i32::MIN.into(), i32::MAX.into()) as i32));
    }
    if number.is_u64() {
        return Ok(Some(i32::MAX));
    }
    match number.as_f64() {
        // `as` saturates
        Some(value) if value.is_finite() && value.fract() == 0.0 => Ok(Some(value as i32)),
        _ => Err(de::Error::custom(format!(
            "invalid quantity: {}, expected an integer",
            number
        ))),
    }
}

/// Rounds half away from zero to two places and pads to scale 2.
pub fn normalize_price(price: Decimal) -> Decimal {
    let mut rounded = price.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    rounded.rescale(2);
    rounded
}

/// A stored product.
#[derive(Debug, Clone, PartialEq)]
pub struct Product {
    pub id: i32,
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    /// `None` until the first update
    pub updated_at: Option<DateTime<Utc>>,
}

impl Product {
    pub fn in_stock(&self) -> bool {
        self.quantity > 0
    }

    /// Overwrites the fields present in `input`, leaving the rest untouched.
    pub fn apply_partial(&mut self, input: ProductInput) {
        if let Some(name) = input.name {
            self.name = name;
        }
        if input.description.is_some() {
            self.description = input.description;
        }
        if let Some(price) = input.price {
            self.price = price;
        }
        if let Some(quantity) = input.quantity {
            self.quantity = quantity;
        }
    }

    /// Overwrites every field. An absent description clears it.
    ///
    /// Callers validate first; a missing required field keeps its old value.
    pub fn apply_full(&mut self, input: ProductInput) {
        self.description = input.description.clone();
        self.apply_partial(ProductInput {
            description: None,
            ..input
        });
    }
}

/// Product as returned over HTTP.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ProductResponse {
    #[schema(example = 1)]
    pub id: i32,
    #[schema(example = "Wireless Keyboard")]
    pub name: String,
    pub description: Option<String>,
    /// Always two fractional digits
    #[schema(value_type = String, example = "49.99")]
    pub price: Decimal,
    #[schema(example = 25)]
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
    pub updated_at: Option<DateTime<Utc>>,
    pub in_stock: bool,
}

impl From<Product> for ProductResponse {
    fn from(product: Product) -> Self {
        let in_stock = product.in_stock();
        Self {
            id: product.id,
            name: product.name,
            description: product.description,
            price: normalize_price(product.price),
            quantity: product.quantity,
            created_at: product.created_at,
            updated_at: product.updated_at,
            in_stock,
        }
    }
}

/// Body of create, replace and patch requests.
///
/// Every field is optional at the type level; which ones are required
/// depends on the [`ValidationMode`](crate::ValidationMode).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductInput {
    #[validate(custom(function = "validate_name"))]
    #[schema(example = "Wireless Keyboard")]
    pub name: Option<String>,

    #[validate(custom(function = "validate_description"))]
    pub description: Option<String>,

    /// JSON number or decimal string
    #[serde(default, deserialize_with = "deserialize_price")]
    #[validate(custom(function = "validate_price"))]
    #[schema(value_type = Option<f64>, example = 49.99)]
    pub price: Option<Decimal>,

    #[serde(default, deserialize_with = "deserialize_quantity")]
    #[validate(custom(function = "validate_quantity"))]
    #[schema(example = 25)]
    pub quantity: Option<i32>,
}

impl ProductInput {
    pub fn normalized(mut self) -> Self {
        self.price = self.price.map(normalize_price);
        self
    }
}

/// A validated product that has not been assigned an id yet.
#[derive(Debug, Clone, PartialEq)]
pub struct NewProduct {
    pub name: String,
    pub description: Option<String>,
    pub price: Decimal,
    pub quantity: i32,
    pub created_at: DateTime<Utc>,
}

impl NewProduct {
    /// Builds the row for an input that passed full validation.
    ///
    /// Required fields are checked by the validator; any still absent here
    /// take empty values.
    pub fn from_validated(input: ProductInput, created_at: DateTime<Utc>) -> Self {
        Self {
            name: input.name.unwrap_or_default(),
            description: input.description,
            price: input.price.unwrap_or_default(),
            quantity: input.quantity.unwrap_or_default(),
            created_at,
        }
    }
}

/// AND-combined search filters. Unset fields do not restrict.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SearchCriteria {
    /// Substring of the name
    pub name: Option<String>,
    /// Inclusive lower bound
    pub min_price: Option<Decimal>,
    /// Inclusive upper bound
    pub max_price: Option<Decimal>,
    /// `true` keeps only `quantity > 0`
    pub in_stock: bool,
}

impl SearchCriteria {
    pub fn matches(&self, product: &Product) -> bool {
        self.name
            .as_deref()
            .is_none_or(|name| product.name.contains(name))
            && self.min_price.is_none_or(|min| product.price >= min)
            && self.max_price.is_none_or(|max| product.price <= max)
            && (!self.in_stock || product.in_stock())
    }
}

/// Page number and size after clamping.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PageRequest {
    pub page: u64,
    pub limit: u64,
}

impl PageRequest {
    /// `page` is raised to 1; `limit` is held within 1..=100.
    pub fn new(page: i64, limit: i64) -> Self {
        Self {
            page: page.max(1) as u64,
            limit: limit.clamp(1, MAX_LIMIT) as u64,
        }
    }

    pub fn offset(&self) -> u64 {
        (self.page - 1).saturating_mul(self.limit)
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    pub items: Vec<T>,
    pub total: u64,
    pub page: u64,
    pub limit: u64,
    pub page_count: u64,
}

impl<T> Page<T> {
    pub fn new(items: Vec<T>, total: u64, request: PageRequest) -> Self {
        Self {
            items,
            total,
            page: request.page,
            limit: request.limit,
            page_count: total.div_ceil(request.limit),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct PageMeta {
    #[schema(example = 42)]
    pub total: u64,
    #[schema(example = 1)]
    pub page: u64,
    #[schema(example = 10)]
    pub limit: u64,
    #[schema(example = 5)]
    pub pages: u64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize, ToSchema)]
pub struct ProductListResponse {
    pub data: Vec<ProductResponse>,
    pub meta: PageMeta,
}

impl From<Page<Product>> for ProductListResponse {
    fn from(page: Page<Product>) -> Self {
        Self {
            meta: PageMeta {
                total: page.total,
                page: page.page,
                limit: page.limit,
                pages: page.page_count,
            },
            data: page.items.into_iter().map(ProductResponse::from).collect(),
        }
    }
}

/// Missing falls back to `default`; anything unparsable reads as 0.
fn lenient_int(raw: Option<&str>, default: i64) -> i64 {
    match raw {
        None => default,
        Some(value) => value.trim().parse().unwrap_or(0),
    }
}

fn lenient_decimal(raw: Option<&str>) -> Option<Decimal> {
    raw.and_then(|value| Decimal::from_str(value.trim()).ok())
}

fn truthy(raw: Option<&str>) -> bool {
    raw.is_some_and(|value| {
        matches!(
            value.trim().to_ascii_lowercase().as_str(),
            "1" | "true" | "on" | "yes"
        )
    })
}

/// `?page=&limit=`, kept as raw strings so bad values never reject the request.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ListQuery {
    /// Page number, 1-based (default 1)
    #[param(value_type = Option<i64>, example = 1)]
    pub page: Option<String>,
    /// Page size, 1 to 100 (default 10)
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<String>,
}

impl ListQuery {
    pub fn page(&self) -> i64 {
        lenient_int(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        lenient_int(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}

#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
#[serde(rename_all = "camelCase")]
#[into_params(parameter_in = Query, rename_all = "camelCase")]
pub struct SearchQuery {
    /// Substring of the product name
    pub name: Option<String>,
    /// Inclusive lower price bound
    #[param(value_type = Option<String>, example = "10.00")]
    pub min_price: Option<String>,
    /// Inclusive upper price bound
    #[param(value_type = Option<String>, example = "100.00")]
    pub max_price: Option<String>,
    /// `true`, `1`, `on` or `yes` keeps only products with stock
    #[param(value_type = Option<bool>)]
    pub in_stock: Option<String>,
    #[param(value_type = Option<i64>, example = 1)]
    pub page: Option<String>,
    #[param(value_type = Option<i64>, example = 10)]
    pub limit: Option<String>,
}

impl SearchQuery {
    pub fn criteria(&self) -> SearchCriteria {
        SearchCriteria {
            name: self.name.clone().filter(|name| !name.is_empty()),
            min_price: lenient_decimal(self.min_price.as_deref()),
            max_price: lenient_decimal(self.max_price.as_deref()),
            in_stock: truthy(self.in_stock.as_deref()),
        }
    }

    pub fn page(&self) -> i64 {
        lenient_int(self.page.as_deref(), DEFAULT_PAGE)
    }

    pub fn limit(&self) -> i64 {
        lenient_int(self.limit.as_deref(), DEFAULT_LIMIT)
    }
}
