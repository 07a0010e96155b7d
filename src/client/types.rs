//! Domain records for the Mealie API.
//!
//! Every record is an immutable value object built once from a decoded JSON
//! body by its `from_json` constructor. Required fields that are absent fail
//! with [`ParseError::MissingField`]; optional fields fall back to `None` (or
//! an empty list). Nested collections are parsed element-wise in source
//! order.
//!
//! ## Wire format notes
//!
//! Mealie sends camelCase keys (`startDate`, `planDays`, `shoppingList`) and
//! two date shapes: date-only fields as `YYYY-MM-DD`, timestamps as ISO-8601
//! which may lack a UTC offset. Ingredient `unit`/`food` fields appear either
//! as a bare string or as an object with a `name` key depending on the server
//! version, so both are accepted.

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;
use serde_json::Value;

use crate::client::error::ParseError;

fn required<'a>(json: &'a Value, name: &'static str) -> Result<&'a Value, ParseError> {
    match json.get(name) {
        Some(Value::Null) | None => Err(ParseError::MissingField(name)),
        Some(value) => Ok(value),
    }
}

fn req_str(json: &Value, name: &'static str) -> Result<String, ParseError> {
    required(json, name)?
        .as_str()
        .map(str::to_string)
        .ok_or(ParseError::InvalidField {
            field: name,
            reason: "expected a string".to_string(),
        })
}

fn req_i64(json: &Value, name: &'static str) -> Result<i64, ParseError> {
    required(json, name)?
        .as_i64()
        .ok_or(ParseError::InvalidField {
            field: name,
            reason: "expected an integer".to_string(),
        })
}

fn req_bool(json: &Value, name: &'static str) -> Result<bool, ParseError> {
    required(json, name)?
        .as_bool()
        .ok_or(ParseError::InvalidField {
            field: name,
            reason: "expected a boolean".to_string(),
        })
}

fn opt_str(json: &Value, name: &'static str) -> Result<Option<String>, ParseError> {
    match json.get(name) {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(_) => Err(ParseError::InvalidField {
            field: name,
            reason: "expected a string or null".to_string(),
        }),
    }
}

fn opt_i64(json: &Value, name: &'static str) -> Result<Option<i64>, ParseError> {
    match json.get(name) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => value.as_i64().map(Some).ok_or(ParseError::InvalidField {
            field: name,
            reason: "expected an integer or null".to_string(),
        }),
    }
}

fn opt_f64(json: &Value, name: &'static str) -> Result<Option<f64>, ParseError> {
    match json.get(name) {
        Some(Value::Null) | None => Ok(None),
        Some(value) => value.as_f64().map(Some).ok_or(ParseError::InvalidField {
            field: name,
            reason: "expected a number or null".to_string(),
        }),
    }
}

fn flag(json: &Value, name: &'static str) -> bool {
    json.get(name).and_then(Value::as_bool).unwrap_or(false)
}

/// List of elements under `name`, parsed in source order; missing or null
/// lists are empty.
fn list<T>(
    json: &Value,
    name: &'static str,
    parse: impl Fn(&Value) -> Result<T, ParseError>,
) -> Result<Vec<T>, ParseError> {
    match json.get(name) {
        Some(Value::Array(items)) => items.iter().map(parse).collect(),
        Some(Value::Null) | None => Ok(Vec::new()),
        Some(_) => Err(ParseError::InvalidField {
            field: name,
            reason: "expected a list".to_string(),
        }),
    }
}

fn str_list(json: &Value, name: &'static str) -> Result<Vec<String>, ParseError> {
    list(json, name, |item| {
        item.as_str()
            .map(str::to_string)
            .ok_or(ParseError::InvalidField {
                field: name,
                reason: "expected a list of strings".to_string(),
            })
    })
}

fn parse_date(raw: &str, field: &'static str) -> Result<NaiveDate, ParseError> {
    NaiveDate::parse_from_str(raw, "%Y-%m-%d").map_err(|error| ParseError::InvalidField {
        field,
        reason: error.to_string(),
    })
}

fn req_date(json: &Value, name: &'static str) -> Result<NaiveDate, ParseError> {
    parse_date(&req_str(json, name)?, name)
}

fn opt_date(json: &Value, name: &'static str) -> Result<Option<NaiveDate>, ParseError> {
    opt_str(json, name)?
        .map(|raw| parse_date(&raw, name))
        .transpose()
}

/// Mealie timestamps are ISO-8601 but often lack an offset; offset-less
/// values are taken as UTC.
fn parse_datetime(raw: &str, field: &'static str) -> Result<DateTime<Utc>, ParseError> {
    if let Ok(with_offset) = DateTime::parse_from_rfc3339(raw) {
        return Ok(with_offset.with_timezone(&Utc));
    }
    NaiveDateTime::parse_from_str(raw, "%Y-%m-%dT%H:%M:%S%.f")
        .map(|naive| naive.and_utc())
        .map_err(|error| ParseError::InvalidField {
            field,
            reason: error.to_string(),
        })
}

fn opt_datetime(json: &Value, name: &'static str) -> Result<Option<DateTime<Utc>>, ParseError> {
    opt_str(json, name)?
        .map(|raw| parse_datetime(&raw, name))
        .transpose()
}

/// Accepts either a bare string or an object carrying a `name` key. Older
/// and newer Mealie servers disagree here for ingredient units and foods.
fn opt_name_like(json: &Value, name: &'static str) -> Result<Option<String>, ParseError> {
    match json.get(name) {
        Some(Value::Null) | None => Ok(None),
        Some(Value::String(s)) => Ok(Some(s.clone())),
        Some(Value::Object(map)) => match map.get("name") {
            Some(Value::String(s)) => Ok(Some(s.clone())),
            Some(Value::Null) | None => Ok(None),
            Some(_) => Err(ParseError::InvalidField {
                field: name,
                reason: "expected `name` to be a string".to_string(),
            }),
        },
        Some(_) => Err(ParseError::InvalidField {
            field: name,
            reason: "expected a string or an object with `name`".to_string(),
        }),
    }
}

/// Bearer token issued by the login and refresh endpoints.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TokenResponse {
    pub access_token: String,
    pub token_type: String,
}

impl TokenResponse {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            access_token: req_str(json, "access_token")?,
            token_type: req_str(json, "token_type")?,
        })
    }
}

/// Long-lived API token listed on the user record.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ApiToken {
    pub id: i64,
    pub name: String,
}

impl ApiToken {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            id: req_i64(json, "id")?,
            name: req_str(json, "name")?,
        })
    }
}

/// The authenticated user, from `/api/users/self`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UserResponse {
    pub username: String,
    pub full_name: String,
    pub email: String,
    pub admin: bool,
    pub group: String,
    pub favorite_recipes: Vec<String>,
    pub id: i64,
    pub tokens: Vec<ApiToken>,
}

impl UserResponse {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            username: req_str(json, "username")?,
            full_name: req_str(json, "fullName")?,
            email: req_str(json, "email")?,
            admin: req_bool(json, "admin")?,
            group: req_str(json, "group")?,
            favorite_recipes: str_list(json, "favoriteRecipes")?,
            id: req_i64(json, "id")?,
            tokens: list(json, "tokens", ApiToken::from_json)?,
        })
    }
}

/// Snapshot counts from `/api/debug/statistics`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StatisticsResponse {
    pub total_recipes: i64,
    pub total_users: i64,
    pub total_groups: i64,
    pub uncategorized_recipes: i64,
    pub untagged_recipes: i64,
}

impl StatisticsResponse {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            total_recipes: req_i64(json, "totalRecipes")?,
            total_users: req_i64(json, "totalUsers")?,
            total_groups: req_i64(json, "totalGroups")?,
            uncategorized_recipes: req_i64(json, "uncategorizedRecipes")?,
            untagged_recipes: req_i64(json, "untaggedRecipes")?,
        })
    }
}

/// One scheduled meal within a plan day. Every field may be null upstream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Meal {
    pub slug: Option<String>,
    pub name: Option<String>,
    pub description: Option<String>,
}

impl Meal {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            slug: opt_str(json, "slug")?,
            name: opt_str(json, "name")?,
            description: opt_str(json, "description")?,
        })
    }
}

/// One calendar day's worth of scheduled meals.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlanDay {
    pub date: NaiveDate,
    pub meals: Vec<Meal>,
}

impl PlanDay {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            date: req_date(json, "date")?,
            meals: list(json, "meals", Meal::from_json)?,
        })
    }
}

/// Weekly meal plan from `/api/meal-plans/this-week`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MealPlanResponse {
    pub group: String,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    pub plan_days: Vec<PlanDay>,
    pub uid: i64,
    pub shopping_list: i64,
}

impl MealPlanResponse {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            group: req_str(json, "group")?,
            start_date: req_date(json, "startDate")?,
            end_date: req_date(json, "endDate")?,
            plan_days: list(json, "planDays", PlanDay::from_json)?,
            uid: req_i64(json, "uid")?,
            shopping_list: req_i64(json, "shoppingList")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct RecipeIngredient {
    pub title: Option<String>,
    pub note: Option<String>,
    pub unit: Option<String>,
    pub food: Option<String>,
    pub quantity: Option<f64>,
}

impl RecipeIngredient {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            title: opt_str(json, "title")?,
            note: opt_str(json, "note")?,
            unit: opt_name_like(json, "unit")?,
            food: opt_name_like(json, "food")?,
            quantity: opt_f64(json, "quantity")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeStep {
    pub title: Option<String>,
    pub text: String,
}

impl RecipeStep {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            title: opt_str(json, "title")?,
            text: req_str(json, "text")?,
        })
    }
}

/// Nutrition values as Mealie sends them: free-form strings, all optional.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Nutrition {
    pub calories: Option<String>,
    pub fat_content: Option<String>,
    pub protein_content: Option<String>,
    pub carbohydrate_content: Option<String>,
    pub fiber_content: Option<String>,
    pub sodium_content: Option<String>,
    pub sugar_content: Option<String>,
}

impl Nutrition {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            calories: opt_str(json, "calories")?,
            fat_content: opt_str(json, "fatContent")?,
            protein_content: opt_str(json, "proteinContent")?,
            carbohydrate_content: opt_str(json, "carbohydrateContent")?,
            fiber_content: opt_str(json, "fiberContent")?,
            sodium_content: opt_str(json, "sodiumContent")?,
            sugar_content: opt_str(json, "sugarContent")?,
        })
    }
}

/// Per-recipe display and visibility flags. Absent flags read as false.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct RecipeSettings {
    pub public: bool,
    pub show_nutrition: bool,
    pub show_assets: bool,
    pub landscape_view: bool,
    pub disable_comments: bool,
    pub disable_amount: bool,
}

impl RecipeSettings {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            public: flag(json, "public"),
            show_nutrition: flag(json, "showNutrition"),
            show_assets: flag(json, "showAssets"),
            landscape_view: flag(json, "landscapeView"),
            disable_comments: flag(json, "disableComments"),
            disable_amount: flag(json, "disableAmount"),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeAsset {
    pub name: String,
    pub icon: Option<String>,
    pub file_name: Option<String>,
}

impl RecipeAsset {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            name: req_str(json, "name")?,
            icon: opt_str(json, "icon")?,
            file_name: opt_str(json, "fileName")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecipeNote {
    pub title: Option<String>,
    pub text: String,
}

impl RecipeNote {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            title: opt_str(json, "title")?,
            text: req_str(json, "text")?,
        })
    }
}

/// Recipe comment. The `user` shape varies across server versions (object or
/// bare id) and is kept as raw JSON.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeComment {
    pub id: Option<i64>,
    pub text: String,
    pub date_added: Option<DateTime<Utc>>,
    pub user: Option<Value>,
}

impl RecipeComment {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            id: opt_i64(json, "id")?,
            text: req_str(json, "text")?,
            date_added: opt_datetime(json, "dateAdded")?,
            user: match json.get("user") {
                Some(Value::Null) | None => None,
                Some(value) => Some(value.clone()),
            },
        })
    }
}

/// A full recipe, the richest record. Only `id`, `name` and `slug` are
/// guaranteed by the server; everything else is optional.
#[derive(Debug, Clone, PartialEq)]
pub struct RecipeResponse {
    pub id: i64,
    pub name: String,
    pub slug: String,
    pub image: Option<String>,
    pub description: Option<String>,
    pub recipe_category: Vec<String>,
    pub tags: Vec<String>,
    pub rating: Option<i64>,
    pub recipe_yield: Option<String>,
    pub org_url: Option<String>,
    pub ingredients: Vec<RecipeIngredient>,
    pub instructions: Vec<RecipeStep>,
    pub nutrition: Option<Nutrition>,
    pub settings: Option<RecipeSettings>,
    pub assets: Vec<RecipeAsset>,
    pub notes: Vec<RecipeNote>,
    pub comments: Vec<RecipeComment>,
    pub date_added: Option<NaiveDate>,
    pub date_updated: Option<DateTime<Utc>>,
}

impl RecipeResponse {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            id: req_i64(json, "id")?,
            name: req_str(json, "name")?,
            slug: req_str(json, "slug")?,
            image: opt_str(json, "image")?,
            description: opt_str(json, "description")?,
            recipe_category: str_list(json, "recipeCategory")?,
            tags: str_list(json, "tags")?,
            rating: opt_i64(json, "rating")?,
            recipe_yield: opt_str(json, "recipeYield")?,
            org_url: opt_str(json, "orgURL")?,
            ingredients: list(json, "recipeIngredient", RecipeIngredient::from_json)?,
            instructions: list(json, "recipeInstructions", RecipeStep::from_json)?,
            nutrition: match json.get("nutrition") {
                Some(Value::Null) | None => None,
                Some(value) => Some(Nutrition::from_json(value)?),
            },
            settings: match json.get("settings") {
                Some(Value::Null) | None => None,
                Some(value) => Some(RecipeSettings::from_json(value)?),
            },
            assets: list(json, "assets", RecipeAsset::from_json)?,
            notes: list(json, "notes", RecipeNote::from_json)?,
            comments: list(json, "comments", RecipeComment::from_json)?,
            date_added: opt_date(json, "dateAdded")?,
            date_updated: opt_datetime(json, "dateUpdated")?,
        })
    }
}

/// Validation failure detail sent alongside non-2xx responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Detail {
    pub loc: Vec<String>,
    pub msg: Option<String>,
    pub type_: Option<String>,
}

impl Detail {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        let loc = match json.get("loc") {
            Some(Value::Array(items)) => items
                .iter()
                .map(|entry| match entry {
                    Value::String(s) => s.clone(),
                    other => other.to_string(),
                })
                .collect(),
            _ => Vec::new(),
        };
        Ok(Self {
            loc,
            msg: opt_str(json, "msg")?,
            type_: opt_str(json, "type")?,
        })
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ErrorResponse {
    pub detail: Vec<Detail>,
}

impl ErrorResponse {
    pub fn from_json(json: &Value) -> Result<Self, ParseError> {
        Ok(Self {
            detail: list(json, "detail", Detail::from_json)?,
        })
    }
}

/// Credentials payload sent to the token endpoints.
#[derive(Debug, Serialize)]
pub struct LoginRequest {
    pub username: String,
    pub password: String,
}
