//! Periodic refresh adapter.
//!
//! One refresh cycle runs the required API calls sequentially (refresh the
//! token, then statistics, today's recipe, this week's plan) and republishes
//! the results as a sensor-key snapshot. The caller drives the cadence; this
//! module performs no scheduling and no retries.

use std::collections::HashMap;
use std::sync::Arc;

use chrono::{Datelike, Weekday};

use crate::client::api::Api;
use crate::client::error::{ApiError, UpdateError};
use crate::client::types::{MealPlanResponse, RecipeResponse, StatisticsResponse};

pub const SENSOR_TOTAL_RECIPES: &str = "total_recipes";
pub const SENSOR_UNCATEGORIZED_RECIPES: &str = "uncategorized_recipes";
pub const SENSOR_UNTAGGED_RECIPES: &str = "untagged_recipes";
pub const SENSOR_TODAY_RECIPE: &str = "today_recipe";
pub const SENSOR_MEAL_PLAN: &str = "meal_plan";

const WEEKDAY_SENSORS: [(Weekday, &str); 7] = [
    (Weekday::Mon, "monday_recipe"),
    (Weekday::Tue, "tuesday_recipe"),
    (Weekday::Wed, "wednesday_recipe"),
    (Weekday::Thu, "thursday_recipe"),
    (Weekday::Fri, "friday_recipe"),
    (Weekday::Sat, "saturday_recipe"),
    (Weekday::Sun, "sunday_recipe"),
];

/// State published under one sensor key.
#[derive(Debug, Clone, PartialEq)]
pub enum SensorValue {
    Count(i64),
    Text(String),
    Recipe(RecipeResponse),
    MealPlan(MealPlanResponse),
}

impl std::fmt::Display for SensorValue {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            SensorValue::Count(n) => write!(f, "{n}"),
            SensorValue::Text(s) => write!(f, "{s}"),
            SensorValue::Recipe(recipe) => write!(f, "{}", recipe.name),
            SensorValue::MealPlan(plan) => {
                write!(f, "{} to {}", plan.start_date, plan.end_date)
            }
        }
    }
}

/// Mapping from sensor key to its latest value; `None` marks a sensor whose
/// source had nothing planned.
pub type SensorSnapshot = HashMap<&'static str, Option<SensorValue>>;

pub struct Updater {
    api: Arc<Api>,
}

impl Updater {
    pub fn new(api: Arc<Api>) -> Self {
        Self { api }
    }

    /// Runs one refresh cycle.
    ///
    /// A rejected or unparseable token refresh signals
    /// [`UpdateError::AuthRequired`]; any other failure in the cycle signals
    /// [`UpdateError::Failed`].
    pub async fn refresh(&self) -> Result<SensorSnapshot, UpdateError> {
        if let Err(error) = self.api.get_refresh_token().await {
            tracing::warn!(%error, "token refresh failed");
            return Err(match error {
                ApiError::Api { .. } | ApiError::Parse(_) => UpdateError::AuthRequired(error),
                other => UpdateError::Failed(other),
            });
        }

        let statistics = self.api.get_statistics().await.map_err(|error| {
            tracing::error!(%error, "failed to fetch statistics");
            UpdateError::Failed(error)
        })?;
        let today = self.api.get_recipe_today().await.map_err(|error| {
            tracing::error!(%error, "failed to fetch today's recipe");
            UpdateError::Failed(error)
        })?;
        let meal_plan = self.api.get_meal_plan_this_week().await.map_err(|error| {
            tracing::error!(%error, "failed to fetch this week's meal plan");
            UpdateError::Failed(error)
        })?;

        Ok(build_snapshot(&statistics, today, meal_plan))
    }
}

/// Assembles the sensor snapshot from one cycle's responses. Weekday sensors
/// carry the names of that day's planned meals; days the plan does not cover
/// read `None`.
pub fn build_snapshot(
    statistics: &StatisticsResponse,
    today: Option<RecipeResponse>,
    meal_plan: Option<MealPlanResponse>,
) -> SensorSnapshot {
    let mut snapshot = SensorSnapshot::new();
    snapshot.insert(
        SENSOR_TOTAL_RECIPES,
        Some(SensorValue::Count(statistics.total_recipes)),
    );
    snapshot.insert(
        SENSOR_UNCATEGORIZED_RECIPES,
        Some(SensorValue::Count(statistics.uncategorized_recipes)),
    );
    snapshot.insert(
        SENSOR_UNTAGGED_RECIPES,
        Some(SensorValue::Count(statistics.untagged_recipes)),
    );
    snapshot.insert(SENSOR_TODAY_RECIPE, today.map(SensorValue::Recipe));

    for (weekday, key) in WEEKDAY_SENSORS {
        let planned_day = meal_plan.as_ref().and_then(|plan| {
            plan.plan_days
                .iter()
                .find(|day| day.date.weekday() == weekday)
        });
        let value = planned_day.map(|day| {
            let names: Vec<&str> = day
                .meals
                .iter()
                .filter_map(|meal| meal.name.as_deref())
                .collect();
            SensorValue::Text(names.join(", "))
        });
        snapshot.insert(key, value);
    }

    snapshot.insert(SENSOR_MEAL_PLAN, meal_plan.map(SensorValue::MealPlan));
    snapshot
}
