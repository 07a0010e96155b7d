mod common;

use common::TestEnvironment;
use mealie_bridge::client::{ApiError, TokenStore};
use pretty_assertions::assert_eq;
use serde_json::json;
use wiremock::matchers::{body_json, header, method, path};
use wiremock::{Mock, ResponseTemplate};

#[tokio::test]
async fn get_token_parses_and_stores_the_access_token() {
    let env = TestEnvironment::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .and(header("accept", "application/json"))
        .and(body_json(json!({"username": "chef", "password": "secret"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::token_body()))
        .mount(&env.server)
        .await;

    let token = env.api.get_token("chef", "secret", false).await.unwrap();
    assert_eq!(token.access_token, "random_token_here");
    assert_eq!(token.token_type, "bearer");

    // Side effect: the store now holds the fresh token.
    assert_eq!(env.tokens.get_token().unwrap(), "random_token_here");
}

#[tokio::test]
async fn long_token_request_hits_the_long_endpoint() {
    let env = TestEnvironment::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/long"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::token_body()))
        .mount(&env.server)
        .await;

    let token = env.api.get_token("chef", "secret", true).await.unwrap();
    assert_eq!(token.access_token, "random_token_here");
}

#[tokio::test]
async fn failure_envelope_is_an_api_error_regardless_of_body() {
    let env = TestEnvironment::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": [{"loc": ["body"], "msg": "bad credentials", "type": "auth"}]
        })))
        .mount(&env.server)
        .await;

    let error = env.api.get_token("chef", "wrong", false).await.unwrap_err();
    assert!(matches!(error, ApiError::Api { status_code: 401 }));

    // The store stays empty after a rejected login.
    assert!(matches!(env.tokens.get_token(), Err(ApiError::NoToken)));
}

#[tokio::test]
async fn missing_field_in_success_body_is_a_parse_error() {
    let env = TestEnvironment::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_taoken": "random_token_here",
            "token_type": "bearer",
        })))
        .mount(&env.server)
        .await;

    let error = env.api.get_token("chef", "secret", false).await.unwrap_err();
    assert!(matches!(error, ApiError::Parse(_)));
}

#[tokio::test]
async fn transport_failure_surfaces_as_internal_error() {
    let tokens = std::sync::Arc::new(mealie_bridge::client::MemoryTokenStore::new());
    tokens.set_token("x".to_string());

    let api = mealie_bridge::client::Api::new(
        mealie_bridge::client::HttpClient::new(),
        common::unreachable_url(),
        tokens,
    );
    let error = api.get_statistics().await.unwrap_err();
    assert!(matches!(error, ApiError::Internal(_)));
}

#[tokio::test]
async fn authenticated_call_without_token_fails_before_the_network() {
    let env = TestEnvironment::new().await;

    // No mock is mounted: a request would 404 and fail differently.
    let error = env.api.get_statistics().await.unwrap_err();
    assert!(matches!(error, ApiError::NoToken));
}

#[tokio::test]
async fn bearer_header_is_exactly_the_stored_token() {
    let env = TestEnvironment::authenticated("x").await;

    Mock::given(method("GET"))
        .and(path("/api/debug/statistics"))
        .and(header("Authorization", "Bearer x"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::statistics_body()))
        .expect(1)
        .mount(&env.server)
        .await;

    let stats = env.api.get_statistics().await.unwrap();
    assert_eq!(stats.total_recipes, 52);
}

#[tokio::test]
async fn get_user_returns_the_account_record() {
    let env = TestEnvironment::authenticated("x").await;
    env.mock_get("/api/users/self", common::user_body()).await;

    let user = env.api.get_user().await.unwrap();
    assert_eq!(user.username, "chef");
    assert_eq!(user.full_name, "Chef Example");
    assert_eq!(user.id, 1);
    assert!(user.admin);
}

#[tokio::test]
async fn meal_plan_this_week_parses_days_in_order() {
    let env = TestEnvironment::authenticated("x").await;
    env.mock_get("/api/meal-plans/this-week", common::meal_plan_body())
        .await;

    let plan = env.api.get_meal_plan_this_week().await.unwrap().unwrap();
    assert_eq!(plan.plan_days.len(), 2);
    assert_eq!(plan.plan_days[0].meals.len(), 2);
    assert_eq!(plan.plan_days[0].meals[1].slug, None);
    assert_eq!(plan.plan_days[1].meals[0].name.as_deref(), Some("Pho"));
    assert_eq!(plan.uid, 27);
    assert_eq!(plan.shopping_list, 25);
}

#[tokio::test]
async fn empty_meal_plan_body_is_none() {
    let env = TestEnvironment::authenticated("x").await;

    Mock::given(method("GET"))
        .and(path("/api/meal-plans/this-week"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&env.server)
        .await;

    assert!(env.api.get_meal_plan_this_week().await.unwrap().is_none());
}

#[tokio::test]
async fn null_todays_recipe_is_none() {
    let env = TestEnvironment::authenticated("x").await;

    Mock::given(method("GET"))
        .and(path("/api/meal-plans/today"))
        .respond_with(ResponseTemplate::new(200).set_body_raw("null", "application/json"))
        .mount(&env.server)
        .await;

    assert!(env.api.get_recipe_today().await.unwrap().is_none());
}

#[tokio::test]
async fn empty_object_todays_recipe_is_none() {
    let env = TestEnvironment::authenticated("x").await;

    Mock::given(method("GET"))
        .and(path("/api/meal-plans/today"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({})))
        .mount(&env.server)
        .await;

    assert!(env.api.get_recipe_today().await.unwrap().is_none());
}

#[tokio::test]
async fn todays_recipe_parses_when_present() {
    let env = TestEnvironment::authenticated("x").await;
    env.mock_get("/api/meal-plans/today", common::recipe_body())
        .await;

    let recipe = env.api.get_recipe_today().await.unwrap().unwrap();
    assert_eq!(recipe.slug, "carbonara");
    assert_eq!(recipe.ingredients.len(), 1);
    assert_eq!(recipe.instructions[0].text, "Cook it.");
}

#[tokio::test]
async fn refresh_token_replaces_the_stored_token() {
    let env = TestEnvironment::authenticated("stale_token").await;

    Mock::given(method("GET"))
        .and(path("/api/auth/refresh"))
        .and(header("Authorization", "Bearer stale_token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access_token": "fresh_token",
            "token_type": "bearer",
        })))
        .mount(&env.server)
        .await;

    let token = env.api.get_refresh_token().await.unwrap();
    assert_eq!(token.access_token, "fresh_token");
    assert_eq!(env.tokens.get_token().unwrap(), "fresh_token");
}

#[tokio::test]
async fn put_returns_an_envelope_like_the_other_verbs() {
    let env = TestEnvironment::new().await;

    Mock::given(method("PUT"))
        .and(path("/api/recipes/carbonara"))
        .and(body_json(json!({"rating": 5})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({"rating": 5})))
        .mount(&env.server)
        .await;

    let client = mealie_bridge::client::HttpClient::new();
    let response = client
        .put(
            &format!("{}/api/recipes/carbonara", env.server.uri()),
            reqwest::header::HeaderMap::new(),
            &json!({"rating": 5}),
        )
        .await
        .unwrap();

    assert_eq!(response.status, mealie_bridge::client::Status::Success);
    assert_eq!(response.status_code, 200);
    assert_eq!(response.body(), Some(&json!({"rating": 5})));
}

#[tokio::test]
async fn authenticate_returns_token_and_user() {
    let env = TestEnvironment::new().await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::token_body()))
        .mount(&env.server)
        .await;
    Mock::given(method("GET"))
        .and(path("/api/users/self"))
        .and(header("Authorization", "Bearer random_token_here"))
        .respond_with(ResponseTemplate::new(200).set_body_json(common::user_body()))
        .mount(&env.server)
        .await;

    let (token, user) = env.api.authenticate("chef", "secret").await.unwrap();
    assert_eq!(token.access_token, "random_token_here");
    assert_eq!(user.email, "chef@example.com");
}
