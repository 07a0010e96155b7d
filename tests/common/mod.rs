use std::sync::Arc;

use mealie_bridge::client::{Api, HttpClient, MemoryTokenStore, TokenStore};
use serde_json::{json, Value};
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

pub struct TestEnvironment {
    pub server: MockServer,
    pub api: Arc<Api>,
    pub tokens: Arc<MemoryTokenStore>,
}

impl TestEnvironment {
    /// Fresh facade pointed at a mock server, with no token stored.
    pub async fn new() -> Self {
        let server = MockServer::start().await;
        let tokens = Arc::new(MemoryTokenStore::new());
        let api = Arc::new(Api::new(HttpClient::new(), server.uri(), tokens.clone()));
        Self {
            server,
            api,
            tokens,
        }
    }

    /// Same, but with a token already in the store.
    pub async fn authenticated(token: &str) -> Self {
        let env = Self::new().await;
        env.tokens.set_token(token.to_string());
        env
    }

    /// Mounts a GET endpoint answering 200 with the given JSON body.
    pub async fn mock_get(&self, endpoint: &str, body: Value) {
        Mock::given(method("GET"))
            .and(path(endpoint))
            .respond_with(ResponseTemplate::new(200).set_body_json(body))
            .mount(&self.server)
            .await;
    }
}

/// A base URL whose port was just released, so connections are refused.
pub fn unreachable_url() -> String {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind probe listener");
    let addr = listener.local_addr().expect("probe listener address");
    drop(listener);
    format!("http://{addr}")
}

pub fn token_body() -> Value {
    json!({
        "access_token": "random_token_here",
        "token_type": "bearer",
    })
}

pub fn statistics_body() -> Value {
    json!({
        "totalRecipes": 52,
        "totalUsers": 2,
        "totalGroups": 1,
        "uncategorizedRecipes": 4,
        "untaggedRecipes": 11,
    })
}

pub fn user_body() -> Value {
    json!({
        "username": "chef",
        "fullName": "Chef Example",
        "email": "chef@example.com",
        "admin": true,
        "group": "Home",
        "favoriteRecipes": [],
        "id": 1,
        "tokens": [],
    })
}

pub fn meal_plan_body() -> Value {
    json!({
        "group": "Home",
        "startDate": "2021-11-29",
        "endDate": "2021-12-03",
        "planDays": [
            {"date": "2021-11-29", "meals": [
                {"slug": "lasagne", "name": "Lasagne", "description": "Comfort food"},
                {"slug": null, "name": "Salad", "description": null},
            ]},
            {"date": "2021-11-30", "meals": [
                {"slug": "pho", "name": "Pho", "description": "Noodle soup"},
            ]},
        ],
        "uid": 27,
        "shoppingList": 25,
    })
}

pub fn recipe_body() -> Value {
    json!({
        "id": 42,
        "name": "Carbonara",
        "slug": "carbonara",
        "recipeCategory": ["pasta"],
        "tags": ["dinner"],
        "recipeIngredient": [
            {"title": null, "note": "spaghetti", "unit": null, "food": null, "quantity": 400},
        ],
        "recipeInstructions": [{"title": "", "text": "Cook it."}],
        "dateAdded": "2021-11-20",
        "dateUpdated": "2021-11-29T14:31:15.399318",
    })
}
