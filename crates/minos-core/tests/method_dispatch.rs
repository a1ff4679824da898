//! End-to-end dispatcher tests: envelope validation, authentication,
//! routing and both method handlers against an in-memory store.

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Mutex;
use std::time::Duration;

use http::StatusCode;
use minos_core::{
    admin_token, method_handler, user_token, DispatchContext, Store, StoreError,
};
use serde_json::{json, Value};

/// In-memory store that counts cache traffic.
#[derive(Default)]
struct MemoryStore {
    values: Mutex<HashMap<String, String>>,
    cache_calls: AtomicUsize,
    fail_reads: bool,
}

impl MemoryStore {
    fn with_interests(pairs: &[(i64, &str)]) -> Self {
        let store = Self::default();
        {
            let mut values = store.values.lock().unwrap();
            for (id, interests) in pairs {
                values.insert(format!("i:{id}"), (*interests).to_string());
            }
        }
        store
    }

    fn cache_calls(&self) -> usize {
        self.cache_calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl Store for MemoryStore {
    async fn get(&self, key: &str) -> Result<String, StoreError> {
        if self.fail_reads {
            return Err(StoreError::read(key, "backend down"));
        }
        self.values
            .lock()
            .unwrap()
            .get(key)
            .cloned()
            .ok_or_else(|| StoreError::read(key, "missing key"))
    }

    async fn cache_get(&self, key: &str) -> Option<String> {
        self.cache_calls.fetch_add(1, Ordering::SeqCst);
        self.values.lock().unwrap().get(key).cloned()
    }

    async fn cache_set(&self, key: &str, value: &str, _ttl: Duration) -> bool {
        self.cache_calls.fetch_add(1, Ordering::SeqCst);
        self.values
            .lock()
            .unwrap()
            .insert(key.to_string(), value.to_string());
        true
    }
}

async fn dispatch(store: &MemoryStore, body: Value) -> (Value, StatusCode, DispatchContext) {
    let mut ctx = DispatchContext::new("test-request");
    let (response, status) = method_handler(&body, &mut ctx, store)
        .await
        .expect("store is healthy");
    (response, status, ctx)
}

fn score_envelope(arguments: Value) -> Value {
    json!({
        "account": "horns&hoofs",
        "login": "vasya",
        "method": "online_score",
        "token": user_token("horns&hoofs", "vasya"),
        "arguments": arguments,
    })
}

fn interests_envelope(arguments: Value) -> Value {
    json!({
        "account": "horns&hoofs",
        "login": "vasya",
        "method": "clients_interests",
        "token": user_token("horns&hoofs", "vasya"),
        "arguments": arguments,
    })
}

#[tokio::test]
async fn test_empty_envelope_is_invalid() {
    let store = MemoryStore::default();
    let (response, status, _) = dispatch(&store, json!({})).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response,
        json!("login: is require; token: is require; arguments: is require; method: is require.")
    );
}

#[tokio::test]
async fn test_non_object_body_is_invalid() {
    let store = MemoryStore::default();
    let (_, status, _) = dispatch(&store, json!("not an envelope")).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
}

#[tokio::test]
async fn test_bad_auth_is_forbidden() {
    let store = MemoryStore::default();
    let cases = [
        json!({"account": "horns&hoofs", "login": "h&f", "method": "online_score",
               "token": "", "arguments": {}}),
        json!({"account": "horns&hoofs", "login": "h&f", "method": "online_score",
               "token": "123", "arguments": {}}),
        json!({"account": "horns&hoofs", "login": "admin", "method": "online_score",
               "token": "", "arguments": {}}),
        json!({"account": "horns&hoofs", "login": "user", "method": "clients_interests",
               "token": user_token("other", "user"),
               "arguments": {"client_ids": [1, 2, 3, 4], "date": "13.02.2023"}}),
    ];
    for body in cases {
        let (response, status, _) = dispatch(&store, body).await;
        assert_eq!(status, StatusCode::FORBIDDEN);
        assert_eq!(response, json!("invalid token"));
    }
}

#[tokio::test]
async fn test_missing_token_fails_validation_not_auth() {
    let store = MemoryStore::default();
    let (response, status, _) = dispatch(
        &store,
        json!({"account": "horns&hoofs", "login": "h&f", "method": "online_score",
               "arguments": {}}),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response, json!("token: is require."));
}

#[tokio::test]
async fn test_unknown_method_is_not_found() {
    let store = MemoryStore::default();
    for method in ["get", "post", "bogus"] {
        let (response, status, _) = dispatch(
            &store,
            json!({"account": "horns&hoofs", "login": "vasya", "method": method,
                   "token": user_token("horns&hoofs", "vasya"), "arguments": {}}),
        )
        .await;
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(response, json!("method not found"));
    }
}

#[tokio::test]
async fn test_online_score_full_attributes() {
    let store = MemoryStore::default();
    let (response, status, ctx) = dispatch(
        &store,
        score_envelope(json!({
            "phone": "79174002042", "email": "vasya@otus.ru",
            "first_name": "Вася", "last_name": "Щупкин",
            "birthday": "01.01.1990", "gender": 2
        })),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"score": 5.0}));
    assert_eq!(
        ctx.has(),
        ["birthday", "email", "first_name", "gender", "last_name", "phone"]
    );
}

#[tokio::test]
async fn test_online_score_each_pair_is_sufficient() {
    let store = MemoryStore::default();
    let cases = [
        (json!({"phone": "79174002042", "email": "vasya@otus.ru"}), 3.0),
        (json!({"birthday": "01.01.1990", "gender": 2}), 1.5),
        (json!({"first_name": "Вася", "last_name": "Щупкин"}), 0.5),
    ];
    for (arguments, expected) in cases {
        let (response, status, _) = dispatch(&store, score_envelope(arguments)).await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(response, json!({"score": expected}));
    }
}

#[tokio::test]
async fn test_online_score_integer_phone() {
    let store = MemoryStore::default();
    let (response, status, _) = dispatch(
        &store,
        score_envelope(json!({"phone": 79175002040_i64, "email": "a@b.ru"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"score": 3.0}));
}

#[tokio::test]
async fn test_online_score_invalid_arguments() {
    let store = MemoryStore::default();
    let cases = [
        json!({"phone": "79174002042", "email": "vasya@otus.ru", "first_name": "Вася",
               "last_name": "Щупкин", "birthday": "01.01.1990", "gender": 10}),
        json!({"phone": "79175002040", "last_name": "Щупкин", "gender": 10}),
        json!({"first_name": "Вася"}),
        json!({}),
    ];
    for arguments in cases {
        let (_, status, _) = dispatch(&store, score_envelope(arguments)).await;
        assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    }
}

#[tokio::test]
async fn test_online_score_pair_failure_has_empty_error_string() {
    let store = MemoryStore::default();
    let (response, status, ctx) =
        dispatch(&store, score_envelope(json!({"first_name": "Вася"}))).await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    // The pair rule adds no error text of its own.
    assert_eq!(response, json!("."));
    assert!(ctx.has().is_empty());
}

#[tokio::test]
async fn test_admin_score_is_fixed_and_skips_the_cache() {
    let store = MemoryStore::default();
    let (response, status, ctx) = dispatch(
        &store,
        json!({
            "account": "horns&hoofs", "login": "admin", "method": "online_score",
            "token": admin_token(), "arguments": {}
        }),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(response, json!({"score": 42}));
    assert_eq!(store.cache_calls(), 0);
    assert!(ctx.has().is_empty());
}

#[tokio::test]
async fn test_clients_interests_maps_ids_in_order() {
    let store = MemoryStore::with_interests(&[
        (1, r#"["books"]"#),
        (2, r#"["travel", "music"]"#),
        (3, r#"[]"#),
        (4, r#"["pets"]"#),
    ]);
    let (response, status, ctx) = dispatch(
        &store,
        interests_envelope(json!({"client_ids": [1, 2, 3, 4], "date": "13.02.2023"})),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(
        response,
        json!({
            "1": ["books"],
            "2": ["travel", "music"],
            "3": [],
            "4": ["pets"],
        })
    );
    assert_eq!(ctx.nclients(), 4);
}

#[tokio::test]
async fn test_clients_interests_invalid_ids() {
    let store = MemoryStore::default();
    let (response, status, ctx) = dispatch(
        &store,
        interests_envelope(json!({"client_ids": 10, "date": "13.02.2023"})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(response, json!("client_ids: Is not list of client ids."));
    assert_eq!(ctx.nclients(), 0);
}

#[tokio::test]
async fn test_clients_interests_store_failure_propagates() {
    let store = MemoryStore {
        fail_reads: true,
        ..MemoryStore::default()
    };
    let mut ctx = DispatchContext::new("test-request");
    let result = method_handler(
        &interests_envelope(json!({"client_ids": [1]})),
        &mut ctx,
        &store,
    )
    .await;
    assert!(result.is_err());
}

#[tokio::test]
async fn test_score_validation_reports_all_field_errors() {
    let store = MemoryStore::default();
    let (response, status, _) = dispatch(
        &store,
        score_envelope(json!({"phone": "123", "email": "no-at-sign", "gender": 9})),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
    assert_eq!(
        response,
        json!("email: Is not email; phone: Is not phone number; gender: is not a gender number.")
    );
}
