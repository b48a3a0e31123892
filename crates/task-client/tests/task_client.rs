//! HttpTaskClient contract tests
//!
//! Verify request shapes (paths, query parameters, bodies) and response
//! parsing of the REST client.

use serde_json::json;
use task_client::{
    ApiError, ApiGateway, Credentials, HttpTaskClient, Priority, Registration, SessionEvent,
    StatusFilter, TaskClient, TaskDraft, TaskFilter, TaskPatch,
};
use task_config::{CredentialStore, KeyValueStore, MemoryStore, SharedStore};
use wiremock::matchers::{body_json, header, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn task_body(id: u64, completed: bool) -> serde_json::Value {
    json!({
        "id": id,
        "title": "Buy milk",
        "description": "",
        "due_date": "2024-03-10",
        "priority": "low",
        "completed": completed,
        "tags": ["home"],
        "created_at": "2024-03-01T08:00:00Z",
        "updated_at": "2024-03-01T08:00:00Z"
    })
}

async fn client_with_token(server: &MockServer) -> (HttpTaskClient, SharedStore) {
    let store = MemoryStore::shared();
    store.set_item("access_token", "abc").unwrap();
    store.set_item("refresh_token", "r1").unwrap();
    let gateway = ApiGateway::new(
        format!("{}/api", server.uri()),
        CredentialStore::new(store.clone()),
    );
    (HttpTaskClient::new(gateway), store)
}

#[tokio::test]
async fn test_login_stores_tokens() {
    let server = MockServer::start().await;
    let store = MemoryStore::shared();
    let gateway = ApiGateway::new(
        format!("{}/api", server.uri()),
        CredentialStore::new(store.clone()),
    );
    let client = HttpTaskClient::new(gateway);

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .and(body_json(json!({"email": "ann@example.com", "password": "hunter22"})))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "access": "a1",
            "refresh": "r1"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let tokens = client
        .login(&Credentials {
            email: "ann@example.com".to_string(),
            password: "hunter22".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(tokens.access, "a1");
    assert_eq!(store.get_item("access_token").as_deref(), Some("a1"));
    assert_eq!(store.get_item("refresh_token").as_deref(), Some("r1"));
    assert_eq!(client.gateway().session_state(), SessionEvent::Authenticated);
}

#[tokio::test]
async fn test_login_failure_keeps_server_detail() {
    let server = MockServer::start().await;
    let client = HttpTaskClient::new(ApiGateway::new(
        format!("{}/api", server.uri()),
        CredentialStore::new(MemoryStore::shared()),
    ));

    Mock::given(method("POST"))
        .and(path("/api/auth/login/"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({
            "detail": "No active account found with the given credentials"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .login(&Credentials {
            email: "ann@example.com".to_string(),
            password: "wrong".to_string(),
        })
        .await
        .unwrap_err();

    let api_error = err.downcast_ref::<ApiError>().expect("api error");
    assert!(api_error.is_unauthorized());
    assert_eq!(
        api_error.detail().as_deref(),
        Some("No active account found with the given credentials")
    );
    assert!(!client.gateway().credentials().has_session());
}

#[tokio::test]
async fn test_register_rejects_mismatched_passwords_locally() {
    let server = MockServer::start().await;
    let client = HttpTaskClient::new(ApiGateway::new(
        format!("{}/api", server.uri()),
        CredentialStore::new(MemoryStore::shared()),
    ));

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .respond_with(ResponseTemplate::new(201))
        .expect(0)
        .mount(&server)
        .await;

    let err = client
        .register(&Registration {
            email: "ann@example.com".to_string(),
            username: "ann".to_string(),
            password: "password1".to_string(),
            password2: "password2".to_string(),
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err.downcast_ref::<ApiError>(),
        Some(ApiError::Validation(_))
    ));
}

#[tokio::test]
async fn test_register_sends_form() {
    let server = MockServer::start().await;
    let client = HttpTaskClient::new(ApiGateway::new(
        format!("{}/api", server.uri()),
        CredentialStore::new(MemoryStore::shared()),
    ));

    Mock::given(method("POST"))
        .and(path("/api/auth/register/"))
        .and(body_json(json!({
            "email": "ann@example.com",
            "username": "ann",
            "password": "password1",
            "password2": "password1"
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "id": 5,
            "username": "ann",
            "email": "ann@example.com"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let user = client
        .register(&Registration {
            email: "ann@example.com".to_string(),
            username: "ann".to_string(),
            password: "password1".to_string(),
            password2: "password1".to_string(),
        })
        .await
        .unwrap();

    assert_eq!(user.id, Some(5));
    // Registration does not log in
    assert!(!client.gateway().credentials().has_session());
}

#[tokio::test]
async fn test_fetch_tasks_with_filter() {
    let server = MockServer::start().await;
    let (client, _) = client_with_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .and(header("authorization", "Bearer abc"))
        .and(query_param("completed", "false"))
        .and(query_param("priority", "low"))
        .and(query_param("tags", "home"))
        .and(query_param("search", "milk"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!([task_body(1, false)])))
        .expect(1)
        .mount(&server)
        .await;

    let filter = TaskFilter {
        status: StatusFilter::Pending,
        priority: Some(Priority::Low),
        tag: "home".to_string(),
        search: "milk".to_string(),
    };
    let tasks = client.fetch_tasks(&filter).await.unwrap();

    assert_eq!(tasks.len(), 1);
    assert_eq!(tasks[0].title, "Buy milk");
    assert_eq!(tasks[0].tags, vec!["home"]);
}

#[tokio::test]
async fn test_create_task_posts_draft() {
    let server = MockServer::start().await;
    let (client, _) = client_with_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/tasks/"))
        .and(body_json(json!({
            "title": "Buy milk",
            "description": "",
            "due_date": "2024-03-10",
            "priority": "low",
            "tags": ["home"]
        })))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_body(12, false)))
        .expect(1)
        .mount(&server)
        .await;

    let mut draft = TaskDraft::new("Buy milk", "2024-03-10");
    draft.priority = Priority::Low;
    draft.add_tag("home");

    let task = client.create_task(&draft).await.unwrap();
    assert_eq!(task.id, 12);
}

#[tokio::test]
async fn test_create_task_validates_before_sending() {
    let server = MockServer::start().await;
    let (client, _) = client_with_token(&server).await;

    Mock::given(method("POST"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(201).set_body_json(task_body(1, false)))
        .expect(0)
        .mount(&server)
        .await;

    assert!(client
        .create_task(&TaskDraft::new("No due date", ""))
        .await
        .is_err());
}

#[tokio::test]
async fn test_toggle_completion_patch() {
    let server = MockServer::start().await;
    let (client, _) = client_with_token(&server).await;

    Mock::given(method("PATCH"))
        .and(path("/api/tasks/3/"))
        .and(body_json(json!({"completed": true})))
        .respond_with(ResponseTemplate::new(200).set_body_json(task_body(3, true)))
        .expect(1)
        .mount(&server)
        .await;

    let task = client
        .update_task(3, &TaskPatch::completion(true))
        .await
        .unwrap();
    assert!(task.completed);
}

#[tokio::test]
async fn test_delete_task_accepts_empty_body() {
    let server = MockServer::start().await;
    let (client, _) = client_with_token(&server).await;

    Mock::given(method("DELETE"))
        .and(path("/api/tasks/3/"))
        .respond_with(ResponseTemplate::new(204))
        .expect(1)
        .mount(&server)
        .await;

    client.delete_task(3).await.unwrap();
}

#[tokio::test]
async fn test_fetch_statistics() {
    let server = MockServer::start().await;
    let (client, _) = client_with_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/statistics/"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "total": 3,
            "completed": 1,
            "pending": 2,
            "overdue": 1,
            "by_priority": {"low": 1, "medium": 1, "high": 1}
        })))
        .expect(1)
        .mount(&server)
        .await;

    let stats = client.fetch_statistics().await.unwrap();
    assert_eq!(stats.total, 3);
    assert_eq!(stats.by_priority.high, 1);
}

#[tokio::test]
async fn test_expired_session_during_fetch_requires_login() {
    let server = MockServer::start().await;
    let (client, store) = client_with_token(&server).await;

    Mock::given(method("GET"))
        .and(path("/api/tasks/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/auth/token/refresh/"))
        .respond_with(ResponseTemplate::new(401))
        .expect(1)
        .mount(&server)
        .await;

    let err = client
        .fetch_tasks(&TaskFilter::default())
        .await
        .unwrap_err();

    assert!(err
        .downcast_ref::<ApiError>()
        .is_some_and(ApiError::is_unauthorized));
    assert_eq!(store.get_item("access_token"), None);
    assert_eq!(store.get_item("refresh_token"), None);
    assert_eq!(client.gateway().session_state(), SessionEvent::LoginRequired);
}
