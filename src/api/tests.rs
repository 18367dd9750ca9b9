use super::*;
use crate::error::ErrorKind;
use crate::request::mock::MockHttpClient;
use crate::session::MemoryStore;
use crate::session::mock::RejectingStore;
use crate::source::CollectionSource;
use admin_console_shared::{Order, STORAGE_TOKEN_KEY, SortSpec, Transaction};
use serde_json::json;

const API: &str = "http://api.test";
const WORKER: &str = "http://worker.test";

fn test_config() -> ConsoleConfig {
    ConsoleConfig {
        api_url: API.to_string(),
        worker_api_url: WORKER.to_string(),
        ..ConsoleConfig::default()
    }
}

fn setup(token: Option<&str>) -> (ConsoleApi<Rc<MockHttpClient>, MemoryStore>, Rc<MockHttpClient>, MemoryStore) {
    let client = Rc::new(MockHttpClient::new());
    let store = MemoryStore::new();
    if let Some(token) = token {
        store.set(STORAGE_TOKEN_KEY, token);
    }
    let api = ConsoleApi::new(client.clone(), Session::new(store.clone()), test_config());
    (api, client, store)
}

fn customers_json(ids: &[&str]) -> String {
    let data: Vec<_> = ids
        .iter()
        .map(|id| json!({"_id": id, "accountName": format!("acct {}", id), "active": true}))
        .collect();
    json!({ "data": data }).to_string()
}

#[tokio::test]
async fn test_list_sends_one_based_params_and_token() {
    let (api, client, _) = setup(Some("abc123"));
    client.set_handler(|_| {
        Some(HttpResponse::new(200, customers_json(&["r1", "r2"])).with_header("X-Total-Count", "45"))
    });

    let query = CollectionQuery {
        page_index: 2,
        page_size: 10,
        sort: Some(SortSpec::desc("accountName")),
        search_term: "acme corp".into(),
    };
    let page = api.list::<RootAccount>(&query, &[]).await.unwrap();

    assert_eq!(page.len(), 2);
    assert_eq!(page.total, 45);
    assert!(page.total_exact);

    let req = client.last_request().unwrap();
    assert_eq!(
        req.url,
        "http://api.test/auth/get-root-accounts?_page=3&_limit=10&_sort=accountName&_order=desc&q=acme+corp"
    );
    assert_eq!(req.header("Authorization"), Some("Bearer abc123"));
}

#[tokio::test]
async fn test_list_uses_default_sort_and_scope() {
    let (api, client, _) = setup(Some("t"));
    client.set_handler(|_| Some(HttpResponse::new(200, r#"{"data":[],"total":0}"#)));

    let users = api.users("root-9");
    assert_eq!(users.scope(), &[("rootUserId".to_string(), "root-9".to_string())]);
    users.fetch(&CollectionQuery::default()).await.unwrap();

    let req = client.last_request().unwrap();
    assert_eq!(
        req.url,
        "http://api.test/auth/get-users?_page=1&_limit=20&_sort=id&_order=asc&q=&rootUserId=root-9"
    );
}

#[tokio::test]
async fn test_transactions_have_no_default_sort() {
    let (api, client, _) = setup(Some("t"));
    client.set_handler(|_| Some(HttpResponse::new(200, r#"{"data":[]}"#)));

    api.list::<Transaction>(&CollectionQuery::default(), &[])
        .await
        .unwrap();
    let req = client.last_request().unwrap();
    assert_eq!(req.url, "http://api.test/auth/get-transactions?_page=1&_limit=20&q=");
}

#[tokio::test]
async fn test_total_prefers_header_then_body_then_length() {
    let (api, client, _) = setup(Some("t"));
    let q = CollectionQuery::default();

    client.set_handler(|_| {
        Some(HttpResponse::new(200, r#"{"data":[],"total":7}"#).with_header("x-total-count", "12"))
    });
    assert_eq!(api.list::<RootAccount>(&q, &[]).await.unwrap().total, 12);

    client.set_handler(|_| Some(HttpResponse::new(200, r#"{"data":[],"total":7}"#)));
    assert_eq!(api.list::<RootAccount>(&q, &[]).await.unwrap().total, 7);

    client.set_handler(|_| Some(HttpResponse::new(200, customers_json(&["a", "b", "c"]))));
    let page = api.list::<RootAccount>(&q, &[]).await.unwrap();
    assert_eq!(page.total, 3);
    assert!(!page.total_exact);
}

#[tokio::test]
async fn test_token_is_read_at_dispatch() {
    let (api, client, store) = setup(None);
    client.set_handler(|_| Some(HttpResponse::new(200, customers_json(&[]))));

    let err = api
        .list::<RootAccount>(&CollectionQuery::default(), &[])
        .await
        .unwrap_err();
    assert!(err.is_unauthorized());
    assert!(client.requests.borrow().is_empty());

    store.set(STORAGE_TOKEN_KEY, "late-token");
    api.list::<RootAccount>(&CollectionQuery::default(), &[])
        .await
        .unwrap();
    assert_eq!(
        client.last_request().unwrap().header("Authorization"),
        Some("Bearer late-token")
    );
}

#[tokio::test]
async fn test_expired_token_is_unauthorized() {
    let (api, client, _) = setup(Some("stale"));
    client.set_handler(|_| Some(HttpResponse::new(401, r#"{"message":"jwt expired"}"#)));

    let err = api
        .list::<RootAccount>(&CollectionQuery::default(), &[])
        .await
        .unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Unauthorized);
    assert_eq!(err.status(), Some(401));
    assert_eq!(err.message(), "jwt expired");
}

#[tokio::test]
async fn test_login_persists_and_logout_clears() {
    let (api, client, store) = setup(None);
    client.add_response(
        "http://api.test/auth/admin-login",
        HttpResponse::new(
            200,
            json!({"token": "tok-1", "admin": {"firstName": "Hana", "lastName": "Girma"}}).to_string(),
        ),
    );

    let profile = api.login("hana@example.com", "pw").await.unwrap();
    assert_eq!(profile.display_name(), "Hana Girma");
    assert_eq!(store.get(STORAGE_TOKEN_KEY).as_deref(), Some("tok-1"));
    assert_eq!(api.session().profile().unwrap().first_name, "Hana");

    let req = client.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Post);
    assert!(req.header("Authorization").is_none());
    let body: serde_json::Value = serde_json::from_str(req.body.as_deref().unwrap()).unwrap();
    assert_eq!(body, json!({"email": "hana@example.com", "password": "pw"}));

    api.logout();
    assert!(!api.session().is_authenticated());
    assert!(api.session().profile().is_none());
}

#[tokio::test]
async fn test_login_fails_when_credentials_cannot_be_stored() {
    let client = Rc::new(MockHttpClient::new());
    let api = ConsoleApi::new(client.clone(), Session::new(RejectingStore::all()), test_config());
    client.add_response(
        "http://api.test/auth/admin-login",
        HttpResponse::new(
            200,
            json!({"token": "tok-1", "admin": {"firstName": "Hana", "lastName": "Girma"}}).to_string(),
        ),
    );

    let err = api.login("hana@example.com", "pw").await.unwrap_err();
    assert_eq!(err.kind(), ErrorKind::Transport);
    assert_eq!(err.message(), "failed to persist credentials");
    assert!(!api.session().is_authenticated());
}

#[tokio::test]
async fn test_login_failure_message() {
    let (api, client, store) = setup(None);
    client.add_response(
        "http://api.test/auth/admin-login",
        HttpResponse::new(401, r#"{"message":"Invalid credentials"}"#),
    );
    let err = api.login("a@b.c", "wrong").await.unwrap_err();
    assert_eq!(err.message(), "Invalid credentials");
    assert!(store.get(STORAGE_TOKEN_KEY).is_none());

    client.add_response("http://api.test/auth/admin-login", HttpResponse::new(401, ""));
    let err = api.login("a@b.c", "wrong").await.unwrap_err();
    assert_eq!(err.message(), "Login failed");
}

#[tokio::test]
async fn test_get_detail_and_not_found() {
    let (api, client, _) = setup(Some("t"));
    client.add_response(
        "http://api.test/auth/root/r1",
        HttpResponse::new(200, r#"{"_id":"r1","accountName":"Acme","active":false}"#),
    );
    client.add_response("http://api.test/auth/root/missing", HttpResponse::new(404, "Not Found"));

    let account = api.get::<RootAccount>("r1").await.unwrap();
    assert_eq!(account.account_name, "Acme");

    let err = api.get::<RootAccount>("missing").await.unwrap_err();
    assert_eq!(err, ApiError::NotFound("root account missing".into()));
}

#[tokio::test]
async fn test_order_detail_is_enveloped_on_worker() {
    let (api, client, _) = setup(Some("t"));
    client.add_response(
        "http://worker.test/order/o1",
        HttpResponse::new(
            200,
            json!({"data": {"_id": "o1", "orderType": "vm", "status": "paid", "total": 12.5,
                "order": {"vm": [{"name": "web", "vCPU": 2, "RAM": 4}]}}})
            .to_string(),
        ),
    );

    let order = api.get::<Order>("o1").await.unwrap();
    assert_eq!(order.status, "paid");
    let vm = &order.order.unwrap().vm[0];
    assert_eq!((vm.vcpu, vm.ram), (2, 4));
}

#[tokio::test]
async fn test_activation_endpoints() {
    let (api, client, _) = setup(Some("t"));
    client.set_handler(|_| Some(HttpResponse::new(200, "{}")));

    api.set_user_active("u1", false).await.unwrap();
    let req = client.last_request().unwrap();
    assert_eq!(req.method, HttpMethod::Put);
    assert_eq!(req.url, "http://api.test/auth/user/deactivate/u1");

    api.set_root_account_active("r1", true).await.unwrap();
    assert_eq!(
        client.last_request().unwrap().url,
        "http://api.test/auth/root/activate/r1"
    );
}

#[tokio::test]
async fn test_exchange_rate_round_trip() {
    let (api, client, _) = setup(Some("t"));
    client.add_response(
        "http://api.test/auth/get-rate",
        HttpResponse::new(200, r#"[{"value":"56.20"}]"#),
    );
    client.add_response(
        "http://api.test/auth/update-rate",
        HttpResponse::new(200, r#"{"exchangeRate":{"value":57.5}}"#),
    );

    assert_eq!(api.exchange_rate().await.unwrap(), 56.2);
    assert_eq!(api.update_exchange_rate(" 57.5 ").await.unwrap(), 57.5);

    let req = client.last_request().unwrap();
    assert_eq!(req.body.as_deref(), Some(r#"{"exchangeRate":57.5}"#));
}

#[tokio::test]
async fn test_invalid_rate_is_rejected_locally() {
    let (api, client, _) = setup(Some("t"));
    for input in ["", "abc", "-3", "0", "NaN", "inf"] {
        let err = api.update_exchange_rate(input).await.unwrap_err();
        assert_eq!(err.kind(), ErrorKind::Validation);
    }
    assert!(client.requests.borrow().is_empty());
}

#[tokio::test]
async fn test_empty_rate_list_is_decode_error() {
    let (api, client, _) = setup(Some("t"));
    client.add_response("http://api.test/auth/get-rate", HttpResponse::new(200, "[]"));
    assert_eq!(api.exchange_rate().await.unwrap_err().kind(), ErrorKind::Decode);
}
