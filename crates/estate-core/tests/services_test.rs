#![allow(clippy::unwrap_used)]
// Integration tests for the resource services using wiremock.

use std::sync::Arc;

use pretty_assertions::assert_eq;
use secrecy::{ExposeSecret, SecretString};
use serde_json::json;
use url::Url;
use wiremock::matchers::{body_partial_json, header, header_exists, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

use estate_api::models::{
    CompanySection, ContactStatus, ContactSubmission, ContactUpdate, PublishStatus,
};
use estate_api::{ApiClient, ClientConfig, MemorySessionStore, SessionStore, UploadFile};
use estate_core::filter::{ContactFilter, NewsFilter};
use estate_core::service::{
    AuthService, CompanyService, ContactService, NewsService, ProjectService, SettingsService,
    UploadService,
};
use estate_core::{Choice, CoreError, ListQuery};

const PNG_HEADER: [u8; 8] = [0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];

async fn setup_with(store: MemorySessionStore) -> (MockServer, Arc<ApiClient>) {
    let server = MockServer::start().await;
    let base_url = Url::parse(&format!("{}/api", server.uri())).unwrap();
    let client = Arc::new(ApiClient::new(&ClientConfig::new(base_url), Arc::new(store)).unwrap());
    (server, client)
}

async fn setup() -> (MockServer, Arc<ApiClient>) {
    setup_with(MemorySessionStore::with_token("tok-123")).await
}

// ── Auth ────────────────────────────────────────────────────────────

#[tokio::test]
async fn test_login_stores_token_and_logout_clears_it() {
    let (server, client) = setup_with(MemorySessionStore::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/admin/auth/login"))
        .and(body_partial_json(json!({ "email": "admin@estate.vn", "password": "s3cret" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "token": "jwt-abc",
                "user": { "_id": "u1", "email": "admin@estate.vn", "role": "admin" }
            }
        })))
        .mount(&server)
        .await;

    Mock::given(method("POST"))
        .and(path("/api/admin/auth/logout"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let auth = AuthService::new(Arc::clone(&client));
    let user = auth
        .login("admin@estate.vn", SecretString::from("s3cret".to_owned()))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(user.id, "u1");
    let token = client.store().access_token().unwrap();
    assert_eq!(token.expose_secret(), "jwt-abc");

    // A failing logout request still clears the local session.
    auth.logout().await.unwrap();
    assert!(client.store().access_token().is_none());
}

#[tokio::test]
async fn test_login_rejected_uses_backend_message() {
    let (server, client) = setup_with(MemorySessionStore::new()).await;

    Mock::given(method("POST"))
        .and(path("/api/admin/auth/login"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": false,
            "message": "Tài khoản đã bị khóa"
        })))
        .mount(&server)
        .await;

    let err = AuthService::new(Arc::clone(&client))
        .login("admin@estate.vn", SecretString::from("x".to_owned()))
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Rejected { .. }));
    assert_eq!(err.to_string(), "Tài khoản đã bị khóa");
    assert!(client.store().access_token().is_none());
}

#[tokio::test]
async fn test_login_401_is_wrong_credentials_not_expiry() {
    let (server, client) = setup_with(MemorySessionStore::new()).await;
    let mut events = client.subscribe();

    Mock::given(method("POST"))
        .and(path("/api/admin/auth/login"))
        .respond_with(ResponseTemplate::new(401).set_body_json(json!({ "success": false })))
        .mount(&server)
        .await;

    let err = AuthService::new(Arc::clone(&client))
        .login("admin@estate.vn", SecretString::from("wrong".to_owned()))
        .await
        .unwrap_err();
    assert!(!err.is_session_expired());
    assert!(matches!(err, CoreError::Unauthorized { .. }));
    assert_eq!(err.to_string(), "Email hoặc mật khẩu không đúng");
    assert!(events.try_recv().is_err(), "a failed login publishes no session event");
}

// ── Lists ───────────────────────────────────────────────────────────

#[tokio::test]
async fn test_news_list_forwards_filter_and_paging() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/news"))
        .and(query_param("status", "published"))
        .and(query_param("category", "thi-truong"))
        .and(query_param("page", "2"))
        .and(query_param("limit", "5"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": {
                "news": [{ "_id": "n1", "title": "Thị trường quý 3", "status": "published" }],
                "pagination": { "page": 2, "limit": 5, "total": 6 }
            }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let mut query = ListQuery::new(NewsFilter {
        category: "thi-truong".into(),
        status: Choice::Only(PublishStatus::Published),
        ..NewsFilter::default()
    });
    query.page = 2;
    query.limit = 5;

    let listing = NewsService::new(client).list(&query).await.unwrap();
    assert_eq!(listing.items.len(), 1);
    assert_eq!(listing.items[0].title, "Thị trường quý 3");
    assert_eq!(listing.total, 6);
    assert_eq!(listing.page, 2);
}

#[tokio::test]
async fn test_contact_list_omits_all_choice() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/contacts"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": [{ "_id": "c1", "name": "Lan", "status": "new" }]
        })))
        .mount(&server)
        .await;

    let listing = ContactService::new(client)
        .list(&ListQuery::new(ContactFilter::default()))
        .await
        .unwrap();
    assert_eq!(listing.items[0].status, ContactStatus::New);

    let requests = server.received_requests().await.unwrap();
    let query = requests[0].url.query().unwrap_or_default().to_owned();
    assert!(!query.contains("status"), "query was {query}");
}

// ── Contacts ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_contact_submit_and_triage() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/client/contacts"))
        .and(body_partial_json(json!({ "name": "Lan", "message": "Xin báo giá" })))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": { "_id": "c9", "name": "Lan", "message": "Xin báo giá" }
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/contacts/c9"))
        .and(body_partial_json(json!({ "status": "resolved" })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "_id": "c9", "name": "Lan", "status": "resolved", "note": "Đã gọi lại" }
        })))
        .mount(&server)
        .await;

    let contacts = ContactService::new(client);
    let submitted = contacts
        .submit(&ContactSubmission {
            name: "Lan".into(),
            email: "lan@example.vn".into(),
            message: "Xin báo giá".into(),
            ..ContactSubmission::default()
        })
        .await
        .unwrap();
    assert_eq!(submitted.status, ContactStatus::New);

    let updated = contacts
        .update(
            "c9",
            &ContactUpdate {
                status: Some(ContactStatus::Resolved),
                note: Some("Đã gọi lại".into()),
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.status, ContactStatus::Resolved);
    assert_eq!(updated.note.as_deref(), Some("Đã gọi lại"));
}

// ── Projects ────────────────────────────────────────────────────────

#[tokio::test]
async fn test_project_with_images_goes_multipart() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/projects"))
        .and(header_exists("content-type"))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({
            "success": true,
            "data": { "_id": "p1", "name": "Sunrise", "images": ["/uploads/cover.png"] }
        })))
        .mount(&server)
        .await;

    let draft = estate_api::models::ProjectDraft {
        name: "Sunrise".into(),
        location: "Thủ Đức".into(),
        price: estate_api::models::PriceRange {
            min: 1.0,
            max: 2.0,
            ..Default::default()
        },
        area: estate_api::models::AreaRange {
            min: 40.0,
            max: 90.0,
            ..Default::default()
        },
        ..Default::default()
    };
    let project = ProjectService::new(client)
        .create_project(draft, vec![UploadFile::new("cover.png", PNG_HEADER.to_vec())])
        .await
        .unwrap();
    assert_eq!(project.images, vec!["/uploads/cover.png"]);

    let requests = server.received_requests().await.unwrap();
    let content_type = requests[0]
        .headers
        .get("content-type")
        .unwrap()
        .to_str()
        .unwrap()
        .to_owned();
    assert!(content_type.starts_with("multipart/form-data"), "{content_type}");
    let body = String::from_utf8_lossy(&requests[0].body);
    assert!(body.contains("name=\"images\"; filename=\"cover.png\""));
    assert!(body.contains("name=\"slug\""));
}

#[tokio::test]
async fn test_project_not_found_carries_status() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/projects/missing"))
        .respond_with(
            ResponseTemplate::new(404).set_body_json(json!({ "message": "Không tìm thấy dự án" })),
        )
        .mount(&server)
        .await;

    let err = ProjectService::new(client)
        .get_project("missing")
        .await
        .unwrap_err();
    assert_eq!(err.status(), Some(404));
    assert_eq!(err.to_string(), "Không tìm thấy dự án");
}

// ── Uploads ─────────────────────────────────────────────────────────

#[tokio::test]
async fn test_upload_images_returns_urls_in_order() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/upload/images"))
        .and(header("authorization", "Bearer tok-123"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "images": [{ "url": "/u/a.png" }, "/u/b.png"] }
        })))
        .mount(&server)
        .await;

    let urls = UploadService::new(client)
        .upload_images(vec![
            UploadFile::new("a.png", PNG_HEADER.to_vec()),
            UploadFile::new("b.png", PNG_HEADER.to_vec()),
        ])
        .await
        .unwrap();
    assert_eq!(urls, vec!["/u/a.png", "/u/b.png"]);
}

// ── Company & settings ──────────────────────────────────────────────

#[tokio::test]
async fn test_company_section_round_trip_keeps_extra_fields() {
    let (server, client) = setup().await;

    Mock::given(method("GET"))
        .and(path("/api/admin/company-info/leadership"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "title": "Ban lãnh đạo", "members": [{ "name": "An" }] }
        })))
        .mount(&server)
        .await;

    Mock::given(method("PUT"))
        .and(path("/api/admin/company-info/leadership"))
        .and(body_partial_json(json!({ "title": "Ban điều hành", "members": [{ "name": "An" }] })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "data": { "title": "Ban điều hành", "members": [{ "name": "An" }] }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let company = CompanyService::new(client);
    let mut info = company.get_section(CompanySection::Leadership).await.unwrap();
    info.title = "Ban điều hành".into();
    let saved = company
        .update_section(CompanySection::Leadership, &info)
        .await
        .unwrap();
    assert_eq!(saved.title, "Ban điều hành");
    assert!(saved.extra.contains_key("members"));
}

#[tokio::test]
async fn test_backup_restore_returns_backend_message() {
    let (server, client) = setup().await;

    Mock::given(method("POST"))
        .and(path("/api/admin/settings/backups/b1/restore"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "success": true,
            "message": "Khôi phục thành công"
        })))
        .expect(1)
        .mount(&server)
        .await;

    let message = SettingsService::new(client)
        .restore_backup("b1")
        .await
        .unwrap();
    assert_eq!(message.as_deref(), Some("Khôi phục thành công"));
}

#[tokio::test]
async fn test_network_failure_uses_fallback_message() {
    let store = Arc::new(MemorySessionStore::new());
    let config = ClientConfig::new(Url::parse("http://127.0.0.1:1/api").unwrap());
    let client = Arc::new(ApiClient::new(&config, store).unwrap());

    let err = SettingsService::new(client)
        .list_backups()
        .await
        .unwrap_err();
    assert!(matches!(err, CoreError::Network { .. }));
    assert_eq!(err.to_string(), "Không thể tải danh sách bản sao lưu");
}
