//! API Integration Tests
//!
//! Every test starts its own server on the in-process store, so the first
//! account a test registers is that server's administrator. The PostgreSQL
//! smoke test at the bottom runs only when DATABASE_URL is set.
//!
//! Run with: cargo test -p integration-tests --test api_tests

use integration_tests::{
    assert_status, envelope, error_envelope, fixtures::*, postgres_config, TestServer,
};
use reqwest::StatusCode;

// ============================================================================
// Health Check Tests
// ============================================================================

#[tokio::test]
async fn test_health_check() {
    let server = TestServer::start().await.expect("Failed to start server");
    let visitor = server.visitor().unwrap();

    let response = visitor.get("/health").await.unwrap();
    let body: serde_json::Value = response.json().await.unwrap();
    assert_eq!(body["status"], "ok");

    let response = visitor.get("/health/ready").await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();
}

// ============================================================================
// Auth Tests
// ============================================================================

#[tokio::test]
async fn test_first_account_is_administrator() {
    let server = TestServer::start().await.expect("Failed to start server");

    let (_, admin) = server.signed_in().await.unwrap();
    assert_eq!(admin.user.role, "administrator");
    assert!(admin.user.capabilities.iter().any(|c| c == "delete_events"));
    assert_eq!(admin.token_type, "Bearer");
    assert!(!admin.token.is_empty());

    let (_, member) = server.signed_in().await.unwrap();
    assert_eq!(member.user.role, "subscriber");
    assert_eq!(member.user.capabilities, vec!["read".to_string()]);
}

#[tokio::test]
async fn test_register_duplicate_login() {
    let server = TestServer::start().await.expect("Failed to start server");
    let form = RegisterForm::unique();

    server.visitor().unwrap().register(&form).await.unwrap();

    let response = server
        .visitor()
        .unwrap()
        .post_form("/auth/register", &form)
        .await
        .unwrap();
    let error = error_envelope(response, StatusCode::CONFLICT).await.unwrap();
    assert_eq!(error.code, "conflict");
}

#[tokio::test]
async fn test_register_weak_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let mut form = RegisterForm::unique();
    form.password = "alllowercase".to_string();

    let response = server
        .visitor()
        .unwrap()
        .post_form("/auth/register", &form)
        .await
        .unwrap();
    let error = error_envelope(response, StatusCode::BAD_REQUEST).await.unwrap();
    assert_eq!(error.code, "validation_failed");
}

#[tokio::test]
async fn test_login_and_logout() {
    let server = TestServer::start().await.expect("Failed to start server");
    let form = RegisterForm::unique();
    server.visitor().unwrap().register(&form).await.unwrap();

    let visitor = server.visitor().unwrap();
    let response = visitor
        .post_form("/auth/login", &LoginForm::from_register(&form))
        .await
        .unwrap();
    let auth: AuthData = envelope(response, StatusCode::OK).await.unwrap();
    assert_eq!(auth.user.login, form.login);

    let me: UserData = envelope(visitor.get("/auth/me").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(me.email, form.email);

    let response = visitor.post_form("/auth/logout", &[("", "")]).await.unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let error = error_envelope(visitor.get("/auth/me").await.unwrap(), StatusCode::UNAUTHORIZED)
        .await
        .unwrap();
    assert_eq!(error.code, "auth");
}

#[tokio::test]
async fn test_login_wrong_password() {
    let server = TestServer::start().await.expect("Failed to start server");
    let form = RegisterForm::unique();
    server.visitor().unwrap().register(&form).await.unwrap();

    let mut login = LoginForm::from_register(&form);
    login.password = "WrongPass123".to_string();

    let response = server
        .visitor()
        .unwrap()
        .post_form("/auth/login", &login)
        .await
        .unwrap();
    let error = error_envelope(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.code, "invalid_credentials");
}

#[tokio::test]
async fn test_bearer_header_is_accepted() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (_, auth) = server.signed_in().await.unwrap();

    let response = reqwest::Client::new()
        .get(format!("{}/auth/me", server.base_url()))
        .bearer_auth(&auth.token)
        .send()
        .await
        .unwrap();
    let me: UserData = envelope(response, StatusCode::OK).await.unwrap();
    assert_eq!(me.id, auth.user.id);
}

// ============================================================================
// Toggle Tests
// ============================================================================

#[tokio::test]
async fn test_toggle_requires_session() {
    let server = TestServer::start().await.expect("Failed to start server");
    let anonymous = server.visitor().unwrap();

    let response = anonymous.toggle("favorite", 1).await.unwrap();
    let error = error_envelope(response, StatusCode::UNAUTHORIZED).await.unwrap();
    assert_eq!(error.code, "auth");
}

#[tokio::test]
async fn test_toggle_rejects_bad_nonce() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Basement Session").await.unwrap();
    let event_id = event.id.to_string();

    let response = admin
        .post_form(
            "/ajax/toggle/favorite",
            &[("event_id", event_id.as_str()), ("nonce", "forged")],
        )
        .await
        .unwrap();
    let error = error_envelope(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(error.code, "invalid_nonce");

    // Nothing was written
    let status: RelationStatusData = envelope(
        admin
            .get(&format!("/ajax/status/favorite/{}", event.id))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!status.active);
    assert_eq!(status.count, 0);
}

#[tokio::test]
async fn test_toggle_round_trip() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Open Air").await.unwrap();
    let (fan, _) = server.signed_in().await.unwrap();

    let added: ToggleData = envelope(fan.toggle("bookmark", event.id).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(added, ToggleData { state: "added".into(), count: 1 });

    let status: RelationStatusData = envelope(
        fan.get(&format!("/ajax/status/bookmark/{}", event.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(status.kind, "bookmark");
    assert!(status.active);
    assert_eq!(status.count, 1);

    let list: RelationListData = envelope(
        fan.get("/ajax/relations/bookmark").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(list.events.len(), 1);
    assert_eq!(list.events[0].title, "Open Air");

    let removed: ToggleData = envelope(fan.toggle("bookmark", event.id).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(removed, ToggleData { state: "removed".into(), count: 0 });

    // Other kinds were never touched
    let status: RelationStatusData = envelope(
        fan.get(&format!("/ajax/status/interest/{}", event.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert!(!status.active);
}

#[tokio::test]
async fn test_toggle_rejects_wrong_post_type() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let dj = admin.create_post("DJ Profile", "event_dj", "publish").await.unwrap();

    let error = error_envelope(admin.toggle("favorite", dj.id).await.unwrap(), StatusCode::BAD_REQUEST)
        .await
        .unwrap();
    assert_eq!(error.code, "invalid_reference");

    let error = error_envelope(admin.toggle("favorite", 999_999).await.unwrap(), StatusCode::BAD_REQUEST)
        .await
        .unwrap();
    assert_eq!(error.code, "invalid_reference");
}

#[tokio::test]
async fn test_toggle_unknown_kind() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Kinds").await.unwrap();

    let error = error_envelope(admin.toggle("like", event.id).await.unwrap(), StatusCode::BAD_REQUEST)
        .await
        .unwrap();
    assert_eq!(error.code, "validation_failed");
}

#[tokio::test]
async fn test_concurrent_toggles_keep_counter_exact() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Sold Out").await.unwrap();

    let mut fans = Vec::new();
    for _ in 0..8 {
        fans.push(server.signed_in().await.unwrap().0);
    }

    let mut handles = Vec::new();
    for fan in fans {
        let event_id = event.id;
        handles.push(tokio::spawn(async move {
            let response = fan.toggle("interest", event_id).await.unwrap();
            let data: ToggleData = envelope(response, StatusCode::OK).await.unwrap();
            assert_eq!(data.state, "added");
        }));
    }
    for handle in handles {
        handle.await.unwrap();
    }

    let status: RelationStatusData = envelope(
        admin.get(&format!("/ajax/status/interest/{}", event.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(status.count, 8);

    let meta: MetaData = envelope(
        admin.get(&format!("/events/{}/meta", event.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(meta.meta["_interest_count"], 8);
}

// ============================================================================
// View Tracking Tests
// ============================================================================

#[tokio::test]
async fn test_anonymous_views_and_stats() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Rooftop").await.unwrap();
    let anonymous = server.visitor().unwrap();

    for kind in ["page", "page", "popup"] {
        let response = anonymous.view(event.id, kind).await.unwrap();
        assert_status(response, StatusCode::OK).await.unwrap();
    }

    let snapshot: ViewSnapshotData = envelope(anonymous.view(event.id, "popup").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(snapshot.page_count, 2);
    assert_eq!(snapshot.popup_count, 2);
    assert_eq!(snapshot.total_count, 4);

    let stats: ViewStatsData = envelope(
        admin.get(&format!("/events/{}/stats", event.id)).await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(stats.object_id, event.id);
    assert_eq!(stats.total_count, 4);
    assert_eq!(stats.daily.len(), 1);
    assert_eq!(stats.daily[0].total, 4);
    assert_eq!(stats.daily[0].page + stats.daily[0].popup, 4);
}

#[tokio::test]
async fn test_view_unknown_event() {
    let server = TestServer::start().await.expect("Failed to start server");
    let anonymous = server.visitor().unwrap();

    let error = error_envelope(anonymous.view(424_242, "page").await.unwrap(), StatusCode::NOT_FOUND)
        .await
        .unwrap();
    assert_eq!(error.code, "not_found");
}

#[tokio::test]
async fn test_view_unknown_kind() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Kinds").await.unwrap();

    let error = error_envelope(admin.view(event.id, "banner").await.unwrap(), StatusCode::BAD_REQUEST)
        .await
        .unwrap();
    assert_eq!(error.code, "validation_failed");
}

#[tokio::test]
async fn test_stats_require_capability() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Private Numbers").await.unwrap();
    let (member, _) = server.signed_in().await.unwrap();

    let error = error_envelope(
        member.get(&format!("/events/{}/stats", event.id)).await.unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    assert_eq!(error.code, "forbidden");

    let error = error_envelope(
        member.get("/dashboard/top-events").await.unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    assert_eq!(error.code, "forbidden");
}

#[tokio::test]
async fn test_top_events_ordering() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let quiet = admin.create_event("Quiet").await.unwrap();
    let busy = admin.create_event("Busy").await.unwrap();

    admin.view(quiet.id, "page").await.unwrap();
    for _ in 0..3 {
        admin.view(busy.id, "page").await.unwrap();
    }

    let top: Vec<TopEventData> = envelope(
        admin.get("/dashboard/top-events?limit=5").await.unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    let titles: Vec<&str> = top.iter().map(|row| row.title.as_str()).collect();
    assert_eq!(titles, vec!["Busy", "Quiet"]);
    assert_eq!(top[0].total_count, 3);
}

// ============================================================================
// Event Listing And Meta Tests
// ============================================================================

#[tokio::test]
async fn test_subscriber_cannot_create_events() {
    let server = TestServer::start().await.expect("Failed to start server");
    server.signed_in().await.unwrap();
    let (member, _) = server.signed_in().await.unwrap();

    let nonce = member.nonce("edit_event").await.unwrap();
    let response = member
        .post_form("/events", &[("title", "Nope"), ("nonce", nonce.as_str())])
        .await
        .unwrap();
    let error = error_envelope(response, StatusCode::FORBIDDEN).await.unwrap();
    assert_eq!(error.code, "forbidden");
}

#[tokio::test]
async fn test_drafts_hidden_from_visitors() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    admin.create_event("Announced").await.unwrap();
    let draft = admin.create_post("Secret Lineup", "event_listing", "draft").await.unwrap();
    let anonymous = server.visitor().unwrap();

    let listed: Vec<EventData> = envelope(anonymous.get("/events").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(listed.len(), 1);
    assert_eq!(listed[0].title, "Announced");

    let error = error_envelope(
        anonymous.get(&format!("/events/{}", draft.id)).await.unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
    assert_eq!(error.code, "not_found");

    let listed: Vec<EventData> = envelope(admin.get("/events?status=any").await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(listed.len(), 2);

    // Engaging with a hidden draft looks the same as a missing event
    let (member, _) = server.signed_in().await.unwrap();
    let error = error_envelope(
        member.toggle("favorite", draft.id).await.unwrap(),
        StatusCode::BAD_REQUEST,
    )
    .await
    .unwrap();
    assert_eq!(error.code, "invalid_reference");

    let error = error_envelope(
        anonymous.view(draft.id, "page").await.unwrap(),
        StatusCode::NOT_FOUND,
    )
    .await
    .unwrap();
    assert_eq!(error.code, "not_found");
}

#[tokio::test]
async fn test_update_and_delete_event() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Old Name").await.unwrap();

    let nonce = admin.nonce("edit_event").await.unwrap();
    let updated: EventData = envelope(
        admin
            .post_form(
                &format!("/events/{}", event.id),
                &[("title", "New Name"), ("nonce", nonce.as_str())],
            )
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(updated.title, "New Name");

    let nonce = admin.nonce("edit_event").await.unwrap();
    let response = admin
        .post_form(&format!("/events/{}/delete", event.id), &[("nonce", nonce.as_str())])
        .await
        .unwrap();
    assert_status(response, StatusCode::OK).await.unwrap();

    let response = admin.get(&format!("/events/{}", event.id)).await.unwrap();
    assert_status(response, StatusCode::NOT_FOUND).await.unwrap();
}

#[tokio::test]
async fn test_meta_allow_list() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Meta Night").await.unwrap();

    let nonce = admin.nonce("edit_event").await.unwrap();
    let result: MetaUpdateData = envelope(
        admin
            .post_form(
                &format!("/events/{}/meta", event.id),
                &[
                    ("_event_location", "Warehouse 9"),
                    ("_event_banner", "https://cdn.example.com/banner.jpg"),
                    ("_tickets_ext", "javascript:alert(1)"),
                    ("_favorites_count", "500"),
                    ("_made_up", "x"),
                    ("nonce", nonce.as_str()),
                ],
            )
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();

    assert_eq!(result.saved.len(), 2);
    assert!(result.saved.contains(&"_event_location".to_string()));
    assert!(result.saved.contains(&"_event_banner".to_string()));

    let code_of = |key: &str| {
        result
            .rejected
            .iter()
            .find(|r| r.key == key)
            .map(|r| r.code.clone())
    };
    assert_eq!(code_of("_tickets_ext").as_deref(), Some("validation_failed"));
    assert_eq!(code_of("_favorites_count").as_deref(), Some("invalid_key"));
    assert_eq!(code_of("_made_up").as_deref(), Some("invalid_key"));

    let meta: MetaData = envelope(
        server
            .visitor()
            .unwrap()
            .get(&format!("/events/{}/meta", event.id))
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(meta.post_id, event.id);
    assert_eq!(meta.meta["_event_location"], "Warehouse 9");
    assert!(!meta.meta.contains_key("_favorites_count"));

    let nonce = admin.nonce("edit_event").await.unwrap();
    let response = admin
        .post_form(
            &format!("/events/{}/meta/delete", event.id),
            &[("key", "_event_location"), ("nonce", nonce.as_str())],
        )
        .await
        .unwrap();
    let deleted: serde_json::Value = envelope(response, StatusCode::OK).await.unwrap();
    assert_eq!(deleted["deleted"], true);
}

#[tokio::test]
async fn test_card_escapes_html() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("<script>alert(1)</script>").await.unwrap();
    admin.toggle("favorite", event.id).await.unwrap();

    let response = server
        .visitor()
        .unwrap()
        .get(&format!("/events/{}/card", event.id))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let html = response.text().await.unwrap();

    assert!(html.contains("&lt;script&gt;alert(1)&lt;/script&gt;"));
    assert!(!html.contains("<script>"));
    assert!(html.contains(r#"<li data-kind="favorite">1</li>"#));
}

// ============================================================================
// Administration Tests
// ============================================================================

#[tokio::test]
async fn test_recount() {
    let server = TestServer::start().await.expect("Failed to start server");
    let (admin, _) = server.signed_in().await.unwrap();
    let event = admin.create_event("Recount").await.unwrap();
    admin.toggle("favorite", event.id).await.unwrap();

    let nonce = admin.nonce("admin").await.unwrap();
    let report: ReconcileData = envelope(
        admin
            .post_form("/admin/recount", &[("nonce", nonce.as_str())])
            .await
            .unwrap(),
        StatusCode::OK,
    )
    .await
    .unwrap();
    assert_eq!(report.events_scanned, 1);
    // Bookmark and interest had no stored counter yet
    assert_eq!(report.counters_changed, 2);

    let (member, _) = server.signed_in().await.unwrap();
    let nonce = member.nonce("admin").await.unwrap();
    let error = error_envelope(
        member
            .post_form("/admin/recount", &[("nonce", nonce.as_str())])
            .await
            .unwrap(),
        StatusCode::FORBIDDEN,
    )
    .await
    .unwrap();
    assert_eq!(error.code, "forbidden");
}

// ============================================================================
// PostgreSQL Smoke Test
// ============================================================================

#[tokio::test]
async fn test_postgres_toggle_round_trip() {
    let Some(config) = postgres_config() else {
        eprintln!("Skipping test: DATABASE_URL not set");
        return;
    };

    let server = TestServer::start_with_config(config)
        .await
        .expect("Failed to start server");
    let (author, auth) = server.signed_in().await.unwrap();

    // A shared database may already have an administrator
    if auth.user.role != "administrator" {
        eprintln!("Skipping test: database already has accounts");
        return;
    }

    let event = author.create_event("Postgres Night").await.unwrap();
    let added: ToggleData = envelope(author.toggle("favorite", event.id).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(added.count, 1);

    let removed: ToggleData = envelope(author.toggle("favorite", event.id).await.unwrap(), StatusCode::OK)
        .await
        .unwrap();
    assert_eq!(removed.count, 0);
}
