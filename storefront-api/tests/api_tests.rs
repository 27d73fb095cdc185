//! End-to-end tests for the storefront API surface.
//!
//! Wires the in-memory stores through the real services and drives the
//! router with `tower::ServiceExt::oneshot`.

use std::sync::Arc;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use http_body_util::BodyExt;
use serde_json::{json, Value};
use tower::ServiceExt;
use uuid::Uuid;

use storefront_access::{
    AuthorizationGate, InvitationLifecycle, MembershipResolver, MembershipStore,
    MemoryInvitationStore, MemoryMembershipStore, MemoryUserDirectory,
};
use storefront_api::{router, AppState};
use storefront_org::{BuiltinRole, Organization, OrganizationMember, RoleCatalog};
use storefront_rbac::PermissionMatrix;
use storefront_tenancy::{MemoryTenantStore, RoutingConfig, TenantDirectory, TenantStore};

struct TestContext {
    app: Router,
    memberships: Arc<MemoryMembershipStore>,
    users: Arc<MemoryUserDirectory>,
    catalog: Arc<RoleCatalog>,
    org: Organization,
    owner: Uuid,
}

async fn context() -> TestContext {
    let config = RoutingConfig {
        base_domain: "jmarkets.example.dev".to_string(),
        store_ports: vec![3001],
        storage_timeout_secs: 1,
        tenant_cache_ttl_secs: 600,
    };

    let tenants = Arc::new(MemoryTenantStore::new());
    let memberships = Arc::new(MemoryMembershipStore::new());
    let invitations = Arc::new(MemoryInvitationStore::new());
    let users = Arc::new(MemoryUserDirectory::new());
    let catalog = Arc::new(RoleCatalog::with_builtins());
    let matrix = Arc::new(PermissionMatrix::with_system_roles(&catalog));

    let owner = Uuid::now_v7();
    let org = Organization::new("Acme Outfitters", "acme-outfitters", owner).with_subdomain("acme");
    tenants.insert(org.clone()).await.unwrap();
    users.register(owner, "owner@acme.test").await;
    memberships
        .insert(
            OrganizationMember::new(org.id, owner, catalog.builtin(BuiltinRole::Owner).id)
                .as_default(),
        )
        .await
        .unwrap();

    let directory = Arc::new(TenantDirectory::new(tenants.clone(), config));
    let resolver = Arc::new(MembershipResolver::new(
        memberships.clone(),
        tenants.clone(),
        catalog.clone(),
    ));
    let gate = Arc::new(AuthorizationGate::new(resolver.clone(), matrix));
    let lifecycle = Arc::new(InvitationLifecycle::new(
        invitations,
        memberships.clone(),
        users.clone(),
        tenants,
        catalog.clone(),
    ));

    let state = AppState::new(
        directory,
        resolver,
        gate,
        lifecycle,
        memberships.clone(),
    );
    TestContext {
        app: router(state),
        memberships,
        users,
        catalog,
        org,
        owner,
    }
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    serde_json::from_slice(&bytes).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

fn request_with_json(method: &str, uri: &str, body: Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

#[tokio::test]
async fn availability_checks_return_booleans() {
    let ctx = context().await;

    let response = ctx
        .app
        .clone()
        .oneshot(get("/public/organizations/check-slug/fresh-name"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await, json!({"available": true}));

    // Reserved names are unavailable even with no record behind them.
    let response = ctx
        .app
        .clone()
        .oneshot(get("/public/organizations/check-slug/www"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!({"available": false}));

    // Claimed subdomains are unavailable.
    let response = ctx
        .app
        .clone()
        .oneshot(get("/public/organizations/check-subdomain/acme"))
        .await
        .unwrap();
    assert_eq!(json_body(response).await, json!({"available": false}));
}

#[tokio::test]
async fn routing_decision_resolves_tenant_or_falls_back() {
    let ctx = context().await;

    let request = Request::builder()
        .uri("/routing/decision")
        .header(header::HOST, "acme.jmarkets.example.dev")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["kind"], "storefront");
    assert_eq!(body["organization"]["slug"], "acme-outfitters");

    // Unknown subdomains fall back to the landing experience, not an error.
    let request = Request::builder()
        .uri("/routing/decision")
        .header(header::HOST, "ghost.jmarkets.example.dev")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["kind"], "landing");

    let request = Request::builder()
        .uri("/routing/decision")
        .header(header::HOST, "localhost:3001")
        .body(Body::empty())
        .unwrap();
    let response = ctx.app.clone().oneshot(request).await.unwrap();
    let body = json_body(response).await;
    assert_eq!(body["kind"], "local_storefront");
    assert_eq!(body["port"], 3001);
}

#[tokio::test]
async fn invitation_flow_end_to_end() {
    let ctx = context().await;
    let staff_role = ctx.catalog.builtin(BuiltinRole::Staff).id;
    let invitee = Uuid::now_v7();
    ctx.users.register(invitee, "pat@acme.test").await;

    // Owner issues an invitation.
    let uri = format!(
        "/users/{}/organizations/{}/invitations",
        ctx.owner, ctx.org.id
    );
    let response = ctx
        .app
        .clone()
        .oneshot(request_with_json(
            "POST",
            &uri,
            json!({"email": "pat@acme.test", "role_id": staff_role}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CREATED);
    let invitation = json_body(response).await;
    let token = invitation["token"].as_str().unwrap().to_string();

    // The preview is readable without authentication.
    let response = ctx
        .app
        .clone()
        .oneshot(get(&format!("/public/invitations/token/{token}")))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let preview = json_body(response).await;
    assert_eq!(preview["organization_name"], "Acme Outfitters");
    assert_eq!(preview["status"], "pending");
    assert_eq!(preview["expired"], false);

    // A mismatched account email is rejected.
    let response = ctx
        .app
        .clone()
        .oneshot(request_with_json(
            "POST",
            &format!("/public/invitations/accept/{token}"),
            json!({"user_id": invitee, "email": "impostor@elsewhere.test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(
        json_body(response).await["error"],
        "INVITATION_EMAIL_MISMATCH"
    );

    // The invited address joins.
    let response = ctx
        .app
        .clone()
        .oneshot(request_with_json(
            "POST",
            &format!("/public/invitations/accept/{token}"),
            json!({"user_id": invitee, "email": "pat@acme.test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    let member = json_body(response).await;
    assert_eq!(member["organization_id"], json!(ctx.org.id));

    // A second accept observes the resolved invitation.
    let response = ctx
        .app
        .clone()
        .oneshot(request_with_json(
            "POST",
            &format!("/public/invitations/accept/{token}"),
            json!({"user_id": invitee, "email": "pat@acme.test"}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);

    // The owner sees both members.
    let uri = format!("/users/{}/organizations/{}/members", ctx.owner, ctx.org.id);
    let response = ctx.app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await.as_array().unwrap().len(), 2);
}

#[tokio::test]
async fn unknown_invitation_token_is_not_found() {
    let ctx = context().await;
    let response = ctx
        .app
        .clone()
        .oneshot(get("/public/invitations/token/no-such-token"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn organization_scoped_routes_pass_the_gate() {
    let ctx = context().await;
    let staff_role = ctx.catalog.builtin(BuiltinRole::Staff).id;

    // A stranger is denied as a non-member.
    let stranger = Uuid::now_v7();
    let uri = format!("/users/{stranger}/organizations/{}/members", ctx.org.id);
    let response = ctx.app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(json_body(response).await["error"], "NOT_A_MEMBER");

    // Staff hold no member-management permissions, so the same routes
    // deny them with the insufficient-permission reason instead.
    let staff_user = Uuid::now_v7();
    ctx.memberships
        .insert(OrganizationMember::new(ctx.org.id, staff_user, staff_role))
        .await
        .unwrap();

    let uri = format!("/users/{staff_user}/organizations/{}/members", ctx.org.id);
    let response = ctx.app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
    assert_eq!(
        json_body(response).await["error"],
        "INSUFFICIENT_PERMISSION"
    );

    let uri = format!(
        "/users/{staff_user}/organizations/{}/invitations",
        ctx.org.id
    );
    let response = ctx
        .app
        .clone()
        .oneshot(request_with_json(
            "POST",
            &uri,
            json!({"email": "new@acme.test", "role_id": staff_role}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::FORBIDDEN);
}

#[tokio::test]
async fn owner_can_change_a_member_role() {
    let ctx = context().await;
    let staff_role = ctx.catalog.builtin(BuiltinRole::Staff).id;
    let manager_role = ctx.catalog.builtin(BuiltinRole::Manager).id;

    let member_user = Uuid::now_v7();
    ctx.memberships
        .insert(OrganizationMember::new(ctx.org.id, member_user, staff_role))
        .await
        .unwrap();

    let uri = format!(
        "/users/{}/organizations/{}/members/{member_user}/role",
        ctx.owner, ctx.org.id
    );
    let response = ctx
        .app
        .clone()
        .oneshot(request_with_json(
            "PUT",
            &uri,
            json!({"role_id": manager_role}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["role_id"], json!(manager_role));

    // An unknown or foreign role is rejected before any mutation.
    let response = ctx
        .app
        .clone()
        .oneshot(request_with_json(
            "PUT",
            &uri,
            json!({"role_id": Uuid::now_v7()}),
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::CONFLICT);
    assert_eq!(json_body(response).await["error"], "ROLE_NOT_ASSIGNABLE");
}

#[tokio::test]
async fn assignable_roles_never_include_platform_admin() {
    let ctx = context().await;
    let uri = format!("/users/{}/organizations/{}/roles", ctx.owner, ctx.org.id);
    let response = ctx.app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let roles = json_body(response).await;
    let names: Vec<&str> = roles
        .as_array()
        .unwrap()
        .iter()
        .map(|r| r["name"].as_str().unwrap())
        .collect();
    assert_eq!(names.len(), 4);
    assert!(!names.contains(&"platform_admin"));
}

#[tokio::test]
async fn default_organization_round_trip() {
    let ctx = context().await;

    let uri = format!("/users/{}/organizations/default", ctx.owner);
    let response = ctx.app.clone().oneshot(get(&uri)).await.unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert_eq!(json_body(response).await["id"], json!(ctx.org.id));

    let uri = format!(
        "/users/{}/organizations/{}/default",
        ctx.owner, ctx.org.id
    );
    let response = ctx
        .app
        .clone()
        .oneshot(
            Request::builder()
                .method("PUT")
                .uri(uri)
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::NO_CONTENT);

    let uri = format!("/users/{}/organizations", ctx.owner);
    let response = ctx.app.clone().oneshot(get(&uri)).await.unwrap();
    let summaries = json_body(response).await;
    assert_eq!(summaries[0]["is_default"], true);
    assert_eq!(summaries[0]["role_name"], "owner");
}
