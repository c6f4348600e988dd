//! Route guards and access-code unlocks

#[cfg(test)]
mod tests {
    use crate::common::TestPortal;
    use crate::common::assertions::{assert_error, assert_redirect, data};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use society_portal::models::Role;
    use society_portal::server::HttpServer;

    // ==================== Guards ====================

    #[actix_web::test]
    async fn test_anonymous_caller_is_sent_to_login() {
        let portal = TestPortal::new().await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        for uri in ["/api/admin/dashboard", "/api/cards/me", "/api/transparency", "/api/auth/me"] {
            let resp =
                test::call_service(&app, test::TestRequest::get().uri(uri).to_request()).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            assert_error(status, &body, StatusCode::UNAUTHORIZED, "UNAUTHORIZED");
            assert_redirect(&body, "/login");
        }
    }

    #[actix_web::test]
    async fn test_garbage_token_is_treated_as_anonymous() {
        let portal = TestPortal::new().await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", "Bearer not-a-jwt"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_member_on_admin_route_goes_to_transparency() {
        let portal = TestPortal::new().await;
        let member = portal.member("nimal@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .insert_header(("Authorization", portal.bearer(&member)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;

        assert_error(status, &body, StatusCode::FORBIDDEN, "ACCESS_DENIED");
        assert_redirect(&body, "/transparency");
    }

    #[actix_web::test]
    async fn test_locked_feature_goes_home() {
        let portal = TestPortal::new().await;
        let member = portal.member("nimal@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::get()
            .uri("/api/cards/me")
            .insert_header(("Authorization", portal.bearer(&member)))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;

        assert_error(status, &body, StatusCode::FORBIDDEN, "ACCESS_DENIED");
        assert_redirect(&body, "/");
    }

    #[actix_web::test]
    async fn test_admin_passes_feature_gates_without_codes() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("secretary@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&admin);

        for uri in ["/api/cards/me", "/api/transparency", "/api/admin/dashboard"] {
            let req = test::TestRequest::get()
                .uri(uri)
                .insert_header(("Authorization", bearer.clone()))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK, "{}", uri);
        }
    }

    // ==================== Access codes ====================

    #[actix_web::test]
    async fn test_id_code_unlocks_only_the_id_feature() {
        let portal = TestPortal::new().await;
        let member = portal.member("nimal@ncss.lk").await;
        portal.assign_codes(&member.uid, "ID-7741", "TR-1902").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&member);

        let req = test::TestRequest::post()
            .uri("/api/access/verify")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({ "code": "ID-7741" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(data(&body)["unlocked"], json!(["id_card"]));
        assert_eq!(data(&body)["access"]["id_card"], "unlocked");
        assert_eq!(data(&body)["access"]["transparency"], "locked");

        let req = test::TestRequest::get()
            .uri("/api/cards/me")
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/transparency")
            .insert_header(("Authorization", bearer))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);
    }

    #[actix_web::test]
    async fn test_wrong_code_is_rejected_and_nothing_unlocks() {
        let portal = TestPortal::new().await;
        let member = portal.member("nimal@ncss.lk").await;
        portal.assign_codes(&member.uid, "ID-7741", "TR-1902").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&member);

        for code in ["id-7741", "TR-1903", "ID-7741 "] {
            let req = test::TestRequest::post()
                .uri("/api/access/verify")
                .insert_header(("Authorization", bearer.clone()))
                .set_json(json!({ "code": code }))
                .to_request();
            let resp = test::call_service(&app, req).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            assert_error(status, &body, StatusCode::BAD_REQUEST, "INVALID_CODE");
        }

        let req = test::TestRequest::post()
            .uri("/api/access/verify")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({ "code": "" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");

        let req = test::TestRequest::get()
            .uri("/api/access")
            .insert_header(("Authorization", bearer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["id_card"], "locked");
        assert_eq!(data(&body)["transparency"], "locked");
    }

    #[actix_web::test]
    async fn test_unlock_is_scoped_to_the_session() {
        let portal = TestPortal::new().await;
        let member = portal.member("nimal@ncss.lk").await;
        portal.assign_codes(&member.uid, "ID-7741", "TR-1902").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let first = portal.bearer(&member);
        let second = portal.bearer(&member);

        let req = test::TestRequest::post()
            .uri("/api/access/verify")
            .insert_header(("Authorization", first.clone()))
            .set_json(json!({ "code": "TR-1902" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/transparency")
            .insert_header(("Authorization", second))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::post()
            .uri("/api/auth/logout")
            .insert_header(("Authorization", first.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/transparency")
            .insert_header(("Authorization", first))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::UNAUTHORIZED);
    }

    #[actix_web::test]
    async fn test_identical_codes_unlock_both_features() {
        let portal = TestPortal::new().await;
        let member = portal.member("nimal@ncss.lk").await;
        portal.assign_codes(&member.uid, "SAME-1", "SAME-1").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::post()
            .uri("/api/access/verify")
            .insert_header(("Authorization", portal.bearer(&member)))
            .set_json(json!({ "code": "SAME-1" }))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["unlocked"], json!(["id_card", "transparency"]));
    }

    // ==================== Account administration ====================

    #[actix_web::test]
    async fn test_admin_cannot_touch_super_admin_accounts() {
        let portal = TestPortal::new().await;
        let root = portal.user("root@ncss.lk", Role::SuperAdmin).await;
        let admin = portal.admin("kamal@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&admin);

        let attempts = [
            test::TestRequest::put()
                .uri(&format!("/api/admin/users/{}/role", root.uid))
                .set_json(json!({ "role": "USER" })),
            test::TestRequest::put()
                .uri(&format!("/api/admin/users/{}/codes", root.uid))
                .set_json(json!({ "accessCode": "X-1" })),
            test::TestRequest::delete().uri(&format!("/api/admin/users/{}", root.uid)),
        ];
        for attempt in attempts {
            let resp = test::call_service(
                &app,
                attempt.insert_header(("Authorization", bearer.clone())).to_request(),
            )
            .await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            assert_error(status, &body, StatusCode::FORBIDDEN, "FORBIDDEN");
        }

        let stored = portal.state.users.get(&root.uid).await.unwrap().unwrap();
        assert_eq!(stored.role, Role::SuperAdmin);
        assert!(stored.access_code.is_none());
    }

    #[actix_web::test]
    async fn test_admin_manages_member_accounts() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("kamal@ncss.lk").await;
        let member = portal.member("nimal@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&admin);

        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/users/{}/role", member.uid))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({ "role": "MEMBER_ADMIN" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/users/{}/role", member.uid))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({ "role": "SUPER_ADMIN" }))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::FORBIDDEN);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/admin/users/{}", member.uid))
            .insert_header(("Authorization", bearer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["deleted"], true);
        assert!(portal.state.users.get(&member.uid).await.unwrap().is_none());
    }
}
