//! The portal over the SQLite document store

#[cfg(test)]
mod tests {
    use crate::common::assertions::{assert_error, data};
    use crate::common::{StubPhotos, TestDatabase, TestPortal};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use society_portal::Config;
    use society_portal::server::HttpServer;
    use std::sync::Arc;

    async fn sql_portal(allow_signup: bool) -> TestPortal {
        let db = TestDatabase::new().await;
        let mut config = Config::default();
        config.portal.auth.allow_signup = allow_signup;
        TestPortal::with_parts(Arc::new(db.store), StubPhotos::default(), config).await
    }

    #[actix_web::test]
    async fn test_registration_is_closed_by_default() {
        let portal = sql_portal(false).await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"name": "Kasun", "email": "kasun@ncss.lk", "password": "orbit-2025"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        assert_error(status, &body, StatusCode::FORBIDDEN, "FORBIDDEN");
    }

    #[actix_web::test]
    async fn test_register_login_and_me() {
        let portal = sql_portal(true).await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::post()
            .uri("/api/auth/register")
            .set_json(json!({"name": "Kasun", "email": "Kasun@NCSS.lk", "password": "orbit-2025"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        assert_eq!(data(&body)["role"], "USER");

        // Email lookup ignores case
        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "kasun@ncss.lk", "password": "orbit-2025"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let token = data(&body)["access_token"].as_str().unwrap().to_string();
        assert_eq!(data(&body)["token_type"], "Bearer");

        let req = test::TestRequest::get()
            .uri("/api/auth/me")
            .insert_header(("Authorization", format!("Bearer {}", token)))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["user"]["name"], "Kasun");
        assert_eq!(data(&body)["access"]["id_card"], "locked");

        let req = test::TestRequest::post()
            .uri("/api/auth/login")
            .set_json(json!({"email": "kasun@ncss.lk", "password": "wrong-pass"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        assert_error(status, &body, StatusCode::UNAUTHORIZED, "AUTH_ERROR");
    }

    #[actix_web::test]
    async fn test_dashboard_follows_sql_writes() {
        let portal = sql_portal(false).await;
        let admin = portal.admin("treasurer@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&admin);

        let req = test::TestRequest::post()
            .uri("/api/admin/funds")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({"type": "income", "amount": 250.0, "date": "2024-08-01"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = data(&body)["id"].as_str().unwrap().to_string();

        let req = test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["netBalance"], 250.0);

        let req = test::TestRequest::delete()
            .uri(&format!("/api/admin/funds/{}", id))
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["deleted"], true);

        let req = test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .insert_header(("Authorization", bearer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["netBalance"], 0.0);
    }
}
