//! Dashboard figures, funds ledger and funding requests

#[cfg(test)]
mod tests {
    use crate::common::TestPortal;
    use crate::common::assertions::{assert_error, data};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use chrono::Utc;
    use serde_json::{Value, json};
    use society_portal::server::HttpServer;

    #[actix_web::test]
    async fn test_dashboard_reflects_ledger_and_requests() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("treasurer@ncss.lk").await;
        let member = portal.member("nimal@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let admin_bearer = portal.bearer(&admin);
        let today = Utc::now().format("%Y-%m-%d").to_string();

        let entries = [
            json!({"type": "income", "amount": 100.0, "description": "Dues", "date": "2019-03-01"}),
            json!({"type": "Income", "amount": 50.0, "description": "Sponsor", "date": today}),
            json!({"type": "expense", "amount": 30.0, "description": "Posters", "date": today}),
        ];
        for entry in entries {
            let req = test::TestRequest::post()
                .uri("/api/admin/funds")
                .insert_header(("Authorization", admin_bearer.clone()))
                .set_json(entry)
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::post()
            .uri("/api/requests")
            .insert_header(("Authorization", portal.bearer(&member)))
            .set_json(json!({"projectName": "Telescope repair", "amount": 75.0, "description": "Lens"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .insert_header(("Authorization", admin_bearer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let summary = data(&body);

        assert_eq!(summary["netBalance"], 120.0);
        assert_eq!(summary["monthlyIncome"], 50.0);
        assert_eq!(summary["pendingCount"], 1);
        assert_eq!(summary["totalUsers"], 2);
        assert_eq!(summary["recentPending"][0]["projectName"], "Telescope repair");

        let series = summary["monthlySeries"].as_array().unwrap();
        assert_eq!(series.len(), 6);
        assert_eq!(series[5]["income"], 50.0);
        assert_eq!(series[5]["expense"], 30.0);
    }

    #[actix_web::test]
    async fn test_fund_validation() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("treasurer@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let invalid = [
            json!({"type": " ", "amount": 10.0, "date": "2025-01-01"}),
            json!({"type": "income", "amount": -1.0, "date": "2025-01-01"}),
            json!({"type": "income", "amount": 10.0, "date": "yesterday"}),
        ];
        for entry in invalid {
            let req = test::TestRequest::post()
                .uri("/api/admin/funds")
                .insert_header(("Authorization", portal.bearer(&admin)))
                .set_json(entry)
                .to_request();
            let resp = test::call_service(&app, req).await;
            let status = resp.status();
            let body: Value = test::read_body_json(resp).await;
            assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        }
    }

    #[actix_web::test]
    async fn test_request_review_leaves_pending_list() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("treasurer@ncss.lk").await;
        let member = portal.member("nimal@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let member_bearer = portal.bearer(&member);
        let admin_bearer = portal.bearer(&admin);

        let req = test::TestRequest::post()
            .uri("/api/requests")
            .insert_header(("Authorization", member_bearer.clone()))
            .set_json(json!({"projectName": "Field trip", "amount": 40.0}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = data(&body)["id"].as_str().unwrap().to_string();
        assert_eq!(data(&body)["status"], "pending");

        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/requests/{}/status", id))
            .insert_header(("Authorization", admin_bearer.clone()))
            .set_json(json!({"status": "approved"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["status"], "approved");

        let req = test::TestRequest::get()
            .uri("/api/requests")
            .insert_header(("Authorization", member_bearer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)[0]["status"], "approved");

        let req = test::TestRequest::get()
            .uri("/api/admin/dashboard")
            .insert_header(("Authorization", admin_bearer.clone()))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["pendingCount"], 0);

        let req = test::TestRequest::put()
            .uri("/api/admin/requests/missing/status")
            .insert_header(("Authorization", admin_bearer))
            .set_json(json!({"status": "rejected"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }

    #[actix_web::test]
    async fn test_transparency_report_for_unlocked_member() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("treasurer@ncss.lk").await;
        let member = portal.member("nimal@ncss.lk").await;
        portal.assign_codes(&member.uid, "ID-1", "TR-1").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let member_bearer = portal.bearer(&member);

        let req = test::TestRequest::post()
            .uri("/api/admin/funds")
            .insert_header(("Authorization", portal.bearer(&admin)))
            .set_json(json!({"type": "income", "amount": 20.0, "date": "2024-05-04"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);

        let req = test::TestRequest::post()
            .uri("/api/access/verify")
            .insert_header(("Authorization", member_bearer.clone()))
            .set_json(json!({"code": "TR-1"}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/transparency")
            .insert_header(("Authorization", member_bearer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["netBalance"], 20.0);
        assert_eq!(data(&body)["transactions"].as_array().unwrap().len(), 1);
    }
}
