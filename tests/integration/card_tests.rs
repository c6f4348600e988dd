//! ID card save, export and delete over HTTP

#[cfg(test)]
mod tests {
    use crate::common::TestPortal;
    use crate::common::assertions::{assert_error, data};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use society_portal::server::HttpServer;

    fn card_form() -> Value {
        json!({
            "fullName": "Nimal Perera",
            "memberId": "NCSS/042",
            "position": "Treasurer",
            "profileImage": "https://cdn.example.org/nimal.png",
            "phone": "+94 77 123 4567",
            "email": "typed@elsewhere.org"
        })
    }

    /// Member with the ID feature unlocked in the returned session
    async fn unlocked_member(portal: &TestPortal) -> (String, String) {
        let member = portal.member("nimal@ncss.lk").await;
        portal.assign_codes(&member.uid, "ID-7741", "TR-1902").await;
        let bearer = portal.bearer(&member);
        let session = portal.state.auth.authenticate(bearer.trim_start_matches("Bearer ")).unwrap();
        portal
            .state
            .access
            .verify(&member.uid, session.session_id, "ID-7741")
            .await
            .unwrap();
        (member.uid, bearer)
    }

    #[actix_web::test]
    async fn test_card_lifecycle() {
        let portal = TestPortal::new().await;
        let (uid, bearer) = unlocked_member(&portal).await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        // Save: the account email wins over the typed one
        let req = test::TestRequest::put()
            .uri("/api/cards/me")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(card_form())
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["uid"], uid.as_str());
        assert_eq!(data(&body)["email"], "nimal@ncss.lk");
        assert_eq!(data(&body)["motto"], "Adhipathi Vidya Labha");

        // Export both faces
        for side in ["front", "back"] {
            let req = test::TestRequest::get()
                .uri(&format!("/api/cards/me/export/{}", side))
                .insert_header(("Authorization", bearer.clone()))
                .to_request();
            let resp = test::call_service(&app, req).await;
            assert_eq!(resp.status(), StatusCode::OK);
            assert_eq!(resp.headers().get("content-type").unwrap(), "application/pdf");
            let disposition = resp
                .headers()
                .get("content-disposition")
                .unwrap()
                .to_str()
                .unwrap()
                .to_string();
            assert!(disposition.contains(&format!("NCSS_ID_NCSS_042_{}.pdf", side)));
            let bytes = test::read_body(resp).await;
            assert!(bytes.starts_with(b"%PDF"));
        }

        // Delete, then export fails with not found
        let req = test::TestRequest::delete()
            .uri("/api/cards/me")
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/cards/me/export/front")
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        assert_error(status, &body, StatusCode::NOT_FOUND, "NOT_FOUND");

        let req = test::TestRequest::get()
            .uri("/api/cards/me")
            .insert_header(("Authorization", bearer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(data(&body).is_null());
    }

    #[actix_web::test]
    async fn test_incomplete_form_is_rejected() {
        let portal = TestPortal::new().await;
        let (_, bearer) = unlocked_member(&portal).await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::put()
            .uri("/api/cards/me")
            .insert_header(("Authorization", bearer))
            .set_json(json!({ "fullName": "Nimal Perera", "memberId": "NCSS/042" }))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        assert_error(status, &body, StatusCode::BAD_REQUEST, "VALIDATION_ERROR");
        let message = body["error"]["message"].as_str().unwrap();
        assert!(message.contains("profileImage"));
        assert!(message.contains("phone"));
    }

    #[actix_web::test]
    async fn test_unknown_side_is_a_bad_request() {
        let portal = TestPortal::new().await;
        let (_, bearer) = unlocked_member(&portal).await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::get()
            .uri("/api/cards/me/export/middle")
            .insert_header(("Authorization", bearer))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::BAD_REQUEST);
    }

    #[actix_web::test]
    async fn test_unreachable_photo_fails_front_only() {
        let portal = TestPortal::with_broken_photos().await;
        let admin = portal.admin("secretary@ncss.lk").await;
        let member = portal.member("nimal@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&admin);

        let req = test::TestRequest::put()
            .uri(&format!("/api/admin/cards/{}", member.uid))
            .insert_header(("Authorization", bearer.clone()))
            .set_json(card_form())
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/cards/{}/export/front", member.uid))
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        assert_error(status, &body, StatusCode::INTERNAL_SERVER_ERROR, "EXPORT_ERROR");

        let req = test::TestRequest::get()
            .uri(&format!("/api/admin/cards/{}/export/back", member.uid))
            .insert_header(("Authorization", bearer.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get()
            .uri("/api/admin/cards")
            .insert_header(("Authorization", bearer))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body).as_array().unwrap().len(), 1);
        assert_eq!(data(&body)[0]["email"], "nimal@ncss.lk");
    }
}
