//! Public site content, news, gallery and blob uploads

#[cfg(test)]
mod tests {
    use crate::common::TestPortal;
    use crate::common::assertions::{assert_error, data};
    use actix_web::http::StatusCode;
    use actix_web::test;
    use serde_json::{Value, json};
    use society_portal::server::HttpServer;

    #[actix_web::test]
    async fn test_site_content_is_seeded_then_editable() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("editor@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::get().uri("/api/site/homepage").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["heroTitle"], "EXPLORE THE UNIVERSE");
        assert_eq!(data(&body)["heroImages"].as_array().unwrap().len(), 3);

        let req = test::TestRequest::put()
            .uri("/api/admin/site/homepage")
            .insert_header(("Authorization", portal.bearer(&admin)))
            .set_json(json!({"heroTitle": "STARGAZING NIGHT", "heroImages": []}))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/site/homepage").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)["heroTitle"], "STARGAZING NIGHT");
        assert_eq!(data(&body)["heroImages"], json!([]));

        let req = test::TestRequest::get().uri("/api/site/footer").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert!(data(&body)["socialLinks"].is_array());
    }

    #[actix_web::test]
    async fn test_member_cannot_edit_site() {
        let portal = TestPortal::new().await;
        let member = portal.member("nimal@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let req = test::TestRequest::put()
            .uri("/api/admin/site/footer")
            .insert_header(("Authorization", portal.bearer(&member)))
            .set_json(json!({"aboutText": "defaced"}))
            .to_request();
        let resp = test::call_service(&app, req).await;
        let status = resp.status();
        let body: Value = test::read_body_json(resp).await;
        assert_error(status, &body, StatusCode::FORBIDDEN, "ACCESS_DENIED");
    }

    #[actix_web::test]
    async fn test_news_latest_first_with_limit() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("editor@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&admin);

        for (title, date) in [
            ("Orientation", "2025-01-10"),
            ("Star party", "2025-03-02"),
            ("Rocket workshop", "2025-02-14"),
            ("Science fair", "2024-11-30"),
        ] {
            let req = test::TestRequest::post()
                .uri("/api/admin/news")
                .insert_header(("Authorization", bearer.clone()))
                .set_json(json!({
                    "title": title,
                    "date": date,
                    "downloadLinks": [{"label": "Poster", "url": "/api/blobs/poster"}]
                }))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::CREATED);
        }

        let req = test::TestRequest::get().uri("/api/news").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let titles: Vec<&str> = data(&body)
            .as_array()
            .unwrap()
            .iter()
            .map(|item| item["title"].as_str().unwrap())
            .collect();
        assert_eq!(titles, ["Star party", "Rocket workshop", "Orientation"]);
        assert!(!data(&body)[0]["downloadLinks"][0]["id"].as_str().unwrap().is_empty());

        let req = test::TestRequest::get().uri("/api/news?limit=10").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body).as_array().unwrap().len(), 4);
    }

    #[actix_web::test]
    async fn test_gallery_album_images() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("editor@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;
        let bearer = portal.bearer(&admin);

        let req = test::TestRequest::post()
            .uri("/api/admin/gallery")
            .insert_header(("Authorization", bearer.clone()))
            .set_json(json!({"name": "Lunar eclipse 2025"}))
            .to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        let id = data(&body)["id"].as_str().unwrap().to_string();

        for url in ["/api/blobs/a", "/api/blobs/b", "/api/blobs/a"] {
            let req = test::TestRequest::post()
                .uri(&format!("/api/admin/gallery/{}/images", id))
                .insert_header(("Authorization", bearer.clone()))
                .set_json(json!({"url": url}))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);
        }

        let req = test::TestRequest::delete()
            .uri(&format!("/api/admin/gallery/{}/images?url=%2Fapi%2Fblobs%2Fa", id))
            .insert_header(("Authorization", bearer))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::OK);

        let req = test::TestRequest::get().uri("/api/gallery").to_request();
        let body: Value = test::call_and_read_body_json(&app, req).await;
        assert_eq!(data(&body)[0]["name"], "Lunar eclipse 2025");
        assert_eq!(data(&body)[0]["images"], json!(["/api/blobs/b"]));
    }

    #[actix_web::test]
    async fn test_multipart_upload_is_served_back() {
        let portal = TestPortal::new().await;
        let admin = portal.admin("editor@ncss.lk").await;
        let app = test::init_service(HttpServer::create_app(portal.data())).await;

        let boundary = "portal-boundary";
        let payload = format!(
            "--{b}\r\nContent-Disposition: form-data; name=\"file\"; filename=\"notice.txt\"\r\nContent-Type: text/plain\r\n\r\nMeeting at 5pm\r\n--{b}--\r\n",
            b = boundary
        );
        let req = test::TestRequest::post()
            .uri("/api/admin/blobs")
            .insert_header(("Authorization", portal.bearer(&admin)))
            .insert_header((
                "content-type",
                format!("multipart/form-data; boundary={}", boundary),
            ))
            .set_payload(payload)
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::CREATED);
        let body: Value = test::read_body_json(resp).await;
        let url = data(&body)[0]["url"].as_str().unwrap().to_string();
        assert!(url.starts_with("/api/blobs/"));

        let req = test::TestRequest::get().uri(&url).to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status(), StatusCode::OK);
        assert_eq!(test::read_body(resp).await.as_ref(), b"Meeting at 5pm");

        let req = test::TestRequest::get().uri("/api/blobs/does-not-exist").to_request();
        assert_eq!(test::call_service(&app, req).await.status(), StatusCode::NOT_FOUND);
    }
}
