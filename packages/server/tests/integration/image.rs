use server::seed::{SAMPLE_PNG, SAMPLE_VIN, seed_sample_data};

use crate::common::{StubRegistry, TestApp, routes};

const HONDA: &str = "1HGCM82633A004352";
const OTHER_HONDA: &str = "1HGCM82635A004353";

mod upload {
    use super::*;

    #[tokio::test]
    async fn upload_lazily_caches_an_unknown_vin() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(&routes::upload_image(HONDA), "car.jpg", Some("image/jpeg"), vec![0xFF, 0xD8, 0xFF])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["vin"], HONDA);
        assert_eq!(res.body["content_type"], "image/jpeg");
        assert_eq!(res.body["size"], 3);
        assert_eq!(app.registry.calls(), 1);
        assert_eq!(app.count_rows("vin", Some(HONDA)).await, 1);
    }

    #[tokio::test]
    async fn upload_for_a_cached_vin_does_not_call_the_registry() {
        let app = TestApp::spawn().await;
        app.get(&routes::decode(HONDA)).await;

        let res = app
            .upload(&routes::upload_image(HONDA), "car.png", Some("image/png"), vec![1])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(app.registry.calls(), 1);
    }

    #[tokio::test]
    async fn empty_payload_is_rejected_without_touching_storage() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(&routes::upload_image(HONDA), "car.png", Some("image/png"), Vec::new())
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "EMPTY_PAYLOAD");
        assert_eq!(app.count_rows("vin_image", None).await, 0);
        assert_eq!(app.count_rows("vin", None).await, 0);
        assert_eq!(app.registry.calls(), 0);
    }

    #[tokio::test]
    async fn bad_vin_length_is_rejected() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(&routes::upload_image("SHORT"), "car.png", Some("image/png"), vec![1])
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "INVALID_VIN_LENGTH");
        assert_eq!(app.count_rows("vin_image", None).await, 0);
    }

    #[tokio::test]
    async fn body_over_the_upload_limit_is_payload_too_large() {
        let app = TestApp::spawn_with_upload_limit(1024).await;

        let res = app
            .upload(&routes::upload_image(HONDA), "car.png", Some("image/png"), vec![7; 8 * 1024])
            .await;

        assert_eq!(res.status, 413, "{}", res.text);
        assert_eq!(res.body["code"], "PAYLOAD_TOO_LARGE");
        assert_eq!(app.count_rows("vin_image", None).await, 0);
        assert_eq!(app.count_rows("vin", None).await, 0);
        assert_eq!(app.registry.calls(), 0);
    }

    #[tokio::test]
    async fn body_under_the_upload_limit_is_accepted() {
        let app = TestApp::spawn_with_upload_limit(1024).await;

        let res = app
            .upload(&routes::upload_image(HONDA), "car.png", Some("image/png"), vec![7; 256])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["size"], 256);
    }

    #[tokio::test]
    async fn content_type_falls_back_to_the_filename_extension() {
        let app = TestApp::spawn().await;

        let res = app
            .upload(&routes::upload_image(HONDA), "car.gif", None, vec![1, 2])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["content_type"], "image/gif");
    }

    #[tokio::test]
    async fn registry_failure_while_caching_stores_no_image() {
        let app = TestApp::spawn_with(StubRegistry::failing(500)).await;

        let res = app
            .upload(&routes::upload_image(HONDA), "car.png", Some("image/png"), vec![1])
            .await;

        assert_eq!(res.status, 502);
        assert_eq!(app.count_rows("vin_image", None).await, 0);
    }
}

mod retrieval {
    use super::*;

    #[tokio::test]
    async fn latest_image_of_a_vin_without_images_is_not_found() {
        let app = TestApp::spawn().await;
        app.get(&routes::decode(HONDA)).await;

        let res = app.get(&routes::latest_image(HONDA)).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn latest_image_is_the_newest_upload_with_its_content_type() {
        let app = TestApp::spawn().await;
        app.upload(&routes::upload_image(HONDA), "a.png", Some("image/png"), vec![1])
            .await;
        app.upload(&routes::upload_image(HONDA), "b.jpg", Some("image/jpeg"), vec![2, 2])
            .await;

        let res = app.get(&routes::latest_image(HONDA)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.content_type.as_deref(), Some("image/jpeg"));
        assert_eq!(res.bytes, vec![2, 2]);
    }

    #[tokio::test]
    async fn list_is_newest_first() {
        let app = TestApp::spawn().await;
        let first = app
            .upload(&routes::upload_image(HONDA), "a.png", Some("image/png"), vec![1])
            .await;
        let second = app
            .upload(&routes::upload_image(HONDA), "b.png", Some("image/png"), vec![2])
            .await;

        let res = app.get(&routes::images(HONDA)).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let images = res.body.as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["id"].as_i64(), Some(second.id()));
        assert_eq!(images[1]["id"].as_i64(), Some(first.id()));
        assert_eq!(images[0]["size"], 1);
        assert!(images[0].get("data").is_none());
    }

    #[tokio::test]
    async fn list_of_a_vin_without_images_is_not_found() {
        let app = TestApp::spawn().await;

        let res = app.get(&routes::images(HONDA)).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn image_by_id_returns_its_bytes() {
        let app = TestApp::spawn().await;
        let uploaded = app
            .upload(&routes::upload_image(HONDA), "a.png", Some("image/png"), vec![7, 8, 9])
            .await;

        let res = app.get(&routes::image(HONDA, uploaded.id())).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.content_type.as_deref(), Some("image/png"));
        assert_eq!(res.bytes, vec![7, 8, 9]);
    }

    #[tokio::test]
    async fn image_by_id_under_another_vin_is_not_found() {
        let app = TestApp::spawn().await;
        let uploaded = app
            .upload(&routes::upload_image(HONDA), "a.png", Some("image/png"), vec![1])
            .await;
        app.get(&routes::decode(OTHER_HONDA)).await;

        let res = app.get(&routes::image(OTHER_HONDA, uploaded.id())).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn seeded_sample_image_is_served_as_png() {
        let app = TestApp::spawn().await;
        seed_sample_data(&app.db).await.expect("seed sample data");
        seed_sample_data(&app.db).await.expect("seeding twice is harmless");

        let res = app.get(&routes::latest_image(SAMPLE_VIN)).await;

        assert_eq!(res.status, 200);
        assert_eq!(res.content_type.as_deref(), Some("image/png"));
        assert_eq!(res.bytes, SAMPLE_PNG);
        assert_eq!(app.count_rows("vin_image", Some(SAMPLE_VIN)).await, 1);
        assert_eq!(app.registry.calls(), 0);
    }
}

mod make_model {
    use super::*;

    #[tokio::test]
    async fn images_are_found_by_make_and_model_case_insensitively() {
        let app = TestApp::spawn().await;
        let a = app
            .upload(&routes::upload_image(HONDA), "a.png", Some("image/png"), vec![1])
            .await;
        let b = app
            .upload(&routes::upload_image(OTHER_HONDA), "b.png", Some("image/png"), vec![2])
            .await;

        let res = app.get(&routes::make_model("honda", "ACCORD")).await;

        assert_eq!(res.status, 200, "{}", res.text);
        let images = res.body.as_array().unwrap();
        assert_eq!(images.len(), 2);
        assert_eq!(images[0]["id"].as_i64(), Some(b.id()));
        assert_eq!(images[0]["vin"], OTHER_HONDA);
        assert_eq!(images[1]["id"].as_i64(), Some(a.id()));
    }

    #[tokio::test]
    async fn unknown_make_and_model_is_not_found() {
        let app = TestApp::spawn().await;
        app.upload(&routes::upload_image(HONDA), "a.png", Some("image/png"), vec![1])
            .await;

        let res = app.get(&routes::make_model("Honda", "Civic")).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}
