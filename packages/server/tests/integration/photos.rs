use crate::common::{TestApp, jpeg_bytes, routes};

mod upload {
    use super::*;

    #[tokio::test]
    async fn contestant_uploads_one_photo_during_registration() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;

        let res = app
            .upload_photo(&token, Some("  Atardecer  "), "puerto.jpg", "image/jpeg", jpeg_bytes(2048))
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["title"], "Atardecer");
        assert_eq!(res.body["vote_count"], 0);
        assert_eq!(res.body["size"], 2048);
        let url = res.body["url"].as_str().unwrap();
        assert!(url.ends_with(".jpg"), "unexpected url {url}");
        assert_eq!(app.stored_files().len(), 1);
    }

    #[tokio::test]
    async fn title_defaults_to_file_name() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;

        let res = app
            .upload_photo(&token, None, "mi-foto.png", "image/png", vec![1; 64])
            .await;

        assert_eq!(res.status, 201, "{}", res.text);
        assert_eq!(res.body["title"], "mi-foto.png");
    }

    #[tokio::test]
    async fn second_upload_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;
        app.create_photo(&token, "Primera").await;

        let res = app
            .upload_photo(&token, Some("Segunda"), "b.jpg", "image/jpeg", jpeg_bytes(10))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "ALREADY_EXISTS");
        assert_eq!(app.photo_rows().await.len(), 1);
    }

    #[tokio::test]
    async fn oversized_upload_leaves_no_row_and_no_bytes() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;

        let res = app
            .upload_photo(
                &token,
                Some("Enorme"),
                "big.jpg",
                "image/jpeg",
                jpeg_bytes(12 * 1024 * 1024),
            )
            .await;

        assert_eq!(res.status, 400, "{}", res.text);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(res.body["message"].as_str().unwrap().contains("10MB"));
        assert!(app.photo_rows().await.is_empty());
        assert!(app.stored_files().is_empty());
    }

    #[tokio::test]
    async fn disallowed_type_is_rejected() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;

        let res = app
            .upload_photo(&token, Some("Gif"), "anim.gif", "image/gif", vec![0x47; 32])
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "VALIDATION_ERROR");
        assert!(app.stored_files().is_empty());
    }

    #[tokio::test]
    async fn closed_outside_registration() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;
        app.set_phase("JUDGING").await;

        let res = app
            .upload_photo(&token, Some("Tarde"), "a.jpg", "image/jpeg", jpeg_bytes(10))
            .await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "PHASE_CLOSED");
    }

    #[tokio::test]
    async fn judges_cannot_upload() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Jueza", "judge").await;

        let res = app
            .upload_photo(&token, Some("No"), "a.jpg", "image/jpeg", jpeg_bytes(10))
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }

    #[tokio::test]
    async fn uploaded_bytes_are_served_back() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;
        let res = app
            .upload_photo(&token, Some("Puerto"), "p.png", "image/png", vec![7; 300])
            .await;
        assert_eq!(res.status, 201, "{}", res.text);

        let url = res.body["url"].as_str().unwrap();
        let file = app.client.get(url).send().await.unwrap();

        assert_eq!(file.status(), 200);
        assert_eq!(file.headers()["content-type"], "image/png");
        assert_eq!(file.bytes().await.unwrap().to_vec(), vec![7; 300]);
    }

    #[tokio::test]
    async fn missing_files_are_404() {
        let app = TestApp::spawn().await;

        let res = app
            .get_without_token("/api/v1/files/photos/1/does-not-exist.jpg")
            .await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }
}

mod removal {
    use super::*;

    #[tokio::test]
    async fn contestant_deletes_own_photo_and_bytes() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;
        app.create_photo(&token, "Puerto").await;

        let res = app.delete_with_token(routes::PHOTOS, &token).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(app.photo_rows().await.is_empty());
        assert!(app.stored_files().is_empty());

        // A fresh upload is allowed again.
        app.create_photo(&token, "Otra").await;
    }

    #[tokio::test]
    async fn deleting_without_a_photo_is_404() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;

        let res = app.delete_with_token(routes::PHOTOS, &token).await;

        assert_eq!(res.status, 404);
        assert_eq!(res.body["code"], "NOT_FOUND");
    }

    #[tokio::test]
    async fn contestant_cannot_delete_after_registration() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;
        app.create_photo(&token, "Puerto").await;
        app.set_phase("JUDGING").await;

        let res = app.delete_with_token(routes::PHOTOS, &token).await;

        assert_eq!(res.status, 400);
        assert_eq!(res.body["code"], "PHASE_CLOSED");
        assert_eq!(app.photo_rows().await.len(), 1);
    }

    #[tokio::test]
    async fn admin_deletes_any_photo_in_any_phase_with_its_votes() {
        let app = TestApp::spawn().await;
        let contestant = app.create_user_with_role("Ana", "contestant").await;
        let judge = app.create_user_with_role("Jueza", "judge").await;
        let photo_id = app.create_photo(&contestant, "Puerto").await;
        app.set_phase("JUDGING").await;
        let vote = app
            .post_with_token(routes::VOTES, &serde_json::json!({"photo_id": photo_id}), &judge)
            .await;
        assert_eq!(vote.status, 200, "{}", vote.text);

        let admin = app.admin_token().await;
        let res = app
            .delete_with_token(&routes::admin_photo(photo_id), &admin)
            .await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert!(app.photo_rows().await.is_empty());
        let me = app.get_with_token(routes::ME, &judge).await;
        assert!(me.body["vote"].is_null());
        assert!(app.stored_files().is_empty());
    }

    #[tokio::test]
    async fn admin_delete_of_unknown_photo_is_404() {
        let app = TestApp::spawn().await;
        let admin = app.admin_token().await;

        let res = app.delete_with_token(&routes::admin_photo(9999), &admin).await;

        assert_eq!(res.status, 404);
    }

    #[tokio::test]
    async fn contestants_cannot_use_the_admin_route() {
        let app = TestApp::spawn().await;
        let token = app.create_user_with_role("Ana", "contestant").await;
        let photo_id = app.create_photo(&token, "Puerto").await;

        let res = app
            .delete_with_token(&routes::admin_photo(photo_id), &token)
            .await;

        assert_eq!(res.status, 401);
        assert_eq!(res.body["code"], "PERMISSION_DENIED");
    }
}

mod listing {
    use super::*;

    #[tokio::test]
    async fn authenticated_list_is_newest_first_with_names() {
        let app = TestApp::spawn().await;
        let ana = app.create_user_with_role("Ana", "contestant").await;
        let beto = app.create_user_with_role("Beto", "contestant").await;
        let first = app.create_photo(&ana, "Primera").await;
        let second = app.create_photo(&beto, "Segunda").await;
        let judge = app.create_user_with_role("Jueza", "judge").await;

        let res = app.get_with_token(routes::PHOTOS, &judge).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 2);
        let photos = res.body["photos"].as_array().unwrap();
        assert_eq!(photos[0]["id"], second);
        assert_eq!(photos[0]["contestant_name"], "Beto");
        assert_eq!(photos[1]["id"], first);
    }

    #[tokio::test]
    async fn authenticated_list_requires_a_token() {
        let app = TestApp::spawn().await;

        let res = app.get_without_token(routes::PHOTOS).await;

        assert_eq!(res.status, 401);
    }

    #[tokio::test]
    async fn public_gallery_needs_no_token() {
        let app = TestApp::spawn().await;
        let ana = app.create_user_with_role("Ana", "contestant").await;
        app.create_photo(&ana, "Primera").await;

        let res = app.get_without_token(routes::PUBLIC_PHOTOS).await;

        assert_eq!(res.status, 200, "{}", res.text);
        assert_eq!(res.body["total"], 1);
    }
}
