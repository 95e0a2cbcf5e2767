//! Blog post handlers.

use actix_web::{HttpResponse, web};

use quill_core::DomainError;
use quill_shared::MessageResponse;
use quill_shared::dto::{CreatePostRequest, UpdatePostRequest, non_blank};

use crate::middleware::error::{AppError, AppResult};
use crate::state::AppState;

/// Parse a post id from the path. Only positive integers are accepted.
fn parse_id(raw: &str) -> AppResult<u64> {
    match raw.parse::<u64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::BadRequest(format!("Invalid post id: {}", raw))),
    }
}

/// POST /reset
pub async fn reset_posts(state: web::Data<AppState>) -> AppResult<HttpResponse> {
    state.posts.reset().await?;
    Ok(HttpResponse::Ok().json(MessageResponse::new("Posts have been reset")))
}

/// POST /posts
pub async fn create_post(
    state: web::Data<AppState>,
    body: web::Json<CreatePostRequest>,
) -> AppResult<HttpResponse> {
    let req = body.into_inner();

    let (Some(title), Some(content)) = (non_blank(req.title), non_blank(req.content)) else {
        return Err(DomainError::Validation("Title and content are required".to_string()).into());
    };

    let post = state.posts.create(title, content).await?;
    Ok(HttpResponse::Created().json(post))
}

/// GET /posts/{id}
pub async fn get_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    let post = state
        .posts
        .read(id)
        .await
        .ok_or(DomainError::NotFound { id })?;

    Ok(HttpResponse::Ok().json(post))
}

/// PUT /posts/{id}
pub async fn update_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
    body: web::Json<UpdatePostRequest>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;
    let req = body.into_inner();

    let title = non_blank(req.title);
    let content = non_blank(req.content);
    if title.is_none() && content.is_none() {
        return Err(
            DomainError::Validation("Either title or content must be provided".to_string()).into(),
        );
    }

    if !state.posts.update(id, title, content).await? {
        return Err(DomainError::NotFound { id }.into());
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Post {} updated", id))))
}

/// DELETE /posts/{id}
pub async fn delete_post(
    state: web::Data<AppState>,
    path: web::Path<String>,
) -> AppResult<HttpResponse> {
    let id = parse_id(&path)?;

    if !state.posts.delete(id).await? {
        return Err(DomainError::NotFound { id }.into());
    }

    Ok(HttpResponse::Ok().json(MessageResponse::new(format!("Post {} deleted", id))))
}

/// GET /posts
pub async fn list_posts(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(state.posts.list().await)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use actix_web::http::StatusCode;
    use actix_web::App;
    use actix_web::test as actix_test;
    use async_trait::async_trait;
    use serde_json::{Value, json};

    use quill_core::CorruptPolicy;
    use quill_core::StoreError;
    use quill_core::domain::{Post, PostDocument};
    use quill_core::ports::DocumentStore;
    use quill_infra::{InMemoryDocumentStore, JsonFileStore};

    use crate::handlers::configure_routes;
    use crate::state::AppState;

    macro_rules! app_with {
        ($store:expr) => {
            actix_test::init_service(
                App::new()
                    .app_data(actix_web::web::Data::new(AppState::with_store(
                        $store,
                        CorruptPolicy::default(),
                    )))
                    .configure(configure_routes),
            )
            .await
        };
    }

    /// Call the app and decode the JSON body (`Null` when there is none).
    macro_rules! send {
        ($app:expr, $req:expr $(,)?) => {{
            let res = actix_test::call_service($app, $req.to_request()).await;
            let status = res.status();
            let body = actix_test::read_body(res).await;
            let value: Value = serde_json::from_slice(&body).unwrap_or(Value::Null);
            (status, value)
        }};
    }

    /// Store that loads fine but can never save.
    struct ReadOnlyStore(PostDocument);

    #[async_trait]
    impl DocumentStore for ReadOnlyStore {
        async fn load(&self) -> Result<Option<PostDocument>, StoreError> {
            Ok(Some(self.0.clone()))
        }

        async fn save(&self, _document: &PostDocument) -> Result<(), StoreError> {
            Err(StoreError::Write("read-only filesystem".to_string()))
        }

        async fn backup(&self) -> Result<(), StoreError> {
            Ok(())
        }
    }

    #[actix_rt::test]
    async fn test_full_scenario() {
        let app = app_with!(Arc::new(InMemoryDocumentStore::new()));

        let (status, body) = send!(&app, actix_test::TestRequest::post().uri("/reset"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Posts have been reset");

        let (status, body) = send!(
            &app,
            actix_test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": "Hello", "content": "World"})),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);
        assert_eq!(body["title"], "Hello");
        assert_eq!(body["content"], "World");
        assert!(body["createdAt"].as_str().is_some_and(|s| !s.is_empty()));

        let (_, body) = send!(
            &app,
            actix_test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": "Second", "content": "Post"})),
        );
        assert_eq!(body["id"], 2);

        let (status, body) = send!(
            &app,
            actix_test::TestRequest::put()
                .uri("/posts/1")
                .set_json(json!({"title": "Hi"})),
        );
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Post 1 updated");

        let (_, body) = send!(&app, actix_test::TestRequest::get().uri("/posts/1"));
        assert_eq!(body["title"], "Hi");
        assert_eq!(body["content"], "World");

        let (status, body) = send!(&app, actix_test::TestRequest::delete().uri("/posts/2"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["message"], "Post 2 deleted");

        let (status, body) = send!(&app, actix_test::TestRequest::get().uri("/posts"));
        assert_eq!(status, StatusCode::OK);
        let posts: Vec<Post> = serde_json::from_value(body).unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].id, 1);

        let (status, body) = send!(&app, actix_test::TestRequest::get().uri("/posts/2"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["status"], 404);
        assert_eq!(body["detail"], "Post 2 not found");
    }

    #[actix_rt::test]
    async fn test_create_requires_title_and_content() {
        let app = app_with!(Arc::new(InMemoryDocumentStore::new()));

        for payload in [
            json!({"title": "Only title"}),
            json!({"title": "   ", "content": "x"}),
            json!({"title": "x", "content": ""}),
        ] {
            let (status, body) =
                send!(&app, actix_test::TestRequest::post().uri("/posts").set_json(payload));
            assert_eq!(status, StatusCode::BAD_REQUEST);
            assert_eq!(body["detail"], "Title and content are required");
        }

        let (status, body) = send!(
            &app,
            actix_test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": 42, "content": "x"})),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["status"], 400);

        let (_, body) = send!(&app, actix_test::TestRequest::get().uri("/posts"));
        assert_eq!(body, json!([]));
    }

    #[actix_rt::test]
    async fn test_update_needs_a_field() {
        let app = app_with!(Arc::new(InMemoryDocumentStore::new()));
        send!(
            &app,
            actix_test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": "a", "content": "b"})),
        );

        let (status, body) = send!(
            &app,
            actix_test::TestRequest::put()
                .uri("/posts/1")
                .set_json(json!({"title": " ", "content": ""})),
        );
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["detail"], "Either title or content must be provided");

        // Blank title is ignored, content still applied.
        let (status, _) = send!(
            &app,
            actix_test::TestRequest::put()
                .uri("/posts/1")
                .set_json(json!({"title": "", "content": "new"})),
        );
        assert_eq!(status, StatusCode::OK);
        let (_, body) = send!(&app, actix_test::TestRequest::get().uri("/posts/1"));
        assert_eq!(body["title"], "a");
        assert_eq!(body["content"], "new");

        let (status, _) = send!(
            &app,
            actix_test::TestRequest::put()
                .uri("/posts/9")
                .set_json(json!({"title": "x"})),
        );
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_invalid_ids_are_rejected() {
        let app = app_with!(Arc::new(InMemoryDocumentStore::new()));

        for uri in ["/posts/abc", "/posts/0", "/posts/-1", "/posts/1.5"] {
            let (status, _) = send!(&app, actix_test::TestRequest::get().uri(uri));
            assert_eq!(status, StatusCode::BAD_REQUEST, "GET {}", uri);
        }
        let (status, _) = send!(&app, actix_test::TestRequest::delete().uri("/posts/abc"));
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[actix_rt::test]
    async fn test_delete_twice() {
        let app = app_with!(Arc::new(InMemoryDocumentStore::new()));
        send!(
            &app,
            actix_test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": "a", "content": "b"})),
        );

        let (status, _) = send!(&app, actix_test::TestRequest::delete().uri("/posts/1"));
        assert_eq!(status, StatusCode::OK);
        let (status, body) = send!(&app, actix_test::TestRequest::delete().uri("/posts/1"));
        assert_eq!(status, StatusCode::NOT_FOUND);
        assert_eq!(body["detail"], "Post 1 not found");
    }

    #[actix_rt::test]
    async fn test_write_failure_is_server_error() {
        let mut document = PostDocument::default();
        document.create("a".into(), "b".into()).unwrap();
        let app = app_with!(Arc::new(ReadOnlyStore(document)));

        let (status, body) = send!(
            &app,
            actix_test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": "x", "content": "y"})),
        );
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["status"], 500);

        let (status, _) = send!(&app, actix_test::TestRequest::delete().uri("/posts/1"));
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);

        // Missing post is still a 404, not a storage failure.
        let (status, _) = send!(&app, actix_test::TestRequest::delete().uri("/posts/5"));
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[actix_rt::test]
    async fn test_corrupt_file_reads_empty_and_heals_on_create() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("posts.json");
        std::fs::write(&path, "{ definitely not json").unwrap();
        let app = app_with!(Arc::new(JsonFileStore::new(path.clone())));

        let (status, body) = send!(&app, actix_test::TestRequest::get().uri("/posts"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body, json!([]));

        let (status, body) = send!(
            &app,
            actix_test::TestRequest::post()
                .uri("/posts")
                .set_json(json!({"title": "fresh", "content": "start"})),
        );
        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(body["id"], 1);

        let backups = std::fs::read_dir(dir.path())
            .unwrap()
            .filter_map(|entry| entry.ok())
            .filter(|entry| entry.file_name().to_string_lossy().contains(".corrupt-"))
            .count();
        assert_eq!(backups, 1);
    }

    #[actix_rt::test]
    async fn test_health() {
        let app = app_with!(Arc::new(InMemoryDocumentStore::new()));
        let (status, body) = send!(&app, actix_test::TestRequest::get().uri("/health"));
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
    }
}
