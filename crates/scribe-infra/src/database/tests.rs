#[cfg(test)]
mod tests {
    use std::collections::BTreeMap;

    use crate::database::entity::post;
    use crate::database::postgres_repo::PostgresPostRepository;
    use scribe_core::domain::{Category, PageRequest, Post, PostDraft};
    use scribe_core::error::RepoError;
    use scribe_core::ports::{BaseRepository, PostFilter, PostRepository};
    use sea_orm::{DatabaseBackend, MockDatabase, Value};

    fn model(title: &str, category: &str) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id: uuid::Uuid::new_v4(),
            author_id: uuid::Uuid::new_v4(),
            title: title.to_owned(),
            content: "Content long enough".to_owned(),
            category: category.to_owned(),
            tags: serde_json::json!(["rust", "web"]),
            published: true,
            created_at: now.into(),
            updated_at: now.into(),
        }
    }

    #[tokio::test]
    async fn test_find_post_by_id() {
        let row = model("Test Post", "Technology");
        let post_id = row.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.unwrap();
        assert_eq!(post.id, post_id);
        assert_eq!(post.title, "Test Post");
        assert_eq!(post.category, Category::Technology);
        assert_eq!(post.tags, vec!["rust".to_string(), "web".to_string()]);
    }

    #[tokio::test]
    async fn test_unknown_stored_category_is_query_error() {
        let row = model("Odd", "Gardening");
        let post_id = row.id;

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![row]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let result: Result<Option<Post>, RepoError> = repo.find_by_id(post_id).await;

        assert!(matches!(result, Err(RepoError::Query(_))));
    }

    #[tokio::test]
    async fn test_update_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![Vec::<post::Model>::new()])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let post = Post::new(
            uuid::Uuid::new_v4(),
            PostDraft {
                title: "Gone".to_string(),
                content: "Deleted meanwhile".to_string(),
                category: Category::Other,
                tags: vec![],
            },
        );

        let result = repo.update(post).await;

        assert!(matches!(result, Err(RepoError::NotFound)));
    }

    #[tokio::test]
    async fn test_search_and_count_use_fulltext_filter() {
        let count_row = BTreeMap::from([("num_items", Value::BigInt(Some(1)))]);

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model("Rust on the server", "Technology")]])
            .append_query_results(vec![vec![count_row]])
            .into_connection();
        let repo = PostgresPostRepository::new(db);

        let filter = PostFilter::published()
            .with_category(Some(Category::Technology))
            .with_search(Some("rust server".to_string()));

        let posts = repo.find_page(&filter, PageRequest::new(2, 5)).await.unwrap();
        let total = repo.count(&filter).await.unwrap();

        assert_eq!(posts.len(), 1);
        assert_eq!(total, 1);

        let log = format!("{:?}", repo.db.into_transaction_log());
        assert!(log.contains("to_tsquery('simple'"));
        assert!(log.contains("rust | server"));
        assert!(log.contains("OFFSET"));
    }
}
