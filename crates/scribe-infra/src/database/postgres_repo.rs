//! PostgreSQL repository implementations.

use async_trait::async_trait;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder, QuerySelect,
    Select,
};
use uuid::Uuid;

use scribe_core::domain::{PageRequest, Post, User};
use scribe_core::error::RepoError;
use scribe_core::ports::{PostFilter, PostRepository, UserRepository};

use super::entity::post::{self, Entity as PostEntity};
use super::entity::user::{self, Entity as UserEntity};
use super::postgres_base::{PostgresBaseRepository, map_db_err};
use super::search::tsquery_any;

/// PostgreSQL user repository.
pub type PostgresUserRepository = PostgresBaseRepository<UserEntity>;

/// PostgreSQL post repository.
pub type PostgresPostRepository = PostgresBaseRepository<PostEntity>;

/// Document expression covered by the `posts_search_idx` GIN index.
const POST_DOCUMENT: &str = "to_tsvector('simple', title || ' ' || content || ' ' || tags::text)";

/// Mask an email for logging to avoid PII in logs.
fn mask_email(email: &str) -> String {
    match email.split_once('@') {
        Some((local, domain)) => {
            let first: String = local.chars().take(1).collect();
            if local.chars().count() > 1 {
                format!("{first}***@{domain}")
            } else {
                format!("***@{domain}")
            }
        }
        None => "***".to_string(),
    }
}

#[async_trait]
impl UserRepository for PostgresUserRepository {
    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        tracing::debug!(user_email = %mask_email(email), "Finding user by email");

        UserEntity::find()
            .filter(user::Column::Email.eq(email))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        UserEntity::find()
            .filter(user::Column::Username.eq(username))
            .one(&self.db)
            .await
            .map_err(map_db_err)?
            .map(User::try_from)
            .transpose()
    }

    async fn find_by_ids(&self, ids: &[Uuid]) -> Result<Vec<User>, RepoError> {
        if ids.is_empty() {
            return Ok(Vec::new());
        }

        UserEntity::find()
            .filter(user::Column::Id.is_in(ids.iter().copied()))
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(User::try_from)
            .collect()
    }
}

/// Translate a listing filter into a SeaORM condition.
fn post_condition(filter: &PostFilter) -> Condition {
    let mut condition = Condition::all();

    if let Some(author_id) = filter.author_id {
        condition = condition.add(post::Column::AuthorId.eq(author_id));
    }
    if let Some(published) = filter.published {
        condition = condition.add(post::Column::Published.eq(published));
    }
    if let Some(category) = filter.category {
        condition = condition.add(post::Column::Category.eq(category.as_str()));
    }
    if let Some(search) = filter.search.as_deref() {
        condition = match tsquery_any(search) {
            Some(query) => condition.add(Expr::cust_with_values(
                format!("{POST_DOCUMENT} @@ to_tsquery('simple', ?)"),
                [query],
            )),
            // Nothing searchable in the term: match nothing, like the in-memory store.
            None => condition.add(Expr::cust("FALSE")),
        };
    }

    condition
}

fn filtered(filter: &PostFilter) -> Select<PostEntity> {
    PostEntity::find().filter(post_condition(filter))
}

#[async_trait]
impl PostRepository for PostgresPostRepository {
    async fn find_page(
        &self,
        filter: &PostFilter,
        page: PageRequest,
    ) -> Result<Vec<Post>, RepoError> {
        filtered(filter)
            .order_by_desc(post::Column::CreatedAt)
            .order_by_desc(post::Column::Id)
            .offset(page.skip())
            .limit(page.limit())
            .all(&self.db)
            .await
            .map_err(map_db_err)?
            .into_iter()
            .map(Post::try_from)
            .collect()
    }

    async fn count(&self, filter: &PostFilter) -> Result<u64, RepoError> {
        filtered(filter).count(&self.db).await.map_err(map_db_err)
    }
}
