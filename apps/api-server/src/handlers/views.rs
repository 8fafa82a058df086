//! Domain values rendered as response DTOs.

use scribe_core::domain::{Page, Pagination, User};
use scribe_core::services::AuthoredPost;
use scribe_shared::dto::{
    AuthorResponse, PaginationResponse, PostListResponse, PostResponse, UserResponse,
};

pub fn user(user: &User) -> UserResponse {
    UserResponse {
        id: user.id,
        username: user.username.clone(),
        email: user.email.clone(),
        created_at: user.created_at,
        updated_at: user.updated_at,
    }
}

pub fn post(authored: AuthoredPost) -> PostResponse {
    let AuthoredPost { post, author } = authored;

    PostResponse {
        id: post.id,
        title: post.title,
        content: post.content,
        category: post.category.to_string(),
        tags: post.tags,
        published: post.published,
        author: author.map(|a| AuthorResponse {
            id: a.id,
            username: a.username,
            email: a.email,
        }),
        created_at: post.created_at,
        updated_at: post.updated_at,
    }
}

fn pagination(p: Pagination) -> PaginationResponse {
    PaginationResponse {
        current_page: p.current_page,
        total_pages: p.total_pages,
        total_posts: p.total_posts,
        has_next: p.has_next,
        has_prev: p.has_prev,
    }
}

pub fn post_list(page: Page<AuthoredPost>, category: Option<String>) -> PostListResponse {
    PostListResponse {
        posts: page.items.into_iter().map(post).collect(),
        category,
        pagination: pagination(page.pagination),
    }
}
