//! The authentication, ownership, and post services running over the in-memory stores.

use std::sync::Arc;

use scribe_core::DomainError;
use scribe_core::domain::{Category, PageRequest, PostDraft, SessionId, User};
use scribe_core::ports::{AuthError, BaseRepository, PostRepository, UserRepository};
use scribe_core::services::{
    AccessGuard, Caller, NewUser, PostQuery, PostService, ProfileChanges, SessionAuthenticator,
};
use scribe_infra::{
    Argon2PasswordService, InMemoryPostRepository, InMemorySessionStore, InMemoryUserRepository,
};

struct Harness {
    users: Arc<InMemoryUserRepository>,
    posts: Arc<InMemoryPostRepository>,
    auth: Arc<SessionAuthenticator>,
    guard: AccessGuard,
    service: PostService,
}

fn harness() -> Harness {
    let users = Arc::new(InMemoryUserRepository::new());
    let posts = Arc::new(InMemoryPostRepository::new());
    let passwords = Arc::new(Argon2PasswordService::with_params(8, 1).unwrap());
    let sessions = Arc::new(InMemorySessionStore::default());

    let auth = Arc::new(
        SessionAuthenticator::new(users.clone(), sessions, passwords).unwrap(),
    );
    let guard = AccessGuard::new(auth.clone(), posts.clone());
    let service = PostService::new(posts.clone(), users.clone());

    Harness {
        users,
        posts,
        auth,
        guard,
        service,
    }
}

fn new_user(name: &str) -> NewUser {
    NewUser {
        username: name.to_string(),
        email: format!("{name}@example.com"),
        password: "secret123".to_string(),
    }
}

fn draft(title: &str, category: Category) -> PostDraft {
    PostDraft {
        title: title.to_string(),
        content: "1234567890".to_string(),
        category,
        tags: vec![],
    }
}

impl Harness {
    async fn login(&self, name: &str) -> (User, SessionId, Caller) {
        let user = self.auth.register(new_user(name)).await.unwrap();
        let session = self.auth.establish_session(&user).await.unwrap();
        let caller = self
            .guard
            .require_authenticated(Some(&session))
            .await
            .unwrap();
        (user, session, caller)
    }
}

#[tokio::test]
async fn test_registration_yields_usable_session() {
    let h = harness();

    let user = h.auth.register(new_user("alice")).await.unwrap();
    let session = h.auth.establish_session(&user).await.unwrap();
    let resolved = h.auth.resolve_session(&session).await.unwrap().unwrap();

    assert_eq!(resolved.id, user.id);
    assert!(resolved.password_hash.is_empty());
    assert!(!user.password_hash.is_empty());
}

#[tokio::test]
async fn test_duplicate_registration_names_the_collision() {
    let h = harness();
    h.auth.register(new_user("alice")).await.unwrap();

    let same_email = NewUser {
        username: "alice2".to_string(),
        ..new_user("alice")
    };
    let same_username = NewUser {
        email: "other@example.com".to_string(),
        ..new_user("alice")
    };

    match h.auth.register(same_email).await {
        Err(DomainError::Duplicate(msg)) => assert_eq!(msg, "Email already registered"),
        other => panic!("expected duplicate email, got {other:?}"),
    }
    match h.auth.register(same_username).await {
        Err(DomainError::Duplicate(msg)) => assert_eq!(msg, "Username already taken"),
        other => panic!("expected duplicate username, got {other:?}"),
    }
}

#[tokio::test]
async fn test_bad_credentials_are_indistinguishable() {
    let h = harness();
    h.auth.register(new_user("alice")).await.unwrap();

    let wrong_password = h.auth.authenticate("alice@example.com", "nope-nope").await;
    let unknown_email = h.auth.authenticate("nobody@example.com", "secret123").await;

    let (a, b) = (wrong_password.unwrap_err(), unknown_email.unwrap_err());
    assert!(matches!(a, AuthError::InvalidCredentials));
    assert!(matches!(b, AuthError::InvalidCredentials));
    assert_eq!(a.to_string(), b.to_string());
}

#[tokio::test]
async fn test_authenticate_normalizes_email() {
    let h = harness();
    let user = h.auth.register(new_user("alice")).await.unwrap();

    let found = h
        .auth
        .authenticate("  ALICE@Example.com ", "secret123")
        .await
        .unwrap();

    assert_eq!(found.id, user.id);
}

#[tokio::test]
async fn test_deleted_user_loses_access_immediately() {
    let h = harness();
    let (user, session, _) = h.login("alice").await;

    h.users.delete(user.id).await.unwrap();

    assert!(h.auth.resolve_session(&session).await.unwrap().is_none());
    assert!(matches!(
        h.guard.require_authenticated(Some(&session)).await,
        Err(DomainError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_destroyed_session_is_unauthenticated() {
    let h = harness();
    let (_, session, _) = h.login("alice").await;

    h.auth.destroy_session(&session).await.unwrap();
    h.auth.destroy_session(&session).await.unwrap();

    assert!(matches!(
        h.guard.require_authenticated(Some(&session)).await,
        Err(DomainError::Unauthenticated)
    ));
    assert!(matches!(
        h.guard.require_authenticated(None).await,
        Err(DomainError::Unauthenticated)
    ));
}

#[tokio::test]
async fn test_ownership_gate() {
    let h = harness();
    let (_, _, alice) = h.login("alice").await;
    let (_, _, bob) = h.login("bob").await;

    let created = h
        .service
        .create(&alice, draft("Hi", Category::Technology))
        .await
        .unwrap();

    assert!(matches!(
        h.guard.require_ownership(&bob, created.post.id).await,
        Err(DomainError::Forbidden(_))
    ));
    assert!(matches!(
        h.guard.require_ownership(&alice, uuid::Uuid::new_v4()).await,
        Err(DomainError::NotFound { .. })
    ));

    let owned = h
        .guard
        .require_ownership(&alice, created.post.id)
        .await
        .unwrap();
    assert_eq!(owned.author_id, alice.id());
    assert_eq!(owned.title, "Hi");
}

#[tokio::test]
async fn test_update_keeps_author_and_id() {
    let h = harness();
    let (alice_user, _, alice) = h.login("alice").await;
    let created = h
        .service
        .create(&alice, draft("Hi", Category::Technology))
        .await
        .unwrap();

    let owned = h
        .guard
        .require_ownership(&alice, created.post.id)
        .await
        .unwrap();
    let updated = h
        .service
        .update(owned, draft("Updated title", Category::Health))
        .await
        .unwrap();

    assert_eq!(updated.post.id, created.post.id);
    assert_eq!(updated.post.author_id, alice_user.id);
    assert_eq!(updated.post.title, "Updated title");
    assert_eq!(updated.author.unwrap().username, "alice");
}

#[tokio::test]
async fn test_listings_and_visibility() {
    let h = harness();
    let (_, _, alice) = h.login("alice").await;

    for i in 0..12 {
        h.service
            .create(&alice, draft(&format!("Post {i}"), Category::Food))
            .await
            .unwrap();
    }
    let hidden = h
        .service
        .create(&alice, draft("Draft", Category::Food))
        .await
        .unwrap();
    let owned = h.guard.require_ownership(&alice, hidden.post.id).await.unwrap();
    let toggled = h.service.toggle_published(owned).await.unwrap();
    assert!(!toggled.post.published);

    let public = h
        .service
        .list_published(PostQuery {
            page: PageRequest::new(2, 5),
            ..PostQuery::default()
        })
        .await
        .unwrap();
    assert_eq!(public.pagination.total_posts, 12);
    assert_eq!(public.pagination.total_pages, 3);
    assert!(public.pagination.has_next);
    assert!(public.pagination.has_prev);
    assert_eq!(public.items.len(), 5);

    let own = h
        .service
        .list_own(&alice, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(own.pagination.total_posts, 13);

    let travel = h
        .service
        .list_by_category(Category::Travel, PageRequest::default())
        .await
        .unwrap();
    assert_eq!(travel.pagination.total_posts, 0);
    assert_eq!(travel.pagination.total_pages, 0);
    assert!(!travel.pagination.has_next);
}

#[tokio::test]
async fn test_orphaned_posts_have_no_author() {
    let h = harness();
    let (user, _, alice) = h.login("alice").await;
    let created = h
        .service
        .create(&alice, draft("Left behind", Category::Other))
        .await
        .unwrap();

    h.users.delete(user.id).await.unwrap();

    let fetched = h.service.get(created.post.id).await.unwrap();
    assert!(fetched.author.is_none());
    assert!(h.posts.find_by_id(created.post.id).await.unwrap().is_some());
}

#[tokio::test]
async fn test_delete_is_hard() {
    let h = harness();
    let (_, _, alice) = h.login("alice").await;
    let created = h
        .service
        .create(&alice, draft("Short lived", Category::Other))
        .await
        .unwrap();

    let owned = h
        .guard
        .require_ownership(&alice, created.post.id)
        .await
        .unwrap();
    h.service.delete(owned).await.unwrap();

    assert!(h.posts.find_by_id(created.post.id).await.unwrap().is_none());
    assert!(matches!(
        h.service.get(created.post.id).await,
        Err(DomainError::NotFound { .. })
    ));
}

#[tokio::test]
async fn test_profile_update_rejects_taken_identity() {
    let h = harness();
    let (alice, _, _) = h.login("alice").await;
    h.login("bob").await;

    let clash = h
        .auth
        .update_profile(
            alice.id,
            ProfileChanges {
                username: "bob".to_string(),
                email: "alice@example.com".to_string(),
            },
        )
        .await;
    assert!(matches!(clash, Err(DomainError::Duplicate(_))));

    let renamed = h
        .auth
        .update_profile(
            alice.id,
            ProfileChanges {
                username: "alice_w".to_string(),
                email: "alice@example.com".to_string(),
            },
        )
        .await
        .unwrap();
    assert_eq!(renamed.username, "alice_w");
    assert!(renamed.password_hash.is_empty());

    let stored = h.users.find_by_id(alice.id).await.unwrap().unwrap();
    assert!(!stored.password_hash.is_empty());
}
