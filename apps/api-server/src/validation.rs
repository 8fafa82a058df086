//! Input validation - payloads in, normalized domain values out.
//!
//! Every field is checked and each failing field contributes exactly one message,
//! so a client sees all of its mistakes in a single 400.

use std::sync::OnceLock;

use regex::Regex;
use uuid::Uuid;

use scribe_core::domain::{Category, PageRequest, PostDraft};
use scribe_core::services::{NewUser, PostQuery, ProfileChanges};
use scribe_shared::FieldError;
use scribe_shared::dto::{
    ListQuery, LoginRequest, PageQuery, PostPayload, ProfileRequest, SignupRequest,
};

use crate::middleware::error::AppError;

const MAX_TAGS: usize = 10;
const MAX_TAG_LEN: usize = 30;
const MAX_SEARCH_LEN: usize = 100;

/// Email and password as submitted to `POST /auth/login`.
#[derive(Debug, Clone)]
pub struct Credentials {
    pub email: String,
    pub password: String,
}

/// Collects one message per failing field.
#[derive(Debug, Default)]
pub struct Validator {
    errors: Vec<FieldError>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    fn fail<T>(&mut self, field: &str, message: &str) -> Option<T> {
        self.errors.push(FieldError::new(field, message));
        None
    }

    /// Hand back `value` if no field failed.
    pub fn finish<T>(self, value: impl FnOnce() -> Option<T>) -> Result<T, AppError> {
        if !self.errors.is_empty() {
            return Err(AppError::Validation(self.errors));
        }
        value().ok_or_else(|| AppError::Internal("validator lost a field".to_string()))
    }

    pub fn username(&mut self, value: Option<String>) -> Option<String> {
        static USERNAME_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = USERNAME_REGEX.get_or_init(|| {
            Regex::new(r"^[A-Za-z0-9_]+$").expect("Failed to compile username regex")
        });

        let value = value.unwrap_or_default();
        let value = value.trim();
        if !(3..=30).contains(&value.chars().count()) {
            return self.fail("username", "Username must be between 3 and 30 characters");
        }
        if !regex.is_match(value) {
            return self.fail(
                "username",
                "Username can only contain letters, numbers, and underscores",
            );
        }
        Some(value.to_string())
    }

    /// Trimmed and lowercased.
    pub fn email(&mut self, value: Option<String>) -> Option<String> {
        static EMAIL_REGEX: OnceLock<Regex> = OnceLock::new();
        let regex = EMAIL_REGEX.get_or_init(|| {
            Regex::new(r"^[a-zA-Z0-9._%+-]+@[a-zA-Z0-9.-]+\.[a-zA-Z]{2,}$")
                .expect("Failed to compile email regex")
        });

        let value = value.unwrap_or_default().trim().to_lowercase();
        if value.len() > 254 || !regex.is_match(&value) {
            return self.fail("email", "Please provide a valid email address");
        }
        Some(value)
    }

    /// New passwords. Not trimmed.
    pub fn password(&mut self, value: Option<String>) -> Option<String> {
        match value {
            Some(p) if p.chars().count() >= 6 => Some(p),
            _ => self.fail("password", "Password must be at least 6 characters long"),
        }
    }

    /// Login passwords only need to be present.
    pub fn required_password(&mut self, value: Option<String>) -> Option<String> {
        match value {
            Some(p) if !p.is_empty() => Some(p),
            _ => self.fail("password", "Password is required"),
        }
    }

    pub fn title(&mut self, value: Option<String>) -> Option<String> {
        let value = value.unwrap_or_default();
        let value = value.trim();
        if !(1..=200).contains(&value.chars().count()) {
            return self.fail("title", "Title must be between 1 and 200 characters");
        }
        Some(value.to_string())
    }

    pub fn content(&mut self, value: Option<String>) -> Option<String> {
        let value = value.unwrap_or_default();
        let value = value.trim();
        if value.chars().count() < 10 {
            return self.fail("content", "Content must be at least 10 characters long");
        }
        Some(value.to_string())
    }

    pub fn category(&mut self, value: Option<String>) -> Option<Category> {
        match value.as_deref().map(str::trim).map(str::parse::<Category>) {
            Some(Ok(category)) => Some(category),
            _ => self.fail("category", "Please select a valid category"),
        }
    }

    /// Missing or `null` tags mean no tags.
    pub fn tags(&mut self, value: Option<serde_json::Value>) -> Option<Vec<String>> {
        let items = match value {
            None | Some(serde_json::Value::Null) => return Some(Vec::new()),
            Some(serde_json::Value::Array(items)) => items,
            Some(_) => return self.fail("tags", "Tags must be an array"),
        };
        if items.len() > MAX_TAGS {
            return self.fail("tags", "Maximum 10 tags allowed");
        }

        let mut tags = Vec::with_capacity(items.len());
        for item in items {
            let Some(tag) = item.as_str() else {
                return self.fail("tags", "Tags must be an array of strings");
            };
            let tag = tag.trim();
            if tag.chars().count() > MAX_TAG_LEN {
                return self.fail("tags", "Each tag must be 30 characters or less");
            }
            tags.push(tag.to_string());
        }
        Some(tags)
    }

    /// Blank searches are dropped.
    pub fn search(&mut self, value: Option<String>) -> Option<Option<String>> {
        let Some(value) = value else {
            return Some(None);
        };
        let value = value.trim();
        if value.chars().count() > MAX_SEARCH_LEN {
            return self.fail("q", "Search query must be 100 characters or less");
        }
        Some((!value.is_empty()).then(|| value.to_string()))
    }

    pub fn category_filter(&mut self, value: Option<String>) -> Option<Option<Category>> {
        let Some(value) = value.filter(|v| !v.trim().is_empty()) else {
            return Some(None);
        };
        match value.trim().parse::<Category>() {
            Ok(category) => Some(Some(category)),
            Err(_) => self.fail("category", "Invalid category filter"),
        }
    }

    pub fn page(&mut self, page: Option<String>, limit: Option<String>) -> Option<PageRequest> {
        let page = match page.as_deref().map(str::trim) {
            None | Some("") => Some(PageRequest::DEFAULT_PAGE),
            Some(raw) => match raw.parse::<u64>() {
                Ok(p) if p >= 1 => Some(p),
                _ => self.fail("page", "Page must be a positive integer"),
            },
        };
        let limit = match limit.as_deref().map(str::trim) {
            None | Some("") => Some(PageRequest::DEFAULT_LIMIT),
            Some(raw) => match raw.parse::<u32>() {
                Ok(l) if (1..=PageRequest::MAX_LIMIT).contains(&l) => Some(l),
                _ => self.fail("limit", "Limit must be between 1 and 50"),
            },
        };
        Some(PageRequest::new(page?, limit?))
    }
}

pub fn signup(req: SignupRequest) -> Result<NewUser, AppError> {
    let mut v = Validator::new();
    let username = v.username(req.username);
    let email = v.email(req.email);
    let password = v.password(req.password);

    v.finish(|| {
        Some(NewUser {
            username: username?,
            email: email?,
            password: password?,
        })
    })
}

pub fn login(req: LoginRequest) -> Result<Credentials, AppError> {
    let mut v = Validator::new();
    let email = v.email(req.email);
    let password = v.required_password(req.password);

    v.finish(|| {
        Some(Credentials {
            email: email?,
            password: password?,
        })
    })
}

pub fn profile(req: ProfileRequest) -> Result<ProfileChanges, AppError> {
    let mut v = Validator::new();
    let username = v.username(req.username);
    let email = v.email(req.email);

    v.finish(|| {
        Some(ProfileChanges {
            username: username?,
            email: email?,
        })
    })
}

pub fn post(payload: PostPayload) -> Result<PostDraft, AppError> {
    let mut v = Validator::new();
    let title = v.title(payload.title);
    let content = v.content(payload.content);
    let category = v.category(payload.category);
    let tags = v.tags(payload.tags);

    v.finish(|| {
        Some(PostDraft {
            title: title?,
            content: content?,
            category: category?,
            tags: tags?,
        })
    })
}

pub fn list_query(query: ListQuery) -> Result<PostQuery, AppError> {
    let mut v = Validator::new();
    let search = v.search(query.q);
    let category = v.category_filter(query.category);
    let page = v.page(query.page, query.limit);

    v.finish(|| {
        Some(PostQuery {
            search: search?,
            category: category?,
            page: page?,
        })
    })
}

pub fn page_query(query: PageQuery) -> Result<PageRequest, AppError> {
    let mut v = Validator::new();
    let page = v.page(query.page, query.limit);
    v.finish(|| page)
}

/// A category taken from the URL path.
pub fn category_param(raw: &str) -> Result<Category, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::field("category", "Invalid category filter"))
}

pub fn post_id(raw: &str) -> Result<Uuid, AppError> {
    Uuid::parse_str(raw).map_err(|_| AppError::MalformedId("post"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn field_names(err: AppError) -> Vec<String> {
        match err {
            AppError::Validation(errors) => errors.into_iter().map(|e| e.field).collect(),
            other => panic!("expected validation failure, got {other:?}"),
        }
    }

    #[test]
    fn test_signup_normalizes() {
        let user = signup(SignupRequest {
            username: Some("  alice_1 ".to_string()),
            email: Some(" Alice@Example.COM ".to_string()),
            password: Some("secret123".to_string()),
        })
        .unwrap();

        assert_eq!(user.username, "alice_1");
        assert_eq!(user.email, "alice@example.com");
    }

    #[test]
    fn test_signup_reports_every_field() {
        let err = signup(SignupRequest {
            username: Some("a!".to_string()),
            email: Some("not-an-email".to_string()),
            password: Some("123".to_string()),
        })
        .unwrap_err();

        assert_eq!(field_names(err), vec!["username", "email", "password"]);
    }

    #[test]
    fn test_username_charset() {
        let err = signup(SignupRequest {
            username: Some("bad name".to_string()),
            email: Some("a@b.io".to_string()),
            password: Some("secret123".to_string()),
        })
        .unwrap_err();

        match err {
            AppError::Validation(errors) => {
                assert_eq!(errors.len(), 1);
                assert!(errors[0].message.contains("letters, numbers"));
            }
            other => panic!("unexpected {other:?}"),
        }
    }

    #[test]
    fn test_login_requires_password() {
        let err = login(LoginRequest {
            email: Some("a@b.io".to_string()),
            password: Some(String::new()),
        })
        .unwrap_err();

        assert_eq!(field_names(err), vec!["password"]);
    }

    #[test]
    fn test_post_defaults_and_trims() {
        let draft = post(PostPayload {
            title: Some("  Hi  ".to_string()),
            content: Some("1234567890".to_string()),
            category: Some("Technology".to_string()),
            tags: None,
        })
        .unwrap();

        assert_eq!(draft.title, "Hi");
        assert_eq!(draft.category, Category::Technology);
        assert!(draft.tags.is_empty());
    }

    #[test]
    fn test_post_rejects_bad_fields() {
        let err = post(PostPayload {
            title: Some("   ".to_string()),
            content: Some("short".to_string()),
            category: Some("technology".to_string()),
            tags: Some(json!("rust")),
        })
        .unwrap_err();

        assert_eq!(
            field_names(err),
            vec!["title", "content", "category", "tags"]
        );
    }

    #[test]
    fn test_tag_limits() {
        let mut v = Validator::new();
        let eleven: Vec<String> = (0..11).map(|i| format!("t{i}")).collect();
        assert!(v.tags(Some(json!(eleven))).is_none());
        assert!(v.tags(Some(json!(["x".repeat(31)]))).is_none());
        assert_eq!(v.tags(Some(json!([" rust "]))), Some(vec!["rust".to_string()]));
    }

    #[test]
    fn test_list_query_bounds() {
        let query = list_query(ListQuery {
            q: Some("  ".to_string()),
            category: None,
            page: None,
            limit: Some("50".to_string()),
        })
        .unwrap();
        assert!(query.search.is_none());
        assert_eq!(query.page, PageRequest::new(1, 50));

        let err = list_query(ListQuery {
            q: Some("x".repeat(101)),
            category: Some("Gardening".to_string()),
            page: Some("0".to_string()),
            limit: Some("51".to_string()),
        })
        .unwrap_err();
        assert_eq!(field_names(err), vec!["q", "category", "page", "limit"]);
    }

    #[test]
    fn test_page_beyond_u32_is_accepted() {
        let query = page_query(PageQuery {
            page: Some("4294967296".to_string()),
            limit: None,
        })
        .unwrap();
        assert_eq!(query, PageRequest::new(4_294_967_296, 10));
    }

    #[test]
    fn test_identifiers() {
        assert!(matches!(post_id("abc"), Err(AppError::MalformedId(_))));
        assert!(post_id(&Uuid::new_v4().to_string()).is_ok());
        assert!(category_param("Travel").is_ok());
        assert!(matches!(category_param("Moon"), Err(AppError::Validation(_))));
    }
}
