use async_trait::async_trait;
use uuid::Uuid;

use crate::domain::{Category, Comment, CommentView, Location, Post, PostOverview, User};
use crate::error::RepoError;
use crate::pagination::{Page, PageNumber};

/// Generic repository trait defining standard CRUD operations.
///
/// Ids are client-generated v4 UUIDs, so create and update are distinct
/// operations rather than a single upsert.
#[async_trait]
pub trait BaseRepository<T, ID>: Send + Sync {
    /// Find an entity by its unique ID.
    async fn find_by_id(&self, id: ID) -> Result<Option<T>, RepoError>;

    /// Persist a new entity.
    async fn insert(&self, entity: T) -> Result<T, RepoError>;

    /// Persist changes to an existing entity.
    async fn update(&self, entity: T) -> Result<T, RepoError>;

    /// Delete an entity by its ID.
    async fn delete(&self, id: ID) -> Result<(), RepoError>;
}

/// The base collection a post query starts from.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PostSelection {
    /// Every post.
    All,
    /// Posts filed under one category.
    InCategory(Uuid),
    /// Posts written by one author.
    ByAuthor(Uuid),
}

/// Flags steering the post query builder.
///
/// The defaults describe a public listing. Visibility filtering is switched
/// off when an author browses their own profile and on the detail fetch,
/// where the visibility decision is made against the loaded row instead so
/// authors can preview unpublished and scheduled posts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PostQueryOptions {
    /// Restrict to publicly visible posts (published, pub_date reached,
    /// category absent or published).
    pub apply_visibility_filter: bool,
    /// Annotate each row with its comment count.
    pub with_comment_count: bool,
    /// Join author, category and location for display.
    pub eager_related: bool,
    /// Order by descending publication time; otherwise the caller orders.
    pub default_ordering: bool,
}

impl Default for PostQueryOptions {
    fn default() -> Self {
        Self {
            apply_visibility_filter: true,
            with_comment_count: true,
            eager_related: true,
            default_ordering: true,
        }
    }
}

impl PostQueryOptions {
    /// A public listing: everything on.
    pub fn public() -> Self {
        Self::default()
    }

    /// An owner browsing their own posts: no visibility filter.
    pub fn for_owner() -> Self {
        Self {
            apply_visibility_filter: false,
            ..Self::default()
        }
    }

    /// A single-post fetch for the detail page: relations and comment count
    /// but no visibility filter (decided against the loaded row) and no
    /// ordering.
    pub fn detail() -> Self {
        Self {
            apply_visibility_filter: false,
            default_ordering: false,
            ..Self::default()
        }
    }
}

/// User repository with lookups used by login, registration and profiles.
#[async_trait]
pub trait UserRepository: BaseRepository<User, Uuid> {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError>;

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError>;
}

/// Post repository.
#[async_trait]
pub trait PostRepository: BaseRepository<Post, Uuid> {
    /// One page of post overviews for `selection` under `options`.
    async fn page_overviews(
        &self,
        selection: PostSelection,
        options: PostQueryOptions,
        page_size: u64,
        number: PageNumber,
    ) -> Result<Page<PostOverview>, RepoError>;

    /// A single post with its display relations, unfiltered by visibility.
    async fn find_overview(&self, id: Uuid) -> Result<Option<PostOverview>, RepoError>;
}

/// Category repository.
#[async_trait]
pub trait CategoryRepository: BaseRepository<Category, Uuid> {
    /// Look up a published category by slug; unpublished ones are treated
    /// as missing.
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError>;

    /// Published categories, for the post form's select options.
    async fn list_published(&self) -> Result<Vec<Category>, RepoError>;
}

/// Location repository.
#[async_trait]
pub trait LocationRepository: BaseRepository<Location, Uuid> {
    /// Published locations, for the post form's select options.
    async fn list_published(&self) -> Result<Vec<Location>, RepoError>;
}

/// Comment repository.
#[async_trait]
pub trait CommentRepository: BaseRepository<Comment, Uuid> {
    /// The published comments of a post, oldest first.
    async fn visible_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError>;
}
