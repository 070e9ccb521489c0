use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Post entity - a blog publication.
///
/// `pub_date` may lie in the future: a scheduled post stays invisible to
/// everyone but its author until the publication instant passes.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Post {
    pub id: Uuid,
    pub author_id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub location_id: Option<Uuid>,
    pub category_id: Option<Uuid>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
}

impl Post {
    /// Create a new published post with a generated ID.
    pub fn new(
        author_id: Uuid,
        title: String,
        text: String,
        pub_date: DateTime<Utc>,
        location_id: Option<Uuid>,
        category_id: Option<Uuid>,
        image: Option<String>,
    ) -> Self {
        Self {
            id: Uuid::new_v4(),
            author_id,
            title,
            text,
            pub_date,
            location_id,
            category_id,
            image,
            is_published: true,
            created_at: Utc::now(),
        }
    }
}

/// The slice of a category a post listing needs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CategoryRef {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub is_published: bool,
}

/// A post joined with its display relations and comment count, as returned
/// by the post query builder for listings and the detail page.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PostOverview {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub category: Option<CategoryRef>,
    pub location_name: Option<String>,
    pub comment_count: i64,
}

impl PostOverview {
    /// Whether the post satisfies the public-visibility predicate:
    /// published, publication instant reached, and its category (if any)
    /// published.
    pub fn is_publicly_visible(&self, now: DateTime<Utc>) -> bool {
        self.is_published
            && self.pub_date <= now
            && self.category.as_ref().is_none_or(|c| c.is_published)
    }

    /// Whether `viewer` may see the post. Authors see their own posts
    /// unconditionally, so they can preview unpublished or scheduled ones.
    pub fn is_visible_to(&self, viewer: Option<Uuid>, now: DateTime<Utc>) -> bool {
        self.is_publicly_visible(now) || viewer == Some(self.author_id)
    }
}
