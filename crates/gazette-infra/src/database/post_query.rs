//! The post query builder.
//!
//! Translates a [`PostSelection`] and [`PostQueryOptions`] into one SeaORM
//! `Select` over the posts table: display relations joined and aliased,
//! the public-visibility predicate applied, each row annotated with its
//! comment count, and the default descending-publication-time ordering.

use chrono::{DateTime, Utc};
use sea_orm::{
    ColumnTrait, Condition, EntityTrait, FromQueryResult, Iterable, JoinType, QueryFilter,
    QueryOrder, QuerySelect, RelationTrait, Select,
};
use uuid::Uuid;

use gazette_core::domain::{CategoryRef, PostOverview};
use gazette_core::ports::{PostQueryOptions, PostSelection};

use super::entity::{category, comment, location, post, user};

/// Flat row produced by the builder when relations and the comment count
/// are selected; reassembled into a [`PostOverview`].
#[derive(Debug, FromQueryResult)]
pub struct PostOverviewRow {
    pub id: Uuid,
    pub title: String,
    pub text: String,
    pub pub_date: DateTime<Utc>,
    pub image: Option<String>,
    pub is_published: bool,
    pub created_at: DateTime<Utc>,
    pub author_id: Uuid,
    pub author_username: String,
    pub category_id: Option<Uuid>,
    pub category_title: Option<String>,
    pub category_slug: Option<String>,
    pub category_is_published: Option<bool>,
    pub location_name: Option<String>,
    pub comment_count: i64,
}

impl From<PostOverviewRow> for PostOverview {
    fn from(row: PostOverviewRow) -> Self {
        let category = match (
            row.category_id,
            row.category_title,
            row.category_slug,
            row.category_is_published,
        ) {
            (Some(id), Some(title), Some(slug), Some(is_published)) => Some(CategoryRef {
                id,
                title,
                slug,
                is_published,
            }),
            _ => None,
        };
        Self {
            id: row.id,
            title: row.title,
            text: row.text,
            pub_date: row.pub_date,
            image: row.image,
            is_published: row.is_published,
            created_at: row.created_at,
            author_id: row.author_id,
            author_username: row.author_username,
            category,
            location_name: row.location_name,
            comment_count: row.comment_count,
        }
    }
}

/// Build the select for `selection` under `options`, with `now` as the
/// publication cutoff.
pub fn build_post_select(
    selection: PostSelection,
    options: PostQueryOptions,
    now: DateTime<Utc>,
) -> Select<post::Entity> {
    let mut select = post::Entity::find();

    match selection {
        PostSelection::All => {}
        PostSelection::InCategory(category_id) => {
            select = select.filter(post::Column::CategoryId.eq(category_id));
        }
        PostSelection::ByAuthor(author_id) => {
            select = select.filter(post::Column::AuthorId.eq(author_id));
        }
    }

    // The category participates in the visibility predicate as well as in
    // display, so join it whenever either flag needs it.
    if options.eager_related || options.apply_visibility_filter {
        select = select.join(JoinType::LeftJoin, post::Relation::Category.def());
    }

    if options.eager_related {
        select = select
            .join(JoinType::InnerJoin, post::Relation::Author.def())
            .join(JoinType::LeftJoin, post::Relation::Location.def())
            .column_as(user::Column::Username, "author_username")
            .column_as(category::Column::Title, "category_title")
            .column_as(category::Column::Slug, "category_slug")
            .column_as(category::Column::IsPublished, "category_is_published")
            .column_as(location::Column::Name, "location_name");
    }

    if options.apply_visibility_filter {
        select = select.filter(visibility_condition(now));
    }

    if options.with_comment_count {
        select = select
            .join(JoinType::LeftJoin, post::Relation::Comments.def())
            .column_as(comment::Column::Id.count(), "comment_count");
        for column in post::Column::iter() {
            select = select.group_by(column);
        }
        if options.eager_related {
            select = select
                .group_by(user::Column::Username)
                .group_by(category::Column::Title)
                .group_by(category::Column::Slug)
                .group_by(category::Column::IsPublished)
                .group_by(location::Column::Name);
        }
    }

    if options.default_ordering {
        select = select.order_by_desc(post::Column::PubDate);
    }

    select
}

/// Published, publication instant reached, category absent or published.
fn visibility_condition(now: DateTime<Utc>) -> Condition {
    Condition::all()
        .add(post::Column::IsPublished.eq(true))
        .add(post::Column::PubDate.lte(now))
        .add(
            Condition::any()
                .add(post::Column::CategoryId.is_null())
                .add(category::Column::IsPublished.eq(true)),
        )
}

#[cfg(test)]
mod tests {
    use super::*;
    use sea_orm::{DbBackend, QueryTrait};

    fn sql(selection: PostSelection, options: PostQueryOptions) -> String {
        build_post_select(selection, options, Utc::now())
            .build(DbBackend::Postgres)
            .to_string()
    }

    #[test]
    fn public_listing_filters_joins_counts_and_orders() {
        let sql = sql(PostSelection::All, PostQueryOptions::public());

        assert!(sql.contains(r#"INNER JOIN "users""#));
        assert!(sql.contains(r#"LEFT JOIN "categories""#));
        assert!(sql.contains(r#"LEFT JOIN "locations""#));
        assert!(sql.contains(r#"LEFT JOIN "comments""#));

        assert!(sql.contains(r#""posts"."is_published""#));
        assert!(sql.contains(r#""posts"."pub_date""#));
        assert!(sql.contains(r#""posts"."category_id" IS NULL"#));
        assert!(sql.contains(r#""categories"."is_published""#));

        assert!(sql.contains("comment_count"));
        assert!(sql.contains("GROUP BY"));
        assert!(sql.contains(r#"ORDER BY "posts"."pub_date" DESC"#));
    }

    #[test]
    fn owner_listing_skips_the_visibility_filter() {
        let sql = sql(PostSelection::All, PostQueryOptions::for_owner());

        // relations are still joined for display, but nothing is filtered
        assert!(!sql.contains("WHERE"));
        assert!(sql.contains(r#"LEFT JOIN "categories""#));
        assert!(sql.contains(r#"ORDER BY "posts"."pub_date" DESC"#));
    }

    #[test]
    fn category_selection_narrows_the_base_set() {
        let category_id = Uuid::new_v4();
        let sql = sql(
            PostSelection::InCategory(category_id),
            PostQueryOptions::public(),
        );
        assert!(sql.contains(r#""posts"."category_id" ="#));
        assert!(sql.contains(&category_id.to_string()));
    }

    #[test]
    fn author_selection_narrows_the_base_set() {
        let author_id = Uuid::new_v4();
        let sql = sql(PostSelection::ByAuthor(author_id), PostQueryOptions::public());
        assert!(sql.contains(r#""posts"."author_id" ="#));
        assert!(sql.contains(&author_id.to_string()));
    }

    #[test]
    fn count_and_ordering_can_be_switched_off() {
        let options = PostQueryOptions {
            with_comment_count: false,
            default_ordering: false,
            ..PostQueryOptions::public()
        };
        let sql = sql(PostSelection::All, options);
        assert!(!sql.contains("comment_count"));
        assert!(!sql.contains("GROUP BY"));
        assert!(!sql.contains("ORDER BY"));
    }

    #[test]
    fn visibility_filter_joins_category_even_without_eager_relations() {
        let options = PostQueryOptions {
            eager_related: false,
            with_comment_count: false,
            default_ordering: false,
            apply_visibility_filter: true,
        };
        let sql = sql(PostSelection::All, options);
        assert!(sql.contains(r#"LEFT JOIN "categories""#));
        assert!(!sql.contains(r#"INNER JOIN "users""#));
    }

    #[test]
    fn overview_row_reassembles_category() {
        let row = PostOverviewRow {
            id: Uuid::new_v4(),
            title: "t".into(),
            text: "x".into(),
            pub_date: Utc::now(),
            image: None,
            is_published: true,
            created_at: Utc::now(),
            author_id: Uuid::new_v4(),
            author_username: "a".into(),
            category_id: Some(Uuid::new_v4()),
            category_title: Some("travel".into()),
            category_slug: Some("travel".into()),
            category_is_published: Some(true),
            location_name: None,
            comment_count: 2,
        };
        let overview: PostOverview = row.into();
        let category = overview.category.expect("category joined");
        assert_eq!(category.slug, "travel");
        assert_eq!(overview.comment_count, 2);
    }

    #[test]
    fn overview_row_without_category_maps_to_none() {
        let row = PostOverviewRow {
            id: Uuid::new_v4(),
            title: "t".into(),
            text: "x".into(),
            pub_date: Utc::now(),
            image: None,
            is_published: true,
            created_at: Utc::now(),
            author_id: Uuid::new_v4(),
            author_username: "a".into(),
            category_id: None,
            category_title: None,
            category_slug: None,
            category_is_published: None,
            location_name: Some("home".into()),
            comment_count: 0,
        };
        let overview: PostOverview = row.into();
        assert!(overview.category.is_none());
        assert_eq!(overview.location_name.as_deref(), Some("home"));
    }
}
