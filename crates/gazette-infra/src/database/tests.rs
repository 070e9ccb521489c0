#[cfg(test)]
mod tests {
    use sea_orm::{DatabaseBackend, MockDatabase, MockExecResult};
    use uuid::Uuid;

    use gazette_core::domain::{Category, Post, User};
    use gazette_core::error::RepoError;
    use gazette_core::ports::{BaseRepository, CategoryRepository, UserRepository};

    use crate::database::entity::{category, post, user};
    use crate::database::postgres_repo::{
        PostgresCategoryRepository, PostgresPostRepository, PostgresUserRepository,
    };

    fn post_model(id: Uuid, author_id: Uuid) -> post::Model {
        let now = chrono::Utc::now();
        post::Model {
            id,
            author_id,
            title: "Test Post".to_owned(),
            text: "Content".to_owned(),
            pub_date: now.into(),
            location_id: None,
            category_id: None,
            image: None,
            is_published: true,
            created_at: now.into(),
        }
    }

    #[tokio::test]
    async fn find_post_by_id_maps_to_domain() {
        let post_id = Uuid::new_v4();
        let author_id = Uuid::new_v4();

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![post_model(post_id, author_id)]])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Option<Post> = repo.find_by_id(post_id).await.unwrap();

        let post = result.expect("post found");
        assert_eq!(post.id, post_id);
        assert_eq!(post.author_id, author_id);
        assert_eq!(post.title, "Test Post");
    }

    #[tokio::test]
    async fn find_user_by_username() {
        let now = chrono::Utc::now();
        let model = user::Model {
            id: Uuid::new_v4(),
            username: "casey".to_owned(),
            first_name: String::new(),
            last_name: String::new(),
            email: "casey@example.com".to_owned(),
            password_hash: "hash".to_owned(),
            avatar: None,
            created_at: now.into(),
            updated_at: now.into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresUserRepository::new(db);

        let user: Option<User> = repo.find_by_username("casey").await.unwrap();
        assert_eq!(user.unwrap().email, "casey@example.com");
    }

    #[tokio::test]
    async fn category_slug_lookup_maps_to_domain() {
        let model = category::Model {
            id: Uuid::new_v4(),
            title: "Travel".to_owned(),
            description: "Places".to_owned(),
            slug: "travel".to_owned(),
            is_published: true,
            created_at: chrono::Utc::now().into(),
        };

        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_query_results(vec![vec![model]])
            .into_connection();

        let repo = PostgresCategoryRepository::new(db);

        let category: Option<Category> = repo.find_published_by_slug("travel").await.unwrap();
        assert_eq!(category.unwrap().title, "Travel");
    }

    #[tokio::test]
    async fn deleting_a_missing_row_is_not_found() {
        let db = MockDatabase::new(DatabaseBackend::Postgres)
            .append_exec_results(vec![MockExecResult {
                last_insert_id: 0,
                rows_affected: 0,
            }])
            .into_connection();

        let repo = PostgresPostRepository::new(db);

        let result: Result<(), _> =
            BaseRepository::<Post, Uuid>::delete(&repo, Uuid::new_v4()).await;
        assert!(matches!(result, Err(RepoError::NotFound)));
    }
}
