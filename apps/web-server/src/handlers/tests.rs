//! Handler tests against stub repositories.
//!
//! The stubs implement the core ports over in-memory data so the tests can
//! drive real routes end to end: visibility gating on the detail page,
//! ownership redirects, and the force-set author on creation.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use actix_web::dev::ServiceResponse;
use actix_web::{App, cookie::Cookie, http::header, test, web};
use async_trait::async_trait;
use chrono::{TimeDelta, Utc};
use uuid::Uuid;

use gazette_core::domain::{
    Category, Comment, CommentView, Location, Post, PostOverview, User,
};
use gazette_core::error::RepoError;
use gazette_core::pagination::{Page, PageNumber};
use gazette_core::ports::{
    BaseRepository, CategoryRepository, CommentRepository, LocationRepository, PasswordService,
    PostQueryOptions, PostRepository, PostSelection, SessionService, UserRepository,
};
use gazette_infra::auth::{Argon2PasswordService, SessionConfig, SignedSessionService};

use crate::csrf::CSRF_COOKIE;
use crate::middleware::auth::SESSION_COOKIE;
use crate::state::AppState;

#[derive(Default)]
struct StubUsers {
    users: Vec<User>,
}

#[async_trait]
impl BaseRepository<User, Uuid> for StubUsers {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<User>, RepoError> {
        Ok(self.users.iter().find(|u| u.id == id).cloned())
    }

    async fn insert(&self, entity: User) -> Result<User, RepoError> {
        Ok(entity)
    }

    async fn update(&self, entity: User) -> Result<User, RepoError> {
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl UserRepository for StubUsers {
    async fn find_by_username(&self, username: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.iter().find(|u| u.username == username).cloned())
    }

    async fn find_by_email(&self, email: &str) -> Result<Option<User>, RepoError> {
        Ok(self.users.iter().find(|u| u.email == email).cloned())
    }
}

#[derive(Default)]
struct StubPosts {
    posts: Vec<Post>,
    overviews: Vec<PostOverview>,
    inserted: Mutex<Vec<Post>>,
    updates: AtomicUsize,
    deletes: AtomicUsize,
}

#[async_trait]
impl BaseRepository<Post, Uuid> for StubPosts {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Post>, RepoError> {
        Ok(self.posts.iter().find(|p| p.id == id).cloned())
    }

    async fn insert(&self, entity: Post) -> Result<Post, RepoError> {
        self.inserted.lock().unwrap().push(entity.clone());
        Ok(entity)
    }

    async fn update(&self, entity: Post) -> Result<Post, RepoError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl PostRepository for StubPosts {
    async fn page_overviews(
        &self,
        selection: PostSelection,
        options: PostQueryOptions,
        page_size: u64,
        number: PageNumber,
    ) -> Result<Page<PostOverview>, RepoError> {
        let now = Utc::now();
        let items: Vec<PostOverview> = self
            .overviews
            .iter()
            .filter(|o| match selection {
                PostSelection::All => true,
                PostSelection::InCategory(id) => {
                    o.category.as_ref().is_some_and(|c| c.id == id)
                }
                PostSelection::ByAuthor(id) => o.author_id == id,
            })
            .filter(|o| !options.apply_visibility_filter || o.is_publicly_visible(now))
            .cloned()
            .collect();

        let total = items.len() as u64;
        let total_pages = gazette_core::pagination::total_pages(total, page_size);
        Ok(Page::new(items, number.clamp(total_pages), total_pages, total))
    }

    async fn find_overview(&self, id: Uuid) -> Result<Option<PostOverview>, RepoError> {
        Ok(self.overviews.iter().find(|o| o.id == id).cloned())
    }
}

#[derive(Default)]
struct StubCategories {
    categories: Vec<Category>,
}

#[async_trait]
impl BaseRepository<Category, Uuid> for StubCategories {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Category>, RepoError> {
        Ok(self.categories.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, entity: Category) -> Result<Category, RepoError> {
        Ok(entity)
    }

    async fn update(&self, entity: Category) -> Result<Category, RepoError> {
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl CategoryRepository for StubCategories {
    async fn find_published_by_slug(&self, slug: &str) -> Result<Option<Category>, RepoError> {
        Ok(self
            .categories
            .iter()
            .find(|c| c.slug == slug && c.is_published)
            .cloned())
    }

    async fn list_published(&self) -> Result<Vec<Category>, RepoError> {
        Ok(self
            .categories
            .iter()
            .filter(|c| c.is_published)
            .cloned()
            .collect())
    }
}

#[derive(Default)]
struct StubLocations;

#[async_trait]
impl BaseRepository<Location, Uuid> for StubLocations {
    async fn find_by_id(&self, _id: Uuid) -> Result<Option<Location>, RepoError> {
        Ok(None)
    }

    async fn insert(&self, entity: Location) -> Result<Location, RepoError> {
        Ok(entity)
    }

    async fn update(&self, entity: Location) -> Result<Location, RepoError> {
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        Ok(())
    }
}

#[async_trait]
impl LocationRepository for StubLocations {
    async fn list_published(&self) -> Result<Vec<Location>, RepoError> {
        Ok(Vec::new())
    }
}

#[derive(Default)]
struct StubComments {
    comments: Vec<Comment>,
    deletes: AtomicUsize,
    updates: AtomicUsize,
}

#[async_trait]
impl BaseRepository<Comment, Uuid> for StubComments {
    async fn find_by_id(&self, id: Uuid) -> Result<Option<Comment>, RepoError> {
        Ok(self.comments.iter().find(|c| c.id == id).cloned())
    }

    async fn insert(&self, entity: Comment) -> Result<Comment, RepoError> {
        Ok(entity)
    }

    async fn update(&self, entity: Comment) -> Result<Comment, RepoError> {
        self.updates.fetch_add(1, Ordering::SeqCst);
        Ok(entity)
    }

    async fn delete(&self, _id: Uuid) -> Result<(), RepoError> {
        self.deletes.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}

#[async_trait]
impl CommentRepository for StubComments {
    async fn visible_for_post(&self, post_id: Uuid) -> Result<Vec<CommentView>, RepoError> {
        Ok(self
            .comments
            .iter()
            .filter(|c| c.post_id == post_id && c.is_published)
            .map(|c| CommentView {
                id: c.id,
                post_id: c.post_id,
                author_id: c.author_id,
                author_username: "someone".to_owned(),
                text: c.text.clone(),
                created_at: c.created_at,
            })
            .collect())
    }
}

fn templates() -> tera::Tera {
    tera::Tera::new(concat!(env!("CARGO_MANIFEST_DIR"), "/templates/**/*.html"))
        .expect("templates parse")
}

fn test_sessions() -> Arc<SignedSessionService> {
    Arc::new(SignedSessionService::new(SessionConfig {
        secret: "test-secret".to_string(),
        expiration_hours: 1,
    }))
}

fn test_user(username: &str) -> User {
    User::new(
        username.to_owned(),
        format!("{username}@example.com"),
        "hash".to_owned(),
    )
}

fn overview_for(post: &Post, author: &User) -> PostOverview {
    PostOverview {
        id: post.id,
        title: post.title.clone(),
        text: post.text.clone(),
        pub_date: post.pub_date,
        image: post.image.clone(),
        is_published: post.is_published,
        created_at: post.created_at,
        author_id: post.author_id,
        author_username: author.username.clone(),
        category: None,
        location_name: None,
        comment_count: 0,
    }
}

struct TestApp {
    state: AppState,
    sessions: Arc<SignedSessionService>,
    posts: Arc<StubPosts>,
    comments: Arc<StubComments>,
}

impl TestApp {
    fn new(
        users: StubUsers,
        posts: StubPosts,
        categories: StubCategories,
        comments: StubComments,
    ) -> Self {
        let posts = Arc::new(posts);
        let comments = Arc::new(comments);
        let state = AppState {
            templates: Arc::new(templates()),
            users: Arc::new(users),
            posts: posts.clone(),
            categories: Arc::new(categories),
            locations: Arc::new(StubLocations),
            comments: comments.clone(),
        };
        Self {
            state,
            sessions: test_sessions(),
            posts,
            comments,
        }
    }

    fn sessions_dyn(&self) -> Arc<dyn SessionService> {
        self.sessions.clone()
    }

    fn passwords_dyn(&self) -> Arc<dyn PasswordService> {
        Arc::new(Argon2PasswordService::new())
    }

    fn session_cookie(&self, user: &User) -> Cookie<'static> {
        let token = self.sessions.issue(user.id, &user.username).unwrap();
        Cookie::new(SESSION_COOKIE, token)
    }
}

// the concrete service type is unnameable, so assembly lives in a macro
macro_rules! init_app {
    ($app:expr) => {
        test::init_service(
            App::new()
                .app_data(web::Data::new($app.state.clone()))
                .app_data(web::Data::new($app.sessions_dyn()))
                .app_data(web::Data::new($app.passwords_dyn()))
                .configure(super::configure_routes),
        )
        .await
    };
}

fn location_of<B>(response: &ServiceResponse<B>) -> &str {
    response
        .headers()
        .get(header::LOCATION)
        .expect("redirect location")
        .to_str()
        .unwrap()
}

#[actix_web::test]
async fn hidden_post_detail_is_404_for_strangers_and_200_for_the_author() {
    let author = test_user("author");
    let stranger = test_user("stranger");

    let mut post = Post::new(
        author.id,
        "Draft".to_owned(),
        "Not ready".to_owned(),
        Utc::now() - TimeDelta::hours(1),
        None,
        None,
        None,
    );
    post.is_published = false;

    let app = TestApp::new(
        StubUsers {
            users: vec![author.clone(), stranger.clone()],
        },
        StubPosts {
            posts: vec![post.clone()],
            overviews: vec![overview_for(&post, &author)],
            ..StubPosts::default()
        },
        StubCategories::default(),
        StubComments::default(),
    );
    let service = init_app!(app);
    let url = format!("/posts/{}", post.id);

    let anonymous = test::call_service(&service, test::TestRequest::get().uri(&url).to_request())
        .await;
    assert_eq!(anonymous.status(), 404);

    let as_stranger = test::call_service(
        &service,
        test::TestRequest::get()
            .uri(&url)
            .cookie(app.session_cookie(&stranger))
            .to_request(),
    )
    .await;
    assert_eq!(as_stranger.status(), 404);

    let as_author = test::call_service(
        &service,
        test::TestRequest::get()
            .uri(&url)
            .cookie(app.session_cookie(&author))
            .to_request(),
    )
    .await;
    assert_eq!(as_author.status(), 200);
}

#[actix_web::test]
async fn scheduled_post_is_visible_only_to_its_author() {
    let author = test_user("author");
    let post = Post::new(
        author.id,
        "Tomorrow".to_owned(),
        "Soon".to_owned(),
        Utc::now() + TimeDelta::days(1),
        None,
        None,
        None,
    );

    let app = TestApp::new(
        StubUsers {
            users: vec![author.clone()],
        },
        StubPosts {
            posts: vec![post.clone()],
            overviews: vec![overview_for(&post, &author)],
            ..StubPosts::default()
        },
        StubCategories::default(),
        StubComments::default(),
    );
    let service = init_app!(app);
    let url = format!("/posts/{}", post.id);

    let anonymous =
        test::call_service(&service, test::TestRequest::get().uri(&url).to_request()).await;
    assert_eq!(anonymous.status(), 404);

    let as_author = test::call_service(
        &service,
        test::TestRequest::get()
            .uri(&url)
            .cookie(app.session_cookie(&author))
            .to_request(),
    )
    .await;
    assert_eq!(as_author.status(), 200);
}

#[actix_web::test]
async fn editing_a_post_as_non_owner_redirects_without_mutating() {
    let author = test_user("author");
    let intruder = test_user("intruder");
    let post = Post::new(
        author.id,
        "Mine".to_owned(),
        "Original".to_owned(),
        Utc::now() - TimeDelta::hours(1),
        None,
        None,
        None,
    );

    let app = TestApp::new(
        StubUsers {
            users: vec![author.clone(), intruder.clone()],
        },
        StubPosts {
            posts: vec![post.clone()],
            overviews: vec![overview_for(&post, &author)],
            ..StubPosts::default()
        },
        StubCategories::default(),
        StubComments::default(),
    );
    let service = init_app!(app);

    let response = test::call_service(
        &service,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/edit", post.id))
            .cookie(app.session_cookie(&intruder))
            .cookie(Cookie::new(CSRF_COOKIE, "tok"))
            .set_form([
                ("csrf_token", "tok"),
                ("title", "Hijacked"),
                ("text", "Rewritten"),
                ("pub_date", "2026-01-01T00:00"),
            ])
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), 303);
    assert_eq!(location_of(&response), format!("/posts/{}", post.id));

    assert_eq!(app.posts.updates.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn creating_a_post_forces_the_author_to_the_requester() {
    let author = test_user("casey");
    let forged = Uuid::new_v4();

    let app = TestApp::new(
        StubUsers {
            users: vec![author.clone()],
        },
        StubPosts::default(),
        StubCategories::default(),
        StubComments::default(),
    );
    let service = init_app!(app);

    let forged_value = forged.to_string();
    let response = test::call_service(
        &service,
        test::TestRequest::post()
            .uri("/posts/create")
            .cookie(app.session_cookie(&author))
            .cookie(Cookie::new(CSRF_COOKIE, "tok"))
            .set_form([
                ("csrf_token", "tok"),
                ("title", "Hello"),
                ("text", "World"),
                ("pub_date", "2026-05-01T10:00"),
                // an author field is not part of the form and must be ignored
                ("author", forged_value.as_str()),
            ])
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), 303);
    assert_eq!(location_of(&response), "/profile/casey");

    let inserted = app.posts.inserted.lock().unwrap();
    assert_eq!(inserted.len(), 1);
    assert_eq!(inserted[0].author_id, author.id);
    assert_ne!(inserted[0].author_id, forged);
}

#[actix_web::test]
async fn create_requires_login() {
    let app = TestApp::new(
        StubUsers::default(),
        StubPosts::default(),
        StubCategories::default(),
        StubComments::default(),
    );
    let service = init_app!(app);

    let response = test::call_service(
        &service,
        test::TestRequest::get().uri("/posts/create").to_request(),
    )
    .await;

    assert_eq!(response.status(), 303);
    assert_eq!(location_of(&response), "/auth/login");
}

#[actix_web::test]
async fn deleting_a_comment_as_non_owner_redirects_without_mutating() {
    let author = test_user("author");
    let intruder = test_user("intruder");
    let post = Post::new(
        author.id,
        "Post".to_owned(),
        "Body".to_owned(),
        Utc::now() - TimeDelta::hours(1),
        None,
        None,
        None,
    );
    let comment = Comment::new(post.id, author.id, "mine".to_owned());

    let app = TestApp::new(
        StubUsers {
            users: vec![author.clone(), intruder.clone()],
        },
        StubPosts {
            posts: vec![post.clone()],
            overviews: vec![overview_for(&post, &author)],
            ..StubPosts::default()
        },
        StubCategories::default(),
        StubComments {
            comments: vec![comment.clone()],
            ..StubComments::default()
        },
    );
    let service = init_app!(app);

    let response = test::call_service(
        &service,
        test::TestRequest::post()
            .uri(&format!("/posts/{}/delete_comment/{}", post.id, comment.id))
            .cookie(app.session_cookie(&intruder))
            .cookie(Cookie::new(CSRF_COOKIE, "tok"))
            .set_form([("csrf_token", "tok")])
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), 303);
    assert_eq!(location_of(&response), format!("/posts/{}", post.id));

    assert_eq!(app.comments.deletes.load(Ordering::SeqCst), 0);
}

#[actix_web::test]
async fn unpublished_category_page_is_404() {
    let mut category = Category::new(
        "Travel".to_owned(),
        "Places".to_owned(),
        "travel".to_owned(),
    );
    category.is_published = false;

    let app = TestApp::new(
        StubUsers::default(),
        StubPosts::default(),
        StubCategories {
            categories: vec![category],
        },
        StubComments::default(),
    );
    let service = init_app!(app);

    let response = test::call_service(
        &service,
        test::TestRequest::get().uri("/category/travel").to_request(),
    )
    .await;
    assert_eq!(response.status(), 404);
}

#[actix_web::test]
async fn mutating_without_a_csrf_token_is_rejected() {
    let author = test_user("author");
    let app = TestApp::new(
        StubUsers {
            users: vec![author.clone()],
        },
        StubPosts::default(),
        StubCategories::default(),
        StubComments::default(),
    );
    let service = init_app!(app);

    let response = test::call_service(
        &service,
        test::TestRequest::post()
            .uri("/posts/create")
            .cookie(app.session_cookie(&author))
            .set_form([("title", "Hello"), ("text", "World")])
            .to_request(),
    )
    .await;

    assert_eq!(response.status(), 403);
}
