//! Shared fixtures for handler tests: an in-memory database and signed-in
//! users.

use crate::auth;
use crate::config::Config;
use crate::db::{create_test_pool, DbPool};
use crate::models::{Article, Role, Session, User};
use crate::schema::{articles, sessions};
use diesel::prelude::*;

pub fn setup() -> (DbPool, Config) {
    (create_test_pool(), Config::for_tests())
}

pub fn create_user(pool: &DbPool, name: &str, role: Role) -> User {
    let mut conn = pool.get().unwrap();
    User::create(
        &mut conn,
        name,
        &format!("{}@example.com", name),
        "password",
        role,
    )
    .unwrap()
}

/// Opens a session for `user` and returns an `Authorization` header value.
pub fn sign_in(pool: &DbPool, config: &Config, user: &User) -> String {
    let mut conn = pool.get().unwrap();
    let session = Session::create(&mut conn, user).unwrap();
    let token = auth::issue_token(&config.jwt_secret, user.id, session.id, 1).unwrap();
    format!("Bearer {}", token)
}

pub fn session_of(pool: &DbPool, user: &User) -> Session {
    let mut conn = pool.get().unwrap();
    sessions::table
        .filter(sessions::user_id.eq(user.id))
        .order(sessions::id.desc())
        .select(Session::as_select())
        .first(&mut conn)
        .unwrap()
}

pub fn all_articles(pool: &DbPool) -> Vec<Article> {
    let mut conn = pool.get().unwrap();
    articles::table
        .order(articles::id.asc())
        .select(Article::as_select())
        .load(&mut conn)
        .unwrap()
}

pub async fn body_text(resp: actix_web::dev::ServiceResponse) -> String {
    let body = actix_web::test::read_body(resp).await;
    String::from_utf8_lossy(&body).into_owned()
}

/// Builds the full application around `$pool` and `$config`.
macro_rules! init_app {
    ($pool:expr, $config:expr) => {
        actix_web::test::init_service(
            actix_web::App::new()
                .app_data(actix_web::web::Data::new($pool.clone()))
                .app_data(actix_web::web::Data::new($config.clone()))
                .wrap(crate::middleware::MethodOverride)
                .configure(crate::routes::configure),
        )
        .await
    };
}
pub(crate) use init_app;
