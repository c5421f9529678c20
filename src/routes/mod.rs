use crate::db::DbPool;
use crate::error::AppResult;
use crate::views;
use actix_web::http::header::{self, ContentType};
use actix_web::{get, web, HttpResponse};
use diesel::SqliteConnection;
use serde::{de, Deserialize, Deserializer};
pub mod articles;
pub mod auth;
pub mod categories;
pub mod organizations;

#[get("/")]
pub async fn index() -> HttpResponse {
    html(views::welcome_page())
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(index)
        .service(auth::login_form)
        .service(auth::login)
        .service(auth::logout)
        .service(auth::register_form)
        .service(auth::register)
        .service(articles::index)
        .service(articles::create)
        .service(articles::store)
        .service(articles::edit)
        .service(articles::update)
        .service(articles::destroy)
        .service(categories::index)
        .service(categories::create)
        .service(categories::store)
        .service(categories::edit)
        .service(categories::update)
        .service(categories::destroy)
        .service(organizations::home)
        .service(organizations::join_form)
        .service(organizations::join)
        .service(organizations::switch)
        .service(organizations::invite);
}

/// Runs blocking database work on the blocking pool with a pooled
/// connection.
pub(crate) async fn with_conn<F, T>(pool: web::Data<DbPool>, f: F) -> AppResult<T>
where
    F: FnOnce(&mut SqliteConnection) -> AppResult<T> + Send + 'static,
    T: Send + 'static,
{
    web::block(move || {
        let mut conn = pool.get()?;
        f(&mut conn)
    })
    .await?
}

pub(crate) fn html(page: String) -> HttpResponse {
    HttpResponse::Ok()
        .content_type(ContentType::html())
        .body(page)
}

pub(crate) fn redirect(location: &str) -> HttpResponse {
    HttpResponse::SeeOther()
        .insert_header((header::LOCATION, location))
        .finish()
}

/// Keeps redirect targets on this site: paths only, no scheme-relative URLs.
pub(crate) fn local_path(target: Option<&str>) -> Option<&str> {
    target.filter(|t| t.starts_with('/') && !t.starts_with("//") && !t.starts_with("/\\"))
}

/// Form select values: an empty string means "none".
pub(crate) fn empty_string_as_none<'de, D>(deserializer: D) -> Result<Option<i32>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<i32>().map(Some).map_err(de::Error::custom),
    }
}

/// Checkbox values: present and not "0".
pub(crate) fn checked(value: &Option<String>) -> bool {
    matches!(value.as_deref(), Some(v) if !v.is_empty() && v != "0")
}
