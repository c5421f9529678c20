use super::{checked, empty_string_as_none, html, redirect, with_conn};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::models::{ActiveContext, Article, ArticleInput, Category};
use crate::views;
use actix_web::{delete, get, post, put, web, HttpResponse};
use actix_web_validator::Form;
use diesel::SqliteConnection;
use log::info;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct ArticleForm {
    #[validate(length(min = 1, max = 255))]
    title: String,
    #[validate(length(min = 1, max = 1000000))]
    full_text: String,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    category_id: Option<i32>,
    #[serde(default)]
    published: Option<String>,
}

impl ArticleForm {
    fn into_input(self) -> ArticleInput {
        let publish = checked(&self.published);
        ArticleInput {
            title: self.title,
            full_text: self.full_text,
            category_id: self.category_id,
            publish,
        }
    }
}

fn ensure_category(conn: &mut SqliteConnection, category_id: Option<i32>) -> AppResult<()> {
    if let Some(id) = category_id {
        if Category::find(conn, id)?.is_none() {
            return Err(AppError::bad_request(format!("No category with id {}", id)));
        }
    }
    Ok(())
}

/// Fetches an article the actor may change: outside the actor's scope it
/// does not exist, inside it the update check still applies.
fn find_for_update(
    conn: &mut SqliteConnection,
    context: &ActiveContext,
    id: i32,
) -> AppResult<Article> {
    let article = Article::find(conn, context.article_scope(), id)?
        .ok_or_else(|| AppError::not_found(format!("No article found with id: {}", id)))?;
    if !article.can_update(context) {
        return Err(AppError::forbidden(format!("article {}", id)));
    }
    Ok(article)
}

#[get("/articles")]
pub async fn index(current: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let scope = current.context.article_scope();
    let rows = with_conn(pool, move |conn| Ok(Article::list(conn, scope)?)).await?;
    Ok(html(views::articles_index(&current.context, &rows)))
}

#[get("/articles/create")]
pub async fn create(current: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let categories = with_conn(pool, |conn| Ok(Category::all(conn)?)).await?;
    Ok(html(views::article_form(&current.context, None, &categories)))
}

#[post("/articles")]
pub async fn store(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    form: Form<ArticleForm>,
) -> AppResult<HttpResponse> {
    let input = form.into_inner().into_input();
    let context = current.context;
    let article = with_conn(pool, move |conn| {
        ensure_category(conn, input.category_id)?;
        Ok(Article::create(conn, &context, &input)?)
    })
    .await?;
    info!(
        "article {} created by user {} for owner {}",
        article.id, current.user.id, article.user_id
    );
    Ok(redirect("/articles"))
}

#[get("/articles/{id}/edit")]
pub async fn edit(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<(i32,)>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner().0;
    let context = current.context.clone();
    let (article, categories) = with_conn(pool, move |conn| {
        let article = find_for_update(conn, &context, id)?;
        Ok((article, Category::all(conn)?))
    })
    .await?;
    Ok(html(views::article_form(
        &current.context,
        Some(&article),
        &categories,
    )))
}

#[put("/articles/{id}")]
pub async fn update(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<(i32,)>,
    form: Form<ArticleForm>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner().0;
    let input = form.into_inner().into_input();
    let context = current.context;
    with_conn(pool, move |conn| {
        let mut article = find_for_update(conn, &context, id)?;
        ensure_category(conn, input.category_id)?;
        article.update(conn, &context, &input)?;
        Ok(())
    })
    .await?;
    info!("article {} updated by user {}", id, current.user.id);
    Ok(redirect("/articles"))
}

#[delete("/articles/{id}")]
pub async fn destroy(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<(i32,)>,
) -> AppResult<HttpResponse> {
    let id = path.into_inner().0;
    let context = current.context;
    with_conn(pool, move |conn| {
        find_for_update(conn, &context, id)?.delete(conn)?;
        Ok(())
    })
    .await?;
    info!("article {} deleted by user {}", id, current.user.id);
    Ok(redirect("/articles"))
}
