use super::{html, redirect, with_conn};
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::extractors::CurrentUser;
use crate::models::{Capability, Category};
use crate::views;
use actix_web::{delete, get, post, put, web, HttpResponse};
use actix_web_validator::Form;
use diesel::SqliteConnection;
use log::info;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct CategoryForm {
    #[validate(length(min = 1, max = 255))]
    name: String,
}

fn find(conn: &mut SqliteConnection, id: i32) -> AppResult<Category> {
    Category::find(conn, id)?
        .ok_or_else(|| AppError::not_found(format!("No category found with id: {}", id)))
}

#[get("/categories")]
pub async fn index(current: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    current.authorize(Capability::ManageCategories)?;
    let categories = with_conn(pool, |conn| Ok(Category::all(conn)?)).await?;
    Ok(html(views::categories_index(&current.context, &categories)))
}

#[get("/categories/create")]
pub async fn create(current: CurrentUser) -> AppResult<HttpResponse> {
    current.authorize(Capability::ManageCategories)?;
    Ok(html(views::category_form(&current.context, None)))
}

#[post("/categories")]
pub async fn store(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    form: Form<CategoryForm>,
) -> AppResult<HttpResponse> {
    current.authorize(Capability::ManageCategories)?;
    let CategoryForm { name } = form.into_inner();
    let category = with_conn(pool, move |conn| Ok(Category::create(conn, name.trim())?)).await?;
    info!("category {} created by user {}", category.id, current.user.id);
    Ok(redirect("/categories"))
}

#[get("/categories/{id}/edit")]
pub async fn edit(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<(i32,)>,
) -> AppResult<HttpResponse> {
    current.authorize(Capability::ManageCategories)?;
    let id = path.into_inner().0;
    let category = with_conn(pool, move |conn| find(conn, id)).await?;
    Ok(html(views::category_form(&current.context, Some(&category))))
}

#[put("/categories/{id}")]
pub async fn update(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<(i32,)>,
    form: Form<CategoryForm>,
) -> AppResult<HttpResponse> {
    current.authorize(Capability::ManageCategories)?;
    let id = path.into_inner().0;
    let CategoryForm { name } = form.into_inner();
    with_conn(pool, move |conn| {
        find(conn, id)?.rename(conn, name.trim())?;
        Ok(())
    })
    .await?;
    Ok(redirect("/categories"))
}

#[delete("/categories/{id}")]
pub async fn destroy(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<(i32,)>,
) -> AppResult<HttpResponse> {
    current.authorize(Capability::ManageCategories)?;
    let id = path.into_inner().0;
    with_conn(pool, move |conn| {
        find(conn, id)?.delete(conn)?;
        Ok(())
    })
    .await?;
    info!("category {} deleted by user {}", id, current.user.id);
    Ok(redirect("/categories"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Role;
    use crate::test_util::{body_text, create_user, init_app, setup, sign_in};
    use actix_web::http::header;
    use actix_web::test;

    #[actix_rt::test]
    async fn test_only_admin_can_access_categories() {
        let (pool, config) = setup();
        let user = create_user(&pool, "alice", Role::User);
        let publisher = create_user(&pool, "pat", Role::Publisher);
        let admin = create_user(&pool, "root", Role::Admin);
        let user_auth = sign_in(&pool, &config, &user);
        let publisher_auth = sign_in(&pool, &config, &publisher);
        let admin_auth = sign_in(&pool, &config, &admin);
        let app = init_app!(pool, config);

        for (auth, status) in [(user_auth, 403), (publisher_auth, 403), (admin_auth, 200)] {
            let req = test::TestRequest::get()
                .uri("/categories")
                .insert_header((header::AUTHORIZATION, auth))
                .to_request();
            assert_eq!(test::call_service(&app, req).await.status().as_u16(), status);
        }
    }

    #[actix_rt::test]
    async fn test_admin_manages_categories() {
        let (pool, config) = setup();
        let admin = create_user(&pool, "root", Role::Admin);
        let auth = sign_in(&pool, &config, &admin);
        let app = init_app!(pool, config);

        let req = test::TestRequest::post()
            .uri("/categories")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_form(&CategoryForm {
                name: "News".to_string(),
            })
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_redirection());
        let id = {
            let mut conn = pool.get().unwrap();
            Category::all(&mut conn).unwrap()[0].id
        };

        let req = test::TestRequest::put()
            .uri(&format!("/categories/{}", id))
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_form(&CategoryForm {
                name: "Updates".to_string(),
            })
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_redirection());

        let req = test::TestRequest::get()
            .uri("/categories")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Updates"));
        assert!(!body.contains("News"));

        let req = test::TestRequest::delete()
            .uri(&format!("/categories/{}", id))
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_redirection());

        let req = test::TestRequest::get()
            .uri(&format!("/categories/{}/edit", id))
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
    }

    #[actix_rt::test]
    async fn test_publisher_cannot_create_category() {
        let (pool, config) = setup();
        let publisher = create_user(&pool, "pat", Role::Publisher);
        let auth = sign_in(&pool, &config, &publisher);
        let app = init_app!(pool, config);

        let req = test::TestRequest::post()
            .uri("/categories")
            .insert_header((header::AUTHORIZATION, auth))
            .set_form(&CategoryForm {
                name: "News".to_string(),
            })
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 403);
        let mut conn = pool.get().unwrap();
        assert!(Category::all(&mut conn).unwrap().is_empty());
    }
}
