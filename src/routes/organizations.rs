use super::{html, local_path, redirect, with_conn};
use crate::config::Config;
use crate::db::DbPool;
use crate::error::{AppError, AppResult};
use crate::extractors::{CurrentUser, Query};
use crate::models::{Membership, Role, User};
use crate::views;
use actix_web::http::header;
use actix_web::{get, post, web, HttpRequest, HttpResponse};
use actix_web_validator::Form;
use diesel::prelude::*;
use log::info;
use serde::{Deserialize, Serialize};
use validator::Validate;

#[derive(Deserialize, Debug)]
pub struct JoinQuery {
    organization_id: i32,
}

#[derive(Serialize, Deserialize, Validate, Debug)]
pub struct JoinForm {
    organization_id: i32,
    #[serde(default = "default_role_id")]
    role_id: i32,
}

fn default_role_id() -> i32 {
    Role::User.id()
}

fn find_organization(conn: &mut SqliteConnection, id: i32) -> AppResult<User> {
    User::find(conn, id)?
        .ok_or_else(|| AppError::not_found(format!("No organization found with id: {}", id)))
}

#[get("/home")]
pub async fn home(current: CurrentUser, pool: web::Data<DbPool>) -> AppResult<HttpResponse> {
    let user = current.user.clone();
    let organizations = with_conn(pool, move |conn| Ok(user.organizations(conn)?)).await?;
    Ok(html(views::home_page(
        &current.context,
        &current.user,
        &organizations,
    )))
}

#[get("/join")]
pub async fn join_form(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    query: Query<JoinQuery>,
) -> AppResult<HttpResponse> {
    let id = query.organization_id;
    let organization = with_conn(pool, move |conn| find_organization(conn, id)).await?;
    if organization.id == current.user.id {
        return Err(AppError::bad_request("You cannot join your own organization"));
    }
    Ok(html(views::join_page(&current.context, &organization)))
}

#[post("/join")]
pub async fn join(
    current: CurrentUser,
    pool: web::Data<DbPool>,
    form: Form<JoinForm>,
) -> AppResult<HttpResponse> {
    let JoinForm {
        organization_id,
        role_id,
    } = form.into_inner();
    let role = Role::from_id(role_id).map_err(|e| AppError::bad_request(e.to_string()))?;
    if !role.joinable() {
        return Err(AppError::bad_request(format!("Cannot join as {}", role)));
    }
    if organization_id == current.user.id {
        return Err(AppError::bad_request("You cannot join your own organization"));
    }
    let user_id = current.user.id;
    let mut session = current.session;
    with_conn(pool, move |conn| {
        let organization = find_organization(conn, organization_id)?;
        conn.transaction::<_, AppError, _>(|conn| {
            Membership::join(conn, user_id, organization.id, role)?;
            session.activate(conn, &organization, role)?;
            Ok(())
        })
    })
    .await?;
    info!(
        "user {} joined organization {} as {}",
        user_id, organization_id, role
    );
    Ok(redirect("/home"))
}

/// Switches the session to an organization the user already belongs to.
/// The user's own id switches back to the personal workspace.
#[get("/organization/{organization_id}")]
pub async fn switch(
    req: HttpRequest,
    current: CurrentUser,
    pool: web::Data<DbPool>,
    path: web::Path<(i32,)>,
) -> AppResult<HttpResponse> {
    let organization_id = path.into_inner().0;
    let user = current.user;
    let mut session = current.session;
    with_conn(pool, move |conn| {
        if organization_id == user.id {
            let role = user.role()?;
            session.activate(conn, &user, role)?;
            return Ok(());
        }
        let membership = Membership::find(conn, user.id, organization_id)?.ok_or_else(|| {
            AppError::not_found(format!("Not a member of organization {}", organization_id))
        })?;
        let organization = find_organization(conn, organization_id)?;
        session.activate(conn, &organization, membership.role()?)?;
        Ok(())
    })
    .await?;
    let referer = req
        .headers()
        .get(header::REFERER)
        .and_then(|v| v.to_str().ok());
    Ok(redirect(local_path(referer).unwrap_or("/home")))
}

#[get("/invite")]
pub async fn invite(current: CurrentUser, config: web::Data<Config>) -> AppResult<HttpResponse> {
    Ok(html(views::invite_page(&current.context, &config.app_url)))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_util::{all_articles, body_text, create_user, init_app, session_of, setup, sign_in};
    use actix_web::test;

    #[actix_rt::test]
    async fn test_join_unknown_organization_is_not_found() {
        let (pool, config) = setup();
        let user = create_user(&pool, "bob", Role::User);
        let auth = sign_in(&pool, &config, &user);
        let app = init_app!(pool, config);

        let req = test::TestRequest::get()
            .uri("/join?organization_id=999")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);

        let req = test::TestRequest::post()
            .uri("/join")
            .insert_header((header::AUTHORIZATION, auth))
            .set_form(&JoinForm {
                organization_id: 999,
                role_id: 1,
            })
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
    }

    #[actix_rt::test]
    async fn test_join_confirmation_page() {
        let (pool, config) = setup();
        let anchor = create_user(&pool, "acme", Role::User);
        let user = create_user(&pool, "bob", Role::User);
        let auth = sign_in(&pool, &config, &user);
        let app = init_app!(pool, config);

        let req = test::TestRequest::get()
            .uri(&format!("/join?organization_id={}", anchor.id))
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.status().as_u16(), 200);
        assert!(body_text(resp).await.contains("<b>acme</b>"));
    }

    #[actix_rt::test]
    async fn test_join_as_publisher_then_write_for_organization() {
        let (pool, config) = setup();
        let anchor = create_user(&pool, "acme", Role::User);
        let user = create_user(&pool, "bob", Role::User);
        let auth = sign_in(&pool, &config, &user);
        let app = init_app!(pool, config);

        let req = test::TestRequest::post()
            .uri("/join")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_form(&JoinForm {
                organization_id: anchor.id,
                role_id: 3,
            })
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_redirection());

        let session = session_of(&pool, &user);
        assert_eq!(session.organization_id, Some(anchor.id));
        assert_eq!(session.organization_name.as_deref(), Some("acme"));
        assert_eq!(session.organization_role_id, Some(3));

        let req = test::TestRequest::post()
            .uri("/articles")
            .insert_header((header::AUTHORIZATION, auth))
            .set_form(&[("title", "T"), ("full_text", "F"), ("published", "1")])
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_redirection());
        let article = all_articles(&pool).remove(0);
        assert_eq!(article.user_id, anchor.id);
        assert!(article.published_at.is_some());
    }

    #[actix_rt::test]
    async fn test_join_rejects_admin_role_and_self() {
        let (pool, config) = setup();
        let anchor = create_user(&pool, "acme", Role::User);
        let user = create_user(&pool, "bob", Role::User);
        let auth = sign_in(&pool, &config, &user);
        let app = init_app!(pool, config);

        let req = test::TestRequest::post()
            .uri("/join")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .set_form(&JoinForm {
                organization_id: anchor.id,
                role_id: 2,
            })
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);

        let req = test::TestRequest::post()
            .uri("/join")
            .insert_header((header::AUTHORIZATION, auth))
            .set_form(&JoinForm {
                organization_id: user.id,
                role_id: 1,
            })
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 400);
        let mut conn = pool.get().unwrap();
        assert!(Membership::for_user(&mut conn, user.id).unwrap().is_empty());
    }

    #[actix_rt::test]
    async fn test_switch_between_organizations() {
        let (pool, config) = setup();
        let first = create_user(&pool, "acme", Role::User);
        let second = create_user(&pool, "globex", Role::User);
        let user = create_user(&pool, "bob", Role::Publisher);
        {
            let mut conn = pool.get().unwrap();
            Membership::join(&mut conn, user.id, first.id, Role::Publisher).unwrap();
            Membership::join(&mut conn, user.id, second.id, Role::User).unwrap();
        }
        let auth = sign_in(&pool, &config, &user);
        let app = init_app!(pool, config);

        let req = test::TestRequest::get()
            .uri(&format!("/organization/{}", second.id))
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .insert_header((header::REFERER, "/articles"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert!(resp.status().is_redirection());
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/articles");
        let session = session_of(&pool, &user);
        assert_eq!(session.organization_id, Some(second.id));
        assert_eq!(session.organization_name.as_deref(), Some("globex"));
        assert_eq!(session.organization_role_id, Some(Role::User.id()));

        // back to the personal workspace
        let req = test::TestRequest::get()
            .uri(&format!("/organization/{}", user.id))
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .to_request();
        assert!(test::call_service(&app, req).await.status().is_redirection());
        let session = session_of(&pool, &user);
        assert_eq!(session.organization_id, Some(user.id));
        assert_eq!(session.organization_role_id, Some(Role::Publisher.id()));

        let req = test::TestRequest::get()
            .uri("/home")
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains("Working in your personal workspace as publisher."));
        assert!(!body.contains("<b>bob</b>"));

        // off-site referers fall back to the dashboard
        let req = test::TestRequest::get()
            .uri(&format!("/organization/{}", first.id))
            .insert_header((header::AUTHORIZATION, auth.clone()))
            .insert_header((header::REFERER, "https://evil.example/articles"))
            .to_request();
        let resp = test::call_service(&app, req).await;
        assert_eq!(resp.headers().get(header::LOCATION).unwrap(), "/home");
        assert_eq!(session_of(&pool, &user).organization_id, Some(first.id));

        // not a member
        let stranger = create_user(&pool, "initech", Role::User);
        let req = test::TestRequest::get()
            .uri(&format!("/organization/{}", stranger.id))
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();
        assert_eq!(test::call_service(&app, req).await.status().as_u16(), 404);
    }

    #[actix_rt::test]
    async fn test_invite_links() {
        let (pool, config) = setup();
        let anchor = create_user(&pool, "acme", Role::User);
        let user = create_user(&pool, "bob", Role::User);
        {
            let mut conn = pool.get().unwrap();
            Membership::join(&mut conn, user.id, anchor.id, Role::User).unwrap();
        }
        let auth = sign_in(&pool, &config, &user);
        let app = init_app!(pool, config);

        let req = test::TestRequest::get()
            .uri("/invite")
            .insert_header((header::AUTHORIZATION, auth))
            .to_request();
        let body = body_text(test::call_service(&app, req).await).await;
        assert!(body.contains(&format!("/join?organization_id={}", anchor.id)));
        assert!(body.contains(&format!("/register?organization_id={}", anchor.id)));
    }
}
