use crate::models::permission::Capability;
use crate::models::ActiveContext;
use crate::schema::{articles, users};
use anyhow::Result;
use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Serialize, Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = articles)]
pub struct Article {
    pub id: i32,
    pub title: String,
    pub full_text: String,
    pub category_id: Option<i32>,
    /// Owner: a user, or the anchor user of an organization.
    pub user_id: i32,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(Insertable)]
#[diesel(table_name = articles)]
struct NewArticle<'a> {
    pub title: &'a str,
    pub full_text: &'a str,
    pub category_id: Option<i32>,
    pub user_id: i32,
    pub published_at: Option<NaiveDateTime>,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

#[derive(AsChangeset)]
#[diesel(table_name = articles)]
#[diesel(treat_none_as_null = true)]
struct ArticleChanges<'a> {
    pub title: &'a str,
    pub full_text: &'a str,
    pub category_id: Option<i32>,
    pub published_at: Option<NaiveDateTime>,
    pub updated_at: NaiveDateTime,
}

/// Which articles a read may return.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum OwnerScope {
    All,
    Owner(i32),
}

/// Submitted article fields.
#[derive(Debug, Clone, Default)]
pub struct ArticleInput {
    pub title: String,
    pub full_text: String,
    pub category_id: Option<i32>,
    pub publish: bool,
}

/// `published_at` for a write: set only when publication was requested by
/// someone allowed to publish.
pub fn publication_time(
    context: &ActiveContext,
    requested: bool,
    now: NaiveDateTime,
) -> Option<NaiveDateTime> {
    if requested && context.can(Capability::PublishArticles) {
        Some(now)
    } else {
        None
    }
}

impl Article {
    pub fn list(conn: &mut SqliteConnection, scope: OwnerScope) -> Result<Vec<(Article, String)>> {
        let mut query = articles::table
            .inner_join(users::table)
            .select((Article::as_select(), users::name))
            .order(articles::created_at.desc())
            .then_order_by(articles::id.desc())
            .into_boxed();
        if let OwnerScope::Owner(owner_id) = scope {
            query = query.filter(articles::user_id.eq(owner_id));
        }
        let rows = query.load(conn)?;
        Ok(rows)
    }

    pub fn find(conn: &mut SqliteConnection, scope: OwnerScope, id: i32) -> Result<Option<Self>> {
        let mut query = articles::table
            .filter(articles::id.eq(id))
            .select(Article::as_select())
            .into_boxed();
        if let OwnerScope::Owner(owner_id) = scope {
            query = query.filter(articles::user_id.eq(owner_id));
        }
        let article = query.first(conn).optional()?;
        Ok(article)
    }

    pub fn create(
        conn: &mut SqliteConnection,
        context: &ActiveContext,
        input: &ArticleInput,
    ) -> Result<Self> {
        let now = Utc::now().naive_utc();
        let new_article = NewArticle {
            title: &input.title,
            full_text: &input.full_text,
            category_id: input.category_id,
            user_id: context.organization_id,
            published_at: publication_time(context, input.publish, now),
            created_at: now,
            updated_at: now,
        };
        let article = diesel::insert_into(articles::table)
            .values(new_article)
            .returning(Article::as_returning())
            .get_result(conn)?;
        Ok(article)
    }

    /// Whether `context` may change or delete this article.
    pub fn can_update(&self, context: &ActiveContext) -> bool {
        context.is_admin() || context.owns(self.user_id)
    }

    /// Publication is recomputed from `input` on every update, so an update
    /// without `publish` unpublishes.
    pub fn update(
        &mut self,
        conn: &mut SqliteConnection,
        context: &ActiveContext,
        input: &ArticleInput,
    ) -> Result<()> {
        let now = Utc::now().naive_utc();
        let changes = ArticleChanges {
            title: &input.title,
            full_text: &input.full_text,
            category_id: input.category_id,
            published_at: publication_time(context, input.publish, now),
            updated_at: now,
        };
        *self = diesel::update(articles::table.find(self.id))
            .set(&changes)
            .returning(Article::as_returning())
            .get_result(conn)?;
        Ok(())
    }

    pub fn delete(self, conn: &mut SqliteConnection) -> Result<()> {
        diesel::delete(articles::table.find(self.id)).execute(conn)?;
        Ok(())
    }
}
