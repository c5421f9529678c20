use crate::schema::categories;
use anyhow::Result;
use chrono::prelude::*;
use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::Serialize;

#[derive(Serialize, Queryable, Selectable, Identifiable, Debug, Clone)]
#[diesel(table_name = categories)]
pub struct Category {
    pub id: i32,
    pub name: String,
    pub created_at: NaiveDateTime,
    pub updated_at: NaiveDateTime,
}

impl Category {
    pub fn all(conn: &mut SqliteConnection) -> Result<Vec<Self>> {
        let categories = categories::table
            .order(categories::name.asc())
            .select(Category::as_select())
            .load(conn)?;
        Ok(categories)
    }

    pub fn find(conn: &mut SqliteConnection, id: i32) -> Result<Option<Self>> {
        let category = categories::table
            .find(id)
            .select(Category::as_select())
            .first(conn)
            .optional()?;
        Ok(category)
    }

    pub fn create(conn: &mut SqliteConnection, name: &str) -> Result<Self> {
        let now = Utc::now().naive_utc();
        let category = diesel::insert_into(categories::table)
            .values((
                categories::name.eq(name),
                categories::created_at.eq(now),
                categories::updated_at.eq(now),
            ))
            .returning(Category::as_returning())
            .get_result(conn)?;
        Ok(category)
    }

    pub fn rename(&mut self, conn: &mut SqliteConnection, name: &str) -> Result<()> {
        let now = Utc::now().naive_utc();
        diesel::update(categories::table.find(self.id))
            .set((categories::name.eq(name), categories::updated_at.eq(now)))
            .execute(conn)?;
        self.name = name.to_owned();
        self.updated_at = now;
        Ok(())
    }

    pub fn delete(self, conn: &mut SqliteConnection) -> Result<()> {
        diesel::delete(categories::table.find(self.id)).execute(conn)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::create_test_pool;

    #[test]
    fn test_category_lifecycle() {
        let pool = create_test_pool();
        let mut conn = pool.get().unwrap();
        conn.test_transaction::<_, anyhow::Error, _>(|conn| {
            let mut news = Category::create(conn, "News")?;
            Category::create(conn, "Blog")?;
            let names: Vec<String> = Category::all(conn)?.into_iter().map(|c| c.name).collect();
            assert_eq!(names, vec!["Blog", "News"]);

            news.rename(conn, "Updates")?;
            assert_eq!(Category::find(conn, news.id)?.expect("must exist").name, "Updates");

            let id = news.id;
            news.delete(conn)?;
            assert!(Category::find(conn, id)?.is_none());
            Ok(())
        });
    }
}
