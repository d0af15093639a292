use chrono::NaiveDateTime;
use diesel::prelude::*;

use crate::schema::*;

pub use crate::schema::sessions::*;

#[derive(Clone, Debug, Queryable, Selectable, Identifiable)]
#[diesel(table_name = sessions)]
pub struct Session {
    pub id: i32,
    pub session_id: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

#[derive(Debug, Insertable)]
#[diesel(table_name = sessions)]
pub struct NewSession {
    pub session_id: String,
    pub user_id: i32,
    pub created_at: NaiveDateTime,
    pub expires_at: NaiveDateTime,
}

pub fn create(conn: &mut SqliteConnection, session: &NewSession) -> QueryResult<()> {
    diesel::insert_into(table).values(session).execute(conn)?;
    Ok(())
}

pub fn find(conn: &mut SqliteConnection, token: &str) -> QueryResult<Option<Session>> {
    table
        .filter(session_id.eq(token))
        .select(Session::as_select())
        .first(conn)
        .optional()
}

pub fn delete(conn: &mut SqliteConnection, token: &str) -> QueryResult<usize> {
    diesel::delete(table.filter(session_id.eq(token))).execute(conn)
}

/// Remove every session that expired at or before `now`. Expired rows are otherwise only
/// removed when a request presents one.
pub fn delete_expired(conn: &mut SqliteConnection, now: NaiveDateTime) -> QueryResult<usize> {
    diesel::delete(table.filter(expires_at.le(now))).execute(conn)
}
