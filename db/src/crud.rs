//! The generic record store. Every trip table gets the same five operations through
//! [Record], implemented per table by `impl_record!`, and [RecordStore] runs them on a
//! pooled connection.

use async_trait::async_trait;
use diesel::{QueryResult, SqliteConnection};

use crate::{Pool, PoolExt};

pub const DEFAULT_LIMIT: i64 = 100;

/// A row type with a matching insert struct and a partial-update struct. Update structs
/// only contain the fields that may change, so unknown fields can't be written.
pub trait Record: Sized + Send + 'static {
    type New: Send + 'static;
    type Update: Send + 'static;

    fn create(conn: &mut SqliteConnection, new: Self::New) -> QueryResult<Self>;
    fn get(conn: &mut SqliteConnection, id: i32) -> QueryResult<Option<Self>>;
    fn list(conn: &mut SqliteConnection, skip: i64, limit: i64) -> QueryResult<Vec<Self>>;
    /// Returns `None` if there is no row with this ID.
    fn update(
        conn: &mut SqliteConnection,
        id: i32,
        changes: Self::Update,
    ) -> QueryResult<Option<Self>>;
    /// Returns false if there was no row to delete.
    fn delete(conn: &mut SqliteConnection, id: i32) -> QueryResult<bool>;
}

macro_rules! impl_record {
    ($table: ident, $model: ty, $new: ty, $update: ty) => {
        impl $crate::crud::Record for $model {
            type New = $new;
            type Update = $update;

            fn create(
                conn: &mut diesel::SqliteConnection,
                new: Self::New,
            ) -> diesel::QueryResult<Self> {
                use diesel::prelude::*;
                diesel::insert_into($crate::schema::$table::table)
                    .values(&new)
                    .returning(<$model>::as_returning())
                    .get_result::<$model>(conn)
            }

            fn get(
                conn: &mut diesel::SqliteConnection,
                record_id: i32,
            ) -> diesel::QueryResult<Option<Self>> {
                use diesel::prelude::*;
                $crate::schema::$table::table
                    .find(record_id)
                    .select(<$model>::as_select())
                    .first::<$model>(conn)
                    .optional()
            }

            fn list(
                conn: &mut diesel::SqliteConnection,
                skip: i64,
                limit: i64,
            ) -> diesel::QueryResult<Vec<Self>> {
                use diesel::prelude::*;
                $crate::schema::$table::table
                    .select(<$model>::as_select())
                    .order($crate::schema::$table::id.asc())
                    .offset(skip)
                    .limit(limit)
                    .load::<$model>(conn)
            }

            fn update(
                conn: &mut diesel::SqliteConnection,
                record_id: i32,
                changes: Self::Update,
            ) -> diesel::QueryResult<Option<Self>> {
                use diesel::prelude::*;
                let result = diesel::update($crate::schema::$table::table.find(record_id))
                    .set(&changes)
                    .returning(<$model>::as_returning())
                    .get_result::<$model>(conn)
                    .optional();

                match result {
                    // Diesel refuses to build an UPDATE with no fields set.
                    Err(diesel::result::Error::QueryBuilderError(_)) => Self::get(conn, record_id),
                    r => r,
                }
            }

            fn delete(
                conn: &mut diesel::SqliteConnection,
                record_id: i32,
            ) -> diesel::QueryResult<bool> {
                use diesel::prelude::*;
                let deleted =
                    diesel::delete($crate::schema::$table::table.find(record_id)).execute(conn)?;
                Ok(deleted > 0)
            }
        }
    };
}

/// Async versions of the [Record] operations, each running on its own pooled connection.
#[async_trait]
pub trait RecordStore {
    type Error;

    async fn create_record<R: Record>(&self, new: R::New) -> Result<R, Self::Error>;
    async fn get_record<R: Record>(&self, id: i32) -> Result<Option<R>, Self::Error>;
    async fn list_records<R: Record>(&self, skip: i64, limit: i64) -> Result<Vec<R>, Self::Error>;
    async fn update_record<R: Record>(
        &self,
        id: i32,
        changes: R::Update,
    ) -> Result<Option<R>, Self::Error>;
    async fn delete_record<R: Record>(&self, id: i32) -> Result<bool, Self::Error>;
}

#[async_trait]
impl RecordStore for Pool {
    type Error = crate::Error;

    async fn create_record<R: Record>(&self, new: R::New) -> Result<R, Self::Error> {
        self.interact(move |conn| R::create(conn, new).map_err(crate::Error::from))
            .await
    }

    async fn get_record<R: Record>(&self, id: i32) -> Result<Option<R>, Self::Error> {
        self.interact(move |conn| R::get(conn, id).map_err(crate::Error::from))
            .await
    }

    async fn list_records<R: Record>(&self, skip: i64, limit: i64) -> Result<Vec<R>, Self::Error> {
        self.interact(move |conn| R::list(conn, skip, limit).map_err(crate::Error::from))
            .await
    }

    async fn update_record<R: Record>(
        &self,
        id: i32,
        changes: R::Update,
    ) -> Result<Option<R>, Self::Error> {
        self.interact(move |conn| R::update(conn, id, changes).map_err(crate::Error::from))
            .await
    }

    async fn delete_record<R: Record>(&self, id: i32) -> Result<bool, Self::Error> {
        self.interact(move |conn| R::delete(conn, id).map_err(crate::Error::from))
            .await
    }
}

#[cfg(test)]
mod tests {
    use chrono::{Duration, NaiveDate, Utc};

    use super::*;
    use crate::{
        cities::{City, CityUpdate, NewCity},
        expenses::{Expense, NewExpense},
        sessions::{self, NewSession},
        test::run_database_test,
        users::{self, NewUser, User},
    };

    fn tokyo() -> NewCity {
        NewCity {
            name: "Tokyo".to_string(),
            country: "Japan".to_string(),
            lat: 35.6895,
            lon: 139.6917,
            description: Some("Capital of Japan".to_string()),
            sort_order: 1,
        }
    }

    fn kyoto() -> NewCity {
        NewCity {
            name: "Kyoto".to_string(),
            country: "Japan".to_string(),
            lat: 35.0116,
            lon: 135.7681,
            description: None,
            sort_order: 2,
        }
    }

    #[tokio::test]
    async fn create_and_get() {
        run_database_test(|db| async move {
            let city: City = db.pool.create_record::<City>(tokyo()).await?;
            assert_eq!(city.name, "Tokyo");
            assert_eq!(city.description.as_deref(), Some("Capital of Japan"));

            let fetched = db.pool.get_record::<City>(city.id).await?;
            assert_eq!(fetched, Some(city));

            let missing = db.pool.get_record::<City>(9999).await?;
            assert_eq!(missing, None);
            Ok(())
        })
        .await
    }

    #[tokio::test]
    async fn list_pages_in_id_order() {
        run_database_test(|db| async move {
            let first = db.pool.create_record::<City>(tokyo()).await?;
            let second = db.pool.create_record::<City>(kyoto()).await?;

            let all = db.pool.list_records::<City>(0, DEFAULT_LIMIT).await?;
            assert_eq!(all, vec![first.clone(), second.clone()]);

            let page = db.pool.list_records::<City>(1, 1).await?;
            assert_eq!(page, vec![second]);

            let empty = db.pool.list_records::<City>(2, 10).await?;
            assert!(empty.is_empty());
            Ok(())
        })
        .await
    }

    #[tokio::test]
    async fn partial_update() {
        run_database_test(|db| async move {
            let city = db.pool.create_record::<City>(tokyo()).await?;

            let updated = db
                .pool
                .update_record::<City>(
                    city.id,
                    CityUpdate {
                        description: Some("Neon and shrines".to_string()),
                        sort_order: Some(5),
                        ..Default::default()
                    },
                )
                .await?
                .expect("city exists");

            assert_eq!(updated.name, "Tokyo", "untouched fields keep their value");
            assert_eq!(updated.description.as_deref(), Some("Neon and shrines"));
            assert_eq!(updated.sort_order, 5);

            let unchanged = db
                .pool
                .update_record::<City>(city.id, CityUpdate::default())
                .await?;
            assert_eq!(unchanged, Some(updated));

            let missing = db
                .pool
                .update_record::<City>(
                    9999,
                    CityUpdate {
                        name: Some("Nowhere".to_string()),
                        ..Default::default()
                    },
                )
                .await?;
            assert_eq!(missing, None);
            Ok(())
        })
        .await
    }

    #[tokio::test]
    async fn delete() {
        run_database_test(|db| async move {
            let city = db.pool.create_record::<City>(kyoto()).await?;
            assert!(db.pool.delete_record::<City>(city.id).await?);
            assert!(!db.pool.delete_record::<City>(city.id).await?);
            assert_eq!(db.pool.get_record::<City>(city.id).await?, None);
            Ok(())
        })
        .await
    }

    #[tokio::test]
    async fn username_is_unique() {
        run_database_test(|db| async move {
            db.pool
                .create_record::<User>(NewUser::new("imma", "hash".to_string(), true))
                .await?;

            let err = db
                .pool
                .create_record::<User>(NewUser::new("imma", "other".to_string(), false))
                .await
                .expect_err("duplicate username");
            match err {
                crate::Error::Db(e) => assert!(users::is_unique_violation(&e)),
                e => panic!("unexpected error {e:?}"),
            }

            let found = db
                .with_conn(|conn| Ok(users::find_by_username(conn, "imma")?))
                .await?
                .expect("user exists");
            assert!(found.is_admin);
            Ok(())
        })
        .await
    }

    #[tokio::test]
    async fn shared_expenses() {
        run_database_test(|db| async move {
            let imma = db
                .pool
                .create_record::<User>(NewUser::new("imma", "x".to_string(), true))
                .await?;
            let pedro = db
                .pool
                .create_record::<User>(NewUser::new("pedro.rodrigues", "x".to_string(), false))
                .await?;

            let date = NaiveDate::from_ymd_opt(2026, 4, 2).unwrap();
            let ramen = db
                .pool
                .create_record::<Expense>(NewExpense {
                    user_id: imma.id,
                    date,
                    description: "Ramen".to_string(),
                    amount: 2400.0,
                    category: Some("Food".to_string()),
                    split_with: Some("pedro.rodrigues".to_string()),
                })
                .await?;
            db.pool
                .create_record::<Expense>(NewExpense {
                    user_id: imma.id,
                    date,
                    description: "Souvenirs".to_string(),
                    amount: 5000.0,
                    category: Some("Shopping".to_string()),
                    split_with: None,
                })
                .await?;

            let pedro_id = pedro.id;
            let involving = db
                .with_conn(move |conn| {
                    Ok(crate::expenses::list_involving(
                        conn,
                        pedro_id,
                        "pedro.rodrigues",
                    )?)
                })
                .await?;
            assert_eq!(involving, vec![ramen]);
            Ok(())
        })
        .await
    }

    #[tokio::test]
    async fn expired_sessions_are_pruned() {
        run_database_test(|db| async move {
            let user = db
                .pool
                .create_record::<User>(NewUser::new("pedro.rodrigues", "x".to_string(), false))
                .await?;

            let now = Utc::now().naive_utc();
            let user_id = user.id;
            let removed = db
                .with_conn(move |conn| {
                    sessions::create(
                        conn,
                        &NewSession {
                            session_id: "old".to_string(),
                            user_id,
                            created_at: now - Duration::hours(48),
                            expires_at: now - Duration::hours(24),
                        },
                    )?;
                    sessions::create(
                        conn,
                        &NewSession {
                            session_id: "current".to_string(),
                            user_id,
                            created_at: now,
                            expires_at: now + Duration::hours(24),
                        },
                    )?;
                    Ok(sessions::delete_expired(conn, now)?)
                })
                .await?;
            assert_eq!(removed, 1);

            let (old, current) = db
                .with_conn(|conn| {
                    Ok((
                        sessions::find(conn, "old")?,
                        sessions::find(conn, "current")?,
                    ))
                })
                .await?;
            assert!(old.is_none());
            assert_eq!(current.map(|s| s.user_id), Some(user_id));
            Ok(())
        })
        .await
    }

    #[tokio::test]
    async fn concurrent_session_writes() {
        run_database_test(|db| async move {
            let user = db
                .pool
                .create_record::<User>(NewUser::new("imma", "x".to_string(), true))
                .await?;

            let now = Utc::now().naive_utc();
            let tasks = (0..64)
                .map(|i| {
                    let pool = db.pool.clone();
                    let user_id = user.id;
                    tokio::spawn(async move {
                        pool.interact(move |conn| {
                            sessions::create(
                                conn,
                                &NewSession {
                                    session_id: format!("session-{i}"),
                                    user_id,
                                    created_at: now,
                                    expires_at: now + Duration::hours(24),
                                },
                            )
                            .map_err(crate::Error::from)
                        })
                        .await
                    })
                })
                .collect::<Vec<_>>();

            for task in tasks {
                task.await??;
            }

            let found = db
                .with_conn(|conn| Ok(sessions::find(conn, "session-63")?))
                .await?;
            assert!(found.is_some());
            Ok(())
        })
        .await
    }

    #[tokio::test]
    async fn sessions_need_an_existing_user() {
        run_database_test(|db| async move {
            let now = Utc::now().naive_utc();
            let result = db
                .with_conn(move |conn| {
                    Ok(sessions::create(
                        conn,
                        &NewSession {
                            session_id: "orphan".to_string(),
                            user_id: 4242,
                            created_at: now,
                            expires_at: now + Duration::hours(24),
                        },
                    ))
                })
                .await?;

            assert!(
                matches!(
                    result,
                    Err(diesel::result::Error::DatabaseError(
                        diesel::result::DatabaseErrorKind::ForeignKeyViolation,
                        _
                    ))
                ),
                "{result:?}"
            );
            Ok(())
        })
        .await
    }
}
