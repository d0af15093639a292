use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

pub use crate::schema::itinerary_days::*;

#[derive(Clone, Debug, PartialEq, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = itinerary_days)]
pub struct ItineraryDay {
    pub id: i32,
    pub date: NaiveDate,
    pub user_id: i32,
    pub city_id: i32,
    pub title: String,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = itinerary_days)]
#[serde(deny_unknown_fields)]
pub struct NewItineraryDay {
    pub date: NaiveDate,
    pub user_id: i32,
    pub city_id: i32,
    pub title: String,
    pub notes: Option<String>,
}

/// The owning user is fixed at creation.
#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = itinerary_days)]
#[serde(default, deny_unknown_fields)]
pub struct ItineraryDayUpdate {
    pub date: Option<NaiveDate>,
    pub city_id: Option<i32>,
    pub title: Option<String>,
    pub notes: Option<String>,
}

impl_record!(itinerary_days, ItineraryDay, NewItineraryDay, ItineraryDayUpdate);

/// A user's days in date order.
pub fn list_for_user(conn: &mut SqliteConnection, owner: i32) -> QueryResult<Vec<ItineraryDay>> {
    table
        .filter(user_id.eq(owner))
        .order((date.asc(), id.asc()))
        .select(ItineraryDay::as_select())
        .load(conn)
}
