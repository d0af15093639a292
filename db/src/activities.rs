use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

pub use crate::schema::activities::*;

#[derive(Clone, Debug, PartialEq, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = activities)]
pub struct Activity {
    pub id: i32,
    pub itinerary_day_id: i32,
    pub time: NaiveDateTime,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cost: Option<f64>,
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = activities)]
#[serde(deny_unknown_fields)]
pub struct NewActivity {
    pub itinerary_day_id: i32,
    pub time: NaiveDateTime,
    pub title: String,
    pub description: Option<String>,
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cost: Option<f64>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = activities)]
#[serde(default, deny_unknown_fields)]
pub struct ActivityUpdate {
    pub time: Option<NaiveDateTime>,
    pub title: Option<String>,
    pub description: Option<String>,
    pub location: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub cost: Option<f64>,
    pub sort_order: Option<i32>,
}

impl_record!(activities, Activity, NewActivity, ActivityUpdate);

pub fn list_for_day(conn: &mut SqliteConnection, day: i32) -> QueryResult<Vec<Activity>> {
    table
        .filter(itinerary_day_id.eq(day))
        .order((sort_order.asc(), time.asc()))
        .select(Activity::as_select())
        .load(conn)
}
