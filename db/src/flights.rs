use chrono::NaiveDateTime;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

pub use crate::schema::flights::*;

#[derive(Clone, Debug, PartialEq, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = flights)]
pub struct Flight {
    pub id: i32,
    pub user_id: i32,
    pub departure_city: String,
    pub arrival_city: String,
    pub departs_at: NaiveDateTime,
    pub flight_number: Option<String>,
    pub cost: Option<f64>,
    pub booking_ref: Option<String>,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = flights)]
#[serde(deny_unknown_fields)]
pub struct NewFlight {
    pub user_id: i32,
    pub departure_city: String,
    pub arrival_city: String,
    pub departs_at: NaiveDateTime,
    pub flight_number: Option<String>,
    pub cost: Option<f64>,
    pub booking_ref: Option<String>,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = flights)]
#[serde(default, deny_unknown_fields)]
pub struct FlightUpdate {
    pub departure_city: Option<String>,
    pub arrival_city: Option<String>,
    pub departs_at: Option<NaiveDateTime>,
    pub flight_number: Option<String>,
    pub cost: Option<f64>,
    pub booking_ref: Option<String>,
}

impl_record!(flights, Flight, NewFlight, FlightUpdate);
