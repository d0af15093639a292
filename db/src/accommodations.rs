use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

pub use crate::schema::accommodations::*;

#[derive(Clone, Debug, PartialEq, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = accommodations)]
pub struct Accommodation {
    pub id: i32,
    pub city_id: i32,
    pub name: String,
    pub address: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub cost: Option<f64>,
    pub booking_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = accommodations)]
#[serde(deny_unknown_fields)]
pub struct NewAccommodation {
    pub city_id: i32,
    pub name: String,
    pub address: String,
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
    pub cost: Option<f64>,
    pub booking_url: Option<String>,
    pub notes: Option<String>,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = accommodations)]
#[serde(default, deny_unknown_fields)]
pub struct AccommodationUpdate {
    pub city_id: Option<i32>,
    pub name: Option<String>,
    pub address: Option<String>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub cost: Option<f64>,
    pub booking_url: Option<String>,
    pub notes: Option<String>,
}

impl_record!(
    accommodations,
    Accommodation,
    NewAccommodation,
    AccommodationUpdate
);
