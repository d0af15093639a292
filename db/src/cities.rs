use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

pub use crate::schema::cities::*;

#[derive(Clone, Debug, PartialEq, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = cities)]
pub struct City {
    pub id: i32,
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub description: Option<String>,
    pub sort_order: i32,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = cities)]
#[serde(deny_unknown_fields)]
pub struct NewCity {
    pub name: String,
    pub country: String,
    pub lat: f64,
    pub lon: f64,
    pub description: Option<String>,
    #[serde(default)]
    pub sort_order: i32,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = cities)]
#[serde(default, deny_unknown_fields)]
pub struct CityUpdate {
    pub name: Option<String>,
    pub country: Option<String>,
    pub lat: Option<f64>,
    pub lon: Option<f64>,
    pub description: Option<String>,
    pub sort_order: Option<i32>,
}

impl_record!(cities, City, NewCity, CityUpdate);
