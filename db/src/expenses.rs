use chrono::NaiveDate;
use diesel::prelude::*;
use serde::{Deserialize, Serialize};

use crate::schema::*;

pub use crate::schema::expenses::*;

#[derive(Clone, Debug, PartialEq, Serialize, Queryable, Selectable, Identifiable)]
#[diesel(table_name = expenses)]
pub struct Expense {
    pub id: i32,
    pub user_id: i32,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    /// Free-form, e.g. "Food", "Transport", "Shopping".
    pub category: Option<String>,
    /// Username of whoever shares this expense.
    pub split_with: Option<String>,
}

#[derive(Debug, Deserialize, Insertable)]
#[diesel(table_name = expenses)]
#[serde(deny_unknown_fields)]
pub struct NewExpense {
    pub user_id: i32,
    pub date: NaiveDate,
    pub description: String,
    pub amount: f64,
    pub category: Option<String>,
    pub split_with: Option<String>,
}

#[derive(Debug, Default, Deserialize, AsChangeset)]
#[diesel(table_name = expenses)]
#[serde(default, deny_unknown_fields)]
pub struct ExpenseUpdate {
    pub date: Option<NaiveDate>,
    pub description: Option<String>,
    pub amount: Option<f64>,
    pub category: Option<String>,
    pub split_with: Option<String>,
}

impl_record!(expenses, Expense, NewExpense, ExpenseUpdate);

/// Expenses paid by `owner` or shared with them.
pub fn list_involving(
    conn: &mut SqliteConnection,
    owner: i32,
    owner_name: &str,
) -> QueryResult<Vec<Expense>> {
    table
        .filter(user_id.eq(owner).or(split_with.eq(owner_name)))
        .order((date.asc(), id.asc()))
        .select(Expense::as_select())
        .load(conn)
}
