//! JSON bodies of the HTTP API.
//!
//! Field names are camelCase on the wire. Money is always a decimal string
//! with two fraction digits (`"35.50"`) in responses; request amounts accept
//! either a JSON number or a numeric string, so they are kept as raw
//! [`serde_json::Value`] until the engine parses them.

use serde::{Deserialize, Serialize};

pub mod trip {
    use std::collections::BTreeMap;

    use chrono::{DateTime, NaiveDate, Utc};
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomBudgetInput {
        pub category: Option<String>,
        pub amount: Option<Value>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ActivityInput {
        pub name: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub cost: Option<Value>,
        pub date: Option<String>,
        /// `HH:MM`
        pub time: Option<String>,
        /// Minutes.
        pub duration: Option<Value>,
        pub location: Option<String>,
        pub priority: Option<String>,
        pub is_booked: Option<bool>,
        pub booking_reference: Option<String>,
        /// Ignored: the position in the array wins.
        pub order: Option<i32>,
    }

    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CityInput {
        pub name: Option<String>,
        pub country: Option<String>,
        pub state: Option<String>,
        pub arrival_date: Option<String>,
        pub departure_date: Option<String>,
        pub notes: Option<String>,
        pub estimated_budget: Option<Value>,
        pub actual_spent: Option<Value>,
        /// Ignored: the position in the array wins.
        pub order: Option<i32>,
        #[serde(default)]
        pub activities: Vec<ActivityInput>,
    }

    /// Body of `POST /trips`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TripNew {
        pub name: Option<String>,
        pub description: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub total_budget: Option<Value>,
        pub currency: Option<String>,
        pub trip_type: Option<String>,
        #[serde(default)]
        pub tags: Vec<String>,
        #[serde(default)]
        pub custom_budgets: Vec<CustomBudgetInput>,
        #[serde(default)]
        pub cities: Vec<CityInput>,
    }

    /// Body of `PUT /trips/{id}`.
    ///
    /// `cities`, when present, replaces the whole itinerary and must be sent
    /// as a complete set.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TripUpdate {
        pub name: Option<String>,
        pub description: Option<String>,
        pub start_date: Option<String>,
        pub end_date: Option<String>,
        pub total_budget: Option<Value>,
        pub currency: Option<String>,
        pub status: Option<String>,
        pub trip_type: Option<String>,
        pub tags: Option<Vec<String>>,
        pub custom_budgets: Option<Vec<CustomBudgetInput>>,
        pub cities: Option<Vec<CityInput>>,
        pub expected_version: Option<i32>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ActivityView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub category: String,
        pub cost: String,
        pub date: NaiveDate,
        pub time: Option<String>,
        pub duration: Option<i32>,
        pub order: i32,
        pub location: Option<String>,
        pub priority: String,
        pub is_booked: bool,
        pub booking_reference: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CityView {
        pub id: Uuid,
        pub name: String,
        pub country: String,
        pub state: Option<String>,
        pub order: i32,
        pub arrival_date: Option<NaiveDate>,
        pub departure_date: Option<NaiveDate>,
        pub notes: Option<String>,
        pub estimated_budget: String,
        pub actual_spent: String,
        pub activities: Vec<ActivityView>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct CustomBudgetView {
        pub category: String,
        pub amount: String,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TripView {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub total_budget: String,
        pub total_spent: String,
        pub currency: String,
        pub status: String,
        pub trip_type: String,
        pub category_breakdown: BTreeMap<String, String>,
        pub custom_budgets: Vec<CustomBudgetView>,
        pub tags: Vec<String>,
        pub share_token: Option<String>,
        pub is_public: bool,
        pub version: i32,
        pub created_at: DateTime<Utc>,
        pub updated_at: DateTime<Utc>,
        pub cities: Vec<CityView>,
    }

    /// Answer of create and update.
    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TripSaved {
        pub success: bool,
        pub trip: TripView,
        pub message: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripResponse {
        pub trip: TripView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripListResponse {
        pub trips: Vec<TripView>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Deleted {
        pub success: bool,
        pub message: String,
    }

    /// Answer of `POST /cities/trip/{tripId}`.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct CityResponse {
        pub city: CityView,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    pub struct CityOrderEntry {
        pub id: Uuid,
        pub order: Option<i32>,
    }

    /// Body of `PUT /cities/trip/{tripId}/order`. Cities are sorted by
    /// `order`, ties and missing values keep array order; the result is
    /// renumbered from 1.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct CityOrder {
        #[serde(default)]
        pub cities: Vec<CityOrderEntry>,
    }

    /// Body of `PUT /activities/{id}`.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    pub struct ActivityCost {
        pub cost: Option<Value>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct ActivityResponse {
        pub activity: ActivityView,
    }
}

pub mod share {
    use chrono::NaiveDate;
    use uuid::Uuid;

    use super::{trip::TripView, *};

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct ShareCreated {
        pub share_url: String,
        pub share_token: String,
    }

    /// Public read of a shared trip.
    #[derive(Debug, Serialize, Deserialize)]
    pub struct SharedTripResponse {
        pub trip: TripView,
        pub views: i64,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct TripCopied {
        pub trip: TripView,
        pub message: String,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct SharedTripCard {
        pub id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub author: String,
        pub start_date: NaiveDate,
        pub end_date: NaiveDate,
        pub cities: Vec<String>,
        pub views: i64,
        pub share_token: String,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct SharedTripsResponse {
        pub trips: Vec<SharedTripCard>,
    }
}

pub mod budget {
    use std::collections::BTreeMap;

    use chrono::{DateTime, NaiveDate, Utc};
    use serde_json::Value;
    use uuid::Uuid;

    use super::*;

    /// Body of `POST /trips/{id}/budget` and `PUT /budget/{id}`.
    ///
    /// `amount` is the amount actually spent. Unparsable or negative amounts
    /// are stored as zero.
    #[derive(Clone, Debug, Default, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetItemInput {
        pub name: Option<String>,
        pub description: Option<String>,
        pub category: Option<String>,
        pub amount: Option<Value>,
        pub budgeted_amount: Option<Value>,
        pub currency: Option<String>,
        pub date: Option<String>,
        pub is_paid: Option<bool>,
        pub notes: Option<String>,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetItemView {
        pub id: Uuid,
        pub trip_id: Uuid,
        pub name: String,
        pub description: Option<String>,
        pub category: String,
        pub budgeted_amount: String,
        pub actual_amount: String,
        pub currency: String,
        pub date: Option<NaiveDate>,
        pub is_paid: bool,
        pub notes: Option<String>,
        pub created_at: DateTime<Utc>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetItemResponse {
        pub budget_item: BudgetItemView,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetTotalsView {
        pub total_budgeted: String,
        pub total_actual: String,
        pub by_category: BTreeMap<String, String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetItemsResponse {
        pub budget_items: Vec<BudgetItemView>,
        pub summary: BudgetTotalsView,
    }

    #[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct BudgetSummaryView {
        pub total_budget: String,
        pub total_spent: String,
        pub remaining: String,
        pub breakdown: BTreeMap<String, String>,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSummaryResponse {
        pub summary: BudgetSummaryView,
    }

    #[derive(Clone, Debug, Serialize, Deserialize)]
    #[serde(rename_all = "camelCase")]
    pub struct TripBudgetSummaryView {
        pub trip_id: Uuid,
        pub trip_name: String,
        pub currency: String,
        #[serde(flatten)]
        pub summary: BudgetSummaryView,
    }

    #[derive(Debug, Serialize, Deserialize)]
    pub struct BudgetSummariesResponse {
        pub summaries: Vec<TripBudgetSummaryView>,
    }
}

pub mod health {
    use super::*;

    #[derive(Debug, Serialize, Deserialize)]
    pub struct Health {
        pub status: String,
    }
}

/// Body of every error answer.
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub details: Option<Vec<String>>,
}
