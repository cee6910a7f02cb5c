//! Mapping between wire bodies and engine types.

use std::collections::BTreeMap;

use api_types::{
    budget::{
        BudgetItemInput, BudgetItemView, BudgetSummaryView, BudgetTotalsView,
        TripBudgetSummaryView,
    },
    share::SharedTripCard as CardView,
    trip::{
        ActivityInput, ActivityView, CityInput, CityOrder, CityView, CustomBudgetInput,
        CustomBudgetView, TripNew, TripUpdate, TripView,
    },
};
use engine::{
    Activity, ActivityDraft, BudgetCategory, BudgetItem, BudgetItemDraft, BudgetItemPatch,
    BudgetSummary, BudgetTotals, City, CityDraft, CustomBudgetDraft, EngineError, Money,
    SharedTripCard, Trip, TripBudgetSummary, TripDraft, TripPatch,
};
use serde_json::Value;
use uuid::Uuid;

use crate::ServerError;

/// Amounts arrive as JSON numbers or strings; the engine parses the text.
pub(crate) fn amount_text(value: Option<Value>) -> Option<String> {
    match value? {
        Value::Null => None,
        Value::String(text) => Some(text),
        Value::Number(number) => Some(number.to_string()),
        other => Some(other.to_string()),
    }
}

/// Unparsable ids can never match a row: report them like a missing one.
pub(crate) fn parse_id(raw: &str, what: &str) -> Result<Uuid, ServerError> {
    Uuid::parse_str(raw).map_err(|_| EngineError::KeyNotFound(what.to_string()).into())
}

fn activity_draft(input: ActivityInput) -> ActivityDraft {
    ActivityDraft {
        name: input.name,
        description: input.description,
        category: input.category,
        cost: amount_text(input.cost),
        date: input.date,
        time: input.time,
        duration: amount_text(input.duration),
        location: input.location,
        priority: input.priority,
        is_booked: input.is_booked,
        booking_reference: input.booking_reference,
    }
}

pub(crate) fn city_draft(input: CityInput) -> CityDraft {
    CityDraft {
        name: input.name,
        country: input.country,
        state: input.state,
        arrival_date: input.arrival_date,
        departure_date: input.departure_date,
        notes: input.notes,
        estimated_budget: amount_text(input.estimated_budget),
        actual_spent: amount_text(input.actual_spent),
        activities: input.activities.into_iter().map(activity_draft).collect(),
    }
}

fn custom_budget_draft(input: CustomBudgetInput) -> CustomBudgetDraft {
    CustomBudgetDraft {
        category: input.category,
        amount: amount_text(input.amount),
    }
}

pub(crate) fn trip_draft(input: TripNew) -> TripDraft {
    TripDraft {
        name: input.name,
        description: input.description,
        start_date: input.start_date,
        end_date: input.end_date,
        total_budget: amount_text(input.total_budget),
        currency: input.currency,
        trip_type: input.trip_type,
        tags: input.tags,
        custom_budgets: input
            .custom_budgets
            .into_iter()
            .map(custom_budget_draft)
            .collect(),
        cities: input.cities.into_iter().map(city_draft).collect(),
    }
}

pub(crate) fn trip_patch(input: TripUpdate) -> TripPatch {
    TripPatch {
        name: input.name,
        description: input.description,
        start_date: input.start_date,
        end_date: input.end_date,
        total_budget: amount_text(input.total_budget),
        currency: input.currency,
        status: input.status,
        trip_type: input.trip_type,
        tags: input.tags,
        custom_budgets: input
            .custom_budgets
            .map(|budgets| budgets.into_iter().map(custom_budget_draft).collect()),
        cities: input
            .cities
            .map(|cities| cities.into_iter().map(city_draft).collect()),
        expected_version: input.expected_version,
    }
}

/// City ids sorted by their `order`; entries without one go last.
pub(crate) fn city_order(input: CityOrder) -> Vec<Uuid> {
    let mut entries = input.cities;
    entries.sort_by_key(|entry| entry.order.unwrap_or(i32::MAX));
    entries.into_iter().map(|entry| entry.id).collect()
}

pub(crate) fn budget_item_draft(input: BudgetItemInput) -> BudgetItemDraft {
    BudgetItemDraft {
        name: input.name,
        description: input.description,
        category: input.category,
        amount: amount_text(input.amount),
        budgeted_amount: amount_text(input.budgeted_amount),
        currency: input.currency,
        date: input.date,
        is_paid: input.is_paid,
        notes: input.notes,
    }
}

pub(crate) fn budget_item_patch(input: BudgetItemInput) -> BudgetItemPatch {
    BudgetItemPatch {
        name: input.name,
        description: input.description,
        category: input.category,
        amount: amount_text(input.amount),
        budgeted_amount: amount_text(input.budgeted_amount),
        currency: input.currency,
        date: input.date,
        is_paid: input.is_paid,
        notes: input.notes,
    }
}

fn breakdown(map: &BTreeMap<BudgetCategory, Money>) -> BTreeMap<String, String> {
    map.iter()
        .map(|(category, amount)| (category.as_str().to_string(), amount.to_string()))
        .collect()
}

pub(crate) fn activity_view(activity: &Activity) -> ActivityView {
    ActivityView {
        id: activity.id,
        name: activity.name.clone(),
        description: activity.description.clone(),
        category: activity.category.as_str().to_string(),
        cost: activity.cost.to_string(),
        date: activity.date,
        time: activity.time.map(|time| time.format("%H:%M").to_string()),
        duration: activity.duration_minutes,
        order: activity.position,
        location: activity.location.clone(),
        priority: activity.priority.as_str().to_string(),
        is_booked: activity.is_booked,
        booking_reference: activity.booking_reference.clone(),
    }
}

pub(crate) fn city_view(city: &City) -> CityView {
    CityView {
        id: city.id,
        name: city.name.clone(),
        country: city.country.clone(),
        state: city.state.clone(),
        order: city.position,
        arrival_date: city.arrival_date,
        departure_date: city.departure_date,
        notes: city.notes.clone(),
        estimated_budget: city.estimated_budget.to_string(),
        actual_spent: city.actual_spent.to_string(),
        activities: city.activities.iter().map(activity_view).collect(),
    }
}

pub(crate) fn trip_view(trip: &Trip) -> TripView {
    TripView {
        id: trip.id,
        name: trip.name.clone(),
        description: trip.description.clone(),
        start_date: trip.start_date,
        end_date: trip.end_date,
        total_budget: trip.total_budget.to_string(),
        total_spent: trip.total_spent.to_string(),
        currency: trip.currency.code().to_string(),
        status: trip.status.as_str().to_string(),
        trip_type: trip.trip_type.as_str().to_string(),
        category_breakdown: breakdown(&trip.category_breakdown),
        custom_budgets: trip
            .custom_budgets
            .iter()
            .map(|budget| CustomBudgetView {
                category: budget.category.clone(),
                amount: budget.amount.to_string(),
            })
            .collect(),
        tags: trip.tags.clone(),
        share_token: trip.share_token.clone(),
        is_public: trip.is_public,
        version: trip.version,
        created_at: trip.created_at,
        updated_at: trip.updated_at,
        cities: trip.cities.iter().map(city_view).collect(),
    }
}

pub(crate) fn budget_item_view(item: &BudgetItem) -> BudgetItemView {
    BudgetItemView {
        id: item.id,
        trip_id: item.trip_id,
        name: item.name.clone(),
        description: item.description.clone(),
        category: item.category.as_str().to_string(),
        budgeted_amount: item.budgeted_amount.to_string(),
        actual_amount: item.actual_amount.to_string(),
        currency: item.currency.code().to_string(),
        date: item.date,
        is_paid: item.is_paid,
        notes: item.notes.clone(),
        created_at: item.created_at,
    }
}

pub(crate) fn totals_view(totals: &BudgetTotals) -> BudgetTotalsView {
    BudgetTotalsView {
        total_budgeted: totals.total_budgeted.to_string(),
        total_actual: totals.total_actual.to_string(),
        by_category: breakdown(&totals.by_category),
    }
}

pub(crate) fn summary_view(summary: &BudgetSummary) -> BudgetSummaryView {
    BudgetSummaryView {
        total_budget: summary.total_budget.to_string(),
        total_spent: summary.total_spent.to_string(),
        remaining: summary.remaining.to_string(),
        breakdown: breakdown(&summary.breakdown),
    }
}

pub(crate) fn trip_summary_view(summary: &TripBudgetSummary) -> TripBudgetSummaryView {
    TripBudgetSummaryView {
        trip_id: summary.trip_id,
        trip_name: summary.trip_name.clone(),
        currency: summary.currency.code().to_string(),
        summary: summary_view(&summary.summary),
    }
}

pub(crate) fn card_view(card: SharedTripCard) -> CardView {
    CardView {
        id: card.trip_id,
        name: card.name,
        description: card.description,
        author: card.author,
        start_date: card.start_date,
        end_date: card.end_date,
        cities: card.cities,
        views: card.views,
        share_token: card.share_token,
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn amounts_accept_numbers_and_strings() {
        assert_eq!(amount_text(Some(json!(25.5))), Some("25.5".to_string()));
        assert_eq!(amount_text(Some(json!("10"))), Some("10".to_string()));
        assert_eq!(amount_text(Some(json!(null))), None);
        assert_eq!(amount_text(None), None);
    }

    #[test]
    fn unparsable_id_is_not_found() {
        let Err(ServerError::Engine(EngineError::KeyNotFound(what))) = parse_id("abc", "trip")
        else {
            panic!("expected not found");
        };
        assert_eq!(what, "trip");
    }

    #[test]
    fn city_order_follows_the_order_field() {
        let [a, b, c] = [Uuid::new_v4(), Uuid::new_v4(), Uuid::new_v4()];
        let input: CityOrder = serde_json::from_value(json!({
            "cities": [
                {"id": a, "order": 3},
                {"id": b},
                {"id": c, "order": 1}
            ]
        }))
        .unwrap();
        assert_eq!(city_order(input), vec![c, a, b]);
    }

    #[test]
    fn nested_inputs_keep_document_order() {
        let input: TripNew = serde_json::from_value(json!({
            "name": "Euro Trip",
            "startDate": "2024-06-01",
            "endDate": "2024-06-10",
            "totalBudget": 1200,
            "cities": [
                {"name": "Paris", "country": "France", "order": 7,
                 "activities": [{"name": "Louvre", "date": "2024-06-02", "cost": "17"}]},
                {"name": "Rome", "country": "Italy"}
            ]
        }))
        .unwrap();

        let draft = trip_draft(input);
        assert_eq!(draft.total_budget.as_deref(), Some("1200"));
        assert_eq!(draft.cities[0].name.as_deref(), Some("Paris"));
        assert_eq!(draft.cities[0].activities[0].cost.as_deref(), Some("17"));
        assert_eq!(draft.cities[1].name.as_deref(), Some("Rome"));
    }
}
