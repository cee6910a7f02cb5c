//! Command structs for engine operations.
//!
//! Drafts carry caller input as received: every scalar is optional and
//! untyped so the engine can report the first offending field with its full
//! path instead of failing at deserialization. Builder methods keep call
//! sites readable.

/// Input of `create_trip`.
#[derive(Clone, Debug, Default)]
pub struct TripDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_budget: Option<String>,
    pub currency: Option<String>,
    pub trip_type: Option<String>,
    pub tags: Vec<String>,
    pub custom_budgets: Vec<CustomBudgetDraft>,
    /// Document order defines the city positions.
    pub cities: Vec<CityDraft>,
}

impl TripDraft {
    #[must_use]
    pub fn new(
        name: impl Into<String>,
        start_date: impl Into<String>,
        end_date: impl Into<String>,
    ) -> Self {
        Self {
            name: Some(name.into()),
            start_date: Some(start_date.into()),
            end_date: Some(end_date.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }

    #[must_use]
    pub fn total_budget(mut self, amount: impl Into<String>) -> Self {
        self.total_budget = Some(amount.into());
        self
    }

    #[must_use]
    pub fn currency(mut self, currency: impl Into<String>) -> Self {
        self.currency = Some(currency.into());
        self
    }

    #[must_use]
    pub fn city(mut self, city: CityDraft) -> Self {
        self.cities.push(city);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct CityDraft {
    pub name: Option<String>,
    pub country: Option<String>,
    pub state: Option<String>,
    pub arrival_date: Option<String>,
    pub departure_date: Option<String>,
    pub notes: Option<String>,
    pub estimated_budget: Option<String>,
    pub actual_spent: Option<String>,
    /// Document order defines the activity positions.
    pub activities: Vec<ActivityDraft>,
}

impl CityDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, country: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            country: Some(country.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn dates(mut self, arrival: impl Into<String>, departure: impl Into<String>) -> Self {
        self.arrival_date = Some(arrival.into());
        self.departure_date = Some(departure.into());
        self
    }

    #[must_use]
    pub fn activity(mut self, activity: ActivityDraft) -> Self {
        self.activities.push(activity);
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct ActivityDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub cost: Option<String>,
    pub date: Option<String>,
    pub time: Option<String>,
    /// Minutes.
    pub duration: Option<String>,
    pub location: Option<String>,
    pub priority: Option<String>,
    pub is_booked: Option<bool>,
    pub booking_reference: Option<String>,
}

impl ActivityDraft {
    #[must_use]
    pub fn new(name: impl Into<String>, date: impl Into<String>) -> Self {
        Self {
            name: Some(name.into()),
            date: Some(date.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn cost(mut self, cost: impl Into<String>) -> Self {
        self.cost = Some(cost.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}

#[derive(Clone, Debug, Default)]
pub struct CustomBudgetDraft {
    pub category: Option<String>,
    pub amount: Option<String>,
}

/// Input of `update_trip`. Absent fields are left untouched.
///
/// When `cities` is present the whole city/activity tree is replaced: cities
/// must always be sent as a complete set.
#[derive(Clone, Debug, Default)]
pub struct TripPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub start_date: Option<String>,
    pub end_date: Option<String>,
    pub total_budget: Option<String>,
    pub currency: Option<String>,
    pub status: Option<String>,
    pub trip_type: Option<String>,
    pub tags: Option<Vec<String>>,
    pub custom_budgets: Option<Vec<CustomBudgetDraft>>,
    pub cities: Option<Vec<CityDraft>>,
    /// When set, the update fails unless the stored version matches.
    pub expected_version: Option<i32>,
}

impl TripPatch {
    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.name = Some(name.into());
        self
    }

    #[must_use]
    pub fn status(mut self, status: impl Into<String>) -> Self {
        self.status = Some(status.into());
        self
    }

    #[must_use]
    pub fn cities(mut self, cities: Vec<CityDraft>) -> Self {
        self.cities = Some(cities);
        self
    }

    #[must_use]
    pub fn expected_version(mut self, version: i32) -> Self {
        self.expected_version = Some(version);
        self
    }
}

/// Input of `add_budget_item`.
#[derive(Clone, Debug, Default)]
pub struct BudgetItemDraft {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    /// Actual amount spent. Lenient: invalid or missing parses to zero.
    pub amount: Option<String>,
    pub budgeted_amount: Option<String>,
    pub currency: Option<String>,
    pub date: Option<String>,
    pub is_paid: Option<bool>,
    pub notes: Option<String>,
}

impl BudgetItemDraft {
    #[must_use]
    pub fn new(category: impl Into<String>, amount: impl Into<String>) -> Self {
        Self {
            category: Some(category.into()),
            amount: Some(amount.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn description(mut self, description: impl Into<String>) -> Self {
        self.description = Some(description.into());
        self
    }
}

/// Input of `update_budget_item`. Absent fields are left untouched.
#[derive(Clone, Debug, Default)]
pub struct BudgetItemPatch {
    pub name: Option<String>,
    pub description: Option<String>,
    pub category: Option<String>,
    pub amount: Option<String>,
    pub budgeted_amount: Option<String>,
    pub currency: Option<String>,
    pub date: Option<String>,
    pub is_paid: Option<bool>,
    pub notes: Option<String>,
}

impl BudgetItemPatch {
    #[must_use]
    pub fn amount(mut self, amount: impl Into<String>) -> Self {
        self.amount = Some(amount.into());
        self
    }

    #[must_use]
    pub fn category(mut self, category: impl Into<String>) -> Self {
        self.category = Some(category.into());
        self
    }
}
