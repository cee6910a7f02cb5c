//! Pure derivations over budget items. The stored trip aggregates are only a
//! cache of [`BudgetTotals::from_items`].

use std::collections::BTreeMap;

use uuid::Uuid;

use crate::{BudgetCategory, BudgetItem, Currency, EngineError, Money, ResultEngine};

/// Sums over a set of budget items.
///
/// Categories without items are absent from `by_category`.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct BudgetTotals {
    pub total_budgeted: Money,
    pub total_actual: Money,
    pub by_category: BTreeMap<BudgetCategory, Money>,
}

impl BudgetTotals {
    /// Fails with [`EngineError::InvalidAmount`] if a sum leaves the `i64` range.
    pub fn from_items<'a>(
        items: impl IntoIterator<Item = &'a BudgetItem>,
    ) -> ResultEngine<Self> {
        items.into_iter().try_fold(Self::default(), |mut acc, item| {
            acc.total_budgeted = add(acc.total_budgeted, item.budgeted_amount)?;
            acc.total_actual = add(acc.total_actual, item.actual_amount)?;
            let by_category = acc.by_category.entry(item.category).or_default();
            *by_category = add(*by_category, item.actual_amount)?;
            Ok(acc)
        })
    }
}

fn add(lhs: Money, rhs: Money) -> ResultEngine<Money> {
    lhs.checked_add(rhs)
        .ok_or_else(|| EngineError::InvalidAmount("budget total too large".to_string()))
}

/// Budget position of one trip.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BudgetSummary {
    pub total_budget: Money,
    pub total_spent: Money,
    pub remaining: Money,
    pub breakdown: BTreeMap<BudgetCategory, Money>,
}

impl BudgetSummary {
    pub fn new(
        total_budget: Money,
        total_spent: Money,
        breakdown: BTreeMap<BudgetCategory, Money>,
    ) -> Self {
        Self {
            total_budget,
            total_spent,
            remaining: total_budget - total_spent,
            breakdown,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct TripBudgetSummary {
    pub trip_id: Uuid,
    pub trip_name: String,
    pub currency: Currency,
    pub summary: BudgetSummary,
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;

    fn item(category: BudgetCategory, budgeted: i64, actual: i64) -> BudgetItem {
        BudgetItem {
            id: Uuid::new_v4(),
            trip_id: Uuid::nil(),
            name: "item".to_string(),
            description: None,
            category,
            budgeted_amount: Money::new(budgeted),
            actual_amount: Money::new(actual),
            currency: Currency::Usd,
            date: None,
            is_paid: false,
            notes: None,
            created_at: Utc::now(),
        }
    }

    #[test]
    fn empty_set_sums_to_zero_without_keys() {
        let totals = BudgetTotals::from_items(&Vec::<BudgetItem>::new()).unwrap();
        assert_eq!(totals, BudgetTotals::default());
        assert!(totals.by_category.is_empty());
    }

    #[test]
    fn sums_by_category() {
        let items = [
            item(BudgetCategory::Food, 0, 2550),
            item(BudgetCategory::Food, 500, 1000),
            item(BudgetCategory::Shopping, 0, 99),
        ];
        let totals = BudgetTotals::from_items(&items).unwrap();
        assert_eq!(totals.total_actual, Money::new(3649));
        assert_eq!(totals.total_budgeted, Money::new(500));
        assert_eq!(totals.by_category[&BudgetCategory::Food], Money::new(3550));
        assert_eq!(totals.by_category.len(), 2);
    }

    #[test]
    fn order_does_not_matter() {
        let mut items = vec![
            item(BudgetCategory::Food, 0, 10),
            item(BudgetCategory::Others, 0, 20),
            item(BudgetCategory::Food, 0, 30),
        ];
        let forward = BudgetTotals::from_items(&items).unwrap();
        items.reverse();
        assert_eq!(forward, BudgetTotals::from_items(&items).unwrap());
    }

    #[test]
    fn overflowing_sum_is_an_error() {
        let items = [
            item(BudgetCategory::Food, 0, i64::MAX),
            item(BudgetCategory::Food, 0, 1),
        ];
        assert!(matches!(
            BudgetTotals::from_items(&items),
            Err(EngineError::InvalidAmount(_))
        ));
    }

    #[test]
    fn remaining_may_go_negative() {
        let summary = BudgetSummary::new(Money::new(100), Money::new(250), BTreeMap::new());
        assert_eq!(summary.remaining, Money::new(-150));
    }
}
