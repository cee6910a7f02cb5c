//! Budget Aggregator.
//!
//! `trips.total_spent_minor` and `trips.category_breakdown` are a cache of
//! [`BudgetTotals::from_items`] over the trip's items. Every write recomputes
//! them in the same transaction; reads compare and rewrite on drift.

use sea_orm::{
    ActiveValue, ConnectionTrait, QueryFilter, QueryOrder, TransactionTrait, prelude::*,
};
use uuid::Uuid;

use crate::{
    BudgetItem, BudgetItemDraft, BudgetItemPatch, BudgetSummary, BudgetTotals, EngineError, Money,
    ResultEngine, TripBudgetSummary, budget_items, trips, util, validate,
};

use super::{Engine, with_tx};

impl Engine {
    /// Add an ad-hoc expense to a trip. `amount` is parsed leniently: invalid,
    /// missing or negative input becomes zero.
    pub async fn add_budget_item(
        &self,
        owner_id: Uuid,
        trip_id: Uuid,
        draft: &BudgetItemDraft,
    ) -> ResultEngine<BudgetItem> {
        let fields = validate::budget_item(draft)?;

        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owner(&db_tx, trip_id, owner_id).await?;
            let item = BudgetItem {
                id: Uuid::new_v4(),
                trip_id,
                name: fields.name,
                description: fields.description,
                category: fields.category,
                budgeted_amount: fields.budgeted_amount,
                actual_amount: fields.actual_amount,
                currency: fields.currency,
                date: fields.date,
                is_paid: fields.is_paid,
                notes: fields.notes,
                created_at: chrono::Utc::now(),
            };
            budget_items::ActiveModel::from(&item).insert(&db_tx).await?;
            let totals = trip_totals(&db_tx, &trip.id).await?;
            store_totals(&db_tx, &trip, &totals).await?;
            Ok(item)
        })
    }

    /// Items of a trip, newest first, with their totals. Stale trip
    /// aggregates are rewritten before returning.
    pub async fn list_budget_items(
        &self,
        owner_id: Uuid,
        trip_id: Uuid,
    ) -> ResultEngine<(Vec<BudgetItem>, BudgetTotals)> {
        with_tx!(self, |db_tx| {
            let trip = self.require_trip_owner(&db_tx, trip_id, owner_id).await?;
            let items = trip_items(&db_tx, &trip.id).await?;
            let totals = BudgetTotals::from_items(&items)?;
            if store_totals(&db_tx, &trip, &totals).await? {
                tracing::warn!("budget aggregates of trip {trip_id} were stale, rewritten");
            }
            Ok((items, totals))
        })
    }

    pub async fn update_budget_item(
        &self,
        owner_id: Uuid,
        item_id: Uuid,
        patch: &BudgetItemPatch,
    ) -> ResultEngine<BudgetItem> {
        let changes = validate::budget_item_changes(patch)?;

        with_tx!(self, |db_tx| {
            let (model, trip) = self
                .require_budget_item_owner(&db_tx, item_id, owner_id)
                .await?;
            let mut item = BudgetItem::try_from(model)?;
            if let Some(name) = changes.name {
                item.name = name;
            }
            if let Some(description) = changes.description {
                item.description = description;
            }
            if let Some(category) = changes.category {
                item.category = category;
            }
            if let Some(amount) = changes.budgeted_amount {
                item.budgeted_amount = amount;
            }
            if let Some(amount) = changes.actual_amount {
                item.actual_amount = amount;
            }
            if let Some(currency) = changes.currency {
                item.currency = currency;
            }
            if let Some(date) = changes.date {
                item.date = Some(date);
            }
            if let Some(is_paid) = changes.is_paid {
                item.is_paid = is_paid;
            }
            if let Some(notes) = changes.notes {
                item.notes = notes;
            }

            let mut active = budget_items::ActiveModel::from(&item);
            active.id = ActiveValue::Unchanged(item.id.to_string());
            active.update(&db_tx).await?;

            let totals = trip_totals(&db_tx, &trip.id).await?;
            store_totals(&db_tx, &trip, &totals).await?;
            Ok(item)
        })
    }

    pub async fn delete_budget_item(&self, owner_id: Uuid, item_id: Uuid) -> ResultEngine<()> {
        with_tx!(self, |db_tx| {
            let (model, trip) = self
                .require_budget_item_owner(&db_tx, item_id, owner_id)
                .await?;
            budget_items::Entity::delete_by_id(model.id)
                .exec(&db_tx)
                .await?;
            let totals = trip_totals(&db_tx, &trip.id).await?;
            store_totals(&db_tx, &trip, &totals).await?;
            Ok(())
        })
    }

    /// Fresh summary computed from the items, never from the cached columns.
    pub async fn budget_summary(
        &self,
        owner_id: Uuid,
        trip_id: Uuid,
    ) -> ResultEngine<BudgetSummary> {
        let trip = self
            .require_trip_owner(&self.database, trip_id, owner_id)
            .await?;
        let totals = trip_totals(&self.database, &trip.id).await?;
        Ok(BudgetSummary::new(
            Money::new(trip.total_budget_minor),
            totals.total_actual,
            totals.by_category,
        ))
    }

    /// One summary per live trip of the owner, newest trip first.
    ///
    /// Stored aggregates are used when they match a recomputation; otherwise
    /// the recomputation is persisted and returned.
    pub async fn budget_summaries(
        &self,
        owner_id: Uuid,
    ) -> ResultEngine<Vec<TripBudgetSummary>> {
        with_tx!(self, |db_tx| {
            let trips = trips::Entity::find()
                .filter(trips::Column::OwnerId.eq(owner_id.to_string()))
                .filter(trips::Column::DeletedAt.is_null())
                .order_by_desc(trips::Column::CreatedAt)
                .order_by_desc(trips::Column::Id)
                .all(&db_tx)
                .await?;

            let mut out = Vec::with_capacity(trips.len());
            for trip in trips {
                let totals = trip_totals(&db_tx, &trip.id).await?;
                let cached = matches_stored(&trip, &totals).unwrap_or(false);
                let (total_spent, breakdown) = if cached {
                    (Money::new(trip.total_spent_minor), trip.stored_breakdown()?)
                } else {
                    tracing::warn!(
                        "budget aggregates of trip {} were stale, rewritten",
                        trip.id
                    );
                    store_totals(&db_tx, &trip, &totals).await?;
                    (totals.total_actual, totals.by_category)
                };
                out.push(TripBudgetSummary {
                    trip_id: util::parse_uuid(&trip.id, "trip")?,
                    trip_name: trip.name.clone(),
                    currency: util::model_currency(&trip.currency)?,
                    summary: BudgetSummary::new(
                        Money::new(trip.total_budget_minor),
                        total_spent,
                        breakdown,
                    ),
                });
            }
            Ok(out)
        })
    }

    /// Recompute the aggregates of every trip, tombstoned ones included.
    /// Returns how many trips had stale values.
    pub async fn recompute_all_budgets(&self) -> ResultEngine<usize> {
        with_tx!(self, |db_tx| {
            let trips = trips::Entity::find().all(&db_tx).await?;
            let mut rewritten = 0;
            for trip in trips {
                let totals = trip_totals(&db_tx, &trip.id).await?;
                if store_totals(&db_tx, &trip, &totals).await? {
                    rewritten += 1;
                }
            }
            Ok::<_, EngineError>(rewritten)
        })
    }
}

async fn trip_items<C: ConnectionTrait>(db: &C, trip_id: &str) -> ResultEngine<Vec<BudgetItem>> {
    budget_items::Entity::find()
        .filter(budget_items::Column::TripId.eq(trip_id.to_string()))
        .order_by_desc(budget_items::Column::CreatedAt)
        .order_by_desc(budget_items::Column::Id)
        .all(db)
        .await?
        .into_iter()
        .map(BudgetItem::try_from)
        .collect()
}

async fn trip_totals<C: ConnectionTrait>(db: &C, trip_id: &str) -> ResultEngine<BudgetTotals> {
    let items = trip_items(db, trip_id).await?;
    BudgetTotals::from_items(&items)
}

fn matches_stored(trip: &trips::Model, totals: &BudgetTotals) -> ResultEngine<bool> {
    Ok(trip.total_spent_minor == totals.total_actual.minor()
        && trip.stored_breakdown()? == totals.by_category)
}

/// Write the aggregates when they differ from the stored ones. Returns
/// whether a write happened.
async fn store_totals<C: ConnectionTrait>(
    db: &C,
    trip: &trips::Model,
    totals: &BudgetTotals,
) -> ResultEngine<bool> {
    // A cache that cannot be decoded is rewritten like a stale one.
    if matches_stored(trip, totals).unwrap_or(false) {
        return Ok(false);
    }
    let active = trips::ActiveModel {
        id: ActiveValue::Unchanged(trip.id.clone()),
        total_spent_minor: ActiveValue::Set(totals.total_actual.minor()),
        category_breakdown: ActiveValue::Set(trips::encode_breakdown(&totals.by_category)?),
        ..Default::default()
    };
    active.update(db).await?;
    Ok(true)
}
