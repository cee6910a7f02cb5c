//! Itinera engine: trip composition, budget aggregation and trip sharing on
//! top of a relational store.
//!
//! Every public operation is scoped to an owner id and runs inside a single
//! database transaction (see [`Engine`]).

pub use activities::Activity;
pub use aggregate::{BudgetSummary, BudgetTotals, TripBudgetSummary};
pub use budget_items::BudgetItem;
pub use cities::City;
pub use commands::{
    ActivityDraft, BudgetItemDraft, BudgetItemPatch, CityDraft, CustomBudgetDraft, TripDraft,
    TripPatch,
};
pub use currency::Currency;
pub use error::{EngineError, ValidationError};
pub use kinds::{ActivityCategory, BudgetCategory, Priority, TripStatus, TripType};
pub use money::Money;
pub use ops::{Engine, EngineBuilder};
pub use sharing::{SharedTrip, SharedTripCard};
pub use trips::{CustomBudget, Trip};
pub use users::User;

mod activities;
mod aggregate;
mod budget_items;
mod cities;
mod commands;
mod currency;
mod error;
mod kinds;
mod money;
mod ops;
mod sharing;
mod trips;
mod users;
mod util;
mod validate;

type ResultEngine<T> = Result<T, EngineError>;
