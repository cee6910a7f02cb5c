//! Turns caller drafts into typed fields before anything touches the store.
//!
//! Checks run in document order and stop at the first failure, so a
//! `ValidationError` always names the first offending field. Paths use the
//! wire names (`cities[2].activities[1].name`, 0-based indices).

use chrono::{NaiveDate, NaiveTime, Utc};

use crate::{
    ActivityCategory, ActivityDraft, BudgetCategory, BudgetItemDraft, BudgetItemPatch, CityDraft,
    Currency, CustomBudget, CustomBudgetDraft, Money, Priority, TripDraft, TripPatch, TripStatus,
    TripType, ValidationError, activities::ActivityFields, cities::CityFields,
    money::MAX_AMOUNT, trips::TripFields, util::normalize_optional_text,
};

pub(crate) const MAX_CITIES: usize = 50;
pub(crate) const MAX_ACTIVITIES: usize = 100;
pub(crate) const MAX_TRIP_NAME: usize = 200;
const MAX_TRIP_DAYS: i64 = 365;
const MAX_ACTIVITY_MINUTES: i32 = 1440;

type Checked<T> = Result<T, ValidationError>;

/// Validated `TripDraft`.
#[derive(Clone, Debug)]
pub(crate) struct NewTrip {
    pub fields: TripFields,
    pub cities: Vec<CityFields>,
}

/// Validated `TripPatch`. Date ordering is checked by the caller against
/// the stored values.
#[derive(Clone, Debug, Default)]
pub(crate) struct TripChanges {
    pub name: Option<String>,
    /// `Some(None)` clears the description.
    pub description: Option<Option<String>>,
    pub start_date: Option<NaiveDate>,
    pub end_date: Option<NaiveDate>,
    pub total_budget: Option<Money>,
    pub currency: Option<Currency>,
    pub status: Option<TripStatus>,
    pub trip_type: Option<TripType>,
    pub tags: Option<Vec<String>>,
    pub custom_budgets: Option<Vec<CustomBudget>>,
    pub cities: Option<Vec<CityFields>>,
}

#[derive(Clone, Debug)]
pub(crate) struct BudgetItemFields {
    pub name: String,
    pub description: Option<String>,
    pub category: BudgetCategory,
    pub budgeted_amount: Money,
    pub actual_amount: Money,
    pub currency: Currency,
    pub date: Option<NaiveDate>,
    pub is_paid: bool,
    pub notes: Option<String>,
}

#[derive(Clone, Debug, Default)]
pub(crate) struct BudgetItemChanges {
    pub name: Option<String>,
    pub description: Option<Option<String>>,
    pub category: Option<BudgetCategory>,
    pub budgeted_amount: Option<Money>,
    pub actual_amount: Option<Money>,
    pub currency: Option<Currency>,
    pub date: Option<NaiveDate>,
    pub is_paid: Option<bool>,
    pub notes: Option<Option<String>>,
}

pub(crate) fn new_trip(draft: &TripDraft) -> Checked<NewTrip> {
    let name = required_text(draft.name.as_deref(), "name", MAX_TRIP_NAME)?;
    let start_date = required_date(draft.start_date.as_deref(), "startDate")?;
    let end_date = required_date(draft.end_date.as_deref(), "endDate")?;
    date_range(start_date, end_date)?;

    let fields = TripFields {
        name,
        description: optional_text(draft.description.as_deref(), "description", 2000)?,
        start_date,
        end_date,
        total_budget: amount(draft.total_budget.as_deref(), "totalBudget")?,
        currency: currency(draft.currency.as_deref())?,
        trip_type: trip_type(draft.trip_type.as_deref())?,
        tags: tags(&draft.tags),
        custom_budgets: custom_budgets(&draft.custom_budgets)?,
    };
    let cities = cities(&draft.cities)?;
    Ok(NewTrip { fields, cities })
}

pub(crate) fn trip_changes(patch: &TripPatch) -> Checked<TripChanges> {
    let name = patch
        .name
        .as_deref()
        .map(|name| required_text(Some(name), "name", MAX_TRIP_NAME))
        .transpose()?;
    let description = patch
        .description
        .as_deref()
        .map(|text| optional_text(Some(text), "description", 2000))
        .transpose()?;
    let start_date = patch
        .start_date
        .as_deref()
        .map(|raw| required_date(Some(raw), "startDate"))
        .transpose()?;
    let end_date = patch
        .end_date
        .as_deref()
        .map(|raw| required_date(Some(raw), "endDate"))
        .transpose()?;
    let total_budget = patch
        .total_budget
        .as_deref()
        .map(|raw| amount(Some(raw), "totalBudget"))
        .transpose()?;
    let currency = patch
        .currency
        .as_deref()
        .map(|raw| currency(Some(raw)))
        .transpose()?;
    let status = patch
        .status
        .as_deref()
        .map(|raw| {
            TripStatus::parse(raw)
                .ok_or_else(|| ValidationError::new("status", format!("unknown status: {raw}")))
        })
        .transpose()?;
    let trip_type = patch
        .trip_type
        .as_deref()
        .map(|raw| trip_type(Some(raw)))
        .transpose()?;
    let custom_budgets = patch
        .custom_budgets
        .as_deref()
        .map(custom_budgets)
        .transpose()?;
    let cities = patch.cities.as_deref().map(cities).transpose()?;

    Ok(TripChanges {
        name,
        description,
        start_date,
        end_date,
        total_budget,
        currency,
        status,
        trip_type,
        tags: patch.tags.as_deref().map(tags),
        custom_budgets,
        cities,
    })
}

/// End must be strictly after start and the trip at most a year long.
pub(crate) fn date_range(start: NaiveDate, end: NaiveDate) -> Checked<()> {
    if end <= start {
        return Err(ValidationError::new("endDate", "must be after startDate"));
    }
    if (end - start).num_days() > MAX_TRIP_DAYS {
        return Err(ValidationError::new(
            "endDate",
            format!("trip cannot be longer than {MAX_TRIP_DAYS} days"),
        ));
    }
    Ok(())
}

fn cities(drafts: &[CityDraft]) -> Checked<Vec<CityFields>> {
    if drafts.len() > MAX_CITIES {
        return Err(ValidationError::new(
            "cities",
            format!("at most {MAX_CITIES} cities per trip"),
        ));
    }
    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| city(draft, &format!("cities[{index}]")))
        .collect()
}

/// A single city added to an existing trip. Paths are relative to the city.
pub(crate) fn new_city(draft: &CityDraft) -> Checked<CityFields> {
    city(draft, "")
}

/// New cost of an existing activity.
pub(crate) fn activity_cost(raw: Option<&str>) -> Checked<Money> {
    amount(raw, "cost")
}

fn join(path: &str, field: &str) -> String {
    if path.is_empty() {
        field.to_string()
    } else {
        format!("{path}.{field}")
    }
}

fn city(draft: &CityDraft, path: &str) -> Checked<CityFields> {
    let at = |field: &str| join(path, field);

    let name = required_text(draft.name.as_deref(), &at("name"), 100)?;
    let country = required_text(draft.country.as_deref(), &at("country"), 100)?;
    let state = optional_text(draft.state.as_deref(), &at("state"), 100)?;
    let arrival_date = optional_date(draft.arrival_date.as_deref(), &at("arrivalDate"))?;
    let departure_date = optional_date(draft.departure_date.as_deref(), &at("departureDate"))?;
    if let (Some(arrival), Some(departure)) = (arrival_date, departure_date)
        && departure <= arrival
    {
        return Err(ValidationError::new(
            at("departureDate"),
            "must be after arrivalDate",
        ));
    }
    let notes = optional_text(draft.notes.as_deref(), &at("notes"), 1000)?;
    let estimated_budget = amount(draft.estimated_budget.as_deref(), &at("estimatedBudget"))?;
    let actual_spent = amount(draft.actual_spent.as_deref(), &at("actualSpent"))?;

    if draft.activities.len() > MAX_ACTIVITIES {
        return Err(ValidationError::new(
            at("activities"),
            format!("at most {MAX_ACTIVITIES} activities per city"),
        ));
    }
    let activities = draft
        .activities
        .iter()
        .enumerate()
        .map(|(index, activity_draft)| {
            activity(activity_draft, &join(path, &format!("activities[{index}]")))
        })
        .collect::<Checked<Vec<_>>>()?;

    Ok(CityFields {
        name,
        country,
        state,
        arrival_date,
        departure_date,
        notes,
        estimated_budget,
        actual_spent,
        activities,
    })
}

fn activity(draft: &ActivityDraft, path: &str) -> Checked<ActivityFields> {
    let at = |field: &str| format!("{path}.{field}");

    let name = required_text(draft.name.as_deref(), &at("name"), 200)?;
    let date = required_date(draft.date.as_deref(), &at("date"))?;
    let description = optional_text(draft.description.as_deref(), &at("description"), 2000)?;
    let category = match normalize_optional_text(draft.category.as_deref()) {
        None => ActivityCategory::default(),
        Some(raw) => ActivityCategory::parse(&raw).ok_or_else(|| {
            ValidationError::new(at("category"), format!("unknown category: {raw}"))
        })?,
    };
    let cost = amount(draft.cost.as_deref(), &at("cost"))?;
    let time = optional_time(draft.time.as_deref(), &at("time"))?;
    let duration_minutes = duration(draft.duration.as_deref(), &at("duration"))?;
    let location = optional_text(draft.location.as_deref(), &at("location"), 300)?;
    let priority = match normalize_optional_text(draft.priority.as_deref()) {
        None => Priority::default(),
        Some(raw) => Priority::parse(&raw).ok_or_else(|| {
            ValidationError::new(at("priority"), format!("unknown priority: {raw}"))
        })?,
    };
    let booking_reference = optional_text(
        draft.booking_reference.as_deref(),
        &at("bookingReference"),
        100,
    )?;

    Ok(ActivityFields {
        name,
        description,
        category,
        cost,
        date,
        time,
        duration_minutes,
        location,
        priority,
        is_booked: draft.is_booked.unwrap_or(false),
        booking_reference,
    })
}

pub(crate) fn budget_item(draft: &BudgetItemDraft) -> Checked<BudgetItemFields> {
    let category = budget_category(draft.category.as_deref())?.unwrap_or_default();
    let description = optional_text(draft.description.as_deref(), "description", 2000)?;
    let name = match normalize_optional_text(draft.name.as_deref()) {
        Some(name) => required_text(Some(&name), "name", 200)?,
        None => match &description {
            Some(description) => description.chars().take(200).collect(),
            None => format!("{category} expense"),
        },
    };
    let date = match optional_date(draft.date.as_deref(), "date")? {
        Some(date) => date,
        None => Utc::now().date_naive(),
    };

    Ok(BudgetItemFields {
        name,
        description,
        category,
        budgeted_amount: Money::lenient(draft.budgeted_amount.as_deref()),
        actual_amount: Money::lenient(draft.amount.as_deref()),
        currency: currency(draft.currency.as_deref())?,
        date: Some(date),
        is_paid: draft.is_paid.unwrap_or(false),
        notes: optional_text(draft.notes.as_deref(), "notes", 2000)?,
    })
}

pub(crate) fn budget_item_changes(patch: &BudgetItemPatch) -> Checked<BudgetItemChanges> {
    Ok(BudgetItemChanges {
        name: patch
            .name
            .as_deref()
            .map(|name| required_text(Some(name), "name", 200))
            .transpose()?,
        description: patch
            .description
            .as_deref()
            .map(|text| optional_text(Some(text), "description", 2000))
            .transpose()?,
        category: budget_category(patch.category.as_deref())?,
        budgeted_amount: patch
            .budgeted_amount
            .as_deref()
            .map(|raw| Money::lenient(Some(raw))),
        actual_amount: patch.amount.as_deref().map(|raw| Money::lenient(Some(raw))),
        currency: patch
            .currency
            .as_deref()
            .map(|raw| currency(Some(raw)))
            .transpose()?,
        date: patch
            .date
            .as_deref()
            .map(|raw| required_date(Some(raw), "date"))
            .transpose()?,
        is_paid: patch.is_paid,
        notes: patch
            .notes
            .as_deref()
            .map(|text| optional_text(Some(text), "notes", 2000))
            .transpose()?,
    })
}

fn budget_category(raw: Option<&str>) -> Checked<Option<BudgetCategory>> {
    normalize_optional_text(raw)
        .map(|raw| {
            BudgetCategory::parse(&raw).ok_or_else(|| {
                ValidationError::new("category", format!("unknown category: {raw}"))
            })
        })
        .transpose()
}

fn required_text(raw: Option<&str>, path: &str, max_chars: usize) -> Checked<String> {
    optional_text(raw, path, max_chars)?.ok_or_else(|| ValidationError::required(path))
}

fn optional_text(raw: Option<&str>, path: &str, max_chars: usize) -> Checked<Option<String>> {
    let text = normalize_optional_text(raw);
    if let Some(text) = &text
        && text.chars().count() > max_chars
    {
        return Err(ValidationError::new(
            path,
            format!("must be at most {max_chars} characters"),
        ));
    }
    Ok(text)
}

/// Lenient amount: missing or unparseable is zero, negative is rejected.
fn amount(raw: Option<&str>, path: &str) -> Checked<Money> {
    let value = Money::lenient_signed(raw);
    if value.is_negative() {
        return Err(ValidationError::new(path, "must not be negative"));
    }
    if value > MAX_AMOUNT {
        return Err(ValidationError::new(
            path,
            format!("must be at most {MAX_AMOUNT}"),
        ));
    }
    Ok(value)
}

/// Accepts `YYYY-MM-DD`, or a full timestamp whose date part is used.
pub(crate) fn parse_date(raw: &str) -> Option<NaiveDate> {
    let raw = raw.trim();
    let date_part = match raw.get(..10) {
        Some(prefix) if raw.len() == 10 || raw[10..].starts_with(['T', ' ']) => prefix,
        _ => return None,
    };
    NaiveDate::parse_from_str(date_part, "%Y-%m-%d").ok()
}

fn required_date(raw: Option<&str>, path: &str) -> Checked<NaiveDate> {
    optional_date(raw, path)?.ok_or_else(|| ValidationError::required(path))
}

fn optional_date(raw: Option<&str>, path: &str) -> Checked<Option<NaiveDate>> {
    normalize_optional_text(raw)
        .map(|raw| {
            parse_date(&raw).ok_or_else(|| {
                ValidationError::new(path, format!("invalid date: {raw} (expected YYYY-MM-DD)"))
            })
        })
        .transpose()
}

fn optional_time(raw: Option<&str>, path: &str) -> Checked<Option<NaiveTime>> {
    normalize_optional_text(raw)
        .map(|raw| {
            NaiveTime::parse_from_str(&raw, "%H:%M")
                .or_else(|_| NaiveTime::parse_from_str(&raw, "%H:%M:%S"))
                .map_err(|_| {
                    ValidationError::new(path, format!("invalid time: {raw} (expected HH:MM)"))
                })
        })
        .transpose()
}

fn duration(raw: Option<&str>, path: &str) -> Checked<Option<i32>> {
    let Some(raw) = normalize_optional_text(raw) else {
        return Ok(None);
    };
    let minutes: i32 = raw
        .parse()
        .map_err(|_| ValidationError::new(path, "must be a whole number of minutes"))?;
    if !(0..=MAX_ACTIVITY_MINUTES).contains(&minutes) {
        return Err(ValidationError::new(
            path,
            format!("must be between 0 and {MAX_ACTIVITY_MINUTES} minutes"),
        ));
    }
    Ok(Some(minutes))
}

fn currency(raw: Option<&str>) -> Checked<Currency> {
    match normalize_optional_text(raw) {
        None => Ok(Currency::default()),
        Some(raw) => Currency::try_from(raw.as_str()),
    }
}

fn trip_type(raw: Option<&str>) -> Checked<TripType> {
    match normalize_optional_text(raw) {
        None => Ok(TripType::default()),
        Some(raw) => TripType::parse(&raw)
            .ok_or_else(|| ValidationError::new("tripType", format!("unknown trip type: {raw}"))),
    }
}

fn tags(raw: &[String]) -> Vec<String> {
    let mut out: Vec<String> = Vec::with_capacity(raw.len());
    for tag in raw.iter().filter_map(|tag| normalize_optional_text(Some(tag))) {
        if !out.contains(&tag) {
            out.push(tag);
        }
    }
    out
}

fn custom_budgets(drafts: &[CustomBudgetDraft]) -> Checked<Vec<CustomBudget>> {
    drafts
        .iter()
        .enumerate()
        .map(|(index, draft)| {
            let path = format!("customBudgets[{index}]");
            Ok(CustomBudget {
                category: required_text(
                    draft.category.as_deref(),
                    &format!("{path}.category"),
                    100,
                )?,
                amount: amount(draft.amount.as_deref(), &format!("{path}.amount"))?,
            })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn euro_trip() -> TripDraft {
        TripDraft::new("Euro Trip", "2024-06-01", "2024-06-10")
            .city(CityDraft::new("Paris", "France"))
            .city(CityDraft::new("Rome", "Italy"))
    }

    #[test]
    fn accepts_minimal_trip_with_defaults() {
        let trip = new_trip(&euro_trip()).unwrap();
        assert_eq!(trip.fields.name, "Euro Trip");
        assert_eq!(trip.fields.currency, Currency::Usd);
        assert_eq!(trip.fields.trip_type, TripType::Solo);
        assert_eq!(trip.fields.total_budget, Money::ZERO);
        assert_eq!(trip.cities.len(), 2);
    }

    #[test]
    fn missing_trip_name_is_reported_first() {
        let mut draft = euro_trip();
        draft.name = Some("   ".to_string());
        draft.start_date = None;
        let err = new_trip(&draft).unwrap_err();
        assert_eq!(err, ValidationError::required("name"));
    }

    #[test]
    fn nested_activity_path_is_reported() {
        let mut broken = ActivityDraft::new("Museum", "2024-06-02");
        broken.name = None;
        let draft = euro_trip().city(
            CityDraft::new("Florence", "Italy")
                .activity(ActivityDraft::new("Duomo", "2024-06-03"))
                .activity(broken),
        );
        let err = new_trip(&draft).unwrap_err();
        assert_eq!(err.path, "cities[2].activities[1].name");
        assert_eq!(err.message, "is required");
    }

    #[test]
    fn missing_city_country_is_reported() {
        let mut city = CityDraft::new("Nowhere", "x");
        city.country = None;
        let err = new_trip(&euro_trip().city(city)).unwrap_err();
        assert_eq!(err.path, "cities[2].country");
    }

    #[test]
    fn end_must_follow_start() {
        let err = new_trip(&TripDraft::new("x", "2024-06-10", "2024-06-10")).unwrap_err();
        assert_eq!(err.path, "endDate");
        let err = new_trip(&TripDraft::new("x", "2024-01-01", "2025-01-02")).unwrap_err();
        assert_eq!(err.path, "endDate");
        assert!(new_trip(&TripDraft::new("x", "2024-01-01", "2024-12-31")).is_ok());
    }

    #[test]
    fn departure_must_follow_arrival() {
        let draft = TripDraft::new("x", "2024-06-01", "2024-06-10")
            .city(CityDraft::new("Paris", "France").dates("2024-06-05", "2024-06-04"));
        let err = new_trip(&draft).unwrap_err();
        assert_eq!(err.path, "cities[0].departureDate");
    }

    #[test]
    fn amounts_are_lenient_but_never_negative() {
        let draft = euro_trip().total_budget("abc");
        assert_eq!(new_trip(&draft).unwrap().fields.total_budget, Money::ZERO);

        let draft = euro_trip().total_budget("-5");
        assert_eq!(new_trip(&draft).unwrap_err().path, "totalBudget");

        let draft = TripDraft::new("x", "2024-06-01", "2024-06-10").city(
            CityDraft::new("Paris", "France")
                .activity(ActivityDraft::new("Louvre", "2024-06-02").cost("-1")),
        );
        assert_eq!(
            new_trip(&draft).unwrap_err().path,
            "cities[0].activities[0].cost"
        );
    }

    #[test]
    fn caps_on_cities_and_activities() {
        let mut draft = TripDraft::new("x", "2024-06-01", "2024-06-10");
        draft.cities = vec![CityDraft::new("c", "k"); MAX_CITIES + 1];
        assert_eq!(new_trip(&draft).unwrap_err().path, "cities");

        let mut city = CityDraft::new("c", "k");
        city.activities = vec![ActivityDraft::new("a", "2024-06-02"); MAX_ACTIVITIES + 1];
        let draft = TripDraft::new("x", "2024-06-01", "2024-06-10").city(city);
        assert_eq!(new_trip(&draft).unwrap_err().path, "cities[0].activities");
    }

    #[test]
    fn activity_duration_bounds() {
        let mut activity = ActivityDraft::new("a", "2024-06-02");
        activity.duration = Some("1441".to_string());
        let draft = TripDraft::new("x", "2024-06-01", "2024-06-10")
            .city(CityDraft::new("c", "k").activity(activity));
        assert_eq!(
            new_trip(&draft).unwrap_err().path,
            "cities[0].activities[0].duration"
        );
    }

    #[test]
    fn unknown_activity_category_is_rejected() {
        let activity = ActivityDraft::new("a", "2024-06-02").category("party");
        let draft = TripDraft::new("x", "2024-06-01", "2024-06-10")
            .city(CityDraft::new("c", "k").activity(activity));
        assert_eq!(
            new_trip(&draft).unwrap_err().path,
            "cities[0].activities[0].category"
        );
    }

    #[test]
    fn dates_accept_timestamps() {
        assert_eq!(
            parse_date("2024-06-01T10:00:00.000Z"),
            NaiveDate::from_ymd_opt(2024, 6, 1)
        );
        assert_eq!(parse_date("2024-06-01"), NaiveDate::from_ymd_opt(2024, 6, 1));
        assert_eq!(parse_date("06/01/2024"), None);
        assert_eq!(parse_date("2024-06-01garbage"), None);
    }

    #[test]
    fn times_accept_minutes_and_seconds() {
        assert!(optional_time(Some("09:30"), "t").unwrap().is_some());
        assert!(optional_time(Some("09:30:15"), "t").unwrap().is_some());
        assert!(optional_time(Some("9am"), "t").is_err());
    }

    #[test]
    fn tags_are_trimmed_and_deduplicated() {
        let raw = vec![" food ".to_string(), "".to_string(), "food".to_string()];
        assert_eq!(tags(&raw), vec!["food".to_string()]);
    }

    #[test]
    fn budget_item_defaults() {
        let item = budget_item(&BudgetItemDraft::default()).unwrap();
        assert_eq!(item.category, BudgetCategory::Others);
        assert_eq!(item.name, "others expense");
        assert_eq!(item.actual_amount, Money::ZERO);

        let item = budget_item(&BudgetItemDraft::new("food", "-3").description("Lunch")).unwrap();
        assert_eq!(item.name, "Lunch");
        assert_eq!(item.actual_amount, Money::ZERO);
    }

    #[test]
    fn budget_item_unknown_category_is_rejected() {
        let err = budget_item(&BudgetItemDraft::new("misc", "1")).unwrap_err();
        assert_eq!(err.path, "category");
    }

    #[test]
    fn standalone_city_paths_have_no_prefix() {
        let mut broken = ActivityDraft::new("Duomo", "2024-06-03");
        broken.date = None;
        let err = new_city(&CityDraft::new("Florence", "Italy").activity(broken)).unwrap_err();
        assert_eq!(err.path, "activities[0].date");

        let mut city = CityDraft::new("Florence", "Italy");
        city.country = None;
        assert_eq!(new_city(&city).unwrap_err().path, "country");
    }

    #[test]
    fn activity_cost_is_lenient_but_never_negative() {
        assert_eq!(activity_cost(Some("12.5")).unwrap(), Money::new(1250));
        assert_eq!(activity_cost(Some("n/a")).unwrap(), Money::ZERO);
        assert_eq!(activity_cost(None).unwrap(), Money::ZERO);
        assert_eq!(activity_cost(Some("-1")).unwrap_err().path, "cost");
    }

    #[test]
    fn patch_keeps_absent_fields() {
        let changes = trip_changes(&TripPatch::default().status("Confirmed")).unwrap();
        assert_eq!(changes.status, Some(TripStatus::Confirmed));
        assert!(changes.name.is_none());
        assert!(changes.cities.is_none());
    }

    #[test]
    fn patch_validates_replacement_cities() {
        let patch = TripPatch::default().cities(vec![CityDraft::default()]);
        assert_eq!(trip_changes(&patch).unwrap_err().path, "cities[0].name");
    }
}
