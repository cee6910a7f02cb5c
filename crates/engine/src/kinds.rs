//! Closed sets of values stored as lowercase strings.

use serde::{Deserialize, Serialize};

use crate::EngineError;

/// Generates a string-backed enum with `as_str`, `parse` and a `TryFrom<&str>`
/// used when reading rows back from storage.
macro_rules! string_enum {
    (
        $(#[$meta:meta])*
        $name:ident, $label:literal, default = $default:ident,
        { $($variant:ident => $text:literal),+ $(,)? }
    ) => {
        $(#[$meta])*
        #[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
        #[serde(rename_all = "snake_case")]
        pub enum $name {
            $($variant),+
        }

        impl $name {
            pub fn as_str(self) -> &'static str {
                match self {
                    $(Self::$variant => $text),+
                }
            }

            /// Case-insensitive parse of user input.
            pub fn parse(value: &str) -> Option<Self> {
                match value.trim().to_ascii_lowercase().as_str() {
                    $($text => Some(Self::$variant),)+
                    _ => None,
                }
            }

            pub fn all() -> &'static [Self] {
                &[$(Self::$variant),+]
            }
        }

        impl Default for $name {
            fn default() -> Self {
                Self::$default
            }
        }

        impl TryFrom<&str> for $name {
            type Error = EngineError;

            fn try_from(value: &str) -> Result<Self, Self::Error> {
                Self::parse(value).ok_or_else(|| {
                    EngineError::InvalidData(format!("invalid {}: {value}", $label))
                })
            }
        }

        impl std::fmt::Display for $name {
            fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
                f.write_str(self.as_str())
            }
        }
    };
}

string_enum!(
    /// Lifecycle of a trip.
    TripStatus, "status", default = Planning,
    {
        Planning => "planning",
        Confirmed => "confirmed",
        Ongoing => "ongoing",
        Completed => "completed",
        Cancelled => "cancelled",
    }
);

string_enum!(
    TripType, "trip type", default = Solo,
    {
        Solo => "solo",
        Couple => "couple",
        Family => "family",
        Friends => "friends",
        Business => "business",
    }
);

string_enum!(
    /// What kind of event an activity is.
    ActivityCategory, "activity category", default = Sightseeing,
    {
        Sightseeing => "sightseeing",
        Food => "food",
        Entertainment => "entertainment",
        Shopping => "shopping",
        Transport => "transport",
        Accommodation => "accommodation",
        Adventure => "adventure",
        Culture => "culture",
        Nature => "nature",
        Nightlife => "nightlife",
        Wellness => "wellness",
        Business => "business",
        Other => "other",
    }
);

string_enum!(
    Priority, "priority", default = Medium,
    {
        Low => "low",
        Medium => "medium",
        High => "high",
    }
);

string_enum!(
    /// Category of an ad-hoc budget item. Also the key of a trip's category
    /// breakdown.
    BudgetCategory, "budget category", default = Others,
    {
        Accommodation => "accommodation",
        Transportation => "transportation",
        Food => "food",
        Activities => "activities",
        Shopping => "shopping",
        Others => "others",
    }
);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_is_case_insensitive() {
        assert_eq!(TripStatus::parse(" Confirmed "), Some(TripStatus::Confirmed));
        assert_eq!(ActivityCategory::parse("FOOD"), Some(ActivityCategory::Food));
        assert_eq!(Priority::parse("medium"), Some(Priority::Medium));
        assert_eq!(TripType::parse("nope"), None);
    }

    #[test]
    fn as_str_round_trips_for_every_variant() {
        for category in BudgetCategory::all() {
            assert_eq!(BudgetCategory::parse(category.as_str()), Some(*category));
        }
        for category in ActivityCategory::all() {
            assert_eq!(ActivityCategory::parse(category.as_str()), Some(*category));
        }
        assert_eq!(ActivityCategory::all().len(), 13);
    }

    #[test]
    fn defaults_match_schema() {
        assert_eq!(TripStatus::default().as_str(), "planning");
        assert_eq!(TripType::default().as_str(), "solo");
        assert_eq!(ActivityCategory::default().as_str(), "sightseeing");
        assert_eq!(Priority::default().as_str(), "medium");
        assert_eq!(BudgetCategory::default().as_str(), "others");
    }

    #[test]
    fn stored_garbage_is_invalid_data() {
        let err = BudgetCategory::try_from("misc").unwrap_err();
        assert_eq!(
            err,
            EngineError::InvalidData("invalid budget category: misc".to_string())
        );
    }

    #[test]
    fn serde_uses_snake_case() {
        let json = serde_json::to_string(&TripStatus::Cancelled).unwrap();
        assert_eq!(json, "\"cancelled\"");
    }
}
