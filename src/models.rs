use std::fmt;
use std::str::FromStr;

use chrono::Weekday;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Day {
    Monday,
    Tuesday,
    Wednesday,
    Thursday,
    Friday,
    Saturday,
    Sunday,
}

impl Day {
    pub const ALL: [Day; 7] = [
        Day::Monday,
        Day::Tuesday,
        Day::Wednesday,
        Day::Thursday,
        Day::Friday,
        Day::Saturday,
        Day::Sunday,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Day::Monday => "Monday",
            Day::Tuesday => "Tuesday",
            Day::Wednesday => "Wednesday",
            Day::Thursday => "Thursday",
            Day::Friday => "Friday",
            Day::Saturday => "Saturday",
            Day::Sunday => "Sunday",
        }
    }

    pub fn weekday(self) -> Weekday {
        match self {
            Day::Monday => Weekday::Mon,
            Day::Tuesday => Weekday::Tue,
            Day::Wednesday => Weekday::Wed,
            Day::Thursday => Weekday::Thu,
            Day::Friday => Weekday::Fri,
            Day::Saturday => Weekday::Sat,
            Day::Sunday => Weekday::Sun,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum SessionType {
    Strength,
    #[serde(rename = "HIIT")]
    Hiit,
    Recovery,
    Boxing,
    Yoga,
}

impl SessionType {
    pub const ALL: [SessionType; 5] = [
        SessionType::Strength,
        SessionType::Hiit,
        SessionType::Recovery,
        SessionType::Boxing,
        SessionType::Yoga,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SessionType::Strength => "Strength",
            SessionType::Hiit => "HIIT",
            SessionType::Recovery => "Recovery",
            SessionType::Boxing => "Boxing",
            SessionType::Yoga => "Yoga",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum Intensity {
    Low,
    Moderate,
    High,
    Extreme,
}

impl Intensity {
    pub const ALL: [Intensity; 4] = [
        Intensity::Low,
        Intensity::Moderate,
        Intensity::High,
        Intensity::Extreme,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Intensity::Low => "Low",
            Intensity::Moderate => "Moderate",
            Intensity::High => "High",
            Intensity::Extreme => "Extreme",
        }
    }
}

/// Returned when a label does not name a member of one of the enumerations.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unknown {kind} '{value}'")]
pub struct UnknownVariant {
    pub kind: &'static str,
    pub value: String,
}

macro_rules! labelled_enum {
    ($ty:ty, $kind:literal) => {
        impl fmt::Display for $ty {
            fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
                f.write_str(self.as_str())
            }
        }

        impl FromStr for $ty {
            type Err = UnknownVariant;

            fn from_str(s: &str) -> Result<Self, Self::Err> {
                <$ty>::ALL
                    .into_iter()
                    .find(|v| v.as_str() == s)
                    .ok_or_else(|| UnknownVariant {
                        kind: $kind,
                        value: s.to_string(),
                    })
            }
        }
    };
}

labelled_enum!(Day, "day");
labelled_enum!(SessionType, "session type");
labelled_enum!(Intensity, "intensity");

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ClassSession {
    pub id: String,
    pub name: String,
    pub trainer_id: String,
    pub day: Day,
    #[schema(example = "06:00")]
    pub time: String,
    /// Minutes.
    pub duration: u32,
    #[serde(rename = "type")]
    pub session_type: SessionType,
    pub intensity: Intensity,
    pub spots_left: i32,
    pub slug: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Trainer {
    pub id: String,
    pub name: String,
    pub role: String,
    pub bio: String,
    pub specialties: Vec<String>,
    pub image: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
pub struct Program {
    pub id: String,
    pub title: String,
    pub description: String,
    pub image: String,
    pub href: String,
    #[schema(example = "#D4FF00")]
    pub color: String,
}

#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct PricingTier {
    pub id: String,
    pub name: String,
    pub price: String,
    pub period: String,
    pub features: Vec<String>,
    #[serde(default)]
    pub is_popular: bool,
    #[serde(default = "default_cta")]
    pub cta: String,
}

fn default_cta() -> String {
    "Choose Plan".to_string()
}

/// A class session annotated with the display name of its trainer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScheduleEntry<'a> {
    pub session: &'a ClassSession,
    pub trainer_name: &'a str,
}

/// Wire form of a [`ScheduleEntry`]: the session fields plus `trainerName`.
#[derive(Debug, Clone, Serialize, PartialEq, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ScheduledClass {
    #[serde(flatten)]
    pub session: ClassSession,
    #[schema(example = "Alex Vane")]
    pub trainer_name: String,
}

impl From<ScheduleEntry<'_>> for ScheduledClass {
    fn from(entry: ScheduleEntry<'_>) -> Self {
        Self {
            session: entry.session.clone(),
            trainer_name: entry.trainer_name.to_string(),
        }
    }
}
