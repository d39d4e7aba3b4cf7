//! Schedule filtering.
//!
//! A [`ScheduleFilter`] owns the three selectors (day, type, intensity) and
//! keeps the filtered view of a borrowed class list in step with them. The
//! view is recomputed whenever a selector is set and is always a
//! subsequence of the input in its original order.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use tracing::debug;
use utoipa::ToSchema;

use crate::models::{
    ClassSession, Day, Intensity, ScheduleEntry, SessionType, Trainer, UnknownVariant,
};

pub const UNKNOWN_TRAINER: &str = "Unknown Trainer";

const ALL_LABEL: &str = "All";

/// One filter dimension: either the wildcard or a single exact value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Selection<T> {
    All,
    Only(T),
}

impl<T> Default for Selection<T> {
    fn default() -> Self {
        Selection::All
    }
}

impl<T: PartialEq> Selection<T> {
    pub fn matches(&self, value: &T) -> bool {
        match self {
            Selection::All => true,
            Selection::Only(selected) => selected == value,
        }
    }
}

impl<T: Copy> Selection<T> {
    /// The wildcard followed by every value of the dimension.
    pub fn domain(values: &[T]) -> Vec<Selection<T>> {
        std::iter::once(Selection::All)
            .chain(values.iter().copied().map(Selection::Only))
            .collect()
    }
}

impl<T: fmt::Display> fmt::Display for Selection<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Selection::All => f.write_str(ALL_LABEL),
            Selection::Only(value) => value.fmt(f),
        }
    }
}

impl<T: FromStr<Err = UnknownVariant>> FromStr for Selection<T> {
    type Err = UnknownVariant;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        if s == ALL_LABEL {
            Ok(Selection::All)
        } else {
            s.parse().map(Selection::Only)
        }
    }
}

impl<T: fmt::Display> Serialize for Selection<T> {
    fn serialize<S: serde::Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

/// The selector triple. The default is All/All/All.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, ToSchema)]
pub struct Selections {
    #[schema(value_type = String, example = "Monday")]
    pub day: Selection<Day>,
    #[serde(rename = "type")]
    #[schema(value_type = String, example = "All")]
    pub session_type: Selection<SessionType>,
    #[schema(value_type = String, example = "High")]
    pub intensity: Selection<Intensity>,
}

impl Selections {
    pub fn matches(&self, session: &ClassSession) -> bool {
        self.day.matches(&session.day)
            && self.session_type.matches(&session.session_type)
            && self.intensity.matches(&session.intensity)
    }
}

/// Sessions matching `selections`, in input order.
pub fn filter_sessions<'a>(
    classes: &'a [ClassSession],
    selections: &Selections,
) -> Vec<&'a ClassSession> {
    classes.iter().filter(|c| selections.matches(c)).collect()
}

/// Name of the trainer with `trainer_id`, or [`UNKNOWN_TRAINER`].
pub fn resolve_trainer_name<'a>(trainers: &'a [Trainer], trainer_id: &str) -> &'a str {
    trainers
        .iter()
        .find(|t| t.id == trainer_id)
        .map(|t| t.name.as_str())
        .unwrap_or(UNKNOWN_TRAINER)
}

pub struct ScheduleFilter<'a> {
    classes: &'a [ClassSession],
    trainers: &'a [Trainer],
    selections: Selections,
    view: Vec<usize>,
}

impl<'a> ScheduleFilter<'a> {
    pub fn new(classes: &'a [ClassSession], trainers: &'a [Trainer]) -> Self {
        Self::with_selections(classes, trainers, Selections::default())
    }

    pub fn with_selections(
        classes: &'a [ClassSession],
        trainers: &'a [Trainer],
        selections: Selections,
    ) -> Self {
        let mut filter = Self {
            classes,
            trainers,
            selections,
            view: Vec::new(),
        };
        filter.recompute();
        filter
    }

    pub fn selections(&self) -> Selections {
        self.selections
    }

    pub fn set_day(&mut self, day: Selection<Day>) {
        self.selections.day = day;
        self.recompute();
    }

    pub fn set_type(&mut self, session_type: Selection<SessionType>) {
        self.selections.session_type = session_type;
        self.recompute();
    }

    pub fn set_intensity(&mut self, intensity: Selection<Intensity>) {
        self.selections.intensity = intensity;
        self.recompute();
    }

    /// Replaces the input list, keeping the current selections.
    pub fn set_classes(&mut self, classes: &'a [ClassSession]) {
        self.classes = classes;
        self.recompute();
    }

    fn recompute(&mut self) {
        let selections = self.selections;
        self.view = self
            .classes
            .iter()
            .enumerate()
            .filter(|(_, c)| selections.matches(c))
            .map(|(i, _)| i)
            .collect();
        debug!(
            day = %selections.day,
            session_type = %selections.session_type,
            intensity = %selections.intensity,
            matched = self.view.len(),
            total = self.classes.len(),
            "schedule filter recomputed"
        );
    }

    pub fn is_empty(&self) -> bool {
        self.view.is_empty()
    }

    pub fn len(&self) -> usize {
        self.view.len()
    }

    pub fn sessions(&self) -> impl Iterator<Item = &'a ClassSession> + '_ {
        let classes = self.classes;
        self.view.iter().map(move |&i| &classes[i])
    }

    /// The filtered view annotated with trainer names.
    pub fn entries(&self) -> Vec<ScheduleEntry<'a>> {
        let trainers = self.trainers;
        self.sessions()
            .map(|session| ScheduleEntry {
                session,
                trainer_name: resolve_trainer_name(trainers, &session.trainer_id),
            })
            .collect()
    }
}
