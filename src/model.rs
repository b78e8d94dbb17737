//! Activity and category data model.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Inclusive span between two user-supplied times.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TimeInterval {
    pub start: i64,
    pub stop: i64,
}

impl TimeInterval {
    /// Build an interval; `stop` may not precede `start`.
    pub fn new(start: i64, stop: i64) -> Result<Self, String> {
        if stop < start {
            return Err(format!("stop time {stop} is before start time {start}"));
        }
        Ok(Self { start, stop })
    }

}

impl fmt::Display for TimeInterval {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {}]", self.start, self.stop)
    }
}

/// One recorded activity.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Activity {
    pub name: String,
    pub interval: TimeInterval,
    #[serde(default)]
    pub category: Option<String>,
}

impl Activity {
    pub fn new(name: impl Into<String>, interval: TimeInterval) -> Self {
        Self {
            name: name.into(),
            interval,
            category: None,
        }
    }
}

impl fmt::Display for Activity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "Name: {} Interval: {} | Category: {}",
            self.name,
            self.interval,
            self.category.as_deref().unwrap_or("None")
        )
    }
}

/// A user's activities and categories.
///
/// Activity names and categories are both unique case-insensitively and keep
/// insertion order. Adding an activity under an existing name replaces it.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ActivityBook {
    activities: Vec<Activity>,
    categories: Vec<String>,
}

impl ActivityBook {
    pub fn new(activities: Vec<Activity>, categories: Vec<String>) -> Self {
        let mut book = Self::default();
        for activity in activities {
            book.add_activity(activity);
        }
        for category in categories {
            book.add_category(category);
        }
        book
    }

    pub fn activities(&self) -> &[Activity] {
        &self.activities
    }

    pub fn categories(&self) -> &[String] {
        &self.categories
    }

    /// Insert or replace by name (any case); returns the replaced activity.
    pub fn add_activity(&mut self, activity: Activity) -> Option<Activity> {
        match self.find_activity_mut(&activity.name) {
            Some(slot) => Some(std::mem::replace(slot, activity)),
            None => {
                self.activities.push(activity);
                None
            }
        }
    }

    /// Add a category; false when empty or already present (any case).
    pub fn add_category(&mut self, category: impl Into<String>) -> bool {
        let category = category.into();
        if category.trim().is_empty() || self.find_category(&category).is_some() {
            return false;
        }
        self.categories.push(category);
        true
    }

    /// Assign an existing category to an existing activity.
    pub fn set_category(&mut self, activity: &str, category: &str) -> Result<(), String> {
        let category = self
            .find_category(category)
            .ok_or_else(|| format!("unknown category `{category}`"))?
            .to_string();
        let slot = self
            .find_activity_mut(activity)
            .ok_or_else(|| format!("unknown activity `{activity}`"))?;
        slot.category = Some(category);
        Ok(())
    }

    /// Activities tagged with `category` (case-insensitive).
    pub fn in_category<'a>(&'a self, category: &'a str) -> impl Iterator<Item = &'a Activity> {
        let wanted = category.to_lowercase();
        self.activities.iter().filter(move |a| {
            a.category
                .as_deref()
                .is_some_and(|c| c.to_lowercase() == wanted)
        })
    }

    pub fn activity_names(&self) -> impl Iterator<Item = &str> {
        self.activities.iter().map(|a| a.name.as_str())
    }

    fn find_activity_mut(&mut self, name: &str) -> Option<&mut Activity> {
        let wanted = name.to_lowercase();
        self.activities
            .iter_mut()
            .find(|a| a.name.to_lowercase() == wanted)
    }

    fn find_category(&self, category: &str) -> Option<&str> {
        let wanted = category.to_lowercase();
        self.categories
            .iter()
            .find(|c| c.to_lowercase() == wanted)
            .map(String::as_str)
    }
}

/// Render items as `[a, b, c]`.
pub fn bracket_list<T: fmt::Display>(items: &[T]) -> String {
    let joined = items
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join(", ");
    format!("[{joined}]")
}
