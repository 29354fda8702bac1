/// Filter and ordering types for library views
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

/// A song attribute a view can be filtered on
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FilterField {
    Artist,
    Album,
}

impl FilterField {
    /// Column name in the library table
    pub fn column(self) -> &'static str {
        match self {
            Self::Artist => "artist",
            Self::Album => "album",
        }
    }
}

impl fmt::Display for FilterField {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Artist => write!(f, "Artist"),
            Self::Album => write!(f, "Album"),
        }
    }
}

/// Ordering rule for a filtered view
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OrderBy {
    /// `track_number ASC`
    TrackNumber,
    /// `sortable_title ASC`
    SortableTitle,
}

impl OrderBy {
    /// Column name in the library table
    pub fn column(self) -> &'static str {
        match self {
            Self::TrackNumber => "track_number",
            Self::SortableTitle => "sortable_title",
        }
    }
}

/// Which songs are visible in a view
///
/// Maps a field to the set of accepted values. A song matches when, for
/// every field present, its value is in the set. An empty filter matches
/// every song.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Filter {
    fields: BTreeMap<FilterField, BTreeSet<String>>,
}

impl Filter {
    /// Filter that matches everything
    pub fn new() -> Self {
        Self::default()
    }

    /// Add an accepted value for a field
    #[must_use]
    pub fn with(mut self, field: FilterField, value: impl Into<String>) -> Self {
        self.insert(field, value);
        self
    }

    /// Add an accepted value for a field in place
    pub fn insert(&mut self, field: FilterField, value: impl Into<String>) {
        self.fields.entry(field).or_default().insert(value.into());
    }

    /// Accepted values for a field, if the field is constrained
    pub fn values(&self, field: FilterField) -> Option<&BTreeSet<String>> {
        self.fields.get(&field).filter(|values| !values.is_empty())
    }

    /// Constrained fields with their accepted values
    ///
    /// Fields whose value set is empty are skipped.
    pub fn iter(&self) -> impl Iterator<Item = (FilterField, &BTreeSet<String>)> {
        self.fields
            .iter()
            .filter(|(_, values)| !values.is_empty())
            .map(|(field, values)| (*field, values))
    }

    /// Whether the filter matches every song
    pub fn is_empty(&self) -> bool {
        self.iter().next().is_none()
    }

    /// Whether a field/value pair passes this filter
    pub fn accepts(&self, field: FilterField, value: Option<&str>) -> bool {
        match self.values(field) {
            None => true,
            Some(values) => value.is_some_and(|v| values.contains(v)),
        }
    }

    /// Ordering rule for this view
    ///
    /// Album views play in track order, everything else alphabetically.
    pub fn order_by(&self) -> OrderBy {
        if self.values(FilterField::Album).is_some() {
            OrderBy::TrackNumber
        } else {
            OrderBy::SortableTitle
        }
    }
}
