//! Filter and sort construction for property listings.
//!
//! Every parameter is optional. With nothing supplied the listing is
//! unfiltered and sorted newest first. Owner-email and search clauses are
//! combined with logical AND.

use std::cmp::Ordering;

use super::property::Property;

/// Field the default sort (and the recent listing) orders by.
pub const CREATED_AT_FIELD: &str = "createdAt";

/// Number of items the recent listing returns.
pub const RECENT_LIMIT: usize = 6;

/// Sort direction.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortDirection {
    Ascending,
    Descending,
}

impl SortDirection {
    /// Parse the `order` query parameter. Anything but `desc` is ascending.
    pub fn from_param(order: Option<&str>) -> Self {
        match order {
            Some("desc") => SortDirection::Descending,
            _ => SortDirection::Ascending,
        }
    }

    /// Document-store sort value (`1` or `-1`).
    pub fn as_i32(self) -> i32 {
        match self {
            SortDirection::Ascending => 1,
            SortDirection::Descending => -1,
        }
    }

    /// Orient an ascending comparison.
    pub fn apply(self, ordering: Ordering) -> Ordering {
        match self {
            SortDirection::Ascending => ordering,
            SortDirection::Descending => ordering.reverse(),
        }
    }
}

/// Sort on a single field.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortSpec {
    pub field: String,
    pub direction: SortDirection,
}

impl SortSpec {
    pub fn new(field: impl Into<String>, direction: SortDirection) -> Self {
        Self {
            field: field.into(),
            direction,
        }
    }

    /// `createdAt` descending.
    pub fn newest_first() -> Self {
        Self::new(CREATED_AT_FIELD, SortDirection::Descending)
    }

    pub fn is_created_at(&self) -> bool {
        self.field == CREATED_AT_FIELD
    }
}

impl Default for SortSpec {
    fn default() -> Self {
        Self::newest_first()
    }
}

/// Listing query built from request parameters.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PropertyQuery {
    /// Exact match on `userEmail`
    pub owner_email: Option<String>,
    /// Case-insensitive substring match on `propertyName`
    pub search: Option<String>,
    pub sort: SortSpec,
}

impl PropertyQuery {
    /// Build a query from raw request parameters.
    ///
    /// Empty strings count as absent. `order` only matters when `sort_by`
    /// is given; without it the sort is always newest first.
    pub fn from_params(
        email: Option<String>,
        search: Option<String>,
        sort_by: Option<String>,
        order: Option<String>,
    ) -> Self {
        let sort = match non_empty(sort_by) {
            Some(field) => SortSpec::new(field, SortDirection::from_param(order.as_deref())),
            None => SortSpec::newest_first(),
        };

        Self {
            owner_email: non_empty(email),
            search: non_empty(search),
            sort,
        }
    }

    pub fn with_owner_email(mut self, email: impl Into<String>) -> Self {
        self.owner_email = Some(email.into());
        self
    }

    pub fn with_search(mut self, search: impl Into<String>) -> Self {
        self.search = Some(search.into());
        self
    }

    pub fn with_sort(mut self, sort: SortSpec) -> Self {
        self.sort = sort;
        self
    }

    pub fn has_filter(&self) -> bool {
        self.owner_email.is_some() || self.search.is_some()
    }

    /// Evaluate the filter clauses against a property.
    pub fn matches(&self, property: &Property) -> bool {
        if let Some(email) = &self.owner_email {
            if property.fields.user_email.as_deref() != Some(email.as_str()) {
                return false;
            }
        }

        if let Some(search) = &self.search {
            let needle = search.to_lowercase();
            match &property.fields.property_name {
                Some(name) if name.to_lowercase().contains(&needle) => {}
                _ => return false,
            }
        }

        true
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.is_empty())
}
