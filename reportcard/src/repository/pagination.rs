//! Page requests, sort orders and result pages
//!
//! Pages are 0-indexed. A [`PageRequest`] says which slice of the ordered
//! collection the caller wants; a [`Page`] returns that slice together with
//! the total element count so callers can derive the page count.
//!
//! # Example
//!
//! ```rust
//! use reportcard::repository::{OrderDirection, Page, PageRequest, SortOrder};
//!
//! let request = PageRequest::new(1, 20).with_sort(SortOrder::desc("name"));
//! assert_eq!(request.offset(), 20);
//!
//! let page = Page::new(vec!["a", "b"], &request, 22);
//! assert_eq!(page.total_pages(), 2);
//! assert!(!page.has_next());
//! assert_eq!(request.sort[0].direction, OrderDirection::Descending);
//! ```

use std::fmt;

/// Direction for ordering results
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum OrderDirection {
    /// Sort in ascending order (A-Z, 0-9)
    #[default]
    Ascending,
    /// Sort in descending order (Z-A, 9-0)
    Descending,
}

impl OrderDirection {
    /// SQL keyword for this direction
    #[must_use]
    pub const fn as_sql(&self) -> &'static str {
        match self {
            Self::Ascending => "ASC",
            Self::Descending => "DESC",
        }
    }

    /// Parse `asc` / `desc` (case-insensitive)
    pub fn parse(value: &str) -> Option<Self> {
        if value.eq_ignore_ascii_case("asc") {
            Some(Self::Ascending)
        } else if value.eq_ignore_ascii_case("desc") {
            Some(Self::Descending)
        } else {
            None
        }
    }
}

impl fmt::Display for OrderDirection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Ascending => write!(f, "asc"),
            Self::Descending => write!(f, "desc"),
        }
    }
}

/// One sort key: a record field and a direction
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortOrder {
    /// Serialized field name (camelCase, as it appears in JSON)
    pub property: String,
    /// Direction to sort in
    pub direction: OrderDirection,
}

impl SortOrder {
    /// Ascending order on `property`
    pub fn asc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: OrderDirection::Ascending,
        }
    }

    /// Descending order on `property`
    pub fn desc(property: impl Into<String>) -> Self {
        Self {
            property: property.into(),
            direction: OrderDirection::Descending,
        }
    }

    /// Parse a `property[,asc|desc]` sort expression.
    ///
    /// Returns `None` for an empty property name. An unrecognised direction
    /// falls back to ascending.
    pub fn parse(expr: &str) -> Option<Self> {
        let mut parts = expr.splitn(2, ',');
        let property = parts.next().map(str::trim).unwrap_or_default();
        if property.is_empty() {
            return None;
        }
        let direction = parts
            .next()
            .and_then(|d| OrderDirection::parse(d.trim()))
            .unwrap_or_default();
        Some(Self {
            property: property.to_string(),
            direction,
        })
    }
}

impl fmt::Display for SortOrder {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{},{}", self.property, self.direction)
    }
}

/// Which slice of a collection to read
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PageRequest {
    /// 0-indexed page number
    pub page: u64,
    /// Maximum number of records per page (never 0)
    pub size: u64,
    /// Sort keys, most significant first. Empty means id order.
    pub sort: Vec<SortOrder>,
}

impl PageRequest {
    /// Create a request for `page` with `size` records per page.
    ///
    /// A size of 0 is raised to 1.
    #[must_use]
    pub fn new(page: u64, size: u64) -> Self {
        Self {
            page,
            size: size.max(1),
            sort: Vec::new(),
        }
    }

    /// Append a sort key
    #[must_use]
    pub fn with_sort(mut self, order: SortOrder) -> Self {
        self.sort.push(order);
        self
    }

    /// Number of records to skip
    #[must_use]
    pub fn offset(&self) -> u64 {
        self.page.saturating_mul(self.size)
    }
}

impl Default for PageRequest {
    fn default() -> Self {
        Self::new(0, 20)
    }
}

/// One page of results plus what is needed to navigate the rest
#[derive(Debug, Clone, PartialEq)]
pub struct Page<T> {
    /// Records on this page, in order
    pub content: Vec<T>,
    /// 0-indexed number of this page
    pub number: u64,
    /// Requested page size
    pub size: u64,
    /// Number of records in the whole collection
    pub total_elements: u64,
}

impl<T> Page<T> {
    /// Build a page answering `request`
    pub fn new(content: Vec<T>, request: &PageRequest, total_elements: u64) -> Self {
        Self {
            content,
            number: request.page,
            size: request.size,
            total_elements,
        }
    }

    /// Total number of pages, rounding up; 0 for an empty collection
    #[must_use]
    pub fn total_pages(&self) -> u64 {
        let size = self.size.max(1);
        self.total_elements.div_ceil(size)
    }

    /// Whether a page follows this one
    #[must_use]
    pub fn has_next(&self) -> bool {
        self.number.saturating_add(1) < self.total_pages()
    }

    /// Whether a page precedes this one
    #[must_use]
    pub fn has_previous(&self) -> bool {
        self.number > 0
    }
}
