//! Paged query requests and results.

use kindstore_storage::Order;

/// A request for one page of a scan.
///
/// The cursor is an opaque string taken from the previous
/// [`PageResult`]; `None` starts at the beginning.
#[derive(Debug, Clone)]
pub struct PageRequest {
    cursor: Option<String>,
    page_size: usize,
    order: Option<Order>,
}

impl PageRequest {
    /// Creates a request for the first page.
    #[must_use]
    pub fn of(page_size: usize) -> Self {
        Self {
            cursor: None,
            page_size,
            order: None,
        }
    }

    /// Continues from a cursor returned by a previous page.
    #[must_use]
    pub fn with_cursor(mut self, cursor: impl Into<String>) -> Self {
        self.cursor = Some(cursor.into());
        self
    }

    /// Orders the underlying scan. The field is a domain field name.
    #[must_use]
    pub fn with_order(mut self, order: Order) -> Self {
        self.order = Some(order);
        self
    }

    /// Returns the cursor, if continuing.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }

    /// Returns the requested page size.
    #[must_use]
    pub fn page_size(&self) -> usize {
        self.page_size
    }

    /// Returns the requested order.
    #[must_use]
    pub fn order(&self) -> Option<&Order> {
        self.order.as_ref()
    }
}

/// One page of results plus the cursor for the next page.
///
/// A `None` cursor means the scan is exhausted.
#[derive(Debug, Clone)]
pub struct PageResult<T> {
    items: Vec<T>,
    cursor: Option<String>,
}

impl<T> PageResult<T> {
    pub(crate) fn new(items: Vec<T>, cursor: Option<String>) -> Self {
        Self { items, cursor }
    }

    /// Returns the items on this page.
    #[must_use]
    pub fn items(&self) -> &[T] {
        &self.items
    }

    /// Consumes the page, returning its items.
    #[must_use]
    pub fn into_items(self) -> Vec<T> {
        self.items
    }

    /// Returns the cursor for the next page, if any.
    #[must_use]
    pub fn cursor(&self) -> Option<&str> {
        self.cursor.as_deref()
    }
}
