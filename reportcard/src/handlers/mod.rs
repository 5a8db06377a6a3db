//! REST handlers
//!
//! One generic [`ResourceEndpoint`] serves every record type. It composes a
//! [`Repository`](crate::repository::Repository) with two header encoders:
//! [`AlertHeaders`] for write notifications and [`pagination_headers`] for
//! list navigation.

mod alert;
mod endpoint;
mod error;
mod paging;
mod query;

pub use alert::AlertHeaders;
pub use endpoint::ResourceEndpoint;
pub use error::{ApiError, ApiErrorKind, ApiOperation};
pub use paging::{pagination_headers, X_TOTAL_COUNT, X_TOTAL_PAGES};
pub use query::ListQuery;
