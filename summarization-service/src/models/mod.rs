//! Request-scoped payloads exchanged with the Looker extension.

pub mod query;
pub mod requests;

pub use query::{QueryBody, QueryDescriptor, QueryFields};
pub use requests::{
    DashboardSummaryRequest, QuerySuggestionsRequest, QuerySummaryRequest, SuggestionsResponse,
    SummaryResponse,
};
