//! This `reviews` crate drives a paginated, incrementally loaded list of
//! user reviews and publishes render-ready snapshots to a display layer.

pub mod config;
pub mod controller;
pub mod error;
pub mod layout;
pub mod logging;
pub mod models;
pub mod plural;
pub mod provider;
pub mod state;

pub use config::ReviewsConfig;
pub use controller::{DEFAULT_PREFETCH_SCREENS, ReviewsController, should_request_next_page};
pub use error::{DecodeError, FetchError, TransportError};
pub use layout::{RowHeight, RowLayout};
pub use models::{
    ExpandCommand, ListItem, ReviewId, ReviewItem, ReviewRecord, ReviewsPage, SummaryItem,
};
pub use plural::{PluralForm, PluralForms};
pub use provider::{FixtureReviewsProvider, HttpReviewsProvider, ReviewsProvider};
pub use state::PaginationState;
