pub mod codec;
pub mod config;
pub mod filter;
pub mod memory;
pub mod store;

pub mod api {
    pub use kudos_core::api::*;
}

pub mod events {
    pub use kudos_core::events::*;
}

pub mod query {
    pub use kudos_core::query::*;
}

pub mod value {
    pub use kudos_core::value::*;
}

pub use kudos_core::*;

pub use codec::RatingDocumentCodec;
pub use config::RatingsConfig;
pub use filter::{compile_filter, escape_filter_value, parse_filter, unescape_filter_value};
pub use memory::{IndexOp, MemoryIndex};
pub use store::{RatingsStore, SHARED_RATINGS_PARTITION};
