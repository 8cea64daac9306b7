pub mod api;
pub mod error;
pub mod events;
pub mod query;
pub mod rating;
pub mod refs;
pub mod time;
pub mod value;

pub use api::*;
pub use error::{RatingsError, RatingsResult};
pub use events::*;
pub use query::*;
pub use rating::*;
pub use refs::*;
pub use time::*;
pub use value::*;
