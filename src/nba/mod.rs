pub mod endpoints;
pub mod params;
pub mod store;

pub use endpoints::{ShotSource, StatsApi};
pub use params::{Season, Subject, SubjectField};
pub use store::SeasonStore;
