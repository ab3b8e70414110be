pub mod aggregate;
pub mod color;
pub mod court;
pub mod hexbin;
pub mod render;
pub mod zones;

pub use aggregate::{aggregate, aggregate_with, AggregateOptions, Aggregation, HexCell, MatchStatus, SizeCategory};
pub use render::ShotChart;
