pub mod count;
pub mod graphql;

pub use count::{CountOutcome, PageOracle, count_catalog};
pub use graphql::GraphqlPageOracle;
