//! Train-set preprocessing steps applied after the first split.

pub mod tokenize;
pub mod quantiles;
pub mod subset;
pub mod ids;

pub use tokenize::{token_lengths, TokenCounter};
pub use quantiles::{filter_quantiles, quantile};
pub use subset::use_train_subset;
pub use ids::add_id_column_to_datasets;
