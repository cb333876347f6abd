pub mod types;

pub use types::PriceBar;
