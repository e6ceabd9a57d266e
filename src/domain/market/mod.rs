pub mod fundamentals;
pub mod price_series;
pub mod universe;

pub use fundamentals::Fundamentals;
pub use price_series::{AlignedSeries, PriceBar, PriceSeries, align};
pub use universe::Market;
