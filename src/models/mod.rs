pub mod calendar;
pub mod feature;
pub mod forecast;
pub mod price;
pub mod weather;

pub use calendar::*;
pub use feature::*;
pub use forecast::*;
pub use price::*;
pub use weather::*;
