pub mod forecast;
pub mod location;
pub mod merge;
pub mod price;
