//! USDA FoodData Central, reached through the tracking service's food
//! integration endpoint.

pub mod provider;
pub mod response;

pub use provider::UsdaProvider;
