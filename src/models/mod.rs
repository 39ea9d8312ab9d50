#[cfg(feature = "deep-learning")]
pub mod deep_learning;
pub mod gradient_boosting;
#[cfg(feature = "random-forest")]
pub mod random_forest;

pub mod factory;
pub mod model_trait;
