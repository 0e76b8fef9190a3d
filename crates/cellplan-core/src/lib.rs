pub mod error;
pub mod models;
pub mod zone;

pub use error::{EstimateError, EstimateResult};
pub use models::{BuildClass, Station};
pub use zone::{Zone, CLUSTER_SIZE, HANDOVER_PENALTY};
