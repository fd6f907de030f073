//! Domain models for the reorder planning engine

mod classification;
mod history;
mod manual;
mod material_request;
mod policy;
mod reorder_level;
mod stock;

pub use classification::*;
pub use history::*;
pub use manual::*;
pub use material_request::*;
pub use policy::*;
pub use reorder_level::*;
pub use stock::*;
