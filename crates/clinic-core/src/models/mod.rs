//! Domain models for the clinic records system.

mod clinic;
mod clinical;
mod medicine;
mod patient;
mod record;

pub use clinic::*;
pub use clinical::*;
pub use medicine::*;
pub use patient::*;
pub use record::*;
