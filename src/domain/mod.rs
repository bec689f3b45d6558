pub mod clock;
pub mod dsm;
pub mod greeting;
pub mod model;
pub mod normalize;
pub mod parser;
pub mod rse;

pub use clock::Clock;
pub use model::prelude::*;
