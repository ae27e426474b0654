mod outcome;
mod primitives;

pub use outcome::*;
pub use primitives::*;
