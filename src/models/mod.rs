pub mod bias;
pub mod outcome;

pub use bias::*;
pub use outcome::*;
