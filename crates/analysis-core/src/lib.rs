pub mod error;
pub mod rng;
pub mod stats;
pub mod traits;
pub mod types;

pub use error::*;
pub use rng::*;
pub use traits::*;
pub use types::*;
