pub mod index;
pub use index::*;

pub mod ordering;
pub use ordering::*;

pub mod signals;
pub use signals::*;
