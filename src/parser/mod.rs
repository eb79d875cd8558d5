pub mod fit;
pub mod stream;
pub mod tcx;

pub use fit::*;
pub use stream::*;
pub use tcx::*;
