pub mod fit;
pub mod tcx;
pub mod track;

pub use fit::*;
pub use tcx::*;
pub use track::*;
