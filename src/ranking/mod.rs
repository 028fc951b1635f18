pub mod neighbors;
pub mod ordering;
pub mod scoring;
pub mod stats;
pub mod table;

pub use neighbors::*;
pub use ordering::*;
pub use scoring::*;
pub use stats::*;
pub use table::*;
