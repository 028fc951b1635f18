pub mod editing;
pub mod export;
pub mod sanitize;

pub use editing::*;
pub use export::*;
pub use sanitize::*;
