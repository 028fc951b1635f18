pub mod countdown;
pub mod lyrics;
pub mod playback;

pub use countdown::*;
pub use lyrics::*;
pub use playback::*;
