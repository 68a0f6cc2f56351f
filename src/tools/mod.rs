pub mod inspect;
pub mod markup;
pub mod reload;
pub mod search;

pub use inspect::*;
pub use markup::*;
pub use reload::*;
pub use search::*;
