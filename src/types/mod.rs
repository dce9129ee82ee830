pub mod analysis;
pub mod chart;
pub mod levels;
pub mod market;
pub mod open_interest;
pub mod recommendation;
pub mod risk;
pub mod signals;

pub use analysis::*;
pub use chart::*;
pub use levels::*;
pub use market::*;
pub use open_interest::*;
pub use recommendation::*;
pub use risk::*;
pub use signals::*;
