pub mod driver;
pub mod session;

pub use driver::BrowserDriver;
pub use session::{FallbackSession, HarvestOutcome};
