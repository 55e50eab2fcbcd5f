//! Panel UI building blocks
//!
//! Pages, variable addresses, the key table and the small state holders the
//! screen driver is assembled from.

pub mod keys;
pub mod page;
pub mod retry;
pub mod timer;
pub mod units;
pub mod vp;
pub mod wait;

pub use keys::Key;
pub use page::{Page, PageRegister};
pub use retry::{FailureClass, RecoveryAction, RetryHandler};
pub use timer::UpdateTimer;
pub use wait::WaitState;
