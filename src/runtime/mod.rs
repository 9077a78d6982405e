//! Session orchestration and the dispatch seam.

pub mod dispatch;
pub mod session;

pub use dispatch::{DispatchError, DispatchResult, Dispatcher};
pub use session::{run_session, Session};
