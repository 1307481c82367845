pub mod observe;
pub mod reconciler;
pub mod state;

pub use observe::{observe, observe_chain};
pub use reconciler::SessionReconciler;
pub use state::{truncate_address, ActiveSession, Session, SessionSource};
