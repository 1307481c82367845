pub mod amount;
pub mod outcome;
pub mod pipeline;
pub mod request;
pub mod window;

pub use amount::MajorUnits;
pub use outcome::{FailureStage, TransferOutcome, TransferProgress};
pub use pipeline::TransferPipeline;
pub use request::{TransferRequest, ValidatedTransfer};
pub use window::{BlockhashWindow, BoundTransaction};
