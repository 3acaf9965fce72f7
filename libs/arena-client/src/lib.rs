//! Client side of the practice platform: one [`session::Session`] per open
//! editor drives run/submit requests against the execution gateway and keeps
//! the submission lifecycle consistent while results arrive asynchronously.

pub mod config;
pub mod coordinator;
pub mod feedback;
pub mod gateway;
pub mod presenter;
pub mod session;
pub mod sources;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;

pub use config::{ClientConfig, ConcurrencyPolicy, FeedbackMode};
pub use coordinator::{Applied, EffectCoordinator, IntentRejected, Ticket};
pub use feedback::{ConnectionStatus, FeedbackChannel, Subscription};
pub use gateway::{ExecutionGateway, GatewayError, HttpGateway};
pub use presenter::{present, View};
pub use session::{Session, SessionEvent};
pub use store::{Phase, SubmissionStore, TransitionError};
