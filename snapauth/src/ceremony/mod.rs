mod coordinator;
mod types;

pub use coordinator::{CeremonyCompletion, SnapAuth};
pub use types::{AuthenticatingUser, CeremonyState, SnapAuthResult, TokenInfo};
