//! UseCase layer: connect, disconnect and command handling.

mod connect_participant;
mod disconnect_participant;
mod error;
mod handle_command;

pub use connect_participant::ConnectParticipantUseCase;
pub use disconnect_participant::{DisconnectParticipantUseCase, LeaveNotice};
pub use error::{CommandError, ConnectError, DisconnectError};
pub use handle_command::{CommandOutcome, HandleCommandUseCase};
