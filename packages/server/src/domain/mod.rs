//! Domain layer: participants, mailboxes, commands and the interfaces
//! (registry, broadcaster) the use cases depend on.

mod broadcaster;
mod command;
mod error;
mod mailbox;
mod notice;
mod participant;
mod registry;

pub use broadcaster::MessageBroadcaster;
pub use command::{Command, CommandParseError, PRIVATE_MESSAGE_PREFIX, RENAME_PREFIX, WHO};
pub use error::{BroadcastError, MailboxError, RegistryError, ValueObjectError};
pub use mailbox::{Mailbox, MailboxReceiver};
pub use notice::{
    JOINED_TEXT, LEFT_TEXT, ONLINE_TEXT, SystemReply, format_broadcast, format_private_message,
    format_who_entry,
};
pub use participant::{Participant, ParticipantId, ParticipantName, Session, Timestamp};
pub use registry::{ParticipantRegistry, RegistryEntry};

#[cfg(test)]
pub use broadcaster::MockMessageBroadcaster;
#[cfg(test)]
pub use registry::MockParticipantRegistry;
