//! Support ticket form: sessions, routing, transitions

pub mod desk;
pub mod machine;
pub mod message;
pub mod record;
pub mod reply;
pub mod router;
pub mod session;
pub mod subjects;

pub use desk::{Outcome, Responder, TicketDesk};
pub use message::{Content, ContentKind, FileRef, IncomingMessage, Sender};
pub use record::{Description, TicketRecord};
pub use reply::{Keyboard, Reply};
pub use router::{DescriptionPolicy, Route, Router};
pub use session::{Session, SessionKey, SessionState, SessionStore};
pub use subjects::PREDEFINED_SUBJECTS;
