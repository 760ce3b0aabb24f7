mod audit;
mod certificate;
mod event;
mod message;

pub use audit::*;
pub use certificate::*;
pub use event::*;
pub use message::*;
