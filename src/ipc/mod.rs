/// Process boundary for the UI collaborator
///
/// The UI talks to the tracker core over newline-delimited JSON on
/// stdin/stdout: one request envelope per line in, one response envelope
/// per line out.

pub mod protocol;
pub mod server;

pub use protocol::{Request, Response};
pub use server::CommandServer;
