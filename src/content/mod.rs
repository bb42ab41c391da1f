// ABOUTME: Notification content sources: static list, remote endpoint, or generated text

pub mod resolver;
pub mod transport;
pub mod vocabulary;

pub use resolver::ContentResolver;
pub use transport::{HttpTransport, NoTransport, Transport};
