// Service exports
pub mod ingest;
pub mod sessions;

pub use ingest::{parse_mentees, parse_mentors, IngestError, MenteeColumns, MentorColumns};
pub use sessions::{SessionStore, SharedSession, StoreError, StoreStats};
