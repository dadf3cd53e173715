mod memory_session;

pub use memory_session::InMemoryIdentitySession;
