//! Persistence adapters.
//!
//! Only an in-memory store exists today. Durable stores plug in behind the
//! same user repository ports without touching the use cases.

mod in_memory_user_repository;

pub use in_memory_user_repository::InMemoryUserRepository;
