//! Outbound adapters implementing domain ports.
//!
//! - **persistence**: PostgreSQL user directory via Diesel.
//! - **cache**: Redis session store via bb8-redis.
//! - **crypto**: Argon2id credential hasher.
//! - **memory**: in-process directory and session store for tests and
//!   single-node deployments.
//!
//! Adapters translate between domain types and infrastructure
//! representations. They contain no business logic.

pub mod cache;
pub mod crypto;
pub mod memory;
pub mod persistence;
