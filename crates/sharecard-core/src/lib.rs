//! Core types and storage for shareable profile cards.
//!
//! This crate provides:
//! - The profile snapshot model and its boundary defaulting rules
//! - Compact interest list parsing and encoding
//! - Display helpers shared by every card layout (wallet truncation, level colours)
//! - Short token generation for public share links
//! - The share record store trait with SQLite and in-memory backends
//! - Prometheus metrics helpers
//! - Shared error types
//!
//! Nothing here knows about HTTP or page layout; the server crate builds on it.

pub mod clock;
mod error;
pub mod interests;
pub mod metrics;
pub mod snapshot;
pub mod store;
pub mod token;

// ═══════════════════════════════════════════════════════════════════════════
// Constants
// ═══════════════════════════════════════════════════════════════════════════

/// How long a share link stays resolvable: 30 days.
pub const SHARE_TTL: std::time::Duration = std::time::Duration::from_secs(60 * 60 * 24 * 30);

/// Wallet shown when a render request carries no wallet at all.
pub const PLACEHOLDER_WALLET: &str = "0x0000...0000";

pub use clock::{Clock, ManualClock, SystemClock};
pub use error::{Error, Result};
pub use interests::{Interest, encode_interests, parse_interests};
pub use snapshot::{
    ProfileSnapshot, RawSnapshot, SnapshotError, level_color, truncate_wallet,
};
pub use store::{MemoryStore, ShareRecord, ShareStore, SqliteStore, StoreError};
pub use token::{TOKEN_ALPHABET, TOKEN_LEN, generate_token, generate_token_with, is_valid_token};
