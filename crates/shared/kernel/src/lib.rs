//! Kernel utilities shared across slices.
//! Keep this crate lightweight: ids, config loading, the request token guard and,
//! behind the `server` feature, the Axum state and system routes.
//!
//! ## Contract ids
//! ```rust
//! # use tforge_kernel::safe_nanoid;
//! let id = safe_nanoid!();
//! assert_eq!(id.len(), 12);
//! ```
//!
//! ## Config loading
//! ```rust,ignore
//! use tforge_kernel::config::load_config;
//! let cfg: tforge_kernel::domain::config::ApiConfig = load_config(Some("tforge.toml"))?;
//! ```
pub mod config;
pub mod security;
#[cfg(feature = "server")]
pub mod server;

// Alphabet excludes visually ambiguous characters (I, O, l, 0, 1).
pub const SAFE_ALPHABET: &[char; 55] = &[
    '2', '3', '4', '5', '6', '7', '8', '9', 'A', 'B', 'C', 'D', 'E', 'F', 'G', 'H', 'J', 'K', 'L',
    'M', 'N', 'P', 'Q', 'R', 'S', 'T', 'U', 'V', 'W', 'X', 'Y', 'Z', 'a', 'b', 'c', 'd', 'e', 'f',
    'g', 'h', 'j', 'k', 'm', 'n', 'p', 'q', 'r', 's', 't', 'u', 'v', 'w', 'x', 'y', 'z',
];

pub use nanoid::nanoid;
pub use tforge_domain as domain;

/// Generates an unambiguous `NanoID`; the default length matches contract ids.
#[macro_export]
macro_rules! safe_nanoid {
    () => {
        $crate::nanoid!({ $crate::domain::constants::CONTRACT_ID_LEN }, $crate::SAFE_ALPHABET)
    };
    ($size:expr) => {
        $crate::nanoid!($size, $crate::SAFE_ALPHABET)
    };
}

/// Whether `id` could have come from [`safe_nanoid!`] with the contract id length.
#[must_use]
pub fn is_contract_id(id: &str) -> bool {
    id.chars().count() == domain::constants::CONTRACT_ID_LEN
        && id.chars().all(|c| SAFE_ALPHABET.contains(&c))
}
