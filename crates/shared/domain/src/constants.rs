//! Names and limits shared by the composer, the pipeline and the HTTP surface.

// OpenAPI tags
pub const SYSTEM_TAG: &str = "System";
pub const TOKENS_TAG: &str = "Tokens";

// Capability names as they appear in CLI arguments and logs
pub const MINT: &str = "mint";
pub const PAUSE: &str = "pause";
pub const ADMIN: &str = "admin";
pub const BURN: &str = "burn";
pub const BLACKLIST: &str = "blacklist";
pub const CHANGE_METADATA: &str = "change_metadata";
pub const CORE: &str = "core";

// Selection limits
pub const TOKEN_NAME_MAX_CHARS: usize = 64;
pub const SYMBOL_MAX_CHARS: usize = 5;
pub const ICON_MAX_CHARS: usize = 2048;
pub const DECIMALS_MIN: u8 = 1;
pub const DECIMALS_MAX: u8 = 18;
pub const DEFAULT_ICON: &str = "https://smartpy.io/static/img/logo-only.svg";
pub const ICON_SCHEMES: [&str; 3] = ["https", "http", "ipfs"];

/// `tz1`/`tz2`/`tz3` plus 33 base58 characters.
pub const IMPLICIT_ADDRESS_LEN: usize = 36;
pub const IMPLICIT_ADDRESS_PREFIXES: [&str; 3] = ["tz1", "tz2", "tz3"];
/// Originated contracts are `KT1` plus 33 base58 characters.
pub const ORIGINATED_ADDRESS_PREFIX: &str = "KT1";
/// Bitcoin base58 alphabet (no `0`, `O`, `I`, `l`).
pub const BASE58_ALPHABET: &str = "123456789ABCDEFGHJKLMNPQRSTUVWXYZabcdefghijkmnopqrstuvwxyz";

/// Contract identifier length; also the scratch directory prefix.
pub const CONTRACT_ID_LEN: usize = 12;

// Toolchain defaults
pub const DEFAULT_METADATA_URL: &str = "ipfs://QmaiAUj1FFNGYTu8rLBjc3eeN9cSKwaF8EGMBNDmhzPNFd";
pub const DEFAULT_CONTRACT_ARTIFACT: &str = "step_003_cont_0_contract.tz";
pub const DEFAULT_STORAGE_ARTIFACT: &str = "step_003_cont_0_storage.tz";
pub const DEFAULT_DEPLOY_MARKER: &str = "New contract ";
pub const SCRATCH_DIR_NAME: &str = "tforge-scratch";

// Response
pub const ADDRESS_RESPONSE_KEY: &str = "contractAddress/errorMessage";
