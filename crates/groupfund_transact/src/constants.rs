pub const HASH_BYTES_LENGTH: usize = 32;
pub const ALGORAND_CHECKSUM_BYTE_LENGTH: usize = 4;
pub const ALGORAND_ADDRESS_LENGTH: usize = 58;
pub const ALGORAND_PUBLIC_KEY_BYTE_LENGTH: usize = 32;
pub const ALGORAND_SECRET_KEY_BYTE_LENGTH: usize = 32;
pub const ALGORAND_SIGNATURE_BYTE_LENGTH: usize = 64;
pub const ALGORAND_SIGNATURE_ENCODING_INCR: usize = 75;
pub type Byte32 = [u8; 32];
pub const MAX_TX_GROUP_SIZE: usize = 16;

// Domain separation prefixes
pub const TRANSACTION_DOMAIN_PREFIX: &[u8] = b"TX";
pub const GROUP_DOMAIN_PREFIX: &[u8] = b"TG";
pub const APP_ID_DOMAIN_PREFIX: &[u8] = b"appID";

// Secret phrase layout
pub const MNEMONIC_WORD_COUNT: usize = 25;
pub const MNEMONIC_BITS_PER_WORD: usize = 11;

// Application reference limits
pub const MAX_APP_ARGS: usize = 16;
pub const MAX_ARGS_SIZE: usize = 2048; // Maximum size in bytes of all args combined
