//! Hard limits of the locator encodings.
//!
//! These are properties of the wire format, not tuning knobs. A locator
//! whose binary or string form would exceed them cannot be built, and
//! encoders fail instead of truncating.

/// Wire format version written as the first byte of every binary locator.
pub const LOCATOR_VERSION: u8 = 1;

/// Upper bound of the binary encoding, in bytes.
pub const MAX_MARSHAL_SIZE: usize = 4096;

/// Upper bound of the canonical string encoding, in bytes.
pub const MAX_STRING_SIZE: usize = 4096;

/// Maximum number of endpoints a single locator may advertise.
pub const MAX_ENDPOINTS: usize = 8;
