//! TLV type numbers and assigned values used by certificate records.

pub const DATA: u64 = 6;
pub const NAME: u64 = 7;
pub const GENERIC_NAME_COMPONENT: u64 = 8;
pub const META_INFO: u64 = 20;
pub const CONTENT: u64 = 21;
pub const SIGNATURE_INFO: u64 = 22;
pub const SIGNATURE_VALUE: u64 = 23;
pub const CONTENT_TYPE: u64 = 24;
pub const FRESHNESS_PERIOD: u64 = 25;
pub const SIGNATURE_TYPE: u64 = 27;
pub const KEY_LOCATOR: u64 = 28;

/// ContentType value marking a public key or certificate.
pub const CONTENT_TYPE_KEY: u64 = 2;
