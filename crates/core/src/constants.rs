//! Platform-wide constants.

/// The only currency this deployment accepts.
pub const BASE_CURRENCY: &str = "INR";

/// Conversion factor between major units (rupees) and the gateway's
/// minor units (paise). Gateway orders are created in minor units while
/// donation records store major units.
pub const MINOR_UNITS_PER_MAJOR: i64 = 100;

/// Prefix for donor-facing receipt numbers when no override is configured.
pub const DEFAULT_RECEIPT_PREFIX: &str = "RCP";
