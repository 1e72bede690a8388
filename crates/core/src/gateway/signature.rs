//! HMAC signature computation and verification for payment callbacks.
//!
//! The processor signs the pair `order_id|payment_id` with the key secret
//! using HMAC-SHA256 and sends the hex digest alongside the completion
//! callback. Verification recomputes the digest and compares in constant
//! time.

use hmac::{Hmac, Mac};
use sha2::Sha256;

type HmacSha256 = Hmac<Sha256>;

/// Computes the hex-encoded HMAC-SHA256 signature over
/// `order_id + "|" + payment_id`.
pub fn compute_signature(secret: &str, order_id: &str, payment_id: &str) -> String {
    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    hex::encode(mac.finalize().into_bytes())
}

/// Verifies a supplied hex signature against the expected digest.
///
/// Pure function of `(secret, order_id, payment_id, supplied)`: the same
/// inputs always yield the same outcome, and changing any one character
/// of the order id, payment id, or signature flips acceptance to
/// rejection. The comparison runs in constant time via `Mac::verify_slice`.
pub fn verify_signature(secret: &str, order_id: &str, payment_id: &str, supplied: &str) -> bool {
    let supplied_bytes = match hex::decode(supplied.trim()) {
        Ok(bytes) => bytes,
        // Not hex at all: cannot match any digest.
        Err(_) => return false,
    };

    let mut mac =
        HmacSha256::new_from_slice(secret.as_bytes()).expect("HMAC accepts any key length");
    mac.update(order_id.as_bytes());
    mac.update(b"|");
    mac.update(payment_id.as_bytes());
    mac.verify_slice(&supplied_bytes).is_ok()
}
