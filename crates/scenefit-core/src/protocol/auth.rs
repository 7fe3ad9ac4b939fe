//! obs-websocket challenge/response authentication.
//!
//! When the server's `Hello` carries an `authentication` object, the client
//! must prove knowledge of the password without sending it:
//!
//! ```text
//! secret = base64( sha256( password + salt ) )
//! auth   = base64( sha256( secret + challenge ) )
//! ```
//!
//! The resulting string goes into the `authentication` field of `Identify`.

use base64::engine::general_purpose::STANDARD;
use base64::Engine as _;
use sha2::{Digest, Sha256};

/// Computes the `Identify` authentication string for the given password and
/// the server-provided salt and challenge.
pub fn authentication_string(password: &str, salt: &str, challenge: &str) -> String {
    let secret = STANDARD.encode(Sha256::digest(format!("{password}{salt}").as_bytes()));
    STANDARD.encode(Sha256::digest(format!("{secret}{challenge}").as_bytes()))
}

// ── Tests ─────────────────────────────────────────────────────────────────────
