//! Short opaque device token shown on the dashboard. It is a plain rolling hash, not an identifier
//! anyone should rely on for security.

use std::env;

use sysinfo::System;

pub const FINGERPRINT_LABEL: &str = "DEVICE-";

/// Rolling `h * 31 + c` hash over UTF-16 code units, wrapping at 32 bits.
pub fn rolling_hash(input: &str) -> i32 {
    input.encode_utf16().fold(0i32, |hash, unit| {
        hash.wrapping_shl(5)
            .wrapping_sub(hash)
            .wrapping_add(i32::from(unit))
    })
}

/// Renders the absolute hash value as 8 uppercase hex digits.
pub fn fingerprint_token(input: &str) -> String {
    format!("{:08X}", rolling_hash(input).unsigned_abs())
}

pub fn device_fingerprint(identity: &str) -> String {
    format!("{FINGERPRINT_LABEL}{}", fingerprint_token(identity))
}

/// Identifying string of the machine the agent runs on.
pub fn environment_identity() -> String {
    let name = System::name().unwrap_or_else(|| "unknown".into());
    let version = System::os_version().unwrap_or_else(|| "unknown".into());
    let host = System::host_name().unwrap_or_else(|| "unknown".into());
    format!("{name}/{version} ({}; {host})", env::consts::ARCH)
}
