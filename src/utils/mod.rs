pub mod clock;
pub mod dir;
pub mod fingerprint;
pub mod logging;
pub mod productivity;
pub mod runtime;
pub mod time;
