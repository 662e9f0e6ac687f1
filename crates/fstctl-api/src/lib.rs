//! Async client for the hostapd / wpa_supplicant control interface.
//!
//! The daemon exposes a Unix datagram socket per interface (or a global
//! one). Clients bind their own socket, send ASCII commands and read one
//! reply datagram per command. A client that sends `ATTACH` also receives
//! unsolicited event lines such as `<3>CTRL-EVENT-TERMINATING`.
//!
//! This crate only moves bytes: [`CtrlSocket`] opens a handle, performs
//! bounded request/response exchanges and reads events. Interpretation of
//! replies and events lives in `fstctl-core`.

pub mod ctrl;
pub mod error;

pub use ctrl::{CtrlSocket, DEFAULT_REQUEST_TIMEOUT, MAX_COMMAND_LEN, REPLY_BUFFER_SIZE};
pub use error::Error;
