// Library root
// -----------
// The binary (`main.rs`) is a thin shell around these modules so the
// request building and argument validation can be tested without a
// process boundary.
//
// Module responsibilities:
// - `api`: blocking HTTP client for the NAC REST endpoints.
// - `cli`: argument model, pre-dispatch validation and the dispatch table.
// - `error`: the error taxonomy shared by both layers.
// - `mac`: MAC address format check.
pub mod api;
pub mod cli;
pub mod error;
pub mod mac;

pub use api::{ClientConfig, NacClient};
pub use error::{Error, Result};
