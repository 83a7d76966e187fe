// Licensed under the Apache-2.0 license

pub mod aik;
pub mod attribute;
pub mod dh_nonce;
pub mod evidence;
pub mod file_meas;
pub mod file_meta;
pub mod pa_tnc_error;

pub use aik::*;
pub use attribute::*;
pub use dh_nonce::*;
pub use evidence::*;
pub use file_meas::*;
pub use file_meta::*;
pub use pa_tnc_error::*;
