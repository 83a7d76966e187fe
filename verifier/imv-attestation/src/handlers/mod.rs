// Licensed under the Apache-2.0 license

pub(crate) mod aik;
pub(crate) mod comp_evid;
pub(crate) mod dh_nonce;
pub(crate) mod evid_final;
pub(crate) mod file_meas;
pub(crate) mod file_meta;
pub(crate) mod meas_algo;
pub(crate) mod proto_caps;
pub(crate) mod tpm_version_info;
