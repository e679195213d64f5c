pub(crate) mod accidental_secret_leak;
pub(crate) mod cross_site_scripting;
pub(crate) mod dos_risky_access_across_trust_boundary;
pub(crate) mod missing_authentication;
pub(crate) mod missing_hardening;
pub(crate) mod missing_network_segmentation;
pub(crate) mod shared_runtime_code_injection;
pub(crate) mod sql_nosql_injection;
pub(crate) mod unencrypted_asset;
pub(crate) mod unencrypted_communication;
pub(crate) mod unguarded_direct_datastore_access;
pub(crate) mod untrusted_deserialization;
