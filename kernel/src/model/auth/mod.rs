pub mod event;

/// Opaque bearer token handed out at login and stored in the key-value
/// store until it expires or the user logs out.
pub struct AccessToken(pub String);
