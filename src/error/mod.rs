use thiserror::Error;

/// Failures of the two outbound lookups (geocoding and hospital search).
///
/// None of these are fatal: the session prints a diagnostic and carries on
/// with an empty result.
#[derive(Debug, Error)]
pub enum LookupError {
    /// The geocoder answered with zero candidates.
    #[error("no location data found")]
    NotFound,

    /// Connection failure, timeout, bad HTTP status or undecodable body.
    #[error("{0}")]
    Transport(#[from] reqwest::Error),

    /// The body decoded but a field could not be interpreted.
    #[error("malformed response: {0}")]
    MalformedResponse(String),

    /// Valid response without any hospital inside the radius.
    #[error("no hospitals found within {radius_meters}m")]
    EmptyResult { radius_meters: u64 },
}
