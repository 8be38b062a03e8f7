/// Reporting configuration constants.
///
/// Reports are fire-and-forget: they are handed to the reporter actor after a move has been
/// processed and never block the level.
pub const APPLICATION_NAME: &str = "pacgrid";

pub const APPLICATION_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Endpoint the end-of-level score payload is addressed to.
pub const SCORE_ENDPOINT: &str = "https://postman-echo.com/post";

/// Maximum number of report records kept until they are drained.
pub const REPORT_BUFFER_CAPACITY: usize = 256;
