//! Server message and error string constants

/// Startup banner prefix (version is appended)
pub const MSG_BANNER: &str = "Courier relay server v";

/// Listening message prefix (address is appended)
pub const MSG_LISTENING: &str = "Listening on ";

/// Printed when a shutdown signal is received
pub const MSG_SHUTDOWN_RECEIVED: &str = "Shutdown signal received, stopping";

/// Accept failure prefix
pub const ERR_ACCEPT: &str = "Failed to accept connection: ";

/// Bind failure prefix
pub const ERR_BIND_FAILED: &str = "Failed to bind ";

/// Connection error prefix
pub const ERR_CONNECTION: &str = "Connection error from ";

/// SIGTERM handler installation failure
pub const ERR_SIGNAL_SIGTERM: &str = "Failed to install SIGTERM handler";

/// SIGINT handler installation failure
pub const ERR_SIGNAL_SIGINT: &str = "Failed to install SIGINT handler";

/// Ctrl+C handler installation failure
pub const ERR_SIGNAL_CTRLC: &str = "Failed to install Ctrl+C handler";
