/// Application-wide constants to avoid magic values throughout the codebase.
///
/// This module centralizes the literal values shared by the probe engine,
/// the configuration layer and the output renderers.
/// Output format constants
pub mod output_formats {
    /// Text output format - summary plus grouped issue list
    pub const TEXT: &str = "text";
    /// JSON output format - structured output for automation
    pub const JSON: &str = "json";
    /// Minimal output format - one `<code> <url>` line per issue
    pub const MINIMAL: &str = "minimal";
    /// CSV output format - `URL,Status Code,Status` table in input order
    pub const CSV: &str = "csv";

    /// Default output format
    pub const DEFAULT: &str = TEXT;

    /// All valid output formats
    pub const ALL: [&str; 4] = [TEXT, JSON, MINIMAL, CSV];
}

/// HTTP status code constants
pub mod http_status {
    /// HTTP 200 OK - the only status classified as working
    pub const OK: u16 = 200;
    /// HTTP 403 Forbidden - some servers answer HEAD with it
    pub const FORBIDDEN: u16 = 403;
    /// HTTP 405 Method Not Allowed - server rejects HEAD
    pub const METHOD_NOT_ALLOWED: u16 = 405;
    /// HTTP 429 Too Many Requests
    pub const TOO_MANY_REQUESTS: u16 = 429;
    /// HTTP 500 Internal Server Error
    pub const INTERNAL_SERVER_ERROR: u16 = 500;
    /// HTTP 502 Bad Gateway
    pub const BAD_GATEWAY: u16 = 502;
    /// HTTP 503 Service Unavailable
    pub const SERVICE_UNAVAILABLE: u16 = 503;
    /// HTTP 504 Gateway Timeout
    pub const GATEWAY_TIMEOUT: u16 = 504;

    /// Responses that are retried with backoff
    pub const RETRYABLE: [u16; 5] = [
        TOO_MANY_REQUESTS,
        INTERNAL_SERVER_ERROR,
        BAD_GATEWAY,
        SERVICE_UNAVAILABLE,
        GATEWAY_TIMEOUT,
    ];

    /// HEAD responses that trigger a single GET fallback
    pub const HEAD_REJECTED: [u16; 2] = [FORBIDDEN, METHOD_NOT_ALLOWED];

    /// Sentinel status code for "no HTTP response obtained"
    pub const NO_RESPONSE: &str = "000";
}

/// Timeout and duration constants
pub mod timeouts {
    /// Default connect timeout in milliseconds
    pub const DEFAULT_CONNECT_TIMEOUT_MS: u64 = 5_000;
    /// Default read timeout in milliseconds
    pub const DEFAULT_READ_TIMEOUT_MS: u64 = 10_000;
    /// Largest accepted connect/read timeout in milliseconds (1 hour)
    pub const MAX_TIMEOUT_MS: u64 = 3_600_000;
    /// Default backoff factor in milliseconds
    pub const DEFAULT_BACKOFF_FACTOR_MS: u64 = 300;
    /// Upper bound for a single backoff sleep in milliseconds
    pub const MAX_BACKOFF_MS: u64 = 30_000;
    /// Default timeout for fetching a remote URL list, in seconds
    pub const DEFAULT_FETCH_TIMEOUT_SECONDS: u64 = 30;
    /// How long idle pooled connections are kept, in seconds
    pub const POOL_IDLE_SECONDS: u64 = 30;
    /// TCP keepalive interval, in seconds
    pub const TCP_KEEPALIVE_SECONDS: u64 = 60;
}

/// Default configuration values
pub mod defaults {
    /// Default number of retries after the first attempt
    pub const RETRIES: u32 = 2;
    /// Maximum number of redirects followed when redirects are enabled
    pub const MAX_REDIRECTS: usize = 10;
    /// Lower bound for the CPU-derived default worker count
    pub const MIN_DEFAULT_WORKERS: usize = 8;
    /// Upper bound for the CPU-derived default worker count
    pub const MAX_DEFAULT_WORKERS: usize = 32;
    /// Workers per CPU core for the default worker count
    pub const WORKERS_PER_CORE: usize = 4;
    /// Idle connections kept per host never drop below this
    pub const MIN_POOL_IDLE_PER_HOST: usize = 200;
    /// Default user agent; many servers reject non-browser agents
    pub const USER_AGENT: &str = concat!(
        "Mozilla/5.0 (compatible; ",
        env!("CARGO_PKG_NAME"),
        "/",
        env!("CARGO_PKG_VERSION"),
        ")"
    );
}

/// Validation limits for configuration values
pub mod limits {
    /// Maximum worker count
    pub const MAX_WORKERS: usize = 1000;
    /// Maximum retries per request
    pub const MAX_RETRIES: u32 = 20;
    /// Maximum percentage value
    pub const MAX_PERCENTAGE: f64 = 100.0;
    /// Minimum percentage value
    pub const MIN_PERCENTAGE: f64 = 0.0;
}

/// Constants for reading URL lists
pub mod source {
    /// Argument meaning "read the list from stdin"
    pub const STDIN: &str = "-";
    /// Bytes of a fetched list inspected for HTML markup
    pub const HTML_SNIFF_BYTES: usize = 2048;
    /// Config file looked up in the working directory and its parents
    pub const CONFIG_FILE_NAME: &str = ".urlpulse.toml";
    /// Number of parent directories searched for the config file
    pub const CONFIG_PARENT_LEVELS: usize = 3;
}

/// Display labels for probe outcomes
pub mod labels {
    pub const WORKING: &str = "Working";
    pub const NOT_WORKING: &str = "Not Working";
    pub const COULD_NOT_CONNECT: &str = "Could Not Connect";
    pub const EMPTY_URL: &str = "Empty URL";

    /// Header row of the CSV export
    pub const CSV_HEADER: [&str; 3] = ["URL", "Status Code", "Status"];
}
