/// Error code registry
///
/// Error codes are organized by category:
/// - 1000-1999: Configuration errors
/// - 2000-2999: Source (input file) errors
/// - 3000-3999: Row validation errors
/// - 4000-4999: Sink (report output) errors
pub struct ErrorCode;

impl ErrorCode {
    // Configuration errors (1000-1999)
    pub const CONFIG_NOT_FOUND: u16 = 1001;
    pub const CONFIG_PARSE_ERROR: u16 = 1002;
    pub const CONFIG_VALIDATION_FAILED: u16 = 1003;

    // Source errors (2000-2999)
    pub const SOURCE_GENERIC: u16 = 2000;
    pub const SOURCE_NOT_FOUND: u16 = 2001;
    pub const SOURCE_MISSING_COLUMNS: u16 = 2002;
    pub const SOURCE_UNREADABLE_RECORD: u16 = 2003;

    // Row errors (3000-3999)
    pub const ROW_INVALID_DATE: u16 = 3001;
    pub const ROW_INVALID_HOURS: u16 = 3002;
    pub const ROW_NEGATIVE_HOURS: u16 = 3003;

    // Sink errors (4000-4999)
    pub const SINK_CREATE_DIR: u16 = 4001;
    pub const SINK_WRITE_FAILED: u16 = 4002;
}

/// Get a human-readable description for an error code
pub fn describe_error_code(code: u16) -> &'static str {
    match code {
        1001 => "Configuration file not found",
        1002 => "Failed to parse configuration",
        1003 => "Configuration validation failed",

        2000 => "Generic source error",
        2001 => "Input file not found",
        2002 => "Input file is missing required columns",
        2003 => "Input record could not be read",

        3001 => "Date field could not be parsed",
        3002 => "Hours field is not a number",
        3003 => "Hours field is negative",

        4001 => "Output directory could not be created",
        4002 => "Report file could not be written",

        _ => "Unknown error code",
    }
}
