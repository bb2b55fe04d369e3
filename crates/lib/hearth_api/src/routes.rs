//! Route path constants.

/// GET / — static entry page
pub const GET_ROOT: &str = "/";

/// POST /api/chat — relay a chat message to the assistant
pub const POST_API_CHAT: &str = "/api/chat";

/// GET /api/preferences
pub const GET_API_PREFERENCES: &str = "/api/preferences";

/// POST /api/preferences — replace a single preference field
pub const POST_API_PREFERENCES: &str = "/api/preferences";

/// POST /api/login — capture a login attempt
pub const POST_API_LOGIN: &str = "/api/login";

/// GET /api/login-records
pub const GET_API_LOGIN_RECORDS: &str = "/api/login-records";

/// DELETE /api/login-records
pub const DELETE_API_LOGIN_RECORDS: &str = "/api/login-records";

/// GET /api/login-records/recent — newest records, default count
pub const GET_API_LOGIN_RECORDS_RECENT: &str = "/api/login-records/recent";

/// GET /api/login-records/recent/{count}
pub const GET_API_LOGIN_RECORDS_RECENT_COUNT: &str = "/api/login-records/recent/{count}";

/// GET /api/login-stats
pub const GET_API_LOGIN_STATS: &str = "/api/login-stats";
