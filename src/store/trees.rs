pub const USERS: &str = "users";
pub const SESSIONS: &str = "sessions";
pub const PROFILES: &str = "profiles";
pub const BOOKMARKS: &str = "bookmarks";
pub const META: &str = "meta";
