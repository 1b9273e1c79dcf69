pub mod bookmarks;
pub mod profiles;
pub mod sessions;
pub mod users;
