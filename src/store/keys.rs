pub fn user_key(user_id: &str) -> String {
    user_id.to_string()
}

pub fn user_email_index_key(email: &str) -> String {
    format!("email:{}", email.to_lowercase())
}

pub fn session_key(token_hash: &str) -> String {
    token_hash.to_string()
}

pub fn session_user_index_key(user_id: &str, token_hash: &str) -> String {
    format!("user:{}:{}", user_id, token_hash)
}

pub fn session_user_index_prefix(user_id: &str) -> String {
    format!("user:{}:", user_id)
}

pub fn profile_key(user_id: &str) -> String {
    user_id.to_string()
}

/// Bookmark keys are `{user_id}:{problem_id}` where problem_id is the
/// composite `{contestId}-{index}` string. User ids are UUIDs and problem
/// indices are short upstream labels, so ':' never appears in either part.
pub fn bookmark_key(user_id: &str, problem_id: &str) -> String {
    format!("{}:{}", user_id, problem_id)
}

pub fn bookmark_prefix(user_id: &str) -> String {
    format!("{}:", user_id)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn email_index_is_normalized() {
        assert_eq!(user_email_index_key("A@Ex.com"), "email:a@ex.com");
    }

    #[test]
    fn bookmark_key_is_prefix_scannable() {
        let key = bookmark_key("u1", "1700-A");
        assert!(key.starts_with(&bookmark_prefix("u1")));
        assert!(!bookmark_key("u10", "1700-A").starts_with(&bookmark_prefix("u1")));
    }
}
