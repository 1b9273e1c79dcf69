use chrono::Utc;

use practice_backend::auth::hash_password;
use practice_backend::catalog::types::Problem;
use practice_backend::store::operations::profiles::Profile;
use practice_backend::store::operations::users::User;
use practice_backend::store::Store;

pub fn seed_user(store: &Store, email: &str, username: &str, password: &str) -> User {
    let now = Utc::now();
    let user = User {
        id: uuid::Uuid::new_v4().to_string(),
        email: email.to_string(),
        username: username.to_string(),
        password_hash: hash_password(password).expect("hash password"),
        created_at: now,
        updated_at: now,
    };
    store.create_user(&user).expect("create seed user");
    user
}

pub fn seed_profile(store: &Store, user_id: &str, handle: &str, rating: Option<i32>) {
    let profile = Profile {
        user_id: user_id.to_string(),
        handle: Some(handle.to_string()),
        current_rating: rating,
        max_rating: rating,
        rank: rating.map(|_| "specialist".to_string()),
        avatar_url: None,
        updated_at: Utc::now(),
    };
    store.upsert_profile(&profile).expect("upsert seed profile");
}

pub fn problem(contest_id: i64, index: &str, rating: Option<i32>, tags: &[&str]) -> Problem {
    Problem {
        contest_id,
        index: index.to_string(),
        name: format!("Problem {contest_id}{index}"),
        rating,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        solved_count: None,
    }
}
