use std::sync::Arc;

use axum::Router;
use tempfile::TempDir;
use tokio::sync::broadcast;

use practice_backend::config::Config;
use practice_backend::routes::build_router;
use practice_backend::state::AppState;
use practice_backend::store::Store;

pub struct TestApp {
    pub app: Router,
    pub state: AppState,
    pub config: Config,
    _temp_dir: TempDir,
}

async fn spawn_with_limits(api_limit: u64) -> TestApp {
    let temp_dir = tempfile::tempdir().expect("tempdir");
    let sled_path = temp_dir.path().join("practice-test.sled");

    // 直接构造 Config，避免使用 set_var 造成多线程测试环境变量竞态
    let test_secret = format!("integration-test-jwt-secret-{}", uuid::Uuid::new_v4());

    let config = Config {
        host: std::net::IpAddr::V4(std::net::Ipv4Addr::new(127, 0, 0, 1)),
        port: 3000,
        log_level: "info".to_string(),
        enable_file_logs: false,
        log_dir: "./logs".to_string(),
        sled_path: sled_path.to_string_lossy().to_string(),
        jwt_secret: test_secret,
        jwt_expires_in_hours: 24,
        cors_origin: "http://localhost:5173".to_string(),
        trust_proxy: false,
        rate_limit: practice_backend::config::RateLimitConfig {
            window_secs: 60,
            max_requests: api_limit,
        },
        worker: practice_backend::config::WorkerConfig { is_leader: false },
        codeforces: practice_backend::config::CodeforcesConfig {
            api_url: "http://127.0.0.1:1/api".to_string(),
            mock: true,
            timeout_secs: 2,
        },
    };

    let store = Arc::new(Store::open(&config.sled_path).expect("open store"));
    store.run_migrations().expect("run migrations");

    let (shutdown_tx, _) = broadcast::channel::<()>(8);

    let state = AppState::new(store, &config, shutdown_tx);

    let app = build_router(state.clone());

    TestApp {
        app,
        state,
        config,
        _temp_dir: temp_dir,
    }
}

pub async fn spawn_test_server() -> TestApp {
    spawn_with_limits(200).await
}

pub async fn spawn_test_server_with_limits(api_limit: u64) -> TestApp {
    spawn_with_limits(api_limit).await
}
