use crate::store::{Store, StoreError};

const VERSION_KEY: &str = "_meta:version";

type MigrationFn = fn(&Store) -> Result<(), StoreError>;

fn migrations() -> Vec<(&'static str, MigrationFn)> {
    vec![("001_initial", m001_initial)]
}

/// 执行所有未应用的数据库迁移。
///
/// 迁移设计原则：
/// - **幂等性要求**：每个迁移函数必须是幂等的，即重复执行不会产生副作用。
///   迁移可能在 func() 成功但 set_version() 之前因进程崩溃而中断，
///   重启后会重新执行该迁移。
/// - **进度检查点**：版本号在每个迁移成功后立即持久化（set_version）。
/// - **仅向前**：set_version 拒绝降级，防止意外回滚。
pub fn run(store: &Store) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    let all = migrations();

    for (index, (name, func)) in all.iter().enumerate() {
        let version = (index + 1) as u32;
        if version > current {
            tracing::info!(version, name, "Running migration");
            func(store)?;
            set_version(store, version)?;
            tracing::info!(version, name, "Migration complete");
        } else {
            tracing::debug!(version, name, "Migration already applied, skipping");
        }
    }

    Ok(())
}

pub fn get_current_version(store: &Store) -> Result<u32, StoreError> {
    match store.meta.get(VERSION_KEY.as_bytes())? {
        Some(raw) => {
            if raw.len() == 4 {
                let bytes: [u8; 4] = raw.as_ref().try_into().unwrap_or([0; 4]);
                Ok(u32::from_be_bytes(bytes))
            } else {
                Ok(0)
            }
        }
        None => Ok(0),
    }
}

pub fn set_version(store: &Store, version: u32) -> Result<(), StoreError> {
    let current = get_current_version(store)?;
    if version < current {
        return Err(StoreError::Migration {
            version,
            message: format!("Refuse to downgrade from {} to {}", current, version),
        });
    }

    store
        .meta
        .insert(VERSION_KEY.as_bytes(), &version.to_be_bytes())?;
    Ok(())
}

fn m001_initial(_store: &Store) -> Result<(), StoreError> {
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_store() -> (tempfile::TempDir, Store) {
        let tmp = tempfile::tempdir().expect("tempdir");
        let store = Store::open(tmp.path().join("migrate.sled").to_str().unwrap()).unwrap();
        (tmp, store)
    }

    #[test]
    fn run_is_idempotent() {
        let (_tmp, store) = temp_store();
        run(&store).unwrap();
        let v = get_current_version(&store).unwrap();
        run(&store).unwrap();
        assert_eq!(get_current_version(&store).unwrap(), v);
    }

    #[test]
    fn downgrade_is_refused() {
        let (_tmp, store) = temp_store();
        set_version(&store, 3).unwrap();
        assert!(set_version(&store, 2).is_err());
    }
}
