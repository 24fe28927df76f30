use crate::cache::{ObjectCache, register::get_object_cache_plugin};
use crate::config::AppConfig;
use crate::errors::{Result, SchoolError};
use crate::models::accounts::entities::AccountRole;
use crate::models::accounts::requests::NewAccount;
use crate::storage::Storage;
use crate::utils::password::hash_password;
use crate::utils::random_code::generate_random_password;
use std::sync::Arc;
use tracing::{debug, info, warn};

const DEFAULT_ADMIN_USERNAME: &str = "admin";

pub struct StartupContext {
    pub storage: Arc<dyn Storage>,
    pub cache: Arc<dyn ObjectCache>,
}

async fn build_cache(name: &str) -> Option<Arc<dyn ObjectCache>> {
    let constructor = get_object_cache_plugin(name)?;
    match constructor().await {
        Ok(cache) => {
            warn!("Successfully created {} cache backend", name);
            Some(Arc::from(cache))
        }
        Err(e) => {
            warn!("Failed to create {} cache: {}", name, e);
            None
        }
    }
}

/// 创建缓存实例，配置的后端不可用时回退到 moka
pub async fn create_cache() -> Result<Arc<dyn ObjectCache>> {
    let cache_type = &AppConfig::get().cache.cache_type;

    warn!("Attempting to create {} cache backend", cache_type);

    if get_object_cache_plugin(cache_type).is_none() {
        warn!("Cache backend '{}' not found in registry", cache_type);
    }

    if let Some(cache) = build_cache(cache_type).await {
        return Ok(cache);
    }

    if cache_type != "moka" {
        warn!("Falling back to memory cache");
        if let Some(cache) = build_cache("moka").await {
            return Ok(cache);
        }
    }

    Err(SchoolError::cache_plugin_not_found(format!(
        "No cache backend available (tried: {cache_type})"
    )))
}

/// 初始化超级用户
///
/// 数据库中没有超级用户时创建一个，角色为教师。
/// 用户名取 `ADMIN_USERNAME`（默认 admin），密码取 `ADMIN_PASSWORD`，未设置则随机生成并打印一次。
pub async fn seed_superuser(storage: &Arc<dyn Storage>) {
    match storage.count_superusers().await {
        Ok(count) if count > 0 => {
            debug!(
                "Database already has {} superuser(s), skipping superuser seed",
                count
            );
            return;
        }
        Ok(_) => {
            info!("No superuser found in database, creating one...");
        }
        Err(e) => {
            warn!("Failed to count superusers: {}, skipping superuser seed", e);
            return;
        }
    }

    let username =
        std::env::var("ADMIN_USERNAME").unwrap_or_else(|_| DEFAULT_ADMIN_USERNAME.to_string());

    match storage.get_account_by_username(&username).await {
        Ok(Some(_)) => {
            warn!(
                "Username '{}' is already taken by a regular account, skipping superuser seed",
                username
            );
            return;
        }
        Ok(None) => {}
        Err(e) => {
            warn!("Failed to look up '{}': {}, skipping superuser seed", username, e);
            return;
        }
    }

    let password = std::env::var("ADMIN_PASSWORD").unwrap_or_else(|_| {
        let pwd = generate_random_password(16);
        warn!("==========================================================");
        warn!("  ADMIN PASSWORD NOT SET - USING GENERATED PASSWORD");
        warn!("  Generated password for '{}': {}", username, pwd);
        warn!("  Please save this password or set ADMIN_PASSWORD env var");
        warn!("==========================================================");
        pwd
    });

    let password_hash = match hash_password(&password) {
        Ok(hash) => hash,
        Err(e) => {
            warn!("Failed to hash superuser password: {}, skipping superuser seed", e);
            return;
        }
    };

    let superuser = NewAccount {
        username,
        password_hash,
        first_name: None,
        last_name: None,
        profile_pic: None,
        role: AccountRole::Teacher,
        is_staff: true,
        is_superuser: true,
    };

    match storage.create_account(superuser).await {
        Ok(account) => {
            info!(
                "Superuser created successfully (ID: {}, username: {})",
                account.id, account.username
            );
        }
        Err(e) => {
            warn!("Failed to create superuser: {}", e);
        }
    }
}

/// 准备服务器启动的上下文
/// 包括存储（含迁移）、超级用户和缓存
pub async fn prepare_server_startup() -> Result<StartupContext> {
    if rustls::crypto::ring::default_provider()
        .install_default()
        .is_err()
    {
        debug!("rustls crypto provider already installed");
    }

    if cfg!(debug_assertions) {
        crate::cache::register::debug_object_cache_registry();
        debug!("Debug mode: Cache registry is enabled");
    }

    let storage = crate::storage::create_storage().await?;
    warn!("Storage backend initialized and migrations completed");

    seed_superuser(&storage).await;

    let cache = create_cache().await?;
    warn!("Cache backend initialized");

    Ok(StartupContext { storage, cache })
}
