//! 配置
//!
//! - `Config`：持久化在磁盘上的用户配置（编辑器、默认语言、登录凭据）
//! - `FileStore`：基于 TOML 文件的存储，强制 0600 权限
//! - `Settings`：从环境变量读取的运行时参数

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, AppResult};

pub const DEFAULT_BASE_URL: &str = "https://leetcode.com";

const ENV_CONFIG_PATH: &str = "VLEET_CONFIG_PATH";
const ENV_BASE_URL: &str = "VLEET_BASE_URL";
const ENV_USER_AGENT: &str = "VLEET_USER_AGENT";

/// 用户配置文件
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// 编辑器命令，例如 "vim" 或 "code --wait"
    #[serde(default)]
    pub editor: String,
    /// 默认语言标识
    #[serde(default)]
    pub default_lang: String,
    #[serde(default)]
    pub leetcode: LeetCodeAuth,
}

/// 登录凭据（敏感信息）
///
/// 不要打印、记录日志或写入错误信息。
#[derive(Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct LeetCodeAuth {
    /// LEETCODE_SESSION cookie 的值
    #[serde(default)]
    pub session: String,
    /// csrftoken cookie 的值
    #[serde(default)]
    pub csrftoken: String,
}

impl LeetCodeAuth {
    pub fn has_session(&self) -> bool {
        !self.session.trim().is_empty()
    }

    pub fn has_csrftoken(&self) -> bool {
        !self.csrftoken.trim().is_empty()
    }
}

impl fmt::Debug for LeetCodeAuth {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mark = |set: bool| if set { "(set)" } else { "(not set)" };
        f.debug_struct("LeetCodeAuth")
            .field("session", &mark(self.has_session()))
            .field("csrftoken", &mark(self.has_csrftoken()))
            .finish()
    }
}

/// 配置存储能力
#[async_trait]
pub trait ConfigStore: Send + Sync {
    /// 读取配置；文件不存在时返回 `ConfigNotFound`
    async fn load(&self) -> AppResult<Config>;
    async fn save(&self, config: &Config) -> AppResult<()>;
}

/// 基于文件的配置存储
#[derive(Clone, Debug)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub async fn exists(&self) -> AppResult<bool> {
        fs::try_exists(&self.path)
            .await
            .map_err(|e| AppError::filesystem(format!("stat config {}", self.path.display()), e))
    }

    fn display(&self) -> String {
        self.path.display().to_string()
    }
}

#[async_trait]
impl ConfigStore for FileStore {
    async fn load(&self) -> AppResult<Config> {
        if self.path.as_os_str().is_empty() {
            return Err(AppError::validation("config path is empty"));
        }

        let meta = match fs::metadata(&self.path).await {
            Ok(meta) => meta,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                return Err(AppError::ConfigNotFound {
                    path: self.display(),
                })
            }
            Err(e) => return Err(AppError::filesystem(format!("stat config {}", self.display()), e)),
        };
        check_permissions(&self.path, &meta)?;

        let content = fs::read_to_string(&self.path)
            .await
            .map_err(|e| AppError::filesystem(format!("read config {}", self.display()), e))?;

        let config: Config = toml::from_str(&content)
            .map_err(|e| AppError::ConfigFormat(format!("parse config {}: {}", self.display(), e)))?;

        debug!("已加载配置: {}", self.display());
        Ok(config)
    }

    async fn save(&self, config: &Config) -> AppResult<()> {
        if self.path.as_os_str().is_empty() {
            return Err(AppError::validation("config path is empty"));
        }

        if let Some(dir) = self.path.parent().filter(|d| !d.as_os_str().is_empty()) {
            create_private_dir(dir).await?;
        }

        let mut content = toml::to_string(config)
            .map_err(|e| AppError::ConfigFormat(format!("serialize config: {}", e)))?;
        if !content.ends_with('\n') {
            content.push('\n');
        }

        // 新文件直接以 0600 创建；已存在的文件先收紧权限再写入凭据
        let mut file = open_private(&self.path)
            .await
            .map_err(|e| AppError::filesystem(format!("open config {}", self.display()), e))?;
        restrict_permissions(&file)
            .await
            .map_err(|e| AppError::filesystem(format!("chmod config {}", self.display()), e))?;
        file.write_all(content.as_bytes())
            .await
            .map_err(|e| AppError::filesystem(format!("write config {}", self.display()), e))?;
        file.flush()
            .await
            .map_err(|e| AppError::filesystem(format!("write config {}", self.display()), e))?;

        debug!("已保存配置: {}", self.display());
        Ok(())
    }
}

#[cfg(unix)]
fn check_permissions(path: &Path, meta: &std::fs::Metadata) -> AppResult<()> {
    use std::os::unix::fs::PermissionsExt;

    let mode = meta.permissions().mode() & 0o777;
    if mode & 0o077 != 0 {
        return Err(AppError::ConfigInsecure {
            path: path.display().to_string(),
            mode,
        });
    }
    Ok(())
}

#[cfg(not(unix))]
fn check_permissions(_path: &Path, _meta: &std::fs::Metadata) -> AppResult<()> {
    Ok(())
}

fn private_open_options() -> fs::OpenOptions {
    let mut options = fs::OpenOptions::new();
    options.write(true).create(true).truncate(true);
    #[cfg(unix)]
    options.mode(0o600);
    options
}

async fn open_private(path: &Path) -> std::io::Result<fs::File> {
    private_open_options().open(path).await
}

#[cfg(unix)]
async fn restrict_permissions(file: &fs::File) -> std::io::Result<()> {
    use std::os::unix::fs::PermissionsExt;

    file.set_permissions(std::fs::Permissions::from_mode(0o600)).await
}

#[cfg(not(unix))]
async fn restrict_permissions(_file: &fs::File) -> std::io::Result<()> {
    Ok(())
}

async fn create_private_dir(dir: &Path) -> AppResult<()> {
    let mut builder = fs::DirBuilder::new();
    builder.recursive(true);
    #[cfg(unix)]
    builder.mode(0o700);
    builder
        .create(dir)
        .await
        .map_err(|e| AppError::filesystem(format!("create config dir {}", dir.display()), e))
}

/// 默认配置路径：`<用户配置目录>/vleet/config.toml`
///
/// 不会创建任何目录或文件。
pub fn default_config_path() -> AppResult<PathBuf> {
    let base = dirs::config_dir()
        .ok_or_else(|| AppError::validation("resolve config path: no user config directory"))?;
    Ok(base.join("vleet").join("config.toml"))
}

/// 运行时参数
#[derive(Clone, Debug)]
pub struct Settings {
    /// 配置文件路径
    pub config_path: PathBuf,
    /// 评测站地址
    pub base_url: String,
    pub user_agent: String,
}

impl Settings {
    pub fn from_env() -> AppResult<Self> {
        let config_path = match non_empty_env(ENV_CONFIG_PATH) {
            Some(path) => PathBuf::from(path),
            None => default_config_path()?,
        };
        Ok(Self {
            config_path,
            base_url: non_empty_env(ENV_BASE_URL).unwrap_or_else(|| DEFAULT_BASE_URL.to_string()),
            user_agent: non_empty_env(ENV_USER_AGENT)
                .unwrap_or_else(|| format!("vleet/{}", env!("CARGO_PKG_VERSION"))),
        })
    }
}

fn non_empty_env(name: &str) -> Option<String> {
    std::env::var(name)
        .ok()
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}
