//! 工作区管理 - 业务能力层
//!
//! 每道题一个目录：`<root>/<titleSlug>/solution.<ext>`。
//! 解答文件只会被创建，永远不会被覆盖。

use async_trait::async_trait;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::debug;

use crate::error::{AppError, AppResult};
use crate::models::{lang, Question};

const SOLUTION_BASE_NAME: &str = "solution";

/// 单道题的工作区
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Workspace {
    /// 工作区目录，通常是 `./<problem-key>/`
    pub dir: PathBuf,
    /// 题目 key（titleSlug）
    pub problem_key: String,
    /// 语言标识
    pub lang: String,
    /// 解答文件路径
    pub solution_path: PathBuf,
}

/// 工作区能力
#[async_trait]
pub trait WorkspaceManager: Send + Sync {
    /// 创建工作区；解答文件已存在时返回 `FileConflict`
    async fn create_workspace(
        &self,
        root: &Path,
        question: &Question,
        lang: &str,
        file_override: Option<&str>,
    ) -> AppResult<Workspace>;

    /// 加载已存在的工作区（不会自动创建）
    async fn load_workspace(
        &self,
        dir: &Path,
        problem_key: &str,
        lang: &str,
        file_override: Option<&str>,
    ) -> AppResult<Workspace>;

    async fn read_solution(&self, workspace: &Workspace) -> AppResult<String>;

    /// 独占创建并写入解答文件；文件已存在时返回 `FileConflict`
    async fn write_solution(&self, workspace: &Workspace, content: &str) -> AppResult<()>;
}

/// 基于本地文件系统的工作区
#[derive(Debug, Default, Clone, Copy)]
pub struct FsWorkspace;

impl FsWorkspace {
    pub fn new() -> Self {
        Self
    }
}

#[async_trait]
impl WorkspaceManager for FsWorkspace {
    async fn create_workspace(
        &self,
        root: &Path,
        question: &Question,
        lang: &str,
        file_override: Option<&str>,
    ) -> AppResult<Workspace> {
        let lang = lang.trim();
        let info = lang::lookup(lang)?;

        let problem_key = question.title_slug.trim();
        if problem_key.is_empty() {
            return Err(AppError::validation("question titleSlug is required"));
        }

        let dir = root_or_current(root).join(problem_key);
        let solution_path = resolve_solution_path(&dir, info.extension, file_override)?;

        fs::create_dir_all(&dir).await.map_err(|e| {
            AppError::filesystem(format!("create workspace dir {}", dir.display()), e)
        })?;

        let exists = fs::try_exists(&solution_path).await.map_err(|e| {
            AppError::filesystem(format!("stat solution {}", solution_path.display()), e)
        })?;
        if exists {
            return Err(AppError::FileConflict {
                path: solution_path.display().to_string(),
            });
        }

        debug!("工作区已创建: {}", dir.display());
        Ok(Workspace {
            dir,
            problem_key: problem_key.to_string(),
            lang: lang.to_string(),
            solution_path,
        })
    }

    async fn load_workspace(
        &self,
        dir: &Path,
        problem_key: &str,
        lang: &str,
        file_override: Option<&str>,
    ) -> AppResult<Workspace> {
        let lang = lang.trim();
        let info = lang::lookup(lang)?;

        let problem_key = problem_key.trim();
        let has_dir = !dir.as_os_str().is_empty();

        let (workspace_dir, problem_key) = match (has_dir, problem_key.is_empty()) {
            (true, false) => (dir.join(problem_key), problem_key.to_string()),
            (true, true) => {
                let key = dir
                    .file_name()
                    .map(|n| n.to_string_lossy().to_string())
                    .unwrap_or_default();
                (dir.to_path_buf(), key)
            }
            (false, false) => (Path::new(".").join(problem_key), problem_key.to_string()),
            (false, true) => return Err(AppError::validation("dir or problemKey is required")),
        };

        let solution_path = resolve_solution_path(&workspace_dir, info.extension, file_override)?;

        let meta = fs::metadata(&workspace_dir).await.map_err(|e| {
            AppError::filesystem(format!("stat workspace dir {}", workspace_dir.display()), e)
        })?;
        if !meta.is_dir() {
            return Err(AppError::validation(format!(
                "workspace path is not a directory: {}",
                workspace_dir.display()
            )));
        }

        Ok(Workspace {
            dir: workspace_dir,
            problem_key,
            lang: lang.to_string(),
            solution_path,
        })
    }

    async fn read_solution(&self, workspace: &Workspace) -> AppResult<String> {
        if workspace.solution_path.as_os_str().is_empty() {
            return Err(AppError::validation("workspace solution path is empty"));
        }
        fs::read_to_string(&workspace.solution_path)
            .await
            .map_err(|e| {
                AppError::filesystem(
                    format!("read solution {}", workspace.solution_path.display()),
                    e,
                )
            })
    }

    async fn write_solution(&self, workspace: &Workspace, content: &str) -> AppResult<()> {
        let path = &workspace.solution_path;
        if path.as_os_str().is_empty() {
            return Err(AppError::validation("workspace solution path is empty"));
        }

        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent).await.map_err(|e| {
                AppError::filesystem(format!("create solution dir {}", parent.display()), e)
            })?;
        }

        // 独占创建，避免 check-then-write 的竞争窗口
        let mut file = match fs::OpenOptions::new()
            .write(true)
            .create_new(true)
            .open(path)
            .await
        {
            Ok(file) => file,
            Err(e) if e.kind() == ErrorKind::AlreadyExists => {
                return Err(AppError::FileConflict {
                    path: path.display().to_string(),
                })
            }
            Err(e) => {
                return Err(AppError::filesystem(
                    format!("create solution {}", path.display()),
                    e,
                ))
            }
        };

        file.write_all(content.as_bytes())
            .await
            .map_err(|e| AppError::filesystem(format!("write solution {}", path.display()), e))?;
        file.flush()
            .await
            .map_err(|e| AppError::filesystem(format!("write solution {}", path.display()), e))?;

        debug!("解答文件已写入: {} ({} 字节)", path.display(), content.len());
        Ok(())
    }
}

fn root_or_current(root: &Path) -> PathBuf {
    if root.as_os_str().is_empty() {
        PathBuf::from(".")
    } else {
        root.to_path_buf()
    }
}

/// 解析解答文件路径；覆盖路径的扩展名必须与语言一致
fn resolve_solution_path(
    workspace_dir: &Path,
    expected_ext: &str,
    file_override: Option<&str>,
) -> AppResult<PathBuf> {
    let file_override = file_override.map(str::trim).filter(|f| !f.is_empty());

    let Some(file) = file_override else {
        return Ok(workspace_dir.join(format!("{}{}", SOLUTION_BASE_NAME, expected_ext)));
    };

    let path = Path::new(file);
    let path = if path.is_absolute() {
        path.to_path_buf()
    } else {
        workspace_dir.join(path)
    };

    let ext = path
        .extension()
        .map(|e| format!(".{}", e.to_string_lossy()))
        .unwrap_or_default();
    if ext != expected_ext {
        return Err(AppError::validation(format!(
            "solution file extension {:?} does not match language extension {:?}",
            ext, expected_ext
        )));
    }
    Ok(path)
}
