mod common;

use async_trait::async_trait;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use tempfile::TempDir;
use vleet::models::{CodeSnippet, SubmitRequest, TopicTag};
use vleet::services::{EditorRunner, FsWorkspace, HtmlRenderer, Printer};
use vleet::workflow::{FetchOptions, SolveOptions, SubmitOptions};
use vleet::{
    AppError, AppResult, Collaborators, Config, ConfigStore, JudgeClient, LeetCodeAuth,
    PollPolicy, Question, SolutionFlow, SubmissionId, SubmissionResult,
};

use common::{assert_no_secrets, auth};

// ========== 假的协作者 ==========

struct MemStore(Option<Config>);

#[async_trait]
impl ConfigStore for MemStore {
    async fn load(&self) -> AppResult<Config> {
        self.0.clone().ok_or_else(|| AppError::ConfigNotFound {
            path: "/nowhere/config.toml".into(),
        })
    }

    async fn save(&self, _config: &Config) -> AppResult<()> {
        Ok(())
    }
}

#[derive(Default)]
struct FakeJudge {
    submitted: Mutex<Vec<SubmitRequest>>,
    checks: Mutex<usize>,
    /// 设置后 fetch_question 返回它，而不是 two_sum
    remote: Mutex<Option<Question>>,
}

#[async_trait]
impl JudgeClient for FakeJudge {
    async fn fetch_question(&self, title_slug: &str, _auth: &LeetCodeAuth) -> AppResult<Question> {
        if title_slug != "two-sum" {
            return Err(AppError::NotFound {
                slug: title_slug.to_string(),
            });
        }
        Ok(self.remote.lock().unwrap().clone().unwrap_or_else(two_sum))
    }

    async fn submit(&self, req: &SubmitRequest, auth: &LeetCodeAuth) -> AppResult<SubmissionId> {
        assert!(auth.has_session());
        self.submitted.lock().unwrap().push(req.clone());
        Ok(SubmissionId::new(7).unwrap())
    }

    async fn check_submission(
        &self,
        _id: SubmissionId,
        _auth: &LeetCodeAuth,
    ) -> AppResult<SubmissionResult> {
        let mut checks = self.checks.lock().unwrap();
        *checks += 1;
        if *checks == 1 {
            return Ok(SubmissionResult {
                state: "STARTED".into(),
                ..Default::default()
            });
        }
        Ok(SubmissionResult {
            state: "SUCCESS".into(),
            status_message: "Accepted".into(),
            runtime: "1 ms".into(),
            memory: "2 MB".into(),
            ..Default::default()
        })
    }
}

#[derive(Default)]
struct RecordingEditor {
    opened: Mutex<Vec<(String, PathBuf)>>,
}

#[async_trait]
impl EditorRunner for RecordingEditor {
    async fn open_file(&self, editor_cmd: &str, path: &Path) -> AppResult<()> {
        self.opened
            .lock()
            .unwrap()
            .push((editor_cmd.to_string(), path.to_path_buf()));
        Ok(())
    }
}

#[derive(Default)]
struct RecordingPrinter {
    out: Mutex<String>,
}

impl RecordingPrinter {
    fn text(&self) -> String {
        self.out.lock().unwrap().clone()
    }
}

impl Printer for RecordingPrinter {
    fn print_question(&self, question: &Question) -> AppResult<()> {
        self.out
            .lock()
            .unwrap()
            .push_str(&format!("{} ({})\n", question.title, question.difficulty));
        Ok(())
    }

    fn print_submission_result(&self, result: &SubmissionResult) -> AppResult<()> {
        self.out
            .lock()
            .unwrap()
            .push_str(&vleet::services::output::format_submission_result(result));
        Ok(())
    }

    fn print_notice(&self, message: &str) -> AppResult<()> {
        self.out.lock().unwrap().push_str(&format!("{}\n", message));
        Ok(())
    }

    fn print_error(&self, err: &AppError) -> AppResult<()> {
        self.out.lock().unwrap().push_str(&format!("error: {}\n", err));
        Ok(())
    }
}

fn two_sum() -> Question {
    Question {
        question_id: "1".into(),
        frontend_id: "1".into(),
        title: "Two Sum".into(),
        title_slug: "two-sum".into(),
        difficulty: "Easy".into(),
        content_html: "<p>Return indices of the two numbers that add up to <code>target</code>.</p>".into(),
        topic_tags: vec![TopicTag {
            name: "Array".into(),
            slug: "array".into(),
        }],
        code_snippets: vec![
            CodeSnippet {
                human_lang: "C++".into(),
                lang_slug: "cpp".into(),
                starter_code: "class Solution {\npublic:\n};".into(),
            },
            CodeSnippet {
                human_lang: "Python3".into(),
                lang_slug: "python3".into(),
                starter_code: "class Solution:\n    pass".into(),
            },
        ],
        ..Default::default()
    }
}

struct Harness {
    dir: TempDir,
    judge: Arc<FakeJudge>,
    editor: Arc<RecordingEditor>,
    printer: Arc<RecordingPrinter>,
    flow: SolutionFlow,
}

fn harness(config: Option<Config>) -> Harness {
    let dir = tempfile::tempdir().unwrap();
    let judge = Arc::new(FakeJudge::default());
    let editor = Arc::new(RecordingEditor::default());
    let printer = Arc::new(RecordingPrinter::default());

    let flow = SolutionFlow::new(Collaborators {
        config_store: Arc::new(MemStore(config)),
        judge: judge.clone(),
        workspace: Arc::new(FsWorkspace::new()),
        renderer: Arc::new(HtmlRenderer::new().unwrap()),
        editor: editor.clone(),
        printer: printer.clone(),
    })
    .with_root(dir.path())
    .with_poll_policy(PollPolicy {
        initial_interval: Duration::from_millis(5),
        max_interval: Duration::from_millis(10),
        timeout: Duration::from_secs(5),
    });

    Harness {
        dir,
        judge,
        editor,
        printer,
        flow,
    }
}

fn configured() -> Config {
    Config {
        editor: "nvim".into(),
        default_lang: "cpp".into(),
        leetcode: auth(),
    }
}

// ========== fetch ==========

#[tokio::test]
async fn test_fetch_writes_header_and_starter_code() {
    let h = harness(Some(configured()));

    let prepared = h
        .flow
        .fetch(&FetchOptions {
            problem_key: "two-sum".into(),
            lang: String::new(),
        })
        .await
        .unwrap();

    let expected = h.dir.path().join("two-sum").join("solution.cpp");
    assert!(prepared.created_new_file);
    assert_eq!(prepared.workspace.solution_path, expected);

    let content = std::fs::read_to_string(&expected).unwrap();
    assert!(content.starts_with("// Two Sum (Easy)\n"));
    assert!(content.contains("// Return indices of the two numbers that add up to target."));
    assert!(content.contains("class Solution {\npublic:\n};"));
    assert!(content.ends_with('\n'));
    assert_no_secrets(&content);

    let out = h.printer.text();
    assert!(out.contains("Two Sum (Easy)"));
    assert!(out.contains(&format!("wrote solution: {}", expected.display())));
    assert!(h.editor.opened.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_fetch_twice_never_overwrites() {
    let h = harness(None);
    let opts = FetchOptions {
        problem_key: "two-sum".into(),
        lang: "python3".into(),
    };

    let first = h.flow.fetch(&opts).await.unwrap();
    let path = first.workspace.solution_path.clone();
    assert!(path.ends_with("two-sum/solution.py"));

    std::fs::write(&path, "my work in progress\n").unwrap();

    let second = h.flow.fetch(&opts).await.unwrap();
    assert!(!second.created_new_file);
    assert_eq!(second.workspace.solution_path, path);
    assert_eq!(std::fs::read_to_string(&path).unwrap(), "my work in progress\n");
    assert!(h
        .printer
        .text()
        .contains(&format!("solution already exists: {}", path.display())));
}

#[tokio::test]
async fn test_fetch_unknown_lang_lists_available() {
    let h = harness(None);
    let err = h
        .flow
        .fetch(&FetchOptions {
            problem_key: "two-sum".into(),
            lang: "golang".into(),
        })
        .await
        .unwrap_err();
    assert_eq!(
        err.to_string(),
        "no snippet for lang \"golang\" (available: cpp, python3)"
    );
    assert!(!h.dir.path().join("two-sum").join("solution.go").exists());
}

#[tokio::test]
async fn test_fetch_requires_problem_key() {
    let h = harness(None);
    let err = h.flow.fetch(&FetchOptions::default()).await.unwrap_err();
    assert!(matches!(err, AppError::Validation(_)));
}

// ========== solve ==========

#[tokio::test]
async fn test_solve_opens_configured_editor() {
    let h = harness(Some(configured()));
    let prepared = h
        .flow
        .solve(&SolveOptions {
            problem_key: "two-sum".into(),
            lang: String::new(),
            submit: false,
        })
        .await
        .unwrap();

    let opened = h.editor.opened.lock().unwrap().clone();
    assert_eq!(opened, vec![("nvim".to_string(), prepared.workspace.solution_path)]);
    assert!(h.judge.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_solve_with_submit_chains_into_submit() {
    let h = harness(Some(configured()));
    h.flow
        .solve(&SolveOptions {
            problem_key: "two-sum".into(),
            lang: "python3".into(),
            submit: true,
        })
        .await
        .unwrap();

    let submitted = h.judge.submitted.lock().unwrap().clone();
    assert_eq!(submitted.len(), 1);
    assert_eq!(submitted[0].lang_slug, "python3");
    assert!(h.printer.text().contains("Verdict: Accepted"));
}

// ========== submit ==========

#[tokio::test]
async fn test_submit_reads_solution_and_prints_verdict() {
    let h = harness(Some(configured()));
    let ws = h.dir.path().join("two-sum");
    std::fs::create_dir_all(&ws).unwrap();
    std::fs::write(ws.join("solution.cpp"), "class Solution { /* mine */ };\n").unwrap();

    h.flow
        .submit(&SubmitOptions {
            problem_key: "two-sum".into(),
            lang: String::new(),
            file: None,
        })
        .await
        .unwrap();

    let submitted = h.judge.submitted.lock().unwrap().clone();
    assert_eq!(
        submitted,
        vec![SubmitRequest {
            title_slug: "two-sum".into(),
            question_id: "1".into(),
            lang_slug: "cpp".into(),
            source_code: "class Solution { /* mine */ };\n".into(),
        }]
    );
    assert_eq!(*h.judge.checks.lock().unwrap(), 2);

    let out = h.printer.text();
    assert!(out.contains("Verdict: Accepted\n"));
    assert!(out.contains("Runtime: 1 ms\n"));
    assert!(out.contains("Memory: 2 MB\n"));
    assert_no_secrets(&out);
}

#[tokio::test]
async fn test_submit_with_file_override() {
    let h = harness(Some(configured()));
    let ws = h.dir.path().join("two-sum");
    std::fs::create_dir_all(&ws).unwrap();
    std::fs::write(ws.join("alt.py"), "print(1)\n").unwrap();

    h.flow
        .submit(&SubmitOptions {
            problem_key: "two-sum".into(),
            lang: "python3".into(),
            file: Some(PathBuf::from("alt.py")),
        })
        .await
        .unwrap();
    assert_eq!(h.judge.submitted.lock().unwrap()[0].source_code, "print(1)\n");
}

#[tokio::test]
async fn test_submit_without_config_is_auth_required() {
    let h = harness(None);
    let err = h
        .flow
        .submit(&SubmitOptions {
            problem_key: "two-sum".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthRequired(_)));
    assert!(err.to_string().contains("vleet config init"));
    assert!(h.judge.submitted.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_submit_without_session_is_auth_required() {
    let mut config = configured();
    config.leetcode.session.clear();
    let h = harness(Some(config));
    let err = h
        .flow
        .submit(&SubmitOptions {
            problem_key: "two-sum".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::AuthRequired(_)));
}

#[tokio::test]
async fn test_submit_missing_workspace_is_filesystem_error() {
    let h = harness(Some(configured()));
    let err = h
        .flow
        .submit(&SubmitOptions {
            problem_key: "two-sum".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Filesystem { .. }), "unexpected error: {}", err);
    assert!(h.judge.submitted.lock().unwrap().is_empty());
}

fn write_cpp_solution(h: &Harness) {
    let ws = h.dir.path().join("two-sum");
    std::fs::create_dir_all(&ws).unwrap();
    std::fs::write(ws.join("solution.cpp"), "class Solution {};\n").unwrap();
}

#[tokio::test]
async fn test_submit_empty_question_id_never_submits() {
    let h = harness(Some(configured()));
    write_cpp_solution(&h);
    *h.judge.remote.lock().unwrap() = Some(Question {
        question_id: "  ".into(),
        ..two_sum()
    });

    let err = h
        .flow
        .submit(&SubmitOptions {
            problem_key: "two-sum".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Protocol { .. }), "unexpected error: {}", err);
    assert!(err.to_string().contains("question id missing"));
    assert!(h.judge.submitted.lock().unwrap().is_empty());
    assert_eq!(*h.judge.checks.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_submit_title_slug_mismatch_never_submits() {
    let h = harness(Some(configured()));
    write_cpp_solution(&h);
    *h.judge.remote.lock().unwrap() = Some(Question {
        title_slug: "three-sum".into(),
        ..two_sum()
    });

    let err = h
        .flow
        .submit(&SubmitOptions {
            problem_key: "two-sum".into(),
            ..Default::default()
        })
        .await
        .unwrap_err();
    assert!(matches!(err, AppError::Validation(_)), "unexpected error: {}", err);
    let msg = err.to_string();
    assert!(msg.contains("title slug mismatch"));
    assert!(msg.contains("three-sum"));
    assert_no_secrets(&msg);
    assert!(h.judge.submitted.lock().unwrap().is_empty());
    assert_eq!(*h.judge.checks.lock().unwrap(), 0);
}

#[tokio::test]
async fn test_submit_title_slug_differs_only_in_case() {
    let h = harness(Some(configured()));
    write_cpp_solution(&h);
    *h.judge.remote.lock().unwrap() = Some(Question {
        title_slug: "Two-Sum".into(),
        ..two_sum()
    });

    h.flow
        .submit(&SubmitOptions {
            problem_key: "two-sum".into(),
            ..Default::default()
        })
        .await
        .unwrap();
    assert_eq!(h.judge.submitted.lock().unwrap().len(), 1);
}
