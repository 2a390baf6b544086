//! 输出 - 业务能力层
//!
//! 默认输出给人看的文本；`--json` 模式下每个结果输出一行 JSON。
//! 错误永远以 `error: <message>` 写到错误流。

use serde::Serialize;
use std::io::Write;
use std::sync::Mutex;

use crate::error::{AppError, AppResult};
use crate::models::{Question, SubmissionResult};

/// 输出能力
pub trait Printer: Send + Sync {
    fn print_question(&self, question: &Question) -> AppResult<()>;
    fn print_submission_result(&self, result: &SubmissionResult) -> AppResult<()>;
    /// 进度提示；JSON 模式下不输出
    fn print_notice(&self, message: &str) -> AppResult<()>;
    fn print_error(&self, err: &AppError) -> AppResult<()>;
}

type Sink = Mutex<Box<dyn Write + Send>>;

/// 标准输出 / 标准错误打印器
pub struct StdPrinter {
    out: Sink,
    err: Sink,
    json: bool,
}

impl StdPrinter {
    pub fn new(out: Box<dyn Write + Send>, err: Box<dyn Write + Send>, json: bool) -> Self {
        Self {
            out: Mutex::new(out),
            err: Mutex::new(err),
            json,
        }
    }

    /// 使用进程的 stdout / stderr
    pub fn stdio(json: bool) -> Self {
        Self::new(Box::new(std::io::stdout()), Box::new(std::io::stderr()), json)
    }

    fn write_out(&self, text: &str) -> AppResult<()> {
        write_to(&self.out, text)
    }

    fn write_json<T: Serialize>(&self, value: &T) -> AppResult<()> {
        let mut line = serde_json::to_string(value).map_err(|e| {
            AppError::filesystem("encode output", std::io::Error::new(std::io::ErrorKind::Other, e))
        })?;
        line.push('\n');
        self.write_out(&line)
    }
}

fn write_to(sink: &Sink, text: &str) -> AppResult<()> {
    // 另一个线程写入时 panic 不影响后续输出
    let mut w = sink.lock().unwrap_or_else(|poisoned| poisoned.into_inner());
    w.write_all(text.as_bytes())
        .and_then(|_| w.flush())
        .map_err(|e| AppError::filesystem("write output", e))
}

impl Printer for StdPrinter {
    fn print_question(&self, question: &Question) -> AppResult<()> {
        if self.json {
            return self.write_json(question);
        }
        self.write_out(&format!("{} ({})\n", question.title, question.difficulty))
    }

    fn print_submission_result(&self, result: &SubmissionResult) -> AppResult<()> {
        if self.json {
            return self.write_json(result);
        }
        self.write_out(&format_submission_result(result))
    }

    fn print_notice(&self, message: &str) -> AppResult<()> {
        if self.json {
            return Ok(());
        }
        self.write_out(&format!("{}\n", message))
    }

    fn print_error(&self, err: &AppError) -> AppResult<()> {
        write_to(&self.err, &format!("error: {}\n", err))
    }
}

/// 判题结果的文本格式
pub fn format_submission_result(result: &SubmissionResult) -> String {
    let mut text = String::new();

    if !result.status_message.is_empty() {
        text.push_str(&format!("Verdict: {}\n", result.status_message));
    } else if !result.state.is_empty() {
        text.push_str(&format!("State: {}\n", result.state));
    }
    if !result.runtime.is_empty() {
        text.push_str(&format!("Runtime: {}\n", result.runtime));
    }
    if !result.memory.is_empty() {
        text.push_str(&format!("Memory: {}\n", result.memory));
    }
    if !result.compile_error.is_empty() {
        text.push_str(&format!("\nCompile Error:\n{}\n", result.compile_error));
    }
    if !result.runtime_error.is_empty() {
        text.push_str(&format!("\nRuntime Error:\n{}\n", result.runtime_error));
    }
    text
}
