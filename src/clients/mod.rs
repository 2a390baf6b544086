pub mod leetcode_client;

pub use leetcode_client::{ClientOptions, JudgeClient, LeetCodeClient};
