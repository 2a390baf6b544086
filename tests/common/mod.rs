#![allow(dead_code)]

use serde_json::{json, Value};
use vleet::LeetCodeAuth;

pub const SESSION: &str = "sess-secret";
pub const CSRF: &str = "csrf-secret";

pub fn auth() -> LeetCodeAuth {
    LeetCodeAuth {
        session: SESSION.to_string(),
        csrftoken: CSRF.to_string(),
    }
}

pub fn assert_no_secrets(text: &str) {
    assert!(!text.contains(SESSION), "session leaked: {}", text);
    assert!(!text.contains(CSRF), "csrftoken leaked: {}", text);
}

/// questionData 的典型响应
pub fn two_sum_payload() -> Value {
    json!({
        "data": {
            "question": {
                "questionId": "1",
                "questionFrontendId": "1",
                "title": "Two Sum",
                "titleSlug": "two-sum",
                "difficulty": "Easy",
                "content": "<p>Given an array of integers <code>nums</code>&nbsp;and an integer <code>target</code>.</p>",
                "exampleTestcases": "[2,7,11,15]\n9",
                "sampleTestCase": "[2,7,11,15]\n9",
                "hints": ["Use a hash map."],
                "topicTags": [
                    { "name": "Array", "slug": "array" },
                    { "name": "Hash Table", "slug": "hash-table" }
                ],
                "codeSnippets": [
                    {
                        "lang": "C++",
                        "langSlug": "cpp",
                        "code": "class Solution {\npublic:\n    vector<int> twoSum(vector<int>& nums, int target) {\n        \n    }\n};"
                    },
                    {
                        "lang": "Python3",
                        "langSlug": "python3",
                        "code": "class Solution:\n    def twoSum(self, nums: List[int], target: int) -> List[int]:\n        "
                    }
                ]
            }
        }
    })
}
