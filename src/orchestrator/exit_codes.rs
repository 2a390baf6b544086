//! 进程退出码，属于命令行的公开约定

pub const SUCCESS: i32 = 0;
pub const FAILURE: i32 = 1; // 任意运行时错误
pub const USAGE: i32 = 2; // 命令行参数错误
pub const NOT_IMPLEMENTED: i32 = 3; // 功能尚未实现
