//! 在各个 crate 之间共享的工具
//!
//! 目前只有日志初始化：所有命令行工具使用统一的日志格式。

pub mod init_log;
