/// 場景狀態管理模組
///
/// - `core`: 場景權威狀態與快照
/// - `initialization`: 場景檔載入與執行緒池
/// - `time_management`: 日夜週期與黑暗層
/// - `command`: 主持人指令列

pub mod core;
pub mod initialization;
pub mod time_management;
pub mod command;

pub use self::core::*;
pub use self::initialization::*;
pub use self::time_management::*;
pub use self::command::{execute, Command, Reply};
