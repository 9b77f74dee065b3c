/// Fogsight Library
///
/// 桌遊地圖的視線與戰爭迷霧引擎：牆壁與門遮擋、放射掃描視野、
/// 日夜黑暗層、主持人揭露迷霧，以及範圍模板判定。

pub mod error;
pub mod config;
pub mod vision;
pub mod comp;
pub mod state;
pub mod msg;

// Re-export commonly used types
pub use crate::comp::*;
pub use crate::vision::*;
pub use crate::error::{Result, VisionError};
pub use crate::msg::SyncMsg;
