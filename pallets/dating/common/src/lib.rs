//! # 交友模块 - 共享类型和工具
//!
//! 本模块提供交友系统的共享类型定义和 Trait 接口。
//!
//! ## 功能概述
//!
//! - **类型定义**：订阅等级、配额动作、每日限额、滑动信号、匹配记录、通知
//! - **Trait 接口**：等级策略、配额追踪、聊天会话、推送通知
//!
//! ## 模块结构
//!
//! ```text
//! pallet-dating-common
//! ├── types.rs    # 共享类型定义
//! └── traits.rs   # Trait 接口定义
//! ```

#![cfg_attr(not(feature = "std"), no_std)]

pub mod types;
pub mod traits;

pub use types::*;
pub use traits::*;
