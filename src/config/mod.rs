//! 配置管理
//!
//! 分层加载：`config.toml` → `config.{APP_ENV}.toml` → `TUTOR_*` 环境变量 → 常用环境变量覆盖。

mod r#impl;
mod structs;

pub use structs::*;
