//! SeaORM 实体定义
//!
//! 这些实体用于数据库操作，与 models 模块中的业务实体分离。
//! Storage 层使用这些实体进行 CRUD 操作，然后转换为 models 中的业务实体。

pub mod prelude;

pub mod answer_records;
pub mod assignment_questions;
pub mod assignments;
pub mod class_members;
pub mod classes;
pub mod profiles;
pub mod questions;
pub mod revision_allocations;
pub mod revision_list_questions;
pub mod revision_lists;
pub mod revision_progress;
pub mod submissions;

use chrono::{DateTime, Utc};

/// 数据库中的秒级时间戳转为 UTC 时间
pub(crate) fn timestamp_to_datetime(ts: i64) -> DateTime<Utc> {
    DateTime::<Utc>::from_timestamp(ts, 0).unwrap_or_default()
}
