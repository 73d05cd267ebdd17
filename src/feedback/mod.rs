//! 反馈汇总
//!
//! 把评分记录汇总成按主题的掌握度（红/黄/绿），并为学生挑选复习题。
//! 这里只有纯函数：不做 I/O，不持有状态，可以在任何线程里直接调用。

pub mod aggregator;
pub mod rag;
pub mod revision;

pub use aggregator::{
    group_records_by_student, summarize_assignment, summarize_mastery, summarize_student,
};
pub use rag::{AMBER_THRESHOLD, GREEN_THRESHOLD, classify, percentage};
pub use revision::{RevisionLimits, build_revision_pack};
