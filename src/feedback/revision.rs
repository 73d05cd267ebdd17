//! 复习包：针对学生未达绿色的子主题，从题库挑题

use std::collections::HashSet;

use crate::config::FeedbackConfig;
use crate::models::feedback::entities::{RagStatus, RevisionItem, StudentFeedbackSummary};
use crate::models::questions::entities::Question;

/// 挑题数量限制
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RevisionLimits {
    // 每个子主题最多几道
    pub per_sub_topic: usize,
    // 子主题没有匹配题目时，按主题补几道
    pub topic_fallback: usize,
    // 整个复习包上限
    pub max_total: usize,
}

impl Default for RevisionLimits {
    fn default() -> Self {
        Self::from(&FeedbackConfig::default())
    }
}

impl From<&FeedbackConfig> for RevisionLimits {
    fn from(config: &FeedbackConfig) -> Self {
        Self {
            per_sub_topic: config.revision_per_sub_topic,
            topic_fallback: config.revision_topic_fallback,
            max_total: config.revision_pack_limit,
        }
    }
}

fn same_label(a: &str, b: &str) -> bool {
    a.trim().eq_ignore_ascii_case(b.trim())
}

/// 为一名学生挑选复习题
///
/// 最弱的子主题优先；已在本次作业中出现过的题目不会再选。候选题中已审核的排在前面。
pub fn build_revision_pack(
    summary: &StudentFeedbackSummary,
    candidates: &[Question],
    exclude_question_ids: &HashSet<i64>,
    limits: RevisionLimits,
) -> Vec<RevisionItem> {
    let mut targets: Vec<_> = summary
        .sub_topic_breakdown
        .iter()
        .filter(|s| s.status != RagStatus::Green)
        .collect();
    // 稳定排序，同分保持首次出现顺序
    targets.sort_by_key(|s| s.percentage);

    let mut ordered: Vec<&Question> = candidates.iter().collect();
    ordered.sort_by_key(|q| !q.is_verified);

    let mut used: HashSet<i64> = exclude_question_ids.clone();
    let mut pack = Vec::new();

    for target in targets {
        if pack.len() >= limits.max_total {
            break;
        }

        let on_topic = |q: &&Question| same_label(&q.topic, &target.topic) && !used.contains(&q.id);
        let by_sub_topic: Vec<&Question> = ordered
            .iter()
            .copied()
            .filter(on_topic)
            .filter(|q| {
                q.sub_topic
                    .as_deref()
                    .is_some_and(|sub| same_label(sub, &target.sub_topic))
            })
            .take(limits.per_sub_topic)
            .collect();

        let picked = if by_sub_topic.is_empty() {
            ordered
                .iter()
                .copied()
                .filter(on_topic)
                .take(limits.topic_fallback)
                .collect()
        } else {
            by_sub_topic
        };

        for question in picked {
            if pack.len() >= limits.max_total {
                break;
            }
            used.insert(question.id);
            pack.push(RevisionItem {
                target_topic: target.topic.clone(),
                target_sub_topic: target.sub_topic.clone(),
                target_status: target.status,
                question: question.clone(),
            });
        }
    }

    pack
}
