//! 学生与全班两级汇总

use std::collections::HashMap;

use super::rag::{classify, mean_percentage, percentage};
use crate::errors::{Result, TutorError};
use crate::models::answer_records::entities::AnswerRecord;
use crate::models::feedback::entities::{
    AssignmentFeedbackSummary, AssignmentScore, ClassTopicSummary, RagStatus,
    StudentFeedbackSummary, StudentMasterySummary, SubTopicSummary, TopicSummary,
};

/// 按首次出现顺序分组，组内保留原始顺序
struct OrderedGroups<'a, K> {
    keys: Vec<K>,
    members: Vec<Vec<&'a AnswerRecord>>,
    index: HashMap<K, usize>,
}

impl<'a, K: Clone + Eq + std::hash::Hash> OrderedGroups<'a, K> {
    fn new() -> Self {
        Self {
            keys: Vec::new(),
            members: Vec::new(),
            index: HashMap::new(),
        }
    }

    fn push(&mut self, key: K, record: &'a AnswerRecord) {
        let slot = match self.index.get(&key).copied() {
            Some(slot) => slot,
            None => {
                let slot = self.keys.len();
                self.index.insert(key.clone(), slot);
                self.keys.push(key);
                self.members.push(Vec::new());
                slot
            }
        };
        self.members[slot].push(record);
    }

    fn into_groups(self) -> impl Iterator<Item = (K, Vec<&'a AnswerRecord>)> {
        self.keys.into_iter().zip(self.members)
    }
}

/// 浮点求和前先排序，保证结果与记录顺序无关
fn order_independent_sum(values: impl Iterator<Item = f64>) -> f64 {
    let mut values: Vec<f64> = values.collect();
    values.sort_by(f64::total_cmp);
    values.into_iter().sum()
}

fn totals(records: &[&AnswerRecord]) -> (f64, f64) {
    let awarded = order_independent_sum(records.iter().map(|r| r.marks_awarded));
    let available = order_independent_sum(records.iter().map(|r| r.marks_available));
    (awarded, available)
}

fn topic_key(record: &AnswerRecord) -> String {
    record.topic.trim().to_string()
}

/// 汇总一名学生在一份作业上的所有评分记录
///
/// 没有记录，或所有题目的满分合计为 0 时返回 `NoData`。
pub fn summarize_student(records: &[AnswerRecord]) -> Result<StudentFeedbackSummary> {
    let Some(first) = records.first() else {
        return Err(TutorError::no_data("No answer records to summarize"));
    };

    for record in records {
        debug_assert!(
            !record.topic.trim().is_empty(),
            "answer record without topic"
        );
        debug_assert!(
            record.marks_available >= 0.0
                && record.marks_awarded >= 0.0
                && record.marks_awarded <= record.marks_available,
            "answer record marks out of range"
        );
        debug_assert_eq!(
            record.student_id, first.student_id,
            "records of several students passed to summarize_student"
        );
    }

    let all: Vec<&AnswerRecord> = records.iter().collect();
    let (overall_score, max_marks) = totals(&all);
    let Some(overall_percentage) = percentage(overall_score, max_marks) else {
        return Err(TutorError::no_data("No marks available in answer records"));
    };

    let mut by_topic = OrderedGroups::new();
    let mut by_sub_topic = OrderedGroups::new();
    for record in records {
        let topic = topic_key(record);
        let sub_topic = record
            .sub_topic_label()
            .map(str::to_string)
            .unwrap_or_else(|| topic.clone());
        by_topic.push(topic.clone(), record);
        by_sub_topic.push((topic, sub_topic), record);
    }

    let topic_breakdown: Vec<TopicSummary> = by_topic
        .into_groups()
        .filter_map(|(topic, group)| {
            let (total_awarded, total_available) = totals(&group);
            let percentage = percentage(total_awarded, total_available)?;
            Some(TopicSummary {
                topic,
                total_awarded,
                total_available,
                question_count: group.len(),
                percentage,
                status: classify(percentage),
            })
        })
        .collect();

    let sub_topic_breakdown: Vec<SubTopicSummary> = by_sub_topic
        .into_groups()
        .filter_map(|((topic, sub_topic), group)| {
            let (total_awarded, total_available) = totals(&group);
            let percentage = percentage(total_awarded, total_available)?;
            Some(SubTopicSummary {
                topic,
                sub_topic,
                total_awarded,
                total_available,
                question_ids: group.iter().map(|r| r.question_id).collect(),
                percentage,
                status: classify(percentage),
            })
        })
        .collect();

    let weak_topics: Vec<TopicSummary> = topic_breakdown
        .iter()
        .filter(|t| t.status == RagStatus::Red)
        .cloned()
        .collect();

    // 并列时取先出现的主题
    let best_topic = topic_breakdown
        .iter()
        .fold(None::<&TopicSummary>, |best, t| match best {
            Some(b) if b.percentage >= t.percentage => Some(b),
            _ => Some(t),
        })
        .map(|t| t.topic.clone());

    let all_green = topic_breakdown.iter().all(|t| t.status == RagStatus::Green);
    let weakest_topic = if all_green {
        None
    } else {
        topic_breakdown
            .iter()
            .fold(None::<&TopicSummary>, |weakest, t| match weakest {
                Some(w) if w.percentage <= t.percentage => Some(w),
                _ => Some(t),
            })
            .map(|t| t.topic.clone())
    };

    Ok(StudentFeedbackSummary {
        student_id: first.student_id,
        overall_score,
        max_marks,
        overall_percentage,
        overall_status: classify(overall_percentage),
        topic_breakdown,
        sub_topic_breakdown,
        weak_topics,
        best_topic,
        weakest_topic,
    })
}

/// 汇总全班在一份作业上的表现
///
/// 输入按学生给出记录，空记录的学生不参与统计；没有任何可统计的学生时返回 `NoData`。
pub fn summarize_assignment(
    per_student: &[(i64, Vec<AnswerRecord>)],
) -> Result<AssignmentFeedbackSummary> {
    let mut student_feedback = Vec::with_capacity(per_student.len());
    for (student_id, records) in per_student {
        if records.is_empty() {
            continue;
        }
        match summarize_student(records) {
            Ok(mut summary) => {
                summary.student_id = *student_id;
                student_feedback.push(summary);
            }
            // 满分合计为 0 的学生没有可用信号，跳过
            Err(e) if e.is_no_data() => continue,
            Err(e) => return Err(e),
        }
    }

    let overall: Vec<u8> = student_feedback
        .iter()
        .map(|s| s.overall_percentage)
        .collect();
    let Some(average_score) = mean_percentage(&overall) else {
        return Err(TutorError::no_data("No graded submissions to summarize"));
    };

    let mut topic_order: Vec<&str> = Vec::new();
    let mut topic_scores: HashMap<&str, Vec<(u8, RagStatus)>> = HashMap::new();
    for summary in &student_feedback {
        for topic in &summary.topic_breakdown {
            let scores = topic_scores.entry(topic.topic.as_str()).or_insert_with(|| {
                topic_order.push(topic.topic.as_str());
                Vec::new()
            });
            scores.push((topic.percentage, topic.status));
        }
    }

    let topic_breakdown = topic_order
        .into_iter()
        .filter_map(|topic| {
            let scores = topic_scores.get(topic)?;
            let percentages: Vec<u8> = scores.iter().map(|(p, _)| *p).collect();
            let average_percentage = mean_percentage(&percentages)?;
            Some(ClassTopicSummary {
                topic: topic.to_string(),
                average_percentage,
                status: classify(average_percentage),
                students_attempted: scores.len(),
                students_struggling: scores
                    .iter()
                    .filter(|(_, status)| *status == RagStatus::Red)
                    .count(),
            })
        })
        .collect();

    Ok(AssignmentFeedbackSummary {
        graded_students: student_feedback.len(),
        average_score,
        average_status: classify(average_score),
        topic_breakdown,
        student_feedback,
    })
}

/// 汇总一名学生在多份作业上的记录
///
/// 每份作业先单独汇总得到得分率，再对得分率取平均；主题掌握度用全部记录一起汇总。
/// 满分合计为 0 的作业不计入；没有任何可统计的作业时返回 `NoData`。
pub fn summarize_mastery(records: &[AnswerRecord]) -> Result<StudentMasterySummary> {
    let mut by_assignment = OrderedGroups::new();
    for record in records {
        by_assignment.push(record.assignment_id, record);
    }

    let mut assignment_scores = Vec::new();
    for (assignment_id, group) in by_assignment.into_groups() {
        let group: Vec<AnswerRecord> = group.into_iter().cloned().collect();
        match summarize_student(&group) {
            Ok(summary) => assignment_scores.push(AssignmentScore {
                assignment_id,
                percentage: summary.overall_percentage,
                status: summary.overall_status,
            }),
            Err(e) if e.is_no_data() => continue,
            Err(e) => return Err(e),
        }
    }

    let percentages: Vec<u8> = assignment_scores.iter().map(|s| s.percentage).collect();
    let Some(average_score) = mean_percentage(&percentages) else {
        return Err(TutorError::no_data("No graded assignments to summarize"));
    };
    let topic_mastery = summarize_student(records)?;

    Ok(StudentMasterySummary {
        student_id: topic_mastery.student_id,
        assignments_graded: assignment_scores.len(),
        average_score,
        average_status: classify(average_score),
        assignment_scores,
        topic_mastery,
    })
}

/// 把一份作业的扁平记录按学生分组，学生顺序为首次出现顺序
pub fn group_records_by_student(records: Vec<AnswerRecord>) -> Vec<(i64, Vec<AnswerRecord>)> {
    let mut grouped: Vec<(i64, Vec<AnswerRecord>)> = Vec::new();
    let mut index: HashMap<i64, usize> = HashMap::new();
    for record in records {
        let slot = *index.entry(record.student_id).or_insert_with(|| {
            grouped.push((record.student_id, Vec::new()));
            grouped.len() - 1
        });
        grouped[slot].1.push(record);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn record(student_id: i64, question_id: i64, topic: &str, awarded: f64, available: f64) -> AnswerRecord {
        AnswerRecord {
            student_id,
            assignment_id: 1,
            question_id,
            topic: topic.to_string(),
            sub_topic: None,
            marks_awarded: awarded,
            marks_available: available,
        }
    }

    fn with_sub_topic(mut r: AnswerRecord, sub_topic: &str) -> AnswerRecord {
        r.sub_topic = Some(sub_topic.to_string());
        r
    }

    fn topic<'a>(summary: &'a StudentFeedbackSummary, name: &str) -> &'a TopicSummary {
        summary
            .topic_breakdown
            .iter()
            .find(|t| t.topic == name)
            .unwrap()
    }

    #[test]
    fn test_student_with_strong_and_weak_topic() {
        let records = vec![
            record(1, 1, "Algebra", 8.0, 10.0),
            record(1, 2, "Geometry", 2.0, 10.0),
        ];
        let summary = summarize_student(&records).unwrap();

        assert_eq!(summary.student_id, 1);
        assert_eq!(summary.overall_score, 10.0);
        assert_eq!(summary.max_marks, 20.0);
        assert_eq!(summary.overall_percentage, 50);
        assert_eq!(summary.overall_status, RagStatus::Amber);

        let algebra = topic(&summary, "Algebra");
        assert_eq!(algebra.percentage, 80);
        assert_eq!(algebra.status, RagStatus::Green);
        let geometry = topic(&summary, "Geometry");
        assert_eq!(geometry.percentage, 20);
        assert_eq!(geometry.status, RagStatus::Red);

        assert_eq!(summary.best_topic.as_deref(), Some("Algebra"));
        assert_eq!(summary.weakest_topic.as_deref(), Some("Geometry"));
        assert_eq!(summary.weak_topics.len(), 1);
        assert_eq!(summary.weak_topics[0].topic, "Geometry");
    }

    #[test]
    fn test_empty_records_is_no_data() {
        let err = summarize_student(&[]).unwrap_err();
        assert!(err.is_no_data());
    }

    #[test]
    fn test_zero_available_everywhere_is_no_data() {
        let records = vec![record(1, 1, "Algebra", 0.0, 0.0)];
        assert!(summarize_student(&records).unwrap_err().is_no_data());
    }

    #[test]
    fn test_topic_without_available_marks_is_skipped() {
        let records = vec![
            record(1, 1, "Algebra", 3.0, 4.0),
            record(1, 2, "Statistics", 0.0, 0.0),
        ];
        let summary = summarize_student(&records).unwrap();

        assert_eq!(summary.topic_breakdown.len(), 1);
        assert_eq!(summary.topic_breakdown[0].topic, "Algebra");
        assert!(summary.sub_topic_breakdown.iter().all(|s| s.topic != "Statistics"));
        assert_eq!(summary.overall_percentage, 75);
    }

    #[test]
    fn test_topics_are_grouped_and_counted() {
        let records = vec![
            record(1, 1, "Number", 1.0, 2.0),
            record(1, 2, "Algebra", 3.0, 3.0),
            record(1, 3, "Number", 2.0, 2.0),
        ];
        let summary = summarize_student(&records).unwrap();

        let names: Vec<&str> = summary.topic_breakdown.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(names, ["Number", "Algebra"]);
        let number = topic(&summary, "Number");
        assert_eq!(number.question_count, 2);
        assert_eq!(number.total_awarded, 3.0);
        assert_eq!(number.total_available, 4.0);
        assert_eq!(number.percentage, 75);
    }

    #[test]
    fn test_all_green_has_no_weakest_topic() {
        let records = vec![
            record(1, 1, "Algebra", 9.0, 10.0),
            record(1, 2, "Geometry", 7.0, 10.0),
        ];
        let summary = summarize_student(&records).unwrap();

        assert!(summary.weak_topics.is_empty());
        assert_eq!(summary.weakest_topic, None);
        assert_eq!(summary.best_topic.as_deref(), Some("Algebra"));
    }

    #[test]
    fn test_amber_topic_is_weakest_but_not_weak() {
        let records = vec![
            record(1, 1, "Algebra", 9.0, 10.0),
            record(1, 2, "Ratio", 5.0, 10.0),
        ];
        let summary = summarize_student(&records).unwrap();

        assert_eq!(summary.weakest_topic.as_deref(), Some("Ratio"));
        assert!(summary.weak_topics.is_empty());
    }

    #[test]
    fn test_ties_prefer_first_seen_topic() {
        let records = vec![
            record(1, 1, "Probability", 1.0, 4.0),
            record(1, 2, "Algebra", 1.0, 4.0),
            record(1, 3, "Number", 3.0, 4.0),
            record(1, 4, "Geometry", 3.0, 4.0),
        ];
        let summary = summarize_student(&records).unwrap();

        assert_eq!(summary.best_topic.as_deref(), Some("Number"));
        assert_eq!(summary.weakest_topic.as_deref(), Some("Probability"));
    }

    #[test]
    fn test_tied_topics_follow_record_order() {
        // 百分比相同时没有唯一答案：best/weakest 取输入里先出现的主题，
        // 所以打乱顺序只保证无并列时结果不变
        let records = vec![
            record(1, 1, "Ratio", 1.0, 4.0),
            record(1, 2, "Algebra", 1.0, 4.0),
            record(1, 3, "Number", 3.0, 4.0),
            record(1, 4, "Geometry", 3.0, 4.0),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = summarize_student(&records).unwrap();
        let backward = summarize_student(&reversed).unwrap();

        assert_eq!(forward.best_topic.as_deref(), Some("Number"));
        assert_eq!(forward.weakest_topic.as_deref(), Some("Ratio"));
        assert_eq!(backward.best_topic.as_deref(), Some("Geometry"));
        assert_eq!(backward.weakest_topic.as_deref(), Some("Algebra"));

        assert_eq!(forward.overall_percentage, backward.overall_percentage);
        for t in &forward.topic_breakdown {
            assert_eq!(t.percentage, topic(&backward, &t.topic).percentage);
        }
    }

    #[test]
    fn test_permutation_keeps_values_and_changes_display_order() {
        let records = vec![
            record(1, 1, "Algebra", 0.1, 1.0),
            record(1, 2, "Geometry", 0.7, 3.0),
            record(1, 3, "Algebra", 0.2, 1.0),
            record(1, 4, "Number", 2.0, 2.0),
            record(1, 5, "Algebra", 0.3, 1.0),
        ];
        let mut reversed = records.clone();
        reversed.reverse();

        let forward = summarize_student(&records).unwrap();
        let backward = summarize_student(&reversed).unwrap();

        assert_eq!(forward.overall_percentage, backward.overall_percentage);
        assert_eq!(forward.overall_score, backward.overall_score);
        assert_eq!(forward.best_topic, backward.best_topic);
        assert_eq!(forward.weakest_topic, backward.weakest_topic);
        for t in &forward.topic_breakdown {
            let other = topic(&backward, &t.topic);
            assert_eq!(t.percentage, other.percentage);
            assert_eq!(t.status, other.status);
            assert_eq!(t.total_awarded, other.total_awarded);
        }

        let forward_order: Vec<&str> = forward.topic_breakdown.iter().map(|t| t.topic.as_str()).collect();
        let backward_order: Vec<&str> = backward.topic_breakdown.iter().map(|t| t.topic.as_str()).collect();
        assert_eq!(forward_order, ["Algebra", "Geometry", "Number"]);
        assert_eq!(backward_order, ["Algebra", "Number", "Geometry"]);
    }

    #[test]
    fn test_summary_is_deterministic() {
        let records = vec![
            record(1, 1, "Algebra", 2.0, 3.0),
            record(1, 2, "Geometry", 1.0, 5.0),
        ];
        assert_eq!(
            summarize_student(&records).unwrap(),
            summarize_student(&records).unwrap()
        );
    }

    #[test]
    fn test_percentages_stay_in_range() {
        let records: Vec<AnswerRecord> = (0..30)
            .map(|i| {
                let available = f64::from(i % 7 + 1);
                let awarded = f64::from(i % 3).min(available);
                record(1, i64::from(i), ["A", "B", "C", "D"][(i % 4) as usize], awarded, available)
            })
            .collect();
        let summary = summarize_student(&records).unwrap();

        assert!(summary.overall_percentage <= 100);
        assert!(summary.topic_breakdown.iter().all(|t| t.percentage <= 100));
        assert!(summary.sub_topic_breakdown.iter().all(|s| s.percentage <= 100));
    }

    #[test]
    fn test_sub_topic_breakdown() {
        let records = vec![
            with_sub_topic(record(1, 1, "Algebra", 1.0, 4.0), "Quadratics"),
            with_sub_topic(record(1, 2, "Algebra", 4.0, 4.0), "Linear equations"),
            with_sub_topic(record(1, 3, "Algebra", 1.0, 4.0), "Quadratics"),
            with_sub_topic(record(1, 4, "Geometry", 2.0, 2.0), "  "),
        ];
        let summary = summarize_student(&records).unwrap();

        let names: Vec<(&str, &str)> = summary
            .sub_topic_breakdown
            .iter()
            .map(|s| (s.topic.as_str(), s.sub_topic.as_str()))
            .collect();
        assert_eq!(
            names,
            [
                ("Algebra", "Quadratics"),
                ("Algebra", "Linear equations"),
                ("Geometry", "Geometry"),
            ]
        );
        let quadratics = &summary.sub_topic_breakdown[0];
        assert_eq!(quadratics.question_ids, vec![1, 3]);
        assert_eq!(quadratics.percentage, 25);
        assert_eq!(quadratics.status, RagStatus::Red);
    }

    #[test]
    fn test_class_average_for_shared_topic() {
        let per_student = vec![
            (1, vec![record(1, 1, "Algebra", 9.0, 10.0)]),
            (2, vec![record(2, 1, "Algebra", 3.0, 10.0)]),
        ];
        let summary = summarize_assignment(&per_student).unwrap();

        assert_eq!(summary.graded_students, 2);
        assert_eq!(summary.average_score, 60);
        assert_eq!(summary.average_status, RagStatus::Amber);
        let algebra = &summary.topic_breakdown[0];
        assert_eq!(algebra.topic, "Algebra");
        assert_eq!(algebra.average_percentage, 60);
        assert_eq!(algebra.status, RagStatus::Amber);
        assert_eq!(algebra.students_attempted, 2);
        assert_eq!(algebra.students_struggling, 1);
    }

    #[test]
    fn test_missing_topic_is_not_counted_as_zero() {
        let per_student = vec![
            (
                1,
                vec![
                    record(1, 1, "Algebra", 5.0, 10.0),
                    record(1, 2, "Geometry", 8.0, 10.0),
                ],
            ),
            (2, vec![record(2, 1, "Algebra", 7.0, 10.0)]),
        ];
        let summary = summarize_assignment(&per_student).unwrap();

        let geometry = summary
            .topic_breakdown
            .iter()
            .find(|t| t.topic == "Geometry")
            .unwrap();
        assert_eq!(geometry.average_percentage, 80);
        assert_eq!(geometry.students_attempted, 1);
        assert_eq!(geometry.students_struggling, 0);
    }

    #[test]
    fn test_empty_assignment_is_no_data() {
        assert!(summarize_assignment(&[]).unwrap_err().is_no_data());
        let only_empty = vec![(1, Vec::new()), (2, Vec::new())];
        assert!(summarize_assignment(&only_empty).unwrap_err().is_no_data());
    }

    #[test]
    fn test_students_without_records_are_excluded() {
        let per_student = vec![
            (1, vec![record(1, 1, "Algebra", 10.0, 10.0)]),
            (2, Vec::new()),
        ];
        let summary = summarize_assignment(&per_student).unwrap();

        assert_eq!(summary.graded_students, 1);
        assert_eq!(summary.average_score, 100);
        assert_eq!(summary.student_feedback.len(), 1);
    }

    #[test]
    fn test_student_order_only_changes_display_order() {
        let a = (1, vec![record(1, 1, "Algebra", 9.0, 10.0), record(1, 2, "Geometry", 1.0, 10.0)]);
        let b = (2, vec![record(2, 1, "Number", 4.0, 10.0), record(2, 2, "Algebra", 2.0, 10.0)]);

        let forward = summarize_assignment(&[a.clone(), b.clone()]).unwrap();
        let backward = summarize_assignment(&[b, a]).unwrap();

        assert_eq!(forward.average_score, backward.average_score);
        assert_eq!(forward.graded_students, backward.graded_students);
        assert_eq!(forward.topic_breakdown.len(), backward.topic_breakdown.len());
        for t in &forward.topic_breakdown {
            let other = backward
                .topic_breakdown
                .iter()
                .find(|o| o.topic == t.topic)
                .unwrap();
            assert_eq!(t, other);
        }
        assert_eq!(forward.student_feedback[0].student_id, 1);
        assert_eq!(backward.student_feedback[0].student_id, 2);
    }

    #[test]
    fn test_assignment_summary_is_idempotent() {
        let per_student = vec![
            (1, vec![record(1, 1, "Algebra", 2.0, 5.0)]),
            (2, vec![record(2, 1, "Algebra", 5.0, 5.0)]),
        ];
        assert_eq!(
            summarize_assignment(&per_student).unwrap(),
            summarize_assignment(&per_student).unwrap()
        );
    }

    fn in_assignment(mut r: AnswerRecord, assignment_id: i64) -> AnswerRecord {
        r.assignment_id = assignment_id;
        r
    }

    #[test]
    fn test_mastery_averages_assignment_percentages() {
        // 作业 10 得 9/10，作业 20 得 1/2；按分数合计是 10/12，按作业平均是 (90+50)/2
        let records = vec![
            in_assignment(record(1, 1, "Algebra", 9.0, 10.0), 10),
            in_assignment(record(1, 2, "Geometry", 1.0, 2.0), 20),
        ];
        let mastery = summarize_mastery(&records).unwrap();

        assert_eq!(mastery.student_id, 1);
        assert_eq!(mastery.assignments_graded, 2);
        assert_eq!(mastery.average_score, 70);
        assert_eq!(mastery.average_status, RagStatus::Green);
        assert_eq!(mastery.assignment_scores[0].assignment_id, 10);
        assert_eq!(mastery.assignment_scores[0].percentage, 90);
        assert_eq!(mastery.assignment_scores[1].percentage, 50);
        assert_eq!(mastery.topic_mastery.overall_percentage, 83);
        assert_eq!(mastery.topic_mastery.best_topic.as_deref(), Some("Algebra"));
        assert_eq!(mastery.topic_mastery.weakest_topic.as_deref(), Some("Geometry"));
    }

    #[test]
    fn test_mastery_merges_topic_across_assignments() {
        let records = vec![
            in_assignment(record(1, 1, "Algebra", 1.0, 4.0), 10),
            in_assignment(record(1, 1, "Algebra", 3.0, 4.0), 20),
        ];
        let mastery = summarize_mastery(&records).unwrap();

        assert_eq!(mastery.topic_mastery.topic_breakdown.len(), 1);
        assert_eq!(topic(&mastery.topic_mastery, "Algebra").question_count, 2);
        assert_eq!(topic(&mastery.topic_mastery, "Algebra").percentage, 50);
    }

    #[test]
    fn test_mastery_skips_assignments_without_marks() {
        let records = vec![
            in_assignment(record(1, 1, "Algebra", 0.0, 0.0), 10),
            in_assignment(record(1, 2, "Ratio", 3.0, 10.0), 20),
        ];
        let mastery = summarize_mastery(&records).unwrap();
        assert_eq!(mastery.assignments_graded, 1);
        assert_eq!(mastery.average_score, 30);
        assert_eq!(mastery.average_status, RagStatus::Red);

        assert!(summarize_mastery(&[]).unwrap_err().is_no_data());
        let empty = vec![in_assignment(record(1, 1, "Algebra", 0.0, 0.0), 10)];
        assert!(summarize_mastery(&empty).unwrap_err().is_no_data());
    }

    #[test]
    fn test_group_records_by_student_keeps_first_seen_order() {
        let records = vec![
            record(7, 1, "Algebra", 1.0, 1.0),
            record(3, 1, "Algebra", 0.0, 1.0),
            record(7, 2, "Number", 1.0, 2.0),
        ];
        let grouped = group_records_by_student(records);

        assert_eq!(grouped.len(), 2);
        assert_eq!(grouped[0].0, 7);
        assert_eq!(grouped[0].1.len(), 2);
        assert_eq!(grouped[1].0, 3);
    }
}
