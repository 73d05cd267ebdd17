//! 预导入模块，方便使用

pub use super::answer_records::{
    ActiveModel as AnswerRecordActiveModel, Entity as AnswerRecords, Model as AnswerRecordModel,
};
pub use super::assignment_questions::{
    ActiveModel as AssignmentQuestionActiveModel, Entity as AssignmentQuestions,
    Model as AssignmentQuestionModel,
};
pub use super::assignments::{
    ActiveModel as AssignmentActiveModel, Entity as Assignments, Model as AssignmentModel,
};
pub use super::class_members::{
    ActiveModel as ClassMemberActiveModel, Entity as ClassMembers, Model as ClassMemberModel,
};
pub use super::classes::{ActiveModel as ClassActiveModel, Entity as Classes, Model as ClassModel};
pub use super::profiles::{
    ActiveModel as ProfileActiveModel, Entity as Profiles, Model as ProfileModel,
};
pub use super::questions::{
    ActiveModel as QuestionActiveModel, Entity as Questions, Model as QuestionModel,
};
pub use super::revision_allocations::{
    ActiveModel as RevisionAllocationActiveModel, Entity as RevisionAllocations,
    Model as RevisionAllocationModel,
};
pub use super::revision_list_questions::{
    ActiveModel as RevisionListQuestionActiveModel, Entity as RevisionListQuestions,
    Model as RevisionListQuestionModel,
};
pub use super::revision_lists::{
    ActiveModel as RevisionListActiveModel, Entity as RevisionLists, Model as RevisionListModel,
};
pub use super::revision_progress::{
    ActiveModel as RevisionProgressActiveModel, Entity as RevisionProgress,
    Model as RevisionProgressModel,
};
pub use super::submissions::{
    ActiveModel as SubmissionActiveModel, Entity as Submissions, Model as SubmissionModel,
};
