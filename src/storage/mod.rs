use std::sync::Arc;

use crate::models::{
    answer_records::entities::{AnswerRecord, GradedAnswer},
    assignments::{
        entities::{Assignment, AssignmentQuestion},
        requests::{AssignmentListQuery, CreateAssignmentRequest, UpdateAssignmentRequest},
        responses::AssignmentListResponse,
    },
    class_members::{entities::ClassMember, responses::ClassMemberListResponse},
    classes::{
        entities::Class,
        requests::{ClassListQuery, CreateClassRequest, UpdateClassRequest},
        responses::ClassListResponse,
    },
    common::PaginationQuery,
    profiles::{
        entities::Profile,
        requests::{CreateProfileRequest, UpdateProfileRequest},
    },
    questions::{
        entities::Question,
        requests::{CreateQuestionRequest, QuestionListQuery, UpdateQuestionRequest},
        responses::QuestionListResponse,
    },
    revision_lists::{
        entities::{RevisionAllocation, RevisionList, RevisionListQuestion},
        requests::CreateRevisionListRequest,
        responses::{RevisionListCreatedResponse, StudentRevisionListItem},
    },
    submissions::{entities::Submission, requests::CreateSubmissionRequest},
};

use crate::errors::Result;

pub mod sea_orm_storage;

#[async_trait::async_trait]
pub trait Storage: Send + Sync {
    /// 用户资料
    // 通过认证服务 UUID 获取资料
    async fn get_profile_by_auth_uid(&self, auth_uid: &str) -> Result<Option<Profile>>;
    // 通过ID获取资料
    async fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>>;
    // 批量获取资料
    async fn get_profiles_by_ids(&self, ids: &[i64]) -> Result<Vec<Profile>>;
    // 创建资料（首次访问时）
    async fn create_profile(&self, profile: CreateProfileRequest) -> Result<Profile>;
    // 更新资料
    async fn update_profile(&self, id: i64, update: UpdateProfileRequest)
    -> Result<Option<Profile>>;

    /// 班级管理
    // 创建班级，teacher_id 必须已设置
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class>;
    // 通过ID获取班级信息
    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>>;
    // 通过邀请码获取班级信息
    async fn get_class_by_code(&self, invite_code: &str) -> Result<Option<Class>>;
    // 列出班级
    async fn list_classes_with_pagination(&self, query: ClassListQuery)
    -> Result<ClassListResponse>;
    // 更新班级信息
    async fn update_class(&self, class_id: i64, update: UpdateClassRequest)
    -> Result<Option<Class>>;
    // 删除班级
    async fn delete_class(&self, class_id: i64) -> Result<bool>;

    /// 班级成员
    // 学生加入班级
    async fn join_class(&self, class_id: i64, student_id: i64) -> Result<ClassMember>;
    // 查询学生是否在班级中
    async fn get_class_member(&self, class_id: i64, student_id: i64)
    -> Result<Option<ClassMember>>;
    // 班级成员数量
    async fn count_class_members(&self, class_id: i64) -> Result<i64>;
    // 列出班级成员
    async fn list_class_members_with_pagination(
        &self,
        class_id: i64,
        query: PaginationQuery,
    ) -> Result<ClassMemberListResponse>;
    // 移除班级成员
    async fn remove_class_member(&self, class_id: i64, student_id: i64) -> Result<bool>;

    /// 题库
    async fn create_question(&self, question: CreateQuestionRequest) -> Result<Question>;
    async fn get_question_by_id(&self, question_id: i64) -> Result<Option<Question>>;
    // 按给定 ID 批量获取（不保证顺序）
    async fn get_questions_by_ids(&self, question_ids: &[i64]) -> Result<Vec<Question>>;
    async fn list_questions_with_pagination(
        &self,
        query: QuestionListQuery,
    ) -> Result<QuestionListResponse>;
    // 列出若干主题下的全部题目（用于挑选复习题）
    async fn list_questions_by_topics(&self, topics: &[String]) -> Result<Vec<Question>>;
    async fn update_question(
        &self,
        question_id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>>;
    async fn delete_question(&self, question_id: i64) -> Result<bool>;

    /// 作业
    // 创建作业，并按顺序关联题目
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment>;
    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>>;
    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse>;
    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>>;
    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool>;
    // 整体替换作业题目，position 按给定顺序从 1 开始
    async fn set_assignment_questions(
        &self,
        assignment_id: i64,
        question_ids: &[i64],
    ) -> Result<Vec<AssignmentQuestion>>;
    // 作业题目，按 position 排序
    async fn list_assignment_questions(&self, assignment_id: i64)
    -> Result<Vec<AssignmentQuestion>>;
    // 设置学生能否查看反馈
    async fn set_feedback_released(
        &self,
        assignment_id: i64,
        released: bool,
    ) -> Result<Option<Assignment>>;

    /// 评分记录
    // 保存一名学生的评分，已有记录原地覆盖；整体在一个事务中完成
    async fn save_answer_records(
        &self,
        assignment_id: i64,
        student_id: i64,
        graded_by: i64,
        records: Vec<AnswerRecord>,
    ) -> Result<usize>;
    // 作业下的全部评分记录
    async fn list_answer_records(&self, assignment_id: i64) -> Result<Vec<GradedAnswer>>;
    // 一名学生在作业下的评分记录
    async fn list_student_answer_records(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<AnswerRecord>>;
    // 学生在所有已发布反馈的作业下的评分记录
    async fn list_released_answer_records_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<AnswerRecord>>;

    /// 学生提交
    // 创建提交，重复提交返回 Conflict
    async fn create_submission(&self, submission: CreateSubmissionRequest) -> Result<Submission>;
    async fn get_submission(&self, assignment_id: i64, student_id: i64)
    -> Result<Option<Submission>>;
    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>>;

    /// 复习清单
    // 创建清单并分配给班级全部学生，每份作业最多一份
    async fn create_revision_list(
        &self,
        list: CreateRevisionListRequest,
    ) -> Result<RevisionListCreatedResponse>;
    async fn get_revision_list_by_id(&self, revision_list_id: i64)
    -> Result<Option<RevisionList>>;
    async fn get_revision_list_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<RevisionList>>;
    async fn delete_revision_list(&self, revision_list_id: i64) -> Result<bool>;
    // 清单题目，按 position 排序
    async fn list_revision_list_questions(
        &self,
        revision_list_id: i64,
    ) -> Result<Vec<RevisionListQuestion>>;
    async fn get_revision_allocation(
        &self,
        revision_list_id: i64,
        student_id: i64,
    ) -> Result<Option<RevisionAllocation>>;
    async fn list_revision_allocations(
        &self,
        revision_list_id: i64,
    ) -> Result<Vec<RevisionAllocation>>;
    async fn list_student_revision_lists(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentRevisionListItem>>;
    // 标记一道题完成与否，没有分配时返回 None
    async fn update_revision_progress(
        &self,
        revision_list_id: i64,
        student_id: i64,
        question_id: i64,
        completed: bool,
    ) -> Result<Option<RevisionAllocation>>;
}

pub async fn create_storage() -> Result<Arc<dyn Storage>> {
    let storage = sea_orm_storage::SeaOrmStorage::new_async().await?;
    Ok(Arc::new(storage))
}
