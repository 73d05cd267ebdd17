//! SeaORM 存储实现
//!
//! 统一的数据库存储层，支持 SQLite、PostgreSQL 和 MySQL。

mod answer_records;
mod assignments;
mod class_members;
mod classes;
mod profiles;
mod questions;
mod revision_lists;
mod submissions;

use crate::config::{AppConfig, DatabaseConfig};
use crate::errors::{Result, TutorError};
use migration::{Migrator, MigratorTrait};
use sea_orm::{ConnectOptions, Database, DatabaseConnection};
use std::time::Duration;
use tracing::info;

/// SeaORM 存储实现
#[derive(Clone)]
pub struct SeaOrmStorage {
    pub(crate) db: DatabaseConnection,
}

impl SeaOrmStorage {
    /// 使用全局配置创建存储实例
    pub async fn new_async() -> Result<Self> {
        Self::connect(&AppConfig::get().database).await
    }

    /// 连接数据库并运行迁移
    pub async fn connect(config: &DatabaseConfig) -> Result<Self> {
        let db_url = Self::build_database_url(&config.url)?;

        // 根据数据库类型选择连接方式
        let db = if db_url.starts_with("sqlite:") {
            Self::connect_sqlite(&db_url, config).await?
        } else {
            Self::connect_generic(&db_url, config).await?
        };

        Migrator::up(&db, None)
            .await
            .map_err(|e| TutorError::database_operation(format!("数据库迁移失败: {e}")))?;

        info!("SeaORM 存储初始化完成，数据库: {}", Self::redact_url(&db_url));

        Ok(Self { db })
    }

    /// SQLite 专用连接（WAL + pragma 优化）
    async fn connect_sqlite(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        use sea_orm::SqlxSqliteConnector;
        use sea_orm::sqlx::sqlite::{
            SqliteConnectOptions, SqliteJournalMode, SqlitePoolOptions, SqliteSynchronous,
        };
        use std::str::FromStr;

        let opt = SqliteConnectOptions::from_str(url)
            .map_err(|e| TutorError::database_config(format!("SQLite URL 解析失败: {e}")))?
            .create_if_missing(true)
            .foreign_keys(true)
            .journal_mode(SqliteJournalMode::Wal)
            .synchronous(SqliteSynchronous::Normal)
            .busy_timeout(Duration::from_secs(5))
            .pragma("cache_size", "-64000")
            .pragma("temp_store", "memory");

        let pool = SqlitePoolOptions::new()
            .max_connections(config.pool_size.max(1))
            .min_connections(1)
            .test_before_acquire(true)
            .acquire_timeout(Duration::from_secs(config.timeout))
            .connect_with(opt)
            .await
            .map_err(|e| TutorError::database_connection(format!("SQLite 连接失败: {e}")))?;

        Ok(SqlxSqliteConnector::from_sqlx_sqlite_pool(pool))
    }

    /// 通用连接（PostgreSQL、MySQL 等）
    async fn connect_generic(url: &str, config: &DatabaseConfig) -> Result<DatabaseConnection> {
        let mut opt = ConnectOptions::new(url);
        opt.max_connections(config.pool_size)
            .min_connections(1)
            .connect_timeout(Duration::from_secs(config.timeout))
            .acquire_timeout(Duration::from_secs(config.timeout))
            .idle_timeout(Duration::from_secs(600))
            .max_lifetime(Duration::from_secs(1800))
            .sqlx_logging(false);

        Database::connect(opt)
            .await
            .map_err(|e| TutorError::database_connection(format!("无法连接到数据库: {e}")))
    }

    /// 从 URL 自动推断数据库类型并构建连接 URL
    fn build_database_url(url: &str) -> Result<String> {
        if url.starts_with("sqlite:") {
            Ok(url.to_string())
        } else if url == ":memory:" {
            Ok("sqlite::memory:".to_string())
        } else if url.ends_with(".db") || url.ends_with(".sqlite") {
            Ok(format!("sqlite://{url}?mode=rwc"))
        } else if url.starts_with("postgres://")
            || url.starts_with("postgresql://")
            || url.starts_with("mysql://")
            || url.starts_with("mariadb://")
        {
            Ok(url.to_string())
        } else {
            Err(TutorError::database_config(format!(
                "无法从 URL 推断数据库类型: {url}. 支持: sqlite://, postgres://, mysql://, 或 .db/.sqlite 文件路径"
            )))
        }
    }

    /// 日志中隐藏连接串里的密码
    fn redact_url(url: &str) -> String {
        match (url.find("://"), url.rfind('@')) {
            (Some(scheme_end), Some(at)) if at > scheme_end => {
                format!("{}://***{}", &url[..scheme_end], &url[at..])
            }
            _ => url.to_string(),
        }
    }
}

// Storage trait 实现
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
use crate::storage::Storage;
use async_trait::async_trait;

#[async_trait]
impl Storage for SeaOrmStorage {
    // 用户资料
    async fn get_profile_by_auth_uid(&self, auth_uid: &str) -> Result<Option<Profile>> {
        self.get_profile_by_auth_uid_impl(auth_uid).await
    }

    async fn get_profile_by_id(&self, id: i64) -> Result<Option<Profile>> {
        self.get_profile_by_id_impl(id).await
    }

    async fn get_profiles_by_ids(&self, ids: &[i64]) -> Result<Vec<Profile>> {
        self.get_profiles_by_ids_impl(ids).await
    }

    async fn create_profile(&self, profile: CreateProfileRequest) -> Result<Profile> {
        self.create_profile_impl(profile).await
    }

    async fn update_profile(
        &self,
        id: i64,
        update: UpdateProfileRequest,
    ) -> Result<Option<Profile>> {
        self.update_profile_impl(id, update).await
    }

    // 班级
    async fn create_class(&self, class: CreateClassRequest) -> Result<Class> {
        self.create_class_impl(class).await
    }

    async fn get_class_by_id(&self, class_id: i64) -> Result<Option<Class>> {
        self.get_class_by_id_impl(class_id).await
    }

    async fn get_class_by_code(&self, invite_code: &str) -> Result<Option<Class>> {
        self.get_class_by_code_impl(invite_code).await
    }

    async fn list_classes_with_pagination(
        &self,
        query: ClassListQuery,
    ) -> Result<ClassListResponse> {
        self.list_classes_with_pagination_impl(query).await
    }

    async fn update_class(
        &self,
        class_id: i64,
        update: UpdateClassRequest,
    ) -> Result<Option<Class>> {
        self.update_class_impl(class_id, update).await
    }

    async fn delete_class(&self, class_id: i64) -> Result<bool> {
        self.delete_class_impl(class_id).await
    }

    // 班级成员
    async fn join_class(&self, class_id: i64, student_id: i64) -> Result<ClassMember> {
        self.join_class_impl(class_id, student_id).await
    }

    async fn get_class_member(
        &self,
        class_id: i64,
        student_id: i64,
    ) -> Result<Option<ClassMember>> {
        self.get_class_member_impl(class_id, student_id).await
    }

    async fn count_class_members(&self, class_id: i64) -> Result<i64> {
        self.count_class_members_impl(class_id).await
    }

    async fn list_class_members_with_pagination(
        &self,
        class_id: i64,
        query: PaginationQuery,
    ) -> Result<ClassMemberListResponse> {
        self.list_class_members_with_pagination_impl(class_id, query)
            .await
    }

    async fn remove_class_member(&self, class_id: i64, student_id: i64) -> Result<bool> {
        self.remove_class_member_impl(class_id, student_id).await
    }

    // 题库
    async fn create_question(&self, question: CreateQuestionRequest) -> Result<Question> {
        self.create_question_impl(question).await
    }

    async fn get_question_by_id(&self, question_id: i64) -> Result<Option<Question>> {
        self.get_question_by_id_impl(question_id).await
    }

    async fn get_questions_by_ids(&self, question_ids: &[i64]) -> Result<Vec<Question>> {
        self.get_questions_by_ids_impl(question_ids).await
    }

    async fn list_questions_with_pagination(
        &self,
        query: QuestionListQuery,
    ) -> Result<QuestionListResponse> {
        self.list_questions_with_pagination_impl(query).await
    }

    async fn list_questions_by_topics(&self, topics: &[String]) -> Result<Vec<Question>> {
        self.list_questions_by_topics_impl(topics).await
    }

    async fn update_question(
        &self,
        question_id: i64,
        update: UpdateQuestionRequest,
    ) -> Result<Option<Question>> {
        self.update_question_impl(question_id, update).await
    }

    async fn delete_question(&self, question_id: i64) -> Result<bool> {
        self.delete_question_impl(question_id).await
    }

    // 作业
    async fn create_assignment(&self, assignment: CreateAssignmentRequest) -> Result<Assignment> {
        self.create_assignment_impl(assignment).await
    }

    async fn get_assignment_by_id(&self, assignment_id: i64) -> Result<Option<Assignment>> {
        self.get_assignment_by_id_impl(assignment_id).await
    }

    async fn list_assignments_with_pagination(
        &self,
        query: AssignmentListQuery,
    ) -> Result<AssignmentListResponse> {
        self.list_assignments_with_pagination_impl(query).await
    }

    async fn update_assignment(
        &self,
        assignment_id: i64,
        update: UpdateAssignmentRequest,
    ) -> Result<Option<Assignment>> {
        self.update_assignment_impl(assignment_id, update).await
    }

    async fn delete_assignment(&self, assignment_id: i64) -> Result<bool> {
        self.delete_assignment_impl(assignment_id).await
    }

    async fn set_assignment_questions(
        &self,
        assignment_id: i64,
        question_ids: &[i64],
    ) -> Result<Vec<AssignmentQuestion>> {
        self.set_assignment_questions_impl(assignment_id, question_ids)
            .await
    }

    async fn list_assignment_questions(
        &self,
        assignment_id: i64,
    ) -> Result<Vec<AssignmentQuestion>> {
        self.list_assignment_questions_impl(assignment_id).await
    }

    async fn set_feedback_released(
        &self,
        assignment_id: i64,
        released: bool,
    ) -> Result<Option<Assignment>> {
        self.set_feedback_released_impl(assignment_id, released)
            .await
    }

    // 评分记录
    async fn save_answer_records(
        &self,
        assignment_id: i64,
        student_id: i64,
        graded_by: i64,
        records: Vec<AnswerRecord>,
    ) -> Result<usize> {
        self.save_answer_records_impl(assignment_id, student_id, graded_by, records)
            .await
    }

    async fn list_answer_records(&self, assignment_id: i64) -> Result<Vec<GradedAnswer>> {
        self.list_answer_records_impl(assignment_id).await
    }

    async fn list_student_answer_records(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Vec<AnswerRecord>> {
        self.list_student_answer_records_impl(assignment_id, student_id)
            .await
    }

    async fn list_released_answer_records_for_student(
        &self,
        student_id: i64,
    ) -> Result<Vec<AnswerRecord>> {
        self.list_released_answer_records_for_student_impl(student_id)
            .await
    }

    // 学生提交
    async fn create_submission(&self, submission: CreateSubmissionRequest) -> Result<Submission> {
        self.create_submission_impl(submission).await
    }

    async fn get_submission(
        &self,
        assignment_id: i64,
        student_id: i64,
    ) -> Result<Option<Submission>> {
        self.get_submission_impl(assignment_id, student_id).await
    }

    async fn list_submissions(&self, assignment_id: i64) -> Result<Vec<Submission>> {
        self.list_submissions_impl(assignment_id).await
    }

    // 复习清单
    async fn create_revision_list(
        &self,
        list: CreateRevisionListRequest,
    ) -> Result<RevisionListCreatedResponse> {
        self.create_revision_list_impl(list).await
    }

    async fn get_revision_list_by_id(
        &self,
        revision_list_id: i64,
    ) -> Result<Option<RevisionList>> {
        self.get_revision_list_by_id_impl(revision_list_id).await
    }

    async fn get_revision_list_by_assignment(
        &self,
        assignment_id: i64,
    ) -> Result<Option<RevisionList>> {
        self.get_revision_list_by_assignment_impl(assignment_id)
            .await
    }

    async fn delete_revision_list(&self, revision_list_id: i64) -> Result<bool> {
        self.delete_revision_list_impl(revision_list_id).await
    }

    async fn list_revision_list_questions(
        &self,
        revision_list_id: i64,
    ) -> Result<Vec<RevisionListQuestion>> {
        self.list_revision_list_questions_impl(revision_list_id)
            .await
    }

    async fn get_revision_allocation(
        &self,
        revision_list_id: i64,
        student_id: i64,
    ) -> Result<Option<RevisionAllocation>> {
        self.get_revision_allocation_impl(revision_list_id, student_id)
            .await
    }

    async fn list_revision_allocations(
        &self,
        revision_list_id: i64,
    ) -> Result<Vec<RevisionAllocation>> {
        self.list_revision_allocations_impl(revision_list_id).await
    }

    async fn list_student_revision_lists(
        &self,
        student_id: i64,
    ) -> Result<Vec<StudentRevisionListItem>> {
        self.list_student_revision_lists_impl(student_id).await
    }

    async fn update_revision_progress(
        &self,
        revision_list_id: i64,
        student_id: i64,
        question_id: i64,
        completed: bool,
    ) -> Result<Option<RevisionAllocation>> {
        self.update_revision_progress_impl(revision_list_id, student_id, question_id, completed)
            .await
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::SeaOrmStorage;
    use crate::config::DatabaseConfig;

    /// 每个测试一个独立的内存数据库
    pub(crate) async fn memory_storage() -> SeaOrmStorage {
        let config = DatabaseConfig {
            url: ":memory:".to_string(),
            pool_size: 1,
            timeout: 5,
        };
        SeaOrmStorage::connect(&config)
            .await
            .expect("in-memory sqlite storage")
    }
}
