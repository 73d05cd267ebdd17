//! 评分记录实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "answer_records")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub assignment_id: i64,
    pub student_id: i64,
    pub question_id: i64,
    pub topic: String,
    pub sub_topic: Option<String>,
    pub marks_awarded: f64,
    pub marks_available: f64,
    pub graded_by: i64,
    pub graded_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::assignments::Entity",
        from = "Column::AssignmentId",
        to = "super::assignments::Column::Id"
    )]
    Assignment,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::StudentId",
        to = "super::profiles::Column::Id"
    )]
    Student,
}

impl Related<super::assignments::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Assignment.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_answer_record(self) -> crate::models::answer_records::entities::AnswerRecord {
        use crate::models::answer_records::entities::AnswerRecord;

        AnswerRecord {
            student_id: self.student_id,
            assignment_id: self.assignment_id,
            question_id: self.question_id,
            topic: self.topic,
            sub_topic: self.sub_topic,
            marks_awarded: self.marks_awarded,
            marks_available: self.marks_available,
        }
    }

    pub fn into_graded_answer(self) -> crate::models::answer_records::entities::GradedAnswer {
        use crate::models::answer_records::entities::GradedAnswer;

        let id = self.id;
        let graded_by = self.graded_by;
        let graded_at = super::timestamp_to_datetime(self.graded_at);
        GradedAnswer {
            id,
            record: self.into_answer_record(),
            graded_by,
            graded_at,
        }
    }
}
