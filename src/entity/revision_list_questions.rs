//! 复习清单与题目的关联

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "revision_list_questions")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub revision_list_id: i64,
    pub question_id: i64,
    pub position: i32,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::revision_lists::Entity",
        from = "Column::RevisionListId",
        to = "super::revision_lists::Column::Id"
    )]
    RevisionList,
    #[sea_orm(
        belongs_to = "super::questions::Entity",
        from = "Column::QuestionId",
        to = "super::questions::Column::Id"
    )]
    Question,
}

impl Related<super::revision_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevisionList.def()
    }
}

impl Related<super::questions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Question.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
