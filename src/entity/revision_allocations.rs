//! 复习清单分配实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "revision_allocations")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub revision_list_id: i64,
    pub student_id: i64,
    pub status: String,
    pub started_at: Option<i64>,
    pub completed_at: Option<i64>,
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
        belongs_to = "super::profiles::Entity",
        from = "Column::StudentId",
        to = "super::profiles::Column::Id"
    )]
    Student,
    #[sea_orm(has_many = "super::revision_progress::Entity")]
    Progress,
}

impl Related<super::revision_lists::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevisionList.def()
    }
}

impl Related<super::revision_progress::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Progress.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    pub fn into_revision_allocation(
        self,
        completed_question_ids: Vec<i64>,
    ) -> crate::models::revision_lists::entities::RevisionAllocation {
        use crate::models::revision_lists::entities::{RevisionAllocation, RevisionStatus};

        RevisionAllocation {
            id: self.id,
            revision_list_id: self.revision_list_id,
            student_id: self.student_id,
            status: self
                .status
                .parse::<RevisionStatus>()
                .unwrap_or(RevisionStatus::Pending),
            started_at: self.started_at.map(super::timestamp_to_datetime),
            completed_at: self.completed_at.map(super::timestamp_to_datetime),
            completed_question_ids,
        }
    }
}
