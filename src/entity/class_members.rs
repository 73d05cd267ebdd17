//! 班级成员实体

use sea_orm::entity::prelude::*;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel)]
#[sea_orm(table_name = "class_members")]
pub struct Model {
    #[sea_orm(primary_key)]
    pub id: i64,
    pub class_id: i64,
    pub student_id: i64,
    pub joined_at: i64,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::classes::Entity",
        from = "Column::ClassId",
        to = "super::classes::Column::Id"
    )]
    Class,
    #[sea_orm(
        belongs_to = "super::profiles::Entity",
        from = "Column::StudentId",
        to = "super::profiles::Column::Id"
    )]
    Student,
}

impl Related<super::classes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Class.def()
    }
}

impl Related<super::profiles::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Student.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}

impl Model {
    /// 转为业务模型，学生资料可选（列表查询时一并带出）
    pub fn into_class_member(
        self,
        student: Option<super::profiles::Model>,
    ) -> crate::models::class_members::entities::ClassMember {
        use crate::models::class_members::entities::ClassMember;

        let (full_name, email) = match student {
            Some(p) => (p.full_name, Some(p.email)),
            None => (None, None),
        };

        ClassMember {
            id: self.id,
            class_id: self.class_id,
            student_id: self.student_id,
            full_name,
            email,
            joined_at: super::timestamp_to_datetime(self.joined_at),
        }
    }
}
