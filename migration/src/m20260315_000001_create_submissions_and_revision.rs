use sea_orm_migration::prelude::*;

#[derive(DeriveMigrationName)]
pub struct Migration;

fn id_col<T: IntoIden>(iden: T) -> ColumnDef {
    ColumnDef::new(iden)
        .big_integer()
        .not_null()
        .auto_increment()
        .primary_key()
        .to_owned()
}

#[async_trait::async_trait]
impl MigrationTrait for Migration {
    async fn up(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        // ==================== 学生提交表 ====================
        manager
            .create_table(
                Table::create()
                    .table(Submissions::Table)
                    .if_not_exists()
                    .col(id_col(Submissions::Id))
                    .col(
                        ColumnDef::new(Submissions::AssignmentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::StudentId).big_integer().not_null())
                    // JSON 数组：[{question_id, answer}]
                    .col(ColumnDef::new(Submissions::Answers).text().not_null())
                    .col(ColumnDef::new(Submissions::Status).string().not_null())
                    .col(
                        ColumnDef::new(Submissions::SubmittedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .col(ColumnDef::new(Submissions::GradedAt).big_integer().null())
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(Submissions::Table, Submissions::StudentId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 复习清单 ====================
        manager
            .create_table(
                Table::create()
                    .table(RevisionLists::Table)
                    .if_not_exists()
                    .col(id_col(RevisionLists::Id))
                    .col(
                        ColumnDef::new(RevisionLists::AssignmentId)
                            .big_integer()
                            .not_null()
                            .unique_key(),
                    )
                    .col(ColumnDef::new(RevisionLists::Title).string().not_null())
                    .col(ColumnDef::new(RevisionLists::Description).text().null())
                    .col(
                        ColumnDef::new(RevisionLists::CreatedBy)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevisionLists::CreatedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RevisionLists::Table, RevisionLists::AssignmentId)
                            .to(Assignments::Table, Assignments::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RevisionLists::Table, RevisionLists::CreatedBy)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RevisionListQuestions::Table)
                    .if_not_exists()
                    .col(id_col(RevisionListQuestions::Id))
                    .col(
                        ColumnDef::new(RevisionListQuestions::RevisionListId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevisionListQuestions::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevisionListQuestions::Position)
                            .integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                RevisionListQuestions::Table,
                                RevisionListQuestions::RevisionListId,
                            )
                            .to(RevisionLists::Table, RevisionLists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                RevisionListQuestions::Table,
                                RevisionListQuestions::QuestionId,
                            )
                            .to(Questions::Table, Questions::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // 分配给学生的复习清单及进度
        manager
            .create_table(
                Table::create()
                    .table(RevisionAllocations::Table)
                    .if_not_exists()
                    .col(id_col(RevisionAllocations::Id))
                    .col(
                        ColumnDef::new(RevisionAllocations::RevisionListId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevisionAllocations::StudentId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevisionAllocations::Status)
                            .string()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevisionAllocations::StartedAt)
                            .big_integer()
                            .null(),
                    )
                    .col(
                        ColumnDef::new(RevisionAllocations::CompletedAt)
                            .big_integer()
                            .null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(
                                RevisionAllocations::Table,
                                RevisionAllocations::RevisionListId,
                            )
                            .to(RevisionLists::Table, RevisionLists::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RevisionAllocations::Table, RevisionAllocations::StudentId)
                            .to(Profiles::Table, Profiles::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        manager
            .create_table(
                Table::create()
                    .table(RevisionProgress::Table)
                    .if_not_exists()
                    .col(id_col(RevisionProgress::Id))
                    .col(
                        ColumnDef::new(RevisionProgress::AllocationId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevisionProgress::QuestionId)
                            .big_integer()
                            .not_null(),
                    )
                    .col(
                        ColumnDef::new(RevisionProgress::CompletedAt)
                            .big_integer()
                            .not_null(),
                    )
                    .foreign_key(
                        ForeignKey::create()
                            .from(RevisionProgress::Table, RevisionProgress::AllocationId)
                            .to(RevisionAllocations::Table, RevisionAllocations::Id)
                            .on_delete(ForeignKeyAction::Cascade),
                    )
                    .to_owned(),
            )
            .await?;

        // ==================== 索引 ====================
        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_submissions_assignment_student")
                    .table(Submissions::Table)
                    .col(Submissions::AssignmentId)
                    .col(Submissions::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_revision_list_questions_pair")
                    .table(RevisionListQuestions::Table)
                    .col(RevisionListQuestions::RevisionListId)
                    .col(RevisionListQuestions::QuestionId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_revision_allocations_list_student")
                    .table(RevisionAllocations::Table)
                    .col(RevisionAllocations::RevisionListId)
                    .col(RevisionAllocations::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .name("idx_revision_allocations_student_id")
                    .table(RevisionAllocations::Table)
                    .col(RevisionAllocations::StudentId)
                    .to_owned(),
            )
            .await?;

        manager
            .create_index(
                Index::create()
                    .if_not_exists()
                    .unique()
                    .name("uq_revision_progress_pair")
                    .table(RevisionProgress::Table)
                    .col(RevisionProgress::AllocationId)
                    .col(RevisionProgress::QuestionId)
                    .to_owned(),
            )
            .await?;

        Ok(())
    }

    async fn down(&self, manager: &SchemaManager) -> Result<(), DbErr> {
        manager
            .drop_table(Table::drop().table(RevisionProgress::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RevisionAllocations::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RevisionListQuestions::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(RevisionLists::Table).to_owned())
            .await?;
        manager
            .drop_table(Table::drop().table(Submissions::Table).to_owned())
            .await?;
        Ok(())
    }
}

#[derive(DeriveIden)]
enum Profiles {
    #[sea_orm(iden = "profiles")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Questions {
    #[sea_orm(iden = "questions")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Assignments {
    #[sea_orm(iden = "assignments")]
    Table,
    Id,
}

#[derive(DeriveIden)]
enum Submissions {
    #[sea_orm(iden = "submissions")]
    Table,
    Id,
    AssignmentId,
    StudentId,
    Answers,
    Status,
    SubmittedAt,
    GradedAt,
}

#[derive(DeriveIden)]
enum RevisionLists {
    #[sea_orm(iden = "revision_lists")]
    Table,
    Id,
    AssignmentId,
    Title,
    Description,
    CreatedBy,
    CreatedAt,
}

#[derive(DeriveIden)]
enum RevisionListQuestions {
    #[sea_orm(iden = "revision_list_questions")]
    Table,
    Id,
    RevisionListId,
    QuestionId,
    Position,
}

#[derive(DeriveIden)]
enum RevisionAllocations {
    #[sea_orm(iden = "revision_allocations")]
    Table,
    Id,
    RevisionListId,
    StudentId,
    Status,
    StartedAt,
    CompletedAt,
}

#[derive(DeriveIden)]
enum RevisionProgress {
    #[sea_orm(iden = "revision_progress")]
    Table,
    Id,
    AllocationId,
    QuestionId,
    CompletedAt,
}
