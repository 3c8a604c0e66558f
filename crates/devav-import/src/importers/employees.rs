//! Employees, their evaluations and their tasks

use super::{address, Transform, TransformContext};
use crate::error::MigrationError;
use chrono::Duration;
use devav_model::source::{
    EmployeeRow, EmployeeTaskRow, EvaluationRow, ProbationRow, TaskAttachedFileRow,
};
use devav_model::target::{
    Employee, EmployeeTask, Evaluation, FileData, Probation, TaskAttachedFile,
};
use devav_model::{
    Bonus, EmployeeDepartment, EmployeeStatus, EmployeeTaskFollowUp, EmployeeTaskPriority,
    EmployeeTaskStatus, EntityKind, EvaluationRating, PersonPrefix, Raise,
};
use once_cell::sync::Lazy;
use regex::Regex;

static RAISE_YES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Raise:\s*Yes").expect("static pattern compiles"));
static BONUS_YES: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"Bonus:\s*Yes").expect("static pattern compiles"));

pub struct ProbationImport;

impl Transform for ProbationImport {
    type Row = ProbationRow;
    type Target = Probation;
    const DEPENDS_ON: &'static [EntityKind] = &[];

    fn transform(row: ProbationRow, _cx: &TransformContext<'_>) -> Result<Probation, MigrationError> {
        Ok(Probation {
            source_id: Some(row.id),
            reason: row.reason,
        })
    }
}

pub struct EmployeeImport;

impl Transform for EmployeeImport {
    type Row = EmployeeRow;
    type Target = Employee;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Picture, EntityKind::Probation];
    const INCLUDES: &'static [&'static str] = &["Picture", "ProbationReason"];

    fn transform(row: EmployeeRow, cx: &TransformContext<'_>) -> Result<Employee, MigrationError> {
        Ok(Employee {
            source_id: Some(row.id),
            prefix: PersonPrefix::from_literal(row.prefix)?,
            department: EmployeeDepartment::from_literal(row.department)?,
            status: EmployeeStatus::from_literal(row.status)?,
            address: address(row.address)?,
            picture: cx.resolve(row.picture)?,
            probation_reason: cx.resolve(row.probation_reason)?,
            first_name: row.first_name,
            last_name: row.last_name,
            full_name: row.full_name,
            title: row.title,
            email: row.email,
            skype: row.skype,
            home_phone: row.home_phone,
            mobile_phone: row.mobile_phone,
            birth_date: row.birth_date,
            hire_date: row.hire_date,
            personal_profile: row.personal_profile,
        })
    }
}

/// Evaluations last one hour from creation; raise and bonus flags are
/// read from the evaluation text
pub struct EvaluationImport;

impl Transform for EvaluationImport {
    type Row = EvaluationRow;
    type Target = Evaluation;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Employee];
    const INCLUDES: &'static [&'static str] = &["Employee", "CreatedBy"];

    fn transform(
        row: EvaluationRow,
        cx: &TransformContext<'_>,
    ) -> Result<Evaluation, MigrationError> {
        let raise = if RAISE_YES.is_match(&row.details) {
            Raise::Yes
        } else {
            Raise::No
        };
        let bonus = if BONUS_YES.is_match(&row.details) {
            Bonus::Yes
        } else {
            Bonus::No
        };
        Ok(Evaluation {
            source_id: Some(row.id),
            employee: cx.resolve(row.employee)?,
            manager: Some(cx.require(EntityKind::Evaluation, "CreatedBy", row.created_by)?),
            rating: EvaluationRating::from_literal(row.rating)?,
            start_on: row.created_on,
            end_on: row.created_on + Duration::hours(1),
            subject: row.subject,
            description: row.details,
            raise,
            bonus,
        })
    }
}

/// Tasks keep their legacy parent key verbatim; it is never resolved
pub struct EmployeeTaskImport;

impl Transform for EmployeeTaskImport {
    type Row = EmployeeTaskRow;
    type Target = EmployeeTask;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::Employee, EntityKind::CustomerEmployee];
    const INCLUDES: &'static [&'static str] = &[
        "AssignedEmployees",
        "CustomerEmployee",
        "Owner",
        "AssignedEmployee",
    ];

    fn transform(
        row: EmployeeTaskRow,
        cx: &TransformContext<'_>,
    ) -> Result<EmployeeTask, MigrationError> {
        let assigned_employees = row
            .assigned_employees
            .iter()
            .map(|id| cx.require(EntityKind::EmployeeTask, "AssignedEmployees", Some(*id)))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(EmployeeTask {
            source_id: Some(row.id),
            status: EmployeeTaskStatus::from_literal(row.status)?,
            priority: EmployeeTaskPriority::from_literal(row.priority)?,
            follow_up: EmployeeTaskFollowUp::from_literal(row.follow_up)?,
            customer_employee: cx.resolve(row.customer_employee)?,
            owner: cx.resolve(row.owner)?,
            assigned_employee: cx.resolve(row.assigned_employee)?,
            assigned_employees,
            subject: row.subject,
            description: row.description,
            rtf_text_description: row.rtf_text_description,
            category: row.category,
            completion: row.completion,
            private: row.private,
            reminder: row.reminder,
            reminder_date_time: row.reminder_date_time,
            start_date: row.start_date,
            due_date: row.due_date,
            predecessors: row.predecessors,
            parent_id: row.parent_id,
            attached_collections_changed: row.attached_collections_changed,
        })
    }
}

/// Each attachment owns a [`FileData`] created alongside it
pub struct TaskAttachedFileImport;

impl Transform for TaskAttachedFileImport {
    type Row = TaskAttachedFileRow;
    type Target = TaskAttachedFile;
    const DEPENDS_ON: &'static [EntityKind] = &[EntityKind::EmployeeTask];
    const INCLUDES: &'static [&'static str] = &["EmployeeTask"];

    fn transform(
        row: TaskAttachedFileRow,
        cx: &TransformContext<'_>,
    ) -> Result<TaskAttachedFile, MigrationError> {
        let employee_task = cx.require(EntityKind::TaskAttachedFile, "EmployeeTask", row.employee_task)?;
        let file = cx.create_owned(FileData {
            source_id: None,
            file_name: row.name,
            content: row.content,
        });
        Ok(TaskAttachedFile {
            source_id: Some(row.id),
            employee_task: Some(employee_task),
            file: Some(file),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::resolver::SourceIndex;
    use chrono::NaiveDate;
    use devav_model::source::SourceAddress;
    use devav_model::{EntityId, SourceId};
    use devav_store::{MemoryTargetStore, TargetStore};

    fn committed(entries: &[(EntityKind, i64, u64)]) -> SourceIndex {
        let index = SourceIndex::new();
        for (kind, source, id) in entries {
            index
                .register(*kind, SourceId(*source), EntityId(*id))
                .unwrap();
        }
        index.seal();
        index
    }

    #[test]
    fn evaluation_flags_come_from_details() {
        let index = committed(&[(EntityKind::Employee, 1, 10)]);
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);
        let created_on = NaiveDate::from_ymd_opt(2020, 1, 2)
            .unwrap()
            .and_hms_opt(9, 0, 0)
            .unwrap();

        let evaluation = EvaluationImport::transform(
            EvaluationRow {
                id: SourceId(3),
                created_by: Some(SourceId(1)),
                created_on,
                details: "Raise:  Yes\nBonus: No".into(),
                rating: 1,
                ..EvaluationRow::default()
            },
            &cx,
        )
        .unwrap();
        assert_eq!(evaluation.raise, Raise::Yes);
        assert_eq!(evaluation.bonus, Bonus::No);
        assert_eq!(evaluation.end_on - evaluation.start_on, Duration::hours(1));
        assert_eq!(evaluation.employee, None);
        assert_eq!(evaluation.manager.map(|r| r.id()), Some(EntityId(10)));
        assert_eq!(evaluation.description, "Raise:  Yes\nBonus: No");
    }

    #[test]
    fn evaluation_requires_creator() {
        let index = SourceIndex::new();
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);
        let err = EvaluationImport::transform(EvaluationRow::default(), &cx).unwrap_err();
        assert_eq!(err.kind(), Some(EntityKind::Evaluation));
    }

    #[test]
    fn employee_optional_references() {
        let index = committed(&[(EntityKind::Probation, 4, 40)]);
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);
        let row = EmployeeRow {
            id: SourceId(1),
            department: 1,
            address: SourceAddress {
                state: "CA".into(),
                ..SourceAddress::default()
            },
            ..EmployeeRow::default()
        };

        let employee = EmployeeImport::transform(row.clone(), &cx).unwrap();
        assert_eq!(employee.probation_reason, None);
        assert_eq!(employee.picture, None);

        let on_probation = EmployeeImport::transform(
            EmployeeRow {
                probation_reason: Some(SourceId(4)),
                ..row.clone()
            },
            &cx,
        )
        .unwrap();
        assert_eq!(on_probation.probation_reason.map(|r| r.id()), Some(EntityId(40)));

        let err = EmployeeImport::transform(
            EmployeeRow {
                probation_reason: Some(SourceId(99)),
                ..row
            },
            &cx,
        )
        .unwrap_err();
        assert!(matches!(
            err,
            MigrationError::ReferenceResolution {
                kind: EntityKind::Probation,
                ..
            }
        ));
    }

    #[test]
    fn task_resolves_every_assignee() {
        let index = committed(&[(EntityKind::Employee, 1, 10), (EntityKind::Employee, 2, 20)]);
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);
        let task = EmployeeTaskImport::transform(
            EmployeeTaskRow {
                id: SourceId(7),
                parent_id: Some(3),
                owner: Some(SourceId(1)),
                assigned_employees: vec![SourceId(1), SourceId(2)],
                ..EmployeeTaskRow::default()
            },
            &cx,
        )
        .unwrap();
        let ids: Vec<_> = task.assigned_employees.iter().map(|r| r.id()).collect();
        assert_eq!(ids, vec![EntityId(10), EntityId(20)]);
        assert_eq!(task.parent_id, Some(3));
        assert_eq!(task.customer_employee, None);
    }

    #[test]
    fn attachment_owns_file_data() {
        let index = committed(&[(EntityKind::EmployeeTask, 7, 70)]);
        let store = MemoryTargetStore::new();
        let cx = TransformContext::new(&index, &store);
        let attachment = TaskAttachedFileImport::transform(
            TaskAttachedFileRow {
                id: SourceId(1),
                name: "notes.txt".into(),
                content: b"hello".to_vec(),
                employee_task: Some(SourceId(7)),
            },
            &cx,
        )
        .unwrap();
        assert!(attachment.file.is_some());
        assert_eq!(store.pending_count(), 1);
    }
}
