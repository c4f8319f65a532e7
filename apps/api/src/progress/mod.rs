//! Task progress tracking: status updates, the task list, and the summary.

pub mod handlers;

use shared::domain::{KindSummary, ProgressSummary, TaskRecord, TaskStatus};

/// Aggregates task records into the progress summary.
pub fn summarize(records: &[TaskRecord]) -> ProgressSummary {
    let mut summary = ProgressSummary {
        total: records.len() as u32,
        ..ProgressSummary::default()
    };

    for record in records {
        match record.status {
            TaskStatus::NotStarted => summary.not_started += 1,
            TaskStatus::InProgress => summary.in_progress += 1,
            TaskStatus::Completed => summary.completed += 1,
        }

        let slot = summary
            .by_type
            .entry(record.item_type.as_str().to_string())
            .or_insert_with(KindSummary::default);
        slot.total += 1;
        if record.status == TaskStatus::Completed {
            slot.completed += 1;
        }
    }

    summary
}

#[cfg(test)]
mod tests {
    use super::*;
    use shared::domain::ItemKind;

    fn record(item_id: &str, kind: ItemKind, status: TaskStatus) -> TaskRecord {
        TaskRecord {
            item_id: item_id.to_string(),
            item_type: kind,
            item_name: item_id.to_string(),
            status,
            completion_date: None,
            notes: None,
            encouragement_message: None,
        }
    }

    #[test]
    fn test_summarize_counts_statuses_and_kinds() {
        let records = vec![
            record("c1", ItemKind::Course, TaskStatus::Completed),
            record("c2", ItemKind::Course, TaskStatus::NotStarted),
            record("p1", ItemKind::Project, TaskStatus::InProgress),
        ];
        let summary = summarize(&records);
        assert_eq!(summary.total, 3);
        assert_eq!(summary.completed, 1);
        assert_eq!(summary.in_progress, 1);
        assert_eq!(summary.not_started, 1);
        assert_eq!(summary.by_type["course"].total, 2);
        assert_eq!(summary.by_type["course"].completed, 1);
        assert_eq!(summary.by_type["project"].total, 1);
    }

    #[test]
    fn test_summarize_empty_list() {
        let summary = summarize(&[]);
        assert_eq!(summary.total, 0);
        assert!(summary.by_type.is_empty());
    }
}
