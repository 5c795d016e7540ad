//=========================================================================
// Quest Board
//=========================================================================
//
// Pure projection of the quest registry into display lines.
//
// Rendering itself is external; these functions only build the text.
// The numbering offset comes from the active scene's policy so later
// levels continue the count instead of restarting at one.
//
//=========================================================================

use super::{QuestDisplayMode, QuestKey, QuestRecord};

/// Terminal line shown once every record is complete in sequential mode.
pub const ALL_COMPLETE_MARKER: &str = "All objectives complete";

/// Projects the registry into display lines.
pub fn render<Q: QuestKey>(
    records: &[QuestRecord<Q>],
    mode: QuestDisplayMode,
    offset: u32,
) -> Vec<String> {
    match mode {
        QuestDisplayMode::AllAtOnce => render_all_at_once(records, offset),
        QuestDisplayMode::Sequential => render_sequential(records, offset),
    }
}

/// Every record, progress-qualified where applicable, completed ones
/// marked.
pub fn render_all_at_once<Q: QuestKey>(records: &[QuestRecord<Q>], offset: u32) -> Vec<String> {
    records
        .iter()
        .enumerate()
        .map(|(i, record)| {
            let label = numbered_label(record, offset, i);
            if record.completed {
                format!("{} (complete)", label)
            } else {
                label
            }
        })
        .collect()
}

/// Only the earliest incomplete record; a terminal marker when there is
/// none.
pub fn render_sequential<Q: QuestKey>(records: &[QuestRecord<Q>], offset: u32) -> Vec<String> {
    for (i, record) in records.iter().enumerate() {
        if !record.completed {
            return vec![numbered_label(record, offset, i)];
        }
    }
    vec![ALL_COMPLETE_MARKER.to_string()]
}

fn numbered_label<Q: QuestKey>(record: &QuestRecord<Q>, offset: u32, index: usize) -> String {
    let number = offset + index as u32 + 1;
    if record.is_progress() {
        format!(
            "{}. {} ({}/{})",
            number, record.display_name, record.current, record.target
        )
    } else {
        format!("{}. {}", number, record.display_name)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
    enum TestQuest {
        First,
        Second,
        Third,
    }

    impl QuestKey for TestQuest {}

    /// Registry fixture: one done, one mid-progress, one untouched.
    fn records() -> Vec<QuestRecord<TestQuest>> {
        let mut done = QuestRecord::new(TestQuest::First, "Escape the cellar");
        done.completed = true;
        done.current = 1;

        let mut in_progress =
            QuestRecord::new(TestQuest::Second, "Gather supplies").with_target(3);
        in_progress.current = 1;

        let pending = QuestRecord::new(TestQuest::Third, "Find the gate key");

        vec![done, in_progress, pending]
    }

    #[test]
    fn sequential_shows_only_earliest_incomplete() {
        let lines = render_sequential(&records(), 0);
        assert_eq!(lines, vec!["2. Gather supplies (1/3)".to_string()]);
    }

    #[test]
    fn all_at_once_shows_everything_with_markers() {
        let lines = render_all_at_once(&records(), 0);
        assert_eq!(
            lines,
            vec![
                "1. Escape the cellar (complete)".to_string(),
                "2. Gather supplies (1/3)".to_string(),
                "3. Find the gate key".to_string(),
            ]
        );
    }

    #[test]
    fn offset_shifts_numbering() {
        let lines = render_sequential(&records(), 4);
        assert_eq!(lines, vec!["6. Gather supplies (1/3)".to_string()]);
    }

    #[test]
    fn sequential_ends_with_terminal_marker() {
        let mut all_done = records();
        for record in &mut all_done {
            record.completed = true;
            record.current = record.target;
        }

        let lines = render_sequential(&all_done, 0);
        assert_eq!(lines, vec![ALL_COMPLETE_MARKER.to_string()]);
    }

    #[test]
    fn completed_progress_quest_keeps_its_count() {
        let mut recs = records();
        recs[1].completed = true;
        recs[1].current = 3;

        let lines = render_all_at_once(&recs, 0);
        assert_eq!(lines[1], "2. Gather supplies (3/3) (complete)");
    }
}
