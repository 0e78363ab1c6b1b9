//! Tests for the issue list view: grouping, filtering, cursor handling and
//! the request/complete cycle of in-place edits.

mod test_utils;

use linc::data::{Issue, Priority, Scope};
use linc::tui::message::{IssueUpdate, ListAction, Message, TextEdit};
use linc::tui::views::{EditMode, ListView};
use test_utils::*;

// ============================================================================
// Test Helpers
// ============================================================================

fn loaded_list(mine: Vec<Issue>) -> ListView {
    let mut list = ListView::new("0.1.0", "~/code/acme", None);
    list.set_states(Ok(workflow()));
    list.set_issues(Scope::Mine, Ok(mine));
    list
}

fn visible(list: &ListView) -> Vec<String> {
    list.filtered()
        .iter()
        .map(|i| i.identifier.clone())
        .collect()
}

fn type_filter(list: &mut ListView, text: &str) {
    list.apply(ListAction::StartFilter);
    for c in text.chars() {
        list.apply(ListAction::Filter(TextEdit::Insert(c)));
    }
}

fn todo_issues() -> Vec<Issue> {
    vec![
        issue("ENG-1", "todo", Priority::NoPriority),
        issue("ENG-2", "todo", Priority::Low),
        issue("ENG-3", "todo", Priority::Urgent),
        issue("ENG-4", "done", Priority::High),
    ]
}

// ============================================================================
// Grouping and tabs
// ============================================================================

mod grouping {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_opens_on_todo_tab() {
        let list = loaded_list(todo_issues());
        assert_eq!(list.active_tab(), 1);
        assert_eq!(list.states()[list.active_tab()].name, "Todo");
    }

    #[test]
    fn test_first_tab_when_no_todo_state() {
        let mut list = ListView::new("0.1.0", "~", None);
        let states: Vec<_> = workflow().into_iter().filter(|s| s.id != "todo").collect();
        list.set_states(Ok(states));
        assert_eq!(list.active_tab(), 0);
    }

    #[test]
    fn test_tab_shows_its_bucket_by_priority() {
        let list = loaded_list(todo_issues());
        assert_eq!(visible(&list), vec!["ENG-3", "ENG-2", "ENG-1"]);
        assert_eq!(list.bucket_len("todo"), 3);
        assert_eq!(list.bucket_len("done"), 1);
        assert_eq!(list.bucket_len("progress"), 0);
    }

    #[test]
    fn test_tab_change_resets_cursor_and_filter() {
        let mut list = loaded_list(todo_issues());
        list.apply(ListAction::MoveDown);
        type_filter(&mut list, "eng");
        list.apply(ListAction::EndFilter);

        list.apply(ListAction::NextTab);
        assert_eq!(list.active_tab(), 2);
        assert_eq!(list.cursor(), 0);
        assert!(list.filter().is_empty());
        assert!(visible(&list).is_empty());

        list.apply(ListAction::NextTab);
        assert_eq!(visible(&list), vec!["ENG-4"]);
    }

    #[test]
    fn test_tabs_stop_at_both_ends() {
        let mut list = loaded_list(todo_issues());
        list.apply(ListAction::PrevTab);
        list.apply(ListAction::PrevTab);
        assert_eq!(list.active_tab(), 0);

        for _ in 0..10 {
            list.apply(ListAction::NextTab);
        }
        assert_eq!(list.active_tab(), workflow().len() - 1);
    }

    #[test]
    fn test_scope_toggle_switches_collection() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.set_issues(
            Scope::All,
            Ok(vec![
                issue("ENG-1", "todo", Priority::Low),
                issue("ENG-5", "todo", Priority::High),
            ]),
        );
        assert_eq!(visible(&list), vec!["ENG-1"]);

        list.apply(ListAction::ToggleScope);
        assert_eq!(list.scope(), Scope::All);
        assert_eq!(visible(&list), vec!["ENG-5", "ENG-1"]);

        list.apply(ListAction::ToggleScope);
        assert_eq!(list.scope(), Scope::Mine);
        assert_eq!(visible(&list), vec!["ENG-1"]);
    }
}

// ============================================================================
// Filtering and cursor
// ============================================================================

mod filtering {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_filter_narrows_active_tab() {
        let mut list = loaded_list(todo_issues());
        type_filter(&mut list, "ENG-2");
        assert!(list.is_filtering());
        assert!(list.captures_text());
        assert_eq!(visible(&list), vec!["ENG-2"]);

        list.apply(ListAction::EndFilter);
        assert!(!list.is_filtering());
        assert_eq!(list.filter().value(), "ENG-2");
        assert_eq!(visible(&list), vec!["ENG-2"]);

        list.apply(ListAction::ClearFilter);
        assert_eq!(visible(&list).len(), 3);
    }

    #[test]
    fn test_filter_matches_description() {
        let mut issues = todo_issues();
        issues[0].description = "Crash on the Login page".to_string();
        let mut list = loaded_list(issues);
        type_filter(&mut list, "login");
        assert_eq!(visible(&list), vec!["ENG-1"]);
    }

    #[test]
    fn test_cursor_stays_inside_filtered_list() {
        let mut list = loaded_list(todo_issues());
        for _ in 0..5 {
            list.apply(ListAction::MoveDown);
        }
        assert_eq!(list.cursor(), 2);

        type_filter(&mut list, "ENG-3");
        assert_eq!(list.cursor(), 0);
        assert_eq!(list.selected().map(|i| i.identifier.as_str()), Some("ENG-3"));

        type_filter(&mut list, "zzz");
        assert_eq!(list.cursor(), 0);
        assert!(list.selected().is_none());
        assert_eq!(list.apply(ListAction::OpenDetail), None);
    }

    #[test]
    fn test_open_detail_carries_selected_issue() {
        let mut list = loaded_list(todo_issues());
        list.apply(ListAction::MoveDown);
        match list.apply(ListAction::OpenDetail) {
            Some(Message::SwitchToDetail(issue)) => assert_eq!(issue.identifier, "ENG-2"),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_step_issue_moves_cursor() {
        let mut list = loaded_list(todo_issues());
        assert_eq!(
            list.step_issue(true).map(|i| i.identifier),
            Some("ENG-2".to_string())
        );
        assert_eq!(
            list.step_issue(true).map(|i| i.identifier),
            Some("ENG-1".to_string())
        );
        assert_eq!(list.step_issue(true), None);
        assert_eq!(list.cursor(), 2);

        list.step_issue(false);
        list.step_issue(false);
        assert_eq!(list.step_issue(false), None);
        assert_eq!(list.cursor(), 0);
    }
}

// ============================================================================
// Loading
// ============================================================================

mod loading {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_only_my_issues_clear_loading() {
        let mut list = ListView::new("0.1.0", "~", None);
        assert!(list.is_loading());

        list.set_issues(Scope::All, Ok(todo_issues()));
        assert!(list.is_loading());

        list.set_issues(Scope::Mine, Err("network down".to_string()));
        assert!(!list.is_loading());
        assert_eq!(list.error(), Some("network down"));
    }

    #[test]
    fn test_branch_correlates_to_issue() {
        let mut list = ListView::new("0.1.0", "~", Some("ada/eng-2-fix-login".to_string()));
        list.set_states(Ok(workflow()));
        list.set_issues(Scope::Mine, Ok(todo_issues()));
        assert_eq!(
            list.branch_issue().map(|i| i.identifier.as_str()),
            Some("ENG-2")
        );
    }

    #[test]
    fn test_branch_correlation_searches_all_issues() {
        let mut list = ListView::new("0.1.0", "~", Some("eng-9-other".to_string()));
        list.set_issues(Scope::Mine, Ok(todo_issues()));
        assert!(list.branch_issue().is_none());

        list.set_issues(Scope::All, Ok(vec![issue("ENG-9", "todo", Priority::Low)]));
        assert_eq!(
            list.branch_issue().map(|i| i.identifier.as_str()),
            Some("ENG-9")
        );

        list.set_branch(Some(String::new()));
        assert!(list.branch().is_none());
        assert!(list.branch_issue().is_none());
    }
}

// ============================================================================
// Edits
// ============================================================================

mod edits {
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn test_rename_is_requested_then_applied() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.apply(ListAction::StartRename);
        assert!(list.captures_text());
        list.apply(ListAction::EditText(TextEdit::Insert('!')));

        let msg = list.apply(ListAction::EditConfirm);
        assert_eq!(
            msg,
            Some(Message::TitleUpdated(IssueUpdate::requested(
                "id-eng-1",
                "Title of ENG-1!".to_string()
            )))
        );
        assert!(list.edit().is_submitted());
        assert_eq!(list.issue("id-eng-1").unwrap().title, "Title of ENG-1");

        // Input is ignored until the tracker answers
        assert_eq!(list.apply(ListAction::EditCancel), None);
        assert!(list.edit().is_submitted());

        list.title_updated(&IssueUpdate::completed(
            "id-eng-1",
            "Title of ENG-1!".to_string(),
            Ok(()),
        ));
        assert_eq!(list.edit(), &EditMode::None);
        assert_eq!(list.issue("id-eng-1").unwrap().title, "Title of ENG-1!");
    }

    #[test]
    fn test_rename_sends_trimmed_title() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.apply(ListAction::StartRename);
        list.apply(ListAction::EditText(TextEdit::Insert(' ')));
        match list.apply(ListAction::EditConfirm) {
            Some(Message::TitleUpdated(update)) => assert_eq!(update.value, "Title of ENG-1"),
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[test]
    fn test_blank_rename_is_abandoned() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.apply(ListAction::StartRename);
        for _ in 0.."Title of ENG-1".len() {
            list.apply(ListAction::EditText(TextEdit::Backspace));
        }
        list.apply(ListAction::EditText(TextEdit::Insert(' ')));

        assert_eq!(list.apply(ListAction::EditConfirm), None);
        assert_eq!(list.edit(), &EditMode::None);
    }

    #[test]
    fn test_failed_priority_update_keeps_value() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.apply(ListAction::StartPriority);
        assert!(matches!(list.edit(), EditMode::Priority { cursor: 4, .. }));

        list.apply(ListAction::EditUp);
        let msg = list.apply(ListAction::EditConfirm);
        assert_eq!(
            msg,
            Some(Message::PriorityUpdated(IssueUpdate::requested(
                "id-eng-1",
                Priority::Medium
            )))
        );

        list.priority_updated(&IssueUpdate::completed(
            "id-eng-1",
            Priority::Medium,
            Err("rate limited".to_string()),
        ));
        assert_eq!(list.edit(), &EditMode::None);
        assert_eq!(list.error(), Some("rate limited"));
        assert_eq!(list.issue("id-eng-1").unwrap().priority, Priority::Low);
    }

    #[test]
    fn test_quick_priority_only_in_priority_mode() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        assert_eq!(list.apply(ListAction::QuickPriority(Priority::Urgent)), None);

        list.apply(ListAction::StartPriority);
        assert_eq!(
            list.apply(ListAction::QuickPriority(Priority::Urgent)),
            Some(Message::PriorityUpdated(IssueUpdate::requested(
                "id-eng-1",
                Priority::Urgent
            )))
        );
    }

    #[test]
    fn test_priority_update_reorders_bucket() {
        let mut list = loaded_list(vec![
            issue("ENG-1", "todo", Priority::High),
            issue("ENG-2", "todo", Priority::Low),
        ]);
        list.priority_updated(&IssueUpdate::completed("id-eng-2", Priority::Urgent, Ok(())));
        assert_eq!(visible(&list), vec!["ENG-2", "ENG-1"]);
    }

    #[test]
    fn test_status_picker_targets() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.apply(ListAction::StartStatus);
        assert!(matches!(list.edit(), EditMode::Status { cursor: 1, .. }));

        list.apply(ListAction::EditDown);
        list.apply(ListAction::EditDown);
        assert_eq!(
            list.apply(ListAction::EditConfirm),
            Some(Message::StateUpdated(IssueUpdate::requested(
                "id-eng-1",
                Some("done".to_string())
            )))
        );
    }

    #[test]
    fn test_status_picker_cancel_and_duplicate_entries() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.apply(ListAction::StartStatus);
        for _ in 0..4 {
            list.apply(ListAction::EditDown);
        }
        assert_eq!(
            list.apply(ListAction::EditConfirm),
            Some(Message::CancelIssue {
                issue_id: "id-eng-1".to_string(),
                team_id: "team-eng".to_string(),
            })
        );

        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.apply(ListAction::StartStatus);
        for _ in 0..10 {
            list.apply(ListAction::EditDown);
        }
        assert_eq!(
            list.apply(ListAction::EditConfirm),
            Some(Message::MarkDuplicate {
                issue_id: "id-eng-1".to_string(),
                team_id: "team-eng".to_string(),
            })
        );
    }

    #[test]
    fn test_state_update_moves_issue_between_tabs() {
        let mut list = loaded_list(todo_issues());
        list.state_updated(&IssueUpdate::completed(
            "id-eng-3",
            Some("done".to_string()),
            Ok(()),
        ));
        assert_eq!(visible(&list), vec!["ENG-2", "ENG-1"]);
        assert_eq!(list.bucket_len("done"), 2);
        assert_eq!(list.issue("id-eng-3").unwrap().state.name, "Done");
    }

    #[test]
    fn test_unknown_state_removes_issue() {
        let mut list = loaded_list(todo_issues());
        list.state_updated(&IssueUpdate::completed(
            "id-eng-1",
            Some("some-other-team-state".to_string()),
            Ok(()),
        ));
        assert!(list.issue("id-eng-1").is_none());
        assert_eq!(visible(&list), vec!["ENG-3", "ENG-2"]);
    }

    #[test]
    fn test_removing_last_row_keeps_cursor_in_bounds() {
        let mut list = loaded_list(todo_issues());
        list.apply(ListAction::MoveDown);
        list.apply(ListAction::MoveDown);
        assert_eq!(list.selected().unwrap().identifier, "ENG-1");

        list.state_updated(&IssueUpdate::completed(
            "id-eng-1",
            Some("some-other-team-state".to_string()),
            Ok(()),
        ));
        assert_eq!(visible(&list), vec!["ENG-3", "ENG-2"]);
        assert!(list.cursor() < list.filtered().len());
        assert_eq!(list.selected().unwrap().identifier, "ENG-2");
    }

    #[test]
    fn test_unresolved_cancel_removes_issue() {
        let mut list = loaded_list(vec![
            issue("ENG-1", "todo", Priority::Low),
            issue("ENG-2", "todo", Priority::High),
        ]);
        list.apply(ListAction::MoveDown);
        list.apply(ListAction::StartStatus);
        for _ in 0..4 {
            list.apply(ListAction::EditDown);
        }
        list.apply(ListAction::EditConfirm);
        assert!(list.edit().is_submitted());

        list.state_updated(&IssueUpdate::completed("id-eng-1", None, Ok(())));
        assert_eq!(list.edit(), &EditMode::None);
        assert!(list.issue("id-eng-1").is_none());
        assert_eq!(visible(&list), vec!["ENG-2"]);
        assert_eq!(list.cursor(), 0);
        assert_eq!(list.error(), None);
    }

    #[test]
    fn test_failed_cancel_keeps_issue() {
        let mut list = loaded_list(vec![issue("ENG-1", "todo", Priority::Low)]);
        list.state_updated(&IssueUpdate::completed(
            "id-eng-1",
            None,
            Err("network down".to_string()),
        ));
        assert_eq!(list.issue("id-eng-1").unwrap().state.id, "todo");
        assert_eq!(list.error(), Some("network down"));
    }
}
