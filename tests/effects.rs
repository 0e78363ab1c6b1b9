//! Tests for effect execution against a fake tracker.

mod test_utils;

use linc::config::Config;
use linc::data::{Priority, StateType};
use linc::integrations::Tracker;
use linc::tui::message::IssueUpdate;
use linc::tui::{Effect, Message, Scheduler};
use std::sync::Arc;
use test_utils::*;
use tokio::sync::mpsc;

fn shared(tracker: &Arc<FakeTracker>) -> Arc<dyn Tracker> {
    Arc::clone(tracker) as Arc<dyn Tracker>
}

// ============================================================================
// Loads
// ============================================================================

mod loads {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_states_arrive_in_display_order() {
        let mut states = workflow();
        states.reverse();
        let tracker = Arc::new(FakeTracker::new().with_states(states));

        let msg = Effect::LoadStates {
            team_id: "team-eng".to_string(),
        }
        .run(shared(&tracker))
        .await;

        match msg {
            Message::StatesLoaded { team_id, result } => {
                assert_eq!(team_id, "team-eng");
                let ids: Vec<String> = result.unwrap().into_iter().map(|s| s.id).collect();
                assert_eq!(ids, vec!["backlog", "todo", "progress", "done", "canceled"]);
            }
            other => panic!("unexpected message {other:?}"),
        }
    }

    #[tokio::test]
    async fn test_load_errors_become_strings() {
        let tracker = Arc::new(FakeTracker::new().failing("my_issues"));
        let msg = Effect::LoadMyIssues {
            team_id: "team-eng".to_string(),
        }
        .run(shared(&tracker))
        .await;

        assert_eq!(
            msg,
            Message::MyIssuesLoaded {
                team_id: "team-eng".to_string(),
                result: Err("my_issues failed".to_string()),
            }
        );
    }
}

// ============================================================================
// Updates
// ============================================================================

mod updates {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_update_reports_completion_with_value() {
        let tracker = Arc::new(FakeTracker::new());
        let msg = Effect::UpdatePriority {
            issue_id: "id-eng-1".to_string(),
            priority: Priority::High,
        }
        .run(shared(&tracker))
        .await;

        assert_eq!(
            msg,
            Message::PriorityUpdated(IssueUpdate::completed("id-eng-1", Priority::High, Ok(())))
        );
        assert_eq!(
            tracker.calls(),
            vec![Call::UpdatePriority {
                issue_id: "id-eng-1".to_string(),
                priority: Priority::High,
            }]
        );
    }

    #[tokio::test]
    async fn test_failed_title_update_carries_error() {
        let tracker = Arc::new(FakeTracker::new().failing("update_title"));
        let msg = Effect::UpdateTitle {
            issue_id: "id-eng-1".to_string(),
            title: "New".to_string(),
        }
        .run(shared(&tracker))
        .await;

        assert_eq!(
            msg,
            Message::TitleUpdated(IssueUpdate::completed(
                "id-eng-1",
                "New".to_string(),
                Err("update_title failed".to_string())
            ))
        );
    }
}

// ============================================================================
// Cancel and duplicate
// ============================================================================

mod resolution {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_cancel_moves_to_canceled_state() {
        let mut states = workflow();
        states.push(state("wontfix", "Won't Fix", StateType::Canceled, 5.0));
        let tracker = Arc::new(FakeTracker::new().with_states(states));

        let msg = Effect::CancelIssue {
            issue_id: "id-eng-1".to_string(),
            team_id: "team-eng".to_string(),
        }
        .run(shared(&tracker))
        .await;

        assert_eq!(
            msg,
            Message::StateUpdated(IssueUpdate::completed(
                "id-eng-1",
                Some("canceled".to_string()),
                Ok(())
            ))
        );
        assert_eq!(
            tracker.calls(),
            vec![
                Call::TeamStates("team-eng".to_string()),
                Call::UpdateState {
                    issue_id: "id-eng-1".to_string(),
                    state_id: "canceled".to_string(),
                },
            ]
        );
    }

    #[tokio::test]
    async fn test_duplicate_prefers_named_state() {
        let mut states = workflow();
        states.push(state("dup", "Duplicate", StateType::Canceled, 5.0));
        let tracker = Arc::new(FakeTracker::new().with_states(states));

        let msg = Effect::MarkDuplicate {
            issue_id: "id-eng-1".to_string(),
            team_id: "team-eng".to_string(),
        }
        .run(shared(&tracker))
        .await;

        assert_eq!(
            msg,
            Message::StateUpdated(IssueUpdate::completed(
                "id-eng-1",
                Some("dup".to_string()),
                Ok(())
            ))
        );
    }

    #[tokio::test]
    async fn test_duplicate_falls_back_to_cancel() {
        let tracker = Arc::new(FakeTracker::new().with_states(workflow()));
        let msg = Effect::MarkDuplicate {
            issue_id: "id-eng-1".to_string(),
            team_id: "team-eng".to_string(),
        }
        .run(shared(&tracker))
        .await;

        assert_eq!(
            msg,
            Message::StateUpdated(IssueUpdate::completed(
                "id-eng-1",
                Some("canceled".to_string()),
                Ok(())
            ))
        );
    }

    #[tokio::test]
    async fn test_no_canceled_state_is_a_no_op() {
        let states = workflow()
            .into_iter()
            .filter(|s| s.state_type != StateType::Canceled)
            .collect();
        let tracker = Arc::new(FakeTracker::new().with_states(states));

        let msg = Effect::CancelIssue {
            issue_id: "id-eng-1".to_string(),
            team_id: "team-eng".to_string(),
        }
        .run(shared(&tracker))
        .await;

        assert_eq!(
            msg,
            Message::StateUpdated(IssueUpdate::completed("id-eng-1", None, Ok(())))
        );
        assert_eq!(tracker.calls(), vec![Call::TeamStates("team-eng".to_string())]);
    }

    #[tokio::test]
    async fn test_state_lookup_failure_is_reported() {
        let tracker = Arc::new(FakeTracker::new().failing("team_states"));
        let msg = Effect::CancelIssue {
            issue_id: "id-eng-1".to_string(),
            team_id: "team-eng".to_string(),
        }
        .run(shared(&tracker))
        .await;

        assert_eq!(
            msg,
            Message::StateUpdated(IssueUpdate::completed(
                "id-eng-1",
                None,
                Err("team_states failed".to_string())
            ))
        );
    }
}

// ============================================================================
// Config and scheduling
// ============================================================================

mod misc {
    use super::*;
    use pretty_assertions::assert_eq;

    #[tokio::test]
    async fn test_save_config_writes_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("config.toml");
        let mut config = Config::default();
        config.set_provider("echo");

        let msg = Effect::SaveConfig {
            config: Box::new(config.clone()),
            path: path.clone(),
        }
        .run(Arc::new(FakeTracker::new()))
        .await;

        assert_eq!(msg, Message::ConfigSaved(Ok(())));
        assert_eq!(linc::config::load(&path).unwrap(), config);
    }

    #[tokio::test]
    async fn test_save_config_failure_is_reported() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("not-a-dir");
        std::fs::write(&blocker, "").unwrap();

        let msg = Effect::SaveConfig {
            config: Box::new(Config::default()),
            path: blocker.join("config.toml"),
        }
        .run(Arc::new(FakeTracker::new()))
        .await;

        assert!(matches!(msg, Message::ConfigSaved(Err(_))));
    }

    #[tokio::test]
    async fn test_scheduler_delivers_results() {
        let mut tracker = FakeTracker::new();
        tracker.viewer = Some(viewer(vec![eng_team()]));
        let tracker = Arc::new(tracker);

        let (tx, mut rx) = mpsc::channel(8);
        let scheduler = Scheduler::new(tx);
        scheduler.spawn(Effect::LoadViewer, shared(&tracker));

        match rx.recv().await {
            Some(Message::ViewerLoaded(Ok(viewer))) => assert_eq!(viewer.teams, vec![eng_team()]),
            other => panic!("unexpected message {other:?}"),
        }
    }
}
