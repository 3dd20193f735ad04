use super::{flash, AppState, Notice};
use crate::reorder::{
    send_submission, MoveRequest, Persisted, ReorderController, Submission, SyncPhase,
};
use leptos::logging::{log, warn};
use leptos::prelude::*;
use leptos::task::spawn_local;

/// A reorderable sibling list owned by a view.
pub(crate) type SyncedList<T> = RwSignal<ReorderController<T>>;

/// Apply a drop to `list` right away, then persist the new order in the
/// background. The outcome is flashed into `notice`.
///
/// Each call issues its own request; nothing is coalesced.
pub(crate) fn sync_order<T>(
    app: &AppState,
    list: SyncedList<T>,
    mv: MoveRequest,
    notice: RwSignal<Option<Notice>>,
) where
    T: Persisted + Clone + Send + Sync + 'static,
{
    let admin = app.is_admin_untracked();
    let Some(sub) = list.try_update(|c| stage_move(admin, c, mv)).flatten() else {
        return;
    };
    log!(
        "reorder #{} submitted: {:?}, {} entries",
        sub.ticket,
        sub.scope,
        sub.entries.len()
    );

    let app = *app;
    let client = app.client();
    spawn_local(async move {
        let result = send_submission(&client, &sub).await;
        if let Err(e) = &result {
            app.handle_unauthorized(e);
        }

        // `None` when the view was torn down before the response came back.
        let Some(outcome) = list.try_update(|c| notice_for(c.resolve(sub.ticket, result))) else {
            return;
        };
        if let Some(n) = outcome {
            flash(notice, n);
        }
    });
}

/// Only admins may reorder. Anyone else gets no local change and nothing
/// to send.
fn stage_move<T: Persisted + Clone>(
    admin: bool,
    list: &mut ReorderController<T>,
    mv: MoveRequest,
) -> Option<Submission> {
    if !admin {
        warn!("reorder ignored: not signed in as admin");
        return None;
    }
    list.apply(mv)
}

fn notice_for<T>(phase: &SyncPhase<T>) -> Option<Notice> {
    match phase {
        SyncPhase::Confirmed { ticket } => {
            log!("reorder #{ticket} confirmed");
            Some(Notice::Success("✅ Order updated successfully!".to_string()))
        }
        SyncPhase::Failed { ticket, error, .. } => {
            warn!("reorder #{ticket} failed: {error}");
            Some(Notice::Error(format!("❌ Failed to update order: {error}")))
        }
        SyncPhase::Idle | SyncPhase::Pending { .. } => None,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiError;
    use crate::models::Topic;
    use crate::reorder::ReorderScope;

    fn topics() -> ReorderController<Topic> {
        let items = (0..3)
            .map(|i| Topic {
                id: i + 1,
                title: format!("T{i}"),
                slug: format!("t{i}"),
                description: None,
                parent_id: None,
                order_no: i as u32,
                full_path: format!("t{i}"),
                created_at: None,
            })
            .collect();
        ReorderController::new(ReorderScope::Children { parent_id: None }, items)
    }

    fn ids(list: &ReorderController<Topic>) -> Vec<i64> {
        list.items().iter().map(|t| t.id).collect()
    }

    #[test]
    fn test_visitor_move_changes_nothing() {
        let mut list = topics();
        assert!(stage_move(false, &mut list, MoveRequest::new(0, Some(2))).is_none());
        assert_eq!(ids(&list), vec![1, 2, 3]);
        assert!(!list.is_saving());
    }

    #[test]
    fn test_admin_move_is_staged() {
        let mut list = topics();
        let sub = stage_move(true, &mut list, MoveRequest::new(0, Some(2))).expect("staged");
        assert_eq!(ids(&list), vec![2, 3, 1]);
        assert_eq!(sub.entries.len(), 3);
        assert!(list.is_saving());
    }

    #[test]
    fn test_notice_for_phases() {
        let ok: SyncPhase<Topic> = SyncPhase::Confirmed { ticket: 1 };
        assert_eq!(
            notice_for(&ok),
            Some(Notice::Success("✅ Order updated successfully!".to_string()))
        );

        let failed: SyncPhase<Topic> = SyncPhase::Failed {
            ticket: 2,
            error: ApiError::http_status(500, ""),
            last_known_good: vec![],
        };
        assert_eq!(
            notice_for(&failed),
            Some(Notice::Error(
                "❌ Failed to update order: Failed (500)".to_string()
            ))
        );

        let pending: SyncPhase<Topic> = SyncPhase::Pending { ticket: 3 };
        assert!(notice_for(&pending).is_none());
    }
}
