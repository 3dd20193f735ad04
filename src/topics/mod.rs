//! Admin topic actions: create-form validation and deletion.

use crate::api::{ApiError, ApiResult, CreateTopicRequest};
use crate::models::TopicId;
use crate::navigator::slugify;
use leptos::logging::{log, warn};

/// Form state for a new topic (root or subtopic).
#[derive(Clone, Debug, Default, PartialEq)]
pub(crate) struct TopicDraft {
    pub title: String,
    pub slug: String,
    pub description: String,
    /// Explicit position; the sibling count is used when absent.
    pub order_no: Option<u32>,
    slug_edited: bool,
}

impl TopicDraft {
    /// Update the title; the slug follows it until edited by hand.
    pub fn set_title(&mut self, title: String) {
        if !self.slug_edited {
            self.slug = slugify(&title);
        }
        self.title = title;
    }

    pub fn set_slug(&mut self, slug: String) {
        self.slug_edited = true;
        self.slug = slug;
    }

    /// Build the create request. Title and slug are always required;
    /// `require_description` adds the description to that list.
    pub fn into_request(
        &self,
        parent_id: Option<TopicId>,
        sibling_count: u32,
        require_description: bool,
    ) -> ApiResult<CreateTopicRequest> {
        let title = self.title.trim();
        let slug = self.slug.trim();
        let description = self.description.trim();

        if title.is_empty() || slug.is_empty() || (require_description && description.is_empty())
        {
            return Err(ApiError::missing("Please fill all fields."));
        }

        Ok(CreateTopicRequest {
            parent_id,
            title: title.to_string(),
            slug: slug.to_string(),
            description: description.to_string(),
            order_no: self.order_no.unwrap_or(sibling_count),
        })
    }
}

/// Transport for topic deletion.
pub(crate) trait TopicRemover {
    async fn remove_topic(&self, id: TopicId) -> ApiResult<()>;
}

/// Which topic a delete action targets, relative to the current view.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum DeleteTarget {
    /// An entry of the visible sibling list.
    Listed(TopicId),
    /// The topic the page is showing.
    Current(TopicId),
}

impl DeleteTarget {
    pub fn id(self) -> TopicId {
        match self {
            DeleteTarget::Listed(id) | DeleteTarget::Current(id) => id,
        }
    }
}

/// What the view does after a successful delete.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub(crate) enum AfterDelete {
    /// Drop this id from the local list.
    RemoveListed(TopicId),
    /// Leave the page for `/`.
    NavigateHome,
}

/// Issue exactly one delete request for the target.
pub(crate) async fn delete_topic<R: TopicRemover>(
    remover: &R,
    target: DeleteTarget,
) -> ApiResult<AfterDelete> {
    let id = target.id();
    match remover.remove_topic(id).await {
        Ok(()) => {
            log!("topic {id} deleted");
            Ok(match target {
                DeleteTarget::Listed(id) => AfterDelete::RemoveListed(id),
                DeleteTarget::Current(_) => AfterDelete::NavigateHome,
            })
        }
        Err(e) => {
            warn!("deleting topic {id} failed: {e}");
            Err(e)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::ApiErrorKind;
    use crate::models::Topic;
    use crate::reorder::{ReorderController, ReorderScope};
    use futures::executor::block_on;
    use std::cell::RefCell;

    #[derive(Default)]
    struct FakeRemover {
        deleted: RefCell<Vec<TopicId>>,
        fail: bool,
    }

    impl TopicRemover for FakeRemover {
        async fn remove_topic(&self, id: TopicId) -> ApiResult<()> {
            self.deleted.borrow_mut().push(id);
            if self.fail {
                Err(ApiError::http_status(404, r#"{"message":"Topic not found"}"#))
            } else {
                Ok(())
            }
        }
    }

    fn topic(id: TopicId, slug: &str, order_no: u32) -> Topic {
        Topic {
            id,
            title: slug.to_uppercase(),
            slug: slug.to_string(),
            description: None,
            parent_id: Some(1),
            order_no,
            full_path: format!("python/{slug}"),
            created_at: None,
        }
    }

    #[test]
    fn test_delete_listed_topic_removes_only_it() {
        let remover = FakeRemover::default();
        let mut children = ReorderController::new(
            ReorderScope::Children { parent_id: Some(1) },
            vec![topic(2, "a", 0), topic(3, "b", 1), topic(4, "c", 2)],
        );

        let after = block_on(delete_topic(&remover, DeleteTarget::Listed(3))).expect("ok");
        assert_eq!(after, AfterDelete::RemoveListed(3));
        if let AfterDelete::RemoveListed(id) = after {
            assert_eq!(children.remove(id).map(|t| t.id), Some(3));
        }

        assert_eq!(*remover.deleted.borrow(), vec![3]);
        let ids: Vec<_> = children.items().iter().map(|t| (t.id, t.order_no)).collect();
        assert_eq!(ids, vec![(2, 0), (4, 2)]);
    }

    #[test]
    fn test_delete_current_topic_navigates_home() {
        let remover = FakeRemover::default();
        let after = block_on(delete_topic(&remover, DeleteTarget::Current(1))).expect("ok");
        assert_eq!(after, AfterDelete::NavigateHome);
        assert_eq!(*remover.deleted.borrow(), vec![1]);
    }

    #[test]
    fn test_failed_delete_surfaces_server_message() {
        let remover = FakeRemover {
            fail: true,
            ..Default::default()
        };
        let err = block_on(delete_topic(&remover, DeleteTarget::Listed(9))).expect_err("fails");
        assert_eq!(err.to_string(), "Topic not found");
        assert_eq!(remover.deleted.borrow().len(), 1);
    }

    #[test]
    fn test_slug_follows_title_until_edited() {
        let mut d = TopicDraft::default();
        d.set_title("Advanced Python".to_string());
        assert_eq!(d.slug, "advanced-python");

        d.set_slug("adv-py".to_string());
        d.set_title("Advanced Python Concepts".to_string());
        assert_eq!(d.slug, "adv-py");
    }

    #[test]
    fn test_request_defaults_order_to_sibling_count() {
        let mut d = TopicDraft::default();
        d.set_title("Loops".to_string());
        d.description = "Iteration".to_string();

        let req = d.into_request(Some(7), 4, true).expect("valid");
        assert_eq!(req.order_no, 4);
        assert_eq!(req.parent_id, Some(7));
        assert_eq!(req.slug, "loops");

        d.order_no = Some(1);
        assert_eq!(d.into_request(None, 4, true).expect("valid").order_no, 1);
    }

    #[test]
    fn test_missing_fields_are_rejected() {
        let mut d = TopicDraft::default();
        d.set_title("Loops".to_string());

        let err = d.into_request(Some(1), 0, true).expect_err("no description");
        assert_eq!(err.kind, ApiErrorKind::MissingPrecondition);
        assert_eq!(err.to_string(), "Please fill all fields.");

        // Root topics may omit the description.
        assert!(d.into_request(None, 0, false).is_ok());

        d.set_title("   ".to_string());
        assert!(d.into_request(None, 0, false).is_err());
    }
}
