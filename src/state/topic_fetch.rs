use super::AppState;
use crate::api::{ApiClient, ApiError, ApiErrorKind, ApiResult};
use crate::models::TopicDetail;
use futures::future::{AbortHandle, AbortRegistration, Abortable};
use leptos::logging::log;
use leptos::prelude::*;
use leptos::task::spawn_local;

/// Where topic details come from.
pub(crate) trait DetailSource {
    async fn load_detail(&self, path: &str) -> ApiResult<TopicDetail>;
}

impl DetailSource for ApiClient {
    async fn load_detail(&self, path: &str) -> ApiResult<TopicDetail> {
        self.topic_detail(path).await
    }
}

/// Run one detail load that `registration` can cancel. `None` means it was
/// aborted, either through the handle or by the transport.
pub(crate) async fn load_abortable<S: DetailSource>(
    source: &S,
    path: &str,
    registration: AbortRegistration,
) -> Option<ApiResult<TopicDetail>> {
    let result = Abortable::new(source.load_detail(path), registration)
        .await
        .unwrap_or_else(|_| Err(ApiError::aborted()));

    match result {
        Err(e) if e.kind == ApiErrorKind::Aborted => {
            log!("topic fetch for `{path}` aborted");
            None
        }
        other => Some(other),
    }
}

/// Load `{topic, children, blocks}` for `path`, tied to the current owner:
/// when the view is torn down (or re-rendered for another path) the request
/// is aborted and `on_done` never runs.
pub(crate) fn fetch_topic_detail<F>(app: AppState, path: String, on_done: F)
where
    F: FnOnce(ApiResult<TopicDetail>) + 'static,
{
    let (handle, registration) = AbortHandle::new_pair();
    on_cleanup(move || handle.abort());

    let client = app.client();
    spawn_local(async move {
        let Some(result) = load_abortable(&client, &path, registration).await else {
            return;
        };
        if let Err(e) = &result {
            app.handle_unauthorized(e);
        }
        on_done(result);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Topic;
    use futures::executor::block_on;
    use std::cell::Cell;

    /// Never answers, like a request still on the wire.
    struct Hanging {
        polled: Cell<bool>,
    }

    impl DetailSource for Hanging {
        async fn load_detail(&self, _path: &str) -> ApiResult<TopicDetail> {
            self.polled.set(true);
            futures::future::pending().await
        }
    }

    /// Answers immediately with a fixed result.
    struct Canned(ApiResult<TopicDetail>);

    impl DetailSource for Canned {
        async fn load_detail(&self, _path: &str) -> ApiResult<TopicDetail> {
            self.0.clone()
        }
    }

    fn detail() -> TopicDetail {
        TopicDetail {
            topic: Topic {
                id: 1,
                title: "Python".to_string(),
                slug: "python".to_string(),
                description: None,
                parent_id: None,
                order_no: 0,
                full_path: "python".to_string(),
                created_at: None,
            },
            children: vec![],
            blocks: vec![],
        }
    }

    #[test]
    fn test_abort_while_in_flight_yields_nothing() {
        let source = Hanging {
            polled: Cell::new(false),
        };
        let (handle, registration) = AbortHandle::new_pair();

        block_on(async {
            let load = load_abortable(&source, "python", registration);
            futures::pin_mut!(load);
            assert!(futures::poll!(load.as_mut()).is_pending());
            assert!(source.polled.get());

            handle.abort();
            assert!(load.await.is_none());
        });
    }

    #[test]
    fn test_abort_before_start_never_polls_source() {
        let source = Hanging {
            polled: Cell::new(false),
        };
        let (handle, registration) = AbortHandle::new_pair();
        handle.abort();

        assert!(block_on(load_abortable(&source, "python", registration)).is_none());
        assert!(!source.polled.get());
    }

    #[test]
    fn test_transport_abort_is_swallowed() {
        let (_handle, registration) = AbortHandle::new_pair();
        let source = Canned(Err(ApiError::aborted()));
        assert!(block_on(load_abortable(&source, "python", registration)).is_none());
    }

    #[test]
    fn test_results_and_real_errors_pass_through() {
        let (_handle, registration) = AbortHandle::new_pair();
        let ok = block_on(load_abortable(&Canned(Ok(detail())), "python", registration));
        assert_eq!(ok, Some(Ok(detail())));

        let (_handle, registration) = AbortHandle::new_pair();
        let err = block_on(load_abortable(
            &Canned(Err(ApiError::http_status(404, ""))),
            "nope",
            registration,
        ));
        assert_eq!(err.map(|r| r.is_err()), Some(true));
    }
}
