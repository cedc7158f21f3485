//! Routing of link taps to host callbacks.
//!
//! Every [`LinkType`] maps to at most one host callback through a fixed
//! routing table ([`route`]). Dispatch is fire-and-forget for the host: a
//! callback that fails or panics is logged and dropped so one bad handler
//! cannot take down the render tree or block later taps.

use std::panic::{self, AssertUnwindSafe};

use serde::Serialize;

use crate::error::CallbackError;
use crate::links::{LinkData, LinkType};

/// Result returned by host callbacks.
pub type CallbackResult = std::result::Result<(), CallbackError>;

/// Callbacks supplied by the screen hosting a post body.
///
/// Every method defaults to a no-op, so hosts implement only the actions they
/// support.
pub trait HostCallbacks {
    /// Open an external URL (in-app browser or confirmation sheet).
    fn open_external_link(&mut self, _url: &str) -> CallbackResult {
        Ok(())
    }

    /// Navigate to a user's profile.
    fn open_profile(&mut self, _username: &str) -> CallbackResult {
        Ok(())
    }

    /// Navigate to a post.
    fn open_post(&mut self, _permlink: &str, _author: &str) -> CallbackResult {
        Ok(())
    }

    /// Open the feed for a tag or community.
    fn open_tag_feed(&mut self, _tag: &str, _filter: Option<&str>) -> CallbackResult {
        Ok(())
    }

    /// Play a hosted video.
    fn open_video(&mut self, _url: &str) -> CallbackResult {
        Ok(())
    }

    /// Play a YouTube video starting at `start_time` seconds.
    fn open_youtube(&mut self, _video_id: &str, _start_time: u32) -> CallbackResult {
        Ok(())
    }

    /// Show an image full screen.
    fn open_image(&mut self, _url: &str) -> CallbackResult {
        Ok(())
    }

    /// Notified once per `img` element found while walking a body.
    fn element_is_image(&mut self, _url: &str) -> CallbackResult {
        Ok(())
    }
}

/// The host action a link resolves to.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "action", rename_all = "camelCase")]
pub enum Route {
    ExternalLink {
        url: String,
    },
    Profile {
        username: String,
    },
    Post {
        permlink: String,
        author: String,
    },
    #[serde(rename_all = "camelCase")]
    TagFeed {
        tag: String,
        filter: Option<String>,
    },
    Video {
        url: String,
    },
    #[serde(rename_all = "camelCase")]
    Youtube {
        video_id: String,
        start_time: u32,
    },
}

/// Look up the routing table entry for a link.
///
/// Returns `None` for [`LinkType::Unknown`] and for links missing a field
/// their route requires; those taps are ignored.
pub fn route(link: &LinkData) -> Option<Route> {
    match link.link_type {
        LinkType::External | LinkType::WitnessesLink | LinkType::ProposalLink => {
            Some(Route::ExternalLink {
                url: link.href.clone()?,
            })
        }
        LinkType::AuthorLink => Some(Route::Profile {
            username: link.author.clone()?,
        }),
        LinkType::PostLink => Some(Route::Post {
            permlink: link.permlink.clone()?,
            author: link.author.clone()?,
        }),
        LinkType::TagLink => Some(Route::TagFeed {
            tag: link.tag.clone()?,
            filter: link.filter.clone(),
        }),
        // Communities open through the tag feed.
        LinkType::CommunityLink => Some(Route::TagFeed {
            tag: link.community.clone()?,
            filter: link.filter.clone(),
        }),
        LinkType::VideoLink => Some(Route::Video {
            url: link.video_href.clone()?,
        }),
        LinkType::VideoLinkYoutube => Some(Route::Youtube {
            video_id: link.youtube_id.clone()?,
            start_time: link.start_time.unwrap_or(0),
        }),
        LinkType::Unknown => None,
    }
}

impl Route {
    /// Call the host callback this route targets.
    pub fn invoke(&self, callbacks: &mut dyn HostCallbacks) -> CallbackResult {
        match self {
            Route::ExternalLink { url } => callbacks.open_external_link(url),
            Route::Profile { username } => callbacks.open_profile(username),
            Route::Post { permlink, author } => callbacks.open_post(permlink, author),
            Route::TagFeed { tag, filter } => callbacks.open_tag_feed(tag, filter.as_deref()),
            Route::Video { url } => callbacks.open_video(url),
            Route::Youtube {
                video_id,
                start_time,
            } => callbacks.open_youtube(video_id, *start_time),
        }
    }
}

/// Route and invoke, reporting callback failures to the caller.
///
/// Panics raised by the callback are converted into
/// [`CallbackError::Panicked`]. Returns the route taken, or `None` if the tap
/// was ignored.
pub fn try_dispatch(
    link: &LinkData,
    callbacks: &mut dyn HostCallbacks,
) -> std::result::Result<Option<Route>, CallbackError> {
    let Some(route) = route(link) else {
        tracing::debug!(link_type = ?link.link_type, "ignoring tap without route");
        return Ok(None);
    };

    guarded(|| route.invoke(callbacks))?;
    Ok(Some(route))
}

/// Dispatch a tap to the host. Failures are logged and dropped.
///
/// Returns the route whose callback completed, if any.
pub fn dispatch(link: &LinkData, callbacks: &mut dyn HostCallbacks) -> Option<Route> {
    match try_dispatch(link, callbacks) {
        Ok(route) => route,
        Err(e) => {
            tracing::warn!(link_type = ?link.link_type, error = %e, "link callback failed");
            None
        }
    }
}

/// Run a host callback, turning a panic into an error.
pub(crate) fn guarded<F>(f: F) -> CallbackResult
where
    F: FnOnce() -> CallbackResult,
{
    match panic::catch_unwind(AssertUnwindSafe(f)) {
        Ok(result) => result,
        Err(payload) => {
            let msg = payload
                .downcast_ref::<&str>()
                .map(|s| s.to_string())
                .or_else(|| payload.downcast_ref::<String>().cloned())
                .unwrap_or_else(|| "unknown panic".to_string());
            Err(CallbackError::Panicked(msg))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<String>,
    }

    impl HostCallbacks for Recorder {
        fn open_external_link(&mut self, url: &str) -> CallbackResult {
            self.calls.push(format!("external {url}"));
            Ok(())
        }

        fn open_profile(&mut self, username: &str) -> CallbackResult {
            self.calls.push(format!("profile {username}"));
            Ok(())
        }

        fn open_post(&mut self, permlink: &str, author: &str) -> CallbackResult {
            self.calls.push(format!("post {author}/{permlink}"));
            Ok(())
        }

        fn open_tag_feed(&mut self, tag: &str, filter: Option<&str>) -> CallbackResult {
            self.calls.push(format!("tag {tag} {filter:?}"));
            Ok(())
        }

        fn open_video(&mut self, url: &str) -> CallbackResult {
            self.calls.push(format!("video {url}"));
            Ok(())
        }

        fn open_youtube(&mut self, video_id: &str, start_time: u32) -> CallbackResult {
            self.calls.push(format!("youtube {video_id}@{start_time}"));
            Ok(())
        }
    }

    fn link(link_type: LinkType, fill: impl FnOnce(&mut LinkData)) -> LinkData {
        let mut data = LinkData::new(link_type);
        fill(&mut data);
        data
    }

    #[test]
    fn test_routing_table() {
        let mut rec = Recorder::default();
        let links = [
            link(LinkType::External, |d| d.href = Some("https://a.io".into())),
            link(LinkType::AuthorLink, |d| d.author = Some("alice".into())),
            link(LinkType::PostLink, |d| {
                d.author = Some("alice".into());
                d.permlink = Some("hello".into());
            }),
            link(LinkType::TagLink, |d| {
                d.tag = Some("rust".into());
                d.filter = Some("trending".into());
            }),
            link(LinkType::VideoLink, |d| d.video_href = Some("https://v.io/1".into())),
            link(LinkType::VideoLinkYoutube, |d| {
                d.youtube_id = Some("abc123".into());
                d.start_time = Some(90);
            }),
            link(LinkType::WitnessesLink, |d| d.href = Some("https://w.io".into())),
            link(LinkType::ProposalLink, |d| d.href = Some("https://p.io".into())),
            link(LinkType::Unknown, |d| d.href = Some("https://u.io".into())),
        ];
        for l in &links {
            dispatch(l, &mut rec);
        }
        assert_eq!(
            rec.calls,
            vec![
                "external https://a.io",
                "profile alice",
                "post alice/hello",
                "tag rust Some(\"trending\")",
                "video https://v.io/1",
                "youtube abc123@90",
                "external https://w.io",
                "external https://p.io",
            ]
        );
    }

    #[test]
    fn test_community_shares_tag_route() {
        let tag = link(LinkType::TagLink, |d| {
            d.tag = Some("hive-123".into());
            d.filter = Some("created".into());
        });
        let community = link(LinkType::CommunityLink, |d| {
            d.community = Some("hive-123".into());
            d.filter = Some("created".into());
        });
        assert_eq!(route(&tag), route(&community));

        let mut rec = Recorder::default();
        dispatch(&tag, &mut rec);
        dispatch(&community, &mut rec);
        assert_eq!(rec.calls[0], rec.calls[1]);
    }

    #[test]
    fn test_youtube_without_start_time_starts_at_zero() {
        let l = link(LinkType::VideoLinkYoutube, |d| d.youtube_id = Some("abc123".into()));
        assert_eq!(
            route(&l),
            Some(Route::Youtube {
                video_id: "abc123".into(),
                start_time: 0
            })
        );
    }

    #[test]
    fn test_missing_required_field_is_ignored() {
        let l = link(LinkType::PostLink, |d| d.author = Some("alice".into()));
        let mut rec = Recorder::default();
        assert_eq!(try_dispatch(&l, &mut rec).unwrap(), None);
        assert!(rec.calls.is_empty());
    }

    struct Failing;

    impl HostCallbacks for Failing {
        fn open_profile(&mut self, _username: &str) -> CallbackResult {
            Err(CallbackError::failed("navigation stack unavailable"))
        }

        fn open_tag_feed(&mut self, _tag: &str, _filter: Option<&str>) -> CallbackResult {
            panic!("tag screen not registered");
        }
    }

    #[test]
    fn test_callback_error_is_reported_by_try_dispatch() {
        let l = link(LinkType::AuthorLink, |d| d.author = Some("alice".into()));
        let err = try_dispatch(&l, &mut Failing).unwrap_err();
        assert!(matches!(err, CallbackError::Failed(_)));
    }

    #[test]
    fn test_callback_panic_is_contained() {
        let l = link(LinkType::TagLink, |d| d.tag = Some("rust".into()));
        let err = try_dispatch(&l, &mut Failing).unwrap_err();
        match err {
            CallbackError::Panicked(msg) => assert_eq!(msg, "tag screen not registered"),
            other => panic!("expected panic error, got {other:?}"),
        }

        // Fire-and-forget dispatch returns normally and reports no route.
        assert_eq!(dispatch(&l, &mut Failing), None);
        let author = link(LinkType::AuthorLink, |d| d.author = Some("alice".into()));
        assert_eq!(dispatch(&author, &mut Failing), None);
    }

    #[test]
    fn test_route_serializes_with_action_tag() {
        let json = serde_json::to_value(Route::Youtube {
            video_id: "abc123".into(),
            start_time: 5,
        })
        .unwrap();
        assert_eq!(
            json,
            serde_json::json!({"action": "youtube", "videoId": "abc123", "startTime": 5})
        );
    }
}
