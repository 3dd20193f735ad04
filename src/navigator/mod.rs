//! Topic paths: slugs, breadcrumbs, and `/topic/...` route parsing.

pub(crate) const TOPIC_PREFIX: &str = "/topic/";

const ADD_CONTENT_SUFFIX: &str = "/add-content";
const UPDATE_CONTENT_SUFFIX: &str = "/update-content";
const ADD_SUBTOPIC_SUFFIX: &str = "/add";

/// Derive a URL slug from a title.
///
/// Post: lower-case, each whitespace run becomes one `-`, no leading or
/// trailing `-`. Other characters pass through untouched.
pub(crate) fn slugify(title: &str) -> String {
    title
        .split_whitespace()
        .map(|w| w.to_lowercase())
        .collect::<Vec<_>>()
        .join("-")
        .trim_matches('-')
        .to_string()
}

/// Which view a `/topic/...` URL addresses.
#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) enum TopicRoute {
    Detail(String),
    AddContent(String),
    UpdateContent(String),
    AddSubtopic(String),
}

/// Parse a browser pathname such as `/topic/python/basics/add-content`.
///
/// Returns `None` outside `/topic/` or when no topic path remains. A topic
/// whose own slug equals an action word (`add`, `add-content`, ...) is
/// shadowed by the action.
pub(crate) fn parse_topic_route(pathname: &str) -> Option<TopicRoute> {
    // Keep the leading `/` so a bare action (`/topic/add`) leaves an empty path.
    let rest = pathname.strip_prefix(TOPIC_PREFIX.trim_end_matches('/'))?;
    if !rest.starts_with('/') {
        return None;
    }
    let rest = rest.trim_end_matches('/');

    let (ctor, path): (fn(String) -> TopicRoute, &str) =
        if let Some(p) = rest.strip_suffix(ADD_CONTENT_SUFFIX) {
            (TopicRoute::AddContent, p)
        } else if let Some(p) = rest.strip_suffix(UPDATE_CONTENT_SUFFIX) {
            (TopicRoute::UpdateContent, p)
        } else if let Some(p) = rest.strip_suffix(ADD_SUBTOPIC_SUFFIX) {
            (TopicRoute::AddSubtopic, p)
        } else {
            (TopicRoute::Detail, rest)
        };

    let path = path.trim_matches('/');
    if path.is_empty() {
        return None;
    }
    Some(ctor(path.to_string()))
}

pub(crate) fn topic_href(path: &str) -> String {
    format!("{TOPIC_PREFIX}{}", path.trim_matches('/'))
}

pub(crate) fn add_content_href(path: &str) -> String {
    format!("{}{ADD_CONTENT_SUFFIX}", topic_href(path))
}

pub(crate) fn update_content_href(path: &str) -> String {
    format!("{}{UPDATE_CONTENT_SUFFIX}", topic_href(path))
}

pub(crate) fn add_subtopic_href(path: &str) -> String {
    format!("{}{ADD_SUBTOPIC_SUFFIX}", topic_href(path))
}

/// Path of a new child under `parent_path`.
pub(crate) fn child_path(parent_path: &str, slug: &str) -> String {
    let parent = parent_path.trim_matches('/');
    if parent.is_empty() {
        slug.to_string()
    } else {
        format!("{parent}/{slug}")
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub(crate) struct Breadcrumb<'a> {
    pub label: &'a str,
    pub href: String,
}

/// Lazy breadcrumb sequence over a slash-joined topic path.
///
/// Cloning restarts from the same position; [`breadcrumbs`] always starts at
/// the root. Empty segments (doubled or edge slashes) are skipped.
#[derive(Clone, Debug)]
pub(crate) struct Breadcrumbs<'a> {
    path: &'a str,
    pos: usize,
}

pub(crate) fn breadcrumbs(path: &str) -> Breadcrumbs<'_> {
    Breadcrumbs { path, pos: 0 }
}

impl<'a> Iterator for Breadcrumbs<'a> {
    type Item = Breadcrumb<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if self.pos >= self.path.len() {
                return None;
            }
            let rest = &self.path[self.pos..];
            let len = rest.find('/').unwrap_or(rest.len());
            let start = self.pos;
            let end = start + len;
            self.pos = end + 1;

            if len == 0 {
                continue;
            }

            let label = &self.path[start..end];
            let cumulative = self.path[..end].trim_start_matches('/');
            let href = topic_href(&collapse_slashes(cumulative));
            return Some(Breadcrumb { label, href });
        }
    }
}

fn collapse_slashes(path: &str) -> String {
    path.split('/')
        .filter(|s| !s.is_empty())
        .collect::<Vec<_>>()
        .join("/")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_breadcrumbs_link_cumulative_paths() {
        let crumbs: Vec<_> = breadcrumbs("python/basics/loops").collect();
        let hrefs: Vec<_> = crumbs.iter().map(|c| c.href.as_str()).collect();
        assert_eq!(
            hrefs,
            vec![
                "/topic/python",
                "/topic/python/basics",
                "/topic/python/basics/loops"
            ]
        );
        let labels: Vec<_> = crumbs.iter().map(|c| c.label).collect();
        assert_eq!(labels, vec!["python", "basics", "loops"]);
    }

    #[test]
    fn test_breadcrumbs_are_restartable() {
        let crumbs = breadcrumbs("a/b");
        let first: Vec<_> = crumbs.clone().collect();
        let second: Vec<_> = crumbs.collect();
        assert_eq!(first, second);
        assert_eq!(first.len(), 2);
    }

    #[test]
    fn test_breadcrumbs_skip_empty_segments() {
        let hrefs: Vec<_> = breadcrumbs("/a//b/").map(|c| c.href).collect();
        assert_eq!(hrefs, vec!["/topic/a", "/topic/a/b"]);
        assert_eq!(breadcrumbs("").count(), 0);
    }

    #[test]
    fn test_breadcrumbs_do_not_normalize_segments() {
        let labels: Vec<_> = breadcrumbs("Python/Basics").map(|c| c.label).collect();
        assert_eq!(labels, vec!["Python", "Basics"]);
    }

    #[test]
    fn test_parse_topic_route_variants() {
        assert_eq!(
            parse_topic_route("/topic/python/basics"),
            Some(TopicRoute::Detail("python/basics".to_string()))
        );
        assert_eq!(
            parse_topic_route("/topic/python/basics/add-content"),
            Some(TopicRoute::AddContent("python/basics".to_string()))
        );
        assert_eq!(
            parse_topic_route("/topic/python/update-content/"),
            Some(TopicRoute::UpdateContent("python".to_string()))
        );
        assert_eq!(
            parse_topic_route("/topic/python/add"),
            Some(TopicRoute::AddSubtopic("python".to_string()))
        );
    }

    #[test]
    fn test_parse_topic_route_rejects_empty_or_foreign_paths() {
        assert_eq!(parse_topic_route("/topic/"), None);
        assert_eq!(parse_topic_route("/topic/add-content"), None);
        assert_eq!(parse_topic_route("/explore"), None);
    }

    #[test]
    fn test_slugify_postconditions() {
        assert_eq!(slugify("Advanced Python  Concepts"), "advanced-python-concepts");
        assert_eq!(slugify("  Loops\tand\nLists "), "loops-and-lists");
        assert_eq!(slugify("-Edge-"), "edge");
        assert_eq!(slugify(""), "");
    }

    #[test]
    fn test_hrefs_for_actions() {
        assert_eq!(add_content_href("python/basics"), "/topic/python/basics/add-content");
        assert_eq!(update_content_href("python"), "/topic/python/update-content");
        assert_eq!(add_subtopic_href("/python/"), "/topic/python/add");
        assert_eq!(child_path("python", "loops"), "python/loops");
        assert_eq!(child_path("", "python"), "python");
    }
}
