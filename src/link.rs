//! Link canonicalization: drop the query string, keep everything else.

use url::Url;

/// Remove the query component (`?utm_source=...` and friends) from `link`.
///
/// The query is cut out of the original text, so scheme, host, path and
/// fragment come back exactly as written (no case folding, Punycode, dot
/// segment resolution or added `/`).  `Url` only decides whether an
/// absolute link has a query at all; a link without one is returned
/// unchanged.
pub fn strip_query(link: &str) -> String {
    match Url::parse(link) {
        Ok(url) if url.query().is_none() => link.to_string(),
        _ => strip_query_text(link),
    }
}

/// Cut from the first `?` before the fragment up to the fragment.
fn strip_query_text(link: &str) -> String {
    let (before_fragment, fragment) = match link.find('#') {
        Some(i) => link.split_at(i),
        None => (link, ""),
    };
    let base = before_fragment
        .split_once('?')
        .map_or(before_fragment, |(base, _)| base);
    format!("{base}{fragment}")
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn removes_tracking_query() {
        assert_eq!(
            strip_query("http://example.com/a?utm_source=x"),
            "http://example.com/a"
        );
    }

    #[test]
    fn keeps_fragment_and_path() {
        assert_eq!(
            strip_query("https://example.com/blog/2024/post.html?utm_medium=rss&id=7#comments"),
            "https://example.com/blog/2024/post.html#comments"
        );
    }

    #[test]
    fn empty_query_is_removed() {
        assert_eq!(strip_query("https://example.com/a?#frag"), "https://example.com/a#frag");
    }

    #[test]
    fn link_without_query_is_untouched() {
        for link in [
            "https://example.com/a/b/",
            "https://example.com/a#section",
            "HTTP://Example.COM/Path",
            "https://example.com",
        ] {
            assert_eq!(strip_query(link), link);
        }
    }

    #[test]
    fn question_mark_inside_fragment_is_not_a_query() {
        assert_eq!(
            strip_query("https://example.com/page#faq?q=1"),
            "https://example.com/page#faq?q=1"
        );
    }

    #[test]
    fn original_text_is_kept_when_a_query_is_removed() {
        assert_eq!(strip_query("HTTP://Example.COM/Path?x=1"), "HTTP://Example.COM/Path");
        assert_eq!(strip_query("http://example.com/a/../b?x=1"), "http://example.com/a/../b");
        assert_eq!(strip_query("https://example.com?utm=1"), "https://example.com");
        assert_eq!(strip_query("http://café.example/a?x=1"), "http://café.example/a");
    }

    #[test]
    fn parsed_components_survive() {
        let original = Url::parse("https://user@example.com:8443/p/q?x=1&y=2#f").unwrap();
        let stripped = Url::parse(&strip_query(original.as_str())).unwrap();

        assert_eq!(stripped.query(), None);
        assert_eq!(stripped.scheme(), original.scheme());
        assert_eq!(stripped.host_str(), original.host_str());
        assert_eq!(stripped.port(), original.port());
        assert_eq!(stripped.path(), original.path());
        assert_eq!(stripped.fragment(), original.fragment());
    }

    #[test]
    fn only_the_query_is_removed_across_url_shapes() {
        let schemes = ["http", "HTTPS"];
        let hosts = [
            "example.com",
            "Example.COM",
            "café.example",
            "example.com:8080",
            "user@example.com",
            "[::1]:8443",
        ];
        let paths = ["", "/", "/a/../b", "/A/b.html", "/%7Euser/x%20y", "/a;b"];
        let queries = ["", "?", "?utm_source=x", "?a=1&b=%2F&c"];
        let fragments = ["", "#", "#top", "#faq?q=1", "#a/../b"];

        for scheme in schemes {
            for host in hosts {
                for path in paths {
                    for query in queries {
                        for fragment in fragments {
                            let link = format!("{scheme}://{host}{path}{query}{fragment}");
                            let expected = format!("{scheme}://{host}{path}{fragment}");
                            assert_eq!(strip_query(&link), expected, "for {link:?}");
                        }
                    }
                }
            }
        }
    }

    #[test]
    fn relative_links_fall_back_to_text() {
        assert_eq!(strip_query("/posts/1?ref=home#top"), "/posts/1#top");
        assert_eq!(strip_query("posts/1"), "posts/1");
        assert_eq!(strip_query(""), "");
    }
}
