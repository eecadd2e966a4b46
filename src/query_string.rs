use std::collections::HashMap;

/// Listing request parameters: `?category=..&page=..&q=..`.
#[derive(PartialEq, Debug)]
pub struct ListingQuery {
    items: HashMap<String, String>,
}

impl ListingQuery {
    pub fn from(buf: &str) -> Self {
        let buf = buf.trim_start_matches('?');
        let vs: Vec<(String, String)> = serde_urlencoded::from_str(buf).unwrap_or_else(|_| vec![]);
        let items: HashMap<String, String> = vs.into_iter().collect();

        ListingQuery {
            items,
        }
    }

    pub fn with_params(category: Option<&str>, search: Option<&str>, page: u32) -> Self {
        let mut items = HashMap::new();
        if let Some(category) = category {
            items.insert("category".to_string(), category.to_string());
        }
        if let Some(search) = search {
            items.insert("q".to_string(), search.to_string());
        }
        items.insert("page".to_string(), page.to_string());

        ListingQuery {
            items,
        }
    }

    /// Selected category; empty means no filter.
    pub fn get_category(&self) -> Option<&str> {
        self.get_non_empty("category")
    }

    pub fn get_search(&self) -> Option<&str> {
        self.get_non_empty("q")
    }

    pub fn get_page(&self) -> u32 {
        let one = "1".to_string();
        let val = self.items.get("page").unwrap_or(&one);
        let val = val.trim().parse().unwrap_or(1);
        if val == 0 { return 1; }
        val
    }

    fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.items.get(key)
            .map(|v| v.trim())
            .filter(|v| !v.is_empty())
    }
}

/// Percent-decodes a URL path. Unlike query strings, `+` stays a plus sign.
pub fn decode_path(path: &str) -> String {
    let escaped = path.replace('+', "%2B").replace('&', "%26").replace('=', "%3D");
    let decoded: Vec<(String, String)> = match serde_urlencoded::from_str(&format!("p={}", escaped)) {
        Ok(decoded) => decoded,
        Err(_) => return path.to_string(),
    };
    decoded.into_iter()
        .next()
        .map(|(_, value)| value)
        .unwrap_or_else(|| path.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_get_page() {
        assert_eq!(ListingQuery::from("page=3").get_page(), 3);
        assert_eq!(ListingQuery::from("page=0").get_page(), 1);
        assert_eq!(ListingQuery::from("page=-2").get_page(), 1);
        assert_eq!(ListingQuery::from("page=abc").get_page(), 1);
        assert_eq!(ListingQuery::from("").get_page(), 1);
    }

    #[test]
    fn test_category_and_search() {
        let qs = ListingQuery::from("?category=%ED%9A%8C%EA%B3%A0&q=react+hooks");
        assert_eq!(qs.get_category(), Some("회고"));
        assert_eq!(qs.get_search(), Some("react hooks"));

        let qs = ListingQuery::from("category=&q=%20");
        assert_eq!(qs.get_category(), None);
        assert_eq!(qs.get_search(), None);
    }

    #[test]
    fn test_with_params() {
        let qs = ListingQuery::with_params(Some("rust"), None, 2);
        assert_eq!(qs, ListingQuery::from("category=rust&page=2"));
        assert_eq!(ListingQuery::with_params(None, Some(" "), 0).get_page(), 1);
        assert_eq!(ListingQuery::with_params(None, Some(" "), 0).get_search(), None);
    }

    #[test]
    fn test_parse_key_only_query_str() {
        let buf = "key-only";
        let expected: HashMap<String, String> = vec![("key-only", "")].iter().map(|(x, y)| (x.to_string(), y.to_string())).collect::<HashMap<_, _>>();
        assert_eq!(ListingQuery::from(buf), ListingQuery { items: expected });
    }

    #[test]
    fn test_decode_path() {
        assert_eq!(decode_path("%ED%9A%8C%EA%B3%A0/2024-%ED%9A%8C%EA%B3%A0"), "회고/2024-회고");
        assert_eq!(decode_path("cpp/c++"), "cpp/c++");
        assert_eq!(decode_path("a/b%20c"), "a/b c");
        assert_eq!(decode_path("a/x=1&y=2"), "a/x=1&y=2");
        assert_eq!(decode_path("plain/path"), "plain/path");
    }
}
