use crate::normalize::is_scheme;

/// Authority part of a URL exactly as written: everything between `scheme://`
/// and the next `/`, `?` or `#`. Empty when the URL has no authority.
pub fn network_location(url: &str) -> &str {
    let rest = match url.split_once(':') {
        Some((scheme, rest)) if is_scheme(scheme) => rest,
        _ => url,
    };
    let Some(authority) = rest.strip_prefix("//") else {
        return "";
    };
    let end = authority.find(['/', '?', '#']).unwrap_or(authority.len());
    &authority[..end]
}

/// Fraction of `links` whose network location equals the page's own,
/// rounded to two decimals. An empty link set scores exactly `0.0`.
pub fn same_domain_ratio<'a, I>(current_url: &str, links: I) -> f64
where
    I: IntoIterator<Item = &'a String>,
{
    let current = network_location(current_url);
    let (total, same) = links.into_iter().fold((0usize, 0usize), |(total, same), link| {
        let matches = network_location(link) == current;
        (total + 1, same + usize::from(matches))
    });

    if total == 0 {
        return 0.0;
    }
    round2(same as f64 / total as f64)
}

fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::result::LinkSet;

    fn links(urls: &[&str]) -> LinkSet {
        urls.iter().map(|u| u.to_string()).collect()
    }

    #[test]
    fn test_network_location() {
        assert_eq!(network_location("http://same.test/c"), "same.test");
        assert_eq!(network_location("https://user@host.test:8443/p?q"), "user@host.test:8443");
        assert_eq!(network_location("http://same.test"), "same.test");
        assert_eq!(network_location("http://same.test?x=1"), "same.test");
        assert_eq!(network_location("//cdn.test/lib.js"), "cdn.test");
        assert_eq!(network_location("mailto:me@same.test"), "");
        assert_eq!(network_location("/relative/path"), "");
        assert_eq!(network_location("http:/x//y"), "");
    }

    #[test]
    fn test_empty_links_is_zero() {
        assert_eq!(same_domain_ratio("http://same.test/", &LinkSet::new()), 0.0);
    }

    #[test]
    fn test_two_of_three() {
        let set = links(&["http://same.test/a", "http://other.test/b", "http://same.test/c"]);
        assert_eq!(same_domain_ratio("http://same.test/", &set), 0.67);
    }

    #[test]
    fn test_order_independent() {
        let forward = vec![
            "http://same.test/a".to_string(),
            "http://other.test/b".to_string(),
            "http://same.test/c".to_string(),
        ];
        let mut backward = forward.clone();
        backward.reverse();
        assert_eq!(
            same_domain_ratio("http://same.test/", &forward),
            same_domain_ratio("http://same.test/", &backward)
        );
    }

    #[test]
    fn test_port_and_case_are_significant() {
        let set = links(&["http://same.test:8080/a", "http://SAME.test/b"]);
        assert_eq!(same_domain_ratio("http://same.test/", &set), 0.0);
    }

    #[test]
    fn test_all_same() {
        let set = links(&["http://same.test/a", "https://same.test/b"]);
        assert_eq!(same_domain_ratio("http://same.test/", &set), 1.0);
    }
}
