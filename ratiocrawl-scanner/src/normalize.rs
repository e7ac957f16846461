use crate::config::DEFAULT_URL_PROTOCOL;

/// Prefix `protocol://` onto a URL that has neither a scheme nor a network
/// location, e.g. `example.com/path`. Anything else is returned unchanged.
///
/// This is the only normalization applied to URLs: hosts are not lowercased
/// and paths and queries are left untouched.
pub fn add_protocol(url: &str, protocol: &str) -> String {
    if has_scheme(url) || has_network_location(url) {
        url.to_string()
    } else {
        format!("{}://{}", protocol, url)
    }
}

/// [`add_protocol`] with the default `https` scheme
pub fn add_default_protocol(url: &str) -> String {
    add_protocol(url, DEFAULT_URL_PROTOCOL)
}

fn has_network_location(url: &str) -> bool {
    url.starts_with("//")
}

fn has_scheme(url: &str) -> bool {
    let Some((scheme, rest)) = url.split_once(':') else {
        return false;
    };

    if !is_scheme(scheme) {
        return false;
    }

    // `host:8080/path` is a host with a port, not a scheme
    let port = rest.split(['/', '?', '#']).next().unwrap_or_default();
    port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit())
}

/// `ALPHA *( ALPHA / DIGIT / "+" / "-" / "." )`
pub(crate) fn is_scheme(candidate: &str) -> bool {
    let mut chars = candidate.chars();
    chars.next().is_some_and(|c| c.is_ascii_alphabetic())
        && chars.all(|c| c.is_ascii_alphanumeric() || matches!(c, '+' | '-' | '.'))
}
