//! Sanitization for untrusted text and URLs.

/// Sanitize a single line of user-submitted text.
///
/// Applied to every value that arrives through the save endpoint before it is
/// persisted:
///
/// - HTML tags (`<b>`, `</script>`, `<!-- -->`, ...) are removed
/// - stray `<` / `>` characters are removed
/// - percent-encoded octets (`%0a`, `%3C`) are removed
/// - control characters are removed and whitespace runs collapse to one space
/// - leading and trailing whitespace is trimmed
///
/// # Examples
///
/// ```
/// use category_display_core::sanitize_text_field;
///
/// assert_eq!(sanitize_text_field("  <b>shoes</b>\n"), "shoes");
/// assert_eq!(sanitize_text_field("a%0Ab"), "ab");
/// ```
#[must_use]
pub fn sanitize_text_field(input: &str) -> String {
    let without_tags = strip_tags(input);
    let without_octets = strip_percent_octets(&without_tags);

    let mut out = String::with_capacity(without_octets.len());
    let mut pending_space = false;
    for c in without_octets.chars() {
        if c.is_whitespace() {
            pending_space = true;
            continue;
        }
        if c.is_control() || c == '<' || c == '>' {
            continue;
        }
        if pending_space && !out.is_empty() {
            out.push(' ');
        }
        pending_space = false;
        out.push(c);
    }
    out
}

/// Remove anything that looks like a tag: `<` followed by a letter, `/`, `!` or `?`,
/// up to and including the next `>`.
fn strip_tags(input: &str) -> String {
    let mut out = String::with_capacity(input.len());
    let mut chars = input.chars().peekable();

    while let Some(c) = chars.next() {
        let opens_tag = c == '<'
            && chars
                .peek()
                .is_some_and(|n| n.is_ascii_alphabetic() || matches!(n, '/' | '!' | '?'));

        if opens_tag {
            for skipped in chars.by_ref() {
                if skipped == '>' {
                    break;
                }
            }
        } else {
            out.push(c);
        }
    }
    out
}

fn strip_percent_octets(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = String::with_capacity(input.len());
    let mut i = 0;

    while i < bytes.len() {
        let is_octet = bytes.get(i) == Some(&b'%')
            && bytes.get(i + 1).is_some_and(u8::is_ascii_hexdigit)
            && bytes.get(i + 2).is_some_and(u8::is_ascii_hexdigit);
        if is_octet {
            i += 3;
            continue;
        }
        // Copy one full UTF-8 character starting at `i`.
        let Some(rest) = input.get(i..) else { break };
        let Some(c) = rest.chars().next() else { break };
        out.push(c);
        i += c.len_utf8();
    }
    out
}

/// Accept only `http(s)` and root-relative URLs, trimmed.
///
/// ```
/// use category_display_core::safe_url;
///
/// assert_eq!(safe_url(" /hats.jpg "), Some("/hats.jpg"));
/// assert_eq!(safe_url("javascript:alert(1)"), None);
/// ```
#[must_use]
pub fn safe_url(url: &str) -> Option<&str> {
    let trimmed = url.trim();
    let lower = trimmed.to_ascii_lowercase();
    let allowed = lower.starts_with("https://")
        || lower.starts_with("http://")
        || trimmed.starts_with('/');
    allowed.then_some(trimmed)
}
