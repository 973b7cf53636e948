//! Nested selector flattening.

/// Marker standing for the enclosing selector.
pub const PARENT_MARKER: char = '&';

/// Combine a rule's own selectors with the enclosing rule's flattened ones.
///
/// With no enclosing selectors the own list is returned unchanged.
/// Otherwise every (own, outer) pair produces one selector, own-major:
/// `&x` becomes `outer` + `x`, anything else becomes `outer x`.
pub fn flatten(own: &[String], outer: Option<&[String]>) -> Vec<String> {
    let Some(outer) = outer else {
        return own.to_vec();
    };

    let mut flattened = Vec::with_capacity(own.len() * outer.len());
    for selector in own {
        for parent in outer {
            flattened.push(match selector.strip_prefix(PARENT_MARKER) {
                Some(rest) => format!("{parent}{rest}"),
                None => format!("{parent} {selector}"),
            });
        }
    }
    flattened
}

/// Join selectors into a rule head.
pub fn join(selectors: &[String]) -> String {
    selectors.join(",")
}
