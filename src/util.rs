//! Small standalone helpers shared by more than one module.

/// Parse an edge weight out of an attribute value.
///
/// `dijkstra` looks up a caller-chosen attribute key and needs to treat a
/// missing or unparseable value as "skip this edge" rather than as an
/// error, so this returns `Option` rather than `Result`.
pub fn parse_weight(raw: &str) -> Option<f64> {
    let weight: f64 = raw.trim().parse().ok()?;
    if weight.is_finite() {
        Some(weight)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_plain_numbers() {
        assert_eq!(parse_weight("5"), Some(5.0));
        assert_eq!(parse_weight("  3.25 "), Some(3.25));
        assert_eq!(parse_weight("-1.5"), Some(-1.5));
    }

    #[test]
    fn rejects_garbage_and_non_finite() {
        assert_eq!(parse_weight("not-a-number"), None);
        assert_eq!(parse_weight(""), None);
        assert_eq!(parse_weight("NaN"), None);
        assert_eq!(parse_weight("inf"), None);
    }
}
