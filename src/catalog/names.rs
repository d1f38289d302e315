use std::sync::LazyLock;

use regex::Regex;

static PAREN_GROUP_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(r"\s*\([^)]*\)").unwrap());

/// Strip parenthesized annotations ("Golf (5G1)" → "Golf").
/// An unterminated "(" drops everything after it.
pub fn clean_name(name: &str) -> String {
    let stripped = PAREN_GROUP_RE.replace_all(name, "");
    let kept = match stripped.find('(') {
        Some(idx) => &stripped[..idx],
        None => &stripped[..],
    };
    kept.trim().to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn no_parens() {
        assert_eq!(clean_name("Golf"), "Golf");
        assert_eq!(clean_name("  Golf  "), "Golf");
    }

    #[test]
    fn single_group() {
        assert_eq!(clean_name("Golf (5G1)"), "Golf");
    }

    #[test]
    fn multiple_groups() {
        assert_eq!(clean_name("Golf (A) (B)"), "Golf");
    }

    #[test]
    fn unterminated() {
        assert_eq!(clean_name("Golf (5G1"), "Golf");
        assert_eq!(clean_name("1.6 HDi (90 ch"), "1.6 HDi");
    }

    #[test]
    fn group_in_the_middle() {
        assert_eq!(clean_name("Clio IV (BH_) 0.9 TCe"), "Clio IV 0.9 TCe");
    }

    #[test]
    fn only_annotation() {
        assert_eq!(clean_name("(facelift)"), "");
    }

    #[test]
    fn idempotent() {
        for name in ["Golf (A) (B", "208 (Phase 2)", "Clio IV (BH_) 0.9 TCe"] {
            let once = clean_name(name);
            assert_eq!(clean_name(&once), once);
        }
    }
}
