use crate::translation::{LocalizedResult, Problem, ResponseEnvelope};

/// Build the envelope from per-group results, keeping their order and
/// flattening the problems.
pub fn assemble<I>(per_group: I) -> ResponseEnvelope
where
    I: IntoIterator<Item = (LocalizedResult, Vec<Problem>)>,
{
    let mut envelope = ResponseEnvelope::default();
    for (result, problems) in per_group {
        envelope.items.push(result);
        envelope.issues.extend(problems);
    }
    envelope
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::i18n::Locale;
    use crate::translation::ProblemKind;

    fn result(language: &str, text: &str) -> LocalizedResult {
        let mut result = LocalizedResult::new();
        result.insert(language, text);
        result
    }

    fn problem(tag: &str) -> Problem {
        Problem::new(ProblemKind::Timeout, "slow", Locale::parse(tag).unwrap())
    }

    #[test]
    fn test_assemble_empty() {
        assert_eq!(assemble(Vec::new()), ResponseEnvelope::default());
    }

    #[test]
    fn test_assemble_preserves_order_and_flattens_problems() {
        let envelope = assemble(vec![
            (result("en", "first"), vec![problem("xx")]),
            (LocalizedResult::new(), vec![]),
            (result("en", "third"), vec![problem("yy"), problem("zz")]),
        ]);

        assert_eq!(envelope.items.len(), 3);
        assert_eq!(envelope.items[0].get("en"), Some("first"));
        assert!(envelope.items[1].is_empty());
        assert_eq!(envelope.items[2].get("en"), Some("third"));
        let locales: Vec<String> = envelope.issues.iter().map(|p| p.locale.to_string()).collect();
        assert_eq!(locales, vec!["xx", "yy", "zz"]);
    }
}
