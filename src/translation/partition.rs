use crate::translation::{LocalizedResult, Problem, TranslationOutcome};

/// Split one group's outcomes into its translations and its problems.
///
/// When two successes share a language (`en-US` and `en-GB`), the later one
/// in iteration order wins.
pub fn partition<I>(outcomes: I) -> (LocalizedResult, Vec<Problem>)
where
    I: IntoIterator<Item = TranslationOutcome>,
{
    let mut result = LocalizedResult::new();
    let mut problems = Vec::new();

    for outcome in outcomes {
        match outcome {
            TranslationOutcome::Success { language, text } => {
                result.insert(language, text);
            }
            TranslationOutcome::Failure { problem, .. } => problems.push(problem),
        }
    }

    (result, problems)
}
