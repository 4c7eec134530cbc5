//! Property-based tests for the confirmation prompt.

#[cfg(test)]
mod tests {
    use crate::safety::{prompt_yes_no, resolve_personal_access_token};
    use crate::test_utils::ScriptedPromptHandler;
    use proptest::prelude::*;

    fn unrecognized_answer() -> impl Strategy<Value = String> {
        "[a-zA-Z ]{0,8}".prop_filter("not yes or no", |s| {
            let s = s.trim();
            !s.eq_ignore_ascii_case("yes") && !s.eq_ignore_ascii_case("no")
        })
    }

    fn any_case(word: &'static str) -> impl Strategy<Value = String> {
        proptest::collection::vec(any::<bool>(), word.len()).prop_map(move |upper| {
            word.chars()
                .zip(upper)
                .map(|(c, u)| if u { c.to_ascii_uppercase() } else { c })
                .collect()
        })
    }

    proptest! {
        // Every unrecognized answer costs exactly one more prompt.
        #[test]
        fn reprompts_once_per_unrecognized_answer(
            noise in proptest::collection::vec(unrecognized_answer(), 0..5),
            accept in any::<bool>(),
        ) {
            let mut responses: Vec<&str> = noise.iter().map(String::as_str).collect();
            responses.push(if accept { "Yes" } else { "No" });
            let handler = ScriptedPromptHandler::new(&responses);
            let prompts = handler.prompts();

            prop_assert_eq!(prompt_yes_no(&handler, "Proceed?").unwrap(), accept);
            prop_assert_eq!(prompts.lock().unwrap().len(), noise.len() + 1);
        }

        #[test]
        fn answers_are_case_insensitive_and_trimmed(
            yes in any_case("yes"),
            no in any_case("no"),
            padding in " {0,3}",
        ) {
            let yes = format!("{padding}{yes}{padding}");
            let no = format!("{padding}{no}{padding}");

            prop_assert!(prompt_yes_no(&ScriptedPromptHandler::new(&[yes.as_str()]), "Proceed?").unwrap());
            prop_assert!(!prompt_yes_no(&ScriptedPromptHandler::new(&[no.as_str()]), "Proceed?").unwrap());
        }

        #[test]
        fn blank_tokens_are_never_accepted(
            blanks in proptest::collection::vec(" {0,4}", 0..4),
            token in "[A-Za-z0-9]{1,52}",
        ) {
            let mut responses: Vec<&str> = blanks.iter().map(String::as_str).collect();
            responses.push(token.as_str());
            let handler = ScriptedPromptHandler::new(&responses);

            let resolved = resolve_personal_access_token(None, &handler).unwrap();
            prop_assert_eq!(resolved.as_str(), token.as_str());
        }
    }
}
