use mimic::{learn, synthesize};
use proptest::prelude::*;

fn raw_examples() -> impl Strategy<Value = Vec<(String, Option<String>)>> {
    prop::collection::vec(("[ -~]{0,10}", prop::option::of("[ -~]{0,6}")), 0..4)
}

fn test_inputs() -> impl Strategy<Value = Vec<String>> {
    prop::collection::vec("[ -~]{0,10}", 0..4)
}

/// Examples whose outputs are genuine substrings of their inputs, so a
/// consistent program often exists.
fn extraction_examples() -> impl Strategy<Value = Vec<(String, String)>> {
    prop::collection::vec(("[a-z0-9 ]{1,10}", 0usize..16, 0usize..16), 2..4).prop_map(|rows| {
        rows.into_iter()
            .map(|(input, r1, r2)| {
                let a = r1 % (input.len() + 1);
                let b = a + r2 % (input.len() - a + 1);
                let output = String::from(&input[a..b]);
                (input, output)
            })
            .collect()
    })
}

proptest! {
    #[test]
    fn results_align_with_tests(examples in raw_examples(), tests in test_inputs()) {
        let result = synthesize(&examples, &tests);
        prop_assert_eq!(result.test_results.len(), tests.len());
        if result.program.is_none() {
            prop_assert!(result.test_results.iter().all(|r| r.is_none()));
        }
    }

    #[test]
    fn synthesis_is_bit_identical_across_runs(
        examples in raw_examples(),
        tests in test_inputs(),
    ) {
        let first = synthesize(&examples, &tests);
        let second = synthesize(&examples, &tests);
        prop_assert_eq!(first, second);
    }

    #[test]
    fn learned_programs_reproduce_their_evidence(examples in extraction_examples()) {
        let paired: Vec<(String, Option<String>)> = examples
            .iter()
            .map(|(input, output)| (input.clone(), Some(output.clone())))
            .collect();
        if let Ok(program) = learn(&paired) {
            for (input, output) in &examples {
                // empty outputs carry no evidence and are exempt
                if !output.is_empty() {
                    prop_assert_eq!(
                        program.run(input).as_deref(),
                        Some(output.as_str()),
                        "program {} diverged",
                        program
                    );
                }
            }
        }
    }
}
