use go125_parser::lexer::{Lexer, Tok};
use go125_parser::parse_source;
use proptest::prelude::*;

proptest! {
    #![proptest_config(ProptestConfig {
        cases: 256,
        .. ProptestConfig::default()
    })]
    #[test]
    fn never_panics_and_progresses(s in ".*") {
        let lx = Lexer::new(&s);

        // Max progress we have seen in the stream (end positions).
        let mut max_end = 0usize;

        // End position of the last *real* (non-injected) token.
        let mut last_real_end = 0usize;

        let max_steps = s.len().saturating_mul(4) + 64;

        for (steps, (start, tok, end)) in lx.enumerate() {
            // 1) spans must be in-bounds
            prop_assert!(start <= end, "start>end: ({start},{end}) tok={tok:?} input={s:?}");
            prop_assert!(end <= s.len(), "end out of bounds: ({start},{end}) len={} tok={tok:?} input={s:?}", s.len());

            let injected_semi = matches!(tok, Tok::Semi) && start == end;

            // 2) Real tokens must be monotonic (cannot overlap backwards)
            if !injected_semi {
                prop_assert!(
                    start >= last_real_end,
                    "real token moved backwards: start={start} < last_real_end={last_real_end} tok={tok:?} span=({start},{end}) input={s:?}"
                );
                last_real_end = end;
                // Real tokens shouldn't regress the global end.
                prop_assert!(
                    end >= max_end,
                    "real token end regressed: end={end} < max_end={max_end} tok={tok:?} input={s:?}"
                );
            } else {
                // 3) Injected semis must not appear before the already-consumed frontier.
                prop_assert!(
                    start >= max_end,
                    "injected semi before progress: pos={start} < max_end={max_end} input={s:?}"
                );
            }

            // 4) Update global progress
            max_end = max_end.max(end);

            // 5) Anti-hang guard
            prop_assert!(
                steps <= max_steps,
                "too many steps (possible hang): steps={steps} max_steps={max_steps} len={} input={s:?}",
                s.len()
            );
        }
    }

    #[test]
    fn comments_are_ordered_and_in_bounds(s in "[a-z /*\n]{0,64}") {
        let mut lx = Lexer::new(&s);
        lx.by_ref().for_each(drop);
        let comments = lx.take_comments();

        let mut prev_end = 0u32;
        for (span, _) in &comments {
            prop_assert!(span.start >= prev_end, "overlapping comments {comments:?} input={s:?}");
            prop_assert!(span.end as usize <= s.len());
            prop_assert!(s[span.start as usize..].starts_with('/'));
            prev_end = span.end;
        }
    }

    #[test]
    fn comment_groups_partition_the_comments(s in "[a-z /*\n]{0,64}") {
        let mut flat = Lexer::new(&s);
        flat.by_ref().for_each(drop);
        let comments = flat.take_comments();

        let mut grouped = Lexer::new(&s);
        grouped.by_ref().for_each(drop);
        let groups = grouped.take_comment_groups();

        prop_assert!(groups.iter().all(|g| !g.is_empty()), "empty group input={s:?}");
        let joined: Vec<_> = groups.into_iter().flatten().collect();
        prop_assert_eq!(joined, comments);
    }

    #[test]
    fn parser_never_panics(s in r"[a-z(){}\[\]*.:=;,~| \n]{0,80}") {
        let src = format!("package p\n{s}");
        let _ = parse_source(&src);
    }
}
