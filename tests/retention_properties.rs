use proptest::prelude::*;
use sctm::memory::scoring::score;
use sctm::memory::selector::RandomSelector;
use sctm::memory::{RetentionBuffer, RetentionConfig};

#[derive(Debug, Clone)]
enum Op {
    Insert(f64),
    Advance(u64),
    Query,
}

fn arb_op() -> impl Strategy<Value = Op> {
    prop_oneof![
        (0.0f64..1.0).prop_map(Op::Insert),
        (0u64..20).prop_map(Op::Advance),
        Just(Op::Query),
    ]
}

proptest! {
    #[test]
    fn zero_usage_scores_zero(
        confidence in 0.0f64..10.0,
        decay_rate in 0.0f64..5.0,
        elapsed in -100.0f64..100.0,
    ) {
        prop_assert_eq!(score(confidence, 0, decay_rate, elapsed), 0.0);
    }

    #[test]
    fn monotonically_decreasing_in_elapsed(
        confidence in 0.0f64..1.0,
        usage in 0u32..1000,
        decay_rate in 0.001f64..1.0,
        e1 in -50.0f64..50.0,
        gap in 0.0f64..50.0,
    ) {
        let near = score(confidence, usage, decay_rate, e1);
        let far = score(confidence, usage, decay_rate, e1 + gap);
        prop_assert!(near >= far);
    }

    #[test]
    fn monotonically_increasing_in_usage(
        confidence in 0.0f64..1.0,
        usage in 0u32..1000,
        elapsed in 0.0f64..50.0,
    ) {
        prop_assert!(score(confidence, usage + 1, 0.05, elapsed) >= score(confidence, usage, 0.05, elapsed));
    }

    #[test]
    fn buffer_invariants_hold(
        capacity in 1usize..8,
        ops in prop::collection::vec(arb_op(), 0..120),
        seed in any::<u64>(),
    ) {
        let config = RetentionConfig::default().with_capacity(capacity);
        let rate = config.decay_rate;
        let mut buffer = RetentionBuffer::new(config).unwrap();
        let mut selector = RandomSelector::seeded(seed);
        let mut last_clock = 0;

        for op in ops {
            match op {
                Op::Insert(confidence) => {
                    let was_full = buffer.len() == capacity;
                    let expected_victim = buffer
                        .items()
                        .iter()
                        .min_by(|a, b| a.score().total_cmp(&b.score()).then(a.id().cmp(&b.id())))
                        .map(|item| item.id());
                    let before = buffer.len();

                    let outcome = buffer.insert("fact", confidence, rate);

                    if was_full {
                        prop_assert_eq!(outcome.evicted.map(|e| e.id), expected_victim);
                        prop_assert_eq!(buffer.len(), before);
                    } else {
                        prop_assert!(outcome.evicted.is_none());
                        prop_assert_eq!(buffer.len(), before + 1);
                    }
                }
                Op::Advance(delta) => {
                    let before: Vec<_> = buffer.items().iter().map(|i| (i.last_touched(), i.usage())).collect();
                    buffer.advance_clock(delta, rate);
                    let after: Vec<_> = buffer.items().iter().map(|i| (i.last_touched(), i.usage())).collect();
                    prop_assert_eq!(before, after);
                }
                Op::Query => {
                    let usages: Vec<_> = buffer.items().iter().map(|i| (i.id(), i.usage())).collect();
                    match buffer.query(&mut selector) {
                        Some(item) => {
                            let prior = usages.iter().find(|(id, _)| *id == item.id()).map(|(_, u)| *u);
                            prop_assert_eq!(Some(item.usage()), prior.map(|u| u + 1));
                            prop_assert_eq!(item.last_touched(), buffer.clock());
                            prop_assert_eq!(item.score(), score(item.confidence(), item.usage(), rate, 0.0));
                        }
                        None => prop_assert!(buffer.is_empty()),
                    }
                }
            }

            prop_assert!(buffer.len() <= capacity);
            prop_assert!(buffer.clock() >= last_clock);
            last_clock = buffer.clock();

            let ids: Vec<_> = buffer.items().iter().map(|i| i.id()).collect();
            prop_assert!(ids.windows(2).all(|w| w[0] < w[1]));

            for item in buffer.items() {
                let expected = score(item.confidence(), item.usage(), rate, item.elapsed_at(buffer.clock()));
                prop_assert!((item.score() - expected).abs() < 1e-12);
            }
        }
    }
}
