mod common;

use chrono::Duration;
use common::{base, from_events};
use fraud_core::config::SplitConfig;
use fraud_core::evaluation::ScoredTransaction;
use fraud_core::{
    CustomerFeatureBuilder, FeaturePipeline, FraudError, LeakagePartitioner, TerminalRiskBuilder,
    TopKEvaluator, Transaction,
};
use proptest::prelude::*;
use std::collections::HashSet;

const FORTY_DAYS_MIN: u32 = 40 * 24 * 60;

fn events() -> impl Strategy<Value = Vec<(u64, u64, u32, f64, bool)>> {
    proptest::collection::vec(
        (0u64..6, 0u64..4, 0u32..FORTY_DAYS_MIN, 0.0f64..500.0, proptest::bool::weighted(0.2)),
        1..80,
    )
}

fn scored_rows() -> impl Strategy<Value = Vec<ScoredTransaction>> {
    proptest::collection::vec((0u64..8, 0i64..10, any::<bool>(), 0.0f64..1.0), 0..120).prop_map(|mut rows| {
        rows.sort_by_key(|r| r.1);
        rows.into_iter()
            .enumerate()
            .map(|(i, (customer_id, time_days, is_fraud, score))| ScoredTransaction {
                transaction_id: i as u64,
                customer_id,
                time_days,
                is_fraud,
                score,
            })
            .collect()
    })
}

/// A far-out transaction strictly after everything else, for `victim`'s customer and terminal.
fn future_outlier(txs: &[Transaction], victim: &Transaction) -> Transaction {
    let last = txs.iter().max_by_key(|t| t.tx_datetime).unwrap();
    let dt = last.tx_datetime + Duration::hours(1);
    Transaction::new(
        txs.len() as u64,
        dt,
        victim.customer_id,
        victim.terminal_id,
        1_000_000.0,
        (dt - base()).num_days(),
    )
    .with_fraud(3)
}

proptest! {
    #[test]
    fn features_ignore_future_transactions(events in events(), pick in any::<prop::sample::Index>()) {
        let txs = from_events(events);
        let victim = pick.get(&txs).clone();
        let mut extended = txs.clone();
        extended.push(future_outlier(&txs, &victim));

        let pipeline = FeaturePipeline::new(&Default::default()).unwrap();
        let before = pipeline.transform(&txs).unwrap();
        let after = pipeline.transform(&extended).unwrap();
        prop_assert_eq!(&after[..before.len()], &before[..]);
    }

    #[test]
    fn window_subtraction_holds(events in events()) {
        let txs = from_events(events);
        let risks = TerminalRiskBuilder::default().compute(&txs).unwrap();
        for r in &risks {
            for w in &r.windows {
                prop_assert_eq!(w.nb_tx_window + r.nb_tx_delay, w.nb_tx_delay_window);
                prop_assert_eq!(w.nb_fraud_window + r.nb_fraud_delay, w.nb_fraud_delay_window);
                prop_assert!((0.0..=1.0).contains(&w.risk));
                if w.nb_tx_window == 0 {
                    prop_assert_eq!(w.risk, 0.0);
                }
            }
        }
    }

    #[test]
    fn builders_preserve_ids(events in events()) {
        let mut txs = from_events(events);
        let expected: Vec<u64> = (0..txs.len() as u64).collect();
        txs.reverse();

        let customer = CustomerFeatureBuilder::default().build(&txs).unwrap();
        let ids: Vec<u64> = customer.iter().map(|r| r.transaction.transaction_id).collect();
        prop_assert_eq!(&ids, &expected);
        // the transaction itself is always in its own window
        prop_assert!(customer.iter().all(|r| r.get("customer_id_nb_tx_1_day_window").unwrap() >= 1.0));

        let terminal = TerminalRiskBuilder::default().build(&txs).unwrap();
        let ids: Vec<u64> = terminal.iter().map(|r| r.transaction.transaction_id).collect();
        prop_assert_eq!(&ids, &expected);
    }

    #[test]
    fn test_set_has_no_known_compromised_customer(events in events(), start_day in 0i64..10) {
        let txs = from_events(events);
        let config = SplitConfig { delta_train: 7, delta_delay: 3, delta_test: 7 };
        let start = base() + Duration::days(start_day);
        let split = match LeakagePartitioner::new(config.clone()).split(&txs, start) {
            Ok(s) => s,
            Err(FraudError::EmptyWindow(_)) => return Ok(()),
            Err(e) => return Err(TestCaseError::fail(e.to_string())),
        };

        let first_day = split.train.iter().map(|t| t.time_days).min().unwrap();
        let train_frauds: HashSet<u64> =
            split.train.iter().filter(|t| t.is_fraud).map(|t| t.customer_id).collect();
        for t in &split.test {
            let i = t.time_days - first_day - 7 - 3;
            prop_assert!((0..7).contains(&i));
            // delay slices seen up to and including test day i
            let confirmed: Vec<i64> = (0..=i).map(|j| first_day + 7 * j - 1).filter(|d| *d >= 0).collect();
            let known = txs
                .iter()
                .any(|o| o.is_fraud && o.customer_id == t.customer_id && confirmed.contains(&o.time_days));
            prop_assert!(!known);
            prop_assert!(!train_frauds.contains(&t.customer_id));
        }
        prop_assert!(split.test.windows(2).all(|w| w[0].transaction_id < w[1].transaction_id));
    }

    #[test]
    fn detection_set_only_grows(rows in scored_rows(), k in 1usize..5) {
        let evaluator = TopKEvaluator::new(k).unwrap();
        let mut replay = evaluator.replay(&rows).unwrap();
        let mut seen: HashSet<u64> = HashSet::new();
        while let Some(outcome) = replay.next() {
            for card in &outcome.detected_cards {
                prop_assert!(!seen.contains(card));
            }
            prop_assert!(seen.iter().all(|c| replay.detected().contains(c)));
            seen.extend(outcome.detected_cards.iter().copied());
            prop_assert_eq!(replay.detected().len(), seen.len());
        }
    }

    #[test]
    fn mean_precision_is_bounded(rows in scored_rows(), k in 1usize..5, remove in any::<bool>()) {
        let report = TopKEvaluator::new(k).unwrap().with_remove_detected(remove).evaluate(&rows).unwrap();
        prop_assert!((0.0..=1.0).contains(&report.mean_precision));
        prop_assert!(report.per_day_precision.iter().all(|p| (0.0..=1.0).contains(p)));
        prop_assert_eq!(report.days.len(), report.per_day_compromised_counts.len());
    }
}
