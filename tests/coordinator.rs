use std::sync::Arc;
use std::thread;
use std::time::Duration;

use rai_ops_gateway::models::{Education, FairnessEntry, IncomeLabel, PredictRequest, Sex};
use rai_ops_gateway::{GatewayError, Limits, RequestCoordinator};

fn request(age: i64, education: Education, hours: i64, sex: Sex, race: &str) -> PredictRequest {
    PredictRequest {
        age,
        education,
        hours_per_week: hours,
        sex,
        race: race.to_string(),
    }
}

fn coordinator(max_requests: usize) -> RequestCoordinator {
    let limits = Limits {
        max_requests_per_window: max_requests,
        window: Duration::from_secs(60),
        ..Limits::default()
    };
    RequestCoordinator::with_reference_collaborators(limits).unwrap()
}

#[test]
fn test_fairness_for_one_positive_one_negative() {
    let coord = coordinator(30);

    let hi = coord
        .handle(&request(45, Education::Masters, 45, Sex::Male, "white"))
        .unwrap();
    assert_eq!(hi.label, IncomeLabel::Above50K);

    let lo = coord
        .handle(&request(20, Education::HsGrad, 10, Sex::Female, "white"))
        .unwrap();
    assert_eq!(lo.label, IncomeLabel::AtMost50K);

    assert_eq!(lo.fairness.len(), 1);
    assert_eq!(lo.fairness["white"], FairnessEntry { count: 2, positive_rate: 0.5 });
}

#[test]
fn test_recent_log_keeps_last_ten_newest_first() {
    let coord = coordinator(30);

    for age in 18..33 {
        let resp = coord
            .handle(&request(age, Education::Bachelors, 40, Sex::Female, "other"))
            .unwrap();
        assert!(resp.recent.len() <= 10);
        assert_eq!(resp.recent[0].age, age);
    }

    let recent = coord.snapshot().recent;
    let ages: Vec<i64> = recent.iter().map(|e| e.age).collect();
    assert_eq!(ages, (23..33).rev().collect::<Vec<_>>());
}

#[test]
fn test_rejections_leave_audit_untouched() {
    let coord = coordinator(3);

    assert!(coord.handle(&request(30, Education::Doctorate, 50, Sex::Male, "asian-pac-islander")).is_ok());

    let invalid = coord.handle(&request(95, Education::Doctorate, 50, Sex::Male, "black"));
    assert!(matches!(invalid, Err(GatewayError::InvalidInput(_))));

    assert!(coord.handle(&request(30, Education::HsGrad, 50, Sex::Male, "asian-pac-islander")).is_ok());

    // window now holds 3 admissions, including the invalid one
    let limited = coord.handle(&request(30, Education::HsGrad, 50, Sex::Male, "black"));
    assert!(matches!(limited, Err(GatewayError::RateLimitExceeded { in_window: 3, max: 3 })));

    let stats = coord.snapshot();
    assert!(!stats.fairness.contains_key("black"));
    assert_eq!(stats.fairness["asian-pac-islander"].count, 2);
    assert_eq!(stats.recent.len(), 2);
    assert!(stats.recent.iter().all(|e| e.race != "black"));
    assert_eq!(stats.metrics.window.count, 3);
    assert_eq!(stats.metrics.error_rate, 0.5);
}

#[test]
fn test_concurrent_callers_respect_limit() {
    let coord = Arc::new(coordinator(30));

    let handles: Vec<_> = (0..8)
        .map(|t| {
            let coord = Arc::clone(&coord);
            thread::spawn(move || {
                let race = if t % 2 == 0 { "white" } else { "black" };
                (0..10)
                    .filter(|_| {
                        coord
                            .handle(&request(45, Education::Masters, 45, Sex::Female, race))
                            .is_ok()
                    })
                    .count()
            })
        })
        .collect();

    let served: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
    assert_eq!(served, 30);

    let stats = coord.snapshot();
    let counted: u64 = stats.fairness.values().map(|e| e.count).sum();
    assert_eq!(counted, 30);
    assert!(stats.fairness.values().all(|e| e.positive_rate == 1.0));
    assert_eq!(stats.recent.len(), 10);
    assert_eq!(stats.metrics.window.count, 30);
    assert_eq!(stats.metrics.window.max_window, 30);
    assert_eq!(stats.metrics.error_rate, 0.63);
}

#[test]
fn test_snapshot_does_not_consume_admissions() {
    let coord = coordinator(1);
    for _ in 0..5 {
        coord.snapshot();
    }
    assert!(coord.handle(&request(30, Education::HsGrad, 40, Sex::Male, "white")).is_ok());
    assert_eq!(coord.snapshot().metrics.window.count, 1);
}
