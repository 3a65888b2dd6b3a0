// crates.io
use time::macros;
// self
use auth_gate::_preludet::*;

fn client(address: &str) -> ClientKey {
	ClientKey::new(address).expect("Client key fixture should be valid.")
}

#[test]
fn budget_spends_within_a_window_and_recovers_at_the_boundary() {
	let (gate, _, _) = build_memory_gate(test_policy());
	let key = client("203.0.113.1");
	// Aligned to a window boundary so the arithmetic below is exact.
	let t0 = macros::datetime!(2025-06-01 00:00 UTC);

	for i in 0..5 {
		gate.admit_at(&key, t0 + Duration::seconds(i))
			.expect("Requests within the budget should be admitted.");
	}

	let verdict = gate.admit_at(&key, t0 + Duration::seconds(5));
	let Err(Error::RateLimited { retry }) = verdict else {
		panic!("The sixth request in the window must be rate limited.");
	};

	assert_eq!(retry.earliest_retry_at, t0 + Duration::seconds(60));

	// The next fixed window starts with a fresh budget.
	gate.admit_at(&key, t0 + Duration::seconds(60))
		.expect("The first request of the next window should be admitted.");
}

#[test]
fn rejected_requests_never_consume_budget() {
	let (gate, _, _) = build_memory_gate(test_policy());
	let key = client("203.0.113.2");
	let t0 = macros::datetime!(2025-06-01 00:10 UTC);

	for i in 0..5 {
		gate.admit_at(&key, t0 + Duration::seconds(i))
			.expect("Requests within the budget should be admitted.");
	}

	// Hammering the limiter while rejected must not extend the rejection into the next window.
	for i in 5..59 {
		assert!(gate.admit_at(&key, t0 + Duration::seconds(i)).is_err());
	}

	for i in 0..5 {
		gate.admit_at(&key, t0 + Duration::seconds(60 + i))
			.expect("The next window should admit a full budget.");
	}
}

#[test]
fn budgets_are_scoped_per_client() {
	let (gate, _, _) = build_memory_gate(test_policy());
	let first = client("203.0.113.3");
	let second = client("203.0.113.4");
	let t0 = macros::datetime!(2025-06-01 00:20 UTC);

	for i in 0..5 {
		gate.admit_at(&first, t0 + Duration::seconds(i))
			.expect("The first client should spend its own budget.");
	}

	assert!(gate.admit_at(&first, t0 + Duration::seconds(5)).is_err());

	gate.admit_at(&second, t0 + Duration::seconds(5))
		.expect("An exhausted neighbor must not affect another client.");
}

#[test]
fn lockout_is_evaluated_after_the_rate_budget() {
	let (gate, _, _) = build_memory_gate(test_policy());
	let key = client("203.0.113.5");
	let t0 = macros::datetime!(2025-06-01 00:30 UTC);

	for i in 0..3 {
		gate.brute_force().record_failure_at(&key, t0 + Duration::seconds(i));
	}

	// Locked admissions still burn the request budget.
	for i in 0..5 {
		let verdict = gate.admit_at(&key, t0 + Duration::seconds(3 + i));

		assert!(matches!(verdict, Err(Error::LockedOut)));
	}

	let verdict = gate.admit_at(&key, t0 + Duration::seconds(8));

	assert!(matches!(verdict, Err(Error::RateLimited { .. })));
}

#[test]
fn lockout_reveals_no_remaining_duration() {
	let (gate, _, _) = build_memory_gate(test_policy());
	let key = client("203.0.113.6");
	let t0 = macros::datetime!(2025-06-01 00:40 UTC);

	for i in 0..3 {
		gate.brute_force().record_failure_at(&key, t0 + Duration::seconds(i));
	}

	let verdict = gate.admit_at(&key, t0 + Duration::seconds(3));
	let Err(error) = verdict else {
		panic!("A locked identity must be rejected.");
	};
	let rendered = error.to_string();

	assert!(matches!(error, Error::LockedOut));
	assert!(
		!rendered.chars().any(|c| c.is_ascii_digit()),
		"the lockout message must not leak timing details: {rendered}"
	);
}
