//! Absolute leak check. Kept in its own test binary with a single test so
//! no other test can hold a library string while the count is read.

use polyglot_core::OverflowPolicy;
use polyglot_host::{boundary, run, HostConfig};

#[test]
fn every_path_returns_the_live_count_to_zero() {
    assert_eq!(boundary::live_string_count(), 0);

    run(&HostConfig::default()).unwrap();
    assert_eq!(boundary::live_string_count(), 0);

    // Failing run: overflow after no strings were created.
    let failing = HostConfig {
        factorial_n: 30,
        policy: OverflowPolicy::Reject,
        ..HostConfig::default()
    };
    assert!(run(&failing).is_err());
    assert_eq!(boundary::live_string_count(), 0);

    // Owners dropped without an explicit release.
    {
        let raw = boundary::reverse_string("abc").unwrap();
        let handle = boundary::reverse_into_handle("abc").unwrap();
        assert_eq!(boundary::live_string_count(), 2);
        assert_eq!(raw.to_str().unwrap(), "cba");
        assert_eq!(handle.read().unwrap(), "cba");
    }
    assert_eq!(boundary::live_string_count(), 0);

    // An error after a string was created still releases it.
    let s = boundary::reverse_string("xyz").unwrap();
    let h = boundary::reverse_into_handle("xyz").unwrap();
    assert!(boundary::fibonacci(200, OverflowPolicy::Reject).is_err());
    drop((s, h));
    assert_eq!(boundary::live_string_count(), 0);
}
