use std::sync::{
    atomic::{AtomicUsize, Ordering},
    Arc, Barrier,
};

use openid4vp_holder::{config::HolderConfig, holder::VerifierSession};

#[allow(dead_code)]
mod engine;

use engine::MockEngine;

#[test]
fn concurrent_first_access_installs_one_session() {
    assert!(VerifierSession::global().is_none());

    let constructed = Arc::new(AtomicUsize::new(0));
    let barrier = Arc::new(Barrier::new(8));

    let handles: Vec<_> = (0..8)
        .map(|i| {
            let constructed = constructed.clone();
            let barrier = barrier.clone();
            std::thread::spawn(move || {
                barrier.wait();
                VerifierSession::get_or_install(|| {
                    constructed.fetch_add(1, Ordering::SeqCst);
                    VerifierSession::from_config(
                        HolderConfig::new(format!("io.example.wallet.{i}")),
                        Arc::new(MockEngine::default()),
                    )
                })
            })
        })
        .collect();
    let sessions: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();

    assert_eq!(constructed.load(Ordering::SeqCst), 1);
    assert!(sessions.windows(2).all(|w| Arc::ptr_eq(&w[0], &w[1])));

    let global = VerifierSession::global().unwrap();
    assert!(Arc::ptr_eq(&global, &sessions[0]));

    // Later installers get the existing session.
    let again = VerifierSession::get_or_install(|| unreachable!());
    assert_eq!(again.app_id(), global.app_id());
}
