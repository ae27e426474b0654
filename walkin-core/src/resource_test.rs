#[cfg(test)]
mod tests {
    use crate::decision::DecisionEngine;
    use crate::resource::Resource;
    use crate::types::FailedAttempt;
    use rand::SeedableRng;
    use rand::rngs::StdRng;
    use std::sync::atomic::{AtomicU64, Ordering};

    fn rng() -> StdRng {
        StdRng::seed_from_u64(1)
    }

    #[test]
    fn fresh_resource_is_free_and_unlocked() {
        let resource = Resource::new(0.8);
        assert!(resource.is_available());
        assert!(!resource.is_locked());
        assert_eq!(resource.occupants(), 0);
    }

    #[test]
    fn acquire_takes_the_only_permit() {
        let resource = Resource::new(1.0);
        let mut rng = rng();

        let occupancy = resource.try_acquire(&mut rng).expect("free resource");
        assert!(occupancy.locked_door());
        assert!(resource.is_locked());
        assert!(!resource.is_available());

        assert!(resource.try_acquire(&mut rng).is_none());
        assert_eq!(resource.occupants(), 1);

        occupancy.release();
        assert!(resource.is_available());
        assert!(!resource.is_locked());
        assert_eq!(resource.occupants(), 0);
    }

    #[test]
    fn failed_acquire_leaves_state_untouched() {
        let resource = Resource::new(1.0);
        let mut rng = rng();
        let _held = resource.try_acquire(&mut rng).expect("free resource");

        for _ in 0..100 {
            assert!(resource.try_acquire(&mut rng).is_none());
        }
        assert!(resource.is_locked());
        assert_eq!(resource.occupants(), 1);
        assert_eq!(resource.peak_occupancy(), 1);
    }

    #[test]
    fn occupant_who_forgets_to_lock_invites_walk_ins() {
        let resource = Resource::new(0.0);
        let mut rng = rng();
        let held = resource.try_acquire(&mut rng).expect("free resource");
        assert!(!held.locked_door());

        assert!(resource.try_acquire(&mut rng).is_none());
        assert_eq!(
            DecisionEngine::classify_failure(resource.is_locked()),
            FailedAttempt::WalkIn
        );
    }

    #[test]
    fn locked_occupant_produces_ordinary_failures() {
        let resource = Resource::new(1.0);
        let mut rng = rng();
        let _held = resource.try_acquire(&mut rng).expect("free resource");

        assert!(resource.try_acquire(&mut rng).is_none());
        assert_eq!(
            DecisionEngine::classify_failure(resource.is_locked()),
            FailedAttempt::Locked
        );
    }

    #[test]
    fn dropping_the_occupancy_releases() {
        let resource = Resource::new(1.0);
        let mut rng = rng();
        {
            let _held = resource.try_acquire(&mut rng).expect("free resource");
            assert!(!resource.is_available());
        }
        assert!(resource.is_available());
        assert!(!resource.is_locked());
    }

    #[test]
    fn lock_probability_is_respected() {
        let resource = Resource::new(0.8);
        let mut rng = StdRng::seed_from_u64(5);
        let trials = 20_000;

        let locked = (0..trials)
            .filter(|_| {
                let held = resource.try_acquire(&mut rng).expect("free resource");
                held.locked_door()
            })
            .count();

        let rate = locked as f64 / trials as f64;
        assert!((rate - 0.8).abs() < 0.02, "lock rate {}", rate);
    }

    #[test]
    fn at_most_one_holder_under_contention() {
        let resource = Resource::new(0.5);
        let acquired = AtomicU64::new(0);

        std::thread::scope(|scope| {
            for t in 0..8u64 {
                let resource = &resource;
                let acquired = &acquired;
                scope.spawn(move || {
                    let mut rng = StdRng::seed_from_u64(t);
                    for _ in 0..10_000 {
                        if let Some(held) = resource.try_acquire(&mut rng) {
                            assert_eq!(resource.occupants(), 1);
                            acquired.fetch_add(1, Ordering::Relaxed);
                            held.release();
                        }
                    }
                });
            }
        });

        assert!(acquired.load(Ordering::Relaxed) > 0);
        assert_eq!(resource.peak_occupancy(), 1);
        assert!(resource.is_available());
        assert_eq!(resource.occupants(), 0);
    }
}
