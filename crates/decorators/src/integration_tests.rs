//! End-to-end scenarios across store, decorators and composition.
//!
//! Verifies:
//! - Mirrored stores converge with the primary under both modes
//! - Tap failures never reach the caller, with or without a catch layer
//! - Decorators compose with `Joined` facades and identity factories

#[cfg(test)]
mod tests {
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::{Arc, Barrier};

    use repokit_core::{
        AggregateRoot, Entity, EntityId, ErrorKind, GuidFactory, IdentityFactory,
    };
    use repokit_store::{join, Command, ConcurrentStore, Query, UnitOfWork};

    use crate::catch::{Catch, CatchPolicy, ErrorFilter};
    use crate::config::TapConfig;
    use crate::tap::command::Tap;
    use crate::tap::sink::RecordingSink;
    use crate::tap::unit_of_work::TapUnitOfWork;
    use crate::tap::{TapMode, TapOperation};
    use crate::testing::{person, seeded_store, Person, Scripted};

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Order {
        id: EntityId,
        lines: u32,
    }

    impl Entity for Order {
        type Id = EntityId;

        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    impl AggregateRoot for Order {}

    fn init_logging() {
        repokit_observability::init_for_tests();
    }

    fn sorted(mut people: Vec<Person>) -> Vec<Person> {
        people.sort_by_key(|p| p.id);
        people
    }

    #[test]
    fn mirrored_scenario_converges_in_both_modes() {
        init_logging();

        for mode in [TapMode::Sequential, TapMode::Parallel] {
            let repo = Tap::new(seeded_store(), seeded_store()).with_mode(mode);

            assert!(repo.try_update(person(1, "Brandon")).unwrap(), "mode {mode}");
            assert_eq!(repo.count().unwrap(), 4);
            assert_eq!(repo.get_by_id(&1).unwrap().name, "Brandon");

            assert!(!repo.try_remove_by_id(&27).unwrap());
            assert_eq!(repo.count().unwrap(), 4);

            let (primary, tap) = repo.into_parts();
            assert_eq!(
                sorted(primary.get_all().unwrap()),
                sorted(tap.get_all().unwrap()),
                "mode {mode}"
            );
        }
    }

    #[test]
    fn catch_layer_absorbs_tap_failures_before_the_tap_decorator() {
        init_logging();

        let caught = Arc::new(AtomicUsize::new(0));
        let counter = caught.clone();
        let guarded_tap = Catch::new(
            Scripted::failing(ErrorKind::Underlying),
            CatchPolicy::swallow(ErrorFilter::Any).with_handler(move |_| {
                counter.fetch_add(1, Ordering::SeqCst);
            }),
        );
        let sink = Arc::new(RecordingSink::new());
        let repo = Tap::new(seeded_store(), guarded_tap).with_sink(sink.clone());

        repo.add(person(5, "Zoe")).unwrap();
        repo.remove_by_id(&1).unwrap();

        assert_eq!(caught.load(Ordering::SeqCst), 2);
        assert!(sink.is_empty());
        assert_eq!(repo.count().unwrap(), 4);
    }

    #[test]
    fn without_catch_layer_the_sink_sees_every_tap_failure() {
        init_logging();

        let sink = Arc::new(RecordingSink::new());
        let repo = Tap::from_config(
            seeded_store(),
            Scripted::failing(ErrorKind::Underlying),
            &TapConfig::parallel(),
        )
        .with_sink(sink.clone());

        repo.add(person(5, "Zoe")).unwrap();
        repo.update(person(2, "Janet")).unwrap();
        repo.remove(&person(3, "Jake")).unwrap();

        let operations: Vec<_> = sink.failures().into_iter().map(|f| f.operation).collect();
        assert_eq!(
            operations,
            vec![TapOperation::Add, TapOperation::Update, TapOperation::Remove]
        );
        assert_eq!(repo.count().unwrap(), 4);
    }

    #[test]
    fn concurrent_writers_through_parallel_tap_keep_stores_in_step() {
        init_logging();

        const WRITERS: u32 = 8;
        const PER_WRITER: u32 = 50;

        let repo = Arc::new(
            Tap::new(ConcurrentStore::<Person>::new(), ConcurrentStore::<Person>::new())
                .with_mode(TapMode::Parallel),
        );
        let barrier = Arc::new(Barrier::new(WRITERS as usize));

        let handles: Vec<_> = (0..WRITERS)
            .map(|writer| {
                let repo = Arc::clone(&repo);
                let barrier = Arc::clone(&barrier);
                std::thread::spawn(move || {
                    barrier.wait();
                    for n in 0..PER_WRITER {
                        let id = writer * PER_WRITER + n + 1;
                        repo.add(person(id, "new")).unwrap();
                        repo.update(person(id, "renamed")).unwrap();
                        if n % 2 == 0 {
                            repo.remove_by_id(&id).unwrap();
                        }
                    }
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }

        let expected = (WRITERS * PER_WRITER / 2) as usize;
        assert_eq!(repo.count().unwrap(), expected);
        assert_eq!(repo.tap().count().unwrap(), expected);
        assert_eq!(
            sorted(repo.primary().get_all().unwrap()),
            sorted(repo.tap().get_all().unwrap())
        );
    }

    #[test]
    fn joined_facade_with_tapped_command_side() {
        init_logging();

        let primary = Arc::new(ConcurrentStore::<Order>::new());
        let audit = Arc::new(ConcurrentStore::<Order>::new());
        let repo = join(
            Arc::clone(&primary),
            Tap::new(Arc::clone(&primary), Arc::clone(&audit)),
        );
        let ids = GuidFactory::new();

        let order = Order {
            id: ids.next_id(),
            lines: 3,
        };
        repo.add(order.clone()).unwrap();
        repo.update(Order { lines: 4, ..order.clone() }).unwrap();

        assert_eq!(repo.get_by_id(&order.id).unwrap().lines, 4);
        assert_eq!(audit.get_by_id(&order.id).unwrap().lines, 4);

        let err = repo.add(order.clone()).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::AlreadyExists);
        assert_eq!(audit.count().unwrap(), 1);
    }

    #[test]
    fn unit_of_work_tap_over_stores_and_failing_mirror() {
        init_logging();

        let sink = Arc::new(RecordingSink::new());
        let uow = TapUnitOfWork::new(
            seeded_store(),
            Scripted::failing(ErrorKind::Underlying),
        )
        .with_failure_logging(false)
        .with_sink(sink.clone());

        uow.commit().unwrap();
        assert_eq!(sink.failures()[0].operation, TapOperation::Commit);
    }
}

#[cfg(test)]
mod async_tests {
    use std::sync::Arc;

    use repokit_core::{Entity, EntityId, GuidFactory, IdentityFactory};
    use repokit_store::{join, AsyncCommand, AsyncQuery, ConcurrentStore};

    use crate::adapter::AsyncAdapter;
    use crate::tap::async_tap::AsyncTap;
    use crate::tap::TapMode;

    #[derive(Debug, Clone, PartialEq, Eq)]
    struct Order {
        id: EntityId,
        lines: u32,
    }

    impl Entity for Order {
        type Id = EntityId;

        fn id(&self) -> &EntityId {
            &self.id
        }
    }

    #[tokio::test]
    async fn async_joined_facade_mirrors_through_async_tap() {
        repokit_observability::init_for_tests();

        let primary = Arc::new(ConcurrentStore::<Order>::new());
        let replica = Arc::new(ConcurrentStore::<Order>::new());
        let repo = join(
            AsyncAdapter::new(Arc::clone(&primary)),
            AsyncTap::new(
                AsyncAdapter::new(Arc::clone(&primary)),
                AsyncAdapter::new(Arc::clone(&replica)),
            )
            .with_mode(TapMode::Parallel),
        );

        let order = Order {
            id: GuidFactory::new().next_id(),
            lines: 1,
        };
        assert!(repo.try_add(order.clone()).await.unwrap());
        assert!(!repo.try_add(order.clone()).await.unwrap());
        assert_eq!(repo.count().await.unwrap(), 1);
        assert_eq!(repo.get_by_id(&order.id).await.unwrap().lines, 1);

        repo.remove_by_id(&order.id).await.unwrap();
        assert_eq!(repo.try_get_by_id(&order.id).await.unwrap(), None);
        assert!(replica.is_empty());
    }
}
