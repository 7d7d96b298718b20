//! End-to-end tests across the module boundary.

use gridpath_arena::ArenaError;
use gridpath_codec::{ArrayHeader, CodecError, Point};
use gridpath_host::{
    Host, HostConfig, HostError, OutputCapacity, PathOutcome, PathfindStatus, StatusPolicy,
};
use gridpath_test_utils::fixtures::{
    FailingModule, GreedyModule, OvergrowingModule, OverreportingModule, RecordingModule,
    ReferenceAstar, RepointingModule, TerminatingModule,
};
use gridpath_test_utils::TestWorld;

const MAZE: &str = r"
    S....#....
    ####.#.##.
    .....#..#.
    .#####.##.
    .......#.E
";

fn small_config() -> HostConfig {
    HostConfig {
        memory_pages: 1,
        ..Default::default()
    }
}

// ── Epoch cycle ───────────────────────────────────────────────────

#[test]
fn module_sees_encoded_inputs() {
    let world = TestWorld::parse(
        r"
        S.#
        ...
        #.E
        ",
    );
    let reply = vec![Point::new(0, 0), Point::new(1, 0)];
    let mut host = Host::new(HostConfig::default()).unwrap();
    let mut bound = host.bind(RecordingModule::new(reply.clone())).unwrap();

    let outcome = bound.pathfind(&world.request()).unwrap();
    assert_eq!(outcome.status(), 2);
    let path = outcome.into_path().unwrap();
    assert_eq!(path.items(), reply.as_slice());
    assert_eq!(path.capacity(), 9);

    let call = &bound.module().calls[0];
    assert_eq!(call.args.obstacles, HostConfig::DEFAULT_HEAP_BASE);
    assert_eq!((call.args.width, call.args.height), (3, 3));
    assert_eq!(call.obstacles, world.obstacle_array());
    assert_eq!(call.start, Point::new(0, 0));
    assert_eq!(call.end, Point::new(2, 2));
    assert_eq!(call.output.count, 0);
    assert_eq!(call.output.capacity, 9);
    assert_eq!(call.output.items_offset, call.args.output + ArrayHeader::WIRE_SIZE);
}

#[test]
fn arguments_are_laid_out_back_to_back() {
    let world = TestWorld::parse("S#E");
    let mut host = Host::new(HostConfig::default()).unwrap();
    let mut bound = host.bind(RecordingModule::default()).unwrap();
    bound.pathfind(&world.request()).unwrap();

    let args = bound.module().calls[0].args;
    let base = HostConfig::DEFAULT_HEAP_BASE;
    // One obstacle: 12-byte header + 8-byte body.
    assert_eq!(args.obstacles, base);
    assert_eq!(args.start, base + 20);
    assert_eq!(args.end, base + 28);
    assert_eq!(args.output, base + 36);
}

#[test]
fn staged_offsets_go_stale_on_reset() {
    let world = TestWorld::parse("S.E");
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(RecordingModule::default()).unwrap();

    let args = bound.stage(&world.request()).unwrap();
    bound.reset();
    let err = bound.invoke(&args).unwrap_err();
    assert!(matches!(
        err,
        HostError::Arena(ArenaError::StaleOffset {
            offset_epoch: 0,
            current_epoch: 1
        })
    ));
    assert!(bound.module().calls.is_empty());
}

#[test]
fn manual_stage_invoke_collect() {
    let world = TestWorld::parse("S..E");
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();

    let args = bound.stage(&world.request()).unwrap();
    let status = bound.invoke(&args).unwrap();
    assert_eq!(status, 4);
    let path = bound.collect(&args).unwrap();
    let expected: Vec<Point> = (0..4).map(|x| Point::new(x, 0)).collect();
    assert_eq!(path.items(), expected.as_slice());
}

#[test]
fn repeated_epochs_do_not_grow_the_arena() {
    let world = TestWorld::parse(MAZE);
    let mut host = Host::new(HostConfig::default()).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();

    bound.pathfind(&world.request()).unwrap();
    let cursor = bound.host().arena().cursor();
    let epoch = bound.host().arena().epoch();
    for i in 1..=10 {
        let outcome = bound.pathfind(&world.request()).unwrap();
        assert!(outcome.is_found());
        assert_eq!(bound.host().arena().cursor(), cursor);
        assert_eq!(bound.host().arena().epoch(), epoch + i);
    }
}

// ── Reference module ──────────────────────────────────────────────

#[test]
fn reference_finds_shortest_path_through_maze() {
    let world = TestWorld::parse(MAZE);
    let (start, end) = (world.start().unwrap(), world.end().unwrap());
    let mut host = Host::new(HostConfig::default()).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();

    let outcome = bound.pathfind(&world.request()).unwrap();
    let path = outcome.path().unwrap();
    assert_eq!(Some(path.len()), world.shortest_len(start, end));
    assert_eq!(outcome.status(), path.len() as i32);
    assert!(world.is_valid_path(path.items(), start, end));
}

#[test]
fn walled_off_end_is_not_found() {
    let world = TestWorld::parse(
        r"
        S..#...
        ...#.E.
        ...#...
        ",
    );
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();

    let outcome = bound.pathfind(&world.request()).unwrap();
    assert_eq!(outcome, PathOutcome::NotFound { status: -1 });
    assert_eq!(outcome.failure(), Some(PathfindStatus::NoPath));
}

#[test]
fn start_equal_to_end_is_a_single_cell() {
    let world = TestWorld::new(3, 3);
    let p = Point::new(1, 1);
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();

    let path = bound
        .pathfind(&world.request_between(p, p))
        .unwrap()
        .into_path()
        .unwrap();
    assert_eq!(path.items(), &[p]);
}

#[test]
fn toggled_obstacle_changes_the_route() {
    let mut world = TestWorld::parse(
        r"
        S..
        ...
        ..E
        ",
    );
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();

    let open = bound.pathfind(&world.request()).unwrap();
    assert_eq!(open.path().unwrap().len(), 5);

    world.toggle(Point::new(1, 0));
    world.toggle(Point::new(1, 1));
    world.toggle(Point::new(1, 2));
    let blocked = bound.pathfind(&world.request()).unwrap();
    assert!(!blocked.is_found());
}

#[test]
fn fixed_capacity_is_grown_by_the_module() {
    let world = TestWorld::parse("S......E");
    let config = HostConfig {
        memory_pages: 1,
        output_capacity: OutputCapacity::Fixed(2),
        ..Default::default()
    };
    let mut host = Host::new(config).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();

    let outcome = bound.pathfind(&world.request()).unwrap();
    let path = outcome.path().unwrap();
    assert_eq!(path.len(), 8);
    assert_eq!(path.capacity(), 8);
    assert!(world.is_valid_path(path.items(), Point::new(0, 0), Point::new(7, 0)));
}

#[test]
fn zero_is_success_policy() {
    let config = HostConfig {
        memory_pages: 1,
        status_policy: StatusPolicy::ZeroIsSuccess,
        ..Default::default()
    };
    let module = ReferenceAstar::new().with_policy(StatusPolicy::ZeroIsSuccess);
    let mut host = Host::new(config).unwrap();
    let mut bound = host.bind(module).unwrap();

    let found = bound.pathfind(&TestWorld::parse("S.E").request()).unwrap();
    assert_eq!(found.status(), 0);
    assert_eq!(found.path().unwrap().len(), 3);

    let missing = bound.pathfind(&TestWorld::parse("S#E").request()).unwrap();
    assert_eq!(missing, PathOutcome::NotFound { status: 1 });
}

// ── Failure paths ─────────────────────────────────────────────────

#[test]
fn failure_status_is_not_an_error() {
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(FailingModule::new(-2)).unwrap();
    let outcome = bound.pathfind(&TestWorld::parse("SE").request()).unwrap();
    assert_eq!(outcome.failure(), Some(PathfindStatus::InvalidArgument));
}

#[test]
fn overreported_count_is_rejected() {
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(OverreportingModule::new(1)).unwrap();
    let err = bound
        .pathfind(&TestWorld::parse("S.E").request())
        .unwrap_err();
    assert_eq!(
        err,
        HostError::Codec(CodecError::CountExceedsCapacity {
            count: 4,
            capacity: 3
        })
    );
}

#[test]
fn items_outside_the_arena_are_rejected() {
    // Below the heap base, then past the cursor but still inside memory.
    for addr in [0, 60_000] {
        let mut host = Host::new(small_config()).unwrap();
        let mut bound = host.bind(RepointingModule::new(addr)).unwrap();
        let err = bound
            .pathfind(&TestWorld::parse("S.E").request())
            .unwrap_err();
        match err {
            HostError::Codec(CodecError::ItemsOutsideRegion {
                items_offset,
                count,
                region_start,
                region_end,
            }) => {
                assert_eq!((items_offset, count), (addr, 2));
                assert_eq!(region_start, HostConfig::DEFAULT_HEAP_BASE);
                assert!(region_end < 60_000);
            }
            other => panic!("expected ItemsOutsideRegion, got {other:?}"),
        }
    }
}

#[test]
fn items_inside_the_arena_are_accepted() {
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(RepointingModule::at_start_argument()).unwrap();
    let outcome = bound.pathfind(&TestWorld::parse("S.E").request()).unwrap();
    assert_eq!(
        outcome.path().unwrap().items(),
        &[Point::new(0, 0), Point::new(2, 0)]
    );
}

#[test]
fn output_grown_past_the_grid_is_rejected() {
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(OvergrowingModule::new(1)).unwrap();
    let err = bound
        .pathfind(&TestWorld::parse("S.E").request())
        .unwrap_err();
    assert_eq!(
        err,
        HostError::Codec(CodecError::CountExceedsLimit { count: 4, limit: 3 })
    );
}

#[test]
fn module_oom_is_an_import_fault() {
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(GreedyModule::new(4096)).unwrap();
    let err = bound
        .pathfind(&TestWorld::parse("S.E").request())
        .unwrap_err();
    assert!(matches!(
        err,
        HostError::ImportFault(ArenaError::CapacityExceeded {
            requested: 4096,
            ..
        })
    ));
    assert!(bound.module().granted > 0);
}

#[test]
fn reference_oom_is_an_import_fault() {
    // 100x100 cells need ~90 KiB of scratch; one page is 64 KiB.
    let config = HostConfig {
        memory_pages: 1,
        output_capacity: OutputCapacity::Fixed(16),
        ..Default::default()
    };
    let world = TestWorld::new(100, 100);
    let mut host = Host::new(config).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();
    let err = bound
        .pathfind(&world.request_between(Point::new(0, 0), Point::new(99, 99)))
        .unwrap_err();
    assert!(matches!(err, HostError::ImportFault(_)));
}

#[test]
fn host_oom_while_staging_is_an_arena_error() {
    // GridArea reserves 100 * 100 * 8 bytes, more than one page.
    let world = TestWorld::new(100, 100);
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(ReferenceAstar::new()).unwrap();
    let err = bound
        .pathfind(&world.request_between(Point::new(0, 0), Point::new(1, 1)))
        .unwrap_err();
    assert!(matches!(
        err,
        HostError::Arena(ArenaError::CapacityExceeded { .. })
    ));
}

#[test]
fn terminate_wins_over_status() {
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(TerminatingModule::new(3)).unwrap();
    let err = bound
        .pathfind(&TestWorld::parse("SE").request())
        .unwrap_err();
    assert_eq!(err, HostError::ModuleTerminated { code: 3 });
}

#[test]
fn endpoints_off_grid_are_rejected_before_invocation() {
    let world = TestWorld::new(4, 4);
    let mut host = Host::new(small_config()).unwrap();
    let mut bound = host.bind(RecordingModule::default()).unwrap();
    let err = bound
        .pathfind(&world.request_between(Point::new(0, 0), Point::new(4, 4)))
        .unwrap_err();
    assert!(matches!(err, HostError::PointOutsideGrid { .. }));
    assert!(bound.module().calls.is_empty());
}

#[test]
fn module_static_data_must_fit_below_arena() {
    let mut host = Host::new(HostConfig::default()).unwrap();
    let module = ReferenceAstar::new().with_heap_base(HostConfig::DEFAULT_HEAP_BASE + 1);
    let err = host.bind(module).err().unwrap();
    assert_eq!(
        err,
        HostError::HeapOverlap {
            module_heap_base: HostConfig::DEFAULT_HEAP_BASE + 1,
            arena_base: HostConfig::DEFAULT_HEAP_BASE,
        }
    );

    let fits = ReferenceAstar::new().with_heap_base(HostConfig::DEFAULT_HEAP_BASE);
    assert!(host.bind(fits).is_ok());
}

#[test]
fn invalid_config_is_rejected() {
    let config = HostConfig {
        memory_pages: 0,
        ..Default::default()
    };
    assert!(matches!(
        Host::new(config).err().unwrap(),
        HostError::Config(_)
    ));
}

mod proptests {
    use super::*;
    use proptest::prelude::*;

    fn world_strategy() -> impl Strategy<Value = (TestWorld, Point, Point)> {
        (2u32..=8, 2u32..=8).prop_flat_map(|(w, h)| {
            let cells = (w * h) as usize;
            (
                proptest::collection::vec(proptest::bool::weighted(0.3), cells),
                0..w as i32,
                0..h as i32,
                0..w as i32,
                0..h as i32,
            )
                .prop_map(move |(walls, sx, sy, ex, ey)| {
                    let mut world = TestWorld::new(w, h);
                    for (i, wall) in walls.into_iter().enumerate() {
                        if wall {
                            world.toggle(Point::new(i as i32 % w as i32, i as i32 / w as i32));
                        }
                    }
                    (world, Point::new(sx, sy), Point::new(ex, ey))
                })
        })
    }

    proptest! {
        #[test]
        fn reference_matches_breadth_first_search((world, start, end) in world_strategy()) {
            let mut host = Host::new(small_config()).unwrap();
            let mut bound = host.bind(ReferenceAstar::new()).unwrap();
            let outcome = bound.pathfind(&world.request_between(start, end)).unwrap();

            match world.shortest_len(start, end) {
                Some(len) => {
                    let path = outcome.path().expect("path exists");
                    prop_assert_eq!(path.len(), len);
                    prop_assert!(world.is_valid_path(path.items(), start, end));
                }
                None => {
                    prop_assert_eq!(outcome, PathOutcome::NotFound { status: -1 });
                }
            }
        }
    }
}
