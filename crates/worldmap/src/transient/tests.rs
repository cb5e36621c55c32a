use std::time::Duration;

use super::*;

fn frame_ms(ms: u64) -> FrameStep {
    FrameStep::from_elapsed(Duration::from_millis(ms))
}

#[test]
fn frame_ratio_counts_reference_frames() {
    assert_eq!(frame_ms(10).ratio, 1.0);
    assert_eq!(frame_ms(25).ratio, 2.5);
    assert_eq!(frame_ms(0).ratio, 0.0);
}

#[test]
fn broken_brick_under_lifetime_stays_and_moves() {
    let mut set = TransientSet::with_seed(7);
    let id = set.add_broken_brick_piece(3, 100.0, 100.0, 1.5, -3.0);

    set.step(frame_ms(120), &EmptyLevel);
    set.step(frame_ms(79), &EmptyLevel);

    let brick = set.broken_bricks.get(id).expect("brick still alive");
    assert!((brick.position().x - (100.0 + 1.5 * 19.9)).abs() < 1e-3);
    assert!((brick.position().y - (100.0 - 3.0 * 19.9)).abs() < 1e-3);
}

#[test]
fn broken_brick_at_lifetime_removes_itself() {
    let mut set = TransientSet::with_seed(7);
    let id = set.add_broken_brick_piece(3, 0.0, 0.0, 1.0, 1.0);

    set.step(frame_ms(120), &EmptyLevel);
    let expired = set.step(frame_ms(80), &EmptyLevel);

    assert_eq!(expired, 1);
    assert!(!set.broken_bricks.contains(id));
    assert!(set.is_empty());
}

#[test]
fn shattered_brick_spawns_four_pieces() {
    let mut set = TransientSet::with_seed(1);
    let ids = set.add_broken_brick(9, 64.0, 32.0);
    assert_eq!(set.broken_bricks.len(), 4);

    let pieces = ids
        .iter()
        .map(|id| set.broken_bricks.get(*id).expect("piece"))
        .map(|piece| (piece.position(), piece.velocity()))
        .collect::<Vec<_>>();
    assert_eq!(
        pieces,
        vec![
            (Vec2::new(64.0, 32.0), Vec2::new(-1.0, -4.0)),
            (Vec2::new(64.0, 48.0), Vec2::new(-1.5, -3.0)),
            (Vec2::new(80.0, 32.0), Vec2::new(1.0, -4.0)),
            (Vec2::new(80.0, 48.0), Vec2::new(1.5, -3.0)),
        ]
    );
    assert!(set.broken_bricks.iter().all(|piece| piece.tile_id() == 9));
}

#[test]
fn seeded_sets_draw_identical_fragments() {
    let mut first = TransientSet::with_seed(42);
    let mut second = TransientSet::with_seed(42);
    first.add_broken_brick(9, 0.0, 0.0);
    second.add_broken_brick(9, 0.0, 0.0);

    let mut first_list = DrawList::new(640.0);
    let mut second_list = DrawList::new(640.0);
    first.draw(&mut first_list, Vec2::default());
    second.draw(&mut second_list, Vec2::default());
    assert_eq!(first_list, second_list);
    assert_eq!(first_list.commands().len(), 4);
}

#[test]
fn expiry_in_the_middle_keeps_neighbours_stepping() {
    let mut set = TransientSet::new();
    let early = set.add_score(0.0, 100.0, 10);
    set.step(frame_ms(500), &EmptyLevel);
    let middle = set.add_score(0.0, 100.0, 20);
    let late = set.add_score(0.0, 100.0, 30);

    let expired = set.step(frame_ms(500), &EmptyLevel);

    assert_eq!(expired, 1);
    assert!(!set.floating_scores.contains(early));
    let remaining = [middle, late]
        .iter()
        .map(|id| set.floating_scores.get(*id).expect("alive").position().y)
        .collect::<Vec<_>>();
    assert_eq!(remaining, vec![-16.0, -16.0]);
}

#[test]
fn large_pass_drops_expired_and_keeps_survivor_order() {
    let mut set = TransientSet::new();
    for value in 0..500 {
        set.add_score(0.0, 100.0, value);
    }
    set.step(frame_ms(500), &EmptyLevel);
    for value in 500..1000 {
        set.add_score(0.0, 100.0, value);
    }

    let expired = set.step(frame_ms(500), &EmptyLevel);

    assert_eq!(expired, 500);
    assert_eq!(set.floating_scores.len(), 500);
    let values = set
        .floating_scores
        .iter()
        .map(|score| score.value())
        .collect::<Vec<_>>();
    assert_eq!(values, (500..1000).collect::<Vec<_>>());
    assert!(set
        .floating_scores
        .iter()
        .all(|score| score.position().y == -16.0));
}

#[test]
fn removing_a_missing_effect_is_a_no_op() {
    let mut collection = EffectCollection::new();
    let id = collection.spawn(BouncyDistro::new(0.0, 0.0));
    assert!(collection.remove(id).is_some());
    assert!(collection.remove(id).is_none());
    assert!(collection.is_empty());
}

#[test]
fn ids_are_not_reused_after_removal() {
    let mut collection = EffectCollection::new();
    let first = collection.spawn(BouncyDistro::new(0.0, 0.0));
    collection.remove(first);
    let second = collection.spawn(BouncyDistro::new(0.0, 0.0));
    assert_ne!(first, second);
}

#[test]
fn bouncy_brick_captures_the_tile_it_bumps() {
    struct OneTile;
    impl LevelTiles for OneTile {
        fn tile_id_at(&self, x: f32, y: f32) -> u32 {
            if x == 64.0 && y == 32.0 {
                12
            } else {
                0
            }
        }

        fn is_solid(&self, _x: f32, _y: f32) -> bool {
            true
        }
    }

    let mut set = TransientSet::new();
    let id = set.add_bouncy_brick(64.0, 32.0, &OneTile);
    assert_eq!(set.bouncy_bricks.get(id).expect("brick").shape(), 12);

    let mut steps = 0;
    while set.bouncy_bricks.contains(id) {
        set.step(frame_ms(10), &OneTile);
        if let Some(brick) = set.bouncy_bricks.get(id) {
            assert!(brick.offset().abs() <= BOUNCY_BRICK_MAX_OFFSET);
        }
        steps += 1;
        assert!(steps < 100, "bouncy brick never settled");
    }
}

#[test]
fn mixed_effects_drain_except_trampolines() {
    let mut set = TransientSet::with_seed(3);
    set.add_bouncy_distro(10.0, 10.0);
    set.add_broken_brick(1, 10.0, 10.0);
    set.add_bouncy_brick(10.0, 10.0, &EmptyLevel);
    set.add_score(10.0, 10.0, 100);
    set.add_trampoline(10.0, 10.0);
    assert_eq!(set.len(), 8);

    for _ in 0..150 {
        set.step(frame_ms(10), &EmptyLevel);
    }

    assert_eq!(set.len(), 1);
    assert_eq!(set.trampolines.len(), 1);
}
