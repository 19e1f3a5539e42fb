use invaders::compute::init_state;
use invaders::config::GameConfig;
use invaders::entities::*;

fn state() -> GameState {
    init_state(
        &GameConfig::default(),
        Bounds {
            width: 60.0,
            height: 20.0,
        },
    )
}

#[test]
fn bullet_effect_thresholds() {
    assert_eq!(BulletEffect::for_level(1), BulletEffect::Normal);
    assert_eq!(BulletEffect::for_level(5), BulletEffect::Normal);
    assert_eq!(BulletEffect::for_level(6), BulletEffect::Cyan);
    assert_eq!(BulletEffect::for_level(15), BulletEffect::Cyan);
    assert_eq!(BulletEffect::for_level(16), BulletEffect::Yellow);
    assert_eq!(BulletEffect::for_level(25), BulletEffect::Yellow);
    assert_eq!(BulletEffect::for_level(26), BulletEffect::Purple);
    assert_eq!(BulletEffect::for_level(400), BulletEffect::Purple);
}

#[test]
fn direction_flips() {
    assert_eq!(Direction::Left.reversed(), Direction::Right);
    assert_eq!(Direction::Right.reversed(), Direction::Left);
    assert_eq!(Direction::Left.sign(), -1.0);
    assert_eq!(Direction::Right.sign(), 1.0);
}

#[test]
fn rect_overlap_is_symmetric() {
    let a = Rect {
        x: 2.0,
        y: 2.0,
        width: 3.0,
        height: 1.0,
    };
    let b = Rect {
        x: 4.5,
        y: 2.5,
        width: 1.0,
        height: 1.0,
    };
    let far = Rect { x: 10.0, ..b };
    assert!(a.overlaps(&b) && b.overlaps(&a));
    assert!(!a.overlaps(&far) && !far.overlaps(&a));
}

#[test]
fn counters_split_bullets_by_owner() {
    let mut s = state();
    let shot = Bullet {
        x: 1.0,
        y: 1.0,
        width: 1.0,
        height: 1.0,
        dy: -0.5,
        owner: BulletOwner::Player,
        effect: Some(BulletEffect::Normal),
    };
    s.bullets.push(shot.clone());
    s.bullets.push(Bullet {
        owner: BulletOwner::Invader,
        effect: None,
        dy: 0.25,
        ..shot
    });
    assert_eq!(s.player_bullets(), 1);
    assert_eq!(s.invader_bullets(), 1);
}

#[test]
fn game_state_clone_is_independent() {
    let original = state();
    let mut cloned = original.clone();

    // Mutating the clone must not affect the original
    cloned.player.x = 99.0;
    cloned.score = 999;
    cloned.invaders[0].alive = false;

    assert_eq!(original.player.x, 27.0);
    assert_eq!(original.score, 0);
    assert!(original.invaders[0].alive);
}

#[test]
fn grid_shape_len() {
    let shape = GridShape { rows: 3, cols: 5 };
    assert_eq!(shape.len(), 15);
    assert!(!shape.is_empty());
    assert!(GridShape { rows: 0, cols: 5 }.is_empty());
}
