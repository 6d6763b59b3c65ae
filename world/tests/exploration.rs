use std::time::Duration;

use cucumber_world_core::{
    Command, Direction, Event, GridPosition, MovementRejection, TileDefinition, TileTag,
};
use cucumber_world_world::{
    self as world, query, Grid, Level, LevelDimensions, MovementState, TileCatalog, World,
    WorldConfig,
};

const STEP: Duration = Duration::from_millis(150);
const FRAME: Duration = Duration::from_millis(16);

fn quiet_field() -> World {
    let mut grid = Grid::new(10, 10, 32.0);
    grid.fill(&TileTag::new("grass"));
    grid.set_tile(GridPosition::new(5, 5), Some(TileTag::new("tree")));

    let catalog = TileCatalog::from_definitions([
        (
            TileTag::new("grass"),
            TileDefinition {
                encounter_rate: Some(0.0),
                ..TileDefinition::default()
            },
        ),
        (
            TileTag::new("tree"),
            TileDefinition {
                walkable: false,
                blocks_movement: true,
                ..TileDefinition::default()
            },
        ),
    ]);

    World::new(
        Level::new("meadow", grid, GridPosition::new(5, 4)),
        catalog,
        WorldConfig::default(),
    )
}

fn apply_all(world: &mut World, commands: impl IntoIterator<Item = Command>) -> Vec<Event> {
    let mut events = Vec::new();
    for command in commands {
        world::apply(world, command, &mut events);
    }
    events
}

fn step(direction: Direction) -> [Command; 2] {
    [Command::Move { direction }, Command::Tick { dt: STEP }]
}

#[test]
fn tree_blocks_the_step_below_the_player() {
    let mut world = quiet_field();
    let events = apply_all(
        &mut world,
        [Command::Move {
            direction: Direction::Down,
        }],
    );

    assert_eq!(
        events,
        vec![Event::MovementRejected {
            direction: Direction::Down,
            reason: MovementRejection::Blocked,
        }]
    );
    let player = query::player(&world);
    assert_eq!(player.current_cell(), GridPosition::new(5, 4));
    assert_eq!(player.movement(), MovementState::Idle);
    assert_eq!(player.step_count(), 0);
}

#[test]
fn open_step_lands_after_one_movement_period() {
    let mut world = quiet_field();
    let _ = apply_all(&mut world, step(Direction::Right));

    let player = query::player(&world);
    assert_eq!(player.current_cell(), GridPosition::new(6, 4));
    assert_eq!(player.step_count(), 1);
    assert_eq!(
        player.current_pixel(),
        query::grid(&world).center_pixel_of(GridPosition::new(6, 4))
    );
}

#[test]
fn frames_shorter_than_a_step_interpolate_before_landing() {
    let mut world = quiet_field();
    let _ = apply_all(
        &mut world,
        [Command::Move {
            direction: Direction::Up,
        }],
    );

    let start_y = query::player(&world).current_pixel().y();
    let mut completed = 0;
    let mut frames = 0;
    while completed == 0 {
        let events = apply_all(&mut world, [Command::Tick { dt: FRAME }]);
        frames += 1;
        completed = events
            .iter()
            .filter(|event| matches!(event, Event::StepCompleted { .. }))
            .count();
        if completed == 0 {
            let y = query::player(&world).current_pixel().y();
            assert!(y < start_y && y > start_y - 32.0);
        }
    }

    assert_eq!(frames, 10);
    assert_eq!(query::player(&world).current_cell(), GridPosition::new(5, 3));
}

#[test]
fn held_direction_chains_steps_without_idle_frames() {
    let mut world = quiet_field();
    let mut events = apply_all(
        &mut world,
        [Command::Move {
            direction: Direction::Left,
        }],
    );
    for _ in 0..3 {
        events.extend(apply_all(
            &mut world,
            [
                Command::Move {
                    direction: Direction::Left,
                },
                Command::Tick { dt: STEP },
            ],
        ));
    }

    let player = query::player(&world);
    assert_eq!(player.current_cell(), GridPosition::new(2, 4));
    assert_eq!(player.step_count(), 3);
    assert!(player.is_moving());
    let started = events
        .iter()
        .filter(|event| matches!(event, Event::MovementStarted { .. }))
        .count();
    assert_eq!(started, 4);
}

#[test]
fn walking_into_the_edge_is_rejected_without_moving() {
    let mut world = quiet_field();
    let mut events = Vec::new();
    for _ in 0..6 {
        events.extend(apply_all(&mut world, step(Direction::Right)));
    }

    let player = query::player(&world);
    assert_eq!(player.current_cell(), GridPosition::new(9, 4));
    assert_eq!(player.step_count(), 4);
    assert_eq!(events.last(), Some(&Event::TimeAdvanced { dt: STEP }));
    assert!(events.contains(&Event::MovementRejected {
        direction: Direction::Right,
        reason: MovementRejection::OutOfBounds,
    }));
}

#[test]
fn queued_step_toward_the_tree_is_rejected_on_landing() {
    let mut world = quiet_field();
    let events = apply_all(
        &mut world,
        [
            Command::PlacePlayer {
                cell: GridPosition::new(5, 3),
            },
            Command::Move {
                direction: Direction::Down,
            },
            Command::Move {
                direction: Direction::Down,
            },
            Command::Tick { dt: STEP },
        ],
    );

    assert_eq!(
        &events[3..],
        &[
            Event::TimeAdvanced { dt: STEP },
            Event::StepCompleted {
                cell: GridPosition::new(5, 4),
                step_count: 1,
            },
            Event::MovementRejected {
                direction: Direction::Down,
                reason: MovementRejection::Blocked,
            },
        ]
    );
    let player = query::player(&world);
    assert_eq!(player.current_cell(), GridPosition::new(5, 4));
    assert_eq!(player.movement(), MovementState::Idle);
    assert_eq!(player.pending_direction(), None);
}

#[test]
fn camera_stays_clamped_while_walking() {
    let mut grid = Grid::new(60, 40, 32.0);
    grid.fill(&TileTag::new("path"));
    let config = WorldConfig::default();
    let mut world = World::new(
        Level::new("road", grid, GridPosition::new(0, 0)),
        TileCatalog::from_definitions([(TileTag::new("path"), TileDefinition::default())]),
        config,
    );

    let max_x = 60.0 * 32.0 - config.screen.width();
    let max_y = 40.0 * 32.0 - config.screen.height();
    for direction in [Direction::Right; 59].into_iter().chain([Direction::Down; 39]) {
        let _ = apply_all(&mut world, [Command::Move { direction }]);
        for _ in 0..4 {
            let _ = apply_all(&mut world, [Command::Tick { dt: Duration::from_millis(40) }]);
            let offset = query::camera_offset(&world);
            assert!((0.0..=max_x).contains(&offset.x()));
            assert!((0.0..=max_y).contains(&offset.y()));
        }
    }

    assert_eq!(query::player(&world).current_cell(), GridPosition::new(59, 39));
    let offset = query::camera_offset(&world);
    assert_eq!((offset.x(), offset.y()), (max_x, max_y));
}

#[test]
fn fallback_catalog_and_generated_level_are_walkable() {
    let dimensions = LevelDimensions::default();
    let level = Level::generate_default(dimensions, 7);
    let mut world = World::new(level, TileCatalog::fallback(), WorldConfig::default());

    let start = query::player(&world).current_cell();
    assert_eq!(start, GridPosition::new(18, 12));

    let mut events = Vec::new();
    for _ in 0..5 {
        events.extend(apply_all(&mut world, step(Direction::Left)));
    }

    assert_eq!(query::player(&world).current_cell(), GridPosition::new(13, 12));
    assert!(!events
        .iter()
        .any(|event| matches!(event, Event::MovementRejected { .. })));
    assert!(query::catalog(&world).is_fallback());
}
