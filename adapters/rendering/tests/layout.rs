use tower_defense_core::{
    EnemySnapshot, GameSnapshot, Position, SessionStats, TowerCosts, TowerKind,
};
use tower_defense_rendering::{
    TextRenderer, BORDER_GLYPH, GRID_HEIGHT, GRID_WIDTH, PATH_GLYPH,
};

fn default_path() -> Vec<Position> {
    [
        (0.0, 300.0),
        (200.0, 300.0),
        (200.0, 100.0),
        (400.0, 100.0),
        (400.0, 500.0),
        (600.0, 500.0),
        (600.0, 300.0),
        (800.0, 300.0),
    ]
    .into_iter()
    .map(|(x, y)| Position::new(x, y))
    .collect()
}

fn snapshot(paused: bool) -> GameSnapshot {
    GameSnapshot {
        towers: Vec::new(),
        enemies: Vec::new(),
        path: default_path(),
        lives: 97,
        money: 850,
        wave: 4,
        paused,
        tower_costs: TowerCosts::default(),
    }
}

fn row(renderer: &TextRenderer, y: usize) -> String {
    renderer.frame().row(y).unwrap_or_default()
}

#[test]
fn frame_has_fixed_dimensions_and_borders() {
    let mut renderer = TextRenderer::new();
    let text = renderer
        .render(&snapshot(false), &SessionStats::default())
        .to_string();

    let lines: Vec<&str> = text.lines().collect();
    assert_eq!(lines.len(), GRID_HEIGHT);
    assert!(lines.iter().all(|line| line.chars().count() == GRID_WIDTH));

    let frame = renderer.frame();
    for y in [0, 2] {
        assert!(frame.row(y).unwrap().chars().all(|glyph| glyph == BORDER_GLYPH));
    }
    for y in 0..GRID_HEIGHT {
        assert_eq!(frame.get(0, y), Some(BORDER_GLYPH));
        assert_eq!(frame.get(75, y), Some(BORDER_GLYPH));
        assert_eq!(frame.get(99, y), Some(BORDER_GLYPH));
    }
}

#[test]
fn title_is_centered_on_the_second_row() {
    let mut renderer = TextRenderer::new();
    let _ = renderer.render(&snapshot(false), &SessionStats::default());

    let title = row(&renderer, 1);
    assert_eq!(title.chars().skip(42).take(15).collect::<String>(), " Tower Defense ");
}

#[test]
fn hud_reports_economy_and_pause() {
    let mut renderer = TextRenderer::new();

    let _ = renderer.render(&snapshot(false), &SessionStats::default());
    let hud: String = row(&renderer, 29).chars().skip(1).collect();
    assert!(hud.starts_with("Wave: 4 | Lives: 97 | Money: 850█"));

    let _ = renderer.render(&snapshot(true), &SessionStats::default());
    let hud: String = row(&renderer, 29).chars().skip(1).collect();
    assert!(hud.starts_with("Wave: 4 | Lives: 97 | Money: 850 | PAUSED█"));
}

#[test]
fn sidebar_lists_prices_controls_and_stats() {
    let mut state = snapshot(false);
    let _ = state.tower_costs.set(TowerKind::Sniper, 120);
    let stats = SessionStats {
        towers_built: 3,
        enemies_killed: 12,
        enemies_escaped: 2,
        shots_fired: 40,
        ..SessionStats::default()
    };

    let mut renderer = TextRenderer::new();
    let _ = renderer.render(&state, &stats);
    let sidebar = |y: usize| -> String { row(&renderer, y).chars().skip(76).collect() };

    assert!(sidebar(3).starts_with("Tower Types:"));
    assert!(sidebar(4).starts_with("1. Basic Tower  $50"));
    assert!(sidebar(5).starts_with("2. Sniper Tower $120"));
    assert!(sidebar(6).starts_with("3. AOE Tower    $150"));
    assert!(sidebar(8).starts_with("Controls:"));
    assert!(sidebar(12).starts_with("P: Pause game"));
    assert!(sidebar(14).starts_with("Stats:"));
    assert!(sidebar(16).starts_with("Towers Standing: 0"));
    assert!(sidebar(17).starts_with("Towers Built: 3"));
    assert!(sidebar(18).starts_with("Kills: 12"));
    assert!(sidebar(19).starts_with("Escaped: 2"));
    assert!(sidebar(20).starts_with("Shots Fired: 40"));
}

#[test]
fn path_corners_and_enemies_land_on_projected_cells() {
    let mut state = snapshot(false);
    state.enemies.push(EnemySnapshot {
        position: Position::new(200.0, 100.0),
        health: 60,
        max_health: 60,
        speed: 1.1,
        reward: 11,
        damage: 1,
        path_index: 2,
    });

    let mut renderer = TextRenderer::new();
    let frame = renderer.render(&state, &SessionStats::default());

    assert_eq!(frame.get(1, 12), Some(PATH_GLYPH));
    assert_eq!(frame.get(18, 12), Some(PATH_GLYPH));
    assert_eq!(frame.get(18, 8), Some(PATH_GLYPH));
    assert_eq!(frame.get(18, 4), Some('E'));
    assert_eq!(frame.get(36, 20), Some(PATH_GLYPH));
    assert_eq!(frame.get(73, 12), Some(PATH_GLYPH));
    assert_eq!(frame.get(30, 25), Some(' '));
}
