use std::thread;
use std::time::{Duration, Instant};

use blocksmith::app::{App, Flow};
use blocksmith::collaborators::ChallengeDeck;
use blocksmith::commands::parse_command;
use blocksmith::config::{SessionConfig, StarterBlock};
use blocksmith_edit::ToolMode;
use blocksmith_geom::LatticePos;
use blocksmith_runtime::{GeneratorError, StructureGenerator};
use blocksmith_world::Color;
use crossbeam_channel::{Receiver, Sender, bounded};

/// Canned responses keyed by prompt; "slow" waits for the test to open the gate.
struct Fixture {
    gate: Receiver<()>,
}

impl StructureGenerator for Fixture {
    fn generate(&self, prompt: &str) -> Result<String, GeneratorError> {
        match prompt {
            "slow" => {
                self.gate
                    .recv()
                    .map_err(|_| GeneratorError::Failed("gate closed".into()))?;
                Ok(r##"{"name":"Slow","blocks":[{"x":9,"y":0,"z":9,"color":"#000"}]}"##.into())
            }
            "wall" => Ok(r##"{"name":"Wall","blocks":[
                {"x":0,"y":0,"z":5,"color":"#eab308"},
                {"x":1,"y":0,"z":5,"color":"#eab308"},
                {"x":2,"y":-1,"z":5,"color":"#eab308"},
                {"x":0.6,"y":0,"z":5.2,"color":"#22c55e"}]}"##
                .into()),
            "junk" => Ok("Sorry, I can't draw that.".into()),
            other => Err(GeneratorError::NotFound(other.into())),
        }
    }
}

fn session(cfg: SessionConfig) -> (App, Sender<()>) {
    let (open, gate) = bounded(1);
    let app = App::new(
        &cfg,
        Fixture { gate },
        ChallengeDeck::new(vec!["Build a windmill.".into()]),
    )
    .unwrap();
    (app, open)
}

fn run(app: &mut App, line: &str) -> Vec<String> {
    let cmd = parse_command(line, &app.palette)
        .unwrap()
        .expect("line should be a command");
    assert_eq!(app.execute(cmd), Flow::Continue);
    app.take_messages()
}

fn positions(app: &App) -> Vec<LatticePos> {
    let mut v: Vec<LatticePos> = app.world.snapshot().iter().map(|b| b.pos).collect();
    v.sort();
    v
}

#[test]
fn starts_with_the_starter_scene() {
    let (app, _open) = session(SessionConfig::default());
    assert_eq!(
        positions(&app),
        vec![LatticePos::new(0, 0, 0), LatticePos::new(1, 0, 0)]
    );
    assert_eq!(app.tool.mode, ToolMode::Build);
    assert_eq!(app.tool.color.as_str(), "#ef4444");
}

#[test]
fn build_paint_delete_round() {
    let (mut app, _open) = session(SessionConfig::default());
    let out = run(&mut app, "pick at 1 0 0 +x");
    assert_eq!(out, vec!["added #3 at (2, 0, 0)"]);

    run(&mut app, "pick at 2 0 0 -y");
    assert_eq!(app.world.len(), 3);

    run(&mut app, "pick ground 2.6 -1.3");
    assert!(app.world.block_at(LatticePos::new(3, 0, -1)).is_some());

    run(&mut app, "mode paint");
    run(&mut app, "color purple");
    run(&mut app, "pick at 0 0 0 top");
    let origin = app.world.block_at(LatticePos::ORIGIN).unwrap();
    assert_eq!(origin.color.as_str(), "#a855f7");

    run(&mut app, "mode delete");
    let before = app.world.snapshot();
    assert_eq!(run(&mut app, "pick ground 4 4"), vec!["nothing to do"]);
    assert_eq!(app.world.snapshot(), before);
    run(&mut app, "pick block #1 +y");
    assert!(app.world.block_at(LatticePos::ORIGIN).is_none());
    assert_eq!(run(&mut app, "pick block #1 +y"), vec!["no block there"]);
}

#[test]
fn generate_replaces_the_world() {
    let (mut app, _open) = session(SessionConfig::default());
    run(&mut app, "generate wall");
    let out = run(&mut app, "wait");
    assert_eq!(out, vec!["built `Wall`: 3 block(s)"]);
    assert_eq!(
        positions(&app),
        vec![
            LatticePos::new(0, 0, 5),
            LatticePos::new(1, 0, 5),
            LatticePos::new(2, 0, 5),
        ]
    );
    // The later descriptor on (1, 0, 5) wins.
    let b = app.world.block_at(LatticePos::new(1, 0, 5)).unwrap();
    assert_eq!(b.color.as_str(), "#22c55e");
}

#[test]
fn failed_imports_leave_the_world_alone() {
    let (mut app, _open) = session(SessionConfig::default());
    let before = app.world.snapshot();
    for prompt in ["junk", "unicorn"] {
        run(&mut app, &format!("generate {prompt}"));
        let out = run(&mut app, "wait");
        assert_eq!(out.len(), 1);
        assert!(out[0].starts_with("could not generate"), "{out:?}");
    }
    assert_eq!(app.world.snapshot(), before);
}

#[test]
fn edits_continue_while_a_request_is_outstanding() {
    let (mut app, open) = session(SessionConfig::default());
    run(&mut app, "generate slow");
    assert!(app.is_busy());
    run(&mut app, "pick ground 5 5");
    assert!(app.world.block_at(LatticePos::new(5, 0, 5)).is_some());
    open.send(()).unwrap();
    run(&mut app, "wait");
    assert!(!app.is_busy());
    assert_eq!(positions(&app), vec![LatticePos::new(9, 0, 9)]);
}

#[test]
fn stale_structure_is_dropped() {
    let (mut app, open) = session(SessionConfig::default());
    run(&mut app, "generate slow");
    run(&mut app, "generate wall");
    let deadline = Instant::now() + Duration::from_secs(5);
    while app.world.block_at(LatticePos::new(0, 0, 5)).is_none() {
        assert!(Instant::now() < deadline, "newer structure never landed");
        thread::sleep(Duration::from_millis(5));
        app.step();
    }
    open.send(()).unwrap();
    run(&mut app, "wait");
    assert!(!app.is_busy());
    assert!(app.world.block_at(LatticePos::new(9, 0, 9)).is_none());
    assert_eq!(app.world.len(), 3);
}

#[test]
fn challenge_text_is_displayed() {
    let (mut app, _open) = session(SessionConfig::default());
    run(&mut app, "challenge");
    let out = run(&mut app, "wait");
    assert_eq!(out, vec!["challenge: Build a windmill."]);
    assert_eq!(app.last_challenge.as_deref(), Some("Build a windmill."));
}

#[test]
fn empty_session_and_clear() {
    let cfg = SessionConfig {
        starter_scene: false,
        ..SessionConfig::default()
    };
    let (mut app, _open) = session(cfg);
    assert!(app.world.is_empty());
    run(&mut app, "pick ground 0 0");
    run(&mut app, "pick ground 1 0");
    assert_eq!(run(&mut app, "clear"), vec!["cleared 2 block(s)"]);
    assert_eq!(run(&mut app, "list"), vec!["(empty)"]);
}

#[test]
fn invalid_starter_blocks_are_skipped() {
    let red = Color::parse("#ef4444").unwrap();
    let starter = [(0, 0, 0), (0, -2, 0), (0, 0, 0), (3, 1, 0)]
        .into_iter()
        .map(|(x, y, z)| StarterBlock {
            pos: LatticePos::new(x, y, z),
            color: red.clone(),
        })
        .collect();
    let cfg = SessionConfig {
        starter,
        ..SessionConfig::default()
    };
    let (app, _open) = session(cfg);
    assert_eq!(
        positions(&app),
        vec![LatticePos::new(0, 0, 0), LatticePos::new(3, 1, 0)]
    );
}
