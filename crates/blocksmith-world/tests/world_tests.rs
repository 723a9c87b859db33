use blocksmith_geom::LatticePos;
use blocksmith_world::{BlockId, Color, Insert, World};

fn c(s: &str) -> Color {
    Color::parse(s).unwrap()
}

fn added(i: Insert) -> BlockId {
    match i {
        Insert::Added(id) => id,
        other => panic!("expected Added, got {other:?}"),
    }
}

#[test]
fn repaint_unknown_id_leaves_snapshot_unchanged() {
    let mut w = World::new();
    added(w.add(LatticePos::ORIGIN, c("#ef4444")));
    let before = w.snapshot();
    assert!(!w.repaint(BlockId::from_raw(42), c("#000")));
    assert_eq!(w.snapshot(), before);
}

#[test]
fn repaint_changes_color_only() {
    let mut w = World::new();
    let id = added(w.add(LatticePos::new(3, 1, -2), c("#ef4444")));
    assert!(w.repaint(id, c("#22c55e")));
    let b = w.get(id).unwrap();
    assert_eq!(b.pos, LatticePos::new(3, 1, -2));
    assert_eq!(b.color, c("#22c55e"));
}

#[test]
fn removed_cell_can_be_rebuilt_with_new_identity() {
    let mut w = World::new();
    let first = added(w.add(LatticePos::ORIGIN, c("#fff")));
    assert!(w.remove(first));
    assert!(!w.remove(first));
    let second = added(w.add(LatticePos::ORIGIN, c("#fff")));
    assert_ne!(first, second);
    assert!(w.get(first).is_none());
}

#[test]
fn clear_then_replace_keeps_identities_fresh() {
    let mut w = World::new();
    let a = added(w.add(LatticePos::ORIGIN, c("#fff")));
    w.clear();
    assert!(w.is_empty());
    w.replace_all([(LatticePos::new(1, 0, 0), c("#000"))]);
    let snap = w.snapshot();
    assert_eq!(snap.len(), 1);
    assert!(snap[0].id > a);
    assert_eq!(w.stats().ids_issued, 2);
}

#[test]
fn snapshot_is_in_creation_order() {
    let mut w = World::new();
    for x in [5, -1, 3, 0] {
        added(w.add(LatticePos::new(x, 0, 0), c("#fff")));
    }
    let xs: Vec<i32> = w.snapshot().iter().map(|b| b.pos.x).collect();
    assert_eq!(xs, vec![5, -1, 3, 0]);
}

#[test]
fn snapshot_is_detached_from_the_store() {
    let mut w = World::new();
    let id = added(w.add(LatticePos::ORIGIN, c("#fff")));
    let snap = w.snapshot();
    w.repaint(id, c("#000"));
    assert_eq!(snap[0].color, c("#fff"));
    assert_eq!(w.snapshot()[0].color, c("#000"));
}
