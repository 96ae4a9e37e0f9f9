// Copyright 2025 the Understory Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Tests for ancestor subscriptions in `understory_box_tree`.
//!
//! Subscriptions watch the transform chain strictly above a node; these cover
//! which edits reach which subscribers.

use kurbo::{Affine, Point, Rect, Vec2};
use understory_box_tree::{LocalNode, NodeFlags, Tree};

fn square(size: f64) -> LocalNode {
    LocalNode::with_bounds(Rect::new(0.0, 0.0, size, size))
}

#[test]
fn deep_ancestor_edits_reach_every_descendant() {
    let mut tree = Tree::new();
    let root = tree.insert(None, square(100.0));
    let mid = tree.insert(Some(root), square(50.0));
    let leaf = tree.insert(Some(mid), square(10.0));
    let sibling = tree.insert(Some(root), square(10.0));

    let on_leaf = tree.subscribe_ancestors(leaf);
    let on_mid = tree.subscribe_ancestors(mid);
    let on_sibling = tree.subscribe_ancestors(sibling);

    tree.set_local_transform(mid, Affine::rotate(0.5));
    assert!(tree.take_ancestor_change(on_leaf));
    assert!(!tree.take_ancestor_change(on_mid));
    assert!(!tree.take_ancestor_change(on_sibling));

    tree.set_translation(root, Vec2::new(1.0, 2.0));
    let changed: Vec<_> = tree.changed_subscriptions().collect();
    assert_eq!(changed.len(), 3);
}

#[test]
fn same_transform_is_not_a_change() {
    let mut tree = Tree::new();
    let root = tree.insert(None, square(100.0).transform(Affine::translate((4.0, 4.0))));
    let leaf = tree.insert(Some(root), square(10.0));
    let sub = tree.subscribe_ancestors(leaf);

    tree.set_translation(root, Vec2::new(4.0, 4.0));
    assert!(!tree.take_ancestor_change(sub));
}

#[test]
fn removed_subtree_stops_hit_testing_and_notifying() {
    let mut tree = Tree::new();
    let root = tree.insert(None, square(100.0));
    let panel = tree.insert(Some(root), square(50.0).transform(Affine::translate((10.0, 10.0))));
    let knob = tree.insert(Some(panel), square(5.0));
    let sub = tree.subscribe_ancestors(knob);

    assert_eq!(tree.hit_test_point(Point::new(12.0, 12.0)).unwrap().node, knob);
    assert!(tree.remove(panel));
    assert!(!tree.is_alive(knob));
    tree.set_translation(root, Vec2::new(3.0, 0.0));
    assert!(!tree.take_ancestor_change(sub));
    assert!(tree.unsubscribe(sub));
    assert_eq!(tree.hit_test_point(Point::new(12.0, 12.0)).unwrap().node, root);
}

#[test]
fn hidden_parents_hide_children_but_unpickable_ones_do_not() {
    let mut tree = Tree::new();
    let root = tree.insert(None, square(100.0));
    let group = tree.insert(Some(root), square(50.0));
    let child = tree.insert(Some(group), square(20.0));

    tree.set_flags(group, NodeFlags::VISIBLE);
    assert_eq!(tree.hit_test_point(Point::new(30.0, 30.0)).unwrap().node, root);
    assert_eq!(tree.hit_test_point(Point::new(5.0, 5.0)).unwrap().node, child);

    tree.set_flags(group, NodeFlags::empty());
    assert_eq!(tree.hit_test_point(Point::new(5.0, 5.0)).unwrap().node, root);
}
