// Copyright 2025 the Strewn Authors
// SPDX-License-Identifier: Apache-2.0 OR MIT

//! Random labels around a placeholder, kept clear of a footer.
//!
//! Builds a small screen (content area, centered placeholder, tab strip at the bottom), sets up
//! a label engine on the content area, and scatters a handful of labels. A counter badge is
//! attached to one tab through the indexed target variant.
//!
//! Run:
//! - `cargo run -p strewn_demos --example random_labels`
//! - `RUST_LOG=strewn_labels=trace cargo run -p strewn_demos --example random_labels`

use kurbo::{Affine, Rect, Vec2};
use rand::SeedableRng;
use rand::rngs::StdRng;
use strewn_labels::{Badge, BadgePosition, LabelConfig, LabelEngine, SelectionPolicy, Target};
use strewn_view_tree::{LocalNode, NodeId, Tree};
use tracing_subscriber::EnvFilter;

fn child(tree: &mut Tree, parent: NodeId, bounds: Rect, at: Vec2) -> NodeId {
    tree.insert(
        Some(parent),
        LocalNode {
            local_bounds: bounds,
            local_transform: Affine::translate(at),
            ..Default::default()
        },
    )
}

fn main() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let mut tree = Tree::new();
    let screen = tree.insert(
        None,
        LocalNode {
            local_bounds: Rect::new(0.0, 0.0, 360.0, 640.0),
            ..Default::default()
        },
    );
    let content = child(
        &mut tree,
        screen,
        Rect::new(0.0, 0.0, 360.0, 580.0),
        Vec2::ZERO,
    );
    let placeholder = child(
        &mut tree,
        content,
        Rect::new(0.0, 0.0, 120.0, 120.0),
        Vec2::new(120.0, 230.0),
    );
    let footer = child(
        &mut tree,
        content,
        Rect::new(0.0, 0.0, 360.0, 40.0),
        Vec2::new(0.0, 520.0),
    );
    let tabs = child(
        &mut tree,
        screen,
        Rect::new(0.0, 0.0, 360.0, 60.0),
        Vec2::new(0.0, 580.0),
    );
    for i in 0..3_u32 {
        child(
            &mut tree,
            tabs,
            Rect::new(0.0, 0.0, 120.0, 60.0),
            Vec2::new(f64::from(i) * 120.0, 0.0),
        );
    }

    // Layout pass; geometry is not readable before this.
    let _ = tree.commit();

    let config = LabelConfig::default()
        .with_density(2.0)
        .with_policy(SelectionPolicy::RoundRobin);
    let mut engine = match LabelEngine::setup(
        &mut tree,
        content,
        "drop here",
        config,
        StdRng::seed_from_u64(2017),
    ) {
        Ok(engine) => engine,
        Err(e) => {
            tracing::error!("setup failed: {e}");
            return;
        }
    };
    if let Err(e) = engine
        .set_focal(&tree, placeholder)
        .and_then(|()| engine.register_obstacle_node(&tree, footer))
    {
        tracing::error!("geometry not ready: {e}");
        return;
    }

    for i in 0..8 {
        let message = format!("label {}", 1000 + i * 37);
        match engine.add_label(&mut tree, &message) {
            Ok(handle) => {
                if let Some(record) = engine.labels().get(handle) {
                    println!(
                        "{:>10} at ({:>3}, {:>3}) bg #{:08X}",
                        record.message,
                        record.x,
                        record.y,
                        record.background.to_argb32()
                    );
                }
            }
            Err(e) => tracing::warn!("label not placed: {e}"),
        }
    }
    println!(
        "policy {:?}, degenerate placements: {}",
        engine.policy(),
        engine.degenerate_placements()
    );

    let counter = Badge::new("0")
        .position(BadgePosition::TopRight)
        .density(2.0)
        .build(&mut tree);
    let tab = Target::Indexed {
        container: tabs,
        index: 1,
    };
    match engine.attach(&mut tree, tab, counter) {
        Ok(outcome) => println!("tab badge: {outcome:?}"),
        Err(e) => tracing::warn!("tab badge not attached: {e}"),
    }
    counter.increment(&mut tree, 3);
    println!("tab badge reads {:?}", counter.text(&tree));

    let damage = tree.commit();
    println!("{} transitions queued", damage.transitions.len());

    let cleared = engine.clear(&mut tree);
    println!(
        "cleared {cleared} labels; anchor still shown: {}",
        engine.anchor().is_shown(&tree)
    );
}
