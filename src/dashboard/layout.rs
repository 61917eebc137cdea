//! # Layout Composition Engine
//!
//! Turns a profile's placement into a tree of screen regions and binds every
//! leaf to a module invocation.
//!
//! The work is split in two so that the shape stays a pure function of the
//! profile:
//!
//! 1. [`plan`] builds a [`LayoutNode<Slot>`] from the profile alone.
//! 2. [`bind`] visits the leaves in tree order, invokes each module once and
//!    returns the same shape with a [`ModuleInvocation`] in every leaf.
//!
//! ## Auto-grid
//!
//! ```text
//! modules = [a, b, c, d, e]   columns = 2   wide = [c]
//!
//! ┌─────┬─────┐
//! │  a  │  b  │
//! ├─────┴─────┤
//! │     c     │
//! ├─────┬─────┤
//! │  d  │  e  │
//! └─────┴─────┘
//! ```
//!
//! ## Structured
//!
//! ```text
//! left = [m1, [m2, m3]]   right = [m4]   left_ratio = 1   right_ratio = 1
//!
//! ┌─────────┬─────────┐
//! │   m1    │         │
//! ├────┬────┤   m4    │
//! │ m2 │ m3 │         │
//! └────┴────┴─────────┘
//! ```

use crate::modules::{
    ContentBlock, ModuleInvocation, ModuleRegistry, RenderContext, NO_MODULES_NOTICE,
};
use crate::profile::{Cell, Profile, StructuredLayout};
use crate::ui::theme::Tone;
use std::collections::BTreeSet;

/// Axis along which a split lays out its children.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitDirection {
    /// Children side by side.
    Row,
    /// Children stacked top to bottom.
    Column,
}

/// A node of the region tree.
#[derive(Debug, Clone, PartialEq)]
pub enum LayoutNode<L> {
    Split {
        direction: SplitDirection,
        children: Vec<LayoutNode<L>>,
        /// Per-child weights; `None` shares space equally.
        ratios: Option<Vec<u16>>,
    },
    Leaf(L),
    /// Fixed-height band, used for the header.
    Fixed { height: u16, content: ContentBlock },
}

impl<L> LayoutNode<L> {
    fn split(direction: SplitDirection, children: Vec<LayoutNode<L>>) -> Self {
        LayoutNode::Split {
            direction,
            children,
            ratios: None,
        }
    }

    /// Leaves in tree order (depth first, left to right).
    pub fn leaves(&self) -> Vec<&L> {
        let mut out = Vec::new();
        self.collect_leaves(&mut out);
        out
    }

    fn collect_leaves<'a>(&'a self, out: &mut Vec<&'a L>) {
        match self {
            LayoutNode::Split { children, .. } => {
                for child in children {
                    child.collect_leaves(out);
                }
            }
            LayoutNode::Leaf(leaf) => out.push(leaf),
            LayoutNode::Fixed { .. } => {}
        }
    }

    pub fn leaf_count(&self) -> usize {
        self.leaves().len()
    }

    /// Same shape, with every leaf transformed in tree order.
    pub fn map_leaves<M>(self, f: &mut impl FnMut(L) -> M) -> LayoutNode<M> {
        match self {
            LayoutNode::Split {
                direction,
                children,
                ratios,
            } => LayoutNode::Split {
                direction,
                children: children.into_iter().map(|c| c.map_leaves(f)).collect(),
                ratios,
            },
            LayoutNode::Leaf(leaf) => LayoutNode::Leaf(f(leaf)),
            LayoutNode::Fixed { height, content } => LayoutNode::Fixed { height, content },
        }
    }
}

/// What a planned leaf will show.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Slot {
    Module(String),
    /// The profile places nothing; show the notice instead.
    Empty,
}

/// One auto-grid row.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GridRow {
    pub members: Vec<String>,
    /// Full-width row holding exactly one wide module.
    pub wide: bool,
}

/// Greedy left-to-right packing of `modules` into rows of at most `cols`.
///
/// A wide module flushes the pending row and takes a row of its own. A short
/// final row is kept.
pub fn grid_rows(modules: &[String], cols: usize, wide: &BTreeSet<String>) -> Vec<GridRow> {
    let cols = cols.max(1);
    let mut rows = Vec::new();
    let mut buffer: Vec<String> = Vec::new();

    for name in modules {
        if wide.contains(name) {
            if !buffer.is_empty() {
                rows.push(GridRow {
                    members: std::mem::take(&mut buffer),
                    wide: false,
                });
            }
            rows.push(GridRow {
                members: vec![name.clone()],
                wide: true,
            });
        } else {
            buffer.push(name.clone());
            if buffer.len() >= cols {
                rows.push(GridRow {
                    members: std::mem::take(&mut buffer),
                    wide: false,
                });
            }
        }
    }
    if !buffer.is_empty() {
        rows.push(GridRow {
            members: buffer,
            wide: false,
        });
    }
    rows
}

/// Build the body shape for the profile's active placement mode.
pub fn plan(profile: &Profile) -> LayoutNode<Slot> {
    let body = match &profile.layout {
        Some(layout) => plan_structured(layout, profile.left_ratio, profile.right_ratio),
        None => plan_grid(&profile.modules, profile.columns, &profile.wide),
    };
    body.unwrap_or(LayoutNode::Leaf(Slot::Empty))
}

fn module_leaf(name: &str) -> LayoutNode<Slot> {
    LayoutNode::Leaf(Slot::Module(name.to_string()))
}

fn plan_grid(
    modules: &[String],
    cols: usize,
    wide: &BTreeSet<String>,
) -> Option<LayoutNode<Slot>> {
    let rows: Vec<LayoutNode<Slot>> = grid_rows(modules, cols, wide)
        .into_iter()
        .map(|row| {
            if row.wide {
                module_leaf(&row.members[0])
            } else {
                LayoutNode::split(
                    SplitDirection::Row,
                    row.members.iter().map(|m| module_leaf(m)).collect(),
                )
            }
        })
        .collect();
    if rows.is_empty() {
        return None;
    }
    Some(LayoutNode::split(SplitDirection::Column, rows))
}

fn plan_column(cells: &[Cell]) -> Option<LayoutNode<Slot>> {
    let rows: Vec<LayoutNode<Slot>> = cells
        .iter()
        .filter_map(|cell| match cell {
            Cell::Module(name) => Some(module_leaf(name)),
            Cell::Row(names) if names.is_empty() => None,
            Cell::Row(names) => Some(LayoutNode::split(
                SplitDirection::Row,
                names.iter().map(|m| module_leaf(m)).collect(),
            )),
        })
        .collect();
    if rows.is_empty() {
        return None;
    }
    Some(LayoutNode::split(SplitDirection::Column, rows))
}

fn plan_structured(
    layout: &StructuredLayout,
    left_ratio: u16,
    right_ratio: u16,
) -> Option<LayoutNode<Slot>> {
    let mut children = Vec::new();
    let mut ratios = Vec::new();
    for (cells, ratio) in [(&layout.left, left_ratio), (&layout.right, right_ratio)] {
        if let Some(column) = plan_column(cells) {
            children.push(column);
            ratios.push(ratio);
        }
    }
    if children.is_empty() {
        return None;
    }
    Some(LayoutNode::Split {
        direction: SplitDirection::Row,
        children,
        ratios: Some(ratios),
    })
}

/// Invoke every planned module once, in tree order, and attach the results.
pub async fn bind(
    shape: LayoutNode<Slot>,
    registry: &ModuleRegistry,
    ctx: &RenderContext,
) -> LayoutNode<ModuleInvocation> {
    let mut invocations = Vec::with_capacity(shape.leaf_count());
    for slot in shape.leaves() {
        let invocation = match slot {
            Slot::Module(name) => registry.invoke(name, ctx).await,
            Slot::Empty => empty_notice(),
        };
        invocations.push(invocation);
    }

    let mut invocations = invocations.into_iter();
    shape.map_leaves(&mut |_| invocations.next().unwrap_or_else(empty_notice))
}

fn empty_notice() -> ModuleInvocation {
    let mut notice = ModuleInvocation::notice("mirrordash", NO_MODULES_NOTICE);
    notice.content.title_tone = Tone::Accent;
    notice
}

/// Plan and bind the body for one rebuild.
pub async fn build_body(
    profile: &Profile,
    registry: &ModuleRegistry,
    ctx: &RenderContext,
) -> LayoutNode<ModuleInvocation> {
    bind(plan(profile), registry, ctx).await
}
