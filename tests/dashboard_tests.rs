//! End-to-end composition tests: profile text in, painted screen out.

use mirrordash::dashboard::{plan, DisplaySurface, LayoutNode, Scheduler, Slot};
use mirrordash::modules::{
    ContentBlock, InvocationStatus, Module, ModuleInvocation, ModuleRegistry, RenderContext,
    MODULE_NOT_FOUND, NO_MODULES_NOTICE,
};
use mirrordash::profile::Profile;
use mirrordash::ui::{BufferSurface, Palette};
use std::path::Path;
use std::sync::Arc;
use std::time::Duration;

/// Renders its own name in upper case.
struct Echo(&'static str);

impl Module for Echo {
    fn name(&self) -> &str {
        self.0
    }

    fn render(&self, ctx: &RenderContext) -> anyhow::Result<ContentBlock> {
        Ok(ContentBlock::new(
            self.0.to_uppercase(),
            format!("{} @ {}", self.0, ctx.frame),
        ))
    }
}

fn registry(names: &[&'static str]) -> ModuleRegistry {
    let mut registry = ModuleRegistry::new();
    for name in names {
        registry.register(Arc::new(Echo(name)));
    }
    registry
}

fn profile(toml: &str) -> Profile {
    Profile::from_toml(toml, Path::new("test.toml")).unwrap()
}

fn body(screen: &LayoutNode<ModuleInvocation>) -> &LayoutNode<ModuleInvocation> {
    match screen {
        LayoutNode::Split { children, .. } => &children[1],
        _ => panic!("screen root must be a split"),
    }
}

async fn once(profile: Profile, registry: ModuleRegistry) -> LayoutNode<ModuleInvocation> {
    let mut scheduler = Scheduler::new(Arc::new(profile), registry, Duration::from_millis(250));
    scheduler.render_once().await
}

#[test]
fn test_auto_grid_with_wide_module() {
    let profile = profile(
        r#"
modules = ["a", "b", "c", "d", "e"]
columns = 2
wide = ["c"]
"#,
    );
    let shape = plan(&profile);
    let LayoutNode::Split { children, .. } = &shape else {
        panic!("grid root must be a split");
    };
    assert_eq!(children.len(), 3);
    assert!(matches!(&children[1], LayoutNode::Leaf(Slot::Module(name)) if name == "c"));
    assert_eq!(children[0].leaf_count(), 2);
    assert_eq!(children[2].leaf_count(), 2);
}

#[test]
fn test_structured_layout_takes_precedence() {
    let profile = profile(
        r#"
modules = ["ignored"]
left_ratio = 1
right_ratio = 1

[layout]
left = ["m1", ["m2", "m3"]]
right = ["m4"]
"#,
    );
    let shape = plan(&profile);
    let names: Vec<String> = shape
        .leaves()
        .into_iter()
        .map(|slot| match slot {
            Slot::Module(name) => name.clone(),
            Slot::Empty => String::new(),
        })
        .collect();
    assert_eq!(names, vec!["m1", "m2", "m3", "m4"]);
    assert!(matches!(
        &shape,
        LayoutNode::Split { ratios: Some(r), .. } if r == &vec![1, 1]
    ));
}

#[tokio::test]
async fn test_unknown_module_gets_placeholder_and_others_render() {
    let profile = profile("modules = [\"alpha\", \"weather\", \"beta\"]\ncolumns = 3\n");
    let screen = once(profile, registry(&["alpha", "beta"])).await;
    let leaves = body(&screen).leaves();

    assert_eq!(leaves.len(), 3);
    assert_eq!(leaves[0].status, InvocationStatus::Rendered);
    assert_eq!(leaves[0].content.title, "ALPHA");
    assert_eq!(leaves[1].status, InvocationStatus::Missing);
    assert_eq!(leaves[1].content.title, "weather");
    assert_eq!(leaves[1].content.plain_body(), MODULE_NOT_FOUND);
    assert_eq!(leaves[2].content.title, "BETA");
}

#[tokio::test]
async fn test_empty_profile_shows_notice() {
    let screen = once(profile(""), registry(&[])).await;
    let leaves = body(&screen).leaves();
    assert_eq!(leaves.len(), 1);
    assert_eq!(leaves[0].content.plain_body(), NO_MODULES_NOTICE);
}

#[tokio::test]
async fn test_once_paints_header_and_modules_as_text() {
    let profile = profile(
        r#"
name = "Deep Work"
description = "one task"
modules = ["alpha", "beta"]
"#,
    );
    let screen = once(profile.clone(), registry(&["alpha", "beta"])).await;

    let mut surface = BufferSurface::new(80, 20, Palette::new(profile.theme.as_deref(), &profile.color));
    surface.paint(&screen).unwrap();
    let text = surface.to_plain();

    let lines: Vec<&str> = text.lines().collect();
    assert!(lines[1].contains("MIRRORDASH"));
    assert!(lines[1].contains("Deep Work"));
    assert!(lines[3].contains("ALPHA"));
    assert!(lines[3].contains("BETA"));
    assert!(text.contains("alpha @ 0"));
}
