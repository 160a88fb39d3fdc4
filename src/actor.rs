//! Actor description templating.
//!
//! Turns a generic actor markup fragment into a concrete, uniquely named
//! scene-graph fragment: identity and pose are written into the tree, the
//! pedestrian social-force-model plugin is pointed at the new obstacle, and
//! the waypoint placeholder is expanded into the obstacle's trajectory.

use thiserror::Error;
use xmltree::{Element, EmitterConfig, XMLNode};

use crate::shared::{Pose, Waypoint};

/// Filename attribute identifying the pedestrian social-force-model plugin.
pub const SFM_PLUGIN_FILENAME: &str = "libPedestrianSFMPlugin.so";

/// Placeholder token marking where waypoint fragments are injected.
pub const WAYPOINTS_TOKEN: &str = "__waypoints__";

#[derive(Debug, Error)]
pub enum TemplateError {
    #[error("malformed actor markup: {0}")]
    Malformed(#[from] xmltree::ParseError),
    #[error("template does not contain an actor element")]
    MissingActor,
    #[error("template contains more than one actor element")]
    DuplicateActor,
    #[error("actor element has no pose child")]
    MissingPose,
    #[error("actor element has more than one pose child")]
    DuplicatePose,
    #[error("actor element has no pedestrian SFM plugin child")]
    MissingPlugin,
    #[error("actor element has more than one pedestrian SFM plugin child")]
    DuplicatePlugin,
    #[error("template does not contain the waypoint placeholder")]
    MissingWaypointToken,
    #[error("template contains the waypoint placeholder more than once")]
    DuplicateWaypointToken,
    #[error("failed to serialize actor markup: {0}")]
    Serialize(#[from] xmltree::Error),
}

/// Fills an actor template with identity, pose and a waypoint trajectory.
///
/// Pure: nothing outside the returned string is touched, and the same
/// inputs always produce a semantically identical descriptor (attribute
/// order within an element is unspecified). Fails before any backend
/// interaction if the template does not have the required shape (exactly
/// one actor element, one pose child, one matching plugin child, one
/// waypoint placeholder).
///
/// Obstacles are planar, surface-bound entities: the pose is written as
/// `"x y 0 0 0 theta"` with elevation, roll and pitch held at zero.
pub fn fill_actor(
    template: &str,
    name: &str,
    pose: Pose,
    waypoints: &[Waypoint],
) -> Result<String, TemplateError> {
    let mut doc = Element::parse(template.as_bytes())?;

    match count_named(&doc, "actor") {
        0 => return Err(TemplateError::MissingActor),
        1 => {}
        _ => return Err(TemplateError::DuplicateActor),
    }
    let actor = if doc.name == "actor" {
        &mut doc
    } else {
        find_named_mut(&mut doc, "actor").expect("counted one actor element")
    };
    actor
        .attributes
        .insert("name".to_string(), name.to_string());

    match direct_children(actor, |el| el.name == "pose") {
        0 => return Err(TemplateError::MissingPose),
        1 => {}
        _ => return Err(TemplateError::DuplicatePose),
    }
    let pose_el = actor.get_mut_child("pose").expect("counted one pose child");
    set_text(pose_el, format!("{} {} 0 0 0 {}", pose.x, pose.y, pose.theta));

    match direct_children(actor, is_sfm_plugin) {
        0 => return Err(TemplateError::MissingPlugin),
        1 => {}
        _ => return Err(TemplateError::DuplicatePlugin),
    }
    let plugin = actor
        .children
        .iter_mut()
        .find_map(|node| match node {
            XMLNode::Element(el) if is_sfm_plugin(el) => Some(el),
            _ => None,
        })
        .expect("counted one matching plugin child");
    plugin
        .children
        .push(XMLNode::Element(model_group(name)));
    plugin
        .attributes
        .insert("name".to_string(), format!("{name}_sfm_plugin"));

    let mut out = Vec::new();
    doc.write_with_config(
        &mut out,
        EmitterConfig::new().write_document_declaration(true),
    )?;
    let markup = String::from_utf8(out).expect("xml emitter produces utf-8");

    match markup.matches(WAYPOINTS_TOKEN).count() {
        0 => return Err(TemplateError::MissingWaypointToken),
        1 => {}
        _ => return Err(TemplateError::DuplicateWaypointToken),
    }
    let trajectory: String = waypoints
        .iter()
        .map(|w| format!("<waypoint>{} {} {}</waypoint>", w.x, w.y, w.theta))
        .collect();
    Ok(markup.replace(WAYPOINTS_TOKEN, &trajectory))
}

fn is_sfm_plugin(el: &Element) -> bool {
    el.name == "plugin"
        && el.attributes.get("filename").map(String::as_str) == Some(SFM_PLUGIN_FILENAME)
}

/// `<group><model>{name}</model></group>`, built as tree nodes so the name
/// never passes through a second parse.
fn model_group(name: &str) -> Element {
    let mut model = Element::new("model");
    model.children.push(XMLNode::Text(name.to_string()));
    let mut group = Element::new("group");
    group.children.push(XMLNode::Element(model));
    group
}

fn set_text(el: &mut Element, text: String) {
    el.children
        .retain(|node| !matches!(node, XMLNode::Text(_) | XMLNode::CData(_)));
    el.children.push(XMLNode::Text(text));
}

fn count_named(el: &Element, name: &str) -> usize {
    let mut count = usize::from(el.name == name);
    for node in &el.children {
        if let XMLNode::Element(child) = node {
            count += count_named(child, name);
        }
    }
    count
}

fn find_named_mut<'a>(el: &'a mut Element, name: &str) -> Option<&'a mut Element> {
    for node in el.children.iter_mut() {
        if let XMLNode::Element(child) = node {
            if child.name == name {
                return Some(child);
            }
            if let Some(found) = find_named_mut(child, name) {
                return Some(found);
            }
        }
    }
    None
}

fn direct_children(el: &Element, pred: impl Fn(&Element) -> bool) -> usize {
    el.children
        .iter()
        .filter(|node| matches!(node, XMLNode::Element(child) if pred(child)))
        .count()
}
