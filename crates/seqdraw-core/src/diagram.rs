//! Sequence diagram model: actors, interactions and their ordering.
//!
//! The [`Diagram`] is the single source of truth for a document. Canvas and
//! list views are projections recomputed from it on demand.

use crate::layout::{self, ACTOR_TOP_Y};
use kurbo::{Point, Rect};
use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Identifier of an actor. Assigned from 1 and never reused within a diagram.
pub type ActorId = u32;

/// Line style of an interaction arrow.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum LineStyle {
    #[default]
    Solid,
    Dashed,
}

impl LineStyle {
    /// All styles, in the order they are offered to the user.
    pub const ALL: [LineStyle; 2] = [LineStyle::Solid, LineStyle::Dashed];

    /// Lowercase name used in list rows and the save file.
    pub fn name(self) -> &'static str {
        match self {
            LineStyle::Solid => "solid",
            LineStyle::Dashed => "dashed",
        }
    }

    /// Returns true for dashed lines.
    pub fn is_dashed(self) -> bool {
        self == LineStyle::Dashed
    }
}

impl fmt::Display for LineStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A named participant drawn as a box on the header row.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Actor {
    /// Unique id within the diagram.
    pub id: ActorId,
    /// Display name. Never empty.
    pub name: String,
    /// Horizontal center of the actor box.
    pub x: i32,
    /// Top edge of the actor box.
    #[serde(default = "default_actor_y")]
    pub y: i32,
}

fn default_actor_y() -> i32 {
    ACTOR_TOP_Y
}

impl Actor {
    /// Bounding box of the actor on the canvas.
    pub fn bounds(&self) -> Rect {
        layout::actor_rect(self)
    }

    /// Inclusive containment test against the actor box.
    pub fn contains(&self, point: Point) -> bool {
        let b = self.bounds();
        point.x >= b.x0 && point.x <= b.x1 && point.y >= b.y0 && point.y <= b.y1
    }
}

/// A directed message between two actors.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Interaction {
    pub source_id: ActorId,
    pub target_id: ActorId,
    #[serde(default)]
    pub label: String,
    #[serde(default)]
    pub style: LineStyle,
}

impl Interaction {
    pub fn new(source_id: ActorId, target_id: ActorId, label: impl Into<String>, style: LineStyle) -> Self {
        Self {
            source_id,
            target_id,
            label: label.into(),
            style,
        }
    }
}

/// Direction of an adjacent swap in the interaction sequence.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MoveDirection {
    Up,
    Down,
}

/// Errors raised by diagram mutations.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum DiagramError {
    #[error("Actor name must not be empty")]
    EmptyActorName,
    #[error("Cannot create interaction to the same actor")]
    SelfInteraction(ActorId),
    #[error("No interaction at index {0}")]
    IndexOutOfRange(usize),
}

impl DiagramError {
    /// Validation errors reject user input; the diagram is left untouched.
    pub fn is_validation(&self) -> bool {
        matches!(self, DiagramError::EmptyActorName | DiagramError::SelfInteraction(_))
    }
}

/// Saved form of a diagram. `next_actor_id` is optional so older files load.
#[derive(Deserialize)]
struct DiagramFile {
    #[serde(default)]
    actors: Vec<Actor>,
    #[serde(default)]
    interactions: Vec<Interaction>,
    #[serde(default)]
    next_actor_id: Option<ActorId>,
}

impl From<DiagramFile> for Diagram {
    fn from(file: DiagramFile) -> Self {
        let floor = file.actors.iter().map(|a| a.id).max().unwrap_or(0) + 1;
        let next_actor_id = file.next_actor_id.unwrap_or(floor).max(floor);
        Self {
            actors: file.actors,
            interactions: file.interactions,
            next_actor_id,
        }
    }
}

/// Ordered actors and interactions of one sequence diagram.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "DiagramFile")]
pub struct Diagram {
    actors: Vec<Actor>,
    interactions: Vec<Interaction>,
    next_actor_id: ActorId,
}

impl Default for Diagram {
    fn default() -> Self {
        Self::new()
    }
}

impl Diagram {
    /// Create an empty diagram.
    pub fn new() -> Self {
        Self {
            actors: Vec::new(),
            interactions: Vec::new(),
            next_actor_id: 1,
        }
    }

    /// Actors in insertion order.
    pub fn actors(&self) -> &[Actor] {
        &self.actors
    }

    /// Interactions in sequence order.
    pub fn interactions(&self) -> &[Interaction] {
        &self.interactions
    }

    /// Id the next added actor will receive.
    pub fn next_actor_id(&self) -> ActorId {
        self.next_actor_id
    }

    pub fn interaction(&self, index: usize) -> Option<&Interaction> {
        self.interactions.get(index)
    }

    /// Look up an actor by id.
    pub fn actor(&self, id: ActorId) -> Option<&Actor> {
        self.actors.iter().find(|a| a.id == id)
    }

    /// Display name of an actor, or `id:<n>` when it does not resolve.
    pub fn actor_label(&self, id: ActorId) -> String {
        match self.actor(id) {
            Some(actor) => actor.name.clone(),
            None => format!("id:{}", id),
        }
    }

    /// Append a new actor laid out after the existing ones.
    pub fn add_actor(&mut self, name: &str) -> Result<&Actor, DiagramError> {
        if name.trim().is_empty() {
            return Err(DiagramError::EmptyActorName);
        }
        let actor = Actor {
            id: self.next_actor_id,
            name: name.to_string(),
            x: layout::actor_x_for_index(self.actors.len()),
            y: ACTOR_TOP_Y,
        };
        self.next_actor_id += 1;
        self.actors.push(actor);
        Ok(&self.actors[self.actors.len() - 1])
    }

    /// Set the horizontal center of an actor. Returns false if the id is unknown.
    pub fn set_actor_x(&mut self, id: ActorId, x: i32) -> bool {
        match self.actors.iter_mut().find(|a| a.id == id) {
            Some(actor) => {
                actor.x = x;
                true
            }
            None => false,
        }
    }

    /// Append an interaction and return its index.
    ///
    /// Endpoints are not required to resolve; only self-interactions are
    /// rejected.
    pub fn add_interaction(
        &mut self,
        source_id: ActorId,
        target_id: ActorId,
        label: &str,
        style: LineStyle,
    ) -> Result<usize, DiagramError> {
        if source_id == target_id {
            return Err(DiagramError::SelfInteraction(source_id));
        }
        self.interactions
            .push(Interaction::new(source_id, target_id, label, style));
        Ok(self.interactions.len() - 1)
    }

    /// First actor in insertion order whose box contains the point.
    pub fn find_actor_at(&self, point: Point) -> Option<&Actor> {
        self.actors.iter().find(|a| a.contains(point))
    }

    /// Swap an interaction with its neighbour. Returns the new index, or
    /// `None` at the boundaries and for out-of-range indices.
    pub fn move_interaction(&mut self, index: usize, direction: MoveDirection) -> Option<usize> {
        if index >= self.interactions.len() {
            return None;
        }
        let other = match direction {
            MoveDirection::Up => index.checked_sub(1)?,
            MoveDirection::Down => {
                let next = index + 1;
                if next >= self.interactions.len() {
                    return None;
                }
                next
            }
        };
        self.interactions.swap(index, other);
        Some(other)
    }

    /// Remove an interaction. Out-of-range indices are ignored.
    pub fn delete_interaction(&mut self, index: usize) -> Option<Interaction> {
        if index < self.interactions.len() {
            Some(self.interactions.remove(index))
        } else {
            None
        }
    }

    pub fn update_interaction_label(&mut self, index: usize, label: &str) -> Result<(), DiagramError> {
        let interaction = self
            .interactions
            .get_mut(index)
            .ok_or(DiagramError::IndexOutOfRange(index))?;
        interaction.label = label.to_string();
        Ok(())
    }

    pub fn update_interaction_style(&mut self, index: usize, style: LineStyle) -> Result<(), DiagramError> {
        let interaction = self
            .interactions
            .get_mut(index)
            .ok_or(DiagramError::IndexOutOfRange(index))?;
        interaction.style = style;
        Ok(())
    }

    /// Serialize to pretty JSON.
    pub fn to_json(&self) -> Result<String, serde_json::Error> {
        serde_json::to_string_pretty(self)
    }

    /// Deserialize from JSON, resuming id assignment above the highest id.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn two_actors() -> Diagram {
        let mut diagram = Diagram::new();
        diagram.add_actor("Alice").unwrap();
        diagram.add_actor("Bob").unwrap();
        diagram
    }

    #[test]
    fn test_add_actor_assigns_ids_and_positions() {
        let diagram = two_actors();
        let alice = &diagram.actors()[0];
        let bob = &diagram.actors()[1];
        assert_eq!((alice.id, alice.x, alice.y), (1, 100, 20));
        assert_eq!((bob.id, bob.x, bob.y), (2, 260, 20));
        assert_eq!(diagram.next_actor_id(), 3);
    }

    #[test]
    fn test_actor_spacing() {
        let mut diagram = Diagram::new();
        for name in ["A", "B", "C", "D"] {
            diagram.add_actor(name).unwrap();
        }
        let xs: Vec<i32> = diagram.actors().iter().map(|a| a.x).collect();
        assert_eq!(xs, vec![100, 260, 420, 580]);
        assert!(diagram.actors().windows(2).all(|w| w[0].id < w[1].id));
    }

    #[test]
    fn test_add_actor_rejects_blank_name() {
        let mut diagram = Diagram::new();
        assert_eq!(diagram.add_actor("   ").unwrap_err(), DiagramError::EmptyActorName);
        assert!(diagram.actors().is_empty());
        assert_eq!(diagram.next_actor_id(), 1);
    }

    #[test]
    fn test_add_actor_keeps_name_as_typed() {
        let mut diagram = Diagram::new();
        let actor = diagram.add_actor("  Carol ").unwrap();
        assert_eq!(actor.name, "  Carol ");
    }

    #[test]
    fn test_self_interaction_rejected() {
        let mut diagram = two_actors();
        let err = diagram.add_interaction(1, 1, "x", LineStyle::Solid).unwrap_err();
        assert_eq!(err, DiagramError::SelfInteraction(1));
        assert!(err.is_validation());
        assert!(diagram.interactions().is_empty());
    }

    #[test]
    fn test_add_interaction_appends() {
        let mut diagram = two_actors();
        assert_eq!(diagram.add_interaction(1, 2, "hello", LineStyle::Solid), Ok(0));
        assert_eq!(diagram.add_interaction(2, 1, "", LineStyle::Dashed), Ok(1));
        assert_eq!(diagram.interactions()[1].style, LineStyle::Dashed);
    }

    #[test]
    fn test_add_interaction_allows_unknown_endpoints() {
        let mut diagram = two_actors();
        assert_eq!(diagram.add_interaction(1, 42, "", LineStyle::Solid), Ok(0));
        assert_eq!(diagram.actor_label(42), "id:42");
    }

    #[test]
    fn test_find_actor_at_inclusive_bounds() {
        let diagram = two_actors();
        // Alice box spans x 40..=160, y 20..=60
        assert_eq!(diagram.find_actor_at(Point::new(40.0, 20.0)).map(|a| a.id), Some(1));
        assert_eq!(diagram.find_actor_at(Point::new(160.0, 60.0)).map(|a| a.id), Some(1));
        assert!(diagram.find_actor_at(Point::new(170.0, 40.0)).is_none());
        assert!(diagram.find_actor_at(Point::new(100.0, 61.0)).is_none());
        assert_eq!(diagram.find_actor_at(Point::new(260.0, 40.0)).map(|a| a.id), Some(2));
    }

    #[test]
    fn test_find_actor_at_prefers_first_inserted() {
        let mut diagram = two_actors();
        diagram.set_actor_x(2, 100);
        assert_eq!(diagram.find_actor_at(Point::new(100.0, 30.0)).map(|a| a.id), Some(1));
    }

    #[test]
    fn test_move_interaction_swaps_neighbours() {
        let mut diagram = two_actors();
        for label in ["a", "b", "c"] {
            diagram.add_interaction(1, 2, label, LineStyle::Solid).unwrap();
        }
        assert_eq!(diagram.move_interaction(0, MoveDirection::Down), Some(1));
        let labels: Vec<&str> = diagram.interactions().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "a", "c"]);

        assert_eq!(diagram.move_interaction(2, MoveDirection::Up), Some(1));
        let labels: Vec<&str> = diagram.interactions().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["b", "c", "a"]);
    }

    #[test]
    fn test_move_interaction_boundaries_are_noops() {
        let mut diagram = two_actors();
        diagram.add_interaction(1, 2, "only", LineStyle::Solid).unwrap();
        let before = diagram.clone();
        assert_eq!(diagram.move_interaction(0, MoveDirection::Down), None);
        assert_eq!(diagram.move_interaction(0, MoveDirection::Up), None);
        assert_eq!(diagram.move_interaction(5, MoveDirection::Up), None);
        assert_eq!(diagram, before);
    }

    #[test]
    fn test_delete_interaction_shifts_later_items() {
        let mut diagram = two_actors();
        for label in ["a", "b", "c", "d"] {
            diagram.add_interaction(1, 2, label, LineStyle::Solid).unwrap();
        }
        let removed = diagram.delete_interaction(1).unwrap();
        assert_eq!(removed.label, "b");
        let labels: Vec<&str> = diagram.interactions().iter().map(|i| i.label.as_str()).collect();
        assert_eq!(labels, vec!["a", "c", "d"]);
        assert!(diagram.delete_interaction(10).is_none());
        assert_eq!(diagram.interactions().len(), 3);
    }

    #[test]
    fn test_update_label_and_style_in_place() {
        let mut diagram = two_actors();
        diagram.add_interaction(1, 2, "a", LineStyle::Solid).unwrap();
        diagram.add_interaction(2, 1, "b", LineStyle::Solid).unwrap();

        diagram.update_interaction_label(1, "reply").unwrap();
        diagram.update_interaction_style(1, LineStyle::Dashed).unwrap();
        assert_eq!(diagram.interactions()[1].label, "reply");
        assert_eq!(diagram.interactions()[1].style, LineStyle::Dashed);
        assert_eq!(diagram.interactions()[0].label, "a");

        assert_eq!(
            diagram.update_interaction_label(7, "x"),
            Err(DiagramError::IndexOutOfRange(7))
        );
        assert!(!DiagramError::IndexOutOfRange(7).is_validation());
    }

    #[test]
    fn test_json_round_trip() {
        let mut diagram = two_actors();
        diagram.add_interaction(1, 2, "hello", LineStyle::Solid).unwrap();
        diagram.add_interaction(2, 1, "ok", LineStyle::Dashed).unwrap();

        let json = diagram.to_json().unwrap();
        assert!(json.contains("\"next_actor_id\": 3"));
        assert!(json.contains("\"dashed\""));

        let mut loaded = Diagram::from_json(&json).unwrap();
        assert_eq!(loaded, diagram);
        assert_eq!(loaded.add_actor("Carol").unwrap().id, 3);
    }

    #[test]
    fn test_load_without_next_id_resumes_above_max() {
        let json = r#"{
            "actors": [
                {"id": 4, "name": "A", "x": 100, "y": 20},
                {"id": 9, "name": "B", "x": 260, "y": 20}
            ],
            "interactions": [{"source_id": 4, "target_id": 9, "label": "hi", "style": "solid"}]
        }"#;
        let mut diagram = Diagram::from_json(json).unwrap();
        assert_eq!(diagram.next_actor_id(), 10);
        assert_eq!(diagram.add_actor("C").unwrap().id, 10);
    }

    #[test]
    fn test_load_never_reuses_ids() {
        let json = r#"{
            "actors": [{"id": 5, "name": "A", "x": 100, "y": 20}],
            "interactions": [],
            "next_actor_id": 2
        }"#;
        let diagram = Diagram::from_json(json).unwrap();
        assert_eq!(diagram.next_actor_id(), 6);
    }

    #[test]
    fn test_load_defaults_missing_fields() {
        let json = r#"{
            "actors": [{"id": 1, "name": "A", "x": 100}],
            "interactions": [{"source_id": 1, "target_id": 2}]
        }"#;
        let diagram = Diagram::from_json(json).unwrap();
        assert_eq!(diagram.actors()[0].y, ACTOR_TOP_Y);
        assert_eq!(diagram.interactions()[0].label, "");
        assert_eq!(diagram.interactions()[0].style, LineStyle::Solid);
    }

    #[test]
    fn test_load_rejects_malformed() {
        assert!(Diagram::from_json("{\"actors\": 3}").is_err());
        assert!(Diagram::from_json("not json").is_err());
    }
}
