//! The level aggregate: ordered blocks, depth bounds, panels, display scale

use brawler_token::Token;
use uuid::Uuid;

use crate::geometry;
use crate::thing::Thing;
use crate::{Block, LoadError};

/// Lower clamp for the display scale; zero would make the inverse transform
/// produce infinite coordinates.
pub const MIN_SCALE: f64 = 0.01;
/// Upper clamp for the display scale (the editor's scale slider range).
pub const MAX_SCALE: f64 = 2.0;

/// The aggregate root owning every block and, through them, every thing.
///
/// Block order defines the world x axis: each enabled block's range starts
/// where the previous enabled block's ends. The display scale and the
/// revision counter are session state - neither persists, and the revision
/// bumps on every mutation so collaborators holding stale query results can
/// detect it.
#[derive(Debug, Clone)]
pub struct Level {
    scale: f64,
    min_z: i32,
    max_z: i32,
    background: Option<String>,
    front_panels: Vec<String>,
    back_panels: Vec<String>,
    back_panel_order: Vec<usize>,
    blocks: Vec<Block>,
    revision: u64,
}

impl Default for Level {
    fn default() -> Self {
        Self {
            scale: 1.0,
            min_z: 0,
            max_z: 0,
            background: None,
            front_panels: Vec::new(),
            back_panels: Vec::new(),
            back_panel_order: Vec::new(),
            blocks: Vec::new(),
            revision: 0,
        }
    }
}

// Scale and revision are view/session state; equivalence covers what a save
// file reproduces.
impl PartialEq for Level {
    fn eq(&self, other: &Self) -> bool {
        self.min_z == other.min_z
            && self.max_z == other.max_z
            && self.background == other.background
            && self.front_panels == other.front_panels
            && self.back_panels == other.back_panels
            && self.back_panel_order == other.back_panel_order
            && self.blocks == other.blocks
    }
}

impl Level {
    pub fn new() -> Self {
        Self::default()
    }

    fn mark_changed(&mut self) {
        self.revision += 1;
    }

    /// Monotonic change counter; compare against a remembered value to see
    /// whether queries made earlier are stale.
    pub fn revision(&self) -> u64 {
        self.revision
    }

    pub fn scale(&self) -> f64 {
        self.scale
    }

    /// Set the pixels-per-world-unit factor, clamped to a positive range
    pub fn set_scale(&mut self, scale: f64) {
        self.scale = scale.clamp(MIN_SCALE, MAX_SCALE);
        self.mark_changed();
    }

    pub fn min_z(&self) -> i32 {
        self.min_z
    }

    pub fn set_min_z(&mut self, min_z: i32) {
        self.min_z = min_z;
        self.mark_changed();
    }

    pub fn max_z(&self) -> i32 {
        self.max_z
    }

    pub fn set_max_z(&mut self, max_z: i32) {
        self.max_z = max_z;
        self.mark_changed();
    }

    pub fn background(&self) -> Option<&str> {
        self.background.as_deref()
    }

    pub fn set_background(&mut self, background: Option<String>) {
        self.background = background;
        self.mark_changed();
    }

    pub fn front_panels(&self) -> &[String] {
        &self.front_panels
    }

    pub fn add_front_panel(&mut self, path: impl Into<String>) {
        self.front_panels.push(path.into());
        self.mark_changed();
    }

    pub fn remove_front_panel(&mut self, path: &str) -> bool {
        let before = self.front_panels.len();
        self.front_panels.retain(|p| p != path);
        let removed = self.front_panels.len() != before;
        if removed {
            self.mark_changed();
        }
        removed
    }

    pub fn back_panels(&self) -> &[String] {
        &self.back_panels
    }

    /// Register a back panel; its registry index is the handle the render
    /// order refers to.
    pub fn add_back_panel(&mut self, path: impl Into<String>) -> usize {
        self.back_panels.push(path.into());
        self.mark_changed();
        self.back_panels.len() - 1
    }

    /// Unregister a back panel. Order entries pointing at it are dropped and
    /// entries past it shift down to follow the reindexed registry.
    pub fn remove_back_panel(&mut self, index: usize) -> Option<String> {
        if index >= self.back_panels.len() {
            return None;
        }
        let removed = self.back_panels.remove(index);
        self.back_panel_order.retain(|&i| i != index);
        for entry in &mut self.back_panel_order {
            if *entry > index {
                *entry -= 1;
            }
        }
        self.mark_changed();
        Some(removed)
    }

    pub fn back_panel_name(&self, index: usize) -> Option<&str> {
        self.back_panels.get(index).map(String::as_str)
    }

    pub fn back_panel_order(&self) -> &[usize] {
        &self.back_panel_order
    }

    /// Replace the back panel render order; every entry must index a
    /// registered panel.
    pub fn set_back_panel_order(&mut self, order: Vec<usize>) -> Result<(), LoadError> {
        if let Some(&bad) = order.iter().find(|&&i| i >= self.back_panels.len()) {
            return Err(LoadError::BadPanelOrder {
                index: bad as i64,
                count: self.back_panels.len(),
            });
        }
        self.back_panel_order = order;
        self.mark_changed();
        Ok(())
    }

    pub fn blocks(&self) -> &[Block] {
        &self.blocks
    }

    pub fn block(&self, index: usize) -> Option<&Block> {
        self.blocks.get(index)
    }

    pub fn block_mut(&mut self, index: usize) -> Option<&mut Block> {
        self.mark_changed();
        self.blocks.get_mut(index)
    }

    pub fn add_block(&mut self, block: Block) {
        self.blocks.push(block);
        self.mark_changed();
    }

    /// Remove a block; its things go with it.
    pub fn remove_block(&mut self, index: usize) -> Option<Block> {
        if index >= self.blocks.len() {
            return None;
        }
        self.mark_changed();
        Some(self.blocks.remove(index))
    }

    /// Combined length of the enabled blocks - the extent of the world axis
    pub fn total_length(&self) -> i32 {
        self.blocks
            .iter()
            .filter(|b| b.enabled)
            .map(Block::length)
            .sum()
    }

    /// Scaled width of the visible world, for the view's preferred size
    pub fn pixel_width(&self) -> i32 {
        geometry::world_to_pixel(self.total_length(), self.scale)
    }

    /// Scaled height of the playable depth band
    pub fn pixel_height(&self) -> i32 {
        geometry::world_to_pixel((self.max_z - self.min_z).max(0), self.scale)
    }

    /// Which block currently holds this thing? Ownership runs strictly
    /// downward, so this is a scan, not a stored back-pointer.
    pub fn find_owning_block(&self, id: Uuid) -> Option<usize> {
        self.blocks.iter().position(|b| b.has_thing(id))
    }

    pub fn find_thing(&self, id: Uuid) -> Option<&Thing> {
        self.blocks.iter().find_map(|b| b.find_thing(id))
    }

    pub fn find_thing_mut(&mut self, id: Uuid) -> Option<&mut Thing> {
        self.mark_changed();
        self.blocks.iter_mut().find_map(|b| b.find_thing_mut(id))
    }

    /// Move a thing to a world-space target position.
    ///
    /// The target is translated into coordinates local to the thing's
    /// current owning block. Coordinates outside `0..length` are kept as-is
    /// and the thing stays owned by that block - crossing a boundary needs
    /// an explicit remove/add. Returns false when the thing is unknown or
    /// its block is disabled (no valid world mapping).
    pub fn move_thing(&mut self, id: Uuid, world_x: i32, world_y: i32) -> bool {
        let Some(index) = self.find_owning_block(id) else {
            return false;
        };
        let Some(start) = geometry::block_world_start(self, index) else {
            return false;
        };
        if let Some(thing) = self.blocks[index].find_thing_mut(id) {
            thing.set_position(world_x - start, world_y);
            self.mark_changed();
            true
        } else {
            false
        }
    }

    /// Mark a thing selected and highlight its owning block, clearing any
    /// previous selection. Returns false for an unknown id.
    pub fn select_thing(&mut self, id: Uuid) -> bool {
        let Some(index) = self.find_owning_block(id) else {
            return false;
        };
        self.clear_flags();
        self.blocks[index].highlight = true;
        if let Some(thing) = self.blocks[index].find_thing_mut(id) {
            thing.selected = true;
        }
        self.mark_changed();
        true
    }

    pub fn clear_selection(&mut self) {
        self.clear_flags();
        self.mark_changed();
    }

    fn clear_flags(&mut self) {
        for block in &mut self.blocks {
            block.highlight = false;
            for thing in block.things_mut() {
                thing.selected = false;
            }
        }
    }

    /// Build a level from a `level` token tree.
    ///
    /// The whole replacement model is validated and constructed before this
    /// returns; on any error the caller's existing level is untouched.
    pub fn from_token(token: &Token) -> Result<Self, LoadError> {
        if token.name != "level" {
            return Err(LoadError::WrongHead {
                expected: "level",
                found: token.name.clone(),
            });
        }

        let mut level = Level::new();
        for child in &token.children {
            match child.name.as_str() {
                "min-z" => {
                    level.min_z = child.read_int(0).map_err(|source| LoadError::BadValue {
                        node: "level",
                        source,
                    })? as i32;
                }
                "max-z" => {
                    level.max_z = child.read_int(0).map_err(|source| LoadError::BadValue {
                        node: "level",
                        source,
                    })? as i32;
                }
                "background" => {
                    let path = child.read_str(0).map_err(|source| LoadError::BadValue {
                        node: "level",
                        source,
                    })?;
                    level.background = Some(path.to_string());
                }
                "front-panel" => {
                    let path = child.read_str(0).map_err(|source| LoadError::BadValue {
                        node: "level",
                        source,
                    })?;
                    level.front_panels.push(path.to_string());
                }
                "panel" => {
                    let path = child.read_str(0).map_err(|source| LoadError::BadValue {
                        node: "level",
                        source,
                    })?;
                    level.back_panels.push(path.to_string());
                }
                "order" => {
                    for index in 0..child.children.len() {
                        let entry =
                            child.read_int(index).map_err(|source| LoadError::BadValue {
                                node: "level",
                                source,
                            })?;
                        if entry < 0 {
                            return Err(LoadError::BadPanelOrder {
                                index: entry,
                                count: level.back_panels.len(),
                            });
                        }
                        level.back_panel_order.push(entry as usize);
                    }
                }
                "block" => level.blocks.push(Block::from_token(child)?),
                other => {
                    return Err(LoadError::UnknownType {
                        name: other.to_string(),
                        context: "level",
                    })
                }
            }
        }

        if let Some(&bad) = level
            .back_panel_order
            .iter()
            .find(|&&i| i >= level.back_panels.len())
        {
            return Err(LoadError::BadPanelOrder {
                index: bad as i64,
                count: level.back_panels.len(),
            });
        }

        level.revision = 0;
        Ok(level)
    }

    /// Serialize the whole level. Always succeeds for a structurally valid
    /// model; a panic here means an invariant was broken upstream.
    pub fn to_token(&self) -> Token {
        let mut token = Token::new("level");
        token.push_group("min-z", [self.min_z.to_string()]);
        token.push_group("max-z", [self.max_z.to_string()]);
        if let Some(background) = &self.background {
            token.push_group("background", [background.as_str()]);
        }
        for panel in &self.front_panels {
            token.push_group("front-panel", [panel.as_str()]);
        }
        for panel in &self.back_panels {
            token.push_group("panel", [panel.as_str()]);
        }
        if !self.back_panel_order.is_empty() {
            token.push_group(
                "order",
                self.back_panel_order.iter().map(ToString::to_string),
            );
        }
        for block in &self.blocks {
            token.push(block.to_token());
        }
        token
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::ThingKind;
    use brawler_token::{parse_all, writer};

    fn sample_level() -> Level {
        let mut level = Level::new();
        level.set_min_z(160);
        level.set_max_z(230);
        level.set_background(Some("data/bgs/street.png".to_string()));
        level.add_front_panel("data/panels/rail.png");
        level.add_back_panel("data/panels/wall-a.png");
        level.add_back_panel("data/panels/wall-b.png");
        level.set_back_panel_order(vec![0, 1, 0]).unwrap();

        let mut first = Block::new(100);
        first.add_thing(Thing::new_character(40, 180, "data/chars/billy/billy.txt"));
        level.add_block(first);
        let mut second = Block::new(50);
        second.add_thing(Thing::new_item(10, 200, "data/misc/apple/apple.txt"));
        level.add_block(second);
        level
    }

    #[test]
    fn test_save_load_round_trip() {
        let level = sample_level();
        let text = writer::write_pretty(&level.to_token());
        let tokens = parse_all(&text).unwrap();
        let reloaded = Level::from_token(&tokens[0]).unwrap();
        assert_eq!(reloaded, level);
    }

    #[test]
    fn test_round_trip_keeps_disabled_blocks() {
        let mut level = sample_level();
        level.block_mut(0).unwrap().enabled = false;
        let reloaded = Level::from_token(&level.to_token()).unwrap();
        assert_eq!(reloaded, level);
        assert!(!reloaded.blocks()[0].enabled);
    }

    #[test]
    fn test_save_is_deterministic() {
        let level = sample_level();
        assert_eq!(level.to_token(), level.to_token());
    }

    #[test]
    fn test_unknown_level_field_fails_load() {
        let tokens = parse_all("(level (min-z 0) (weather rain))").unwrap();
        let err = Level::from_token(&tokens[0]).unwrap_err();
        assert_eq!(
            err,
            LoadError::UnknownType {
                name: "weather".to_string(),
                context: "level"
            }
        );
    }

    #[test]
    fn test_wrong_head_fails_load() {
        let tokens = parse_all("(world (min-z 0))").unwrap();
        let err = Level::from_token(&tokens[0]).unwrap_err();
        assert_eq!(
            err,
            LoadError::WrongHead {
                expected: "level",
                found: "world".to_string()
            }
        );
    }

    #[test]
    fn test_order_must_reference_registered_panels() {
        let tokens = parse_all("(level (panel a.png) (order 0 1))").unwrap();
        let err = Level::from_token(&tokens[0]).unwrap_err();
        assert_eq!(err, LoadError::BadPanelOrder { index: 1, count: 1 });
    }

    #[test]
    fn test_remove_back_panel_fixes_up_order() {
        let mut level = Level::new();
        level.add_back_panel("a.png");
        level.add_back_panel("b.png");
        level.add_back_panel("c.png");
        level.set_back_panel_order(vec![2, 0, 1, 2]).unwrap();

        assert_eq!(level.remove_back_panel(1).as_deref(), Some("b.png"));
        assert_eq!(level.back_panels(), ["a.png", "c.png"]);
        assert_eq!(level.back_panel_order(), [1, 0, 1]);
        assert_eq!(level.back_panel_name(1), Some("c.png"));
    }

    #[test]
    fn test_total_length_skips_disabled_blocks() {
        let mut level = sample_level();
        assert_eq!(level.total_length(), 150);
        level.block_mut(0).unwrap().enabled = false;
        assert_eq!(level.total_length(), 50);
    }

    #[test]
    fn test_scale_clamps_to_positive_range() {
        let mut level = Level::new();
        level.set_scale(0.0);
        assert_eq!(level.scale(), MIN_SCALE);
        level.set_scale(5.0);
        assert_eq!(level.scale(), MAX_SCALE);
        level.set_scale(1.5);
        assert_eq!(level.scale(), 1.5);
    }

    #[test]
    fn test_find_owning_block_is_a_weak_lookup() {
        let level = sample_level();
        let id = level.blocks()[1].things()[0].id;
        assert_eq!(level.find_owning_block(id), Some(1));
        assert!(level.find_thing(id).is_some());
        assert_eq!(level.find_owning_block(Uuid::new_v4()), None);
    }

    #[test]
    fn test_move_thing_translates_world_to_local() {
        let mut level = sample_level();
        let id = level.blocks()[1].things()[0].id;
        // Block 1 starts at world x 100; a world target of 120 is local 20.
        assert!(level.move_thing(id, 120, 210));
        let thing = level.find_thing(id).unwrap();
        assert_eq!((thing.x, thing.y), (20, 210));
        assert_eq!(level.find_owning_block(id), Some(1));
    }

    #[test]
    fn test_move_thing_can_leave_block_range() {
        let mut level = sample_level();
        let id = level.blocks()[1].things()[0].id;
        // Dragging left of block 1's start goes negative but never reparents.
        assert!(level.move_thing(id, 60, 210));
        let thing = level.find_thing(id).unwrap();
        assert_eq!(thing.x, -40);
        assert_eq!(level.find_owning_block(id), Some(1));

        // And past its end, likewise.
        assert!(level.move_thing(id, 400, 210));
        assert_eq!(level.find_thing(id).unwrap().x, 300);
        assert_eq!(level.find_owning_block(id), Some(1));
    }

    #[test]
    fn test_move_thing_in_disabled_block_is_rejected() {
        let mut level = sample_level();
        let id = level.blocks()[1].things()[0].id;
        level.block_mut(1).unwrap().enabled = false;
        assert!(!level.move_thing(id, 120, 210));
    }

    #[test]
    fn test_select_thing_highlights_owning_block() {
        let mut level = sample_level();
        let first = level.blocks()[0].things()[0].id;
        let second = level.blocks()[1].things()[0].id;

        assert!(level.select_thing(first));
        assert!(level.blocks()[0].highlight);
        assert!(level.find_thing(first).unwrap().selected);

        assert!(level.select_thing(second));
        assert!(!level.blocks()[0].highlight);
        assert!(!level.find_thing(first).unwrap().selected);
        assert!(level.blocks()[1].highlight);

        level.clear_selection();
        assert!(!level.blocks()[1].highlight);
        assert!(!level.find_thing(second).unwrap().selected);
    }

    #[test]
    fn test_revision_bumps_on_mutation() {
        let mut level = Level::new();
        let r0 = level.revision();
        level.add_block(Block::new(10));
        assert!(level.revision() > r0);
        let r1 = level.revision();
        level.set_scale(1.2);
        assert!(level.revision() > r1);
    }

    #[test]
    fn test_loaded_character_payload() {
        let source = "(level (block (length 100) \
                      (character (name Billy) (coords 10 20 0) (health 85) (path b.txt))))";
        let tokens = parse_all(source).unwrap();
        let level = Level::from_token(&tokens[0]).unwrap();
        let thing = &level.blocks()[0].things()[0];
        assert_eq!(
            thing.kind,
            ThingKind::Character {
                name: "Billy".to_string(),
                health: 85
            }
        );
    }
}
