//! The editing session: one level, one file, one user
//!
//! This module owns what the UI shell manipulates between repaints - the
//! current level, its file path, the dirty flag, the selection, and drag
//! state. All mutation is caller-synchronous; a change is visible to the
//! next query immediately.

mod file;

pub use file::*;

use std::path::{Path, PathBuf};

use brawler_core::{geometry, Block, Level, Thing};
use log::info;
use uuid::Uuid;

use crate::registry::Template;

/// World-space bookkeeping for a drag in progress: where the thing was and
/// where it was grabbed, so the thing tracks the pointer without snapping
/// its origin to it.
#[derive(Debug, Clone, Copy)]
pub struct DragState {
    thing: Uuid,
    start_x: i32,
    start_y: i32,
    grab_x: i32,
    grab_y: i32,
}

/// An open level plus its editing state
#[derive(Debug, Default)]
pub struct Session {
    level: Level,
    path: Option<PathBuf>,
    dirty: bool,
    selection: Option<Uuid>,
}

impl Session {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn level(&self) -> &Level {
        &self.level
    }

    /// Mutable access to the level; the session assumes a change follows.
    pub fn level_mut(&mut self) -> &mut Level {
        self.dirty = true;
        &mut self.level
    }

    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    pub fn is_dirty(&self) -> bool {
        self.dirty
    }

    pub fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    /// Display name: the file stem, or "untitled" before the first save
    pub fn name(&self) -> String {
        self.path
            .as_ref()
            .and_then(|p| p.file_stem())
            .and_then(|s| s.to_str())
            .map(|s| s.to_string())
            .unwrap_or_else(|| "untitled".to_string())
    }

    /// Replace the session's level with the one stored at `path`.
    ///
    /// The replacement is parsed and built completely before anything is
    /// swapped in, so a failed open leaves the current level, path and
    /// selection exactly as they were.
    pub fn open(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        let path = path.into();
        let level = load_level(&path)?;
        info!(
            "opened {} ({} blocks, {} world units)",
            path.display(),
            level.blocks().len(),
            level.total_length()
        );
        self.level = level;
        self.path = Some(path);
        self.dirty = false;
        self.selection = None;
        Ok(())
    }

    /// Write the level back to the file it came from
    pub fn save(&mut self) -> Result<(), SessionError> {
        let path = self.path.clone().ok_or(SessionError::NoPath)?;
        save_level(&self.level, &path)?;
        info!("saved {}", path.display());
        self.dirty = false;
        Ok(())
    }

    /// Write the level to a new file, which becomes the session's file
    pub fn save_as(&mut self, path: impl Into<PathBuf>) -> Result<(), SessionError> {
        self.path = Some(path.into());
        self.save()
    }

    /// Append an empty block of the given length
    pub fn add_block(&mut self, length: i32) {
        self.level.add_block(Block::new(length));
        self.dirty = true;
    }

    /// Remove a block and everything in it
    pub fn remove_block(&mut self, index: usize) -> Option<Block> {
        let removed = self.level.remove_block(index)?;
        if let Some(id) = self.selection {
            if removed.has_thing(id) {
                self.selection = None;
            }
        }
        self.dirty = true;
        Some(removed)
    }

    /// Instantiate a template at a pixel position.
    ///
    /// The position must fall inside an enabled block; the new thing gets
    /// block-local coordinates there, with the template's placement
    /// defaults filled in.
    pub fn place_thing(
        &mut self,
        template: &Template,
        pixel_x: i32,
        pixel_y: i32,
    ) -> Result<Uuid, SessionError> {
        let hit = geometry::block_at_pixel(&self.level, pixel_x)
            .ok_or(SessionError::OutsideBlocks(pixel_x))?;
        let y = geometry::pixel_to_world(pixel_y, self.level.scale());
        let thing = template.spawn(hit.local_x, y);
        let id = thing.id;
        if let Some(block) = self.level.block_mut(hit.index) {
            block.add_thing(thing);
        }
        self.dirty = true;
        Ok(id)
    }

    pub fn selection(&self) -> Option<Uuid> {
        self.selection
    }

    pub fn selected_thing(&self) -> Option<&Thing> {
        self.level.find_thing(self.selection?)
    }

    /// Select whatever is under the pointer, clearing any previous
    /// selection; empty space deselects.
    pub fn select_at(&mut self, pixel_x: i32, pixel_y: i32) -> Option<Uuid> {
        match geometry::thing_at_pixel(&self.level, pixel_x, pixel_y) {
            Some(hit) => {
                self.level.select_thing(hit.thing);
                self.selection = Some(hit.thing);
                Some(hit.thing)
            }
            None => {
                self.level.clear_selection();
                self.selection = None;
                None
            }
        }
    }

    /// Delete the selected thing from its owning block
    pub fn delete_selected(&mut self) -> bool {
        let Some(id) = self.selection.take() else {
            return false;
        };
        let Some(index) = self.level.find_owning_block(id) else {
            return false;
        };
        if let Some(block) = self.level.block_mut(index) {
            block.remove_thing(id);
        }
        self.dirty = true;
        true
    }

    /// Capture drag-start state for the current selection. `None` when
    /// nothing is selected or the selection sits in a disabled block.
    pub fn begin_drag(&self, pixel_x: i32, pixel_y: i32) -> Option<DragState> {
        let id = self.selection?;
        let index = self.level.find_owning_block(id)?;
        let start = geometry::block_world_start(&self.level, index)?;
        let thing = self.level.find_thing(id)?;
        let scale = self.level.scale();
        Some(DragState {
            thing: id,
            start_x: start + thing.x,
            start_y: thing.y,
            grab_x: geometry::pixel_to_world(pixel_x, scale),
            grab_y: geometry::pixel_to_world(pixel_y, scale),
        })
    }

    /// Track the pointer: move the dragged thing by the pointer's world
    /// delta since the grab. The thing stays owned by its original block
    /// whatever coordinates fall out.
    pub fn drag_to(&mut self, drag: &DragState, pixel_x: i32, pixel_y: i32) -> bool {
        let scale = self.level.scale();
        let target_x = drag.start_x + geometry::pixel_to_world(pixel_x, scale) - drag.grab_x;
        let target_y = drag.start_y + geometry::pixel_to_world(pixel_y, scale) - drag.grab_y;
        let moved = self.level.move_thing(drag.thing, target_x, target_y);
        if moved {
            self.dirty = true;
        }
        moved
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::registry::TemplateKind;
    use brawler_core::ThingKind;

    fn session_with_blocks() -> Session {
        let mut session = Session::new();
        session.add_block(100);
        session.add_block(50);
        session.dirty = false;
        session
    }

    fn character_template() -> Template {
        Template {
            path: PathBuf::from("data/chars/billy/billy.txt"),
            kind: TemplateKind::Character,
        }
    }

    #[test]
    fn test_place_thing_in_block_under_pointer() {
        let mut session = session_with_blocks();
        let id = session.place_thing(&character_template(), 120, 40).unwrap();
        assert!(session.is_dirty());
        assert_eq!(session.level().find_owning_block(id), Some(1));
        let thing = session.level().find_thing(id).unwrap();
        assert_eq!((thing.x, thing.y), (20, 40));
        assert!(matches!(thing.kind, ThingKind::Character { .. }));
    }

    #[test]
    fn test_place_thing_outside_blocks_fails() {
        let mut session = session_with_blocks();
        let err = session
            .place_thing(&character_template(), 500, 40)
            .unwrap_err();
        assert!(matches!(err, SessionError::OutsideBlocks(500)));
        assert!(!session.is_dirty());
    }

    #[test]
    fn test_select_and_delete() {
        let mut session = session_with_blocks();
        let id = session.place_thing(&character_template(), 30, 40).unwrap();

        assert_eq!(session.select_at(30, 35), Some(id));
        assert!(session.level().find_thing(id).unwrap().selected);

        assert!(session.delete_selected());
        assert!(session.level().find_thing(id).is_none());
        assert_eq!(session.selection(), None);
        assert!(!session.delete_selected());
    }

    #[test]
    fn test_select_empty_space_clears_selection() {
        let mut session = session_with_blocks();
        let id = session.place_thing(&character_template(), 30, 40).unwrap();
        session.select_at(30, 35);
        assert_eq!(session.selection(), Some(id));

        assert_eq!(session.select_at(90, 35), None);
        assert_eq!(session.selection(), None);
        assert!(!session.level().find_thing(id).unwrap().selected);
    }

    #[test]
    fn test_drag_moves_by_pointer_delta() {
        let mut session = session_with_blocks();
        let id = session.place_thing(&character_template(), 120, 40).unwrap();
        session.select_at(120, 35);

        // Grab slightly off-center and move the pointer 15 px right, 5 up.
        let drag = session.begin_drag(125, 30).unwrap();
        assert!(session.drag_to(&drag, 140, 25));

        let thing = session.level().find_thing(id).unwrap();
        assert_eq!((thing.x, thing.y), (35, 35));
        assert_eq!(session.level().find_owning_block(id), Some(1));
    }

    #[test]
    fn test_drag_past_block_bounds_keeps_ownership() {
        let mut session = session_with_blocks();
        let id = session.place_thing(&character_template(), 120, 40).unwrap();
        session.select_at(120, 35);

        let drag = session.begin_drag(120, 40).unwrap();
        assert!(session.drag_to(&drag, 600, 40));

        let thing = session.level().find_thing(id).unwrap();
        assert_eq!(thing.x, 500);
        assert_eq!(session.level().find_owning_block(id), Some(1));
    }

    #[test]
    fn test_begin_drag_without_selection_is_none() {
        let session = session_with_blocks();
        assert!(session.begin_drag(10, 10).is_none());
    }

    #[test]
    fn test_remove_block_drops_selection_with_it() {
        let mut session = session_with_blocks();
        let id = session.place_thing(&character_template(), 30, 40).unwrap();
        session.select_at(30, 35);
        assert_eq!(session.selection(), Some(id));

        session.remove_block(0);
        assert_eq!(session.selection(), None);
        assert!(session.level().find_thing(id).is_none());
    }
}
