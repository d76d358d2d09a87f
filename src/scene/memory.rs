use std::cell::RefCell;
use std::collections::{BTreeSet, HashMap};

use crate::geometry::Rect;

use super::{ElementId, SceneError, SceneGraph, SceneResult};

/// In-memory [`SceneGraph`] service.
///
/// Layout rectangles are host-assigned through [`MemoryScene::set_rect`];
/// reparenting moves tree links only, and the host (or test) re-assigns
/// rectangles afterwards the way a real layout pass would.
#[derive(Debug, Default)]
pub struct MemoryScene {
    inner: RefCell<SceneState>,
}

#[derive(Debug, Default)]
struct SceneState {
    nodes: HashMap<ElementId, Node>,
    next_id: u64,
}

#[derive(Debug, Default)]
struct Node {
    rect: Rect,
    parent: Option<ElementId>,
    children: Vec<ElementId>,
    classes: BTreeSet<String>,
    explicit_rect: Option<Rect>,
}

impl MemoryScene {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn add_root(&self, rect: Rect) -> ElementId {
        let mut state = self.inner.borrow_mut();
        let id = state.allocate();
        state.nodes.insert(
            id,
            Node {
                rect,
                ..Node::default()
            },
        );
        id
    }

    pub fn add_child(&self, parent: ElementId, rect: Rect) -> SceneResult<ElementId> {
        let mut state = self.inner.borrow_mut();
        if !state.nodes.contains_key(&parent) {
            return Err(SceneError::UnknownElement(parent));
        }
        let id = state.allocate();
        state.nodes.insert(
            id,
            Node {
                rect,
                parent: Some(parent),
                ..Node::default()
            },
        );
        state
            .nodes
            .get_mut(&parent)
            .expect("parent checked above")
            .children
            .push(id);
        Ok(id)
    }

    /// Assign a new layout rectangle, standing in for a layout pass.
    pub fn set_rect(&self, element: ElementId, rect: Rect) -> SceneResult<()> {
        let mut state = self.inner.borrow_mut();
        let node = state.node_mut(element)?;
        node.rect = rect;
        Ok(())
    }

    pub fn children(&self, parent: ElementId) -> SceneResult<Vec<ElementId>> {
        let state = self.inner.borrow();
        Ok(state.node(parent)?.children.clone())
    }

    fn detach(state: &mut SceneState, element: ElementId) -> SceneResult<()> {
        let parent = state.node(element)?.parent;
        if let Some(parent) = parent {
            let siblings = &mut state
                .nodes
                .get_mut(&parent)
                .ok_or(SceneError::UnknownElement(parent))?
                .children;
            siblings.retain(|child| *child != element);
        }
        state.node_mut(element)?.parent = None;
        Ok(())
    }
}

impl SceneState {
    fn allocate(&mut self) -> ElementId {
        let id = ElementId::new(self.next_id);
        self.next_id += 1;
        id
    }

    fn node(&self, element: ElementId) -> SceneResult<&Node> {
        self.nodes
            .get(&element)
            .ok_or(SceneError::UnknownElement(element))
    }

    fn node_mut(&mut self, element: ElementId) -> SceneResult<&mut Node> {
        self.nodes
            .get_mut(&element)
            .ok_or(SceneError::UnknownElement(element))
    }
}

impl SceneGraph for MemoryScene {
    fn rect_of(&self, element: ElementId) -> SceneResult<Rect> {
        let state = self.inner.borrow();
        let node = state.node(element)?;
        Ok(node.explicit_rect.unwrap_or(node.rect))
    }

    fn rect_relative_to(&self, element: ElementId, ancestor: ElementId) -> SceneResult<Rect> {
        let element_rect = self.rect_of(element)?;
        let ancestor_rect = self.rect_of(ancestor)?;
        Ok(element_rect.relative_to(ancestor_rect.origin()))
    }

    fn parent_of(&self, element: ElementId) -> SceneResult<Option<ElementId>> {
        let state = self.inner.borrow();
        Ok(state.node(element)?.parent)
    }

    fn index_in_parent(&self, element: ElementId) -> SceneResult<usize> {
        let state = self.inner.borrow();
        let parent = state
            .node(element)?
            .parent
            .ok_or(SceneError::Detached(element))?;
        state
            .node(parent)?
            .children
            .iter()
            .position(|child| *child == element)
            .ok_or(SceneError::Detached(element))
    }

    fn reparent(&self, element: ElementId, new_parent: ElementId) -> SceneResult<()> {
        let mut state = self.inner.borrow_mut();
        state.node(element)?;
        state.node(new_parent)?;
        Self::detach(&mut state, element)?;
        state.node_mut(element)?.parent = Some(new_parent);
        state.node_mut(new_parent)?.children.push(element);
        Ok(())
    }

    fn reparent_at(
        &self,
        element: ElementId,
        new_parent: ElementId,
        index: usize,
    ) -> SceneResult<()> {
        let mut state = self.inner.borrow_mut();
        state.node(element)?;
        let len = state.node(new_parent)?.children.len();
        // The element may currently live elsewhere; the insert position is
        // validated against the target parent before detaching.
        if index > len {
            return Err(SceneError::IndexOutOfRange {
                parent: new_parent,
                index,
                len,
            });
        }
        Self::detach(&mut state, element)?;
        state.node_mut(element)?.parent = Some(new_parent);
        let siblings = &mut state.node_mut(new_parent)?.children;
        let index = index.min(siblings.len());
        siblings.insert(index, element);
        Ok(())
    }

    fn add_class(&self, element: ElementId, class: &str) -> SceneResult<()> {
        let mut state = self.inner.borrow_mut();
        state.node_mut(element)?.classes.insert(class.to_string());
        Ok(())
    }

    fn remove_class(&self, element: ElementId, class: &str) -> SceneResult<()> {
        let mut state = self.inner.borrow_mut();
        state.node_mut(element)?.classes.remove(class);
        Ok(())
    }

    fn has_class(&self, element: ElementId, class: &str) -> SceneResult<bool> {
        let state = self.inner.borrow();
        Ok(state.node(element)?.classes.contains(class))
    }

    fn set_absolute_rect(&self, element: ElementId, rect: Rect) -> SceneResult<()> {
        let mut state = self.inner.borrow_mut();
        state.node_mut(element)?.explicit_rect = Some(rect);
        Ok(())
    }

    fn clear_positioning(&self, element: ElementId) -> SceneResult<()> {
        let mut state = self.inner.borrow_mut();
        state.node_mut(element)?.explicit_rect = None;
        Ok(())
    }

    fn has_explicit_positioning(&self, element: ElementId) -> SceneResult<bool> {
        let state = self.inner.borrow();
        Ok(state.node(element)?.explicit_rect.is_some())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn add_child_links_parent_and_orders_children() {
        let scene = MemoryScene::new();
        let root = scene.add_root(Rect::new(0.0, 0.0, 100.0, 100.0));
        let first = scene.add_child(root, Rect::new(0.0, 0.0, 10.0, 10.0)).unwrap();
        let second = scene
            .add_child(root, Rect::new(10.0, 0.0, 10.0, 10.0))
            .unwrap();

        assert_eq!(scene.children(root).unwrap(), vec![first, second]);
        assert_eq!(scene.parent_of(first).unwrap(), Some(root));
        assert_eq!(scene.index_in_parent(second).unwrap(), 1);
    }

    #[test]
    fn reparent_appends_and_reparent_at_restores_position() {
        let scene = MemoryScene::new();
        let root = scene.add_root(Rect::new(0.0, 0.0, 100.0, 100.0));
        let other = scene.add_root(Rect::new(200.0, 0.0, 100.0, 100.0));
        let a = scene.add_child(root, Rect::default()).unwrap();
        let b = scene.add_child(root, Rect::default()).unwrap();
        let c = scene.add_child(root, Rect::default()).unwrap();

        scene.reparent(b, other).unwrap();
        assert_eq!(scene.children(root).unwrap(), vec![a, c]);
        assert_eq!(scene.children(other).unwrap(), vec![b]);

        scene.reparent_at(b, root, 1).unwrap();
        assert_eq!(scene.children(root).unwrap(), vec![a, b, c]);
        assert_eq!(scene.index_in_parent(b).unwrap(), 1);
        assert!(scene.children(other).unwrap().is_empty());
    }

    #[test]
    fn reparent_at_rejects_out_of_range_index() {
        let scene = MemoryScene::new();
        let root = scene.add_root(Rect::default());
        let other = scene.add_root(Rect::default());
        let child = scene.add_child(root, Rect::default()).unwrap();

        let err = scene.reparent_at(child, other, 3).unwrap_err();
        assert!(matches!(err, SceneError::IndexOutOfRange { index: 3, .. }));
        // The failed move must not have detached the element.
        assert_eq!(scene.parent_of(child).unwrap(), Some(root));
    }

    #[test]
    fn explicit_rect_overrides_layout_until_cleared() {
        let scene = MemoryScene::new();
        let root = scene.add_root(Rect::new(0.0, 0.0, 800.0, 600.0));
        let child = scene
            .add_child(root, Rect::new(40.0, 40.0, 80.0, 80.0))
            .unwrap();

        scene
            .set_absolute_rect(child, Rect::new(500.0, 10.0, 120.0, 120.0))
            .unwrap();
        assert!(scene.has_explicit_positioning(child).unwrap());
        assert_eq!(
            scene.rect_of(child).unwrap(),
            Rect::new(500.0, 10.0, 120.0, 120.0)
        );

        scene.clear_positioning(child).unwrap();
        assert!(!scene.has_explicit_positioning(child).unwrap());
        assert_eq!(scene.rect_of(child).unwrap(), Rect::new(40.0, 40.0, 80.0, 80.0));
    }

    #[test]
    fn rect_relative_to_uses_ancestor_origin() {
        let scene = MemoryScene::new();
        let panel = scene.add_root(Rect::new(600.0, 100.0, 400.0, 700.0));
        let thumb = scene
            .add_child(panel, Rect::new(650.0, 180.0, 200.0, 260.0))
            .unwrap();

        assert_eq!(
            scene.rect_relative_to(thumb, panel).unwrap(),
            Rect::new(50.0, 80.0, 200.0, 260.0)
        );
    }

    #[test]
    fn class_flags_toggle_independently() {
        let scene = MemoryScene::new();
        let root = scene.add_root(Rect::default());

        scene.add_class(root, "--is-dragging").unwrap();
        assert!(scene.has_class(root, "--is-dragging").unwrap());
        assert!(!scene.has_class(root, "--is-loaded").unwrap());

        scene.remove_class(root, "--is-dragging").unwrap();
        assert!(!scene.has_class(root, "--is-dragging").unwrap());
    }
}
