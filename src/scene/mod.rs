//! Layout and element-tree access behind a trait, so hosts can plug in a real
//! rendering tree and tests can use [`MemoryScene`].

mod memory;

use crate::geometry::Rect;
use thiserror::Error;

pub use memory::MemoryScene;

/// Opaque handle to an element owned by the host's rendering tree.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ElementId(u64);

impl ElementId {
    pub const fn new(raw: u64) -> Self {
        Self(raw)
    }

    pub const fn raw(self) -> u64 {
        self.0
    }
}

#[derive(Debug, Error)]
pub enum SceneError {
    #[error("unknown element {0:?}")]
    UnknownElement(ElementId),
    #[error("element {0:?} has no parent")]
    Detached(ElementId),
    #[error("element {element:?} is not a descendant of {ancestor:?}")]
    NotADescendant {
        element: ElementId,
        ancestor: ElementId,
    },
    #[error("index {index} out of range for parent {parent:?} with {len} children")]
    IndexOutOfRange {
        parent: ElementId,
        index: usize,
        len: usize,
    },
}

pub type SceneResult<T> = std::result::Result<T, SceneError>;

/// Measurement and mutation surface of the host tree.
///
/// All methods take `&self`; implementations are expected to use interior
/// mutability, matching the single-threaded cooperative event model.
pub trait SceneGraph {
    /// Layout rectangle in root coordinates. An explicit positioning override
    /// set through [`SceneGraph::set_absolute_rect`] wins over layout.
    fn rect_of(&self, element: ElementId) -> SceneResult<Rect>;

    /// Rectangle of `element` expressed relative to `ancestor`'s origin.
    fn rect_relative_to(&self, element: ElementId, ancestor: ElementId) -> SceneResult<Rect>;

    fn parent_of(&self, element: ElementId) -> SceneResult<Option<ElementId>>;

    fn index_in_parent(&self, element: ElementId) -> SceneResult<usize>;

    /// Detach `element` and append it to `new_parent`'s children.
    fn reparent(&self, element: ElementId, new_parent: ElementId) -> SceneResult<()>;

    /// Detach `element` and insert it into `new_parent`'s children at `index`.
    fn reparent_at(&self, element: ElementId, new_parent: ElementId, index: usize)
        -> SceneResult<()>;

    fn add_class(&self, element: ElementId, class: &str) -> SceneResult<()>;

    fn remove_class(&self, element: ElementId, class: &str) -> SceneResult<()>;

    fn has_class(&self, element: ElementId, class: &str) -> SceneResult<bool>;

    /// Pin `element` at an explicit rectangle (absolute positioning).
    fn set_absolute_rect(&self, element: ElementId, rect: Rect) -> SceneResult<()>;

    /// Strip any explicit positioning, returning the element to layout flow.
    fn clear_positioning(&self, element: ElementId) -> SceneResult<()>;

    fn has_explicit_positioning(&self, element: ElementId) -> SceneResult<bool>;
}
