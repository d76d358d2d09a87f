pub mod animation;
pub mod app;
pub mod config;
pub mod detail;
pub mod dragging;
pub mod error;
pub mod flip;
pub mod geometry;
pub mod input;
pub mod logging;
pub mod observer;
pub mod preload;
pub mod product;
pub mod scene;
pub mod state;
pub mod viewport;

pub use app::{Collaborators, GridController, StageElements};
pub use error::{AppError, AppResult};

/// Build the root controller from host collaborators and start it. The
/// controller stays inert until the preloader's completion resolves and the
/// entrance sequence finishes.
pub fn run(
    collaborators: Collaborators,
    stage: StageElements,
    catalog: product::ProductCatalog,
    content: product::DetailContentMap,
    window: geometry::Size,
) -> std::rc::Rc<GridController> {
    logging::init();
    let config = config::load_app_config();
    tracing::info!(products = catalog.len(), "starting vitrine");

    let controller = GridController::new(collaborators, stage, catalog, content, config, window);
    controller.init();
    controller
}
