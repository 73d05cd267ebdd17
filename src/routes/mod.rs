pub mod ai;

pub mod assignments;

pub mod classes;

pub mod profile;

pub mod questions;

pub mod revision_lists;

pub use ai::configure_ai_routes;
pub use assignments::configure_assignments_routes;
pub use classes::configure_classes_routes;
pub use profile::configure_profile_routes;
pub use questions::configure_questions_routes;
pub use revision_lists::configure_revision_lists_routes;
