pub mod change;
pub mod dashboard;
pub mod graph;
pub mod layout;
pub mod splash;

pub use change::{ChangeDetector, Fingerprint};
pub use dashboard::Dashboard;
pub use graph::{GraphColors, GraphGeometry, GraphRenderer};
pub use splash::Splash;
