pub mod citation;
pub mod reference_image;
pub mod step;

pub use citation::SourceCitation;
pub use reference_image::ReferenceImage;
pub use step::{progress, Step, StepProgress, StepState, STEP_SEQUENCE};
