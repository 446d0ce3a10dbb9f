pub mod coder;
pub mod presenter;
pub mod researcher;
pub mod reviewer;
pub mod router;

pub use coder::Coder;
pub use presenter::{Presenter, ResearchReport};
pub use researcher::Researcher;
pub use reviewer::Reviewer;
pub use router::RouterStep;
