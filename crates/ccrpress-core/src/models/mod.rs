pub mod issue;
pub mod localized;
pub mod record;
pub mod submission;

pub use issue::*;
pub use localized::*;
pub use record::*;
pub use submission::*;
