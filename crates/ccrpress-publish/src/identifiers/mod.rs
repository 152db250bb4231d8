pub mod doi;
pub mod short_code;

pub use doi::CanonicalDoi;
pub use short_code::{short_code, DOI_CODE_LENGTH};
