pub mod email;
pub mod html;
pub mod labels;

pub use email::{EmailComposer, EmailContent};
