mod id_utils;
mod render_utils;
mod type_utils;

pub use id_utils::*;
pub use render_utils::*;
pub use type_utils::*;
