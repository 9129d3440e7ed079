mod list_item;
pub use list_item::*;
mod review;
pub use review::*;
