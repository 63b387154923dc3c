mod category;
mod product;
mod seller;

pub use category::*;
pub use product::*;
pub use seller::*;
