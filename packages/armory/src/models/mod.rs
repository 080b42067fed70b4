pub mod category;
pub mod material;
pub mod origin;
pub mod shared;
pub mod sword;
