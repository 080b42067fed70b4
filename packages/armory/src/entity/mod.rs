pub mod admin_credential;
pub mod category;
pub mod material;
pub mod origin;
pub mod sword;
pub mod sword_material;
