pub mod correction;
pub mod light;
pub mod motion;
pub mod servo;
