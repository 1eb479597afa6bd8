pub mod cases;
pub mod collaboration;
pub mod evidence;
pub mod health;
pub mod intake;
pub mod reconstruction;
pub mod upload;
