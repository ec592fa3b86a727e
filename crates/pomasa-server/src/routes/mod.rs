pub mod dialog;
pub mod framework;
pub mod mas;
