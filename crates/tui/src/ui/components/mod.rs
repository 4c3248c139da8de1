pub mod tabs;
pub mod toast;
