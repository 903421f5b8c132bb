pub mod dashboard;
pub mod header;
pub mod popup;
pub mod revenue;
pub mod status_menu;
pub mod statusbar;
pub mod table;
